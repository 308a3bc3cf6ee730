use rand::Rng;
use serde::{Deserialize, Serialize};

/// Pixel coordinate `(x, y)`, with `y` growing downwards.
pub type Pixel = (usize, usize);

/// A ray between the centres of two pixels.
pub type Ray = (Pixel, Pixel);

/// Ray layouts over an `N × N` image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RayPattern {
    /// Every left→right and top→bottom edge pair, `2N²` rays.
    SideToSide,
    /// Rows, columns and both diagonal families, `6N − 6` rays.
    AxisAndDiagonal,
    /// Fans from each of the four corners, `4(2N − 1)` rays.
    CornerSweep,
    /// Random rays between opposite or adjacent edges.
    Random { rays: usize },
}

impl RayPattern {
    /// Map the numeric method code: 0, 1 and 2 are the fixed layouts, any
    /// larger value is that many random rays.
    pub fn from_method(method: u32) -> Self {
        match method {
            0 => RayPattern::SideToSide,
            1 => RayPattern::AxisAndDiagonal,
            2 => RayPattern::CornerSweep,
            rays => RayPattern::Random {
                rays: rays as usize,
            },
        }
    }

    pub fn ray_count(&self, size: usize) -> usize {
        match self {
            RayPattern::SideToSide => 2 * size * size,
            RayPattern::AxisAndDiagonal => 6 * size - 6,
            RayPattern::CornerSweep => 4 * (2 * size - 1),
            RayPattern::Random { rays } => *rays,
        }
    }

    /// Endpoints of every ray, in row order of the resulting matrix.
    /// `size` must be at least 2.
    pub fn rays<R: Rng>(&self, size: usize, rng: &mut R) -> Vec<Ray> {
        let last = size - 1;
        let mut rays = Vec::with_capacity(self.ray_count(size));
        match self {
            RayPattern::SideToSide => {
                for y0 in 0..size {
                    for y1 in 0..size {
                        rays.push(((0, y0), (last, y1)));
                    }
                }
                for x0 in 0..size {
                    for x1 in 0..size {
                        rays.push(((x0, 0), (x1, last)));
                    }
                }
            }
            RayPattern::AxisAndDiagonal => {
                rays.extend((0..size).map(|y| ((0, y), (last, y))));
                rays.extend((0..size).map(|x| ((x, 0), (x, last))));
                // Diagonals are given by their first step; the tracer
                // extends them to the image border.
                rays.extend((0..last).map(|y| ((0, y), (1, y + 1))));
                rays.extend((1..last).map(|x| ((x, 0), (x + 1, 1))));
                rays.extend((1..size).map(|y| ((0, y), (1, y - 1))));
                rays.extend((1..last).map(|x| ((x, last), (x + 1, last - 1))));
            }
            RayPattern::CornerSweep => {
                rays.extend((0..size).map(|y| ((0, 0), (last, y))));
                rays.extend((0..last).map(|x| ((0, 0), (x, last))));
                rays.extend((0..size).map(|y| ((last, 0), (0, y))));
                rays.extend((1..size).map(|x| ((last, 0), (x, last))));
                rays.extend((0..size).map(|y| ((0, last), (last, y))));
                rays.extend((0..last).map(|x| ((0, last), (x, 0))));
                rays.extend((0..size).map(|y| ((last, last), (0, y))));
                rays.extend((1..size).map(|x| ((last, last), (x, 0))));
            }
            RayPattern::Random { rays: count } => {
                for _ in 0..*count {
                    let family = rng.gen_range(0..6);
                    let a = rng.gen_range(0..size);
                    let b = rng.gen_range(0..size);
                    let ray = match family {
                        0 => ((0, a), (last, b)),
                        1 => ((a, 0), (b, last)),
                        2 => ((0, a), (b, 0)),
                        3 => ((a, 0), (last, b)),
                        4 => ((last, a), (b, last)),
                        _ => ((a, last), (0, b)),
                    };
                    rays.push(ray);
                }
            }
        }
        rays
    }
}
