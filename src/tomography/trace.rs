use serde::{Deserialize, Serialize};

use crate::tomography::pattern::Pixel;

/// `N × N` image split into square cells of `cell_size` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub image_size: usize,
    pub cell_size: usize,
}

impl Grid {
    /// Cells per side; a partial cell at the border still counts.
    pub fn cells_per_side(&self) -> usize {
        self.image_size.div_ceil(self.cell_size)
    }

    pub fn cell_count(&self) -> usize {
        let side = self.cells_per_side();
        side * side
    }

    /// Row-major index of the cell holding pixel `(x, y)`.
    pub fn cell_index(&self, x: usize, y: usize) -> usize {
        (y / self.cell_size) * self.cells_per_side() + x / self.cell_size
    }
}

/// Walks a straight ray through the image one pixel at a time.
pub struct RayTracer;

impl RayTracer {
    /// Pixels crossed per cell for the ray through the centres of `from`
    /// and `to`, extended to the image border. Returned as `(cell, count)`
    /// pairs sorted by cell, zeros omitted.
    ///
    /// The walk starts at the leftmost endpoint. At each pixel the line's
    /// height at the pixel's right edge decides the next step: up, down,
    /// right, or diagonally when it hits a pixel corner. Vertical rays are
    /// tilted by a quarter pixel on each end so the slope stays finite.
    pub fn trace(grid: &Grid, from: Pixel, to: Pixel) -> Vec<(usize, f64)> {
        let (x0, y0) = from;
        let (x1, y1) = to;
        let mut x0d = x0 as f64 + 0.5;
        let y0d = y0 as f64 + 0.5;
        let mut x1d = x1 as f64 + 0.5;
        let y1d = y1 as f64 + 0.5;

        let (start_x, start_y) = if x1 < x0 { (x1, y1) } else { (x0, y0) };
        if x0 == x1 {
            x0d -= 0.25;
            x1d += 0.25;
        }

        let slope = (y1d - y0d) / (x1d - x0d);
        let intercept = y0d - slope * x0d;

        let size = grid.image_size as isize;
        let mut x = start_x as isize;
        let mut y = start_y as isize;
        let mut counts = vec![0.0f64; grid.cell_count()];
        // A monotone lattice path crosses at most 2N - 1 pixels.
        let max_steps = 2 * grid.image_size;
        let mut steps = 0;

        while steps < max_steps && (0..size).contains(&x) && (0..size).contains(&y) {
            counts[grid.cell_index(x as usize, y as usize)] += 1.0;
            steps += 1;

            let right = slope * (x + 1) as f64 + intercept;
            let top = y as f64;
            let bottom = top + 1.0;
            if (right - top).abs() < f64::EPSILON {
                x += 1;
                y -= 1;
            } else if (right - bottom).abs() < f64::EPSILON {
                x += 1;
                y += 1;
            } else if right < top {
                y -= 1;
            } else if right < bottom {
                x += 1;
            } else {
                y += 1;
            }
        }

        counts
            .into_iter()
            .enumerate()
            .filter(|(_, count)| *count != 0.0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(image_size: usize, cell_size: usize) -> Grid {
        Grid {
            image_size,
            cell_size,
        }
    }

    fn total(entries: &[(usize, f64)]) -> f64 {
        entries.iter().map(|(_, count)| count).sum()
    }

    #[test]
    fn partial_cells_round_up() {
        let grid = grid(5, 2);
        assert_eq!(grid.cells_per_side(), 3);
        assert_eq!(grid.cell_count(), 9);
        assert_eq!(grid.cell_index(4, 4), 8);
        assert_eq!(grid.cell_index(3, 0), 1);
    }

    #[test]
    fn horizontal_ray_crosses_one_row() {
        let grid = grid(4, 1);
        let entries = RayTracer::trace(&grid, (0, 2), (3, 2));
        assert_eq!(entries, vec![(8, 1.0), (9, 1.0), (10, 1.0), (11, 1.0)]);
    }

    #[test]
    fn vertical_ray_crosses_one_column() {
        let grid = grid(4, 1);
        let down = RayTracer::trace(&grid, (1, 0), (1, 3));
        assert_eq!(down, vec![(1, 1.0), (5, 1.0), (9, 1.0), (13, 1.0)]);
        let up = RayTracer::trace(&grid, (2, 3), (2, 0));
        assert_eq!(up, vec![(2, 1.0), (6, 1.0), (10, 1.0), (14, 1.0)]);
    }

    #[test]
    fn direction_does_not_matter() {
        let grid = grid(6, 2);
        let forward = RayTracer::trace(&grid, (0, 1), (5, 3));
        let backward = RayTracer::trace(&grid, (5, 3), (0, 1));
        assert_eq!(forward, backward);
    }

    #[test]
    fn cells_aggregate_pixels() {
        let grid = grid(4, 2);
        let entries = RayTracer::trace(&grid, (0, 0), (3, 0));
        assert_eq!(entries, vec![(0, 2.0), (1, 2.0)]);
        assert_eq!(total(&entries), 4.0);
    }
}
