//! Ray tomography design matrices.
//!
//! Row `k` of `D` is ray `k`; column `j` is cell `j` of the discretised
//! image; each entry counts the pixels of that ray lying in that cell.
//! These are the matrices whose Gram spectrum the analyzer inspects.

pub mod pattern;
pub mod trace;

use anyhow::{Result, bail};
use log::info;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use crate::matrix::SparseColumns;

pub use pattern::{Pixel, Ray, RayPattern};
pub use trace::{Grid, RayTracer};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomographyConfig {
    pub image_size: usize,
    pub cell_size: usize,
    pub pattern: RayPattern,
    pub seed: u64,
}

impl Default for TomographyConfig {
    fn default() -> Self {
        Self {
            image_size: 16,
            cell_size: 1,
            pattern: RayPattern::AxisAndDiagonal,
            seed: 1000,
        }
    }
}

impl TomographyConfig {
    pub fn grid(&self) -> Grid {
        Grid {
            image_size: self.image_size,
            cell_size: self.cell_size,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.image_size < 2 {
            bail!("Image size must be at least 2, got {}", self.image_size);
        }
        if self.cell_size == 0 {
            bail!("Cell size must be greater than zero");
        }
        if self.cell_size > self.image_size {
            bail!(
                "Cell size {} exceeds image size {}",
                self.cell_size,
                self.image_size
            );
        }
        if let RayPattern::Random { rays: 0 } = self.pattern {
            bail!("Random pattern needs at least one ray");
        }
        Ok(())
    }
}

pub struct TomographyGenerator;

impl TomographyGenerator {
    pub fn generate(config: &TomographyConfig) -> Result<SparseColumns> {
        config.validate()?;
        let grid = config.grid();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
        let rays = config.pattern.rays(config.image_size, &mut rng);

        let mut matrix = SparseColumns::new(rays.len(), grid.cell_count());
        for (row, (from, to)) in rays.into_iter().enumerate() {
            for (cell, count) in RayTracer::trace(&grid, from, to) {
                matrix.push(row, cell, count);
            }
        }

        info!(
            "Generated {}x{} ray matrix ({:?}, image {}, cell {}, {} non-zeros)",
            matrix.rows(),
            matrix.cols(),
            config.pattern,
            config.image_size,
            config.cell_size,
            matrix.non_zero_count()
        );
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_shape_follows_pattern_and_grid() {
        let config = TomographyConfig {
            image_size: 6,
            cell_size: 2,
            pattern: RayPattern::CornerSweep,
            seed: 1,
        };
        let matrix = TomographyGenerator::generate(&config).expect("generate");
        assert_eq!(matrix.rows(), 4 * (2 * 6 - 1));
        assert_eq!(matrix.cols(), 9);
    }

    #[test]
    fn every_ray_crosses_the_image() {
        for pattern in [
            RayPattern::SideToSide,
            RayPattern::AxisAndDiagonal,
            RayPattern::CornerSweep,
            RayPattern::Random { rays: 40 },
        ] {
            let config = TomographyConfig {
                image_size: 5,
                cell_size: 1,
                pattern,
                seed: 1000,
            };
            let matrix = TomographyGenerator::generate(&config).expect("generate");
            let mut per_row = vec![0.0f64; matrix.rows()];
            for column in matrix.columns() {
                for &(row, count) in column {
                    per_row[row] += count;
                }
            }
            assert!(
                per_row.iter().all(|pixels| *pixels >= 1.0),
                "{pattern:?} produced an empty ray"
            );
            assert!(per_row.iter().all(|pixels| *pixels <= 9.0));
        }
    }

    #[test]
    fn horizontal_rows_cover_whole_image_width() {
        let config = TomographyConfig {
            image_size: 4,
            cell_size: 1,
            pattern: RayPattern::AxisAndDiagonal,
            seed: 0,
        };
        let matrix = TomographyGenerator::generate(&config).expect("generate");
        // First four rays are the image rows.
        for cell in 0..4 {
            assert_eq!(matrix.column(cell).first(), Some(&(0, 1.0)));
        }
    }

    #[test]
    fn two_pixel_image_is_the_smallest_accepted() {
        let config = TomographyConfig {
            image_size: 2,
            cell_size: 1,
            pattern: RayPattern::AxisAndDiagonal,
            seed: 0,
        };
        let matrix = TomographyGenerator::generate(&config).expect("generate");
        assert_eq!((matrix.rows(), matrix.cols()), (6, 4));

        let single = TomographyConfig {
            image_size: 1,
            ..config
        };
        let err = single.validate().expect_err("single pixel");
        assert!(err.to_string().contains("at least 2"));
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let base = TomographyConfig::default();
        for config in [
            TomographyConfig {
                image_size: 1,
                ..base.clone()
            },
            TomographyConfig {
                cell_size: 0,
                ..base.clone()
            },
            TomographyConfig {
                cell_size: 17,
                ..base.clone()
            },
            TomographyConfig {
                pattern: RayPattern::Random { rays: 0 },
                ..base.clone()
            },
        ] {
            assert!(TomographyGenerator::generate(&config).is_err());
        }
    }
}
