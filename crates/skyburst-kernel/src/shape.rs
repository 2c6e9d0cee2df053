//! Burst shapes.
//!
//! A shape decides how many stars a burst has, where they start and how fast
//! they leave. The variant is resolved once, when the simulator is built; the
//! per-tick integration never looks at it again.
//!
//! - **Spherical** (peony, chrysanthemum): every star starts at the center and
//!   leaves along one direction of a `segments × segments` latitude/longitude
//!   grid.
//! - **Raster** (illustration): one star per lit pixel, offset from the center
//!   by its grid position and flying radially outward so the burst traces the
//!   pixel-art silhouette.

use std::f32::consts::TAU;

use glam::Vec3;
use skyburst_common::ShapeError;

/// Default segment count of a spherical burst.
pub const DEFAULT_SEGMENTS: u32 = 20;

/// Default world distance between neighbouring raster cells.
pub const DEFAULT_CELL_SPACING: f32 = 0.01;

/// Rectangular boolean grid, row-major, row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    /// Cells per row
    width: usize,
    /// Number of rows
    height: usize,
    /// Row-major cells
    cells: Vec<bool>,
}

impl PixelGrid {
    /// Builds a grid from rows. Every row must have the width of the first.
    pub fn new<R, I>(rows: R) -> Result<Self, ShapeError>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = bool>,
    {
        let mut cells = Vec::new();
        let mut width = None;
        let mut height = 0;

        for (row, values) in rows.into_iter().enumerate() {
            let before = cells.len();
            cells.extend(values);
            let actual = cells.len() - before;

            match width {
                None => width = Some(actual),
                Some(expected) if expected != actual => {
                    return Err(ShapeError::RaggedRow {
                        row,
                        expected,
                        actual,
                    });
                },
                Some(_) => {},
            }
            height += 1;
        }

        let width = width.unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(ShapeError::EmptyGrid);
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Cells per row.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Whether the cell at `(row, col)` is lit. Out of range is unlit.
    #[must_use]
    pub fn is_lit(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.cells[row * self.width + col]
    }

    /// Number of lit cells.
    #[must_use]
    pub fn lit_count(&self) -> usize {
        self.cells.iter().filter(|lit| **lit).count()
    }

    /// Lit cells as `(row, col)`, row-major.
    pub fn lit_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, lit)| **lit)
            .map(|(i, _)| (i / self.width, i % self.width))
    }
}

/// Initial layout and velocity field of a burst.
#[derive(Debug, Clone, PartialEq)]
pub enum BurstShape {
    /// Latitude/longitude sphere of `segments²` stars.
    Spherical {
        /// Subdivisions of both angles
        segments: u32,
    },
    /// One star per lit pixel.
    Raster {
        /// Source silhouette
        grid: PixelGrid,
        /// World distance between neighbouring cells
        cell_spacing: f32,
    },
}

/// Starting positions and velocities produced by a shape.
#[derive(Debug, Clone, Default)]
pub struct ParticleLayout {
    /// Initial positions
    pub positions: Vec<Vec3>,
    /// Initial velocities (world units per tick)
    pub velocities: Vec<Vec3>,
}

impl BurstShape {
    /// Spherical shape with `segments` subdivisions.
    pub fn spherical(segments: u32) -> Result<Self, ShapeError> {
        let shape = Self::Spherical { segments };
        shape.validate()?;
        Ok(shape)
    }

    /// Raster shape from a grid.
    pub fn raster(grid: PixelGrid, cell_spacing: f32) -> Result<Self, ShapeError> {
        let shape = Self::Raster { grid, cell_spacing };
        shape.validate()?;
        Ok(shape)
    }

    /// Checks a shape that may have been built directly from its fields.
    pub fn validate(&self) -> Result<(), ShapeError> {
        match self {
            Self::Spherical { segments } => {
                if *segments == 0 {
                    return Err(ShapeError::ZeroSegments);
                }
            },
            Self::Raster { cell_spacing, .. } => {
                if !cell_spacing.is_finite() || *cell_spacing <= 0.0 {
                    return Err(ShapeError::InvalidSpacing(*cell_spacing));
                }
            },
        }
        Ok(())
    }

    /// Number of stars this shape produces.
    #[must_use]
    pub fn particle_count(&self) -> usize {
        match self {
            Self::Spherical { segments } => (*segments as usize).pow(2),
            Self::Raster { grid, .. } => grid.lit_count(),
        }
    }

    /// Whether this is a pixel-art shape.
    #[must_use]
    pub const fn is_raster(&self) -> bool {
        matches!(self, Self::Raster { .. })
    }

    /// Lays out stars around `center`. Speeds scale with `size * base_speed`.
    #[must_use]
    pub fn layout(&self, center: Vec3, size: f32, base_speed: f32) -> ParticleLayout {
        let scale = size * base_speed;
        let count = self.particle_count();
        let mut layout = ParticleLayout {
            positions: Vec::with_capacity(count),
            velocities: Vec::with_capacity(count),
        };

        match self {
            Self::Spherical { segments } => {
                let step = TAU / *segments as f32;
                for i in 0..*segments {
                    let theta = i as f32 * step;
                    for j in 0..*segments {
                        let phi = j as f32 * step;
                        let direction = Vec3::new(
                            theta.sin() * phi.cos(),
                            theta.cos(),
                            theta.sin() * phi.sin(),
                        );
                        layout.positions.push(center);
                        layout.velocities.push(direction * scale);
                    }
                }
            },
            Self::Raster { grid, cell_spacing } => {
                let half_width = grid.width() as f32 / 2.0;
                let half_height = grid.height() as f32 / 2.0;
                for (row, col) in grid.lit_cells() {
                    let offset = Vec3::new(
                        (col as f32 - half_width) * cell_spacing,
                        (half_height - row as f32) * cell_spacing,
                        0.0,
                    );
                    layout.positions.push(center + offset);
                    layout.velocities.push(offset * scale);
                }
            },
        }

        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_corner_grid() -> PixelGrid {
        PixelGrid::new((0..10).map(|row| (0..10).map(move |col| row == 0 && col == 0)))
            .expect("rectangular grid")
    }

    #[test]
    fn test_spherical_count_and_speed() {
        let shape = BurstShape::spherical(20).expect("valid");
        let layout = shape.layout(Vec3::new(1.0, 2.0, 3.0), 2.0, 0.3);

        assert_eq!(layout.positions.len(), 400);
        assert_eq!(layout.velocities.len(), 400);
        for (position, velocity) in layout.positions.iter().zip(&layout.velocities) {
            assert_eq!(*position, Vec3::new(1.0, 2.0, 3.0));
            assert!((velocity.length() - 0.6).abs() < 1e-5);
        }
    }

    #[test]
    fn test_spherical_first_direction_points_up() {
        let layout = BurstShape::spherical(4).expect("valid").layout(Vec3::ZERO, 1.0, 1.0);
        assert!((layout.velocities[0] - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_zero_segments_rejected() {
        assert_eq!(BurstShape::spherical(0), Err(ShapeError::ZeroSegments));
    }

    #[test]
    fn test_raster_single_cell_offset() {
        let spacing = 0.5;
        let shape = BurstShape::raster(single_corner_grid(), spacing).expect("valid");
        let center = Vec3::new(0.0, 10.0, 0.0);
        let layout = shape.layout(center, 1.0, 0.3);

        assert_eq!(shape.particle_count(), 1);
        assert_eq!(layout.positions.len(), 1);
        let offset = layout.positions[0] - center;
        assert!((offset - Vec3::new(-5.0 * spacing, 5.0 * spacing, 0.0)).length() < 1e-6);
        assert!((layout.velocities[0] - offset * 0.3).length() < 1e-6);
        assert_eq!(layout.velocities[0].z, 0.0);
    }

    #[test]
    fn test_ragged_grid_rejected() {
        let rows = vec![vec![true, false], vec![true]];
        assert_eq!(
            PixelGrid::new(rows),
            Err(ShapeError::RaggedRow {
                row: 1,
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_empty_grid_rejected() {
        let rows: Vec<Vec<bool>> = Vec::new();
        assert_eq!(PixelGrid::new(rows), Err(ShapeError::EmptyGrid));
        assert_eq!(PixelGrid::new(vec![Vec::<bool>::new()]), Err(ShapeError::EmptyGrid));
    }

    #[test]
    fn test_dark_grid_is_an_empty_burst() {
        let grid = PixelGrid::new(vec![vec![false; 3]; 2]).expect("rectangular");
        let shape = BurstShape::raster(grid, DEFAULT_CELL_SPACING).expect("valid");
        assert_eq!(shape.particle_count(), 0);
        assert!(shape.layout(Vec3::ZERO, 1.0, 0.3).positions.is_empty());
    }

    #[test]
    fn test_bad_spacing_rejected() {
        let shape = BurstShape::Raster {
            grid: single_corner_grid(),
            cell_spacing: f32::NAN,
        };
        assert!(matches!(shape.validate(), Err(ShapeError::InvalidSpacing(_))));
    }

    #[test]
    fn test_lit_cells_row_major() {
        let grid = PixelGrid::new(vec![vec![false, true], vec![true, true]]).expect("rectangular");
        let cells: Vec<_> = grid.lit_cells().collect();
        assert_eq!(cells, vec![(0, 1), (1, 0), (1, 1)]);
        assert!(grid.is_lit(1, 0));
        assert!(!grid.is_lit(5, 5));
    }
}
