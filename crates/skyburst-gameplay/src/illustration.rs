//! Pixel-art illustration records.
//!
//! Illustrations arrive as JSON records, either from the drawing API
//! (`is_shareable`, `pixel_data` as rows of 0/1) or from a locally saved copy
//! (`isShareable`, `pixelData` as rows of booleans). The admin dashboard
//! stores the same grid flattened to one square run of cells; that layout is
//! accepted too.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use skyburst_common::{SkyburstError, SkyburstResult};
use skyburst_kernel::PixelGrid;
use tracing::debug;

/// One cell as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PixelValue {
    /// `true`/`false`
    Bool(bool),
    /// `0` is dark, anything else is lit
    Int(i64),
}

impl PixelValue {
    /// Whether the cell is lit.
    #[must_use]
    pub const fn is_lit(self) -> bool {
        match self {
            Self::Bool(lit) => lit,
            Self::Int(value) => value != 0,
        }
    }
}

/// Cell layout as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PixelData {
    /// Row-major rows, row 0 at the top
    Rows(Vec<Vec<PixelValue>>),
    /// Square grid flattened row by row
    Flat(Vec<PixelValue>),
}

/// A saved drawing that can be flown as an illustration firework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IllustrationRecord {
    /// Record ID assigned by the drawing service
    pub id: u64,
    /// Whether the author allowed sharing
    #[serde(default, alias = "isShareable")]
    pub is_shareable: bool,
    /// Cells
    #[serde(alias = "pixelData")]
    pub pixel_data: PixelData,
}

impl IllustrationRecord {
    /// Builds a record from a boolean grid.
    #[must_use]
    pub fn from_rows(id: u64, rows: &[Vec<bool>]) -> Self {
        Self {
            id,
            is_shareable: false,
            pixel_data: PixelData::Rows(
                rows.iter()
                    .map(|row| row.iter().map(|lit| PixelValue::Bool(*lit)).collect())
                    .collect(),
            ),
        }
    }

    /// Parses a record from JSON text.
    pub fn from_json(json: &str) -> SkyburstResult<Self> {
        serde_json::from_str(json).map_err(|e| SkyburstError::Serialization(e.to_string()))
    }

    /// Serializes the record to pretty JSON.
    pub fn to_json(&self) -> SkyburstResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SkyburstError::Serialization(e.to_string()))
    }

    /// Loads and validates a record from a JSON file.
    pub fn load(path: &Path) -> SkyburstResult<Self> {
        let contents = fs::read_to_string(path)?;
        let record = Self::from_json(&contents)?;
        record.to_grid()?;
        debug!(id = record.id, path = %path.display(), "illustration loaded");
        Ok(record)
    }

    /// Writes the record to a JSON file.
    pub fn save(&self, path: &Path) -> SkyburstResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Converts the cells into a validated grid.
    pub fn to_grid(&self) -> SkyburstResult<PixelGrid> {
        match &self.pixel_data {
            PixelData::Rows(rows) => Ok(PixelGrid::new(
                rows.iter().map(|row| row.iter().map(|cell| cell.is_lit())),
            )?),
            PixelData::Flat(cells) => {
                let side = square_side(cells.len()).ok_or_else(|| {
                    SkyburstError::Serialization(format!(
                        "flat pixel data of {} cells is not a square grid",
                        cells.len()
                    ))
                })?;
                Ok(PixelGrid::new(
                    cells.chunks(side).map(|row| row.iter().map(|cell| cell.is_lit())),
                )?)
            },
        }
    }
}

/// Side length of a square with `len` cells, if there is one.
fn square_side(len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let side = (len as f64).sqrt().round() as usize;
    (side * side == len).then_some(side)
}
