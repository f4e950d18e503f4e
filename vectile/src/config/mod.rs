//! Slicing options
//!
//! Pure data type with validation; no parsing or file I/O. Defaults match
//! the conventional vector-tile setup: 4096-unit tiles with a 64-unit
//! buffer, eager indexing to zoom 5 or 100k points per tile, and a
//! simplification tolerance of 3 tile units.

use thiserror::Error;

/// Highest zoom level the packed tile key can address.
pub const MAX_ADDRESSABLE_ZOOM: u8 = 24;

/// Options controlling pyramid construction and tile emission.
#[derive(Debug, Clone, PartialEq)]
pub struct TileOptions {
    /// Deepest zoom level tiles are generated for (0-24)
    pub max_zoom: u8,
    /// Zoom level up to which tiles are built eagerly at construction
    pub index_max_zoom: u8,
    /// Point-count threshold below which eager indexing stops recursing
    pub index_max_points: u32,
    /// Simplification tolerance in tile units; larger thins more
    pub tolerance: f64,
    /// Tile coordinate resolution in units per tile side
    pub extent: u16,
    /// Clip margin around each tile, in tile units
    pub buffer: u16,
    /// Emit timing and counter diagnostics while building
    pub debug: bool,
}

impl Default for TileOptions {
    fn default() -> Self {
        Self {
            max_zoom: 14,
            index_max_zoom: 5,
            index_max_points: 100_000,
            tolerance: 3.0,
            extent: 4096,
            buffer: 64,
            debug: false,
        }
    }
}

impl TileOptions {
    /// Check the options for internal consistency.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.max_zoom > MAX_ADDRESSABLE_ZOOM {
            return Err(OptionsError::MaxZoomOutOfRange(self.max_zoom));
        }
        if self.index_max_zoom > self.max_zoom {
            return Err(OptionsError::IndexZoomAboveMaxZoom {
                index_max_zoom: self.index_max_zoom,
                max_zoom: self.max_zoom,
            });
        }
        if self.tolerance < 0.0 || !self.tolerance.is_finite() {
            return Err(OptionsError::InvalidTolerance(self.tolerance));
        }
        if self.extent == 0 {
            return Err(OptionsError::ZeroExtent);
        }
        Ok(())
    }
}

/// Errors raised by [`TileOptions::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptionsError {
    /// Max zoom beyond what the 64-bit tile key can address
    #[error("max_zoom {0} exceeds the addressable range (0-{MAX_ADDRESSABLE_ZOOM})")]
    MaxZoomOutOfRange(u8),
    /// Eager index depth beyond the pyramid depth
    #[error("index_max_zoom {index_max_zoom} exceeds max_zoom {max_zoom}")]
    IndexZoomAboveMaxZoom {
        /// Requested eager index depth
        index_max_zoom: u8,
        /// Pyramid depth
        max_zoom: u8,
    },
    /// Tolerance must be a finite, non-negative number
    #[error("tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(f64),
    /// Extent must be positive
    #[error("extent must be positive")]
    ZeroExtent,
}
