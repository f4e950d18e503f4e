//! Tile type definitions

use crate::geometry::{FeatureKind, ProjectedFeature, ProjectedGeometry, ProjectedPoint, Properties};

/// A point in integer tile space.
///
/// Valid tile geometry lies within [-buffer, extent + buffer]; coordinates
/// outside the representable range saturate during transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TilePoint {
    /// X coordinate in tile units
    pub x: i16,
    /// Y coordinate in tile units
    pub y: i16,
}

impl TilePoint {
    /// Create a new tile point.
    #[inline]
    pub fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

/// An ordered run of tile points: one line or one polygon ring.
///
/// Polygon rings are closed (first point equals last point).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TileRing {
    /// Ring vertices in order
    pub points: Vec<TilePoint>,
}

/// One element of a tile feature's quantized geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileGeometry {
    /// A single point
    Point(TilePoint),
    /// A line or polygon ring
    Ring(TileRing),
}

/// A feature emitted into a tile.
///
/// `geometry` holds the simplified vertices in normalized space;
/// `tile_geometry` is empty until the owning tile is transformed.
#[derive(Debug, Clone, PartialEq)]
pub struct TileFeature {
    /// Geometry kind
    pub kind: FeatureKind,
    /// Simplified geometry in normalized space: points for point features,
    /// containers (lines/rings) otherwise
    pub geometry: Vec<ProjectedGeometry>,
    /// Quantized geometry, filled by the transform step
    pub tile_geometry: Vec<TileGeometry>,
    /// Opaque attributes
    pub properties: Properties,
}

/// One cell of the tile pyramid.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// Zoom level
    pub z: u8,
    /// Tile column
    pub x: u32,
    /// Tile row
    pub y: u32,
    /// Tiles per axis at this zoom (2^z)
    pub z2: u32,
    /// Emitted, simplified features
    pub features: Vec<TileFeature>,
    /// Projected features reaching this cell, retained only while the
    /// builder has not recursed through it; cleared when children are built
    pub source: Vec<ProjectedFeature>,
    /// Total input vertices seen by the factory
    pub num_points: u32,
    /// Vertices surviving simplification
    pub num_simplified: u32,
    /// Features emitted
    pub num_features: u32,
    /// Bounding box minimum corner, normalized space
    pub min: ProjectedPoint,
    /// Bounding box maximum corner, normalized space
    pub max: ProjectedPoint,
    /// Whether geometry has been quantized to tile space
    pub transformed: bool,
}

impl Tile {
    /// Create an empty tile at the given coordinates.
    ///
    /// `z2` is 2^z for addressable zooms; sentinel tiles for out-of-range
    /// requests carry 0 instead, which nothing downstream reads.
    pub fn empty(z: u8, x: u32, y: u32) -> Self {
        Self {
            z,
            x,
            y,
            z2: 1u32.checked_shl(u32::from(z)).unwrap_or(0),
            features: Vec::new(),
            source: Vec::new(),
            num_points: 0,
            num_simplified: 0,
            num_features: 0,
            min: ProjectedPoint::new(f64::INFINITY, f64::INFINITY, 0.0),
            max: ProjectedPoint::new(f64::NEG_INFINITY, f64::NEG_INFINITY, 0.0),
            transformed: false,
        }
    }

    /// Returns true if the tile emitted no features.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
