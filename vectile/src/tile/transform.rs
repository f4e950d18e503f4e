//! Tile-space quantization
//!
//! Converts a tile's normalized geometry into signed 16-bit tile
//! coordinates. The transform runs at most once per tile, on first query;
//! before it, geometry is in normalized space, after it the quantized view
//! lives in each feature's `tile_geometry`.

use crate::geometry::{FeatureKind, ProjectedGeometry, ProjectedPoint};
use crate::tile::types::{Tile, TileGeometry, TilePoint, TileRing};

/// Quantize `tile`'s geometry to integer tile space, once.
///
/// Subsequent calls are no-ops; `transformed` marks completion.
pub fn transform_tile(tile: &mut Tile, extent: u16) {
    if tile.transformed {
        return;
    }

    let z2 = f64::from(tile.z2);
    let tx = f64::from(tile.x);
    let ty = f64::from(tile.y);

    for feature in &mut tile.features {
        match feature.kind {
            FeatureKind::Point => {
                for member in &feature.geometry {
                    if let ProjectedGeometry::Point(p) = member {
                        feature
                            .tile_geometry
                            .push(TileGeometry::Point(transform_point(p, extent, z2, tx, ty)));
                    }
                }
            }
            FeatureKind::LineString | FeatureKind::Polygon => {
                for member in &feature.geometry {
                    if let ProjectedGeometry::Container(run) = member {
                        let mut ring = TileRing::default();
                        for point in &run.members {
                            if let ProjectedGeometry::Point(p) = point {
                                ring.points.push(transform_point(p, extent, z2, tx, ty));
                            }
                        }
                        feature.tile_geometry.push(TileGeometry::Ring(ring));
                    }
                }
            }
        }
    }

    tile.transformed = true;
}

/// Project one normalized point into the tile's integer coordinate space.
///
/// Values outside the i16 range saturate; tile data stays within
/// +/- extent * (1 + buffer / extent) for inputs inside the unit square, so
/// saturation only guards pathological coordinates.
#[inline]
pub fn transform_point(p: &ProjectedPoint, extent: u16, z2: f64, tx: f64, ty: f64) -> TilePoint {
    let x = (f64::from(extent) * (p.x * z2 - tx)).round() as i16;
    let y = (f64::from(extent) * (p.y * z2 - ty)).round() as i16;
    TilePoint::new(x, y)
}
