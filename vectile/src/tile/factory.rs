//! Tile factory
//!
//! Builds a [`Tile`] from the projected features reaching a cell. Emission
//! keeps a vertex when its stamped importance exceeds the squared tolerance
//! for the zoom, or unconditionally at max zoom; features whose recorded
//! `min_tolerance` is below the threshold are skipped outright.

use crate::geometry::{FeatureKind, ProjectedFeature, ProjectedGeometry, ProjectedGeometryContainer};
use crate::tile::types::{Tile, TileFeature};

/// Build the tile at `(z, x, y)` from `features`.
///
/// `tolerance` is the linear simplification threshold for this zoom
/// (0 at max zoom); `is_max_zoom` disables thinning entirely so the deepest
/// tiles keep full vertex fidelity.
pub fn create_tile(
    features: &[ProjectedFeature],
    z: u8,
    x: u32,
    y: u32,
    tolerance: f64,
    is_max_zoom: bool,
) -> Tile {
    let mut tile = Tile::empty(z, x, y);

    for feature in features {
        tile.min.x = tile.min.x.min(feature.min.x);
        tile.min.y = tile.min.y.min(feature.min.y);
        tile.max.x = tile.max.x.max(feature.max.x);
        tile.max.y = tile.max.y.max(feature.max.y);

        add_feature(&mut tile, feature, tolerance, is_max_zoom);
    }

    tile
}

fn add_feature(tile: &mut Tile, feature: &ProjectedFeature, tolerance: f64, is_max_zoom: bool) {
    let sq_tolerance = tolerance * tolerance;

    if !is_max_zoom && sq_tolerance > feature.min_tolerance {
        // every vertex of this feature thins out at this zoom
        return;
    }

    let mut geometry: Vec<ProjectedGeometry> = Vec::new();

    match feature.kind {
        FeatureKind::Point => {
            for member in &feature.geometry.members {
                if let ProjectedGeometry::Point(p) = member {
                    geometry.push(ProjectedGeometry::Point(*p));
                    tile.num_points += 1;
                    tile.num_simplified += 1;
                }
            }
        }
        FeatureKind::LineString | FeatureKind::Polygon => {
            for member in &feature.geometry.members {
                let ring = match member {
                    ProjectedGeometry::Container(c) => c,
                    ProjectedGeometry::Point(_) => continue,
                };

                let mut simplified = ProjectedGeometryContainer::new();
                for point in &ring.members {
                    if let ProjectedGeometry::Point(p) = point {
                        tile.num_points += 1;
                        if is_max_zoom || p.z > sq_tolerance {
                            simplified.push(ProjectedGeometry::Point(*p));
                            tile.num_simplified += 1;
                        }
                    }
                }

                // thinning can drop a ring's seam vertex; re-close so rings
                // always end where they start
                if feature.kind == FeatureKind::Polygon {
                    reclose_ring(&mut simplified);
                }

                if !simplified.is_empty() {
                    geometry.push(ProjectedGeometry::Container(simplified));
                }
            }
        }
    }

    if !geometry.is_empty() {
        tile.features.push(TileFeature {
            kind: feature.kind,
            geometry,
            tile_geometry: Vec::new(),
            properties: feature.properties.clone(),
        });
        tile.num_features += 1;
    }
}

fn reclose_ring(ring: &mut ProjectedGeometryContainer) {
    let first = match ring.members.first() {
        Some(ProjectedGeometry::Point(p)) => *p,
        _ => return,
    };
    if let Some(ProjectedGeometry::Point(last)) = ring.members.last() {
        if first.x != last.x || first.y != last.y {
            ring.push(ProjectedGeometry::Point(first));
        }
    }
}

/// Returns true when the tile's only content is a single polygon ring whose
/// every vertex sits exactly on the buffered tile boundary.
///
/// Such a tile is entirely covered by one polygon; its subtree would repeat
/// the same square forever, so the builder prunes it. Vertices are checked
/// in tile space by projecting the normalized geometry through the tile's
/// own transform.
pub fn is_clipped_square(tile: &Tile, extent: u16, buffer: u16) -> bool {
    if tile.features.len() != 1 {
        return false;
    }

    let feature = &tile.features[0];
    if feature.kind != FeatureKind::Polygon || feature.geometry.len() > 1 {
        return false;
    }

    let ring = match feature.geometry.first() {
        Some(ProjectedGeometry::Container(c)) => c,
        _ => return false,
    };

    let lo = -f64::from(buffer);
    let hi = f64::from(extent) + f64::from(buffer);
    let z2 = f64::from(tile.z2);
    let tx = f64::from(tile.x);
    let ty = f64::from(tile.y);

    for member in &ring.members {
        let p = match member {
            ProjectedGeometry::Point(p) => p,
            ProjectedGeometry::Container(_) => return false,
        };
        let sx = (f64::from(extent) * (p.x * z2 - tx)).round();
        let sy = (f64::from(extent) * (p.y * z2 - ty)).round();
        if (sx != lo && sx != hi) || (sy != lo && sy != hi) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ProjectedPoint, Properties};

    fn point_feature(x: f64, y: f64) -> ProjectedFeature {
        let geometry = ProjectedGeometryContainer::from_members(vec![ProjectedGeometry::Point(
            ProjectedPoint::new(x, y, 0.0),
        )]);
        ProjectedFeature::new(FeatureKind::Point, geometry, Properties::new(), 1.0)
    }

    fn line_feature(points: Vec<ProjectedPoint>) -> ProjectedFeature {
        let members = points.into_iter().map(ProjectedGeometry::Point).collect();
        let line = ProjectedGeometryContainer::from_members(members);
        let geometry =
            ProjectedGeometryContainer::from_members(vec![ProjectedGeometry::Container(line)]);
        ProjectedFeature::new(FeatureKind::LineString, geometry, Properties::new(), 1.0)
    }

    fn ring_feature(points: Vec<ProjectedPoint>) -> ProjectedFeature {
        let mut feature = line_feature(points);
        feature.kind = FeatureKind::Polygon;
        feature
    }

    #[test]
    fn test_point_feature_is_emitted_verbatim() {
        let tile = create_tile(&[point_feature(0.5, 0.5)], 0, 0, 0, 0.001, false);

        assert_eq!(tile.num_features, 1);
        assert_eq!(tile.num_points, 1);
        assert_eq!(tile.num_simplified, 1);
        assert_eq!(tile.features.len(), 1);
    }

    #[test]
    fn test_unscored_interior_vertices_are_thinned() {
        // Endpoints stamped 1, interior left at 0: only endpoints emit.
        let points = vec![
            ProjectedPoint::new(0.1, 0.5, 1.0),
            ProjectedPoint::new(0.5, 0.5, 0.0),
            ProjectedPoint::new(0.9, 0.5, 1.0),
        ];
        let tile = create_tile(&[line_feature(points)], 0, 0, 0, 0.001, false);

        assert_eq!(tile.num_points, 3);
        assert_eq!(tile.num_simplified, 2);
    }

    #[test]
    fn test_max_zoom_keeps_every_vertex() {
        let points = vec![
            ProjectedPoint::new(0.1, 0.5, 1.0),
            ProjectedPoint::new(0.5, 0.5, 0.0),
            ProjectedPoint::new(0.9, 0.5, 1.0),
        ];
        let tile = create_tile(&[line_feature(points)], 14, 0, 0, 0.0, true);

        assert_eq!(tile.num_points, 3);
        assert_eq!(tile.num_simplified, 3);
    }

    #[test]
    fn test_feature_below_min_tolerance_is_skipped() {
        let mut feature = point_feature(0.5, 0.5);
        feature.min_tolerance = 1e-9;
        let tile = create_tile(&[feature], 0, 0, 0, 0.1, false);

        assert_eq!(tile.num_features, 0);
        assert!(tile.is_empty());
    }

    #[test]
    fn test_num_simplified_never_exceeds_num_points() {
        let points = vec![
            ProjectedPoint::new(0.1, 0.1, 1.0),
            ProjectedPoint::new(0.2, 0.3, 1e-9),
            ProjectedPoint::new(0.3, 0.1, 0.5),
            ProjectedPoint::new(0.9, 0.9, 1.0),
        ];
        let tile = create_tile(&[line_feature(points)], 2, 1, 1, 0.001, false);

        assert!(tile.num_simplified <= tile.num_points);
    }

    #[test]
    fn test_ring_is_reclosed_when_thinning_drops_the_seam() {
        // The shared first/last vertex is unscored and thins out; the two
        // scored corners remain and the ring is re-closed on the first one.
        let points = vec![
            ProjectedPoint::new(0.2, 0.2, 0.0),
            ProjectedPoint::new(0.8, 0.2, 1.0),
            ProjectedPoint::new(0.5, 0.8, 1.0),
            ProjectedPoint::new(0.2, 0.2, 0.0),
        ];
        let tile = create_tile(&[ring_feature(points)], 0, 0, 0, 0.001, false);

        let ring = match &tile.features[0].geometry[0] {
            ProjectedGeometry::Container(c) => c,
            other => panic!("expected ring, got {:?}", other),
        };
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.members.first(), ring.members.last());
    }

    #[test]
    fn test_tile_bbox_covers_all_features() {
        let tile = create_tile(
            &[point_feature(0.2, 0.8), point_feature(0.6, 0.1)],
            0,
            0,
            0,
            0.001,
            false,
        );

        assert_eq!(tile.min.x, 0.2);
        assert_eq!(tile.min.y, 0.1);
        assert_eq!(tile.max.x, 0.6);
        assert_eq!(tile.max.y, 0.8);
    }

    #[test]
    fn test_clipped_square_detected_on_buffered_boundary() {
        // Ring tracing the buffered boundary of tile (1, 0, 0) with
        // extent 4096 and buffer 64: normalized +/- 64/8192 around [0, 0.5].
        let b = 64.0 / 8192.0;
        let corners = vec![
            ProjectedPoint::new(-b, -b, 1.0),
            ProjectedPoint::new(0.5 + b, -b, 1.0),
            ProjectedPoint::new(0.5 + b, 0.5 + b, 1.0),
            ProjectedPoint::new(-b, 0.5 + b, 1.0),
            ProjectedPoint::new(-b, -b, 1.0),
        ];
        let tile = create_tile(&[ring_feature(corners)], 1, 0, 0, 0.0001, false);

        assert!(is_clipped_square(&tile, 4096, 64));
    }

    #[test]
    fn test_interior_square_is_not_clipped_square() {
        let corners = vec![
            ProjectedPoint::new(0.0, 0.0, 1.0),
            ProjectedPoint::new(1.0, 0.0, 1.0),
            ProjectedPoint::new(1.0, 1.0, 1.0),
            ProjectedPoint::new(0.0, 1.0, 1.0),
            ProjectedPoint::new(0.0, 0.0, 1.0),
        ];
        let tile = create_tile(&[ring_feature(corners)], 0, 0, 0, 0.0001, false);

        assert!(!is_clipped_square(&tile, 4096, 64));
    }

    #[test]
    fn test_multiple_features_are_never_a_clipped_square() {
        let b = 64.0 / 8192.0;
        let corners = vec![
            ProjectedPoint::new(-b, -b, 1.0),
            ProjectedPoint::new(0.5 + b, -b, 1.0),
            ProjectedPoint::new(0.5 + b, 0.5 + b, 1.0),
            ProjectedPoint::new(-b, 0.5 + b, 1.0),
            ProjectedPoint::new(-b, -b, 1.0),
        ];
        let tile = create_tile(
            &[ring_feature(corners), point_feature(0.1, 0.1)],
            1,
            0,
            0,
            0.0001,
            false,
        );

        assert!(!is_clipped_square(&tile, 4096, 64));
    }

    #[test]
    fn test_line_feature_is_never_a_clipped_square() {
        let b = 64.0 / 8192.0;
        let corners = vec![
            ProjectedPoint::new(-b, -b, 1.0),
            ProjectedPoint::new(0.5 + b, -b, 1.0),
            ProjectedPoint::new(0.5 + b, 0.5 + b, 1.0),
            ProjectedPoint::new(-b, 0.5 + b, 1.0),
            ProjectedPoint::new(-b, -b, 1.0),
        ];
        let tile = create_tile(&[line_feature(corners)], 1, 0, 0, 0.0001, false);

        assert!(!is_clipped_square(&tile, 4096, 64));
    }
}
