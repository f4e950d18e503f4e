//! Axis-aligned half-plane clipper
//!
//! Clips a feature set against the slab `k1 <= coord * scale <= k2` along
//! one axis. Each feature is fully kept when its bounding box lies inside
//! the slab, fully dropped when it lies outside, and clipped piecewise
//! otherwise. Lines may split into several sub-lines; polygon rings are
//! stitched back into a single closed ring (Sutherland-Hodgman on one axis).
//!
//! The tile builder clips each parent twice per axis: one X pass produces a
//! left and a right vertical slab, and each slab is then cut by two Y passes
//! into the four buffered child quadrants, halving the boundary work
//! compared to clipping all four children from the parent directly.

use crate::geometry::{
    FeatureKind, ProjectedFeature, ProjectedGeometry, ProjectedGeometryContainer, ProjectedPoint,
};

/// Clipping axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Clip on X (vertical slab)
    X,
    /// Clip on Y (horizontal slab)
    Y,
}

impl Axis {
    #[inline]
    fn coord(self, p: &ProjectedPoint) -> f64 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
        }
    }
}

/// Computes the boundary point where segment `ab` crosses the clip value.
///
/// Callers only invoke this for segments whose endpoints straddle the
/// boundary, so the interpolation divisor is never zero.
pub type IntersectFn = fn(&ProjectedPoint, &ProjectedPoint, f64) -> ProjectedPoint;

/// Intersection of segment `ab` with the vertical line at `x`.
///
/// The returned point carries importance 1 so clip-introduced vertices
/// survive simplification thresholds.
#[inline]
pub fn intersect_x(a: &ProjectedPoint, b: &ProjectedPoint, x: f64) -> ProjectedPoint {
    let y = (x - a.x) * (b.y - a.y) / (b.x - a.x) + a.y;
    ProjectedPoint::new(x, y, 1.0)
}

/// Intersection of segment `ab` with the horizontal line at `y`.
#[inline]
pub fn intersect_y(a: &ProjectedPoint, b: &ProjectedPoint, y: f64) -> ProjectedPoint {
    let x = (y - a.y) * (b.x - a.x) / (b.y - a.y) + a.x;
    ProjectedPoint::new(x, y, 1.0)
}

/// Clip `features` to the slab `k1 <= coord * scale <= k2` along `axis`.
///
/// `min_all`/`max_all` are the bounding box of the whole feature set along
/// `axis` in normalized units, letting the clipper accept or reject the
/// entire set without touching any feature.
#[allow(clippy::too_many_arguments)]
pub fn clip(
    features: &[ProjectedFeature],
    scale: f64,
    k1: f64,
    k2: f64,
    axis: Axis,
    intersect: IntersectFn,
    min_all: f64,
    max_all: f64,
) -> Vec<ProjectedFeature> {
    let k1 = k1 / scale;
    let k2 = k2 / scale;

    if min_all >= k1 && max_all < k2 {
        return features.to_vec();
    }
    if min_all > k2 || max_all < k1 {
        return Vec::new();
    }

    let mut clipped = Vec::new();

    for feature in features {
        let min = axis.coord(&feature.min);
        let max = axis.coord(&feature.max);

        if min >= k1 && max < k2 {
            clipped.push(feature.clone());
            continue;
        }
        if min > k2 || max < k1 {
            continue;
        }

        let slices = match feature.kind {
            FeatureKind::Point => clip_points(&feature.geometry, k1, k2, axis),
            kind => clip_geometry(
                &feature.geometry,
                k1,
                k2,
                axis,
                intersect,
                kind == FeatureKind::Polygon,
            ),
        };

        if !slices.is_empty() {
            clipped.push(ProjectedFeature::new(
                feature.kind,
                ProjectedGeometryContainer::from_members(slices),
                feature.properties.clone(),
                feature.min_tolerance,
            ));
        }
    }

    clipped
}

/// Keep the points whose axis coordinate falls inside [k1, k2].
fn clip_points(
    geometry: &ProjectedGeometryContainer,
    k1: f64,
    k2: f64,
    axis: Axis,
) -> Vec<ProjectedGeometry> {
    let mut slice = Vec::new();

    for member in &geometry.members {
        if let ProjectedGeometry::Point(p) = member {
            let ak = axis.coord(p);
            if ak >= k1 && ak <= k2 {
                slice.push(ProjectedGeometry::Point(*p));
            }
        }
    }

    slice
}

/// Clip every line/ring of `geometry` against [k1, k2].
fn clip_geometry(
    geometry: &ProjectedGeometryContainer,
    k1: f64,
    k2: f64,
    axis: Axis,
    intersect: IntersectFn,
    closed: bool,
) -> Vec<ProjectedGeometry> {
    let mut slices = Vec::new();

    for member in &geometry.members {
        let ring = match member {
            ProjectedGeometry::Container(c) => c,
            ProjectedGeometry::Point(_) => continue,
        };

        let points: Vec<ProjectedPoint> = ring
            .members
            .iter()
            .filter_map(|m| match m {
                ProjectedGeometry::Point(p) => Some(*p),
                ProjectedGeometry::Container(_) => None,
            })
            .collect();

        if points.is_empty() {
            continue;
        }

        let mut slice: Vec<ProjectedPoint> = Vec::new();
        let len = points.len();

        for j in 0..len.saturating_sub(1) {
            let a = &points[j];
            let b = &points[j + 1];
            let ak = axis.coord(a);
            let bk = axis.coord(b);

            if ak < k1 {
                if bk > k2 {
                    // ---|-----|-->
                    slice.push(intersect(a, b, k1));
                    slice.push(intersect(a, b, k2));
                    if !closed {
                        flush_slice(&mut slices, &mut slice, closed);
                    }
                } else if bk >= k1 {
                    // ---|-->  |
                    slice.push(intersect(a, b, k1));
                }
            } else if ak > k2 {
                if bk < k1 {
                    // <--|-----|---
                    slice.push(intersect(a, b, k2));
                    slice.push(intersect(a, b, k1));
                    if !closed {
                        flush_slice(&mut slices, &mut slice, closed);
                    }
                } else if bk <= k2 {
                    // |  <--|---
                    slice.push(intersect(a, b, k2));
                }
            } else {
                slice.push(*a);
                if bk < k1 {
                    // <--|---  |
                    slice.push(intersect(a, b, k1));
                    if !closed {
                        flush_slice(&mut slices, &mut slice, closed);
                    }
                } else if bk > k2 {
                    // |  ---|-->
                    slice.push(intersect(a, b, k2));
                    if !closed {
                        flush_slice(&mut slices, &mut slice, closed);
                    }
                }
                // else: | --> | stays in the current slice
            }
        }

        // the last point, if inside
        let a = &points[len - 1];
        let ak = axis.coord(a);
        if ak >= k1 && ak <= k2 {
            slice.push(*a);
        }

        // re-close the ring if clipping separated its endpoints
        if closed {
            if let Some(&first) = slice.first() {
                let last = slice[slice.len() - 1];
                if first.x != last.x || first.y != last.y {
                    slice.push(first);
                }
            }
        }

        flush_slice(&mut slices, &mut slice, closed);
    }

    slices
}

/// Move the accumulated slice into `slices` and reset it.
///
/// Rings reduced below four points by clipping are degenerate and dropped.
fn flush_slice(slices: &mut Vec<ProjectedGeometry>, slice: &mut Vec<ProjectedPoint>, closed: bool) {
    if closed && slice.len() < 4 {
        slice.clear();
        return;
    }

    if !slice.is_empty() {
        if closed {
            let first = slice[0];
            let last = slice[slice.len() - 1];
            debug_assert!(
                first.x == last.x && first.y == last.y,
                "clipped ring must close"
            );
        }
        let members = std::mem::take(slice)
            .into_iter()
            .map(ProjectedGeometry::Point)
            .collect();
        slices.push(ProjectedGeometry::Container(
            ProjectedGeometryContainer::from_members(members),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Properties;

    fn line_feature(coords: &[(f64, f64)]) -> ProjectedFeature {
        let points: Vec<ProjectedGeometry> = coords
            .iter()
            .map(|&(x, y)| ProjectedGeometry::Point(ProjectedPoint::new(x, y, 0.0)))
            .collect();
        let line = ProjectedGeometryContainer::from_members(points);
        let geometry =
            ProjectedGeometryContainer::from_members(vec![ProjectedGeometry::Container(line)]);
        ProjectedFeature::new(FeatureKind::LineString, geometry, Properties::new(), 1.0)
    }

    fn ring_feature(coords: &[(f64, f64)]) -> ProjectedFeature {
        let mut feature = line_feature(coords);
        feature.kind = FeatureKind::Polygon;
        feature
    }

    fn points_feature(coords: &[(f64, f64)]) -> ProjectedFeature {
        let points: Vec<ProjectedGeometry> = coords
            .iter()
            .map(|&(x, y)| ProjectedGeometry::Point(ProjectedPoint::new(x, y, 0.0)))
            .collect();
        let geometry = ProjectedGeometryContainer::from_members(points);
        ProjectedFeature::new(FeatureKind::Point, geometry, Properties::new(), 1.0)
    }

    fn ring_coords(feature: &ProjectedFeature, ring_index: usize) -> Vec<(f64, f64)> {
        match &feature.geometry.members[ring_index] {
            ProjectedGeometry::Container(ring) => ring
                .members
                .iter()
                .map(|m| match m {
                    ProjectedGeometry::Point(p) => (p.x, p.y),
                    _ => panic!("nested container in ring"),
                })
                .collect(),
            _ => panic!("expected ring"),
        }
    }

    #[test]
    fn test_intersect_x_lies_on_boundary_and_segment() {
        let a = ProjectedPoint::new(0.2, 0.2, 0.0);
        let b = ProjectedPoint::new(0.8, 0.8, 0.0);
        let p = intersect_x(&a, &b, 0.5);

        assert_eq!(p.x, 0.5);
        assert!((p.y - 0.5).abs() < 1e-12);
        assert_eq!(p.z, 1.0);
    }

    #[test]
    fn test_intersect_y_mirrors_intersect_x() {
        let a = ProjectedPoint::new(0.1, 0.0, 0.0);
        let b = ProjectedPoint::new(0.5, 1.0, 0.0);
        let p = intersect_y(&a, &b, 0.5);

        assert_eq!(p.y, 0.5);
        assert!((p.x - 0.3).abs() < 1e-12);
        assert_eq!(p.z, 1.0);
    }

    #[test]
    fn test_whole_set_trivial_accept_returns_input() {
        let features = vec![line_feature(&[(0.2, 0.2), (0.4, 0.4)])];
        let clipped = clip(&features, 1.0, 0.0, 0.5, Axis::X, intersect_x, 0.2, 0.4);

        assert_eq!(clipped, features);
    }

    #[test]
    fn test_whole_set_trivial_reject_returns_empty() {
        let features = vec![line_feature(&[(0.8, 0.8), (0.9, 0.9)])];
        let clipped = clip(&features, 1.0, 0.0, 0.5, Axis::X, intersect_x, 0.8, 0.9);

        assert!(clipped.is_empty());
    }

    #[test]
    fn test_points_kept_only_inside_slab() {
        let features = vec![points_feature(&[(0.1, 0.5), (0.5, 0.5), (0.9, 0.5)])];
        let clipped = clip(&features, 1.0, 0.0, 0.5, Axis::X, intersect_x, 0.1, 0.9);

        assert_eq!(clipped.len(), 1);
        assert_eq!(clipped[0].geometry.len(), 2);
    }

    #[test]
    fn test_line_crossing_boundary_gains_intersection() {
        let features = vec![line_feature(&[(0.1, 0.1), (0.9, 0.9)])];
        let clipped = clip(&features, 1.0, 0.0, 0.5, Axis::X, intersect_x, 0.1, 0.9);

        assert_eq!(clipped.len(), 1);
        let coords = ring_coords(&clipped[0], 0);
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[0], (0.1, 0.1));
        assert_eq!(coords[1].0, 0.5);
        assert!((coords[1].1 - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_line_spanning_slab_gains_two_intersections() {
        // Both endpoints outside, segment passes through the slab.
        let features = vec![line_feature(&[(0.0, 0.0), (1.0, 1.0)])];
        let clipped = clip(&features, 1.0, 0.25, 0.75, Axis::X, intersect_x, 0.0, 1.0);

        assert_eq!(clipped.len(), 1);
        let coords = ring_coords(&clipped[0], 0);
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[0], (0.25, 0.25));
        assert_eq!(coords[1], (0.75, 0.75));
    }

    #[test]
    fn test_line_leaving_and_returning_splits_into_sub_lines() {
        // Dips out of the slab and comes back: two sub-lines.
        let features = vec![line_feature(&[
            (0.1, 0.1),
            (0.7, 0.1),
            (0.7, 0.4),
            (0.1, 0.4),
        ])];
        let clipped = clip(&features, 1.0, 0.0, 0.5, Axis::X, intersect_x, 0.1, 0.7);

        assert_eq!(clipped.len(), 1);
        assert_eq!(clipped[0].geometry.len(), 2);

        let first = ring_coords(&clipped[0], 0);
        let second = ring_coords(&clipped[0], 1);
        assert_eq!(*first.last().unwrap(), (0.5, 0.1));
        assert_eq!(second[0], (0.5, 0.4));
    }

    #[test]
    fn test_clipped_ring_is_closed() {
        let features = vec![ring_feature(&[
            (0.2, 0.2),
            (0.8, 0.2),
            (0.8, 0.8),
            (0.2, 0.8),
            (0.2, 0.2),
        ])];
        let clipped = clip(&features, 1.0, 0.0, 0.5, Axis::X, intersect_x, 0.2, 0.8);

        assert_eq!(clipped.len(), 1);
        assert_eq!(clipped[0].geometry.len(), 1);

        let coords = ring_coords(&clipped[0], 0);
        assert!(coords.len() >= 4);
        assert_eq!(coords.first(), coords.last());
        for &(x, _) in &coords {
            assert!(x <= 0.5 + 1e-12);
        }
    }

    #[test]
    fn test_ring_collapsing_below_four_points_is_dropped() {
        // Only one vertex touches the slab boundary; the clipped ring
        // degenerates to three coincident points and is discarded.
        let features = vec![ring_feature(&[
            (0.9, 0.3),
            (0.5, 0.5),
            (0.9, 0.7),
            (0.9, 0.3),
        ])];
        let clipped = clip(&features, 1.0, 0.0, 0.5, Axis::X, intersect_x, 0.5, 0.9);

        assert!(clipped.is_empty());
    }

    #[test]
    fn test_clipped_feature_bbox_tracks_clipped_geometry() {
        let features = vec![line_feature(&[(0.1, 0.1), (0.9, 0.9)])];
        let clipped = clip(&features, 1.0, 0.0, 0.5, Axis::X, intersect_x, 0.1, 0.9);

        assert_eq!(clipped[0].min.x, 0.1);
        assert_eq!(clipped[0].max.x, 0.5);
    }

    #[test]
    fn test_clipping_is_idempotent() {
        let features = vec![
            line_feature(&[(0.1, 0.1), (0.9, 0.9)]),
            ring_feature(&[(0.2, 0.2), (0.8, 0.2), (0.8, 0.8), (0.2, 0.8), (0.2, 0.2)]),
        ];
        let once = clip(&features, 1.0, 0.0, 0.5, Axis::X, intersect_x, 0.1, 0.9);
        let twice = clip(&once, 1.0, 0.0, 0.5, Axis::X, intersect_x, 0.1, 0.9);

        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(ring_coords(a, 0), ring_coords(b, 0));
        }
    }

    #[test]
    fn test_scale_divides_slab_bounds() {
        // At scale 2 the slab [0,1] covers normalized [0,0.5].
        let features = vec![points_feature(&[(0.25, 0.5), (0.75, 0.5)])];
        let clipped = clip(&features, 2.0, 0.0, 1.0, Axis::X, intersect_x, 0.25, 0.75);

        assert_eq!(clipped.len(), 1);
        assert_eq!(clipped[0].geometry.len(), 1);
    }

    #[test]
    fn test_y_axis_clip_uses_y_coordinate() {
        let features = vec![line_feature(&[(0.5, 0.1), (0.5, 0.9)])];
        let clipped = clip(&features, 1.0, 0.0, 0.5, Axis::Y, intersect_y, 0.1, 0.9);

        assert_eq!(clipped.len(), 1);
        let coords = ring_coords(&clipped[0], 0);
        assert_eq!(*coords.last().unwrap(), (0.5, 0.5));
    }

    #[test]
    fn test_properties_survive_clipping() {
        let mut feature = line_feature(&[(0.1, 0.1), (0.9, 0.9)]);
        feature
            .properties
            .insert("name".to_string(), serde_json::json!("diagonal"));

        let clipped = clip(&[feature], 1.0, 0.0, 0.5, Axis::X, intersect_x, 0.1, 0.9);
        assert_eq!(
            clipped[0].properties.get("name"),
            Some(&serde_json::json!("diagonal"))
        );
    }
}
