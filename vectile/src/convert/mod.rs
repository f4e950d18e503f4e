//! Feature preparation
//!
//! The bridge between an external parser/projector and the pyramid builder.
//! Coordinates arrive already projected to the unit square; this module
//! assembles them into [`ProjectedFeature`]s, closing open rings, stamping
//! simplification importances at the finest tolerance the pyramid will ever
//! need, and recording each feature's `min_tolerance`. Degenerate inputs
//! (lines under two points, rings under four after closing) are silently
//! dropped.

use crate::geometry::{
    FeatureKind, ProjectedFeature, ProjectedGeometry, ProjectedGeometryContainer, ProjectedPoint,
    Properties,
};
use crate::simplify::simplify;

/// Builds projected features for one pyramid configuration.
///
/// The simplification tolerance used for stamping is
/// `tolerance / (2^max_zoom * extent)`: the threshold of the deepest zoom,
/// so no tile ever needs finer scores than the ones recorded here.
#[derive(Debug, Clone, Copy)]
pub struct FeatureConverter {
    tolerance: f64,
}

impl FeatureConverter {
    /// Create a converter for a pyramid with the given depth and extent.
    pub fn new(max_zoom: u8, tolerance: f64, extent: u16) -> Self {
        let z2 = 2f64.powi(i32::from(max_zoom));
        Self {
            tolerance: tolerance / (z2 * f64::from(extent)),
        }
    }

    /// A single point feature.
    pub fn point(&self, x: f64, y: f64, properties: Properties) -> ProjectedFeature {
        self.points_feature(&[(x, y)], properties)
    }

    /// A multi-point feature.
    pub fn multi_point(&self, points: &[(f64, f64)], properties: Properties) -> ProjectedFeature {
        self.points_feature(points, properties)
    }

    /// A line string. `None` when fewer than two points remain.
    pub fn line_string(
        &self,
        points: &[(f64, f64)],
        properties: Properties,
    ) -> Option<ProjectedFeature> {
        let (line, importance) = self.prepare_line(points)?;
        let geometry =
            ProjectedGeometryContainer::from_members(vec![ProjectedGeometry::Container(line)]);
        Some(ProjectedFeature::new(
            FeatureKind::LineString,
            geometry,
            properties,
            importance,
        ))
    }

    /// A multi-line-string; degenerate member lines are dropped.
    pub fn multi_line_string(
        &self,
        lines: &[Vec<(f64, f64)>],
        properties: Properties,
    ) -> Option<ProjectedFeature> {
        let mut geometry = ProjectedGeometryContainer::new();
        let mut min_tolerance = 0.0_f64;

        for line in lines {
            if let Some((prepared, importance)) = self.prepare_line(line) {
                geometry.push(ProjectedGeometry::Container(prepared));
                min_tolerance = min_tolerance.max(importance);
            }
        }

        if geometry.is_empty() {
            return None;
        }
        Some(ProjectedFeature::new(
            FeatureKind::LineString,
            geometry,
            properties,
            min_tolerance,
        ))
    }

    /// A polygon given its rings (exterior first); open rings are closed,
    /// degenerate rings dropped.
    pub fn polygon(
        &self,
        rings: &[Vec<(f64, f64)>],
        properties: Properties,
    ) -> Option<ProjectedFeature> {
        self.rings_feature(rings.iter(), properties)
    }

    /// A multi-polygon. Rings of all member polygons share one top-level
    /// container; slicing treats every ring alike, so the grouping carries
    /// no information worth keeping.
    pub fn multi_polygon(
        &self,
        polygons: &[Vec<Vec<(f64, f64)>>],
        properties: Properties,
    ) -> Option<ProjectedFeature> {
        self.rings_feature(polygons.iter().flatten(), properties)
    }

    fn points_feature(&self, points: &[(f64, f64)], properties: Properties) -> ProjectedFeature {
        let members = points
            .iter()
            .map(|&(x, y)| ProjectedGeometry::Point(ProjectedPoint::new(x, y, 0.0)))
            .collect();
        ProjectedFeature::new(
            FeatureKind::Point,
            ProjectedGeometryContainer::from_members(members),
            properties,
            1.0,
        )
    }

    fn rings_feature<'a>(
        &self,
        rings: impl Iterator<Item = &'a Vec<(f64, f64)>>,
        properties: Properties,
    ) -> Option<ProjectedFeature> {
        let mut geometry = ProjectedGeometryContainer::new();
        let mut min_tolerance = 0.0_f64;

        for ring in rings {
            if let Some((prepared, importance)) = self.prepare_ring(ring) {
                geometry.push(ProjectedGeometry::Container(prepared));
                min_tolerance = min_tolerance.max(importance);
            }
        }

        if geometry.is_empty() {
            return None;
        }
        Some(ProjectedFeature::new(
            FeatureKind::Polygon,
            geometry,
            properties,
            min_tolerance,
        ))
    }

    fn prepare_line(&self, coords: &[(f64, f64)]) -> Option<(ProjectedGeometryContainer, f64)> {
        if coords.len() < 2 {
            return None;
        }
        let mut points: Vec<ProjectedPoint> = coords
            .iter()
            .map(|&(x, y)| ProjectedPoint::new(x, y, 0.0))
            .collect();
        let importance = simplify(&mut points, self.tolerance);
        Some((
            ProjectedGeometryContainer::from_members(
                points.into_iter().map(ProjectedGeometry::Point).collect(),
            ),
            importance,
        ))
    }

    fn prepare_ring(&self, coords: &[(f64, f64)]) -> Option<(ProjectedGeometryContainer, f64)> {
        let mut coords = coords.to_vec();
        if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
            if first != last {
                coords.push(first);
            }
        }
        if coords.len() < 4 {
            return None;
        }
        self.prepare_line(&coords)
    }
}
