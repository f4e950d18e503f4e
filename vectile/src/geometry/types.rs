//! Projected geometry type definitions

/// Opaque per-feature attributes, carried through slicing untouched.
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// A point in normalized projected space.
///
/// `x` and `y` lie in [0,1] for input geometry and may move slightly outside
/// after buffered clipping. `z` is the simplification importance of the
/// vertex in squared-distance units: 0 for an unscored vertex, 1 for
/// endpoints and clip intersections (the maximum for unit-space deviations),
/// and the squared perpendicular deviation for scored interior vertices.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProjectedPoint {
    /// Normalized X coordinate
    pub x: f64,
    /// Normalized Y coordinate
    pub y: f64,
    /// Simplification importance
    pub z: f64,
}

impl ProjectedPoint {
    /// Create a new projected point.
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// One element of a geometry container: a vertex or a nested container.
///
/// The single recursive arm expresses lines (containers of points), polygons
/// (containers of rings), and arbitrary collections of either.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectedGeometry {
    /// A single vertex
    Point(ProjectedPoint),
    /// A nested sequence of geometry
    Container(ProjectedGeometryContainer),
}

/// Ordered sequence of projected geometry with an eagerly maintained
/// bounding box.
///
/// The bounding box is updated on every [`push`](Self::push), so it is valid
/// at all times and never recomputed by consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedGeometryContainer {
    /// Member geometry in insertion order
    pub members: Vec<ProjectedGeometry>,
    /// Bounding box minimum corner
    pub min: ProjectedPoint,
    /// Bounding box maximum corner
    pub max: ProjectedPoint,
}

impl Default for ProjectedGeometryContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectedGeometryContainer {
    /// Create an empty container.
    ///
    /// The bounding box starts inverted (min = +inf, max = -inf) so that the
    /// first insertion establishes it.
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
            min: ProjectedPoint::new(f64::INFINITY, f64::INFINITY, 0.0),
            max: ProjectedPoint::new(f64::NEG_INFINITY, f64::NEG_INFINITY, 0.0),
        }
    }

    /// Create a container from existing members, computing the bounding box.
    pub fn from_members(members: Vec<ProjectedGeometry>) -> Self {
        let mut container = Self::new();
        for member in members {
            container.push(member);
        }
        container
    }

    /// Append a member, extending the bounding box.
    pub fn push(&mut self, member: ProjectedGeometry) {
        match &member {
            ProjectedGeometry::Point(p) => self.extend(p.x, p.y, p.x, p.y),
            ProjectedGeometry::Container(c) => {
                if !c.members.is_empty() {
                    self.extend(c.min.x, c.min.y, c.max.x, c.max.y);
                }
            }
        }
        self.members.push(member);
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the container has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn extend(&mut self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) {
        self.min.x = self.min.x.min(min_x);
        self.min.y = self.min.y.min(min_y);
        self.max.x = self.max.x.max(max_x);
        self.max.y = self.max.y.max(max_y);
    }
}

/// Geometry kind of a feature.
///
/// Multi- variants share the kind of their base geometry; they are
/// represented by a feature whose top-level container holds multiple
/// sub-containers (or multiple points, for multi-points).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    /// Point or multi-point: container members are points
    Point,
    /// Line string or multi-line-string: container members are lines
    LineString,
    /// Polygon or multi-polygon: container members are rings
    Polygon,
}

/// A projected feature ready for slicing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedFeature {
    /// Geometry kind
    pub kind: FeatureKind,
    /// Top-level geometry container
    pub geometry: ProjectedGeometryContainer,
    /// Opaque attributes
    pub properties: Properties,
    /// Bounding box minimum corner
    pub min: ProjectedPoint,
    /// Bounding box maximum corner
    pub max: ProjectedPoint,
    /// Largest squared tolerance at which this feature still contributes
    /// geometry; tiles whose tolerance exceeds it skip the feature entirely.
    pub min_tolerance: f64,
}

impl ProjectedFeature {
    /// Create a feature, taking the bounding box from its geometry.
    pub fn new(
        kind: FeatureKind,
        geometry: ProjectedGeometryContainer,
        properties: Properties,
        min_tolerance: f64,
    ) -> Self {
        let min = geometry.min;
        let max = geometry.max;
        Self {
            kind,
            geometry,
            properties,
            min,
            max,
            min_tolerance,
        }
    }
}
