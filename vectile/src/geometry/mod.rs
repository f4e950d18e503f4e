//! Projected geometry model
//!
//! Typed variant tree of projected features. Coordinates are normalized to
//! the unit square [0,1]x[0,1] by an upstream projector; each point carries a
//! third channel `z` holding its simplification importance. Containers keep
//! their bounding box current on every insertion so that clipping can accept
//! or reject whole features without walking their geometry.

mod types;


pub use types::{
    FeatureKind, ProjectedFeature, ProjectedGeometry, ProjectedGeometryContainer, ProjectedPoint,
    Properties,
};
