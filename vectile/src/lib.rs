//! Vectile - in-memory vector tile slicing
//!
//! This library pre-slices large collections of projected geographic features
//! into a pyramid of square vector tiles addressed by (zoom, x, y), entirely
//! in memory. Tiles are clipped with a configurable pixel buffer, simplified
//! with a tolerance that shrinks with zoom, and materialized lazily: querying
//! a tile that was not built eagerly drills down from its nearest stored
//! ancestor.
//!
//! # High-Level API
//!
//! ```
//! use vectile::config::TileOptions;
//! use vectile::convert::FeatureConverter;
//! use vectile::pyramid::TilePyramid;
//!
//! let options = TileOptions::default();
//! let converter = FeatureConverter::new(options.max_zoom, options.tolerance, options.extent);
//!
//! // Coordinates arrive already projected to the unit square.
//! let features = vec![converter.point(0.5, 0.5, Default::default())];
//!
//! let pyramid = TilePyramid::new(features, options).unwrap();
//! let tile = pyramid.get_tile(0, 0, 0);
//! assert_eq!(tile.num_features, 1);
//! ```

pub mod clip;
pub mod config;
pub mod convert;
pub mod diag;
pub mod geometry;
pub mod pyramid;
pub mod simplify;
pub mod tile;

/// Version of the vectile library.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
