//! Tile pyramid
//!
//! [`TilePyramid`] owns the tile index: a single map from packed (z, x, y)
//! keys to tiles, guarded by one mutex. Construction slices the input
//! eagerly down to the configured index depth; [`TilePyramid::get_tile`]
//! serves queries, drilling down from the nearest stored ancestor when a
//! requested tile was not materialized ahead of time and quantizing each
//! tile's geometry to integer tile space on first observation.
//!
//! # Example
//!
//! ```
//! use vectile::config::TileOptions;
//! use vectile::convert::FeatureConverter;
//! use vectile::pyramid::TilePyramid;
//!
//! let options = TileOptions::default();
//! let converter = FeatureConverter::new(options.max_zoom, options.tolerance, options.extent);
//! let features = vec![converter.point(0.25, 0.75, Default::default())];
//!
//! let pyramid = TilePyramid::new(features, options).unwrap();
//! let tile = pyramid.get_tile(1, 0, 1);
//! assert_eq!(tile.num_features, 1);
//! assert!(tile.transformed);
//! ```

mod builder;
mod key;

pub use key::{from_id, to_id};

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::config::{OptionsError, TileOptions};
use crate::diag::{BuildStats, DiagSink, NoopSink, TracingSink};
use crate::geometry::ProjectedFeature;
use crate::tile::{is_clipped_square, transform_tile, Tile};

use builder::{split_tile, Inner};

/// An in-memory pyramid of vector tiles over one feature set.
///
/// Thread-safe: concurrent queries serialize on an internal mutex that also
/// covers any lazy drill-down, so every caller observes fully materialized,
/// transformed tiles.
pub struct TilePyramid {
    options: TileOptions,
    sink: Arc<dyn DiagSink>,
    inner: Mutex<Inner>,
}

impl TilePyramid {
    /// Build a pyramid from projected features.
    ///
    /// Tiles are generated eagerly down to `index_max_zoom`, stopping early
    /// on cells with at most `index_max_points` points. With `debug` set,
    /// diagnostics go to a [`TracingSink`].
    ///
    /// An empty feature list yields an empty pyramid whose root tile exists
    /// with zero features.
    pub fn new(
        features: Vec<ProjectedFeature>,
        options: TileOptions,
    ) -> Result<Self, OptionsError> {
        let sink: Arc<dyn DiagSink> = if options.debug {
            Arc::new(TracingSink::new())
        } else {
            Arc::new(NoopSink)
        };
        Self::with_sink(features, options, sink)
    }

    /// Build a pyramid routing diagnostics to a caller-provided sink.
    ///
    /// The sink only receives events when `options.debug` is set; either
    /// way tile contents are identical.
    pub fn with_sink(
        features: Vec<ProjectedFeature>,
        options: TileOptions,
        sink: Arc<dyn DiagSink>,
    ) -> Result<Self, OptionsError> {
        options.validate()?;

        let mut inner = Inner {
            tiles: HashMap::new(),
            stats: BuildStats::default(),
        };

        let timer = options.debug.then(Instant::now);
        split_tile(&mut inner, &options, sink.as_ref(), features, 0, 0, 0, None);

        if options.debug {
            if let Some(t0) = timer {
                sink.activity("generate tiles", t0.elapsed());
            }
            sink.build_complete(&inner.stats);
        }

        Ok(Self {
            options,
            sink,
            inner: Mutex::new(inner),
        })
    }

    /// Fetch the tile at `(z, x, y)`, materializing it if necessary.
    ///
    /// Returns a transformed snapshot. If the tile was not built eagerly,
    /// the call drills down from the nearest stored ancestor holding source
    /// geometry; when the ancestor is a clipped square the ancestor itself
    /// is returned, since every cell below it shows the same full square.
    /// Cells no feature reaches, and coordinates outside the valid range
    /// for this pyramid, yield an empty tile with the requested address.
    pub fn get_tile(&self, z: u8, x: u32, y: u32) -> Tile {
        if !self.coords_valid(z, x, y) {
            let mut tile = Tile::empty(z, x, y);
            tile.transformed = true;
            return tile;
        }

        let mut guard = self.inner.lock().expect("tile index lock poisoned");
        let inner = &mut *guard;

        let id = to_id(z, x, y);
        if let Some(tile) = inner.tiles.get_mut(&id) {
            transform_tile(tile, self.options.extent);
            return tile.clone();
        }

        if self.options.debug {
            self.sink.drill_down(z, x, y);
        }

        // walk up to the nearest stored ancestor; the root is guaranteed to
        // exist after construction
        let mut z0 = z;
        let mut x0 = x;
        let mut y0 = y;
        let mut parent_id = None;
        while parent_id.is_none() && z0 > 0 {
            z0 -= 1;
            x0 /= 2;
            y0 /= 2;
            let check = to_id(z0, x0, y0);
            if inner.tiles.contains_key(&check) {
                parent_id = Some(check);
            }
        }

        let mut drill = None;
        if let Some(pid) = parent_id {
            if let Some(parent) = inner.tiles.get_mut(&pid) {
                if !parent.source.is_empty() {
                    if is_clipped_square(parent, self.options.extent, self.options.buffer) {
                        transform_tile(parent, self.options.extent);
                        return parent.clone();
                    }
                    drill = Some(std::mem::take(&mut parent.source));
                }
            }
        }

        if let Some(source) = drill {
            inner.stats.record_drill_down();
            let timer = self.options.debug.then(Instant::now);

            split_tile(
                inner,
                &self.options,
                self.sink.as_ref(),
                source,
                z0,
                x0,
                y0,
                Some((z, x, y)),
            );

            if self.options.debug {
                if let Some(t0) = timer {
                    self.sink.activity("drilling down", t0.elapsed());
                }
            }
        }

        // either the drill produced the tile, or nothing reaches this cell
        // and a stored sentinel keeps repeated queries consistent
        let tile = inner.tiles.entry(id).or_insert_with(|| Tile::empty(z, x, y));
        transform_tile(tile, self.options.extent);
        tile.clone()
    }

    /// Snapshot of the accumulated build counters.
    pub fn stats(&self) -> BuildStats {
        self.inner
            .lock()
            .expect("tile index lock poisoned")
            .stats
            .clone()
    }

    /// Number of tiles currently stored in the index.
    pub fn tile_count(&self) -> usize {
        self.inner
            .lock()
            .expect("tile index lock poisoned")
            .tiles
            .len()
    }

    /// The options this pyramid was built with.
    pub fn options(&self) -> &TileOptions {
        &self.options
    }

    fn coords_valid(&self, z: u8, x: u32, y: u32) -> bool {
        z <= self.options.max_zoom
            && u64::from(x) < (1u64 << z)
            && u64::from(y) < (1u64 << z)
    }
}
