//! Iterative tile splitter.
//!
//! Splits one parent cell into four buffered children until a stop
//! condition fires. The recursion runs on an explicit FIFO work queue so
//! native stack depth stays constant and each level's feature vectors move
//! (never copy) between queue entries; only one generation of features is
//! live in aggregate because a parent's `source` is dropped the moment its
//! children are enqueued.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use crate::clip::{clip, intersect_x, intersect_y, Axis};
use crate::config::TileOptions;
use crate::diag::{BuildStats, DiagSink};
use crate::geometry::ProjectedFeature;
use crate::pyramid::key::to_id;
use crate::tile::{create_tile, is_clipped_square, Tile};

/// Mutable pyramid state guarded by the accessor's mutex.
pub(super) struct Inner {
    /// Stored tiles keyed by packed (z, x, y)
    pub(super) tiles: HashMap<u64, Tile>,
    /// Accumulated build counters
    pub(super) stats: BuildStats,
}

/// One pending cell: the features reaching it, owned by move.
struct StackItem {
    features: Vec<ProjectedFeature>,
    z: u8,
    x: u32,
    y: u32,
}

/// Split `features` at `(z, x, y)` downwards.
///
/// With no `target` the builder is in index-ahead mode and recurses until it
/// reaches `index_max_zoom` or a cell simple enough to stop at. With a
/// target `(cz, cx, cy)` it drills towards that cell, following the
/// target's ancestor row and column and stopping at `cz` or `max_zoom`.
pub(super) fn split_tile(
    inner: &mut Inner,
    options: &TileOptions,
    sink: &dyn DiagSink,
    features: Vec<ProjectedFeature>,
    z: u8,
    x: u32,
    y: u32,
    target: Option<(u8, u32, u32)>,
) {
    let mut queue = VecDeque::new();
    queue.push_back(StackItem { features, z, x, y });

    while let Some(StackItem { features, z, x, y }) = queue.pop_front() {
        let z2 = 1u32 << z;
        let id = to_id(z, x, y);
        let is_max_zoom = z == options.max_zoom;
        let tile_tolerance = if is_max_zoom {
            0.0
        } else {
            options.tolerance / (f64::from(z2) * f64::from(options.extent))
        };

        let tile = match inner.tiles.entry(id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let timer = options.debug.then(Instant::now);

                let tile = create_tile(&features, z, x, y, tile_tolerance, is_max_zoom);
                inner.stats.record_tile(z);

                if options.debug {
                    sink.tile_created(
                        z,
                        x,
                        y,
                        tile.num_features,
                        tile.num_points,
                        tile.num_simplified,
                    );
                    if let Some(t0) = timer {
                        sink.activity("creation", t0.elapsed());
                    }
                }

                entry.insert(tile)
            }
        };

        let stop = if is_clipped_square(tile, options.extent, options.buffer) {
            // a fully covered cell repeats the same square all the way down
            true
        } else {
            match target {
                None => z == options.index_max_zoom || tile.num_points <= options.index_max_points,
                Some((cz, cx, cy)) => {
                    if is_max_zoom || z == cz {
                        true
                    } else {
                        // abandon cells on neither the target's ancestor
                        // column nor its ancestor row
                        let m = cz - z;
                        x != (cx >> m) && y != (cy >> m)
                    }
                }
            }
        };

        if stop {
            // keep the source so a later query can drill down from here
            tile.source = features;
            continue;
        }

        // recursing further: this cell no longer needs its source
        tile.source = Vec::new();
        let tile_min = tile.min;
        let tile_max = tile.max;

        let timer = options.debug.then(Instant::now);

        let k1 = 0.5 * f64::from(options.buffer) / f64::from(options.extent);
        let k2 = 0.5 - k1;
        let k3 = 0.5 + k1;
        let k4 = 1.0 + k1;

        let scale = f64::from(z2);
        let xf = f64::from(x);
        let yf = f64::from(y);

        let left = clip(
            &features,
            scale,
            xf - k1,
            xf + k3,
            Axis::X,
            intersect_x,
            tile_min.x,
            tile_max.x,
        );
        let right = clip(
            &features,
            scale,
            xf + k2,
            xf + k4,
            Axis::X,
            intersect_x,
            tile_min.x,
            tile_max.x,
        );

        let mut tl = Vec::new();
        let mut bl = Vec::new();
        let mut tr = Vec::new();
        let mut br = Vec::new();

        if !left.is_empty() {
            tl = clip(
                &left,
                scale,
                yf - k1,
                yf + k3,
                Axis::Y,
                intersect_y,
                tile_min.y,
                tile_max.y,
            );
            bl = clip(
                &left,
                scale,
                yf + k2,
                yf + k4,
                Axis::Y,
                intersect_y,
                tile_min.y,
                tile_max.y,
            );
        }

        if !right.is_empty() {
            tr = clip(
                &right,
                scale,
                yf - k1,
                yf + k3,
                Axis::Y,
                intersect_y,
                tile_min.y,
                tile_max.y,
            );
            br = clip(
                &right,
                scale,
                yf + k2,
                yf + k4,
                Axis::Y,
                intersect_y,
                tile_min.y,
                tile_max.y,
            );
        }

        if options.debug {
            if let Some(t0) = timer {
                sink.activity("clipping", t0.elapsed());
            }
        }

        if !tl.is_empty() {
            queue.push_back(StackItem { features: tl, z: z + 1, x: x * 2, y: y * 2 });
        }
        if !bl.is_empty() {
            queue.push_back(StackItem { features: bl, z: z + 1, x: x * 2, y: y * 2 + 1 });
        }
        if !tr.is_empty() {
            queue.push_back(StackItem { features: tr, z: z + 1, x: x * 2 + 1, y: y * 2 });
        }
        if !br.is_empty() {
            queue.push_back(StackItem { features: br, z: z + 1, x: x * 2 + 1, y: y * 2 + 1 });
        }
    }
}
