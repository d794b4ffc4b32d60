//! Reusable search working memory.
//!
//! A [`ScratchPool`] hands out [`PooledScratch`] guards. The guard derefs to a
//! cleared [`SearchScratch`] and puts the instance back when dropped, so a
//! search releases its scratch on every exit path.

use std::ops::{Deref, DerefMut};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::grid::GridCoord;

/// Per-search cost bookkeeping for one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScratchRecord {
    pub g: f32,
    pub h: f32,
    pub f: f32,
    pub parent: Option<GridCoord>,
}

impl ScratchRecord {
    pub fn new(g: f32, h: f32, parent: Option<GridCoord>) -> Self {
        ScratchRecord {
            g,
            h,
            f: g + h,
            parent,
        }
    }

    pub fn set_g(&mut self, g: f32, parent: Option<GridCoord>) {
        self.g = g;
        self.f = self.g + self.h;
        self.parent = parent;
    }
}

impl Default for ScratchRecord {
    fn default() -> Self {
        ScratchRecord::new(f32::INFINITY, 0.0, None)
    }
}

#[derive(Debug, Default)]
pub struct SearchScratch {
    /// Frontier, scanned linearly for the lowest f.
    pub open: Vec<GridCoord>,
    pub closed: FxHashSet<GridCoord>,
    /// Nodes without a record have g = infinity and no parent.
    pub records: FxHashMap<GridCoord, ScratchRecord>,
    pub path: Vec<GridCoord>,
}

impl SearchScratch {
    pub fn with_path_capacity(max_path_length: usize) -> Self {
        SearchScratch {
            path: Vec::with_capacity(max_path_length),
            ..SearchScratch::default()
        }
    }

    pub fn clear(&mut self) {
        self.open.clear();
        self.closed.clear();
        self.records.clear();
        self.path.clear();
    }

    pub fn is_clear(&self) -> bool {
        self.open.is_empty()
            && self.closed.is_empty()
            && self.records.is_empty()
            && self.path.is_empty()
    }

    pub fn record(&self, coord: GridCoord) -> Option<&ScratchRecord> {
        self.records.get(&coord)
    }

    pub fn g(&self, coord: GridCoord) -> f32 {
        self.records.get(&coord).map_or(f32::INFINITY, |r| r.g)
    }
}

/// Grow-only pool of scratch instances.
#[derive(Debug)]
pub struct ScratchPool {
    free: Vec<SearchScratch>,
    created: usize,
    max_path_length: usize,
}

impl ScratchPool {
    pub fn new(prewarm: usize, max_path_length: usize) -> Self {
        let free = (0..prewarm)
            .map(|_| SearchScratch::with_path_capacity(max_path_length))
            .collect();
        ScratchPool {
            free,
            created: prewarm,
            max_path_length,
        }
    }

    /// Checks out a cleared instance, building a new one if none are free.
    pub fn acquire(&mut self) -> PooledScratch<'_> {
        let scratch = match self.free.pop() {
            Some(mut scratch) => {
                scratch.clear();
                scratch
            }
            None => {
                self.created += 1;
                SearchScratch::with_path_capacity(self.max_path_length)
            }
        };
        PooledScratch {
            pool: self,
            scratch,
        }
    }

    fn release(&mut self, scratch: SearchScratch) {
        self.free.push(scratch);
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Instances ever created; the pool never holds more than this.
    pub fn high_water_mark(&self) -> usize {
        self.created
    }
}

/// Scoped checkout from a [`ScratchPool`].
pub struct PooledScratch<'a> {
    pool: &'a mut ScratchPool,
    scratch: SearchScratch,
}

impl Deref for PooledScratch<'_> {
    type Target = SearchScratch;

    fn deref(&self) -> &SearchScratch {
        &self.scratch
    }
}

impl DerefMut for PooledScratch<'_> {
    fn deref_mut(&mut self) -> &mut SearchScratch {
        &mut self.scratch
    }
}

impl Drop for PooledScratch<'_> {
    fn drop(&mut self) {
        // An empty SearchScratch owns no allocations.
        let scratch = std::mem::take(&mut self.scratch);
        self.pool.release(scratch);
    }
}
