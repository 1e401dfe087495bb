//! Per-table caches keyed by the structural generation counter.
//!
//! A table bumps its generation whenever the grid topology changes
//! (decoration expansion, span resolution, rebuilding). Entries stamped with
//! an older generation are stale, so invalidation is a single integer
//! comparison.

use gridset_types::{Size, Track};

#[derive(Debug, Clone)]
struct AxisEntry {
    generation: u64,
    /// Whether spanning cells were taken into account.
    exact: bool,
    tracks: Vec<Track>,
}

/// Cached track positions for one axis.
#[derive(Debug, Clone, Default)]
pub(crate) struct AxisCache {
    entry: Option<AxisEntry>,
}

impl AxisCache {
    /// Whether the cached tracks can answer a request at `generation`.
    ///
    /// An exact result also satisfies a provisional request; a provisional
    /// result never satisfies an exact one.
    pub(crate) fn is_current(&self, generation: u64, exact: bool) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|e| e.generation == generation && (e.exact || !exact))
    }

    pub(crate) fn store(&mut self, generation: u64, exact: bool, tracks: Vec<Track>) {
        self.entry = Some(AxisEntry {
            generation,
            exact,
            tracks,
        });
    }

    pub(crate) fn tracks(&self) -> &[Track] {
        self.entry.as_ref().map(|e| e.tracks.as_slice()).unwrap_or(&[])
    }

    pub(crate) fn invalidate(&mut self) {
        self.entry = None;
    }
}

/// Intrinsic content sizes per grid slot, shared by both positioners.
#[derive(Debug, Clone, Default)]
pub(crate) struct MetricCache {
    generation: u64,
    sizes: Vec<Option<Size>>,
}

impl MetricCache {
    /// Drops every entry if the cache belongs to another generation.
    pub(crate) fn sync(&mut self, generation: u64, slots: usize) {
        if self.generation != generation || self.sizes.len() != slots {
            self.generation = generation;
            self.sizes.clear();
            self.sizes.resize(slots, None);
        }
    }

    pub(crate) fn get(&self, index: usize) -> Option<Size> {
        self.sizes.get(index).copied().flatten()
    }

    pub(crate) fn insert(&mut self, index: usize, size: Size) {
        self.sizes[index] = Some(size);
    }

    /// The size of slot `index`.
    ///
    /// # Panics
    /// Panics if the slot was never measured at the current generation.
    pub(crate) fn size(&self, index: usize) -> Size {
        self.get(index)
            .unwrap_or_else(|| panic!("slot {} has not been measured", index))
    }
}
