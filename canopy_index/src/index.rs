// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `Index` API and generic implementation over a pluggable backend.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::types::Aabb2D;

/// Generational handle for entries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key(u32, u32);

impl Key {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Index keys are intentionally 32-bit; higher bits are truncated by design."
    )]
    const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Entry<P> {
    generation: u32,
    aabb: Aabb2D,
    payload: P,
}

/// The four entries whose bounds-centers are most extreme on each axis.
///
/// Returned by [`IndexGeneric::extremes`]. A single entry may appear in
/// several fields.
#[derive(Copy, Clone, Debug)]
pub struct Extremes<P> {
    /// Entry with the smallest bounds-center x.
    pub min_x: (Key, P),
    /// Entry with the largest bounds-center x.
    pub max_x: (Key, P),
    /// Entry with the smallest bounds-center y.
    pub min_y: (Key, P),
    /// Entry with the largest bounds-center y.
    pub max_y: (Key, P),
}

/// A generic AABB index parameterized by a spatial backend.
///
/// Unlike a batched scene index, mutations here take effect immediately:
/// an `update` is visible to the very next `query_rect`. Callers that
/// interleave geometry edits and queries (such as an incremental packer)
/// rely on that.
#[derive(Debug)]
pub struct IndexGeneric<P: Copy + Debug, B: Backend<P>> {
    entries: Vec<Option<Entry<P>>>,
    /// Last generation per slot; persists across frees so reuse bumps it.
    generations: Vec<u32>,
    free_list: Vec<usize>,
    alive: usize,
    backend: B,
}

impl<P, B> IndexGeneric<P, B>
where
    P: Copy + Debug,
    B: Backend<P> + Default,
{
    /// Create an empty index using the backend's default constructor.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            alive: 0,
            backend: B::default(),
        }
    }
}

impl<P: Copy + Debug, B: Backend<P> + Default> Default for IndexGeneric<P, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, B> IndexGeneric<P, B>
where
    P: Copy + Debug,
    B: Backend<P>,
{
    /// Reserve space for at least `n` entries.
    pub fn reserve(&mut self, n: usize) {
        self.entries.reserve(n);
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.alive
    }

    /// True when no entries are live.
    pub fn is_empty(&self) -> bool {
        self.alive == 0
    }

    /// Insert a new AABB with payload. Returns a stable handle `Key`.
    pub fn insert(&mut self, aabb: Aabb2D, payload: P) -> Key {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.entries[idx] = Some(Entry {
                generation,
                aabb,
                payload,
            });
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.entries.push(Some(Entry {
                generation,
                aabb,
                payload,
            }));
            self.generations.push(generation);
            (self.entries.len() - 1, generation)
        };
        self.alive += 1;
        self.backend.insert(idx, aabb);
        Key::new(idx, generation)
    }

    /// Update an existing AABB. No-op on a stale key.
    pub fn update(&mut self, key: Key, aabb: Aabb2D) {
        if let Some(e) = self.entry_mut(key) {
            e.aabb = aabb;
            self.backend.update(key.idx(), aabb);
        }
    }

    /// Remove an existing AABB. No-op on a stale key.
    pub fn remove(&mut self, key: Key) {
        if self.entry_mut(key).is_some() {
            self.backend.remove(key.idx());
            self.free_list.push(key.idx());
            self.alive -= 1;
            self.entries[key.idx()] = None;
        }
    }

    /// Clear the index.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.generations.clear();
        self.free_list.clear();
        self.alive = 0;
        self.backend.clear();
    }

    /// The stored bounds for a key, when live.
    pub fn bounds(&self, key: Key) -> Option<Aabb2D> {
        let e = self.entries.get(key.idx())?.as_ref()?;
        (e.generation == key.1).then_some(e.aabb)
    }

    /// Query for entries whose AABB contains the point.
    pub fn query_point(&self, x: f64, y: f64) -> impl Iterator<Item = (Key, P)> + '_ {
        let slots = self.backend.query_point(x, y);
        let mut out = Vec::new();
        for i in slots {
            if let Some(Some(e)) = self.entries.get(i) {
                out.push((Key::new(i, e.generation), e.payload));
            }
        }
        out.into_iter()
    }

    /// Query for entries whose AABB intersects the given rectangle.
    ///
    /// Shared edges count as intersecting; callers needing strict overlap
    /// should shrink the query rectangle or filter exactly downstream.
    pub fn query_rect(&self, rect: Aabb2D) -> impl Iterator<Item = (Key, P)> + '_ {
        let slots = self.backend.query_rect(rect);
        let mut out = Vec::new();
        for i in slots {
            if let Some(Some(e)) = self.entries.get(i) {
                out.push((Key::new(i, e.generation), e.payload));
            }
        }
        out.into_iter()
    }

    /// The live entries whose bounds-centers are extreme on each axis.
    ///
    /// Returns `None` when the index is empty. Ties resolve to the
    /// lowest-numbered slot, which keeps the result deterministic.
    pub fn extremes(&self) -> Option<Extremes<P>> {
        let mut it = self.entries.iter().enumerate().filter_map(|(i, e)| {
            e.as_ref()
                .map(|e| (Key::new(i, e.generation), e.payload, e.aabb))
        });
        let (k0, p0, a0) = it.next()?;
        let mut ext = Extremes {
            min_x: (k0, p0),
            max_x: (k0, p0),
            min_y: (k0, p0),
            max_y: (k0, p0),
        };
        let (mut min_x, mut max_x) = (a0.center_x(), a0.center_x());
        let (mut min_y, mut max_y) = (a0.center_y(), a0.center_y());
        for (k, p, a) in it {
            let (cx, cy) = (a.center_x(), a.center_y());
            if cx < min_x {
                min_x = cx;
                ext.min_x = (k, p);
            }
            if cx > max_x {
                max_x = cx;
                ext.max_x = (k, p);
            }
            if cy < min_y {
                min_y = cy;
                ext.min_y = (k, p);
            }
            if cy > max_y {
                max_y = cy;
                ext.max_y = (k, p);
            }
        }
        Some(ext)
    }

    fn entry_mut(&mut self, key: Key) -> Option<&mut Entry<P>> {
        let e = self.entries.get_mut(key.idx())?.as_mut()?;
        if e.generation != key.1 {
            return None;
        }
        Some(e)
    }
}

/// Default index using a flat vector backend.
pub type Index<P> = IndexGeneric<P, crate::backends::flatvec::FlatVec<P>>;

/// Index using the growable region quadtree backend.
pub type QuadIndex<P> = IndexGeneric<P, crate::backends::quadtree::QuadTree<P>>;
