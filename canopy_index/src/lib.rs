// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_index --heading-base-level=0

//! Canopy Index: a 2D AABB index over `f64` with immediate updates.
//!
//! Canopy Index is the spatial acceleration layer under the Canopy packed-layout
//! engine, and a reusable building block on its own.
//!
//! - Insert, update, and remove axis-aligned bounding boxes (AABBs) with user payloads.
//! - Query by point or intersecting rectangle.
//! - Look up the four entries with extreme bounds-centers per axis with
//!   [`IndexGeneric::extremes`].
//!
//! Mutations apply immediately: an `update` is visible to the next query. There
//! is no batching stage, because the intended caller (an incremental packer)
//! interleaves geometry edits and queries on every step.
//!
//! Zero-area boxes are first-class; the packer stores its perimeter segments as
//! degenerate AABBs with one zero extent. Queries may over-approximate
//! (backends never miss an overlapping entry, but may return extras); callers
//! filter exactly downstream.
//!
//! Backends are pluggable via a simple trait so you can swap the spatial
//! strategy without API churn. The default backend is a flat vector (linear
//! scan); [`QuadTree`] is a region quadtree whose root grows outward on demand.
//!
//! # Example
//!
//! ```rust
//! use canopy_index::{Aabb2D, QuadIndex};
//!
//! // Create a quadtree-backed index and add two segments.
//! let mut idx: QuadIndex<u32> = QuadIndex::new();
//! let k1 = idx.insert(Aabb2D::new(0.0, 0.0, 10.0, 0.0), 1);
//! let _k2 = idx.insert(Aabb2D::new(10.0, 0.0, 10.0, 10.0), 2);
//!
//! // Move the first segment; the change is visible at once.
//! idx.update(k1, Aabb2D::new(0.0, 10.0, 10.0, 10.0));
//! let hits: Vec<_> = idx.query_rect(Aabb2D::new(1.0, 9.0, 2.0, 11.0)).collect();
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].1, 1);
//!
//! // Extreme entries per axis.
//! let ext = idx.extremes().unwrap();
//! assert_eq!(ext.max_y.1, 1);
//! ```
//!
//! ## Choosing a backend
//!
//! - [`FlatVec`] (default): simplest and smallest, linear scans. Good for very
//!   small sets or when inserts/updates vastly outnumber queries.
//! - [`QuadTree`]: entries live at the deepest fully-containing node; the root
//!   doubles outward when an insertion escapes it, so no world bounds are
//!   needed up front.
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs in coordinates. Debug builds may assert.

#![no_std]

extern crate alloc;

pub mod backend;
pub mod backends;
pub mod index;
pub mod types;

pub use backend::Backend;
pub use backends::flatvec::FlatVec;
pub use backends::quadtree::QuadTree;
pub use index::{Extremes, Index, IndexGeneric, Key, QuadIndex};
pub use types::Aabb2D;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn insert_update_and_query() {
        let mut idx: Index<u32> = Index::new();
        let k1 = idx.insert(Aabb2D::new(0.0, 0.0, 10.0, 10.0), 1);
        idx.update(k1, Aabb2D::new(5.0, 5.0, 15.0, 15.0));
        let hits: Vec<_> = idx.query_point(6.0, 6.0).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].1, 1);
    }

    #[test]
    fn removed_entry_leaves_queries() {
        let mut idx: Index<u32> = Index::new();
        let k = idx.insert(Aabb2D::new(0.0, 0.0, 10.0, 10.0), 1);
        idx.remove(k);
        assert_eq!(idx.query_point(1.0, 1.0).count(), 0);
        assert_eq!(idx.len(), 0);
    }

    #[test]
    fn flatvec_and_quadtree_agree() {
        let mut a: Index<usize> = Index::new();
        let mut b: QuadIndex<usize> = QuadIndex::new();
        for i in 0..20 {
            let x = (i % 5) as f64 * 12.0;
            let y = (i / 5) as f64 * 9.0;
            let aabb = Aabb2D::from_xywh(x, y, 10.0, 7.0);
            a.insert(aabb, i);
            b.insert(aabb, i);
        }
        let q = Aabb2D::new(5.0, 5.0, 30.0, 20.0);
        let mut ra: Vec<usize> = a.query_rect(q).map(|(_, p)| p).collect();
        let mut rb: Vec<usize> = b.query_rect(q).map(|(_, p)| p).collect();
        ra.sort_unstable();
        rb.sort_unstable();
        assert_eq!(ra, rb);
    }
}
