// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region quadtree backend with an outward-growing root.
//!
//! Entries live at the deepest node that fully contains their AABB, so boxes
//! straddling a split line stay at the parent. When an insertion falls outside
//! the current root bounds, the root doubles toward the box and the old root
//! becomes one quadrant of the new one. This suits workloads whose extent is
//! unknown up front, such as a packing boundary that grows outward from the
//! origin.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::types::Aabb2D;

/// Leaf split budget: a node subdivides once it holds more than this many entries.
const SPLIT_BUDGET: usize = 8;

/// Maximum subdivision depth.
const MAX_DEPTH: u8 = 16;

/// Bound on root-doubling steps; past this the entry is parked at the root.
const MAX_GROWS: u32 = 64;

/// Region quadtree backend.
pub struct QuadTree<P: Copy + Debug> {
    nodes: Vec<QNode>,
    root: Option<usize>,
    /// slot -> (bbox, owning node) for removal and update.
    entries: Vec<Option<(Aabb2D, usize)>>,
    _p: core::marker::PhantomData<P>,
}

struct QNode {
    bounds: Aabb2D,
    depth: u8,
    items: Vec<usize>,
    /// Child node indices in NW, NE, SW, SE order.
    children: Option<[usize; 4]>,
}

impl QNode {
    fn leaf(bounds: Aabb2D, depth: u8) -> Self {
        Self {
            bounds,
            depth,
            items: Vec::new(),
            children: None,
        }
    }
}

impl<P: Copy + Debug> Default for QuadTree<P> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            entries: Vec::new(),
            _p: core::marker::PhantomData,
        }
    }
}

impl<P: Copy + Debug> Debug for QuadTree<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let alive = self.entries.iter().filter(|e| e.is_some()).count();
        f.debug_struct("QuadTree")
            .field("nodes", &self.nodes.len())
            .field("alive", &alive)
            .field("root_bounds", &self.root.map(|r| self.nodes[r].bounds))
            .finish_non_exhaustive()
    }
}

impl<P: Copy + Debug> QuadTree<P> {
    fn quadrant_bounds(b: &Aabb2D, q: usize) -> Aabb2D {
        let cx = b.center_x();
        let cy = b.center_y();
        match q {
            0 => Aabb2D::new(b.min_x, b.min_y, cx, cy),
            1 => Aabb2D::new(cx, b.min_y, b.max_x, cy),
            2 => Aabb2D::new(b.min_x, cy, cx, b.max_y),
            _ => Aabb2D::new(cx, cy, b.max_x, b.max_y),
        }
    }

    /// Seed the root so the first box sits comfortably inside it.
    fn seed_root(&mut self, aabb: &Aabb2D) {
        let w = aabb.max_x - aabb.min_x;
        let h = aabb.max_y - aabb.min_y;
        let pad = (w.max(h)).max(1.0);
        let bounds = Aabb2D::new(
            aabb.min_x - pad,
            aabb.min_y - pad,
            aabb.max_x + pad,
            aabb.max_y + pad,
        );
        self.nodes.push(QNode::leaf(bounds, 0));
        self.root = Some(self.nodes.len() - 1);
    }

    /// Double the root toward `aabb` until the root bounds contain it.
    ///
    /// Each step allocates a new root whose quadrant exactly matches the old
    /// root bounds; the other three quadrants start as empty leaves. Depths of
    /// existing nodes are left alone: the split budget then behaves slightly
    /// conservatively for pre-growth subtrees, which is harmless.
    fn grow_to(&mut self, aabb: &Aabb2D) -> bool {
        let mut grows = 0_u32;
        while let Some(root) = self.root {
            let rb = self.nodes[root].bounds;
            if rb.contains(aabb) {
                return true;
            }
            if grows >= MAX_GROWS {
                return false;
            }
            grows += 1;
            let w = rb.max_x - rb.min_x;
            let h = rb.max_y - rb.min_y;
            let left = aabb.min_x < rb.min_x;
            let up = aabb.min_y < rb.min_y;
            let nb = Aabb2D::new(
                if left { rb.min_x - w } else { rb.min_x },
                if up { rb.min_y - h } else { rb.min_y },
                if left { rb.max_x } else { rb.max_x + w },
                if up { rb.max_y } else { rb.max_y + h },
            );
            // The old root lands in the quadrant matching its own corner.
            let old_q = match (left, up) {
                (true, true) => 3,
                (false, true) => 2,
                (true, false) => 1,
                (false, false) => 0,
            };
            let mut children = [0_usize; 4];
            for (q, child) in children.iter_mut().enumerate() {
                if q == old_q {
                    *child = root;
                } else {
                    self.nodes.push(QNode::leaf(Self::quadrant_bounds(&nb, q), 0));
                    *child = self.nodes.len() - 1;
                }
            }
            let new_root = QNode {
                bounds: nb,
                depth: 0,
                items: Vec::new(),
                children: Some(children),
            };
            self.nodes.push(new_root);
            self.root = Some(self.nodes.len() - 1);
        }
        false
    }

    /// Descend from `node` to the deepest node fully containing `aabb` and park
    /// the slot there, splitting leaves that exceed the budget.
    fn place(&mut self, mut node: usize, slot: usize, aabb: Aabb2D) {
        loop {
            if let Some(children) = self.nodes[node].children {
                let mut dest = None;
                for c in children {
                    if self.nodes[c].bounds.contains(&aabb) {
                        dest = Some(c);
                        break;
                    }
                }
                match dest {
                    Some(c) => node = c,
                    None => break,
                }
            } else {
                if self.nodes[node].items.len() >= SPLIT_BUDGET
                    && self.nodes[node].depth < MAX_DEPTH
                {
                    self.split(node);
                    continue;
                }
                break;
            }
        }
        self.nodes[node].items.push(slot);
        self.entries[slot] = Some((aabb, node));
    }

    fn split(&mut self, node: usize) {
        let bounds = self.nodes[node].bounds;
        let depth = self.nodes[node].depth;
        let mut children = [0_usize; 4];
        for (q, child) in children.iter_mut().enumerate() {
            self.nodes
                .push(QNode::leaf(Self::quadrant_bounds(&bounds, q), depth + 1));
            *child = self.nodes.len() - 1;
        }
        self.nodes[node].children = Some(children);
        // Redistribute items that fit fully inside a quadrant.
        let items = core::mem::take(&mut self.nodes[node].items);
        for slot in items {
            let Some((aabb, _)) = self.entries[slot] else {
                continue;
            };
            let mut dest = node;
            for c in children {
                if self.nodes[c].bounds.contains(&aabb) {
                    dest = c;
                    break;
                }
            }
            self.nodes[dest].items.push(slot);
            self.entries[slot] = Some((aabb, dest));
        }
    }

    fn detach(&mut self, slot: usize) {
        let Some(Some((_, node))) = self.entries.get(slot).copied() else {
            return;
        };
        let items = &mut self.nodes[node].items;
        if let Some(pos) = items.iter().position(|&s| s == slot) {
            items.swap_remove(pos);
        }
        self.entries[slot] = None;
    }

    fn collect<'a>(
        &'a self,
        pred: impl Fn(&Aabb2D) -> bool + 'a,
        prune: impl Fn(&Aabb2D) -> bool + 'a,
    ) -> Box<dyn Iterator<Item = usize> + 'a> {
        let mut out = Vec::new();
        if let Some(root) = self.root {
            let mut stack = Vec::new();
            stack.push(root);
            while let Some(n) = stack.pop() {
                let node = &self.nodes[n];
                if !prune(&node.bounds) {
                    continue;
                }
                for &slot in &node.items {
                    if let Some(Some((aabb, _))) = self.entries.get(slot)
                        && pred(aabb)
                    {
                        out.push(slot);
                    }
                }
                if let Some(children) = node.children {
                    stack.extend_from_slice(&children);
                }
            }
        }
        Box::new(out.into_iter())
    }
}

impl<P: Copy + Debug> Backend<P> for QuadTree<P> {
    fn insert(&mut self, slot: usize, aabb: Aabb2D) {
        if self.entries.len() <= slot {
            self.entries.resize_with(slot + 1, || None);
        }
        if self.root.is_none() {
            self.seed_root(&aabb);
        }
        let root = if self.grow_to(&aabb) {
            self.root.unwrap_or(0)
        } else {
            // Pathological extent; park at the root and widen its prune bounds
            // so queries still see the entry.
            let root = self.root.unwrap_or(0);
            self.nodes[root].bounds = self.nodes[root].bounds.union(&aabb);
            root
        };
        self.place(root, slot, aabb);
    }

    fn update(&mut self, slot: usize, aabb: Aabb2D) {
        if self.entries.get(slot).copied().flatten().is_none() {
            return;
        }
        self.detach(slot);
        self.insert(slot, aabb);
    }

    fn remove(&mut self, slot: usize) {
        self.detach(slot);
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.entries.clear();
    }

    fn query_point<'a>(&'a self, x: f64, y: f64) -> Box<dyn Iterator<Item = usize> + 'a> {
        self.collect(
            move |aabb| aabb.contains_point(x, y),
            move |bounds| bounds.contains_point(x, y),
        )
    }

    fn query_rect<'a>(&'a self, rect: Aabb2D) -> Box<dyn Iterator<Item = usize> + 'a> {
        self.collect(
            move |aabb| aabb.overlaps(&rect),
            move |bounds| bounds.overlaps(&rect),
        )
    }
}
