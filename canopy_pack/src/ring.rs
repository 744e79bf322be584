// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Circular doubly-linked list backed by a slot arena.
//!
//! Both packers walk a cycle while splicing nodes in and out: the rectangle
//! packer's perimeter is a ring of boundary segments, and the circle packer's
//! front chain is a ring of placed discs. Node ids stay stable across
//! unrelated insertions and removals, so walkers can hold them while the
//! ring changes elsewhere.

use alloc::vec::Vec;

struct Node<T> {
    data: T,
    prev: usize,
    next: usize,
}

/// Circular doubly-linked list with O(1) splice operations.
///
/// An empty ring has no head; a one-node ring links the node to itself.
pub(crate) struct Ring<T> {
    nodes: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<usize>,
    len: usize,
}

impl<T> Ring<T> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            head: None,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Some live node, or `None` when empty. Stable until that node is removed.
    #[cfg(test)]
    pub(crate) const fn head(&self) -> Option<usize> {
        self.head
    }

    fn node(&self, id: usize) -> &Node<T> {
        self.nodes[id].as_ref().expect("dangling ring node id")
    }

    fn node_mut(&mut self, id: usize) -> &mut Node<T> {
        self.nodes[id].as_mut().expect("dangling ring node id")
    }

    pub(crate) fn get(&self, id: usize) -> &T {
        &self.node(id).data
    }

    pub(crate) fn get_mut(&mut self, id: usize) -> &mut T {
        &mut self.node_mut(id).data
    }

    pub(crate) fn next(&self, id: usize) -> usize {
        self.node(id).next
    }

    pub(crate) fn prev(&self, id: usize) -> usize {
        self.node(id).prev
    }

    fn alloc(&mut self, node: Node<T>) -> usize {
        if let Some(id) = self.free.pop() {
            self.nodes[id] = Some(node);
            id
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        }
    }

    /// Append before the head (that is, at the "end" of the cycle).
    pub(crate) fn push(&mut self, data: T) -> usize {
        match self.head {
            None => {
                let id = self.alloc(Node {
                    data,
                    prev: 0,
                    next: 0,
                });
                self.node_mut(id).prev = id;
                self.node_mut(id).next = id;
                self.head = Some(id);
                self.len = 1;
                id
            }
            Some(head) => {
                let tail = self.prev(head);
                self.insert_after(tail, data)
            }
        }
    }

    /// Insert a new node directly after `at`. Returns the new node id.
    pub(crate) fn insert_after(&mut self, at: usize, data: T) -> usize {
        let next = self.next(at);
        let id = self.alloc(Node {
            data,
            prev: at,
            next,
        });
        self.node_mut(at).next = id;
        self.node_mut(next).prev = id;
        self.len += 1;
        id
    }

    /// Unlink and return a node's data.
    pub(crate) fn remove(&mut self, id: usize) -> T {
        let node = self.nodes[id].take().expect("dangling ring node id");
        self.free.push(id);
        self.len -= 1;
        if self.len == 0 {
            self.head = None;
        } else {
            self.node_mut(node.prev).next = node.next;
            self.node_mut(node.next).prev = node.prev;
            if self.head == Some(id) {
                self.head = Some(node.next);
            }
        }
        node.data
    }

    /// Remove every node strictly between `a` and `b` (walking forward from
    /// `a`), then link `a` directly to `b`. Returns how many were removed.
    ///
    /// `a` and `b` must be live and distinct, or equal (in which case every
    /// other node is removed and `a` becomes a self-loop).
    pub(crate) fn remove_between(&mut self, a: usize, b: usize) -> usize {
        let mut removed = 0;
        let mut cur = self.next(a);
        while cur != b {
            let next = self.next(cur);
            self.nodes[cur] = None;
            self.free.push(cur);
            self.len -= 1;
            if self.head == Some(cur) {
                self.head = Some(a);
            }
            removed += 1;
            cur = next;
        }
        self.node_mut(a).next = b;
        self.node_mut(b).prev = a;
        removed
    }

    /// Walk the full cycle once, starting at the head.
    pub(crate) fn iter(&self) -> RingIter<'_, T> {
        RingIter {
            ring: self,
            cur: self.head,
            remaining: self.len,
        }
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Ring<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Ring")
            .field("len", &self.len)
            .field("head", &self.head)
            .finish_non_exhaustive()
    }
}

pub(crate) struct RingIter<'a, T> {
    ring: &'a Ring<T>,
    cur: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for RingIter<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.cur?;
        self.remaining -= 1;
        self.cur = Some(self.ring.next(id));
        Some((id, self.ring.get(id)))
    }
}
