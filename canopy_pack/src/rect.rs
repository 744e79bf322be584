// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy rectangle packing along the perimeter of the packed region.
//!
//! The packed region's boundary is a clockwise ring of axis-aligned
//! [`Segment`]s, indexed spatially so candidate placements can be tested
//! against nearby boundary pieces instead of every placed rectangle. Each
//! new rectangle is anchored flush against some boundary segment; the
//! cheapest non-colliding candidate wins, where cost is distance from the
//! region center shaped by the target silhouette. Committing a placement
//! splices the rectangle's outline into the ring, absorbing the boundary
//! arc it covers (and any notch it seals).

use alloc::vec::Vec;
use canopy_index::{Aabb2D, QuadIndex};
use kurbo::{Point, Rect, Size};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::ring::Ring;
use crate::segment::{Heading, Segment, turn_is_concave};
use crate::types::{EPSILON, PackShape};

/// A skip fit must beat the plain fit by this factor to be taken.
const SKIP_PREFERENCE: f64 = 0.98;

#[derive(Copy, Clone, Debug)]
struct Candidate {
    cost: f64,
    rect: Rect,
    node: usize,
}

#[derive(Copy, Clone, Debug)]
struct SkipFit {
    cost: f64,
    rect: Rect,
    /// The second, collinear segment the bridge rests on.
    partner: usize,
}

#[derive(Copy, Clone, Debug)]
struct ExtremeNodes {
    min_x: usize,
    max_x: usize,
    min_y: usize,
    max_y: usize,
}

/// Incremental rectangle packer.
///
/// `place` positions one rectangle at a time; the packer owns no item
/// bookkeeping beyond the boundary, so callers keep their own list of
/// returned rectangles.
#[derive(Debug)]
pub(crate) struct RectPacker {
    ring: Ring<Segment>,
    index: QuadIndex<usize>,
    shape: PackShape,
    aspect: f64,
    /// Bounds of the packed silhouette, derived from the extreme segments.
    bounds: Rect,
    extremes: Option<ExtremeNodes>,
    extremes_stale: bool,
}

/// Closed-contact test: the segment's box and the rect overlap within
/// tolerance. Used only after collision rejection, so any overlap here is
/// touching, never crossing.
fn touches(seg: &Segment, rect: &Rect) -> bool {
    let b = seg.bounds();
    b.min_x <= rect.x1 + EPSILON
        && b.max_x >= rect.x0 - EPSILON
        && b.min_y <= rect.y1 + EPSILON
        && b.max_y >= rect.y0 - EPSILON
}

/// Whether placing `rect` would cross this boundary segment.
///
/// A segment blocks when it passes through the rect's interior, or when it
/// lies along a rect edge with the packed interior on the rect's side of
/// the line (a back-to-back boundary, meaning packed material fills the
/// space the rect wants).
fn seg_blocks(seg: &Segment, rect: &Rect) -> bool {
    let h = seg.heading();
    let b = seg.bounds();
    if h.is_horizontal() {
        let y = seg.p1.y;
        let ov = b.max_x.min(rect.x1) - b.min_x.max(rect.x0);
        if ov <= EPSILON {
            return false;
        }
        if y > rect.y0 + EPSILON && y < rect.y1 - EPSILON {
            return true;
        }
        ((y - rect.y0).abs() <= EPSILON && h == Heading::East)
            || ((y - rect.y1).abs() <= EPSILON && h == Heading::West)
    } else {
        let x = seg.p1.x;
        let ov = b.max_y.min(rect.y1) - b.min_y.max(rect.y0);
        if ov <= EPSILON {
            return false;
        }
        if x > rect.x0 + EPSILON && x < rect.x1 - EPSILON {
            return true;
        }
        ((x - rect.x0).abs() <= EPSILON && h == Heading::North)
            || ((x - rect.x1).abs() <= EPSILON && h == Heading::South)
    }
}

/// First point of `seg` (in travel order) in contact with `rect`.
fn contact_first(seg: &Segment, rect: &Rect) -> Point {
    if seg.heading().is_horizontal() {
        Point::new(seg.p1.x.clamp(rect.x0, rect.x1), seg.p1.y)
    } else {
        Point::new(seg.p1.x, seg.p1.y.clamp(rect.y0, rect.y1))
    }
}

/// Last point of `seg` (in travel order) in contact with `rect`.
fn contact_last(seg: &Segment, rect: &Rect) -> Point {
    if seg.heading().is_horizontal() {
        Point::new(seg.p2.x.clamp(rect.x0, rect.x1), seg.p2.y)
    } else {
        Point::new(seg.p2.x, seg.p2.y.clamp(rect.y0, rect.y1))
    }
}

/// Clockwise perimeter parameter of a point on (or within tolerance of)
/// the rect boundary: top, right, bottom, left sides in that order.
fn perimeter_param(rect: &Rect, p: Point) -> f64 {
    let w = rect.width();
    let h = rect.height();
    let dt = (p.y - rect.y0).abs();
    let dr = (p.x - rect.x1).abs();
    let db = (p.y - rect.y1).abs();
    let dl = (p.x - rect.x0).abs();
    let m = dt.min(dr).min(db).min(dl);
    if m == dt {
        (p.x - rect.x0).clamp(0.0, w)
    } else if m == dr {
        w + (p.y - rect.y0).clamp(0.0, h)
    } else if m == db {
        w + h + (rect.x1 - p.x).clamp(0.0, w)
    } else {
        w + h + w + (rect.y1 - p.y).clamp(0.0, h)
    }
}

fn perimeter_point(rect: &Rect, t: f64) -> Point {
    let w = rect.width();
    let h = rect.height();
    if t <= w {
        Point::new(rect.x0 + t, rect.y0)
    } else if t <= w + h {
        Point::new(rect.x1, rect.y0 + (t - w))
    } else if t <= 2.0 * w + h {
        Point::new(rect.x1 - (t - w - h), rect.y1)
    } else {
        Point::new(rect.x0, rect.y1 - (t - 2.0 * w - h))
    }
}

/// `t` wrapped into `[0, per)`.
fn wrap_param(t: f64, per: f64) -> f64 {
    let r = t % per;
    if r < 0.0 { r + per } else { r }
}

/// Clockwise walk along the rect boundary from `a` to `b`, broken at the
/// corners passed on the way. Zero-length pieces are dropped.
fn boundary_path(rect: &Rect, a: Point, b: Point) -> Vec<(Point, Point)> {
    let w = rect.width();
    let h = rect.height();
    let per = 2.0 * (w + h);
    let ta = perimeter_param(rect, a);
    let tb = perimeter_param(rect, b);
    let span = {
        let d = wrap_param(tb - ta, per);
        if d < EPSILON { per } else { d }
    };
    let mut points = Vec::with_capacity(6);
    points.push(a);
    let mut corners: Vec<(f64, f64)> = [0.0, w, w + h, 2.0 * w + h]
        .iter()
        .filter_map(|&c| {
            let off = wrap_param(c - ta, per);
            (off > EPSILON && off < span - EPSILON).then_some((off, c))
        })
        .collect();
    corners.sort_by(|x, y| x.0.partial_cmp(&y.0).unwrap_or(core::cmp::Ordering::Equal));
    for (_, c) in corners {
        points.push(perimeter_point(rect, c));
    }
    points.push(b);
    let mut out = Vec::with_capacity(points.len() - 1);
    for pair in points.windows(2) {
        let (p1, p2) = (pair[0], pair[1]);
        if (p2.x - p1.x).abs() + (p2.y - p1.y).abs() > EPSILON {
            out.push((p1, p2));
        }
    }
    out
}

impl RectPacker {
    pub(crate) fn new(shape: PackShape, aspect: f64) -> Self {
        Self {
            ring: Ring::new(),
            index: QuadIndex::new(),
            // Rectangles have no meaningful spiral; treat it as elliptical.
            shape: if shape == PackShape::Spiral {
                PackShape::Elliptical
            } else {
                shape
            },
            aspect,
            bounds: Rect::ZERO,
            extremes: None,
            extremes_stale: false,
        }
    }

    #[cfg(test)]
    pub(crate) const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Place one `size`-d rectangle against the packed region, returning
    /// where it landed, or `None` when every candidate collides.
    pub(crate) fn place(&mut self, size: Size) -> Option<Rect> {
        if self.ring.is_empty() {
            return Some(self.seed(size));
        }
        let mut candidates: Vec<Candidate> = self
            .ring
            .iter()
            .map(|(node, seg)| self.best_fit(node, seg, size.width, size.height))
            .collect();
        candidates.sort_by(|a, b| a.cost.partial_cmp(&b.cost).unwrap_or(core::cmp::Ordering::Equal));

        for cand in candidates {
            if self.fast_reject(cand.node, &cand.rect) || self.collides(&cand.rect) {
                continue;
            }
            let mut rect = cand.rect;
            let mut partner = None;
            if let Some(skip) = self.find_skip(cand.node, size.width, size.height)
                && skip.cost * SKIP_PREFERENCE <= cand.cost + EPSILON
                && !self.collides(&skip.rect)
            {
                rect = skip.rect;
                partner = Some(skip.partner);
            }
            self.commit(rect, cand.node, partner);
            return Some(rect);
        }
        None
    }

    fn seed(&mut self, size: Size) -> Rect {
        let rect = Rect::from_center_size(Point::ORIGIN, size);
        let tl = Point::new(rect.x0, rect.y0);
        let tr = Point::new(rect.x1, rect.y0);
        let br = Point::new(rect.x1, rect.y1);
        let bl = Point::new(rect.x0, rect.y1);
        let top = self.push_seg(Segment::new(tl, tr));
        let right = self.push_seg(Segment::new(tr, br));
        let bottom = self.push_seg(Segment::new(br, bl));
        let left = self.push_seg(Segment::new(bl, tl));
        self.extremes = Some(ExtremeNodes {
            min_x: left,
            max_x: right,
            min_y: top,
            max_y: bottom,
        });
        self.bounds = rect;
        rect
    }

    fn push_seg(&mut self, seg: Segment) -> usize {
        let node = self.ring.push(seg);
        let key = self.index.insert(self.ring.get(node).bounds(), node);
        self.ring.get_mut(node).key = Some(key);
        node
    }

    fn insert_seg_after(&mut self, at: usize, mut seg: Segment) -> usize {
        seg.key = None;
        let node = self.ring.insert_after(at, seg);
        let key = self.index.insert(self.ring.get(node).bounds(), node);
        self.ring.get_mut(node).key = Some(key);
        node
    }

    fn center(&self) -> Point {
        self.bounds.center()
    }

    fn placement_cost(&self, rect: &Rect) -> f64 {
        let c = self.center();
        let dx = (rect.center().x - c.x) / self.aspect;
        let dy = rect.center().y - c.y;
        match self.shape {
            PackShape::Rectangular => {
                let inside = rect.x0 >= self.bounds.x0 - EPSILON
                    && rect.x1 <= self.bounds.x1 + EPSILON
                    && rect.y0 >= self.bounds.y0 - EPSILON
                    && rect.y1 <= self.bounds.y1 + EPSILON;
                if inside { 0.0 } else { dx.abs().max(dy.abs()) }
            }
            PackShape::Elliptical | PackShape::Spiral => dx * dx + dy * dy,
        }
    }

    /// Cheapest of up to three positions flush against one segment: the
    /// leading corner, the trailing corner, and (when the segment straddles
    /// the region center on its axis) centered on the region center.
    fn best_fit(&self, node: usize, seg: &Segment, w: f64, h: f64) -> Candidate {
        let hd = seg.heading();
        let horizontal = hd.is_horizontal();
        let along_len = if horizontal { w } else { h };
        let cross_len = if horizontal { h } else { w };
        let line = if horizontal { seg.p1.y } else { seg.p1.x };
        let out = hd.outward();
        let out_c = if horizontal { out.y } else { out.x };
        let (v0, v1) = if out_c < 0.0 {
            (line - cross_len, line)
        } else {
            (line, line + cross_len)
        };
        let mk = |u0: f64, u1: f64| {
            if horizontal {
                Rect::new(u0, v0, u1, v1)
            } else {
                Rect::new(v0, u0, v1, u1)
            }
        };
        let (a1, a2) = if horizontal {
            (seg.p1.x, seg.p2.x)
        } else {
            (seg.p1.y, seg.p2.y)
        };
        let forward = a2 >= a1;

        let mut rect = if forward {
            mk(a1, a1 + along_len)
        } else {
            mk(a1 - along_len, a1)
        };
        let mut cost = self.placement_cost(&rect);

        let trailing = if forward {
            mk(a2 - along_len, a2)
        } else {
            mk(a2, a2 + along_len)
        };
        let trailing_cost = self.placement_cost(&trailing);
        if trailing_cost < cost {
            rect = trailing;
            cost = trailing_cost;
        }

        let c = if horizontal {
            self.center().x
        } else {
            self.center().y
        };
        if c > a1.min(a2) + EPSILON && c < a1.max(a2) - EPSILON {
            let centered = mk(c - along_len / 2.0, c + along_len / 2.0);
            let centered_cost = self.placement_cost(&centered);
            if centered_cost < cost {
                rect = centered;
                cost = centered_cost;
            }
        }
        Candidate { cost, rect, node }
    }

    /// Cheap pre-check against the anchor's near neighbors before the exact
    /// index query.
    fn fast_reject(&self, node: usize, rect: &Rect) -> bool {
        let p1 = self.ring.prev(node);
        let p2 = self.ring.prev(p1);
        let n1 = self.ring.next(node);
        let n2 = self.ring.next(n1);
        [p2, p1, n1, n2]
            .into_iter()
            .any(|n| n != node && seg_blocks(self.ring.get(n), rect))
    }

    /// Exact collision test via the spatial index.
    fn collides(&self, rect: &Rect) -> bool {
        let query = Aabb2D::new(
            rect.x0 - EPSILON,
            rect.y0 - EPSILON,
            rect.x1 + EPSILON,
            rect.y1 + EPSILON,
        );
        self.index
            .query_rect(query)
            .any(|(_, node)| seg_blocks(self.ring.get(node), rect))
    }

    /// Look ahead from `anchor` for a collinear same-heading segment a
    /// bridge rectangle could rest on, sealing the concavity between them.
    fn find_skip(&self, anchor: usize, w: f64, h: f64) -> Option<SkipFit> {
        let seg = *self.ring.get(anchor);
        let hd = seg.heading();
        let horizontal = hd.is_horizontal();
        let along_len = if horizontal { w } else { h };
        let cross_len = if horizontal { h } else { w };
        let line = if horizontal { seg.p1.y } else { seg.p1.x };
        let a2 = if horizontal { seg.p2.x } else { seg.p2.y };
        let d = hd.delta();
        let dir = if horizontal { d.x } else { d.y };
        let out = hd.outward();
        let out_c = if horizontal { out.y } else { out.x };

        let mut saw_concave = false;
        let mut node = self.ring.next(anchor);
        let mut steps = 0;
        while steps + 2 < self.ring.len() {
            let s2 = self.ring.get(node);
            if s2.concave_start {
                saw_concave = true;
            }
            let h2 = s2.heading();
            if h2 == hd {
                let line2 = if horizontal { s2.p1.y } else { s2.p1.x };
                if (line2 - line).abs() <= EPSILON {
                    if !saw_concave {
                        return None;
                    }
                    let b1 = if horizontal { s2.p1.x } else { s2.p1.y };
                    let gap = (b1 - a2) * dir;
                    if gap < -EPSILON || gap > along_len + EPSILON {
                        return None;
                    }
                    // Center the bridge over the gap.
                    let overhang = ((along_len - gap) / 2.0).max(0.0);
                    let e0 = a2 - overhang * dir;
                    let e1 = b1 + overhang * dir;
                    let (u0, u1) = (e0.min(e1), e0.max(e1));
                    let (v0, v1) = if out_c < 0.0 {
                        (line - cross_len, line)
                    } else {
                        (line, line + cross_len)
                    };
                    let rect = if horizontal {
                        Rect::new(u0, v0, u1, v1)
                    } else {
                        Rect::new(v0, u0, v1, u1)
                    };
                    return Some(SkipFit {
                        cost: self.placement_cost(&rect),
                        rect,
                        partner: node,
                    });
                }
                // A parallel ledge outward of our line blocks any bridge;
                // a deeper (inward) floor is just the notch bottom.
                if (line2 - line) * out_c > EPSILON {
                    return None;
                }
            } else if h2 == hd.opposite() {
                return None;
            }
            // Stop once the walk is farther ahead than the rect can span.
            let (u_p1, u_p2) = if horizontal {
                (s2.p1.x, s2.p2.x)
            } else {
                (s2.p1.y, s2.p2.y)
            };
            let progress = ((u_p1 - a2) * dir).min((u_p2 - a2) * dir);
            if progress > along_len + EPSILON {
                return None;
            }
            node = self.ring.next(node);
            steps += 1;
        }
        None
    }

    fn is_extreme(&self, node: usize) -> bool {
        self.extremes
            .is_some_and(|e| e.min_x == node || e.max_x == node || e.min_y == node || e.max_y == node)
    }

    /// Splice `rect`'s outline into the boundary ring, absorbing the arc of
    /// segments it touches (plus the span to `partner` for a skip fit).
    fn commit(&mut self, rect: Rect, anchor: usize, partner: Option<usize>) {
        let len = self.ring.len();

        // Extent of the absorbed arc. Walk backward, then forward; a skip
        // fit absorbs everything through the partner even where the bridge
        // floats above a notch (that notch becomes a sealed hole).
        let mut arc = 1;
        let mut start = anchor;
        while arc + 1 < len {
            let p = self.ring.prev(start);
            if !touches(self.ring.get(p), &rect) {
                break;
            }
            start = p;
            arc += 1;
        }
        let mut end = anchor;
        if let Some(pn) = partner {
            while end != pn && arc + 1 < len {
                end = self.ring.next(end);
                arc += 1;
            }
        }
        while arc + 1 < len {
            let nx = self.ring.next(end);
            if nx == start || !touches(self.ring.get(nx), &rect) {
                break;
            }
            end = nx;
            arc += 1;
        }

        let start_seg = *self.ring.get(start);
        let end_seg = *self.ring.get(end);
        let a = contact_first(&start_seg, &rect);
        let b = contact_last(&end_seg, &rect);

        let keep_before = (a.distance(start_seg.p1) > EPSILON).then(|| {
            let mut s = Segment::new(start_seg.p1, a);
            s.concave_start = start_seg.concave_start;
            s
        });
        let keep_after = (b.distance(end_seg.p2) > EPSILON).then(|| Segment::new(b, end_seg.p2));

        // Drop the arc from the index before unlinking it.
        let mut cur = start;
        loop {
            if let Some(k) = self.ring.get(cur).key {
                self.index.remove(k);
            }
            if self.is_extreme(cur) {
                self.extremes_stale = true;
            }
            if cur == end {
                break;
            }
            cur = self.ring.next(cur);
        }
        let before = self.ring.prev(start);
        self.ring.remove_between(before, self.ring.next(end));

        // Rebuild: truncated head, the rect outline from A to B, truncated
        // tail.
        let mut cursor = before;
        let mut inserted = 0_usize;
        if let Some(s) = keep_before {
            cursor = self.insert_seg_after(cursor, s);
            inserted += 1;
        }
        for (p1, p2) in boundary_path(&rect, a, b) {
            cursor = self.insert_seg_after(cursor, Segment::new(p1, p2));
            inserted += 1;
        }
        if let Some(s) = keep_after {
            self.insert_seg_after(cursor, s);
            inserted += 1;
        }
        debug_assert!(inserted > 0, "a commit must insert boundary segments");

        // Merge collinear joints introduced at the seams.
        let mut n = before;
        for _ in 0..=inserted {
            if self.ring.len() < 2 {
                break;
            }
            let m = self.ring.next(n);
            if m == before {
                // Wrapped the whole ring. `before` must stay live (the
                // passes below walk from it), so absorb `n` into it instead.
                if self.ring.get(n).heading() == self.ring.get(m).heading() {
                    let absorbed = *self.ring.get(n);
                    if let Some(k) = absorbed.key {
                        self.index.remove(k);
                    }
                    if self.is_extreme(n) {
                        self.extremes_stale = true;
                    }
                    self.ring.remove(n);
                    let b = self.ring.get_mut(before);
                    b.p1 = absorbed.p1;
                    b.concave_start = absorbed.concave_start;
                    let merged = *self.ring.get(before);
                    if let Some(k) = merged.key {
                        self.index.update(k, merged.bounds());
                    }
                }
                break;
            }
            if self.ring.get(n).heading() == self.ring.get(m).heading() {
                let absorbed = *self.ring.get(m);
                if let Some(k) = absorbed.key {
                    self.index.remove(k);
                }
                if self.is_extreme(m) {
                    self.extremes_stale = true;
                }
                self.ring.remove(m);
                self.ring.get_mut(n).p2 = absorbed.p2;
                let merged = *self.ring.get(n);
                if let Some(k) = merged.key {
                    self.index.update(k, merged.bounds());
                }
            } else {
                n = m;
            }
        }

        // Concavity flags around the new run, including the survivor after
        // it (its entry turn may have changed).
        let mut nn = self.ring.next(before);
        for _ in 0..(inserted + 2).min(self.ring.len()) {
            self.refresh_concavity(nn);
            nn = self.ring.next(nn);
        }

        // Repair extreme pointers, lazily when one was deleted, and account
        // for the new segments either way.
        if self.extremes_stale {
            if let Some(ext) = self.index.extremes() {
                self.extremes = Some(ExtremeNodes {
                    min_x: ext.min_x.1,
                    max_x: ext.max_x.1,
                    min_y: ext.min_y.1,
                    max_y: ext.max_y.1,
                });
            }
            self.extremes_stale = false;
        } else {
            let mut nn = self.ring.next(before);
            for _ in 0..(inserted + 1).min(self.ring.len()) {
                self.note_extremes(nn);
                nn = self.ring.next(nn);
            }
        }
        self.refresh_bounds();
    }

    fn refresh_concavity(&mut self, node: usize) {
        let prev = self.ring.prev(node);
        if prev == node {
            return;
        }
        let d_in = self.ring.get(prev).p2 - self.ring.get(prev).p1;
        let d_out = self.ring.get(node).p2 - self.ring.get(node).p1;
        self.ring.get_mut(node).concave_start = turn_is_concave(d_in, d_out);
    }

    fn note_extremes(&mut self, node: usize) {
        let Some(mut e) = self.extremes else {
            return;
        };
        let b = self.ring.get(node).bounds();
        let (cx, cy) = (b.center_x(), b.center_y());
        if cx < self.ring.get(e.min_x).bounds().center_x() {
            e.min_x = node;
        }
        if cx > self.ring.get(e.max_x).bounds().center_x() {
            e.max_x = node;
        }
        if cy < self.ring.get(e.min_y).bounds().center_y() {
            e.min_y = node;
        }
        if cy > self.ring.get(e.max_y).bounds().center_y() {
            e.max_y = node;
        }
        self.extremes = Some(e);
    }

    fn refresh_bounds(&mut self) {
        if let Some(e) = self.extremes {
            self.bounds = Rect::new(
                self.ring.get(e.min_x).bounds().min_x,
                self.ring.get(e.min_y).bounds().min_y,
                self.ring.get(e.max_x).bounds().max_x,
                self.ring.get(e.max_y).bounds().max_y,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn overlap_area(a: &Rect, b: &Rect) -> f64 {
        let w = a.x1.min(b.x1) - a.x0.max(b.x0);
        let h = a.y1.min(b.y1) - a.y0.max(b.y0);
        if w > 1e-9 && h > 1e-9 { w * h } else { 0.0 }
    }

    fn place_all(packer: &mut RectPacker, sizes: &[Size]) -> Vec<Rect> {
        sizes
            .iter()
            .map(|&s| packer.place(s).expect("placement failed"))
            .collect()
    }

    #[test]
    fn first_rect_is_centered_at_the_origin() {
        let mut p = RectPacker::new(PackShape::Rectangular, 1.0);
        let r = p.place(Size::new(50.0, 30.0)).unwrap();
        assert_eq!(r.center(), Point::ORIGIN);
        assert_eq!(p.bounds(), r);
    }

    #[test]
    fn four_unit_squares_tile_a_square() {
        let mut p = RectPacker::new(PackShape::Rectangular, 1.0);
        let rects = place_all(&mut p, &[Size::new(1.0, 1.0); 4]);
        for i in 0..4 {
            for j in (i + 1)..4 {
                assert_eq!(
                    overlap_area(&rects[i], &rects[j]),
                    0.0,
                    "squares {i} and {j} overlap"
                );
            }
        }
        let b = p.bounds();
        assert!((b.width() - 2.0).abs() < 1e-9, "width {}", b.width());
        assert!((b.height() - 2.0).abs() < 1e-9, "height {}", b.height());
    }

    #[test]
    fn second_rect_lands_flush_with_the_first() {
        let mut p = RectPacker::new(PackShape::Rectangular, 1.0);
        let rects = place_all(&mut p, &[Size::new(4.0, 4.0), Size::new(4.0, 4.0)]);
        assert_eq!(overlap_area(&rects[0], &rects[1]), 0.0);
        // Flush contact: the union has no gap on the shared edge.
        let b = p.bounds();
        assert!((b.area() - 32.0).abs() < 1e-9);
    }

    #[test]
    fn mixed_sizes_pack_without_overlap() {
        let mut p = RectPacker::new(PackShape::Elliptical, 1.0);
        let sizes: Vec<Size> = (0_u32..40)
            .map(|i| {
                let w = 4.0 + f64::from(i % 7) * 3.0;
                let h = 3.0 + f64::from(i % 5) * 4.0;
                Size::new(w, h)
            })
            .collect();
        let rects = place_all(&mut p, &sizes);
        let mut area = 0.0;
        for i in 0..rects.len() {
            area += rects[i].area();
            for j in (i + 1)..rects.len() {
                assert_eq!(
                    overlap_area(&rects[i], &rects[j]),
                    0.0,
                    "rects {i} and {j} overlap"
                );
            }
        }
        // The silhouette bounds must cover everything placed.
        let b = p.bounds();
        for (i, r) in rects.iter().enumerate() {
            assert!(r.x0 >= b.x0 - 1e-9 && r.x1 <= b.x1 + 1e-9, "rect {i} escapes x");
            assert!(r.y0 >= b.y0 - 1e-9 && r.y1 <= b.y1 + 1e-9, "rect {i} escapes y");
        }
        assert!(b.area() >= area - 1e-6);
    }

    #[test]
    fn rectangular_packings_stay_dense() {
        // A modest workload should waste little area in Rectangular mode.
        let mut p = RectPacker::new(PackShape::Rectangular, 1.0);
        let rects = place_all(&mut p, &[Size::new(2.0, 2.0); 16]);
        let area: f64 = rects.iter().map(Rect::area).sum();
        let b = p.bounds();
        assert!(
            b.area() <= area * 1.5,
            "bounds {:?} too sparse for {} area",
            b,
            area
        );
    }

    #[test]
    fn aspect_ratio_steers_growth_sideways() {
        let mut p = RectPacker::new(PackShape::Elliptical, 4.0);
        let _ = place_all(&mut p, &[Size::new(1.0, 1.0); 12]);
        let b = p.bounds();
        assert!(
            b.width() > b.height(),
            "aspect 4 should grow wide: {:?}",
            b
        );
    }

    #[test]
    fn boundary_path_walks_clockwise() {
        let r = Rect::new(0.0, 0.0, 4.0, 2.0);
        // Bottom-left corner to bottom-right corner the long way round.
        let path = boundary_path(&r, Point::new(0.0, 2.0), Point::new(4.0, 2.0));
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], (Point::new(0.0, 2.0), Point::new(0.0, 0.0)));
        assert_eq!(path[1], (Point::new(0.0, 0.0), Point::new(4.0, 0.0)));
        assert_eq!(path[2], (Point::new(4.0, 0.0), Point::new(4.0, 2.0)));
        // Mid-top to mid-top of the same side, forward: a single piece.
        let short = boundary_path(&r, Point::new(1.0, 0.0), Point::new(3.0, 0.0));
        assert_eq!(short.len(), 1);
        assert_eq!(short[0], (Point::new(1.0, 0.0), Point::new(3.0, 0.0)));
    }

    #[test]
    fn seg_blocks_respects_touching_boundaries() {
        let rect = Rect::new(0.0, 0.0, 4.0, 4.0);
        // Crossing through the interior blocks.
        let crossing = Segment::new(Point::new(-1.0, 2.0), Point::new(5.0, 2.0));
        assert!(seg_blocks(&crossing, &rect));
        // A segment along the rect's bottom with the interior above (West
        // heading) means packed material inside the rect: blocked.
        let facing = Segment::new(Point::new(3.0, 4.0), Point::new(1.0, 4.0));
        assert!(seg_blocks(&facing, &rect));
        // Same line, East heading: interior below, rect above. Touching.
        let tangent = Segment::new(Point::new(1.0, 4.0), Point::new(3.0, 4.0));
        assert!(!seg_blocks(&tangent, &rect));
        // Corner-only contact never blocks.
        let corner = Segment::new(Point::new(4.0, 4.0), Point::new(4.0, 8.0));
        assert!(!seg_blocks(&corner, &rect));
    }

    #[test]
    fn notches_get_filled() {
        // An L-shaped silhouette (tall column, then a square beside it)
        // leaves a notch that the next square should fill at zero cost.
        let mut p = RectPacker::new(PackShape::Rectangular, 1.0);
        let rects = place_all(
            &mut p,
            &[
                Size::new(1.0, 1.0),
                Size::new(1.0, 1.0),
                Size::new(1.0, 1.0),
                Size::new(1.0, 1.0),
            ],
        );
        // Tiled 2x2: the union area equals the bounds area.
        let area: f64 = rects.iter().map(Rect::area).sum();
        assert!((p.bounds().area() - area).abs() < 1e-9);
    }

    #[test]
    fn degenerate_thin_rects_still_pack() {
        let mut p = RectPacker::new(PackShape::Elliptical, 1.0);
        let rects = place_all(
            &mut p,
            &[
                Size::new(10.0, 0.1),
                Size::new(0.1, 10.0),
                Size::new(10.0, 0.1),
            ],
        );
        for i in 0..rects.len() {
            for j in (i + 1)..rects.len() {
                assert_eq!(overlap_area(&rects[i], &rects[j]), 0.0);
            }
        }
    }

    #[test]
    fn placements_are_deterministic() {
        let sizes: Vec<Size> = (0_u32..20)
            .map(|i| Size::new(2.0 + f64::from(i % 4), 2.0 + f64::from(i % 3)))
            .collect();
        let mut p1 = RectPacker::new(PackShape::Elliptical, 1.0);
        let mut p2 = RectPacker::new(PackShape::Elliptical, 1.0);
        assert_eq!(place_all(&mut p1, &sizes), place_all(&mut p2, &sizes));
    }

    #[test]
    fn bounds_track_the_silhouette() {
        let mut p = RectPacker::new(PackShape::Rectangular, 1.0);
        let mut rects = vec![];
        for &s in &[Size::new(6.0, 2.0), Size::new(2.0, 2.0), Size::new(2.0, 2.0)] {
            rects.push(p.place(s).unwrap());
        }
        let mut union = rects[0];
        for r in &rects[1..] {
            union = union.union(*r);
        }
        let b = p.bounds();
        assert!((b.x0 - union.x0).abs() < 1e-9);
        assert!((b.y0 - union.y0).abs() < 1e-9);
        assert!((b.x1 - union.x1).abs() < 1e-9);
        assert!((b.y1 - union.y1).abs() < 1e-9);
    }
}
