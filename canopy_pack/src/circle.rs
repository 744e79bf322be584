// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy circle packing along a front chain.
//!
//! Circles are placed one at a time, each tangent to two circles on the
//! "front chain" (the ring of circles currently bounding the packing). When
//! a new circle overlaps part of the chain, the overlapped arc is absorbed
//! into the interior and placement retries against the widened aperture.
//! After each success the chain is rescanned for the tangent pair whose
//! weighted midpoint sits closest to the origin, which keeps the packing
//! round; Spiral mode skips the rescan so growth winds around the seed.

use alloc::vec::Vec;
use kurbo::{Point, Rect, Size};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::ring::Ring;
use crate::types::{EPSILON, MIN_EXTENT, PackShape, Placement};

#[derive(Copy, Clone, Debug)]
struct Disc {
    x: f64,
    y: f64,
    r: f64,
}

fn intersects(a: &Disc, b: &Disc) -> bool {
    let dr = a.r + b.r - EPSILON;
    if dr <= 0.0 {
        return false;
    }
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr * dr > dx * dx + dy * dy
}

/// Position `c` tangent to both `a` and `b`, on the side that keeps the
/// packing winding forward. Coincident centers fall back to stacking `c`
/// tangent to `a` along +x.
fn place(b: &Disc, a: &Disc, c: &mut Disc) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let d2 = dx * dx + dy * dy;
    if d2 > 0.0 {
        let mut a2 = a.r + c.r;
        a2 *= a2;
        let mut b2 = b.r + c.r;
        b2 *= b2;
        if a2 > b2 {
            let x = (d2 + b2 - a2) / (2.0 * d2);
            let y = (b2 / d2 - x * x).max(0.0).sqrt();
            c.x = b.x - x * dx - y * dy;
            c.y = b.y - x * dy + y * dx;
        } else {
            let x = (d2 + a2 - b2) / (2.0 * d2);
            let y = (a2 / d2 - x * x).max(0.0).sqrt();
            c.x = a.x + x * dx - y * dy;
            c.y = a.y + x * dy + y * dx;
        }
    } else {
        c.x = a.x + a.r + c.r;
        c.y = a.y;
    }
}

/// Distance score of a tangent pair: the radius-weighted midpoint of the
/// two circles, measured from the origin, with x discounted by the aspect
/// ratio so wide targets prefer sideways growth.
fn score(a: &Disc, b: &Disc, aspect: f64, shape: PackShape) -> f64 {
    let ab = a.r + b.r;
    let dx = (a.x * b.r + b.x * a.r) / ab / aspect;
    let dy = (a.y * b.r + b.y * a.r) / ab;
    match shape {
        PackShape::Rectangular => (dx * dx).max(dy * dy),
        PackShape::Elliptical | PackShape::Spiral => dx * dx + dy * dy,
    }
}

/// Pack items as circles of diameter `max(w, h) + spacing`.
///
/// Output rectangles keep the original sizes, centered on the computed
/// circle centers, so a positive spacing shows up as gaps between rects.
/// Placements come back in the input slice's order.
pub(crate) fn pack(
    items: &[(usize, Size)],
    spacing: f64,
    shape: PackShape,
    aspect: f64,
) -> Vec<Placement> {
    let n = items.len();
    let mut discs: Vec<Disc> = items
        .iter()
        .map(|(_, sz)| {
            let d = (sz.width.max(sz.height) + spacing).max(MIN_EXTENT);
            Disc {
                x: 0.0,
                y: 0.0,
                r: d / 2.0,
            }
        })
        .collect();

    if n > 1 {
        // First two tangent across the origin.
        discs[0].x = -discs[1].r;
        discs[1].x = discs[0].r;
    }
    if n > 2 {
        let mut c = discs[2];
        place(&discs[1], &discs[0], &mut c);
        discs[2] = c;

        let mut ring: Ring<usize> = Ring::new();
        let mut a_node = ring.push(0);
        let mut b_node = ring.push(1);
        ring.push(2);

        for i in 3..n {
            let mut c = discs[i];
            'fit: loop {
                place(&discs[*ring.get(a_node)], &discs[*ring.get(b_node)], &mut c);

                // Walk outward from the aperture in both directions,
                // absorbing any chain arc the new circle overlaps.
                let mut j = ring.next(b_node);
                let mut k = ring.prev(a_node);
                let mut sj = discs[*ring.get(b_node)].r;
                let mut sk = discs[*ring.get(a_node)].r;
                loop {
                    if sj <= sk {
                        let dj = discs[*ring.get(j)];
                        if intersects(&dj, &c) {
                            ring.remove_between(a_node, j);
                            b_node = j;
                            continue 'fit;
                        }
                        sj += dj.r;
                        j = ring.next(j);
                    } else {
                        let dk = discs[*ring.get(k)];
                        if intersects(&dk, &c) {
                            ring.remove_between(k, b_node);
                            a_node = k;
                            continue 'fit;
                        }
                        sk += dk.r;
                        k = ring.prev(k);
                    }
                    if j == ring.next(k) {
                        break 'fit;
                    }
                }
            }
            discs[i] = c;
            let c_node = ring.insert_after(a_node, i);
            b_node = c_node;

            if shape == PackShape::Spiral {
                continue;
            }
            // Re-anchor at the tangent pair closest to the origin. Starting
            // the scan at the freshly inserted node covers every pair on the
            // chain exactly once, the new circle's own pair included.
            let mut best = c_node;
            let mut best_score = score(
                &discs[*ring.get(c_node)],
                &discs[*ring.get(ring.next(c_node))],
                aspect,
                shape,
            );
            let mut cur = ring.next(c_node);
            while cur != c_node {
                let s = score(
                    &discs[*ring.get(cur)],
                    &discs[*ring.get(ring.next(cur))],
                    aspect,
                    shape,
                );
                if s < best_score {
                    best = cur;
                    best_score = s;
                }
                cur = ring.next(cur);
            }
            a_node = best;
            b_node = ring.next(a_node);
        }
    }

    items
        .iter()
        .zip(&discs)
        .map(|(&(index, sz), d)| Placement {
            index,
            rect: Rect::from_center_size(Point::new(d.x, d.y), sz),
        })
        .collect()
}
