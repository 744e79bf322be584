// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Smallest enclosing circle of weighted points.
//!
//! Randomized incremental solver: walk the (shuffled) inputs, and whenever
//! one falls outside the current circle, rebuild the circle from a support
//! basis of at most three discs and restart the walk. Expected linear time.
//! The shuffle uses a fixed-seed LCG so results are reproducible run to run.

use alloc::vec::Vec;
use kurbo::{Circle, Point};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// A point with an optional radius (a disc). Radius zero makes it a point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Weighted {
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Radius; zero for a plain point.
    pub r: f64,
}

impl Weighted {
    /// A disc at `(x, y)` with radius `r`.
    pub const fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }

    /// A zero-radius disc.
    pub const fn point(x: f64, y: f64) -> Self {
        Self { x, y, r: 0.0 }
    }
}

/// Fixed-increment LCG. Layout must be reproducible, so no entropy source.
struct Lcg {
    state: i64,
}

impl Lcg {
    const fn new() -> Self {
        Self {
            state: 123_456_789,
        }
    }

    fn next(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.state as u64
    }
}

fn shuffle(items: &mut [Weighted]) {
    let mut lcg = Lcg::new();
    for i in (1..items.len()).rev() {
        let j = (lcg.next() % (i as u64 + 1)) as usize;
        items.swap(i, j);
    }
}

/// `a` strictly fails to enclose `b`.
fn encloses_not(a: &Weighted, b: &Weighted) -> bool {
    let dr = a.r - b.r;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr < 0.0 || dr * dr < dx * dx + dy * dy
}

/// `a` encloses `b` up to a relative tolerance.
fn encloses_weak(a: &Weighted, b: &Weighted) -> bool {
    let dr = a.r - b.r + a.r.max(b.r).max(1.0) * 1e-9;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

fn encloses_weak_all(a: &Weighted, basis: &[Weighted]) -> bool {
    basis.iter().all(|b| encloses_weak(a, b))
}

/// Circle tangent to both discs, through their outermost points.
fn basis2(a: &Weighted, b: &Weighted) -> Weighted {
    let x21 = b.x - a.x;
    let y21 = b.y - a.y;
    let r21 = b.r - a.r;
    let l = (x21 * x21 + y21 * y21).sqrt();
    Weighted {
        x: (a.x + b.x + x21 / l * r21) / 2.0,
        y: (a.y + b.y + y21 / l * r21) / 2.0,
        r: (l + a.r + b.r) / 2.0,
    }
}

/// Circle tangent to three discs (the Apollonius problem, outer solution).
fn basis3(a: &Weighted, b: &Weighted, c: &Weighted) -> Weighted {
    let (x1, y1, r1) = (a.x, a.y, a.r);
    let (x2, y2, r2) = (b.x, b.y, b.r);
    let (x3, y3, r3) = (c.x, c.y, c.r);
    let a2 = x1 - x2;
    let a3 = x1 - x3;
    let b2 = y1 - y2;
    let b3 = y1 - y3;
    let c2 = r2 - r1;
    let c3 = r3 - r1;
    let d1 = x1 * x1 + y1 * y1 - r1 * r1;
    let d2 = d1 - x2 * x2 - y2 * y2 + r2 * r2;
    let d3 = d1 - x3 * x3 - y3 * y3 + r3 * r3;
    let ab = a3 * b2 - a2 * b3;
    let xa = (b2 * d3 - b3 * d2) / (ab * 2.0) - x1;
    let xb = (b3 * c2 - b2 * c3) / ab;
    let ya = (a3 * d2 - a2 * d3) / (ab * 2.0) - y1;
    let yb = (a2 * c3 - a3 * c2) / ab;
    let qa = xb * xb + yb * yb - 1.0;
    let qb = 2.0 * (r1 + xa * xb + ya * yb);
    let qc = xa * xa + ya * ya - r1 * r1;
    let r = if qa.abs() > 1e-6 {
        -(qb + (qb * qb - 4.0 * qa * qc).sqrt()) / (2.0 * qa)
    } else {
        -(qc / qb)
    };
    Weighted {
        x: x1 + xa + xb * r,
        y: y1 + ya + yb * r,
        r,
    }
}

fn circle_of_basis(basis: &[Weighted]) -> Weighted {
    match basis {
        [a] => *a,
        [a, b] => basis2(a, b),
        [a, b, c] => basis3(a, b, c),
        _ => unreachable!("enclosing-circle basis has 1 to 3 support discs"),
    }
}

/// Grow the support basis to account for `p`, which the current circle
/// failed to enclose.
fn extend_basis(basis: &[Weighted], p: Weighted) -> Vec<Weighted> {
    if encloses_weak_all(&p, basis) {
        return alloc::vec![p];
    }
    // Some single existing support disc plus p may suffice.
    for a in basis {
        if encloses_not(&p, a) && encloses_weak_all(&basis2(a, &p), basis) {
            return alloc::vec![*a, p];
        }
    }
    // Otherwise two of them do.
    for (i, a) in basis.iter().enumerate() {
        for b in &basis[i + 1..] {
            if encloses_not(&basis2(a, b), &p)
                && encloses_not(&basis2(a, &p), b)
                && encloses_not(&basis2(b, &p), a)
                && encloses_weak_all(&basis3(a, b, &p), basis)
            {
                return alloc::vec![*a, *b, p];
            }
        }
    }
    unreachable!("enclosing-circle basis extension failed")
}

/// Smallest circle enclosing every input disc.
///
/// Returns `None` for an empty input. Deterministic for a given input order.
pub fn enclose(items: &[Weighted]) -> Option<Circle> {
    let mut shuffled: Vec<Weighted> = items.to_vec();
    shuffle(&mut shuffled);

    let mut basis: Vec<Weighted> = Vec::new();
    let mut e: Option<Weighted> = None;
    let mut i = 0;
    while i < shuffled.len() {
        let p = shuffled[i];
        match &e {
            Some(c) if encloses_weak(c, &p) => i += 1,
            _ => {
                basis = extend_basis(&basis, p);
                e = Some(circle_of_basis(&basis));
                i = 0;
            }
        }
    }
    e.map(|c| Circle::new(Point::new(c.x, c.y), c.r))
}
