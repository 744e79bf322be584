// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive bounds type and helpers.

/// Axis-aligned bounding box over `f64`.
///
/// Zero-width or zero-height boxes are valid and fully supported; callers
/// such as a perimeter packer store boundary segments as degenerate boxes
/// with one zero extent. Coordinates are assumed to be finite (no NaNs);
/// debug builds may assert.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2D {
    /// Minimum x (left)
    pub min_x: f64,
    /// Minimum y (top)
    pub min_y: f64,
    /// Maximum x (right)
    pub max_x: f64,
    /// Maximum y (bottom)
    pub max_y: f64,
}

impl Aabb2D {
    /// Create a new AABB from min/max corners.
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Create an AABB from origin and size.
    pub const fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + w,
            max_y: y + h,
        }
    }

    /// Midpoint of the x extent.
    pub fn center_x(&self) -> f64 {
        0.5 * (self.min_x + self.max_x)
    }

    /// Midpoint of the y extent.
    pub fn center_y(&self) -> f64 {
        0.5 * (self.min_y + self.max_y)
    }

    /// Whether this AABB contains the point. Edges count as inside.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.min_x <= x && x <= self.max_x && self.min_y <= y && y <= self.max_y
    }

    /// Whether this AABB fully contains `other`. Shared edges count.
    pub fn contains(&self, other: &Self) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }

    /// The intersection of two AABBs. May be inverted (empty) when disjoint.
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        }
    }

    /// Return true if the AABB is inverted (no extent on some axis). Assumes no NaN.
    ///
    /// A degenerate box with `max == min` on an axis is *not* empty; touching
    /// boxes therefore count as overlapping in [`Self::overlaps`].
    pub fn is_empty(&self) -> bool {
        self.max_x < self.min_x || self.max_y < self.min_y
    }

    /// Whether two AABBs overlap (shared edges count).
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.intersect(other).is_empty()
    }

    /// The union of two AABBs.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}
