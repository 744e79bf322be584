// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned perimeter segments and their headings.
//!
//! The rectangle packer maintains the boundary of the packed region as a
//! clockwise cycle of segments. Coordinates are y-down, so "clockwise" here
//! means the packed interior lies to the right of each segment's direction
//! of travel.

use canopy_index::{Aabb2D, Key};
use kurbo::{Point, Vec2};

/// Travel direction of an axis-aligned segment, in y-down coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Heading {
    /// +x.
    East,
    /// +y (down the screen).
    South,
    /// -x.
    West,
    /// -y (up the screen).
    North,
}

impl Heading {
    /// Classify a nonzero axis-aligned delta. The dominant axis wins, so
    /// near-degenerate segments still classify deterministically.
    pub(crate) fn from_delta(d: Vec2) -> Self {
        if d.x.abs() >= d.y.abs() {
            if d.x >= 0.0 { Self::East } else { Self::West }
        } else if d.y >= 0.0 {
            Self::South
        } else {
            Self::North
        }
    }

    /// Unit direction of travel.
    pub(crate) const fn delta(self) -> Vec2 {
        match self {
            Self::East => Vec2::new(1.0, 0.0),
            Self::South => Vec2::new(0.0, 1.0),
            Self::West => Vec2::new(-1.0, 0.0),
            Self::North => Vec2::new(0.0, -1.0),
        }
    }

    /// Unit normal pointing away from the packed interior.
    ///
    /// With the interior on the right of travel, outside is the left:
    /// `(d.y, -d.x)`.
    pub(crate) const fn outward(self) -> Vec2 {
        let d = self.delta();
        Vec2::new(d.y, -d.x)
    }

    pub(crate) const fn opposite(self) -> Self {
        match self {
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::North => Self::South,
        }
    }

    pub(crate) const fn is_horizontal(self) -> bool {
        matches!(self, Self::East | Self::West)
    }
}

/// One axis-aligned edge of the packed-region boundary.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Segment {
    /// Start point, in travel order.
    pub p1: Point,
    /// End point, in travel order.
    pub p2: Point,
    /// Whether the turn INTO this segment (at `p1`) is concave, i.e. the
    /// boundary turns left and the corner opens a notch.
    pub concave_start: bool,
    /// Spatial index entry for this segment, when registered.
    pub key: Option<Key>,
}

impl Segment {
    pub(crate) const fn new(p1: Point, p2: Point) -> Self {
        Self {
            p1,
            p2,
            concave_start: false,
            key: None,
        }
    }

    pub(crate) fn heading(&self) -> Heading {
        Heading::from_delta(self.p2 - self.p1)
    }

    pub(crate) fn bounds(&self) -> Aabb2D {
        Aabb2D::new(
            self.p1.x.min(self.p2.x),
            self.p1.y.min(self.p2.y),
            self.p1.x.max(self.p2.x),
            self.p1.y.max(self.p2.y),
        )
    }

}

/// A left turn (negative cross product in y-down coordinates) is concave:
/// the corner opens away from the packed interior.
pub(crate) fn turn_is_concave(d_in: Vec2, d_out: Vec2) -> bool {
    d_in.cross(d_out) < 0.0
}
