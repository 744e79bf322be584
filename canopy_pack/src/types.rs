// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public configuration enums and layout results.

use alloc::vec::Vec;
use kurbo::{Circle, Rect};

use crate::enclose::{self, Weighted};

/// Geometric tolerance for contact and intersection tests.
///
/// Distances below this count as touching, not overlapping.
pub(crate) const EPSILON: f64 = 1e-7;

/// Items with a non-positive effective extent are coerced to this.
pub(crate) const MIN_EXTENT: f64 = 0.1;

/// Target silhouette the packer steers toward.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PackShape {
    /// Roughly elliptical silhouette honoring the aspect ratio.
    #[default]
    Elliptical,
    /// Roughly rectangular silhouette honoring the aspect ratio.
    Rectangular,
    /// Circles wind outward around the first item; the aspect ratio is
    /// ignored. Rectangles fall back to [`PackShape::Elliptical`] behavior.
    Spiral,
}

/// How the target size participates in packing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PackMode {
    /// Only the aspect ratio steers the shape; size is ignored.
    #[default]
    AspectOnly,
    /// Shrink spacing (never below the configured spacing, never expanding)
    /// until the layout fits inside the target size.
    Fit,
    /// Adjust spacing in either direction until the layout's dominant axis
    /// matches the target size.
    ExpandToFit,
}

/// Which measure orders items before packing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Keep the caller's order.
    #[default]
    None,
    /// Order by the larger of width and height.
    MaxSide,
    /// Order by area.
    Area,
}

/// Direction of the pre-pack sort.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Largest first. Large anchors early give denser packings.
    #[default]
    Descending,
    /// Smallest first.
    Ascending,
}

/// Final position of one input item.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    /// Index of the item in the caller's input slice.
    pub index: usize,
    /// Where the item ended up.
    pub rect: Rect,
}

/// Result of a layout pass.
///
/// Placements are reported in the caller's input order. Items the packer
/// could not place (which only happens in pathological rectangle inputs)
/// are listed in [`Arrangement::unplaced`] and get no placement.
#[derive(Clone, Debug)]
pub struct Arrangement {
    pub(crate) placements: Vec<Placement>,
    /// Input indices that could not be placed.
    pub unplaced: Vec<usize>,
    /// The per-item spacing actually used, after any fit adjustment.
    pub actual_spacing: f64,
    /// Tight bounds of all placed items, without spacing.
    pub actual_bounds: Rect,
    pub(crate) circular: bool,
}

impl Arrangement {
    /// Placements in input-index order.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// The placed rectangle for one input index, if it was placed.
    pub fn rect_for(&self, index: usize) -> Option<Rect> {
        self.placements
            .binary_search_by_key(&index, |p| p.index)
            .ok()
            .map(|i| self.placements[i].rect)
    }

    /// Smallest circle enclosing the arrangement.
    ///
    /// When the layout was packed as circles, each item contributes a disc of
    /// radius `max(w, h) / 2`; otherwise every rectangle corner contributes a
    /// point. Returns `None` for an empty arrangement.
    pub fn enclosing_circle(&self) -> Option<Circle> {
        let mut items = Vec::new();
        if self.circular {
            for p in &self.placements {
                let c = p.rect.center();
                let r = p.rect.width().max(p.rect.height()) / 2.0;
                items.push(Weighted::new(c.x, c.y, r));
            }
        } else {
            for p in &self.placements {
                let r = p.rect;
                items.push(Weighted::point(r.x0, r.y0));
                items.push(Weighted::point(r.x1, r.y0));
                items.push(Weighted::point(r.x1, r.y1));
                items.push(Weighted::point(r.x0, r.y1));
            }
        }
        enclose::enclose(&items)
    }
}
