// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The packed layout orchestrator.

use alloc::vec::Vec;
use core::cmp::Ordering;
use kurbo::{Rect, Size, Vec2};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::circle;
use crate::rect::RectPacker;
use crate::types::{
    Arrangement, MIN_EXTENT, PackMode, PackShape, Placement, SortMode, SortOrder,
};

/// Fallback target extent when neither size nor viewport provides one.
const DEFAULT_TARGET: f64 = 500.0;

/// Relative tolerance for the fit convergence loop.
const FIT_TOLERANCE: f64 = 1e-4;

const MAX_FIT_PASSES: usize = 24;

/// Packs items into a dense elliptical, rectangular, or spiral cluster.
///
/// Items are plain [`Size`]s; the arrangement reports where each one landed.
/// Invalid values passed to setters are ignored, so a layout is always in a
/// usable state.
///
/// # Example
///
/// ```rust
/// use canopy_pack::{PackedLayout, PackShape};
/// use kurbo::Size;
///
/// let mut layout = PackedLayout::new();
/// layout.set_shape(PackShape::Rectangular).set_has_circular_nodes(true);
/// let arr = layout.arrange(&[Size::new(10.0, 10.0), Size::new(10.0, 10.0)]);
/// assert_eq!(arr.placements().len(), 2);
/// // `arranges_to_origin` puts the cluster's top-left corner at (0, 0).
/// assert_eq!(arr.actual_bounds.origin(), kurbo::Point::ORIGIN);
/// ```
#[derive(Clone, Debug)]
pub struct PackedLayout {
    shape: PackShape,
    mode: PackMode,
    sort_mode: SortMode,
    sort_order: SortOrder,
    comparer: Option<fn(&Size, &Size) -> Ordering>,
    aspect_ratio: f64,
    size: Size,
    spacing: f64,
    has_circular_nodes: bool,
    arranges_to_origin: bool,
}

impl Default for PackedLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl PackedLayout {
    /// A layout with the default options.
    pub fn new() -> Self {
        Self {
            shape: PackShape::Elliptical,
            mode: PackMode::AspectOnly,
            sort_mode: SortMode::None,
            sort_order: SortOrder::Descending,
            comparer: None,
            aspect_ratio: 1.0,
            size: Size::new(DEFAULT_TARGET, DEFAULT_TARGET),
            spacing: 0.0,
            has_circular_nodes: false,
            arranges_to_origin: true,
        }
    }

    /// The target silhouette.
    pub fn shape(&self) -> PackShape {
        self.shape
    }

    /// Set the target silhouette.
    pub fn set_shape(&mut self, shape: PackShape) -> &mut Self {
        self.shape = shape;
        self
    }

    /// How the target size participates in packing.
    pub fn mode(&self) -> PackMode {
        self.mode
    }

    /// Set how the target size participates in packing.
    pub fn set_mode(&mut self, mode: PackMode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// The measure ordering items before packing.
    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    /// Set the measure ordering items before packing.
    pub fn set_sort_mode(&mut self, sort_mode: SortMode) -> &mut Self {
        self.sort_mode = sort_mode;
        self
    }

    /// Direction of the pre-pack sort.
    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Set the direction of the pre-pack sort.
    pub fn set_sort_order(&mut self, sort_order: SortOrder) -> &mut Self {
        self.sort_order = sort_order;
        self
    }

    /// Custom comparison for the pre-pack sort. Used instead of the
    /// [`SortMode`] measure whenever sorting is enabled.
    pub fn set_comparer(&mut self, comparer: Option<fn(&Size, &Size) -> Ordering>) -> &mut Self {
        self.comparer = comparer;
        self
    }

    /// The target width / height ratio of the silhouette.
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    /// Target width / height ratio of the silhouette. Ignored unless finite
    /// and positive. Has no effect on [`PackShape::Spiral`].
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f64) -> &mut Self {
        if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
            self.aspect_ratio = aspect_ratio;
        }
        self
    }

    /// The target size for the fitting modes.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Target size for [`PackMode::Fit`] and [`PackMode::ExpandToFit`].
    ///
    /// Both dimensions must be finite and positive, except that a size of
    /// `NaN x NaN` means "fill the viewport passed to
    /// [`PackedLayout::arrange_in`]". Anything else is ignored.
    pub fn set_size(&mut self, size: Size) -> &mut Self {
        let valid = (size.width.is_finite() && size.width > 0.0)
            && (size.height.is_finite() && size.height > 0.0);
        let fill_viewport = size.width.is_nan() && size.height.is_nan();
        if valid || fill_viewport {
            self.size = size;
        }
        self
    }

    /// The configured gap between items.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Gap to keep between items. Negative values overlap them. Ignored
    /// unless finite.
    pub fn set_spacing(&mut self, spacing: f64) -> &mut Self {
        if spacing.is_finite() {
            self.spacing = spacing;
        }
        self
    }

    /// Whether items are packed as circles.
    pub fn has_circular_nodes(&self) -> bool {
        self.has_circular_nodes
    }

    /// Treat every item as a circle of diameter `max(width, height)`.
    pub fn set_has_circular_nodes(&mut self, circular: bool) -> &mut Self {
        self.has_circular_nodes = circular;
        self
    }

    /// Whether the finished arrangement is translated to the origin.
    pub fn arranges_to_origin(&self) -> bool {
        self.arranges_to_origin
    }

    /// When set, the arrangement is translated so its bounds' top-left
    /// corner lands on the origin. Otherwise positions stay in packing
    /// coordinates, centered around the seed item.
    pub fn set_arranges_to_origin(&mut self, arranges_to_origin: bool) -> &mut Self {
        self.arranges_to_origin = arranges_to_origin;
        self
    }

    /// Pack `items` with the configured options.
    pub fn arrange(&self, items: &[Size]) -> Arrangement {
        self.arrange_in(items, None)
    }

    /// Pack `items`, resolving a fill-viewport target size against
    /// `viewport`.
    pub fn arrange_in(&self, items: &[Size], viewport: Option<Size>) -> Arrangement {
        self.arrange_with(items, viewport, |_| {})
    }

    /// Like [`PackedLayout::arrange_in`], but runs `hook` on the finished
    /// arrangement before the final translation to the origin, while
    /// positions are still in packing coordinates.
    pub fn arrange_with(
        &self,
        items: &[Size],
        viewport: Option<Size>,
        hook: impl FnOnce(&mut Arrangement),
    ) -> Arrangement {
        // Working set: coerce degenerate extents, refuse non-finite ones.
        let mut work: Vec<(usize, Size)> = Vec::with_capacity(items.len());
        let mut unplaced: Vec<usize> = Vec::new();
        for (i, sz) in items.iter().enumerate() {
            if !(sz.width.is_finite() && sz.height.is_finite()) {
                unplaced.push(i);
                continue;
            }
            let w = if sz.width > 0.0 { sz.width } else { MIN_EXTENT };
            let h = if sz.height > 0.0 { sz.height } else { MIN_EXTENT };
            work.push((i, Size::new(w, h)));
        }

        if self.sort_mode != SortMode::None {
            let measure = |s: &Size| match self.sort_mode {
                SortMode::MaxSide => s.width.max(s.height),
                SortMode::Area => s.width * s.height,
                SortMode::None => 0.0,
            };
            work.sort_by(|a, b| {
                let ord = match self.comparer {
                    Some(cmp) => cmp(&a.1, &b.1),
                    None => measure(&a.1)
                        .partial_cmp(&measure(&b.1))
                        .unwrap_or(Ordering::Equal),
                };
                match self.sort_order {
                    SortOrder::Ascending => ord,
                    SortOrder::Descending => ord.reverse(),
                }
            });
        }

        let mut spacing = self.spacing;
        let (mut placements, mut pass_unplaced, mut bounds) = self.run_pass(&work, spacing);

        if self.mode != PackMode::AspectOnly && !work.is_empty() {
            let target = self.resolve_target(viewport);
            let mut max_item = 0.0_f64;
            let mut avg_w = 0.0;
            let mut avg_h = 0.0;
            let mut count = 0.0;
            for (_, s) in &work {
                max_item = max_item.max(s.width.max(s.height));
                avg_w += s.width;
                avg_h += s.height;
                count += 1.0;
            }
            avg_w /= count;
            avg_h /= count;

            let mut prev: Option<(f64, f64)> = None;
            for _ in 0..MAX_FIT_PASSES {
                let ratio_w = bounds.width() / target.width;
                let ratio_h = bounds.height() / target.height;
                let (measured, goal, avg) = if ratio_w >= ratio_h {
                    (bounds.width(), target.width, avg_w)
                } else {
                    (bounds.height(), target.height, avg_h)
                };
                let done = match self.mode {
                    PackMode::Fit => measured <= goal * (1.0 + FIT_TOLERANCE),
                    _ => (measured - goal).abs() <= goal * FIT_TOLERANCE,
                };
                if done {
                    break;
                }
                // First correction spreads the error over the estimated item
                // count across the binding axis; afterwards a secant step on
                // the two latest (spacing, measured) samples converges fast
                // because measured size is close to linear in spacing.
                let mut next = match prev {
                    Some((s0, m0)) if (measured - m0).abs() > 1e-12 => {
                        spacing + (goal - measured) * (spacing - s0) / (measured - m0)
                    }
                    _ => {
                        let across = (measured / avg.max(MIN_EXTENT)).ceil().max(1.0);
                        spacing + (goal - measured) / across
                    }
                };
                if !next.is_finite() {
                    next = -max_item;
                }
                if self.mode == PackMode::Fit {
                    next = next.min(0.0);
                }
                next = next.max(-max_item);
                if (next - spacing).abs() < 1e-12 {
                    break;
                }
                prev = Some((spacing, measured));
                spacing = next;
                let out = self.run_pass(&work, spacing);
                placements = out.0;
                pass_unplaced = out.1;
                bounds = out.2;
            }

            // Fit must not overflow the target even if the loop ran out of
            // passes; collapse spacing to the floor as a last resort.
            if self.mode == PackMode::Fit
                && (bounds.width() > target.width * (1.0 + FIT_TOLERANCE)
                    || bounds.height() > target.height * (1.0 + FIT_TOLERANCE))
            {
                spacing = -max_item;
                let out = self.run_pass(&work, spacing);
                placements = out.0;
                pass_unplaced = out.1;
                bounds = out.2;
            }
        }

        placements.sort_by_key(|p| p.index);
        unplaced.extend(pass_unplaced);
        unplaced.sort_unstable();

        let mut arr = Arrangement {
            placements,
            unplaced,
            actual_spacing: spacing,
            actual_bounds: bounds,
            circular: self.has_circular_nodes,
        };
        hook(&mut arr);

        if self.arranges_to_origin && !arr.placements.is_empty() {
            let shift = Vec2::new(-arr.actual_bounds.x0, -arr.actual_bounds.y0);
            for p in &mut arr.placements {
                p.rect = p.rect + shift;
            }
            arr.actual_bounds = arr.actual_bounds + shift;
        }
        arr
    }

    /// One packing pass at a given spacing.
    fn run_pass(&self, work: &[(usize, Size)], spacing: f64) -> (Vec<Placement>, Vec<usize>, Rect) {
        let mut unplaced = Vec::new();
        let placements = if self.has_circular_nodes {
            circle::pack(work, spacing, self.shape, self.aspect_ratio)
        } else {
            let mut packer = RectPacker::new(self.shape, self.aspect_ratio);
            let mut out = Vec::with_capacity(work.len());
            for &(index, sz) in work {
                let eff = Size::new(
                    (sz.width + spacing).max(MIN_EXTENT),
                    (sz.height + spacing).max(MIN_EXTENT),
                );
                match packer.place(eff) {
                    Some(r) => out.push(Placement {
                        index,
                        rect: Rect::from_center_size(r.center(), sz),
                    }),
                    None => unplaced.push(index),
                }
            }
            out
        };
        let bounds = placements
            .iter()
            .map(|p| p.rect)
            .reduce(|a, b| a.union(b))
            .unwrap_or(Rect::ZERO);
        (placements, unplaced, bounds)
    }

    fn resolve_target(&self, viewport: Option<Size>) -> Size {
        let want = if self.size.width.is_nan() || self.size.height.is_nan() {
            viewport.unwrap_or(Size::new(DEFAULT_TARGET, DEFAULT_TARGET))
        } else {
            self.size
        };
        let dim = |v: f64| if v.is_finite() && v > 0.0 { v } else { DEFAULT_TARGET };
        Size::new(dim(want.width), dim(want.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn defaults() {
        let l = PackedLayout::new();
        assert_eq!(l.shape(), PackShape::Elliptical);
        assert_eq!(l.mode(), PackMode::AspectOnly);
        assert_eq!(l.sort_mode(), SortMode::None);
        assert_eq!(l.sort_order(), SortOrder::Descending);
        assert_eq!(l.aspect_ratio(), 1.0);
        assert_eq!(l.size(), Size::new(500.0, 500.0));
        assert_eq!(l.spacing(), 0.0);
        assert!(!l.has_circular_nodes());
        assert!(l.arranges_to_origin());
    }

    #[test]
    fn setters_ignore_invalid_values() {
        let mut l = PackedLayout::new();
        l.set_aspect_ratio(-2.0)
            .set_aspect_ratio(f64::NAN)
            .set_spacing(f64::INFINITY)
            .set_size(Size::new(0.0, 10.0))
            .set_size(Size::new(10.0, f64::NAN));
        assert_eq!(l.aspect_ratio(), 1.0);
        assert_eq!(l.spacing(), 0.0);
        assert_eq!(l.size(), Size::new(500.0, 500.0));
        // The NaN x NaN sentinel is the one non-finite size accepted.
        l.set_size(Size::new(f64::NAN, f64::NAN));
        assert!(l.size().width.is_nan() && l.size().height.is_nan());
    }

    #[test]
    fn two_circles_touch_on_a_horizontal_line() {
        let mut l = PackedLayout::new();
        l.set_has_circular_nodes(true);
        let arr = l.arrange(&[Size::new(10.0, 10.0), Size::new(10.0, 10.0)]);
        let c0 = arr.rect_for(0).unwrap().center();
        let c1 = arr.rect_for(1).unwrap().center();
        assert!((c0.distance(c1) - 10.0).abs() < 1e-9);
        assert!((c0.y - c1.y).abs() < 1e-9);
        assert_eq!(arr.actual_bounds.origin(), Point::ORIGIN);
        assert!((arr.actual_bounds.width() - 20.0).abs() < 1e-9);
        assert!((arr.actual_bounds.height() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn four_unit_squares_tile_two_by_two() {
        let mut l = PackedLayout::new();
        l.set_shape(PackShape::Rectangular);
        let arr = l.arrange(&[Size::new(1.0, 1.0); 4]);
        assert_eq!(arr.placements().len(), 4);
        assert!(arr.unplaced.is_empty());
        assert_eq!(arr.actual_bounds, Rect::new(0.0, 0.0, 2.0, 2.0));
        for p in arr.placements() {
            let r = p.rect;
            assert!(r.x0 >= -1e-9 && r.x1 <= 2.0 + 1e-9);
            assert!(r.y0 >= -1e-9 && r.y1 <= 2.0 + 1e-9);
        }
    }

    #[test]
    fn single_rect_lands_on_the_origin() {
        let arr = PackedLayout::new().arrange(&[Size::new(50.0, 30.0)]);
        assert_eq!(arr.rect_for(0), Some(Rect::new(0.0, 0.0, 50.0, 30.0)));
        assert_eq!(arr.actual_bounds, Rect::new(0.0, 0.0, 50.0, 30.0));
    }

    #[test]
    fn expand_to_fit_hits_the_target_size() {
        let mut l = PackedLayout::new();
        l.set_has_circular_nodes(true)
            .set_mode(PackMode::ExpandToFit)
            .set_size(Size::new(200.0, 200.0));
        let arr = l.arrange(&[Size::new(20.0, 20.0); 10]);
        let b = arr.actual_bounds;
        let dominant = b.width().max(b.height());
        assert!(
            (dominant - 200.0).abs() <= 200.0 * 1e-3,
            "dominant axis {dominant} missed the target"
        );
        assert!(arr.actual_spacing > 0.0, "expansion needs positive spacing");
    }

    #[test]
    fn fit_shrinks_spacing_until_it_fits() {
        let mut l = PackedLayout::new();
        l.set_shape(PackShape::Rectangular)
            .set_mode(PackMode::Fit)
            .set_size(Size::new(300.0, 300.0));
        let arr = l.arrange(&[Size::new(80.0, 60.0); 20]);
        assert_eq!(arr.placements().len(), 20);
        let b = arr.actual_bounds;
        assert!(b.width() <= 300.0 * 1.001, "width {} overflows", b.width());
        assert!(b.height() <= 300.0 * 1.001, "height {} overflows", b.height());
        assert!(arr.actual_spacing <= 0.0, "fit never expands spacing");
    }

    #[test]
    fn fill_viewport_sentinel_uses_the_viewport() {
        let mut l = PackedLayout::new();
        l.set_has_circular_nodes(true)
            .set_mode(PackMode::Fit)
            .set_size(Size::new(f64::NAN, f64::NAN));
        let arr = l.arrange_in(&[Size::new(30.0, 30.0); 6], Some(Size::new(100.0, 50.0)));
        let b = arr.actual_bounds;
        assert!(b.width() <= 100.1);
        assert!(b.height() <= 50.1);
    }

    #[test]
    fn non_finite_items_are_reported_unplaced() {
        let arr = PackedLayout::new().arrange(&[
            Size::new(50.0, 30.0),
            Size::new(f64::NAN, 10.0),
            Size::new(20.0, 20.0),
        ]);
        assert_eq!(arr.unplaced, [1]);
        assert_eq!(arr.placements().len(), 2);
        assert!(arr.rect_for(0).is_some());
        assert!(arr.rect_for(2).is_some());
    }

    #[test]
    fn sort_order_changes_the_pack_order() {
        let sizes = [
            Size::new(10.0, 10.0),
            Size::new(20.0, 20.0),
            Size::new(30.0, 30.0),
        ];
        let mut l = PackedLayout::new();
        l.set_has_circular_nodes(true).set_sort_mode(SortMode::MaxSide);

        // Descending: the two largest are seeded first, tangent to each
        // other, 25 apart.
        let arr = l.arrange(&sizes);
        let d = arr
            .rect_for(2)
            .unwrap()
            .center()
            .distance(arr.rect_for(1).unwrap().center());
        assert!((d - 25.0).abs() < 1e-9);

        // Ascending: the two smallest seed instead, 15 apart.
        l.set_sort_order(SortOrder::Ascending);
        let arr = l.arrange(&sizes);
        let d = arr
            .rect_for(0)
            .unwrap()
            .center()
            .distance(arr.rect_for(1).unwrap().center());
        assert!((d - 15.0).abs() < 1e-9);
    }

    #[test]
    fn sorting_a_presorted_input_changes_nothing() {
        // Strictly decreasing areas: descending area sort is the identity,
        // so the packed geometry matches the unsorted run exactly.
        let sizes = [
            Size::new(30.0, 30.0),
            Size::new(25.0, 25.0),
            Size::new(20.0, 20.0),
            Size::new(15.0, 15.0),
            Size::new(10.0, 10.0),
        ];
        let mut l = PackedLayout::new();
        l.set_shape(PackShape::Rectangular);
        let plain = l.arrange(&sizes);
        l.set_sort_mode(SortMode::Area);
        let sorted = l.arrange(&sizes);
        assert_eq!(plain.placements(), sorted.placements());
    }

    #[test]
    fn custom_comparer_overrides_the_measure() {
        let sizes = [Size::new(10.0, 1.0), Size::new(5.0, 8.0)];
        let mut l = PackedLayout::new();
        l.set_has_circular_nodes(true)
            .set_sort_mode(SortMode::MaxSide)
            .set_sort_order(SortOrder::Ascending)
            .set_comparer(Some(|a, b| a.height.partial_cmp(&b.height).unwrap()));
        // By height ascending, item 0 (height 1) packs first; the seed pair
        // distance is the sum of the two radii: 10/2 + 8/2.
        let arr = l.arrange(&sizes);
        let d = arr
            .rect_for(0)
            .unwrap()
            .center()
            .distance(arr.rect_for(1).unwrap().center());
        assert!((d - 9.0).abs() < 1e-9);
    }

    #[test]
    fn rect_spacing_leaves_gaps() {
        let mut l = PackedLayout::new();
        l.set_shape(PackShape::Rectangular).set_spacing(4.0);
        let arr = l.arrange(&[Size::new(10.0, 10.0), Size::new(10.0, 10.0)]);
        let c0 = arr.rect_for(0).unwrap().center();
        let c1 = arr.rect_for(1).unwrap().center();
        let dx = (c1.x - c0.x).abs();
        let dy = (c1.y - c0.y).abs();
        // Flush on one axis with a 4 unit gap between the 10 unit items.
        assert!(
            ((dx - 14.0).abs() < 1e-9 && dy < 1e-9)
                || ((dy - 14.0).abs() < 1e-9 && dx < 1e-9),
            "unexpected offsets dx={dx} dy={dy}"
        );
    }

    #[test]
    fn packing_coordinates_without_origin_translation() {
        let mut l = PackedLayout::new();
        l.set_has_circular_nodes(true).set_arranges_to_origin(false);
        let arr = l.arrange(&[Size::new(10.0, 10.0)]);
        // The seed circle stays centered on the origin.
        assert_eq!(arr.rect_for(0), Some(Rect::new(-5.0, -5.0, 5.0, 5.0)));
    }

    #[test]
    fn hook_runs_before_origin_translation() {
        let mut l = PackedLayout::new();
        l.set_has_circular_nodes(true);
        let mut seen = Rect::ZERO;
        let arr = l.arrange_with(&[Size::new(10.0, 10.0)], None, |a| {
            seen = a.actual_bounds;
        });
        assert_eq!(seen, Rect::new(-5.0, -5.0, 5.0, 5.0));
        assert_eq!(arr.actual_bounds, Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn enclosing_circle_covers_every_item() {
        let mut l = PackedLayout::new();
        l.set_has_circular_nodes(true);
        let sizes: Vec<Size> = (0_u32..12)
            .map(|i| {
                let d = 6.0 + f64::from(i % 4) * 5.0;
                Size::new(d, d)
            })
            .collect();
        let arr = l.arrange(&sizes);
        let c = arr.enclosing_circle().unwrap();
        for p in arr.placements() {
            let r = p.rect.width().max(p.rect.height()) / 2.0;
            let d = p.rect.center().distance(c.center);
            assert!(d + r <= c.radius + 1e-6, "item {} escapes", p.index);
        }
    }

    #[test]
    fn empty_input_yields_an_empty_arrangement() {
        let arr = PackedLayout::new().arrange(&[]);
        assert!(arr.placements().is_empty());
        assert!(arr.unplaced.is_empty());
        assert_eq!(arr.actual_bounds, Rect::ZERO);
        assert!(arr.enclosing_circle().is_none());
    }
}
