// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_pack --heading-base-level=0

//! Canopy Pack: a packed layout engine for circles and rectangles.
//!
//! [`PackedLayout`] arranges a list of item sizes into a dense cluster with a
//! chosen silhouette. Items are packed one at a time:
//!
//! - Circular items go on a greedy front chain, each new circle tangent to
//!   two circles on the chain, with the chain re-anchored at the tangent pair
//!   closest to the origin.
//! - Rectangular items go against the packing's perimeter, a clockwise ring
//!   of axis-aligned segments; candidate positions slide along each segment
//!   and the cheapest non-colliding one wins. Collision tests run against a
//!   [`canopy_index`] spatial index over the perimeter segments.
//!
//! The silhouette is steered by [`PackShape`] and a width/height aspect
//! ratio, and [`PackMode`] can additionally grow or shrink the spacing
//! between items until the cluster matches a target size. The smallest circle
//! enclosing a finished arrangement is available through
//! [`Arrangement::enclosing_circle`], or directly from the [`enclose`]
//! module.
//!
//! Layouts are deterministic: the same inputs and options always produce the
//! same arrangement.
//!
//! # Example
//!
//! ```rust
//! use canopy_pack::{PackMode, PackShape, PackedLayout};
//! use kurbo::Size;
//!
//! // Pack twenty cards into (at most) a 400 x 300 area.
//! let mut layout = PackedLayout::new();
//! layout
//!     .set_shape(PackShape::Rectangular)
//!     .set_mode(PackMode::Fit)
//!     .set_size(Size::new(400.0, 300.0))
//!     .set_spacing(2.0);
//! let arr = layout.arrange(&[Size::new(60.0, 40.0); 20]);
//!
//! assert_eq!(arr.placements().len(), 20);
//! assert!(arr.actual_bounds.width() <= 400.5);
//! assert!(arr.actual_bounds.height() <= 300.5);
//! ```
//!
//! Circular items pack tighter when sorted largest-first:
//!
//! ```rust
//! use canopy_pack::{PackedLayout, SortMode};
//! use kurbo::Size;
//!
//! let mut layout = PackedLayout::new();
//! layout.set_has_circular_nodes(true).set_sort_mode(SortMode::MaxSide);
//! let sizes: Vec<Size> = (1..=15).map(|i| Size::new(f64::from(i) * 4.0, f64::from(i) * 4.0)).collect();
//! let arr = layout.arrange(&sizes);
//! assert!(arr.enclosing_circle().is_some());
//! ```

#![no_std]

extern crate alloc;

mod circle;
mod rect;
mod ring;
mod segment;

pub mod enclose;
pub mod layout;
pub mod types;

pub use layout::PackedLayout;
pub use types::{Arrangement, PackMode, PackShape, Placement, SortMode, SortOrder};
