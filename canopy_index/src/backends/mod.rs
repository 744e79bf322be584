// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial backends.
//!
//! - [`flatvec::FlatVec`]: linear scans; smallest and simplest, good for tiny sets.
//! - [`quadtree::QuadTree`]: region quadtree whose root grows outward on demand;
//!   good when a packer keeps thousands of short boundary segments live.

pub mod flatvec;
pub mod quadtree;
