// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A rectangle allocator for packing images into a texture atlas.
//!
//! [`AreaAllocator`] hands out rectangular areas of a fixed-size surface and takes them
//! back. It has no idea what the areas are used for: an atlas typically uploads pixel
//! data into each area it is given and turns the area's position into texture
//! coordinates.
//!
//! # Usage
//!
//! ```
//! use area_alloc::{AreaAllocator, Rect};
//!
//! let mut atlas = AreaAllocator::new(256, 256);
//!
//! let glyph = atlas.allocate(24, 32).expect("fresh atlas has room");
//! assert_eq!(glyph.rect(), Rect::new(0, 0, 24, 32));
//!
//! // Too large for the atlas, no matter what is allocated.
//! assert!(atlas.allocate(512, 16).is_none());
//!
//! atlas.free(glyph).unwrap();
//! ```
//!
//! # Algorithm
//!
//! Allocation is first-fit over a list of free rectangles kept in insertion order. The
//! chosen free rectangle gives up its top-left corner, and what remains of it is put back
//! as up to three rectangles (right, bottom and diagonal). Freeing an area puts it back
//! on the free list unchanged.
//!
//! Fragmentation is only undone when a search fails: the allocator then merges free
//! rectangles that share one full edge, repeating until nothing more merges, and
//! searches once more. Free rectangles that would only combine into an L-shape, or
//! that share only part of an edge, are never merged.
//!
//! The allocator is single-threaded: wrap it in a lock to share it.
//!
//! # Features
//!
//! - `std` (enabled by default): Enables [`AreaAllocator::dump_svg`].
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod allocator;
pub mod area;
pub mod error;
pub mod rect;
#[cfg(feature = "std")]
mod svg;
mod validate;

pub use allocator::{AllocatorOptions, AllocatorStats, AreaAllocator, DEFAULT_OPTIONS};
pub use area::{Area, AreaId};
pub use error::{AllocError, InvariantError};
pub use rect::Rect;
