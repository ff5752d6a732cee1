// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by the allocator.

use thiserror::Error;

use crate::area::AreaId;
use crate::rect::Rect;

/// Errors that can occur during allocation or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocError {
    /// The requested size has a zero dimension, or overflows once aligned.
    #[error("Invalid allocation size {width}x{height}")]
    InvalidSize {
        /// The requested width.
        width: u32,
        /// The requested height.
        height: u32,
    },
    /// No free area can hold the request, even after coalescing.
    #[error("No free area can hold {width}x{height}")]
    OutOfSpace {
        /// The width that was searched for, after alignment.
        width: u32,
        /// The height that was searched for, after alignment.
        height: u32,
    },
    /// The area is not currently allocated: it was already freed, or it came from
    /// another allocator or from before a [`clear`](crate::AreaAllocator::clear).
    #[error("Area {0:?} is not currently allocated")]
    NotAllocated(AreaId),
}

/// A broken allocator invariant, as reported by
/// [`AreaAllocator::validate`](crate::AreaAllocator::validate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantError {
    /// A tracked area has a zero dimension.
    #[error("Tracked area {0:?} is empty")]
    EmptyArea(Rect),
    /// A tracked area sticks out of the allocator's bounds.
    #[error("Area {area:?} lies outside bounds {bounds:?}")]
    OutOfBounds {
        /// The offending area.
        area: Rect,
        /// The allocator's bounds.
        bounds: Rect,
    },
    /// Two tracked areas share cells.
    #[error("Areas {0:?} and {1:?} overlap")]
    Overlap(Rect, Rect),
    /// The tracked areas do not cover the bounds exactly.
    #[error("Areas cover {covered} cells, bounds hold {total}")]
    CoverageMismatch {
        /// Cells covered by free and allocated areas together.
        covered: u64,
        /// Cells inside the bounds.
        total: u64,
    },
    /// The bookkeeping count of allocated areas disagrees with the tracked slots.
    #[error("Allocation count is {recorded} but {actual} areas are allocated")]
    CountMismatch {
        /// The count kept by the allocator.
        recorded: usize,
        /// The number of slots in the allocated state.
        actual: usize,
    },
}
