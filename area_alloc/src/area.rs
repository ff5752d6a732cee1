// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handles to areas handed out by an [`AreaAllocator`](crate::AreaAllocator).

use crate::rect::Rect;

const INDEX_MASK: u64 = 0x0000_0000_FFFF_FFFF;
const GENERATION_SHIFT: u32 = 32;

/// Identifies one area handed out by an allocator.
///
/// Ids are unique within the allocator that issued them. The id packs the allocator's internal slot index with the generation of that slot.
/// Slots are reused once an area is freed or merged away, and reuse bumps the
/// generation, so an id never refers to anything but the area it was issued for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AreaId(u64);

impl AreaId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self(u64::from(index) | (u64::from(generation) << GENERATION_SHIFT))
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "both halves are masked or shifted down to 32 bits"
    )]
    pub(crate) fn index(self) -> u32 {
        (self.0 & INDEX_MASK) as u32
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "both halves are masked or shifted down to 32 bits"
    )]
    pub(crate) fn generation(self) -> u32 {
        (self.0 >> GENERATION_SHIFT) as u32
    }

    /// The raw id value, e.g. for use as a key in a caller-side cache.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// A rectangle currently allocated to a caller.
///
/// Two areas with the same geometry are still different areas if they were returned by
/// different calls to [`AreaAllocator::allocate`](crate::AreaAllocator::allocate); the
/// [`id`](Self::id) tells them apart. An area also remembers which allocator issued it,
/// since ids are only unique within one allocator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Area {
    id: AreaId,
    rect: Rect,
    owner: u32,
}

impl Area {
    pub(crate) fn new(id: AreaId, rect: Rect, owner: u32) -> Self {
        Self { id, rect, owner }
    }

    pub(crate) fn owner(&self) -> u32 {
        self.owner
    }

    /// The handle identifying this area.
    pub fn id(&self) -> AreaId {
        self.id
    }

    /// The area's geometry.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Left edge.
    pub fn x(&self) -> u32 {
        self.rect.x
    }

    /// Top edge.
    pub fn y(&self) -> u32 {
        self.rect.y
    }

    /// Width in cells.
    pub fn width(&self) -> u32 {
        self.rect.width
    }

    /// Height in cells.
    pub fn height(&self) -> u32 {
        self.rect.height
    }
}
