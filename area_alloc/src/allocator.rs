// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A first-fit rectangle allocator with free-area coalescing.
//!
//! The allocator keeps two sets of rectangles which together tile its bounds exactly:
//! free areas, kept in insertion order, and allocated areas. Allocating takes the first
//! free area large enough for the request, hands out its top-left corner and puts the
//! up to three leftover pieces back at the end of the free list. Freeing never merges
//! anything; fragmentation is only undone when a search fails, by merging free areas that
//! share a full edge and searching once more.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

use log::{debug, trace, warn};

use crate::area::{Area, AreaId};
use crate::error::{AllocError, InvariantError};
use crate::rect::Rect;
use crate::validate;

// ---------------------------------------------------------------------------
// Allocator options
// ---------------------------------------------------------------------------

/// Options to tweak the behavior of an [`AreaAllocator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorOptions {
    /// Round requested widths and heights up to a multiple of these values.
    ///
    /// Default value: `(1, 1)` (no alignment). A zero component is treated as one.
    pub alignment: (u32, u32),
    /// Whether a failed search coalesces the free areas and searches once more.
    ///
    /// Default value: `true`.
    pub coalesce_on_failure: bool,
}

/// The options used by [`AreaAllocator::new`].
pub const DEFAULT_OPTIONS: AllocatorOptions = AllocatorOptions {
    alignment: (1, 1),
    coalesce_on_failure: true,
};

impl Default for AllocatorOptions {
    fn default() -> Self {
        DEFAULT_OPTIONS
    }
}

impl AllocatorOptions {
    fn aligned_size(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        Some((
            align_up(width, self.alignment.0)?,
            align_up(height, self.alignment.1)?,
        ))
    }
}

fn align_up(value: u32, alignment: u32) -> Option<u32> {
    let alignment = alignment.max(1);
    match value % alignment {
        0 => Some(value),
        rem => value.checked_add(alignment - rem),
    }
}

/// Source of the per-allocator tag stored in every [`Area`].
static NEXT_ALLOCATOR_ID: AtomicU32 = AtomicU32::new(0);

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct SlotIndex(u32);

impl SlotIndex {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum SlotState {
    Free,
    Allocated,
    /// Merged away, consumed by an allocation or freed. Waiting for reuse.
    Retired,
}

#[derive(Clone, Debug)]
struct Slot {
    rect: Rect,
    state: SlotState,
    generation: u32,
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// A snapshot of how much of an allocator is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorStats {
    /// Cells inside the bounds.
    pub total_area: u64,
    /// Cells covered by allocated areas.
    pub allocated_area: u64,
    /// Number of allocated areas.
    pub allocated_count: usize,
    /// Number of free areas.
    pub free_area_count: usize,
    /// The free area covering the most cells, first in list order on ties.
    pub largest_free_area: Option<Rect>,
}

impl AllocatorStats {
    /// Calculate usage percentage (0.0 to 1.0).
    pub fn usage_percentage(&self) -> f32 {
        if self.total_area == 0 {
            0.0
        } else {
            self.allocated_area as f32 / self.total_area as f32
        }
    }
}

// ---------------------------------------------------------------------------
// AreaAllocator
// ---------------------------------------------------------------------------

/// A rectangle allocator for packing images into a texture atlas.
///
/// All rectangles are tracked in an arena of slots. A slot whose area is consumed by an
/// allocation, freed or merged away is retired and later reused under a new generation,
/// so the geometry behind a slot never changes while it is live and stale [`AreaId`]s
/// are always rejected.
///
/// The allocator does no internal synchronization; all mutation goes through `&mut self`.
pub struct AreaAllocator {
    /// Tags handed-out areas so that areas from another allocator are rejected.
    id: u32,
    bounds: Rect,
    options: AllocatorOptions,
    slots: Vec<Slot>,
    retired: Vec<SlotIndex>,
    /// Free areas in insertion order; the search is first-fit over this list.
    free_areas: Vec<SlotIndex>,
    allocated_count: usize,
}

impl AreaAllocator {
    /// Create an allocator covering `width` by `height` cells, with default options.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_options(width, height, &DEFAULT_OPTIONS)
    }

    /// Create an allocator covering `width` by `height` cells.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_options(width: u32, height: u32, options: &AllocatorOptions) -> Self {
        assert!(width > 0, "allocator width must be positive");
        assert!(height > 0, "allocator height must be positive");

        let bounds = Rect::from_size(width, height);
        Self {
            id: NEXT_ALLOCATOR_ID.fetch_add(1, Ordering::Relaxed),
            bounds,
            options: *options,
            slots: vec![Slot {
                rect: bounds,
                state: SlotState::Free,
                generation: 0,
            }],
            retired: Vec::new(),
            free_areas: vec![SlotIndex(0)],
            allocated_count: 0,
        }
    }

    /// Allocate a `width` by `height` area.
    ///
    /// Returns `None` if no free area can hold the request even after coalescing. A
    /// request with a zero dimension also returns `None` and is logged as misuse; use
    /// [`try_allocate`](Self::try_allocate) to tell the two apart.
    pub fn allocate(&mut self, width: u32, height: u32) -> Option<Area> {
        match self.try_allocate(width, height) {
            Ok(area) => Some(area),
            Err(AllocError::OutOfSpace { .. }) => None,
            Err(err) => {
                warn!("Rejected allocation: {err}");
                None
            }
        }
    }

    /// Allocate a `width` by `height` area, reporting why it failed if it did.
    ///
    /// The area is carved from the top-left corner of the first free area, in list order,
    /// that is at least as wide and as tall as the request. What is left of that free area
    /// goes back to the end of the list as up to three pieces (right, bottom and diagonal).
    pub fn try_allocate(&mut self, width: u32, height: u32) -> Result<Area, AllocError> {
        if width == 0 || height == 0 {
            return Err(AllocError::InvalidSize { width, height });
        }
        let (aligned_width, aligned_height) = self
            .options
            .aligned_size(width, height)
            .ok_or(AllocError::InvalidSize { width, height })?;
        let out_of_space = AllocError::OutOfSpace {
            width: aligned_width,
            height: aligned_height,
        };

        let position = match self.find_free_area(aligned_width, aligned_height) {
            Some(position) => position,
            None if self.options.coalesce_on_failure => {
                self.coalesce();
                self.find_free_area(aligned_width, aligned_height)
                    .ok_or(out_of_space)
                    .inspect_err(|err| debug!("{err}"))?
            }
            None => {
                debug!("{out_of_space}");
                return Err(out_of_space);
            }
        };

        let chosen_index = self.free_areas.remove(position);
        let chosen = self.retire(chosen_index);
        let rect = Rect::new(chosen.x, chosen.y, aligned_width, aligned_height);
        let allocated = self.new_slot(rect, SlotState::Allocated);
        for remainder in chosen.split(aligned_width, aligned_height) {
            let index = self.new_slot(remainder, SlotState::Free);
            self.free_areas.push(index);
        }
        self.allocated_count += 1;

        trace!("Allocated {rect:?} out of free area {chosen:?}");
        Ok(Area::new(self.area_id(allocated), rect, self.id))
    }

    /// Release a previously allocated area.
    ///
    /// The area goes back to the end of the free list unchanged; no merging happens
    /// until a later allocation fails to find room.
    ///
    /// Returns [`AllocError::NotAllocated`] without touching any state if the area is not
    /// currently allocated by this allocator.
    pub fn free(&mut self, area: Area) -> Result<(), AllocError> {
        let index = self
            .lookup(&area)
            .ok_or(AllocError::NotAllocated(area.id()))?;
        let rect = self.retire(index);
        let free_index = self.new_slot(rect, SlotState::Free);
        self.free_areas.push(free_index);
        self.allocated_count -= 1;

        trace!("Freed {rect:?}");
        Ok(())
    }

    /// Merge free areas that share a full edge until no more merges are possible.
    ///
    /// Returns the number of merges performed. Running this on an already coalesced
    /// allocator does nothing and returns zero.
    pub fn coalesce(&mut self) -> usize {
        let mut merges = 0;
        let mut passes = 0;
        loop {
            passes += 1;
            let merged = self.coalesce_pass();
            merges += merged;
            if merged == 0 {
                break;
            }
        }

        debug!(
            "Coalescing merged {merges} free areas in {passes} passes, {} remain",
            self.free_areas.len()
        );
        merges
    }

    /// Return to the initial state of a single free area covering the bounds.
    ///
    /// Every outstanding [`Area`] becomes invalid.
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.state != SlotState::Retired {
                slot.state = SlotState::Retired;
                self.retired.push(slot_index(index));
            }
        }
        self.free_areas.clear();
        self.allocated_count = 0;

        let all = self.new_slot(self.bounds, SlotState::Free);
        self.free_areas.push(all);
    }

    /// The rectangle the allocator hands out areas from.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The options the allocator was created with.
    pub fn options(&self) -> &AllocatorOptions {
        &self.options
    }

    /// The free areas, in the order the first-fit search visits them.
    pub fn free_areas(&self) -> impl Iterator<Item = Rect> + '_ {
        self.free_areas
            .iter()
            .map(|index| self.slots[index.index()].rect)
    }

    /// The currently allocated areas.
    pub fn allocated_areas(&self) -> impl Iterator<Item = Area> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.state == SlotState::Allocated)
            .map(|(index, slot)| {
                Area::new(
                    AreaId::new(slot_index(index).0, slot.generation),
                    slot.rect,
                    self.id,
                )
            })
    }

    /// Whether `area` is currently allocated by this allocator.
    pub fn is_allocated(&self, area: &Area) -> bool {
        self.lookup(area).is_some()
    }

    /// Number of allocated areas.
    pub fn allocated_count(&self) -> usize {
        self.allocated_count
    }

    /// Number of free areas.
    pub fn free_count(&self) -> usize {
        self.free_areas.len()
    }

    /// Whether nothing is allocated.
    pub fn is_empty(&self) -> bool {
        self.allocated_count == 0
    }

    /// Current usage statistics.
    pub fn stats(&self) -> AllocatorStats {
        let allocated_area = self.allocated_areas().map(|area| area.rect().area()).sum();
        let largest_free_area = self
            .free_areas()
            .reduce(|best, rect| if rect.area() > best.area() { rect } else { best });

        AllocatorStats {
            total_area: self.bounds.area(),
            allocated_area,
            allocated_count: self.allocated_count,
            free_area_count: self.free_areas.len(),
            largest_free_area,
        }
    }

    /// Check that the free and allocated areas tile the bounds exactly.
    ///
    /// This is quadratic in the number of areas and meant for tests and debugging.
    pub fn validate(&self) -> Result<(), InvariantError> {
        let free: Vec<Rect> = self.free_areas().collect();
        let allocated: Vec<Rect> = self.allocated_areas().map(|area| area.rect()).collect();
        if allocated.len() != self.allocated_count {
            return Err(InvariantError::CountMismatch {
                recorded: self.allocated_count,
                actual: allocated.len(),
            });
        }
        validate::check_tiling(self.bounds, &free, &allocated)
    }

    // ----- internal helpers -----

    fn find_free_area(&self, width: u32, height: u32) -> Option<usize> {
        self.free_areas
            .iter()
            .position(|index| self.slots[index.index()].rect.fits(width, height))
    }

    fn coalesce_pass(&mut self) -> usize {
        let mut merges = 0;
        let mut i = 0;
        while i < self.free_areas.len() {
            let mut j = i + 1;
            while j < self.free_areas.len() {
                let a = self.slots[self.free_areas[i].index()].rect;
                let b = self.slots[self.free_areas[j].index()].rect;
                if let Some(merged) = a.merge(b) {
                    let b_index = self.free_areas.remove(j);
                    let a_index = self.free_areas[i];
                    self.retire(b_index);
                    self.retire(a_index);
                    self.free_areas[i] = self.new_slot(merged, SlotState::Free);
                    merges += 1;
                    // The merged area may now line up with one skipped earlier.
                    j = i + 1;
                } else {
                    j += 1;
                }
            }
            i += 1;
        }
        merges
    }

    fn new_slot(&mut self, rect: Rect, state: SlotState) -> SlotIndex {
        debug_assert!(!rect.is_empty(), "tracked areas must not be empty");

        if let Some(index) = self.retired.pop() {
            let slot = &mut self.slots[index.index()];
            debug_assert_eq!(
                slot.state,
                SlotState::Retired,
                "reused slot must have been retired"
            );
            slot.generation = slot.generation.wrapping_add(1);
            slot.rect = rect;
            slot.state = state;
            return index;
        }

        self.slots.push(Slot {
            rect,
            state,
            generation: 0,
        });
        slot_index(self.slots.len() - 1)
    }

    fn retire(&mut self, index: SlotIndex) -> Rect {
        let slot = &mut self.slots[index.index()];
        debug_assert!(
            slot.state != SlotState::Retired,
            "slot to retire must be live"
        );
        slot.state = SlotState::Retired;
        self.retired.push(index);
        slot.rect
    }

    fn area_id(&self, index: SlotIndex) -> AreaId {
        AreaId::new(index.0, self.slots[index.index()].generation)
    }

    fn lookup(&self, area: &Area) -> Option<SlotIndex> {
        if area.owner() != self.id {
            return None;
        }
        let id = area.id();
        let slot = self.slots.get(id.index() as usize)?;
        (slot.state == SlotState::Allocated
            && slot.generation == id.generation()
            && slot.rect == area.rect())
            .then_some(SlotIndex(id.index()))
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "slot counts stay far below u32::MAX for any atlas that fits in memory"
)]
fn slot_index(index: usize) -> SlotIndex {
    SlotIndex(index as u32)
}

impl fmt::Debug for AreaAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AreaAllocator")
            .field("bounds", &self.bounds)
            .field("options", &self.options)
            .field("allocated_count", &self.allocated_count)
            .field("free_areas", &self.free_areas().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
