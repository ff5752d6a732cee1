// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout checks shared by [`AreaAllocator::validate`](crate::AreaAllocator::validate).

use crate::error::InvariantError;
use crate::rect::Rect;

/// Check that `free` and `allocated` together tile `bounds` exactly.
///
/// Every area must be non-empty and inside the bounds, no two areas may overlap, and
/// the covered cells must add up to the bounds' area. Given the first two, the last
/// one means the union is the whole bounds.
pub(crate) fn check_tiling(
    bounds: Rect,
    free: &[Rect],
    allocated: &[Rect],
) -> Result<(), InvariantError> {
    let mut covered = 0_u64;
    let all = || free.iter().chain(allocated).copied();

    for (i, area) in all().enumerate() {
        if area.is_empty() {
            return Err(InvariantError::EmptyArea(area));
        }
        if !bounds.contains_rect(area) {
            return Err(InvariantError::OutOfBounds { area, bounds });
        }
        if let Some(other) = all().skip(i + 1).find(|other| area.intersects(*other)) {
            return Err(InvariantError::Overlap(area, other));
        }
        covered += area.area();
    }

    if covered != bounds.area() {
        return Err(InvariantError::CoverageMismatch {
            covered,
            total: bounds.area(),
        });
    }
    Ok(())
}
