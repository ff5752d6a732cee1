// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Helpers for the `area_alloc` integration tests.

// LINEBENDER LINT SET - lib.rs - v2
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![allow(
    missing_debug_implementations,
    unreachable_pub,
    missing_docs,
    clippy::missing_assert_message,
    clippy::allow_attributes_without_reason
)]

use anyhow::{Context, Result, bail};
use area_alloc::{Area, AreaAllocator, Rect};

/// Install a logger for the test binary, once.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Deterministic pseudo-random numbers, so failures reproduce without a seed dump.
pub struct Lcg {
    seed: usize,
}

impl Lcg {
    pub fn new(seed: usize) -> Self {
        Self { seed }
    }

    pub fn roll(&mut self) -> usize {
        const A: usize = 1103515245;
        const C: usize = 12345;
        const M: usize = 1 << 31;
        self.seed = A.wrapping_mul(self.seed).wrapping_add(C) % M;
        self.seed
    }

    /// A value in `lo..=hi`.
    pub fn range(&mut self, lo: u32, hi: u32) -> u32 {
        lo + (self.roll() % (hi - lo + 1) as usize) as u32
    }
}

/// Count how many tracked areas cover each cell of the bounds.
///
/// Independent of [`AreaAllocator::validate`]: a correct allocator yields a count of
/// exactly one everywhere.
pub fn coverage(alloc: &AreaAllocator) -> Vec<u32> {
    let bounds = alloc.bounds();
    let mut cells = vec![0_u32; bounds.area() as usize];
    let rects = alloc
        .free_areas()
        .chain(alloc.allocated_areas().map(|area| area.rect()));
    for rect in rects {
        for y in rect.y..rect.max_y() {
            for x in rect.x..rect.max_x() {
                cells[(y * bounds.width + x) as usize] += 1;
            }
        }
    }
    cells
}

/// Panic with the offending layout if the allocator's areas do not tile its bounds.
pub fn assert_tiled(alloc: &AreaAllocator) {
    if let Err(err) = alloc.validate() {
        panic!("{err}: {alloc:?}");
    }
}

/// Settings for [`run_churn`].
#[derive(Clone, Copy)]
pub struct Churn {
    pub steps: usize,
    pub min_size: u32,
    pub max_size: u32,
    /// Out of 5: how many outcomes of a roll free instead of allocate.
    pub free_weight: usize,
}

impl Default for Churn {
    fn default() -> Self {
        Self {
            steps: 2_000,
            min_size: 1,
            max_size: 40,
            free_weight: 2,
        }
    }
}

/// Randomly allocate and free, validating after every step.
///
/// Returns the areas still allocated at the end.
pub fn run_churn(alloc: &mut AreaAllocator, rng: &mut Lcg, churn: Churn) -> Result<Vec<Area>> {
    let mut live = Vec::new();
    for step in 0..churn.steps {
        if rng.roll() % 5 < churn.free_weight && !live.is_empty() {
            let nth = rng.roll() % live.len();
            let area: Area = live.swap_remove(nth);
            alloc
                .free(area)
                .with_context(|| format!("step {step}: freeing {area:?}"))?;
        } else {
            let w = rng.range(churn.min_size, churn.max_size);
            let h = rng.range(churn.min_size, churn.max_size);
            if let Some(area) = alloc.allocate(w, h) {
                if (area.width(), area.height()) != (w, h) {
                    bail!("step {step}: asked for {w}x{h}, got {area:?}");
                }
                live.push(area);
            }
        }
        alloc
            .validate()
            .with_context(|| format!("step {step}: {alloc:?}"))?;
    }
    log::debug!(
        "Churn finished with {} live and {} free areas",
        live.len(),
        alloc.free_count()
    );
    Ok(live)
}

/// The free areas in list order.
pub fn free_list(alloc: &AreaAllocator) -> Vec<Rect> {
    alloc.free_areas().collect()
}
