// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Properties that must hold for any sequence of allocations and frees.

#![allow(
    clippy::missing_assert_message,
    clippy::allow_attributes_without_reason
)]

use area_alloc::{AreaAllocator, Rect};
use area_alloc_tests::{Churn, Lcg, assert_tiled, coverage, free_list, init_logging, run_churn};

#[test]
fn churn_conserves_area() {
    init_logging();
    for (seed, width, height) in [(37, 100, 100), (1, 64, 256), (9001, 257, 33)] {
        let mut alloc = AreaAllocator::new(width, height);
        let mut rng = Lcg::new(seed);
        run_churn(&mut alloc, &mut rng, Churn::default()).unwrap();
        assert!(coverage(&alloc).iter().all(|&count| count == 1));
    }
}

#[test]
fn churn_with_large_requests_conserves_area() {
    init_logging();
    let mut alloc = AreaAllocator::new(200, 200);
    let mut rng = Lcg::new(12345);
    let churn = Churn {
        steps: 1_000,
        min_size: 20,
        max_size: 150,
        free_weight: 3,
    };
    let live = run_churn(&mut alloc, &mut rng, churn).unwrap();
    assert_eq!(live.len(), alloc.allocated_count());
    for area in &live {
        assert!(alloc.is_allocated(area));
    }
}

#[test]
fn freeing_everything_leaves_only_free_space() {
    init_logging();
    let mut alloc = AreaAllocator::new(128, 128);
    let mut rng = Lcg::new(77);
    let live = run_churn(&mut alloc, &mut rng, Churn::default()).unwrap();
    for area in live {
        alloc.free(area).unwrap();
    }
    assert!(alloc.is_empty());
    assert_eq!(alloc.stats().allocated_area, 0);
    assert_tiled(&alloc);

    let total: u64 = alloc.free_areas().map(|rect| rect.area()).sum();
    assert_eq!(total, alloc.bounds().area());
}

#[test]
fn single_allocation_round_trip_coalesces_to_bounds() {
    for (w, h) in [(30, 20), (100, 20), (30, 100), (100, 100), (1, 1)] {
        let mut alloc = AreaAllocator::new(100, 100);
        let area = alloc.allocate(w, h).unwrap();
        alloc.free(area).unwrap();
        alloc.coalesce();
        assert_eq!(free_list(&alloc), vec![Rect::new(0, 0, 100, 100)], "{w}x{h}");
    }
}

#[test]
fn coalescing_reaches_a_fixpoint() {
    init_logging();
    let mut alloc = AreaAllocator::new(150, 150);
    let mut rng = Lcg::new(4242);
    let live = run_churn(&mut alloc, &mut rng, Churn::default()).unwrap();
    for area in live.into_iter().step_by(2) {
        alloc.free(area).unwrap();
    }

    alloc.coalesce();
    let settled = free_list(&alloc);
    assert_eq!(alloc.coalesce(), 0);
    assert_eq!(free_list(&alloc), settled);
    assert_tiled(&alloc);
}

#[test]
fn coalesced_free_areas_have_no_mergeable_pair() {
    let mut alloc = AreaAllocator::new(120, 90);
    let mut rng = Lcg::new(5);
    let live = run_churn(&mut alloc, &mut rng, Churn::default()).unwrap();
    for area in live.into_iter().step_by(3) {
        alloc.free(area).unwrap();
    }
    alloc.coalesce();

    let free = free_list(&alloc);
    for (i, a) in free.iter().enumerate() {
        for b in &free[i + 1..] {
            let shares_column = a.x == b.x
                && a.width == b.width
                && (a.max_y() == b.y || b.max_y() == a.y);
            let shares_row = a.y == b.y
                && a.height == b.height
                && (a.max_x() == b.x || b.max_x() == a.x);
            assert!(!shares_column && !shares_row, "{a:?} and {b:?} should have merged");
        }
    }
}

#[test]
fn oversized_requests_always_fail() {
    let mut alloc = AreaAllocator::new(80, 60);
    assert!(alloc.allocate(81, 1).is_none());
    assert!(alloc.allocate(1, 61).is_none());

    let mut rng = Lcg::new(99);
    let live = run_churn(&mut alloc, &mut rng, Churn::default()).unwrap();
    for area in live {
        alloc.free(area).unwrap();
        assert!(alloc.allocate(81, 60).is_none());
        assert!(alloc.allocate(80, 61).is_none());
    }
    assert_tiled(&alloc);
}

#[test]
fn allocations_never_overlap() {
    let mut alloc = AreaAllocator::new(64, 64);
    let mut rng = Lcg::new(2024);
    let live = run_churn(
        &mut alloc,
        &mut rng,
        Churn {
            free_weight: 1,
            ..Churn::default()
        },
    )
    .unwrap();

    for (i, a) in live.iter().enumerate() {
        assert!(alloc.bounds().contains_rect(a.rect()));
        for b in &live[i + 1..] {
            assert_ne!(a.id(), b.id());
            assert!(!a.rect().intersects(b.rect()));
        }
    }
}
