// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hand-built layouts with known outcomes.

#![allow(
    clippy::missing_assert_message,
    clippy::allow_attributes_without_reason
)]

use area_alloc::{AllocError, AreaAllocator, Rect};
use area_alloc_tests::{assert_tiled, free_list, init_logging};

#[test]
fn first_allocation_splits_into_right_bottom_and_diagonal() {
    init_logging();
    let mut alloc = AreaAllocator::new(100, 100);
    let a = alloc.allocate(60, 40).unwrap();
    assert_eq!(a.rect(), Rect::new(0, 0, 60, 40));
    assert_eq!(
        free_list(&alloc),
        vec![
            Rect::new(60, 0, 40, 40),
            Rect::new(0, 40, 60, 60),
            Rect::new(60, 40, 40, 60),
        ]
    );

    // 40x100 fits none of the remainders on its own. Coalescing joins the right and
    // diagonal remainders into the column it needs.
    let column = alloc.allocate(40, 100).unwrap();
    assert_eq!(column.rect(), Rect::new(60, 0, 40, 100));
    assert_eq!(free_list(&alloc), vec![Rect::new(0, 40, 60, 60)]);
    assert_tiled(&alloc);
}

#[test]
fn first_fit_prefers_list_order_over_tighter_fit() {
    let mut alloc = AreaAllocator::new(100, 100);
    let wide = alloc.allocate(40, 100).unwrap();
    let narrow = alloc.allocate(20, 100).unwrap();
    let last = alloc.allocate(40, 100).unwrap();
    assert_eq!(last.rect(), Rect::new(60, 0, 40, 100));
    assert_eq!(alloc.free_count(), 0);

    alloc.free(last).unwrap();
    alloc.free(narrow).unwrap();
    assert_eq!(
        free_list(&alloc),
        vec![Rect::new(60, 0, 40, 100), Rect::new(40, 0, 20, 100)]
    );

    // The 20-wide column would be an exact fit, but the 40-wide one comes first.
    let picked = alloc.allocate(20, 100).unwrap();
    assert_eq!(picked.rect(), Rect::new(60, 0, 20, 100));
    assert_eq!(
        free_list(&alloc),
        vec![Rect::new(40, 0, 20, 100), Rect::new(80, 0, 20, 100)]
    );
    assert!(alloc.is_allocated(&wide));
    assert_tiled(&alloc);
}

#[test]
fn one_area_absorbs_several_neighbours_in_one_pass() {
    let mut alloc = AreaAllocator::new(100, 100);
    let columns: Vec<_> = (0..4).map(|_| alloc.allocate(25, 100).unwrap()).collect();
    for i in [2, 0, 3, 1] {
        alloc.free(columns[i]).unwrap();
    }

    assert_eq!(alloc.coalesce(), 3);
    assert_eq!(free_list(&alloc), vec![Rect::new(0, 0, 100, 100)]);
}

#[test]
fn fragmented_space_is_reclaimed_on_demand() {
    let mut alloc = AreaAllocator::new(64, 64);
    let tiles: Vec<_> = (0..16).map(|_| alloc.allocate(16, 16).unwrap()).collect();
    assert!(alloc.allocate(1, 1).is_none());

    for tile in tiles {
        alloc.free(tile).unwrap();
    }
    assert_eq!(alloc.free_count(), 16);

    let full = alloc.allocate(64, 64).unwrap();
    assert_eq!(full.rect(), Rect::new(0, 0, 64, 64));
    assert_eq!(alloc.free_count(), 0);
}

#[test]
fn l_shaped_free_space_is_not_merged() {
    let mut alloc = AreaAllocator::new(100, 100);
    let corner = alloc.allocate(50, 50).unwrap();
    alloc.allocate(50, 50).unwrap();
    let bottom = alloc.allocate(100, 50).unwrap();
    assert_eq!(bottom.rect(), Rect::new(0, 50, 100, 50));

    alloc.free(corner).unwrap();
    alloc.free(bottom).unwrap();

    // The free cells include the whole left column, but only as an L-shape made of
    // a 50x50 square and a 100x50 band, which never merge.
    assert_eq!(
        alloc.try_allocate(50, 100),
        Err(AllocError::OutOfSpace {
            width: 50,
            height: 100
        })
    );
    assert_eq!(
        free_list(&alloc),
        vec![Rect::new(0, 0, 50, 50), Rect::new(0, 50, 100, 50)]
    );
    assert_tiled(&alloc);
}

#[test]
fn misuse_leaves_state_untouched() {
    let mut alloc = AreaAllocator::new(40, 40);
    let a = alloc.allocate(10, 10).unwrap();
    alloc.free(a).unwrap();
    let before = free_list(&alloc);

    assert_eq!(alloc.free(a), Err(AllocError::NotAllocated(a.id())));
    assert!(matches!(
        alloc.try_allocate(0, 0),
        Err(AllocError::InvalidSize { .. })
    ));
    assert_eq!(free_list(&alloc), before);
    assert!(alloc.is_empty());
    assert_tiled(&alloc);
}

#[test]
fn svg_dump_shows_layout() {
    let mut alloc = AreaAllocator::new(32, 32);
    alloc.allocate(8, 8).unwrap();
    let mut out = Vec::new();
    alloc.dump_svg(&mut out).unwrap();
    let svg = String::from_utf8(out).unwrap();
    assert!(svg.contains(r#"width="32" height="32""#));
    assert_eq!(svg.matches("<rect").count(), 4);
}
