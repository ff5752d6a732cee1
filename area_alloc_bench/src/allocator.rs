// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::hint::black_box;

use area_alloc::{Area, AreaAllocator};
use criterion::{BatchSize, Criterion};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::SEED;

const ATLAS_SIZE: u32 = 2048;

pub fn allocator(c: &mut Criterion) {
    let mut g = c.benchmark_group("area_allocator");

    // Glyph-like sizes into a large atlas; most requests succeed on the first search.
    let glyphs = random_sizes(1000, 8, 128);
    g.bench_function("fill_1000_glyphs", |b| {
        b.iter(|| {
            let mut atlas = AreaAllocator::new(ATLAS_SIZE, ATLAS_SIZE);
            let placed = glyphs
                .iter()
                .filter(|&&(w, h)| atlas.allocate(w, h).is_some())
                .count();
            black_box(placed)
        });
    });

    // Uniform tiles until exhaustion; the last request pays for a full coalesce.
    g.bench_function("tiles_until_exhausted", |b| {
        b.iter(|| {
            let mut atlas = AreaAllocator::new(512, 512);
            let mut tiles = 0_u32;
            while atlas.allocate(32, 32).is_some() {
                tiles += 1;
            }
            black_box(tiles)
        });
    });

    // A half-full cache where every insertion evicts a random entry first.
    let entries = random_sizes(1000, 16, 64);
    g.bench_function("evict_and_insert_500", |b| {
        b.iter_batched(
            || warm_cache(ATLAS_SIZE / 2, &entries[..500]),
            |(mut atlas, mut live)| {
                let mut rng = SmallRng::from_seed(SEED);
                for &(w, h) in &entries[500..] {
                    if !live.is_empty() {
                        let victim = live.swap_remove(rng.random_range(0..live.len()));
                        atlas.free(victim).unwrap();
                    }
                    live.extend(atlas.allocate(w, h));
                }
                black_box(live.len())
            },
            BatchSize::SmallInput,
        );
    });

    // Merging a free list shattered into 256 tiles back into one area.
    g.bench_function("coalesce_256_tiles", |b| {
        b.iter_batched(
            || {
                let (mut atlas, tiles) = warm_cache(256, &[(16, 16); 256]);
                for tile in tiles {
                    atlas.free(tile).unwrap();
                }
                atlas
            },
            |mut atlas| black_box(atlas.coalesce()),
            BatchSize::SmallInput,
        );
    });

    g.finish();
}

fn random_sizes(count: usize, lo: u32, hi: u32) -> Vec<(u32, u32)> {
    let mut rng = SmallRng::from_seed(SEED);
    (0..count)
        .map(|_| (rng.random_range(lo..=hi), rng.random_range(lo..=hi)))
        .collect()
}

/// A `size` by `size` atlas with as many of `sizes` allocated as fit.
fn warm_cache(size: u32, sizes: &[(u32, u32)]) -> (AreaAllocator, Vec<Area>) {
    let mut atlas = AreaAllocator::new(size, size);
    let live = sizes
        .iter()
        .filter_map(|&(w, h)| atlas.allocate(w, h))
        .collect();
    (atlas, live)
}
