//! Criterion micro-benchmarks for arena allocation, release and the
//! fragmentation walk.

use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rarena::Arena;

const OPS: usize = 10_000;
const MIN_SIZE: usize = 16;
const MAX_SIZE: usize = 256;

fn random_sizes(seed: u64) -> Vec<usize> {
  let mut rng = StdRng::seed_from_u64(seed);
  (0..OPS).map(|_| rng.random_range(MIN_SIZE..=MAX_SIZE)).collect()
}

fn bench_alloc_free_cycle(c: &mut Criterion) {
  let sizes = random_sizes(42);

  c.bench_function("alloc_free_10k_random", |b| {
    b.iter(|| {
      let mut arena = Arena::new(OPS * MAX_SIZE).unwrap();
      let regions: Vec<_> = sizes.iter().map(|&size| arena.alloc(black_box(size))).collect();
      for region in regions {
        arena.free(region);
      }
      black_box(arena.fragmentation());
    });
  });
}

/// Frees every other 16-byte region so the list holds `OPS / 4` small
/// blocks ahead of the tail remainder.
fn fragmented_arena() -> Arena {
  let mut arena = Arena::new(OPS * 64).unwrap();
  let regions: Vec<_> = (0..OPS / 2).map(|_| arena.alloc(16)).collect();
  for region in regions.into_iter().step_by(2) {
    arena.free(region);
  }
  arena
}

fn bench_first_fit_scan(c: &mut Criterion) {
  c.bench_function("alloc_past_fragmented_list", |b| {
    b.iter_batched(
      fragmented_arena,
      |mut arena| {
        let region = arena.alloc(black_box(128));
        (arena, region)
      },
      BatchSize::LargeInput,
    );
  });
}

fn bench_fragmentation(c: &mut Criterion) {
  let mut arena = Arena::new(OPS * 64).unwrap();
  let regions: Vec<_> = (0..OPS / 2).map(|_| arena.alloc(16)).collect();
  for region in regions {
    arena.free(region);
  }

  c.bench_function("fragmentation_5k_blocks", |b| {
    b.iter(|| black_box(arena.fragmentation()));
  });
}

criterion_group!(benches, bench_alloc_free_cycle, bench_first_fit_scan, bench_fragmentation);
criterion_main!(benches);
