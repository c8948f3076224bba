use anyhow::{Context, Result};
use rarena::Arena;
use tracing_subscriber::EnvFilter;

/// Size of the arena used by the smoke test: 1 MiB.
const ARENA_SIZE: usize = 1024 * 1024;

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let mut arena = Arena::new(ARENA_SIZE).context("failed to initialize arena")?;

  // Simple alloc/free cycle.
  let first = arena.alloc(64);
  let second = arena.alloc(128);
  let _third = arena.alloc(256);

  arena.free(second);
  arena.free(first);

  let stats = arena.fragmentation();

  println!("After simple smoke test:");
  println!("  total arena size      = {} bytes", arena.capacity());
  println!("{stats}");

  // The third region is still lent and goes away with the arena.
  arena.destroy();

  Ok(())
}
