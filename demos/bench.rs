use std::{
  mem,
  path::{Path, PathBuf},
  time::{Duration, Instant},
};

use anyhow::{Context, Result, ensure};
use clap::Parser;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rarena::{Arena, FragmentStats};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Compares the arena against the system allocator on random-sized
/// allocations, then reports the arena's fragmentation.
#[derive(Parser, Debug)]
#[command(name = "bench", about)]
struct BenchConfig {
  /// Number of allocations per run
  #[arg(long, default_value_t = 100_000)]
  ops: usize,

  /// Smallest allocation in bytes
  #[arg(long, default_value_t = 16)]
  min_size: usize,

  /// Largest allocation in bytes
  #[arg(long, default_value_t = 256)]
  max_size: usize,

  /// Seed for the size generator; random when omitted
  #[arg(long)]
  seed: Option<u64>,

  /// Also write the results to this CSV file
  #[arg(long)]
  csv: Option<PathBuf>,

  /// Increase verbosity (-v, -vv)
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,
}

impl BenchConfig {
  fn log_filter(&self) -> &'static str {
    match self.verbose {
      0 => "info",
      1 => "debug",
      _ => "trace",
    }
  }

  fn validate(&self) -> Result<()> {
    ensure!(self.ops > 0, "--ops must be at least 1");
    ensure!(
      self.min_size <= self.max_size,
      "--min-size ({}) must not exceed --max-size ({})",
      self.min_size,
      self.max_size
    );
    Ok(())
  }

  /// Both runs draw the same sequence of sizes.
  fn sizes(&self) -> Vec<usize> {
    let mut rng = match self.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_os_rng(),
    };

    (0..self.ops)
      .map(|_| rng.random_range(self.min_size..=self.max_size))
      .collect()
  }
}

/// Outcome of one run.
struct Measurement {
  elapsed: Duration,
  rss_kb: u64,
}

impl Measurement {
  fn millis(&self) -> f64 {
    self.elapsed.as_secs_f64() * 1000.0
  }
}

/// Peak resident set size of the process in KiB.
fn peak_rss_kb() -> u64 {
  let mut usage: libc::rusage = unsafe { mem::zeroed() };

  if unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut usage) } != 0 {
    return 0;
  }

  let max_rss = usage.ru_maxrss.max(0) as u64;

  // macOS reports bytes, Linux reports KiB.
  if cfg!(target_os = "macos") { max_rss / 1024 } else { max_rss }
}

fn report_progress(
  mode: &str,
  done: usize,
  total: usize,
) {
  let step = (total / 5).max(1);
  if done > 0 && done % step == 0 {
    info!(mode, done, total, "allocations done");
  }
}

fn bench_malloc(sizes: &[usize]) -> Duration {
  let mut addresses = Vec::with_capacity(sizes.len());

  let start = Instant::now();
  for (i, &size) in sizes.iter().enumerate() {
    report_progress("malloc", i, sizes.len());
    addresses.push(unsafe { libc::malloc(size) });
  }
  for address in addresses {
    unsafe { libc::free(address) };
  }
  start.elapsed()
}

fn bench_arena(
  arena: &mut Arena,
  sizes: &[usize],
) -> (Duration, usize) {
  let mut regions = Vec::with_capacity(sizes.len());

  let start = Instant::now();
  for (i, &size) in sizes.iter().enumerate() {
    report_progress("arena", i, sizes.len());
    regions.push(arena.alloc(size));
  }
  let failed = regions.iter().filter(|region| region.is_none()).count();
  for region in regions {
    arena.free(region);
  }
  (start.elapsed(), failed)
}

fn write_csv(
  path: &Path,
  malloc: &Measurement,
  arena: &Measurement,
  stats: &FragmentStats,
) -> Result<()> {
  let mut writer = csv::Writer::from_path(path).with_context(|| format!("failed to create {}", path.display()))?;

  writer.write_record([
    "mode",
    "time_ms",
    "rss_kb",
    "num_fragments",
    "total_free_b",
    "largest_b",
    "smallest_b",
  ])?;
  writer.write_record([
    "malloc".to_string(),
    format!("{:.3}", malloc.millis()),
    malloc.rss_kb.to_string(),
    "N/A".to_string(),
    "N/A".to_string(),
    "N/A".to_string(),
    "N/A".to_string(),
  ])?;
  writer.write_record([
    "arena".to_string(),
    format!("{:.3}", arena.millis()),
    arena.rss_kb.to_string(),
    stats.count.to_string(),
    stats.total_free.to_string(),
    stats.largest.to_string(),
    stats.smallest.to_string(),
  ])?;
  writer.flush()?;

  Ok(())
}

fn main() -> Result<()> {
  let config = BenchConfig::parse();

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter())))
    .init();

  config.validate()?;

  info!(ops = config.ops, min = config.min_size, max = config.max_size, "running benchmark");

  let sizes = config.sizes();

  let malloc_time = bench_malloc(&sizes);
  let malloc = Measurement {
    elapsed: malloc_time,
    rss_kb: peak_rss_kb(),
  };

  let capacity = config
    .ops
    .checked_mul(config.max_size)
    .context("arena size overflows usize")?;
  let mut arena = Arena::new(capacity).context("failed to initialize arena")?;

  let (arena_time, failed) = bench_arena(&mut arena, &sizes);
  let pooled = Measurement {
    elapsed: arena_time,
    rss_kb: peak_rss_kb(),
  };

  let stats = arena.fragmentation();

  println!(
    "malloc/free: time = {:.2} ms, peak RSS = {} KB, frag = N/A",
    malloc.millis(),
    malloc.rss_kb
  );
  println!(
    "arena alloc: time = {:.2} ms, peak RSS = {} KB, fragments = {}, total_free = {} KB, largest = {} B, smallest = {} B, failed = {}",
    pooled.millis(),
    pooled.rss_kb,
    stats.count,
    stats.total_free / 1024,
    stats.largest,
    stats.smallest,
    failed
  );

  if let Some(path) = &config.csv {
    write_csv(path, &malloc, &pooled, &stats)?;
    info!(path = %path.display(), "results written");
  }

  arena.destroy();

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn config(args: &[&str]) -> BenchConfig {
    BenchConfig::parse_from(std::iter::once("bench").chain(args.iter().copied()))
  }

  #[test]
  fn test_defaults() {
    let config = config(&[]);

    assert_eq!(config.ops, 100_000);
    assert_eq!((config.min_size, config.max_size), (16, 256));
    assert!(config.csv.is_none());
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_validate_rejects_zero_ops() {
    let err = config(&["--ops", "0"]).validate().unwrap_err();
    assert!(err.to_string().contains("--ops"));
  }

  #[test]
  fn test_validate_rejects_inverted_range() {
    assert!(config(&["--min-size", "64", "--max-size", "8"]).validate().is_err());
  }

  #[test]
  fn test_seeded_sizes_are_reproducible() {
    let config = config(&["--ops", "50", "--seed", "7"]);
    let sizes = config.sizes();

    assert_eq!(sizes, config.sizes());
    assert!(sizes.iter().all(|size| (16..=256).contains(size)));
  }

  #[test]
  fn test_write_csv() {
    let path = std::env::temp_dir().join(format!("rarena-bench-{}.csv", std::process::id()));
    let malloc = Measurement {
      elapsed: Duration::from_millis(3),
      rss_kb: 100,
    };
    let arena = Measurement {
      elapsed: Duration::from_millis(2),
      rss_kb: 200,
    };
    let stats = FragmentStats::collect([64, 128]);

    write_csv(&path, &malloc, &arena, &stats).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let lines: Vec<_> = written.lines().collect();
    assert_eq!(
      lines,
      vec![
        "mode,time_ms,rss_kb,num_fragments,total_free_b,largest_b,smallest_b",
        "malloc,3.000,100,N/A,N/A,N/A,N/A",
        "arena,2.000,200,2,192,128,64",
      ]
    );
  }
}
