use std::fmt;

/// Point-in-time summary of an arena's free-list.
///
/// Sizes are usable bytes, headers excluded. `smallest` is 0 when there are
/// no free blocks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FragmentStats {
  pub count: usize,
  pub total_free: usize,
  pub largest: usize,
  pub smallest: usize,
}

impl FragmentStats {
  /// Builds the summary from the sizes of the free blocks in a single pass.
  pub fn collect<I>(sizes: I) -> Self
  where
    I: IntoIterator<Item = usize>,
  {
    let mut stats = Self {
      smallest: usize::MAX,
      ..Self::default()
    };

    for size in sizes {
      stats.count += 1;
      stats.total_free += size;
      stats.largest = stats.largest.max(size);
      stats.smallest = stats.smallest.min(size);
    }

    if stats.count == 0 {
      stats.smallest = 0;
    }

    stats
  }
}

impl fmt::Display for FragmentStats {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    writeln!(f, "  number of free blocks = {}", self.count)?;
    writeln!(f, "  total free memory     = {} bytes", self.total_free)?;
    writeln!(f, "  largest free block    = {} bytes", self.largest)?;
    write!(f, "  smallest free block   = {} bytes", self.smallest)
  }
}
