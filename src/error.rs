//! Errors raised while building an arena.

use thiserror::Error;

/// Failures of [`Arena::new`](crate::Arena::new).
///
/// Running out of room inside a live arena is not an error: `alloc` returns
/// `None` and the arena stays usable.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
  /// The requested size cannot hold a single block header.
  #[error("arena of {requested} bytes is too small: at least {minimum} bytes are needed")]
  TooSmall {
    /// Bytes requested.
    requested: usize,
    /// Smallest accepted size.
    minimum: usize,
  },

  /// The system allocator could not provide the backing buffer.
  #[error("out of memory: system allocator refused {requested} bytes")]
  OutOfMemory {
    /// Bytes requested.
    requested: usize,
  },
}
