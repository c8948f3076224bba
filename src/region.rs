/// A region lent by an [`Arena`](crate::Arena).
///
/// The handle is deliberately neither `Copy` nor `Clone`: giving it back with
/// [`Arena::free`](crate::Arena::free) moves it, so the same region cannot be
/// released twice from safe code.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a region that is dropped without being freed stays lent until the arena is destroyed"]
pub struct Region {
  pub(crate) arena: usize,
  pub(crate) offset: usize,
  pub(crate) size: usize,
}

impl Region {
  /// Offset of the first usable byte from the start of the arena buffer.
  pub fn offset(&self) -> usize {
    self.offset
  }

  /// Usable bytes in the region. At least the requested size rounded up to a
  /// machine word; more when the block it came from was too small to split.
  pub fn len(&self) -> usize {
    self.size
  }

  pub fn is_empty(&self) -> bool {
    self.size == 0
  }
}
