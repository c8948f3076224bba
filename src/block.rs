use std::{mem, ptr::NonNull};

/// Sentinel stored in `next` for the last block of the free-list.
pub const NONE: usize = usize::MAX;

/// Tag stored in `next` while a block is lent to a caller.
pub const LENT: usize = usize::MAX - 1;

/// Bytes occupied by a header in front of every block.
pub const HEADER_SIZE: usize = mem::size_of::<Block>();

/// Intrusive header living in the first bytes of every block.
///
/// `next` is an offset into the arena buffer rather than a pointer, so the
/// list stays valid no matter where the buffer lives.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
  pub size: usize,
  pub next: usize,
}

impl Block {
  pub fn new(
    size: usize,
    next: usize,
  ) -> Self {
    Self { size, next }
  }

  pub fn next(&self) -> Option<usize> {
    (self.next != NONE && self.next != LENT).then_some(self.next)
  }

  pub fn is_lent(&self) -> bool {
    self.next == LENT
  }
}

/// Reads the header stored at `offset`.
///
/// # Safety
///
/// `base` must point to a live buffer, `offset` must be word aligned and
/// `offset + HEADER_SIZE` must not exceed the buffer length.
pub unsafe fn read(
  base: NonNull<u8>,
  offset: usize,
) -> Block {
  unsafe { base.as_ptr().add(offset).cast::<Block>().read() }
}

/// Writes `block` as the header at `offset`.
///
/// # Safety
///
/// Same contract as [`read`].
pub unsafe fn write(
  base: NonNull<u8>,
  offset: usize,
  block: Block,
) {
  unsafe { base.as_ptr().add(offset).cast::<Block>().write(block) }
}
