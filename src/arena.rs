use std::{
  ptr::NonNull,
  slice,
  sync::atomic::{AtomicUsize, Ordering},
};

use libc::calloc;
use tracing::{debug, trace};

use crate::{
  align,
  block::{self, Block, HEADER_SIZE, LENT, NONE},
  error::ArenaError,
  region::Region,
  stats::FragmentStats,
};

/// Smallest arena accepted by [`Arena::new`]: room for one header.
pub const MIN_ARENA_SIZE: usize = HEADER_SIZE;

static NEXT_ARENA_ID: AtomicUsize = AtomicUsize::new(0);

/// A free block as seen from outside the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FreeSpan {
  /// Offset of the block header in the arena buffer.
  pub offset: usize,
  /// Usable bytes after the header.
  pub size: usize,
}

impl FreeSpan {
  /// One past the last byte covered by the block, header included.
  pub fn end(&self) -> usize {
    self.offset + HEADER_SIZE + self.size
  }
}

/// Fixed-size arena handing out regions from a first-fit free-list.
///
/// The free-list is threaded through the unused parts of the buffer and
/// behaves as a stack: released regions are pushed on the head and adjacent
/// free blocks are never merged.
///
/// The arena is neither `Send` nor `Sync`.
pub struct Arena {
  id: usize,
  buffer: NonNull<u8>,
  total: usize,
  head: usize,
}

impl Arena {
  /// Obtains a zeroed `total_bytes` buffer from the system allocator and
  /// covers it with a single free block.
  pub fn new(total_bytes: usize) -> Result<Self, ArenaError> {
    if total_bytes < MIN_ARENA_SIZE {
      return Err(ArenaError::TooSmall {
        requested: total_bytes,
        minimum: MIN_ARENA_SIZE,
      });
    }

    // Zeroed so lent bytes are always initialized.
    let address = unsafe { calloc(total_bytes, 1) };

    let Some(buffer) = NonNull::new(address.cast::<u8>()) else {
      return Err(ArenaError::OutOfMemory { requested: total_bytes });
    };

    unsafe { block::write(buffer, 0, Block::new(total_bytes - HEADER_SIZE, NONE)) };

    let id = NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed);

    debug!(id, total_bytes, "arena created");

    Ok(Self {
      id,
      buffer,
      total: total_bytes,
      head: 0,
    })
  }

  /// Total bytes of the backing buffer, headers included.
  pub fn capacity(&self) -> usize {
    self.total
  }

  /// Lends a region of at least `size` bytes, rounded up to a machine word.
  ///
  /// Takes the first free block in list order that fits. The block is split
  /// when the leftover can hold a header plus at least one byte; otherwise
  /// the whole block is lent. Returns `None` when no block is large enough.
  pub fn alloc(
    &mut self,
    size: usize,
  ) -> Option<Region> {
    let Some(size) = align::checked_align(size) else {
      trace!(arena = self.id, requested = size, "request overflows word alignment");
      return None;
    };

    let Some((prev, offset)) = self.find_free_block(size) else {
      trace!(arena = self.id, requested = size, "no free block large enough");
      return None;
    };

    unsafe {
      let found = block::read(self.buffer, offset);
      let excess = found.size - size;

      let (lent, replacement) = if excess > HEADER_SIZE {
        let rest = offset + HEADER_SIZE + size;
        block::write(self.buffer, rest, Block::new(excess - HEADER_SIZE, found.next));
        (size, rest)
      } else {
        (found.size, found.next)
      };

      self.link(prev, replacement);
      block::write(self.buffer, offset, Block::new(lent, LENT));

      Some(Region {
        arena: self.id,
        offset: offset + HEADER_SIZE,
        size: lent,
      })
    }
  }

  /// Returns a region to the head of the free-list in O(1).
  ///
  /// `None` is ignored. The block is not merged with free neighbours, even
  /// when they are contiguous in the buffer.
  ///
  /// # Panics
  ///
  /// If `region` was lent by a different arena. Debug builds also check that
  /// the header in front of the region is still marked as lent.
  pub fn free(
    &mut self,
    region: Option<Region>,
  ) {
    let Some(region) = region else {
      return;
    };

    self.check_owner(&region);

    let offset = self.find_block(&region);

    #[cfg(debug_assertions)]
    {
      let header = unsafe { block::read(self.buffer, offset) };
      debug_assert!(
        header.is_lent() && header.size == region.size,
        "corrupt header in front of region at offset {}",
        region.offset
      );
    }

    unsafe { block::write(self.buffer, offset, Block::new(region.size, self.head)) };
    self.head = offset;
  }

  /// Releases the backing buffer. Regions still lent become meaningless.
  pub fn destroy(self) {
    debug!(id = self.id, total_bytes = self.total, "arena destroyed");
  }

  /// Walks the free-list once and summarises it.
  pub fn fragmentation(&self) -> FragmentStats {
    FragmentStats::collect(self.free_blocks().map(|span| span.size))
  }

  /// Iterates the free-list in list order, most recently released first.
  pub fn free_blocks(&self) -> FreeBlocks<'_> {
    FreeBlocks {
      arena: self,
      current: self.head,
    }
  }

  /// Address of the first usable byte of `region`, aligned to a machine word.
  pub fn as_ptr(
    &self,
    region: &Region,
  ) -> *mut u8 {
    self.check_owner(region);
    unsafe { self.buffer.as_ptr().add(region.offset) }
  }

  /// Usable bytes of `region`. A fresh arena starts out zeroed.
  pub fn bytes(
    &self,
    region: &Region,
  ) -> &[u8] {
    unsafe { slice::from_raw_parts(self.as_ptr(region), region.size) }
  }

  /// Mutable view of the usable bytes of `region`.
  pub fn bytes_mut(
    &mut self,
    region: &Region,
  ) -> &mut [u8] {
    unsafe { slice::from_raw_parts_mut(self.as_ptr(region), region.size) }
  }

  fn find_free_block(
    &self,
    size: usize,
  ) -> Option<(Option<usize>, usize)> {
    let mut prev = None;

    for span in self.free_blocks() {
      if span.size >= size {
        return Some((prev, span.offset));
      }
      prev = Some(span.offset);
    }

    None
  }

  fn find_block(
    &self,
    region: &Region,
  ) -> usize {
    region.offset - HEADER_SIZE
  }

  /// Points `prev` (or the head when `prev` is `None`) at `next`.
  fn link(
    &mut self,
    prev: Option<usize>,
    next: usize,
  ) {
    match prev {
      None => self.head = next,
      Some(prev) => unsafe {
        let mut header = block::read(self.buffer, prev);
        header.next = next;
        block::write(self.buffer, prev, header);
      },
    }
  }

  fn check_owner(
    &self,
    region: &Region,
  ) {
    assert_eq!(
      region.arena, self.id,
      "region at offset {} was lent by another arena",
      region.offset
    );
  }
}

impl Drop for Arena {
  fn drop(&mut self) {
    unsafe { libc::free(self.buffer.as_ptr().cast()) };
  }
}

/// Iterator over the free-list, see [`Arena::free_blocks`].
pub struct FreeBlocks<'a> {
  arena: &'a Arena,
  current: usize,
}

impl Iterator for FreeBlocks<'_> {
  type Item = FreeSpan;

  fn next(&mut self) -> Option<FreeSpan> {
    if self.current == NONE {
      return None;
    }

    let offset = self.current;
    let found = unsafe { block::read(self.arena.buffer, offset) };
    self.current = found.next().unwrap_or(NONE);

    Some(FreeSpan {
      offset,
      size: found.size,
    })
  }
}
