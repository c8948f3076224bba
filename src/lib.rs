//! # rarena - A Fixed-Size Arena Allocator
//!
//! This crate provides an **arena allocator** that takes one buffer from the
//! system allocator (`calloc`) and carves it into variable-sized regions,
//! tracking unused space with a free-list stored inside the buffer itself.
//!
//! ## Overview
//!
//! ```text
//!   Arena after a few allocations and releases:
//!
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          ARENA BUFFER                                │
//!   │                                                                      │
//!   │   ┌────┬──────┬────┬──────┬────┬──────┬────┬─────────────────────┐   │
//!   │   │ H  │ free │ H  │  A2  │ H  │ free │ H  │       free          │   │
//!   │   └────┴──────┴────┴──────┴────┴──────┴────┴─────────────────────┘   │
//!   │     ▲            ▲             ▲                                     │
//!   │     │            └── lent      │                                     │
//!   │   head ──next──────────────────┘ ──next──► tail remainder ──► none   │
//!   │                                                                      │
//!   └──────────────────────────────────────────────────────────────────────┘
//!
//!   H = block header (size, next). Free blocks form a singly-linked list
//!   ordered by recency of release, not by address.
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   rarena
//!   ├── align      - Word alignment (align!, checked_align)
//!   ├── arena      - Arena: alloc, free, destroy, fragmentation
//!   ├── block      - Intrusive block header (internal)
//!   ├── error      - ArenaError
//!   ├── region     - Region handle lent to callers
//!   └── stats      - FragmentStats snapshot
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rarena::Arena;
//!
//! let mut arena = Arena::new(1024 * 1024).expect("arena");
//!
//! let region = arena.alloc(64).expect("room for 64 bytes");
//! arena.bytes_mut(&region).fill(0x2A);
//! assert!(arena.bytes(&region).iter().all(|&byte| byte == 0x2A));
//!
//! arena.free(Some(region));
//! println!("{}", arena.fragmentation());
//!
//! arena.destroy();
//! ```
//!
//! ## How It Works
//!
//! Every block, free or lent, starts with a two-word header:
//!
//! ```text
//!   Single Allocation:
//!   ┌───────────────────────┬────────────────────────────────┐
//!   │    Block Header       │         User Data              │
//!   │  ┌─────────────────┐  │                                │
//!   │  │ size: N         │  │  ┌──────────────────────────┐  │
//!   │  │ next: offset /  │  │  │                          │  │
//!   │  │       lent tag  │  │  │     N bytes usable       │  │
//!   │  └─────────────────┘  │  └──────────────────────────┘  │
//!   │      16 bytes         │                                │
//!   └───────────────────────┴────────────────────────────────┘
//!                           ▲
//!                           └── Region::offset()
//! ```
//!
//! - **alloc** rounds the request up to a machine word and scans the list
//!   from the head, taking the first block that fits (first-fit). A block
//!   with room to spare is split and the remainder takes its place in the
//!   list; a leftover too small for a header stays attached to the region.
//! - **free** pushes the block on the head of the list in O(1). Adjacent
//!   free blocks are never coalesced, so mixed workloads fragment over time
//!   and only destroying and rebuilding the arena undoes it.
//! - **fragmentation** walks the list once and reports the count, total,
//!   largest and smallest free block.
//!
//! ## Limitations
//!
//! - **Single-threaded only**: `Arena` is neither `Send` nor `Sync`
//! - **No coalescing**: freed neighbours stay separate blocks
//! - **No growth**: the buffer size is fixed at construction
//! - **Word alignment only**: regions are aligned to `size_of::<usize>()`
//! - **Unix-only**: Requires `libc` for `calloc`/`free`

pub mod align;
mod arena;
mod block;
mod error;
mod region;
mod stats;

pub use arena::{Arena, FreeBlocks, FreeSpan, MIN_ARENA_SIZE};
pub use block::HEADER_SIZE;
pub use error::ArenaError;
pub use region::Region;
pub use stats::FragmentStats;
