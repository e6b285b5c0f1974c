//! Circular sentinel queues of owned strings over slab storage.
//!
//! Every queue is a doubly-linked ring closed through a payload-free
//! sentinel. All nodes of all queues live in one storage pool owned by a
//! [`QueueEngine`]; links are pool indices, so structural operations
//! (reverse, sort, splice, merge) relink nodes in place without allocating.
//!
//! # Quick Start
//!
//! ```
//! use nexus_ring::QueueBuilder;
//!
//! let mut engine = QueueBuilder::default().capacity(64).build().unwrap();
//! let q = engine.new_queue().unwrap();
//!
//! for v in ["b", "a", "b", "c"] {
//!     engine.insert_tail(q, v).unwrap();
//! }
//! engine.sort(q, false).unwrap();
//! engine.delete_dup(q).unwrap();
//!
//! assert_eq!(engine.values(q).unwrap().collect::<Vec<_>>(), ["a", "c"]);
//! ```
//!
//! # Storage Options
//!
//! | Engine | Storage | Capacity | Built with |
//! |--------|---------|----------|------------|
//! | [`FixedQueues`] | [`FixedStorage`] | Fixed (runtime) | `QueueBuilder::default().capacity(n).build()` |
//! | [`SlabQueues`] | `slab::Slab` | Growable | `QueueBuilder::default().growable().build()` |
//!
//! A fixed engine reports [`QueueError::AllocationFailed`] once its slots run
//! out; a queue whose insert failed is left unchanged.
//!
//! # Merging
//!
//! Several queues of one engine can be merged through a [`QueueChain`], a
//! ring of [`QueueContext`]s built with the same primitives as the queues
//! themselves. See [`chain`].
//!
//! # Critical Invariant: Same Engine
//!
//! A [`QueueHandle`] is only meaningful to the engine that minted it.
//! Handles of freed queues are rejected with [`QueueError::InvalidHandle`]
//! until the slot is reused.

#![warn(missing_docs)]

pub mod builder;
pub mod chain;
pub mod element;
pub mod error;
pub mod index;
pub mod linked;
pub mod queue;
mod sort;
pub mod storage;

pub use builder::{DEFAULT_CAPACITY, GrowableQueueBuilder, QueueBuilder};
pub use chain::{QueueChain, QueueContext};
pub use element::{Element, Node, copy_truncated};
pub use error::{BuildError, QueueError};
pub use index::Index;
pub use linked::{Keys, Linked, Ring, link_after, link_before, unlink};
pub use queue::{QueueEngine, QueueHandle};
pub use storage::{FixedStorage, Full, Storage};

/// Engine over fixed-capacity storage with `u32` indices.
pub type FixedQueues = QueueEngine<FixedStorage<Node<u32>, u32>, u32>;

/// Engine over growable `slab::Slab` storage.
pub type SlabQueues = QueueEngine<slab::Slab<Node<usize>>, usize>;
