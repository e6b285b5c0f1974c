//! Queue contexts and k-way merge.
//!
//! A [`QueueChain`] is itself a ring: each [`QueueContext`] embeds its own
//! chain links and sits in a slab next to a payload-free chain sentinel. The
//! contexts only name queues; the queues stay in their engine.
//!
//! # Example
//!
//! ```
//! use nexus_ring::{QueueBuilder, QueueChain};
//!
//! let mut engine = QueueBuilder::default().capacity(32).build().unwrap();
//! let a = engine.new_queue().unwrap();
//! let b = engine.new_queue().unwrap();
//! for v in ["1", "3", "5"] {
//!     engine.insert_tail(a, v).unwrap();
//! }
//! for v in ["2", "4"] {
//!     engine.insert_tail(b, v).unwrap();
//! }
//!
//! let mut chain = QueueChain::new();
//! chain.push(a);
//! chain.push(b);
//!
//! assert_eq!(engine.merge(&mut chain, false), Ok(5));
//! assert_eq!(engine.values(a).unwrap().collect::<Vec<_>>(), ["1", "2", "3", "4", "5"]);
//! assert_eq!(engine.size(b), 0);
//! ```

use slab::Slab;
use tracing::debug;

use crate::{Index, Linked, Node, QueueEngine, QueueError, QueueHandle, Ring, Storage};

/// A chain entry naming one queue.
#[derive(Debug)]
pub struct QueueContext<Idx: Index = u32> {
    /// `None` only for the chain's sentinel.
    queue: Option<QueueHandle<Idx>>,
    id: usize,
    size: usize,
    prev: usize,
    next: usize,
}

impl<Idx: Index> QueueContext<Idx> {
    fn sentinel() -> Self {
        Self {
            queue: None,
            id: usize::NONE,
            size: 0,
            prev: usize::NONE,
            next: usize::NONE,
        }
    }

    /// Returns the queue this context names.
    #[inline]
    pub fn queue(&self) -> Option<QueueHandle<Idx>> {
        self.queue
    }

    /// Returns the context's id, assigned in push order.
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the size recorded for the queue by the last merge or refresh.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }
}

impl<Idx: Index> Linked<usize> for QueueContext<Idx> {
    #[inline]
    fn next(&self) -> usize {
        self.next
    }

    #[inline]
    fn prev(&self) -> usize {
        self.prev
    }

    #[inline]
    fn set_next(&mut self, idx: usize) {
        self.next = idx;
    }

    #[inline]
    fn set_prev(&mut self, idx: usize) {
        self.prev = idx;
    }
}

/// A ring of queue contexts.
#[derive(Debug)]
pub struct QueueChain<Idx: Index = u32> {
    contexts: Slab<QueueContext<Idx>>,
    ring: Ring<usize>,
    next_id: usize,
}

impl<Idx: Index> Default for QueueChain<Idx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Idx: Index> QueueChain<Idx> {
    /// Creates an empty chain.
    pub fn new() -> Self {
        let mut contexts = Slab::new();
        let head = contexts.insert(QueueContext::sentinel());
        let ring = Ring::init(&mut contexts, head);
        Self {
            contexts,
            ring,
            next_id: 0,
        }
    }

    /// Appends a context for `queue`, returning its id.
    pub fn push(&mut self, queue: QueueHandle<Idx>) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        let key = self.contexts.insert(QueueContext {
            queue: Some(queue),
            id,
            size: 0,
            prev: usize::NONE,
            next: usize::NONE,
        });
        self.ring.push_back(&mut self.contexts, key);
        id
    }

    /// Removes the context with `id`, returning the queue it named.
    ///
    /// The queue itself is untouched.
    pub fn remove(&mut self, id: usize) -> Option<QueueHandle<Idx>> {
        let key = self.key_of(id)?;
        crate::linked::unlink(&mut self.contexts, key);
        self.contexts.remove(key).queue
    }

    /// Returns the context with `id`.
    pub fn get(&self, id: usize) -> Option<&QueueContext<Idx>> {
        self.key_of(id).map(|key| &self.contexts[key])
    }

    /// Number of contexts, counted by walking the chain.
    pub fn len(&self) -> usize {
        self.ring.len(&self.contexts)
    }

    /// Returns `true` if the chain has no contexts.
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty(&self.contexts)
    }

    /// Returns `true` if the chain has exactly one context.
    pub fn is_singular(&self) -> bool {
        self.ring.is_singular(&self.contexts)
    }

    /// Iterates contexts in push order.
    pub fn iter(&self) -> impl Iterator<Item = &QueueContext<Idx>> + '_ {
        self.ring
            .keys(&self.contexts)
            .map(move |key| &self.contexts[key])
    }

    /// Re-reads every context's size from `engine`.
    pub fn refresh_sizes<S>(&mut self, engine: &QueueEngine<S, Idx>)
    where
        S: Storage<Node<Idx>, Index = Idx>,
    {
        let keys: Vec<usize> = self.ring.keys(&self.contexts).collect();
        for key in keys {
            let ctx = &mut self.contexts[key];
            ctx.size = ctx.queue.map_or(0, |q| engine.size(q));
        }
    }

    fn key_of(&self, id: usize) -> Option<usize> {
        self.ring
            .keys(&self.contexts)
            .find(|&key| self.contexts[key].id == id)
    }

    fn queues(&self) -> impl Iterator<Item = QueueHandle<Idx>> + '_ {
        self.iter().filter_map(QueueContext::queue)
    }

    /// Records a merge result: contexts naming `target` hold `total`, the
    /// rest were drained.
    fn record_merge(&mut self, target: QueueHandle<Idx>, total: usize) {
        let keys: Vec<usize> = self.ring.keys(&self.contexts).collect();
        for key in keys {
            let ctx = &mut self.contexts[key];
            ctx.size = if ctx.queue == Some(target) { total } else { 0 };
        }
    }
}

impl<S, Idx: Index> QueueEngine<S, Idx>
where
    S: Storage<Node<Idx>, Index = Idx>,
{
    /// Merges every queue in `chain` into the first context's queue.
    ///
    /// The other queues are drained (left empty, still allocated, still in
    /// the chain) and the combined queue is sorted in the requested
    /// direction. Returns the combined size; an empty chain returns 0 and a
    /// single context returns its queue's size untouched.
    ///
    /// # Errors
    ///
    /// [`QueueError::InvalidHandle`] if any context names a dead queue; no
    /// queue is modified in that case.
    pub fn merge(&mut self, chain: &mut QueueChain<Idx>, descend: bool) -> Result<usize, QueueError> {
        let Some(target) = chain.queues().next() else {
            return Ok(0);
        };
        for queue in chain.queues() {
            self.ring(queue)?;
        }

        let target_ring = self.ring(target)?;
        if chain.is_singular() {
            let size = target_ring.len(&self.storage);
            chain.record_merge(target, size);
            return Ok(size);
        }

        for queue in chain.queues().skip(1) {
            if queue == target {
                continue;
            }
            let src = self.ring(queue)?;
            target_ring.splice_back(&mut self.storage, src);
        }
        self.sort(target, descend)?;

        let total = target_ring.len(&self.storage);
        chain.record_merge(target, total);
        debug!(queues = chain.len(), total, descend, "merged queues");
        Ok(total)
    }
}
