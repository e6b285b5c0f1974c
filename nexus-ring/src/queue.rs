//! The queue engine.
//!
//! A [`QueueEngine`] owns one storage pool holding every node of every queue
//! it created. Each queue is a ring closed through its own sentinel node;
//! callers hold a [`QueueHandle`] naming that sentinel.
//!
//! All structural operations relink nodes in place. The only node allocated
//! beyond the queues' own is one scratch sentinel, created with the engine and
//! used by [`QueueEngine::reverse_k`] to hold a block while it is reversed.
//!
//! # Example
//!
//! ```
//! use nexus_ring::QueueBuilder;
//!
//! let mut engine = QueueBuilder::default().capacity(64).build().unwrap();
//! let q = engine.new_queue().unwrap();
//!
//! for v in ["c", "a", "b"] {
//!     engine.insert_tail(q, v).unwrap();
//! }
//! engine.sort(q, false).unwrap();
//! assert_eq!(engine.values(q).unwrap().collect::<Vec<_>>(), ["a", "b", "c"]);
//!
//! let mut buf = [0u8; 8];
//! let head = engine.remove_head(q, Some(&mut buf[..])).unwrap();
//! assert_eq!(head.value(), "a");
//! assert_eq!(&buf[..2], b"a\0");
//! assert_eq!(engine.size(q), 2);
//! ```

use core::cmp::Ordering;

use tracing::{debug, trace, warn};

use crate::element::try_copy_value;
use crate::linked::{next_of, prev_of, unlink};
use crate::{BuildError, Element, Index, Node, QueueError, Ring, Storage, copy_truncated};

const DANGLING: &str = "queue link points at a vacant slot";

/// Handle naming one queue inside a [`QueueEngine`].
///
/// Handles are minted by [`QueueEngine::new_queue`] and stay valid until the
/// queue is freed. Using a handle with a different engine than the one that
/// created it is a logic error; it is either rejected as
/// [`QueueError::InvalidHandle`] or names an unrelated queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueueHandle<Idx: Index = u32> {
    ring: Ring<Idx>,
}

impl<Idx: Index> QueueHandle<Idx> {
    /// Returns the storage index of the queue's sentinel.
    #[inline]
    pub fn sentinel(self) -> Idx {
        self.ring.head()
    }
}

/// Owns the node pool and runs every queue operation.
///
/// # Type Parameters
///
/// - `S`: Storage for nodes (e.g. [`FixedStorage`](crate::FixedStorage))
/// - `Idx`: Index type (default `u32`)
#[derive(Debug)]
pub struct QueueEngine<S, Idx: Index = u32>
where
    S: Storage<Node<Idx>, Index = Idx>,
{
    pub(crate) storage: S,
    /// Sentinel of the engine-private ring used by `reverse_k`.
    scratch: Idx,
}

impl<S, Idx: Index> QueueEngine<S, Idx>
where
    S: Storage<Node<Idx>, Index = Idx>,
{
    /// Creates an engine over `storage`.
    ///
    /// One slot is taken for the internal scratch sentinel.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::AllocationFailed`] if that slot cannot be taken.
    pub fn new(mut storage: S) -> Result<Self, BuildError> {
        let scratch = storage
            .try_insert(Node::sentinel())
            .map_err(|_| BuildError::AllocationFailed)?;
        Ring::init(&mut storage, scratch);
        Ok(Self { storage, scratch })
    }

    /// Returns the backing storage.
    #[inline]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    // ========================================================================
    // Construction / destruction
    // ========================================================================

    /// Creates an empty queue.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::AllocationFailed`] if no slot is left for the
    /// sentinel.
    pub fn new_queue(&mut self) -> Result<QueueHandle<Idx>, QueueError> {
        let head = self
            .storage
            .try_insert(Node::sentinel())
            .map_err(|_| QueueError::AllocationFailed)?;
        let ring = Ring::init(&mut self.storage, head);
        debug!(sentinel = ?head, "created queue");
        Ok(QueueHandle { ring })
    }

    /// Frees a queue: every element and then the sentinel.
    ///
    /// Returns the number of elements released. An invalid handle releases
    /// nothing.
    pub fn free_queue(&mut self, queue: QueueHandle<Idx>) -> usize {
        let Ok(ring) = self.ring(queue) else {
            return 0;
        };

        let mut released = 0;
        while let Some(first) = ring.first(&self.storage) {
            self.delete(first);
            released += 1;
        }
        self.storage.remove(ring.head());

        debug!(sentinel = ?ring.head(), released, "freed queue");
        released
    }

    /// Resolves a handle to its ring, rejecting anything that is not a live
    /// queue sentinel.
    #[inline]
    pub(crate) fn ring(&self, queue: QueueHandle<Idx>) -> Result<Ring<Idx>, QueueError> {
        let head = queue.ring.head();
        let live = head != self.scratch
            && self
                .storage
                .get(head)
                .is_some_and(|node| node.is_sentinel());
        if live {
            Ok(queue.ring)
        } else {
            Err(QueueError::InvalidHandle)
        }
    }

    #[inline]
    fn node(&self, idx: Idx) -> &Node<Idx> {
        self.storage.get(idx).expect(DANGLING)
    }

    #[inline]
    fn node_mut(&mut self, idx: Idx) -> &mut Node<Idx> {
        self.storage.get_mut(idx).expect(DANGLING)
    }

    /// Unlinks an element and releases it (value and slot).
    #[inline]
    fn delete(&mut self, idx: Idx) {
        unlink(&mut self.storage, idx);
        self.storage.remove(idx);
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Counts the queue's elements by walking its ring.
    ///
    /// Returns 0 for an invalid handle.
    pub fn size(&self, queue: QueueHandle<Idx>) -> usize {
        self.ring(queue).map_or(0, |ring| ring.len(&self.storage))
    }

    /// Returns `true` if the queue has no elements.
    pub fn is_empty(&self, queue: QueueHandle<Idx>) -> Result<bool, QueueError> {
        Ok(self.ring(queue)?.is_empty(&self.storage))
    }

    /// Returns `true` if the queue has exactly one element.
    pub fn is_singular(&self, queue: QueueHandle<Idx>) -> Result<bool, QueueError> {
        Ok(self.ring(queue)?.is_singular(&self.storage))
    }

    /// Returns an iterator over the queue's values, front to back.
    pub fn values(
        &self,
        queue: QueueHandle<Idx>,
    ) -> Result<impl Iterator<Item = &str> + '_, QueueError> {
        let ring = self.ring(queue)?;
        Ok(ring.keys(&self.storage).map(move |idx| self.node(idx).key()))
    }

    // ========================================================================
    // Insertion / removal
    // ========================================================================

    /// Inserts a copy of `value` at the front of the queue.
    ///
    /// # Errors
    ///
    /// - [`QueueError::InvalidHandle`] if `queue` is not live
    /// - [`QueueError::AllocationFailed`] if the slot or the copy cannot be
    ///   allocated; the queue is unchanged
    pub fn insert_head(&mut self, queue: QueueHandle<Idx>, value: &str) -> Result<(), QueueError> {
        let ring = self.ring(queue)?;
        let idx = self.alloc_element(value)?;
        ring.push_front(&mut self.storage, idx);
        Ok(())
    }

    /// Inserts a copy of `value` at the back of the queue.
    ///
    /// # Errors
    ///
    /// Same as [`insert_head`](Self::insert_head).
    pub fn insert_tail(&mut self, queue: QueueHandle<Idx>, value: &str) -> Result<(), QueueError> {
        let ring = self.ring(queue)?;
        let idx = self.alloc_element(value)?;
        ring.push_back(&mut self.storage, idx);
        Ok(())
    }

    fn alloc_element(&mut self, value: &str) -> Result<Idx, QueueError> {
        let owned = try_copy_value(value).inspect_err(|_| {
            warn!(len = value.len(), "value copy allocation failed");
        })?;
        self.storage
            .try_insert(Node::element(owned))
            .map_err(|_| {
                warn!(len = self.storage.len(), "node storage exhausted");
                QueueError::AllocationFailed
            })
    }

    /// Detaches the front element and hands it to the caller.
    ///
    /// If `buf` is given, the value is also copied into it, truncated and
    /// NUL-terminated (see [`copy_truncated`]).
    ///
    /// # Errors
    ///
    /// - [`QueueError::InvalidHandle`] if `queue` is not live
    /// - [`QueueError::Empty`] if there is no element to remove
    pub fn remove_head(
        &mut self,
        queue: QueueHandle<Idx>,
        buf: Option<&mut [u8]>,
    ) -> Result<Element, QueueError> {
        let ring = self.ring(queue)?;
        let idx = ring.first(&self.storage).ok_or(QueueError::Empty)?;
        Ok(self.detach(idx, buf))
    }

    /// Detaches the back element and hands it to the caller.
    ///
    /// # Errors
    ///
    /// Same as [`remove_head`](Self::remove_head).
    pub fn remove_tail(
        &mut self,
        queue: QueueHandle<Idx>,
        buf: Option<&mut [u8]>,
    ) -> Result<Element, QueueError> {
        let ring = self.ring(queue)?;
        let idx = ring.last(&self.storage).ok_or(QueueError::Empty)?;
        Ok(self.detach(idx, buf))
    }

    fn detach(&mut self, idx: Idx, buf: Option<&mut [u8]>) -> Element {
        unlink(&mut self.storage, idx);
        let value = self
            .storage
            .remove(idx)
            .and_then(|mut node| node.take_value())
            .expect(DANGLING);
        if let Some(buf) = buf {
            copy_truncated(buf, value.as_bytes());
        }
        Element::new(value)
    }

    // ========================================================================
    // Structural algorithms
    // ========================================================================

    /// Deletes the element at index `n / 2` (0-based from the front).
    ///
    /// # Errors
    ///
    /// - [`QueueError::InvalidHandle`] if `queue` is not live
    /// - [`QueueError::Empty`] if the queue is empty
    pub fn delete_mid(&mut self, queue: QueueHandle<Idx>) -> Result<(), QueueError> {
        let ring = self.ring(queue)?;
        if ring.is_empty(&self.storage) {
            return Err(QueueError::Empty);
        }

        // `fast` moves two steps for each step of `slow`; when it can no
        // longer take two steps, `slow.next` sits at index n / 2.
        let head = ring.head();
        let mut slow = head;
        let mut fast = next_of(&self.storage, head);
        while fast != head {
            let ahead = next_of(&self.storage, fast);
            if ahead == head {
                break;
            }
            fast = next_of(&self.storage, ahead);
            slow = next_of(&self.storage, slow);
        }

        let victim = next_of(&self.storage, slow);
        self.delete(victim);
        Ok(())
    }

    /// Deletes every element whose value occurs more than once.
    ///
    /// The queue must be sorted (either direction) so equal values are
    /// adjacent. Survivors keep their relative order.
    ///
    /// # Errors
    ///
    /// - [`QueueError::InvalidHandle`] if `queue` is not live
    /// - [`QueueError::Empty`] if the queue is empty
    pub fn delete_dup(&mut self, queue: QueueHandle<Idx>) -> Result<(), QueueError> {
        let ring = self.ring(queue)?;
        if ring.is_empty(&self.storage) {
            return Err(QueueError::Empty);
        }

        let head = ring.head();
        let mut removed = 0usize;
        let mut in_run = false;
        let mut cur = next_of(&self.storage, head);
        while cur != head {
            let next = next_of(&self.storage, cur);
            let equal_next = next != head && self.node(cur).key() == self.node(next).key();
            if equal_next {
                self.delete(cur);
                removed += 1;
                in_run = true;
            } else if in_run {
                // Last member of a run: equal to its (already deleted)
                // predecessor.
                self.delete(cur);
                removed += 1;
                in_run = false;
            }
            cur = next;
        }

        trace!(removed, "deleted duplicates");
        Ok(())
    }

    /// Exchanges the values of each adjacent pair. An odd trailing element is
    /// left alone.
    pub fn swap(&mut self, queue: QueueHandle<Idx>) -> Result<(), QueueError> {
        let ring = self.ring(queue)?;
        let head = ring.head();

        let mut cur = next_of(&self.storage, head);
        while cur != head {
            let partner = next_of(&self.storage, cur);
            if partner == head {
                break;
            }
            let value = self.node_mut(cur).take_value();
            let value = self.node_mut(partner).replace_value(value);
            self.node_mut(cur).replace_value(value);
            cur = next_of(&self.storage, partner);
        }
        Ok(())
    }

    /// Reverses the queue in place.
    pub fn reverse(&mut self, queue: QueueHandle<Idx>) -> Result<(), QueueError> {
        let ring = self.ring(queue)?;
        self.reverse_ring(ring);
        Ok(())
    }

    /// Moves each element in turn to the front, which inverts the order.
    pub(crate) fn reverse_ring(&mut self, ring: Ring<Idx>) {
        let head = ring.head();
        let mut cur = next_of(&self.storage, head);
        while cur != head {
            let next = next_of(&self.storage, cur);
            ring.move_to_front(&mut self.storage, cur);
            cur = next;
        }
    }

    /// Reverses each consecutive block of `k` elements.
    ///
    /// A trailing block shorter than `k` keeps its order. `k <= 1` leaves the
    /// queue unchanged.
    pub fn reverse_k(&mut self, queue: QueueHandle<Idx>, k: usize) -> Result<(), QueueError> {
        let ring = self.ring(queue)?;
        if k <= 1 {
            return Ok(());
        }

        let scratch = Ring::from_head(self.scratch);
        let head = ring.head();
        let mut anchor = head;
        let mut count = 0;
        let mut blocks = 0usize;
        let mut cur = next_of(&self.storage, head);
        while cur != head {
            let next = next_of(&self.storage, cur);
            count += 1;
            if count == k {
                scratch.cut_position(&mut self.storage, anchor, cur);
                self.reverse_ring(scratch);
                ring.splice_after(&mut self.storage, anchor, scratch);
                // The block's new last element precedes `next`.
                anchor = prev_of(&self.storage, next);
                count = 0;
                blocks += 1;
            }
            cur = next;
        }

        trace!(k, blocks, "reversed blocks");
        Ok(())
    }

    /// Deletes every element that has a strictly smaller value somewhere to
    /// its right. Survivors read non-decreasing front to back.
    ///
    /// Returns the resulting size; an empty queue returns 0.
    pub fn ascend(&mut self, queue: QueueHandle<Idx>) -> Result<usize, QueueError> {
        self.retain_monotonic(queue, Ordering::Greater)
    }

    /// Deletes every element that has a strictly greater value somewhere to
    /// its right. Survivors read non-increasing front to back.
    ///
    /// Returns the resulting size; an empty queue returns 0.
    pub fn descend(&mut self, queue: QueueHandle<Idx>) -> Result<usize, QueueError> {
        self.retain_monotonic(queue, Ordering::Less)
    }

    /// Reverse, sweep once keeping a running best, reverse back. An element
    /// is deleted when it compares `dominated` against the running best.
    fn retain_monotonic(
        &mut self,
        queue: QueueHandle<Idx>,
        dominated: Ordering,
    ) -> Result<usize, QueueError> {
        let ring = self.ring(queue)?;
        if ring.is_empty(&self.storage) {
            return Ok(0);
        }

        self.reverse_ring(ring);

        let head = ring.head();
        let mut best = next_of(&self.storage, head);
        let mut cur = next_of(&self.storage, best);
        let mut removed = 0usize;
        while cur != head {
            let next = next_of(&self.storage, cur);
            if self.node(cur).key().cmp(self.node(best).key()) == dominated {
                self.delete(cur);
                removed += 1;
            } else {
                best = cur;
            }
            cur = next;
        }

        self.reverse_ring(ring);

        trace!(removed, "monotonic filter");
        Ok(ring.len(&self.storage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedQueues, QueueBuilder};

    fn engine(capacity: usize) -> FixedQueues {
        QueueBuilder::default().capacity(capacity).build().unwrap()
    }

    fn queue_of(engine: &mut FixedQueues, values: &[&str]) -> QueueHandle {
        let q = engine.new_queue().unwrap();
        for v in values {
            engine.insert_tail(q, v).unwrap();
        }
        q
    }

    fn contents(engine: &FixedQueues, q: QueueHandle) -> Vec<String> {
        let ring = engine.ring(q).unwrap();
        assert!(ring.is_closed(&engine.storage), "ring closure broken");
        engine.values(q).unwrap().map(str::to_owned).collect()
    }

    #[test]
    fn new_queue_is_empty() {
        let mut e = engine(8);
        let q = e.new_queue().unwrap();
        assert_eq!(e.size(q), 0);
        assert_eq!(e.is_empty(q), Ok(true));
        assert_eq!(e.is_singular(q), Ok(false));
    }

    #[test]
    fn insert_head_and_tail() {
        let mut e = engine(8);
        let q = e.new_queue().unwrap();
        e.insert_tail(q, "b").unwrap();
        e.insert_head(q, "a").unwrap();
        e.insert_tail(q, "c").unwrap();
        assert_eq!(contents(&e, q), ["a", "b", "c"]);
        assert_eq!(e.size(q), 3);
    }

    #[test]
    fn insert_copies_value() {
        let mut e = engine(8);
        let q = e.new_queue().unwrap();
        let mut s = String::from("owl");
        e.insert_tail(q, &s).unwrap();
        s.push_str("bear");
        assert_eq!(contents(&e, q), ["owl"]);
    }

    #[test]
    fn insert_fails_when_storage_full() {
        let mut e = engine(3);
        let q = queue_of(&mut e, &["a", "b"]);
        let used = e.storage().len();

        assert_eq!(e.insert_tail(q, "c"), Err(QueueError::AllocationFailed));
        assert_eq!(e.insert_head(q, "c"), Err(QueueError::AllocationFailed));
        assert_eq!(contents(&e, q), ["a", "b"]);
        assert_eq!(e.storage().len(), used);
    }

    #[test]
    fn remove_head_and_tail() {
        let mut e = engine(8);
        let q = queue_of(&mut e, &["a", "b", "c"]);

        assert_eq!(e.remove_head(q, None).unwrap().value(), "a");
        assert_eq!(e.remove_tail(q, None).unwrap().value(), "c");
        assert_eq!(contents(&e, q), ["b"]);
        assert_eq!(e.is_singular(q), Ok(true));
    }

    #[test]
    fn remove_frees_slot() {
        let mut e = engine(8);
        let q = queue_of(&mut e, &["a"]);
        let used = e.storage().len();
        let _ = e.remove_head(q, None).unwrap();
        assert_eq!(e.storage().len(), used - 1);
    }

    #[test]
    fn remove_copies_into_buffer() {
        let mut e = engine(8);
        let q = queue_of(&mut e, &["elephant", "cat"]);

        let mut buf = [0xffu8; 4];
        let el = e.remove_head(q, Some(&mut buf[..])).unwrap();
        assert_eq!(el.value(), "elephant");
        assert_eq!(&buf, b"ele\0");

        let mut buf = [0xffu8; 8];
        e.remove_tail(q, Some(&mut buf[..])).unwrap();
        assert_eq!(&buf[..4], b"cat\0");
    }

    #[test]
    fn remove_from_empty() {
        let mut e = engine(8);
        let q = e.new_queue().unwrap();
        assert_eq!(e.remove_head(q, None), Err(QueueError::Empty));
        assert_eq!(e.remove_tail(q, None), Err(QueueError::Empty));
        assert_eq!(e.size(q), 0);
    }

    #[test]
    fn freed_handle_is_invalid() {
        let mut e = engine(8);
        let q = queue_of(&mut e, &["a", "b"]);
        assert_eq!(e.free_queue(q), 2);
        assert_eq!(e.storage().len(), 1); // scratch only

        assert_eq!(e.size(q), 0);
        assert_eq!(e.insert_tail(q, "x"), Err(QueueError::InvalidHandle));
        assert_eq!(e.remove_head(q, None), Err(QueueError::InvalidHandle));
        assert_eq!(e.reverse(q), Err(QueueError::InvalidHandle));
        assert_eq!(e.ascend(q), Err(QueueError::InvalidHandle));
        assert_eq!(e.free_queue(q), 0);
    }

    #[test]
    fn element_slot_is_not_a_handle() {
        let mut e = engine(8);
        let q = queue_of(&mut e, &["a"]);
        let first = e.ring(q).unwrap().first(&e.storage).unwrap();
        let forged = QueueHandle {
            ring: Ring::from_head(first),
        };
        assert_eq!(e.size(forged), 0);
        assert_eq!(e.swap(forged), Err(QueueError::InvalidHandle));
    }

    #[test]
    fn scratch_is_not_a_handle() {
        let e = engine(8);
        let forged = QueueHandle {
            ring: Ring::from_head(e.scratch),
        };
        assert_eq!(e.is_empty(forged), Err(QueueError::InvalidHandle));
    }

    #[test]
    fn delete_mid_picks_floor_half() {
        let cases: Vec<(Vec<&str>, Vec<&str>)> = vec![
            (vec!["a"], vec![]),
            (vec!["a", "b"], vec!["a"]),
            (vec!["a", "b", "c"], vec!["a", "c"]),
            (vec!["a", "b", "c", "d"], vec!["a", "b", "d"]),
            (vec!["a", "b", "c", "d", "e"], vec!["a", "b", "d", "e"]),
            (vec!["a", "b", "c", "d", "e", "f"], vec!["a", "b", "c", "e", "f"]),
        ];
        for (input, expected) in cases {
            let mut e = engine(16);
            let q = queue_of(&mut e, &input);
            e.delete_mid(q).unwrap();
            assert_eq!(contents(&e, q), expected, "input {input:?}");
        }
    }

    #[test]
    fn delete_mid_empty() {
        let mut e = engine(8);
        let q = e.new_queue().unwrap();
        assert_eq!(e.delete_mid(q), Err(QueueError::Empty));
    }

    #[test]
    fn delete_dup_removes_whole_runs() {
        let mut e = engine(16);
        let q = queue_of(&mut e, &["1", "1", "2", "3", "3"]);
        e.delete_dup(q).unwrap();
        assert_eq!(contents(&e, q), ["2"]);
    }

    #[test]
    fn delete_dup_trailing_run() {
        let mut e = engine(16);
        let q = queue_of(&mut e, &["a", "b", "c", "c", "c"]);
        e.delete_dup(q).unwrap();
        assert_eq!(contents(&e, q), ["a", "b"]);
    }

    #[test]
    fn delete_dup_descending_input() {
        let mut e = engine(16);
        let q = queue_of(&mut e, &["z", "y", "y", "x", "w", "w"]);
        e.delete_dup(q).unwrap();
        assert_eq!(contents(&e, q), ["z", "x"]);
    }

    #[test]
    fn delete_dup_all_equal_and_distinct() {
        let mut e = engine(16);
        let q = queue_of(&mut e, &["k", "k", "k"]);
        e.delete_dup(q).unwrap();
        assert!(contents(&e, q).is_empty());

        let q = queue_of(&mut e, &["a", "b", "c"]);
        e.delete_dup(q).unwrap();
        assert_eq!(contents(&e, q), ["a", "b", "c"]);
    }

    #[test]
    fn delete_dup_empty() {
        let mut e = engine(8);
        let q = e.new_queue().unwrap();
        assert_eq!(e.delete_dup(q), Err(QueueError::Empty));
    }

    #[test]
    fn swap_pairs() {
        let mut e = engine(16);
        let q = queue_of(&mut e, &["1", "2", "3", "4"]);
        e.swap(q).unwrap();
        assert_eq!(contents(&e, q), ["2", "1", "4", "3"]);

        let q = queue_of(&mut e, &["1", "2", "3"]);
        e.swap(q).unwrap();
        assert_eq!(contents(&e, q), ["2", "1", "3"]);
    }

    #[test]
    fn swap_keeps_node_identity() {
        let mut e = engine(8);
        let q = queue_of(&mut e, &["1", "2"]);
        let before: Vec<_> = e.ring(q).unwrap().keys(&e.storage).collect();
        e.swap(q).unwrap();
        let after: Vec<_> = e.ring(q).unwrap().keys(&e.storage).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn swap_and_reverse_empty_are_noops() {
        let mut e = engine(8);
        let q = e.new_queue().unwrap();
        e.swap(q).unwrap();
        e.reverse(q).unwrap();
        e.reverse_k(q, 3).unwrap();
        assert_eq!(e.size(q), 0);
    }

    #[test]
    fn reverse_whole_queue() {
        let mut e = engine(16);
        let q = queue_of(&mut e, &["a", "b", "c", "d"]);
        e.reverse(q).unwrap();
        assert_eq!(contents(&e, q), ["d", "c", "b", "a"]);
        e.reverse(q).unwrap();
        assert_eq!(contents(&e, q), ["a", "b", "c", "d"]);
    }

    #[test]
    fn reverse_k_leaves_partial_block() {
        let mut e = engine(16);
        let q = queue_of(&mut e, &["a", "b", "c"]);
        e.reverse_k(q, 2).unwrap();
        assert_eq!(contents(&e, q), ["b", "a", "c"]);
    }

    #[test]
    fn reverse_k_multiple_blocks() {
        let mut e = engine(16);
        let q = queue_of(&mut e, &["1", "2", "3", "4", "5", "6", "7", "8"]);
        e.reverse_k(q, 3).unwrap();
        assert_eq!(contents(&e, q), ["3", "2", "1", "6", "5", "4", "7", "8"]);
    }

    #[test]
    fn reverse_k_exact_and_oversized() {
        let mut e = engine(16);
        let q = queue_of(&mut e, &["1", "2", "3", "4"]);
        e.reverse_k(q, 4).unwrap();
        assert_eq!(contents(&e, q), ["4", "3", "2", "1"]);

        e.reverse_k(q, 5).unwrap();
        assert_eq!(contents(&e, q), ["4", "3", "2", "1"]);

        e.reverse_k(q, 1).unwrap();
        e.reverse_k(q, 0).unwrap();
        assert_eq!(contents(&e, q), ["4", "3", "2", "1"]);
    }

    #[test]
    fn reverse_k_leaves_scratch_empty() {
        let mut e = engine(16);
        let q = queue_of(&mut e, &["1", "2", "3", "4", "5"]);
        e.reverse_k(q, 2).unwrap();
        assert!(Ring::from_head(e.scratch).is_empty(&e.storage));
    }

    #[test]
    fn ascend_keeps_non_decreasing_suffix_minima() {
        let mut e = engine(16);
        let q = queue_of(&mut e, &["5", "2", "13", "3", "8"]);
        // Byte-wise, "13" sorts below "2".
        assert_eq!(e.ascend(q), Ok(3));
        assert_eq!(contents(&e, q), ["13", "3", "8"]);
    }

    #[test]
    fn descend_keeps_non_increasing_suffix_maxima() {
        let mut e = engine(16);
        let q = queue_of(&mut e, &["5", "2", "9", "3", "8"]);
        assert_eq!(e.descend(q), Ok(2));
        assert_eq!(contents(&e, q), ["9", "8"]);
    }

    #[test]
    fn monotonic_keeps_equal_values() {
        let mut e = engine(16);
        let q = queue_of(&mut e, &["b", "b", "a", "a"]);
        assert_eq!(e.ascend(q), Ok(2));
        assert_eq!(contents(&e, q), ["a", "a"]);

        let q = queue_of(&mut e, &["a", "b", "b"]);
        assert_eq!(e.descend(q), Ok(2));
        assert_eq!(contents(&e, q), ["b", "b"]);
    }

    #[test]
    fn monotonic_on_empty_queue() {
        let mut e = engine(8);
        let q = e.new_queue().unwrap();
        assert_eq!(e.ascend(q), Ok(0));
        assert_eq!(e.descend(q), Ok(0));
    }

    #[test]
    fn internal_deletes_release_slots() {
        let mut e = engine(16);
        let q = queue_of(&mut e, &["1", "1", "2"]);
        let used = e.storage().len();
        e.delete_dup(q).unwrap();
        assert_eq!(e.storage().len(), used - 2);
        e.delete_mid(q).unwrap();
        assert_eq!(e.storage().len(), used - 3);
    }
}
