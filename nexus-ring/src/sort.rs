//! Stable merge sort over a queue ring.
//!
//! The ring is opened into a chain terminated by `Idx::NONE` and sorted
//! top-down using only `next` links. Back links are rebuilt in one pass
//! afterwards and the sentinel closes the ring again.

use tracing::trace;

use crate::linked::{next_of, prev_of, set_next, set_prev};
use crate::{Index, Node, QueueEngine, QueueError, QueueHandle, Storage};

impl<S, Idx: Index> QueueEngine<S, Idx>
where
    S: Storage<Node<Idx>, Index = Idx>,
{
    /// Sorts the queue by byte-wise value order.
    ///
    /// The sort is stable: equal values keep their relative order. With
    /// `descend` the ascending result is reversed, so equal values come out
    /// in reverse input order.
    pub fn sort(&mut self, queue: QueueHandle<Idx>, descend: bool) -> Result<(), QueueError> {
        let ring = self.ring(queue)?;
        let Some(first) = ring.first(&self.storage) else {
            return Ok(());
        };
        let head = ring.head();

        let last = prev_of(&self.storage, head);
        set_next(&mut self.storage, last, Idx::NONE);

        let sorted = merge_sort(&mut self.storage, first);

        let mut prev = head;
        let mut cur = sorted;
        while cur.is_some() {
            set_next(&mut self.storage, prev, cur);
            set_prev(&mut self.storage, cur, prev);
            prev = cur;
            cur = next_of(&self.storage, cur);
        }
        set_next(&mut self.storage, prev, head);
        set_prev(&mut self.storage, head, prev);

        if descend {
            self.reverse_ring(ring);
        }

        trace!(descend, "sorted queue");
        Ok(())
    }
}

#[inline]
fn key<'a, S, Idx>(storage: &'a S, idx: Idx) -> &'a str
where
    Idx: Index + 'a,
    S: Storage<Node<Idx>, Index = Idx>,
{
    storage
        .get(idx)
        .expect("sort chain points at a vacant slot")
        .key()
}

fn merge_sort<S, Idx>(storage: &mut S, head: Idx) -> Idx
where
    Idx: Index,
    S: Storage<Node<Idx>, Index = Idx>,
{
    if head.is_none() || next_of(storage, head).is_none() {
        return head;
    }

    let mid = split(storage, head);
    let left = merge_sort(storage, head);
    let right = merge_sort(storage, mid);
    merge(storage, left, right)
}

/// Cuts a chain of two or more nodes in half and returns the second half.
/// The first half keeps the extra node when the length is odd.
fn split<S, Idx>(storage: &mut S, head: Idx) -> Idx
where
    Idx: Index,
    S: Storage<Node<Idx>, Index = Idx>,
{
    let mut slow = head;
    let mut fast = next_of(storage, head);
    while fast.is_some() {
        let ahead = next_of(storage, fast);
        if ahead.is_none() {
            break;
        }
        slow = next_of(storage, slow);
        fast = next_of(storage, ahead);
    }

    let mid = next_of(storage, slow);
    set_next(storage, slow, Idx::NONE);
    mid
}

/// Merges two sorted chains. On ties the left node goes first.
fn merge<S, Idx>(storage: &mut S, mut left: Idx, mut right: Idx) -> Idx
where
    Idx: Index,
    S: Storage<Node<Idx>, Index = Idx>,
{
    let mut head = Idx::NONE;
    let mut tail = Idx::NONE;

    while left.is_some() && right.is_some() {
        let take_left = key(storage, left) <= key(storage, right);
        let pick = if take_left { left } else { right };
        if take_left {
            left = next_of(storage, left);
        } else {
            right = next_of(storage, right);
        }

        if tail.is_none() {
            head = pick;
        } else {
            set_next(storage, tail, pick);
        }
        tail = pick;
    }

    let rest = if left.is_some() { left } else { right };
    if tail.is_none() {
        return rest;
    }
    set_next(storage, tail, rest);
    head
}
