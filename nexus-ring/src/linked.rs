//! Circular, sentinel-headed rings over external storage.
//!
//! A ring is closed through a payload-free sentinel node: the sentinel's
//! `next` is the first element and its `prev` the last. An empty ring is a
//! sentinel pointing at itself in both directions. Every primitive here keeps
//! `next`/`prev` mutual inverses for each adjacent pair.
//!
//! Nodes embed their own links via [`Linked`], so the same primitives thread
//! element rings and the queue-context meta-ring (see [`crate::chain`]).
//!
//! # Example
//!
//! ```
//! use nexus_ring::{FixedStorage, Index, Linked, Ring, Storage};
//!
//! #[derive(Debug)]
//! struct Slot {
//!     value: u64,
//!     next: u32,
//!     prev: u32,
//! }
//!
//! impl Slot {
//!     fn new(value: u64) -> Self {
//!         Self { value, next: u32::NONE, prev: u32::NONE }
//!     }
//! }
//!
//! impl Linked<u32> for Slot {
//!     fn next(&self) -> u32 { self.next }
//!     fn prev(&self) -> u32 { self.prev }
//!     fn set_next(&mut self, idx: u32) { self.next = idx; }
//!     fn set_prev(&mut self, idx: u32) { self.prev = idx; }
//! }
//!
//! let mut storage: FixedStorage<Slot> = FixedStorage::with_capacity(8).unwrap();
//! let head = storage.try_insert(Slot::new(0)).unwrap();
//! let ring = Ring::init(&mut storage, head);
//!
//! let a = storage.try_insert(Slot::new(1)).unwrap();
//! let b = storage.try_insert(Slot::new(2)).unwrap();
//! ring.push_back(&mut storage, a);
//! ring.push_front(&mut storage, b);
//!
//! assert_eq!(ring.keys(&storage).collect::<Vec<_>>(), vec![b, a]);
//! assert!(ring.is_closed(&storage));
//! ```

use crate::{Index, Storage};

/// Trait for types that can be threaded into a ring.
///
/// Implementors embed prev/next indices directly in their struct. A node
/// that is not linked anywhere holds `Idx::NONE` in both fields.
pub trait Linked<Idx: Index> {
    /// Returns the next node's index.
    fn next(&self) -> Idx;

    /// Returns the previous node's index.
    fn prev(&self) -> Idx;

    /// Sets the next node's index.
    fn set_next(&mut self, idx: Idx);

    /// Sets the previous node's index.
    fn set_prev(&mut self, idx: Idx);
}

const DANGLING: &str = "ring link points at a vacant slot";

#[inline]
pub(crate) fn next_of<T, S, Idx>(storage: &S, idx: Idx) -> Idx
where
    Idx: Index,
    T: Linked<Idx>,
    S: Storage<T, Index = Idx>,
{
    storage.get(idx).expect(DANGLING).next()
}

#[inline]
pub(crate) fn prev_of<T, S, Idx>(storage: &S, idx: Idx) -> Idx
where
    Idx: Index,
    T: Linked<Idx>,
    S: Storage<T, Index = Idx>,
{
    storage.get(idx).expect(DANGLING).prev()
}

#[inline]
pub(crate) fn set_next<T, S, Idx>(storage: &mut S, idx: Idx, next: Idx)
where
    Idx: Index,
    T: Linked<Idx>,
    S: Storage<T, Index = Idx>,
{
    storage.get_mut(idx).expect(DANGLING).set_next(next);
}

#[inline]
pub(crate) fn set_prev<T, S, Idx>(storage: &mut S, idx: Idx, prev: Idx)
where
    Idx: Index,
    T: Linked<Idx>,
    S: Storage<T, Index = Idx>,
{
    storage.get_mut(idx).expect(DANGLING).set_prev(prev);
}

/// Links a detached node immediately after `at`.
///
/// # Panics
///
/// Panics if `at` or `idx` is not valid in storage.
#[inline]
pub fn link_after<T, S, Idx>(storage: &mut S, at: Idx, idx: Idx)
where
    Idx: Index,
    T: Linked<Idx>,
    S: Storage<T, Index = Idx>,
{
    let next = next_of(storage, at);
    {
        let node = storage.get_mut(idx).expect("invalid index");
        node.set_prev(at);
        node.set_next(next);
    }
    set_prev(storage, next, idx);
    set_next(storage, at, idx);
}

/// Links a detached node immediately before `at`.
///
/// # Panics
///
/// Panics if `at` or `idx` is not valid in storage.
#[inline]
pub fn link_before<T, S, Idx>(storage: &mut S, at: Idx, idx: Idx)
where
    Idx: Index,
    T: Linked<Idx>,
    S: Storage<T, Index = Idx>,
{
    let prev = prev_of(storage, at);
    link_after(storage, prev, idx);
}

/// Unlinks a node from whatever ring holds it, without freeing it.
///
/// The node's own links are reset to `Idx::NONE`. Unlinking a node that is
/// already detached does nothing.
///
/// # Panics
///
/// Panics if `idx` is not valid in storage.
#[inline]
pub fn unlink<T, S, Idx>(storage: &mut S, idx: Idx)
where
    Idx: Index,
    T: Linked<Idx>,
    S: Storage<T, Index = Idx>,
{
    let (prev, next) = {
        let node = storage.get(idx).expect("invalid index");
        (node.prev(), node.next())
    };
    if prev.is_none() || next.is_none() {
        return;
    }

    set_next(storage, prev, next);
    set_prev(storage, next, prev);

    let node = storage.get_mut(idx).expect("invalid index");
    node.set_prev(Idx::NONE);
    node.set_next(Idx::NONE);
}

/// Handle to a ring: the index of its sentinel node.
///
/// The handle is `Copy`; all state lives in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ring<Idx: Index> {
    head: Idx,
}

impl<Idx: Index> Ring<Idx> {
    /// Closes `sentinel` onto itself, making it the head of an empty ring.
    ///
    /// # Panics
    ///
    /// Panics if `sentinel` is not valid in storage.
    #[inline]
    pub fn init<T, S>(storage: &mut S, sentinel: Idx) -> Self
    where
        T: Linked<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let node = storage.get_mut(sentinel).expect("invalid index");
        node.set_next(sentinel);
        node.set_prev(sentinel);
        Self { head: sentinel }
    }

    /// Wraps a sentinel index that already closes a ring.
    #[inline]
    pub(crate) const fn from_head(head: Idx) -> Self {
        Self { head }
    }

    /// Returns the sentinel index.
    #[inline]
    pub const fn head(self) -> Idx {
        self.head
    }

    /// Returns `true` if the ring holds no elements.
    #[inline]
    pub fn is_empty<T, S>(self, storage: &S) -> bool
    where
        T: Linked<Idx>,
        S: Storage<T, Index = Idx>,
    {
        next_of(storage, self.head) == self.head
    }

    /// Returns `true` if the ring holds exactly one element.
    #[inline]
    pub fn is_singular<T, S>(self, storage: &S) -> bool
    where
        T: Linked<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let first = next_of(storage, self.head);
        first != self.head && first == prev_of(storage, self.head)
    }

    /// Returns the first element's index, or `None` if empty.
    #[inline]
    pub fn first<T, S>(self, storage: &S) -> Option<Idx>
    where
        T: Linked<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let first = next_of(storage, self.head);
        if first == self.head { None } else { Some(first) }
    }

    /// Returns the last element's index, or `None` if empty.
    #[inline]
    pub fn last<T, S>(self, storage: &S) -> Option<Idx>
    where
        T: Linked<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let last = prev_of(storage, self.head);
        if last == self.head { None } else { Some(last) }
    }

    /// Links a detached node at the front.
    #[inline]
    pub fn push_front<T, S>(self, storage: &mut S, idx: Idx)
    where
        T: Linked<Idx>,
        S: Storage<T, Index = Idx>,
    {
        link_after(storage, self.head, idx);
    }

    /// Links a detached node at the back.
    #[inline]
    pub fn push_back<T, S>(self, storage: &mut S, idx: Idx)
    where
        T: Linked<Idx>,
        S: Storage<T, Index = Idx>,
    {
        link_before(storage, self.head, idx);
    }

    /// Moves a node (from this or any other ring) to the front.
    #[inline]
    pub fn move_to_front<T, S>(self, storage: &mut S, idx: Idx)
    where
        T: Linked<Idx>,
        S: Storage<T, Index = Idx>,
    {
        unlink(storage, idx);
        link_after(storage, self.head, idx);
    }

    /// Moves a node (from this or any other ring) to the back.
    #[inline]
    pub fn move_to_back<T, S>(self, storage: &mut S, idx: Idx)
    where
        T: Linked<Idx>,
        S: Storage<T, Index = Idx>,
    {
        unlink(storage, idx);
        link_before(storage, self.head, idx);
    }

    /// Moves the range `(from, to]` of another ring into this ring.
    ///
    /// `from` is the node just before the range (a sentinel or an element);
    /// `to` is the last node moved. Anything already in `self` is discarded
    /// from the ring (not freed), so `self` should be empty. If `from == to`
    /// the range is empty and `self` is reset to empty.
    ///
    /// # Panics
    ///
    /// Panics if any index touched is not valid in storage.
    pub fn cut_position<T, S>(self, storage: &mut S, from: Idx, to: Idx)
    where
        T: Linked<Idx>,
        S: Storage<T, Index = Idx>,
    {
        if from == to {
            Self::init(storage, self.head);
            return;
        }

        let first = next_of(storage, from);
        let after = next_of(storage, to);

        // Close the source ring over the gap.
        set_next(storage, from, after);
        set_prev(storage, after, from);

        // Close the destination ring around the range.
        set_next(storage, self.head, first);
        set_prev(storage, first, self.head);
        set_next(storage, to, self.head);
        set_prev(storage, self.head, to);
    }

    /// Moves every element of `src` into this ring right after `at`.
    ///
    /// `at` must be this ring's sentinel or one of its elements. `src` is
    /// left empty.
    pub fn splice_after<T, S>(self, storage: &mut S, at: Idx, src: Ring<Idx>)
    where
        T: Linked<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let (Some(first), Some(last)) = (src.first(storage), src.last(storage)) else {
            return;
        };
        let next = next_of(storage, at);

        set_next(storage, at, first);
        set_prev(storage, first, at);
        set_next(storage, last, next);
        set_prev(storage, next, last);

        Self::init(storage, src.head);
    }

    /// Moves every element of `src` to the front of this ring.
    #[inline]
    pub fn splice_front<T, S>(self, storage: &mut S, src: Ring<Idx>)
    where
        T: Linked<Idx>,
        S: Storage<T, Index = Idx>,
    {
        self.splice_after(storage, self.head, src);
    }

    /// Moves every element of `src` to the back of this ring.
    #[inline]
    pub fn splice_back<T, S>(self, storage: &mut S, src: Ring<Idx>)
    where
        T: Linked<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let last = prev_of(storage, self.head);
        self.splice_after(storage, last, src);
    }

    /// Counts elements by walking the ring. O(n).
    pub fn len<T, S>(self, storage: &S) -> usize
    where
        T: Linked<Idx>,
        S: Storage<T, Index = Idx>,
    {
        self.keys(storage).count()
    }

    /// Returns an iterator over element indices, front to back.
    #[inline]
    pub fn keys<T, S>(self, storage: &S) -> Keys<'_, T, S, Idx>
    where
        T: Linked<Idx>,
        S: Storage<T, Index = Idx>,
    {
        Keys {
            storage,
            head: self.head,
            current: next_of(storage, self.head),
            _marker: core::marker::PhantomData,
        }
    }

    /// Walks the ring checking that `prev(next(n)) == n` everywhere and that
    /// the walk returns to the sentinel.
    ///
    /// Gives up (returns `false`) after visiting more nodes than storage holds,
    /// so a ring that fails to close cannot loop forever.
    pub fn is_closed<T, S>(self, storage: &S) -> bool
    where
        T: Linked<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let mut current = self.head;
        for _ in 0..=storage.len() {
            let Some(node) = storage.get(current) else {
                return false;
            };
            let next = node.next();
            match storage.get(next) {
                Some(n) if n.prev() == current => {}
                _ => return false,
            }
            if next == self.head {
                return true;
            }
            current = next;
        }
        false
    }
}

/// Iterator over element indices of a ring.
pub struct Keys<'a, T, S, Idx: Index> {
    storage: &'a S,
    head: Idx,
    current: Idx,
    _marker: core::marker::PhantomData<T>,
}

impl<T, S, Idx> Iterator for Keys<'_, T, S, Idx>
where
    Idx: Index,
    T: Linked<Idx>,
    S: Storage<T, Index = Idx>,
{
    type Item = Idx;

    #[inline]
    fn next(&mut self) -> Option<Idx> {
        if self.current == self.head {
            return None;
        }
        let idx = self.current;
        self.current = next_of(self.storage, idx);
        Some(idx)
    }
}
