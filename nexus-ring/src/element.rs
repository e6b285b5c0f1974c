//! Queue nodes and detached elements.

use crate::{Index, Linked, QueueError};

/// A node in a queue ring.
///
/// Element nodes carry an owned value; sentinel nodes carry none and only
/// close the ring. Users see values through the engine's accessors; the node
/// structure is an implementation detail.
#[derive(Debug)]
pub struct Node<Idx: Index = u32> {
    value: Option<String>,
    prev: Idx,
    next: Idx,
}

impl<Idx: Index> Node<Idx> {
    /// Creates an unlinked payload-free sentinel.
    #[inline]
    pub(crate) fn sentinel() -> Self {
        Self {
            value: None,
            prev: Idx::NONE,
            next: Idx::NONE,
        }
    }

    /// Creates an unlinked element node owning `value`.
    #[inline]
    pub(crate) fn element(value: String) -> Self {
        Self {
            value: Some(value),
            prev: Idx::NONE,
            next: Idx::NONE,
        }
    }

    /// Returns `true` if this node anchors a ring.
    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.value.is_none()
    }

    /// Returns the payload, or `None` for a sentinel.
    #[inline]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Payload used for ordering. Sentinels never reach a comparison.
    #[inline]
    pub(crate) fn key(&self) -> &str {
        debug_assert!(!self.is_sentinel(), "sentinel compared as element");
        self.value.as_deref().unwrap_or_default()
    }

    #[inline]
    pub(crate) fn take_value(&mut self) -> Option<String> {
        self.value.take()
    }

    #[inline]
    pub(crate) fn replace_value(&mut self, value: Option<String>) -> Option<String> {
        core::mem::replace(&mut self.value, value)
    }
}

impl<Idx: Index> Linked<Idx> for Node<Idx> {
    #[inline]
    fn next(&self) -> Idx {
        self.next
    }

    #[inline]
    fn prev(&self) -> Idx {
        self.prev
    }

    #[inline]
    fn set_next(&mut self, idx: Idx) {
        self.next = idx;
    }

    #[inline]
    fn set_prev(&mut self, idx: Idx) {
        self.prev = idx;
    }
}

/// An element removed from a queue and handed to the caller.
///
/// The caller owns it outright; dropping it releases the value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Element {
    value: String,
}

impl Element {
    #[inline]
    pub(crate) fn new(value: String) -> Self {
        Self { value }
    }

    /// Returns the element's value.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consumes the element, returning its value.
    #[inline]
    pub fn into_value(self) -> String {
        self.value
    }

    /// Copies the value into a fixed-size buffer. See [`copy_truncated`].
    #[inline]
    pub fn copy_to(&self, buf: &mut [u8]) -> usize {
        copy_truncated(buf, self.value.as_bytes())
    }
}

/// Copies `src` into `dst`, truncating to fit and always NUL-terminating.
///
/// At most `dst.len() - 1` bytes are copied; every byte after the copied
/// prefix is zeroed. Returns the number of bytes copied. A zero-length
/// `dst` receives nothing.
///
/// # Example
///
/// ```
/// use nexus_ring::copy_truncated;
///
/// let mut buf = [0xffu8; 4];
/// assert_eq!(copy_truncated(&mut buf, b"gerbil"), 3);
/// assert_eq!(&buf, b"ger\0");
/// ```
pub fn copy_truncated(dst: &mut [u8], src: &[u8]) -> usize {
    let Some(room) = dst.len().checked_sub(1) else {
        return 0;
    };
    let n = src.len().min(room);
    dst[..n].copy_from_slice(&src[..n]);
    dst[n..].fill(0);
    n
}

/// Copies `s` into freshly allocated owned storage.
///
/// Reports [`QueueError::AllocationFailed`] instead of aborting when the
/// allocator refuses.
pub(crate) fn try_copy_value(s: &str) -> Result<String, QueueError> {
    let mut owned = String::new();
    owned
        .try_reserve_exact(s.len())
        .map_err(|_| QueueError::AllocationFailed)?;
    owned.push_str(s);
    Ok(owned)
}
