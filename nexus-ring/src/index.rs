//! Arena indices with a reserved "detached" value.
//!
//! Ring links are plain indices into storage. A node that is not a member of
//! any ring carries [`Index::NONE`] in both link fields, which keeps the node
//! layout free of `Option` tags.

/// A copyable arena index with a reserved `NONE` value.
///
/// # Example
///
/// ```
/// use nexus_ring::Index;
///
/// let idx: u32 = 7;
/// assert!(idx.is_some());
/// assert!(u32::NONE.is_none());
/// assert_eq!(u32::checked_from_usize(u32::MAX as usize), None);
/// ```
pub trait Index: Copy + Eq + core::fmt::Debug {
    /// Reserved value meaning "not linked".
    const NONE: Self;

    /// Returns `true` if this is the reserved value.
    #[inline]
    fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Returns `true` if this is a real slot index.
    #[inline]
    fn is_some(self) -> bool {
        !self.is_none()
    }

    /// Returns the index as a slot offset.
    fn as_usize(self) -> usize;

    /// Converts a slot offset into an index.
    ///
    /// Returns `None` if the offset does not fit or collides with `NONE`.
    fn checked_from_usize(val: usize) -> Option<Self>;
}

macro_rules! impl_index {
    ($($ty:ty),*) => {
        $(
            impl Index for $ty {
                const NONE: Self = <$ty>::MAX;

                #[inline]
                fn as_usize(self) -> usize {
                    self as usize
                }

                #[inline]
                fn checked_from_usize(val: usize) -> Option<Self> {
                    <$ty>::try_from(val).ok().filter(|idx| *idx != Self::NONE)
                }
            }
        )*
    };
}

impl_index!(u16, u32, u64, usize);
