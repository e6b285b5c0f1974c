//! Slot storage with stable indices.
//!
//! Rings never own their nodes. Nodes live in a [`Storage`] and rings refer
//! to them by index, so relinking a node between rings never moves it and a
//! stale link can only ever hit a vacant slot, never freed memory.

use crate::{BuildError, Index};

/// Slab-like storage with stable indices.
///
/// # Requirements
///
/// Implementations must provide:
/// - **Stable indices**: an index remains valid until explicitly removed
/// - **O(1)** insert, remove, get operations
/// - **Slot reuse**: removed slots can be reused by future inserts
///
/// # Implementations
///
/// - [`FixedStorage<T>`] - bounded, allocated once at construction
/// - `slab::Slab<T>` - growable
pub trait Storage<T> {
    /// Index type for this storage.
    type Index: Index;

    /// Error type for failed insertions.
    ///
    /// - `Full<T>` for fixed-capacity storage
    /// - `Infallible` for growable storage
    type Error;

    /// Inserts a value, returning its stable index.
    fn try_insert(&mut self, value: T) -> Result<Self::Index, Self::Error>;

    /// Removes and returns the value at `index`, if present.
    fn remove(&mut self, index: Self::Index) -> Option<T>;

    /// Returns a reference to the value at `index`, if present.
    fn get(&self, index: Self::Index) -> Option<&T>;

    /// Returns a mutable reference to the value at `index`, if present.
    fn get_mut(&mut self, index: Self::Index) -> Option<&mut T>;

    /// Returns the number of occupied slots.
    fn len(&self) -> usize;

    /// Returns `true` if no slots are occupied.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Error returned when fixed-capacity storage is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> core::fmt::Display for Full<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "storage is full")
    }
}

impl<T: core::fmt::Debug> std::error::Error for Full<T> {}

// =============================================================================
// FixedStorage - capacity fixed at construction, LIFO slot reuse
// =============================================================================

/// Fixed-capacity storage.
///
/// The slot array and the free stack are allocated once; inserting into a
/// full storage fails with [`Full`] instead of growing. Freed slots are
/// reused last-in first-out.
///
/// # Example
///
/// ```
/// use nexus_ring::{FixedStorage, Storage};
///
/// let mut storage: FixedStorage<u64> = FixedStorage::with_capacity(2).unwrap();
/// let a = storage.try_insert(1).unwrap();
/// let _b = storage.try_insert(2).unwrap();
/// assert!(storage.try_insert(3).is_err());
///
/// assert_eq!(storage.remove(a), Some(1));
/// assert_eq!(storage.try_insert(4).unwrap(), a);
/// ```
#[derive(Debug)]
pub struct FixedStorage<T, Idx: Index = u32> {
    slots: Box<[Option<T>]>,
    /// Vacant slot indices, next to hand out on top.
    free: Vec<Idx>,
}

impl<T, Idx: Index> FixedStorage<T, Idx> {
    /// Creates storage with exactly `capacity` slots.
    ///
    /// # Errors
    ///
    /// - [`BuildError::ZeroCapacity`] if `capacity` is 0
    /// - [`BuildError::CapacityOverflow`] if a slot offset would not fit `Idx`
    /// - [`BuildError::AllocationFailed`] if the slot array cannot be reserved
    pub fn with_capacity(capacity: usize) -> Result<Self, BuildError> {
        if capacity == 0 {
            return Err(BuildError::ZeroCapacity);
        }
        if Idx::checked_from_usize(capacity - 1).is_none() {
            return Err(BuildError::CapacityOverflow { capacity });
        }

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| BuildError::AllocationFailed)?;
        slots.resize_with(capacity, || None);

        let mut free = Vec::new();
        free.try_reserve_exact(capacity)
            .map_err(|_| BuildError::AllocationFailed)?;
        // Lowest index on top so a fresh storage hands out 0, 1, 2, ...
        free.extend((0..capacity).rev().filter_map(Idx::checked_from_usize));

        Ok(Self {
            slots: slots.into_boxed_slice(),
            free,
        })
    }

    /// Returns the capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if all slots are occupied.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.free.is_empty()
    }
}

impl<T, Idx: Index> Storage<T> for FixedStorage<T, Idx> {
    type Index = Idx;
    type Error = Full<T>;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<Self::Index, Self::Error> {
        let Some(idx) = self.free.pop() else {
            return Err(Full(value));
        };
        self.slots[idx.as_usize()] = Some(value);
        Ok(idx)
    }

    #[inline]
    fn remove(&mut self, index: Self::Index) -> Option<T> {
        let value = self.slots.get_mut(index.as_usize())?.take()?;
        self.free.push(index);
        Some(value)
    }

    #[inline]
    fn get(&self, index: Self::Index) -> Option<&T> {
        self.slots.get(index.as_usize())?.as_ref()
    }

    #[inline]
    fn get_mut(&mut self, index: Self::Index) -> Option<&mut T> {
        self.slots.get_mut(index.as_usize())?.as_mut()
    }

    #[inline]
    fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

// =============================================================================
// slab::Slab implementation
// =============================================================================

impl<T> Storage<T> for slab::Slab<T> {
    type Index = usize;
    type Error = core::convert::Infallible;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<Self::Index, Self::Error> {
        Ok(self.insert(value))
    }

    #[inline]
    fn remove(&mut self, index: Self::Index) -> Option<T> {
        self.try_remove(index)
    }

    #[inline]
    fn get(&self, index: Self::Index) -> Option<&T> {
        slab::Slab::get(self, index)
    }

    #[inline]
    fn get_mut(&mut self, index: Self::Index) -> Option<&mut T> {
        slab::Slab::get_mut(self, index)
    }

    #[inline]
    fn len(&self) -> usize {
        slab::Slab::len(self)
    }
}
