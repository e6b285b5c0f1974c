//! Engine construction.

use crate::{BuildError, FixedQueues, FixedStorage, QueueEngine, SlabQueues};

/// Default number of node slots for a fixed engine.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Builder for a fixed-capacity engine.
///
/// Call `.growable()` to switch to a slab-backed engine that grows on demand.
///
/// # Example
///
/// ```
/// use nexus_ring::{BuildError, QueueBuilder};
///
/// let mut engine = QueueBuilder::default().capacity(2).build()?;
/// let q = engine.new_queue().unwrap();
/// engine.insert_tail(q, "only").unwrap();
/// assert!(engine.insert_tail(q, "full").is_err());
///
/// assert_eq!(
///     QueueBuilder::default().capacity(0).build().unwrap_err(),
///     BuildError::ZeroCapacity,
/// );
/// # Ok::<(), BuildError>(())
/// ```
#[derive(Clone, Debug)]
pub struct QueueBuilder {
    capacity: usize,
}

/// Builder for a growable engine.
///
/// Created via `QueueBuilder::default().growable()`.
#[derive(Clone, Debug)]
pub struct GrowableQueueBuilder {
    capacity: usize,
}

impl Default for QueueBuilder {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl QueueBuilder {
    /// Number of node slots shared by all queues. Each queue's sentinel
    /// takes one slot and each element one more. Default: 1024.
    pub fn capacity(mut self, slots: usize) -> Self {
        self.capacity = slots;
        self
    }

    /// Switch to a growable slab-backed engine. The capacity becomes the
    /// initial reservation.
    pub fn growable(self) -> GrowableQueueBuilder {
        GrowableQueueBuilder {
            capacity: self.capacity,
        }
    }

    /// Build a fixed-capacity engine.
    ///
    /// # Errors
    ///
    /// - [`BuildError::ZeroCapacity`] if capacity is 0
    /// - [`BuildError::CapacityOverflow`] if the slots do not fit a `u32` index
    /// - [`BuildError::AllocationFailed`] if the slot array cannot be reserved
    pub fn build(self) -> Result<FixedQueues, BuildError> {
        if self.capacity == 0 {
            return Err(BuildError::ZeroCapacity);
        }
        // One extra slot for the engine's scratch sentinel.
        let slots = self
            .capacity
            .checked_add(1)
            .ok_or(BuildError::CapacityOverflow {
                capacity: self.capacity,
            })?;
        QueueEngine::new(FixedStorage::with_capacity(slots)?)
    }
}

impl GrowableQueueBuilder {
    /// Initial slot reservation. The engine grows past it on demand.
    pub fn capacity(mut self, slots: usize) -> Self {
        self.capacity = slots;
        self
    }

    /// Build a growable engine.
    ///
    /// # Errors
    ///
    /// Construction of a growable engine does not fail in practice; the
    /// `Result` matches the fixed builder.
    pub fn build(self) -> Result<SlabQueues, BuildError> {
        QueueEngine::new(slab::Slab::with_capacity(self.capacity))
    }
}
