//! Error types for queue operations and engine construction.

use thiserror::Error;

/// Failure kinds reported by queue operations.
///
/// Every failure is local: the queue named by the call is left exactly as it
/// was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The handle does not name a live queue in this engine.
    #[error("invalid queue handle")]
    InvalidHandle,

    /// A node slot or the value copy could not be allocated.
    #[error("allocation failed")]
    AllocationFailed,

    /// The queue holds no elements.
    #[error("queue is empty")]
    Empty,
}

/// Errors during engine construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Capacity is zero.
    #[error("capacity cannot be zero")]
    ZeroCapacity,

    /// Capacity does not fit the index type.
    #[error("capacity ({capacity}) exceeds index type maximum")]
    CapacityOverflow {
        /// Requested slot count.
        capacity: usize,
    },

    /// The slot array could not be allocated.
    #[error("memory allocation failed")]
    AllocationFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(QueueError::Empty.to_string(), "queue is empty");
        assert_eq!(QueueError::InvalidHandle.to_string(), "invalid queue handle");
        assert_eq!(
            BuildError::CapacityOverflow { capacity: 70_000 }.to_string(),
            "capacity (70000) exceeds index type maximum"
        );
    }
}
