//! Per-call execution context.

use alloy_primitives::Address;

/// Who is calling, and when.
///
/// Calls are processed one at a time in submission order; `timestamp` only
/// has to be non-decreasing between calls that touch the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub sender: Address,
    pub timestamp: u64,
}

impl CallContext {
    pub fn new(sender: Address, timestamp: u64) -> Self {
        Self { sender, timestamp }
    }
}
