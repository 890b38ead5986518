//! Identifiers for host signals.

use serde::{Deserialize, Serialize};

/// Identity of a host signal (a change notification or a plain signal).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SignalId(pub u32);

/// Monotonic allocator for SignalId.
#[derive(Default, Debug)]
pub struct SignalAllocator {
    next: u32,
}

impl SignalAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self) -> SignalId {
        let id = SignalId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}
