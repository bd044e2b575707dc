//! Identifiers for registered update hooks.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct HookId(pub u32);

/// Monotonic allocator for HookId. Shared by all hook registries of one
/// graphic so an id names exactly one callback.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_hook: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_hook(&mut self) -> HookId {
        let id = HookId(self.next_hook);
        self.next_hook = self.next_hook.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_hook(), HookId(0));
        assert_eq!(alloc.alloc_hook(), HookId(1));
    }
}
