use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a node within one document tree
///
/// Keys are session-local: they are not persisted and are never reused
/// after the node they named has been destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(u64);

impl NodeKey {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for NodeKey {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(NodeKey)
    }
}

/// Monotonic key source
#[derive(Debug, Clone, Default)]
pub struct KeyAllocator {
    next: u64,
}

impl KeyAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> NodeKey {
        let key = NodeKey(self.next);
        self.next += 1;
        key
    }

    /// Never hand out a key the other allocator has already used
    pub fn advance_past(&mut self, other: &KeyAllocator) {
        self.next = self.next.max(other.next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_monotonic() {
        let mut keys = KeyAllocator::new();
        let a = keys.allocate();
        let b = keys.allocate();
        assert!(b > a);
    }

    #[test]
    fn test_advance_past() {
        let mut older = KeyAllocator::new();
        older.allocate();

        let mut newer = KeyAllocator::new();
        for _ in 0..5 {
            newer.allocate();
        }

        older.advance_past(&newer);
        assert_eq!(older.allocate().as_u64(), 5);
    }
}
