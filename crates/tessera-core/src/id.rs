//! Component identities

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a single stored component instance.
///
/// Issued once per insertion and never handed out again, even after the
/// instance is destroyed. `ComponentId::UNSET` (zero) is never issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub u64);

impl ComponentId {
    /// Placeholder value that no allocator ever returns.
    pub const UNSET: ComponentId = ComponentId(0);

    /// The raw id value.
    pub fn get(&self) -> u64 {
        self.0
    }

    pub fn is_unset(&self) -> bool {
        self.0 == 0
    }
}

impl Default for ComponentId {
    fn default() -> Self {
        Self::UNSET
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic allocator for [`ComponentId`]s.
#[derive(Debug)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Issue the next identity.
    pub fn next_id(&mut self) -> ComponentId {
        let id = ComponentId(self.next);
        self.next += 1;
        id
    }

    /// Number of identities issued so far.
    pub fn issued(&self) -> u64 {
        self.next - 1
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.next_id(), ComponentId(1));
        assert_eq!(alloc.next_id(), ComponentId(2));
        assert_eq!(alloc.issued(), 2);
    }

    #[test]
    fn ids_are_monotonic() {
        let mut alloc = IdAllocator::new();
        let ids: Vec<_> = (0..100).map(|_| alloc.next_id()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert!(ids.iter().all(|id| !id.is_unset()));
    }

    #[test]
    fn unset_is_default() {
        assert_eq!(ComponentId::default(), ComponentId::UNSET);
        assert!(ComponentId::default().is_unset());
        assert_eq!(format!("{}", ComponentId(7)), "#7");
    }
}
