use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Maximum number of distinct component types a single world can track.
pub const MAX_COMPONENT_TYPES: usize = 256;

const WORDS: usize = MAX_COMPONENT_TYPES / 64;

/// Bit position assigned to a component type within a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentBit(pub(crate) u16);

impl ComponentBit {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Archetype bitmask: one bit per component type an entity currently owns.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ComponentMask([u64; WORDS]);

impl ComponentMask {
    pub const EMPTY: ComponentMask = ComponentMask([0; WORDS]);

    pub fn from_bit(bit: ComponentBit) -> Self {
        let mut mask = Self::EMPTY;
        mask.set(bit);
        mask
    }

    pub fn set(&mut self, bit: ComponentBit) {
        let i = bit.index();
        self.0[i / 64] |= 1u64 << (i % 64);
    }

    pub fn unset(&mut self, bit: ComponentBit) {
        let i = bit.index();
        self.0[i / 64] &= !(1u64 << (i % 64));
    }

    pub fn has(&self, bit: ComponentBit) -> bool {
        let i = bit.index();
        self.0[i / 64] & (1u64 << (i % 64)) != 0
    }

    /// True if every bit of `required` is also set in `self`.
    pub fn contains_all(&self, required: &ComponentMask) -> bool {
        self.0
            .iter()
            .zip(required.0.iter())
            .all(|(have, need)| have & need == *need)
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|w| *w == 0)
    }

    /// Number of set bits.
    pub fn len(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterate the set bits in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = ComponentBit> + '_ {
        self.0.iter().enumerate().flat_map(|(word_idx, &word)| {
            (0..64u16)
                .filter(move |b| word & (1u64 << b) != 0)
                .map(move |b| ComponentBit(word_idx as u16 * 64 + b))
        })
    }
}

impl BitOr for ComponentMask {
    type Output = Self;

    fn bitor(mut self, rhs: Self) -> Self {
        self |= rhs;
        self
    }
}

impl BitOrAssign for ComponentMask {
    fn bitor_assign(&mut self, rhs: Self) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a |= b;
        }
    }
}

impl BitAnd for ComponentMask {
    type Output = Self;

    fn bitand(mut self, rhs: Self) -> Self {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a &= b;
        }
        self
    }
}

impl fmt::Debug for ComponentMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|b| b.0)).finish()
    }
}

/// Assigns bits to component types in the order they are first attached.
/// An assignment never changes for the lifetime of the owning world.
#[derive(Default)]
pub(crate) struct ComponentBits {
    by_type: HashMap<TypeId, ComponentBit>,
    names: Vec<&'static str>,
}

impl ComponentBits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, type_id: TypeId) -> Option<ComponentBit> {
        self.by_type.get(&type_id).copied()
    }

    pub fn of<T: 'static>(&self) -> Option<ComponentBit> {
        self.get(TypeId::of::<T>())
    }

    /// Assign the next free bit to `T`. Returns `None` once the type limit is reached.
    pub fn register<T: 'static>(&mut self) -> Option<ComponentBit> {
        if let Some(bit) = self.of::<T>() {
            return Some(bit);
        }
        if self.names.len() >= MAX_COMPONENT_TYPES {
            return None;
        }
        let bit = ComponentBit(self.names.len() as u16);
        self.by_type.insert(TypeId::of::<T>(), bit);
        self.names.push(std::any::type_name::<T>());
        Some(bit)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;
    struct C;

    #[test]
    fn set_unset_has() {
        let mut mask = ComponentMask::EMPTY;
        let bit = ComponentBit(70);
        assert!(!mask.has(bit));
        mask.set(bit);
        assert!(mask.has(bit));
        assert_eq!(mask.len(), 1);
        mask.unset(bit);
        assert!(mask.is_empty());
    }

    #[test]
    fn superset_test() {
        let a = ComponentMask::from_bit(ComponentBit(0));
        let b = ComponentMask::from_bit(ComponentBit(200));
        let ab = a | b;
        assert!(ab.contains_all(&a));
        assert!(ab.contains_all(&b));
        assert!(!a.contains_all(&ab));
        assert!(a.contains_all(&ComponentMask::EMPTY));
        assert_eq!(ab & a, a);
    }

    #[test]
    fn iterates_bits_in_order() {
        let mut mask = ComponentMask::EMPTY;
        for i in [255u16, 3, 64, 0] {
            mask.set(ComponentBit(i));
        }
        let bits: Vec<u16> = mask.iter().map(|b| b.0).collect();
        assert_eq!(bits, vec![0, 3, 64, 255]);
    }

    #[test]
    fn bits_assigned_in_first_use_order() {
        let mut bits = ComponentBits::new();
        assert_eq!(bits.of::<A>(), None);
        let b = bits.register::<B>().unwrap();
        let a = bits.register::<A>().unwrap();
        assert_eq!(b.index(), 0);
        assert_eq!(a.index(), 1);
        assert_eq!(bits.register::<B>(), Some(b));
        assert_eq!(bits.len(), 2);
        assert_eq!(bits.of::<C>(), None);
    }
}
