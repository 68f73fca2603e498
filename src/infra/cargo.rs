use std::fmt;

use crate::infra::params::ITEM_COUNT_MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("item index {index} does not fit in a cargo set of {max} slots", max = ITEM_COUNT_MAX)]
pub struct CargoError {
    pub index: usize,
}

/// Set of item indices carried by (or declared for) the truck, one bit per item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CargoSet {
    bits: u32,
}

impl CargoSet {
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn insert(&mut self, index: usize) -> Result<(), CargoError> {
        if index >= ITEM_COUNT_MAX {
            return Err(CargoError { index });
        }
        self.bits |= 1 << index;
        Ok(())
    }

    pub fn remove(&mut self, index: usize) {
        if index < ITEM_COUNT_MAX {
            self.bits &= !(1 << index);
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        index < ITEM_COUNT_MAX && self.bits & (1 << index) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..ITEM_COUNT_MAX).filter(move |&index| self.contains(index))
    }
}

impl CargoSet {
    /// Collects indices, stopping at the first one that does not fit.
    pub fn try_from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Result<Self, CargoError> {
        let mut set = CargoSet::new();
        for index in iter {
            set.insert(index)?;
        }
        Ok(set)
    }
}

impl TryFrom<&[usize]> for CargoSet {
    type Error = CargoError;

    fn try_from(indices: &[usize]) -> Result<Self, Self::Error> {
        Self::try_from_iter(indices.iter().copied())
    }
}

impl fmt::Display for CargoSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for index in self.iter() {
            if !first {
                write!(f, ",")?;
            }
            first = false;
            write!(f, "{}", index)?;
        }
        Ok(())
    }
}
