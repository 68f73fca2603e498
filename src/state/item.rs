use crate::infra::Position;
use crate::infra::params::{ITEM_COUNT_MAX, PERIOD_COUNT};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    #[error("a stage holds at most {max} items", max = ITEM_COUNT_MAX)]
    CollectionFull,
    #[error("period {period} is not one of the {count} delivery periods", count = PERIOD_COUNT)]
    InvalidPeriod { period: usize },
    #[error("item weight must be positive")]
    ZeroWeight,
}

/// A package waiting to be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub destination: Position,
    /// Period the item must be delivered in, if the customer asked for one.
    pub period: Option<usize>,
    pub weight: u32,
}

impl Item {
    pub fn new(destination: Position, period: Option<usize>, weight: u32) -> Self {
        Self {
            destination,
            period,
            weight,
        }
    }

    /// True when the item may travel in `period`.
    pub fn accepts_period(&self, period: usize) -> bool {
        self.period.is_none_or(|required| required == period)
    }
}

/// The fixed set of items of one stage. Item indices are positions in this collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemCollection {
    items: Vec<Item>,
}

impl ItemCollection {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn add_item(&mut self, item: Item) -> Result<usize, ItemError> {
        if self.items.len() >= ITEM_COUNT_MAX {
            return Err(ItemError::CollectionFull);
        }
        if let Some(period) = item.period
            && period >= PERIOD_COUNT
        {
            return Err(ItemError::InvalidPeriod { period });
        }
        if item.weight == 0 {
            return Err(ItemError::ZeroWeight);
        }
        self.items.push(item);
        Ok(self.items.len() - 1)
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Indices of the items that must be delivered in `period`.
    pub fn required_in(&self, period: usize) -> impl Iterator<Item = usize> + '_ {
        self.items
            .iter()
            .enumerate()
            .filter(move |(_, item)| item.period == Some(period))
            .map(|(index, _)| index)
    }
}

impl TryFrom<Vec<Item>> for ItemCollection {
    type Error = ItemError;

    fn try_from(items: Vec<Item>) -> Result<Self, Self::Error> {
        let mut collection = ItemCollection::new();
        for item in items {
            collection.add_item(item)?;
        }
        Ok(collection)
    }
}
