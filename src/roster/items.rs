//! Ordered item collections

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::ItemId;

/// Quantity on hand and quantity earmarked for sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemStack {
    pub num: u32,
    #[serde(default)]
    pub selling: u32,
}

/// Item id to quantity, iterated in id order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemList {
    stacks: BTreeMap<ItemId, ItemStack>,
}

impl ItemList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, item: ItemId) -> u32 {
        self.stacks.get(&item).map_or(0, |stack| stack.num)
    }

    pub fn selling(&self, item: ItemId) -> u32 {
        self.stacks.get(&item).map_or(0, |stack| stack.selling)
    }

    /// Set the quantity; the sale earmark never exceeds what is on hand
    pub fn set(&mut self, item: ItemId, num: u32) {
        if num == 0 {
            self.stacks.remove(&item);
            return;
        }
        let stack = self.stacks.entry(item).or_default();
        stack.num = num;
        stack.selling = stack.selling.min(num);
    }

    pub fn set_selling(&mut self, item: ItemId, selling: u32) {
        if let Some(stack) = self.stacks.get_mut(&item) {
            stack.selling = selling.min(stack.num);
        }
    }

    pub fn add(&mut self, item: ItemId, num: u32) {
        if num > 0 {
            let current = self.get(item);
            self.set(item, current.saturating_add(num));
        }
    }

    /// Remove up to `num`, returning how many were actually removed
    pub fn take(&mut self, item: ItemId, num: u32) -> u32 {
        let current = self.get(item);
        let taken = num.min(current);
        self.set(item, current - taken);
        taken
    }

    /// Add every stack of `other`
    pub fn merge(&mut self, other: &ItemList) {
        for (item, num) in other.iter() {
            self.add(item, num);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, u32)> + '_ {
        self.stacks.iter().map(|(item, stack)| (*item, stack.num))
    }

    /// Number of distinct item types held
    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// Total count across all item types
    pub fn total(&self) -> u64 {
        self.stacks.values().map(|stack| stack.num as u64).sum()
    }
}

impl FromIterator<(ItemId, u32)> for ItemList {
    fn from_iter<I: IntoIterator<Item = (ItemId, u32)>>(iter: I) -> Self {
        let mut list = ItemList::new();
        for (item, num) in iter {
            list.add(item, num);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_zero_removes_stack() {
        let mut list = ItemList::new();
        list.set(ItemId(4), 3);
        assert_eq!(list.len(), 1);
        list.set(ItemId(4), 0);
        assert!(list.is_empty());
    }

    #[test]
    fn test_take_is_clamped() {
        let mut list: ItemList = [(ItemId(1), 5)].into_iter().collect();
        assert_eq!(list.take(ItemId(1), 3), 3);
        assert_eq!(list.take(ItemId(1), 10), 2);
        assert_eq!(list.take(ItemId(9), 1), 0);
        assert!(list.is_empty());
    }

    #[test]
    fn test_selling_tracks_quantity() {
        let mut list = ItemList::new();
        list.set(ItemId(2), 10);
        list.set_selling(ItemId(2), 6);
        list.set(ItemId(2), 4);
        assert_eq!(list.selling(ItemId(2)), 4);
    }

    #[test]
    fn test_iteration_in_id_order() {
        let mut list = ItemList::new();
        list.add(ItemId(9), 1);
        list.add(ItemId(2), 2);
        list.add(ItemId(5), 3);
        let ids: Vec<_> = list.iter().map(|(id, _)| id.0).collect();
        assert_eq!(ids, vec![2, 5, 9]);
        assert_eq!(list.total(), 6);
    }
}
