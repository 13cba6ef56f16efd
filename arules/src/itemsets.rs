use serde::{Deserialize, Serialize};

use crate::rules::Item;

/// Flat storage for itemsets of one size, with their weighted supports and,
/// optionally, the ids of the rows that contain them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemsetStorage {
    items: Vec<Item>,
    offsets: Vec<(usize, usize)>,
    supports: Vec<f64>,
    rows: Vec<Option<Vec<usize>>>,
}

impl ItemsetStorage {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_itemset(
        &mut self,
        mut items: Vec<Item>,
        support: f64,
        rows: Option<Vec<usize>>,
    ) {
        items.sort_unstable();
        items.dedup();
        let start = self.items.len();
        self.items.extend_from_slice(&items);
        self.offsets.push((start, items.len()));
        self.supports.push(support);
        self.rows.push(rows);
    }

    pub(crate) fn get_itemset(&self, idx: usize) -> &[Item] {
        let (start, len) = self.offsets[idx];
        &self.items[start..start + len]
    }

    pub(crate) fn len(&self) -> usize {
        self.offsets.len()
    }
}

/// All frequent itemsets of one size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequentLevel {
    storage: ItemsetStorage,
    pub itemset_size: usize,
}

impl FrequentLevel {
    pub fn new(itemset_size: usize) -> Self {
        Self {
            storage: ItemsetStorage::new(),
            itemset_size,
        }
    }

    pub fn add_itemset(
        &mut self,
        items: Vec<Item>,
        support: f64,
        rows: Option<Vec<usize>>,
    ) -> usize {
        debug_assert_eq!(items.len(), self.itemset_size);
        self.storage.add_itemset(items, support, rows);
        self.storage.len() - 1
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.len() == 0
    }

    pub fn get_itemset(&self, idx: usize) -> &[Item] {
        self.storage.get_itemset(idx)
    }

    pub fn support(&self, idx: usize) -> f64 {
        self.storage.supports[idx]
    }

    pub fn rows(&self, idx: usize) -> Option<&[usize]> {
        self.storage.rows[idx].as_deref()
    }

    pub fn iter_itemsets(&self) -> impl Iterator<Item = &[Item]> {
        (0..self.storage.len()).map(move |idx| self.get_itemset(idx))
    }

    /// Itemsets paired with their supports.
    pub fn iter(&self) -> impl Iterator<Item = (&[Item], f64)> {
        (0..self.storage.len()).map(move |idx| (self.get_itemset(idx), self.support(idx)))
    }
}

/// Frequent itemsets grouped by size; `levels()[k - 1]` holds the k-itemsets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequentItemsets {
    levels: Vec<FrequentLevel>,
}

impl FrequentItemsets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, items: Vec<Item>, support: f64, rows: Option<Vec<usize>>) {
        let size = items.len();
        if size == 0 {
            return;
        }
        while self.levels.len() < size {
            self.levels.push(FrequentLevel::new(self.levels.len() + 1));
        }
        self.levels[size - 1].add_itemset(items, support, rows);
    }

    pub fn levels(&self) -> &[FrequentLevel] {
        &self.levels
    }

    pub fn level(&self, itemset_size: usize) -> Option<&FrequentLevel> {
        itemset_size
            .checked_sub(1)
            .and_then(|idx| self.levels.get(idx))
    }

    /// Total number of itemsets over all levels.
    pub fn len(&self) -> usize {
        self.levels.iter().map(FrequentLevel::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_size(&self) -> usize {
        self.levels.len()
    }

    /// Support of an itemset, if it is among the frequent ones.
    pub fn support_of(&self, items: &[Item]) -> Option<f64> {
        let mut sorted = items.to_vec();
        sorted.sort_unstable();
        let level = self.level(sorted.len())?;
        level
            .iter()
            .find(|(itemset, _)| *itemset == sorted.as_slice())
            .map(|(_, support)| support)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_sorts_items() {
        let mut storage = ItemsetStorage::new();
        storage.add_itemset(vec![Item::Id(7), Item::Id(2), Item::Id(5)], 3.0, None);
        storage.add_itemset(vec![Item::Id(1), Item::Id(3)], 2.0, Some(vec![0, 4]));

        assert_eq!(storage.get_itemset(0), &[Item::Id(2), Item::Id(5), Item::Id(7)]);
        assert_eq!(storage.get_itemset(1), &[Item::Id(1), Item::Id(3)]);
        assert_eq!(storage.len(), 2);
    }

    #[test]
    fn itemsets_grow_levels_on_demand() {
        let mut itemsets = FrequentItemsets::new();
        itemsets.add(vec![Item::Id(1), Item::Id(2), Item::Id(3)], 2.0, None);
        itemsets.add(vec![Item::Id(4)], 5.0, Some(vec![1, 2]));

        assert_eq!(itemsets.max_size(), 3);
        assert_eq!(itemsets.len(), 2);
        assert!(itemsets.level(2).map_or(false, FrequentLevel::is_empty));
        assert_eq!(itemsets.support_of(&[Item::Id(3), Item::Id(1), Item::Id(2)]), Some(2.0));
        assert_eq!(itemsets.support_of(&[Item::Id(9)]), None);
        assert_eq!(itemsets.level(1).and_then(|l| l.rows(0)), Some(&[1, 2][..]));
    }
}
