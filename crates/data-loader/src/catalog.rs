//! Read-only item catalog.
//!
//! Maps item ids to display metadata and keeps a release-year index for
//! candidate filtering. Built once, then shared behind an `Arc`.

use crate::types::{Item, ItemId};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default)]
pub struct Catalog {
    items: HashMap<ItemId, Item>,
    /// Every item id, ascending. Candidate generation walks this so the
    /// candidate order never depends on hash iteration order.
    item_ids: Vec<ItemId>,
    year_index: BTreeMap<u16, Vec<ItemId>>,
}

impl Catalog {
    /// Build a catalog from parsed items. Later duplicates of an id replace
    /// earlier ones.
    pub fn new(items: impl IntoIterator<Item = Item>) -> Self {
        let items: HashMap<ItemId, Item> = items.into_iter().map(|item| (item.id, item)).collect();

        let mut item_ids: Vec<ItemId> = items.keys().copied().collect();
        item_ids.sort_unstable();

        let mut year_index: BTreeMap<u16, Vec<ItemId>> = BTreeMap::new();
        for &id in &item_ids {
            if let Some(year) = items[&id].year {
                year_index.entry(year).or_default().push(id);
            }
        }

        Self {
            items,
            item_ids,
            year_index,
        }
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn title(&self, id: ItemId) -> Option<&str> {
        self.items.get(&id).map(|item| item.title.as_str())
    }

    /// All item ids in ascending order
    pub fn item_ids(&self) -> &[ItemId] {
        &self.item_ids
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items released within `[start, end]`, ascending by year then id
    pub fn items_in_year_range(&self, start: u16, end: u16) -> Vec<ItemId> {
        if start > end {
            return Vec::new();
        }
        self.year_index
            .range(start..=end)
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect()
    }

    /// Case-insensitive title search. Exact matches come first, then
    /// substring matches; each group is ordered by id.
    pub fn search_titles(&self, query: &str, limit: usize) -> Vec<&Item> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut exact = Vec::new();
        let mut partial = Vec::new();
        for id in &self.item_ids {
            let item = &self.items[id];
            let title = item.title.to_lowercase();
            if title == needle {
                exact.push(item);
            } else if title.contains(&needle) {
                partial.push(item);
            }
        }

        exact.into_iter().chain(partial).take(limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Genre;

    fn item(id: ItemId, title: &str, year: Option<u16>, genres: Vec<Genre>) -> Item {
        Item {
            id,
            title: title.to_string(),
            year,
            genres,
        }
    }

    fn create_test_catalog() -> Catalog {
        Catalog::new(vec![
            item(3, "Heat (1995)", Some(1995), vec![Genre::Action, Genre::Crime]),
            item(1, "Toy Story (1995)", Some(1995), vec![Genre::Animation, Genre::Children]),
            item(2, "Toy Story 2 (1999)", Some(1999), vec![Genre::Animation]),
            item(7, "Untitled", None, vec![]),
        ])
    }

    #[test]
    fn test_item_ids_sorted() {
        let catalog = create_test_catalog();
        assert_eq!(catalog.item_ids(), &[1, 2, 3, 7]);
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_year_range() {
        let catalog = create_test_catalog();
        assert_eq!(catalog.items_in_year_range(1995, 1995), vec![1, 3]);
        assert_eq!(catalog.items_in_year_range(1990, 1996), vec![1, 3]);
        assert_eq!(catalog.items_in_year_range(1996, 2000), vec![2]);
        assert!(catalog.items_in_year_range(2000, 1990).is_empty());
    }

    #[test]
    fn test_search_titles_exact_first() {
        let catalog = create_test_catalog();
        let hits = catalog.search_titles("toy story 2 (1999)", 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);

        let hits = catalog.search_titles("TOY", 10);
        let ids: Vec<ItemId> = hits.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2]);

        assert!(catalog.search_titles("   ", 10).is_empty());
        assert_eq!(catalog.search_titles("toy", 1).len(), 1);
    }

    #[test]
    fn test_missing_item() {
        let catalog = create_test_catalog();
        assert!(catalog.get(999).is_none());
        assert!(catalog.title(999).is_none());
        assert_eq!(catalog.title(3), Some("Heat (1995)"));
    }
}
