//! Per-user watchlists.
//!
//! Owned by the caller; the engine neither reads nor filters on them.

use data_loader::{ItemId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watchlist {
    /// Items per user, in the order they were added
    lists: HashMap<UserId, Vec<ItemId>>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item; returns `false` if it was already listed
    pub fn add(&mut self, user_id: UserId, item_id: ItemId) -> bool {
        let items = self.lists.entry(user_id).or_default();
        if items.contains(&item_id) {
            return false;
        }
        items.push(item_id);
        true
    }

    /// Remove an item; returns `false` if it was not listed
    pub fn remove(&mut self, user_id: UserId, item_id: ItemId) -> bool {
        let Some(items) = self.lists.get_mut(&user_id) else {
            return false;
        };
        let Some(position) = items.iter().position(|&id| id == item_id) else {
            return false;
        };
        items.remove(position);
        if items.is_empty() {
            self.lists.remove(&user_id);
        }
        true
    }

    pub fn items(&self, user_id: UserId) -> &[ItemId] {
        self.lists.get(&user_id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn contains(&self, user_id: UserId, item_id: ItemId) -> bool {
        self.items(user_id).contains(&item_id)
    }

    /// Drop a user's whole list, returning what it held
    pub fn clear(&mut self, user_id: UserId) -> Vec<ItemId> {
        self.lists.remove(&user_id).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_deduplicates_and_keeps_order() {
        let mut watchlist = Watchlist::new();
        assert!(watchlist.add(1, 30));
        assert!(watchlist.add(1, 10));
        assert!(!watchlist.add(1, 30));

        assert_eq!(watchlist.items(1), &[30, 10]);
        assert!(watchlist.items(2).is_empty());
    }

    #[test]
    fn test_remove() {
        let mut watchlist = Watchlist::new();
        watchlist.add(1, 10);
        watchlist.add(1, 20);

        assert!(watchlist.remove(1, 10));
        assert!(!watchlist.remove(1, 10));
        assert!(!watchlist.remove(7, 20));
        assert_eq!(watchlist.items(1), &[20]);
        assert!(watchlist.contains(1, 20));
    }

    #[test]
    fn test_users_are_independent() {
        let mut watchlist = Watchlist::new();
        watchlist.add(1, 10);
        watchlist.add(2, 10);

        assert_eq!(watchlist.clear(1), vec![10]);
        assert!(watchlist.items(1).is_empty());
        assert_eq!(watchlist.items(2), &[10]);
    }
}
