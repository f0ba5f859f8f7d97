//! Per-request user context.
//!
//! Gathers what candidate filtering needs from the interaction store once,
//! up front, so filters never query the store again.

use data_loader::{InteractionStore, ItemId, UserId};
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: UserId,
    /// Every item the user has an interaction for
    pub seen_items: HashSet<ItemId>,
}

impl UserContext {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            seen_items: HashSet::new(),
        }
    }
}

/// Build a UserContext from the interaction store.
///
/// A user with no interactions gets an empty context, not an error.
pub fn build_user_context(store: &InteractionStore, user_id: UserId) -> UserContext {
    UserContext {
        user_id,
        seen_items: store.seen_items(user_id),
    }
}
