//! Card-status persistence boundary.
//!
//! The engine treats persistence as an abstract per-(deck, user) map of card
//! statuses with field-level updates: concurrent writes to different card ids
//! must never clobber each other. Backends implement [`CardStatusStore`];
//! [`MemoryStore`] is the embedded implementation used by tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::StoreError;
use crate::types::{CardStatus, UserStatusMap};

/// One card's new status inside a batch write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub card_id: String,
    pub status: CardStatus,
}

/// Remote status map scoped by (deck, user).
#[async_trait]
pub trait CardStatusStore: Send + Sync {
    /// Fetch the full status map. A missing record reads as an empty map;
    /// only transport failures are errors.
    async fn get(&self, deck_id: &str, user_id: &str) -> Result<UserStatusMap, StoreError>;

    /// Upsert one card's status without touching any other card's entry.
    async fn set(
        &self,
        deck_id: &str,
        user_id: &str,
        card_id: &str,
        status: CardStatus,
    ) -> Result<(), StoreError>;

    /// Apply all updates as a single unit from the caller's perspective.
    async fn set_batch(
        &self,
        deck_id: &str,
        user_id: &str,
        updates: &[StatusUpdate],
    ) -> Result<(), StoreError>;

    /// Clear the map to empty.
    async fn reset(&self, deck_id: &str, user_id: &str) -> Result<(), StoreError>;
}

/// In-memory store keyed by (deck, user).
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<(String, String), UserStatusMap>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CardStatusStore for MemoryStore {
    async fn get(&self, deck_id: &str, user_id: &str) -> Result<UserStatusMap, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .get(&(deck_id.to_string(), user_id.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn set(
        &self,
        deck_id: &str,
        user_id: &str,
        card_id: &str,
        status: CardStatus,
    ) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        records
            .entry((deck_id.to_string(), user_id.to_string()))
            .or_default()
            .insert(card_id.to_string(), status);
        Ok(())
    }

    async fn set_batch(
        &self,
        deck_id: &str,
        user_id: &str,
        updates: &[StatusUpdate],
    ) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        let map = records
            .entry((deck_id.to_string(), user_id.to_string()))
            .or_default();
        for update in updates {
            map.insert(update.card_id.clone(), update.status);
        }
        Ok(())
    }

    async fn reset(&self, deck_id: &str, user_id: &str) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        records.remove(&(deck_id.to_string(), user_id.to_string()));
        Ok(())
    }
}

#[async_trait]
impl<S: CardStatusStore> CardStatusStore for std::sync::Arc<S> {
    async fn get(&self, deck_id: &str, user_id: &str) -> Result<UserStatusMap, StoreError> {
        (**self).get(deck_id, user_id).await
    }

    async fn set(
        &self,
        deck_id: &str,
        user_id: &str,
        card_id: &str,
        status: CardStatus,
    ) -> Result<(), StoreError> {
        (**self).set(deck_id, user_id, card_id, status).await
    }

    async fn set_batch(
        &self,
        deck_id: &str,
        user_id: &str,
        updates: &[StatusUpdate],
    ) -> Result<(), StoreError> {
        (**self).set_batch(deck_id, user_id, updates).await
    }

    async fn reset(&self, deck_id: &str, user_id: &str) -> Result<(), StoreError> {
        (**self).reset(deck_id, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn answered(correct: bool, attempts: u32) -> CardStatus {
        CardStatus {
            is_answered: true,
            is_correct: correct,
            attempt_count: attempts,
        }
    }

    #[tokio::test]
    async fn missing_record_reads_as_empty_map() {
        let store = MemoryStore::new();
        let map = store.get("deck", "user").await.unwrap();
        assert!(map.is_empty());
    }

    #[tokio::test]
    async fn set_updates_one_card_without_clobbering_others() {
        let store = MemoryStore::new();
        store.set("d", "u", "a", answered(true, 0)).await.unwrap();
        store.set("d", "u", "b", answered(false, 1)).await.unwrap();
        store.set("d", "u", "a", answered(false, 1)).await.unwrap();

        let map = store.get("d", "u").await.unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"], answered(false, 1));
        assert_eq!(map["b"], answered(false, 1));
    }

    #[tokio::test]
    async fn records_are_scoped_by_deck_and_user() {
        let store = MemoryStore::new();
        store.set("d1", "u1", "a", answered(true, 0)).await.unwrap();

        assert!(store.get("d1", "u2").await.unwrap().is_empty());
        assert!(store.get("d2", "u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn batch_applies_every_update() {
        let store = MemoryStore::new();
        let updates = vec![
            StatusUpdate {
                card_id: "a".to_string(),
                status: answered(true, 0),
            },
            StatusUpdate {
                card_id: "b".to_string(),
                status: answered(false, 0),
            },
        ];
        store.set_batch("d", "u", &updates).await.unwrap();

        let map = store.get("d", "u").await.unwrap();
        assert_eq!(map.len(), 2);
        assert!(map["a"].is_correct);
        assert!(!map["b"].is_correct);
    }

    #[tokio::test]
    async fn reset_clears_only_the_targeted_pair() {
        let store = MemoryStore::new();
        store.set("d", "u1", "a", answered(true, 0)).await.unwrap();
        store.set("d", "u2", "a", answered(true, 0)).await.unwrap();

        store.reset("d", "u1").await.unwrap();

        assert!(store.get("d", "u1").await.unwrap().is_empty());
        assert_eq!(store.get("d", "u2").await.unwrap().len(), 1);
    }
}
