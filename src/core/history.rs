//! In-memory summarization history.
//!
//! Items live in an arena keyed by a monotonically increasing insertion
//! sequence, with a side index from the public id to that sequence. Both
//! maps sit behind one `RwLock`: `save` and `delete_by_id` take the write
//! half and are therefore serialized against each other, while `list`
//! takes the read half and returns owned clones.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

/// A stored summarization record. `id` and `created_at` are owned by the
/// store; everything else is whatever the caller supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Keys the store assigns itself and strips from caller input.
const RESERVED_KEYS: [&str; 2] = ["id", "createdAt"];

#[derive(Debug, Default)]
struct Arena {
    next_seq: u64,
    items: BTreeMap<u64, HistoryItem>,
    index: HashMap<String, u64>,
}

#[derive(Debug, Default)]
pub struct HistoryStore {
    inner: RwLock<Arena>,
}

impl HistoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record and returns it with its freshly assigned id and timestamp.
    pub fn save(&self, mut fields: Map<String, Value>) -> HistoryItem {
        for key in RESERVED_KEYS {
            fields.remove(key);
        }

        let mut arena = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let mut id = Uuid::new_v4().to_string();
        while arena.index.contains_key(&id) {
            id = Uuid::new_v4().to_string();
        }

        let item = HistoryItem {
            id: id.clone(),
            created_at: Utc::now(),
            fields,
        };

        let seq = arena.next_seq;
        arena.next_seq += 1;
        arena.items.insert(seq, item.clone());
        arena.index.insert(id, seq);

        debug!(history_id = %item.id, size = arena.items.len(), "Saved history item");
        item
    }

    /// Point-in-time copy in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<HistoryItem> {
        let arena = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        arena.items.values().cloned().collect()
    }

    /// Removes the item with `id`. Returns `false` when nothing matched,
    /// which is not an error.
    pub fn delete_by_id(&self, id: &str) -> bool {
        let mut arena = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let Some(seq) = arena.index.remove(id) else {
            debug!(history_id = %id, "Delete requested for unknown history item");
            return false;
        };
        arena.items.remove(&seq);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .items
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
