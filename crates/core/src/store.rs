//! Single-slot store for the most recent reading.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::reading::ReadingPayload;
use crate::types::Timestamp;

/// The latest payload together with when it arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredReading {
    pub payload: ReadingPayload,
    pub received_at: Timestamp,
}

/// Last-write-wins holder for the most recent reading.
///
/// Writes replace the whole slot (no field merging). Readers receive an
/// immutable `Arc` snapshot, so a concurrent write can never be observed
/// half-applied.
#[derive(Debug, Default)]
pub struct LatestReadingStore {
    slot: RwLock<Option<Arc<StoredReading>>>,
}

impl LatestReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored reading and return the new snapshot.
    pub async fn set(&self, payload: ReadingPayload) -> Arc<StoredReading> {
        let snapshot = Arc::new(StoredReading {
            payload,
            received_at: Utc::now(),
        });
        *self.slot.write().await = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// Current snapshot, or `None` if nothing has been received yet.
    pub async fn get(&self) -> Option<Arc<StoredReading>> {
        self.slot.read().await.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::{FieldAliases, SensorReading};
    use serde_json::json;

    fn payload(value: serde_json::Value) -> ReadingPayload {
        ReadingPayload::from_value(value, &FieldAliases::default())
    }

    #[tokio::test]
    async fn empty_until_first_write() {
        let store = LatestReadingStore::new();
        assert!(store.get().await.is_none());

        store.set(ReadingPayload::Record(SensorReading::new())).await;
        let stored = store.get().await.expect("reading should be stored");
        assert_eq!(stored.payload, ReadingPayload::Record(SensorReading::new()));
    }

    #[tokio::test]
    async fn writes_replace_instead_of_merging() {
        let store = LatestReadingStore::new();
        store.set(payload(json!({"temperature": 30, "soil": "dry"}))).await;
        store.set(payload(json!({"rain": "heavy"}))).await;

        let stored = store.get().await.unwrap();
        let reading = stored.payload.as_record().unwrap();
        assert_eq!(reading.rain(), "heavy");
        assert!(!reading.fields().contains_key("soil"));
        assert!(!reading.fields().contains_key("temperature"));
    }

    #[tokio::test]
    async fn snapshots_survive_later_writes() {
        let store = LatestReadingStore::new();
        store.set(payload(json!({"soil": "wet"}))).await;
        let before = store.get().await.unwrap();

        store.set(payload(json!({"soil": "dry"}))).await;

        assert_eq!(before.payload.as_record().unwrap().soil(), "wet");
        assert_eq!(store.get().await.unwrap().payload.as_record().unwrap().soil(), "dry");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writes_leave_one_complete_reading() {
        let store = Arc::new(LatestReadingStore::new());
        let mut handles = Vec::new();
        for i in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .set(payload(json!({"temperature": i, "soil": format!("s{i}")})))
                    .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let stored = store.get().await.unwrap();
        let reading = stored.payload.as_record().unwrap();
        let i = reading.temperature() as i64;
        assert_eq!(reading.soil(), format!("s{i}"));
    }
}
