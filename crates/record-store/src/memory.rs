//! In-memory record store for mock mode and tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use seatrack_common::{LocationRecord, NewLocationRecord};

use crate::store::{RecordId, RecordStore, StoreError};

/// Record store held entirely in process memory.
///
/// Used when the service runs in mock mode and by tests that need to observe
/// what was written or force the write path to fail.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<LocationRecord>>,
    fail_reason: Mutex<Option<String>>,
}

impl MemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record appended so far, in write order.
    pub fn records(&self) -> Vec<LocationRecord> {
        self.records.lock().expect("record lock poisoned").clone()
    }

    /// Number of appended records.
    pub fn len(&self) -> usize {
        self.records.lock().expect("record lock poisoned").len()
    }

    /// Whether nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make every subsequent append fail with the given reason.
    pub fn fail_writes(&self, reason: &str) {
        *self.fail_reason.lock().expect("failure lock poisoned") = Some(reason.to_string());
    }

    /// Let appends succeed again.
    pub fn restore_writes(&self) {
        *self.fail_reason.lock().expect("failure lock poisoned") = None;
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn append(&self, report: NewLocationRecord) -> Result<RecordId, StoreError> {
        if let Some(reason) = self.fail_reason.lock().expect("failure lock poisoned").clone() {
            return Err(StoreError::Rejected(reason));
        }

        let record = report.into_record(Uuid::new_v4(), Utc::now());
        let id = RecordId::new(record.id.clone());

        debug!(
            "Appended in-memory location record {} for object {}",
            record.id, record.object_id
        );
        self.records.lock().expect("record lock poisoned").push(record);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatrack_common::{Coordinates, ObjectId, DEFAULT_SUBMITTING_AGENT};

    fn report(agent: Option<&str>) -> NewLocationRecord {
        NewLocationRecord::new(
            ObjectId::parse("buoy-007").unwrap(),
            Coordinates::new(12.34, 56.78).unwrap(),
            agent.map(str::to_string),
        )
    }

    #[tokio::test]
    async fn test_append_stores_record() {
        let store = MemoryRecordStore::new();
        assert!(store.is_empty());

        let id = store.append(report(Some("survey-drone"))).await.unwrap();

        let records = store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id.as_str());
        assert_eq!(records[0].object_id.as_str(), "buoy-007");
        assert_eq!(records[0].latitude, 12.34);
        assert_eq!(records[0].longitude, 56.78);
        assert_eq!(records[0].submitting_agent, "survey-drone");
    }

    #[tokio::test]
    async fn test_append_defaults_agent() {
        let store = MemoryRecordStore::new();
        store.append(report(None)).await.unwrap();
        assert_eq!(store.records()[0].submitting_agent, DEFAULT_SUBMITTING_AGENT);
    }

    #[tokio::test]
    async fn test_induced_failure_and_recovery() {
        let store = MemoryRecordStore::new();
        store.fail_writes("disk full");

        let err = store.append(report(None)).await.unwrap_err();
        assert!(err.to_string().contains("disk full"));
        assert!(store.is_empty());

        store.restore_writes();
        store.append(report(None)).await.unwrap();
        assert_eq!(store.len(), 1);
    }
}
