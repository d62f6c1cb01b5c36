//! Redis-backed record store.

use async_trait::async_trait;
use chrono::Utc;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, info};
use uuid::Uuid;

use seatrack_common::NewLocationRecord;

use crate::store::{RecordId, RecordStore, StoreError};

/// Index holding every appended record identifier, in write order.
const COLLECTION_INDEX: &str = "locations:all";

fn record_key(id: &str) -> String {
    format!("location:{id}")
}

/// Record store backed by a remote Redis instance.
///
/// Each record is written once as a JSON document under `location:<id>` and
/// its identifier appended to the collection index. There is no update or
/// delete path.
pub struct RedisRecordStore {
    conn: ConnectionManager,
}

impl RedisRecordStore {
    /// Connect to the store.
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        info!("Connected to record store at {}", redis_url);

        Ok(Self { conn })
    }

    /// Number of records in the collection.
    pub async fn count(&self) -> Result<usize, StoreError> {
        let mut conn = self.conn.clone();
        let count: usize = conn.llen(COLLECTION_INDEX).await?;
        Ok(count)
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

#[async_trait]
impl RecordStore for RedisRecordStore {
    async fn append(&self, report: NewLocationRecord) -> Result<RecordId, StoreError> {
        let record = report.into_record(Uuid::new_v4(), Utc::now());
        let json = serde_json::to_string(&record)?;

        let mut conn = self.conn.clone();
        let _: () = conn.set(record_key(&record.id), json).await?;
        let _: () = conn.rpush(COLLECTION_INDEX, &record.id).await?;

        debug!(
            "Appended location record {} for object {}",
            record.id, record.object_id
        );
        Ok(RecordId::new(record.id))
    }
}
