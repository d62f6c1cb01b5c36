//! HTTP client for the service's record write path.
//!
//! This is what a scanning device uses: it posts a location report to the
//! SeaTrack server, which performs the actual store append.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use seatrack_common::{NewLocationRecord, Origin};

use crate::store::{RecordId, RecordStore, StoreError};

#[derive(Debug, Serialize)]
struct AppendRequest<'a> {
    object_id: &'a str,
    latitude: f64,
    longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    submitting_agent: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct AppendResponse {
    success: bool,
    message: String,
    #[serde(default)]
    record_id: Option<String>,
}

/// Record store reached through the server's `POST /api/locations` endpoint.
pub struct HttpRecordStore {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRecordStore {
    /// Create a client for the server at the given origin.
    pub fn new(origin: &Origin) -> Self {
        Self::with_client(reqwest::Client::new(), origin)
    }

    /// Create a client reusing an existing connection pool.
    pub fn with_client(client: reqwest::Client, origin: &Origin) -> Self {
        Self {
            client,
            endpoint: format!("{}/api/locations", origin),
        }
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn append(&self, report: NewLocationRecord) -> Result<RecordId, StoreError> {
        let body = AppendRequest {
            object_id: report.object_id.as_str(),
            latitude: report.coordinates.latitude,
            longitude: report.coordinates.longitude,
            submitting_agent: report.submitting_agent.as_deref(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Rejected(format!(
                "record store replied with status {status}"
            )));
        }

        let reply: AppendResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if !reply.success {
            return Err(StoreError::Rejected(reply.message));
        }

        let id = reply.record_id.ok_or_else(|| {
            StoreError::Rejected("write acknowledged without a record id".to_string())
        })?;

        debug!("Server acknowledged location record {}", id);
        Ok(RecordId::new(id))
    }
}
