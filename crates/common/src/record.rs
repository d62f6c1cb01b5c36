//! Location records as written to the record store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coordinates::Coordinates;
use crate::object_id::ObjectId;

/// Sentinel recorded when the submitting device does not report an agent.
pub const DEFAULT_SUBMITTING_AGENT: &str = "N/A";

/// A location report as the device submits it, before the store assigns an
/// identifier and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLocationRecord {
    /// The tracked object this report is for.
    pub object_id: ObjectId,

    /// Where the device was when it scanned the code.
    pub coordinates: Coordinates,

    /// Free-form description of the submitting device, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitting_agent: Option<String>,
}

impl NewLocationRecord {
    /// Create a new report.
    pub fn new(
        object_id: ObjectId,
        coordinates: Coordinates,
        submitting_agent: Option<String>,
    ) -> Self {
        Self {
            object_id,
            coordinates,
            submitting_agent,
        }
    }

    /// Promote the report to a stored record with a store-generated
    /// identifier and a server-assigned timestamp.
    pub fn into_record(self, id: Uuid, recorded_at: DateTime<Utc>) -> LocationRecord {
        LocationRecord {
            id: id.to_string(),
            object_id: self.object_id,
            latitude: self.coordinates.latitude,
            longitude: self.coordinates.longitude,
            recorded_at,
            submitting_agent: self
                .submitting_agent
                .unwrap_or_else(|| DEFAULT_SUBMITTING_AGENT.to_string()),
        }
    }
}

/// A stored location record. Written exactly once, never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Store-generated identifier.
    pub id: String,

    /// The tracked object.
    pub object_id: ObjectId,

    /// Latitude in decimal degrees.
    pub latitude: f64,

    /// Longitude in decimal degrees.
    pub longitude: f64,

    /// Server-assigned timestamp of the write.
    pub recorded_at: DateTime<Utc>,

    /// Description of the submitting device.
    pub submitting_agent: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(agent: Option<&str>) -> NewLocationRecord {
        NewLocationRecord::new(
            ObjectId::parse("buoy-007").unwrap(),
            Coordinates::new(12.34, 56.78).unwrap(),
            agent.map(str::to_string),
        )
    }

    #[test]
    fn test_into_record_carries_fields() {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let record = report(Some("research-vessel")).into_record(id, now);

        assert_eq!(record.id, id.to_string());
        assert_eq!(record.object_id.as_str(), "buoy-007");
        assert_eq!(record.latitude, 12.34);
        assert_eq!(record.longitude, 56.78);
        assert_eq!(record.recorded_at, now);
        assert_eq!(record.submitting_agent, "research-vessel");
    }

    #[test]
    fn test_missing_agent_defaults_to_sentinel() {
        let record = report(None).into_record(Uuid::new_v4(), Utc::now());
        assert_eq!(record.submitting_agent, DEFAULT_SUBMITTING_AGENT);
    }

    #[test]
    fn test_record_round_trips_as_json() {
        let record = report(None).into_record(Uuid::new_v4(), Utc::now());
        let json = serde_json::to_string(&record).unwrap();
        let back: LocationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
