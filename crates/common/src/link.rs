//! Tracking links and the origins they are minted against.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::object_id::ObjectId;

/// Characters escaped when embedding an object identifier in a query string.
/// Alphanumerics and `-_.!~*'()` pass through, everything else is escaped.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// The absolute base URL the application is served from.
///
/// Trailing slashes are stripped so joined paths stay canonical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Origin(String);

impl Origin {
    /// Parse an origin such as `https://seatrack.example`.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim().trim_end_matches('/');
        let host = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"));
        match host {
            Some(host) if !host.is_empty() => Ok(Self(trimmed.to_string())),
            _ => Err(Error::InvalidOrigin(raw.to_string())),
        }
    }

    /// The origin as a string slice, without a trailing slash.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Origin {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Origin> for String {
    fn from(origin: Origin) -> Self {
        origin.0
    }
}

/// Percent-encode a string for use as a query-string value.
pub fn encode_query_value(raw: &str) -> String {
    utf8_percent_encode(raw, QUERY_COMPONENT).to_string()
}

/// A scannable link pointing a finder at the submission page for one object.
///
/// Deriving the same identifier against the same origin always yields the
/// same URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingLink {
    object_id: ObjectId,
    url: String,
}

impl TrackingLink {
    /// Build the canonical tracking URL for an object.
    pub fn new(origin: &Origin, object_id: ObjectId) -> Self {
        let url = format!(
            "{}/log_location?id={}",
            origin,
            encode_query_value(object_id.as_str())
        );
        Self { object_id, url }
    }

    /// The object the link tracks.
    pub fn object_id(&self) -> &ObjectId {
        &self.object_id
    }

    /// The absolute tracking URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}
