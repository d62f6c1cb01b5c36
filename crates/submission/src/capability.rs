//! Device capability ports consumed by the submission flow.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

use seatrack_common::Coordinates;

/// How a coordinate acquisition should behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionRequest {
    /// How long the provider may spend obtaining a fix.
    pub timeout: Duration,

    /// Prefer high-accuracy positioning when the hardware offers it.
    pub high_accuracy: bool,
}

impl Default for PositionRequest {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            high_accuracy: true,
        }
    }
}

/// Failure codes a position provider can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AcquisitionFailure {
    /// The user or platform refused access to the device position.
    #[error("permission to read the device position was denied")]
    PermissionDenied,

    /// The positioning hardware could not produce a fix.
    #[error("position information is unavailable")]
    PositionUnavailable,

    /// The configured timeout elapsed without a fix.
    #[error("the position request timed out")]
    Timeout,

    /// Any other failure.
    #[error("unknown positioning failure")]
    Unknown,
}

/// One-shot access to the device's positioning capability.
#[async_trait]
pub trait PositionProvider: Send + Sync {
    /// Whether the device exposes a positioning capability at all.
    fn is_available(&self) -> bool;

    /// Request the current position. The provider enforces the timeout
    /// carried in the request.
    async fn current_position(
        &self,
        request: PositionRequest,
    ) -> Result<Coordinates, AcquisitionFailure>;
}

/// Current network connectivity plus transition notifications.
pub trait ConnectivitySignal: Send + Sync {
    /// The device's current belief about connectivity.
    fn is_online(&self) -> bool;

    /// Subscribe to connectivity transitions. Dropping the receiver
    /// unsubscribes.
    fn subscribe(&self) -> watch::Receiver<bool>;
}
