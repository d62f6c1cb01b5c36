//! Deterministic capability fakes for tests and mock deployments.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{watch, Notify};

use seatrack_common::Coordinates;

use crate::capability::{
    AcquisitionFailure, ConnectivitySignal, PositionProvider, PositionRequest,
};

/// Position provider that returns a scripted outcome.
#[derive(Debug)]
pub struct FakePositionProvider {
    available: bool,
    outcome: Result<Coordinates, AcquisitionFailure>,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
}

impl FakePositionProvider {
    /// Provider that always resolves to the given coordinates.
    pub fn fixed(latitude: f64, longitude: f64) -> Self {
        Self {
            available: true,
            outcome: Ok(Coordinates {
                latitude,
                longitude,
            }),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Provider that always reports the given failure code.
    pub fn failing(code: AcquisitionFailure) -> Self {
        Self {
            available: true,
            outcome: Err(code),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Provider on a device without any positioning capability.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            outcome: Err(AcquisitionFailure::Unknown),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Hold every request until the gate is notified, so a test can interleave
    /// other events with an in-flight acquisition.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Number of acquisition requests received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PositionProvider for FakePositionProvider {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn current_position(
        &self,
        _request: PositionRequest,
    ) -> Result<Coordinates, AcquisitionFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.outcome
    }
}

/// Connectivity signal driven by the caller.
#[derive(Debug)]
pub struct FakeConnectivity {
    tx: watch::Sender<bool>,
}

impl FakeConnectivity {
    /// Signal that starts in the given state.
    pub fn new(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        Self { tx }
    }

    /// Signal that starts online.
    pub fn online() -> Self {
        Self::new(true)
    }

    /// Signal that starts offline.
    pub fn offline() -> Self {
        Self::new(false)
    }

    /// Publish a connectivity transition.
    pub fn set_online(&self, online: bool) {
        self.tx.send_replace(online);
    }
}

impl ConnectivitySignal for FakeConnectivity {
    fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_provider_counts_calls() {
        let provider = FakePositionProvider::fixed(1.5, -2.5);
        assert!(provider.is_available());
        assert_eq!(provider.calls(), 0);

        let position = provider
            .current_position(PositionRequest::default())
            .await
            .unwrap();
        assert_eq!(position.latitude, 1.5);
        assert_eq!(position.longitude, -2.5);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_failing_provider_reports_code() {
        let provider = FakePositionProvider::failing(AcquisitionFailure::Timeout);
        let err = provider
            .current_position(PositionRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err, AcquisitionFailure::Timeout);
    }

    #[test]
    fn test_unavailable_provider() {
        assert!(!FakePositionProvider::unavailable().is_available());
    }

    #[tokio::test]
    async fn test_connectivity_transitions_reach_subscribers() {
        let signal = FakeConnectivity::online();
        assert!(signal.is_online());

        let mut rx = signal.subscribe();
        signal.set_online(false);

        rx.changed().await.unwrap();
        assert!(!*rx.borrow());
        assert!(!signal.is_online());
    }
}
