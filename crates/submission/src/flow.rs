//! The submission state machine.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, trace, warn};

use seatrack_common::{NewLocationRecord, ObjectId};
use seatrack_record_store::{RecordStore, StoreError};

use crate::capability::{
    AcquisitionFailure, ConnectivitySignal, PositionProvider, PositionRequest,
};

const REQUESTING_MESSAGE: &str = "Acquiring your location...";
const OFFLINE_MESSAGE: &str =
    "You are offline. Please check your internet connection to log location.";
const UNSUPPORTED_MESSAGE: &str = "Positioning is not supported on this device.";
const DENIED_MESSAGE: &str =
    "Location permission denied. Please enable location services in your device settings and try again.";
const UNAVAILABLE_MESSAGE: &str =
    "Location information is unavailable. Please try again later or from a different location.";
const TIMEOUT_MESSAGE: &str = "The request to get your location timed out. Please try again.";
const UNKNOWN_ACQUISITION_MESSAGE: &str = "An unknown error occurred while retrieving location.";
const STORE_FAILURE_MESSAGE: &str = "Failed to submit location data. Please try again.";

fn success_message(object_id: &ObjectId) -> String {
    format!("Location recorded successfully for object ID: {object_id}. Thank you!")
}

/// Where one submission attempt currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    /// Nothing attempted yet, or the last outcome was cleared.
    Idle,
    /// An acquisition and store write are in flight.
    Requesting,
    /// The record store acknowledged the write.
    Success,
    /// The attempt failed; retry is available.
    Error,
    /// The position permission was refused; retry after changing settings.
    Denied,
    /// The device has no positioning capability.
    Unsupported,
    /// The device reports no network connectivity.
    Offline,
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Requesting => "requesting",
            Self::Success => "success",
            Self::Error => "error",
            Self::Denied => "denied",
            Self::Unsupported => "unsupported",
            Self::Offline => "offline",
        };
        f.write_str(name)
    }
}

/// Tunables for one flow instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionOptions {
    /// Acquisition configuration handed to the position provider.
    pub position_request: PositionRequest,

    /// Upper bound on the record store write.
    pub store_timeout: Duration,
}

impl Default for SubmissionOptions {
    fn default() -> Self {
        Self {
            position_request: PositionRequest::default(),
            store_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug)]
struct FlowState {
    status: SubmissionStatus,
    message: String,
    generation: u64,
}

impl FlowState {
    fn enter(&mut self, status: SubmissionStatus, message: impl Into<String>) {
        self.status = status;
        self.message = message.into();
    }
}

enum AttemptOutcome {
    Stored,
    Acquisition(AcquisitionFailure),
    StoreRejected(String),
    StoreFailed(String),
    StoreTimedOut(Duration),
    Superseded,
}

/// One submission flow instance, bound to a single object identifier.
///
/// The connectivity watcher registered at construction lives for the lifetime
/// of the instance and is torn down on drop. A connectivity-loss notification
/// takes precedence over an in-flight attempt: it publishes the offline state
/// immediately and invalidates the attempt's generation, so the attempt's
/// eventual result is discarded instead of resurrecting stale state.
pub struct SubmissionFlow {
    object_id: ObjectId,
    submitting_agent: Option<String>,
    store: Arc<dyn RecordStore>,
    positions: Arc<dyn PositionProvider>,
    connectivity: Arc<dyn ConnectivitySignal>,
    options: SubmissionOptions,
    state: Arc<Mutex<FlowState>>,
    watcher: JoinHandle<()>,
}

impl SubmissionFlow {
    /// Create a flow for one object. Must be called inside a Tokio runtime
    /// (the connectivity watcher is spawned here).
    pub fn new(
        object_id: ObjectId,
        store: Arc<dyn RecordStore>,
        positions: Arc<dyn PositionProvider>,
        connectivity: Arc<dyn ConnectivitySignal>,
    ) -> Self {
        let state = Arc::new(Mutex::new(FlowState {
            status: SubmissionStatus::Idle,
            message: String::new(),
            generation: 0,
        }));

        let watcher = spawn_connectivity_watcher(connectivity.subscribe(), Arc::clone(&state));

        Self {
            object_id,
            submitting_agent: None,
            store,
            positions,
            connectivity,
            options: SubmissionOptions::default(),
            state,
            watcher,
        }
    }

    /// Record a description of the submitting device with each report.
    pub fn with_submitting_agent(mut self, agent: impl Into<String>) -> Self {
        self.submitting_agent = Some(agent.into());
        self
    }

    /// Override the default acquisition and store-write tunables.
    pub fn with_options(mut self, options: SubmissionOptions) -> Self {
        self.options = options;
        self
    }

    /// The object this flow reports on.
    pub fn object_id(&self) -> &ObjectId {
        &self.object_id
    }

    /// The currently published status.
    pub fn status(&self) -> SubmissionStatus {
        self.state.lock().expect("flow state lock poisoned").status
    }

    /// The user-facing message accompanying the current status.
    pub fn message(&self) -> String {
        self.state
            .lock()
            .expect("flow state lock poisoned")
            .message
            .clone()
    }

    /// Clear the latest outcome and return to idle (the "log another"
    /// action). Ignored while an attempt is in flight.
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("flow state lock poisoned");
        if state.status == SubmissionStatus::Requesting {
            return;
        }
        // Invalidates any superseded attempt that is still draining.
        state.generation += 1;
        state.enter(SubmissionStatus::Idle, "");
    }

    /// Run one submission attempt and return the status it concluded in.
    ///
    /// A call while an attempt is already requesting is a no-op, as is a call
    /// before a success outcome has been cleared with [`reset`](Self::reset).
    /// Every failure state allows retrying by calling `submit` again.
    pub async fn submit(&self) -> SubmissionStatus {
        let generation = {
            let mut state = self.state.lock().expect("flow state lock poisoned");
            match state.status {
                SubmissionStatus::Requesting => {
                    trace!("Ignoring submit: an attempt is already in flight");
                    return SubmissionStatus::Requesting;
                }
                SubmissionStatus::Success => {
                    trace!("Ignoring submit: previous outcome not cleared");
                    return SubmissionStatus::Success;
                }
                _ => {}
            }

            if !self.connectivity.is_online() {
                state.enter(SubmissionStatus::Offline, OFFLINE_MESSAGE);
                return SubmissionStatus::Offline;
            }

            if !self.positions.is_available() {
                state.enter(SubmissionStatus::Unsupported, UNSUPPORTED_MESSAGE);
                return SubmissionStatus::Unsupported;
            }

            state.generation += 1;
            state.enter(SubmissionStatus::Requesting, REQUESTING_MESSAGE);
            state.generation
        };

        let outcome = self.run_attempt(generation).await;
        self.conclude(generation, outcome)
    }

    async fn run_attempt(&self, generation: u64) -> AttemptOutcome {
        let position = match self
            .positions
            .current_position(self.options.position_request)
            .await
        {
            Ok(position) => position,
            Err(code) => return AttemptOutcome::Acquisition(code),
        };

        if self.is_superseded(generation) {
            return AttemptOutcome::Superseded;
        }

        let report = NewLocationRecord::new(
            self.object_id.clone(),
            position,
            self.submitting_agent.clone(),
        );

        match tokio::time::timeout(self.options.store_timeout, self.store.append(report)).await {
            Ok(Ok(_record_id)) => AttemptOutcome::Stored,
            Ok(Err(StoreError::Rejected(reason))) => AttemptOutcome::StoreRejected(reason),
            Ok(Err(err)) => AttemptOutcome::StoreFailed(err.to_string()),
            Err(_) => AttemptOutcome::StoreTimedOut(self.options.store_timeout),
        }
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.state.lock().expect("flow state lock poisoned").generation != generation
    }

    fn conclude(&self, generation: u64, outcome: AttemptOutcome) -> SubmissionStatus {
        let mut state = self.state.lock().expect("flow state lock poisoned");
        if state.generation != generation {
            trace!("Discarding the result of a superseded submission attempt");
            return state.status;
        }

        match outcome {
            AttemptOutcome::Stored => {
                state.enter(SubmissionStatus::Success, success_message(&self.object_id));
            }
            AttemptOutcome::Acquisition(AcquisitionFailure::PermissionDenied) => {
                state.enter(SubmissionStatus::Denied, DENIED_MESSAGE);
            }
            AttemptOutcome::Acquisition(AcquisitionFailure::PositionUnavailable) => {
                state.enter(SubmissionStatus::Error, UNAVAILABLE_MESSAGE);
            }
            AttemptOutcome::Acquisition(AcquisitionFailure::Timeout) => {
                state.enter(SubmissionStatus::Error, TIMEOUT_MESSAGE);
            }
            AttemptOutcome::Acquisition(AcquisitionFailure::Unknown) => {
                state.enter(SubmissionStatus::Error, UNKNOWN_ACQUISITION_MESSAGE);
            }
            AttemptOutcome::StoreRejected(reason) => {
                error!("Record store rejected the location write: {}", reason);
                state.enter(SubmissionStatus::Error, reason);
            }
            AttemptOutcome::StoreFailed(reason) => {
                error!("Failed to submit location record: {}", reason);
                state.enter(SubmissionStatus::Error, STORE_FAILURE_MESSAGE);
            }
            AttemptOutcome::StoreTimedOut(timeout) => {
                error!("Record store write timed out after {:?}", timeout);
                state.enter(SubmissionStatus::Error, STORE_FAILURE_MESSAGE);
            }
            AttemptOutcome::Superseded => {
                trace!("Attempt superseded between acquisition and store write");
            }
        }
        state.status
    }
}

impl Drop for SubmissionFlow {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

fn spawn_connectivity_watcher(
    mut rx: watch::Receiver<bool>,
    state: Arc<Mutex<FlowState>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let online = *rx.borrow_and_update();
            if online {
                continue;
            }

            let mut state = state.lock().expect("flow state lock poisoned");
            if state.status == SubmissionStatus::Requesting {
                warn!("Connectivity lost while a submission was in flight");
            }
            // Invalidate any in-flight attempt before publishing the offline
            // state; its eventual result must not overwrite it.
            state.generation += 1;
            state.enter(SubmissionStatus::Offline, OFFLINE_MESSAGE);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeConnectivity, FakePositionProvider};
    use async_trait::async_trait;
    use seatrack_record_store::MemoryRecordStore;
    use tokio::sync::Notify;
    use tokio::task::yield_now;

    fn object_id() -> ObjectId {
        ObjectId::parse("buoy-007").unwrap()
    }

    fn flow_with(
        store: Arc<MemoryRecordStore>,
        positions: FakePositionProvider,
        connectivity: Arc<FakeConnectivity>,
    ) -> SubmissionFlow {
        SubmissionFlow::new(object_id(), store, Arc::new(positions), connectivity)
    }

    async fn wait_for(flow: &SubmissionFlow, status: SubmissionStatus) {
        while flow.status() != status {
            yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_successful_submission() {
        let store = Arc::new(MemoryRecordStore::new());
        let connectivity = Arc::new(FakeConnectivity::online());
        let flow = flow_with(
            Arc::clone(&store),
            FakePositionProvider::fixed(12.34, 56.78),
            connectivity,
        )
        .with_submitting_agent("research-vessel");

        let status = flow.submit().await;

        assert_eq!(status, SubmissionStatus::Success);
        assert!(flow.message().contains("buoy-007"));

        let records = store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].object_id.as_str(), "buoy-007");
        assert_eq!(records[0].latitude, 12.34);
        assert_eq!(records[0].longitude, 56.78);
        assert_eq!(records[0].submitting_agent, "research-vessel");
    }

    #[tokio::test]
    async fn test_offline_at_invocation_skips_everything() {
        let store = Arc::new(MemoryRecordStore::new());
        let positions = Arc::new(FakePositionProvider::fixed(1.0, 2.0));
        let connectivity = Arc::new(FakeConnectivity::offline());
        let flow = SubmissionFlow::new(
            object_id(),
            Arc::clone(&store) as Arc<dyn RecordStore>,
            Arc::clone(&positions) as Arc<dyn PositionProvider>,
            connectivity,
        );

        let status = flow.submit().await;

        assert_eq!(status, SubmissionStatus::Offline);
        assert!(flow.message().contains("offline"));
        assert_eq!(positions.calls(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_missing_capability_skips_acquisition() {
        let store = Arc::new(MemoryRecordStore::new());
        let positions = Arc::new(FakePositionProvider::unavailable());
        let connectivity = Arc::new(FakeConnectivity::online());
        let flow = SubmissionFlow::new(
            object_id(),
            Arc::clone(&store) as Arc<dyn RecordStore>,
            Arc::clone(&positions) as Arc<dyn PositionProvider>,
            connectivity,
        );

        let status = flow.submit().await;

        assert_eq!(status, SubmissionStatus::Unsupported);
        assert_eq!(positions.calls(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_each_failure_code_maps_exactly_once() {
        let cases = [
            (
                AcquisitionFailure::PermissionDenied,
                SubmissionStatus::Denied,
                "permission denied",
            ),
            (
                AcquisitionFailure::PositionUnavailable,
                SubmissionStatus::Error,
                "unavailable",
            ),
            (AcquisitionFailure::Timeout, SubmissionStatus::Error, "timed out"),
            (AcquisitionFailure::Unknown, SubmissionStatus::Error, "unknown error"),
        ];

        for (code, expected, fragment) in cases {
            let store = Arc::new(MemoryRecordStore::new());
            let flow = flow_with(
                Arc::clone(&store),
                FakePositionProvider::failing(code),
                Arc::new(FakeConnectivity::online()),
            );

            let status = flow.submit().await;

            assert_eq!(status, expected, "failure code {code:?}");
            assert!(
                flow.message().to_lowercase().contains(fragment),
                "message for {code:?}: {}",
                flow.message()
            );
            assert!(store.is_empty());
        }
    }

    #[tokio::test]
    async fn test_store_rejection_surfaces_reported_reason() {
        let store = Arc::new(MemoryRecordStore::new());
        store.fail_writes("Failed to log location.");
        let flow = flow_with(
            Arc::clone(&store),
            FakePositionProvider::fixed(1.0, 2.0),
            Arc::new(FakeConnectivity::online()),
        );

        let status = flow.submit().await;

        assert_eq!(status, SubmissionStatus::Error);
        assert_eq!(flow.message(), "Failed to log location.");
    }

    #[tokio::test]
    async fn test_store_transport_failure_shows_generic_message() {
        struct BrokenStore;

        #[async_trait]
        impl RecordStore for BrokenStore {
            async fn append(
                &self,
                _report: NewLocationRecord,
            ) -> Result<seatrack_record_store::RecordId, StoreError> {
                Err(StoreError::Unavailable("connection refused".to_string()))
            }
        }

        let flow = SubmissionFlow::new(
            object_id(),
            Arc::new(BrokenStore),
            Arc::new(FakePositionProvider::fixed(1.0, 2.0)),
            Arc::new(FakeConnectivity::online()),
        );

        let status = flow.submit().await;

        assert_eq!(status, SubmissionStatus::Error);
        assert_eq!(flow.message(), STORE_FAILURE_MESSAGE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_write_is_bounded_by_timeout() {
        struct HangingStore;

        #[async_trait]
        impl RecordStore for HangingStore {
            async fn append(
                &self,
                _report: NewLocationRecord,
            ) -> Result<seatrack_record_store::RecordId, StoreError> {
                std::future::pending().await
            }
        }

        let flow = SubmissionFlow::new(
            object_id(),
            Arc::new(HangingStore),
            Arc::new(FakePositionProvider::fixed(1.0, 2.0)),
            Arc::new(FakeConnectivity::online()),
        );

        let status = flow.submit().await;

        assert_eq!(status, SubmissionStatus::Error);
        assert_eq!(flow.message(), STORE_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_connectivity_loss_wins_over_late_resolution() {
        let store = Arc::new(MemoryRecordStore::new());
        let gate = Arc::new(Notify::new());
        let connectivity = Arc::new(FakeConnectivity::online());
        let flow = Arc::new(flow_with(
            Arc::clone(&store),
            FakePositionProvider::fixed(12.34, 56.78).gated(Arc::clone(&gate)),
            Arc::clone(&connectivity),
        ));

        let handle = tokio::spawn({
            let flow = Arc::clone(&flow);
            async move { flow.submit().await }
        });
        wait_for(&flow, SubmissionStatus::Requesting).await;

        connectivity.set_online(false);
        wait_for(&flow, SubmissionStatus::Offline).await;

        // Let the acquisition resolve after the fact.
        gate.notify_one();
        let final_status = handle.await.unwrap();

        assert_eq!(final_status, SubmissionStatus::Offline);
        assert_eq!(flow.status(), SubmissionStatus::Offline);
        assert!(flow.message().contains("offline"));
        assert!(store.is_empty(), "superseded attempt must not write");
    }

    #[tokio::test]
    async fn test_submit_while_requesting_is_a_no_op() {
        let store = Arc::new(MemoryRecordStore::new());
        let gate = Arc::new(Notify::new());
        let positions = Arc::new(
            FakePositionProvider::fixed(1.0, 2.0).gated(Arc::clone(&gate)),
        );
        let flow = Arc::new(SubmissionFlow::new(
            object_id(),
            Arc::clone(&store) as Arc<dyn RecordStore>,
            Arc::clone(&positions) as Arc<dyn PositionProvider>,
            Arc::new(FakeConnectivity::online()),
        ));

        let handle = tokio::spawn({
            let flow = Arc::clone(&flow);
            async move { flow.submit().await }
        });
        wait_for(&flow, SubmissionStatus::Requesting).await;

        assert_eq!(flow.submit().await, SubmissionStatus::Requesting);
        assert_eq!(positions.calls(), 1);

        gate.notify_one();
        assert_eq!(handle.await.unwrap(), SubmissionStatus::Success);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle_and_allows_retry() {
        let store = Arc::new(MemoryRecordStore::new());
        let flow = flow_with(
            Arc::clone(&store),
            FakePositionProvider::fixed(1.0, 2.0),
            Arc::new(FakeConnectivity::online()),
        );

        assert_eq!(flow.submit().await, SubmissionStatus::Success);
        // A second submit without clearing the outcome is ignored.
        assert_eq!(flow.submit().await, SubmissionStatus::Success);
        assert_eq!(store.len(), 1);

        flow.reset();
        assert_eq!(flow.status(), SubmissionStatus::Idle);
        assert!(flow.message().is_empty());

        assert_eq!(flow.submit().await, SubmissionStatus::Success);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_retry_after_failure() {
        let store = Arc::new(MemoryRecordStore::new());
        store.fail_writes("temporarily out of service");
        let flow = flow_with(
            Arc::clone(&store),
            FakePositionProvider::fixed(1.0, 2.0),
            Arc::new(FakeConnectivity::online()),
        );

        assert_eq!(flow.submit().await, SubmissionStatus::Error);

        store.restore_writes();
        assert_eq!(flow.submit().await, SubmissionStatus::Success);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_offline_state_clears_by_retrying_once_back_online() {
        let store = Arc::new(MemoryRecordStore::new());
        let connectivity = Arc::new(FakeConnectivity::offline());
        let flow = flow_with(
            Arc::clone(&store),
            FakePositionProvider::fixed(1.0, 2.0),
            Arc::clone(&connectivity),
        );

        assert_eq!(flow.submit().await, SubmissionStatus::Offline);

        connectivity.set_online(true);
        assert_eq!(flow.submit().await, SubmissionStatus::Success);
    }
}
