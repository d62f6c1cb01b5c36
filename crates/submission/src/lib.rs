//! Location Submission Flow
//!
//! Orchestrates one location submission from a scanning device: connectivity
//! check, coordinate acquisition through an injected capability provider, and
//! the record store write. Device capabilities are traits so the whole flow
//! is deterministic under test.

pub mod capability;
pub mod fake;
pub mod flow;

pub use capability::{
    AcquisitionFailure, ConnectivitySignal, PositionProvider, PositionRequest,
};
pub use flow::{SubmissionFlow, SubmissionOptions, SubmissionStatus};
