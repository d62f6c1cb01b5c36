//! Tracking link issuance.

use thiserror::Error;

use seatrack_common::{ObjectId, Origin, TrackingLink};

/// Failures of the issuance flow. Display text is shown to the admin as-is.
#[derive(Error, Debug)]
pub enum IssueError {
    /// The submitted identifier was empty or whitespace-only.
    #[error("Object ID cannot be empty.")]
    EmptyObjectId,

    /// The application's own origin has not been resolved yet.
    #[error("Base URL not available yet. Please wait a moment.")]
    OriginUnresolved,

    /// The URL could not be encoded as a QR symbol.
    #[error("failed to encode QR code: {0}")]
    Encode(#[from] qrcode::types::QrError),

    /// The QR image could not be rendered as PNG.
    #[error("failed to render PNG: {0}")]
    Png(#[from] image::ImageError),

    /// Writing the exported PNG failed.
    #[error("failed to write PNG file: {0}")]
    Io(#[from] std::io::Error),

    /// The clipboard copy failed.
    #[error("failed to copy to clipboard: {0}")]
    Clipboard(String),
}

/// Build the canonical tracking link for one object identifier.
///
/// The identifier is trimmed first; a blank identifier is rejected, as is
/// generation while the origin is unresolved. Pure: the same identifier
/// against the same origin always yields the same link.
pub fn issue(origin: Option<&Origin>, raw_id: &str) -> Result<TrackingLink, IssueError> {
    let origin = origin.ok_or(IssueError::OriginUnresolved)?;
    let object_id = ObjectId::parse(raw_id).map_err(|_| IssueError::EmptyObjectId)?;
    Ok(TrackingLink::new(origin, object_id))
}
