//! Best-effort clipboard copy of generated URLs.

use async_trait::async_trait;
use clipboard_rs::{Clipboard, ClipboardContext};

use crate::issue::IssueError;

/// Asynchronous, best-effort text copy. Success and failure are reported
/// distinctly so callers can tell the admin which one happened.
#[async_trait]
pub trait ClipboardWriter: Send + Sync {
    /// Copy the given text, replacing the current clipboard contents.
    async fn copy_text(&self, text: &str) -> Result<(), IssueError>;
}

/// The operating system clipboard.
#[derive(Debug, Default)]
pub struct SystemClipboard;

#[async_trait]
impl ClipboardWriter for SystemClipboard {
    async fn copy_text(&self, text: &str) -> Result<(), IssueError> {
        let text = text.to_string();
        // clipboard-rs is synchronous; keep it off the async workers.
        tokio::task::spawn_blocking(move || {
            let ctx = ClipboardContext::new()
                .map_err(|e| IssueError::Clipboard(e.to_string()))?;
            ctx.set_text(text)
                .map_err(|e| IssueError::Clipboard(e.to_string()))
        })
        .await
        .map_err(|e| IssueError::Clipboard(e.to_string()))?
    }
}
