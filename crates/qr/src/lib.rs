//! QR Issuance Flow
//!
//! Builds the canonical tracking URL for an object identifier, renders it as
//! a scannable PNG at a fixed size with high error correction, and offers
//! download and clipboard-copy actions. Independent of the submission flow;
//! shares no runtime state with it.

pub mod clipboard;
pub mod issue;
pub mod render;

pub use clipboard::{ClipboardWriter, SystemClipboard};
pub use issue::{issue, IssueError};
pub use render::{png_file_name, render_png, write_png, QR_IMAGE_SIZE};
