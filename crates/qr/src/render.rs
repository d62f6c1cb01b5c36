//! QR image rendering and PNG export.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};

use seatrack_common::{ObjectId, TrackingLink};

use crate::issue::IssueError;

/// Minimum pixel edge of a rendered QR image.
pub const QR_IMAGE_SIZE: u32 = 256;

/// Render the link's URL as a scannable PNG: error-correction level H,
/// at least [`QR_IMAGE_SIZE`] pixels square, black modules on white.
pub fn render_png(link: &TrackingLink) -> Result<Vec<u8>, IssueError> {
    let code = QrCode::with_error_correction_level(link.url().as_bytes(), EcLevel::H)?;
    let rendered = code
        .render::<Luma<u8>>()
        .min_dimensions(QR_IMAGE_SIZE, QR_IMAGE_SIZE)
        .build();

    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(rendered).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// File name for an exported QR image: the object identifier with
/// file-system-hostile characters replaced, falling back to `qrcode.png`.
pub fn png_file_name(object_id: &ObjectId) -> String {
    let stem: String = object_id
        .as_str()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let stem = stem.trim_matches('.');
    if stem.is_empty() {
        "qrcode.png".to_string()
    } else {
        format!("{stem}.png")
    }
}

/// Render the link and write the PNG into `dir`, returning the file path.
pub fn write_png(link: &TrackingLink, dir: &Path) -> Result<PathBuf, IssueError> {
    let bytes = render_png(link)?;
    let path = dir.join(png_file_name(link.object_id()));
    std::fs::write(&path, bytes)?;
    Ok(path)
}
