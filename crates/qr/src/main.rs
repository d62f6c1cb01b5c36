//! SeaTrack QR minting utility
//!
//! Admin tool that mints tracking QR codes from the command line: builds the
//! canonical tracking URL for each object identifier, writes one PNG per
//! object, and optionally copies the last URL to the system clipboard.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use seatrack_common::Origin;
use seatrack_qr::{issue, write_png, ClipboardWriter, SystemClipboard};

#[derive(Debug, Parser)]
#[command(name = "seatrack-mint")]
#[command(about = "Mint SeaTrack tracking QR codes")]
struct Cli {
    /// Origin the tracking URLs point at, e.g. https://seatrack.example
    /// (falls back to SEATRACK_PUBLIC_ORIGIN)
    #[arg(short, long)]
    origin: Option<String>,

    /// Directory the PNG files are written to
    #[arg(short = 'd', long, default_value = ".")]
    out_dir: PathBuf,

    /// Copy the last generated URL to the system clipboard
    #[arg(short, long)]
    copy: bool,

    /// Object identifiers to mint codes for
    #[arg(required = true)]
    object_ids: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let origin_raw = match cli.origin {
        Some(origin) => origin,
        None => std::env::var("SEATRACK_PUBLIC_ORIGIN")
            .context("no --origin given and SEATRACK_PUBLIC_ORIGIN is not set")?,
    };
    let origin = Origin::parse(&origin_raw)?;

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("failed to create {}", cli.out_dir.display()))?;

    let mut last_url = None;
    for raw_id in &cli.object_ids {
        let link = issue(Some(&origin), raw_id)?;
        let path = write_png(&link, &cli.out_dir)?;

        println!("{} -> {}", link.object_id(), path.display());
        println!("   {}", link.url());
        last_url = Some(link.url().to_string());
    }

    if cli.copy {
        if let Some(url) = last_url {
            match SystemClipboard.copy_text(&url).await {
                Ok(()) => println!("URL copied to clipboard."),
                Err(e) => eprintln!("Failed to copy URL: {e}"),
            }
        }
    }

    Ok(())
}
