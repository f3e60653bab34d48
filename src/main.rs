//! Main entry point for the crxget CLI application.
//!
//! Downloads one or more Chrome extension packages from the update service,
//! strips the CRX signing envelope, and unpacks each embedded ZIP archive
//! into its own subdirectory of the destination.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;

use crxget::{Cli, UpdateClient, download_extension};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut client = UpdateClient::new().context("failed to build HTTP client")?;
    if let Some(ref version) = cli.prodversion {
        client = client.prod_version(version.clone());
    }

    let destination = Path::new(&cli.dir);

    for extension_id in &cli.extension_ids {
        if !cli.quiet {
            eprintln!("Downloading {}...", extension_id);
        }

        let result = download_extension(&client, extension_id, destination)
            .await
            .with_context(|| format!("failed to download extension {}", extension_id))?;

        if !cli.quiet {
            eprintln!("Downloaded {}", format_size(result.container_bytes));
        }

        println!(
            "{}: {} files extracted to {}",
            result.extension_id,
            result.files_extracted,
            result.output_dir.display()
        );
    }

    Ok(())
}

/// Format a byte size into a human-readable string.
///
/// Automatically selects the appropriate unit (bytes, KB, MB, GB)
/// based on the size magnitude.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

#[cfg(test)]
mod tests {
    use super::format_size;

    #[test]
    fn formats_sizes_with_appropriate_units() {
        assert_eq!(format_size(500), "500 bytes");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1048576), "1.00 MB");
    }
}
