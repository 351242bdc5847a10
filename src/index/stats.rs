use crate::index::reader::load_index;
use anyhow::{Context, Result};
use std::path::Path;

/// Display index statistics
pub fn show_stats(index_path: &Path, json: bool) -> Result<()> {
    let index = load_index(index_path)
        .with_context(|| format!("Failed to load {}", index_path.display()))?;
    let summary = index.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Index Statistics");
    println!("================");
    println!();
    println!("Index location:   {}", index_path.display());
    if let Ok(meta) = index_path.metadata() {
        println!("Index size:       {}", format_size(meta.len()));
    }
    println!("Directories:      {}", summary.directories);
    println!(
        "Name keys:        {} ({} entries)",
        summary.name_keys, summary.name_values
    );
    println!(
        "Acronym keys:     {} ({} entries)",
        summary.acronym_keys, summary.acronym_values
    );

    Ok(())
}

/// Format byte size to human readable
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
