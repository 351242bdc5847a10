use crate::index::prefix::PrefixIndex;
use crate::index::tree::DirectoryIndex;
use crate::utils::{write_i32_le, write_string};
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Write the index in its binary layout:
///
/// 1. directory count, then `{ name, parent }` per directory (`-1` = root)
/// 2. name index: key count, sorted keys, then per key its id list
/// 3. acronym index: same shape
pub fn write_index<W: Write>(index: &DirectoryIndex, writer: &mut W) -> io::Result<()> {
    write_count(writer, index.directories.len())?;
    for dir in &index.directories {
        write_string(writer, &dir.name)?;
        let parent = match dir.parent {
            Some(parent) => to_i32(parent as usize)?,
            None => -1,
        };
        write_i32_le(writer, parent)?;
    }

    write_prefix_index(writer, &index.name_index)?;
    write_prefix_index(writer, &index.acronym_index)?;
    Ok(())
}

fn write_prefix_index<W: Write>(writer: &mut W, prefix_index: &PrefixIndex) -> io::Result<()> {
    let keys = prefix_index.sorted_keys();

    write_count(writer, keys.len())?;
    for key in keys {
        write_string(writer, key)?;
    }

    for key in keys {
        let values = prefix_index.values(key);
        write_count(writer, values.len())?;
        for &value in values {
            write_i32_le(writer, to_i32(value as usize)?)?;
        }
    }

    Ok(())
}

fn write_count<W: Write>(writer: &mut W, count: usize) -> io::Result<()> {
    write_i32_le(writer, to_i32(count)?)
}

fn to_i32(value: usize) -> io::Result<i32> {
    i32::try_from(value)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "index too large for format"))
}

/// Save the index to a file, creating parent directories as needed
pub fn save_index(index: &DirectoryIndex, path: &Path) -> Result<()> {
    let start = Instant::now();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_index(index, &mut writer).context("Failed to write index")?;
    writer.flush().context("Failed to write index")?;

    info!(
        path = %path.display(),
        directories = index.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "saved directory index"
    );
    Ok(())
}

impl DirectoryIndex {
    /// Save this index to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        save_index(self, path)
    }
}
