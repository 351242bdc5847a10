use crate::index::prefix::PrefixIndex;
use crate::index::tree::DirectoryIndex;
use crate::index::types::{DirId, Directory};
use crate::utils::{read_i32_le, read_varint};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::time::Instant;
use thiserror::Error;
use tracing::info;

/// Upper bound on capacity reserved from a count read off disk
const MAX_PREALLOC: usize = 1 << 16;

/// Why a persisted index could not be loaded
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to read index: {0}")]
    Io(#[source] io::Error),

    #[error("index data is truncated")]
    Truncated,

    #[error("negative {what} count: {count}")]
    NegativeCount { what: &'static str, count: i32 },

    #[error("directory {id} has invalid parent {parent}")]
    InvalidParent { id: usize, parent: i32 },

    #[error("{what} index references missing directory {id}")]
    DanglingId { what: &'static str, id: i32 },

    #[error("duplicate key {key:?} in {what} index")]
    DuplicateKey { what: &'static str, key: String },

    #[error("string is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("unexpected data after end of index")]
    TrailingData,
}

impl From<io::Error> for CodecError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            CodecError::Truncated
        } else {
            CodecError::Io(err)
        }
    }
}

impl CodecError {
    /// Whether the index file simply doesn't exist yet
    pub fn is_not_found(&self) -> bool {
        matches!(self, CodecError::Io(err) if err.kind() == io::ErrorKind::NotFound)
    }
}

/// Read an index written by [`write_index`](crate::index::writer::write_index).
/// The whole input must be consumed.
pub fn read_index<R: Read>(reader: &mut R) -> Result<DirectoryIndex, CodecError> {
    let directory_count = read_count(reader, "directory")?;
    let mut directories = Vec::with_capacity(directory_count.min(MAX_PREALLOC));

    for id in 0..directory_count {
        let name = read_string(reader)?;
        let parent = match read_i32_le(reader)? {
            -1 => None,
            parent if parent >= 0 && (parent as usize) < id => Some(parent as DirId),
            parent => return Err(CodecError::InvalidParent { id, parent }),
        };
        directories.push(Directory { name, parent });
    }

    let name_index = read_prefix_index(reader, "name", directory_count)?;
    let acronym_index = read_prefix_index(reader, "acronym", directory_count)?;

    let mut probe = [0u8; 1];
    if reader.read(&mut probe)? != 0 {
        return Err(CodecError::TrailingData);
    }

    Ok(DirectoryIndex::from_parts(directories, name_index, acronym_index))
}

fn read_prefix_index<R: Read>(
    reader: &mut R,
    what: &'static str,
    directory_count: usize,
) -> Result<PrefixIndex, CodecError> {
    let key_count = read_count(reader, "key")?;

    let mut keys: Vec<String> = Vec::with_capacity(key_count.min(MAX_PREALLOC));
    for _ in 0..key_count {
        keys.push(read_string(reader)?);
    }

    let mut buckets = Vec::with_capacity(key_count.min(MAX_PREALLOC));
    for _ in 0..key_count {
        let value_count = read_count(reader, "value")?;
        let mut values = Vec::with_capacity(value_count.min(MAX_PREALLOC));
        for _ in 0..value_count {
            let id = read_i32_le(reader)?;
            if id < 0 || id as usize >= directory_count {
                return Err(CodecError::DanglingId { what, id });
            }
            values.push(id as DirId);
        }
        buckets.push(values);
    }

    let mut sorted = keys.clone();
    sorted.sort_unstable();
    if let Some(pair) = sorted.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(CodecError::DuplicateKey {
            what,
            key: pair[0].clone(),
        });
    }

    Ok(PrefixIndex::from_sorted_buckets(keys, buckets))
}

fn read_count<R: Read>(reader: &mut R, what: &'static str) -> Result<usize, CodecError> {
    let count = read_i32_le(reader)?;
    usize::try_from(count).map_err(|_| CodecError::NegativeCount { what, count })
}

fn read_string<R: Read>(reader: &mut R) -> Result<String, CodecError> {
    let len = read_varint(reader)? as usize;
    let mut bytes = Vec::with_capacity(len.min(MAX_PREALLOC));
    reader.by_ref().take(len as u64).read_to_end(&mut bytes)?;
    if bytes.len() < len {
        return Err(CodecError::Truncated);
    }
    Ok(String::from_utf8(bytes)?)
}

/// Load an index file
pub fn load_index(path: &Path) -> Result<DirectoryIndex, CodecError> {
    let start = Instant::now();
    let file = File::open(path).map_err(CodecError::Io)?;
    let index = read_index(&mut BufReader::new(file))?;

    info!(
        path = %path.display(),
        directories = index.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "loaded directory index"
    );
    Ok(index)
}

impl DirectoryIndex {
    /// Load an index previously written with [`DirectoryIndex::save`]
    pub fn load(path: &Path) -> Result<Self, CodecError> {
        load_index(path)
    }
}
