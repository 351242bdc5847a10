use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Position of a directory in the index arena
pub type DirId = u32;

/// Directory entry in the index arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    pub name: String,
    /// `None` for a filesystem root; otherwise always a smaller id
    pub parent: Option<DirId>,
}

/// A child directory reported by a [`DirectoryLister`](crate::index::build::DirectoryLister)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildDir {
    pub name: String,
    pub path: PathBuf,
}

/// Options controlling what a build indexes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Minimum length (in chars) of a word inside a name to be indexed as
    /// its own key
    pub min_word_len: usize,
    /// Glob patterns matched against directory names; matches are skipped
    /// together with their subtree
    pub exclude: Vec<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            min_word_len: 2,
            exclude: vec![".git".to_string()],
        }
    }
}

/// Summary of a built or loaded index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexSummary {
    pub directories: usize,
    pub name_keys: usize,
    pub name_values: usize,
    pub acronym_keys: usize,
    pub acronym_values: usize,
}
