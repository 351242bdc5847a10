//! Directory trees on disk for integration tests

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Relative directories created under the fixture root
pub const TREE: &[&str] = &[
    "Code/go/bin/Release",
    "Code/go/bin/Debug",
    "Code/go.Test",
    "Code/web-app/src",
    "Code/web-app/node_modules/left-pad",
    "Docs/Release Notes",
    "Music/Code Samples",
    "Code/.git/objects",
];

/// A temporary tree plus its canonical root
pub struct Fixture {
    _dir: TempDir,
    pub root: PathBuf,
}

impl Fixture {
    pub fn path(&self, rel: &str) -> PathBuf {
        rel.split('/').fold(self.root.clone(), |path, part| path.join(part))
    }

    /// Full path string as reported by search results
    pub fn display(&self, rel: &str) -> String {
        self.path(rel).to_string_lossy().into_owned()
    }
}

pub fn create_tree() -> Fixture {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let root = dir.path().join("root");

    for rel in TREE {
        let path = rel.split('/').fold(root.clone(), |path: PathBuf, part| path.join(part));
        fs::create_dir_all(&path).expect("Failed to create fixture dir");
    }
    // A file is never indexed
    fs::write(root.join("Code").join("README.md"), "hello").expect("Failed to write file");

    let root = canonical(&root);
    Fixture { _dir: dir, root }
}

pub fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().expect("Failed to canonicalize")
}
