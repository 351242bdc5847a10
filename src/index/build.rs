use crate::index::tree::{DirectoryIndex, directory_name};
use crate::index::types::{BuildOptions, ChildDir, DirId};
use crate::utils::{ProgressBar, ProgressStyle};
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Source of child directories for a build.
///
/// A failed listing is not fatal: the builder treats the directory as having
/// no children and moves on.
pub trait DirectoryLister {
    fn list_children(&self, path: &Path) -> io::Result<Vec<ChildDir>>;
}

impl<L: DirectoryLister + ?Sized> DirectoryLister for &L {
    fn list_children(&self, path: &Path) -> io::Result<Vec<ChildDir>> {
        (**self).list_children(path)
    }
}

/// Lists real directories with `std::fs::read_dir`, sorted by name.
/// Symlinks are not followed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLister;

impl DirectoryLister for FsLister {
    fn list_children(&self, path: &Path) -> io::Result<Vec<ChildDir>> {
        Ok(collect_children(path, fs::read_dir(path)?))
    }
}

/// One entry of a directory listing
trait ListedEntry {
    fn name(&self) -> String;
    fn path(&self) -> PathBuf;
    fn is_dir(&self) -> io::Result<bool>;
}

impl ListedEntry for fs::DirEntry {
    fn name(&self) -> String {
        self.file_name().to_string_lossy().into_owned()
    }

    fn path(&self) -> PathBuf {
        fs::DirEntry::path(self)
    }

    fn is_dir(&self) -> io::Result<bool> {
        Ok(self.file_type()?.is_dir())
    }
}

/// Keep the subdirectories of a listing, sorted by name. An entry that can't
/// be read is skipped on its own; its siblings are kept.
fn collect_children<E: ListedEntry>(
    path: &Path,
    entries: impl IntoIterator<Item = io::Result<E>>,
) -> Vec<ChildDir> {
    let mut children = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "skipping unreadable entry");
                continue;
            }
        };
        match entry.is_dir() {
            Ok(true) => children.push(ChildDir {
                name: entry.name(),
                path: entry.path(),
            }),
            Ok(false) => {}
            Err(err) => {
                debug!(path = %entry.path().display(), error = %err, "skipping unreadable entry");
            }
        }
    }
    children.sort_by(|a, b| a.name.cmp(&b.name));
    children
}

/// Pending children of a directory on the walk stack
struct Frame {
    id: DirId,
    children: std::vec::IntoIter<ChildDir>,
}

impl DirectoryIndex {
    /// Build an index of `root` and everything below it.
    ///
    /// The root's ancestors are added first (oldest first) so every path can
    /// be materialized, but only the root and its descendants are searchable.
    /// Directories are created in pre-order and indexed in post-order.
    pub fn build<L: DirectoryLister>(root: &Path, lister: L, options: &BuildOptions) -> Result<Self> {
        let excluded = build_exclude_set(&options.exclude)?;
        let mut index = DirectoryIndex::new();
        let mut unreadable = 0usize;
        let mut skipped = 0usize;

        let mut list = |path: &Path| match lister.list_children(path) {
            Ok(children) => children.into_iter(),
            Err(err) => {
                debug!(path = %path.display(), error = %err, "skipping unreadable directory");
                unreadable += 1;
                Vec::new().into_iter()
            }
        };

        // Lineage of the root, oldest first
        let mut lineage: Vec<&Path> = root
            .ancestors()
            .skip(1)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        lineage.reverse();

        let mut parent = None;
        for ancestor in lineage {
            parent = Some(index.push_directory(directory_name(ancestor), parent));
        }

        let root_id = index.push_directory(directory_name(root), parent);
        let mut stack = vec![Frame {
            id: root_id,
            children: list(root),
        }];
        let mut words = Vec::new();

        while let Some(frame) = stack.last_mut() {
            match frame.children.next() {
                Some(child) => {
                    if excluded.is_match(&child.name) {
                        skipped += 1;
                        continue;
                    }
                    let id = index.push_directory(child.name, Some(frame.id));
                    let children = list(&child.path);
                    stack.push(Frame { id, children });
                }
                None => {
                    let id = frame.id;
                    stack.pop();
                    index.index_directory(id, options.min_word_len, &mut words);
                }
            }
        }

        debug!(
            directories = index.len(),
            unreadable, skipped, "directory walk finished"
        );
        Ok(index)
    }
}

fn build_exclude_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).with_context(|| format!("Invalid exclude pattern: {pattern}"))?;
        builder.add(glob);
    }
    builder.build().context("Failed to compile exclude patterns")
}

/// Ticks a progress spinner once per listed directory
struct ProgressLister<'a, L> {
    inner: L,
    progress: &'a ProgressBar,
}

impl<L: DirectoryLister> DirectoryLister for ProgressLister<'_, L> {
    fn list_children(&self, path: &Path) -> io::Result<Vec<ChildDir>> {
        self.progress.inc(1);
        self.inner.list_children(path)
    }
}

/// Build an index of the filesystem below `root`
pub fn build_index(root_path: &Path, options: &BuildOptions) -> Result<DirectoryIndex> {
    build_index_with_progress(root_path, options, true)
}

/// Build an index of the filesystem below `root`, showing a spinner unless
/// `silent` is set
pub fn build_index_with_progress(
    root_path: &Path,
    options: &BuildOptions,
    silent: bool,
) -> Result<DirectoryIndex> {
    let root = root_path
        .canonicalize()
        .with_context(|| format!("Invalid path: {}", root_path.display()))?;
    let start = Instant::now();

    let spinner = if silent {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg} {pos} directories")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("Indexing {}", root.display()));
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    };

    let lister = ProgressLister {
        inner: FsLister,
        progress: &spinner,
    };
    let index = DirectoryIndex::build(&root, lister, options)?;

    spinner.finish_with_message(format!("Indexed {}", root.display()));

    let summary = index.summary();
    info!(
        root = %root.display(),
        directories = summary.directories,
        name_keys = summary.name_keys,
        acronym_keys = summary.acronym_keys,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "built directory index"
    );

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    /// In-memory tree: path → child names. Paths in `denied` fail to list.
    #[derive(Default)]
    struct MemoryLister {
        children: HashMap<PathBuf, Vec<&'static str>>,
        denied: HashSet<PathBuf>,
    }

    impl MemoryLister {
        fn dir(mut self, path: &str, children: &[&'static str]) -> Self {
            self.children.insert(PathBuf::from(path), children.to_vec());
            self
        }

        fn deny(mut self, path: &str) -> Self {
            self.denied.insert(PathBuf::from(path));
            self
        }
    }

    impl DirectoryLister for MemoryLister {
        fn list_children(&self, path: &Path) -> io::Result<Vec<ChildDir>> {
            if self.denied.contains(path) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
            }
            Ok(self
                .children
                .get(path)
                .map(|names| {
                    names
                        .iter()
                        .map(|name| ChildDir {
                            name: name.to_string(),
                            path: path.join(name),
                        })
                        .collect()
                })
                .unwrap_or_default())
        }
    }

    fn names(index: &DirectoryIndex) -> Vec<&str> {
        index.directories().iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_build_creates_lineage_then_preorder() {
        let lister = MemoryLister::default()
            .dir("/home/me", &["code", "docs"])
            .dir("/home/me/code", &["go", "web"]);
        let index = DirectoryIndex::build(Path::new("/home/me"), &lister, &BuildOptions::default()).unwrap();

        assert_eq!(names(&index), vec!["", "home", "me", "code", "go", "web", "docs"]);
        for (id, dir) in index.directories().iter().enumerate() {
            assert!(dir.parent.is_none_or(|p| (p as usize) < id));
        }
        assert_eq!(index.get(4).unwrap().parent, Some(3));
        assert_eq!(index.get(6).unwrap().parent, Some(2));
    }

    #[test]
    fn test_build_indexes_only_root_and_below() {
        let lister = MemoryLister::default().dir("/home/me", &["code"]);
        let index = DirectoryIndex::build(Path::new("/home/me"), &lister, &BuildOptions::default()).unwrap();

        assert!(index.name_index().values("home").is_empty());
        assert_eq!(index.name_index().values("me"), &[2]);
        assert_eq!(index.name_index().values("code"), &[3]);
        assert_eq!(index.acronym_index().values("cmh"), &[3]);
    }

    #[test]
    fn test_build_skips_unreadable_directories() {
        let lister = MemoryLister::default()
            .dir("/r", &["locked", "open"])
            .dir("/r/locked", &["secret"])
            .dir("/r/open", &["inner"])
            .deny("/r/locked");
        let index = DirectoryIndex::build(Path::new("/r"), &lister, &BuildOptions::default()).unwrap();

        // The unreadable directory itself is kept, its subtree is not
        assert_eq!(names(&index), vec!["", "r", "locked", "open", "inner"]);
        assert_eq!(index.name_index().values("locked"), &[2]);
        assert!(index.name_index().values("secret").is_empty());
    }

    #[test]
    fn test_build_unreadable_root() {
        let lister = MemoryLister::default().deny("/r");
        let index = DirectoryIndex::build(Path::new("/r"), &lister, &BuildOptions::default()).unwrap();
        assert_eq!(names(&index), vec!["", "r"]);
    }

    #[test]
    fn test_build_exclude_patterns() {
        let lister = MemoryLister::default()
            .dir("/r", &[".git", "node_modules", "src"])
            .dir("/r/node_modules", &["left-pad"]);
        let options = BuildOptions {
            exclude: vec![".git".to_string(), "node_*".to_string()],
            ..BuildOptions::default()
        };
        let index = DirectoryIndex::build(Path::new("/r"), &lister, &options).unwrap();
        assert_eq!(names(&index), vec!["", "r", "src"]);
    }

    #[test]
    fn test_build_invalid_exclude_pattern() {
        let lister = MemoryLister::default();
        let options = BuildOptions {
            exclude: vec!["[".to_string()],
            ..BuildOptions::default()
        };
        assert!(DirectoryIndex::build(Path::new("/r"), &lister, &options).is_err());
    }

    #[test]
    fn test_min_word_len() {
        let lister = MemoryLister::default().dir("/r", &["go.Release2"]);
        let options = BuildOptions {
            min_word_len: 1,
            ..BuildOptions::default()
        };
        let index = DirectoryIndex::build(Path::new("/r"), &lister, &options).unwrap();
        assert_eq!(index.name_index().values("2"), &[2]);
    }

    /// Listing entry with a fixed outcome for `is_dir`
    struct FakeEntry {
        name: &'static str,
        is_dir: Result<bool, io::ErrorKind>,
    }

    impl ListedEntry for FakeEntry {
        fn name(&self) -> String {
            self.name.to_string()
        }

        fn path(&self) -> PathBuf {
            Path::new("/r").join(self.name)
        }

        fn is_dir(&self) -> io::Result<bool> {
            self.is_dir.map_err(io::Error::from)
        }
    }

    #[test]
    fn test_collect_children_skips_only_bad_entries() {
        let entries = vec![
            Ok(FakeEntry { name: "zeta", is_dir: Ok(true) }),
            Err(io::Error::from(io::ErrorKind::PermissionDenied)),
            Ok(FakeEntry { name: "file.txt", is_dir: Ok(false) }),
            Ok(FakeEntry { name: "vanished", is_dir: Err(io::ErrorKind::NotFound) }),
            Ok(FakeEntry { name: "alpha", is_dir: Ok(true) }),
        ];

        let children = collect_children(Path::new("/r"), entries);
        let names: Vec<&str> = children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert_eq!(children[0].path, PathBuf::from("/r/alpha"));
    }

    #[test]
    fn test_fs_lister_lists_sorted_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b", "a", "c"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        fs::write(dir.path().join("file.txt"), "x").unwrap();

        let children = FsLister.list_children(dir.path()).unwrap();
        let names: Vec<&str> = children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
