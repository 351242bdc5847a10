use crate::index::prefix::PrefixIndex;
use crate::index::types::{DirId, Directory, IndexSummary};
use crate::utils::{Word, reverse, split_words_into};
use std::path::{MAIN_SEPARATOR_STR, Path, is_separator};

/// In-memory directory index: an arena of directories plus two prefix
/// indexes, one over names and name words, one over reversed path acronyms.
#[derive(Debug, Default)]
pub struct DirectoryIndex {
    pub(crate) directories: Vec<Directory>,
    pub(crate) name_index: PrefixIndex,
    pub(crate) acronym_index: PrefixIndex,
}

impl DirectoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(
        directories: Vec<Directory>,
        name_index: PrefixIndex,
        acronym_index: PrefixIndex,
    ) -> Self {
        Self {
            directories,
            name_index,
            acronym_index,
        }
    }

    /// Number of directories, including the unindexed ancestors of the root
    pub fn len(&self) -> usize {
        self.directories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }

    pub fn directories(&self) -> &[Directory] {
        &self.directories
    }

    pub fn get(&self, id: DirId) -> Option<&Directory> {
        self.directories.get(id as usize)
    }

    pub fn name_index(&self) -> &PrefixIndex {
        &self.name_index
    }

    pub fn acronym_index(&self) -> &PrefixIndex {
        &self.acronym_index
    }

    pub fn summary(&self) -> IndexSummary {
        IndexSummary {
            directories: self.directories.len(),
            name_keys: self.name_index.key_count(),
            name_values: self.name_index.value_count(),
            acronym_keys: self.acronym_index.key_count(),
            acronym_values: self.acronym_index.value_count(),
        }
    }

    /// Append a directory to the arena and return its id
    pub(crate) fn push_directory(&mut self, name: String, parent: Option<DirId>) -> DirId {
        let id = self.directories.len() as DirId;
        debug_assert!(parent.is_none_or(|p| p < id));
        self.directories.push(Directory { name, parent });
        id
    }

    /// Register a directory's searchable keys: its whole name, each salient
    /// word inside the name, and its reversed acronym.
    pub(crate) fn index_directory(&mut self, id: DirId, min_word_len: usize, words: &mut Vec<Word>) {
        let name = &self.directories[id as usize].name;
        self.name_index.add(name, id);

        split_words_into(name, words);
        for word in words.iter() {
            if !word.is_salient() || word.len == name.len() {
                continue;
            }
            let text = word.text(name);
            if text.chars().count() >= min_word_len {
                self.name_index.add(text, id);
            }
        }

        let key = self.reversed_acronym_with(id, words);
        self.acronym_index.add(&key, id);
    }

    /// The directory followed by each of its ancestors up to the root
    pub fn ancestors_or_self(&self, id: DirId) -> impl Iterator<Item = DirId> + '_ {
        std::iter::successors(Some(id), move |&current| {
            self.directories[current as usize].parent
        })
    }

    /// Number of ancestor hops to the filesystem root (root = 0)
    pub fn depth(&self, id: DirId) -> usize {
        self.ancestors_or_self(id).count() - 1
    }

    /// Full path of a directory, e.g. `/home/me/code` or `C:\Code`
    pub fn full_path(&self, id: DirId) -> String {
        let mut chain: Vec<&str> = self
            .ancestors_or_self(id)
            .map(|current| self.directories[current as usize].name.as_str())
            .collect();
        chain.reverse();

        let mut path = String::with_capacity(chain.iter().map(|n| n.len() + 1).sum());
        for (i, name) in chain.iter().enumerate() {
            if i > 1 {
                path.push_str(MAIN_SEPARATOR_STR);
            }
            path.push_str(name);
            if i == 0 {
                path.push_str(MAIN_SEPARATOR_STR);
            }
        }
        path
    }

    /// Reversed acronym of the directory's full path
    pub fn reversed_acronym(&self, id: DirId) -> String {
        self.reversed_acronym_with(id, &mut Vec::new())
    }

    fn reversed_acronym_with(&self, id: DirId, words: &mut Vec<Word>) -> String {
        let mut key = String::new();
        for current in self.ancestors_or_self(id) {
            append_reversed_acronym(&self.directories[current as usize].name, &mut key, words);
        }
        key
    }

    /// Find the indexed directory whose full path equals `path` once made
    /// absolute. Candidates come from the acronym index, so only indexed
    /// directories (the root and below) resolve.
    pub fn index_of_path(&self, path: &Path) -> Option<DirId> {
        let full_path = absolute_path_string(path);
        let key = reversed_acronym_of_path(&full_path);

        self.acronym_index
            .values(&key)
            .iter()
            .copied()
            .find(|&id| self.full_path(id) == full_path)
    }
}

/// Append the first char of each salient word of `name`, last word first
fn append_reversed_acronym(name: &str, out: &mut String, words: &mut Vec<Word>) {
    split_words_into(name, words);
    out.extend(
        words
            .iter()
            .rev()
            .filter(|word| word.is_salient())
            .filter_map(|word| word.first_char(name)),
    );
}

/// Reversed acronym of an arbitrary path string
pub fn reversed_acronym_of_path(path: &str) -> String {
    let mut key = String::new();
    append_reversed_acronym(path, &mut key, &mut Vec::new());
    key
}

/// Acronym of a path in reading order, e.g. `/src/bin/Release` → `sbR`.
/// The path does not need to be indexed or even exist.
pub fn acronym(path: &Path) -> String {
    reverse(&reversed_acronym_of_path(&absolute_path_string(path)))
}

/// Name stored for a directory: its last component, or for a filesystem root
/// the root itself without trailing separators (`/` → ``, `C:\` → `C:`)
pub(crate) fn directory_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path
            .to_string_lossy()
            .trim_end_matches(is_separator)
            .to_string(),
    }
}

/// Canonical form of a path as a string, falling back to the lexically
/// absolute form when the path can't be resolved
pub(crate) fn absolute_path_string(path: &Path) -> String {
    let resolved = path
        .canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf());
    resolved.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `/` → `/code` → `/code/go.Release2`
    fn small_tree() -> DirectoryIndex {
        let mut index = DirectoryIndex::new();
        let root = index.push_directory(String::new(), None);
        let code = index.push_directory("code".to_string(), Some(root));
        let release = index.push_directory("go.Release2".to_string(), Some(code));

        let mut words = Vec::new();
        index.index_directory(release, 2, &mut words);
        index.index_directory(code, 2, &mut words);
        index
    }

    #[test]
    fn test_full_path_and_depth() {
        let index = small_tree();
        let sep = MAIN_SEPARATOR_STR;
        assert_eq!(index.full_path(0), sep);
        assert_eq!(index.full_path(1), format!("{sep}code"));
        assert_eq!(index.full_path(2), format!("{sep}code{sep}go.Release2"));

        assert_eq!(index.depth(0), 0);
        assert_eq!(index.depth(2), 2);
        assert_eq!(index.ancestors_or_self(2).collect::<Vec<_>>(), vec![2, 1, 0]);
    }

    #[test]
    fn test_full_path_drive_root() {
        let mut index = DirectoryIndex::new();
        let drive = index.push_directory("C:".to_string(), None);
        let code = index.push_directory("Code".to_string(), Some(drive));
        let sep = MAIN_SEPARATOR_STR;
        assert_eq!(index.full_path(code), format!("C:{sep}Code"));
    }

    #[test]
    fn test_reversed_acronym() {
        let index = small_tree();
        // code → c, go.Release2 → g R 2; innermost name first, last word first
        assert_eq!(index.reversed_acronym(2), "2Rgc");
        assert_eq!(index.reversed_acronym(1), "c");
        assert_eq!(index.reversed_acronym(0), "");
    }

    #[test]
    fn test_index_directory_keys() {
        let index = small_tree();
        assert_eq!(index.name_index().values("go.Release2"), &[2]);
        assert_eq!(index.name_index().values("go"), &[2]);
        assert_eq!(index.name_index().values("Release"), &[2]);
        // Single-char words are too short to be keys on their own
        assert!(index.name_index().values("2").is_empty());
        // Whole-name words are not duplicated
        assert_eq!(index.name_index().values("code"), &[1]);
        assert_eq!(index.acronym_index().values("2Rgc"), &[2]);
        // Unindexed root has no keys
        assert_eq!(index.summary().name_keys, 4);
    }

    #[test]
    fn test_reversed_acronym_of_path() {
        assert_eq!(reversed_acronym_of_path("/src/bin/Release"), "Rbs");
        assert_eq!(reversed_acronym_of_path(r"C:\Code\go"), "gCC");
        assert_eq!(reversed_acronym_of_path(""), "");
    }

    #[test]
    fn test_directory_name() {
        assert_eq!(directory_name(Path::new("/")), "");
        assert_eq!(directory_name(Path::new("/home/me")), "me");
    }
}
