use crate::index::tree::DirectoryIndex;
use crate::index::types::DirId;
use crate::utils::reverse;
use roaring::RoaringBitmap;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Runs multi-term searches against a built index
pub struct QueryEngine<'a> {
    index: &'a DirectoryIndex,
}

impl<'a> QueryEngine<'a> {
    pub fn new(index: &'a DirectoryIndex) -> Self {
        Self { index }
    }

    /// Directories matching one term: names (or name words) starting with the
    /// term, plus directories whose path acronym ends with it
    pub fn term_matches(&self, term: &str) -> RoaringBitmap {
        let mut matches = RoaringBitmap::new();
        self.index.name_index.add_matches_starting_with(term, &mut matches);
        self.index
            .acronym_index
            .add_matches_starting_with(&reverse(term), &mut matches);
        matches
    }

    /// Search and return full paths, shallowest first
    pub fn search<S: AsRef<str>>(&self, terms: &[S], preferred: Option<&Path>) -> Vec<String> {
        self.search_ids(terms, preferred)
            .into_iter()
            .map(|id| self.index.full_path(id))
            .collect()
    }

    /// Search and return directory ids, shallowest first (ties by id).
    ///
    /// Every term must match somewhere along a result's lineage. When
    /// `preferred` resolves to an indexed directory, results related to it
    /// are kept unless none are.
    pub fn search_ids<S: AsRef<str>>(&self, terms: &[S], preferred: Option<&Path>) -> Vec<DirId> {
        let start = Instant::now();
        let mut terms = terms.iter().map(<S as AsRef<str>>::as_ref);

        let Some(first) = terms.next() else {
            return Vec::new();
        };
        let mut matches = self.term_matches(first);

        for term in terms {
            if matches.is_empty() {
                break;
            }
            matches = self.intersect_hierarchy(&matches, &self.term_matches(term));
        }

        if let Some(path) = preferred {
            matches = self.prefer(matches, path);
        }

        let mut ranked: Vec<(usize, DirId)> = matches
            .iter()
            .map(|id| (self.index.depth(id), id))
            .collect();
        ranked.sort_unstable();

        debug!(
            matches = ranked.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "search finished"
        );
        ranked.into_iter().map(|(_, id)| id).collect()
    }

    /// Narrow `matches` to those related to `path`, unless that leaves nothing
    fn prefer(&self, matches: RoaringBitmap, path: &Path) -> RoaringBitmap {
        let Some(preferred) = self.index.index_of_path(path) else {
            debug!(path = %path.display(), "preferred path is not indexed");
            return matches;
        };

        let mut preferred_set = RoaringBitmap::new();
        preferred_set.insert(preferred);

        let narrowed = self.intersect_hierarchy(&matches, &preferred_set);
        if narrowed.is_empty() {
            debug!(path = %path.display(), "no matches related to preferred path");
            matches
        } else {
            narrowed
        }
    }

    /// Keep ids from either set that are in, or below something in, the
    /// other set.
    ///
    /// Intersecting `{/code}` with `{/code/go}` gives `{/code/go}`: `/code/go`
    /// has the ancestor `/code` in the other set, `/code` has no ancestor in
    /// `{/code/go}`.
    pub fn intersect_hierarchy(&self, left: &RoaringBitmap, right: &RoaringBitmap) -> RoaringBitmap {
        let from_left = left.iter().filter(|&id| self.item_or_ancestor_in(id, right));
        let from_right = right.iter().filter(|&id| self.item_or_ancestor_in(id, left));
        from_left.chain(from_right).collect()
    }

    fn item_or_ancestor_in(&self, id: DirId, set: &RoaringBitmap) -> bool {
        self.index.ancestors_or_self(id).any(|current| set.contains(current))
    }
}

impl DirectoryIndex {
    /// Search this index; see [`QueryEngine::search`]
    pub fn search<S: AsRef<str>>(&self, terms: &[S], preferred: Option<&Path>) -> Vec<String> {
        QueryEngine::new(self).search(terms, preferred)
    }
}
