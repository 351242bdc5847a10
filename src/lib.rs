//! # dirjump - jump to folders by prefix and acronym
//!
//! dirjump indexes a directory tree once and then answers short multi-term
//! queries with the directories they most likely mean. Each term matches a
//! directory whose name (or a word inside its name) starts with the term, or
//! whose path acronym ends with it: `bR` finds `.../bin/Release`.
//!
//! ## Architecture
//!
//! - [`index`] - Directory arena, prefix indexes, building and persistence
//! - [`query`] - Multi-term search with hierarchy-aware intersection
//! - [`output`] - Result printing for the CLI
//! - [`utils`] - Tokenizer, binary encoding, configuration
//!
//! ## Quick Start
//!
//! ```no_run
//! use dirjump::index::{BuildOptions, DirectoryIndex, build_index};
//! use std::path::Path;
//!
//! let index = build_index(Path::new("/home/me/src"), &BuildOptions::default()).unwrap();
//! index.save(Path::new("/tmp/dirs.idx")).unwrap();
//!
//! let index = DirectoryIndex::load(Path::new("/tmp/dirs.idx")).unwrap();
//! for path in index.search(&["proj", "bR"], None) {
//!     println!("{path}");
//! }
//! ```
//!
//! ## Ranking
//!
//! Terms are combined along the hierarchy: a term matching `/src` and a term
//! matching `/src/proj` together select `/src/proj`. Results are ordered by
//! depth, so the shallowest match comes first, and can be narrowed to those
//! related to a preferred directory (usually the current one).

pub mod index;
pub mod output;
pub mod query;
pub mod utils;
