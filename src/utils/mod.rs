//! Utility functions shared by the index and the CLI.
//!
//! ## Modules
//!
//! - [`app_data`] - Configuration and index file locations (XDG-compliant)
//! - [`encoding`] - Little-endian integers, varints and strings for the index file
//! - [`progress`] - Spinner shown while walking large trees
//! - [`tokenizer`] - Splitting names into letter/digit/other words
//!
//! ```
//! use dirjump::utils::split_words;
//!
//! let name = "go.Release2";
//! let words: Vec<&str> = split_words(name).iter().map(|w| w.text(name)).collect();
//! assert_eq!(words, ["go", ".", "Release", "2"]);
//! ```

pub mod app_data;
pub mod encoding;
pub mod progress;
pub mod tokenizer;

pub use app_data::*;
pub use encoding::*;
pub use progress::*;
pub use tokenizer::*;
