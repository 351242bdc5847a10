pub mod build;
pub mod prefix;
pub mod reader;
pub mod stats;
pub mod tree;
pub mod types;
pub mod writer;

pub use build::{DirectoryLister, FsLister, build_index, build_index_with_progress};
pub use prefix::PrefixIndex;
pub use reader::{CodecError, load_index, read_index};
pub use tree::{DirectoryIndex, acronym};
pub use types::*;
pub use writer::{save_index, write_index};
