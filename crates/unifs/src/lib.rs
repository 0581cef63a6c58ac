//! unifs - a uniform, read-only virtual view of a project tree.
//!
//! The rest of the engine sees one lazy interface (`exists`, `is_directory`,
//! `read_file`, `read_directory`) no matter what actually backs the tree: a
//! real directory on disk ([`HostTree`]), an in-memory snapshot
//! ([`MemoryTree`]), or anything else implementing [`TreeBackend`].
//!
//! Path arithmetic lives in [`path`] and performs no I/O.

mod error;
mod fs;
mod glob;
mod host;
mod memory;
pub mod path;
mod tree;

pub use error::{Error, Result};
pub use fs::UnifiedFileSystem;
pub use glob::GlobSet;
pub use host::HostTree;
pub use memory::MemoryTree;
pub use tree::{Entry, EntryKind, TreeBackend};
