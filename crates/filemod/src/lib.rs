//! filemod - the plugin contract and the executor that drives it.
//!
//! A [`Filemod`] describes a project-wide change as include/exclude globs
//! plus three lifecycle hooks; [`FilemodExecutor`] walks the virtual tree,
//! invokes the hooks, and accumulates an ordered list of proposed
//! [`Command`]s. The run is speculative end to end: the engine never writes
//! to the tree it walks.

mod api;
mod command;
mod error;
mod executor;
mod options;
mod plugin;

#[cfg(test)]
mod tests;

pub use api::ExecutorApi;
pub use command::{Command, DataCommand, FileCommand};
pub use error::{FilemodError, Result};
pub use executor::FilemodExecutor;
pub use options::{ArgumentRecord, parse_argument, parse_argument_record};
pub use plugin::Filemod;
