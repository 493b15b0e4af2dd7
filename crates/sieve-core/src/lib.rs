//! sieve-core library.
//!
//! Review session engine for working through a directory of downloaded
//! documents: approve, reject (soft-delete to trash), annotate, and undo
//! recent decisions, with crash-safe persistence of the metadata file.
//!
//! # Conventions
//!
//! - **Errors**: component errors are `thiserror` enums exposing an
//!   [`error::ErrorCode`]; `anyhow::Result` only at collaborator seams.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod command;
pub mod config;
pub mod console;
pub mod error;
pub mod ledger;
pub mod model;
pub mod report;
pub mod session;
pub mod store;
pub mod trash;
pub mod viewer;

pub use command::Command;
pub use model::{Document, Metadata};
pub use session::{Outcome, ReviewPaths, ReviewSession, SessionError};
