//! Contextual patch parsing and application.
//!
//! Interprets the sentinel-delimited pseudo-diff format (`*** Begin
//! Patch` ... `*** End Patch`) and applies the described file adds,
//! deletes, updates, and renames to a set of text files. Hunk context
//! is located with progressively relaxed whitespace matching; how much
//! relaxation was needed is reported as an advisory fuzz score.
//!
//! The pipeline is split into pure stages: text parses into a [`Patch`]
//! against a snapshot of current file contents, the patch resolves into
//! a [`Commit`] holding concrete final content, and only
//! [`apply_commit`] performs I/O, through an injected [`FileSystem`].

pub mod apply;
pub mod commit;
pub mod errors;
pub mod fs;
mod matching;
pub mod parser;
pub mod preview;
mod scanner;
pub mod types;

pub use apply::*;
pub use commit::*;
pub use errors::*;
pub use fs::*;
pub use parser::*;
pub use preview::*;
pub use types::*;
