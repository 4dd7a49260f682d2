use thiserror::Error;

/// Any problem detected while parsing or applying a patch.
#[derive(Debug, Error)]
pub enum DiffError {
    /// Malformed patch text, or a well-formed patch that cannot be
    /// reconciled with the current file contents.
    #[error("{0}")]
    Patch(String),
    /// Failure surfaced by an injected filesystem primitive. These are
    /// passed through as raised, never reclassified.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
