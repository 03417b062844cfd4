//! Error types for quiz-core.

use thiserror::Error;

/// Failure in the card-status store boundary.
///
/// The store is an external collaborator; everything it can go wrong with is
/// a transport problem from the engine's point of view. A missing record is
/// not an error (it reads as an empty status map).
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("status store failure: {0}")]
    Transport(String),
}

/// Errors reported by study and test sessions.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("deck has no cards")]
    EmptyDeck,

    #[error("multiple choice needs at least {required} cards, deck has {actual}")]
    NotEnoughCards { required: usize, actual: usize },

    #[error("deck belongs to another user")]
    NotOwner,

    #[error("session is already completed")]
    Completed,

    #[error("no answer is expected right now")]
    UnexpectedAnswer,

    #[error("no retype is expected right now")]
    UnexpectedRetype,

    #[error("cannot advance before the current result is shown")]
    UnexpectedAdvance,

    #[error("test is still in progress")]
    TestNotFinished,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors rejecting a bulk-import payload as a whole.
///
/// Individual items that merely lack a field are skipped and counted, not
/// turned into errors; see [`crate::import::parse_import`].
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("import data is empty")]
    Empty,

    #[error("import data is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("import data must be a JSON array")]
    NotAnArray,
}
