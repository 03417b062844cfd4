//! Core study library shared by the backend.
//!
//! Provides:
//! - Round-based mastery progression engine (typing and choice drills)
//! - One-shot test composer with a single end-of-quiz commit
//! - Distractor generation for multiple-choice questions
//! - Card-status store boundary (trait + in-memory implementation)
//! - Derived statistics and bulk-import parsing

pub mod choices;
pub mod engine;
pub mod error;
pub mod import;
pub mod matching;
pub mod shuffle;
pub mod stats;
pub mod store;
pub mod test_mode;
pub mod types;

pub use choices::{generate_choices, MAX_CHOICES};
pub use engine::{AdvanceOutcome, AnswerOutcome, CardPhase, StudySession};
pub use error::{ImportError, SessionError, StoreError};
pub use import::{parse_import, ImportOutcome, ImportedCard};
pub use matching::answers_match;
pub use shuffle::shuffled;
pub use stats::{answered_count, correct_count, mastery_rate};
pub use store::{CardStatusStore, MemoryStore, StatusUpdate};
pub use test_mode::{QuestionKind, TestAnswerOutcome, TestQuestion, TestSession, TestSummary};
pub use types::{
    Card, CardStatus, Deck, StudyDirection, StudyMode, StudyOptions, UserStatusMap,
};
