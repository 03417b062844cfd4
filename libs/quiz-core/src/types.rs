//! Core types for the quiz engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One question/answer pair within a deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique within the owning deck.
    pub id: String,
    pub question: String,
    pub answer: String,
}

/// A named, user-owned collection of cards.
///
/// Card insertion order is preserved and used as the default study order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub cards: Vec<Card>,
    pub created_at: DateTime<Utc>,
}

/// Per-user, per-card progress record.
///
/// `attempt_count` counts incorrect answers only; a correct answer never
/// changes it. The `Default` value stands in for an absent record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardStatus {
    pub is_answered: bool,
    pub is_correct: bool,
    pub attempt_count: u32,
}

/// All of one user's card statuses for one deck, keyed by card id.
pub type UserStatusMap = HashMap<String, CardStatus>;

/// Which card side is the prompt and which is the expected answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyDirection {
    /// Question is the prompt, answer is expected.
    Normal,
    /// Answer is the prompt, question is expected.
    Reverse,
}

impl Default for StudyDirection {
    fn default() -> Self {
        Self::Normal
    }
}

/// Drill flavor for a persistent study session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyMode {
    /// Free-text entry with a mandatory retype after a miss.
    Typing,
    /// Multiple choice with generated distractors.
    Choice,
}

/// Options accepted when a study session starts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StudyOptions {
    pub mode: StudyMode,
    #[serde(default)]
    pub direction: StudyDirection,
    /// Whether working sets after round 1 are randomized.
    #[serde(default)]
    pub shuffle: bool,
}

impl StudyOptions {
    pub fn typing() -> Self {
        Self {
            mode: StudyMode::Typing,
            direction: StudyDirection::Normal,
            shuffle: false,
        }
    }

    pub fn choice() -> Self {
        Self {
            mode: StudyMode::Choice,
            direction: StudyDirection::Normal,
            shuffle: false,
        }
    }
}
