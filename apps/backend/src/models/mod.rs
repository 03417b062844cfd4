//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from quiz-core
pub use quiz_core::types::{
    Card, CardStatus, Deck, StudyDirection, StudyMode, StudyOptions, UserStatusMap,
};
pub use quiz_core::{AnswerOutcome, CardPhase, TestSummary};

// === Database Entity Types ===

/// Registered user (token-authenticated)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub token: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// Deck stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDeck {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Card stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCard {
    pub id: String,
    pub deck_id: Uuid,
    pub question: String,
    pub answer: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

impl DbCard {
    /// Convert to the core card type
    pub fn to_core_card(&self) -> Card {
        Card {
            id: self.id.clone(),
            question: self.question.clone(),
            answer: self.answer.clone(),
        }
    }
}

/// Card status row in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCardStatus {
    pub deck_id: Uuid,
    pub user_id: Uuid,
    pub card_id: String,
    pub is_answered: bool,
    pub is_correct: bool,
    pub attempt_count: i32,
    pub updated_at: DateTime<Utc>,
}

impl DbCardStatus {
    /// Convert to the core status type
    pub fn to_core_status(&self) -> CardStatus {
        CardStatus {
            is_answered: self.is_answered,
            is_correct: self.is_correct,
            attempt_count: self.attempt_count.max(0) as u32,
        }
    }
}

// === API Request/Response Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

// Deck types

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateDeckRequest {
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeckSummary {
    pub id: Uuid,
    pub title: String,
    pub card_count: usize,
    pub mastery_rate: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeckListResponse {
    pub decks: Vec<DeckSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeckDetailResponse {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub cards: Vec<Card>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CardRequest {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportRequest {
    /// Pasted JSON text: an array of `{q, a}` objects.
    pub data: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub skipped: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeckStatsResponse {
    pub total_cards: usize,
    pub answered_count: usize,
    pub correct_count: usize,
    pub mastery_rate: u32,
}

// Study types

#[derive(Debug, Serialize, Deserialize)]
pub struct StudyStartRequest {
    pub mode: StudyMode,
    #[serde(default)]
    pub direction: StudyDirection,
    #[serde(default)]
    pub shuffle: bool,
}

impl StudyStartRequest {
    pub fn to_options(&self) -> StudyOptions {
        StudyOptions {
            mode: self.mode,
            direction: self.direction,
            shuffle: self.shuffle,
        }
    }
}

/// Snapshot of a study session for the client.
#[derive(Debug, Serialize, Deserialize)]
pub struct StudyView {
    pub deck_id: Uuid,
    pub round: u32,
    /// Zero-based index into the current working set.
    pub position: usize,
    pub total: usize,
    pub correct: u32,
    pub incorrect: u32,
    pub completed: bool,
    pub phase: String,
    pub prompt: Option<String>,
    /// Present in choice mode only.
    pub choices: Vec<String>,
    pub mastery_rate: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RetypeRequest {
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RetypeResponse {
    pub accepted: bool,
}

// Test types

#[derive(Debug, Serialize, Deserialize)]
pub struct TestStartRequest {
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    #[serde(default = "default_typing_ratio")]
    pub typing_ratio: u32,
}

fn default_question_count() -> usize {
    10
}

fn default_typing_ratio() -> u32 {
    50
}

/// Snapshot of a test session for the client.
#[derive(Debug, Serialize, Deserialize)]
pub struct TestView {
    pub deck_id: Uuid,
    pub position: usize,
    pub total: usize,
    pub finished: bool,
    pub kind: Option<String>,
    pub prompt: Option<String>,
    pub choices: Vec<String>,
    pub correct: u32,
    pub incorrect: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TestAdvanceResponse {
    pub finished: bool,
}
