//! One-shot scored test mixing typing and choice questions.
//!
//! Unlike the round-based study session, a test never reads the status map
//! and writes nothing until [`TestSession::submit`] issues a single batch
//! update. Dropping the session before submit persists nothing; in-memory
//! scoring stays provisional until that one commit.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::HashMap;

use crate::choices::generate_choices;
use crate::error::SessionError;
use crate::matching::answers_match;
use crate::shuffle::shuffled;
use crate::store::{CardStatusStore, StatusUpdate};
use crate::types::{Card, CardStatus, Deck};

/// Question flavor inside a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Typing,
    Choice,
}

/// One question of a composed test.
#[derive(Debug, Clone, Serialize)]
pub struct TestQuestion {
    pub card: Card,
    pub kind: QuestionKind,
    /// Generated options for choice questions, empty for typing.
    pub choices: Vec<String>,
}

/// Result of scoring one test answer.
#[derive(Debug, Clone, Serialize)]
pub struct TestAnswerOutcome {
    pub correct: bool,
    pub expected: String,
}

/// Final tally returned by [`TestSession::submit`].
#[derive(Debug, Clone, Serialize)]
pub struct TestSummary {
    pub total: usize,
    pub correct: u32,
    pub incorrect: u32,
    /// Percentage of correct answers, rounded.
    pub score: u32,
}

/// A fixed-length quiz over a random sample of a deck's cards.
pub struct TestSession<S> {
    store: S,
    deck_id: String,
    user_id: String,
    questions: Vec<TestQuestion>,
    position: usize,
    correct_tally: u32,
    incorrect_tally: u32,
    /// Final per-card results; a later answer to the same card id wins.
    answers: HashMap<String, bool>,
    revealed: bool,
    finished: bool,
}

impl<S: CardStatusStore> TestSession<S> {
    /// Compose a test with OS-seeded randomness.
    pub fn start(
        store: S,
        deck: &Deck,
        user_id: &str,
        question_count: usize,
        typing_ratio: u32,
    ) -> Result<Self, SessionError> {
        Self::start_with_rng(
            store,
            deck,
            user_id,
            question_count,
            typing_ratio,
            StdRng::from_os_rng(),
        )
    }

    /// Compose a test with a caller-provided RNG.
    ///
    /// `question_count` is clamped to `[1, deck size]` and `typing_ratio`
    /// to `[0, 100]`. Cards are sampled by shuffling the deck; the first
    /// `round(count * ratio / 100)` sampled cards become typing questions,
    /// the rest choice questions, and the combined list is shuffled again
    /// so the types interleave.
    pub fn start_with_rng(
        store: S,
        deck: &Deck,
        user_id: &str,
        question_count: usize,
        typing_ratio: u32,
        mut rng: StdRng,
    ) -> Result<Self, SessionError> {
        if deck.user_id != user_id {
            return Err(SessionError::NotOwner);
        }
        if deck.cards.is_empty() {
            return Err(SessionError::EmptyDeck);
        }

        let count = question_count.clamp(1, deck.cards.len());
        let ratio = typing_ratio.min(100);

        let sampled: Vec<Card> = shuffled(&deck.cards, &mut rng).into_iter().take(count).collect();
        let typing_count = ((count as f64) * (ratio as f64) / 100.0).round() as usize;

        let mut questions: Vec<TestQuestion> = Vec::with_capacity(count);
        for (index, card) in sampled.into_iter().enumerate() {
            if index < typing_count {
                questions.push(TestQuestion {
                    card,
                    kind: QuestionKind::Typing,
                    choices: Vec::new(),
                });
            } else {
                let choices =
                    generate_choices(&card.answer, &deck.cards, &card.id, false, &mut rng);
                questions.push(TestQuestion {
                    card,
                    kind: QuestionKind::Choice,
                    choices,
                });
            }
        }

        Ok(Self {
            store,
            deck_id: deck.id.clone(),
            user_id: user_id.to_string(),
            questions: shuffled(&questions, &mut rng),
            position: 0,
            correct_tally: 0,
            incorrect_tally: 0,
            answers: HashMap::new(),
            revealed: false,
            finished: false,
        })
    }

    /// Score an answer for the current question. Typing answers are
    /// trim/case-normalized; choice answers must equal the selected option
    /// exactly. Nothing is persisted here.
    pub fn answer(&mut self, input: &str) -> Result<TestAnswerOutcome, SessionError> {
        if self.finished {
            return Err(SessionError::Completed);
        }
        if self.revealed {
            return Err(SessionError::UnexpectedAnswer);
        }

        let question = &self.questions[self.position];
        let expected = question.card.answer.clone();
        let correct = match question.kind {
            QuestionKind::Typing => answers_match(input, &expected),
            QuestionKind::Choice => input == expected,
        };

        if correct {
            self.correct_tally += 1;
        } else {
            self.incorrect_tally += 1;
        }
        self.answers.insert(question.card.id.clone(), correct);
        self.revealed = true;

        Ok(TestAnswerOutcome { correct, expected })
    }

    /// Move to the next question; returns false once the test is finished.
    pub fn advance(&mut self) -> Result<bool, SessionError> {
        if self.finished {
            return Err(SessionError::Completed);
        }
        if !self.revealed {
            return Err(SessionError::UnexpectedAdvance);
        }

        self.revealed = false;
        self.position += 1;
        if self.position >= self.questions.len() {
            self.finished = true;
        }
        Ok(!self.finished)
    }

    /// Persist every question's final result in one batch write and return
    /// the summary. This is the sole persistence point of a test, so a
    /// store failure here surfaces to the caller.
    pub async fn submit(&self) -> Result<TestSummary, SessionError> {
        if !self.finished {
            return Err(SessionError::TestNotFinished);
        }

        let updates: Vec<StatusUpdate> = self
            .questions
            .iter()
            .map(|q| StatusUpdate {
                card_id: q.card.id.clone(),
                status: CardStatus {
                    is_answered: true,
                    is_correct: self.answers.get(&q.card.id).copied().unwrap_or(false),
                    attempt_count: 0,
                },
            })
            .collect();

        self.store
            .set_batch(&self.deck_id, &self.user_id, &updates)
            .await?;

        Ok(self.summary())
    }

    pub fn summary(&self) -> TestSummary {
        let total = self.questions.len();
        let score = if total == 0 {
            0
        } else {
            ((self.correct_tally as f64 / total as f64) * 100.0).round() as u32
        };
        TestSummary {
            total,
            correct: self.correct_tally,
            incorrect: self.incorrect_tally,
            score,
        }
    }

    pub fn current_question(&self) -> Option<&TestQuestion> {
        if self.finished {
            return None;
        }
        self.questions.get(self.position)
    }

    pub fn questions(&self) -> &[TestQuestion] {
        &self.questions
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn correct_tally(&self) -> u32 {
        self.correct_tally
    }

    pub fn incorrect_tally(&self) -> u32 {
        self.incorrect_tally
    }
}
