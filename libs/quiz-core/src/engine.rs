//! Round-based mastery progression for the typing and choice study modes.
//!
//! A session walks a working set of cards in rounds. Round 1 covers the full
//! deck (resuming after any cards already answered); every later round covers
//! exactly the cards still marked incorrect in the store at the moment the
//! previous round finished. The deck is completed when no incorrect card
//! remains.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::HashMap;

use crate::choices::generate_choices;
use crate::error::SessionError;
use crate::matching::answers_match;
use crate::shuffle::shuffled;
use crate::store::CardStatusStore;
use crate::types::{Card, CardStatus, Deck, StudyDirection, StudyMode, StudyOptions, UserStatusMap};

/// Where the session stands on the current card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardPhase {
    /// Waiting for an answer to the current prompt.
    Prompt,
    /// Typing-mode miss; the correct answer must be re-entered to move on.
    Retype,
    /// Result shown; the session may advance.
    Revealed,
}

/// What the engine decided about one submitted answer.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    /// The full expected answer, for display.
    pub expected: String,
    /// Typing-mode misses must be retyped before advancing.
    pub requires_retype: bool,
}

/// Result of moving past the current card.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AdvanceOutcome {
    /// More cards remain in the current round.
    NextCard,
    /// The pass finished with incorrect cards left; a new round started.
    NewRound { round: u32 },
    /// Every card in the deck is now marked correct.
    Completed,
}

/// One user's study session over one deck.
///
/// All mutating operations run to completion before the next is accepted;
/// at most one store call is in flight at a time.
pub struct StudySession<S> {
    store: S,
    deck_id: String,
    user_id: String,
    /// Full deck in original order; round recomputation always runs over this.
    cards: Vec<Card>,
    /// Local mirror of the persisted status map. Only updated after a
    /// successful store write, so a failed write leaves it stale rather
    /// than inconsistent.
    status: UserStatusMap,
    options: StudyOptions,
    working_set: Vec<Card>,
    position: usize,
    round: u32,
    correct_tally: u32,
    incorrect_tally: u32,
    /// Per-card results for the current round only.
    session_results: HashMap<String, bool>,
    phase: CardPhase,
    completed: bool,
    /// Options for the current card in choice mode, empty otherwise.
    choices: Vec<String>,
    rng: StdRng,
}

impl<S: CardStatusStore> StudySession<S> {
    /// Start a session with OS-seeded randomness.
    pub async fn start(
        store: S,
        deck: &Deck,
        user_id: &str,
        options: StudyOptions,
    ) -> Result<Self, SessionError> {
        Self::start_with_rng(store, deck, user_id, options, StdRng::from_os_rng()).await
    }

    /// Start a session with a caller-provided RNG, for reproducible runs.
    ///
    /// Validates ownership and deck size, loads the persisted status map
    /// (a failed read aborts the start), and derives the initial working
    /// set: resuming round 1 while unanswered cards remain, otherwise a
    /// round-2 pass over the incorrect cards, or immediate completion when
    /// everything is already correct.
    pub async fn start_with_rng(
        store: S,
        deck: &Deck,
        user_id: &str,
        options: StudyOptions,
        rng: StdRng,
    ) -> Result<Self, SessionError> {
        if deck.user_id != user_id {
            return Err(SessionError::NotOwner);
        }
        if deck.cards.is_empty() {
            return Err(SessionError::EmptyDeck);
        }
        if options.mode == StudyMode::Choice && deck.cards.len() < 2 {
            return Err(SessionError::NotEnoughCards {
                required: 2,
                actual: deck.cards.len(),
            });
        }

        let status = store.get(&deck.id, user_id).await?;

        let mut session = Self {
            store,
            deck_id: deck.id.clone(),
            user_id: user_id.to_string(),
            cards: deck.cards.clone(),
            status,
            options,
            working_set: Vec::new(),
            position: 0,
            round: 1,
            correct_tally: 0,
            incorrect_tally: 0,
            session_results: HashMap::new(),
            phase: CardPhase::Prompt,
            completed: false,
            choices: Vec::new(),
            rng,
        };

        if session.cards.iter().all(|c| session.status_for(&c.id).is_correct) {
            session.completed = true;
            return Ok(session);
        }

        let any_unanswered = session
            .cards
            .iter()
            .any(|c| !session.status_for(&c.id).is_answered);

        if any_unanswered {
            // First pass, possibly resumed: full deck in original order,
            // positioned past the cards already answered.
            session.working_set = session.cards.clone();
            session.position = session
                .cards
                .iter()
                .filter(|c| session.status_for(&c.id).is_answered)
                .count();
            session.round = 1;
        } else {
            let incorrect = session.incorrect_cards();
            session.working_set = if options.shuffle {
                shuffled(&incorrect, &mut session.rng)
            } else {
                incorrect
            };
            session.position = 0;
            session.round = 2;
        }

        session.refresh_choices();
        Ok(session)
    }

    /// Submit an answer for the current card.
    ///
    /// The status is written through the store before the outcome is
    /// reported; a write failure is logged and the session continues with
    /// the persisted state stale. Every incorrect call increments the
    /// card's attempt count; correct answers never change it.
    pub async fn answer(&mut self, input: &str) -> Result<AnswerOutcome, SessionError> {
        if self.completed {
            return Err(SessionError::Completed);
        }
        if self.phase != CardPhase::Prompt {
            return Err(SessionError::UnexpectedAnswer);
        }

        let card = self.working_set[self.position].clone();
        let expected = self.expected_text(&card).to_string();
        let correct = match self.options.mode {
            StudyMode::Typing => answers_match(input, &expected),
            StudyMode::Choice => input == expected,
        };

        if correct {
            self.correct_tally += 1;
        } else {
            self.incorrect_tally += 1;
        }
        self.session_results.insert(card.id.clone(), correct);

        let previous = self.status_for(&card.id);
        let updated = CardStatus {
            is_answered: true,
            is_correct: correct,
            attempt_count: previous.attempt_count + u32::from(!correct),
        };

        match self
            .store
            .set(&self.deck_id, &self.user_id, &card.id, updated)
            .await
        {
            Ok(()) => {
                self.status.insert(card.id.clone(), updated);
            }
            Err(err) => {
                // Keep the study flow available; the persisted mastery
                // state stays stale until a later write succeeds.
                tracing::warn!(
                    deck_id = %self.deck_id,
                    card_id = %card.id,
                    error = %err,
                    "card status write failed, continuing session"
                );
            }
        }

        let requires_retype = !correct && self.options.mode == StudyMode::Typing;
        self.phase = if requires_retype {
            CardPhase::Retype
        } else {
            CardPhase::Revealed
        };

        Ok(AnswerOutcome {
            correct,
            expected,
            requires_retype,
        })
    }

    /// Re-enter the correct answer after a typing miss.
    ///
    /// Returns whether the retype was accepted. Acceptance unlocks
    /// [`advance`](Self::advance) but is never scored and never touches
    /// the store.
    pub fn retype(&mut self, input: &str) -> Result<bool, SessionError> {
        if self.phase != CardPhase::Retype {
            return Err(SessionError::UnexpectedRetype);
        }
        let card = &self.working_set[self.position];
        let accepted = answers_match(input, self.expected_text(card));
        if accepted {
            self.phase = CardPhase::Revealed;
        }
        Ok(accepted)
    }

    /// Move past the current card.
    ///
    /// When the working set is exhausted, ground truth is re-fetched from
    /// the store and the incorrect set is re-derived over the full deck —
    /// never from this round's local results. A failed re-fetch surfaces
    /// the error and leaves the session positioned to retry.
    pub async fn advance(&mut self) -> Result<AdvanceOutcome, SessionError> {
        if self.completed {
            return Err(SessionError::Completed);
        }
        if self.phase != CardPhase::Revealed {
            return Err(SessionError::UnexpectedAdvance);
        }

        if self.position + 1 < self.working_set.len() {
            self.position += 1;
            self.phase = CardPhase::Prompt;
            self.refresh_choices();
            return Ok(AdvanceOutcome::NextCard);
        }

        self.status = self.store.get(&self.deck_id, &self.user_id).await?;
        let incorrect = self.incorrect_cards();

        if incorrect.is_empty() {
            self.completed = true;
            return Ok(AdvanceOutcome::Completed);
        }

        self.round += 1;
        self.working_set = if self.options.shuffle {
            shuffled(&incorrect, &mut self.rng)
        } else {
            incorrect
        };
        self.position = 0;
        self.correct_tally = 0;
        self.incorrect_tally = 0;
        self.session_results.clear();
        self.phase = CardPhase::Prompt;
        self.refresh_choices();

        Ok(AdvanceOutcome::NewRound { round: self.round })
    }

    /// Clear all persisted progress and restart at round 1 over the full
    /// deck, exactly as if the deck had never been studied.
    pub async fn reset(&mut self) -> Result<(), SessionError> {
        self.store.reset(&self.deck_id, &self.user_id).await?;
        self.status.clear();
        self.working_set = self.cards.clone();
        self.position = 0;
        self.round = 1;
        self.correct_tally = 0;
        self.incorrect_tally = 0;
        self.session_results.clear();
        self.phase = CardPhase::Prompt;
        self.completed = false;
        self.refresh_choices();
        Ok(())
    }

    pub fn current_card(&self) -> Option<&Card> {
        if self.completed {
            return None;
        }
        self.working_set.get(self.position)
    }

    /// The text shown to the user for the current card.
    pub fn prompt(&self) -> Option<&str> {
        self.current_card().map(|card| match self.options.direction {
            StudyDirection::Normal => card.question.as_str(),
            StudyDirection::Reverse => card.answer.as_str(),
        })
    }

    /// Options for the current card in choice mode; empty in typing mode.
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn phase(&self) -> CardPhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Zero-based index into the current working set.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn working_set_len(&self) -> usize {
        self.working_set.len()
    }

    pub fn correct_tally(&self) -> u32 {
        self.correct_tally
    }

    pub fn incorrect_tally(&self) -> u32 {
        self.incorrect_tally
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Local mirror of the persisted status map.
    pub fn status_map(&self) -> &UserStatusMap {
        &self.status
    }

    pub fn options(&self) -> StudyOptions {
        self.options
    }

    pub fn deck_size(&self) -> usize {
        self.cards.len()
    }

    fn status_for(&self, card_id: &str) -> CardStatus {
        self.status.get(card_id).copied().unwrap_or_default()
    }

    fn incorrect_cards(&self) -> Vec<Card> {
        self.cards
            .iter()
            .filter(|c| !self.status_for(&c.id).is_correct)
            .cloned()
            .collect()
    }

    fn expected_text<'a>(&self, card: &'a Card) -> &'a str {
        match self.options.direction {
            StudyDirection::Normal => &card.answer,
            StudyDirection::Reverse => &card.question,
        }
    }

    fn refresh_choices(&mut self) {
        if self.options.mode != StudyMode::Choice {
            return;
        }
        let Some(card) = self.working_set.get(self.position).cloned() else {
            self.choices.clear();
            return;
        };
        let correct = self.expected_text(&card).to_string();
        let use_question_side = self.options.direction == StudyDirection::Reverse;
        self.choices = generate_choices(
            &correct,
            &self.cards,
            &card.id,
            use_question_side,
            &mut self.rng,
        );
    }
}
