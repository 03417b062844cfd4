//! HTTP route handlers

pub mod auth;
pub mod decks;
pub mod study;
pub mod test_mode;

use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::DbDeck;
use crate::AppState;

/// Fetch a deck and verify the requesting user owns it.
pub async fn owned_deck(state: &AppState, user_id: Uuid, deck_id: Uuid) -> Result<DbDeck> {
    let deck = state
        .db
        .get_deck(deck_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("deck {deck_id}")))?;

    if deck.user_id != user_id {
        return Err(ApiError::Forbidden(
            "deck belongs to another user".to_string(),
        ));
    }

    Ok(deck)
}
