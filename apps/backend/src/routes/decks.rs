//! Deck and card endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use quiz_core::store::CardStatusStore;
use quiz_core::{answered_count, correct_count, mastery_rate, parse_import};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::routes::owned_deck;
use crate::AppState;

/// GET /api/decks
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<DeckListResponse>> {
    let user_key = auth.user_id.to_string();
    let mut decks = Vec::new();

    for deck in state.db.list_decks(auth.user_id).await? {
        let cards = state.db.get_cards(deck.id).await?;
        let status = state.db.get(&deck.id.to_string(), &user_key).await?;
        decks.push(DeckSummary {
            id: deck.id,
            title: deck.title,
            card_count: cards.len(),
            mastery_rate: mastery_rate(cards.len(), &status),
            created_at: deck.created_at,
        });
    }

    Ok(Json(DeckListResponse { decks }))
}

/// POST /api/decks
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(req): Json<CreateDeckRequest>,
) -> Result<Json<DeckSummary>> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest("deck title must not be empty".to_string()));
    }

    let deck = state.db.create_deck(auth.user_id, title).await?;

    tracing::info!(deck_id = %deck.id, "created deck");

    Ok(Json(DeckSummary {
        id: deck.id,
        title: deck.title,
        card_count: 0,
        mastery_rate: 0,
        created_at: deck.created_at,
    }))
}

/// GET /api/decks/{deck_id}
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<DeckDetailResponse>> {
    let deck = owned_deck(&state, auth.user_id, deck_id).await?;
    let cards = state.db.get_cards(deck.id).await?;

    Ok(Json(DeckDetailResponse {
        id: deck.id,
        title: deck.title,
        created_at: deck.created_at,
        cards: cards.iter().map(DbCard::to_core_card).collect(),
    }))
}

/// DELETE /api/decks/{deck_id}
pub async fn remove(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<Uuid>,
) -> Result<StatusCode> {
    owned_deck(&state, auth.user_id, deck_id).await?;

    state.sessions.remove_deck(deck_id);
    state.db.delete_deck(deck_id).await?;

    tracing::info!(deck_id = %deck_id, "deleted deck");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/decks/{deck_id}/cards
pub async fn add_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<Uuid>,
    Json(req): Json<CardRequest>,
) -> Result<Json<Card>> {
    owned_deck(&state, auth.user_id, deck_id).await?;

    let question = req.question.trim();
    let answer = req.answer.trim();
    if question.is_empty() || answer.is_empty() {
        return Err(ApiError::BadRequest(
            "question and answer must not be empty".to_string(),
        ));
    }

    let card = state.db.add_card(deck_id, question, answer).await?;
    Ok(Json(card.to_core_card()))
}

/// PUT /api/decks/{deck_id}/cards/{card_id}
pub async fn update_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path((deck_id, card_id)): Path<(Uuid, String)>,
    Json(req): Json<CardRequest>,
) -> Result<StatusCode> {
    owned_deck(&state, auth.user_id, deck_id).await?;

    let question = req.question.trim();
    let answer = req.answer.trim();
    if question.is_empty() || answer.is_empty() {
        return Err(ApiError::BadRequest(
            "question and answer must not be empty".to_string(),
        ));
    }

    let updated = state
        .db
        .update_card(deck_id, &card_id, question, answer)
        .await?;
    if !updated {
        return Err(ApiError::NotFound(format!("card {card_id}")));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/decks/{deck_id}/cards/{card_id}
pub async fn delete_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path((deck_id, card_id)): Path<(Uuid, String)>,
) -> Result<StatusCode> {
    owned_deck(&state, auth.user_id, deck_id).await?;

    let deleted = state.db.delete_card(deck_id, &card_id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("card {card_id}")));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/decks/{deck_id}/import
///
/// Accepts pasted JSON text, an array of `{q, a}` objects. Malformed items
/// are skipped and counted; a payload that is not a JSON array at all is
/// rejected without importing anything.
pub async fn import(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<Uuid>,
    Json(req): Json<ImportRequest>,
) -> Result<Json<ImportResponse>> {
    owned_deck(&state, auth.user_id, deck_id).await?;

    let outcome = parse_import(&req.data).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    for card in &outcome.cards {
        state
            .db
            .add_card(deck_id, &card.question, &card.answer)
            .await?;
    }

    tracing::info!(
        deck_id = %deck_id,
        imported = outcome.cards.len(),
        skipped = outcome.skipped,
        "bulk import"
    );

    Ok(Json(ImportResponse {
        imported: outcome.cards.len(),
        skipped: outcome.skipped,
    }))
}

/// GET /api/decks/{deck_id}/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<DeckStatsResponse>> {
    owned_deck(&state, auth.user_id, deck_id).await?;

    let cards = state.db.get_cards(deck_id).await?;
    let status = state
        .db
        .get(&deck_id.to_string(), &auth.user_id.to_string())
        .await?;

    Ok(Json(DeckStatsResponse {
        total_cards: cards.len(),
        answered_count: answered_count(&status),
        correct_count: correct_count(&status),
        mastery_rate: mastery_rate(cards.len(), &status),
    }))
}
