//! PostgreSQL database operations

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use quiz_core::store::{CardStatusStore, StatusUpdate};
use quiz_core::{CardStatus, Deck, StoreError, UserStatusMap};

use crate::error::{ApiError, Result};
use crate::models::*;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === User Repository ===

    /// Create a new user with a generated token
    pub async fn create_user(&self, name: Option<&str>) -> Result<DbUser> {
        let token = Uuid::new_v4().to_string();
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            INSERT INTO users (token, name)
            VALUES ($1, $2)
            RETURNING id, token, name, created_at, last_seen_at
            "#,
        )
        .bind(&token)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by token
    pub async fn get_user_by_token(&self, token: &str) -> Result<Option<DbUser>> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            SELECT id, token, name, created_at, last_seen_at
            FROM users
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update user last_seen_at timestamp
    pub async fn update_last_seen(&self, user_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_seen_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Deck Repository ===

    /// Create a new deck
    pub async fn create_deck(&self, user_id: Uuid, title: &str) -> Result<DbDeck> {
        let deck = sqlx::query_as::<_, DbDeck>(
            r#"
            INSERT INTO decks (user_id, title)
            VALUES ($1, $2)
            RETURNING id, user_id, title, created_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .fetch_one(&self.pool)
        .await?;

        Ok(deck)
    }

    /// Get deck by ID
    pub async fn get_deck(&self, deck_id: Uuid) -> Result<Option<DbDeck>> {
        let deck = sqlx::query_as::<_, DbDeck>(
            r#"
            SELECT id, user_id, title, created_at
            FROM decks
            WHERE id = $1
            "#,
        )
        .bind(deck_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(deck)
    }

    /// Get all decks for a user, newest first
    pub async fn list_decks(&self, user_id: Uuid) -> Result<Vec<DbDeck>> {
        let decks = sqlx::query_as::<_, DbDeck>(
            r#"
            SELECT id, user_id, title, created_at
            FROM decks
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(decks)
    }

    /// Delete a deck; cards and statuses cascade
    pub async fn delete_deck(&self, deck_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM decks WHERE id = $1")
            .bind(deck_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // === Card Repository ===

    /// Get a deck's cards in insertion order
    pub async fn get_cards(&self, deck_id: Uuid) -> Result<Vec<DbCard>> {
        let cards = sqlx::query_as::<_, DbCard>(
            r#"
            SELECT id, deck_id, question, answer, position, created_at
            FROM cards
            WHERE deck_id = $1
            ORDER BY position
            "#,
        )
        .bind(deck_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    /// Append a card to a deck
    pub async fn add_card(&self, deck_id: Uuid, question: &str, answer: &str) -> Result<DbCard> {
        let id = Uuid::new_v4().to_string();
        let card = sqlx::query_as::<_, DbCard>(
            r#"
            INSERT INTO cards (id, deck_id, question, answer, position)
            VALUES ($1, $2, $3, $4,
                    (SELECT COALESCE(MAX(position) + 1, 0) FROM cards WHERE deck_id = $2))
            RETURNING id, deck_id, question, answer, position, created_at
            "#,
        )
        .bind(&id)
        .bind(deck_id)
        .bind(question)
        .bind(answer)
        .fetch_one(&self.pool)
        .await?;

        Ok(card)
    }

    /// Update a card's text fields
    pub async fn update_card(
        &self,
        deck_id: Uuid,
        card_id: &str,
        question: &str,
        answer: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE cards
            SET question = $3, answer = $4
            WHERE deck_id = $1 AND id = $2
            "#,
        )
        .bind(deck_id)
        .bind(card_id)
        .bind(question)
        .bind(answer)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a card from a deck
    pub async fn delete_card(&self, deck_id: Uuid, card_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cards WHERE deck_id = $1 AND id = $2")
            .bind(deck_id)
            .bind(card_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Assemble the core deck type from a deck row and its cards
    pub async fn load_deck(&self, deck: &DbDeck) -> Result<Deck> {
        let cards = self.get_cards(deck.id).await?;
        Ok(Deck {
            id: deck.id.to_string(),
            user_id: deck.user_id.to_string(),
            title: deck.title.clone(),
            cards: cards.iter().map(DbCard::to_core_card).collect(),
            created_at: deck.created_at,
        })
    }
}

fn parse_scope_id(value: &str) -> std::result::Result<Uuid, StoreError> {
    Uuid::parse_str(value).map_err(|e| StoreError::Transport(format!("invalid id {value}: {e}")))
}

fn transport(e: sqlx::Error) -> StoreError {
    StoreError::Transport(e.to_string())
}

/// Card-status store backed by the `card_statuses` table.
///
/// One row per (deck, user, card) means `set` touches exactly one card's
/// record, which is the field-level non-clobbering contract the engine
/// relies on. Batches run inside a transaction.
#[async_trait]
impl CardStatusStore for Database {
    async fn get(
        &self,
        deck_id: &str,
        user_id: &str,
    ) -> std::result::Result<UserStatusMap, StoreError> {
        let deck_id = parse_scope_id(deck_id)?;
        let user_id = parse_scope_id(user_id)?;

        let rows = sqlx::query_as::<_, DbCardStatus>(
            r#"
            SELECT deck_id, user_id, card_id, is_answered, is_correct, attempt_count, updated_at
            FROM card_statuses
            WHERE deck_id = $1 AND user_id = $2
            "#,
        )
        .bind(deck_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(transport)?;

        Ok(rows
            .into_iter()
            .map(|row| (row.card_id.clone(), row.to_core_status()))
            .collect())
    }

    async fn set(
        &self,
        deck_id: &str,
        user_id: &str,
        card_id: &str,
        status: CardStatus,
    ) -> std::result::Result<(), StoreError> {
        let deck_id = parse_scope_id(deck_id)?;
        let user_id = parse_scope_id(user_id)?;

        sqlx::query(
            r#"
            INSERT INTO card_statuses (deck_id, user_id, card_id, is_answered, is_correct, attempt_count)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (deck_id, user_id, card_id) DO UPDATE SET
                is_answered = EXCLUDED.is_answered,
                is_correct = EXCLUDED.is_correct,
                attempt_count = EXCLUDED.attempt_count,
                updated_at = NOW()
            "#,
        )
        .bind(deck_id)
        .bind(user_id)
        .bind(card_id)
        .bind(status.is_answered)
        .bind(status.is_correct)
        .bind(status.attempt_count as i32)
        .execute(&self.pool)
        .await
        .map_err(transport)?;

        Ok(())
    }

    async fn set_batch(
        &self,
        deck_id: &str,
        user_id: &str,
        updates: &[StatusUpdate],
    ) -> std::result::Result<(), StoreError> {
        let deck_id = parse_scope_id(deck_id)?;
        let user_id = parse_scope_id(user_id)?;

        let mut tx = self.pool.begin().await.map_err(transport)?;
        for update in updates {
            sqlx::query(
                r#"
                INSERT INTO card_statuses (deck_id, user_id, card_id, is_answered, is_correct, attempt_count)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (deck_id, user_id, card_id) DO UPDATE SET
                    is_answered = EXCLUDED.is_answered,
                    is_correct = EXCLUDED.is_correct,
                    attempt_count = EXCLUDED.attempt_count,
                    updated_at = NOW()
                "#,
            )
            .bind(deck_id)
            .bind(user_id)
            .bind(&update.card_id)
            .bind(update.status.is_answered)
            .bind(update.status.is_correct)
            .bind(update.status.attempt_count as i32)
            .execute(&mut *tx)
            .await
            .map_err(transport)?;
        }
        tx.commit().await.map_err(transport)?;

        Ok(())
    }

    async fn reset(&self, deck_id: &str, user_id: &str) -> std::result::Result<(), StoreError> {
        let deck_id = parse_scope_id(deck_id)?;
        let user_id = parse_scope_id(user_id)?;

        sqlx::query("DELETE FROM card_statuses WHERE deck_id = $1 AND user_id = $2")
            .bind(deck_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(transport)?;

        Ok(())
    }
}
