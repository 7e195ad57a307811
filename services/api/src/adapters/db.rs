//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, the concrete implementation of the
//! `DeckStore` and `AccountStore` ports from the `core` crate. It handles all
//! interactions with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quickcards_core::domain::{DeckSummary, Flashcard, SavedFlashcard, User, UserCredentials};
use quickcards_core::ports::{AccountStore, DeckStore, PortError, PortResult};
use quickcards_core::validation;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the storage ports.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    /// Closes the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    user_id: Uuid,
    email: String,
    hashed_password: String,
}
impl UserRecord {
    fn to_user(self) -> User {
        User {
            user_id: self.user_id,
            email: self.email,
        }
    }

    fn to_credentials(self) -> UserCredentials {
        UserCredentials {
            user_id: self.user_id,
            email: self.email,
            hashed_password: self.hashed_password,
        }
    }
}

#[derive(FromRow)]
struct DeckRecord {
    name: String,
}
impl DeckRecord {
    fn to_domain(self) -> DeckSummary {
        DeckSummary { name: self.name }
    }
}

#[derive(FromRow)]
struct FlashcardRecord {
    id: Uuid,
    front: String,
    back: String,
}
impl FlashcardRecord {
    fn to_domain(self) -> SavedFlashcard {
        SavedFlashcard {
            id: self.id,
            front: self.front,
            back: self.back,
        }
    }
}

//=========================================================================================
// `DeckStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl DeckStore for DbAdapter {
    async fn save_deck(&self, user_id: Uuid, name: &str, cards: &[Flashcard]) -> PortResult<()> {
        let name = validation::deck_name(name)?;
        validation::deck_cards(cards)?;

        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        // The unique (user_id, name) constraint decides the winner; no prior read.
        let deck_id: Option<Uuid> = sqlx::query_scalar(
            "INSERT INTO decks (id, user_id, name) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, name) DO NOTHING RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(name)
        .fetch_optional(&mut *tx)
        .await
        .map_err(unexpected)?;

        let Some(deck_id) = deck_id else {
            // Dropping the transaction rolls it back.
            return Err(PortError::DuplicateName(name.to_string()));
        };

        for (position, card) in cards.iter().enumerate() {
            sqlx::query(
                "INSERT INTO flashcards (id, deck_id, position, front, back) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(Uuid::new_v4())
            .bind(deck_id)
            .bind(position as i32)
            .bind(&card.front)
            .bind(&card.back)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        }

        tx.commit().await.map_err(unexpected)?;
        info!("Saved deck '{}' with {} cards for user {}", name, cards.len(), user_id);
        Ok(())
    }

    async fn list_decks(&self, user_id: Uuid) -> PortResult<Vec<DeckSummary>> {
        let records = sqlx::query_as::<_, DeckRecord>(
            "SELECT name FROM decks WHERE user_id = $1 ORDER BY created_at ASC, name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn load_deck(&self, user_id: Uuid, name: &str) -> PortResult<Vec<SavedFlashcard>> {
        let name = name.trim();
        let deck_id: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM decks WHERE user_id = $1 AND name = $2")
                .bind(user_id)
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(unexpected)?;

        let deck_id =
            deck_id.ok_or_else(|| PortError::NotFound(format!("Deck '{}' not found", name)))?;

        let records = sqlx::query_as::<_, FlashcardRecord>(
            "SELECT id, front, back FROM flashcards WHERE deck_id = $1 ORDER BY position ASC",
        )
        .bind(deck_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}

//=========================================================================================
// `AccountStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl AccountStore for DbAdapter {
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (user_id, email, hashed_password) VALUES ($1, $2, $3) \
             RETURNING user_id, email, hashed_password",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PortError::EmailTaken(email.to_string())
            } else {
                unexpected(e)
            }
        })?;

        Ok(record.to_user())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT user_id, email, hashed_password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {} not found", email)),
            _ => unexpected(e),
        })?;

        Ok(record.to_credentials())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let user_id: Option<Uuid> = sqlx::query_scalar(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > now()",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        user_id.ok_or(PortError::AuthRequired)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }
}
