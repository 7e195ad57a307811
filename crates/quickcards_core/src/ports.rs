//! crates/quickcards_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! The web layer only ever talks to these traits, so the completion API and the
//! database can be swapped for in-memory implementations in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{DeckSummary, Flashcard, SavedFlashcard, User, UserCredentials};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error type for all port operations.
///
/// Every variant is scoped to a single user action; none of them is fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The completion API was unreachable or rejected the request.
    #[error("Completion service failed: {0}")]
    Upstream(String),
    /// The completion API answered with something that is not a flashcard list.
    #[error("Completion response had an unexpected format: {0}")]
    Format(String),
    #[error("A deck named '{0}' already exists")]
    DuplicateName(String),
    #[error("Sign in required")]
    AuthRequired,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An account with email '{0}' already exists")]
    EmailTaken(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait FlashcardGenerationService: Send + Sync {
    /// Turns free text into a batch of flashcards (ten, by instruction).
    async fn generate_flashcards(&self, text: &str) -> PortResult<Vec<Flashcard>>;
}

#[async_trait]
pub trait DeckStore: Send + Sync {
    /// Persists a named deck for `user_id`.
    ///
    /// The deck index entry and all cards become visible together or not at all.
    /// Fails with `PortError::DuplicateName` if the user already owns a deck with that name.
    async fn save_deck(&self, user_id: Uuid, name: &str, cards: &[Flashcard]) -> PortResult<()>;

    /// Lists the user's decks in creation order. Empty when nothing was saved.
    async fn list_decks(&self, user_id: Uuid) -> PortResult<Vec<DeckSummary>>;

    /// Loads the cards of one deck in saved order.
    async fn load_deck(&self, user_id: Uuid, name: &str) -> PortResult<Vec<SavedFlashcard>>;
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create_user_with_email(&self, email: &str, hashed_password: &str)
        -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Resolves a session id to its user, rejecting unknown and expired sessions
    /// with `PortError::AuthRequired`.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;
}
