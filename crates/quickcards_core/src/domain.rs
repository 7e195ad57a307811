//! crates/quickcards_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A single front/back pair generated from user text.
///
/// Cards inside a generation batch have no identity beyond their position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

impl Flashcard {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

/// A flashcard after it has been persisted as part of a deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFlashcard {
    pub id: Uuid,
    pub front: String,
    pub back: String,
}

impl From<SavedFlashcard> for Flashcard {
    fn from(saved: SavedFlashcard) -> Self {
        Flashcard {
            front: saved.front,
            back: saved.back,
        }
    }
}

/// One entry of a user's deck index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckSummary {
    pub name: String,
}

// Represents a signed-up user - used throughout app
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}
