//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use quickcards_core::ports::{AccountStore, DeckStore, FlashcardGenerationService};
use std::sync::Arc;
use uuid::Uuid;

/// The shared application state, created once at startup and passed to all handlers.
///
/// Store clients live here rather than in globals; they are built in `main` and
/// dropped with the router.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub decks: Arc<dyn DeckStore>,
    pub accounts: Arc<dyn AccountStore>,
    pub generator: Arc<dyn FlashcardGenerationService>,
}

/// The signed-in user, placed in request extensions by `require_auth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Uuid);
