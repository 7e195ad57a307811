pub mod domain;
pub mod memory;
pub mod ports;
pub mod validation;

pub use domain::{AuthSession, DeckSummary, Flashcard, SavedFlashcard, User, UserCredentials};
pub use memory::{InMemoryAccountStore, InMemoryDeckStore};
pub use ports::{
    AccountStore, DeckStore, FlashcardGenerationService, PortError, PortResult,
};
