//! crates/quickcards_core/src/memory.rs
//!
//! In-memory implementations of the storage ports, used by tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{AuthSession, DeckSummary, Flashcard, SavedFlashcard, User, UserCredentials};
use crate::ports::{AccountStore, DeckStore, PortError, PortResult};
use crate::validation;

fn lock<T>(mutex: &Mutex<T>) -> PortResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| PortError::Unexpected("in-memory store lock poisoned".to_string()))
}

//=========================================================================================
// Decks
//=========================================================================================

#[derive(Debug, Clone)]
struct StoredDeck {
    name: String,
    cards: Vec<SavedFlashcard>,
}

/// In-memory `DeckStore`. The duplicate check and the insert happen under one lock.
#[derive(Clone, Debug, Default)]
pub struct InMemoryDeckStore {
    decks: Arc<Mutex<HashMap<Uuid, Vec<StoredDeck>>>>,
}

impl InMemoryDeckStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DeckStore for InMemoryDeckStore {
    async fn save_deck(&self, user_id: Uuid, name: &str, cards: &[Flashcard]) -> PortResult<()> {
        let name = validation::deck_name(name)?;
        validation::deck_cards(cards)?;

        let mut decks = lock(&self.decks)?;
        let user_decks = decks.entry(user_id).or_default();
        if user_decks.iter().any(|deck| deck.name == name) {
            return Err(PortError::DuplicateName(name.to_string()));
        }

        user_decks.push(StoredDeck {
            name: name.to_string(),
            cards: cards
                .iter()
                .map(|card| SavedFlashcard {
                    id: Uuid::new_v4(),
                    front: card.front.clone(),
                    back: card.back.clone(),
                })
                .collect(),
        });
        Ok(())
    }

    async fn list_decks(&self, user_id: Uuid) -> PortResult<Vec<DeckSummary>> {
        let decks = lock(&self.decks)?;
        Ok(decks
            .get(&user_id)
            .map(|user_decks| {
                user_decks
                    .iter()
                    .map(|deck| DeckSummary {
                        name: deck.name.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn load_deck(&self, user_id: Uuid, name: &str) -> PortResult<Vec<SavedFlashcard>> {
        let name = name.trim();
        let decks = lock(&self.decks)?;
        decks
            .get(&user_id)
            .and_then(|user_decks| user_decks.iter().find(|deck| deck.name == name))
            .map(|deck| deck.cards.clone())
            .ok_or_else(|| PortError::NotFound(format!("Deck '{}' not found", name)))
    }
}

//=========================================================================================
// Accounts
//=========================================================================================

#[derive(Debug, Default)]
struct Accounts {
    users_by_email: HashMap<String, UserCredentials>,
    sessions: HashMap<String, AuthSession>,
}

/// In-memory `AccountStore`.
#[derive(Clone, Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: Arc<Mutex<Accounts>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let mut accounts = lock(&self.accounts)?;
        if accounts.users_by_email.contains_key(email) {
            return Err(PortError::EmailTaken(email.to_string()));
        }
        let credentials = UserCredentials {
            user_id: Uuid::new_v4(),
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
        };
        let user = User {
            user_id: credentials.user_id,
            email: credentials.email.clone(),
        };
        accounts
            .users_by_email
            .insert(email.to_string(), credentials);
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let accounts = lock(&self.accounts)?;
        accounts
            .users_by_email
            .get(email)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        let mut accounts = lock(&self.accounts)?;
        accounts.sessions.insert(
            session_id.to_string(),
            AuthSession {
                id: session_id.to_string(),
                user_id,
                expires_at,
            },
        );
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let accounts = lock(&self.accounts)?;
        match accounts.sessions.get(session_id) {
            Some(session) if session.expires_at > Utc::now() => Ok(session.user_id),
            _ => Err(PortError::AuthRequired),
        }
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        lock(&self.accounts)?.sessions.remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn biology_cards() -> Vec<Flashcard> {
        vec![
            Flashcard::new("What is mitosis?", "Cell division producing two identical daughter cells."),
            Flashcard::new("What is meiosis?", "Cell division producing four haploid gametes."),
        ]
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips_in_order() {
        let store = InMemoryDeckStore::new();
        let user = Uuid::new_v4();
        let cards = biology_cards();

        store.save_deck(user, "Biology", &cards).await.unwrap();

        let loaded: Vec<Flashcard> = store
            .load_deck(user, "Biology")
            .await
            .unwrap()
            .into_iter()
            .map(Flashcard::from)
            .collect();
        assert_eq!(loaded, cards);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected_and_first_deck_kept() {
        let store = InMemoryDeckStore::new();
        let user = Uuid::new_v4();
        let first = biology_cards();

        store.save_deck(user, "Biology", &first).await.unwrap();
        let err = store
            .save_deck(user, "Biology", &[Flashcard::new("Other", "Deck")])
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::DuplicateName(ref name) if name == "Biology"));

        let loaded = store.load_deck(user, "Biology").await.unwrap();
        assert_eq!(loaded.len(), first.len());
        assert_eq!(loaded[0].front, first[0].front);
        assert_eq!(store.list_decks(user).await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_under_one_name_store_exactly_one_deck() {
        let store = InMemoryDeckStore::new();
        let user = Uuid::new_v4();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                let cards = vec![Flashcard::new(format!("Question {}", i), "Answer")];
                tokio::spawn(async move { store.save_deck(user, "Biology", &cards).await })
            })
            .collect();

        let mut saved = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => saved += 1,
                Err(PortError::DuplicateName(name)) => {
                    assert_eq!(name, "Biology");
                    duplicates += 1;
                }
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }
        assert_eq!(saved, 1);
        assert_eq!(duplicates, 15);

        let decks = store.list_decks(user).await.unwrap();
        assert_eq!(decks.len(), 1);
        assert_eq!(store.load_deck(user, "Biology").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_is_empty_before_any_save() {
        let store = InMemoryDeckStore::new();
        assert!(store.list_decks(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_keeps_creation_order_and_users_are_isolated() {
        let store = InMemoryDeckStore::new();
        let ada = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.save_deck(ada, "Biology", &biology_cards()).await.unwrap();
        store.save_deck(ada, "Chemistry", &biology_cards()).await.unwrap();
        // Same name under another user is fine.
        store.save_deck(bob, "Biology", &biology_cards()).await.unwrap();

        let names: Vec<String> = store
            .list_decks(ada)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["Biology", "Chemistry"]);

        assert!(matches!(
            store.load_deck(bob, "Chemistry").await,
            Err(PortError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_saved_cards_get_distinct_ids() {
        let store = InMemoryDeckStore::new();
        let user = Uuid::new_v4();
        store.save_deck(user, "Biology", &biology_cards()).await.unwrap();

        let loaded = store.load_deck(user, "Biology").await.unwrap();
        assert_ne!(loaded[0].id, loaded[1].id);
    }

    #[tokio::test]
    async fn test_invalid_deck_is_not_stored() {
        let store = InMemoryDeckStore::new();
        let user = Uuid::new_v4();

        assert!(matches!(
            store.save_deck(user, "  ", &biology_cards()).await,
            Err(PortError::InvalidInput(_))
        ));
        assert!(matches!(
            store.save_deck(user, "Empty", &[]).await,
            Err(PortError::InvalidInput(_))
        ));
        assert!(store.list_decks(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_accounts_and_sessions() {
        let store = InMemoryAccountStore::new();
        let user = store
            .create_user_with_email("ada@example.com", "hash")
            .await
            .unwrap();
        assert!(matches!(
            store.create_user_with_email("ada@example.com", "hash").await,
            Err(PortError::EmailTaken(_))
        ));

        let creds = store.get_user_by_email("ada@example.com").await.unwrap();
        assert_eq!(creds.user_id, user.user_id);

        store
            .create_auth_session("live", user.user_id, Utc::now() + Duration::days(1))
            .await
            .unwrap();
        store
            .create_auth_session("stale", user.user_id, Utc::now() - Duration::seconds(1))
            .await
            .unwrap();

        assert_eq!(store.validate_auth_session("live").await.unwrap(), user.user_id);
        assert!(matches!(
            store.validate_auth_session("stale").await,
            Err(PortError::AuthRequired)
        ));

        store.delete_auth_session("live").await.unwrap();
        assert!(matches!(
            store.validate_auth_session("live").await,
            Err(PortError::AuthRequired)
        ));
    }
}
