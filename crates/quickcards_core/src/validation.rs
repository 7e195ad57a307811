//! crates/quickcards_core/src/validation.rs
//!
//! Input checks shared by every `DeckStore` implementation and the web handlers.

use crate::domain::Flashcard;
use crate::ports::{PortError, PortResult};

pub const MAX_DECK_NAME_CHARS: usize = 100;
pub const MIN_PASSWORD_CHARS: usize = 8;

/// Trims user-submitted source text and rejects it when nothing is left.
pub fn source_text(text: &str) -> PortResult<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PortError::InvalidInput(
            "Please enter some text to generate flashcards".to_string(),
        ));
    }
    Ok(trimmed)
}

/// Normalizes a deck name. Names are path segments under `/decks`, so `/` is refused.
pub fn deck_name(name: &str) -> PortResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(PortError::InvalidInput(
            "Please enter a name for your flashcard set".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_DECK_NAME_CHARS {
        return Err(PortError::InvalidInput(format!(
            "Deck name must be at most {} characters",
            MAX_DECK_NAME_CHARS
        )));
    }
    if trimmed.contains('/') {
        return Err(PortError::InvalidInput(
            "Deck name must not contain '/'".to_string(),
        ));
    }
    Ok(trimmed)
}

pub fn deck_cards(cards: &[Flashcard]) -> PortResult<()> {
    if cards.is_empty() {
        return Err(PortError::InvalidInput(
            "A deck needs at least one flashcard".to_string(),
        ));
    }
    for (index, card) in cards.iter().enumerate() {
        if card.front.trim().is_empty() || card.back.trim().is_empty() {
            return Err(PortError::InvalidInput(format!(
                "Flashcard {} has an empty side",
                index + 1
            )));
        }
    }
    Ok(())
}

pub fn credentials(email: &str, password: &str) -> PortResult<()> {
    if !email.contains('@') {
        return Err(PortError::InvalidInput("Email address is not valid".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(PortError::InvalidInput(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_CHARS
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_text_is_trimmed() {
        assert_eq!(source_text("  mitosis  ").unwrap(), "mitosis");
        assert!(matches!(source_text(" \n\t"), Err(PortError::InvalidInput(_))));
    }

    #[test]
    fn deck_name_rules() {
        assert_eq!(deck_name(" Biology ").unwrap(), "Biology");
        assert!(matches!(deck_name(""), Err(PortError::InvalidInput(_))));
        assert!(matches!(deck_name("a/b"), Err(PortError::InvalidInput(_))));

        let longest = "x".repeat(MAX_DECK_NAME_CHARS);
        assert!(deck_name(&longest).is_ok());
        let too_long = "x".repeat(MAX_DECK_NAME_CHARS + 1);
        assert!(matches!(deck_name(&too_long), Err(PortError::InvalidInput(_))));
    }

    #[test]
    fn deck_cards_rejects_empty_sides() {
        assert!(deck_cards(&[Flashcard::new("Q", "A")]).is_ok());
        assert!(deck_cards(&[]).is_err());

        let err = deck_cards(&[Flashcard::new("Q", "A"), Flashcard::new("Q2", "  ")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Flashcard 2 has an empty side");
    }

    #[test]
    fn credentials_rules() {
        assert!(credentials("ada@example.com", "correct horse").is_ok());
        assert!(credentials("not-an-email", "correct horse").is_err());
        assert!(credentials("ada@example.com", "short").is_err());
    }
}
