//! services/api/src/adapters/flashcards_llm.rs
//!
//! This module contains the adapter for the flashcard-generating LLM.
//! It implements the `FlashcardGenerationService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use quickcards_core::{
    domain::Flashcard,
    ports::{FlashcardGenerationService, PortError, PortResult},
    validation,
};
use serde::Deserialize;
use tracing::{debug, warn};

/// Number of cards the model is asked for. Not enforced on the response.
pub const TARGET_CARD_COUNT: usize = 10;

const SYSTEM_PROMPT: &str = r#"You are an AI-powered flashcard generator called QuickCards AI. Your task is to analyze the provided text and create exactly 10 high-quality flashcards. Each flashcard should be concise, informative, and focused on key concepts. Ensure that both the front and back of each flashcard contain only one clear, complete sentence.

Please return the flashcards in the following JSON format:
{
  "flashcards": [
    {
      "front": "Front of the card",
      "back": "Back of the card"
    }
  ]
}

Remember to optimize the flashcards for effective learning, making them easy to understand and recall."#;

//=========================================================================================
// Response Schema
//=========================================================================================

#[derive(Deserialize)]
struct CompletionPayload {
    flashcards: Vec<CompletionCard>,
}

#[derive(Deserialize)]
struct CompletionCard {
    front: String,
    back: String,
}

/// Validates the raw completion content and converts it into domain flashcards.
///
/// Anything other than `{"flashcards": [{"front": .., "back": ..}, ..]}` with
/// non-empty sides is a `PortError::Format`. Extra fields are ignored.
pub fn parse_flashcard_response(raw: &str) -> PortResult<Vec<Flashcard>> {
    let payload: CompletionPayload =
        serde_json::from_str(raw).map_err(|e| PortError::Format(e.to_string()))?;

    if payload.flashcards.is_empty() {
        return Err(PortError::Format("response contained no flashcards".to_string()));
    }

    payload
        .flashcards
        .into_iter()
        .enumerate()
        .map(|(index, card)| {
            let front = card.front.trim();
            let back = card.back.trim();
            if front.is_empty() || back.is_empty() {
                return Err(PortError::Format(format!(
                    "flashcard {} has an empty side",
                    index + 1
                )));
            }
            Ok(Flashcard::new(front, back))
        })
        .collect()
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `FlashcardGenerationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiFlashcardAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiFlashcardAdapter {
    /// Creates a new `OpenAiFlashcardAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `FlashcardGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl FlashcardGenerationService for OpenAiFlashcardAdapter {
    /// Sends the fixed instruction and the user's text as the only two turns and
    /// validates the JSON that comes back.
    async fn generate_flashcards(&self, text: &str) -> PortResult<Vec<Flashcard>> {
        let text = validation::source_text(text)?;

        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_PROMPT)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(text)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(ResponseFormat::JsonObject)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Upstream(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| {
                PortError::Upstream("Flashcard LLM returned no choices in its response.".to_string())
            })?
            .message
            .content
            .ok_or_else(|| {
                PortError::Upstream("Flashcard LLM response contained no text content.".to_string())
            })?;

        debug!("Flashcard LLM raw response: {}", content);

        let flashcards = parse_flashcard_response(&content)?;
        if flashcards.len() != TARGET_CARD_COUNT {
            warn!(
                "Flashcard LLM returned {} cards instead of {}",
                flashcards.len(),
                TARGET_CARD_COUNT
            );
        }
        Ok(flashcards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_response() {
        let raw = r#"{
            "flashcards": [
                {"front": "What is mitosis?", "back": "Mitosis is cell division producing two identical daughter cells."},
                {"front": " What does mitosis produce? ", "back": "Two identical daughter cells."}
            ]
        }"#;

        let cards = parse_flashcard_response(raw).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].front, "What is mitosis?");
        assert_eq!(
            cards[0].back,
            "Mitosis is cell division producing two identical daughter cells."
        );
        assert_eq!(cards[1].front, "What does mitosis produce?");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let raw = r#"{"topic": "biology", "flashcards": [{"front": "Q", "back": "A", "difficulty": 2}]}"#;
        assert_eq!(parse_flashcard_response(raw).unwrap(), vec![Flashcard::new("Q", "A")]);
    }

    #[test]
    fn invalid_json_is_a_format_error() {
        for raw in ["", "not json", "{\"flashcards\": [", "```json\n{}\n```"] {
            assert!(
                matches!(parse_flashcard_response(raw), Err(PortError::Format(_))),
                "expected format error for {:?}",
                raw
            );
        }
    }

    #[test]
    fn wrong_shapes_are_format_errors() {
        let cases = [
            r#"{}"#,
            r#"[{"front": "Q", "back": "A"}]"#,
            r#"{"flashcards": {"front": "Q", "back": "A"}}"#,
            r#"{"flashcards": [{"front": "Q"}]}"#,
            r#"{"flashcards": [{"front": 1, "back": "A"}]}"#,
            r#"{"flashcards": [{"front": "Q", "back": null}]}"#,
            r#"{"flashcards": []}"#,
            r#"{"flashcards": [{"front": "Q", "back": "   "}]}"#,
        ];
        for raw in cases {
            assert!(
                matches!(parse_flashcard_response(raw), Err(PortError::Format(_))),
                "expected format error for {}",
                raw
            );
        }
    }

    #[test]
    fn every_parsed_card_has_both_sides() {
        let raw = r#"{"flashcards": [
            {"front": "A", "back": "1"}, {"front": "B", "back": "2"}, {"front": "C", "back": "3"}
        ]}"#;
        let cards = parse_flashcard_response(raw).unwrap();
        assert!(cards
            .iter()
            .all(|card| !card.front.is_empty() && !card.back.is_empty()));
    }

    #[test]
    fn prompt_asks_for_the_target_count_as_json() {
        assert!(SYSTEM_PROMPT.contains("exactly 10"));
        assert!(SYSTEM_PROMPT.contains("\"flashcards\""));
    }
}
