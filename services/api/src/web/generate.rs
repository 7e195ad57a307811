//! services/api/src/web/generate.rs
//!
//! The text-to-flashcard endpoint.

use axum::{
    extract::{rejection::StringRejection, State},
    http::{header, HeaderMap},
    Extension, Json,
};
use quickcards_core::{domain::Flashcard, validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::error::HttpError;
use crate::web::state::{AppState, AuthenticatedUser};

/// A front/back pair as it travels over HTTP.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq, Eq)]
pub struct FlashcardDto {
    pub front: String,
    pub back: String,
}

impl From<Flashcard> for FlashcardDto {
    fn from(card: Flashcard) -> Self {
        Self {
            front: card.front,
            back: card.back,
        }
    }
}

impl From<FlashcardDto> for Flashcard {
    fn from(dto: FlashcardDto) -> Self {
        Flashcard::new(dto.front, dto.back)
    }
}

/// The JSON envelope browser clients wrap their text in.
#[derive(Deserialize)]
struct GenerateEnvelope {
    text: String,
}

/// Returns the text to generate from: the `text` field of a JSON envelope when the
/// request is JSON and has one, otherwise the raw body.
fn source_from_body(headers: &HeaderMap, body: String) -> String {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false);

    if is_json {
        if let Ok(envelope) = serde_json::from_str::<GenerateEnvelope>(&body) {
            return envelope.text;
        }
    }
    body
}

/// Generate flashcards from free text.
///
/// The body is plain UTF-8 text. A JSON body of the form `{"text": "..."}` is
/// also accepted.
#[utoipa::path(
    post,
    path = "/generate",
    request_body(content = String, content_type = "text/plain", description = "Text to turn into flashcards."),
    responses(
        (status = 200, description = "Generated flashcards", body = [FlashcardDto]),
        (status = 400, description = "Empty or non-UTF-8 text"),
        (status = 401, description = "Sign in required"),
        (status = 502, description = "The completion service failed or returned malformed output")
    )
)]
pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    headers: HeaderMap,
    body: Result<String, StringRejection>,
) -> Result<Json<Vec<FlashcardDto>>, HttpError> {
    let source = source_from_body(&headers, body?);
    let text = validation::source_text(&source)?;

    let flashcards = state.generator.generate_flashcards(text).await?;
    info!("Generated {} flashcards for user {}", flashcards.len(), user_id);

    Ok(Json(flashcards.into_iter().map(FlashcardDto::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    #[test]
    fn json_envelope_is_unwrapped() {
        let source = source_from_body(&json_headers(), r#"{"text": "Mitosis"}"#.to_string());
        assert_eq!(source, "Mitosis");
    }

    #[test]
    fn plain_text_is_used_verbatim() {
        let body = r#"{"text": "looks like json"}"#.to_string();
        assert_eq!(source_from_body(&HeaderMap::new(), body.clone()), body);
    }

    #[test]
    fn json_without_text_field_falls_back_to_raw_body() {
        let body = r#"{"content": "Mitosis"}"#.to_string();
        assert_eq!(source_from_body(&json_headers(), body.clone()), body);
    }
}
