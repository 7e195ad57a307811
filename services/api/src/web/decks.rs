//! services/api/src/web/decks.rs
//!
//! Endpoints for saving, listing, and opening a user's decks.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use quickcards_core::domain::{Flashcard, SavedFlashcard};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::HttpError;
use crate::web::generate::FlashcardDto;
use crate::web::state::{AppState, AuthenticatedUser};

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SaveDeckRequest {
    pub name: String,
    pub flashcards: Vec<FlashcardDto>,
}

#[derive(Serialize, ToSchema)]
pub struct SaveDeckResponse {
    pub name: String,
    pub card_count: usize,
}

#[derive(Serialize, ToSchema)]
pub struct DeckSummaryDto {
    pub name: String,
}

#[derive(Serialize, ToSchema)]
pub struct SavedFlashcardDto {
    pub id: Uuid,
    pub front: String,
    pub back: String,
}

impl From<SavedFlashcard> for SavedFlashcardDto {
    fn from(card: SavedFlashcard) -> Self {
        Self {
            id: card.id,
            front: card.front,
            back: card.back,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct DeckResponse {
    pub name: String,
    pub flashcards: Vec<SavedFlashcardDto>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// Save a generated set of flashcards under a new deck name.
#[utoipa::path(
    post,
    path = "/decks",
    request_body = SaveDeckRequest,
    responses(
        (status = 201, description = "Deck saved", body = SaveDeckResponse),
        (status = 400, description = "Malformed body, empty name or empty card"),
        (status = 401, description = "Sign in required"),
        (status = 409, description = "A deck with this name already exists")
    )
)]
pub async fn save_deck_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    payload: Result<Json<SaveDeckRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(req) = payload?;
    let name = req.name.trim().to_string();
    let cards: Vec<Flashcard> = req.flashcards.into_iter().map(Flashcard::from).collect();

    state.decks.save_deck(user_id, &name, &cards).await?;

    Ok((
        StatusCode::CREATED,
        Json(SaveDeckResponse {
            name,
            card_count: cards.len(),
        }),
    ))
}

/// List the names of the signed-in user's decks.
#[utoipa::path(
    get,
    path = "/decks",
    responses(
        (status = 200, description = "Deck names in creation order", body = [DeckSummaryDto]),
        (status = 401, description = "Sign in required")
    )
)]
pub async fn list_decks_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<DeckSummaryDto>>, HttpError> {
    let decks = state.decks.list_decks(user_id).await?;
    Ok(Json(
        decks
            .into_iter()
            .map(|deck| DeckSummaryDto { name: deck.name })
            .collect(),
    ))
}

/// Open one deck.
#[utoipa::path(
    get,
    path = "/decks/{name}",
    params(
        ("name" = String, Path, description = "The deck name.")
    ),
    responses(
        (status = 200, description = "The deck's cards in saved order", body = DeckResponse),
        (status = 401, description = "Sign in required"),
        (status = 404, description = "No deck with this name")
    )
)]
pub async fn load_deck_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Path(name): Path<String>,
) -> Result<Json<DeckResponse>, HttpError> {
    let cards = state.decks.load_deck(user_id, &name).await?;
    Ok(Json(DeckResponse {
        name: name.trim().to_string(),
        flashcards: cards.into_iter().map(SavedFlashcardDto::from).collect(),
    }))
}
