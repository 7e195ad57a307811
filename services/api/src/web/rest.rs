//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification, plus the health check.

use utoipa::OpenApi;

use crate::web::{auth, decks, generate};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        generate::generate_handler,
        decks::save_deck_handler,
        decks::list_decks_handler,
        decks::load_deck_handler,
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        auth::me_handler,
    ),
    components(
        schemas(
            generate::FlashcardDto,
            decks::SaveDeckRequest,
            decks::SaveDeckResponse,
            decks::DeckSummaryDto,
            decks::SavedFlashcardDto,
            decks::DeckResponse,
            auth::CredentialsRequest,
            auth::AuthResponse,
            auth::MeResponse,
        )
    ),
    tags(
        (name = "QuickCards API", description = "Generate flashcards from text and keep them in named decks.")
    )
)]
pub struct ApiDoc;

/// Liveness check.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "The service is up", body = String)
    )
)]
pub async fn health_handler() -> &'static str {
    "ok"
}
