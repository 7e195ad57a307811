//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use quickcards_core::ports::PortError;
use std::sync::Arc;

use crate::error::HttpError;
use crate::web::auth::session_cookie;
use crate::web::state::{AppState, AuthenticatedUser};

/// Middleware that validates the auth session cookie and extracts the user id.
///
/// If valid, inserts an `AuthenticatedUser` into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let auth_session_id = session_cookie(req.headers()).ok_or(PortError::AuthRequired)?;

    let user_id = state.accounts.validate_auth_session(auth_session_id).await?;

    req.extensions_mut().insert(AuthenticatedUser(user_id));
    Ok(next.run(req).await)
}
