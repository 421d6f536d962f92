//! Bearer authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;

/// Resolve the bearer token to an [`Actor`](crate::domain::Actor) and put it
/// into the request extensions.
///
/// The role comes from the user row, not from the token, so a demotion takes
/// effect on the next request.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .ok_or(AppError::Unauthorized)?;

    let actor = state.services.auth().authenticate(token).await?;
    tracing::debug!(user_id = %actor.id, role = %actor.role, "Request authenticated");

    request.extensions_mut().insert(actor);

    Ok(next.run(request).await)
}
