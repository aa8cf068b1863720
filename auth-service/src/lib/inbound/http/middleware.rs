use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::inbound::http::router::AppState;

const ADMIN_ROLE: &str = "admin";

/// Middleware that validates the bearer token and stores the caller's
/// [`auth::AuthContext`] in request extensions
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let context = state
        .gate
        .authenticate(authorization_header(&req))
        .map_err(|e| {
            tracing::debug!(code = e.code(), "Authentication rejected");
            ApiError::from(e)
        })?;

    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}

/// Like [`require_auth`], but the caller must also hold the `admin` role.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let context = state
        .gate
        .require_role(authorization_header(&req), ADMIN_ROLE)
        .map_err(|e| {
            tracing::warn!(
                code = e.code(),
                uri = %req.uri(),
                "Admin authorization rejected"
            );
            ApiError::from(e)
        })?;

    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}

/// Never rejects. Stores `Option<AuthContext>`: `None` for anonymous callers
/// and for callers with a bad token.
pub async fn optional_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let context = state.gate.authenticate_optional(authorization_header(&req));
    req.extensions_mut().insert(context);

    next.run(req).await
}

// A header that is not valid UTF-8 is passed on as empty so the gate
// reports a malformed header rather than a missing one.
fn authorization_header(req: &Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default())
}
