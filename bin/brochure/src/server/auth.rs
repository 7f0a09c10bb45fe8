//! Login, logout and the admin session extractor.

use axum::{
    Json,
    extract::{FromRequestParts, State, rejection::JsonRejection},
    http::{
        header::{COOKIE, SET_COOKIE},
        request::Parts,
    },
    response::{IntoResponse, Response},
};
use brochure_auth::{SessionPayload, clear_session_cookie, session_cookie};
use serde::Deserialize;
use serde_json::json;

use super::{error::ApiError, state::AppState};

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

/// An authorized admin session, extracted from the `session` cookie.
///
/// Handlers taking this extractor reject unauthorized requests with a bare
/// 401 before running.
#[derive(Debug, Clone)]
pub struct AdminSession(pub SessionPayload);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let header = parts
            .headers
            .get(COOKIE)
            .and_then(|value| value.to_str().ok());

        let payload = state.gate.authorize(header)?;
        Ok(Self(payload))
    }
}

/// `POST /api/auth`
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;

    // Argon2 verification blocks; run it off the async workers.
    let admin = state.admin.clone();
    let username = request.username.clone();
    let verified =
        tokio::task::spawn_blocking(move || admin.verify(&username, &request.password)).await??;

    if !verified {
        tracing::debug!(username = %request.username, "login rejected");
        return Err(ApiError::Unauthorized);
    }

    let token = state.gate.codec().issue(&request.username)?;
    tracing::info!(username = %request.username, "admin logged in");

    Ok((
        [(SET_COOKIE, session_cookie(token.as_str(), state.session_ttl_secs))],
        Json(json!({ "message": "Authenticated successfully!" })),
    )
        .into_response())
}

/// `GET|POST /api/logout`
pub async fn logout() -> Response {
    (
        [(SET_COOKIE, clear_session_cookie())],
        Json(json!({ "message": "Logged out successfully" })),
    )
        .into_response()
}
