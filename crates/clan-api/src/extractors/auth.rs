//! Authentication extractor
//!
//! Extracts and validates JWT tokens from the Authorization header.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use clan_core::Actor;

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated actor extracted from the JWT token
#[derive(Debug, Clone)]
pub struct AuthActor(pub Actor);

fn authenticate(state: &AppState, token: &str) -> Result<Actor, ApiError> {
    state.jwt_service().authenticate(token).map_err(|e| {
        tracing::warn!(error = %e, "Rejected bearer token");
        ApiError::App(e)
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthActor
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);
        authenticate(&app_state, bearer.token()).map(AuthActor)
    }
}

/// Optional authenticated actor
///
/// `None` if no authorization header is present; an invalid token is
/// still an error.
#[derive(Debug, Clone)]
pub struct OptionalAuthActor(pub Option<Actor>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthActor
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
            Ok(TypedHeader(Authorization(bearer))) => {
                let app_state = AppState::from_ref(state);
                authenticate(&app_state, bearer.token()).map(|actor| OptionalAuthActor(Some(actor)))
            }
            Err(_) => Ok(OptionalAuthActor(None)),
        }
    }
}
