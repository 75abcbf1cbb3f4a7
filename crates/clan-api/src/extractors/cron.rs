//! Scheduler trigger authentication
//!
//! The external scheduler sends `Authorization: Bearer <CRON_SECRET>`.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::response::ApiError;
use crate::state::AppState;

/// Marker for a request carrying the configured cron secret
#[derive(Debug, Clone, Copy)]
pub struct CronAuth;

#[async_trait]
impl<S> FromRequestParts<S> for CronAuth
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
        let secret = app_state.cron_secret();
        if !secret.is_enabled() {
            tracing::warn!("Cron trigger called but CRON_SECRET is not set");
            return Err(ApiError::InvalidCronSecret);
        }
        if !secret.verify(bearer.token()) {
            tracing::warn!("Cron trigger called with a wrong secret");
            return Err(ApiError::InvalidCronSecret);
        }

        Ok(CronAuth)
    }
}
