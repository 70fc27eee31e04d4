//! Request extractors: the caller's identity from a bearer token, plus JSON
//! body and path wrappers whose rejections use the `AppError` envelope.

use axum::async_trait;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use uuid::Uuid;

use crate::models::Actor;
use crate::state::AppState;
use crate::utils::error::AppError;

/// The session token from an `Authorization: Bearer <token>` header.
pub struct BearerToken(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthenticated)?;

        let token = value
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthenticated)?;

        Uuid::parse_str(token.trim())
            .map(BearerToken)
            .map_err(|_| AppError::Unauthenticated)
    }
}

/// The logged-in caller. Rejects with 401 when the token is missing or revoked.
pub struct CurrentActor(pub Actor);

#[async_trait]
impl FromRequestParts<AppState> for CurrentActor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        state
            .sessions
            .resolve(&token)
            .await
            .map(CurrentActor)
            .ok_or(AppError::Unauthenticated)
    }
}

/// `Json<T>` that rejects malformed or incomplete bodies with `AppError::Validation`.
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| AppJson(value))
            .map_err(|rejection| AppError::Validation(rejection.body_text()))
    }
}

/// `Path<T>` that rejects unparsable segments with `AppError::Validation`.
pub struct AppPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for AppPath<T>
where
    Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| AppPath(value))
            .map_err(|rejection| AppError::Validation(rejection.body_text()))
    }
}
