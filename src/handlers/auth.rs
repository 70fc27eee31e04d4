use axum::extract::State;
use axum::response::Response;
use serde::Serialize;
use uuid::Uuid;

use crate::extract::{AppJson, BearerToken};
use crate::models::{Actor, Credentials, NewUser, User};
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::response::{created, empty_success, success};

#[derive(Serialize)]
pub struct LoginPayload {
    pub token: Uuid,
    pub user: User,
}

pub async fn register(
    State(state): State<AppState>,
    AppJson(new_user): AppJson<NewUser>,
) -> AppResult<Response> {
    let user = state.service.register(new_user).await?;
    Ok(created(user, "Account created successfully"))
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(credentials): AppJson<Credentials>,
) -> AppResult<Response> {
    let user = state.service.authenticate(credentials).await?;
    let token = state.sessions.issue(Actor::from(&user)).await;
    let message = format!("Welcome back, {} ({})", user.name, user.role);
    Ok(success(LoginPayload { token, user }, message))
}

pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Response {
    state.sessions.revoke(&token).await;
    empty_success("Logged out")
}
