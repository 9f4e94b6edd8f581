use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use axum_extra::extract::{cookie::CookieJar, WithRejection};
use serde::{Deserialize, Serialize};

use super::Flash;
use crate::{
    error::{AppError, AppResult},
    middleware::{
        auth::{expired_session_cookie, session_cookie, session_token},
        CurrentUser, MaybeUser,
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route("/status", get(status))
}

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    is_logged_in: bool,
    username: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    WithRejection(Form(form), _): WithRejection<Form<CredentialsForm>, AppError>,
) -> AppResult<(StatusCode, Flash)> {
    state.accounts.register(&form.username, &form.password).await?;
    Ok((
        StatusCode::CREATED,
        Flash::success("Your account has been created! You are now able to log in"),
    ))
}

/// Verifies credentials and issues a fresh session cookie
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Form(form), _): WithRejection<Form<CredentialsForm>, AppError>,
) -> AppResult<(CookieJar, Flash)> {
    let user = state.accounts.authenticate(&form.username, &form.password).await?;

    if let Some(previous) = session_token(&jar) {
        state.accounts.end_session(&previous).await?;
    }
    let token = state.accounts.start_session(&user).await?;

    Ok((
        jar.add(session_cookie(token)),
        Flash::success("You have been logged in!"),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> AppResult<(CookieJar, Flash)> {
    if let Some(token) = session_token(&jar) {
        state.accounts.end_session(&token).await?;
    }
    tracing::info!(user_id = user.id, "User logged out");

    Ok((
        jar.remove(expired_session_cookie()),
        Flash::info("You have been logged out."),
    ))
}

/// Whether the caller holds a live session, and as whom
pub async fn status(MaybeUser(user): MaybeUser) -> Json<StatusResponse> {
    Json(StatusResponse {
        is_logged_in: user.is_some(),
        username: user.map(|u| u.username),
    })
}
