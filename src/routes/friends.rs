use std::collections::HashSet;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Form, Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use super::Flash;
use crate::{
    error::{AppError, AppResult},
    middleware::CurrentUser,
    models::UserSummary,
    services::social::NOT_FRIENDS,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/friends", get(list_friends))
        .route("/add_friend", post(add_friend))
        .route("/remove_friend", post(remove_friend))
        .route("/friends/shared_movies/:friend_id", get(shared_movies))
}

#[derive(Debug, Deserialize)]
pub struct FriendForm {
    friend_id: Option<String>,
}

impl FriendForm {
    fn friend_id(&self) -> AppResult<i64> {
        self.friend_id
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .ok_or_else(|| AppError::InvalidInput("Missing friend_id".to_string()))?
            .parse()
            .map_err(|_| AppError::InvalidInput("friend_id must be a user id".to_string()))
    }
}

#[derive(Debug, Serialize)]
pub struct FriendsResponse {
    friends: Vec<UserSummary>,
    non_friends: Vec<UserSummary>,
}

#[derive(Debug, Serialize)]
pub struct SharedMoviesResponse {
    friend: UserSummary,
    shared_liked_movie_titles: Vec<String>,
}

/// The caller's friends, and everyone else they could befriend
pub async fn list_friends(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<FriendsResponse>> {
    let friends = state.social.friends_of(user.id).await?;
    let friend_ids: HashSet<i64> = friends.iter().map(|f| f.id).collect();

    let non_friends = state
        .accounts
        .others(user.id)
        .await?
        .into_iter()
        .filter(|other| !friend_ids.contains(&other.id))
        .collect();

    Ok(Json(FriendsResponse {
        friends,
        non_friends,
    }))
}

pub async fn add_friend(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Form(form), _): WithRejection<Form<FriendForm>, AppError>,
) -> AppResult<Flash> {
    let friend = state.social.add_friend(&user, form.friend_id()?).await?;
    Ok(Flash::success(format!(
        "You are now friends with {}!",
        friend.username
    )))
}

pub async fn remove_friend(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Form(form), _): WithRejection<Form<FriendForm>, AppError>,
) -> AppResult<Flash> {
    let (friend, removed) = state.social.remove_friend(&user, form.friend_id()?).await?;

    if removed {
        Ok(Flash::info(format!(
            "You are no longer friends with {}.",
            friend.username
        )))
    } else {
        Ok(Flash::warning(NOT_FRIENDS))
    }
}

/// Titles liked by both the caller and one of their friends
pub async fn shared_movies(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(friend_id), _): WithRejection<Path<i64>, AppError>,
) -> AppResult<Json<SharedMoviesResponse>> {
    let (friend, shared_liked_movie_titles) =
        state.social.shared_liked_titles(user.id, friend_id).await?;

    Ok(Json(SharedMoviesResponse {
        friend,
        shared_liked_movie_titles,
    }))
}
