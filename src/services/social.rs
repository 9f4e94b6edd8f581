use std::collections::BTreeSet;

use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    error::{AppError, AppResult},
    models::{FriendPair, User, UserSummary},
    services::preferences::PreferenceLedger,
};

pub const USER_NOT_FOUND: &str = "User not found.";
pub const SELF_FRIENDSHIP: &str = "You cannot add yourself as a friend.";
pub const ALREADY_FRIENDS: &str = "You are already friends with this user.";
pub const NOT_FRIENDS: &str = "You are not friends with this user.";

/// Undirected friendship relation between users
///
/// Every pair goes through [`FriendPair`], which fixes the storage order, so
/// membership checks are a single row lookup regardless of who asked.
#[derive(Clone)]
pub struct SocialGraph {
    pool: SqlitePool,
    preferences: PreferenceLedger,
}

impl SocialGraph {
    pub fn new(pool: SqlitePool, preferences: PreferenceLedger) -> Self {
        Self { pool, preferences }
    }

    async fn find_user(&self, user_id: i64) -> AppResult<UserSummary> {
        sqlx::query_as("SELECT id, username FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))
    }

    pub async fn are_friends(&self, a: i64, b: i64) -> AppResult<bool> {
        let Some(pair) = FriendPair::new(a, b) else {
            return Ok(false);
        };

        let found: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM friendships WHERE user_a = ? AND user_b = ?")
                .bind(pair.low())
                .bind(pair.high())
                .fetch_optional(&self.pool)
                .await?;
        Ok(found.is_some())
    }

    /// Befriends `other_id`; returns the new friend
    pub async fn add_friend(&self, user: &User, other_id: i64) -> AppResult<UserSummary> {
        let friend = self.find_user(other_id).await?;

        let pair = FriendPair::new(user.id, friend.id)
            .ok_or_else(|| AppError::Conflict(SELF_FRIENDSHIP.to_string()))?;

        let result = sqlx::query(
            "INSERT INTO friendships (user_a, user_b, created_at) VALUES (?, ?, ?) \
             ON CONFLICT(user_a, user_b) DO NOTHING",
        )
        .bind(pair.low())
        .bind(pair.high())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(ALREADY_FRIENDS.to_string()));
        }

        tracing::info!(user_id = user.id, friend_id = friend.id, "Friendship created");
        Ok(friend)
    }

    /// Ends a friendship
    ///
    /// Returns the other user and whether a friendship actually existed.
    pub async fn remove_friend(&self, user: &User, other_id: i64) -> AppResult<(UserSummary, bool)> {
        let friend = self.find_user(other_id).await?;

        let Some(pair) = FriendPair::new(user.id, friend.id) else {
            tracing::warn!(user_id = user.id, "Attempt to unfriend self");
            return Ok((friend, false));
        };

        let result = sqlx::query("DELETE FROM friendships WHERE user_a = ? AND user_b = ?")
            .bind(pair.low())
            .bind(pair.high())
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            tracing::info!(user_id = user.id, friend_id = friend.id, "Friendship removed");
        } else {
            tracing::warn!(
                user_id = user.id,
                friend_id = friend.id,
                "Remove requested for a friendship that does not exist"
            );
        }
        Ok((friend, removed))
    }

    pub async fn friends_of(&self, user_id: i64) -> AppResult<Vec<UserSummary>> {
        let friends = sqlx::query_as(
            r#"
            SELECT u.id, u.username
            FROM friendships f
            JOIN users u ON u.id = CASE WHEN f.user_a = ? THEN f.user_b ELSE f.user_a END
            WHERE f.user_a = ? OR f.user_b = ?
            ORDER BY u.username
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(friends)
    }

    /// Titles both users like; only friends may compare
    ///
    /// Returns the friend alongside the titles, sorted.
    pub async fn shared_liked_titles(
        &self,
        user_id: i64,
        friend_id: i64,
    ) -> AppResult<(UserSummary, Vec<String>)> {
        let friend = self.find_user(friend_id).await?;

        if !self.are_friends(user_id, friend.id).await? {
            return Err(AppError::Forbidden(NOT_FRIENDS.to_string()));
        }

        let mine: BTreeSet<String> = self.preferences.liked_titles(user_id).await?.into_iter().collect();
        let theirs: BTreeSet<String> =
            self.preferences.liked_titles(friend.id).await?.into_iter().collect();

        let shared = mine.intersection(&theirs).cloned().collect();
        Ok((friend, shared))
    }
}
