use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{User, UserSummary},
};

pub const USERNAME_TAKEN: &str = "That username is already taken. Please choose a different one.";
pub const INVALID_CREDENTIALS: &str = "Login Unsuccessful. Please check username and password";

const USER_COLUMNS: &str = "id, username, password_hash, is_admin, created_at";

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verifies a password against a stored PHC string; malformed hashes never match
fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(p) => p,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// User accounts and login sessions
#[derive(Clone)]
pub struct Accounts {
    pool: SqlitePool,
    admin_usernames: Vec<String>,
    session_ttl: Duration,
}

impl Accounts {
    pub fn new(pool: SqlitePool, admin_usernames: Vec<String>, session_ttl: Duration) -> Self {
        Self {
            pool,
            admin_usernames,
            session_ttl,
        }
    }

    /// Creates an account; usernames are compared exactly
    pub async fn register(&self, username: &str, password: &str) -> AppResult<User> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::InvalidInput(
                "Username and password are required".to_string(),
            ));
        }

        if self.find_by_username(username).await?.is_some() {
            return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
        }

        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;

        let is_admin = self.admin_usernames.iter().any(|name| name == username);

        let user: User = sqlx::query_as(&format!(
            "INSERT INTO users (username, password_hash, is_admin, created_at) \
             VALUES (?, ?, ?, ?) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(username)
        .bind(&password_hash)
        .bind(is_admin)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(USERNAME_TAKEN.to_string())
            }
            other => AppError::Database(other),
        })?;

        tracing::info!(user_id = user.id, username = %user.username, is_admin, "User registered");

        Ok(user)
    }

    /// Checks credentials without revealing which part was wrong
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<User> {
        let Some(user) = self.find_by_username(username).await? else {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let password = password.to_string();
        let stored_hash = user.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        if valid {
            Ok(user)
        } else {
            Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))
        }
    }

    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE username = ?",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Every user except `user_id`, by username
    pub async fn others(&self, user_id: i64) -> AppResult<Vec<UserSummary>> {
        let users = sqlx::query_as("SELECT id, username FROM users WHERE id != ? ORDER BY username")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    /// Opens a session and returns its token
    pub async fn start_session(&self, user: &User) -> AppResult<String> {
        let token = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&token)
        .bind(user.id)
        .bind(now)
        .bind(now + self.session_ttl)
        .execute(&self.pool)
        .await?;

        tracing::debug!(user_id = user.id, "Session started");
        Ok(token)
    }

    /// The user behind an unexpired session token
    pub async fn session_user(&self, token: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as(
            r#"
            SELECT u.id, u.username, u.password_hash, u.is_admin, u.created_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = ? AND s.expires_at > ?
            "#,
        )
        .bind(token)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn end_session(&self, token: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_pool;

    async fn accounts() -> Accounts {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        Accounts::new(pool, vec!["root".to_string()], Duration::hours(1))
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("pw1").unwrap();
        assert_ne!(hash, "pw1");
        assert!(verify_password("pw1", &hash));
        assert!(!verify_password("pw2", &hash));
        assert!(!verify_password("pw1", "not-a-phc-string"));
    }

    #[test]
    fn test_password_hashes_are_salted() {
        assert_ne!(hash_password("pw1").unwrap(), hash_password("pw1").unwrap());
    }

    #[tokio::test]
    async fn test_register_twice_conflicts() {
        let accounts = accounts().await;
        accounts.register("alice", "pw1").await.unwrap();

        let err = accounts.register("alice", "other").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref msg) if msg == USERNAME_TAKEN));

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = 'alice'")
            .fetch_one(&accounts.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_usernames_are_case_sensitive() {
        let accounts = accounts().await;
        accounts.register("alice", "pw1").await.unwrap();
        assert!(accounts.register("Alice", "pw1").await.is_ok());
    }

    #[tokio::test]
    async fn test_admin_flag_from_config() {
        let accounts = accounts().await;
        assert!(accounts.register("root", "pw").await.unwrap().is_admin);
        assert!(!accounts.register("bob", "pw").await.unwrap().is_admin);
    }

    #[tokio::test]
    async fn test_authenticate_is_generic_on_failure() {
        let accounts = accounts().await;
        accounts.register("alice", "pw1").await.unwrap();

        assert_eq!(accounts.authenticate("alice", "pw1").await.unwrap().username, "alice");

        for (username, password) in [("alice", "wrong"), ("nobody", "pw1")] {
            let err = accounts.authenticate(username, password).await.unwrap_err();
            assert!(matches!(err, AppError::Unauthorized(ref msg) if msg == INVALID_CREDENTIALS));
        }
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let accounts = accounts().await;
        let user = accounts.register("alice", "pw1").await.unwrap();

        let token = accounts.start_session(&user).await.unwrap();
        assert_eq!(accounts.session_user(&token).await.unwrap().map(|u| u.id), Some(user.id));

        accounts.end_session(&token).await.unwrap();
        assert!(accounts.session_user(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_does_not_authenticate() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        let accounts = Accounts::new(pool, vec![], Duration::seconds(-1));
        let user = accounts.register("alice", "pw1").await.unwrap();

        let token = accounts.start_session(&user).await.unwrap();
        assert!(accounts.session_user(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_others_excludes_self() {
        let accounts = accounts().await;
        let alice = accounts.register("alice", "pw").await.unwrap();
        accounts.register("bob", "pw").await.unwrap();
        accounts.register("carol", "pw").await.unwrap();

        let names: Vec<String> = accounts
            .others(alice.id)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["bob".to_string(), "carol".to_string()]);
    }
}
