/**
 * User Model and Database Operations
 *
 * Accounts log in with `<username>@oasis.fake`; the `username` column is the
 * display name and may change (or collide) without affecting login.
 */

use chrono::Utc;
use sqlx::SqlitePool;

use crate::shared::avatar::effective_photo;
use crate::shared::feed::Author;
use crate::shared::Role;

/// Domain appended to a username to form the login email.
pub const LOGIN_EMAIL_DOMAIN: &str = "oasis.fake";

/// User struct representing a user in the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID string)
    pub id: String,
    /// Display name
    pub username: String,
    /// Login email, derived from the sign-up username
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    /// Stored photo (data URL or http URL), empty for the generated avatar
    pub photo_url: String,
    /// Role name, see [`Role`]
    pub role: String,
    /// Unix milliseconds
    pub created_at: i64,
    /// Unix milliseconds
    pub updated_at: i64,
}

impl User {
    /// Parsed role. An unrecognised stored value is treated as Guest.
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or_else(|_| {
            tracing::warn!("[Auth] Unknown role {:?} on user {}", self.role, self.id);
            Role::Guest
        })
    }

    pub fn author(&self) -> Author {
        Author {
            id: self.id.clone(),
            username: self.username.clone(),
            role: self.role(),
            photo_url: effective_photo(&self.photo_url, &self.username),
        }
    }
}

/// Login email for a sign-up username.
pub fn login_email(username: &str) -> String {
    format!("{}@{}", username.trim().to_lowercase(), LOGIN_EMAIL_DOMAIN)
}

const USER_COLUMNS: &str =
    "id, username, email, password_hash, photo_url, role, created_at, updated_at";

/// Create a new user with the Member role and no photo.
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().timestamp_millis();

    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (id, username, email, password_hash, photo_url, role, created_at, updated_at)
        VALUES (?, ?, ?, ?, '', ?, ?, ?)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(&id)
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(Role::Member.as_str())
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Get user by login email
pub async fn get_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Get user by ID
pub async fn get_user_by_id(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Change the display name
pub async fn update_username(
    pool: &SqlitePool,
    id: &str,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET username = ?, updated_at = ? WHERE id = ? RETURNING {USER_COLUMNS}"
    ))
    .bind(username)
    .bind(Utc::now().timestamp_millis())
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Replace the stored photo. An empty string restores the generated avatar.
pub async fn update_photo(
    pool: &SqlitePool,
    id: &str,
    photo_url: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET photo_url = ?, updated_at = ? WHERE id = ? RETURNING {USER_COLUMNS}"
    ))
    .bind(photo_url)
    .bind(Utc::now().timestamp_millis())
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn update_role(
    pool: &SqlitePool,
    id: &str,
    role: Role,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET role = ?, updated_at = ? WHERE id = ? RETURNING {USER_COLUMNS}"
    ))
    .bind(role.as_str())
    .bind(Utc::now().timestamp_millis())
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Delete the account. Posts and comments keep their author id and render
/// as Guest afterwards.
pub async fn delete_user(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Members sidebar: everyone except Guest and Banned accounts, optionally
/// filtered by a case-insensitive username substring.
pub async fn list_members(
    pool: &SqlitePool,
    search: Option<&str>,
) -> Result<Vec<User>, sqlx::Error> {
    let pattern = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", escape_like(&s.to_lowercase())));

    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {USER_COLUMNS} FROM users
        WHERE role NOT IN (?, ?)
          AND (? IS NULL OR lower(username) LIKE ? ESCAPE '\')
        ORDER BY lower(username), created_at
        "#
    ))
    .bind(Role::Guest.as_str())
    .bind(Role::Banned.as_str())
    .bind(pattern.as_deref())
    .bind(pattern.as_deref())
    .fetch_all(pool)
    .await
}

fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
