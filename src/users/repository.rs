use rusqlite::{params, Connection, OptionalExtension};

use crate::db::models::User;
use crate::error::{AppResult, ValidationErrors};
use crate::recipes::repository as recipe_repo;
use crate::recipes::views::RecipeShort;
use crate::users::validation::{NewUser, EMAIL_TAKEN, USERNAME_TAKEN};
use crate::users::views::{SubscriptionView, UserView};

pub fn insert_user(
    conn: &Connection,
    user: &NewUser,
    password_hash: &str,
) -> Result<User, rusqlite::Error> {
    conn.execute(
        "INSERT INTO users (username, email, first_name, last_name, password_hash)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user.username,
            user.email,
            user.first_name,
            user.last_name,
            password_hash
        ],
    )?;

    Ok(User {
        id: conn.last_insert_rowid(),
        username: user.username.clone(),
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
    })
}

/// Insert a user, turning a lost uniqueness race into the same field errors
/// the pre-insert check reports.
pub fn register_user(conn: &Connection, user: &NewUser, password_hash: &str) -> AppResult<User> {
    match insert_user(conn, user, password_hash) {
        Ok(user) => Ok(user),
        Err(e) if is_constraint_violation(&e) => {
            let errors = uniqueness_errors(conn, user)?;
            if errors.is_empty() {
                Err(e.into())
            } else {
                Err(errors.into())
            }
        }
        Err(e) => Err(e.into()),
    }
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Field errors for a username or email that already belongs to someone.
pub fn uniqueness_errors(
    conn: &Connection,
    user: &NewUser,
) -> Result<ValidationErrors, rusqlite::Error> {
    let mut errors = ValidationErrors::new();
    if username_taken(conn, &user.username)? {
        errors.add("username", USERNAME_TAKEN);
    }
    if email_taken(conn, &user.email)? {
        errors.add("email", EMAIL_TAKEN);
    }
    Ok(errors)
}

pub fn find_user(conn: &Connection, id: i64) -> Result<Option<User>, rusqlite::Error> {
    conn.query_row(
        &format!("SELECT {} FROM users WHERE id = ?1", User::COLUMNS),
        params![id],
        User::from_row,
    )
    .optional()
}

pub fn username_taken(conn: &Connection, username: &str) -> Result<bool, rusqlite::Error> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM users WHERE username = ?1",
        params![username],
        |r| r.get(0),
    )
}

pub fn email_taken(conn: &Connection, email: &str) -> Result<bool, rusqlite::Error> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM users WHERE lower(email) = lower(?1)",
        params![email],
        |r| r.get(0),
    )
}

/// `(user_id, password_hash)` for the account that logs in with `email`.
pub fn credentials_by_email(
    conn: &Connection,
    email: &str,
) -> Result<Option<(i64, String)>, rusqlite::Error> {
    conn.query_row(
        "SELECT id, password_hash FROM users WHERE lower(email) = lower(?1)",
        params![email],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )
    .optional()
}

pub fn password_hash(conn: &Connection, user_id: i64) -> Result<String, rusqlite::Error> {
    conn.query_row(
        "SELECT password_hash FROM users WHERE id = ?1",
        params![user_id],
        |r| r.get(0),
    )
}

pub fn set_password_hash(
    conn: &Connection,
    user_id: i64,
    password_hash: &str,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        "UPDATE users SET password_hash = ?1 WHERE id = ?2",
        params![password_hash, user_id],
    )?;
    Ok(())
}

pub fn list_users(conn: &Connection, limit: i64, offset: i64) -> Result<Vec<User>, rusqlite::Error> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM users ORDER BY id LIMIT ?1 OFFSET ?2",
        User::COLUMNS
    ))?;
    let users = stmt
        .query_map(params![limit, offset], User::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(users)
}

pub fn count_users(conn: &Connection) -> Result<i64, rusqlite::Error> {
    conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))
}

// --- Subscriptions ---

/// Whether `viewer` follows `author_id`. Anonymous viewers never do.
pub fn is_subscribed(
    conn: &Connection,
    viewer: Option<i64>,
    author_id: i64,
) -> Result<bool, rusqlite::Error> {
    let Some(viewer) = viewer else {
        return Ok(false);
    };
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM subscriptions WHERE user_id = ?1 AND author_id = ?2)",
        params![viewer, author_id],
        |r| r.get(0),
    )
}

/// Returns `false` when the subscription already existed.
pub fn subscribe(conn: &Connection, user_id: i64, author_id: i64) -> Result<bool, rusqlite::Error> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO subscriptions (user_id, author_id) VALUES (?1, ?2)",
        params![user_id, author_id],
    )?;
    Ok(inserted > 0)
}

/// Returns `false` when there was nothing to remove.
pub fn unsubscribe(
    conn: &Connection,
    user_id: i64,
    author_id: i64,
) -> Result<bool, rusqlite::Error> {
    let deleted = conn.execute(
        "DELETE FROM subscriptions WHERE user_id = ?1 AND author_id = ?2",
        params![user_id, author_id],
    )?;
    Ok(deleted > 0)
}

pub fn list_subscriptions(
    conn: &Connection,
    user_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<User>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.username, u.email, u.first_name, u.last_name
         FROM subscriptions s
         JOIN users u ON u.id = s.author_id
         WHERE s.user_id = ?1
         ORDER BY s.id DESC
         LIMIT ?2 OFFSET ?3",
    )?;
    let authors = stmt
        .query_map(params![user_id, limit, offset], User::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(authors)
}

pub fn count_subscriptions(conn: &Connection, user_id: i64) -> Result<i64, rusqlite::Error> {
    conn.query_row(
        "SELECT COUNT(*) FROM subscriptions WHERE user_id = ?1",
        params![user_id],
        |r| r.get(0),
    )
}

// --- Views ---

pub fn user_view(conn: &Connection, user: User, viewer: Option<i64>) -> AppResult<UserView> {
    let subscribed = is_subscribed(conn, viewer, user.id)?;
    Ok(UserView::new(user, subscribed))
}

/// An author with their recipes (ordered by id, cut to `recipes_limit`) and total count.
pub fn subscription_view(
    conn: &Connection,
    author: User,
    viewer: Option<i64>,
    recipes_limit: Option<u32>,
) -> AppResult<SubscriptionView> {
    let recipes = recipe_repo::author_recipes(conn, author.id, recipes_limit)?
        .into_iter()
        .map(RecipeShort::from)
        .collect();
    let recipes_count = recipe_repo::count_author_recipes(conn, author.id)?;
    let author = user_view(conn, author, viewer)?;

    Ok(SubscriptionView {
        author,
        recipes,
        recipes_count,
    })
}
