use rand::Rng;
use rusqlite::{params, Connection, OptionalExtension};

/// Issue a new token for a user. Returns the token key.
pub fn create_token(conn: &Connection, user_id: i64) -> Result<String, rusqlite::Error> {
    let key = generate_key();

    conn.execute(
        "INSERT INTO auth_tokens (key, user_id) VALUES (?1, ?2)",
        params![key, user_id],
    )?;

    Ok(key)
}

/// Revoke a token by key.
pub fn delete_token(conn: &Connection, key: &str) -> Result<(), rusqlite::Error> {
    conn.execute("DELETE FROM auth_tokens WHERE key = ?1", params![key])?;
    Ok(())
}

/// Resolve a token key to `(user_id, username)`.
pub fn user_for_token(
    conn: &Connection,
    key: &str,
) -> Result<Option<(i64, String)>, rusqlite::Error> {
    conn.query_row(
        "SELECT u.id, u.username FROM auth_tokens t \
         JOIN users u ON u.id = t.user_id \
         WHERE t.key = ?1",
        params![key],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()
}

/// Generate a random 20-byte hex key.
fn generate_key() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 20] = rng.gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
