//! User accounts for [`SqliteStore`]. Users are shared across domains.

use chrono::Utc;
use rusqlite::{Connection, params};
use tracing::info;

use marginalia_core::UserId;
use marginalia_core::user::{NewUser, User};
use marginalia_core::validation::ValidationError;

use crate::error::{Result, StorageError, not_found_on_no_rows};
use crate::sqlite::select::format_datetime;
use crate::sqlite::store::SqliteStore;

pub(crate) const USER_COLUMNS: &str = "id, username, email, moderator";

pub(crate) fn scan_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        moderator: row.get(3)?,
    })
}

pub(crate) fn create_user_on_conn(conn: &Connection, user: &NewUser) -> Result<UserId> {
    let username = user.username.trim();
    if username.is_empty() {
        return Err(ValidationError::UsernameRequired.into());
    }

    let result = conn.execute(
        "INSERT INTO users (username, email, moderator, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            username,
            user.email.trim(),
            user.moderator,
            format_datetime(&Utc::now())
        ],
    );
    match result {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(StorageError::validation(format!(
                "username {username:?} is already taken"
            )))
        }
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn get_user_on_conn(conn: &Connection, id: UserId) -> Result<User> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
        params![id],
        scan_user,
    )
    .map_err(not_found_on_no_rows("user", id))
}

pub(crate) fn get_user_by_name_on_conn(conn: &Connection, username: &str) -> Result<User> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
        params![username],
        scan_user,
    )
    .map_err(not_found_on_no_rows("user", username.to_string()))
}

impl SqliteStore {
    pub fn create_user_impl(&self, user: &NewUser) -> Result<UserId> {
        let conn = self.lock_conn()?;
        let id = create_user_on_conn(&conn, user)?;
        info!(id, username = %user.username, "created user");
        Ok(id)
    }

    pub fn get_user_impl(&self, id: UserId) -> Result<User> {
        let conn = self.lock_conn()?;
        get_user_on_conn(&conn, id)
    }

    pub fn get_user_by_name_impl(&self, username: &str) -> Result<User> {
        let conn = self.lock_conn()?;
        get_user_by_name_on_conn(&conn, username)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::sqlite::test_support::user;

    use super::*;

    #[test]
    fn create_and_fetch() {
        let store = SqliteStore::open_in_memory().unwrap();
        let id = store.create_user_impl(&user("carol", true)).unwrap();

        let by_id = store.get_user_impl(id).unwrap();
        assert_eq!(
            by_id,
            User {
                id,
                username: "carol".into(),
                email: "carol@example.com".into(),
                moderator: true,
            }
        );
        assert_eq!(store.get_user_by_name_impl("carol").unwrap(), by_id);
    }

    #[test]
    fn duplicate_username_is_validation_error() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.create_user_impl(&user("dave", false)).unwrap();
        let err = store.create_user_impl(&user("dave", false)).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn blank_username_is_rejected() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.create_user_impl(&user(" ", false)).unwrap_err().is_validation());
    }

    #[test]
    fn unknown_user_is_not_found() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.get_user_impl(7).unwrap_err().is_not_found());
        assert!(store.get_user_by_name_impl("nobody").unwrap_err().is_not_found());
    }
}
