//! Append-only update log for comments.

use chrono::Utc;
use rusqlite::{Connection, params};

use marginalia_core::comment::UpdateEntry;
use marginalia_core::enums::UpdateAction;
use marginalia_core::filter::ViewOptions;
use marginalia_core::{CommentId, UserId};

use crate::error::Result;
use crate::sqlite::comments::require_comment_on_conn;
use crate::sqlite::domain::DomainStore;
use crate::sqlite::select::{format_datetime, parse_datetime};

/// Records that `user_id` performed `action` on a comment.
pub(crate) fn append_update_on_conn(
    conn: &Connection,
    comment_id: CommentId,
    user_id: UserId,
    action: &UpdateAction,
) -> Result<()> {
    conn.execute(
        "INSERT INTO updates (comment_id, user_id, action, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            comment_id,
            user_id,
            action.as_str(),
            format_datetime(&Utc::now())
        ],
    )?;
    Ok(())
}

/// Returns the update history of a comment, oldest first.
pub(crate) fn get_updates_on_conn(
    conn: &Connection,
    domain: &str,
    comment_id: CommentId,
) -> Result<Vec<UpdateEntry>> {
    require_comment_on_conn(conn, domain, comment_id, &ViewOptions::with_deleted())?;

    let mut stmt = conn.prepare(
        "SELECT up.id, up.comment_id, up.user_id, u.username, up.action, up.created_at
         FROM updates up
         LEFT JOIN users u ON u.id = up.user_id
         WHERE up.comment_id = ?1
         ORDER BY up.created_at ASC, up.id ASC",
    )?;
    let rows = stmt.query_map(params![comment_id], |row| {
        let action: String = row.get(4)?;
        let created_at: String = row.get(5)?;
        Ok(UpdateEntry {
            id: row.get(0)?,
            comment_id: row.get(1)?,
            user_id: row.get(2)?,
            username: row.get(3)?,
            action: UpdateAction::from(action),
            created_at: parse_datetime(&created_at),
        })
    })?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?);
    }
    Ok(entries)
}

impl DomainStore<'_> {
    /// Returns the update history of a comment (deleted comments included).
    pub fn get_updates_impl(&self, comment_id: CommentId) -> Result<Vec<UpdateEntry>> {
        let conn = self.store.lock_conn()?;
        get_updates_on_conn(&conn, &self.domain, comment_id)
    }
}

#[cfg(test)]
mod tests {
    use marginalia_core::comment::{CommentUpdate, DeleteAction};
    use pretty_assertions::assert_eq;

    use crate::sqlite::test_support::*;

    use super::*;

    #[test]
    fn history_records_edits_and_deletes() {
        let fx = fixture();
        let docs = fx.docs();
        let id = add(&docs, fx.alice, panel(), None, "first");

        docs.update_impl(&CommentUpdate {
            id,
            user_id: fx.alice,
            content: "second".into(),
        })
        .unwrap();
        docs.set_deleted_impl(&DeleteAction {
            id,
            user_id: fx.moderator,
            deleted: true,
        })
        .unwrap();
        docs.set_deleted_impl(&DeleteAction {
            id,
            user_id: fx.moderator,
            deleted: false,
        })
        .unwrap();

        let history = docs.get_updates_impl(id).unwrap();
        let actions: Vec<_> = history.iter().map(|u| u.action.clone()).collect();
        assert_eq!(
            actions,
            vec![
                UpdateAction::Update,
                UpdateAction::Delete,
                UpdateAction::UndoDelete
            ]
        );
        assert_eq!(history[0].username.as_deref(), Some("alice"));
        assert_eq!(history[1].username.as_deref(), Some("mod"));
    }

    #[test]
    fn history_of_unknown_comment_is_not_found() {
        let fx = fixture();
        assert!(fx.docs().get_updates_impl(999).unwrap_err().is_not_found());
    }
}
