//! Read tracking for [`DomainStore`].

use rusqlite::{Connection, params};

use marginalia_core::filter::ViewOptions;
use marginalia_core::{CommentId, UserId};

use crate::error::Result;
use crate::sqlite::comments::require_comment_on_conn;
use crate::sqlite::domain::DomainStore;

/// Records that `user_id` has read a comment. Repeated calls are no-ops.
pub(crate) fn mark_read_on_conn(
    conn: &Connection,
    domain: &str,
    user_id: UserId,
    comment_id: CommentId,
) -> Result<()> {
    require_comment_on_conn(conn, domain, comment_id, &ViewOptions::with_deleted())?;
    conn.execute(
        "INSERT OR IGNORE INTO readings (user_id, comment_id) VALUES (?1, ?2)",
        params![user_id, comment_id],
    )?;
    Ok(())
}

impl DomainStore<'_> {
    pub fn mark_read_impl(&self, user_id: UserId, comment_id: CommentId) -> Result<()> {
        let conn = self.store.lock_conn()?;
        mark_read_on_conn(&conn, &self.domain, user_id, comment_id)
    }
}

#[cfg(test)]
mod tests {
    use crate::sqlite::test_support::*;

    use super::*;

    #[test]
    fn double_mark_leaves_one_row() {
        let fx = fixture();
        let docs = fx.docs();
        let id = add(&docs, fx.alice, panel(), None, "x");

        docs.mark_read_impl(fx.moderator, id).unwrap();
        docs.mark_read_impl(fx.moderator, id).unwrap();

        let conn = fx.store.lock_conn().unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM readings", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn read_flag_is_per_viewer() {
        let fx = fixture();
        let docs = fx.docs();
        let id = add(&docs, fx.alice, panel(), None, "x");
        docs.mark_read_impl(fx.moderator, id).unwrap();

        let seen = docs
            .get_by_id_impl(id, &ViewOptions::visible().read_by(fx.moderator))
            .unwrap();
        assert_eq!(seen.read, Some(true));
        let unseen = docs
            .get_by_id_impl(id, &ViewOptions::visible().read_by(fx.bob))
            .unwrap();
        assert_eq!(unseen.read, Some(false));
    }

    #[test]
    fn mark_unknown_comment_is_not_found() {
        let fx = fixture();
        assert!(fx.docs().mark_read_impl(fx.bob, 12).unwrap_err().is_not_found());
    }
}
