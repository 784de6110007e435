//! Tag index operations for [`DomainStore`].

use chrono::Utc;
use rusqlite::{Connection, params};
use tracing::debug;

use marginalia_core::comment::TagAction;
use marginalia_core::filter::ViewOptions;
use marginalia_core::stats::TagCount;
use marginalia_core::validation::normalize_tag_name;

use crate::error::Result;
use crate::sqlite::comments::require_comment_on_conn;
use crate::sqlite::domain::DomainStore;
use crate::sqlite::select::format_datetime;

// ---------------------------------------------------------------------------
// Connection-level helpers
// ---------------------------------------------------------------------------

/// Returns the id of `tagname` in `domain`, creating it on first use.
fn ensure_tag_on_conn(conn: &Connection, domain: &str, tagname: &str) -> Result<i64> {
    conn.execute(
        "INSERT OR IGNORE INTO tags (domain, tagname) VALUES (?1, ?2)",
        params![domain, tagname],
    )?;
    let id = conn.query_row(
        "SELECT id FROM tags WHERE domain = ?1 AND tagname = ?2",
        params![domain, tagname],
        |row| row.get(0),
    )?;
    Ok(id)
}

pub(crate) fn add_tag_on_conn(conn: &Connection, domain: &str, action: &TagAction) -> Result<()> {
    let tagname = normalize_tag_name(&action.tagname)?;
    require_comment_on_conn(conn, domain, action.comment_id, &ViewOptions::with_deleted())?;

    let tag_id = ensure_tag_on_conn(conn, domain, &tagname)?;
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO comment_tags (comment_id, tag_id, user_id, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            action.comment_id,
            tag_id,
            action.user_id,
            format_datetime(&Utc::now())
        ],
    )?;
    if inserted > 0 {
        debug!(comment_id = action.comment_id, %tagname, "tagged comment");
    }
    Ok(())
}

pub(crate) fn remove_tag_on_conn(
    conn: &Connection,
    domain: &str,
    action: &TagAction,
) -> Result<()> {
    let tagname = normalize_tag_name(&action.tagname)?;
    require_comment_on_conn(conn, domain, action.comment_id, &ViewOptions::with_deleted())?;

    conn.execute(
        "DELETE FROM comment_tags
         WHERE comment_id = ?1
           AND tag_id IN (SELECT id FROM tags WHERE domain = ?2 AND tagname = ?3)",
        params![action.comment_id, domain, tagname],
    )?;
    Ok(())
}

/// Tags ranked by how many visible comments carry them.
pub(crate) fn get_top_tags_on_conn(conn: &Connection, domain: &str) -> Result<Vec<TagCount>> {
    let mut stmt = conn.prepare(
        "SELECT tg.tagname, COUNT(*) AS score
         FROM comment_tags ct
         INNER JOIN tags tg ON tg.id = ct.tag_id
         INNER JOIN visible_comments c ON c.id = ct.comment_id
         WHERE tg.domain = ?1
         GROUP BY tg.id
         ORDER BY score DESC, tg.tagname ASC",
    )?;
    let rows = stmt.query_map(params![domain], |row| {
        Ok(TagCount {
            tagname: row.get(0)?,
            score: row.get(1)?,
        })
    })?;

    let mut tags = Vec::new();
    for row in rows {
        tags.push(row?);
    }
    Ok(tags)
}

// ---------------------------------------------------------------------------
// DomainStore methods
// ---------------------------------------------------------------------------

impl DomainStore<'_> {
    /// Attaches a tag to a comment. Re-tagging is a no-op.
    pub fn add_tag_impl(&self, action: &TagAction) -> Result<()> {
        self.store
            .run_immediate(|conn| add_tag_on_conn(conn, &self.domain, action))
    }

    /// Detaches a tag from a comment. Removing an absent tag is a no-op.
    pub fn remove_tag_impl(&self, action: &TagAction) -> Result<()> {
        let conn = self.store.lock_conn()?;
        remove_tag_on_conn(&conn, &self.domain, action)
    }

    pub fn get_top_tags_impl(&self) -> Result<Vec<TagCount>> {
        let conn = self.store.lock_conn()?;
        get_top_tags_on_conn(&conn, &self.domain)
    }
}
