//! Comment CRUD and threading operations for [`DomainStore`].

use chrono::Utc;
use rusqlite::{Connection, params};
use tracing::{debug, info};

use marginalia_core::comment::{Comment, CommentUpdate, DeleteAction, NewComment};
use marginalia_core::enums::UpdateAction;
use marginalia_core::filter::ViewOptions;
use marginalia_core::format::Formatter;
use marginalia_core::target::TargetDescriptor;
use marginalia_core::validation::{ValidationError, validate_content};
use marginalia_core::CommentId;

use crate::error::{Result, StorageError, not_found_on_no_rows};
use crate::sqlite::domain::DomainStore;
use crate::sqlite::select::{CommentSelect, Params, comment_source, format_datetime, scan_comment};
use crate::sqlite::targets::{ensure_target_on_conn, lookup_target_on_conn};
use crate::sqlite::updates::append_update_on_conn;

/// Upper bound on ancestor hops when resolving a parent, guarding against
/// cycles in hand-edited data.
const MAX_PARENT_HOPS: usize = 64;

// ---------------------------------------------------------------------------
// Connection-level helpers
// ---------------------------------------------------------------------------

/// Checks that comment `id` exists in `domain` under `view`, returning its
/// parent id.
pub(crate) fn require_comment_on_conn(
    conn: &Connection,
    domain: &str,
    id: CommentId,
    view: &ViewOptions,
) -> Result<Option<CommentId>> {
    let sql = format!(
        "SELECT c.parent_id FROM {} c WHERE c.domain = ?1 AND c.id = ?2",
        comment_source(view)
    );
    conn.query_row(&sql, params![domain, id], |row| row.get(0))
        .map_err(not_found_on_no_rows("comment", id))
}

pub(crate) fn get_by_id_on_conn(
    conn: &Connection,
    domain: &str,
    id: CommentId,
    view: &ViewOptions,
) -> Result<Comment> {
    let mut p = Params::new();
    let select = CommentSelect::new(view).render(&mut p);
    let sql = format!(
        "{select} WHERE c.domain = {} AND c.id = {}",
        p.bind(domain.to_string()),
        p.bind(id)
    );
    conn.query_row(&sql, p.as_refs().as_slice(), scan_comment)
        .map_err(not_found_on_no_rows("comment", id))
}

pub(crate) fn find_on_conn(
    conn: &Connection,
    domain: &str,
    target: &TargetDescriptor,
    view: &ViewOptions,
) -> Result<Vec<Comment>> {
    let Some(target_id) = lookup_target_on_conn(conn, domain, target)? else {
        return Ok(Vec::new());
    };

    let mut p = Params::new();
    let select = CommentSelect::new(view).with_reply_count().render(&mut p);
    let sql = format!(
        "{select} WHERE c.target_id = {} AND c.parent_id IS NULL
         ORDER BY c.created_at ASC, c.id ASC",
        p.bind(target_id)
    );
    query_comments(conn, &sql, &p)
}

pub(crate) fn find_children_on_conn(
    conn: &Connection,
    domain: &str,
    parent_id: CommentId,
    view: &ViewOptions,
) -> Result<Vec<Comment>> {
    let mut p = Params::new();
    let select = CommentSelect::new(view).render(&mut p);
    let sql = format!(
        "{select} WHERE c.domain = {} AND c.parent_id = {}
         ORDER BY c.created_at ASC, c.id ASC",
        p.bind(domain.to_string()),
        p.bind(parent_id)
    );
    query_comments(conn, &sql, &p)
}

/// Runs a comment SELECT and collects every row.
pub(crate) fn query_comments(conn: &Connection, sql: &str, p: &Params) -> Result<Vec<Comment>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(p.as_refs().as_slice(), scan_comment)?;
    let mut comments = Vec::new();
    for row in rows {
        comments.push(row?);
    }
    Ok(comments)
}

pub(crate) fn add_on_conn(
    conn: &Connection,
    domain: &str,
    formatter: &dyn Formatter,
    comment: &NewComment,
) -> Result<CommentId> {
    validate_content(&comment.content)?;
    // Parents must live in the same domain; deleted ones still count.
    if let Some(pid) = comment.parent_id {
        require_comment_on_conn(conn, domain, pid, &ViewOptions::with_deleted())?;
    }
    let target_id = ensure_target_on_conn(conn, domain, &comment.target)?;

    conn.execute(
        "INSERT INTO comments (target_id, parent_id, user_id, content, content_html, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            target_id,
            comment.parent_id,
            comment.user_id,
            comment.content,
            formatter.render(&comment.content),
            format_datetime(&Utc::now()),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn update_on_conn(
    conn: &Connection,
    domain: &str,
    formatter: &dyn Formatter,
    update: &CommentUpdate,
) -> Result<()> {
    validate_content(&update.content)?;
    require_comment_on_conn(conn, domain, update.id, &ViewOptions::with_deleted())?;

    conn.execute(
        "UPDATE comments SET content = ?1, content_html = ?2 WHERE id = ?3",
        params![update.content, formatter.render(&update.content), update.id],
    )?;
    append_update_on_conn(conn, update.id, update.user_id, &UpdateAction::Update)
}

pub(crate) fn set_deleted_on_conn(
    conn: &Connection,
    domain: &str,
    action: &DeleteAction,
) -> Result<()> {
    require_comment_on_conn(conn, domain, action.id, &ViewOptions::with_deleted())?;

    conn.execute(
        "UPDATE comments SET deleted = ?1 WHERE id = ?2",
        params![action.deleted, action.id],
    )?;
    append_update_on_conn(
        conn,
        action.id,
        action.user_id,
        &UpdateAction::for_deleted(action.deleted),
    )
}

/// Resolves a requested parent to the top-level comment of its thread, so
/// threads stay one level deep.
pub(crate) fn fix_parent_id_on_conn(
    conn: &Connection,
    domain: &str,
    parent_id: Option<CommentId>,
) -> Result<Option<CommentId>> {
    let Some(mut current) = parent_id else {
        return Ok(None);
    };

    // The requested parent must be visible; its ancestors may be deleted.
    let mut view = ViewOptions::visible();
    for _ in 0..MAX_PARENT_HOPS {
        let next = require_comment_on_conn(conn, domain, current, &view)?;
        view = ViewOptions::with_deleted();
        match next {
            Some(grandparent) => current = grandparent,
            None => return Ok(Some(current)),
        }
    }
    Err(StorageError::Internal(format!(
        "parent chain of comment {current} is too deep"
    )))
}

pub(crate) fn set_parent_on_conn(
    conn: &Connection,
    domain: &str,
    id: CommentId,
    parent_id: Option<CommentId>,
) -> Result<usize> {
    require_comment_on_conn(conn, domain, id, &ViewOptions::with_deleted())?;

    let effective = fix_parent_id_on_conn(conn, domain, parent_id)?;
    if effective == Some(id) {
        return Err(ValidationError::SelfParent.into());
    }

    // The comment and all of its direct children, deleted ones included.
    let moved = conn.execute(
        "UPDATE comments SET parent_id = ?1 WHERE id = ?2 OR parent_id = ?2",
        params![effective, id],
    )?;
    Ok(moved)
}

// ---------------------------------------------------------------------------
// DomainStore methods
// ---------------------------------------------------------------------------

impl DomainStore<'_> {
    /// Fetches a single comment by id.
    pub fn get_by_id_impl(&self, id: CommentId, view: &ViewOptions) -> Result<Comment> {
        let conn = self.store.lock_conn()?;
        get_by_id_on_conn(&conn, &self.domain, id, view)
    }

    /// Top-level comments on a target, oldest first, with reply counts.
    pub fn find_impl(&self, target: &TargetDescriptor, view: &ViewOptions) -> Result<Vec<Comment>> {
        let conn = self.store.lock_conn()?;
        find_on_conn(&conn, &self.domain, target, view)
    }

    /// Replies to a comment, oldest first.
    pub fn find_children_impl(
        &self,
        parent_id: CommentId,
        view: &ViewOptions,
    ) -> Result<Vec<Comment>> {
        let conn = self.store.lock_conn()?;
        find_children_on_conn(&conn, &self.domain, parent_id, view)
    }

    /// Creates a comment, creating its target on first use.
    ///
    /// `parent_id` is stored verbatim; callers wanting a flat thread resolve
    /// it through [`DomainStore::fix_parent_id_impl`] first.
    pub fn add_impl(&self, comment: &NewComment) -> Result<CommentId> {
        let id = self.store.run_immediate(|conn| {
            add_on_conn(conn, &self.domain, self.store.formatter.as_ref(), comment)
        })?;
        info!(domain = %self.domain, id, target = %comment.target, "added comment");
        Ok(id)
    }

    /// Replaces a comment's content and re-renders its HTML.
    pub fn update_impl(&self, update: &CommentUpdate) -> Result<()> {
        self.store.run_immediate(|conn| {
            update_on_conn(conn, &self.domain, self.store.formatter.as_ref(), update)
        })?;
        debug!(id = update.id, "updated comment");
        Ok(())
    }

    /// Soft-deletes or restores a comment.
    pub fn set_deleted_impl(&self, action: &DeleteAction) -> Result<()> {
        self.store
            .run_immediate(|conn| set_deleted_on_conn(conn, &self.domain, action))?;
        debug!(id = action.id, deleted = action.deleted, "changed comment visibility");
        Ok(())
    }

    /// Moves a comment, together with its replies, under a new parent (or to
    /// the top level when `parent_id` is `None`).
    pub fn set_parent_impl(&self, id: CommentId, parent_id: Option<CommentId>) -> Result<()> {
        let moved = self
            .store
            .run_immediate(|conn| set_parent_on_conn(conn, &self.domain, id, parent_id))?;
        debug!(id, ?parent_id, moved, "re-parented comment");
        Ok(())
    }

    pub fn fix_parent_id_impl(&self, parent_id: Option<CommentId>) -> Result<Option<CommentId>> {
        let conn = self.store.lock_conn()?;
        fix_parent_id_on_conn(&conn, &self.domain, parent_id)
    }
}
