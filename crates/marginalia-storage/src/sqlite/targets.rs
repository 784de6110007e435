//! Target lookup and creation for [`DomainStore`].

use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use marginalia_core::TargetId;
use marginalia_core::target::TargetDescriptor;
use marginalia_core::validation::validate_target;

use crate::error::Result;
use crate::sqlite::domain::DomainStore;

// ---------------------------------------------------------------------------
// Connection-level helpers
// ---------------------------------------------------------------------------

/// Returns the id of `target` in `domain`, if it has ever been used.
pub(crate) fn lookup_target_on_conn(
    conn: &Connection,
    domain: &str,
    target: &TargetDescriptor,
) -> Result<Option<TargetId>> {
    let id = conn
        .query_row(
            "SELECT id FROM targets
             WHERE domain = ?1 AND type = ?2 AND cls = ?3 AND member = ?4",
            params![domain, target.target_type, target.class, target.member],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

/// Returns the id of `target` in `domain`, creating the row on first use.
pub(crate) fn ensure_target_on_conn(
    conn: &Connection,
    domain: &str,
    target: &TargetDescriptor,
) -> Result<TargetId> {
    validate_target(target)?;

    let inserted = conn.execute(
        "INSERT OR IGNORE INTO targets (domain, type, cls, member) VALUES (?1, ?2, ?3, ?4)",
        params![domain, target.target_type, target.class, target.member],
    )?;
    if inserted > 0 {
        debug!(domain, %target, "created target");
    }

    let id = conn.query_row(
        "SELECT id FROM targets
         WHERE domain = ?1 AND type = ?2 AND cls = ?3 AND member = ?4",
        params![domain, target.target_type, target.class, target.member],
        |row| row.get(0),
    )?;
    Ok(id)
}

// ---------------------------------------------------------------------------
// DomainStore methods
// ---------------------------------------------------------------------------

impl DomainStore<'_> {
    pub fn lookup_target_impl(&self, target: &TargetDescriptor) -> Result<Option<TargetId>> {
        let conn = self.store.lock_conn()?;
        lookup_target_on_conn(&conn, &self.domain, target)
    }

    pub fn ensure_target_impl(&self, target: &TargetDescriptor) -> Result<TargetId> {
        let conn = self.store.lock_conn()?;
        ensure_target_on_conn(&conn, &self.domain, target)
    }
}
