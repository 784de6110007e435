//! Per-user target subscriptions for [`DomainStore`].

use rusqlite::{Connection, params};

use marginalia_core::target::TargetDescriptor;
use marginalia_core::user::User;
use marginalia_core::{TargetId, UserId};

use crate::error::Result;
use crate::sqlite::domain::DomainStore;
use crate::sqlite::targets::{ensure_target_on_conn, lookup_target_on_conn};
use crate::sqlite::users::scan_user;

pub(crate) fn find_targets_by_user_on_conn(
    conn: &Connection,
    domain: &str,
    user_id: UserId,
) -> Result<Vec<TargetDescriptor>> {
    let mut stmt = conn.prepare(
        "SELECT t.type, t.cls, t.member
         FROM subscriptions s
         INNER JOIN targets t ON t.id = s.target_id
         WHERE s.user_id = ?1 AND t.domain = ?2
         ORDER BY t.type, t.cls, t.member",
    )?;
    let rows = stmt.query_map(params![user_id, domain], |row| {
        Ok(TargetDescriptor {
            target_type: row.get(0)?,
            class: row.get(1)?,
            member: row.get(2)?,
        })
    })?;

    let mut targets = Vec::new();
    for row in rows {
        targets.push(row?);
    }
    Ok(targets)
}

/// Users subscribed to target `target_id`, by username.
pub(crate) fn find_subscribers_on_conn(
    conn: &Connection,
    domain: &str,
    target_id: TargetId,
) -> Result<Vec<User>> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.username, u.email, u.moderator
         FROM subscriptions s
         INNER JOIN users u ON u.id = s.user_id
         INNER JOIN targets t ON t.id = s.target_id
         WHERE s.target_id = ?1 AND t.domain = ?2
         ORDER BY u.username",
    )?;
    let rows = stmt.query_map(params![target_id, domain], scan_user)?;

    let mut users = Vec::new();
    for row in rows {
        users.push(row?);
    }
    Ok(users)
}

impl DomainStore<'_> {
    /// Users to notify about new comments on a target.
    pub fn find_subscribers_impl(&self, target_id: TargetId) -> Result<Vec<User>> {
        let conn = self.store.lock_conn()?;
        find_subscribers_on_conn(&conn, &self.domain, target_id)
    }

    /// Targets `user_id` is subscribed to in this domain.
    pub fn find_targets_by_user_impl(&self, user_id: UserId) -> Result<Vec<TargetDescriptor>> {
        let conn = self.store.lock_conn()?;
        find_targets_by_user_on_conn(&conn, &self.domain, user_id)
    }

    /// Subscribes `user_id` to a target. Subscribing twice is a no-op.
    pub fn add_subscription_impl(&self, user_id: UserId, target: &TargetDescriptor) -> Result<()> {
        self.store.run_immediate(|conn| {
            let target_id = ensure_target_on_conn(conn, &self.domain, target)?;
            conn.execute(
                "INSERT OR IGNORE INTO subscriptions (user_id, target_id) VALUES (?1, ?2)",
                params![user_id, target_id],
            )?;
            Ok(())
        })
    }

    /// Removes a subscription if present.
    pub fn remove_subscription_impl(
        &self,
        user_id: UserId,
        target: &TargetDescriptor,
    ) -> Result<()> {
        let conn = self.store.lock_conn()?;
        if let Some(target_id) = lookup_target_on_conn(&conn, &self.domain, target)? {
            conn.execute(
                "DELETE FROM subscriptions WHERE user_id = ?1 AND target_id = ?2",
                params![user_id, target_id],
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::sqlite::test_support::*;

    #[test]
    fn subscribe_list_unsubscribe() {
        let fx = fixture();
        let docs = fx.docs();

        docs.add_subscription_impl(fx.alice, &panel()).unwrap();
        docs.add_subscription_impl(fx.alice, &panel()).unwrap();
        docs.add_subscription_impl(fx.alice, &grid()).unwrap();
        assert_eq!(docs.find_targets_by_user_impl(fx.alice).unwrap(), vec![panel(), grid()]);
        assert!(docs.find_targets_by_user_impl(fx.bob).unwrap().is_empty());

        docs.remove_subscription_impl(fx.alice, &panel()).unwrap();
        assert_eq!(docs.find_targets_by_user_impl(fx.alice).unwrap(), vec![grid()]);
    }

    #[test]
    fn subscriptions_are_per_domain() {
        let fx = fixture();
        fx.docs().add_subscription_impl(fx.alice, &panel()).unwrap();
        let other = fx.store.domain("touch-2");
        assert!(other.find_targets_by_user_impl(fx.alice).unwrap().is_empty());
        other.remove_subscription_impl(fx.alice, &panel()).unwrap();
    }

    #[test]
    fn subscribers_of_a_target() {
        let fx = fixture();
        let docs = fx.docs();
        docs.add_subscription_impl(fx.bob, &panel()).unwrap();
        docs.add_subscription_impl(fx.alice, &panel()).unwrap();
        docs.add_subscription_impl(fx.moderator, &grid()).unwrap();

        let id = add(&docs, fx.bob, panel(), None, "hello");
        let target_id = docs
            .get_by_id_impl(id, &marginalia_core::filter::ViewOptions::visible())
            .unwrap()
            .target_id;

        let names: Vec<String> = docs
            .find_subscribers_impl(target_id)
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["alice", "bob"]);
        assert_eq!(docs.find_subscribers_impl(target_id).unwrap()[0].email, "alice@example.com");

        // Target ids never leak across domains.
        assert!(fx.store.domain("touch-2").find_subscribers_impl(target_id).unwrap().is_empty());
    }
}
