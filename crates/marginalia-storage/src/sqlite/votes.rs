//! Vote ledger operations for [`DomainStore`].

use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use marginalia_core::filter::ViewOptions;
use marginalia_core::vote::{LedgerAction, Vote, VoteOutcome, VoteTransition, VoteValue};
use marginalia_core::{CommentId, UserId};

use crate::error::Result;
use crate::sqlite::comments::require_comment_on_conn;
use crate::sqlite::domain::DomainStore;

// ---------------------------------------------------------------------------
// Connection-level helpers
// ---------------------------------------------------------------------------

/// The ledger state for `(user_id, comment_id)`.
pub(crate) fn current_vote_on_conn(
    conn: &Connection,
    user_id: UserId,
    comment_id: CommentId,
) -> Result<Option<VoteValue>> {
    let value: Option<i32> = conn
        .query_row(
            "SELECT value FROM votes WHERE user_id = ?1 AND comment_id = ?2",
            params![user_id, comment_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value.and_then(|v| VoteValue::try_from(v).ok()))
}

/// Net score of a comment.
pub(crate) fn score_on_conn(conn: &Connection, comment_id: CommentId) -> Result<i64> {
    let score = conn.query_row(
        "SELECT COALESCE(SUM(value), 0) FROM votes WHERE comment_id = ?1",
        params![comment_id],
        |row| row.get(0),
    )?;
    Ok(score)
}

/// Applies a vote against the current ledger state. Must run inside a
/// transaction holding the write lock.
pub(crate) fn vote_on_conn(conn: &Connection, domain: &str, vote: &Vote) -> Result<VoteOutcome> {
    require_comment_on_conn(conn, domain, vote.comment_id, &ViewOptions::visible())?;

    let current = current_vote_on_conn(conn, vote.user_id, vote.comment_id)?;
    let transition = VoteTransition::apply(current, vote.value);

    match transition.action {
        LedgerAction::Keep => {}
        LedgerAction::Insert(value) => {
            conn.execute(
                "INSERT INTO votes (user_id, comment_id, value) VALUES (?1, ?2, ?3)",
                params![vote.user_id, vote.comment_id, value.as_i32()],
            )?;
        }
        LedgerAction::Retract => {
            conn.execute(
                "DELETE FROM votes WHERE user_id = ?1 AND comment_id = ?2",
                params![vote.user_id, vote.comment_id],
            )?;
        }
    }

    let score = score_on_conn(conn, vote.comment_id)?;
    debug!(
        comment_id = vote.comment_id,
        user_id = vote.user_id,
        delta = transition.delta,
        score,
        "applied vote"
    );
    Ok(VoteOutcome {
        direction: transition.resulting,
        score,
    })
}

// ---------------------------------------------------------------------------
// DomainStore methods
// ---------------------------------------------------------------------------

impl DomainStore<'_> {
    /// Casts a vote, returning the vote effectively cast (`None` when the
    /// ledger was left unchanged or retracted) and the new score.
    pub fn vote_impl(&self, vote: &Vote) -> Result<VoteOutcome> {
        self.store
            .run_immediate(|conn| vote_on_conn(conn, &self.domain, vote))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::sqlite::test_support::*;

    use super::*;

    fn vote(docs: &DomainStore<'_>, user_id: UserId, comment_id: CommentId, value: VoteValue) -> VoteOutcome {
        docs.vote_impl(&Vote {
            user_id,
            comment_id,
            value,
        })
        .unwrap()
    }

    #[test]
    fn up_up_down_down_sequence() {
        let fx = fixture();
        let docs = fx.docs();
        let id = add(&docs, fx.alice, panel(), None, "vote on me");

        let steps = [
            (VoteValue::Up, Some(VoteValue::Up), 1),
            (VoteValue::Up, None, 1),
            (VoteValue::Down, None, 0),
            (VoteValue::Down, Some(VoteValue::Down), -1),
        ];
        for (value, direction, score) in steps {
            let outcome = vote(&docs, fx.bob, id, value);
            assert_eq!(outcome, VoteOutcome { direction, score });
        }
    }

    #[test]
    fn ledger_never_holds_two_rows() {
        let fx = fixture();
        let docs = fx.docs();
        let id = add(&docs, fx.alice, panel(), None, "x");
        for value in [VoteValue::Up, VoteValue::Up, VoteValue::Down, VoteValue::Down, VoteValue::Down] {
            vote(&docs, fx.bob, id, value);
        }

        let conn = fx.store.lock_conn().unwrap();
        let rows: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM votes WHERE comment_id = ?1",
                params![id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(rows, 1);
        assert_eq!(current_vote_on_conn(&conn, fx.bob, id).unwrap(), Some(VoteValue::Down));
    }

    #[test]
    fn score_sums_all_voters() {
        let fx = fixture();
        let docs = fx.docs();
        let id = add(&docs, fx.alice, panel(), None, "x");
        vote(&docs, fx.bob, id, VoteValue::Up);
        let outcome = vote(&docs, fx.moderator, id, VoteValue::Up);
        assert_eq!(outcome.score, 2);

        let c = docs
            .get_by_id_impl(id, &ViewOptions::visible().vote_dir_by(fx.bob))
            .unwrap();
        assert_eq!(c.score, 2);
        assert_eq!(c.vote_dir, Some(VoteValue::Up));

        let c = docs
            .get_by_id_impl(id, &ViewOptions::visible().vote_dir_by(fx.alice))
            .unwrap();
        assert_eq!(c.vote_dir, None);
    }

    #[test]
    fn voting_on_deleted_comment_is_not_found() {
        let fx = fixture();
        let docs = fx.docs();
        let id = add(&docs, fx.alice, panel(), None, "x");
        docs.set_deleted_impl(&marginalia_core::comment::DeleteAction {
            id,
            user_id: fx.moderator,
            deleted: true,
        })
        .unwrap();

        let err = docs
            .vote_impl(&Vote {
                user_id: fx.bob,
                comment_id: id,
                value: VoteValue::Up,
            })
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn racing_connections_cast_one_vote() {
        use std::sync::Barrier;
        use std::thread;

        use crate::sqlite::SqliteStore;

        const WRITERS: usize = 8;
        const ROUNDS: usize = 5;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("votes.db");
        let setup = SqliteStore::open(&path).unwrap();
        let alice = setup.create_user_impl(&user("alice", false)).unwrap();
        let bob = setup.create_user_impl(&user("bob", false)).unwrap();

        // One connection per writer, all on the same file.
        let writers: Vec<SqliteStore> = (0..WRITERS)
            .map(|_| SqliteStore::open(&path).unwrap())
            .collect();

        for round in 0..ROUNDS {
            let id = add(&setup.domain(DOMAIN), alice, panel(), None, &format!("round {round}"));
            let barrier = Barrier::new(WRITERS);

            let results: Vec<std::result::Result<VoteOutcome, String>> = thread::scope(|s| {
                let handles: Vec<_> = writers
                    .iter()
                    .map(|store| {
                        let barrier = &barrier;
                        s.spawn(move || {
                            barrier.wait();
                            store
                                .domain(DOMAIN)
                                .vote_impl(&Vote {
                                    user_id: bob,
                                    comment_id: id,
                                    value: VoteValue::Up,
                                })
                                .map_err(|e| e.to_string())
                        })
                    })
                    .collect();
                handles.into_iter().map(|h| h.join().unwrap()).collect()
            });

            let errors: Vec<_> = results.iter().filter_map(|r| r.as_ref().err()).collect();
            assert!(errors.is_empty(), "round {round}: {errors:?}");

            let outcomes: Vec<VoteOutcome> = results.into_iter().map(|r| r.unwrap()).collect();
            let cast = outcomes
                .iter()
                .filter(|o| o.direction == Some(VoteValue::Up))
                .count();
            assert_eq!(cast, 1, "round {round}: {outcomes:?}");
            assert!(outcomes.iter().all(|o| o.score == 1));

            let conn = setup.lock_conn().unwrap();
            let rows: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM votes WHERE comment_id = ?1",
                    params![id],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(rows, 1);
            assert_eq!(score_on_conn(&conn, id).unwrap(), 1);
        }
    }
}
