//! Recent feed, counts and leaderboards for [`DomainStore`].

use std::collections::BTreeMap;

use rusqlite::{Connection, params};

use marginalia_core::comment::{Comment, PageInfo};
use marginalia_core::enums::{RecentOrder, TopUsersSort};
use marginalia_core::filter::{RecentQuery, ViewOptions};
use marginalia_core::stats::{TopTarget, TopUser};
use marginalia_core::target::TargetDescriptor;

use crate::error::Result;
use crate::sqlite::comments::query_comments;
use crate::sqlite::domain::DomainStore;
use crate::sqlite::select::{CommentSelect, Params, comment_source};

// ---------------------------------------------------------------------------
// Filter building
// ---------------------------------------------------------------------------

/// Builds the WHERE clause shared by the recent feed and its count.
///
/// `hide_read` only takes effect when the view carries a read viewer.
fn recent_where(domain: &str, query: &RecentQuery, view: &ViewOptions, p: &mut Params) -> String {
    let mut clauses = vec![
        format!("c.domain = {}", p.bind(domain.to_string())),
        "c.parent_id IS NULL".to_string(),
    ];

    if let Some(user_id) = query.hide_user {
        clauses.push(format!("c.user_id <> {}", p.bind(user_id)));
    }
    if query.hide_read {
        if let Some(reader) = view.read_by {
            clauses.push(format!(
                "NOT EXISTS (SELECT 1 FROM readings rd WHERE rd.user_id = {} AND rd.comment_id = c.id)",
                p.bind(reader)
            ));
        }
    }
    if let Some(username) = &query.username {
        clauses.push(format!("c.username = {}", p.bind(username.clone())));
    }
    if let Some(target_id) = query.target_id {
        clauses.push(format!("c.target_id = {}", p.bind(target_id)));
    }
    if let Some(tagname) = &query.tagname {
        clauses.push(format!(
            "EXISTS (SELECT 1 FROM comment_tags ct INNER JOIN tags tg ON tg.id = ct.tag_id
                     WHERE ct.comment_id = c.id AND tg.tagname = {})",
            p.bind(tagname.trim().to_string())
        ));
    }

    clauses.join(" AND ")
}

fn order_clause(order: RecentOrder) -> &'static str {
    match order {
        RecentOrder::CreatedAt => "c.created_at DESC, c.id DESC",
        RecentOrder::Score => "c.score DESC, c.created_at DESC, c.id DESC",
    }
}

// ---------------------------------------------------------------------------
// Connection-level helpers
// ---------------------------------------------------------------------------

pub(crate) fn count_on_conn(
    conn: &Connection,
    domain: &str,
    query: &RecentQuery,
    view: &ViewOptions,
) -> Result<i64> {
    let mut p = Params::new();
    let where_clause = recent_where(domain, query, view, &mut p);
    let sql = format!(
        "SELECT COUNT(*) FROM {} c WHERE {where_clause}",
        comment_source(view)
    );
    let count = conn.query_row(&sql, p.as_refs().as_slice(), |row| row.get(0))?;
    Ok(count)
}

pub(crate) fn find_recent_on_conn(
    conn: &Connection,
    domain: &str,
    query: &RecentQuery,
    view: &ViewOptions,
) -> Result<Vec<Comment>> {
    let mut p = Params::new();
    let select = CommentSelect::new(view).with_reply_count().render(&mut p);
    let where_clause = recent_where(domain, query, view, &mut p);
    let sql = format!(
        "{select} WHERE {where_clause} ORDER BY {} LIMIT {} OFFSET {}",
        order_clause(query.order_by),
        p.bind(query.limit()),
        p.bind(query.offset())
    );
    let mut comments = query_comments(conn, &sql, &p)?;

    if let Some(last) = comments.last_mut() {
        last.page = Some(PageInfo {
            total_rows: count_on_conn(conn, domain, query, view)?,
            offset: query.offset(),
            limit: query.limit(),
        });
    }
    Ok(comments)
}

/// Number of visible top-level comments per target, keyed by
/// [`TargetDescriptor::key`].
pub(crate) fn counts_per_target_on_conn(
    conn: &Connection,
    domain: &str,
) -> Result<BTreeMap<String, i64>> {
    let mut stmt = conn.prepare(
        "SELECT c.type, c.cls, c.member, COUNT(*)
         FROM visible_comments c
         WHERE c.domain = ?1 AND c.parent_id IS NULL
         GROUP BY c.target_id",
    )?;
    let rows = stmt.query_map(params![domain], |row| {
        let target = TargetDescriptor {
            target_type: row.get(0)?,
            class: row.get(1)?,
            member: row.get(2)?,
        };
        Ok((target.key(), row.get::<_, i64>(3)?))
    })?;

    let mut counts = BTreeMap::new();
    for row in rows {
        let (key, count) = row?;
        counts.insert(key, count);
    }
    Ok(counts)
}

pub(crate) fn get_top_users_on_conn(
    conn: &Connection,
    domain: &str,
    sort_by: TopUsersSort,
) -> Result<Vec<TopUser>> {
    let metric = match sort_by {
        TopUsersSort::Votes => "COALESCE(SUM(c.score), 0)",
        TopUsersSort::Comments => "COUNT(*)",
    };
    let sql = format!(
        "SELECT c.user_id, c.username, c.email, c.moderator, {metric} AS score
         FROM visible_comments c
         WHERE c.domain = ?1
         GROUP BY c.user_id
         ORDER BY score DESC, c.user_id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![domain], |row| {
        Ok(TopUser {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            moderator: row.get(3)?,
            score: row.get(4)?,
        })
    })?;

    let mut users = Vec::new();
    for row in rows {
        users.push(row?);
    }
    Ok(users)
}

pub(crate) fn get_top_targets_on_conn(conn: &Connection, domain: &str) -> Result<Vec<TopTarget>> {
    let mut stmt = conn.prepare(
        "SELECT c.target_id, c.type, c.cls, c.member, COUNT(*) AS score
         FROM visible_comments c
         WHERE c.domain = ?1
         GROUP BY c.target_id
         ORDER BY score DESC, c.target_id ASC",
    )?;
    let rows = stmt.query_map(params![domain], |row| {
        Ok(TopTarget {
            id: row.get(0)?,
            target_type: row.get(1)?,
            class: row.get(2)?,
            member: row.get(3)?,
            score: row.get(4)?,
        })
    })?;

    let mut targets = Vec::new();
    for row in rows {
        targets.push(row?);
    }
    Ok(targets)
}

// ---------------------------------------------------------------------------
// DomainStore methods
// ---------------------------------------------------------------------------

impl DomainStore<'_> {
    /// One page of the recent feed. The last comment carries the paging
    /// envelope.
    pub fn find_recent_impl(&self, query: &RecentQuery, view: &ViewOptions) -> Result<Vec<Comment>> {
        let conn = self.store.lock_conn()?;
        find_recent_on_conn(&conn, &self.domain, query, view)
    }

    pub fn count_impl(&self, query: &RecentQuery, view: &ViewOptions) -> Result<i64> {
        let conn = self.store.lock_conn()?;
        count_on_conn(&conn, &self.domain, query, view)
    }

    pub fn counts_per_target_impl(&self) -> Result<BTreeMap<String, i64>> {
        let conn = self.store.lock_conn()?;
        counts_per_target_on_conn(&conn, &self.domain)
    }

    pub fn get_top_users_impl(&self, sort_by: TopUsersSort) -> Result<Vec<TopUser>> {
        let conn = self.store.lock_conn()?;
        get_top_users_on_conn(&conn, &self.domain, sort_by)
    }

    pub fn get_top_targets_impl(&self) -> Result<Vec<TopTarget>> {
        let conn = self.store.lock_conn()?;
        get_top_targets_on_conn(&conn, &self.domain)
    }
}

#[cfg(test)]
mod tests {
    use marginalia_core::comment::{DeleteAction, TagAction};
    use marginalia_core::vote::{Vote, VoteValue};
    use pretty_assertions::assert_eq;

    use crate::sqlite::test_support::*;

    use super::*;

    fn ids(comments: &[Comment]) -> Vec<i64> {
        comments.iter().map(|c| c.id).collect()
    }

    #[test]
    fn recent_is_newest_first_without_replies() {
        let fx = fixture();
        let docs = fx.docs();
        let a = add(&docs, fx.alice, panel(), None, "a");
        add(&docs, fx.bob, panel(), Some(a), "reply");
        let b = add(&docs, fx.bob, grid(), None, "b");

        let recent = docs
            .find_recent_impl(&RecentQuery::default(), &ViewOptions::visible())
            .unwrap();
        assert_eq!(ids(&recent), vec![b, a]);
        assert_eq!(recent[1].reply_count, Some(1));
    }

    #[test]
    fn last_row_carries_page_info() {
        let fx = fixture();
        let docs = fx.docs();
        for i in 0..5 {
            add(&docs, fx.alice, panel(), None, &format!("c{i}"));
        }

        let query = RecentQuery {
            limit: Some(2),
            offset: Some(1),
            ..RecentQuery::default()
        };
        let page = docs.find_recent_impl(&query, &ViewOptions::visible()).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].page, None);
        assert_eq!(
            page[1].page,
            Some(PageInfo {
                total_rows: 5,
                offset: 1,
                limit: 2
            })
        );
    }

    #[test]
    fn empty_page_has_no_envelope() {
        let fx = fixture();
        let page = fx
            .docs()
            .find_recent_impl(&RecentQuery::default(), &ViewOptions::visible())
            .unwrap();
        assert!(page.is_empty());
    }

    #[test]
    fn order_by_score() {
        let fx = fixture();
        let docs = fx.docs();
        let a = add(&docs, fx.alice, panel(), None, "a");
        let b = add(&docs, fx.alice, panel(), None, "b");
        docs.vote_impl(&Vote {
            user_id: fx.bob,
            comment_id: a,
            value: VoteValue::Up,
        })
        .unwrap();

        let query = RecentQuery {
            order_by: RecentOrder::Score,
            ..RecentQuery::default()
        };
        let recent = docs.find_recent_impl(&query, &ViewOptions::visible()).unwrap();
        assert_eq!(ids(&recent), vec![a, b]);
    }

    #[test]
    fn hide_user_and_username_filters() {
        let fx = fixture();
        let docs = fx.docs();
        let a = add(&docs, fx.alice, panel(), None, "a");
        let b = add(&docs, fx.bob, panel(), None, "b");
        let view = ViewOptions::visible();

        let query = RecentQuery {
            hide_user: Some(fx.alice),
            ..RecentQuery::default()
        };
        assert_eq!(ids(&docs.find_recent_impl(&query, &view).unwrap()), vec![b]);

        let query = RecentQuery {
            username: Some("alice".into()),
            ..RecentQuery::default()
        };
        assert_eq!(ids(&docs.find_recent_impl(&query, &view).unwrap()), vec![a]);
        assert_eq!(docs.count_impl(&query, &view).unwrap(), 1);
    }

    #[test]
    fn hide_read_excludes_read_comments() {
        let fx = fixture();
        let docs = fx.docs();
        let a = add(&docs, fx.alice, panel(), None, "a");
        let b = add(&docs, fx.bob, panel(), None, "b");
        docs.mark_read_impl(fx.moderator, a).unwrap();

        let query = RecentQuery {
            hide_read: true,
            ..RecentQuery::default()
        };
        let view = ViewOptions::visible().read_by(fx.moderator);
        let recent = docs.find_recent_impl(&query, &view).unwrap();
        assert_eq!(ids(&recent), vec![b]);
        assert_eq!(recent[0].read, Some(false));

        // Without a read viewer there is nothing to hide.
        let all = docs.find_recent_impl(&query, &ViewOptions::visible()).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn tag_filter_matches_whole_names() {
        let fx = fixture();
        let docs = fx.docs();
        let a = add(&docs, fx.alice, panel(), None, "a");
        let b = add(&docs, fx.bob, panel(), None, "b");
        for (id, name) in [(a, "betatest"), (b, "beta")] {
            docs.add_tag_impl(&TagAction {
                comment_id: id,
                user_id: fx.moderator,
                tagname: name.into(),
            })
            .unwrap();
        }

        let query = RecentQuery {
            tagname: Some("beta".into()),
            ..RecentQuery::default()
        };
        let recent = docs.find_recent_impl(&query, &ViewOptions::visible()).unwrap();
        assert_eq!(ids(&recent), vec![b]);
    }

    #[test]
    fn target_filter_and_counts() {
        let fx = fixture();
        let docs = fx.docs();
        let a = add(&docs, fx.alice, panel(), None, "a");
        add(&docs, fx.bob, panel(), Some(a), "reply");
        add(&docs, fx.bob, panel(), None, "b");
        let g = add(&docs, fx.bob, grid(), None, "g");
        let hidden = add(&docs, fx.bob, grid(), None, "gone");
        docs.set_deleted_impl(&DeleteAction {
            id: hidden,
            user_id: fx.moderator,
            deleted: true,
        })
        .unwrap();

        let grid_id = docs.lookup_target_impl(&grid()).unwrap();
        let query = RecentQuery {
            target_id: grid_id,
            ..RecentQuery::default()
        };
        assert_eq!(ids(&docs.find_recent_impl(&query, &ViewOptions::visible()).unwrap()), vec![g]);
        assert_eq!(docs.count_impl(&query, &ViewOptions::with_deleted()).unwrap(), 2);

        let counts = docs.counts_per_target_impl().unwrap();
        assert_eq!(counts.get(&panel().key()), Some(&2));
        assert_eq!(counts.get(&grid().key()), Some(&1));
    }

    #[test]
    fn top_users_by_votes_and_comments() {
        let fx = fixture();
        let docs = fx.docs();
        let a = add(&docs, fx.alice, panel(), None, "a");
        add(&docs, fx.bob, panel(), None, "b1");
        add(&docs, fx.bob, panel(), None, "b2");
        docs.vote_impl(&Vote {
            user_id: fx.moderator,
            comment_id: a,
            value: VoteValue::Up,
        })
        .unwrap();

        let by_votes = docs.get_top_users_impl(TopUsersSort::Votes).unwrap();
        let names: Vec<_> = by_votes.iter().map(|u| (u.username.as_str(), u.score)).collect();
        assert_eq!(names, vec![("alice", 1), ("bob", 0)]);

        let by_comments = docs.get_top_users_impl(TopUsersSort::Comments).unwrap();
        let names: Vec<_> = by_comments.iter().map(|u| (u.username.as_str(), u.score)).collect();
        assert_eq!(names, vec![("bob", 2), ("alice", 1)]);
    }

    #[test]
    fn top_targets_by_comment_count() {
        let fx = fixture();
        let docs = fx.docs();
        add(&docs, fx.alice, panel(), None, "a");
        add(&docs, fx.alice, grid(), None, "b");
        add(&docs, fx.bob, grid(), None, "c");

        let top = docs.get_top_targets_impl().unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].class, "Ext.grid.Panel");
        assert_eq!(top[0].member, "cfg-columns");
        assert_eq!(top[0].score, 2);
        assert_eq!(top[1].score, 1);
    }
}
