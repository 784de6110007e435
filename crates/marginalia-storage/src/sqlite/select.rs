//! Shared SELECT building and row scanning for comment queries.
//!
//! Every comment read goes through [`CommentSelect`], which picks the
//! visibility view and appends the viewer-sensitive projections requested by
//! a [`ViewOptions`].

use chrono::{DateTime, Utc};
use rusqlite::Row;
use rusqlite::types::ToSql;

use marginalia_core::comment::Comment;
use marginalia_core::filter::ViewOptions;
use marginalia_core::target::TargetDescriptor;
use marginalia_core::vote::VoteValue;

/// Columns of the comment views, aliased so rows can be scanned by name.
const COMMENT_COLUMNS: &str = r#"
    c.id AS id, c.domain AS domain, c.target_id AS target_id,
    c.type AS type, c.cls AS cls, c.member AS member,
    c.parent_id AS parent_id, c.user_id AS user_id,
    c.username AS username, c.email AS email, c.moderator AS moderator,
    c.content AS content, c.content_html AS content_html,
    c.created_at AS created_at, c.deleted AS deleted,
    c.score AS score, c.tags AS tags
"#;

// ---------------------------------------------------------------------------
// Positional parameters
// ---------------------------------------------------------------------------

/// Collects bound values and hands out numbered `?N` placeholders.
#[derive(Default)]
pub(crate) struct Params {
    values: Vec<Box<dyn ToSql>>,
}

impl Params {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Binds a value and returns its placeholder.
    pub(crate) fn bind(&mut self, value: impl ToSql + 'static) -> String {
        self.values.push(Box::new(value));
        format!("?{}", self.values.len())
    }

    pub(crate) fn as_refs(&self) -> Vec<&dyn ToSql> {
        self.values.iter().map(|v| v.as_ref()).collect()
    }
}

// ---------------------------------------------------------------------------
// SELECT list
// ---------------------------------------------------------------------------

/// The `SELECT ... FROM <view> c` prefix for a comment query.
pub(crate) struct CommentSelect<'a> {
    view: &'a ViewOptions,
    with_replies: bool,
}

impl<'a> CommentSelect<'a> {
    pub(crate) fn new(view: &'a ViewOptions) -> Self {
        Self {
            view,
            with_replies: false,
        }
    }

    /// Adds a correlated `reply_count` column.
    pub(crate) fn with_reply_count(mut self) -> Self {
        self.with_replies = true;
        self
    }

    /// Renders the SELECT list and FROM clause, binding viewer ids into
    /// `params`.
    pub(crate) fn render(&self, params: &mut Params) -> String {
        let vote_dir = match self.view.vote_dir_by {
            Some(user_id) => format!(
                "(SELECT v.value FROM votes v WHERE v.user_id = {} AND v.comment_id = c.id)",
                params.bind(user_id)
            ),
            None => "NULL".to_string(),
        };
        let read = match self.view.read_by {
            Some(user_id) => format!(
                "EXISTS (SELECT 1 FROM readings rd WHERE rd.user_id = {} AND rd.comment_id = c.id)",
                params.bind(user_id)
            ),
            None => "NULL".to_string(),
        };
        let reply_count = if self.with_replies {
            format!(
                "(SELECT COUNT(*) FROM comments r WHERE r.parent_id = c.id{})",
                if self.view.show_deleted { "" } else { " AND r.deleted = 0" }
            )
        } else {
            "NULL".to_string()
        };

        format!(
            "SELECT {COMMENT_COLUMNS}, {vote_dir} AS vote_dir, {read} AS is_read, \
             {reply_count} AS reply_count FROM {} c",
            comment_source(self.view)
        )
    }
}

/// The comment view matching the visibility mode.
pub(crate) fn comment_source(view: &ViewOptions) -> &'static str {
    if view.show_deleted {
        "full_comments"
    } else {
        "visible_comments"
    }
}

// ---------------------------------------------------------------------------
// Row scanning
// ---------------------------------------------------------------------------

/// Deserialises a row produced by [`CommentSelect`] into a [`Comment`].
pub(crate) fn scan_comment(row: &Row<'_>) -> rusqlite::Result<Comment> {
    let created_at_str: String = row.get("created_at")?;
    let tags_str: Option<String> = row.get("tags")?;
    let vote_dir: Option<i32> = row.get("vote_dir")?;

    Ok(Comment {
        id: row.get("id")?,
        domain: row.get("domain")?,
        target_id: row.get("target_id")?,
        target: TargetDescriptor {
            target_type: row.get("type")?,
            class: row.get("cls")?,
            member: row.get("member")?,
        },
        parent_id: row.get("parent_id")?,
        user_id: row.get("user_id")?,
        username: row.get("username")?,
        email: row.get("email")?,
        moderator: row.get("moderator")?,
        content: row.get("content")?,
        content_html: row.get("content_html")?,
        created_at: parse_datetime(&created_at_str),
        deleted: row.get("deleted")?,
        score: row.get("score")?,
        vote_dir: vote_dir.and_then(|v| VoteValue::try_from(v).ok()),
        read: row.get("is_read")?,
        reply_count: row.get("reply_count")?,
        tags: split_tags(tags_str.as_deref()),
        page: None,
    })
}

/// Splits the tab-joined tag column into a sorted, de-duplicated list.
pub(crate) fn split_tags(tags: Option<&str>) -> Vec<String> {
    let mut out: Vec<String> = tags
        .unwrap_or_default()
        .split('\t')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    out.sort();
    out.dedup();
    out
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// Formats a timestamp as stored in SQLite (millisecond precision, UTC).
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Parses an ISO 8601 TEXT string from SQLite into a `DateTime<Utc>`.
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    s.parse::<DateTime<Utc>>().unwrap_or_else(|_| {
        chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.fZ")
            .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
            .map(|ndt| ndt.and_utc())
            .unwrap_or_default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn params_number_placeholders() {
        let mut p = Params::new();
        assert_eq!(p.bind(1_i64), "?1");
        assert_eq!(p.bind("x".to_string()), "?2");
        assert_eq!(p.as_refs().len(), 2);
    }

    #[test]
    fn render_picks_visibility_view() {
        let mut p = Params::new();
        let visible = CommentSelect::new(&ViewOptions::visible()).render(&mut p);
        assert!(visible.ends_with("FROM visible_comments c"));
        assert!(p.as_refs().is_empty());

        let view = ViewOptions::with_deleted().vote_dir_by(3).read_by(3);
        let all = CommentSelect::new(&view).with_reply_count().render(&mut p);
        assert!(all.ends_with("FROM full_comments c"));
        assert!(all.contains("r.parent_id = c.id)"));
        assert_eq!(p.as_refs().len(), 2);
    }

    #[test]
    fn tags_are_sorted_and_unique() {
        assert_eq!(split_tags(Some("beta\talpha\tbeta")), vec!["alpha", "beta"]);
        assert!(split_tags(None).is_empty());
        assert!(split_tags(Some("")).is_empty());
    }

    #[test]
    fn datetime_roundtrip() {
        let s = "2024-03-01T10:20:30.123Z";
        assert_eq!(format_datetime(&parse_datetime(s)), s);
        assert_eq!(
            format_datetime(&parse_datetime("2024-03-01 10:20:30")),
            "2024-03-01T10:20:30.000Z"
        );
    }
}
