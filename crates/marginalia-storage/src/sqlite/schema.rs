//! DDL statements for the SQLite schema.
//!
//! Timestamps are stored as TEXT in ISO 8601 format with millisecond
//! precision. Booleans are stored as INTEGER (0/1).

/// Current schema version. Bumped whenever the DDL changes.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Core DDL statements executed during `init_schema`.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    // -- Users ---------------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        username   TEXT NOT NULL UNIQUE,
        email      TEXT NOT NULL DEFAULT '',
        moderator  INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    )
    "#,
    // -- Targets -------------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS targets (
        id     INTEGER PRIMARY KEY AUTOINCREMENT,
        domain TEXT NOT NULL,
        type   TEXT NOT NULL,
        cls    TEXT NOT NULL,
        member TEXT NOT NULL DEFAULT '',
        UNIQUE (domain, type, cls, member)
    )
    "#,
    // -- Comments ------------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS comments (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        target_id    INTEGER NOT NULL,
        parent_id    INTEGER,
        user_id      INTEGER NOT NULL,
        content      TEXT NOT NULL,
        content_html TEXT NOT NULL,
        created_at   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        deleted      INTEGER NOT NULL DEFAULT 0,
        FOREIGN KEY (target_id) REFERENCES targets(id),
        FOREIGN KEY (parent_id) REFERENCES comments(id),
        FOREIGN KEY (user_id) REFERENCES users(id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_comments_target ON comments(target_id)",
    "CREATE INDEX IF NOT EXISTS idx_comments_parent ON comments(parent_id)",
    "CREATE INDEX IF NOT EXISTS idx_comments_user ON comments(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_comments_created_at ON comments(created_at)",
    // -- Votes (current state, one row per user and comment) -----------------
    r#"
    CREATE TABLE IF NOT EXISTS votes (
        user_id    INTEGER NOT NULL,
        comment_id INTEGER NOT NULL,
        value      INTEGER NOT NULL CHECK (value IN (1, -1)),
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        PRIMARY KEY (user_id, comment_id),
        FOREIGN KEY (user_id) REFERENCES users(id),
        FOREIGN KEY (comment_id) REFERENCES comments(id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_votes_comment ON votes(comment_id)",
    // -- Readings ------------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS readings (
        user_id    INTEGER NOT NULL,
        comment_id INTEGER NOT NULL,
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        PRIMARY KEY (user_id, comment_id),
        FOREIGN KEY (user_id) REFERENCES users(id),
        FOREIGN KEY (comment_id) REFERENCES comments(id)
    )
    "#,
    // -- Update log (append-only) --------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS updates (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        comment_id INTEGER NOT NULL,
        user_id    INTEGER NOT NULL,
        action     TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        FOREIGN KEY (comment_id) REFERENCES comments(id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_updates_comment ON updates(comment_id)",
    // -- Tags ----------------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS tags (
        id      INTEGER PRIMARY KEY AUTOINCREMENT,
        domain  TEXT NOT NULL,
        tagname TEXT NOT NULL,
        UNIQUE (domain, tagname)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS comment_tags (
        comment_id INTEGER NOT NULL,
        tag_id     INTEGER NOT NULL,
        user_id    INTEGER NOT NULL,
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        PRIMARY KEY (comment_id, tag_id),
        FOREIGN KEY (comment_id) REFERENCES comments(id),
        FOREIGN KEY (tag_id) REFERENCES tags(id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_comment_tags_tag ON comment_tags(tag_id)",
    // -- Subscriptions -------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS subscriptions (
        user_id    INTEGER NOT NULL,
        target_id  INTEGER NOT NULL,
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        PRIMARY KEY (user_id, target_id),
        FOREIGN KEY (user_id) REFERENCES users(id),
        FOREIGN KEY (target_id) REFERENCES targets(id)
    )
    "#,
    // -- Comment views -------------------------------------------------------
    // Joins author and target, derives score from the vote ledger and the
    // tab-joined tag list.
    r#"
    CREATE VIEW IF NOT EXISTS full_comments AS
    SELECT
        c.id, t.domain, c.target_id, t.type, t.cls, t.member,
        c.parent_id, c.user_id, u.username, u.email, u.moderator,
        c.content, c.content_html, c.created_at, c.deleted,
        COALESCE((SELECT SUM(v.value) FROM votes v WHERE v.comment_id = c.id), 0) AS score,
        (SELECT group_concat(tg.tagname, char(9))
           FROM comment_tags ct
           INNER JOIN tags tg ON tg.id = ct.tag_id
          WHERE ct.comment_id = c.id) AS tags
    FROM comments c
    INNER JOIN targets t ON t.id = c.target_id
    INNER JOIN users u ON u.id = c.user_id
    "#,
    r#"
    CREATE VIEW IF NOT EXISTS visible_comments AS
    SELECT * FROM full_comments WHERE deleted = 0
    "#,
    // -- Metadata table ------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS metadata (
        key   TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
    "#,
];

