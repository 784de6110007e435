//! Output formatting helpers for the `marginalia` CLI.
//!
//! Provides JSON output and human-readable comment display in both compact
//! (one-liner) and detailed (multi-line) formats.

use std::io::{self, Write};

use serde::Serialize;

use marginalia_service::CommentJson;

/// Print a value as pretty-printed JSON to stdout.
///
/// Terminates the process with exit code 1 if serialization fails.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            // Ignore broken pipe errors (e.g., piped to `head`)
            let _ = writeln!(handle, "{}", json);
        }
        Err(e) => {
            eprintln!("Error: failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

/// Renders a wire-form target as `class Ext.Panel#cfg-title`.
pub fn format_target(target: &[String; 3]) -> String {
    let [target_type, class, member] = target;
    if member.is_empty() {
        format!("{target_type} {class}")
    } else {
        format!("{target_type} {class}#{member}")
    }
}

/// One-line summary: id, score, author, flags and the first line of text.
pub fn format_comment_line(c: &CommentJson) -> String {
    let mut flags = Vec::new();
    if c.up_vote {
        flags.push("+1");
    }
    if c.down_vote {
        flags.push("-1");
    }
    if c.read == Some(false) {
        flags.push("new");
    }
    if c.deleted {
        flags.push("deleted");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", "))
    };
    let replies = match c.reply_count {
        Some(n) if n > 0 => format!(" ({n} replies)"),
        _ => String::new(),
    };

    format!(
        "#{:<5} {:>+4}  {:<12} {}{}{}",
        c.id,
        c.score,
        c.author,
        first_line(&c.content),
        replies,
        flags
    )
}

/// Print a list of comments, one per line.
pub fn print_comment_list(comments: &[CommentJson]) {
    for c in comments {
        println!("{}", format_comment_line(c));
    }
}

/// Print a comment in full.
pub fn print_comment_detail(c: &CommentJson) {
    println!("Comment #{}", c.id);
    println!("  Target:  {}", format_target(&c.target));
    println!(
        "  Author:  {}{}",
        c.author,
        if c.moderator { " (moderator)" } else { "" }
    );
    println!("  Created: {}", c.created_at);
    println!("  Score:   {}", c.score);
    if let Some(parent) = c.parent_id {
        println!("  Reply to: #{parent}");
    }
    if !c.tags.is_empty() {
        println!("  Tags:    {}", c.tags.join(", "));
    }
    if c.deleted {
        println!("  (deleted)");
    }
    println!();
    for line in c.content.lines() {
        println!("    {line}");
    }
}

fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment() -> CommentJson {
        CommentJson {
            id: 7,
            user_id: 1,
            author: "alice".into(),
            target: ["class".into(), "Ext.Panel".into(), String::new()],
            content: "Hello\nworld".into(),
            content_html: "<p>Hello<br>world</p>".into(),
            created_at: "2024-01-01T00:00:00.000Z".into(),
            score: 2,
            up_vote: true,
            down_vote: false,
            read: Some(false),
            tags: vec![],
            moderator: false,
            email_hash: String::new(),
            parent_id: None,
            reply_count: Some(3),
            deleted: false,
            total_rows: None,
            offset: None,
            limit: None,
        }
    }

    #[test]
    fn target_with_and_without_member() {
        assert_eq!(
            format_target(&["class".into(), "Ext.Panel".into(), String::new()]),
            "class Ext.Panel"
        );
        assert_eq!(
            format_target(&["class".into(), "Ext".into(), "method-define".into()]),
            "class Ext#method-define"
        );
    }

    #[test]
    fn comment_line_shows_first_line_and_flags() {
        let line = format_comment_line(&comment());
        assert!(line.starts_with("#7"));
        assert!(line.contains("alice"));
        assert!(line.contains("Hello"));
        assert!(!line.contains("world"));
        assert!(line.contains("(3 replies)"));
        assert!(line.ends_with("[+1, new]"));
    }
}
