//! Notification of new comments.
//!
//! Delivery happens after the comment is committed; a failing [`Mailer`] is
//! logged by the caller and never undoes the write.

use tracing::{debug, info};

use marginalia_core::comment::Comment;

/// Errors a [`Mailer`] may report.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport failed: {0}")]
    Transport(String),

    #[error("invalid recipient: {0}")]
    Recipient(String),
}

/// Sends notifications about a newly added comment.
pub trait Mailer: Send + Sync {
    /// `subscribers` holds the addresses of users following the comment's
    /// target, the author excluded.
    fn notify(
        &self,
        comment: &Comment,
        thread_url: &str,
        subscribers: &[String],
    ) -> Result<(), MailError>;
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMailer;

impl Mailer for NoopMailer {
    fn notify(&self, _: &Comment, _: &str, _: &[String]) -> Result<(), MailError> {
        Ok(())
    }
}

/// Writes notifications to the log instead of an SMTP relay: one message to
/// the mailing list, if configured, and one per subscriber.
#[derive(Debug, Clone)]
pub struct LogMailer {
    sender: String,
    mailing_list: Option<String>,
}

impl LogMailer {
    pub fn new(sender: impl Into<String>, mailing_list: Option<String>) -> Self {
        Self {
            sender: sender.into(),
            mailing_list,
        }
    }
}

impl Mailer for LogMailer {
    fn notify(
        &self,
        comment: &Comment,
        thread_url: &str,
        subscribers: &[String],
    ) -> Result<(), MailError> {
        let recipients: Vec<&str> = self
            .mailing_list
            .iter()
            .map(String::as_str)
            .chain(subscribers.iter().map(String::as_str))
            .collect();
        if let Some(bad) = recipients.iter().find(|to| !to.contains('@')) {
            return Err(MailError::Recipient(bad.to_string()));
        }
        if recipients.is_empty() {
            debug!(id = comment.id, "no recipients for comment notification");
            return Ok(());
        }

        let subject = subject(comment);
        let body = body(comment, thread_url);
        for to in recipients {
            info!(from = %self.sender, to, %subject, %body, "comment notification");
        }
        Ok(())
    }
}

/// Subject line of a notification.
pub fn subject(comment: &Comment) -> String {
    format!("Comment on {}", comment.target)
}

/// Plain-text body of a notification.
pub fn body(comment: &Comment, thread_url: &str) -> String {
    format!(
        "{} wrote:\n\n{}\n\n--\nOriginal thread: {thread_url}\n",
        comment.username, comment.content
    )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use marginalia_core::target::TargetDescriptor;

    use super::*;

    fn comment() -> Comment {
        Comment {
            id: 1,
            domain: "ext-4".into(),
            target_id: 1,
            target: TargetDescriptor::new("guide", "getting_started", None),
            parent_id: None,
            user_id: 1,
            username: "alice".into(),
            email: String::new(),
            moderator: false,
            content: "Nice guide".into(),
            content_html: String::new(),
            created_at: Utc::now(),
            deleted: false,
            score: 0,
            vote_dir: None,
            read: None,
            reply_count: None,
            tags: Vec::new(),
            page: None,
        }
    }

    #[test]
    fn message_text() {
        let c = comment();
        assert_eq!(subject(&c), "Comment on guide getting_started");
        let b = body(&c, "http://docs/#!/guide/getting_started");
        assert!(b.starts_with("alice wrote:"));
        assert!(b.contains("Nice guide"));
        assert!(b.ends_with("Original thread: http://docs/#!/guide/getting_started\n"));
    }

    #[test]
    fn log_mailer_checks_addresses() {
        let ok = LogMailer::new("noreply@docs", Some("list@docs".into()));
        assert!(ok.notify(&comment(), "url", &[]).is_ok());
        assert!(ok.notify(&comment(), "url", &["bob@example.com".into()]).is_ok());

        let bad = LogMailer::new("noreply@docs", Some("nowhere".into()));
        assert!(matches!(bad.notify(&comment(), "url", &[]), Err(MailError::Recipient(_))));

        let no_list = LogMailer::new("noreply@docs", None);
        assert!(no_list.notify(&comment(), "url", &[]).is_ok());
        assert!(matches!(
            no_list.notify(&comment(), "url", &["bob".into()]),
            Err(MailError::Recipient(to)) if to == "bob"
        ));
        assert!(NoopMailer.notify(&comment(), "url", &["bob".into()]).is_ok());
    }
}
