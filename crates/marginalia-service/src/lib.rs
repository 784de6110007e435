//! Request orchestration for the marginalia comment engine.
//!
//! A [`Request`] binds the caller's [`Session`] and a domain-scoped store,
//! enforces role rules, sequences multi-step workflows and converts results
//! into the JSON response schema of the [`adapter`] module.

pub mod adapter;
pub mod error;
pub mod mailer;
pub mod request;
pub mod session;

pub use adapter::{CommentJson, UserJson};
pub use error::{Result, ServiceError};
pub use mailer::{LogMailer, MailError, Mailer, NoopMailer};
pub use request::{Request, RequestOptions, VoteResponse, domain_name};
pub use session::{Session, SessionUser};
