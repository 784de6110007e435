//! Command handlers, one module per command (or command family).

pub mod comment;
pub mod completion;
pub mod count;
pub mod delete;
pub mod history;
pub mod init;
pub mod move_cmd;
pub mod read;
pub mod recent;
pub mod subscription;
pub mod tag;
pub mod top;
pub mod user;
pub mod vote;
