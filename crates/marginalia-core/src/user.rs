//! Comment authors.

use serde::{Deserialize, Serialize};

use crate::UserId;

/// A registered user. Authentication lives outside the engine; only the
/// fields needed for projection and ranking are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub moderator: bool,
}

/// Input for registering a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub moderator: bool,
}
