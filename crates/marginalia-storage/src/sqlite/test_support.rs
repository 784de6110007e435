//! Fixtures shared by the storage unit tests.

use marginalia_core::comment::NewComment;
use marginalia_core::target::TargetDescriptor;
use marginalia_core::user::NewUser;
use marginalia_core::{CommentId, UserId};

use crate::sqlite::{DomainStore, SqliteStore};

pub(crate) const DOMAIN: &str = "ext-js-4";

pub(crate) struct Fixture {
    pub store: SqliteStore,
    pub alice: UserId,
    pub bob: UserId,
    pub moderator: UserId,
}

impl Fixture {
    pub fn docs(&self) -> DomainStore<'_> {
        self.store.domain(DOMAIN)
    }
}

pub(crate) fn fixture() -> Fixture {
    let store = SqliteStore::open_in_memory().unwrap();
    let alice = store.create_user_impl(&user("alice", false)).unwrap();
    let bob = store.create_user_impl(&user("bob", false)).unwrap();
    let moderator = store.create_user_impl(&user("mod", true)).unwrap();
    Fixture {
        store,
        alice,
        bob,
        moderator,
    }
}

pub(crate) fn user(name: &str, moderator: bool) -> NewUser {
    NewUser {
        username: name.to_string(),
        email: format!("{name}@example.com"),
        moderator,
    }
}

pub(crate) fn panel() -> TargetDescriptor {
    TargetDescriptor::new("class", "Ext.Panel", None)
}

pub(crate) fn grid() -> TargetDescriptor {
    TargetDescriptor::new("class", "Ext.grid.Panel", Some("cfg-columns"))
}

pub(crate) fn add(
    docs: &DomainStore<'_>,
    user_id: UserId,
    target: TargetDescriptor,
    parent_id: Option<CommentId>,
    content: &str,
) -> CommentId {
    docs.add_impl(&NewComment {
        user_id,
        target,
        parent_id,
        content: content.to_string(),
    })
    .unwrap()
}
