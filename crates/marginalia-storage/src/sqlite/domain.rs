//! [`DomainStore`] -- a domain-scoped view of a [`SqliteStore`].

use crate::sqlite::store::SqliteStore;

/// Handle scoping every comment query and mutation to one documentation
/// domain (for example `"ext-js-4"`).
///
/// Cheap to create; obtain one per request through [`SqliteStore::domain`].
#[derive(Debug, Clone)]
pub struct DomainStore<'a> {
    pub(crate) store: &'a SqliteStore,
    pub(crate) domain: String,
}

impl<'a> DomainStore<'a> {
    pub(crate) fn new(store: &'a SqliteStore, domain: String) -> Self {
        Self { store, domain }
    }

    /// The domain name this handle is bound to.
    pub fn name(&self) -> &str {
        &self.domain
    }

    /// The underlying database.
    pub fn store(&self) -> &'a SqliteStore {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_keeps_domain_name() {
        let store = SqliteStore::open_in_memory().unwrap();
        let docs = store.domain("ext-js-4");
        assert_eq!(docs.name(), "ext-js-4");
        assert_eq!(store.domain(String::from("touch-2")).name(), "touch-2");
    }
}
