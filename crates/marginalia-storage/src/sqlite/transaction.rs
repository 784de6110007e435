//! Transaction helpers for [`SqliteStore`].

use rusqlite::{Connection, TransactionBehavior};

use crate::error::{Result, StorageError};
use crate::sqlite::store::SqliteStore;

impl SqliteStore {
    /// Runs `f` inside a transaction, committing on `Ok` and rolling back on
    /// `Err` (the transaction is rolled back when dropped).
    pub(crate) fn run_in_transaction<T>(
        &self,
        behavior: TransactionBehavior,
        f: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<T> {
        let mut conn = self.lock_conn()?;
        let tx = conn
            .transaction_with_behavior(behavior)
            .map_err(|e| StorageError::Transaction(format!("failed to begin: {e}")))?;

        let value = f(&tx)?;

        tx.commit()
            .map_err(|e| StorageError::Transaction(format!("failed to commit: {e}")))?;
        Ok(value)
    }

    /// Runs `f` in a transaction that takes the write lock up front, so a
    /// read-then-decide sequence cannot interleave with another writer.
    pub(crate) fn run_immediate<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        self.run_in_transaction(TransactionBehavior::Immediate, f)
    }
}
