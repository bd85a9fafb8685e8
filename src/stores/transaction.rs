//! Defines the transaction store trait.
//!
//! This is the record-store contract the report engine consumes. Transactions
//! are owned by the upstream CRUD service; from the engine's perspective the
//! store is read-only, and [TransactionStore::create] exists for that service
//! (and for tests) to write through.

use time::OffsetDateTime;

use crate::{
    Error,
    models::{Transaction, TransactionBuilder, UserID},
};

/// Handles the creation and retrieval of transactions.
pub trait TransactionStore {
    /// Create a new transaction in the store.
    fn create(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error>;

    /// Retrieve the transactions owned by `user_id` whose date falls in the
    /// half-open interval `[date_from, date_to)`.
    ///
    /// An inverted range matches nothing and returns an empty vector.
    fn get_in_range(
        &self,
        user_id: UserID,
        date_from: OffsetDateTime,
        date_to: OffsetDateTime,
    ) -> Result<Vec<Transaction>, Error>;
}
