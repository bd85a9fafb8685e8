//! This file defines the type `Transaction`, the input record for report
//! aggregation.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::{DatabaseID, UserID};

/// Whether a transaction earned or spent money.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

impl TransactionKind {
    /// The kind as the lowercase string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Transactions are created and edited by the upstream CRUD service; the
/// report engine only ever reads them. To create a new `Transaction`, use
/// [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    id: DatabaseID,
    user_id: UserID,
    amount: f64,
    kind: TransactionKind,
    category_id: Option<DatabaseID>,
    category_name: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    date: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder::new] for discoverability.
    pub fn build(amount: f64, kind: TransactionKind, user_id: UserID) -> TransactionBuilder {
        TransactionBuilder::new(amount, kind, user_id)
    }

    /// Create a transaction without validating the fields.
    ///
    /// Intended for store implementations mapping rows that were validated on
    /// insertion.
    pub fn new_unchecked(
        id: DatabaseID,
        user_id: UserID,
        amount: f64,
        kind: TransactionKind,
        category_id: Option<DatabaseID>,
        category_name: Option<String>,
        date: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            user_id,
            amount,
            kind,
            category_id,
            category_name,
            date,
        }
    }

    /// The ID of the transaction.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// The ID of the user that owns this transaction.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }

    /// The amount of money spent or earned in this transaction.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Whether this transaction is an income or an expense.
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// A reference to the user-defined category of the transaction, if any.
    pub fn category_id(&self) -> Option<DatabaseID> {
        self.category_id
    }

    /// The display name of the category at the time the transaction was
    /// recorded, if any.
    pub fn category_name(&self) -> Option<&str> {
        self.category_name.as_deref()
    }

    /// When the transaction happened.
    pub fn date(&self) -> OffsetDateTime {
        self.date
    }
}

/// Builder for creating a new [Transaction].
///
/// The builder is finalized by [crate::stores::TransactionStore::create],
/// which assigns the ID.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    pub(crate) amount: f64,
    pub(crate) kind: TransactionKind,
    pub(crate) user_id: UserID,
    pub(crate) category_id: Option<DatabaseID>,
    pub(crate) category_name: Option<String>,
    pub(crate) date: OffsetDateTime,
}

impl TransactionBuilder {
    /// Create a builder for a new transaction.
    ///
    /// The date defaults to the current instant.
    pub fn new(amount: f64, kind: TransactionKind, user_id: UserID) -> Self {
        Self {
            amount,
            kind,
            user_id,
            category_id: None,
            category_name: None,
            date: OffsetDateTime::now_utc(),
        }
    }

    /// Set the date for the transaction.
    pub fn date(mut self, date: OffsetDateTime) -> Self {
        self.date = date;
        self
    }

    /// Set the category reference for the transaction.
    pub fn category(mut self, category_id: Option<DatabaseID>) -> Self {
        self.category_id = category_id;
        self
    }

    /// Set the category display name for the transaction.
    pub fn category_name(mut self, category_name: &str) -> Self {
        self.category_name = Some(category_name.to_owned());
        self
    }

    /// Build the final transaction with the ID assigned by the store.
    pub fn finalise(self, id: DatabaseID) -> Transaction {
        Transaction {
            id,
            user_id: self.user_id,
            amount: self.amount,
            kind: self.kind,
            category_id: self.category_id,
            category_name: self.category_name,
            date: self.date,
        }
    }
}

#[cfg(test)]
mod transaction_tests {
    use time::macros::datetime;

    use crate::models::UserID;

    use super::{Transaction, TransactionKind};

    #[test]
    fn build_sets_defaults() {
        let transaction = Transaction::build(12.3, TransactionKind::Expense, UserID::new(1))
            .finalise(42);

        assert_eq!(transaction.id(), 42);
        assert_eq!(transaction.amount(), 12.3);
        assert_eq!(transaction.kind(), TransactionKind::Expense);
        assert_eq!(transaction.category_id(), None);
        assert_eq!(transaction.category_name(), None);
    }

    #[test]
    fn build_sets_all_fields() {
        let date = datetime!(2023-01-01 12:00 UTC);

        let transaction = Transaction::build(100.0, TransactionKind::Income, UserID::new(7))
            .date(date)
            .category(Some(3))
            .category_name("Salary")
            .finalise(1);

        assert_eq!(transaction.user_id(), UserID::new(7));
        assert_eq!(transaction.date(), date);
        assert_eq!(transaction.category_id(), Some(3));
        assert_eq!(transaction.category_name(), Some("Salary"));
    }
}
