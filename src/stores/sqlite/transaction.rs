//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, types::Type};

use crate::{
    Error,
    db::{CreateTable, MapRow, instant_from_column},
    models::{Transaction, TransactionBuilder, TransactionKind, UserID},
    stores::TransactionStore,
};
use time::OffsetDateTime;

/// Stores transactions in a SQLite database.
///
/// The user and category tables are owned by external services, so the
/// transaction table carries plain ID columns without foreign keys into them.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an unexpected SQL error.
    fn create(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();

        connection.execute(
            "INSERT INTO \"transaction\" (user_id, amount, kind, category_id, category_name, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                builder.user_id.as_i64(),
                builder.amount,
                builder.kind.as_str(),
                builder.category_id,
                builder.category_name.as_deref(),
                builder.date.unix_timestamp(),
            ),
        )?;

        let transaction_id = connection.last_insert_rowid();

        Ok(builder.finalise(transaction_id))
    }

    /// Retrieve the transactions owned by `user_id` with a date in
    /// `[date_from, date_to)`.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is a SQL error.
    fn get_in_range(
        &self,
        user_id: UserID,
        date_from: OffsetDateTime,
        date_to: OffsetDateTime,
    ) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, user_id, amount, kind, category_id, category_name, date
                 FROM \"transaction\"
                 WHERE user_id = ?1 AND date >= ?2 AND date < ?3",
            )?
            .query_map(
                (
                    user_id.as_i64(),
                    date_from.unix_timestamp(),
                    date_to.unix_timestamp(),
                ),
                Self::map_row,
            )?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                    id INTEGER PRIMARY KEY,
                    user_id INTEGER NOT NULL,
                    amount REAL NOT NULL,
                    kind TEXT NOT NULL,
                    category_id INTEGER,
                    category_name TEXT,
                    date INTEGER NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let user_id = UserID::new(row.get(offset + 1)?);
        let amount = row.get(offset + 2)?;
        let kind_text: String = row.get(offset + 3)?;
        let kind = match kind_text.as_str() {
            "income" => TransactionKind::Income,
            "expense" => TransactionKind::Expense,
            other => {
                return Err(rusqlite::Error::FromSqlConversionFailure(
                    offset + 3,
                    Type::Text,
                    format!("unknown transaction kind \"{other}\"").into(),
                ));
            }
        };
        let category_id = row.get(offset + 4)?;
        let category_name = row.get(offset + 5)?;
        let date = instant_from_column(row, offset + 6)?;

        Ok(Transaction::new_unchecked(
            id,
            user_id,
            amount,
            kind,
            category_id,
            category_name,
            date,
        ))
    }
}

#[cfg(test)]
mod sqlite_transaction_store_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        models::{Transaction, TransactionKind, UserID},
        stores::{TransactionStore, sqlite::create_app_state},
    };

    fn get_store() -> super::SQLiteTransactionStore {
        let conn = Connection::open_in_memory().unwrap();
        create_app_state(conn).unwrap().transaction_store
    }

    #[test]
    fn create_succeeds() {
        let mut store = get_store();
        let user_id = UserID::new(1);

        let transaction = store
            .create(
                Transaction::build(12.3, TransactionKind::Expense, user_id)
                    .date(datetime!(2023-06-01 9:30 UTC))
                    .category(Some(4))
                    .category_name("Food"),
            )
            .unwrap();

        assert!(transaction.id() > 0);
        assert_eq!(transaction.user_id(), user_id);
        assert_eq!(transaction.amount(), 12.3);
        assert_eq!(transaction.kind(), TransactionKind::Expense);
        assert_eq!(transaction.category_id(), Some(4));
        assert_eq!(transaction.category_name(), Some("Food"));
        assert_eq!(transaction.date(), datetime!(2023-06-01 9:30 UTC));
    }

    #[test]
    fn get_in_range_is_half_open() {
        let mut store = get_store();
        let user_id = UserID::new(1);
        let date_from = datetime!(2023-01-01 0:00 UTC);
        let date_to = datetime!(2023-02-01 0:00 UTC);

        let at_start = store
            .create(Transaction::build(1.0, TransactionKind::Income, user_id).date(date_from))
            .unwrap();
        let inside = store
            .create(
                Transaction::build(2.0, TransactionKind::Income, user_id)
                    .date(datetime!(2023-01-15 12:00 UTC)),
            )
            .unwrap();
        // At the exclusive end of the range.
        store
            .create(Transaction::build(3.0, TransactionKind::Income, user_id).date(date_to))
            .unwrap();
        // Before the range.
        store
            .create(
                Transaction::build(4.0, TransactionKind::Income, user_id)
                    .date(datetime!(2022-12-31 23:59:59 UTC)),
            )
            .unwrap();

        let got = store.get_in_range(user_id, date_from, date_to).unwrap();

        assert_eq!(got, vec![at_start, inside]);
    }

    #[test]
    fn get_in_range_filters_by_owner() {
        let mut store = get_store();
        let date = datetime!(2023-01-15 12:00 UTC);

        let mine = store
            .create(Transaction::build(1.0, TransactionKind::Income, UserID::new(1)).date(date))
            .unwrap();
        store
            .create(Transaction::build(2.0, TransactionKind::Income, UserID::new(2)).date(date))
            .unwrap();

        let got = store
            .get_in_range(
                UserID::new(1),
                datetime!(2023-01-01 0:00 UTC),
                datetime!(2023-02-01 0:00 UTC),
            )
            .unwrap();

        assert_eq!(got, vec![mine]);
    }

    #[test]
    fn get_in_range_returns_empty_for_inverted_range() {
        let mut store = get_store();
        let user_id = UserID::new(1);
        store
            .create(
                Transaction::build(1.0, TransactionKind::Income, user_id)
                    .date(datetime!(2023-01-15 12:00 UTC)),
            )
            .unwrap();

        let got = store
            .get_in_range(
                user_id,
                datetime!(2023-02-01 0:00 UTC),
                datetime!(2023-01-01 0:00 UTC),
            )
            .unwrap();

        assert!(got.is_empty());
    }
}
