/*! This module defines and implements traits for interacting with the application's database. */

use rusqlite::{Connection, Error, Row, Transaction as SqlTransaction, types::Type};
use time::OffsetDateTime;

use crate::stores::sqlite::{SQLiteReportStore, SQLiteTransactionStore};

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create a table for the model.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), Error>;
}

/// A trait for mapping from a `rusqlite::Row` from a SQLite database to a concrete rust type.
pub trait MapRow {
    /// The type the row is mapped to.
    type ReturnType;

    /// Convert a row into a concrete type.
    ///
    /// **Note:** This function expects that the row object contains all the table columns in the order they were defined.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the corresponding rust type, or if an invalid column index was used.
    fn map_row(row: &Row) -> Result<Self::ReturnType, Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into a concrete type.
    ///
    /// The `offset` indicates which column the row should be read from.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the corresponding rust type, or if an invalid column index was used.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, Error>;
}

/// Read a unix timestamp column as a UTC instant.
///
/// Instants are stored as whole seconds so that SQL range comparisons are
/// plain integer comparisons.
pub fn instant_from_column(row: &Row, index: usize) -> Result<OffsetDateTime, Error> {
    let timestamp: i64 = row.get(index)?;

    OffsetDateTime::from_unix_timestamp(timestamp)
        .map_err(|error| Error::FromSqlConversionFailure(index, Type::Integer, Box::new(error)))
}

/// Set up the tables for the domain models.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    SQLiteTransactionStore::create_table(&transaction)?;
    SQLiteReportStore::create_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
