//! Contains convenience type alias and function for [AppState] that uses
//! the SQLite backend.

pub mod report;
pub mod transaction;

pub use report::SQLiteReportStore;
pub use transaction::SQLiteTransactionStore;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{AppState, Error, db::initialize};

/// An alias for an [AppState] that uses SQLite for the backend.
pub type SQLAppState = AppState<SQLiteTransactionStore, SQLiteReportStore>;

/// Creates an [AppState] instance that uses SQLite for the backend.
///
/// This function will modify the database by adding the tables for the domain
/// models to the database.
pub fn create_app_state(db_connection: Connection) -> Result<SQLAppState, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));
    let transaction_store = SQLiteTransactionStore::new(connection.clone());
    let report_store = SQLiteReportStore::new(connection.clone());

    Ok(AppState::new(connection, transaction_store, report_store))
}
