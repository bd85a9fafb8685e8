//! Implements a struct that holds the state of the REST server.

use std::{
    marker::{Send, Sync},
    sync::{Arc, Mutex},
};

use rusqlite::Connection;

use crate::stores::{ReportStore, TransactionStore};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState<T, R>
where
    T: TransactionStore + Send + Sync,
    R: ReportStore + Send + Sync,
{
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The store for reading user [transactions](crate::models::Transaction).
    pub transaction_store: T,
    /// The store for managing [report snapshots](crate::models::Report).
    pub report_store: R,
}

impl<T, R> AppState<T, R>
where
    T: TransactionStore + Send + Sync,
    R: ReportStore + Send + Sync,
{
    /// Create a new [AppState].
    pub fn new(db_connection: Arc<Mutex<Connection>>, transaction_store: T, report_store: R) -> Self {
        Self {
            db_connection,
            transaction_store,
            report_store,
        }
    }
}
