//! Contains traits and implementations for objects that store the domain [models](crate::models).

mod report;
mod transaction;

pub mod sqlite;

pub use report::ReportStore;
pub use transaction::TransactionStore;
