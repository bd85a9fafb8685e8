//! This module defines the domain data types.

mod report;
mod transaction;
mod user;

pub use report::{
    CategoryBreakdown, CategoryTotal, DailyBreakdown, DailyEntry, DayTotals, GeneratedReport,
    NewReport, Report, UNCATEGORIZED,
};
pub use transaction::{Transaction, TransactionBuilder, TransactionKind};
pub use user::UserID;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;
