//! Defines the report types: the transient output of the report query engine
//! and the persisted report snapshot.
//!
//! Note the deliberate asymmetry between the two: a [GeneratedReport] groups
//! category totals by display *name* (with a fallback bucket for
//! uncategorized transactions), while a persisted [Report] stores sequences
//! keyed by category *ID* as supplied by the caller. A renamed category
//! therefore changes future groupings without rewriting past snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::models::{DatabaseID, UserID};

/// The category bucket used for transactions with a missing or empty
/// category name.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Sums of transaction amounts grouped by category display name, split by
/// transaction kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    /// Summed income per category name.
    pub income: BTreeMap<String, f64>,
    /// Summed expenses per category name.
    pub expense: BTreeMap<String, f64>,
}

/// The income, expenses and net balance of a single calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTotals {
    /// Summed income for the day.
    pub income: f64,
    /// Summed expenses for the day.
    pub expense: f64,
    /// `income - expense` for the day.
    pub net_balance: f64,
}

/// Per-day totals keyed by UTC calendar day.
pub type DailyBreakdown = BTreeMap<Date, DayTotals>;

/// The output of the report query engine.
///
/// Computed on demand and never persisted automatically; saving a snapshot is
/// a separate, explicit operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedReport {
    /// The owner the report was computed for.
    pub user_id: UserID,
    /// Start of the reporting period (inclusive).
    #[serde(with = "time::serde::rfc3339")]
    pub date_from: OffsetDateTime,
    /// End of the reporting period (exclusive).
    #[serde(with = "time::serde::rfc3339")]
    pub date_to: OffsetDateTime,
    /// Sum of all income amounts in the period.
    pub total_income: f64,
    /// Sum of all expense amounts in the period.
    pub total_expenses: f64,
    /// `total_income - total_expenses`.
    pub net_balance: f64,
    /// Totals grouped by category display name.
    pub by_category: CategoryBreakdown,
    /// Totals grouped by UTC calendar day.
    pub daily_breakdown: DailyBreakdown,
}

/// The total amount recorded against one category in a persisted snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// The referenced category.
    pub category_id: DatabaseID,
    /// The summed amount for the category.
    pub total_amount: f64,
}

/// One day's totals in a persisted snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyEntry {
    /// The calendar day.
    pub date: Date,
    /// Summed income for the day.
    pub total_income: f64,
    /// Summed expenses for the day.
    pub total_expenses: f64,
    /// Net balance for the day.
    pub net_balance: f64,
}

/// A report snapshot as supplied by the caller, before it is persisted.
///
/// The totals and breakdown sequences are stored as-is; the snapshot store
/// does not recompute or cross-check them (see
/// [crate::stores::ReportStore::create]).
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    /// The owner of the snapshot.
    pub user_id: UserID,
    /// Start of the reporting period (inclusive).
    pub date_from: OffsetDateTime,
    /// End of the reporting period (exclusive).
    pub date_to: OffsetDateTime,
    /// Total income over the period.
    pub total_income: f64,
    /// Total expenses over the period.
    pub total_expenses: f64,
    /// Net balance over the period.
    pub net_balance: f64,
    /// Income totals per category reference, in caller-supplied order.
    pub income_by_category: Vec<CategoryTotal>,
    /// Expense totals per category reference, in caller-supplied order.
    pub expenses_by_category: Vec<CategoryTotal>,
    /// Per-day totals, in caller-supplied order.
    pub daily_breakdown: Vec<DailyEntry>,
}

/// A persisted report snapshot.
///
/// Immutable once created except for deletion; the owner never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// The ID assigned by the snapshot store.
    pub id: DatabaseID,
    /// The owner of the snapshot.
    pub user_id: UserID,
    /// Start of the reporting period (inclusive).
    #[serde(with = "time::serde::rfc3339")]
    pub date_from: OffsetDateTime,
    /// End of the reporting period (exclusive).
    #[serde(with = "time::serde::rfc3339")]
    pub date_to: OffsetDateTime,
    /// Total income over the period.
    pub total_income: f64,
    /// Total expenses over the period.
    pub total_expenses: f64,
    /// Net balance over the period.
    pub net_balance: f64,
    /// Income totals per category reference, in caller-supplied order.
    pub income_by_category: Vec<CategoryTotal>,
    /// Expense totals per category reference, in caller-supplied order.
    pub expenses_by_category: Vec<CategoryTotal>,
    /// Per-day totals, in caller-supplied order.
    pub daily_breakdown: Vec<DailyEntry>,
    /// When the snapshot was persisted.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
