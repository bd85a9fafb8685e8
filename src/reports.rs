//! The report query engine.
//!
//! Turns a user's transactions over a date range into a [GeneratedReport]:
//! overall totals, a per-category breakdown and a per-day breakdown, computed
//! in a single pass. The engine is pure apart from the one range query it
//! issues against the transaction store; identical transaction sets always
//! yield identical output and nothing is persisted.

use time::{Date, Month, OffsetDateTime, Time, UtcOffset};

use crate::{
    Error,
    models::{
        CategoryBreakdown, DailyBreakdown, GeneratedReport, TransactionKind, UNCATEGORIZED, UserID,
    },
    stores::TransactionStore,
};

/// Compute a report for `user_id` over the half-open interval
/// `[date_from, date_to)`.
///
/// The engine does not validate that `date_from <= date_to`: an inverted
/// range simply matches no transactions and produces a well-formed, all-zero
/// report.
///
/// # Errors
/// Returns an [Error::SqlError] if the transaction store query fails; store
/// failures propagate unchanged.
pub fn generate_report<T>(
    store: &T,
    user_id: UserID,
    date_from: OffsetDateTime,
    date_to: OffsetDateTime,
) -> Result<GeneratedReport, Error>
where
    T: TransactionStore,
{
    let transactions = store.get_in_range(user_id, date_from, date_to)?;

    let mut total_income = 0.0;
    let mut total_expenses = 0.0;
    let mut by_category = CategoryBreakdown::default();
    let mut daily_breakdown = DailyBreakdown::new();

    for transaction in &transactions {
        let amount = transaction.amount();
        let category = match transaction.category_name() {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => UNCATEGORIZED.to_owned(),
        };
        let day = daily_breakdown
            .entry(day_key(transaction.date()))
            .or_default();

        match transaction.kind() {
            TransactionKind::Income => {
                total_income += amount;
                *by_category.income.entry(category).or_insert(0.0) += amount;
                day.income += amount;
                day.net_balance += amount;
            }
            TransactionKind::Expense => {
                total_expenses += amount;
                *by_category.expense.entry(category).or_insert(0.0) += amount;
                day.expense += amount;
                day.net_balance -= amount;
            }
        }
    }

    Ok(GeneratedReport {
        user_id,
        date_from,
        date_to,
        total_income,
        total_expenses,
        net_balance: total_income - total_expenses,
        by_category,
        daily_breakdown,
    })
}

/// Compute a report covering the first day of the calendar month preceding
/// `now` up to `now` itself.
///
/// `now` is a parameter rather than being read from the system clock so that
/// the window computation stays deterministic under test; the HTTP layer
/// reads the clock once and passes it in.
///
/// # Errors
/// Returns an [Error::SqlError] if the transaction store query fails.
pub fn generate_last_month_report<T>(
    store: &T,
    user_id: UserID,
    now: OffsetDateTime,
) -> Result<GeneratedReport, Error>
where
    T: TransactionStore,
{
    generate_report(store, user_id, last_month_start(now), now)
}

/// The first day of the calendar month preceding `now`, at midnight UTC.
pub fn last_month_start(now: OffsetDateTime) -> OffsetDateTime {
    let now = now.to_offset(UtcOffset::UTC);

    let (year, month) = match now.month() {
        Month::January => (now.year() - 1, Month::December),
        month => (now.year(), month.previous()),
    };

    let first_of_month =
        Date::from_calendar_date(year, month, 1).expect("day 1 is valid for every month");

    OffsetDateTime::new_utc(first_of_month, Time::MIDNIGHT)
}

/// The UTC calendar day a transaction instant falls on.
fn day_key(instant: OffsetDateTime) -> Date {
    instant.to_offset(UtcOffset::UTC).date()
}
