//! The route handlers for computing, saving, listing and deleting reports.
//!
//! Every handler resolves the owner from the [UserID] request extension set
//! by [crate::identity::identity_guard]; IDs embedded in request bodies are
//! ignored so that a caller can never act on another user's data.

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime, Time, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::{
    AppState, Error,
    models::{CategoryTotal, DailyEntry, DatabaseID, GeneratedReport, NewReport, Report, UserID},
    reports,
    stores::{ReportStore, TransactionStore},
};

/// The request body for saving a report snapshot.
///
/// Totals and breakdown sequences default to zero/empty when omitted and are
/// persisted as supplied. The `userId` field is accepted for wire
/// compatibility but ignored; the authenticated user always owns the saved
/// snapshot.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReportRequest {
    /// Ignored; the owner is taken from the authenticated request instead.
    #[serde(default)]
    pub user_id: Option<UserID>,
    /// Start of the reporting period (inclusive).
    #[serde(with = "time::serde::rfc3339")]
    pub date_from: OffsetDateTime,
    /// End of the reporting period (exclusive).
    #[serde(with = "time::serde::rfc3339")]
    pub date_to: OffsetDateTime,
    /// Total income over the period.
    #[serde(default)]
    pub total_income: f64,
    /// Total expenses over the period.
    #[serde(default)]
    pub total_expenses: f64,
    /// Net balance over the period.
    #[serde(default)]
    pub net_balance: f64,
    /// Income totals per category reference.
    #[serde(default)]
    pub income_by_category: Vec<CategoryTotal>,
    /// Expense totals per category reference.
    #[serde(default)]
    pub expenses_by_category: Vec<CategoryTotal>,
    /// Per-day totals.
    #[serde(default)]
    pub daily_breakdown: Vec<DailyEntry>,
}

impl SaveReportRequest {
    /// Convert the request into a [NewReport] owned by `user_id`, discarding
    /// any owner claimed in the request body.
    fn into_new_report(self, user_id: UserID) -> NewReport {
        NewReport {
            user_id,
            date_from: self.date_from,
            date_to: self.date_to,
            total_income: self.total_income,
            total_expenses: self.total_expenses,
            net_balance: self.net_balance,
            income_by_category: self.income_by_category,
            expenses_by_category: self.expenses_by_category,
            daily_breakdown: self.daily_breakdown,
        }
    }
}

/// The query parameters for computing a report over an explicit date range.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRangeQuery {
    /// Start of the reporting period (inclusive).
    pub from_date: String,
    /// End of the reporting period (exclusive).
    pub to_date: String,
}

const CALENDAR_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Parse a query parameter as an instant.
///
/// Accepts an RFC 3339 date-time, or a plain calendar date which is taken as
/// midnight UTC on that day.
fn parse_instant(text: &str) -> Result<OffsetDateTime, Error> {
    if let Ok(instant) = OffsetDateTime::parse(text, &time::format_description::well_known::Rfc3339)
    {
        return Ok(instant);
    }

    Date::parse(text, CALENDAR_DATE_FORMAT)
        .map(|date| OffsetDateTime::new_utc(date, Time::MIDNIGHT))
        .map_err(|error| Error::InvalidDateFormat(error.to_string(), text.to_owned()))
}

/// A route handler for computing a report over the date range given in the
/// query string.
///
/// Nothing is persisted; saving the result is a separate, explicit request.
pub async fn get_generated_report<T, R>(
    State(state): State<AppState<T, R>>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ReportRangeQuery>,
) -> Result<Json<GeneratedReport>, Error>
where
    T: TransactionStore + Send + Sync,
    R: ReportStore + Send + Sync,
{
    let date_from = parse_instant(&query.from_date)?;
    let date_to = parse_instant(&query.to_date)?;

    reports::generate_report(&state.transaction_store, user_id, date_from, date_to).map(Json)
}

/// A route handler for computing a report covering the previous calendar
/// month up to now.
pub async fn get_last_month_report<T, R>(
    State(state): State<AppState<T, R>>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<GeneratedReport>, Error>
where
    T: TransactionStore + Send + Sync,
    R: ReportStore + Send + Sync,
{
    reports::generate_last_month_report(
        &state.transaction_store,
        user_id,
        OffsetDateTime::now_utc(),
    )
    .map(Json)
}

/// A route handler for saving a report snapshot.
///
/// Responds with 201 and the persisted snapshot, including its assigned ID
/// and creation timestamp.
pub async fn create_report<T, R>(
    State(state): State<AppState<T, R>>,
    Extension(user_id): Extension<UserID>,
    Json(request): Json<SaveReportRequest>,
) -> Result<impl IntoResponse, Error>
where
    T: TransactionStore + Send + Sync,
    R: ReportStore + Send + Sync,
{
    let mut store = state.report_store;

    store
        .create(request.into_new_report(user_id))
        .map(|report| (StatusCode::CREATED, Json(report)))
}

/// A route handler for listing the authenticated user's report snapshots,
/// most recent reporting period first.
pub async fn get_reports<T, R>(
    State(state): State<AppState<T, R>>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Report>>, Error>
where
    T: TransactionStore + Send + Sync,
    R: ReportStore + Send + Sync,
{
    state.report_store.get_by_user(user_id).map(Json)
}

/// A route handler for getting a report snapshot by its database ID.
///
/// Responds with 404 when the snapshot does not exist or belongs to another
/// user; the two cases are indistinguishable so that callers cannot probe for
/// other users' snapshots.
pub async fn get_report<T, R>(
    State(state): State<AppState<T, R>>,
    Extension(user_id): Extension<UserID>,
    Path(report_id): Path<DatabaseID>,
) -> Result<Json<Report>, Error>
where
    T: TransactionStore + Send + Sync,
    R: ReportStore + Send + Sync,
{
    state
        .report_store
        .get(report_id, user_id)?
        .map(Json)
        .ok_or(Error::NotFound)
}

/// A route handler for deleting a report snapshot by its database ID.
///
/// Responds with 204 on success, or 404 when the snapshot does not exist or
/// belongs to another user.
pub async fn delete_report<T, R>(
    State(state): State<AppState<T, R>>,
    Extension(user_id): Extension<UserID>,
    Path(report_id): Path<DatabaseID>,
) -> Result<StatusCode, Error>
where
    T: TransactionStore + Send + Sync,
    R: ReportStore + Send + Sync,
{
    let mut store = state.report_store;

    store
        .delete(report_id, user_id)
        .map(|_| StatusCode::NO_CONTENT)
}
