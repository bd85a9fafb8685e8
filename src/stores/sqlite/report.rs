//! Implements a SQLite backed report snapshot store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension, Row, types::Type};
use serde::de::DeserializeOwned;
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow, instant_from_column},
    models::{DatabaseID, NewReport, Report, UserID},
    stores::ReportStore,
};

/// Stores report snapshots in a SQLite database.
///
/// The breakdown sequences are stored as JSON text columns, which keeps the
/// caller-supplied order and values byte-for-byte.
#[derive(Debug, Clone)]
pub struct SQLiteReportStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteReportStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

const REPORT_COLUMNS: &str = "id, user_id, date_from, date_to, total_income, total_expenses, \
     net_balance, income_by_category, expenses_by_category, daily_breakdown, created_at";

impl ReportStore for SQLiteReportStore {
    /// Persist a report snapshot as supplied, assigning an ID and creation
    /// timestamp.
    ///
    /// Instants are stored with whole-second precision.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::JsonSerializationError] if a breakdown sequence cannot be
    ///   serialized,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, report: NewReport) -> Result<Report, Error> {
        let created_at = truncate_to_seconds(OffsetDateTime::now_utc());
        let income_by_category = to_json(&report.income_by_category)?;
        let expenses_by_category = to_json(&report.expenses_by_category)?;
        let daily_breakdown = to_json(&report.daily_breakdown)?;

        let connection = self.connection.lock().unwrap();

        connection.execute(
            "INSERT INTO report (user_id, date_from, date_to, total_income, total_expenses, \
             net_balance, income_by_category, expenses_by_category, daily_breakdown, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            (
                report.user_id.as_i64(),
                report.date_from.unix_timestamp(),
                report.date_to.unix_timestamp(),
                report.total_income,
                report.total_expenses,
                report.net_balance,
                income_by_category,
                expenses_by_category,
                daily_breakdown,
                created_at.unix_timestamp(),
            ),
        )?;

        let id = connection.last_insert_rowid();

        Ok(Report {
            id,
            user_id: report.user_id,
            date_from: truncate_to_seconds(report.date_from),
            date_to: truncate_to_seconds(report.date_to),
            total_income: report.total_income,
            total_expenses: report.total_expenses,
            net_balance: report.net_balance,
            income_by_category: report.income_by_category,
            expenses_by_category: report.expenses_by_category,
            daily_breakdown: report.daily_breakdown,
            created_at,
        })
    }

    /// Retrieve all snapshots owned by `user_id`, most recent reporting
    /// period first.
    ///
    /// Snapshots sharing a `date_from` come back in whatever order SQLite
    /// scans them.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is a SQL error.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Report>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {REPORT_COLUMNS} FROM report WHERE user_id = :user_id \
                 ORDER BY date_from DESC"
            ))?
            .query_map(&[(":user_id", &user_id.as_i64())], Self::map_row)?
            .map(|maybe_report| maybe_report.map_err(Error::SqlError))
            .collect()
    }

    /// Retrieve the snapshot matching both `id` and `user_id`.
    ///
    /// Ownership is part of the query predicate, so a snapshot owned by a
    /// different user yields `None` rather than an authorization error.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is a SQL error.
    fn get(&self, id: DatabaseID, user_id: UserID) -> Result<Option<Report>, Error> {
        let report = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {REPORT_COLUMNS} FROM report WHERE id = :id AND user_id = :user_id"
            ))?
            .query_row(
                &[(":id", &id), (":user_id", &user_id.as_i64())],
                Self::map_row,
            )
            .optional()?;

        Ok(report)
    }

    /// Delete the snapshot matching both `id` and `user_id` and return it.
    ///
    /// The lookup and the delete are two independent statements with no
    /// transaction around them; a concurrent delete between the two is
    /// accepted (last writer wins).
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if no snapshot matches `id` and `user_id`,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: DatabaseID, user_id: UserID) -> Result<Report, Error> {
        let report = self.get(id, user_id)?.ok_or(Error::NotFound)?;

        self.connection
            .lock()
            .unwrap()
            .execute("DELETE FROM report WHERE id = :id", &[(":id", &id)])?;

        Ok(report)
    }
}

impl CreateTable for SQLiteReportStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS report (
                    id INTEGER PRIMARY KEY,
                    user_id INTEGER NOT NULL,
                    date_from INTEGER NOT NULL,
                    date_to INTEGER NOT NULL,
                    total_income REAL NOT NULL,
                    total_expenses REAL NOT NULL,
                    net_balance REAL NOT NULL,
                    income_by_category TEXT NOT NULL,
                    expenses_by_category TEXT NOT NULL,
                    daily_breakdown TEXT NOT NULL,
                    created_at INTEGER NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteReportStore {
    type ReturnType = Report;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Report {
            id: row.get(offset)?,
            user_id: UserID::new(row.get(offset + 1)?),
            date_from: instant_from_column(row, offset + 2)?,
            date_to: instant_from_column(row, offset + 3)?,
            total_income: row.get(offset + 4)?,
            total_expenses: row.get(offset + 5)?,
            net_balance: row.get(offset + 6)?,
            income_by_category: json_from_column(row, offset + 7)?,
            expenses_by_category: json_from_column(row, offset + 8)?,
            daily_breakdown: json_from_column(row, offset + 9)?,
            created_at: instant_from_column(row, offset + 10)?,
        })
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, Error> {
    serde_json::to_string(value).map_err(|error| Error::JsonSerializationError(error.to_string()))
}

fn json_from_column<T: DeserializeOwned>(row: &Row, index: usize) -> Result<T, rusqlite::Error> {
    let text: String = row.get(index)?;

    serde_json::from_str(&text)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error)))
}

fn truncate_to_seconds(instant: OffsetDateTime) -> OffsetDateTime {
    instant
        .replace_nanosecond(0)
        .expect("zero nanoseconds is always a valid component")
}

#[cfg(test)]
mod sqlite_report_store_tests {
    use rusqlite::Connection;
    use time::macros::{date, datetime};

    use crate::{
        Error,
        models::{CategoryTotal, DailyEntry, NewReport, UserID},
        stores::{ReportStore, sqlite::create_app_state},
    };

    fn get_store() -> super::SQLiteReportStore {
        let conn = Connection::open_in_memory().unwrap();
        create_app_state(conn).unwrap().report_store
    }

    fn new_report(user_id: UserID) -> NewReport {
        NewReport {
            user_id,
            date_from: datetime!(2023-01-01 0:00 UTC),
            date_to: datetime!(2023-02-01 0:00 UTC),
            total_income: 100.0,
            total_expenses: 50.0,
            net_balance: 50.0,
            income_by_category: vec![CategoryTotal {
                category_id: 1,
                total_amount: 100.0,
            }],
            expenses_by_category: vec![
                CategoryTotal {
                    category_id: 2,
                    total_amount: 30.0,
                },
                CategoryTotal {
                    category_id: 3,
                    total_amount: 20.0,
                },
            ],
            daily_breakdown: vec![
                DailyEntry {
                    date: date!(2023 - 01 - 01),
                    total_income: 100.0,
                    total_expenses: 30.0,
                    net_balance: 70.0,
                },
                DailyEntry {
                    date: date!(2023 - 01 - 02),
                    total_income: 0.0,
                    total_expenses: 20.0,
                    net_balance: -20.0,
                },
            ],
        }
    }

    #[test]
    fn create_persists_snapshot_verbatim() {
        let mut store = get_store();
        let user_id = UserID::new(1);
        let want = new_report(user_id);

        let report = store.create(want.clone()).unwrap();

        assert!(report.id > 0);
        assert_eq!(report.user_id, user_id);
        assert_eq!(report.date_from, want.date_from);
        assert_eq!(report.date_to, want.date_to);
        assert_eq!(report.total_income, want.total_income);
        assert_eq!(report.total_expenses, want.total_expenses);
        assert_eq!(report.net_balance, want.net_balance);
        assert_eq!(report.income_by_category, want.income_by_category);
        assert_eq!(report.expenses_by_category, want.expenses_by_category);
        assert_eq!(report.daily_breakdown, want.daily_breakdown);

        // The returned document must match what a later fetch sees, nested
        // sequences included.
        let fetched = store.get(report.id, user_id).unwrap().unwrap();
        assert_eq!(fetched, report);
    }

    #[test]
    fn create_does_not_cross_check_totals() {
        let mut store = get_store();
        let user_id = UserID::new(1);
        let mut inconsistent = new_report(user_id);
        inconsistent.net_balance = 9000.0;

        let report = store.create(inconsistent).unwrap();

        assert_eq!(report.net_balance, 9000.0);
    }

    #[test]
    fn get_by_user_orders_by_date_from_descending() {
        let mut store = get_store();
        let user_id = UserID::new(1);

        let mut january = new_report(user_id);
        january.date_from = datetime!(2023-01-01 0:00 UTC);
        let mut march = new_report(user_id);
        march.date_from = datetime!(2023-03-01 0:00 UTC);
        let mut february = new_report(user_id);
        february.date_from = datetime!(2023-02-01 0:00 UTC);

        let january = store.create(january).unwrap();
        let march = store.create(march).unwrap();
        let february = store.create(february).unwrap();

        let got = store.get_by_user(user_id).unwrap();

        assert_eq!(got, vec![march, february, january]);
    }

    #[test]
    fn get_by_user_excludes_other_owners() {
        let mut store = get_store();
        let mine = store.create(new_report(UserID::new(1))).unwrap();
        store.create(new_report(UserID::new(2))).unwrap();

        let got = store.get_by_user(UserID::new(1)).unwrap();

        assert_eq!(got, vec![mine]);
    }

    #[test]
    fn get_returns_none_for_missing_id() {
        let store = get_store();

        let got = store.get(1337, UserID::new(1)).unwrap();

        assert_eq!(got, None);
    }

    #[test]
    fn get_returns_none_for_foreign_owner() {
        let mut store = get_store();
        let report = store.create(new_report(UserID::new(1))).unwrap();

        let got = store.get(report.id, UserID::new(2)).unwrap();

        assert_eq!(got, None);
    }

    #[test]
    fn delete_removes_and_returns_snapshot() {
        let mut store = get_store();
        let user_id = UserID::new(1);
        let report = store.create(new_report(user_id)).unwrap();

        let deleted = store.delete(report.id, user_id).unwrap();

        assert_eq!(deleted, report);
        assert_eq!(store.get(report.id, user_id).unwrap(), None);
    }

    #[test]
    fn delete_fails_on_missing_id() {
        let mut store = get_store();

        let got = store.delete(1337, UserID::new(1));

        assert_eq!(got, Err(Error::NotFound));
    }

    #[test]
    fn delete_fails_on_foreign_owner_without_mutation() {
        let mut store = get_store();
        let owner = UserID::new(1);
        let report = store.create(new_report(owner)).unwrap();

        let got = store.delete(report.id, UserID::new(2));

        assert_eq!(got, Err(Error::NotFound));
        // The snapshot must still be there for its owner.
        assert_eq!(store.get(report.id, owner).unwrap(), Some(report));
    }
}
