//! Defines the report snapshot store trait.

use crate::{
    Error,
    models::{DatabaseID, NewReport, Report, UserID},
};

/// Handles the persistence of report snapshots.
///
/// Ownership is enforced by the query predicate itself: every lookup filters
/// by `id AND user_id` in one step, so a snapshot owned by someone else is
/// indistinguishable from one that does not exist.
pub trait ReportStore {
    /// Persist a caller-supplied report snapshot, assigning a fresh ID and
    /// creation timestamp.
    ///
    /// The totals and breakdown sequences are stored as-is; the store does
    /// not recompute them from raw transactions or cross-check them against
    /// each other. Internal consistency of a snapshot is the caller's
    /// responsibility.
    fn create(&mut self, report: NewReport) -> Result<Report, Error>;

    /// Retrieve all snapshots owned by `user_id`, ordered by `date_from`
    /// descending (most recent reporting period first).
    ///
    /// The relative order of snapshots sharing a `date_from` is unspecified.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Report>, Error>;

    /// Retrieve the snapshot with `id` owned by `user_id`, or `None` if no
    /// such snapshot exists (including when it exists under another owner).
    fn get(&self, id: DatabaseID, user_id: UserID) -> Result<Option<Report>, Error>;

    /// Delete the snapshot with `id` owned by `user_id` and return it as it
    /// existed before deletion.
    ///
    /// # Errors
    /// Returns [Error::NotFound], without mutating anything, if no matching
    /// snapshot exists.
    fn delete(&mut self, id: DatabaseID, user_id: UserID) -> Result<Report, Error>;
}
