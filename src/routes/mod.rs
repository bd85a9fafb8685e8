//! This module defines the REST API's routes and their handlers.

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::{
    AppState,
    identity::identity_guard,
    stores::{ReportStore, TransactionStore},
};

use reports::{
    create_report, delete_report, get_generated_report, get_last_month_report, get_report,
    get_reports,
};

pub mod endpoints;
mod reports;

/// Return a router with all the app's routes.
///
/// Every route sits behind the identity guard, so handlers can rely on the
/// [crate::models::UserID] request extension being present.
pub fn build_router<T, R>(state: AppState<T, R>) -> Router
where
    T: TransactionStore + Clone + Send + Sync + 'static,
    R: ReportStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(endpoints::REPORTS, post(create_report::<T, R>))
        .route(endpoints::REPORTS, get(get_reports::<T, R>))
        .route(endpoints::REPORT, get(get_report::<T, R>))
        .route(endpoints::REPORT, delete(delete_report::<T, R>))
        .route(
            endpoints::GENERATE_REPORT,
            get(get_generated_report::<T, R>),
        )
        .route(
            endpoints::LAST_MONTH_REPORT,
            get(get_last_month_report::<T, R>),
        )
        .layer(middleware::from_fn(identity_guard))
        .with_state(state)
}
