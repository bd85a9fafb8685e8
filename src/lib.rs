//! Fintrack is the backend for a personal finance tracker.
//!
//! Users record income and expense transactions tagged with categories, and
//! this library turns those records into financial summaries over date
//! ranges. It provides:
//!
//! - a report query engine that folds a user's transactions into totals plus
//!   category-level and day-level breakdowns ([reports]),
//! - a snapshot store that persists previously computed report documents per
//!   owner ([stores::ReportStore]),
//! - and a JSON API that exposes both ([build_router]).
//!
//! Authentication is handled upstream: requests reach this service through an
//! identity provider that resolves the caller to a user ID (see [identity]).

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod db;
mod error;
mod state;

pub mod identity;
pub mod models;
pub mod reports;
pub mod routes;
pub mod stores;

pub use error::Error;
pub use routes::build_router;
pub use state::AppState;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
