//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/reports/{report_id}', use
//! [format_endpoint].

/// The route to list and save report snapshots.
pub const REPORTS: &str = "/api/reports";
/// The route to access a single report snapshot.
pub const REPORT: &str = "/api/reports/{report_id}";
/// The route to compute a report over an explicit date range.
pub const GENERATE_REPORT: &str = "/api/reports/generate";
/// The route to compute a report over the previous calendar month.
pub const LAST_MONTH_REPORT: &str = "/api/reports/generate/last-month";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// This function assumes that an endpoint path will only have a single
/// parameter, and will only replace the first one.
///
/// # Examples
///
/// ```
/// use fintrack::routes::endpoints::format_endpoint;
///
/// assert_eq!(format_endpoint("/api/reports/{report_id}", 42), "/api/reports/42");
/// ```
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    match (endpoint_path.find('{'), endpoint_path.find('}')) {
        (Some(start), Some(end)) if start < end => {
            format!(
                "{}{}{}",
                &endpoint_path[..start],
                id,
                &endpoint_path[end + 1..]
            )
        }
        _ => endpoint_path.to_string(),
    }
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::routes::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::REPORTS);
        assert_endpoint_is_valid_uri(endpoints::GENERATE_REPORT);
        assert_endpoint_is_valid_uri(endpoints::LAST_MONTH_REPORT);
    }

    #[test]
    fn format_endpoint_produces_valid_uri() {
        let formatted_path = format_endpoint(endpoints::REPORT, 1);

        assert_eq!(formatted_path, "/api/reports/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn format_endpoint_leaves_parameterless_path_unchanged() {
        assert_eq!(format_endpoint(endpoints::REPORTS, 1), endpoints::REPORTS);
    }
}
