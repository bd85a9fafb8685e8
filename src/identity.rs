//! The identity boundary of the service.
//!
//! Authentication happens upstream: an identity provider (gateway) verifies
//! the caller and forwards the resolved user ID in a trusted header. This
//! module turns that header into a [UserID] request extension, which route
//! handlers then treat as the sole source of ownership. Requests without a
//! usable header never reach a handler.

use axum::{
    Json,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::models::UserID;

/// The header the upstream identity provider sets on every request.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Middleware that resolves the calling user from [USER_ID_HEADER].
///
/// On success the [UserID] is inserted as a request extension for handlers to
/// extract. A missing or malformed header short-circuits with 401 without
/// touching any store.
pub async fn identity_guard(mut request: Request, next: Next) -> Response {
    let user_id = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|text| text.parse::<i64>().ok());

    match user_id {
        Some(id) => {
            request.extensions_mut().insert(UserID::new(id));
            next.run(request).await
        }
        None => {
            tracing::debug!("rejecting request without a resolvable user ID");
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "unauthorized" })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod identity_guard_tests {
    use axum::{Extension, Router, middleware, routing::get};
    use axum_test::TestServer;

    use crate::models::UserID;

    use super::{USER_ID_HEADER, identity_guard};

    async fn whoami(Extension(user_id): Extension<UserID>) -> String {
        user_id.to_string()
    }

    fn get_test_server() -> TestServer {
        let app = Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn(identity_guard));

        TestServer::new(app)
    }

    #[tokio::test]
    async fn request_with_header_reaches_handler() {
        let server = get_test_server();

        let response = server.get("/whoami").add_header(USER_ID_HEADER, "42").await;

        response.assert_status_ok();
        response.assert_text("42");
    }

    #[tokio::test]
    async fn request_without_header_is_unauthorized() {
        let server = get_test_server();

        let response = server.get("/whoami").await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn request_with_malformed_header_is_unauthorized() {
        let server = get_test_server();

        let response = server
            .get("/whoami")
            .add_header(USER_ID_HEADER, "not-a-number")
            .await;

        response.assert_status_unauthorized();
    }
}
