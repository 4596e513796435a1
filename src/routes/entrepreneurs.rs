//! Entrepreneur resource routes: declarative method-to-handler wiring only.

use crate::handlers::entrepreneurs::{list, read, update_url};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn entrepreneurs_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list))
        .route("/:id", get(read).put(update_url))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/marketplace_test")
            .unwrap();
        AppState { pool }
    }

    #[tokio::test]
    async fn unsupported_method_is_rejected() {
        let app = entrepreneurs_routes(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let app = entrepreneurs_routes(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/1/products")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_requires_a_category_filter() {
        // rejected while deserializing the query string, before any database work
        let app = entrepreneurs_routes(test_state());
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
