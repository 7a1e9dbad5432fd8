//! Maps domain `AppError` to HTTP responses.
//!
//! The `IntoResponse` impl itself lives in `gatehouse-core` next to
//! `AppError` (coherence requires it); this module re-exports the
//! response body type under its original path.

pub use gatehouse_core::error::ApiErrorResponse;

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use gatehouse_core::error::AppError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::not_found("missing"), StatusCode::NOT_FOUND),
            (
                AppError::authentication("no credential"),
                StatusCode::UNAUTHORIZED,
            ),
            (AppError::authorization("admin only"), StatusCode::FORBIDDEN),
            (AppError::validation("bad input"), StatusCode::BAD_REQUEST),
            (AppError::conflict("already closed"), StatusCode::CONFLICT),
            (
                AppError::database("connection refused"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_internal_detail_is_not_leaked() {
        let response = AppError::database("password=hunter2 in DSN").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!body.contains("hunter2"));
        assert!(body.contains("INTERNAL_ERROR"));
    }
}
