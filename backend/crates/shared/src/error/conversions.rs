//! Error conversions
//!
//! HTTP rendering of [`AppError`] as RFC 7807 problem details.

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for super::app_error::AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // RFC 7807 Problem Details for HTTP APIs
        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": self.message(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(all(test, feature = "axum"))]
mod tests {
    use crate::error::app_error::AppError;
    use crate::error::kind::ErrorKind;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_problem_details_status() {
        let response =
            AppError::new(ErrorKind::BadRequest, "Failed to read form body").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response =
            AppError::new(ErrorKind::InternalServerError, "Internal error").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
