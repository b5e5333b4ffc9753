use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    /// The upstream school backend could not be reached.
    pub fn bad_gateway<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_GATEWAY, err)
    }

    /// Relays a status an upstream service answered with. Codes outside
    /// the error range become a 502.
    pub fn upstream<E>(status: u16, err: E) -> Self
    where
        E: Into<Error>,
    {
        match StatusCode::from_u16(status) {
            Ok(code) if code.is_client_error() || code.is_server_error() => Self::new(code, err),
            _ => Self::bad_gateway(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.error.to_string()
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use http_body_util::BodyExt;

    #[test]
    fn test_constructors_set_status() {
        assert_eq!(
            AppError::not_found(anyhow!("gone")).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::conflict(anyhow!("locked")).status,
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::bad_gateway(anyhow!("down")).status,
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_upstream_relays_error_statuses_only() {
        assert_eq!(
            AppError::upstream(409, anyhow!("taken")).status,
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::upstream(503, anyhow!("busy")).status,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::upstream(200, anyhow!("odd")).status,
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::upstream(42, anyhow!("bogus")).status,
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_from_defaults_to_internal() {
        let err: AppError = std::io::Error::other("disk").into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = AppError::bad_request(anyhow!("name is required")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "name is required");
    }
}
