//! Error types for fintrack-web JSON endpoints

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use fintrack_client::{ClientError, ErrorKind};

#[derive(Error, Debug)]
pub enum WebError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Finance API error: {0}")]
    Upstream(#[from] ClientError),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::Unauthorized => StatusCode::UNAUTHORIZED,
            WebError::Upstream(e) => match e.kind() {
                ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
                ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Rejected => StatusCode::BAD_REQUEST,
                ErrorKind::Server | ErrorKind::Decode => StatusCode::BAD_GATEWAY,
            },
        }
    }

    pub fn code(&self) -> String {
        match self {
            WebError::Unauthorized => "UNAUTHORIZED".to_string(),
            WebError::Upstream(e) => e.kind().to_string(),
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            WebError::Unauthorized => vec!["Log in at /login first.".to_string()],
            WebError::Upstream(e) => e.suggestions(),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        let mut body = serde_json::json!({
            "code": self.code(),
            "message": self.to_string(),
        });
        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            body["suggestions"] = serde_json::json!(suggestions);
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_upstream_status_mapping() {
        let error = WebError::from(ClientError::Unavailable {
            message: "refused".to_string(),
        });
        assert_eq!(error.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(error.code(), "UNAVAILABLE");

        let error = WebError::from(ClientError::NotFound {
            resource: "budgets/3".to_string(),
        });
        assert_eq!(error.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unauthorized_response() {
        let response = WebError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert_eq!(body["suggestions"][0], "Log in at /login first.");
    }

    #[tokio::test]
    async fn test_unavailable_body_carries_client_hints() {
        let response = WebError::from(ClientError::Unavailable {
            message: "connection refused".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert!(body["message"].as_str().unwrap().contains("connection refused"));
        assert!(body["suggestions"][0].as_str().unwrap().contains("api.base_url"));
    }

    #[tokio::test]
    async fn test_rejected_body_omits_empty_hints() {
        let body = json_body(WebError::from(ClientError::rejected("bad")).into_response()).await;
        assert_eq!(body["code"], "REJECTED");
        assert!(body.get("suggestions").is_none());
    }
}
