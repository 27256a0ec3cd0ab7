//! HTTP handlers for the server.

pub mod inserts;
pub mod sessions;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::{InsertError, ValidationErrors};

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<ValidationErrors>,
}

/// Error response: a status code and a JSON body with the message (plus the
/// field errors for validation failures).
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, message: String) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: message,
                fields: None,
            },
        }
    }
}

impl From<InsertError> for ApiError {
    fn from(err: InsertError) -> Self {
        let status = match &err {
            InsertError::Validation(_) | InsertError::QrGeneration(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            InsertError::Json(_) => StatusCode::BAD_REQUEST,
            InsertError::ImageLoad(_) => StatusCode::BAD_GATEWAY,
            InsertError::Image(_) | InsertError::Server(_) | InsertError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            tracing::error!(error = %err, "request failed");
        }

        let message = err.to_string();
        let fields = match err {
            InsertError::Validation(errors) => Some(errors),
            _ => None,
        };
        Self {
            status,
            body: ErrorBody {
                error: message,
                fields,
            },
        }
    }
}

/// Unreadable request bodies: 400 for malformed JSON, 422 when the JSON does
/// not fit the request type, 415 without a JSON content type.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "rejected request body");
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        InsertError::from(errors).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::render::context::{RenderConfig, RenderContext};
    use crate::server::{
        router,
        state::{AppState, ServerConfig},
    };

    const STYLE: &str = "Basic (4\" X 6\")";

    fn app() -> Router {
        let state = AppState::new(
            ServerConfig {
                listen_addr: "127.0.0.1:0".into(),
                render: RenderConfig::default(),
            },
            RenderContext::offline(),
        );
        router(Arc::new(state))
    }

    fn design() -> Value {
        json!({
            "name": "Spring",
            "style_size": STYLE,
            "survey_id": "survey-1",
            "include_logo": false,
            "background_color": "#f0f9ff",
            "headline": "Thanks!",
            "subtitle": "Enjoy",
            "brand_url": ""
        })
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn json_request(uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn send_raw(app: Router, uri: &str, body: &'static str) -> (StatusCode, Value) {
        let response = app.oneshot(json_request(uri, body)).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, json_body(&bytes))
    }

    fn json_body(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_styles() {
        let (status, body) = send(app(), "GET", "/api/styles", None).await;
        assert_eq!(status, StatusCode::OK);
        let styles = json_body(&body);
        assert_eq!(styles.as_array().unwrap().len(), 4);
        let basic = &styles[1];
        assert_eq!(basic["label"], STYLE);
        assert_eq!(basic["dimensions"]["width"], 360);
        assert_eq!(basic["print_width"], 540);
        assert_eq!(basic["print_height"], 360);
    }

    #[tokio::test]
    async fn test_validate_reports_every_field() {
        let mut d = design();
        d["name"] = json!("");
        d["background_color"] = json!("red");
        let (status, body) = send(app(), "POST", "/api/inserts/validate", Some(d)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(&body);
        assert_eq!(body["valid"], false);
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, ["name", "background_color"]);
    }

    #[tokio::test]
    async fn test_validate_ok() {
        let (status, body) = send(app(), "POST", "/api/inserts/validate", Some(design())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["valid"], true);
    }

    #[tokio::test]
    async fn test_preview_without_survey_url() {
        let (status, body) = send(
            app(),
            "POST",
            "/api/inserts/preview",
            Some(json!({ "design": design() })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body = json_body(&body);
        assert_eq!(body["dimensions"]["width"], 360);
        assert_eq!(body["dimmed"], false);
        assert_eq!(body["content"]["kind"], "frame");
        assert!(String::from_utf8_lossy(&serde_json::to_vec(&body).unwrap()).contains("QR Code"));
    }

    #[tokio::test]
    async fn test_export_requires_survey_url() {
        let (status, body) = send(
            app(),
            "POST",
            "/api/inserts/export",
            Some(json!({ "design": design() })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(json_body(&body)["error"].as_str().unwrap().contains("QR generation"));
    }

    #[tokio::test]
    async fn test_export_rejects_invalid_design() {
        let mut d = design();
        d["survey_id"] = json!("");
        let (status, body) = send(
            app(),
            "POST",
            "/api/inserts/export",
            Some(json!({ "design": d, "survey_url": "https://example.com/s/1" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(&body)["fields"][0]["field"], "survey_id");
    }

    #[tokio::test]
    async fn test_export_returns_assets() {
        let (status, body) = send(
            app(),
            "POST",
            "/api/inserts/export",
            Some(json!({ "design": design(), "surveyUrl": "https://example.com/s/1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body = json_body(&body);
        assert!(body["printImage"].as_str().unwrap().starts_with("data:image/png;base64,"));
        assert!(body["qrCode"].as_str().unwrap().starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_print_png() {
        let (status, body) = send(
            app(),
            "POST",
            "/api/inserts/print.png",
            Some(json!({ "design": design(), "survey_url": "https://example.com/s/1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let img = image::load_from_memory(&body).unwrap();
        assert_eq!((img.width(), img.height()), (540, 360));
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_json_error() {
        for uri in ["/api/inserts/export", "/api/inserts/validate", "/api/inserts/print.png"] {
            let (status, body) = send_raw(app(), uri, "{not json").await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(body["error"].as_str().unwrap().contains("JSON"), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_mistyped_body_is_a_json_error() {
        let (status, body) = send_raw(app(), "/api/inserts/preview", "{}").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("design"));
    }

    #[tokio::test]
    async fn test_session_malformed_json() {
        let app = app();
        let (_, body) = send(app.clone(), "POST", "/api/sessions", None).await;
        let id = json_body(&body)["id"].as_str().unwrap().to_string();
        let response = app
            .oneshot(json_request(&format!("/api/sessions/{id}/export"), "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(json_body(&bytes)["error"].is_string());
    }

    #[tokio::test]
    async fn test_print_png_disposition_with_control_chars() {
        let mut d = design();
        d["name"] = json!("Spring\nSale \"24\"");
        let body = json!({ "design": d, "survey_url": "https://example.com/s/1" });
        let response = app()
            .oneshot(json_request("/api/inserts/print.png", body.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Spring_Sale _24_-print.png\""
        );
    }

    #[tokio::test]
    async fn test_session_flow() {
        let app = app();
        let (status, body) = send(app.clone(), "POST", "/api/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = json_body(&body)["id"].as_str().unwrap().to_string();

        let (status, _) = send(app.clone(), "GET", &format!("/api/sessions/{id}/export"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let request = json!({ "design": design(), "survey_url": "https://example.com/s/1" });
        let (status, body) = send(
            app.clone(),
            "POST",
            &format!("/api/sessions/{id}/preview"),
            Some(request.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["content_key"], 0);

        let (status, exported) = send(
            app.clone(),
            "POST",
            &format!("/api/sessions/{id}/export"),
            Some(request),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, latest) = send(app, "GET", &format!("/api/sessions/{id}/export"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&latest), json_body(&exported));
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let (status, _) = send(
            app(),
            "POST",
            "/api/sessions/nope/export",
            Some(json!({ "design": design(), "survey_url": "https://example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
