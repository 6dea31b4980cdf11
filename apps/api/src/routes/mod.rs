pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::history::handlers as history;
use crate::questions::handlers as questions;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Browser-facing generation route
        .route(
            "/api/generate-questions",
            post(questions::handle_generate_questions),
        )
        // Questions API
        .route(
            "/api/v1/questions/generate",
            post(questions::handle_generate),
        )
        .route(
            "/api/v1/questions/regenerate",
            post(questions::handle_regenerate),
        )
        .route(
            "/api/v1/questions/progress",
            get(questions::handle_progress),
        )
        .route("/api/v1/questions/export", post(questions::handle_export))
        // History API
        .route(
            "/api/v1/history",
            get(history::handle_list_history).delete(history::handle_clear_history),
        )
        .route(
            "/api/v1/history/:id",
            get(history::handle_get_history_entry).delete(history::handle_remove_history_entry),
        )
        .route(
            "/api/v1/history/:id/export",
            get(history::handle_export_history_entry),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::document::DocumentParser;
    use crate::history::store::MemoryHistoryStore;
    use crate::history::HistoryRepository;
    use crate::models::question::{Category, GenerationRequest, Question};
    use crate::questions::generator::QuestionGenerator;
    use crate::questions::normalizer::normalize_questions;
    use crate::questions::source::QuestionSource;

    /// Answers with a canned model reply run through the real normalizer.
    struct CannedSource;

    #[async_trait]
    impl QuestionSource for CannedSource {
        async fn generate_questions(&self, request: &GenerationRequest) -> Vec<Question> {
            let reply = "```json\n[{\"text\":\"Explain your caching strategy\",\"category\":\"technical\"}]\n```";
            normalize_questions(reply, request.question_count)
        }
    }

    /// Counts calls and returns nothing.
    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl QuestionSource for CountingSource {
        async fn generate_questions(&self, _request: &GenerationRequest) -> Vec<Question> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Vec::new()
        }
    }

    fn app() -> Router {
        app_with(Arc::new(CannedSource))
    }

    fn app_with(source: Arc<dyn QuestionSource>) -> Router {
        let history = HistoryRepository::new(Arc::new(MemoryHistoryStore::default()));
        let generator = QuestionGenerator::new(
            Arc::new(DocumentParser),
            source.clone(),
            history.clone(),
        );
        build_router(AppState {
            llm_source: source,
            generator: Arc::new(generator),
            history,
        })
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    const BOUNDARY: &str = "questioner-test-boundary";

    fn multipart_request(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app().oneshot(empty_request("GET", "/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_generate_questions_requires_both_fields() {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/api/generate-questions",
                json!({ "resumeText": "Jane Doe" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("jobDescription"));
    }

    #[tokio::test]
    async fn test_generate_questions_returns_questions() {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/api/generate-questions",
                json!({
                    "resumeText": "Jane Doe, Rust",
                    "jobDescription": "Backend engineer",
                    "questionCount": 3
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        let questions: Vec<Question> = serde_json::from_value(body["questions"].clone()).unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].text, "Explain your caching strategy");
        assert_eq!(questions[0].category, Category::Technical);
    }

    #[tokio::test]
    async fn test_generate_questions_rejects_blank_fields_without_calling_model() {
        let source = Arc::new(CountingSource::default());
        let response = app_with(source.clone())
            .oneshot(json_request(
                "POST",
                "/api/generate-questions",
                json!({ "resumeText": "   ", "jobDescription": "  \n " }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json(response).await["error"],
            "Missing required fields: resumeText and jobDescription"
        );
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generate_questions_malformed_body_gets_error_json() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/generate-questions")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{\"resumeText\": "))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_generate_questions_ignores_unknown_categories() {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/api/generate-questions",
                json!({
                    "resumeText": "Jane Doe, Rust",
                    "jobDescription": "Backend engineer",
                    "questionCount": 3,
                    "questionTypes": ["technical", "trivia"]
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["questions"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_generate_questions_rejects_out_of_range_count() {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/api/generate-questions",
                json!({
                    "resumeText": "Jane",
                    "jobDescription": "Backend engineer",
                    "questionCount": 50
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_form_generation_saves_history() {
        let app = app();
        let response = app
            .clone()
            .oneshot(multipart_request(
                "/api/v1/questions/generate",
                &[
                    ("resume_text", "Jane Doe, five years of Rust"),
                    ("job_title", "Backend Engineer"),
                    ("company_name", "Acme"),
                    ("job_description", "Own our ingestion pipeline"),
                    ("question_count", "5"),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["questions"].as_array().unwrap().len(), 5);

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/api/v1/questions/progress"))
            .await
            .unwrap();
        assert_eq!(read_json(response).await["progress"], 100);

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/api/v1/history"))
            .await
            .unwrap();
        let history = read_json(response).await;
        assert_eq!(history.as_array().unwrap().len(), 1);
        assert_eq!(history[0]["jobTitle"], "Backend Engineer");
        assert_eq!(history[0]["companyName"], "Acme");

        let id = history[0]["id"].as_str().unwrap().to_string();
        let response = app
            .clone()
            .oneshot(empty_request(
                "GET",
                &format!("/api/v1/history/{id}/export?format=csv"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8(bytes.to_vec())
            .unwrap()
            .starts_with("ID,Question,Category\nq1,\"Explain your caching strategy\",technical"));

        let response = app
            .clone()
            .oneshot(empty_request("DELETE", &format!("/api/v1/history/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(empty_request("GET", &format!("/api/v1/history/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_form_generation_rejects_blank_resume() {
        let response = app()
            .oneshot(multipart_request(
                "/api/v1/questions/generate",
                &[("job_description", "Own our ingestion pipeline")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_regenerate_ignores_config_fields() {
        let response = app()
            .oneshot(multipart_request(
                "/api/v1/questions/regenerate",
                &[
                    ("resume_text", "Jane Doe"),
                    ("job_description", "Own our ingestion pipeline"),
                    ("question_count", "3"),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        // One model question plus the four fallback questions under the default count of 8.
        assert_eq!(read_json(response).await["questions"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_export_endpoint_renders_text() {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/api/v1/questions/export?format=text",
                json!({ "questions": [
                    { "id": "q1", "text": "Explain your caching strategy", "category": "technical" }
                ]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"1. [technical] Explain your caching strategy");
    }

    #[tokio::test]
    async fn test_clear_history() {
        let app = app();
        let response = app
            .clone()
            .oneshot(empty_request("DELETE", "/api/v1/history"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(empty_request("GET", "/api/v1/history"))
            .await
            .unwrap();
        assert_eq!(read_json(response).await, json!([]));
    }
}
