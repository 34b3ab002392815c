pub mod protocol;
pub mod rest;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub use rest::{
    create_session_handler, delete_session_handler, export_handler, get_session_handler,
    options_handler, post_event_handler,
};
pub use state::AppState;

/// Builds the lesson API routes. Layers (CORS, tracing, Swagger UI) are added by the binary.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/options", get(options_handler))
        .route("/sessions", post(create_session_handler))
        .route(
            "/sessions/{session_id}",
            get(get_session_handler).delete(delete_session_handler),
        )
        .route("/sessions/{session_id}/events", post(post_event_handler))
        .route("/sessions/{session_id}/export", post(export_handler))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MarkdownDeckExporter;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use lesson_planner_core::{
        ContentGenerator, Course, ImageOrientation, ImageSearchService, LessonWorkflow,
        MediaCandidate, PortResult, QuizSet, ReferenceSearchService, SearchHit, Subtopic,
        TopicClassifier, ValidationOutcome,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    /// Answers every port with a fixed, valid reply.
    struct StubServices;

    #[async_trait]
    impl TopicClassifier for StubServices {
        async fn classify_topic(&self, _: &Course, _: &str) -> PortResult<ValidationOutcome> {
            Ok(ValidationOutcome::Valid)
        }
    }

    #[async_trait]
    impl ContentGenerator for StubServices {
        async fn generate_objectives(&self, _: &Course, _: &str) -> PortResult<String> {
            Ok("- Describe the water cycle".to_string())
        }

        async fn generate_subtopics(
            &self,
            _: &Course,
            _: &str,
            _: &str,
        ) -> PortResult<Vec<Subtopic>> {
            Ok(vec![Subtopic {
                title: "Evaporation".to_string(),
                content: "Water turns into vapour.".to_string(),
                key_concepts: vec!["Heat".to_string()],
                examples: vec!["Drying clothes".to_string()],
                misconceptions: vec!["Only boiling water evaporates".to_string()],
            }])
        }

        async fn generate_quiz(&self, _: &Course, _: &str, _: &str) -> PortResult<QuizSet> {
            Ok(QuizSet::default())
        }

        async fn generate_summary(
            &self,
            _: &Course,
            _: &str,
            _: &[Subtopic],
        ) -> PortResult<String> {
            Ok("Water moves in a cycle.".to_string())
        }

        async fn suggest_topics(&self, _: &Course) -> PortResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    #[async_trait]
    impl ImageSearchService for StubServices {
        async fn search_images(
            &self,
            _: &str,
            _: u32,
            _: ImageOrientation,
        ) -> PortResult<Vec<MediaCandidate>> {
            Ok(vec![MediaCandidate {
                url: "https://images.unsplash.com/cloud".to_string(),
                credit: "Ada".to_string(),
                profile: "https://unsplash.com/@ada".to_string(),
            }])
        }
    }

    #[async_trait]
    impl ReferenceSearchService for StubServices {
        async fn search_web(&self, _: &str, _: u32) -> PortResult<Vec<SearchHit>> {
            Ok(Vec::new())
        }
    }

    fn test_router() -> Router {
        let stub = Arc::new(StubServices);
        let workflow = LessonWorkflow::new(
            stub.clone(),
            stub.clone(),
            stub.clone(),
            stub,
            Arc::new(MarkdownDeckExporter::new()),
        );
        router(Arc::new(AppState::new(workflow)))
    }

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn new_session(router: &Router) -> String {
        let (status, body) = send(router, Method::POST, "/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        let created: Value = serde_json::from_slice(&body).unwrap();
        created["session_id"].as_str().unwrap().to_string()
    }

    fn submit_event() -> Value {
        submit_topic("Water Cycle")
    }

    fn submit_topic(topic: &str) -> Value {
        json!({
            "type": "submit_topic",
            "curriculum": "CBSE",
            "grade": "Grade 6",
            "subject": "Science",
            "topic": topic
        })
    }

    async fn export_lesson_on(router: &Router, topic: &str) -> axum::response::Response {
        let id = new_session(router).await;
        send(
            router,
            Method::POST,
            &format!("/sessions/{}/events", id),
            Some(submit_topic(topic)),
        )
        .await;

        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/sessions/{}/export", id))
            .body(Body::empty())
            .unwrap();
        router.clone().oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn options_list_curricula_and_grades() {
        let router = test_router();
        let (status, body) = send(&router, Method::GET, "/options", None).await;

        assert_eq!(status, StatusCode::OK);
        let options: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(options["grades"].as_array().unwrap().len(), 13);
        assert_eq!(options["grades"][12], "College");
        assert_eq!(options["curricula"][0], "CBSE");
    }

    #[tokio::test]
    async fn new_session_starts_empty() {
        let router = test_router();
        let id = new_session(&router).await;

        let (status, body) = send(&router, Method::GET, &format!("/sessions/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        let response: Value = serde_json::from_slice(&body).unwrap();
        assert!(response["notices"].as_array().unwrap().is_empty());
        assert!(response["view"]["accepted_topic"].is_null());
        assert!(response["view"]["subtopics"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let router = test_router();
        let uri = format!("/sessions/{}", uuid::Uuid::new_v4());
        let (status, _) = send(&router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let events = format!("{}/events", uri);
        let (status, _) = send(&router, Method::POST, &events, Some(submit_event())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn submitting_a_valid_topic_builds_the_lesson() {
        let router = test_router();
        let id = new_session(&router).await;

        let (status, body) = send(
            &router,
            Method::POST,
            &format!("/sessions/{}/events", id),
            Some(submit_event()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let response: Value = serde_json::from_slice(&body).unwrap();
        let view = &response["view"];
        assert!(response["notices"].as_array().unwrap().is_empty());
        assert_eq!(view["accepted_topic"], "Water Cycle");
        assert_eq!(view["last_outcome"], "valid");
        assert_eq!(view["subtopics"][0]["title"], "Evaporation");
        assert_eq!(
            view["subtopics"][0]["candidates"][0]["url"],
            "https://images.unsplash.com/cloud"
        );
        assert!(view["subtopics"][0]["selected_image"].is_null());
        assert_eq!(view["summary"], "Water moves in a cycle.");
    }

    #[tokio::test]
    async fn malformed_event_is_rejected() {
        let router = test_router();
        let id = new_session(&router).await;

        let (status, _) = send(
            &router,
            Method::POST,
            &format!("/sessions/{}/events", id),
            Some(json!({ "type": "launch_rocket" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn export_requires_a_lesson() {
        let router = test_router();
        let id = new_session(&router).await;
        let export = format!("/sessions/{}/export", id);
        let (status, body) = send(&router, Method::POST, &export, None).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert!(String::from_utf8(body).unwrap().contains("Nothing to export"));
    }

    #[tokio::test]
    async fn export_downloads_the_deck() {
        let router = test_router();
        let response = export_lesson_on(&router, "Water Cycle").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Lesson_Science_Water_Cycle.md\""
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let deck = String::from_utf8(body.to_vec()).unwrap();
        assert!(deck.contains("## Part 1: Evaporation"));
    }

    #[tokio::test]
    async fn export_file_name_survives_quotes_and_newlines() {
        let router = test_router();
        let response = export_lesson_on(&router, "Cells \"A\"\nB").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Lesson_Science_Cells__A__B.md\""
        );
    }

    #[tokio::test]
    async fn deleted_session_is_gone() {
        let router = test_router();
        let id = new_session(&router).await;
        let uri = format!("/sessions/{}", id);

        let (status, _) = send(&router, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&router, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
