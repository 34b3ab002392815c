//! services/api/src/web/protocol.rs
//!
//! Defines the JSON bodies exchanged between the browser client and the API server.
//! Requests on the events endpoint are `lesson_planner_core::LessonEvent` values,
//! tagged by `type` in snake_case.

use chrono::{DateTime, Utc};
use lesson_planner_core::{LessonSession, LessonView, Notice};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

const CURRICULA: &[&str] = &["CBSE", "ICSE", "IGCSE", "State Board", "IB"];

/// The choices offered by the lesson form.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct FormOptions {
    pub curricula: Vec<String>,
    pub grades: Vec<String>,
}

impl FormOptions {
    pub fn standard() -> Self {
        let mut grades: Vec<String> = (1..=12).map(|g| format!("Grade {}", g)).collect();
        grades.push("College".to_string());
        Self {
            curricula: CURRICULA.iter().map(|c| c.to_string()).collect(),
            grades,
        }
    }
}

/// The response payload sent after successfully creating a session.
#[derive(Serialize, Debug, ToSchema)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Messages produced by the last action, plus the lesson rebuilt from session state.
#[derive(Serialize, Debug, ToSchema)]
pub struct SessionResponse {
    #[schema(value_type = Vec<Object>)]
    pub notices: Vec<Notice>,
    #[schema(value_type = Object)]
    pub view: LessonView,
}

impl SessionResponse {
    pub fn new(notices: Vec<Notice>, session: &LessonSession) -> Self {
        Self {
            notices,
            view: LessonView::build(session),
        }
    }
}
