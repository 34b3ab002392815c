//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI document.

use crate::web::{
    protocol::{CreateSessionResponse, FormOptions, SessionResponse},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::{
        header::{self, HeaderName, InvalidHeaderValue},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Json},
};
use lesson_planner_core::{ExportedDeck, LessonEvent, WorkflowError};
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::OpenApi;
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        options_handler,
        create_session_handler,
        get_session_handler,
        delete_session_handler,
        post_event_handler,
        export_handler,
    ),
    components(
        schemas(FormOptions, CreateSessionResponse, SessionResponse)
    ),
    tags(
        (name = "Lesson Planner API", description = "API endpoints for the AI lesson planner.")
    )
)]
pub struct ApiDoc;

type HandlerError = (StatusCode, String);

fn session_not_found(session_id: Uuid) -> HandlerError {
    (
        StatusCode::NOT_FOUND,
        format!("Session {} not found", session_id),
    )
}

fn deck_headers(deck: &ExportedDeck) -> Result<[(HeaderName, HeaderValue); 2], InvalidHeaderValue> {
    let disposition = format!("attachment; filename=\"{}\"", deck.file_name);
    Ok([
        (header::CONTENT_TYPE, HeaderValue::from_str(&deck.content_type)?),
        (header::CONTENT_DISPOSITION, HeaderValue::from_str(&disposition)?),
    ])
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List the curricula and grades the lesson form offers.
#[utoipa::path(
    get,
    path = "/options",
    responses((status = 200, description = "Form choices", body = FormOptions))
)]
pub async fn options_handler() -> Json<FormOptions> {
    Json(FormOptions::standard())
}

/// Start a new, empty lesson session.
#[utoipa::path(
    post,
    path = "/sessions",
    responses((status = 201, description = "Session created successfully", body = CreateSessionResponse))
)]
pub async fn create_session_handler(
    State(app_state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let (session_id, session) = app_state.sessions.create().await;
    let created_at = session.lock().await.created_at;
    info!("Created lesson session {}", session_id);
    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            created_at,
        }),
    )
}

/// Fetch the current lesson view of a session.
#[utoipa::path(
    get,
    path = "/sessions/{session_id}",
    params(("session_id" = Uuid, Path, description = "The lesson session.")),
    responses(
        (status = 200, description = "Current lesson view", body = SessionResponse),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn get_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionResponse>, HandlerError> {
    let session = app_state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| session_not_found(session_id))?;
    let session = session.lock().await;
    Ok(Json(SessionResponse::new(Vec::new(), &session)))
}

/// Discard a session and everything cached for it.
#[utoipa::path(
    delete,
    path = "/sessions/{session_id}",
    params(("session_id" = Uuid, Path, description = "The lesson session.")),
    responses(
        (status = 204, description = "Session removed"),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn delete_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, HandlerError> {
    if app_state.sessions.remove(session_id).await {
        info!("Removed lesson session {}", session_id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(session_id))
    }
}

/// Apply one user action to a session.
///
/// The body is a lesson event tagged by `type`: `submit_topic`,
/// `use_suggested_subtopic`, `use_alternative_topic`, `assemble_lesson`,
/// `refresh_images`, `select_image`, `toggle_answer` or `set_toggles`.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/events",
    params(("session_id" = Uuid, Path, description = "The lesson session.")),
    request_body(content = serde_json::Value, description = "A lesson event."),
    responses(
        (status = 200, description = "Event handled; notices describe any failure", body = SessionResponse),
        (status = 404, description = "Unknown session"),
        (status = 422, description = "Body is not a lesson event")
    )
)]
pub async fn post_event_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(event): Json<LessonEvent>,
) -> Result<Json<SessionResponse>, HandlerError> {
    let session = app_state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| session_not_found(session_id))?;

    // Held for the whole action: events on one session never interleave.
    let mut session = session.lock().await;
    let notices = app_state.workflow.handle(&mut session, event).await;
    Ok(Json(SessionResponse::new(notices, &session)))
}

/// Download the lesson as a slide deck.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/export",
    params(("session_id" = Uuid, Path, description = "The lesson session.")),
    responses(
        (status = 200, description = "The slide deck file", content_type = "text/markdown"),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "No lesson has been generated yet"),
        (status = 500, description = "Deck generation failed")
    )
)]
pub async fn export_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    let session = app_state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| session_not_found(session_id))?;
    let session = session.lock().await;

    match app_state.workflow.export(&session).await {
        Ok(deck) => {
            info!("Exported {} ({} bytes)", deck.file_name, deck.bytes.len());
            let headers = deck_headers(&deck).map_err(|e| {
                error!("Unusable deck headers for session {}: {}", session_id, e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Error generating slide deck: {}", e),
                )
            })?;
            Ok((headers, deck.bytes))
        }
        Err(e @ WorkflowError::NothingToExport) => {
            warn!("Export requested before any lesson for {}", session_id);
            Err((StatusCode::CONFLICT, e.notice().message))
        }
        Err(e) => {
            error!("Failed to export session {}: {:?}", session_id, e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.notice().message))
        }
    }
}
