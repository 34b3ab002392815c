//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the in-memory session store.

use lesson_planner_core::{LessonSession, LessonWorkflow};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub workflow: LessonWorkflow,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(workflow: LessonWorkflow) -> Self {
        Self {
            workflow,
            sessions: Arc::new(SessionStore::default()),
        }
    }
}

//=========================================================================================
// SessionStore (One Entry per Lesson Session)
//=========================================================================================

/// Sessions live only in memory. Each one sits behind its own lock so that an
/// action runs to completion before the next action on the same session starts.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Arc<Mutex<LessonSession>>>>,
}

impl SessionStore {
    pub async fn create(&self) -> (Uuid, Arc<Mutex<LessonSession>>) {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(LessonSession::new()));
        self.sessions.lock().await.insert(id, session.clone());
        (id, session)
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<LessonSession>>> {
        self.sessions.lock().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.lock().await.remove(&id).is_some()
    }
}
