//! crates/lesson_planner_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the lesson planner's external
//! collaborators. These traits form the boundary of the hexagonal architecture,
//! keeping the workflow independent of any particular LLM, image or search vendor.

use async_trait::async_trait;

use crate::domain::{
    Course, ExportPayload, ExportedDeck, MediaCandidate, QuizSet, SearchHit, Subtopic,
    ValidationOutcome,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, SDKs).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Request to external service failed: {0}")]
    Transport(String),
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("Unrecognized response token: '{0}'")]
    UnrecognizedResponse(String),
    #[error("Service is not configured: {0}")]
    NotConfigured(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait TopicClassifier: Send + Sync {
    /// Judges whether `topic` fits the course. Any reply outside the three
    /// known tokens must come back as `PortError::UnrecognizedResponse`.
    async fn classify_topic(&self, course: &Course, topic: &str) -> PortResult<ValidationOutcome>;
}

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Freeform text, one objective per line.
    async fn generate_objectives(&self, course: &Course, topic: &str) -> PortResult<String>;

    /// `objectives` may be empty for speculative suggestions.
    async fn generate_subtopics(
        &self,
        course: &Course,
        topic: &str,
        objectives: &str,
    ) -> PortResult<Vec<Subtopic>>;

    async fn generate_quiz(
        &self,
        course: &Course,
        topic: &str,
        lesson_content: &str,
    ) -> PortResult<QuizSet>;

    async fn generate_summary(
        &self,
        course: &Course,
        topic: &str,
        subtopics: &[Subtopic],
    ) -> PortResult<String>;

    /// Alternative topics for the course, independent of any submitted topic.
    async fn suggest_topics(&self, course: &Course) -> PortResult<Vec<String>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOrientation {
    Landscape,
    Portrait,
    Squarish,
}

impl ImageOrientation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Landscape => "landscape",
            Self::Portrait => "portrait",
            Self::Squarish => "squarish",
        }
    }
}

#[async_trait]
pub trait ImageSearchService: Send + Sync {
    /// Returns ranked image results for a query.
    async fn search_images(
        &self,
        query: &str,
        per_page: u32,
        orientation: ImageOrientation,
    ) -> PortResult<Vec<MediaCandidate>>;
}

#[async_trait]
pub trait ReferenceSearchService: Send + Sync {
    /// Returns ranked web results for a query.
    async fn search_web(&self, query: &str, count: u32) -> PortResult<Vec<SearchHit>>;
}

#[async_trait]
pub trait DeckExporter: Send + Sync {
    /// Serializes the snapshot into a downloadable slide deck.
    async fn export_deck(&self, payload: &ExportPayload) -> PortResult<ExportedDeck>;
}
