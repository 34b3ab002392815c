//! crates/lesson_planner_core/src/workflow.rs
//!
//! The lesson workflow controller. Each user action arrives as a `LessonEvent`,
//! runs its sequence of external calls to completion against the session it was
//! handed, and leaves the session ready for a fresh `LessonView`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{
    Course, ExportedDeck, LessonForm, MediaCandidate, Notice, QuizSet, Reference, RevealKey,
    SubtopicKey, ValidationOutcome,
};
use crate::media;
use crate::ports::{
    ContentGenerator, DeckExporter, ImageSearchService, PortError, ReferenceSearchService,
    TopicClassifier,
};
use crate::references;
use crate::session::{LessonSession, PendingSuggestions};

//=========================================================================================
// Events and Errors
//=========================================================================================

/// Every user action the workflow understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LessonEvent {
    /// The lesson form was submitted.
    SubmitTopic(LessonForm),
    /// One of the speculative subtopics shown after an "irrelevant" verdict was picked.
    UseSuggestedSubtopic { index: usize },
    /// One of the alternative topics was picked.
    UseAlternativeTopic { topic: String },
    /// Rebuild the lesson content for the accepted topic.
    AssembleLesson,
    RefreshImages { key: SubtopicKey },
    SelectImage { key: SubtopicKey, candidate: usize },
    ToggleAnswer { key: RevealKey },
    SetToggles {
        include_visuals: bool,
        include_references: bool,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Please enter both subject and topic")]
    MissingInput,
    #[error("Topic check is unavailable right now: {0}")]
    Classifier(#[source] PortError),
    #[error("The topic check returned an unexpected answer ('{0}'). Please try again.")]
    UnrecognizedClassification(String),
    #[error("Couldn't generate related content. Please try a different topic.")]
    SuggestionGeneration(#[source] PortError),
    #[error("Couldn't generate lesson content: {0}")]
    SubtopicGeneration(#[source] PortError),
    #[error("No topic has been accepted yet")]
    NoAcceptedTopic,
    #[error("There are no pending suggestions")]
    NoPendingSuggestions,
    #[error("Unknown suggestion: {0}")]
    UnknownSuggestion(String),
    #[error("Unknown subtopic: {0}")]
    UnknownSubtopic(SubtopicKey),
    #[error("Image {index} is not available for '{key}'")]
    CandidateOutOfRange { key: SubtopicKey, index: usize },
    #[error("Nothing to export yet, generate a lesson first")]
    NothingToExport,
    #[error("Error generating slide deck: {0}")]
    Export(#[source] PortError),
}

impl WorkflowError {
    /// The user-facing form of this error.
    pub fn notice(&self) -> Notice {
        match self {
            Self::MissingInput | Self::NoAcceptedTopic | Self::NothingToExport => {
                Notice::warning(self.to_string())
            }
            _ => Notice::error(self.to_string()),
        }
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

const HARMFUL_MESSAGE: &str = "This topic isn't appropriate for the selected grade level";

//=========================================================================================
// The Controller
//=========================================================================================

/// Orchestrates the external collaborators. Holds no session state of its own.
#[derive(Clone)]
pub struct LessonWorkflow {
    classifier: Arc<dyn TopicClassifier>,
    content: Arc<dyn ContentGenerator>,
    images: Arc<dyn ImageSearchService>,
    search: Arc<dyn ReferenceSearchService>,
    exporter: Arc<dyn DeckExporter>,
}

impl LessonWorkflow {
    pub fn new(
        classifier: Arc<dyn TopicClassifier>,
        content: Arc<dyn ContentGenerator>,
        images: Arc<dyn ImageSearchService>,
        search: Arc<dyn ReferenceSearchService>,
        exporter: Arc<dyn DeckExporter>,
    ) -> Self {
        Self {
            classifier,
            content,
            images,
            search,
            exporter,
        }
    }

    /// Runs one event to completion. Failures never escape; they come back as notices.
    pub async fn handle(&self, session: &mut LessonSession, event: LessonEvent) -> Vec<Notice> {
        debug!("Handling event: {:?}", event);
        let result = match event {
            LessonEvent::SubmitTopic(form) => self.on_submit(session, form).await,
            LessonEvent::UseSuggestedSubtopic { index } => {
                match self.accept_suggested_subtopic(session, index).await {
                    Ok(()) => self.display_pass(session).await,
                    Err(e) => Err(e),
                }
            }
            LessonEvent::UseAlternativeTopic { topic } => {
                match self.accept_alternative_topic(session, topic).await {
                    Ok(()) => self.display_pass(session).await,
                    Err(e) => Err(e),
                }
            }
            LessonEvent::AssembleLesson => self.display_pass(session).await,
            LessonEvent::RefreshImages { key } => self
                .refresh_images(session, key)
                .await
                .map(|_| Vec::new()),
            LessonEvent::SelectImage { key, candidate } => {
                Self::select_image(session, key, candidate).map(|()| Vec::new())
            }
            LessonEvent::ToggleAnswer { key } => {
                session.toggle_reveal(key);
                Ok(Vec::new())
            }
            LessonEvent::SetToggles {
                include_visuals,
                include_references,
            } => {
                session.include_visuals = include_visuals;
                session.include_references = include_references;
                Ok(Vec::new())
            }
        };
        session.touch();

        match result {
            Ok(notices) => notices,
            Err(e) => {
                warn!("Event failed: {}", e);
                vec![e.notice()]
            }
        }
    }

    async fn on_submit(
        &self,
        session: &mut LessonSession,
        form: LessonForm,
    ) -> WorkflowResult<Vec<Notice>> {
        let topic = form.topic.clone();
        let subject = form.subject.clone();
        match self.resolve_topic(session, form).await? {
            ValidationOutcome::Valid => self.display_pass(session).await,
            ValidationOutcome::Irrelevant => Ok(vec![Notice::warning(format!(
                "'{}' may not perfectly match {}. But here are some related subtopics we found:",
                topic, subject
            ))]),
            ValidationOutcome::Harmful => Ok(vec![Notice::error(HARMFUL_MESSAGE)]),
        }
    }

    async fn display_pass(&self, session: &mut LessonSession) -> WorkflowResult<Vec<Notice>> {
        let course = session.course().ok_or(WorkflowError::NoAcceptedTopic)?;
        self.assemble_lesson(session, &course).await?;
        Ok(Vec::new())
    }

    //-------------------------------------------------------------------------------------
    // Topic resolution
    //-------------------------------------------------------------------------------------

    /// Classifies the submitted topic and moves the session into the matching state.
    pub async fn resolve_topic(
        &self,
        session: &mut LessonSession,
        form: LessonForm,
    ) -> WorkflowResult<ValidationOutcome> {
        session.include_visuals = form.include_visuals;
        session.include_references = form.include_references;

        if form.subject.trim().is_empty() || form.topic.trim().is_empty() {
            return Err(WorkflowError::MissingInput);
        }

        let course = form.course();
        info!(
            "Classifying topic '{}' for {} {} ({})",
            form.topic, course.grade, course.subject, course.curriculum
        );
        let outcome = self
            .classifier
            .classify_topic(&course, &form.topic)
            .await
            .map_err(|e| match e {
                PortError::UnrecognizedResponse(token) => {
                    WorkflowError::UnrecognizedClassification(token)
                }
                other => WorkflowError::Classifier(other),
            })?;
        info!("Topic '{}' classified as {}", form.topic, outcome.as_str());

        match outcome {
            ValidationOutcome::Valid => {
                let topic = form.topic.clone();
                session.form = Some(form);
                session.last_outcome = Some(outcome);
                self.adopt_topic(session, &course, topic).await;
            }
            ValidationOutcome::Irrelevant => {
                session.last_outcome = Some(outcome);
                session.suggestions = None;
                let speculative = self
                    .content
                    .generate_subtopics(&course, &form.topic, "")
                    .await
                    .map_err(WorkflowError::SuggestionGeneration)?;

                let topics = match self.content.suggest_topics(&course).await {
                    Ok(topics) => topics,
                    Err(e) => {
                        warn!("Alternative topic suggestions failed: {}", e);
                        Vec::new()
                    }
                };

                session.suggestions = Some(PendingSuggestions {
                    submitted_topic: form.topic.clone(),
                    subtopics: speculative,
                    topics,
                });
                session.form = Some(form);
            }
            ValidationOutcome::Harmful => {
                session.last_outcome = Some(outcome);
                session.suggestions = None;
                warn!("Topic '{}' rejected as harmful", form.topic);
            }
        }
        Ok(outcome)
    }

    /// Accepts "{submitted topic}: {subtopic title}" without re-classifying it.
    pub async fn accept_suggested_subtopic(
        &self,
        session: &mut LessonSession,
        index: usize,
    ) -> WorkflowResult<()> {
        let pending = session
            .suggestions
            .as_ref()
            .ok_or(WorkflowError::NoPendingSuggestions)?;
        let subtopic = pending
            .subtopics
            .get(index)
            .ok_or_else(|| WorkflowError::UnknownSuggestion(format!("subtopic #{}", index)))?;
        let topic = format!("{}: {}", pending.submitted_topic, subtopic.title);

        let course = session.course().ok_or(WorkflowError::NoAcceptedTopic)?;
        self.adopt_topic(session, &course, topic).await;
        Ok(())
    }

    /// Accepts one of the alternative topics without re-classifying it.
    pub async fn accept_alternative_topic(
        &self,
        session: &mut LessonSession,
        topic: String,
    ) -> WorkflowResult<()> {
        let pending = session
            .suggestions
            .as_ref()
            .ok_or(WorkflowError::NoPendingSuggestions)?;
        if !pending.topics.contains(&topic) {
            return Err(WorkflowError::UnknownSuggestion(topic));
        }

        let course = session.course().ok_or(WorkflowError::NoAcceptedTopic)?;
        self.adopt_topic(session, &course, topic).await;
        Ok(())
    }

    async fn adopt_topic(&self, session: &mut LessonSession, course: &Course, topic: String) {
        info!("Starting lesson on '{}'", topic);
        session.start_lesson(topic.clone());

        let objectives = match self.content.generate_objectives(course, &topic).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Objective generation failed: {}", e);
                String::new()
            }
        };
        let lesson_content = format!(
            "Topic: {}\nSubject: {}\nGrade: {}\nObjectives: {}",
            topic, course.subject, course.grade, objectives
        );
        session.objectives = Some(objectives);

        let quiz = match self
            .content
            .generate_quiz(course, &topic, &lesson_content)
            .await
        {
            Ok(quiz) => quiz,
            Err(e) => {
                warn!("Quiz generation failed, continuing with an empty quiz: {}", e);
                QuizSet::default()
            }
        };
        session.quiz = Some(quiz);
    }

    //-------------------------------------------------------------------------------------
    // Lesson assembly
    //-------------------------------------------------------------------------------------

    /// Regenerates subtopics, gathers references and images per subtopic, then
    /// regenerates the summary. Nothing here is cached between passes except
    /// media candidates and the append-only reference list.
    pub async fn assemble_lesson(
        &self,
        session: &mut LessonSession,
        course: &Course,
    ) -> WorkflowResult<()> {
        let topic = session
            .accepted_topic
            .clone()
            .ok_or(WorkflowError::NoAcceptedTopic)?;
        let objectives = session.objectives.clone().unwrap_or_default();

        info!("Assembling lesson for '{}'", topic);
        let subtopics = match self
            .content
            .generate_subtopics(course, &topic, &objectives)
            .await
        {
            Ok(subtopics) => subtopics,
            Err(e) => {
                session.subtopics = None;
                session.summary = None;
                return Err(WorkflowError::SubtopicGeneration(e));
            }
        };

        let keys = LessonSession::subtopic_keys(&subtopics);
        session.purge_stale_media(&keys);
        session.subtopics = Some(subtopics.clone());

        for (key, subtopic) in keys.iter().zip(&subtopics) {
            if session.include_references {
                let found = self.find_references(&subtopic.title, course).await;
                session.add_references(found);
            }
            if session.include_visuals {
                self.ensure_candidates(session, key, course).await;
            }
        }

        session.summary = match self
            .content
            .generate_summary(course, &topic, &subtopics)
            .await
        {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!("Summary generation failed: {}", e);
                None
            }
        };
        Ok(())
    }

    async fn find_references(&self, title: &str, course: &Course) -> Vec<Reference> {
        let query = references::build_query(title, course);
        match self
            .search
            .search_web(&query, references::RESULTS_REQUESTED)
            .await
        {
            Ok(hits) => {
                let kept = references::credible_references(hits);
                debug!("{} credible references for '{}'", kept.len(), title);
                kept
            }
            Err(e) => {
                warn!("Reference search for '{}' failed: {}", title, e);
                Vec::new()
            }
        }
    }

    //-------------------------------------------------------------------------------------
    // Media selection
    //-------------------------------------------------------------------------------------

    /// Fills the subtopic's candidate list if it is empty and returns it.
    pub async fn ensure_candidates(
        &self,
        session: &mut LessonSession,
        key: &SubtopicKey,
        course: &Course,
    ) -> Vec<MediaCandidate> {
        let slot = session.media.entry(key.clone()).or_default();
        if slot.candidates.is_empty() {
            for _ in 0..media::ATTEMPTS_PER_FILL {
                let attempt = slot.attempts;
                let query = media::build_query(&key.title, course, key.index, attempt);
                match self
                    .images
                    .search_images(&query, media::RESULTS_PER_PAGE, media::ORIENTATION)
                    .await
                {
                    Ok(hits) => match media::pick_hit(hits, key.index, attempt) {
                        Some(candidate) => slot.candidates.push(candidate),
                        None => debug!("No images for '{}'", query),
                    },
                    Err(e) => warn!("Image lookup for '{}' failed: {}", query, e),
                }
                slot.attempts += 1;
            }
        }
        slot.candidates.clone()
    }

    /// "Show different images": drops the cached candidates and refills them
    /// from the next rotation of query variants.
    pub async fn refresh_images(
        &self,
        session: &mut LessonSession,
        key: SubtopicKey,
    ) -> WorkflowResult<Vec<MediaCandidate>> {
        let course = session.course().ok_or(WorkflowError::NoAcceptedTopic)?;
        if session.subtopic_for(&key).is_none() {
            return Err(WorkflowError::UnknownSubtopic(key));
        }

        session.media.entry(key.clone()).or_default().candidates.clear();
        if !session.include_visuals {
            return Ok(Vec::new());
        }
        Ok(self.ensure_candidates(session, &key, &course).await)
    }

    pub fn select_image(
        session: &mut LessonSession,
        key: SubtopicKey,
        index: usize,
    ) -> WorkflowResult<()> {
        let Some(slot) = session.media.get_mut(&key) else {
            return Err(WorkflowError::UnknownSubtopic(key));
        };
        if index >= slot.candidates.len() {
            return Err(WorkflowError::CandidateOutOfRange { key, index });
        }
        slot.selected = Some(index);
        Ok(())
    }

    //-------------------------------------------------------------------------------------
    // Export
    //-------------------------------------------------------------------------------------

    /// Builds a fresh payload from the session and hands it to the exporter.
    /// The session is left untouched whatever the outcome.
    pub async fn export(&self, session: &LessonSession) -> WorkflowResult<ExportedDeck> {
        let payload = session
            .export_payload()
            .ok_or(WorkflowError::NothingToExport)?;
        info!(
            "Exporting deck for '{}' with {} subtopics",
            payload.topic,
            payload.subtopics.len()
        );
        self.exporter
            .export_deck(&payload)
            .await
            .map_err(WorkflowError::Export)
    }
}
