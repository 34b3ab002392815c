//! crates/lesson_planner_core/src/view.rs
//!
//! The read-only view rebuilt from session state after every event.

use serde::Serialize;

use crate::domain::{
    Course, MediaCandidate, QuestionKind, QuizSet, Reference, RevealKey, Subtopic, SubtopicKey,
    ValidationOutcome,
};
use crate::parse::objective_lines;
use crate::references::unique_for_display;
use crate::session::LessonSession;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtopicView {
    pub key: SubtopicKey,
    /// One-based, for "Part N" headings.
    pub part: usize,
    pub title: String,
    pub content: String,
    pub key_concepts: String,
    pub example: String,
    pub misconception: String,
    pub candidates: Vec<MediaCandidate>,
    pub selected_index: Option<usize>,
    pub selected_image: Option<MediaCandidate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizView {
    pub questions: QuizSet,
    pub revealed: Vec<RevealKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionView {
    pub submitted_topic: String,
    pub subtopics: Vec<Subtopic>,
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonView {
    pub course: Option<Course>,
    pub last_outcome: Option<ValidationOutcome>,
    pub accepted_topic: Option<String>,
    pub objectives: Vec<String>,
    pub subtopics: Vec<SubtopicView>,
    pub summary: Option<String>,
    pub references: Vec<Reference>,
    pub quiz: Option<QuizView>,
    pub suggestions: Option<SuggestionView>,
    pub include_visuals: bool,
    pub include_references: bool,
}

impl LessonView {
    pub fn build(session: &LessonSession) -> Self {
        let subtopics = session
            .subtopics
            .iter()
            .flatten()
            .enumerate()
            .map(|(index, subtopic)| subtopic_view(session, subtopic, index))
            .collect();

        let references = if session.include_references {
            unique_for_display(&session.references)
        } else {
            Vec::new()
        };

        let quiz = session.quiz.as_ref().map(|questions| QuizView {
            revealed: revealed_keys(session, questions),
            questions: questions.clone(),
        });

        let suggestions = session.suggestions.as_ref().map(|pending| SuggestionView {
            submitted_topic: pending.submitted_topic.clone(),
            subtopics: pending.subtopics.clone(),
            topics: pending.topics.clone(),
        });

        Self {
            course: session.course(),
            last_outcome: session.last_outcome,
            accepted_topic: session.accepted_topic.clone(),
            objectives: session
                .objectives
                .as_deref()
                .map(objective_lines)
                .unwrap_or_default(),
            subtopics,
            summary: session.summary.clone(),
            references,
            quiz,
            suggestions,
            include_visuals: session.include_visuals,
            include_references: session.include_references,
        }
    }
}

fn subtopic_view(session: &LessonSession, subtopic: &Subtopic, index: usize) -> SubtopicView {
    let key = SubtopicKey::new(subtopic.title.clone(), index);
    let slot = session.media.get(&key).filter(|_| session.include_visuals);

    SubtopicView {
        part: index + 1,
        title: subtopic.title.clone(),
        content: subtopic.content.clone(),
        key_concepts: subtopic.concepts_line(),
        example: subtopic.lead_example().to_string(),
        misconception: subtopic.lead_misconception().to_string(),
        candidates: slot.map(|s| s.candidates.clone()).unwrap_or_default(),
        selected_index: slot.and_then(|s| s.selected),
        selected_image: slot.and_then(|s| s.selected_candidate()).cloned(),
        key,
    }
}

fn revealed_keys(session: &LessonSession, quiz: &QuizSet) -> Vec<RevealKey> {
    [
        QuestionKind::MultipleChoice,
        QuestionKind::FillBlank,
        QuestionKind::Descriptive,
    ]
    .into_iter()
    .flat_map(|kind| (0..quiz.len_of(kind)).map(move |position| RevealKey { kind, position }))
    .filter(|key| session.is_revealed(key))
    .collect()
}
