//! crates/lesson_planner_core/src/session.rs
//!
//! The explicit per-session state. One `LessonSession` is owned by exactly one
//! workflow call at a time; nothing in here performs I/O.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::domain::{
    Course, ExportPayload, LessonForm, MediaCandidate, QuizSet, Reference, RevealKey, Subtopic,
    SubtopicKey, SubtopicSlide, ValidationOutcome,
};
use crate::parse::objective_lines;
use crate::references::unique_for_display;

/// Cached image candidates for one subtopic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaSlot {
    pub candidates: Vec<MediaCandidate>,
    /// May point past the end of `candidates` after a refresh.
    pub selected: Option<usize>,
    /// Lookups issued so far; the rotation baseline for the next fill.
    pub attempts: usize,
}

impl MediaSlot {
    /// The chosen candidate, if the stored index is still in range.
    pub fn selected_candidate(&self) -> Option<&MediaCandidate> {
        self.selected.and_then(|index| self.candidates.get(index))
    }
}

/// Proposals shown after an "irrelevant" verdict, kept apart from the
/// accepted-topic state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSuggestions {
    pub submitted_topic: String,
    pub subtopics: Vec<Subtopic>,
    pub topics: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LessonSession {
    pub form: Option<LessonForm>,
    pub last_outcome: Option<ValidationOutcome>,
    pub accepted_topic: Option<String>,
    pub objectives: Option<String>,
    pub subtopics: Option<Vec<Subtopic>>,
    pub quiz: Option<QuizSet>,
    pub summary: Option<String>,
    pub references: Vec<Reference>,
    pub media: BTreeMap<SubtopicKey, MediaSlot>,
    pub reveals: HashMap<RevealKey, bool>,
    pub suggestions: Option<PendingSuggestions>,
    pub include_visuals: bool,
    pub include_references: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for LessonSession {
    fn default() -> Self {
        Self::new()
    }
}

impl LessonSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            form: None,
            last_outcome: None,
            accepted_topic: None,
            objectives: None,
            subtopics: None,
            quiz: None,
            summary: None,
            references: Vec::new(),
            media: BTreeMap::new(),
            reveals: HashMap::new(),
            suggestions: None,
            include_visuals: true,
            include_references: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn course(&self) -> Option<Course> {
        self.form.as_ref().map(LessonForm::course)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Starts a fresh lesson on `topic`. Every downstream cache is dropped in
    /// a fixed order before any generation for the new topic is issued.
    pub fn start_lesson(&mut self, topic: String) {
        self.accepted_topic = Some(topic);
        self.suggestions = None;
        self.media.clear();
        self.summary = None;
        self.references.clear();
        self.subtopics = None;
        self.reveals.clear();
        self.objectives = None;
        self.quiz = None;
    }

    pub fn subtopic_keys(subtopics: &[Subtopic]) -> Vec<SubtopicKey> {
        subtopics
            .iter()
            .enumerate()
            .map(|(index, s)| SubtopicKey::new(s.title.clone(), index))
            .collect()
    }

    /// Drops media slots whose key is not part of the latest subtopic set.
    pub fn purge_stale_media(&mut self, keys: &[SubtopicKey]) {
        let live: HashSet<&SubtopicKey> = keys.iter().collect();
        self.media.retain(|key, _| live.contains(key));
    }

    pub fn subtopic_for(&self, key: &SubtopicKey) -> Option<&Subtopic> {
        self.subtopics
            .as_ref()?
            .get(key.index)
            .filter(|s| s.title == key.title)
    }

    /// Appends references whose url is not already collected for this lesson.
    pub fn add_references(&mut self, found: Vec<Reference>) {
        for reference in found {
            if !self.references.iter().any(|r| r.url == reference.url) {
                self.references.push(reference);
            }
        }
    }

    /// Flips one item's reveal flag and returns the new value.
    pub fn toggle_reveal(&mut self, key: RevealKey) -> bool {
        let revealed = self.reveals.entry(key).or_insert(false);
        *revealed = !*revealed;
        *revealed
    }

    pub fn is_revealed(&self, key: &RevealKey) -> bool {
        self.reveals.get(key).copied().unwrap_or(false)
    }

    /// Snapshot for the deck exporter, or `None` until a lesson has been assembled.
    pub fn export_payload(&self) -> Option<ExportPayload> {
        let course = self.course()?;
        let topic = self.accepted_topic.clone()?;
        let subtopics = self.subtopics.as_ref()?;

        let slides = subtopics
            .iter()
            .enumerate()
            .map(|(index, subtopic)| {
                let key = SubtopicKey::new(subtopic.title.clone(), index);
                let image = self
                    .media
                    .get(&key)
                    .and_then(MediaSlot::selected_candidate)
                    .cloned();
                SubtopicSlide {
                    key,
                    subtopic: subtopic.clone(),
                    image,
                }
            })
            .collect();

        let references = if self.include_references {
            unique_for_display(&self.references)
        } else {
            Vec::new()
        };

        Some(ExportPayload {
            course,
            topic,
            objectives: self.objectives.as_deref().map(objective_lines).unwrap_or_default(),
            subtopics: slides,
            summary: self.summary.clone(),
            references,
            quiz: self.quiz.clone().unwrap_or_default(),
            generated_at: Utc::now(),
        })
    }
}
