//! crates/lesson_planner_core/src/domain.rs
//!
//! Defines the pure, core data structures for the lesson planner.
//! These structs are independent of any transport or vendor SDK; serde derives
//! exist only so the outer service can ship them as JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The curriculum / grade / subject triple every generation call is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub curriculum: String,
    pub grade: String,
    pub subject: String,
}

/// A single submission of the lesson form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonForm {
    pub curriculum: String,
    pub grade: String,
    pub subject: String,
    pub topic: String,
    #[serde(default = "default_true")]
    pub include_visuals: bool,
    #[serde(default = "default_true")]
    pub include_references: bool,
}

fn default_true() -> bool {
    true
}

impl LessonForm {
    pub fn course(&self) -> Course {
        Course {
            curriculum: self.curriculum.clone(),
            grade: self.grade.clone(),
            subject: self.subject.clone(),
        }
    }
}

/// The classifier's verdict on a submitted topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationOutcome {
    Valid,
    Irrelevant,
    Harmful,
}

impl ValidationOutcome {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Irrelevant => "irrelevant",
            Self::Harmful => "harmful",
        }
    }
}

/// One section of a lesson, as produced by the subtopic generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtopic {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub key_concepts: Vec<String>,
    pub examples: Vec<String>,
    pub misconceptions: Vec<String>,
}

const NOT_AVAILABLE: &str = "N/A";

impl Subtopic {
    /// Key concepts joined for display.
    pub fn concepts_line(&self) -> String {
        if self.key_concepts.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            self.key_concepts.join(", ")
        }
    }

    pub fn lead_example(&self) -> &str {
        self.examples.first().map_or(NOT_AVAILABLE, String::as_str)
    }

    pub fn lead_misconception(&self) -> &str {
        self.misconceptions.first().map_or(NOT_AVAILABLE, String::as_str)
    }
}

/// Addresses per-subtopic state. Titles are not unique, so the zero-based
/// position within the generated collection is part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubtopicKey {
    pub title: String,
    pub index: usize,
}

impl SubtopicKey {
    pub fn new(title: impl Into<String>, index: usize) -> Self {
        Self {
            title: title.into(),
            index,
        }
    }
}

impl fmt::Display for SubtopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.title, self.index)
    }
}

//=========================================================================================
// Quiz
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuestionKind {
    #[serde(rename = "mcq")]
    MultipleChoice,
    #[serde(rename = "fillblank")]
    FillBlank,
    #[serde(rename = "descriptive")]
    Descriptive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleChoiceItem {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillBlankItem {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptiveItem {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

/// Three independent question collections. An empty set is what a failed
/// quiz generation degrades to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSet {
    #[serde(default)]
    pub mcq: Vec<MultipleChoiceItem>,
    #[serde(default)]
    pub fillblank: Vec<FillBlankItem>,
    #[serde(default)]
    pub descriptive: Vec<DescriptiveItem>,
}

impl QuizSet {
    pub fn is_empty(&self) -> bool {
        self.mcq.is_empty() && self.fillblank.is_empty() && self.descriptive.is_empty()
    }

    pub fn len_of(&self, kind: QuestionKind) -> usize {
        match kind {
            QuestionKind::MultipleChoice => self.mcq.len(),
            QuestionKind::FillBlank => self.fillblank.len(),
            QuestionKind::Descriptive => self.descriptive.len(),
        }
    }
}

/// Stable key of one quiz item's "answer revealed" toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RevealKey {
    pub kind: QuestionKind,
    pub position: usize,
}

//=========================================================================================
// Media and References
//=========================================================================================

/// An image offered for a subtopic, with the attribution the provider requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaCandidate {
    pub url: String,
    pub credit: String,
    pub profile: String,
}

/// A raw web search result, before credibility filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub url: String,
    pub title: String,
    pub snippet: String,
    pub domain: String,
}

//=========================================================================================
// Export
//=========================================================================================

/// A subtopic paired with the image the user picked for it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtopicSlide {
    pub key: SubtopicKey,
    pub subtopic: Subtopic,
    pub image: Option<MediaCandidate>,
}

/// Read-only snapshot handed to the deck exporter. Rebuilt on every export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportPayload {
    pub course: Course,
    pub topic: String,
    pub objectives: Vec<String>,
    pub subtopics: Vec<SubtopicSlide>,
    pub summary: Option<String>,
    pub references: Vec<Reference>,
    pub quiz: QuizSet,
    pub generated_at: DateTime<Utc>,
}

/// A serialized slide deck ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDeck {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

//=========================================================================================
// User-facing messages
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// A one-line message for the user produced while handling an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}
