pub mod domain;
pub mod media;
pub mod parse;
pub mod ports;
pub mod references;
pub mod session;
pub mod view;
pub mod workflow;

pub use domain::{
    Course, ExportPayload, ExportedDeck, LessonForm, MediaCandidate, Notice, NoticeLevel,
    QuestionKind, QuizSet, Reference, RevealKey, SearchHit, Subtopic, SubtopicKey,
    ValidationOutcome,
};
pub use ports::{
    ContentGenerator, DeckExporter, ImageOrientation, ImageSearchService, PortError, PortResult,
    ReferenceSearchService, TopicClassifier,
};
pub use session::LessonSession;
pub use view::LessonView;
pub use workflow::{LessonEvent, LessonWorkflow, WorkflowError, WorkflowResult};
