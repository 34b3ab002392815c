pub mod deck;
pub mod lesson_llm;
pub mod prompts;
pub mod unsplash;
pub mod web_search;

pub use deck::MarkdownDeckExporter;
pub use lesson_llm::OpenAiLessonAdapter;
pub use unsplash::UnsplashAdapter;
pub use web_search::GoogleSearchAdapter;
