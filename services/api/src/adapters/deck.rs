//! services/api/src/adapters/deck.rs
//!
//! This module contains the slide-deck serializer. It implements the `DeckExporter`
//! port by writing a Marp-flavoured Markdown deck, one slide per section.

use async_trait::async_trait;
use lesson_planner_core::{
    domain::{ExportPayload, ExportedDeck, QuizSet, SubtopicSlide},
    ports::{DeckExporter, PortError, PortResult},
    references,
};
use std::fmt::Write;

const SLIDE_BREAK: &str = "\n---\n\n";
const CONTENT_TYPE: &str = "text/markdown; charset=utf-8";
const TOPIC_CHARS_IN_NAME: usize = 20;

/// Writes lesson decks as Markdown slides.
#[derive(Clone, Default)]
pub struct MarkdownDeckExporter;

impl MarkdownDeckExporter {
    pub fn new() -> Self {
        Self
    }

    /// `Lesson_{subject}_{topic}.md`, with the topic cut to its first 20 characters.
    /// Anything outside `[A-Za-z0-9._-]` becomes `_`, so the name is always a valid
    /// header value.
    pub fn file_name(payload: &ExportPayload) -> String {
        let topic: String = payload.topic.chars().take(TOPIC_CHARS_IN_NAME).collect();
        format!(
            "Lesson_{}_{}.md",
            safe_name(&payload.course.subject),
            safe_name(&topic)
        )
    }

    pub fn render(payload: &ExportPayload) -> Result<String, std::fmt::Error> {
        let mut slides = vec![title_slide(payload)?, overview_slide(payload)?];
        if !payload.objectives.is_empty() {
            slides.push(objectives_slide(&payload.objectives)?);
        }
        for slide in &payload.subtopics {
            slides.push(subtopic_slide(slide)?);
        }
        if let Some(summary) = payload.summary.as_deref().filter(|s| !s.trim().is_empty()) {
            slides.push(format!("## Lesson Summary\n\n{}\n", summary.trim()));
        }
        if !payload.quiz.is_empty() {
            slides.extend(quiz_slides(&payload.quiz)?);
        }
        let references = references::render_markdown(&payload.references);
        if !references.is_empty() {
            slides.push(references);
        }

        let mut deck = String::from("---\nmarp: true\npaginate: true\n---\n\n");
        deck.push_str(&slides.join(SLIDE_BREAK));
        Ok(deck)
    }
}

fn safe_name(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '_',
        })
        .collect()
}

fn title_slide(payload: &ExportPayload) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "# {}", payload.topic)?;
    writeln!(out)?;
    let course = &payload.course;
    writeln!(out, "{} | {} | {}", course.subject, course.grade, course.curriculum)?;
    writeln!(out)?;
    writeln!(out, "_Generated {}_", payload.generated_at.format("%Y-%m-%d"))?;
    Ok(out)
}

fn overview_slide(payload: &ExportPayload) -> Result<String, std::fmt::Error> {
    let mut out = String::from("## Lesson Overview\n\n");
    writeln!(out, "| | |")?;
    writeln!(out, "|---|---|")?;
    writeln!(out, "| **Curriculum** | {} |", payload.course.curriculum)?;
    writeln!(out, "| **Grade** | {} |", payload.course.grade)?;
    writeln!(out, "| **Subject** | {} |", payload.course.subject)?;
    writeln!(out, "| **Topic** | {} |", payload.topic)?;
    Ok(out)
}

fn objectives_slide(objectives: &[String]) -> Result<String, std::fmt::Error> {
    let mut out = String::from("## Key Learning Objectives\n\n");
    for objective in objectives {
        writeln!(out, "- {}", objective)?;
    }
    Ok(out)
}

fn subtopic_slide(slide: &SubtopicSlide) -> Result<String, std::fmt::Error> {
    let subtopic = &slide.subtopic;
    let mut out = String::new();
    writeln!(out, "## Part {}: {}", slide.key.index + 1, subtopic.title)?;
    writeln!(out)?;
    writeln!(out, "{}", subtopic.content)?;
    writeln!(out)?;
    writeln!(out, "- **Key Concepts:** {}", subtopic.concepts_line())?;
    writeln!(out, "- **Example:** {}", subtopic.lead_example())?;
    writeln!(out, "- **Note:** {}", subtopic.lead_misconception())?;
    if let Some(image) = &slide.image {
        writeln!(out)?;
        writeln!(out, "![bg right:40%]({})", image.url)?;
        writeln!(out)?;
        writeln!(
            out,
            "<small>Photo by [{}]({}) on Unsplash</small>",
            image.credit, image.profile
        )?;
    }
    Ok(out)
}

fn quiz_slides(quiz: &QuizSet) -> Result<Vec<String>, std::fmt::Error> {
    let mut slides = Vec::new();

    if !quiz.mcq.is_empty() {
        let mut questions = String::from("## Multiple Choice Questions\n\n");
        let mut answers = String::from("## Multiple Choice Answers\n\n");
        for (i, item) in quiz.mcq.iter().enumerate() {
            writeln!(questions, "{}. {}", i + 1, item.question)?;
            for option in &item.options {
                writeln!(questions, "   - {}", option)?;
            }
            writeln!(answers, "{}. **{}** {}", i + 1, item.answer, item.explanation)?;
        }
        slides.push(questions);
        slides.push(answers);
    }

    if !quiz.fillblank.is_empty() {
        let mut questions = String::from("## Fill in the Blank\n\n");
        let mut answers = String::from("## Fill in the Blank Answers\n\n");
        for (i, item) in quiz.fillblank.iter().enumerate() {
            writeln!(questions, "{}. {}", i + 1, item.question)?;
            writeln!(answers, "{}. **{}** {}", i + 1, item.answer, item.explanation)?;
        }
        slides.push(questions);
        slides.push(answers);
    }

    if !quiz.descriptive.is_empty() {
        let mut questions = String::from("## Descriptive Questions\n\n");
        let mut answers = String::from("## Descriptive Model Answers\n\n");
        for (i, item) in quiz.descriptive.iter().enumerate() {
            writeln!(questions, "{}. {}", i + 1, item.question)?;
            writeln!(answers, "{}. {}", i + 1, item.answer)?;
            for point in &item.key_points {
                writeln!(answers, "   - {}", point)?;
            }
        }
        slides.push(questions);
        slides.push(answers);
    }

    Ok(slides)
}

#[async_trait]
impl DeckExporter for MarkdownDeckExporter {
    async fn export_deck(&self, payload: &ExportPayload) -> PortResult<ExportedDeck> {
        let deck = Self::render(payload)
            .map_err(|e| PortError::Unexpected(format!("failed to write deck: {}", e)))?;
        Ok(ExportedDeck {
            file_name: Self::file_name(payload),
            content_type: CONTENT_TYPE.to_string(),
            bytes: deck.into_bytes(),
        })
    }
}
