//! services/api/src/adapters/lesson_llm.rs
//!
//! This module contains the adapter for the lesson-content LLM.
//! It implements the `TopicClassifier` and `ContentGenerator` ports from the `core` crate
//! against any OpenAI-compatible chat-completions endpoint.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use lesson_planner_core::{
    domain::{Course, QuizSet, Subtopic, ValidationOutcome},
    parse,
    ports::{ContentGenerator, PortError, PortResult, TopicClassifier},
};
use tracing::debug;

use super::prompts::{self, render};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the text-generation ports using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiLessonAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiLessonAdapter {
    /// Creates a new `OpenAiLessonAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// Sends one prompt and returns the first choice's text.
    async fn complete(&self, prompt: String) -> PortResult<String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(prompts::SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Transport(e.to_string()))?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Malformed("LLM response contained no text content.".to_string())
            })?;
        debug!("LLM replied with {} characters", text.len());
        Ok(text)
    }
}

fn course_fields<'a>(course: &'a Course) -> [(&'static str, &'a str); 3] {
    [
        ("curriculum", course.curriculum.as_str()),
        ("grade", course.grade.as_str()),
        ("subject", course.subject.as_str()),
    ]
}

fn topic_prompt(template: &str, course: &Course, topic: &str, extra: &[(&str, &str)]) -> String {
    let mut values: Vec<(&str, &str)> = course_fields(course).to_vec();
    values.push(("topic", topic));
    values.extend_from_slice(extra);
    render(template, &values)
}

//=========================================================================================
// Port Implementations
//=========================================================================================

#[async_trait]
impl TopicClassifier for OpenAiLessonAdapter {
    async fn classify_topic(&self, course: &Course, topic: &str) -> PortResult<ValidationOutcome> {
        let reply = self
            .complete(topic_prompt(prompts::CLASSIFY_TOPIC, course, topic, &[]))
            .await?;
        parse::parse_classification(&reply)
    }
}

#[async_trait]
impl ContentGenerator for OpenAiLessonAdapter {
    async fn generate_objectives(&self, course: &Course, topic: &str) -> PortResult<String> {
        self.complete(topic_prompt(prompts::OBJECTIVES, course, topic, &[]))
            .await
    }

    async fn generate_subtopics(
        &self,
        course: &Course,
        topic: &str,
        objectives: &str,
    ) -> PortResult<Vec<Subtopic>> {
        let reply = self
            .complete(topic_prompt(
                prompts::SUBTOPICS,
                course,
                topic,
                &[("objectives", objectives)],
            ))
            .await?;
        parse::parse_subtopics(&reply)
    }

    async fn generate_quiz(
        &self,
        course: &Course,
        topic: &str,
        lesson_content: &str,
    ) -> PortResult<QuizSet> {
        let reply = self
            .complete(topic_prompt(
                prompts::QUIZ,
                course,
                topic,
                &[("lesson_content", lesson_content)],
            ))
            .await?;
        parse::parse_quiz(&reply)
    }

    async fn generate_summary(
        &self,
        course: &Course,
        topic: &str,
        subtopics: &[Subtopic],
    ) -> PortResult<String> {
        let outline = serde_json::to_string_pretty(subtopics)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        self.complete(topic_prompt(
            prompts::SUMMARY,
            course,
            topic,
            &[("subtopics", outline.as_str())],
        ))
        .await
    }

    async fn suggest_topics(&self, course: &Course) -> PortResult<Vec<String>> {
        let reply = self
            .complete(render(prompts::SUGGEST_TOPICS, &course_fields(course)))
            .await?;
        Ok(parse::parse_bullet_list(&reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_prompt_substitutes_course_topic_and_extras() {
        let course = Course {
            curriculum: "ICSE".to_string(),
            grade: "Grade 10".to_string(),
            subject: "Physics".to_string(),
        };
        let prompt = topic_prompt(
            prompts::SUBTOPICS,
            &course,
            "Refraction",
            &[("objectives", "Define refractive index")],
        );
        assert!(prompt.contains("- Main Topic: Refraction"));
        assert!(prompt.contains("- Curriculum: ICSE"));
        assert!(prompt.contains("Using these objectives: Define refractive index"));
    }
}
