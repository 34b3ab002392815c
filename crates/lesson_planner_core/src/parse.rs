//! crates/lesson_planner_core/src/parse.rs
//!
//! Strict parse-or-error boundary for text coming back from the generators.
//! Anything that does not match the expected schema becomes `PortError::Malformed`
//! (or `UnrecognizedResponse` for the classifier) instead of a panic.

use serde::Deserialize;

use crate::domain::{QuizSet, Subtopic, ValidationOutcome};
use crate::ports::{PortError, PortResult};

/// Returns the slice from the first `{` to the last `}`, which is where the
/// models put their JSON when they wrap it in prose or code fences.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

pub fn parse_classification(text: &str) -> PortResult<ValidationOutcome> {
    let token = text
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '.')
        .to_lowercase();
    match token.as_str() {
        "valid" => Ok(ValidationOutcome::Valid),
        "irrelevant" => Ok(ValidationOutcome::Irrelevant),
        "harmful" => Ok(ValidationOutcome::Harmful),
        _ => Err(PortError::UnrecognizedResponse(token)),
    }
}

#[derive(Deserialize)]
struct SubtopicEnvelope {
    subtopics: Vec<Subtopic>,
}

pub fn parse_subtopics(text: &str) -> PortResult<Vec<Subtopic>> {
    let json = extract_json_object(text)
        .ok_or_else(|| PortError::Malformed("no JSON object in subtopic response".to_string()))?;
    let envelope: SubtopicEnvelope = serde_json::from_str(json)
        .map_err(|e| PortError::Malformed(format!("subtopic JSON: {}", e)))?;

    if envelope.subtopics.is_empty() {
        return Err(PortError::Malformed("subtopic list is empty".to_string()));
    }
    for (index, subtopic) in envelope.subtopics.iter().enumerate() {
        if subtopic.title.trim().is_empty() {
            return Err(PortError::Malformed(format!("subtopic {} has no title", index)));
        }
        if subtopic.examples.is_empty() || subtopic.misconceptions.is_empty() {
            return Err(PortError::Malformed(format!(
                "subtopic '{}' is missing examples or misconceptions",
                subtopic.title
            )));
        }
    }
    Ok(envelope.subtopics)
}

pub fn parse_quiz(text: &str) -> PortResult<QuizSet> {
    let json = extract_json_object(text)
        .ok_or_else(|| PortError::Malformed("no JSON object in quiz response".to_string()))?;
    serde_json::from_str(json).map_err(|e| PortError::Malformed(format!("quiz JSON: {}", e)))
}

/// Keeps only `- ` bullet lines, without the bullet.
pub fn parse_bullet_list(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| line.strip_prefix("- "))
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Splits objective text into display lines.
pub fn objective_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBTOPICS_REPLY: &str = r#"Here you go:
```json
{
  "subtopics": [
    {
      "title": "Light Dependent Reactions",
      "content": "Chlorophyll absorbs light.",
      "key_concepts": ["chlorophyll", "ATP"],
      "examples": ["Leaves turning toward sunlight"],
      "misconceptions": ["Plants get food from soil"]
    }
  ]
}
```"#;

    #[test]
    fn classification_accepts_known_tokens_case_insensitively() {
        assert_eq!(parse_classification(" Valid\n").unwrap(), ValidationOutcome::Valid);
        assert_eq!(parse_classification("\"irrelevant\"").unwrap(), ValidationOutcome::Irrelevant);
        assert_eq!(parse_classification("HARMFUL.").unwrap(), ValidationOutcome::Harmful);
    }

    #[test]
    fn classification_rejects_anything_else() {
        match parse_classification("maybe") {
            Err(PortError::UnrecognizedResponse(token)) => assert_eq!(token, "maybe"),
            other => panic!("expected unrecognized token, got {:?}", other),
        }
    }

    #[test]
    fn subtopics_are_extracted_from_wrapped_reply() {
        let subtopics = parse_subtopics(SUBTOPICS_REPLY).unwrap();
        assert_eq!(subtopics.len(), 1);
        assert_eq!(subtopics[0].title, "Light Dependent Reactions");
        assert_eq!(subtopics[0].lead_example(), "Leaves turning toward sunlight");
    }

    #[test]
    fn non_json_subtopic_reply_is_malformed() {
        let err = parse_subtopics("Sorry, I cannot help with that.").unwrap_err();
        assert!(matches!(err, PortError::Malformed(_)));
    }

    #[test]
    fn subtopic_without_examples_is_malformed() {
        let reply = r#"{"subtopics":[{"title":"A","content":"b","examples":[],"misconceptions":["c"]}]}"#;
        assert!(matches!(parse_subtopics(reply), Err(PortError::Malformed(_))));
    }

    #[test]
    fn quiz_missing_sections_default_to_empty() {
        let reply = r#"{"mcq":[{"question":"2+2?","options":["1","2","3","4"],"answer":"4","explanation":"sum"}]}"#;
        let quiz = parse_quiz(reply).unwrap();
        assert_eq!(quiz.mcq.len(), 1);
        assert!(quiz.fillblank.is_empty());
        assert!(quiz.descriptive.is_empty());
    }

    #[test]
    fn bullet_list_keeps_only_dash_lines() {
        let reply = "Here are some ideas:\n- Cell Structure\n- Food Chains\n* not this\n-Nope\n- ";
        assert_eq!(parse_bullet_list(reply), vec!["Cell Structure", "Food Chains"]);
    }

    #[test]
    fn extract_requires_closing_brace_after_opening() {
        assert_eq!(extract_json_object("} before {"), None);
        assert_eq!(extract_json_object("x {\"a\":1} y"), Some("{\"a\":1}"));
    }
}
