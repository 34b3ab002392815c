//! services/api/src/adapters/prompts.rs
//!
//! Prompt templates for the lesson LLM adapter. Placeholders in braces are
//! substituted with `render`.

pub const SYSTEM_INSTRUCTIONS: &str = "You are an experienced curriculum designer helping teachers plan lessons. Follow the requested output format exactly and do not add commentary around it.";

pub const CLASSIFY_TOPIC: &str = r#"As an expert curriculum validator for {grade} {subject} ({curriculum}),
evaluate this topic: '{topic}'

Return ONLY one word:
- "valid" - if it matches the subject and grade level
- "irrelevant" - if it doesn't match the subject but is grade-appropriate
- "harmful" - if it is inappropriate for the grade

Consider:
1. Subject matter alignment
2. Cognitive level for {grade}
3. {curriculum} standards"#;

pub const SUGGEST_TOPICS: &str = r#"Suggest 3-5 topics for:
- Curriculum: {curriculum}
- Grade: {grade}
- Subject: {subject}

Each must:
- Be a core curriculum item
- Have clear learning objectives
- Be engaging for {grade}

Return as a bullet list, one topic per line, each line starting with "- "."#;

pub const OBJECTIVES: &str = r#"Create 3-4 concise learning objectives for:
- Topic: {topic}
- Subject: {subject}
- Grade: {grade}
- Curriculum: {curriculum}

Each objective should:
- Be one short sentence
- Use simple language
- Be measurable

Format as plain text with one objective per line."#;

pub const SUBTOPICS: &str = r#"Create 3-4 comprehensive subtopics for:
- Main Topic: {topic}
- Subject: {subject}
- Grade: {grade}
- Curriculum: {curriculum}

Using these objectives: {objectives} try to generate the subtopics.

For each subtopic provide:
1. Title (4-5 word phrase)
2. Content (4-5 detailed sentences)
3. Key concepts (2-3 items)
4. Real-world examples (1-2)
5. Common misconceptions (1-2)

Return as JSON with this exact structure:
{
    "subtopics": [
        {
            "title": "Subtopic title",
            "content": "Detailed explanation...",
            "key_concepts": ["concept1", "concept2"],
            "examples": ["example1", "example2"],
            "misconceptions": ["misconception1", "misconception2"]
        }
    ]
}"#;

pub const QUIZ: &str = r#"Create a quiz for this lesson:
- Topic: {topic}
- Subject: {subject}
- Grade: {grade}
- Curriculum: {curriculum}

Lesson Content:
{lesson_content}

Generate 3-4 questions of each type:
1. Multiple Choice (mcq): 4 options, the correct option, an explanation
2. Fill in the Blank (fillblank): use _____ for the blank, the answer, an explanation
3. Descriptive (descriptive): a short open-ended question, a short model answer, key points

Return as JSON with this exact structure:
{
    "mcq": [
        {"question": "Question text", "options": ["A", "B", "C", "D"], "answer": "Correct option", "explanation": "Explanation text"}
    ],
    "fillblank": [
        {"question": "Question with _____ blank", "answer": "Correct fill", "explanation": "Explanation text"}
    ],
    "descriptive": [
        {"question": "Open-ended question", "answer": "Model answer", "key_points": ["Key point 1", "Key point 2"]}
    ]
}"#;

pub const SUMMARY: &str = r#"Create a short summary of this entire lesson:
- Curriculum: {curriculum}
- Grade: {grade}
- Subject: {subject}
- Topic: {topic}

The lesson contains these subtopics:
{subtopics}

The summary should:
1. Begin with an engaging 1-sentence overview
2. Highlight 2-3 key takeaways
3. Connect concepts between subtopics
4. End with a thought-provoking question
5. Use simple language appropriate for {grade}

Format as markdown with bold headings for each section."#;

/// Substitutes each `{name}` in `template` with its value in a single pass.
/// Substituted text is never scanned again, and unknown names are left as written.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
