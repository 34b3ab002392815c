//! crates/lesson_planner_core/src/references.rs
//!
//! Reference link handling: query building, the fixed credibility allowlist,
//! and de-duplication for display.

use std::collections::HashSet;

use crate::domain::{Course, Reference, SearchHit};

pub const RESULTS_REQUESTED: u32 = 5;
pub const KEPT_PER_SUBTOPIC: usize = 3;
pub const MAX_RENDERED: usize = 10;
const SNIPPET_CHARS: usize = 100;

const CREDIBLE_DOMAINS: &[&str] = &[
    ".edu",
    ".gov",
    "wikipedia.org",
    "khanacademy.org",
    "britannica.com",
    "nationalgeographic.com",
    "nasa.gov",
    "sciencemag.org",
    "ted.com",
    "mit.edu",
    "harvard.edu",
    "oup.com",
    "springer.com",
    "nature.com",
    "science.org",
];

pub fn build_query(title: &str, course: &Course) -> String {
    format!("{} {} {} educational resources", title, course.subject, course.grade)
}

/// Lowercased network location of an absolute url (port included), if any.
pub fn host_of(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("://")?;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    (!host.is_empty()).then(|| host.to_lowercase())
}

pub fn is_credible(url: &str) -> bool {
    host_of(url).is_some_and(|host| CREDIBLE_DOMAINS.iter().any(|d| host.contains(d)))
}

/// Display domain: the host without a leading `www.`.
pub fn domain_label(url: &str) -> String {
    let host = host_of(url).unwrap_or_default();
    host.strip_prefix("www.").map(str::to_string).unwrap_or(host)
}

/// Filters raw hits down to at most `KEPT_PER_SUBTOPIC` credible references.
pub fn credible_references(hits: Vec<SearchHit>) -> Vec<Reference> {
    hits.into_iter()
        .filter(|hit| is_credible(&hit.url))
        .take(KEPT_PER_SUBTOPIC)
        .map(|hit| Reference {
            domain: domain_label(&hit.url),
            url: hit.url,
            title: hit.title,
            snippet: hit.snippet,
        })
        .collect()
}

/// First occurrence of each url, capped at `MAX_RENDERED`.
pub fn unique_for_display(references: &[Reference]) -> Vec<Reference> {
    let mut seen = HashSet::new();
    references
        .iter()
        .filter(|r| seen.insert(r.url.as_str()))
        .take(MAX_RENDERED)
        .cloned()
        .collect()
}

pub fn render_markdown(references: &[Reference]) -> String {
    let unique = unique_for_display(references);
    if unique.is_empty() {
        return String::new();
    }
    let mut markdown = String::from("### Recommended References\n");
    for reference in unique {
        let snippet: String = reference.snippet.chars().take(SNIPPET_CHARS).collect();
        markdown.push_str(&format!(
            "- [{}]({}) - {}...\n",
            reference.domain, reference.url, snippet
        ));
    }
    markdown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(url: &str, snippet: &str) -> SearchHit {
        SearchHit {
            url: url.to_string(),
            title: "Title".to_string(),
            snippet: snippet.to_string(),
        }
    }

    #[test]
    fn allowlist_filters_by_domain() {
        assert!(!is_credible("https://example.com/photosynthesis"));
        assert!(is_credible("https://mit.edu/courses/biology"));
        assert!(is_credible("https://en.wikipedia.org/wiki/Photosynthesis"));
        assert!(!is_credible("not a url"));
    }

    #[test]
    fn allowlist_checks_host_not_path() {
        assert!(!is_credible("https://blog.example.com/wikipedia.org"));
    }

    #[test]
    fn domain_label_drops_www() {
        assert_eq!(domain_label("https://www.britannica.com/science"), "britannica.com");
        assert_eq!(domain_label("http://user@NASA.gov:8080/x"), "nasa.gov:8080");
    }

    #[test]
    fn credible_references_keep_at_most_three() {
        let hits = vec![
            hit("https://example.com/a", "a"),
            hit("https://www.nasa.gov/a", "b"),
            hit("https://mit.edu/a", "c"),
            hit("https://nature.com/a", "d"),
            hit("https://ted.com/a", "e"),
        ];
        let kept = credible_references(hits);
        assert_eq!(kept.len(), 3);
        assert_eq!(kept[0].domain, "nasa.gov");
        assert_eq!(kept[2].url, "https://nature.com/a");
    }

    #[test]
    fn rendering_dedupes_by_url() {
        let refs = credible_references(vec![hit("https://mit.edu/a", "first")]);
        let mut all = refs.clone();
        all.extend(credible_references(vec![hit("https://mit.edu/a", "second")]));

        let rendered = render_markdown(&all);
        assert_eq!(rendered.matches("https://mit.edu/a").count(), 1);
        assert!(rendered.contains("first"));
        assert!(!rendered.contains("second"));
    }

    #[test]
    fn rendering_caps_list() {
        let refs: Vec<Reference> = (0..15)
            .flat_map(|i| credible_references(vec![hit(&format!("https://mit.edu/{}", i), "s")]))
            .collect();
        assert_eq!(unique_for_display(&refs).len(), MAX_RENDERED);
        assert_eq!(render_markdown(&[]), "");
    }
}
