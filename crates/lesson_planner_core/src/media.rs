//! crates/lesson_planner_core/src/media.rs
//!
//! Query rotation and result picking for per-subtopic visual aids.

use crate::domain::{Course, MediaCandidate};
use crate::ports::ImageOrientation;

/// Lookups issued each time a subtopic's candidate list is (re)filled.
pub const ATTEMPTS_PER_FILL: usize = 3;
pub const RESULTS_PER_PAGE: u32 = 30;
pub const ORIENTATION: ImageOrientation = ImageOrientation::Landscape;
pub const QUERY_TEMPLATE_COUNT: usize = 5;

/// Only the top results are rotated through.
const PICK_WINDOW: usize = 20;

pub fn template_index(subtopic_index: usize, attempt: usize) -> usize {
    (subtopic_index + attempt) % QUERY_TEMPLATE_COUNT
}

pub fn build_query(title: &str, course: &Course, subtopic_index: usize, attempt: usize) -> String {
    let Course { grade, subject, .. } = course;
    match template_index(subtopic_index, attempt) {
        0 => format!("{} {} education {}", title, subject, grade),
        1 => format!("{} learning {}", title, grade),
        2 => format!("{} {} classroom", subject, title),
        3 => format!("educational {} diagram", title),
        _ => format!("{} teaching aid", title),
    }
}

/// Picks one hit so that neighbouring subtopics and successive attempts land
/// on different photos.
pub fn pick_hit(
    mut hits: Vec<MediaCandidate>,
    subtopic_index: usize,
    attempt: usize,
) -> Option<MediaCandidate> {
    let window = hits.len().min(PICK_WINDOW);
    if window == 0 {
        return None;
    }
    let pick = (subtopic_index + attempt) % window;
    Some(hits.swap_remove(pick))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course() -> Course {
        Course {
            curriculum: "CBSE".to_string(),
            grade: "Grade 7".to_string(),
            subject: "Biology".to_string(),
        }
    }

    fn hits(n: usize) -> Vec<MediaCandidate> {
        (0..n)
            .map(|i| MediaCandidate {
                url: format!("https://images.example/{}", i),
                credit: format!("Photographer {}", i),
                profile: format!("https://unsplash.com/@p{}", i),
            })
            .collect()
    }

    #[test]
    fn rotation_starts_at_subtopic_index() {
        let first: Vec<usize> = (0..3).map(|a| template_index(0, a)).collect();
        assert_eq!(first, vec![0, 1, 2]);
        let fifth: Vec<usize> = (0..3).map(|a| template_index(4, a)).collect();
        assert_eq!(fifth, vec![4, 0, 1]);
    }

    #[test]
    fn queries_follow_template_order() {
        let c = course();
        assert_eq!(build_query("Cells", &c, 0, 0), "Cells Biology education Grade 7");
        assert_eq!(build_query("Cells", &c, 0, 1), "Cells learning Grade 7");
        assert_eq!(build_query("Cells", &c, 0, 2), "Biology Cells classroom");
        assert_eq!(build_query("Cells", &c, 0, 3), "educational Cells diagram");
        assert_eq!(build_query("Cells", &c, 2, 2), "Cells teaching aid");
    }

    #[test]
    fn pick_wraps_within_window() {
        assert_eq!(pick_hit(hits(3), 1, 1).unwrap().url, "https://images.example/2");
        assert_eq!(pick_hit(hits(3), 2, 2).unwrap().url, "https://images.example/1");
        assert_eq!(pick_hit(hits(30), 19, 1).unwrap().url, "https://images.example/0");
        assert!(pick_hit(Vec::new(), 0, 0).is_none());
    }
}
