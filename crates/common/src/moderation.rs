//! Content moderation and input cleanup
//!
//! Review and reply text is checked server-side before it is stored:
//! a length cap plus a banned-word substring filter. Search terms are
//! stripped of the honorific "د." prefix so "د. محمد" and "محمد" hit
//! the same rows.

use crate::errors::{AppError, Result};
use crate::MAX_CONTENT_LENGTH;
use regex_lite::Regex;
use std::sync::OnceLock;

/// Banned substrings; any hit rejects the whole submission
pub const BAD_WORDS: &[&str] = &[
    "كلام بذيء",
    "سب",
    "شتم",
    "لعن",
    "حقير",
    "زباله",
    "زبالة",
    "تبن",
    "حيوان",
    "غبي",
    "حمار",
];

/// Letter grades a review may carry
pub const GRADES: &[&str] = &[
    "A+", "A", "B+", "B", "C+", "C", "D+", "D", "F", "DN", "محتسب",
];

fn title_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^د[.\s]\s*").expect("valid regex"))
}

/// Strip a leading "د." / "د " honorific from a search term and trim it
pub fn clean_search_term(term: &str) -> String {
    title_prefix().replace(term.trim(), "").trim().to_string()
}

/// Whether the text contains a banned word
pub fn contains_bad_word(text: &str) -> bool {
    BAD_WORDS.iter().any(|word| text.contains(word))
}

/// Whether the grade is one of the accepted letter grades
pub fn is_valid_grade(grade: &str) -> bool {
    GRADES.contains(&grade)
}

/// Validate free-text content for a review or reply.
/// Returns the trimmed text ready for storage.
pub fn validate_content(content: &str) -> Result<String> {
    let trimmed = content.trim();

    if trimmed.is_empty() {
        return Err(AppError::MissingField {
            field: "content".to_string(),
        });
    }

    if trimmed.chars().count() > MAX_CONTENT_LENGTH {
        return Err(AppError::Validation {
            message: format!("Content exceeds {} characters", MAX_CONTENT_LENGTH),
            field: Some("content".to_string()),
        });
    }

    if contains_bad_word(trimmed) {
        return Err(AppError::ContentRejected);
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_search_term_strips_title() {
        assert_eq!(clean_search_term("د. محمد عبدالله"), "محمد عبدالله");
        assert_eq!(clean_search_term("د محمد"), "محمد");
        assert_eq!(clean_search_term("  محمد  "), "محمد");
    }

    #[test]
    fn test_clean_search_term_keeps_names_starting_with_dal() {
        // A bare name starting with د must not be mangled
        assert_eq!(clean_search_term("دلال"), "دلال");
    }

    #[test]
    fn test_bad_word_filter() {
        assert!(contains_bad_word("هذا الدكتور غبي"));
        assert!(!contains_bad_word("دكتور ممتاز وشرحه واضح"));
    }

    #[test]
    fn test_validate_content_rejects_bad_words() {
        let err = validate_content("شرحه زبالة").unwrap_err();
        assert!(matches!(err, AppError::ContentRejected));
    }

    #[test]
    fn test_validate_content_rejects_long_text() {
        let long = "أ".repeat(MAX_CONTENT_LENGTH + 1);
        let err = validate_content(&long).unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_validate_content_trims() {
        assert_eq!(validate_content("  تجربة جيدة  ").unwrap(), "تجربة جيدة");
    }

    #[test]
    fn test_grades() {
        assert!(is_valid_grade("A+"));
        assert!(is_valid_grade("محتسب"));
        assert!(!is_valid_grade("E"));
    }
}
