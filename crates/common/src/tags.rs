//! Closed tag vocabulary for reviews
//!
//! Tags are fixed labels students attach to a review, partitioned into
//! positive/neutral/negative by static lookup. Labels carrying the
//! neutral marker ("عادي") are excluded from tag rankings.

use serde::{Deserialize, Serialize};

/// Sentiment bucket a tag belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    Positive,
    Neutral,
    Negative,
}

/// Marker substring identifying neutral/default labels
pub const NEUTRAL_MARKER: &str = "عادي";

/// The full vocabulary with its sentiment partition
pub const TAG_VOCABULARY: &[(&str, TagKind)] = &[
    // Positive
    ("شرييح", TagKind::Positive),
    ("متعاون", TagKind::Positive),
    ("خلوق", TagKind::Positive),
    ("حنون بالدرجات", TagKind::Positive),
    ("مرن بالحضور", TagKind::Positive),
    ("اختباراته سهلة", TagKind::Positive),
    // Neutral
    ("عادي", TagKind::Neutral),
    ("شرحه عادي", TagKind::Neutral),
    ("تعامله عادي", TagKind::Neutral),
    // Negative
    ("شرحه صعب", TagKind::Negative),
    ("متشدد بالحضور", TagKind::Negative),
    ("اختباراته صعبة", TagKind::Negative),
    ("شحيح بالدرجات", TagKind::Negative),
    ("كثير الواجبات", TagKind::Negative),
];

/// Look up the sentiment of a tag; `None` means the label is not part
/// of the vocabulary.
pub fn tag_kind(label: &str) -> Option<TagKind> {
    TAG_VOCABULARY
        .iter()
        .find(|(tag, _)| *tag == label)
        .map(|(_, kind)| *kind)
}

/// Whether the label is part of the closed vocabulary
pub fn is_known_tag(label: &str) -> bool {
    tag_kind(label).is_some()
}

/// Whether the label carries the neutral marker and should be skipped
/// when ranking tags.
pub fn is_neutral_label(label: &str) -> bool {
    label.contains(NEUTRAL_MARKER)
}

/// Validate and deduplicate submitted tags, preserving first-seen order.
/// Returns the offending label when one is outside the vocabulary.
pub fn normalize_tags(tags: &[String]) -> Result<Vec<String>, String> {
    let mut seen = Vec::with_capacity(tags.len());

    for tag in tags {
        let tag = tag.trim();
        if !is_known_tag(tag) {
            return Err(tag.to_string());
        }
        if !seen.iter().any(|s: &String| s == tag) {
            seen.push(tag.to_string());
        }
    }

    Ok(seen)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_lookup() {
        assert_eq!(tag_kind("شرييح"), Some(TagKind::Positive));
        assert_eq!(tag_kind("عادي"), Some(TagKind::Neutral));
        assert_eq!(tag_kind("شحيح بالدرجات"), Some(TagKind::Negative));
        assert_eq!(tag_kind("غير موجود"), None);
    }

    #[test]
    fn test_neutral_marker_matches_all_neutral_labels() {
        for (label, kind) in TAG_VOCABULARY {
            if *kind == TagKind::Neutral {
                assert!(is_neutral_label(label), "{} should carry the marker", label);
            } else {
                assert!(!is_neutral_label(label), "{} should not carry the marker", label);
            }
        }
    }

    #[test]
    fn test_normalize_tags_dedupes() {
        let tags = vec![
            "شرييح".to_string(),
            "شرييح".to_string(),
            "متعاون".to_string(),
        ];
        let normalized = normalize_tags(&tags).unwrap();
        assert_eq!(normalized, vec!["شرييح", "متعاون"]);
    }

    #[test]
    fn test_normalize_tags_rejects_unknown() {
        let tags = vec!["شرييح".to_string(), "مزيف".to_string()];
        assert_eq!(normalize_tags(&tags), Err("مزيف".to_string()));
    }
}
