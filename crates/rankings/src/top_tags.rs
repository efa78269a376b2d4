//! Tag frequency ranking
//!
//! Counts tag occurrences and keeps the top-K, dropping labels that
//! carry the neutral marker before ranking.

use morshed_common::tags::is_neutral_label;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One tag with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Most frequent non-neutral tags, best first. Ties break on the label
/// so the order is stable across reloads.
pub fn top_tags(tags: &[String], k: usize) -> Vec<TagCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for tag in tags {
        if is_neutral_label(tag) {
            continue;
        }
        *counts.entry(tag.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
        })
        .collect();

    ranked.sort_by(|a, b| b.count.cmp(&a.count).then(a.tag.cmp(&b.tag)));
    ranked.truncate(k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_most_frequent_tag_ranks_first() {
        let ranked = top_tags(&tags(&["شرييح", "شرييح", "متعاون"]), 4);

        assert_eq!(ranked[0].tag, "شرييح");
        assert_eq!(ranked[0].count, 2);
        assert_eq!(ranked[1].tag, "متعاون");
    }

    #[test]
    fn test_neutral_labels_are_dropped() {
        let ranked = top_tags(&tags(&["عادي", "عادي", "عادي", "شرييح"]), 4);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].tag, "شرييح");
    }

    #[test]
    fn test_truncates_to_k() {
        let ranked = top_tags(&tags(&["شرييح", "متعاون", "خلوق", "حنون بالدرجات"]), 3);
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn test_empty_input() {
        assert!(top_tags(&[], 3).is_empty());
    }
}
