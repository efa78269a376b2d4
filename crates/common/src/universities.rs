//! Static university registry
//!
//! The universities table is reference data. A hardcoded fallback list
//! guarantees the selector is never empty; rows fetched from the
//! database are merged over it by slug so real IDs win whenever the
//! table is populated.

use crate::db::models::University;
use serde::Serialize;
use uuid::Uuid;

/// One university as served to clients
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UniversityInfo {
    /// Nil UUID when the row only exists in the fallback list
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub color_theme: String,
}

impl From<University> for UniversityInfo {
    fn from(u: University) -> Self {
        Self {
            id: u.id,
            name: u.name,
            slug: u.slug,
            color_theme: u.color_theme,
        }
    }
}

/// Fallback list, in display order
pub fn static_universities() -> Vec<UniversityInfo> {
    let entries: &[(&str, &str, &str)] = &[
        ("جامعة الإمام محمد بن سعود", "imam", "sky"),
        ("جامعة المجمعة", "mu", "amber"),
        ("جامعة الملك سعود", "ksu", "blue"),
        ("جامعة الأميرة نورة", "pnu", "cyan"),
        ("جامعة الملك فهد للبترول والمعادن", "kfupm", "emerald"),
        ("جامعة القصيم", "qassim", "cyan"),
        ("جامعة الملك عبدالعزيز", "kau", "lime"),
        ("جامعة الأمير سطام بن عبدالعزيز", "psau", "blue"),
        ("جامعة الإمام عبدالرحمن بن فيصل", "iau", "green"),
    ];

    entries
        .iter()
        .map(|(name, slug, color)| UniversityInfo {
            id: Uuid::nil(),
            name: name.to_string(),
            slug: slug.to_string(),
            color_theme: color.to_string(),
        })
        .collect()
}

/// Merge stored rows over the fallback list, keyed by slug.
/// Order follows the fallback list; stored universities with unknown
/// slugs are appended at the end.
pub fn merge_with_static(stored: Vec<University>) -> Vec<UniversityInfo> {
    let mut merged = static_universities();

    for row in stored {
        match merged.iter_mut().find(|u| u.slug == row.slug) {
            Some(entry) => *entry = row.into(),
            None => merged.push(row.into()),
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(slug: &str, name: &str) -> University {
        University {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
            color_theme: "teal".to_string(),
        }
    }

    #[test]
    fn test_fallback_is_never_empty() {
        assert!(!static_universities().is_empty());
    }

    #[test]
    fn test_merge_replaces_by_slug() {
        let row = stored("mu", "جامعة المجمعة");
        let expected_id = row.id;

        let merged = merge_with_static(vec![row]);
        let mu = merged.iter().find(|u| u.slug == "mu").unwrap();

        assert_eq!(mu.id, expected_id);
        assert_eq!(mu.color_theme, "teal");
    }

    #[test]
    fn test_merge_appends_unknown_slugs() {
        let count_before = static_universities().len();
        let merged = merge_with_static(vec![stored("kku", "جامعة الملك خالد")]);

        assert_eq!(merged.len(), count_before + 1);
        assert_eq!(merged.last().unwrap().slug, "kku");
    }

    #[test]
    fn test_merge_keeps_fallback_order() {
        let merged = merge_with_static(vec![stored("ksu", "جامعة الملك سعود")]);
        let slugs: Vec<_> = merged.iter().map(|u| u.slug.as_str()).collect();
        assert_eq!(slugs[0], "imam");
        assert_eq!(slugs[2], "ksu");
    }
}
