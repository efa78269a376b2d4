//! Per-course aggregation
//!
//! Mirrors the professor computation keyed by free-text course name.
//! Names are trimmed but not otherwise normalized, so the same course
//! spelled differently fragments into separate entries. Known
//! data-quality gap carried from the submission form.

use crate::percentage;
use morshed_common::db::ReviewRow;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregated score for one course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseScore {
    pub course: String,
    pub percentage: u8,
    pub review_count: usize,
}

/// Rank courses from review rows, best first. Rows without a course
/// name (or with a blank one) are skipped.
pub fn rank_courses(rows: &[ReviewRow]) -> Vec<CourseScore> {
    let mut by_course: HashMap<String, (i64, usize)> = HashMap::new();

    for row in rows {
        let Some(course) = row.course.as_deref().map(str::trim) else {
            continue;
        };
        if course.is_empty() {
            continue;
        }

        let entry = by_course.entry(course.to_string()).or_default();
        entry.0 += row.rating as i64;
        entry.1 += 1;
    }

    let mut courses: Vec<CourseScore> = by_course
        .into_iter()
        .map(|(course, (sum, count))| CourseScore {
            course,
            percentage: percentage(sum, count),
            review_count: count,
        })
        .collect();

    courses.sort_by(|a, b| {
        b.percentage
            .cmp(&a.percentage)
            .then(b.review_count.cmp(&a.review_count))
            .then(a.course.cmp(&b.course))
    });

    courses
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn review(course: Option<&str>, rating: i16) -> ReviewRow {
        ReviewRow {
            review_id: Uuid::new_v4(),
            professor_id: Uuid::from_u128(1),
            professor_name: String::new(),
            college: String::new(),
            rating,
            course: course.map(String::from),
            tags: Vec::new(),
            attendance_rating: 0,
            teaching_rating: 0,
            behavior_rating: 0,
            grading_rating: 0,
        }
    }

    #[test]
    fn test_courses_are_grouped_by_trimmed_name() {
        let rows = vec![
            review(Some("محاسبة 101"), 5),
            review(Some("  محاسبة 101 "), 3),
            review(Some("فيزياء 201"), 4),
        ];

        let courses = rank_courses(&rows);

        assert_eq!(courses.len(), 2);
        let accounting = courses.iter().find(|c| c.course == "محاسبة 101").unwrap();
        assert_eq!(accounting.review_count, 2);
        assert_eq!(accounting.percentage, 80);
    }

    #[test]
    fn test_spelling_variants_stay_separate() {
        // No normalization beyond trimming: variants fragment
        let rows = vec![review(Some("محاسبه 101"), 5), review(Some("محاسبة 101"), 5)];
        assert_eq!(rank_courses(&rows).len(), 2);
    }

    #[test]
    fn test_rows_without_course_are_skipped() {
        let rows = vec![review(None, 5), review(Some("   "), 4)];
        assert!(rank_courses(&rows).is_empty());
    }
}
