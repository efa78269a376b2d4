//! Per-professor aggregation
//!
//! The roster drives the output: a professor with no reviews still gets
//! an entry with score 0 and `review_count` 0 so the API can tell "no
//! data" apart from "genuinely low-rated".

use crate::colleges::{rank_colleges, CollegeScore};
use crate::percentage;
use crate::top_tags::top_tags;
use morshed_common::db::ReviewRow;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Professor identity as fed into the aggregator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfessorRef {
    pub professor_id: Uuid,
    pub name: String,
    pub college: String,
}

/// Mean of each sub-rating over the reviews where it was set (> 0)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SubRatingMeans {
    pub attendance: Option<f64>,
    pub teaching: Option<f64>,
    pub behavior: Option<f64>,
    pub grading: Option<f64>,
}

/// Aggregated score for one professor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfessorScore {
    pub professor_id: Uuid,
    pub name: String,
    pub college: String,

    /// `round(sum(rating) / (n * 5) * 100)`; 0 when there are no reviews
    pub percentage: u8,

    /// Raw mean rating on the 1-5 scale; 0.0 when there are no reviews
    pub average_rating: f64,

    pub review_count: usize,

    pub sub_ratings: SubRatingMeans,

    /// Most frequent non-neutral tags, best first
    pub top_tags: Vec<String>,
}

/// Full aggregation output for one university
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingsSummary {
    pub professors: Vec<ProfessorScore>,
    pub colleges: Vec<CollegeScore>,
    pub review_count: usize,
}

struct Accumulator {
    rating_sum: i64,
    count: usize,
    sub_sums: [i64; 4],
    sub_counts: [usize; 4],
    tags: Vec<String>,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            rating_sum: 0,
            count: 0,
            sub_sums: [0; 4],
            sub_counts: [0; 4],
            tags: Vec::new(),
        }
    }

    fn push(&mut self, row: &ReviewRow) {
        self.rating_sum += row.rating as i64;
        self.count += 1;

        let subs = [
            row.attendance_rating,
            row.teaching_rating,
            row.behavior_rating,
            row.grading_rating,
        ];
        for (i, &value) in subs.iter().enumerate() {
            // 0 means the student skipped this sub-rating
            if value > 0 {
                self.sub_sums[i] += value as i64;
                self.sub_counts[i] += 1;
            }
        }

        self.tags.extend(row.tags.iter().cloned());
    }

    fn sub_means(&self) -> SubRatingMeans {
        let mean = |i: usize| {
            (self.sub_counts[i] > 0).then(|| self.sub_sums[i] as f64 / self.sub_counts[i] as f64)
        };
        SubRatingMeans {
            attendance: mean(0),
            teaching: mean(1),
            behavior: mean(2),
            grading: mean(3),
        }
    }
}

/// Aggregate review rows into ranked professor and college scores.
///
/// Rows whose professor is missing from the roster are ignored; they
/// belong to professors not visible to the caller (e.g. unapproved).
pub fn aggregate(roster: &[ProfessorRef], rows: &[ReviewRow], top_k: usize) -> RankingsSummary {
    let mut by_professor: HashMap<Uuid, Accumulator> = roster
        .iter()
        .map(|p| (p.professor_id, Accumulator::new()))
        .collect();

    let mut used = 0;
    for row in rows {
        if let Some(acc) = by_professor.get_mut(&row.professor_id) {
            acc.push(row);
            used += 1;
        }
    }

    let mut professors: Vec<ProfessorScore> = roster
        .iter()
        .map(|p| {
            let acc = &by_professor[&p.professor_id];
            let average_rating = if acc.count == 0 {
                0.0
            } else {
                acc.rating_sum as f64 / acc.count as f64
            };

            ProfessorScore {
                professor_id: p.professor_id,
                name: p.name.clone(),
                college: p.college.clone(),
                percentage: percentage(acc.rating_sum, acc.count),
                average_rating,
                review_count: acc.count,
                sub_ratings: acc.sub_means(),
                top_tags: top_tags(&acc.tags, top_k)
                    .into_iter()
                    .map(|t| t.tag)
                    .collect(),
            }
        })
        .collect();

    // Descending by score; ties broken by review count, then name, so
    // rankings do not reshuffle between reloads.
    professors.sort_by(|a, b| {
        b.percentage
            .cmp(&a.percentage)
            .then(b.review_count.cmp(&a.review_count))
            .then(a.name.cmp(&b.name))
    });

    let colleges = rank_colleges(&professors);

    RankingsSummary {
        professors,
        colleges,
        review_count: used,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn professor(id: u128, name: &str, college: &str) -> ProfessorRef {
        ProfessorRef {
            professor_id: Uuid::from_u128(id),
            name: name.to_string(),
            college: college.to_string(),
        }
    }

    fn review(professor: u128, rating: i16) -> ReviewRow {
        ReviewRow {
            review_id: Uuid::new_v4(),
            professor_id: Uuid::from_u128(professor),
            professor_name: String::new(),
            college: String::new(),
            rating,
            course: None,
            tags: Vec::new(),
            attendance_rating: 0,
            teaching_rating: 0,
            behavior_rating: 0,
            grading_rating: 0,
        }
    }

    #[test]
    fn test_zero_reviews_scores_zero_but_stays_listed() {
        let roster = vec![professor(1, "د. أحمد", "كلية العلوم")];
        let summary = aggregate(&roster, &[], 3);

        assert_eq!(summary.professors.len(), 1);
        assert_eq!(summary.professors[0].percentage, 0);
        assert_eq!(summary.professors[0].review_count, 0);
        assert_eq!(summary.professors[0].average_rating, 0.0);
    }

    #[test]
    fn test_perfect_and_worst_scores() {
        let roster = vec![
            professor(1, "د. أحمد", "كلية العلوم"),
            professor(2, "د. سارة", "كلية العلوم"),
        ];
        let mut rows = Vec::new();
        for _ in 0..5 {
            rows.push(review(1, 5));
            rows.push(review(2, 1));
        }

        let summary = aggregate(&roster, &rows, 3);

        assert_eq!(summary.professors[0].percentage, 100);
        assert_eq!(summary.professors[1].percentage, 20);
    }

    #[test]
    fn test_mixed_ratings_round() {
        let roster = vec![professor(1, "د. أحمد", "كلية العلوم")];
        let rows = vec![review(1, 5), review(1, 1)];

        let summary = aggregate(&roster, &rows, 3);
        assert_eq!(summary.professors[0].percentage, 60);
        assert_eq!(summary.professors[0].average_rating, 3.0);
    }

    #[test]
    fn test_ordering_is_deterministic_on_ties() {
        let roster = vec![
            professor(1, "د. ياسر", "كلية الهندسة"),
            professor(2, "د. أحمد", "كلية الهندسة"),
        ];
        // Same percentage, same counts: name ascending breaks the tie
        let rows = vec![review(1, 4), review(2, 4)];

        let summary = aggregate(&roster, &rows, 3);
        assert_eq!(summary.professors[0].name, "د. أحمد");
        assert_eq!(summary.professors[1].name, "د. ياسر");
    }

    #[test]
    fn test_more_reviews_wins_ties() {
        let roster = vec![
            professor(1, "د. أحمد", "كلية الهندسة"),
            professor(2, "د. بدر", "كلية الهندسة"),
        ];
        let rows = vec![review(1, 4), review(2, 4), review(2, 4)];

        let summary = aggregate(&roster, &rows, 3);
        assert_eq!(summary.professors[0].name, "د. بدر");
    }

    #[test]
    fn test_sub_rating_means_skip_unset() {
        let roster = vec![professor(1, "د. أحمد", "كلية العلوم")];
        let mut first = review(1, 5);
        first.teaching_rating = 5;
        first.grading_rating = 2;
        let mut second = review(1, 3);
        second.teaching_rating = 3;

        let summary = aggregate(&roster, &[first, second], 3);
        let subs = &summary.professors[0].sub_ratings;

        assert_eq!(subs.teaching, Some(4.0));
        assert_eq!(subs.grading, Some(2.0));
        assert_eq!(subs.attendance, None);
    }

    #[test]
    fn test_rows_for_unknown_professors_are_ignored() {
        let roster = vec![professor(1, "د. أحمد", "كلية العلوم")];
        let rows = vec![review(1, 5), review(99, 1)];

        let summary = aggregate(&roster, &rows, 3);
        assert_eq!(summary.review_count, 1);
        assert_eq!(summary.professors[0].percentage, 100);
    }

    #[test]
    fn test_top_tags_surface_on_professor() {
        let roster = vec![professor(1, "د. أحمد", "كلية العلوم")];
        let mut a = review(1, 5);
        a.tags = vec!["شرييح".to_string(), "متعاون".to_string()];
        let mut b = review(1, 4);
        b.tags = vec!["شرييح".to_string()];

        let summary = aggregate(&roster, &[a, b], 3);
        assert_eq!(
            summary.professors[0].top_tags,
            vec!["شرييح".to_string(), "متعاون".to_string()]
        );
    }
}
