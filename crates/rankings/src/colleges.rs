//! Per-college aggregation
//!
//! A college's score is the mean of its member professors' percentages.
//! Zero-review professors contribute 0, they are not excluded; callers
//! can see the gap through `review_count`.

use crate::aggregate::ProfessorScore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregated score for one college
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollegeScore {
    pub college: String,

    /// Mean of member professors' percentages, rounded
    pub percentage: u8,

    pub professor_count: usize,

    /// Total reviews across the college's professors
    pub review_count: usize,
}

/// Rank colleges from already-scored professors, best first
pub fn rank_colleges(professors: &[ProfessorScore]) -> Vec<CollegeScore> {
    let mut by_college: HashMap<&str, (u64, usize, usize)> = HashMap::new();

    for p in professors {
        let entry = by_college.entry(p.college.as_str()).or_default();
        entry.0 += p.percentage as u64;
        entry.1 += 1;
        entry.2 += p.review_count;
    }

    let mut colleges: Vec<CollegeScore> = by_college
        .into_iter()
        .map(|(college, (sum, professor_count, review_count))| CollegeScore {
            college: college.to_string(),
            percentage: (sum as f64 / professor_count as f64).round() as u8,
            professor_count,
            review_count,
        })
        .collect();

    colleges.sort_by(|a, b| {
        b.percentage
            .cmp(&a.percentage)
            .then(b.review_count.cmp(&a.review_count))
            .then(a.college.cmp(&b.college))
    });

    colleges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::SubRatingMeans;
    use uuid::Uuid;

    fn scored(name: &str, college: &str, percentage: u8, review_count: usize) -> ProfessorScore {
        ProfessorScore {
            professor_id: Uuid::new_v4(),
            name: name.to_string(),
            college: college.to_string(),
            percentage,
            average_rating: percentage as f64 / 20.0,
            review_count,
            sub_ratings: SubRatingMeans::default(),
            top_tags: Vec::new(),
        }
    }

    #[test]
    fn test_college_score_is_mean_of_members() {
        let professors = vec![
            scored("أ", "كلية العلوم", 80, 4),
            scored("ب", "كلية العلوم", 60, 2),
            scored("ج", "كلية الهندسة", 90, 5),
        ];

        let colleges = rank_colleges(&professors);

        assert_eq!(colleges[0].college, "كلية الهندسة");
        assert_eq!(colleges[0].percentage, 90);
        assert_eq!(colleges[1].college, "كلية العلوم");
        assert_eq!(colleges[1].percentage, 70);
        assert_eq!(colleges[1].review_count, 6);
    }

    #[test]
    fn test_zero_review_professor_drags_mean_down() {
        let professors = vec![
            scored("أ", "كلية العلوم", 100, 3),
            scored("ب", "كلية العلوم", 0, 0),
        ];

        let colleges = rank_colleges(&professors);
        assert_eq!(colleges[0].percentage, 50);
        assert_eq!(colleges[0].professor_count, 2);
    }

    #[test]
    fn test_empty_input_yields_empty_rankings() {
        assert!(rank_colleges(&[]).is_empty());
    }
}
