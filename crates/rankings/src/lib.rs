//! Review aggregation for Morshed
//!
//! Turns raw review rows into the derived numbers the API serves:
//! - Per-professor percentage scores with sub-rating means and top tags
//! - Per-college mean scores
//! - Per-course scores keyed by free-text course name
//!
//! Everything here is a pure, synchronous, single-pass reduction over an
//! in-memory slice; scores are recomputed on every request and never
//! stored.

mod aggregate;
mod colleges;
mod courses;
mod top_tags;

pub use aggregate::{aggregate, ProfessorRef, ProfessorScore, RankingsSummary, SubRatingMeans};
pub use colleges::{rank_colleges, CollegeScore};
pub use courses::{rank_courses, CourseScore};
pub use top_tags::{top_tags, TagCount};

/// Maximum rating a single review can carry
pub const MAX_RATING: i64 = 5;

/// Percentage score from a rating sum over `count` reviews:
/// `round(sum / (count * 5) * 100)`. Zero reviews score 0.
pub fn percentage(rating_sum: i64, count: usize) -> u8 {
    if count == 0 {
        return 0;
    }
    let ratio = rating_sum as f64 / (count as i64 * MAX_RATING) as f64;
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_zero_reviews() {
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn test_percentage_all_fives() {
        assert_eq!(percentage(25, 5), 100);
    }

    #[test]
    fn test_percentage_all_ones() {
        assert_eq!(percentage(5, 5), 20);
    }

    #[test]
    fn test_percentage_mixed() {
        // [5, 1] => round(6/10 * 100) = 60
        assert_eq!(percentage(6, 2), 60);
    }

    #[test]
    fn test_percentage_bounded() {
        for sum in 0..=25 {
            let p = percentage(sum, 5);
            assert!(p <= 100);
        }
    }
}
