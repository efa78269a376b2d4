//! Rankings endpoints
//!
//! Scores are derived, never stored: every request recomputes from the
//! review rows unless a cached payload for the university is still
//! fresh. Cache failures degrade to recomputation.

use crate::AppState;
use axum::extract::{Query, State};
use axum::Json;
use morshed_common::cache::rankings_key;
use morshed_common::errors::{AppError, Result};
use morshed_common::{metrics, Repository, DEFAULT_TOP_TAGS};
use morshed_rankings::{aggregate, rank_courses, CollegeScore, CourseScore, ProfessorRef, ProfessorScore, RankingsSummary};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct RankingsParams {
    pub university_id: Uuid,
}

/// Load the aggregated summary for a university, through the cache
/// when available.
async fn load_summary(state: &AppState, university_id: Uuid) -> Result<RankingsSummary> {
    let key = rankings_key(university_id);

    if let Some(cache) = &state.cache {
        match cache.get::<RankingsSummary>(&key).await {
            Ok(Some(summary)) => {
                metrics::record_cache(true, "rankings");
                return Ok(summary);
            }
            Ok(None) => metrics::record_cache(false, "rankings"),
            Err(e) => debug!(error = %e, "Rankings cache read failed, recomputing"),
        }
    }

    let repo = Repository::new(state.db.clone());

    let roster: Vec<ProfessorRef> = repo
        .list_professors(university_id)
        .await?
        .into_iter()
        .map(|p| ProfessorRef {
            professor_id: p.id,
            name: p.name,
            college: p.college,
        })
        .collect();

    let rows = repo.list_review_rows(university_id).await?;

    let start = Instant::now();
    let summary = aggregate(&roster, &rows, DEFAULT_TOP_TAGS);
    metrics::record_rankings(start.elapsed().as_secs_f64(), rows.len());

    if let Some(cache) = &state.cache {
        if let Err(e) = cache.set(&key, &summary).await {
            debug!(error = %e, "Rankings cache write failed");
        }
    }

    Ok(summary)
}

#[derive(Serialize)]
pub struct ProfessorRankingsResponse {
    pub professors: Vec<ProfessorScore>,
    pub review_count: usize,
}

/// GET /v1/rankings/professors?university_id=...
pub async fn professor_rankings(
    State(state): State<AppState>,
    Query(params): Query<RankingsParams>,
) -> Result<Json<ProfessorRankingsResponse>> {
    let summary = load_summary(&state, params.university_id).await?;

    Ok(Json(ProfessorRankingsResponse {
        professors: summary.professors,
        review_count: summary.review_count,
    }))
}

#[derive(Serialize)]
pub struct CollegeRankingsResponse {
    pub colleges: Vec<CollegeScore>,
}

/// GET /v1/rankings/colleges?university_id=...
pub async fn college_rankings(
    State(state): State<AppState>,
    Query(params): Query<RankingsParams>,
) -> Result<Json<CollegeRankingsResponse>> {
    let summary = load_summary(&state, params.university_id).await?;

    Ok(Json(CollegeRankingsResponse {
        colleges: summary.colleges,
    }))
}

#[derive(Deserialize)]
pub struct CourseRankingsParams {
    pub university_id: Option<Uuid>,
    pub professor_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct CourseRankingsResponse {
    pub courses: Vec<CourseScore>,
}

/// GET /v1/rankings/courses?university_id=... or ?professor_id=...
///
/// Scoped per professor when `professor_id` is given, otherwise
/// university-wide.
pub async fn course_rankings(
    State(state): State<AppState>,
    Query(params): Query<CourseRankingsParams>,
) -> Result<Json<CourseRankingsResponse>> {
    let repo = Repository::new(state.db.clone());

    let rows = match (params.professor_id, params.university_id) {
        (Some(professor_id), _) => {
            let professor = repo
                .find_professor_by_id(professor_id)
                .await?
                .ok_or_else(|| AppError::ProfessorNotFound {
                    id: professor_id.to_string(),
                })?;

            repo.list_reviews_by_professor(professor_id)
                .await?
                .into_iter()
                .map(|review| morshed_common::ReviewRow {
                    review_id: review.id,
                    professor_id: review.professor_id,
                    professor_name: professor.name.clone(),
                    college: professor.college.clone(),
                    rating: review.rating,
                    course: review.course.clone(),
                    tags: review.tag_list(),
                    attendance_rating: review.attendance_rating,
                    teaching_rating: review.teaching_rating,
                    behavior_rating: review.behavior_rating,
                    grading_rating: review.grading_rating,
                })
                .collect()
        }
        (None, Some(university_id)) => repo.list_review_rows(university_id).await?,
        (None, None) => {
            return Err(AppError::MissingField {
                field: "university_id".to_string(),
            })
        }
    };

    Ok(Json(CourseRankingsResponse {
        courses: rank_courses(&rows),
    }))
}
