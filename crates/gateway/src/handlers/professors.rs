//! Professor search, submission, and profile endpoints
//!
//! Submissions go through a community approval flow: a new professor
//! starts unapproved with `request_count` 1, and repeat submissions of
//! the same name push the count toward the configured threshold. Once
//! reached, the professor flips to approved and joins search results.

use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use morshed_common::cache::rankings_key;
use morshed_common::db::models::Professor;
use morshed_common::db::ReviewRow;
use morshed_common::errors::{AppError, Result};
use morshed_common::moderation::{clean_search_term, contains_bad_word};
use morshed_common::{metrics, Repository, DEFAULT_TOP_TAGS};
use morshed_rankings::{aggregate, ProfessorRef, ProfessorScore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Deserialize)]
pub struct SearchParams {
    pub university_id: Uuid,
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub professors: Vec<Professor>,
    pub count: usize,
}

/// GET /v1/professors/search?university_id=...&q=...
pub async fn search_professors(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>> {
    let term = clean_search_term(&params.q);
    if term.is_empty() {
        return Ok(Json(SearchResponse {
            professors: Vec::new(),
            count: 0,
        }));
    }

    let repo = Repository::new(state.db.clone());
    let professors = repo.search_professors(params.university_id, &term).await?;

    metrics::record_search(professors.len());

    let count = professors.len();
    Ok(Json(SearchResponse { professors, count }))
}

#[derive(Deserialize)]
pub struct SubmitProfessorRequest {
    pub university_id: Uuid,
    pub name: String,
    pub college: String,
    pub department: String,
}

/// Where a submission landed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Visible in search
    Approved,
    /// Waiting for more duplicate submissions
    Pending,
    /// Already approved before this submission
    AlreadyExists,
}

#[derive(Serialize)]
pub struct SubmitProfessorResponse {
    pub status: SubmissionStatus,
    pub professor: Professor,
    /// Submissions still needed before approval; 0 once approved
    pub remaining_requests: u32,
}

fn required_field(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::MissingField {
            field: field.to_string(),
        });
    }
    if contains_bad_word(trimmed) {
        return Err(AppError::ContentRejected);
    }
    Ok(trimmed.to_string())
}

fn remaining(professor: &Professor, threshold: u32) -> u32 {
    if professor.is_approved {
        0
    } else {
        threshold.saturating_sub(professor.request_count.max(0) as u32)
    }
}

/// A submission changed the visible roster only when it ended in a
/// fresh approval; cached rankings are stale from that point
fn roster_changed(status: SubmissionStatus) -> bool {
    matches!(status, SubmissionStatus::Approved)
}

async fn bust_rankings(state: &AppState, university_id: Uuid) {
    if let Some(cache) = &state.cache {
        if let Err(e) = cache.invalidate(&rankings_key(university_id)).await {
            debug!(error = %e, "Rankings cache invalidation failed");
        }
    }
}

/// POST /v1/professors
pub async fn submit_professor(
    State(state): State<AppState>,
    Json(request): Json<SubmitProfessorRequest>,
) -> Result<(StatusCode, Json<SubmitProfessorResponse>)> {
    let name = required_field(&request.name, "name")?;
    let college = required_field(&request.college, "college")?;
    let department = required_field(&request.department, "department")?;

    let repo = Repository::new(state.db.clone());
    let threshold = state.config.submissions.approval_threshold;

    // Same name within the same university counts toward the threshold
    // instead of creating another row
    if let Some(existing) = repo
        .find_professor_by_name(request.university_id, &name)
        .await?
    {
        if existing.is_approved {
            metrics::record_professor_submission("already_exists");
            let remaining = remaining(&existing, threshold);
            return Ok((
                StatusCode::OK,
                Json(SubmitProfessorResponse {
                    status: SubmissionStatus::AlreadyExists,
                    professor: existing,
                    remaining_requests: remaining,
                }),
            ));
        }

        let updated = repo.record_duplicate_request(existing.id, threshold).await?;
        let status = if updated.is_approved {
            info!(professor_id = %updated.id, "Professor approved by repeat submissions");
            SubmissionStatus::Approved
        } else {
            SubmissionStatus::Pending
        };
        metrics::record_professor_submission("duplicate");

        if roster_changed(status) {
            bust_rankings(&state, request.university_id).await;
        }

        let remaining = remaining(&updated, threshold);
        return Ok((
            StatusCode::OK,
            Json(SubmitProfessorResponse {
                status,
                professor: updated,
                remaining_requests: remaining,
            }),
        ));
    }

    let approved = state.config.submissions.auto_approve;
    let professor = repo
        .create_professor(request.university_id, name, college, department, approved)
        .await?;

    let status = if approved {
        SubmissionStatus::Approved
    } else {
        SubmissionStatus::Pending
    };
    metrics::record_professor_submission("created");
    info!(professor_id = %professor.id, ?status, "Professor submitted");

    if roster_changed(status) {
        bust_rankings(&state, request.university_id).await;
    }

    let remaining = remaining(&professor, threshold);
    Ok((
        StatusCode::CREATED,
        Json(SubmitProfessorResponse {
            status,
            professor,
            remaining_requests: remaining,
        }),
    ))
}

#[derive(Serialize)]
pub struct ProfessorProfile {
    pub professor: Professor,
    pub summary: ProfessorScore,
}

/// GET /v1/professors/{id}
///
/// Returns the professor together with a freshly computed score summary.
pub async fn get_professor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfessorProfile>> {
    let repo = Repository::new(state.db.clone());

    let professor = repo
        .find_professor_by_id(id)
        .await?
        .ok_or_else(|| AppError::ProfessorNotFound { id: id.to_string() })?;

    let rows: Vec<ReviewRow> = repo
        .list_reviews_by_professor(id)
        .await?
        .into_iter()
        .map(|review| ReviewRow {
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
        .collect();

    let roster = [ProfessorRef {
        professor_id: professor.id,
        name: professor.name.clone(),
        college: professor.college.clone(),
    }];
    let mut summary = aggregate(&roster, &rows, DEFAULT_TOP_TAGS);
    let summary = summary.professors.pop().ok_or_else(|| AppError::Internal {
        message: "aggregation produced no entry for the requested professor".to_string(),
    })?;

    Ok(Json(ProfessorProfile { professor, summary }))
}

#[derive(Serialize)]
pub struct ViewResponse {
    pub recorded: bool,
}

/// POST /v1/professors/{id}/views
pub async fn increment_views(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ViewResponse>> {
    let repo = Repository::new(state.db.clone());

    if !repo.increment_professor_views(id).await? {
        return Err(AppError::ProfessorNotFound { id: id.to_string() });
    }

    Ok(Json(ViewResponse { recorded: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn professor(approved: bool, request_count: i32) -> Professor {
        let now = chrono::Utc::now();
        Professor {
            id: Uuid::from_u128(1),
            university_id: Uuid::from_u128(2),
            name: "د. أحمد".to_string(),
            college: "كلية العلوم".to_string(),
            department: "قسم الفيزياء".to_string(),
            is_approved: approved,
            request_count,
            views: 0,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn test_required_field_trims_and_rejects_empty() {
        assert_eq!(required_field("  محمد  ", "name").unwrap(), "محمد");
        assert!(matches!(
            required_field("   ", "name").unwrap_err(),
            AppError::MissingField { .. }
        ));
    }

    #[test]
    fn test_required_field_runs_moderation() {
        assert!(matches!(
            required_field("دكتور غبي", "name").unwrap_err(),
            AppError::ContentRejected
        ));
    }

    #[test]
    fn test_remaining_requests() {
        assert_eq!(remaining(&professor(false, 1), 3), 2);
        assert_eq!(remaining(&professor(false, 2), 3), 1);
        assert_eq!(remaining(&professor(true, 3), 3), 0);
    }

    #[test]
    fn test_only_fresh_approvals_invalidate_rankings() {
        assert!(roster_changed(SubmissionStatus::Approved));
        assert!(!roster_changed(SubmissionStatus::Pending));
        assert!(!roster_changed(SubmissionStatus::AlreadyExists));
    }
}
