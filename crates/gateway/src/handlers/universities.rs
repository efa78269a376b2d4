//! University endpoints
//!
//! The list always answers, even with the database down: the static
//! fallback registry is merged with stored rows by slug.

use crate::AppState;
use axum::extract::{Path, State};
use axum::Json;
use morshed_common::errors::{AppError, Result};
use morshed_common::universities::{merge_with_static, static_universities, UniversityInfo};
use serde::Serialize;
use tracing::warn;

#[derive(Serialize)]
pub struct UniversitiesResponse {
    pub universities: Vec<UniversityInfo>,
    pub count: usize,
}

/// GET /v1/universities
pub async fn list_universities(State(state): State<AppState>) -> Json<UniversitiesResponse> {
    let repo = morshed_common::Repository::new(state.db.clone());

    let universities = match repo.list_universities().await {
        Ok(stored) => merge_with_static(stored),
        Err(e) => {
            warn!(error = %e, "University lookup failed, serving fallback list");
            static_universities()
        }
    };

    let count = universities.len();
    Json(UniversitiesResponse {
        universities,
        count,
    })
}

/// GET /v1/universities/{slug}
pub async fn get_university(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<UniversityInfo>> {
    let repo = morshed_common::Repository::new(state.db.clone());

    if let Some(stored) = repo.find_university_by_slug(&slug).await? {
        return Ok(Json(stored.into()));
    }

    // Fallback entries are addressable by slug even before the table
    // is seeded
    static_universities()
        .into_iter()
        .find(|u| u.slug.eq_ignore_ascii_case(&slug))
        .map(Json)
        .ok_or(AppError::UniversityNotFound { slug })
}
