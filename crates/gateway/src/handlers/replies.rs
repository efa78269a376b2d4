//! Reply endpoints
//!
//! Replies hang off a review and may nest under another reply of the
//! same review via `parent_reply_id`.

use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use morshed_common::db::models::Reply;
use morshed_common::errors::{AppError, Result};
use morshed_common::moderation::validate_content;
use morshed_common::{Repository, MAX_REPLY_DEPTH};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct SubmitReplyRequest {
    pub content: String,
    pub parent_reply_id: Option<Uuid>,
}

/// POST /v1/reviews/{id}/replies
pub async fn submit_reply(
    State(state): State<AppState>,
    Path(review_id): Path<Uuid>,
    Json(request): Json<SubmitReplyRequest>,
) -> Result<(StatusCode, Json<Reply>)> {
    let repo = Repository::new(state.db.clone());

    if repo.find_review_by_id(review_id).await?.is_none() {
        return Err(AppError::ReviewNotFound {
            id: review_id.to_string(),
        });
    }

    if let Some(parent_id) = request.parent_reply_id {
        let parent = repo
            .find_reply_by_id(parent_id)
            .await?
            .ok_or_else(|| AppError::ReplyNotFound {
                id: parent_id.to_string(),
            })?;

        // Cross-review nesting would detach the reply from its thread
        if parent.review_id != review_id {
            return Err(AppError::Validation {
                message: "Parent reply belongs to a different review".to_string(),
                field: Some("parent_reply_id".to_string()),
            });
        }

        // Bounded walk up the chain; the new reply would sit one level
        // below the deepest ancestor found
        let mut depth = 2;
        let mut cursor = parent.parent_reply_id;
        while let Some(ancestor_id) = cursor {
            if depth >= MAX_REPLY_DEPTH {
                return Err(AppError::Validation {
                    message: format!("Reply threads may nest at most {} levels", MAX_REPLY_DEPTH),
                    field: Some("parent_reply_id".to_string()),
                });
            }
            depth += 1;
            cursor = repo
                .find_reply_by_id(ancestor_id)
                .await?
                .and_then(|r| r.parent_reply_id);
        }
    }

    let content = validate_content(&request.content)?;

    let reply = repo
        .create_reply(review_id, request.parent_reply_id, content)
        .await?;

    info!(reply_id = %reply.id, review_id = %review_id, "Reply submitted");

    Ok((StatusCode::CREATED, Json(reply)))
}

#[derive(Serialize)]
pub struct LikeResponse {
    pub liked: bool,
}

/// POST /v1/replies/{id}/likes
pub async fn like_reply(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LikeResponse>> {
    let repo = Repository::new(state.db.clone());

    if !repo.increment_reply_likes(id).await? {
        return Err(AppError::ReplyNotFound { id: id.to_string() });
    }

    Ok(Json(LikeResponse { liked: true }))
}
