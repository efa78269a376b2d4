//! Review endpoints
//!
//! Submissions run through validation and moderation before storage;
//! reads return each review with its reply thread attached.

use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use morshed_common::cache::rankings_key;
use morshed_common::db::models::{Reply, Review};
use morshed_common::errors::{AppError, Result};
use morshed_common::moderation::{is_valid_grade, validate_content};
use morshed_common::tags::normalize_tags;
use morshed_common::{metrics, Repository};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

/// A reply with its nested children
#[derive(Debug, Serialize)]
pub struct ReplyView {
    pub id: Uuid,
    pub content: String,
    pub likes: i64,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    pub replies: Vec<ReplyView>,
}

/// A review with its reply thread
#[derive(Serialize)]
pub struct ReviewView {
    #[serde(flatten)]
    pub review: Review,
    pub replies: Vec<ReplyView>,
}

#[derive(Serialize)]
pub struct ReviewsResponse {
    pub reviews: Vec<ReviewView>,
    pub count: usize,
}

/// Build the reply tree for one review from a flat list grouped by
/// parent. Iterative on an explicit work stack: nesting depth is
/// user-controlled and must not consume call stack. Replies arrive
/// ordered oldest first and stay that way at every level.
fn build_reply_tree(
    by_parent: &mut HashMap<Option<Uuid>, Vec<Reply>>,
    root: Option<Uuid>,
) -> Vec<ReplyView> {
    // Pre-order flatten; siblings are reversed so popping restores
    // their original order
    let mut stack = by_parent.remove(&root).unwrap_or_default();
    stack.reverse();
    let mut flat: Vec<Reply> = Vec::new();
    while let Some(reply) = stack.pop() {
        if let Some(mut children) = by_parent.remove(&Some(reply.id)) {
            children.reverse();
            stack.append(&mut children);
        }
        flat.push(reply);
    }

    // Reverse pre-order visits every child before its parent, so each
    // node's subtree is complete when the node is assembled
    let mut children_of: HashMap<Uuid, Vec<ReplyView>> = HashMap::new();
    let mut top_level: Vec<ReplyView> = Vec::new();
    for reply in flat.into_iter().rev() {
        let mut nested = children_of.remove(&reply.id).unwrap_or_default();
        nested.reverse();
        let view = ReplyView {
            id: reply.id,
            content: reply.content,
            likes: reply.likes,
            created_at: reply.created_at,
            replies: nested,
        };
        match reply.parent_reply_id {
            parent if parent == root => top_level.push(view),
            Some(parent) => children_of.entry(parent).or_default().push(view),
            None => top_level.push(view),
        }
    }
    top_level.reverse();
    top_level
}

/// GET /v1/professors/{id}/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(professor_id): Path<Uuid>,
) -> Result<Json<ReviewsResponse>> {
    let repo = Repository::new(state.db.clone());

    if repo.find_professor_by_id(professor_id).await?.is_none() {
        return Err(AppError::ProfessorNotFound {
            id: professor_id.to_string(),
        });
    }

    let reviews = repo.list_reviews_by_professor(professor_id).await?;
    let review_ids: Vec<Uuid> = reviews.iter().map(|r| r.id).collect();
    let replies = repo.list_replies_for_reviews(&review_ids).await?;

    // Group replies by review, then by parent within each review
    let mut by_review: HashMap<Uuid, Vec<Reply>> = HashMap::new();
    for reply in replies {
        by_review.entry(reply.review_id).or_default().push(reply);
    }

    let reviews: Vec<ReviewView> = reviews
        .into_iter()
        .map(|review| {
            let mut by_parent: HashMap<Option<Uuid>, Vec<Reply>> = HashMap::new();
            for reply in by_review.remove(&review.id).unwrap_or_default() {
                by_parent.entry(reply.parent_reply_id).or_default().push(reply);
            }
            let thread = build_reply_tree(&mut by_parent, None);
            ReviewView {
                review,
                replies: thread,
            }
        })
        .collect();

    let count = reviews.len();
    Ok(Json(ReviewsResponse { reviews, count }))
}

#[derive(Deserialize, Validate)]
pub struct SubmitReviewRequest {
    pub content: String,

    #[validate(range(min = 1, max = 5))]
    pub rating: i16,

    pub grade: Option<String>,
    pub course: Option<String>,

    // Sub-ratings are optional; 0 means skipped
    #[serde(default)]
    #[validate(range(min = 0, max = 5))]
    pub attendance_rating: i16,

    #[serde(default)]
    #[validate(range(min = 0, max = 5))]
    pub teaching_rating: i16,

    #[serde(default)]
    #[validate(range(min = 0, max = 5))]
    pub behavior_rating: i16,

    #[serde(default)]
    #[validate(range(min = 0, max = 5))]
    pub grading_rating: i16,

    #[serde(default)]
    pub tags: Vec<String>,
}

fn validate_review(request: &SubmitReviewRequest) -> Result<(String, Vec<String>)> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    if let Some(grade) = request.grade.as_deref() {
        if !is_valid_grade(grade) {
            return Err(AppError::InvalidFormat {
                message: format!("Unknown grade: {}", grade),
            });
        }
    }

    let content = validate_content(&request.content)?;

    let tags = normalize_tags(&request.tags).map_err(|label| AppError::Validation {
        message: format!("Unknown tag: {}", label),
        field: Some("tags".to_string()),
    })?;

    Ok((content, tags))
}

/// POST /v1/professors/{id}/reviews
pub async fn submit_review(
    State(state): State<AppState>,
    Path(professor_id): Path<Uuid>,
    Json(request): Json<SubmitReviewRequest>,
) -> Result<(StatusCode, Json<Review>)> {
    let repo = Repository::new(state.db.clone());

    let professor = repo
        .find_professor_by_id(professor_id)
        .await?
        .ok_or_else(|| AppError::ProfessorNotFound {
            id: professor_id.to_string(),
        })?;

    let (content, tags) = match validate_review(&request) {
        Ok(validated) => validated,
        Err(e) => {
            metrics::record_review(false);
            return Err(e);
        }
    };

    let course = request
        .course
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from);

    let review = repo
        .create_review(
            professor_id,
            content,
            request.rating,
            request.grade,
            course,
            [
                request.attendance_rating,
                request.teaching_rating,
                request.behavior_rating,
                request.grading_rating,
            ],
            tags,
        )
        .await?;

    metrics::record_review(true);
    info!(review_id = %review.id, professor_id = %professor_id, "Review submitted");

    // Scores changed; drop the cached rankings for this university
    if let Some(cache) = &state.cache {
        if let Err(e) = cache.invalidate(&rankings_key(professor.university_id)).await {
            debug!(error = %e, "Rankings cache invalidation failed");
        }
    }

    Ok((StatusCode::CREATED, Json(review)))
}

#[derive(Serialize)]
pub struct LikeResponse {
    pub liked: bool,
}

/// POST /v1/reviews/{id}/likes
pub async fn like_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LikeResponse>> {
    let repo = Repository::new(state.db.clone());

    if !repo.increment_review_likes(id).await? {
        return Err(AppError::ReviewNotFound { id: id.to_string() });
    }

    Ok(Json(LikeResponse { liked: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(rating: i16) -> SubmitReviewRequest {
        SubmitReviewRequest {
            content: "شرحه واضح والاختبارات عادلة".to_string(),
            rating,
            grade: None,
            course: None,
            attendance_rating: 0,
            teaching_rating: 0,
            behavior_rating: 0,
            grading_rating: 0,
            tags: Vec::new(),
        }
    }

    fn reply(id: u128, parent: Option<u128>) -> Reply {
        Reply {
            id: Uuid::from_u128(id),
            review_id: Uuid::from_u128(100),
            parent_reply_id: parent.map(Uuid::from_u128),
            content: format!("رد {}", id),
            likes: 0,
            created_at: chrono::Utc::now().into(),
        }
    }

    #[test]
    fn test_rating_bounds() {
        assert!(validate_review(&request(1)).is_ok());
        assert!(validate_review(&request(5)).is_ok());
        assert!(validate_review(&request(0)).is_err());
        assert!(validate_review(&request(6)).is_err());
    }

    #[test]
    fn test_sub_rating_zero_means_skipped() {
        let mut req = request(4);
        req.attendance_rating = 0;
        assert!(validate_review(&req).is_ok());

        req.attendance_rating = 6;
        assert!(validate_review(&req).is_err());
    }

    #[test]
    fn test_unknown_grade_rejected() {
        let mut req = request(4);
        req.grade = Some("E".to_string());
        assert!(matches!(
            validate_review(&req).unwrap_err(),
            AppError::InvalidFormat { .. }
        ));

        req.grade = Some("محتسب".to_string());
        assert!(validate_review(&req).is_ok());
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let mut req = request(4);
        req.tags = vec!["مزيف".to_string()];
        let err = validate_review(&req).unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_reply_tree_nests_children() {
        let mut by_parent: HashMap<Option<Uuid>, Vec<Reply>> = HashMap::new();
        for r in [reply(1, None), reply(2, Some(1)), reply(3, Some(2)), reply(4, None)] {
            by_parent.entry(r.parent_reply_id).or_default().push(r);
        }

        let tree = build_reply_tree(&mut by_parent, None);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].replies.len(), 1);
        assert_eq!(tree[0].replies[0].replies.len(), 1);
        assert!(tree[1].replies.is_empty());
    }

    #[test]
    fn test_reply_tree_keeps_sibling_order() {
        let mut by_parent: HashMap<Option<Uuid>, Vec<Reply>> = HashMap::new();
        for r in [reply(1, None), reply(2, None), reply(3, Some(1)), reply(4, Some(1))] {
            by_parent.entry(r.parent_reply_id).or_default().push(r);
        }

        let tree = build_reply_tree(&mut by_parent, None);

        assert_eq!(tree[0].id, Uuid::from_u128(1));
        assert_eq!(tree[1].id, Uuid::from_u128(2));
        assert_eq!(tree[0].replies[0].id, Uuid::from_u128(3));
        assert_eq!(tree[0].replies[1].id, Uuid::from_u128(4));
    }

    #[test]
    fn test_reply_tree_handles_deep_chains() {
        // A long single-parent chain must build without consuming call
        // stack proportional to depth
        let depth: u128 = 10_000;
        let mut by_parent: HashMap<Option<Uuid>, Vec<Reply>> = HashMap::new();
        by_parent.entry(None).or_default().push(reply(1, None));
        for i in 2..=depth {
            by_parent
                .entry(Some(Uuid::from_u128(i - 1)))
                .or_default()
                .push(reply(i, Some(i - 1)));
        }

        let tree = build_reply_tree(&mut by_parent, None);

        let mut level = &tree;
        let mut seen: u128 = 0;
        while let Some(node) = level.first() {
            seen += 1;
            level = &node.replies;
        }
        assert_eq!(seen, depth);
    }

    #[test]
    fn test_submission_defaults_from_json() {
        let request: SubmitReviewRequest =
            serde_json::from_str(r#"{"content":"شرح ممتاز","rating":5}"#).unwrap();

        assert_eq!(request.attendance_rating, 0);
        assert_eq!(request.teaching_rating, 0);
        assert_eq!(request.behavior_rating, 0);
        assert_eq!(request.grading_rating, 0);
        assert!(request.tags.is_empty());
        assert!(request.grade.is_none());
        assert!(request.course.is_none());
        assert!(validate_review(&request).is_ok());
    }
}
