//! Repository pattern for database operations
//!
//! Provides a clean interface for all data access operations
//! with proper error handling.

use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbBackend,
    EntityTrait, QueryFilter, QueryOrder, Select, Set, Statement,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One review row joined with its professor, as consumed by the
/// rankings aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRow {
    pub review_id: Uuid,
    pub professor_id: Uuid,
    pub professor_name: String,
    pub college: String,
    pub rating: i16,
    pub course: Option<String>,
    pub tags: Vec<String>,
    pub attendance_rating: i16,
    pub teaching_rating: i16,
    pub behavior_rating: i16,
    pub grading_rating: i16,
}

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get the read connection
    fn read_conn(&self) -> &DatabaseConnection {
        self.pool.read()
    }

    /// Get the write connection
    fn write_conn(&self) -> &DatabaseConnection {
        self.pool.write()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // University Operations
    // ========================================================================

    /// List all universities
    pub async fn list_universities(&self) -> Result<Vec<University>> {
        UniversityEntity::find()
            .order_by_asc(UniversityColumn::Name)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find a university by slug, case-insensitively
    pub async fn find_university_by_slug(&self, slug: &str) -> Result<Option<University>> {
        UniversityEntity::find()
            .filter(Expr::col(UniversityColumn::Slug).ilike(slug))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Professor Operations
    // ========================================================================

    /// Search approved professors by name, college, or department
    pub async fn search_professors(
        &self,
        university_id: Uuid,
        term: &str,
    ) -> Result<Vec<Professor>> {
        let pattern = format!("%{}%", term);

        ProfessorEntity::find()
            .filter(ProfessorColumn::UniversityId.eq(university_id))
            .filter(ProfessorColumn::IsApproved.eq(true))
            .filter(
                Condition::any()
                    .add(Expr::col(ProfessorColumn::Name).ilike(&pattern))
                    .add(Expr::col(ProfessorColumn::College).ilike(&pattern))
                    .add(Expr::col(ProfessorColumn::Department).ilike(&pattern)),
            )
            .order_by_asc(ProfessorColumn::Name)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find professor by ID
    pub async fn find_professor_by_id(&self, id: Uuid) -> Result<Option<Professor>> {
        ProfessorEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find a professor by exact name within a university, case-insensitively.
    /// Used for duplicate detection on submission.
    pub async fn find_professor_by_name(
        &self,
        university_id: Uuid,
        name: &str,
    ) -> Result<Option<Professor>> {
        professor_by_name_query(university_id, name)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// List approved professors for a university
    pub async fn list_professors(&self, university_id: Uuid) -> Result<Vec<Professor>> {
        ProfessorEntity::find()
            .filter(ProfessorColumn::UniversityId.eq(university_id))
            .filter(ProfessorColumn::IsApproved.eq(true))
            .order_by_asc(ProfessorColumn::Name)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Create a new professor
    pub async fn create_professor(
        &self,
        university_id: Uuid,
        name: String,
        college: String,
        department: String,
        approved: bool,
    ) -> Result<Professor> {
        let now = chrono::Utc::now();

        let professor = ProfessorActiveModel {
            id: Set(Uuid::new_v4()),
            university_id: Set(university_id),
            name: Set(name),
            college: Set(college),
            department: Set(department),
            is_approved: Set(approved),
            request_count: Set(1),
            views: Set(0),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        professor.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Record another submission for a pending professor.
    /// Flips `is_approved` once `request_count` reaches the threshold.
    pub async fn record_duplicate_request(
        &self,
        professor_id: Uuid,
        approval_threshold: u32,
    ) -> Result<Professor> {
        let existing = ProfessorEntity::find_by_id(professor_id)
            .one(self.write_conn())
            .await?
            .ok_or_else(|| AppError::ProfessorNotFound {
                id: professor_id.to_string(),
            })?;

        let new_count = existing.request_count.saturating_add(1);
        let approve = new_count >= approval_threshold as i32;

        let mut professor: ProfessorActiveModel = existing.into();
        professor.request_count = Set(new_count);
        professor.is_approved = Set(approve);
        professor.updated_at = Set(chrono::Utc::now().into());

        professor.update(self.write_conn()).await.map_err(Into::into)
    }

    /// Increment the profile view counter
    pub async fn increment_professor_views(&self, professor_id: Uuid) -> Result<bool> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "UPDATE professors SET views = views + 1 WHERE id = $1",
            vec![professor_id.into()],
        );

        let result = self.write_conn().execute(stmt).await?;
        Ok(result.rows_affected() > 0)
    }

    // ========================================================================
    // Review Operations
    // ========================================================================

    /// List reviews for a professor, newest first
    pub async fn list_reviews_by_professor(&self, professor_id: Uuid) -> Result<Vec<Review>> {
        ReviewEntity::find()
            .filter(ReviewColumn::ProfessorId.eq(professor_id))
            .order_by_desc(ReviewColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find review by ID
    pub async fn find_review_by_id(&self, id: Uuid) -> Result<Option<Review>> {
        ReviewEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Fetch all review rows for approved professors of a university,
    /// joined with the professor columns the aggregator needs.
    pub async fn list_review_rows(&self, university_id: Uuid) -> Result<Vec<ReviewRow>> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            SELECT
                r.id as review_id,
                r.professor_id,
                p.name as professor_name,
                p.college,
                r.rating,
                r.course,
                r.tags,
                r.attendance_rating,
                r.teaching_rating,
                r.behavior_rating,
                r.grading_rating
            FROM reviews r
            JOIN professors p ON r.professor_id = p.id
            WHERE p.university_id = $1
              AND p.is_approved = TRUE
            "#,
            vec![university_id.into()],
        );

        let rows = self
            .read_conn()
            .query_all(stmt)
            .await?
            .into_iter()
            .filter_map(|row| {
                let tags: serde_json::Value = row.try_get_by_index(6).ok()?;
                Some(ReviewRow {
                    review_id: row.try_get_by_index::<Uuid>(0).ok()?,
                    professor_id: row.try_get_by_index::<Uuid>(1).ok()?,
                    professor_name: row.try_get_by_index::<String>(2).ok()?,
                    college: row.try_get_by_index::<String>(3).ok()?,
                    rating: row.try_get_by_index::<i16>(4).ok()?,
                    course: row.try_get_by_index::<Option<String>>(5).ok()?,
                    tags: tags
                        .as_array()
                        .map(|arr| {
                            arr.iter()
                                .filter_map(|v| v.as_str().map(String::from))
                                .collect()
                        })
                        .unwrap_or_default(),
                    attendance_rating: row.try_get_by_index::<i16>(7).ok()?,
                    teaching_rating: row.try_get_by_index::<i16>(8).ok()?,
                    behavior_rating: row.try_get_by_index::<i16>(9).ok()?,
                    grading_rating: row.try_get_by_index::<i16>(10).ok()?,
                })
            })
            .collect();

        Ok(rows)
    }

    /// Create a new review
    #[allow(clippy::too_many_arguments)]
    pub async fn create_review(
        &self,
        professor_id: Uuid,
        content: String,
        rating: i16,
        grade: Option<String>,
        course: Option<String>,
        sub_ratings: [i16; 4],
        tags: Vec<String>,
    ) -> Result<Review> {
        let [attendance, teaching, behavior, grading] = sub_ratings;

        let review = ReviewActiveModel {
            id: Set(Uuid::new_v4()),
            professor_id: Set(professor_id),
            content: Set(content),
            rating: Set(rating),
            grade: Set(grade),
            course: Set(course),
            attendance_rating: Set(attendance),
            teaching_rating: Set(teaching),
            behavior_rating: Set(behavior),
            grading_rating: Set(grading),
            tags: Set(serde_json::json!(tags)),
            likes: Set(0),
            created_at: Set(chrono::Utc::now().into()),
        };

        review.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Increment the like counter on a review
    pub async fn increment_review_likes(&self, review_id: Uuid) -> Result<bool> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "UPDATE reviews SET likes = likes + 1 WHERE id = $1",
            vec![review_id.into()],
        );

        let result = self.write_conn().execute(stmt).await?;
        Ok(result.rows_affected() > 0)
    }

    // ========================================================================
    // Reply Operations
    // ========================================================================

    /// List replies attached to any of the given reviews, oldest first
    pub async fn list_replies_for_reviews(&self, review_ids: &[Uuid]) -> Result<Vec<Reply>> {
        if review_ids.is_empty() {
            return Ok(Vec::new());
        }

        ReplyEntity::find()
            .filter(ReplyColumn::ReviewId.is_in(review_ids.iter().copied()))
            .order_by_asc(ReplyColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find reply by ID
    pub async fn find_reply_by_id(&self, id: Uuid) -> Result<Option<Reply>> {
        ReplyEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Create a new reply on a review, optionally nested under a parent reply
    pub async fn create_reply(
        &self,
        review_id: Uuid,
        parent_reply_id: Option<Uuid>,
        content: String,
    ) -> Result<Reply> {
        let reply = ReplyActiveModel {
            id: Set(Uuid::new_v4()),
            review_id: Set(review_id),
            parent_reply_id: Set(parent_reply_id),
            content: Set(content),
            likes: Set(0),
            created_at: Set(chrono::Utc::now().into()),
        };

        reply.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Increment the like counter on a reply
    pub async fn increment_reply_likes(&self, reply_id: Uuid) -> Result<bool> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "UPDATE replies SET likes = likes + 1 WHERE id = $1",
            vec![reply_id.into()],
        );

        let result = self.write_conn().execute(stmt).await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Equality on the lowercased name. A pattern match would let `%`/`_`
/// in a submitted name hit unrelated pending professors and push their
/// request counters.
fn professor_by_name_query(university_id: Uuid, name: &str) -> Select<ProfessorEntity> {
    ProfessorEntity::find()
        .filter(ProfessorColumn::UniversityId.eq(university_id))
        .filter(
            Expr::expr(Func::lower(Expr::col(ProfessorColumn::Name)))
                .eq(Func::lower(Expr::val(name))),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::QueryTrait;

    #[test]
    fn test_duplicate_lookup_uses_equality_not_patterns() {
        let stmt = professor_by_name_query(Uuid::nil(), "%").build(DbBackend::Postgres);
        let sql = stmt.to_string().to_uppercase();

        assert!(sql.contains("LOWER"));
        assert!(!sql.contains("LIKE"));
    }

    #[test]
    fn test_duplicate_lookup_scopes_to_university() {
        let university = Uuid::from_u128(7);
        let stmt = professor_by_name_query(university, "د. أحمد").build(DbBackend::Postgres);
        let sql = stmt.to_string();

        assert!(sql.contains(&university.to_string()));
    }
}
