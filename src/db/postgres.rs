use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    error::{AppError, AppResult},
    models::{NewRecommendation, Recommendation, ScoreChange},
};

use super::RecommendationRepository;

const COLUMNS: &str = "id, name, youtube_link, score, created_at";

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the embedded migrations in `migrations/`
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// PostgreSQL-backed recommendation store
#[derive(Clone)]
pub struct PgRecommendationRepository {
    pool: PgPool,
}

impl PgRecommendationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_unique_violation(err: sqlx::Error, name: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::Conflict(format!("Recommendation '{}' already exists", name));
        }
    }
    AppError::Database(err)
}

#[async_trait::async_trait]
impl RecommendationRepository for PgRecommendationRepository {
    async fn create(&self, new: NewRecommendation) -> AppResult<Recommendation> {
        let sql = format!(
            "INSERT INTO recommendations (name, youtube_link) VALUES ($1, $2) RETURNING {}",
            COLUMNS
        );

        sqlx::query_as::<_, Recommendation>(&sql)
            .bind(&new.name)
            .bind(&new.youtube_link)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, &new.name))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Recommendation>> {
        let sql = format!("SELECT {} FROM recommendations WHERE id = $1", COLUMNS);
        let row = sqlx::query_as::<_, Recommendation>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Recommendation>> {
        let sql = format!("SELECT {} FROM recommendations WHERE name = $1", COLUMNS);
        let row = sqlx::query_as::<_, Recommendation>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_by_id(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM recommendations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM recommendations")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn list_recent(&self, limit: i64) -> AppResult<Vec<Recommendation>> {
        let sql = format!(
            "SELECT {} FROM recommendations ORDER BY id DESC LIMIT $1",
            COLUMNS
        );
        let rows = sqlx::query_as::<_, Recommendation>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_top_by_score(&self, limit: i64) -> AppResult<Vec<Recommendation>> {
        let sql = format!(
            "SELECT {} FROM recommendations ORDER BY score DESC, id ASC LIMIT $1",
            COLUMNS
        );
        let rows = sqlx::query_as::<_, Recommendation>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_all(&self) -> AppResult<Vec<Recommendation>> {
        let sql = format!("SELECT {} FROM recommendations ORDER BY id ASC", COLUMNS);
        let rows = sqlx::query_as::<_, Recommendation>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn adjust_score(
        &self,
        id: i32,
        delta: i32,
        floor: Option<i32>,
    ) -> AppResult<Option<ScoreChange>> {
        let mut tx = self.pool.begin().await?;

        // UPDATE takes the row lock, so concurrent votes on this id queue behind us.
        // The sum is computed as bigint and clamped to the INTEGER range.
        let sql = format!(
            "UPDATE recommendations \
             SET score = LEAST(GREATEST(score::bigint + $2, {min}), {max})::integer \
             WHERE id = $1 RETURNING {columns}",
            min = i32::MIN,
            max = i32::MAX,
            columns = COLUMNS
        );
        let updated = sqlx::query_as::<_, Recommendation>(&sql)
            .bind(id)
            .bind(delta)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(updated) = updated else {
            tx.rollback().await?;
            return Ok(None);
        };

        let change = match floor {
            Some(floor) if updated.score < floor => {
                sqlx::query("DELETE FROM recommendations WHERE id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                ScoreChange::Removed(updated)
            }
            _ => ScoreChange::Updated(updated),
        };

        tx.commit().await?;

        Ok(Some(change))
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
