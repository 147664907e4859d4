//! Diesel-based generation repository.
//!
//! Also carries the aggregate queries behind `db stats`.

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::diesel_models::{GenerationRecord, NewGeneration};
use super::diesel_pool::AsyncSqlitePool;
use super::{parse_datetime, RepositoryError};
use crate::models::Generation;
use crate::schema::generations;

impl From<GenerationRecord> for Generation {
    fn from(record: GenerationRecord) -> Self {
        Generation {
            id: record.id,
            ip_address: record.ip_address,
            level: record.level,
            stack: record.stack,
            goal: record.goal,
            blueprint_title: record.blueprint_title,
            day: record.day,
            created_at: parse_datetime(&record.created_at),
        }
    }
}

/// A blueprint title with its generation count, for the stats report.
#[derive(Debug, Clone)]
pub struct BlueprintCount {
    pub title: String,
    pub count: i64,
}

/// Repository for the `generations` table.
#[derive(Clone)]
pub struct DieselGenerationRepository {
    pool: AsyncSqlitePool,
}

impl DieselGenerationRepository {
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    /// Record a generation.
    ///
    /// The `(ip_address, day)` unique index makes this the arbiter of the
    /// daily quota: a second row for the same IP and day comes back as
    /// [`RepositoryError::UniqueViolation`], even when two requests passed
    /// the pre-check concurrently.
    pub async fn record(
        &self,
        ip_address: &str,
        level: &str,
        stack: &str,
        goal: &str,
        blueprint_title: &str,
        day: &str,
    ) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await?;
        let created_at = Utc::now().to_rfc3339();

        diesel::insert_into(generations::table)
            .values(NewGeneration {
                ip_address,
                level,
                stack,
                goal,
                blueprint_title,
                day,
                created_at: &created_at,
            })
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    /// Whether `ip_address` already generated on `day`.
    pub async fn generated_on(&self, ip_address: &str, day: &str) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await?;

        use diesel::dsl::count_star;
        let count = generations::table
            .filter(generations::ip_address.eq(ip_address))
            .filter(generations::day.eq(day))
            .select(count_star())
            .first::<i64>(&mut conn)
            .await?;

        Ok(count > 0)
    }

    /// Total generation count.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let mut conn = self.pool.get().await?;

        use diesel::dsl::count_star;
        let count = generations::table
            .select(count_star())
            .first::<i64>(&mut conn)
            .await?;

        Ok(count)
    }

    /// Generation count for one calendar day.
    pub async fn count_for_day(&self, day: &str) -> Result<i64, RepositoryError> {
        let mut conn = self.pool.get().await?;

        use diesel::dsl::count_star;
        let count = generations::table
            .filter(generations::day.eq(day))
            .select(count_star())
            .first::<i64>(&mut conn)
            .await?;

        Ok(count)
    }

    /// Most-generated blueprint titles, highest count first.
    pub async fn top_blueprints(&self, limit: usize) -> Result<Vec<BlueprintCount>, RepositoryError> {
        let mut conn = self.pool.get().await?;

        use diesel::dsl::count_star;
        let rows: Vec<(String, i64)> = generations::table
            .group_by(generations::blueprint_title)
            .select((generations::blueprint_title, count_star()))
            .load(&mut conn)
            .await?;

        let mut counts: Vec<BlueprintCount> = rows
            .into_iter()
            .map(|(title, count)| BlueprintCount { title, count })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.title.cmp(&b.title)));
        counts.truncate(limit);

        Ok(counts)
    }

    /// Number of distinct IPs that have generated.
    pub async fn distinct_ip_count(&self) -> Result<i64, RepositoryError> {
        let mut conn = self.pool.get().await?;

        use diesel::dsl::count_distinct;
        let count = generations::table
            .select(count_distinct(generations::ip_address))
            .first::<i64>(&mut conn)
            .await?;

        Ok(count)
    }

    /// All generations, newest first.
    #[allow(dead_code)]
    pub async fn get_all(&self) -> Result<Vec<Generation>, RepositoryError> {
        let mut conn = self.pool.get().await?;

        let records = generations::table
            .order(generations::created_at.desc())
            .load::<GenerationRecord>(&mut conn)
            .await?;

        Ok(records.into_iter().map(Generation::from).collect())
    }

    /// Delete every generation (maintenance reset).
    pub async fn clear(&self) -> Result<usize, RepositoryError> {
        let mut conn = self.pool.get().await?;

        let rows = diesel::delete(generations::table).execute(&mut conn).await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::today_utc;
    use crate::repository::migrations::run_migrations;
    use tempfile::tempdir;

    async fn setup_test_db() -> (AsyncSqlitePool, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");

        let pool = AsyncSqlitePool::from_path(&db_path);
        run_migrations(pool.database_url()).await.unwrap();

        (pool, dir)
    }

    #[tokio::test]
    async fn record_and_query_by_day() {
        let (pool, _dir) = setup_test_db().await;
        let repo = DieselGenerationRepository::new(pool);
        let today = today_utc();

        assert!(!repo.generated_on("1.2.3.4", &today).await.unwrap());

        repo.record("1.2.3.4", "beginner", "frontend", "portfolio", "Personal Portfolio Site", &today)
            .await
            .unwrap();

        assert!(repo.generated_on("1.2.3.4", &today).await.unwrap());
        assert!(!repo.generated_on("1.2.3.4", "1999-01-01").await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 1);
        assert_eq!(repo.count_for_day(&today).await.unwrap(), 1);
        assert_eq!(repo.count_for_day("1999-01-01").await.unwrap(), 0);

        let all = repo.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].ip_address, "1.2.3.4");
        assert_eq!(all[0].blueprint_title, "Personal Portfolio Site");
        assert_eq!(all[0].day, today);
    }

    #[tokio::test]
    async fn quotas_are_independent_per_ip() {
        let (pool, _dir) = setup_test_db().await;
        let repo = DieselGenerationRepository::new(pool);
        let today = today_utc();

        repo.record("1.2.3.4", "beginner", "frontend", "portfolio", "Personal Portfolio Site", &today)
            .await
            .unwrap();

        // A different IP is unaffected by the first IP's quota
        assert!(!repo.generated_on("5.6.7.8", &today).await.unwrap());
        repo.record("5.6.7.8", "advanced", "backend", "learning", "Distributed Task Queue", &today)
            .await
            .unwrap();

        assert_eq!(repo.count_for_day(&today).await.unwrap(), 2);
        assert_eq!(repo.distinct_ip_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn same_ip_same_day_is_single_winner() {
        let (pool, _dir) = setup_test_db().await;
        let repo = DieselGenerationRepository::new(pool);
        let today = today_utc();

        // Both callers pass the pre-check before either inserts; the
        // unique index still admits exactly one row.
        assert!(!repo.generated_on("1.2.3.4", &today).await.unwrap());
        assert!(!repo.generated_on("1.2.3.4", &today).await.unwrap());

        repo.record("1.2.3.4", "beginner", "frontend", "portfolio", "Personal Portfolio Site", &today)
            .await
            .unwrap();
        let err = repo
            .record("1.2.3.4", "beginner", "frontend", "startup", "Landing Page with Waitlist", &today)
            .await
            .unwrap_err();

        assert!(err.is_unique_violation());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn same_ip_next_day_is_allowed() {
        let (pool, _dir) = setup_test_db().await;
        let repo = DieselGenerationRepository::new(pool);

        repo.record("1.2.3.4", "beginner", "frontend", "portfolio", "Personal Portfolio Site", "2025-08-01")
            .await
            .unwrap();
        repo.record("1.2.3.4", "beginner", "frontend", "portfolio", "Personal Portfolio Site", "2025-08-02")
            .await
            .unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
        assert_eq!(repo.distinct_ip_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn top_blueprints_orders_by_count() {
        let (pool, _dir) = setup_test_db().await;
        let repo = DieselGenerationRepository::new(pool);

        for (ip, day, title) in [
            ("1.1.1.1", "2025-08-01", "Personal Portfolio Site"),
            ("1.1.1.1", "2025-08-02", "Personal Portfolio Site"),
            ("2.2.2.2", "2025-08-01", "Personal Portfolio Site"),
            ("3.3.3.3", "2025-08-01", "Distributed Task Queue"),
        ] {
            repo.record(ip, "beginner", "frontend", "portfolio", title, day)
                .await
                .unwrap();
        }

        let top = repo.top_blueprints(5).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].title, "Personal Portfolio Site");
        assert_eq!(top[0].count, 3);
        assert_eq!(top[1].title, "Distributed Task Queue");
        assert_eq!(top[1].count, 1);

        let top_one = repo.top_blueprints(1).await.unwrap();
        assert_eq!(top_one.len(), 1);
    }
}
