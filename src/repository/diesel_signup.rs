//! Diesel-based signup repository.

use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::diesel_models::{NewSignup, SignupRecord};
use super::diesel_pool::AsyncSqlitePool;
use super::{parse_datetime, RepositoryError};
use crate::models::Signup;
use crate::schema::emails;

impl From<SignupRecord> for Signup {
    fn from(record: SignupRecord) -> Self {
        Signup {
            id: record.id,
            email: record.email,
            created_at: parse_datetime(&record.created_at),
        }
    }
}

/// Repository for the `emails` table.
#[derive(Clone)]
pub struct DieselSignupRepository {
    pool: AsyncSqlitePool,
}

impl DieselSignupRepository {
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a signup. Duplicate addresses surface as
    /// [`RepositoryError::UniqueViolation`].
    pub async fn insert(&self, email: &str) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await?;
        let created_at = Utc::now().to_rfc3339();

        diesel::insert_into(emails::table)
            .values(NewSignup {
                email,
                created_at: &created_at,
            })
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    /// Total signup count.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let mut conn = self.pool.get().await?;

        use diesel::dsl::count_star;
        let count = emails::table
            .select(count_star())
            .first::<i64>(&mut conn)
            .await?;

        Ok(count)
    }

    /// All signups, newest first.
    pub async fn get_all(&self) -> Result<Vec<Signup>, RepositoryError> {
        let mut conn = self.pool.get().await?;

        let records = emails::table
            .order(emails::created_at.desc())
            .load::<SignupRecord>(&mut conn)
            .await?;

        Ok(records.into_iter().map(Signup::from).collect())
    }

    /// Delete every signup (maintenance reset).
    pub async fn clear(&self) -> Result<usize, RepositoryError> {
        let mut conn = self.pool.get().await?;

        let rows = diesel::delete(emails::table).execute(&mut conn).await?;
        Ok(rows)
    }
}
