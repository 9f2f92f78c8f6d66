//! Per-identity usage counters.
//!
//! Counters only ever increase; `record` is an upsert so the first use of
//! a feature creates its row.

use crate::Result as DbErrorResult;
use crate::repositories::identity_repository::parse_uuid;

use wf_core::UsageCounter;

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

pub struct UsageRepository {
    pool: SqlitePool,
}

/// One row of the admin usage report
#[derive(Debug, Clone)]
pub struct UsageReportRow {
    pub identity_id: Uuid,
    pub email: String,
    pub feature: String,
    pub count: i64,
}

impl UsageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Increment the counter for one feature use
    pub async fn record(&self, identity_id: Uuid, feature: &str) -> DbErrorResult<()> {
        sqlx::query(
            r#"
                INSERT INTO usage_counters (identity_id, feature, count)
                VALUES (?, ?, 1)
                ON CONFLICT (identity_id, feature) DO UPDATE SET count = count + 1
            "#,
        )
        .bind(identity_id.to_string())
        .bind(feature)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn counters_for(&self, identity_id: Uuid) -> DbErrorResult<Vec<UsageCounter>> {
        let rows = sqlx::query(
            r#"
                SELECT identity_id, feature, count
                FROM usage_counters
                WHERE identity_id = ?
                ORDER BY feature
            "#,
        )
        .bind(identity_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| -> DbErrorResult<UsageCounter> {
                Ok(UsageCounter {
                    identity_id: parse_uuid(
                        r.try_get("identity_id")?,
                        "usage_counters.identity_id",
                    )?,
                    feature: r.try_get("feature")?,
                    count: r.try_get("count")?,
                })
            })
            .collect::<DbErrorResult<Vec<_>>>()
    }

    /// Aggregate report across all identities, for the admin surface
    pub async fn report(&self) -> DbErrorResult<Vec<UsageReportRow>> {
        let rows = sqlx::query(
            r#"
                SELECT u.identity_id, i.email, u.feature, u.count
                FROM usage_counters u
                JOIN identities i ON i.id = u.identity_id
                ORDER BY i.email, u.feature
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| -> DbErrorResult<UsageReportRow> {
                Ok(UsageReportRow {
                    identity_id: parse_uuid(
                        r.try_get("identity_id")?,
                        "usage_counters.identity_id",
                    )?,
                    email: r.try_get("email")?,
                    feature: r.try_get("feature")?,
                    count: r.try_get("count")?,
                })
            })
            .collect::<DbErrorResult<Vec<_>>>()
    }
}
