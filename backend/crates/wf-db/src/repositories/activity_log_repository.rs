//! Append-only activity trail.
//!
//! This repository exposes no update or delete operations; the table only
//! ever grows, and `seq` fixes the insertion order.

use crate::repositories::identity_repository::{parse_timestamp, parse_uuid};
use crate::{DbError, Result as DbErrorResult};

use wf_core::ActivityEntry;

use std::panic::Location;

use error_location::ErrorLocation;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

pub struct ActivityLogRepository {
    pool: SqlitePool,
}

impl ActivityLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn append(&self, entry: &ActivityEntry) -> DbErrorResult<()> {
        let details = serde_json::to_string(&entry.details).map_err(|e| DbError::Initialization {
            message: format!("Failed to serialize activity details: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        sqlx::query(
            r#"
                INSERT INTO activity_log (id, identity_id, action, details, created_at)
                VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(entry.identity_id.to_string())
        .bind(&entry.action)
        .bind(details)
        .bind(entry.created_at.timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All entries for an identity, oldest first
    pub async fn list_for_identity(&self, identity_id: Uuid) -> DbErrorResult<Vec<ActivityEntry>> {
        let rows = sqlx::query(
            r#"
                SELECT id, identity_id, action, details, created_at
                FROM activity_log
                WHERE identity_id = ?
                ORDER BY seq
            "#,
        )
        .bind(identity_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| -> DbErrorResult<ActivityEntry> {
                let details_raw: String = r.try_get("details")?;
                Ok(ActivityEntry {
                    id: parse_uuid(r.try_get("id")?, "activity_log.id")?,
                    identity_id: parse_uuid(
                        r.try_get("identity_id")?,
                        "activity_log.identity_id",
                    )?,
                    action: r.try_get("action")?,
                    details: serde_json::from_str(&details_raw).map_err(|e| {
                        DbError::Initialization {
                            message: format!("Invalid JSON in activity_log.details: {e}"),
                            location: ErrorLocation::from(Location::caller()),
                        }
                    })?,
                    created_at: parse_timestamp(
                        r.try_get("created_at")?,
                        "activity_log.created_at",
                    )?,
                })
            })
            .collect::<DbErrorResult<Vec<_>>>()
    }
}
