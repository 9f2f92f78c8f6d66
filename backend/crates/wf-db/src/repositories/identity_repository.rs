//! Identity repository for the identities table.
//!
//! ## Refresh token rotation
//!
//! `rotate_refresh_token` is a conditional UPDATE: it only writes the new
//! token when the stored value still equals the presented one. Of two
//! concurrent refresh calls carrying the same token, exactly one update
//! matches; the other observes zero affected rows and must treat the
//! token as already used. That race outcome is correct, not a bug.

use crate::{DbError, Result as DbErrorResult};

use wf_core::{Identity, PublicIdentity, Role};

use std::panic::Location;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

pub struct IdentityRepository {
    pool: SqlitePool,
}

impl IdentityRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, identity: &Identity) -> DbErrorResult<()> {
        let result = sqlx::query(
            r#"
                INSERT INTO identities (
                    id, full_name, email, password_hash, role, is_active,
                    refresh_token, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(identity.id.to_string())
        .bind(&identity.full_name)
        .bind(&identity.email)
        .bind(&identity.password_hash)
        .bind(identity.role.as_str())
        .bind(identity.is_active)
        .bind(identity.refresh_token.as_deref())
        .bind(identity.created_at.timestamp())
        .bind(identity.updated_at.timestamp())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique(&e) => Err(DbError::UniqueViolation {
                field: "email",
                location: ErrorLocation::from(Location::caller()),
            }),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> DbErrorResult<Option<Identity>> {
        let row = sqlx::query(
            r#"
                SELECT id, full_name, email, password_hash, role, is_active,
                    refresh_token, created_at, updated_at
                FROM identities
                WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| identity_from_row(&r)).transpose()
    }

    /// Case-sensitive email lookup
    pub async fn find_by_email(&self, email: &str) -> DbErrorResult<Option<Identity>> {
        let row = sqlx::query(
            r#"
                SELECT id, full_name, email, password_hash, role, is_active,
                    refresh_token, created_at, updated_at
                FROM identities
                WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| identity_from_row(&r)).transpose()
    }

    /// Sanitized lookup for the request gate: the credential hash and
    /// refresh token are excluded from the SELECT itself.
    pub async fn find_public_by_id(&self, id: Uuid) -> DbErrorResult<Option<PublicIdentity>> {
        let row = sqlx::query(
            r#"
                SELECT id, full_name, email, role, is_active, created_at, updated_at
                FROM identities
                WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| public_identity_from_row(&r)).transpose()
    }

    /// Apply a profile update; only the provided fields change.
    pub async fn update_details(
        &self,
        id: Uuid,
        full_name: Option<&str>,
        email: Option<&str>,
    ) -> DbErrorResult<()> {
        let result = sqlx::query(
            r#"
                UPDATE identities
                SET full_name = COALESCE(?, full_name),
                    email = COALESCE(?, email),
                    updated_at = ?
                WHERE id = ?
            "#,
        )
        .bind(full_name)
        .bind(email)
        .bind(Utc::now().timestamp())
        .bind(id.to_string())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique(&e) => Err(DbError::UniqueViolation {
                field: "email",
                location: ErrorLocation::from(Location::caller()),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Store a freshly re-hashed credential
    pub async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> DbErrorResult<()> {
        sqlx::query("UPDATE identities SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now().timestamp())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Login: unconditionally install a new refresh token and mark active.
    /// This overwrites any previous token, which invalidates it.
    pub async fn begin_session(&self, id: Uuid, refresh_token: &str) -> DbErrorResult<()> {
        sqlx::query(
            "UPDATE identities SET refresh_token = ?, is_active = 1, updated_at = ? WHERE id = ?",
        )
        .bind(refresh_token)
        .bind(Utc::now().timestamp())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Logout: unset the refresh token and mark inactive
    pub async fn clear_session(&self, id: Uuid) -> DbErrorResult<()> {
        sqlx::query(
            "UPDATE identities SET refresh_token = NULL, is_active = 0, updated_at = ? WHERE id = ?",
        )
        .bind(Utc::now().timestamp())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Rotate the refresh token, conditional on the stored value still
    /// matching `current`. Returns false when the token was already
    /// rotated away (replay, or the loser of a concurrent refresh).
    pub async fn rotate_refresh_token(
        &self,
        id: Uuid,
        current: &str,
        next: &str,
    ) -> DbErrorResult<bool> {
        let result = sqlx::query(
            r#"
                UPDATE identities
                SET refresh_token = ?, updated_at = ?
                WHERE id = ? AND refresh_token = ?
            "#,
        )
        .bind(next)
        .bind(Utc::now().timestamp())
        .bind(id.to_string())
        .bind(current)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

fn is_unique(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

fn identity_from_row(row: &SqliteRow) -> DbErrorResult<Identity> {
    Ok(Identity {
        id: parse_uuid(row.try_get("id")?, "identities.id")?,
        full_name: row.try_get("full_name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        role: parse_role(row.try_get("role")?)?,
        is_active: row.try_get("is_active")?,
        refresh_token: row.try_get("refresh_token")?,
        created_at: parse_timestamp(row.try_get("created_at")?, "identities.created_at")?,
        updated_at: parse_timestamp(row.try_get("updated_at")?, "identities.updated_at")?,
    })
}

fn public_identity_from_row(row: &SqliteRow) -> DbErrorResult<PublicIdentity> {
    Ok(PublicIdentity {
        id: parse_uuid(row.try_get("id")?, "identities.id")?,
        full_name: row.try_get("full_name")?,
        email: row.try_get("email")?,
        role: parse_role(row.try_get("role")?)?,
        is_active: row.try_get("is_active")?,
        created_at: parse_timestamp(row.try_get("created_at")?, "identities.created_at")?,
        updated_at: parse_timestamp(row.try_get("updated_at")?, "identities.updated_at")?,
    })
}

#[track_caller]
pub(crate) fn parse_uuid(value: String, column: &str) -> DbErrorResult<Uuid> {
    Uuid::parse_str(&value).map_err(|e| DbError::Initialization {
        message: format!("Invalid UUID in {column}: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })
}

#[track_caller]
pub(crate) fn parse_timestamp(value: i64, column: &str) -> DbErrorResult<DateTime<Utc>> {
    DateTime::from_timestamp(value, 0).ok_or_else(|| DbError::Initialization {
        message: format!("Invalid timestamp in {column}"),
        location: ErrorLocation::from(Location::caller()),
    })
}

#[track_caller]
fn parse_role(value: String) -> DbErrorResult<Role> {
    Role::from_str(&value).map_err(|e| DbError::Initialization {
        message: format!("Invalid role in identities.role: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })
}
