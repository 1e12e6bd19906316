//! PostgreSQL-backed `DisasterUpdateRepository` implementation using Diesel ORM.
//!
//! The merge is a single batched `INSERT .. ON CONFLICT (title, location)
//! DO UPDATE` statement, so a refresh lands atomically and never deletes rows
//! absent from the batch.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::claim::DisasterType;
use crate::domain::disaster_update::{DisasterUpdate, DisasterUpdateDraft, Severity};
use crate::domain::ports::{DisasterUpdateRepository, DisasterUpdateRepositoryError};

use super::error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{DisasterUpdateRow, NewDisasterUpdateRow};
use super::pool::{DbPool, PoolError};
use super::schema::disaster_updates;

/// Diesel-backed implementation of the `DisasterUpdateRepository` port.
#[derive(Clone)]
pub struct DieselDisasterUpdateRepository {
    pool: DbPool,
}

impl DieselDisasterUpdateRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DisasterUpdateRepositoryError {
    map_basic_pool_error(error, DisasterUpdateRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> DisasterUpdateRepositoryError {
    map_basic_diesel_error(
        error,
        DisasterUpdateRepositoryError::query,
        DisasterUpdateRepositoryError::connection,
    )
}

fn row_to_update(row: DisasterUpdateRow) -> DisasterUpdate {
    // Taxonomy values in storage come from the mapper, which already falls
    // back to `other`; keep the same fallback when reading.
    let disaster_type = row
        .disaster_type
        .parse()
        .unwrap_or(DisasterType::Other);
    DisasterUpdate {
        id: row.id,
        title: row.title,
        location: row.location,
        disaster_type,
        severity: Severity::from_level(row.severity),
        declaration_type: row.declaration_type,
        declaration_display: row.declaration_display,
        assistance_available: row.assistance_available,
        source: row.source,
        url: row.url,
        updated_at: row.updated_at,
    }
}

#[async_trait]
impl DisasterUpdateRepository for DieselDisasterUpdateRepository {
    async fn merge_batch(
        &self,
        drafts: &[DisasterUpdateDraft],
    ) -> Result<(), DisasterUpdateRepositoryError> {
        if drafts.is_empty() {
            return Ok(());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<NewDisasterUpdateRow<'_>> = drafts
            .iter()
            .map(|draft| NewDisasterUpdateRow {
                title: draft.title.as_str(),
                location: draft.location.as_str(),
                disaster_type: draft.disaster_type.as_str(),
                severity: draft.severity.level(),
                declaration_type: draft.declaration_type.as_str(),
                declaration_display: draft.declaration_display.as_str(),
                assistance_available: draft.assistance_available,
                source: draft.source.as_str(),
                url: draft.url.as_str(),
                updated_at: draft.updated_at,
            })
            .collect();

        diesel::insert_into(disaster_updates::table)
            .values(&rows)
            .on_conflict((disaster_updates::title, disaster_updates::location))
            .do_update()
            .set((
                disaster_updates::disaster_type.eq(excluded(disaster_updates::disaster_type)),
                disaster_updates::severity.eq(excluded(disaster_updates::severity)),
                disaster_updates::declaration_type
                    .eq(excluded(disaster_updates::declaration_type)),
                disaster_updates::declaration_display
                    .eq(excluded(disaster_updates::declaration_display)),
                disaster_updates::assistance_available
                    .eq(excluded(disaster_updates::assistance_available)),
                disaster_updates::source.eq(excluded(disaster_updates::source)),
                disaster_updates::url.eq(excluded(disaster_updates::url)),
                disaster_updates::updated_at.eq(excluded(disaster_updates::updated_at)),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }

    async fn list_recent(
        &self,
        limit: i64,
    ) -> Result<Vec<DisasterUpdate>, DisasterUpdateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<DisasterUpdateRow> = disaster_updates::table
            .order(disaster_updates::updated_at.desc())
            .limit(limit.max(1))
            .select(DisasterUpdateRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_update).collect())
    }
}
