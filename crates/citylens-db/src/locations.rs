//! Location repository: the identity table every resource row points at.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::debug;

use citylens_core::{Error, LocationRecord, LocationStore, Result};

/// PostgreSQL location repository.
#[derive(Clone)]
pub struct PgLocationRepository {
    pool: Pool<Postgres>,
}

impl PgLocationRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a location by id.
    pub async fn get(&self, id: i64) -> Result<Option<LocationRecord>> {
        sqlx::query_as::<_, LocationRecord>(
            "SELECT id, search_query, formatted_query, latitude, longitude
             FROM locations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Store)
    }
}

#[async_trait]
impl LocationStore for PgLocationRepository {
    async fn find_by_query(&self, search_query: &str) -> Result<Option<LocationRecord>> {
        let row = sqlx::query_as::<_, LocationRecord>(
            "SELECT id, search_query, formatted_query, latitude, longitude
             FROM locations WHERE search_query = $1",
        )
        .bind(search_query)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Store)?;

        debug!(
            subsystem = "database",
            component = "locations",
            op = "find_by_query",
            hit = row.is_some(),
            "Location lookup"
        );
        Ok(row)
    }

    async fn insert(&self, location: &LocationRecord) -> Result<LocationRecord> {
        // The no-op update makes RETURNING yield the existing row when a
        // concurrent request inserted the same query first.
        let stored = sqlx::query_as::<_, LocationRecord>(
            "INSERT INTO locations (search_query, formatted_query, latitude, longitude)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (search_query) DO UPDATE SET search_query = EXCLUDED.search_query
             RETURNING id, search_query, formatted_query, latitude, longitude",
        )
        .bind(&location.search_query)
        .bind(location.formatted_query.as_deref())
        .bind(location.latitude)
        .bind(location.longitude)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Store)?;

        debug!(
            subsystem = "database",
            component = "locations",
            op = "insert",
            location_id = ?stored.id,
            "Location stored"
        );
        Ok(stored)
    }
}
