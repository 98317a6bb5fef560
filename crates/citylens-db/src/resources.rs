//! Generic repository for the location-scoped resource tables.
//!
//! One implementation serves `weathers`, `meetups`, `movies`, `trails` and
//! `yelps`. Table and column names come from [`ResourceKind`] constants; every
//! value is a bound parameter.

use std::marker::PhantomData;
use std::time::Instant;

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{FromRow, Pool, Postgres};
use tracing::debug;

use citylens_core::{
    BusinessListing, Error, EventRecord, MovieRecord, Resource, ResourceKind, ResourceStore,
    Result, TrailRecord, WeatherRecord,
};

type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// A resource record that knows how to bind its columns.
///
/// Binds must follow the order of `ResourceKind::columns()`.
pub trait PgRecord: Resource + for<'r> FromRow<'r, PgRow> {
    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q>;
}

impl PgRecord for WeatherRecord {
    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query.bind(self.forecast.as_deref()).bind(&self.time)
    }
}

impl PgRecord for EventRecord {
    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.link.as_deref())
            .bind(self.name.as_deref())
            .bind(&self.creation_date)
            .bind(self.host.as_deref())
    }
}

impl PgRecord for MovieRecord {
    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.title.as_deref())
            .bind(self.overview.as_deref())
            .bind(self.average_votes)
            .bind(self.total_votes)
            .bind(self.image_url.as_deref())
            .bind(self.popularity)
            .bind(self.released_on.as_deref())
    }
}

impl PgRecord for TrailRecord {
    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.name.as_deref())
            .bind(self.location.as_deref())
            .bind(self.length)
            .bind(self.stars)
            .bind(self.star_votes)
            .bind(self.summary.as_deref())
            .bind(self.trail_url.as_deref())
            .bind(self.conditions.as_deref())
            .bind(&self.condition_date)
            .bind(&self.condition_time)
    }
}

impl PgRecord for BusinessListing {
    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.name.as_deref())
            .bind(self.image_url.as_deref())
            .bind(self.price.as_deref())
            .bind(self.rating)
            .bind(self.url.as_deref())
    }
}

/// `SELECT` for all rows of a kind under one location, oldest first.
pub fn select_sql(kind: ResourceKind) -> String {
    format!(
        "SELECT {}, location_id FROM {} WHERE location_id = $1 ORDER BY id",
        kind.columns().join(", "),
        kind.table()
    )
}

/// `INSERT` of one row of a kind, returning its id.
pub fn insert_sql(kind: ResourceKind) -> String {
    let columns = kind.columns();
    let placeholders: Vec<String> = (1..=columns.len() + 1).map(|i| format!("${}", i)).collect();
    format!(
        "INSERT INTO {} ({}, location_id) VALUES ({}) RETURNING id",
        kind.table(),
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// PostgreSQL repository for one resource table.
pub struct PgResourceRepository<R> {
    pool: Pool<Postgres>,
    select_sql: String,
    insert_sql: String,
    _record: PhantomData<fn() -> R>,
}

impl<R: PgRecord> PgResourceRepository<R> {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            pool,
            select_sql: select_sql(R::KIND),
            insert_sql: insert_sql(R::KIND),
            _record: PhantomData,
        }
    }
}

impl<R> Clone for PgResourceRepository<R> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            select_sql: self.select_sql.clone(),
            insert_sql: self.insert_sql.clone(),
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<R: PgRecord> ResourceStore<R> for PgResourceRepository<R> {
    async fn find_by_location(&self, location_id: i64) -> Result<Vec<R>> {
        let start = Instant::now();
        let rows = sqlx::query_as::<_, R>(&self.select_sql)
            .bind(location_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Store)?;

        debug!(
            subsystem = "database",
            component = R::KIND.table(),
            op = "find_by_location",
            location_id,
            result_count = rows.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Resource lookup"
        );
        Ok(rows)
    }

    async fn insert(&self, location_id: i64, record: &R) -> Result<i64> {
        let query = record
            .bind_columns(sqlx::query(&self.insert_sql))
            .bind(location_id);
        let row = query.fetch_one(&self.pool).await.map_err(Error::Store)?;
        let id: i64 = sqlx::Row::try_get(&row, "id").map_err(Error::Store)?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_sql_weather() {
        assert_eq!(
            select_sql(ResourceKind::Weather),
            "SELECT forecast, time, location_id FROM weathers WHERE location_id = $1 ORDER BY id"
        );
    }

    #[test]
    fn test_insert_sql_listing() {
        assert_eq!(
            insert_sql(ResourceKind::Listings),
            "INSERT INTO yelps (name, image_url, price, rating, url, location_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id"
        );
    }

    #[test]
    fn test_insert_placeholders_cover_location_id() {
        for kind in ResourceKind::ALL {
            let sql = insert_sql(kind);
            let last = format!("${})", kind.columns().len() + 1);
            assert!(sql.contains(&last), "{} missing {}", sql, last);
        }
    }
}
