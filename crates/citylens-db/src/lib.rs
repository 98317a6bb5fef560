//! # citylens-db
//!
//! PostgreSQL store for citylens.
//!
//! This crate provides:
//! - Connection pool management
//! - The location identity repository
//! - One generic repository per cached resource table
//!
//! ## Example
//!
//! ```rust,ignore
//! use citylens_db::Database;
//! use citylens_core::ResourceStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/citylens").await?;
//!     let forecasts = db.weather.find_by_location(1).await?;
//!     println!("{} cached forecasts", forecasts.len());
//!     Ok(())
//! }
//! ```
pub mod locations;
pub mod pool;
pub mod resources;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use citylens_core::*;

pub use locations::PgLocationRepository;
pub use pool::{create_pool_with_config, log_pool_metrics, PoolConfig};
pub use resources::{PgRecord, PgResourceRepository};

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    pub locations: PgLocationRepository,
    pub weather: PgResourceRepository<WeatherRecord>,
    pub events: PgResourceRepository<EventRecord>,
    pub movies: PgResourceRepository<MovieRecord>,
    pub trails: PgResourceRepository<TrailRecord>,
    pub listings: PgResourceRepository<BusinessListing>,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            locations: PgLocationRepository::new(pool.clone()),
            weather: PgResourceRepository::new(pool.clone()),
            events: PgResourceRepository::new(pool.clone()),
            movies: PgResourceRepository::new(pool.clone()),
            trails: PgResourceRepository::new(pool.clone()),
            listings: PgResourceRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_config(url, PoolConfig::default()).await
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Store(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
