//! Generic cache-aside resolution for location-scoped resources.
//!
//! Every resource kind goes through [`resolve_resource`]: stored rows win,
//! otherwise the provider is called and the items are normalized. Records
//! are returned right away while a spawned task writes them back. Write
//! failures are logged and reported, never returned as errors.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tracing::{info, warn};

use citylens_core::{LocationRef, LookupKey, Resource, ResourceProvider, ResourceStore, Result};

use crate::report::{BatchWriteReport, PendingWrites, Resolution, WriteOutcome};

/// The store and provider backing one resource kind.
pub struct ResourceSource<R: Resource> {
    pub store: Arc<dyn ResourceStore<R>>,
    pub provider: Arc<dyn ResourceProvider<R>>,
}

impl<R: Resource> ResourceSource<R> {
    pub fn new(store: Arc<dyn ResourceStore<R>>, provider: Arc<dyn ResourceProvider<R>>) -> Self {
        Self { store, provider }
    }
}

impl<R: Resource> Clone for ResourceSource<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            provider: Arc::clone(&self.provider),
        }
    }
}

/// Resolve every record of kind `R` for a location.
///
/// Fails on a lookup error, a provider error, a normalization error, or (on
/// a miss) when the location lacks the parameter the provider needs.
pub async fn resolve_resource<R: Resource>(
    source: &ResourceSource<R>,
    location: &LocationRef,
) -> Result<Resolution<R>> {
    let start = Instant::now();
    let kind = R::KIND;

    let cached = source.store.find_by_location(location.id).await?;
    if !cached.is_empty() {
        info!(
            subsystem = "resolver",
            resource = %kind,
            op = "resolve",
            location_id = location.id,
            source = "cache",
            result_count = cached.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Resource resolved"
        );
        return Ok(Resolution::from_cache(cached));
    }

    match kind.lookup_key() {
        LookupKey::Coordinates => {
            location.coordinates()?;
        }
        LookupKey::SearchQuery => {
            location.search_query()?;
        }
    }

    let raw = source.provider.fetch(location).await?;
    let mut records = raw
        .into_iter()
        .map(R::normalize)
        .collect::<Result<Vec<R>>>()?;
    for record in &mut records {
        record.set_location_id(location.id);
    }

    let writes = if records.is_empty() {
        PendingWrites::none()
    } else {
        PendingWrites::spawned(tokio::spawn(write_back(
            Arc::clone(&source.store),
            location.id,
            records.clone(),
        )))
    };

    info!(
        subsystem = "resolver",
        resource = %kind,
        op = "resolve",
        location_id = location.id,
        source = "provider",
        result_count = records.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Resource resolved"
    );

    Ok(Resolution::from_provider(records, writes))
}

/// Insert every record concurrently and collect all outcomes.
async fn write_back<R: Resource>(
    store: Arc<dyn ResourceStore<R>>,
    location_id: i64,
    records: Vec<R>,
) -> BatchWriteReport {
    let start = Instant::now();
    let store = store.as_ref();
    let inserts = records
        .iter()
        .enumerate()
        .map(|(index, record)| async move {
            match store.insert(location_id, record).await {
                Ok(id) => WriteOutcome::Inserted { index, id },
                Err(e) => {
                    warn!(
                        subsystem = "resolver",
                        resource = %R::KIND,
                        op = "write_back",
                        location_id,
                        index,
                        error = %e,
                        "Failed to persist record"
                    );
                    WriteOutcome::Failed {
                        index,
                        error: e.to_string(),
                    }
                }
            }
        });

    let report = BatchWriteReport::new(join_all(inserts).await);
    info!(
        subsystem = "resolver",
        resource = %R::KIND,
        op = "write_back",
        location_id,
        inserted = report.inserted(),
        failed = report.failed(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Write-back finished"
    );
    report
}
