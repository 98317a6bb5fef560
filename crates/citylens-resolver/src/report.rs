//! Resolution results and best-effort write reporting.

use std::fmt;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::warn;

/// Where a resolved record set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Rows already stored for the location.
    Cache,
    /// Fetched from the provider on a cache miss.
    Provider,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Cache => "cache",
            Source::Provider => "provider",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of persisting one record of a fetched batch.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    Inserted { index: usize, id: i64 },
    Failed { index: usize, error: String },
}

impl WriteOutcome {
    /// Position of the record in the resolved batch.
    pub fn index(&self) -> usize {
        match self {
            WriteOutcome::Inserted { index, .. } | WriteOutcome::Failed { index, .. } => *index,
        }
    }

    pub fn is_inserted(&self) -> bool {
        matches!(self, WriteOutcome::Inserted { .. })
    }
}

/// Per-record outcomes of writing a fetched batch back to the store.
///
/// Write failures never fail a resolution; they are only reported here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchWriteReport {
    outcomes: Vec<WriteOutcome>,
}

impl BatchWriteReport {
    /// Build a report, ordering outcomes by record index.
    pub fn new(mut outcomes: Vec<WriteOutcome>) -> Self {
        outcomes.sort_by_key(WriteOutcome::index);
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[WriteOutcome] {
        &self.outcomes
    }

    /// Number of records written.
    pub fn inserted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_inserted()).count()
    }

    /// Number of records that failed to write.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.inserted()
    }

    /// Failed outcomes as `(index, error)`.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &str)> {
        self.outcomes.iter().filter_map(|o| match o {
            WriteOutcome::Failed { index, error } => Some((*index, error.as_str())),
            WriteOutcome::Inserted { .. } => None,
        })
    }

    /// True when every record was written (vacuously true for no writes).
    pub fn is_complete(&self) -> bool {
        self.failed() == 0
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Write-back running in the background after a provider fetch.
///
/// Nothing on the request path awaits this; callers that care about the
/// outcome (tests, batch jobs) call [`PendingWrites::report`].
#[derive(Debug, Default)]
pub struct PendingWrites {
    handle: Option<JoinHandle<BatchWriteReport>>,
}

impl PendingWrites {
    /// No writes were started.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn spawned(handle: JoinHandle<BatchWriteReport>) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    /// True when a write-back task was started.
    pub fn is_pending(&self) -> bool {
        self.handle.is_some()
    }

    /// Wait for the write-back task and return its report.
    ///
    /// A panicked or cancelled task yields an empty report.
    pub async fn report(self) -> BatchWriteReport {
        match self.handle {
            Some(handle) => match handle.await {
                Ok(report) => report,
                Err(e) => {
                    warn!(
                        subsystem = "resolver",
                        op = "write_back",
                        error = %e,
                        "Write-back task did not finish"
                    );
                    BatchWriteReport::default()
                }
            },
            None => BatchWriteReport::default(),
        }
    }
}

/// A resolved record set for one location.
#[derive(Debug)]
pub struct Resolution<R> {
    pub records: Vec<R>,
    pub source: Source,
    /// Nothing pending for cache hits or empty provider results.
    pub writes: PendingWrites,
}

impl<R> Resolution<R> {
    pub fn from_cache(records: Vec<R>) -> Self {
        Self {
            records,
            source: Source::Cache,
            writes: PendingWrites::none(),
        }
    }

    pub fn from_provider(records: Vec<R>, writes: PendingWrites) -> Self {
        Self {
            records,
            source: Source::Provider,
            writes,
        }
    }

    pub fn into_records(self) -> Vec<R> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_orders_by_index() {
        let report = BatchWriteReport::new(vec![
            WriteOutcome::Inserted { index: 2, id: 12 },
            WriteOutcome::Failed {
                index: 1,
                error: "connection reset".to_string(),
            },
            WriteOutcome::Inserted { index: 0, id: 10 },
        ]);

        let indexes: Vec<_> = report.outcomes().iter().map(WriteOutcome::index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
        assert_eq!(report.inserted(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_complete());
        assert_eq!(
            report.failures().collect::<Vec<_>>(),
            vec![(1, "connection reset")]
        );
    }

    #[test]
    fn test_empty_report_is_complete() {
        let report = BatchWriteReport::default();
        assert!(report.is_empty());
        assert!(report.is_complete());
    }

    #[test]
    fn test_cache_resolution_has_no_writes() {
        let resolution = Resolution::from_cache(vec![1, 2, 3]);
        assert_eq!(resolution.source, Source::Cache);
        assert!(!resolution.writes.is_pending());
        assert_eq!(resolution.into_records(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_pending_writes_report_from_task() {
        let handle = tokio::spawn(async {
            BatchWriteReport::new(vec![WriteOutcome::Inserted { index: 0, id: 7 }])
        });
        let writes = PendingWrites::spawned(handle);
        assert!(writes.is_pending());

        let report = writes.report().await;
        assert_eq!(report.inserted(), 1);
        assert!(PendingWrites::none().report().await.is_empty());
    }

    #[tokio::test]
    async fn test_aborted_write_back_yields_empty_report() {
        let handle = tokio::spawn(futures::future::pending::<BatchWriteReport>());
        handle.abort();

        let report = PendingWrites::spawned(handle).report().await;
        assert!(report.is_empty());
    }

    #[test]
    fn test_source_names() {
        assert_eq!(Source::Cache.to_string(), "cache");
        assert_eq!(
            serde_json::to_string(&Source::Provider).unwrap(),
            "\"provider\""
        );
    }
}
