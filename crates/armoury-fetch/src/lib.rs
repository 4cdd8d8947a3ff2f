//! Armoury Fetch -- best-effort download of the published tables.
//!
//! Every registered table is fetched independently on a bounded rayon pool.
//! There are no retries: a failed table is logged and tallied, and never
//! affects the others. Successful downloads replace the local file
//! atomically.

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use armoury_core::{Registry, TableDef};
use armoury_data::{PipelineConfig, write_atomic};
use rayon::prelude::*;

// ===========================================================================
// Errors
// ===========================================================================

/// Why one table could not be downloaded.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {detail}")]
    Http { url: String, detail: String },

    #[error("{url} responded with status {code}")]
    Status { url: String, code: u16 },

    #[error("failed to write {}: {source}", file.display())]
    Write {
        file: PathBuf,
        source: std::io::Error,
    },

    /// The worker pool could not be started; nothing was fetched.
    #[error("failed to start download pool: {0}")]
    Pool(String),
}

// ===========================================================================
// Transport
// ===========================================================================

/// Blocking HTTP GET. Implementations must be shareable across the pool.
pub trait Transport: Sync {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// [`Transport`] backed by a shared `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    code,
                });
            }
            Err(e) => {
                return Err(FetchError::Http {
                    url: url.to_string(),
                    detail: e.to_string(),
                });
            }
        };

        // Read the body directly; some tables exceed ureq's string limit.
        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|e| FetchError::Http {
                url: url.to_string(),
                detail: e.to_string(),
            })?;
        Ok(body)
    }
}

// ===========================================================================
// Fan-out
// ===========================================================================

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub base_url: String,
    pub data_dir: PathBuf,
    /// Maximum simultaneous downloads; zero is treated as one.
    pub concurrency: usize,
    pub timeout: Duration,
}

impl FetchOptions {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            base_url: config.source_base_url.clone(),
            data_dir: config.data_dir.clone(),
            concurrency: config.fetch_concurrency,
            timeout: config.fetch_timeout(),
        }
    }
}

/// Per-table outcome of a fetch run, in registry order.
#[derive(Debug, Default)]
pub struct FetchSummary {
    pub succeeded: Vec<&'static str>,
    pub failed: Vec<(&'static str, FetchError)>,
}

impl FetchSummary {
    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Whether there was at least one table and none of them arrived.
    pub fn all_failed(&self) -> bool {
        self.succeeded.is_empty() && !self.failed.is_empty()
    }
}

/// Download every registered table into `options.data_dir`.
///
/// Only a failure to start the pool is returned as an error; per-table
/// failures are collected in the summary.
pub fn fetch_all(
    registry: &Registry,
    options: &FetchOptions,
    transport: &dyn Transport,
) -> Result<FetchSummary, FetchError> {
    let tables: Vec<&'static TableDef> = registry.tables().collect();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.concurrency.max(1))
        .thread_name(|i| format!("armoury-fetch-{i}"))
        .build()
        .map_err(|e| FetchError::Pool(e.to_string()))?;

    tracing::info!(
        tables = tables.len(),
        concurrency = options.concurrency.max(1),
        base = %options.base_url,
        "downloading tables"
    );

    let results: Vec<(&'static TableDef, Result<PathBuf, FetchError>)> = pool.install(|| {
        tables
            .par_iter()
            .map(|&table| (table, fetch_one(table, options, transport)))
            .collect()
    });

    let mut summary = FetchSummary::default();
    for (table, result) in results {
        match result {
            Ok(_) => summary.succeeded.push(table.name),
            Err(e) => {
                tracing::warn!(table = table.name, "download failed: {e}");
                summary.failed.push((table.name, e));
            }
        }
    }

    tracing::info!(
        succeeded = summary.succeeded_count(),
        failed = summary.failed_count(),
        "download finished"
    );
    Ok(summary)
}

/// Download one table and store it under the data directory.
pub fn fetch_one(
    table: &TableDef,
    options: &FetchOptions,
    transport: &dyn Transport,
) -> Result<PathBuf, FetchError> {
    let url = table.source_url(&options.base_url);
    let body = transport.get(&url)?;

    let path = options.data_dir.join(table.file_name());
    write_atomic(&path, &body).map_err(|source| FetchError::Write {
        file: path.clone(),
        source,
    })?;

    tracing::info!(table = table.name, bytes = body.len(), "downloaded");
    Ok(path)
}
