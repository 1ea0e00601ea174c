use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use thiserror::Error;

use super::model::{Dataset, RawTable};
use super::preprocess::preprocess_with_report;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Anything that can go wrong with the remote source. Never fatal: the
/// loader turns these into a local fallback.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("response is not valid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("response contained no usable rows")]
    Empty,
}

/// The local snapshot could not be read. There is nothing left to fall
/// back to, so this propagates.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read local snapshot {}", path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

// ---------------------------------------------------------------------------
// Remote fetch seam
// ---------------------------------------------------------------------------

/// Returns the raw bytes behind a URL.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Blocking HTTP GET, one attempt, no retry.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// `None` leaves reqwest's own 30 s request timeout in place.
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.bytes()?.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Time-bounded cache of the remote dataset
// ---------------------------------------------------------------------------

struct CacheEntry {
    stored_at: Instant,
    fetched_at: DateTime<Local>,
    dataset: Dataset,
}

/// Single-entry memo of the last successful remote load.
pub struct RemoteCache {
    ttl: Duration,
    entry: Option<CacheEntry>,
}

impl RemoteCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    pub fn is_fresh(&self, now: Instant) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|e| now.saturating_duration_since(e.stored_at) < self.ttl)
    }

    /// Cached dataset if still within the TTL, otherwise run `fetch` and
    /// store its result. A failed fetch leaves the cache untouched.
    pub fn get_or_fetch<F>(
        &mut self,
        now: Instant,
        fetch: F,
    ) -> Result<(Dataset, DateTime<Local>), FetchError>
    where
        F: FnOnce() -> Result<Dataset, FetchError>,
    {
        if self.is_fresh(now) {
            if let Some(entry) = &self.entry {
                log::debug!("Remote cache hit ({} rows)", entry.dataset.len());
                return Ok((entry.dataset.clone(), entry.fetched_at));
            }
        }

        log::debug!("Remote cache miss");
        let dataset = fetch()?;
        let fetched_at = Local::now();
        self.entry = Some(CacheEntry {
            stored_at: now,
            fetched_at,
            dataset: dataset.clone(),
        });
        Ok((dataset, fetched_at))
    }

    /// Drop everything.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

// ---------------------------------------------------------------------------
// Session – per-user state the pipeline needs
// ---------------------------------------------------------------------------

/// Starts un-refreshed; may transition to refreshed exactly once.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    refreshed: bool,
}

impl Session {
    pub fn refreshed(&self) -> bool {
        self.refreshed
    }

    /// Returns `false` if the session had already been refreshed.
    pub fn mark_refreshed(&mut self) -> bool {
        if self.refreshed {
            return false;
        }
        self.refreshed = true;
        true
    }
}

// ---------------------------------------------------------------------------
// Where a dataset came from
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum SourceLabel {
    Remote { fetched_at: DateTime<Local> },
    LocalSnapshot { path: PathBuf },
    LocalFallback { path: PathBuf, reason: String },
}

impl fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLabel::Remote { fetched_at } => {
                write!(f, "CDC live data (fetched {})", fetched_at.format("%Y-%m-%d %H:%M"))
            }
            SourceLabel::LocalSnapshot { path } => {
                write!(f, "local snapshot ({})", path.display())
            }
            SourceLabel::LocalFallback { path, .. } => {
                write!(f, "local fallback ({}), live data unavailable", path.display())
            }
        }
    }
}

impl SourceLabel {
    /// Why the live fetch was abandoned, for fallback loads.
    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            SourceLabel::LocalFallback { reason, .. } => Some(reason.as_str()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Read and preprocess a local CSV snapshot.
pub fn load_snapshot(path: &Path) -> Result<Dataset, LoadError> {
    let raw = RawTable::from_path(path).map_err(|source| LoadError::Snapshot {
        path: path.to_path_buf(),
        source,
    })?;
    let (dataset, report) = preprocess_with_report(&raw);
    log::info!(
        "Loaded {} rows from {} ({} dropped)",
        dataset.len(),
        path.display(),
        report.total()
    );
    Ok(dataset)
}

fn fetch_remote(fetcher: &dyn Fetch, url: &str) -> Result<Dataset, FetchError> {
    let bytes = fetcher.fetch(url)?;
    let raw = RawTable::from_reader(bytes.as_slice())?;
    let (dataset, report) = preprocess_with_report(&raw);
    if dataset.is_empty() {
        return Err(FetchError::Empty);
    }
    log::info!(
        "Fetched {} rows from {url} ({} dropped)",
        dataset.len(),
        report.total()
    );
    Ok(dataset)
}

/// Remote-first loader with a local snapshot behind it.
pub struct Loader {
    url: String,
    local_path: PathBuf,
    cache: RemoteCache,
    fetcher: Box<dyn Fetch>,
}

impl Loader {
    pub fn new(
        url: impl Into<String>,
        local_path: impl Into<PathBuf>,
        ttl: Duration,
        fetcher: Box<dyn Fetch>,
    ) -> Self {
        Self {
            url: url.into(),
            local_path: local_path.into(),
            cache: RemoteCache::new(ttl),
            fetcher,
        }
    }

    /// Remote (through the cache) when `prefer_remote`, else the local
    /// snapshot. Remote failures fall back to the snapshot; only a snapshot
    /// failure is returned as an error.
    pub fn load(&mut self, prefer_remote: bool) -> Result<(Dataset, SourceLabel), LoadError> {
        if !prefer_remote {
            let dataset = load_snapshot(&self.local_path)?;
            return Ok((
                dataset,
                SourceLabel::LocalSnapshot {
                    path: self.local_path.clone(),
                },
            ));
        }

        let fetcher = self.fetcher.as_ref();
        let url = self.url.as_str();
        let result = self
            .cache
            .get_or_fetch(Instant::now(), || fetch_remote(fetcher, url));

        match result {
            Ok((dataset, fetched_at)) => Ok((dataset, SourceLabel::Remote { fetched_at })),
            Err(e) => {
                log::warn!("Remote fetch failed, using local snapshot: {e}");
                let dataset = load_snapshot(&self.local_path)?;
                Ok((
                    dataset,
                    SourceLabel::LocalFallback {
                        path: self.local_path.clone(),
                        reason: e.to_string(),
                    },
                ))
            }
        }
    }

    /// One-shot manual refresh: clears the cache and goes remote. A second
    /// call in the same session just reloads from whatever is current.
    pub fn refresh(&mut self, session: &mut Session) -> Result<(Dataset, SourceLabel), LoadError> {
        if session.mark_refreshed() {
            self.cache.invalidate();
        } else {
            log::debug!("Refresh already used in this session");
        }
        self.load(session.refreshed())
    }
}
