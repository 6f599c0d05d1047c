//! Time-bounded cache in front of a branch source.

use async_trait::async_trait;
use proofread_core::collaborators::BranchSource;
use proofread_core::Result;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// How long a fetched branch list is served without asking again.
pub const BRANCH_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

struct Entry {
    fetched_at: Instant,
    branches: Vec<String>,
}

/// Caches another [`BranchSource`] for [`BRANCH_CACHE_TTL`].
///
/// A failed refresh serves the stale list. With nothing cached the error is
/// passed on, so callers see the listing as unavailable.
pub struct CachedBranchSource<S> {
    inner: S,
    ttl: Duration,
    entry: Mutex<Option<Entry>>,
}

impl<S: BranchSource> CachedBranchSource<S> {
    pub fn new(inner: S) -> Self {
        Self::with_ttl(inner, BRANCH_CACHE_TTL)
    }

    pub fn with_ttl(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entry: Mutex::new(None),
        }
    }

    /// Drop the cached list so the next call fetches.
    pub async fn invalidate(&self) {
        *self.entry.lock().await = None;
    }
}

#[async_trait]
impl<S: BranchSource> BranchSource for CachedBranchSource<S> {
    async fn list_remote_branches(&self) -> Result<Vec<String>> {
        // Held across the fetch so concurrent misses share one request.
        let mut entry = self.entry.lock().await;
        if let Some(cached) = entry.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                return Ok(cached.branches.clone());
            }
        }

        match self.inner.list_remote_branches().await {
            Ok(branches) => {
                *entry = Some(Entry {
                    fetched_at: Instant::now(),
                    branches: branches.clone(),
                });
                Ok(branches)
            }
            Err(e) => match entry.as_ref() {
                Some(stale) => {
                    tracing::warn!(error = %e, "branch refresh failed, serving stale list");
                    Ok(stale.branches.clone())
                }
                None => Err(e),
            },
        }
    }
}
