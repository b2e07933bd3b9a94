//! Cache-aside country lookup.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::Cache;
use crate::model::CountrySummary;
use crate::upstream::{CountryProvider, UpstreamError};

/// Answers lookups from the cache, falling back to the provider on a miss.
///
/// Concurrent misses for the same name are not coalesced: each one calls the
/// provider and the last successful write wins.
#[derive(Clone)]
pub struct CountrySearchService {
    cache: Arc<dyn Cache>,
    provider: Arc<dyn CountryProvider>,
}

impl CountrySearchService {
    pub fn new(cache: Arc<dyn Cache>, provider: Arc<dyn CountryProvider>) -> Self {
        Self { cache, provider }
    }

    /// Looks up `name`, used verbatim as the cache key.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`UpstreamError`] unchanged. Failed lookups are
    /// never cached.
    pub async fn search(&self, name: &str) -> Result<CountrySummary, UpstreamError> {
        if let Some(cached) = self.cache.get(name) {
            debug!(name, "cache hit");
            return Ok(cached);
        }

        let summary = match self.provider.fetch(name).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(name, error = %e, "country lookup failed");
                return Err(e);
            }
        };

        self.cache.set(name.to_owned(), summary.clone());
        info!(name, "country data fetched and cached");
        Ok(summary)
    }
}
