//! Process-lifetime cache of country lookups.
//!
//! Keys are the searched names exactly as the caller sent them; `"india"` and
//! `"India"` are separate entries. Nothing is ever evicted.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::model::CountrySummary;

/// Key/value store consulted before the upstream provider.
pub trait Cache: Send + Sync {
    /// Returns the stored summary for `key`, if any.
    fn get(&self, key: &str) -> Option<CountrySummary>;

    /// Stores `value` under `key`, replacing any previous entry.
    fn set(&self, key: String, value: CountrySummary);
}

/// Unbounded in-memory [`Cache`] behind a single reader/writer lock.
///
/// # Examples
///
/// ```
/// use country_search::cache::{Cache, InMemoryCache};
/// use country_search::model::CountrySummary;
///
/// let cache = InMemoryCache::new();
/// assert!(cache.get("Peru").is_none());
///
/// cache.set("Peru".to_owned(), CountrySummary {
///     name: "Peru".to_owned(),
///     capital: "Lima".to_owned(),
///     currency: "S/".to_owned(),
///     population: 32_971_846,
/// });
/// assert_eq!(cache.get("Peru").unwrap().capital, "Lima");
/// ```
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, CountrySummary>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// A poisoned lock still guards a consistent map: every write is a single insert.
impl Cache for InMemoryCache {
    fn get(&self, key: &str) -> Option<CountrySummary> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: String, value: CountrySummary) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
    }
}
