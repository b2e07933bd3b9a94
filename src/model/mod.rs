//! Wire shapes returned to API callers.

use serde::{Deserialize, Serialize};

/// Normalized summary of one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountrySummary {
    pub name: String,
    pub capital: String,
    /// Currency symbol, or the ISO code when the provider has no symbol.
    pub currency: String,
    pub population: u64,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
