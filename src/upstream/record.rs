//! Provider record schema and its projection onto [`CountrySummary`].
//!
//! REST Countries returns far more than this per country; everything not
//! declared here is skipped by the deserializer.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::UpstreamError;
use crate::model::CountrySummary;

/// One element of the provider's response array.
#[derive(Debug, Deserialize)]
pub struct ProviderRecord {
    pub name: ProviderName,
    #[serde(default)]
    pub capital: Option<Vec<String>>,
    /// Keyed by ISO 4217 code, in the order the provider sent them.
    #[serde(default)]
    pub currencies: Option<Map<String, Value>>,
    pub population: u64,
}

#[derive(Debug, Deserialize)]
pub struct ProviderName {
    pub common: String,
}

#[derive(Debug, Deserialize)]
pub struct ProviderCurrency {
    #[serde(default)]
    pub symbol: Option<String>,
}

impl ProviderRecord {
    /// Symbol of the first listed currency, falling back to its code when the
    /// provider has no symbol for it.
    fn first_currency(&self) -> Result<String, UpstreamError> {
        let (code, raw) = self
            .currencies
            .as_ref()
            .and_then(|currencies| currencies.iter().next())
            .ok_or(UpstreamError::IncompleteRecord {
                field: "currencies",
            })?;

        let currency = ProviderCurrency::deserialize(raw)?;
        Ok(currency
            .symbol
            .filter(|symbol| !symbol.is_empty())
            .unwrap_or_else(|| code.clone()))
    }
}

impl TryFrom<ProviderRecord> for CountrySummary {
    type Error = UpstreamError;

    fn try_from(record: ProviderRecord) -> Result<Self, Self::Error> {
        let currency = record.first_currency()?;
        let capital = record
            .capital
            .and_then(|capitals| capitals.into_iter().next())
            .ok_or(UpstreamError::IncompleteRecord { field: "capital" })?;

        Ok(Self {
            name: record.name.common,
            capital,
            currency,
            population: record.population,
        })
    }
}
