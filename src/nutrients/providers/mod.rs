use std::time::Duration;

use async_trait::async_trait;

use super::dto::{NutrientSource, Nutrients};

pub mod edamam;
pub mod nutritionix;
pub mod spoonacular;

pub use edamam::FetchEdamamNutrients;
pub use nutritionix::{FetchNutritionixNutrients, NutritionixParams};
pub use spoonacular::FetchSpoonacularNutrients;

pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// One nutrition-data provider.
///
/// `execute` never fails: transport, status and schema problems are logged by
/// the provider and come back as `None`.
#[async_trait]
pub trait NutrientProvider: Send + Sync {
    fn source(&self) -> NutrientSource;

    async fn execute(&self, query: &str) -> Option<Vec<Nutrients>>;
}

/// Why a provider call produced no records. Any variant voids the whole call.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
    #[error("invalid response body: {0}")]
    Schema(#[from] serde_json::Error),
    #[error("{item} does not have {field}")]
    MissingField { item: String, field: &'static str },
    #[error("{0} does not have weight in grams")]
    WeightNotInGrams(String),
    #[error("{0} does not have calories")]
    MissingCalories(String),
}

/// Rejects blank strings the schema let through as present.
pub(crate) fn required(
    value: String,
    item: &str,
    field: &'static str,
) -> Result<String, ProviderError> {
    if value.trim().is_empty() {
        return Err(ProviderError::MissingField {
            item: item.to_string(),
            field,
        });
    }
    Ok(value)
}
