use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;

use super::dto::Nutrients;
use super::providers::NutrientProvider;
use crate::logger::Logger;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NutrientsError {
    #[error("no nutrients found")]
    NotFound,
    #[error("failed to get nutrients: {0}")]
    Internal(String),
}

/// Asks providers in priority order; the first non-empty answer wins.
pub struct GetNutrients {
    logger: Arc<dyn Logger>,
    providers: Vec<Arc<dyn NutrientProvider>>,
}

impl GetNutrients {
    /// Priority is fixed here: Nutritionix, then Spoonacular, then Edamam.
    /// `execute` walks them in that order and has no failure policy to tune.
    pub fn new(
        logger: Arc<dyn Logger>,
        nutritionix: Arc<dyn NutrientProvider>,
        spoonacular: Arc<dyn NutrientProvider>,
        edamam: Arc<dyn NutrientProvider>,
    ) -> Self {
        Self {
            logger,
            providers: vec![nutritionix, spoonacular, edamam],
        }
    }

    pub async fn execute(&self, query: &str) -> Result<Vec<Nutrients>, NutrientsError> {
        for provider in &self.providers {
            let source = provider.source().as_str();
            let outcome = AssertUnwindSafe(provider.execute(query))
                .catch_unwind()
                .await;
            match outcome {
                Ok(Some(nutrients)) if !nutrients.is_empty() => {
                    self.logger.info(&format!(
                        "{source} answered {query:?} with {} item(s)",
                        nutrients.len()
                    ));
                    return Ok(nutrients);
                }
                Ok(_) => {
                    self.logger
                        .debug(&format!("{source} had no nutrients for {query:?}"));
                }
                Err(panic) => {
                    let reason = panic_message(panic.as_ref());
                    self.logger.critical(&format!(
                        "Failed to get nutrients: {source} panicked on {query:?}: {reason}"
                    ));
                    return Err(NutrientsError::Internal(reason));
                }
            }
        }
        Err(NutrientsError::NotFound)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
