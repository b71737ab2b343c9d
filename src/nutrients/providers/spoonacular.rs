use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::{required, NutrientProvider, ProviderError, REQUEST_TIMEOUT};
use crate::config::SpoonacularConfig;
use crate::http_client::{HttpClient, RequestBody};
use crate::logger::Logger;
use crate::nutrients::dto::{NutrientSource, Nutrients};
use crate::nutrients::units::{calories_per_gram, grams_from, milligrams_from, to_fixed_point};

#[derive(Debug, Deserialize)]
struct SpoonacularNutrient {
    name: String,
    amount: f64,
    unit: String,
}

#[derive(Debug, Deserialize)]
struct SpoonacularWeightPerServing {
    amount: f64,
    unit: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpoonacularNutrition {
    nutrients: Vec<SpoonacularNutrient>,
    weight_per_serving: SpoonacularWeightPerServing,
}

#[derive(Debug, Deserialize)]
struct SpoonacularIngredient {
    name: String,
    amount: f64,
    unit: String,
    nutrition: SpoonacularNutrition,
}

pub struct FetchSpoonacularNutrients {
    config: SpoonacularConfig,
    logger: Arc<dyn Logger>,
    http: Arc<dyn HttpClient>,
}

impl FetchSpoonacularNutrients {
    pub fn new(config: SpoonacularConfig, logger: Arc<dyn Logger>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            logger,
            http,
        }
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Nutrients>, ProviderError> {
        let url = format!(
            "{}/recipes/parseIngredients?apiKey={}",
            self.config.base_url, self.config.api_key
        );
        let headers = [
            ("User-Agent", "FOOD AI API"),
            ("Content-Type", "application/x-www-form-urlencoded"),
        ];
        let form = vec![
            ("ingredientList".to_string(), query.replace(',', "\n")),
            ("servings".to_string(), "1".to_string()),
            ("includeNutrition".to_string(), "true".to_string()),
            ("language".to_string(), "en".to_string()),
        ];

        let response = self
            .http
            .post(&url, &headers, RequestBody::Form(form), REQUEST_TIMEOUT)
            .await?
            .error_for_status()?;
        let ingredients: Vec<SpoonacularIngredient> = response.json()?;

        ingredients.into_iter().map(to_nutrients).collect()
    }
}

#[async_trait]
impl NutrientProvider for FetchSpoonacularNutrients {
    fn source(&self) -> NutrientSource {
        NutrientSource::Spoonacular
    }

    async fn execute(&self, query: &str) -> Option<Vec<Nutrients>> {
        match self.fetch(query).await {
            Ok(nutrients) => Some(nutrients),
            Err(e) => {
                self.logger
                    .error(&format!("Failed to fetch spoonacular nutrients: {e:#}"));
                None
            }
        }
    }
}

fn find<'a>(nutrients: &'a [SpoonacularNutrient], name: &str) -> Option<&'a SpoonacularNutrient> {
    nutrients.iter().find(|n| n.name == name)
}

fn to_nutrients(ingredient: SpoonacularIngredient) -> Result<Nutrients, ProviderError> {
    let name = required(ingredient.name, "ingredient", "name")?;
    let unit = required(ingredient.unit, &name, "unit")?;
    let SpoonacularNutrition {
        nutrients,
        weight_per_serving,
    } = ingredient.nutrition;

    if weight_per_serving.unit != "g" {
        return Err(ProviderError::WeightNotInGrams(name));
    }
    let calories = find(&nutrients, "Calories")
        .filter(|c| c.unit == "kcal")
        .map(|c| c.amount);
    let Some(calories_kcal) = to_fixed_point(calories) else {
        return Err(ProviderError::MissingCalories(name));
    };

    let quantity = ingredient.amount.trunc() as i64;
    let weight = Some(weight_per_serving.amount * quantity as f64);
    let grams = |key: &str| {
        find(&nutrients, key)
            .and_then(|n| grams_from(n.amount, &n.unit))
            .and_then(|g| to_fixed_point(Some(g)))
    };
    let milligrams = |key: &str| {
        find(&nutrients, key)
            .and_then(|n| milligrams_from(n.amount, &n.unit))
            .and_then(|mg| to_fixed_point(Some(mg)))
    };

    Ok(Nutrients {
        weight_grams: to_fixed_point(weight),
        calories_kcal_per_gram: calories_per_gram(calories, weight),
        protein_grams: grams("Protein"),
        total_fat_grams: grams("Fat"),
        saturated_fat_grams: grams("Saturated Fat"),
        total_carbohydrates_grams: grams("Carbohydrates"),
        dietary_fiber_grams: grams("Fiber"),
        sugars_grams: grams("Sugar"),
        cholesterol_mg: milligrams("Cholesterol"),
        sodium_mg: milligrams("Sodium"),
        ..Nutrients::new(name, quantity, unit, calories_kcal, NutrientSource::Spoonacular)
    })
}
