use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::{required, NutrientProvider, ProviderError, REQUEST_TIMEOUT};
use crate::config::EdamamConfig;
use crate::http_client::HttpClient;
use crate::logger::Logger;
use crate::nutrients::dto::{NutrientSource, Nutrients};
use crate::nutrients::units::{calories_per_gram, grams_from, milligrams_from, to_fixed_point};

#[derive(Debug, Deserialize)]
struct EdamamNutrient {
    label: String,
    quantity: f64,
    unit: String,
}

#[derive(Debug, Deserialize)]
struct EdamamNutrients {
    #[serde(rename = "ENERC_KCAL")]
    energy: EdamamNutrient,
    #[serde(rename = "PROCNT")]
    protein: Option<EdamamNutrient>,
    #[serde(rename = "FAT")]
    fat: Option<EdamamNutrient>,
    #[serde(rename = "FASAT")]
    saturated_fat: Option<EdamamNutrient>,
    #[serde(rename = "CHOCDF")]
    carbohydrates: Option<EdamamNutrient>,
    #[serde(rename = "FIBTG")]
    fiber: Option<EdamamNutrient>,
    #[serde(rename = "SUGAR")]
    sugar: Option<EdamamNutrient>,
    #[serde(rename = "CHOLE")]
    cholesterol: Option<EdamamNutrient>,
    #[serde(rename = "NA")]
    sodium: Option<EdamamNutrient>,
}

impl EdamamNutrients {
    fn present(&self) -> impl Iterator<Item = &EdamamNutrient> {
        [
            &self.protein,
            &self.fat,
            &self.saturated_fat,
            &self.carbohydrates,
            &self.fiber,
            &self.sugar,
            &self.cholesterol,
            &self.sodium,
        ]
        .into_iter()
        .flatten()
        .chain(std::iter::once(&self.energy))
    }
}

#[derive(Debug, Deserialize)]
struct EdamamParsedIngredient {
    quantity: f64,
    measure: String,
    food: String,
    weight: f64,
    nutrients: EdamamNutrients,
    status: String,
}

#[derive(Debug, Deserialize)]
struct EdamamIngredient {
    parsed: Vec<EdamamParsedIngredient>,
}

#[derive(Debug, Deserialize)]
struct EdamamResponse {
    ingredients: Vec<EdamamIngredient>,
}

pub struct FetchEdamamNutrients {
    config: EdamamConfig,
    logger: Arc<dyn Logger>,
    http: Arc<dyn HttpClient>,
}

impl FetchEdamamNutrients {
    pub fn new(config: EdamamConfig, logger: Arc<dyn Logger>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            logger,
            http,
        }
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Nutrients>, ProviderError> {
        let url = format!("{}/api/nutrition-data", self.config.base_url);
        let ingr = query.replace(',', " AND ");
        let params = [
            ("ingr", ingr.as_str()),
            ("app_id", self.config.app_id.as_str()),
            ("app_key", self.config.app_key.as_str()),
            ("nutrition-type", "cooking"),
        ];

        let response = self
            .http
            .get(&url, &[("Content-Type", "application/json")], &params, REQUEST_TIMEOUT)
            .await?
            .error_for_status()?;
        let parsed: EdamamResponse = response.json()?;

        parsed
            .ingredients
            .into_iter()
            .flat_map(|ingredient| ingredient.parsed)
            .map(to_nutrients)
            .collect()
    }
}

#[async_trait]
impl NutrientProvider for FetchEdamamNutrients {
    fn source(&self) -> NutrientSource {
        NutrientSource::Edamam
    }

    async fn execute(&self, query: &str) -> Option<Vec<Nutrients>> {
        match self.fetch(query).await {
            Ok(nutrients) => Some(nutrients),
            Err(e) => {
                self.logger
                    .error(&format!("Failed to fetch edamam nutrients: {e:#}"));
                None
            }
        }
    }
}

fn grams(nutrient: &Option<EdamamNutrient>) -> Option<i64> {
    nutrient
        .as_ref()
        .and_then(|n| grams_from(n.quantity, &n.unit))
        .and_then(|g| to_fixed_point(Some(g)))
}

fn milligrams(nutrient: &Option<EdamamNutrient>) -> Option<i64> {
    nutrient
        .as_ref()
        .and_then(|n| milligrams_from(n.quantity, &n.unit))
        .and_then(|mg| to_fixed_point(Some(mg)))
}

fn to_nutrients(parsed: EdamamParsedIngredient) -> Result<Nutrients, ProviderError> {
    let name = required(parsed.food, "parsed ingredient", "food")?;
    let unit = required(parsed.measure, &name, "measure")?;
    required(parsed.status, &name, "status")?;
    let n = &parsed.nutrients;
    for nutrient in n.present() {
        required(nutrient.label.clone(), &name, "nutrient label")?;
    }
    let calories = Some(n.energy.quantity);
    let Some(calories_kcal) = to_fixed_point(calories) else {
        return Err(ProviderError::MissingCalories(name));
    };

    Ok(Nutrients {
        weight_grams: to_fixed_point(Some(parsed.weight)),
        calories_kcal_per_gram: calories_per_gram(calories, Some(parsed.weight)),
        protein_grams: grams(&n.protein),
        total_fat_grams: grams(&n.fat),
        saturated_fat_grams: grams(&n.saturated_fat),
        total_carbohydrates_grams: grams(&n.carbohydrates),
        dietary_fiber_grams: grams(&n.fiber),
        sugars_grams: grams(&n.sugar),
        cholesterol_mg: milligrams(&n.cholesterol),
        sodium_mg: milligrams(&n.sodium),
        ..Nutrients::new(
            name,
            parsed.quantity.trunc() as i64,
            unit,
            calories_kcal,
            NutrientSource::Edamam,
        )
    })
}
