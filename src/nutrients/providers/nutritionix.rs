use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{required, NutrientProvider, ProviderError, REQUEST_TIMEOUT};
use crate::config::NutritionixConfig;
use crate::http_client::{HttpClient, RequestBody};
use crate::logger::Logger;
use crate::nutrients::dto::{Language, NutrientSource, Nutrients};
use crate::nutrients::units::{calories_per_gram, to_fixed_point};

#[derive(Debug, Deserialize)]
struct NutritionixFood {
    food_name: String,
    brand_name: Option<String>,
    serving_qty: f64,
    serving_unit: String,
    nf_calories: f64,
    serving_weight_grams: Option<f64>,
    nf_protein: Option<f64>,
    nf_total_fat: Option<f64>,
    nf_saturated_fat: Option<f64>,
    nf_total_carbohydrate: Option<f64>,
    nf_dietary_fiber: Option<f64>,
    nf_sugars: Option<f64>,
    nf_cholesterol: Option<f64>,
    nf_sodium: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct NutritionixResponse {
    foods: Vec<NutritionixFood>,
}

/// Body parameters of a natural-language nutrients request.
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionixParams {
    pub query: String,
    pub num_servings: u32,
    pub line_delimited: bool,
    pub use_raw_foods: bool,
    pub use_branded_foods: bool,
    pub locale: Language,
}

impl NutritionixParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            num_servings: 1,
            line_delimited: false,
            use_raw_foods: false,
            use_branded_foods: false,
            locale: Language::default(),
        }
    }
}

pub struct FetchNutritionixNutrients {
    config: NutritionixConfig,
    logger: Arc<dyn Logger>,
    http: Arc<dyn HttpClient>,
}

impl FetchNutritionixNutrients {
    pub fn new(config: NutritionixConfig, logger: Arc<dyn Logger>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            logger,
            http,
        }
    }

    pub async fn execute_with(&self, params: &NutritionixParams) -> Option<Vec<Nutrients>> {
        match self.fetch(params).await {
            Ok(nutrients) => Some(nutrients),
            Err(e) => {
                self.logger
                    .error(&format!("Failed to fetch nutritionix nutrients: {e:#}"));
                None
            }
        }
    }

    async fn fetch(&self, params: &NutritionixParams) -> Result<Vec<Nutrients>, ProviderError> {
        let url = format!("{}/v2/natural/nutrients", self.config.base_url);
        let headers = [
            ("Content-Type", "application/json"),
            ("x-app-id", self.config.app_id.as_str()),
            ("x-app-key", self.config.app_key.as_str()),
            ("x-remote-user-id", "0"),
        ];
        let body = json!({
            "query": params.query.replace(',', " , "),
            "locale": params.locale,
            "num_servings": params.num_servings,
            "line_delimited": params.line_delimited,
            "use_raw_foods": params.use_raw_foods,
            "use_branded_foods": params.use_branded_foods,
        });

        let response = self
            .http
            .post(&url, &headers, RequestBody::Json(body), REQUEST_TIMEOUT)
            .await?
            .error_for_status()?;
        let parsed: NutritionixResponse = response.json()?;

        parsed.foods.into_iter().map(to_nutrients).collect()
    }
}

#[async_trait]
impl NutrientProvider for FetchNutritionixNutrients {
    fn source(&self) -> NutrientSource {
        NutrientSource::Nutritionix
    }

    async fn execute(&self, query: &str) -> Option<Vec<Nutrients>> {
        self.execute_with(&NutritionixParams::new(query)).await
    }
}

fn to_nutrients(food: NutritionixFood) -> Result<Nutrients, ProviderError> {
    let name = required(food.food_name, "food", "food name")?;
    let unit = required(food.serving_unit, &name, "serving unit")?;
    let calories_kcal = to_fixed_point(Some(food.nf_calories))
        .ok_or_else(|| ProviderError::MissingCalories(name.clone()))?;

    Ok(Nutrients {
        brand_name: food.brand_name.filter(|b| !b.trim().is_empty()),
        weight_grams: to_fixed_point(food.serving_weight_grams),
        calories_kcal_per_gram: calories_per_gram(Some(food.nf_calories), food.serving_weight_grams),
        protein_grams: to_fixed_point(food.nf_protein),
        total_fat_grams: to_fixed_point(food.nf_total_fat),
        saturated_fat_grams: to_fixed_point(food.nf_saturated_fat),
        total_carbohydrates_grams: to_fixed_point(food.nf_total_carbohydrate),
        dietary_fiber_grams: to_fixed_point(food.nf_dietary_fiber),
        sugars_grams: to_fixed_point(food.nf_sugars),
        cholesterol_mg: to_fixed_point(food.nf_cholesterol),
        sodium_mg: to_fixed_point(food.nf_sodium),
        ..Nutrients::new(
            name,
            food.serving_qty.trunc() as i64,
            unit,
            calories_kcal,
            NutrientSource::Nutritionix,
        )
    })
}

#[cfg(test)]
mod nutritionix_tests {
    use serde_json::Value;

    use super::*;
    use crate::test_support::{FakeHttpClient, Level, RecordedCall, RecordingLogger};

    const BASE_URL: &str = "https://trackapi.nutritionix.com";

    fn config() -> NutritionixConfig {
        NutritionixConfig {
            base_url: BASE_URL.into(),
            app_id: "test_app_id".into(),
            app_key: "test_app_key".into(),
        }
    }

    fn fetcher(http: FakeHttpClient) -> (FetchNutritionixNutrients, Arc<FakeHttpClient>, Arc<RecordingLogger>) {
        let http = Arc::new(http);
        let logger = Arc::new(RecordingLogger::new());
        let fetch = FetchNutritionixNutrients::new(config(), logger.clone(), http.clone());
        (fetch, http, logger)
    }

    fn respond(body: Value) -> FakeHttpClient {
        FakeHttpClient::new().respond(BASE_URL, 200, body)
    }

    fn two_foods() -> Value {
        json!({
            "foods": [
                {
                    "food_name": "food_1",
                    "serving_qty": 1,
                    "serving_unit": "food_1_unit",
                    "nf_calories": 100.1111,
                    "serving_weight_grams": 22.22,
                    "nf_protein": 1,
                    "nf_total_fat": 0.2222,
                    "nf_saturated_fat": 0.33,
                    "nf_total_carbohydrate": 44.4,
                    "nf_dietary_fiber": 55,
                    "nf_sugars": 0.066,
                    "nf_cholesterol": 0.07,
                    "nf_sodium": 0
                },
                {
                    "food_name": "food_2",
                    "brand_name": "food_2_brand",
                    "serving_qty": 1.75,
                    "serving_unit": "food_2_unit",
                    "nf_calories": 200
                }
            ]
        })
    }

    fn expected_request(query: &str, body: Value) -> RecordedCall {
        RecordedCall::Post {
            url: format!("{BASE_URL}/v2/natural/nutrients"),
            headers: vec![
                ("Content-Type".into(), "application/json".into()),
                ("x-app-id".into(), "test_app_id".into()),
                ("x-app-key".into(), "test_app_key".into()),
                ("x-remote-user-id".into(), "0".into()),
            ],
            body: RequestBody::Json(json!({
                "query": query,
                "num_servings": body["num_servings"],
                "line_delimited": body["line_delimited"],
                "use_raw_foods": body["use_raw_foods"],
                "use_branded_foods": body["use_branded_foods"],
                "locale": body["locale"],
            })),
            timeout: REQUEST_TIMEOUT,
        }
    }

    #[tokio::test]
    async fn execute_maps_every_food() {
        let (fetch, http, logger) = fetcher(respond(two_foods()));

        let result = fetch.execute("test_query").await;

        assert_eq!(
            result,
            Some(vec![
                Nutrients {
                    weight_grams: Some(2222),
                    calories_kcal_per_gram: Some(451),
                    protein_grams: Some(100),
                    total_fat_grams: Some(22),
                    saturated_fat_grams: Some(33),
                    total_carbohydrates_grams: Some(4440),
                    dietary_fiber_grams: Some(5500),
                    sugars_grams: Some(7),
                    cholesterol_mg: Some(7),
                    ..Nutrients::new("food_1", 1, "food_1_unit", 10011, NutrientSource::Nutritionix)
                },
                Nutrients {
                    brand_name: Some("food_2_brand".into()),
                    ..Nutrients::new("food_2", 1, "food_2_unit", 20000, NutrientSource::Nutritionix)
                },
            ])
        );
        assert!(logger.at(Level::Error).is_empty());
        assert_eq!(
            http.calls(),
            vec![expected_request(
                "test_query",
                json!({
                    "num_servings": 1,
                    "line_delimited": false,
                    "use_raw_foods": false,
                    "use_branded_foods": false,
                    "locale": "en_US",
                })
            )]
        );
    }

    #[tokio::test]
    async fn execute_with_custom_params() {
        let (fetch, http, _logger) = fetcher(respond(two_foods()));
        let params = NutritionixParams {
            num_servings: 2,
            line_delimited: true,
            use_raw_foods: true,
            use_branded_foods: true,
            locale: Language::PtBr,
            ..NutritionixParams::new("test_query_with_custom_params")
        };

        let result = fetch.execute_with(&params).await;

        assert!(result.is_some());
        assert_eq!(
            http.calls(),
            vec![expected_request(
                "test_query_with_custom_params",
                json!({
                    "num_servings": 2,
                    "line_delimited": true,
                    "use_raw_foods": true,
                    "use_branded_foods": true,
                    "locale": "pt_BR",
                })
            )]
        );
    }

    #[tokio::test]
    async fn commas_are_spaced_out() {
        let (fetch, http, _logger) = fetcher(respond(json!({ "foods": [] })));

        let result = fetch.execute("1 apple,2 eggs").await;

        assert_eq!(result, Some(vec![]));
        let calls = http.calls();
        let RecordedCall::Post { body: RequestBody::Json(body), .. } = &calls[0] else {
            panic!("expected a JSON post");
        };
        assert_eq!(body["query"], "1 apple , 2 eggs");
    }

    async fn assert_voided(food: Value) {
        let (fetch, _http, logger) = fetcher(respond(json!({
            "foods": [
                {
                    "food_name": "fine",
                    "serving_qty": 1,
                    "serving_unit": "cup",
                    "nf_calories": 10
                },
                food
            ]
        })));

        assert_eq!(fetch.execute("test_query").await, None);
        assert_eq!(logger.at(Level::Error).len(), 1);
    }

    #[tokio::test]
    async fn null_food_name_voids_the_call() {
        assert_voided(json!({
            "food_name": null,
            "brand_name": "food_brand",
            "serving_qty": 1,
            "serving_unit": "food_unit",
            "nf_calories": 100
        }))
        .await;
    }

    #[tokio::test]
    async fn null_quantity_voids_the_call() {
        assert_voided(json!({
            "food_name": "food_name",
            "serving_qty": null,
            "serving_unit": "food_unit",
            "nf_calories": 100
        }))
        .await;
    }

    #[tokio::test]
    async fn missing_unit_voids_the_call() {
        assert_voided(json!({
            "food_name": "food_name",
            "serving_qty": 1,
            "nf_calories": 100
        }))
        .await;
    }

    #[tokio::test]
    async fn blank_unit_voids_the_call() {
        assert_voided(json!({
            "food_name": "food_name",
            "serving_qty": 1,
            "serving_unit": "",
            "nf_calories": 100
        }))
        .await;
    }

    #[tokio::test]
    async fn missing_calories_voids_the_call() {
        assert_voided(json!({
            "food_name": "food_name",
            "serving_qty": 1,
            "serving_unit": "food_unit"
        }))
        .await;
    }

    #[tokio::test]
    async fn zero_calories_voids_the_call() {
        assert_voided(json!({
            "food_name": "water",
            "serving_qty": 1,
            "serving_unit": "cup",
            "nf_calories": 0
        }))
        .await;
    }

    #[tokio::test]
    async fn error_status_voids_the_call() {
        let (fetch, _http, logger) =
            fetcher(FakeHttpClient::new().respond(BASE_URL, 401, json!({ "message": "unauthorized" })));

        assert_eq!(fetch.execute("test_query").await, None);
        assert_eq!(
            logger.at(Level::Error),
            vec!["Failed to fetch nutritionix nutrients: HTTP status 401".to_string()]
        );
    }

    #[tokio::test]
    async fn transport_failure_is_logged() {
        let (fetch, _http, logger) = fetcher(FakeHttpClient::new().fail(BASE_URL, "test_error"));

        assert_eq!(fetch.execute("test_query").await, None);
        assert_eq!(
            logger.at(Level::Error),
            vec!["Failed to fetch nutritionix nutrients: test_error".to_string()]
        );
    }
}
