use std::sync::Arc;

use crate::config::AppConfig;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::logger::{Logger, TracingLogger};
use crate::nutrients::providers::{
    FetchEdamamNutrients, FetchNutritionixNutrients, FetchSpoonacularNutrients,
};
use crate::nutrients::services::GetNutrients;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub get_nutrients: Arc<GetNutrients>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let http = Arc::new(ReqwestHttpClient::new()?) as Arc<dyn HttpClient>;
        let logger = Arc::new(TracingLogger) as Arc<dyn Logger>;

        Ok(Self::from_parts(config, http, logger))
    }

    /// Wires the three providers in their fixed priority order around one
    /// shared HTTP client.
    pub fn from_parts(
        config: Arc<AppConfig>,
        http: Arc<dyn HttpClient>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        let nutritionix = FetchNutritionixNutrients::new(
            config.nutritionix.clone(),
            logger.clone(),
            http.clone(),
        );
        let spoonacular = FetchSpoonacularNutrients::new(
            config.spoonacular.clone(),
            logger.clone(),
            http.clone(),
        );
        let edamam = FetchEdamamNutrients::new(config.edamam.clone(), logger.clone(), http);

        let get_nutrients = Arc::new(GetNutrients::new(
            logger,
            Arc::new(nutritionix),
            Arc::new(spoonacular),
            Arc::new(edamam),
        ));

        Self {
            config,
            get_nutrients,
        }
    }

    #[cfg(test)]
    pub fn fake(http: Arc<crate::test_support::FakeHttpClient>) -> Self {
        use crate::config::{EdamamConfig, NutritionixConfig, SpoonacularConfig};
        use crate::test_support::RecordingLogger;

        let config = Arc::new(AppConfig {
            nutritionix: NutritionixConfig {
                base_url: "http://nutritionix.test".into(),
                app_id: "test".into(),
                app_key: "test".into(),
            },
            spoonacular: SpoonacularConfig {
                base_url: "http://spoonacular.test".into(),
                api_key: "test".into(),
            },
            edamam: EdamamConfig {
                base_url: "http://edamam.test".into(),
                app_id: "test".into(),
                app_key: "test".into(),
            },
        });

        Self::from_parts(config, http, Arc::new(RecordingLogger::new()))
    }
}
