use std::env::VarError;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct NutritionixConfig {
    pub base_url: String,
    pub app_id: String,
    pub app_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpoonacularConfig {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdamamConfig {
    pub base_url: String,
    pub app_id: String,
    pub app_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub nutritionix: NutritionixConfig,
    pub spoonacular: SpoonacularConfig,
    pub edamam: EdamamConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let nutritionix = NutritionixConfig {
            base_url: base_url("NUTRITIONIX_BASE_URL", "https://trackapi.nutritionix.com")?,
            app_id: env_or("NUTRITIONIX_APP_ID", "")?,
            app_key: env_or("NUTRITIONIX_APP_KEY", "")?,
        };
        let spoonacular = SpoonacularConfig {
            base_url: base_url("SPOONACULAR_BASE_URL", "https://api.spoonacular.com")?,
            api_key: env_or("SPOONACULAR_API_KEY", "")?,
        };
        let edamam = EdamamConfig {
            base_url: base_url("EDAMAM_BASE_URL", "https://api.edamam.com")?,
            app_id: env_or("EDAMAM_APP_ID", "")?,
            app_key: env_or("EDAMAM_APP_KEY", "")?,
        };
        Ok(Self {
            nutritionix,
            spoonacular,
            edamam,
        })
    }

    /// Names of providers whose credentials are blank.
    pub fn unconfigured_providers(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.nutritionix.app_id.is_empty() || self.nutritionix.app_key.is_empty() {
            missing.push("nutritionix");
        }
        if self.spoonacular.api_key.is_empty() {
            missing.push("spoonacular");
        }
        if self.edamam.app_id.is_empty() || self.edamam.app_key.is_empty() {
            missing.push("edamam");
        }
        missing
    }
}

fn env_or(key: &str, default: &str) -> anyhow::Result<String> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        Ok(_) | Err(VarError::NotPresent) => Ok(default.to_string()),
        Err(e) => Err(e).with_context(|| format!("read {key}")),
    }
}

fn base_url(key: &str, default: &str) -> anyhow::Result<String> {
    Ok(env_or(key, default)?.trim_end_matches('/').to_string())
}
