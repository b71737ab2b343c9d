use serde::{Deserialize, Serialize};

use super::units::from_fixed_point;

/// Which provider produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NutrientSource {
    Nutritionix,
    Spoonacular,
    Edamam,
}

impl NutrientSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientSource::Nutritionix => "nutritionix",
            NutrientSource::Spoonacular => "spoonacular",
            NutrientSource::Edamam => "edamam",
        }
    }
}

/// Locale tag sent with Nutritionix requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en_US")]
    EnUs,
    #[serde(rename = "pt_BR")]
    PtBr,
    #[serde(rename = "it_IT")]
    ItIt,
}

/// Canonical nutrient record. Numeric fields are fixed-point (×100); grams
/// except cholesterol and sodium, which stay in milligrams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nutrients {
    pub name: String,
    pub brand_name: Option<String>,
    pub quantity: i64,
    pub unit: String,
    pub calories_kcal: i64,
    pub weight_grams: Option<i64>,
    pub calories_kcal_per_gram: Option<i64>,
    pub protein_grams: Option<i64>,
    pub total_fat_grams: Option<i64>,
    pub saturated_fat_grams: Option<i64>,
    pub total_carbohydrates_grams: Option<i64>,
    pub dietary_fiber_grams: Option<i64>,
    pub sugars_grams: Option<i64>,
    pub cholesterol_mg: Option<i64>,
    pub sodium_mg: Option<i64>,
    pub source: NutrientSource,
}

impl Nutrients {
    /// A record carrying only the mandatory fields.
    pub fn new(
        name: impl Into<String>,
        quantity: i64,
        unit: impl Into<String>,
        calories_kcal: i64,
        source: NutrientSource,
    ) -> Self {
        Self {
            name: name.into(),
            brand_name: None,
            quantity,
            unit: unit.into(),
            calories_kcal,
            weight_grams: None,
            calories_kcal_per_gram: None,
            protein_grams: None,
            total_fat_grams: None,
            saturated_fat_grams: None,
            total_carbohydrates_grams: None,
            dietary_fiber_grams: None,
            sugars_grams: None,
            cholesterol_mg: None,
            sodium_mg: None,
            source,
        }
    }
}

/// Same record with the fixed-point fields decoded back to decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientsDecimal {
    pub name: String,
    pub brand_name: Option<String>,
    pub quantity: i64,
    pub unit: String,
    pub calories_kcal: Option<f64>,
    pub weight_grams: Option<f64>,
    pub calories_kcal_per_gram: Option<f64>,
    pub protein_grams: Option<f64>,
    pub total_fat_grams: Option<f64>,
    pub saturated_fat_grams: Option<f64>,
    pub total_carbohydrates_grams: Option<f64>,
    pub dietary_fiber_grams: Option<f64>,
    pub sugars_grams: Option<f64>,
    pub cholesterol_mg: Option<f64>,
    pub sodium_mg: Option<f64>,
    pub source: NutrientSource,
}

impl From<Nutrients> for NutrientsDecimal {
    fn from(n: Nutrients) -> Self {
        Self {
            name: n.name,
            brand_name: n.brand_name,
            quantity: n.quantity,
            unit: n.unit,
            calories_kcal: from_fixed_point(Some(n.calories_kcal)),
            weight_grams: from_fixed_point(n.weight_grams),
            calories_kcal_per_gram: from_fixed_point(n.calories_kcal_per_gram),
            protein_grams: from_fixed_point(n.protein_grams),
            total_fat_grams: from_fixed_point(n.total_fat_grams),
            saturated_fat_grams: from_fixed_point(n.saturated_fat_grams),
            total_carbohydrates_grams: from_fixed_point(n.total_carbohydrates_grams),
            dietary_fiber_grams: from_fixed_point(n.dietary_fiber_grams),
            sugars_grams: from_fixed_point(n.sugars_grams),
            cholesterol_mg: from_fixed_point(n.cholesterol_mg),
            sodium_mg: from_fixed_point(n.sodium_mg),
            source: n.source,
        }
    }
}
