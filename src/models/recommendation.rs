// src/models/recommendation.rs

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// A recommended university within a country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct University {
    pub name: String,
    pub program: String,
    /// Annual tuition as a currency amount.
    pub tuition: f64,
    pub scholarship: bool,
    /// Ordered reasoning strings explaining the match.
    #[serde(default)]
    pub reasoning: Vec<String>,
}

/// A recommended destination country with its universities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecommendation {
    pub name: String,
    pub reason: String,
    #[serde(default)]
    pub universities: Vec<University>,
}

/// Wire envelope for `POST /api/recommendations/`.
/// Held only in page-local memory, not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub countries: Vec<CountryRecommendation>,
}

/// Transportable export of a recommendation result.
///
/// Round-trip guarantee: parsing an exported document reproduces the
/// country/university list field for field. `generated_at` is metadata and
/// not part of the compared payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationReport {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub countries: Vec<CountryRecommendation>,
}

impl RecommendationReport {
    pub fn new(result: &RecommendationsResponse) -> Self {
        Self {
            generated_at: chrono::Utc::now(),
            countries: result.countries.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(raw)?)
    }
}
