// src/client.rs

use crate::config::Config;
use crate::error::AppError;
use crate::models::access::{AccessCheckResponse, AccessDecision};
use crate::models::ad::Advertisement;
use crate::models::pricing::PricingPlan;
use crate::models::questionnaire::{FormAnswers, QuestionnaireResponse};
use crate::models::recommendation::RecommendationsResponse;
use crate::models::session::SessionStatus;
use crate::storage::CredentialCache;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Structured error body used by the backend: `{"error": "..."}`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Gateway for every outbound backend call.
///
/// Attaches the bearer credential when one is cached and normalizes every
/// transport or HTTP failure into an `AppError` before it reaches store or
/// workflow code.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<CredentialCache>,
}

impl ApiClient {
    pub fn new(config: &Config, credentials: Arc<CredentialCache>) -> Self {
        let base_url = config.api_base_url.as_str().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            credentials,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Sends a prepared request with the bearer credential attached and
    /// maps the response status onto the error taxonomy.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, AppError> {
        let req = match self.credentials.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        };
        let resp = req.send().await?;
        self.check_status(resp).await
    }

    /// HTTP status mapping:
    /// 400 -> Validation (message from body), 401 -> AuthRequired (clears
    /// local credentials), 402 -> AdRequired / InsufficientCredits by error
    /// code, 404 -> NotFound, anything else -> Unexpected with the
    /// server-provided message when present.
    async fn check_status(&self, resp: reqwest::Response) -> Result<reqwest::Response, AppError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body: ErrorBody = resp.json().await.unwrap_or_default();
        let message = body.error.clone();

        match status.as_u16() {
            400 => Err(AppError::Validation(
                message.unwrap_or_else(|| "Invalid request".to_string()),
            )),
            401 => {
                tracing::warn!("Backend rejected credentials, clearing local token");
                self.credentials.clear();
                Err(AppError::AuthRequired)
            }
            402 => match message.as_deref() {
                Some("Ad viewing required") => Err(AppError::AdRequired),
                Some("Insufficient credits") => Err(AppError::InsufficientCredits),
                other => Err(AppError::Unexpected(
                    other.unwrap_or("Payment required").to_string(),
                )),
            },
            404 => Err(AppError::NotFound),
            _ => Err(AppError::Unexpected(
                message.unwrap_or_else(|| "An unexpected error occurred".to_string()),
            )),
        }
    }

    /// `GET /api/questionnaire/` - the full step/question definition.
    pub async fn get_questionnaire(&self) -> Result<QuestionnaireResponse, AppError> {
        let resp = self.send(self.http.get(self.url("/questionnaire/"))).await?;
        Ok(resp.json().await?)
    }

    /// `GET /api/user-status/` - current entitlement snapshot.
    /// A guest token, when present, identifies the anonymous session.
    pub async fn get_user_status(
        &self,
        guest_token: Option<&str>,
    ) -> Result<SessionStatus, AppError> {
        let mut req = self.http.get(self.url("/user-status/"));
        if let Some(token) = guest_token {
            req = req.query(&[("guest_token", token)]);
        }
        let resp = self.send(req).await?;
        Ok(resp.json().await?)
    }

    /// `POST /api/check-access/` - may the session fetch recommendations?
    pub async fn check_access(
        &self,
        guest_token: Option<&str>,
        profile_data: &FormAnswers,
    ) -> Result<AccessDecision, AppError> {
        let resp = self
            .send(self.http.post(self.url("/check-access/")).json(&json!({
                "guest_token": guest_token,
                "profile_data": profile_data,
            })))
            .await?;
        let decision: AccessCheckResponse = resp.json().await?;
        Ok(decision.into())
    }

    /// `GET /api/ad/` - one fresh advertisement for the ad flow.
    pub async fn get_ad(&self) -> Result<Advertisement, AppError> {
        let resp = self.send(self.http.get(self.url("/ad/"))).await?;
        Ok(resp.json().await?)
    }

    /// `POST /api/ad-complete/` - marks an advertisement as fully watched.
    /// The guest token is mandatory; the backend credits the attempt to it.
    pub async fn complete_ad(&self, guest_token: &str) -> Result<(), AppError> {
        self.send(self.http.post(self.url("/ad-complete/")).json(&json!({
            "guest_token": guest_token,
        })))
        .await?;
        Ok(())
    }

    /// `POST /api/recommendations/` - the recommendation payload.
    pub async fn get_recommendations(
        &self,
        guest_token: Option<&str>,
        profile_data: &FormAnswers,
    ) -> Result<RecommendationsResponse, AppError> {
        let resp = self
            .send(self.http.post(self.url("/recommendations/")).json(&json!({
                "guest_token": guest_token,
                "profile_data": profile_data,
            })))
            .await?;
        Ok(resp.json().await?)
    }

    /// `GET /api/pricing/` - available credit bundles.
    pub async fn get_pricing(&self) -> Result<Vec<PricingPlan>, AppError> {
        let resp = self.send(self.http.get(self.url("/pricing/"))).await?;
        Ok(resp.json().await?)
    }
}
