// src/workflow.rs

use crate::client::ApiClient;
use crate::error::AppError;
use crate::models::access::AccessDecision;
use crate::models::ad::Advertisement;
use crate::models::recommendation::RecommendationsResponse;
use crate::store::questionnaire::QuestionnaireStore;
use crate::store::session::SessionStore;
use crate::timer::AdTimer;
use std::sync::{Arc, RwLock};

/// Observable state of the access-gating workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowState {
    Idle,
    CheckingAccess,
    FetchingRecommendations,
    /// An advertisement is on screen; waiting for the countdown plus the
    /// completion call.
    WatchingAd,
    /// Terminal: the user must go through the external purchase flow.
    AwaitingPurchase,
    /// Terminal: recommendations were delivered.
    Done,
    /// Terminal until the next submit, which retries from scratch.
    Failed(String),
}

/// What a submission attempt resolved to.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Access granted; the payload is already fetched.
    Recommendations(RecommendationsResponse),
    /// The caller must display this ad, run the countdown to zero, then
    /// call `complete_ad`.
    AdRequired(Advertisement),
    /// Access denied; carries a displayable reason.
    PurchaseRequired(String),
}

/// Orchestrates: check entitlement -> granted / ad / denied branches ->
/// recommendations fetch -> entitlement refresh.
///
/// `complete_ad` is the explicit continuation hook for the ad branch; the
/// workflow owns the whole flow and no state crosses component boundaries
/// through ambient globals.
pub struct GatingWorkflow {
    client: Arc<ApiClient>,
    session: Arc<SessionStore>,
    questionnaire: Arc<QuestionnaireStore>,
    state: RwLock<WorkflowState>,
}

impl GatingWorkflow {
    pub fn new(
        client: Arc<ApiClient>,
        session: Arc<SessionStore>,
        questionnaire: Arc<QuestionnaireStore>,
    ) -> Self {
        Self {
            client,
            session,
            questionnaire,
            state: RwLock::new(WorkflowState::Idle),
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state.read().expect("workflow lock poisoned").clone()
    }

    fn set_state(&self, state: WorkflowState) {
        *self.state.write().expect("workflow lock poisoned") = state;
    }

    fn fail(&self, error: &AppError) {
        self.set_state(WorkflowState::Failed(error.message()));
    }

    /// Runs the access check for the accumulated answers and resolves the
    /// branch to take. A previous `Failed` state is cleared; the check
    /// always reruns from scratch, no partial state is reused.
    ///
    /// A 402 from the access check itself is folded into the matching
    /// branch instead of surfacing as a raw error.
    pub async fn submit(&self) -> Result<SubmitOutcome, AppError> {
        self.set_state(WorkflowState::CheckingAccess);
        let guest_token = self.questionnaire.guest_token();
        let answers = self.questionnaire.answers();

        let decision = match self
            .client
            .check_access(guest_token.as_deref(), &answers)
            .await
        {
            Ok(decision) => decision,
            Err(AppError::AdRequired) => AccessDecision::AdRequired,
            Err(AppError::InsufficientCredits) => {
                AccessDecision::Denied(Some("Insufficient credits".to_string()))
            }
            Err(e) => {
                self.fail(&e);
                return Err(e);
            }
        };

        match decision {
            AccessDecision::Granted => {
                let payload = self.fetch_recommendations().await?;
                Ok(SubmitOutcome::Recommendations(payload))
            }
            AccessDecision::AdRequired => {
                let ad = match self.client.get_ad().await {
                    Ok(ad) => ad,
                    Err(e) => {
                        self.fail(&e);
                        return Err(e);
                    }
                };
                self.set_state(WorkflowState::WatchingAd);
                Ok(SubmitOutcome::AdRequired(ad))
            }
            AccessDecision::Denied(reason) => {
                self.set_state(WorkflowState::AwaitingPurchase);
                Ok(SubmitOutcome::PurchaseRequired(
                    reason.unwrap_or_else(|| "Purchase credits required".to_string()),
                ))
            }
        }
    }

    /// Continuation of the ad branch once the countdown has elapsed.
    ///
    /// Preconditions, both checked before any backend contact:
    /// the countdown must have reached zero, and a guest token must exist
    /// (ad completion is credited to the anonymous session).
    pub async fn complete_ad(&self, timer: &AdTimer) -> Result<RecommendationsResponse, AppError> {
        if !timer.is_complete() {
            return Err(AppError::Precondition(
                "Ad not fully watched yet".to_string(),
            ));
        }
        let guest_token = self.questionnaire.guest_token().ok_or_else(|| {
            AppError::Precondition("Guest token required for ad completion".to_string())
        })?;

        if let Err(e) = self.client.complete_ad(&guest_token).await {
            self.fail(&e);
            return Err(e);
        }
        self.session.refresh_status().await;

        self.fetch_recommendations().await
    }

    /// Granted path: exactly one recommendations fetch followed by exactly
    /// one entitlement refresh (server-side counters may have moved).
    async fn fetch_recommendations(&self) -> Result<RecommendationsResponse, AppError> {
        self.set_state(WorkflowState::FetchingRecommendations);
        let guest_token = self.questionnaire.guest_token();
        let answers = self.questionnaire.answers();

        match self
            .client
            .get_recommendations(guest_token.as_deref(), &answers)
            .await
        {
            Ok(payload) => {
                self.session.refresh_status().await;
                self.set_state(WorkflowState::Done);
                Ok(payload)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }
}
