// src/app.rs

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::AppError;
use crate::identity::IdentityProvider;
use crate::storage::{CredentialCache, LocalStore};
use crate::store::questionnaire::QuestionnaireStore;
use crate::store::session::SessionStore;
use crate::workflow::GatingWorkflow;
use std::sync::Arc;

/// Explicit application context wiring the client, the stores and the
/// workflow together. Built once by the entry point, passed to the pages;
/// there is no ambient global state.
pub struct AppContext {
    pub config: Config,
    pub local: Arc<LocalStore>,
    pub credentials: Arc<CredentialCache>,
    pub client: Arc<ApiClient>,
    pub session: Arc<SessionStore>,
    pub questionnaire: Arc<QuestionnaireStore>,
    pub workflow: GatingWorkflow,
}

impl AppContext {
    pub fn new(config: Config, provider: Arc<dyn IdentityProvider>) -> Result<Self, AppError> {
        let local = Arc::new(LocalStore::open(&config.state_dir)?);
        let credentials = Arc::new(CredentialCache::new(Arc::clone(&local)));
        let client = Arc::new(ApiClient::new(&config, Arc::clone(&credentials)));
        let session = Arc::new(SessionStore::new(
            provider,
            Arc::clone(&credentials),
            Arc::clone(&client),
            Arc::clone(&local),
        ));
        let questionnaire = Arc::new(QuestionnaireStore::new(Arc::clone(&local)));
        let workflow = GatingWorkflow::new(
            Arc::clone(&client),
            Arc::clone(&session),
            Arc::clone(&questionnaire),
        );

        Ok(Self {
            config,
            local,
            credentials,
            client,
            session,
            questionnaire,
            workflow,
        })
    }

    /// Startup sequence: hook up the identity provider, then fetch the
    /// questionnaire definition and the entitlement snapshot concurrently.
    /// Both must succeed before the questionnaire is usable; either failure
    /// surfaces as one aggregated error.
    pub async fn initialize(&self) -> Result<(), AppError> {
        self.session.initialize().await;

        let guest_token = self.questionnaire.guest_token();
        let (questionnaire, status) = tokio::try_join!(
            self.client.get_questionnaire(),
            self.client.get_user_status(guest_token.as_deref()),
        )
        .map_err(|e| AppError::Unexpected(format!("Failed to initialize application: {}", e)))?;

        self.questionnaire.set_steps(questionnaire.steps);
        // A backend-minted guest token is adopted first-write-wins.
        self.questionnaire.adopt_status(&status);
        self.session.set_status(status);
        Ok(())
    }
}
