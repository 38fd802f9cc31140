// src/store/questionnaire.rs

use crate::models::questionnaire::{
    AnswerValue, FormAnswers, FormProgress, QuestionnaireStep,
};
use crate::models::session::SessionStatus;
use crate::storage::LocalStore;
use std::sync::{Arc, RwLock};

/// Holds the step definitions, the accumulated answers, the current step
/// pointer and the guest token. Answers, pointer and token are persisted
/// through the `LocalStore` so they survive restarts.
pub struct QuestionnaireStore {
    steps: RwLock<Vec<QuestionnaireStep>>,
    answers: RwLock<FormAnswers>,
    current_step: RwLock<usize>,
    guest_token: RwLock<Option<String>>,
    local: Arc<LocalStore>,
}

impl QuestionnaireStore {
    /// Seeds answers, step pointer and guest token from persisted state.
    pub fn new(local: Arc<LocalStore>) -> Self {
        let persisted = local.snapshot();
        Self {
            steps: RwLock::new(Vec::new()),
            answers: RwLock::new(persisted.form_answers),
            current_step: RwLock::new(persisted.current_step),
            guest_token: RwLock::new(persisted.guest_token),
            local,
        }
    }

    pub fn steps(&self) -> Vec<QuestionnaireStep> {
        self.steps.read().expect("steps lock poisoned").clone()
    }

    pub fn set_steps(&self, steps: Vec<QuestionnaireStep>) {
        *self.steps.write().expect("steps lock poisoned") = steps;
    }

    pub fn answers(&self) -> FormAnswers {
        self.answers.read().expect("answers lock poisoned").clone()
    }

    /// Replaces the whole answer mapping.
    pub fn set_answers(&self, answers: FormAnswers) {
        *self.answers.write().expect("answers lock poisoned") = answers;
        self.persist();
    }

    /// Merge-by-key replacement; keys absent from `incoming` are kept.
    pub fn merge_answers(&self, incoming: FormAnswers) {
        self.answers
            .write()
            .expect("answers lock poisoned")
            .merge(incoming);
        self.persist();
    }

    /// Updates a single answer, leaving all other keys unchanged.
    pub fn update_answer(&self, key: impl Into<String>, value: AnswerValue) {
        self.answers
            .write()
            .expect("answers lock poisoned")
            .set(key, value);
        self.persist();
    }

    pub fn current_step_index(&self) -> usize {
        *self.current_step.read().expect("step lock poisoned")
    }

    /// Bounds (0 <= index < step count) are the caller's responsibility.
    pub fn set_current_step(&self, index: usize) {
        *self.current_step.write().expect("step lock poisoned") = index;
        self.persist();
    }

    pub fn guest_token(&self) -> Option<String> {
        self.guest_token.read().expect("token lock poisoned").clone()
    }

    /// First-write-wins: the token identifies a single anonymous lineage
    /// and must never be overwritten once established. A later token from
    /// the backend is ignored.
    pub fn set_guest_token(&self, token: impl Into<String>) {
        let token = token.into();
        {
            let mut current = self.guest_token.write().expect("token lock poisoned");
            if current.is_some() {
                tracing::debug!("Ignoring incoming guest token, one is already established");
                return;
            }
            *current = Some(token.clone());
        }
        if let Err(e) = self.local.update(|state| state.guest_token = Some(token)) {
            tracing::warn!("Failed to persist guest token: {}", e);
        }
    }

    /// Adopts the guest token echoed inside an entitlement snapshot, if any.
    pub fn adopt_status(&self, status: &SessionStatus) {
        if let SessionStatus::Guest {
            guest_token: Some(token),
            ..
        } = status
        {
            self.set_guest_token(token.clone());
        }
    }

    /// Clears answers and resets the pointer. The guest token is retained:
    /// resetting the form does not start a new anonymous lineage.
    pub fn reset(&self) {
        self.answers.write().expect("answers lock poisoned").clear();
        *self.current_step.write().expect("step lock poisoned") = 0;
        self.persist();
    }

    /// The step whose declared `step_number` equals index + 1, if any.
    pub fn current_step(&self) -> Option<QuestionnaireStep> {
        let index = self.current_step_index();
        self.steps
            .read()
            .expect("steps lock poisoned")
            .iter()
            .find(|step| step.step_number == index + 1)
            .cloned()
    }

    /// Cursor position plus the required-answer validity of the current
    /// step. A step with no definition (index out of range) is invalid.
    pub fn progress(&self) -> FormProgress {
        let steps = self.steps.read().expect("steps lock poisoned");
        let answers = self.answers.read().expect("answers lock poisoned");
        let current = self.current_step_index();

        let is_valid = steps
            .iter()
            .find(|step| step.step_number == current + 1)
            .is_some_and(|step| {
                step.questions
                    .iter()
                    .filter(|q| q.is_required)
                    .all(|q| answers.has_answer(&q.question_key))
            });

        FormProgress {
            current,
            total: steps.len(),
            is_valid,
        }
    }

    fn persist(&self) {
        let answers = self.answers.read().expect("answers lock poisoned").clone();
        let current_step = self.current_step_index();
        if let Err(e) = self.local.update(|state| {
            state.form_answers = answers;
            state.current_step = current_step;
        }) {
            tracing::warn!("Failed to persist questionnaire state: {}", e);
        }
    }
}
