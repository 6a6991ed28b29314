//! Verification service - step actions of the profile wizard

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::forms::{validate_code, DocumentSelection};
use crate::domain::result::{Error, Result};
use crate::domain::{MessageResponse, User, VerificationStep, VerificationWizard};
use crate::ports::AuthApi;

/// Runs the wizard actions and keeps the local step in sync
pub struct VerificationService {
    api: Arc<dyn AuthApi>,
    wizard: VerificationWizard,
}

impl VerificationService {
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        Self {
            api,
            wizard: VerificationWizard::default(),
        }
    }

    pub fn wizard(&self) -> &VerificationWizard {
        &self.wizard
    }

    pub fn current_step(&self) -> VerificationStep {
        self.wizard.current()
    }

    /// Re-derive the step after the user object changed
    pub fn sync(&mut self, user: Option<&User>) -> VerificationStep {
        self.wizard.sync(user)
    }

    fn ensure_step(&self, expected: VerificationStep) -> Result<()> {
        let current = self.wizard.current();
        if current != expected {
            return Err(Error::validation(format!(
                "This action belongs to the {} step, but verification is at the {} step",
                expected.title(),
                current.title()
            )));
        }
        Ok(())
    }

    /// Submit the emailed code; the wizard advances on success
    pub fn verify_email(&mut self, user: &User, code: &str) -> Result<MessageResponse> {
        self.ensure_step(VerificationStep::EmailVerification)?;
        let code = validate_code(code)?;

        let response = self.api.verify_email(&user.email, &code).inspect_err(|e| {
            warn!(user_id = user.id, error = %e, "email verification failed");
        })?;

        let step = self.wizard.advance();
        info!(user_id = user.id, step = step.ordinal(), "email verified");
        Ok(response)
    }

    /// Ask the backend to send a new code; the step does not change
    pub fn resend_code(&self, user: &User) -> Result<MessageResponse> {
        self.ensure_step(VerificationStep::EmailVerification)?;
        let response = self.api.resend_verification_code(&user.email)?;
        info!(user_id = user.id, "verification code resent");
        Ok(response)
    }

    /// Upload front, back and selfie; the wizard advances on success
    pub fn upload_documents(
        &mut self,
        user: &User,
        selection: DocumentSelection,
    ) -> Result<MessageResponse> {
        self.ensure_step(VerificationStep::DocumentUpload)?;
        let documents = selection.validate()?;

        let response = self
            .api
            .upload_documents(&user.email, &documents)
            .inspect_err(|e| {
                warn!(user_id = user.id, error = %e, "document upload failed");
            })?;

        let step = self.wizard.advance();
        info!(user_id = user.id, step = step.ordinal(), "documents submitted");
        Ok(response)
    }
}
