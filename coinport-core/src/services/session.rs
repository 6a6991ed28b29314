//! Session store - bearer token and cached user
//!
//! `is_authenticated()` holds iff both token and user are present. Sign-in
//! writes the token store before updating memory.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::result::{Error, Result};
use crate::domain::{LoginData, Session, SignupData, User};
use crate::ports::{AuthApi, TokenStore};

pub struct SessionStore {
    api: Arc<dyn AuthApi>,
    tokens: Arc<dyn TokenStore>,
    token: Option<String>,
    user: Option<User>,
}

impl SessionStore {
    pub fn new(api: Arc<dyn AuthApi>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            tokens,
            token: None,
            user: None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// Current session, or an error naming the action that needs one
    pub fn require(&self, action: &str) -> Result<Session> {
        match (&self.token, &self.user) {
            (Some(token), Some(user)) => Ok(Session {
                token: token.clone(),
                user: user.clone(),
            }),
            _ => Err(Error::Unauthenticated(format!(
                "log in to {}. Run 'coinport login' first.",
                action
            ))),
        }
    }

    /// Rehydrate from the persisted token
    ///
    /// A stored token that the backend rejects is cleared, leaving the store
    /// signed out. Only token-store failures are returned as errors.
    pub fn restore(&mut self) -> Result<bool> {
        let Some(stored) = self.tokens.load()? else {
            return Ok(false);
        };

        self.token = Some(stored.clone());
        match self.api.current_user(&stored) {
            Ok(user) => {
                self.user = Some(user);
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "failed to restore session, clearing stored token");
                self.logout()?;
                Ok(false)
            }
        }
    }

    pub fn login(&mut self, credentials: &LoginData) -> Result<&User> {
        let response = self.api.login(credentials).inspect_err(|e| {
            warn!(error = %e, "login failed");
        })?;
        self.establish(response.into())
    }

    pub fn signup(&mut self, data: &SignupData) -> Result<&User> {
        let response = self.api.signup(data).inspect_err(|e| {
            warn!(error = %e, "signup failed");
        })?;
        self.establish(response.into())
    }

    fn establish(&mut self, session: Session) -> Result<&User> {
        self.tokens.save(&session.token)?;
        info!(user_id = session.user.id, "session established");
        self.token = Some(session.token);
        Ok(self.user.insert(session.user))
    }

    /// Clear memory first, then storage; memory is cleared even if storage fails
    pub fn logout(&mut self) -> Result<()> {
        self.token = None;
        self.user = None;
        self.tokens.clear()
    }

    /// Re-fetch the user; any failure signs the session out
    pub fn refresh_user(&mut self) -> Result<Option<&User>> {
        let Some(token) = self.token.clone() else {
            return Ok(None);
        };

        match self.api.current_user(&token) {
            Ok(user) => Ok(Some(self.user.insert(user))),
            Err(e) => {
                warn!(error = %e, "failed to refresh user, logging out");
                if let Err(clear_err) = self.logout() {
                    warn!(error = %clear_err, "failed to clear stored token");
                }
                Err(e)
            }
        }
    }
}
