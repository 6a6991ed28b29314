//! Account backend port
//!
//! Defines the interface for the authentication and verification endpoints
//! of the exchange backend.

use crate::domain::result::Result;
use crate::domain::{AuthResponse, DocumentSet, LoginData, MessageResponse, SignupData, User};

/// Authentication and verification backend
///
/// Implementations perform one request per call. They never retry and
/// never touch local session state; that belongs to the SessionStore.
pub trait AuthApi: Send + Sync {
    /// `POST /api/v1/auth`
    fn login(&self, credentials: &LoginData) -> Result<AuthResponse>;

    /// `POST /api/v1/auth/signup`
    fn signup(&self, data: &SignupData) -> Result<AuthResponse>;

    /// `GET /api/v1/user/me` with bearer authentication
    fn current_user(&self, token: &str) -> Result<User>;

    /// `POST /api/v1/auth/email/verify`
    fn verify_email(&self, email: &str, code: &str) -> Result<MessageResponse>;

    /// `POST /api/v1/auth/email/send`
    fn resend_verification_code(&self, email: &str) -> Result<MessageResponse>;

    /// `POST /api/v1/auth/documents` as multipart: `email` plus three `files`
    fn upload_documents(&self, email: &str, documents: &DocumentSet) -> Result<MessageResponse>;
}
