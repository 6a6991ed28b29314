//! Authentication payloads and the client-side session

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::user::{ProfileType, User};

/// Body of `POST /api/v1/auth`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginData {
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/v1/auth/signup`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupData {
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
    pub profile_type: ProfileType,
}

/// Login / signup response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: String,
    pub user: User,
    pub token: String,
}

/// `{ "user": ... }` wrapper returned by `/api/v1/user/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: User,
}

/// Plain acknowledgement returned by the verification endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// The three identity documents, all required for submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSet {
    pub front: PathBuf,
    pub back: PathBuf,
    pub selfie: PathBuf,
}

impl DocumentSet {
    /// Files in the order the backend expects them
    pub fn files(&self) -> [&PathBuf; 3] {
        [&self.front, &self.back, &self.selfie]
    }
}

/// An authenticated session: bearer token plus the cached user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl From<AuthResponse> for Session {
    fn from(response: AuthResponse) -> Self {
        Self {
            token: response.token,
            user: response.user,
        }
    }
}
