//! Client-side form validation
//!
//! Every check here runs before any request is sent. Messages are shown to
//! the user verbatim.

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

use super::auth::{DocumentSet, LoginData, SignupData};
use super::result::{Error, Result};
use super::user::ProfileType;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const VERIFICATION_CODE_LEN: usize = 6;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"))
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(self) -> Result<LoginData> {
        if is_blank(&self.email) || self.password.is_empty() {
            return Err(Error::validation("Please fill in all fields"));
        }
        Ok(LoginData {
            email: self.email.trim().to_string(),
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub profile_type: ProfileType,
}

impl SignupForm {
    pub fn validate(self) -> Result<SignupData> {
        if [&self.name, &self.lastname, &self.email].iter().any(|f| is_blank(f))
            || self.password.is_empty()
        {
            return Err(Error::validation("Please fill in all fields"));
        }
        if self.password != self.confirm_password {
            return Err(Error::validation("Passwords do not match"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        let email = self.email.trim().to_string();
        if !email_regex().is_match(&email) {
            return Err(Error::validation("Please enter a valid email address"));
        }

        Ok(SignupData {
            name: self.name.trim().to_string(),
            lastname: self.lastname.trim().to_string(),
            email,
            password: self.password,
            profile_type: self.profile_type,
        })
    }
}

/// Keep digits only, at most six of them (mirrors the code input field)
pub fn normalize_code(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_digit)
        .take(VERIFICATION_CODE_LEN)
        .collect()
}

/// Normalized six-digit code, or a validation error
pub fn validate_code(input: &str) -> Result<String> {
    let code = normalize_code(input);
    if code.len() != VERIFICATION_CODE_LEN {
        return Err(Error::validation("The code must contain 6 digits"));
    }
    Ok(code)
}

/// Documents picked so far; all three are required to submit
#[derive(Debug, Clone, Default)]
pub struct DocumentSelection {
    pub front: Option<PathBuf>,
    pub back: Option<PathBuf>,
    pub selfie: Option<PathBuf>,
}

impl DocumentSelection {
    pub fn is_complete(&self) -> bool {
        self.front.is_some() && self.back.is_some() && self.selfie.is_some()
    }

    pub fn validate(self) -> Result<DocumentSet> {
        match (self.front, self.back, self.selfie) {
            (Some(front), Some(back), Some(selfie)) => {
                for path in [&front, &back, &selfie] {
                    if !path.is_file() {
                        return Err(Error::validation(format!(
                            "Document not found: {}",
                            path.display()
                        )));
                    }
                }
                Ok(DocumentSet { front, back, selfie })
            }
            _ => Err(Error::validation("Please upload all three documents")),
        }
    }
}
