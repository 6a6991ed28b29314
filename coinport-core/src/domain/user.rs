//! User domain model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::result::Error;

/// Account kind chosen at registration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileType {
    #[default]
    Personal,
    Company,
}

impl ProfileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileType::Personal => "personal",
            ProfileType::Company => "company",
        }
    }

    /// Badge text shown next to the user's name
    pub fn label(&self) -> &'static str {
        match self {
            ProfileType::Personal => "Personal",
            ProfileType::Company => "Corporate",
        }
    }
}

impl fmt::Display for ProfileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "personal" => Ok(ProfileType::Personal),
            "company" => Ok(ProfileType::Company),
            other => Err(Error::validation(format!(
                "Unknown profile type '{}'. Available: personal, company",
                other
            ))),
        }
    }
}

/// Timestamp as the backend sent it
///
/// Only presence matters for verification, so the raw text is kept and
/// parsed on demand for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// RFC 3339 or a plain `YYYY-MM-DD HH:MM:SS` (read as UTC)
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let raw = self.0.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(ts: DateTime<Utc>) -> Self {
        Timestamp(ts.to_rfc3339())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Null, missing and empty string all mean "not yet"
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) | Some(Value::Bool(false)) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(Timestamp(s)),
        Some(other) => Some(Timestamp(other.to_string())),
    })
}

/// Server-owned user record; the client only ever holds a cached copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub lastname: String,
    pub email: String,
    #[serde(default)]
    pub profile_type: ProfileType,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub email_verified_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub documents_submitted_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub documents_verified_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<Timestamp>,
}

impl User {
    /// Create an unverified personal user
    pub fn new(
        id: i64,
        name: impl Into<String>,
        lastname: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            lastname: lastname.into(),
            email: email.into(),
            profile_type: ProfileType::Personal,
            email_verified_at: None,
            documents_submitted_at: None,
            documents_verified_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.lastname).trim().to_string()
    }

    pub fn is_fully_verified(&self) -> bool {
        self.email_verified_at.is_some()
            && self.documents_submitted_at.is_some()
            && self.documents_verified_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::VerificationStep;

    #[test]
    fn test_user_creation() {
        let user = User::new(7, "Ivan", "Petrov", "ivan@example.com");
        assert_eq!(user.id, 7);
        assert_eq!(user.full_name(), "Ivan Petrov");
        assert_eq!(user.profile_type, ProfileType::Personal);
        assert!(!user.is_fully_verified());
    }

    #[test]
    fn test_deserialize_backend_payload() {
        let json = r#"{
            "id": 12,
            "name": "Anna",
            "lastname": "Smirnova",
            "email": "anna@example.com",
            "profile_type": "company",
            "email_verified_at": "2025-03-01T10:15:00.000000Z",
            "documents_verified_at": null,
            "created_at": "2025-02-28T09:00:00Z",
            "updated_at": "2025-03-01T10:15:00Z"
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.profile_type, ProfileType::Company);
        assert!(user.email_verified_at.is_some());
        assert!(user.documents_submitted_at.is_none());
        assert!(user.documents_verified_at.is_none());
    }

    #[test]
    fn test_database_style_timestamp_still_decodes() {
        let json = r#"{
            "id": 3,
            "name": "Oleg",
            "lastname": "Ivanov",
            "email": "oleg@example.com",
            "email_verified_at": "2025-01-15T12:00:00Z",
            "documents_submitted_at": "2025-01-16 09:30:00",
            "documents_verified_at": "",
            "created_at": "yesterday"
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(VerificationStep::for_user(&user), VerificationStep::Pending);

        let submitted = user.documents_submitted_at.as_ref().unwrap();
        assert_eq!(
            submitted.to_datetime(),
            Some(Utc.with_ymd_and_hms(2025, 1, 16, 9, 30, 0).unwrap())
        );
        assert!(user.documents_verified_at.is_none());

        let created = user.created_at.as_ref().unwrap();
        assert_eq!(created.as_str(), "yesterday");
        assert_eq!(created.to_datetime(), None);
    }

    #[test]
    fn test_timestamp_round_trips_through_session_cache() {
        let mut user = User::new(4, "Vera", "Orlova", "vera@example.com");
        user.email_verified_at = Some(Utc.with_ymd_and_hms(2025, 2, 1, 8, 0, 0).unwrap().into());

        let json = serde_json::to_string(&user).unwrap();
        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn test_profile_type_parse() {
        assert_eq!("Company".parse::<ProfileType>().unwrap(), ProfileType::Company);
        assert_eq!(" personal ".parse::<ProfileType>().unwrap(), ProfileType::Personal);
        assert!("enterprise".parse::<ProfileType>().is_err());
    }
}
