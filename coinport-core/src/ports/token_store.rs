//! Durable storage for the bearer token

use crate::domain::result::Result;

/// Persists exactly one value: the current bearer token
pub trait TokenStore: Send + Sync {
    /// Stored token, if any
    fn load(&self) -> Result<Option<String>>;

    /// Replace the stored token
    fn save(&self, token: &str) -> Result<()>;

    /// Remove the stored token; clearing an empty store is not an error
    fn clear(&self) -> Result<()>;
}
