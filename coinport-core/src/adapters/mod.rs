//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - reqwest blocking client for AuthApi and MarketDataApi
//! - JSON file (or memory) for TokenStore

pub mod http;
pub mod token_file;

#[cfg(test)]
pub mod mock_backend;
