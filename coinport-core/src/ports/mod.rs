//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod auth_api;
mod market_api;
mod token_store;

pub use auth_api::AuthApi;
pub use market_api::{MarketDataApi, DEFAULT_KLINE_INTERVAL, DEFAULT_KLINE_LIMIT};
pub use token_store::TokenStore;
