//! Market-data port
//!
//! Read-only access to the `/api/binance/*` proxy.

use crate::domain::result::Result;
use crate::domain::{CryptoCardsResponse, ExchangeData, Kline, PriceQuote, TradingPair};

/// Default kline interval and row count
pub const DEFAULT_KLINE_INTERVAL: &str = "1h";
pub const DEFAULT_KLINE_LIMIT: u32 = 24;

/// Market-data provider trait
///
/// The MarketService uses this trait for snapshots and the poller; tests
/// substitute an in-memory implementation.
pub trait MarketDataApi: Send + Sync {
    fn crypto_cards(&self) -> Result<CryptoCardsResponse>;

    fn trading_pairs(&self) -> Result<Vec<TradingPair>>;

    fn popular_pairs(&self) -> Result<Vec<TradingPair>>;

    fn exchange_data(&self) -> Result<ExchangeData>;

    fn trading_pair(&self, symbol: &str) -> Result<TradingPair>;

    fn current_price(&self, symbol: &str) -> Result<PriceQuote>;

    fn klines(&self, symbol: &str, interval: &str, limit: u32) -> Result<Vec<Kline>>;
}
