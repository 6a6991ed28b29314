//! Market service - snapshots with fallback data and the periodic poller
//!
//! A failed fetch never surfaces as an error here: the snapshot carries the
//! static sample dataset plus a warning for the caller to display.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::domain::market::{fallback_cards, fallback_pairs};
use crate::domain::result::{Error, Result};
use crate::domain::{CryptoCard, ExchangeData, Kline, PriceQuote, TradingPair};
use crate::ports::MarketDataApi;

/// Number of cards and pairs shown in the overview
pub const OVERVIEW_SIZE: usize = 4;

/// Items for one view, plus the warning shown when they are sample data
#[derive(Debug, Clone, Serialize)]
pub struct MarketSnapshot<T> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl<T> MarketSnapshot<T> {
    fn live(items: Vec<T>) -> Self {
        Self {
            items,
            warning: None,
            fetched_at: Utc::now(),
        }
    }

    fn fallback(items: Vec<T>, error: &Error) -> Self {
        Self {
            items,
            warning: Some(fallback_warning(error)),
            fetched_at: Utc::now(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.warning.is_some()
    }
}

pub fn fallback_warning(error: &Error) -> String {
    format!("API Error: {}. Showing sample data.", error)
}

/// One poll result: both overview lists
#[derive(Debug, Clone, Serialize)]
pub struct MarketUpdate {
    pub cards: MarketSnapshot<CryptoCard>,
    pub pairs: MarketSnapshot<TradingPair>,
}

pub struct MarketService {
    api: Arc<dyn MarketDataApi>,
}

impl MarketService {
    pub fn new(api: Arc<dyn MarketDataApi>) -> Self {
        Self { api }
    }

    /// Crypto cards, or the four sample cards on failure
    pub fn cards_snapshot(&self) -> MarketSnapshot<CryptoCard> {
        match self.api.crypto_cards() {
            Ok(response) => MarketSnapshot::live(response.cards),
            Err(e) => {
                warn!(error = %e, "crypto cards unavailable, using sample data");
                MarketSnapshot::fallback(fallback_cards(), &e)
            }
        }
    }

    /// First four popular pairs, or the four sample pairs on failure
    pub fn pairs_snapshot(&self) -> MarketSnapshot<TradingPair> {
        match self.api.popular_pairs() {
            Ok(mut pairs) => {
                pairs.truncate(OVERVIEW_SIZE);
                MarketSnapshot::live(pairs)
            }
            Err(e) => {
                warn!(error = %e, "popular pairs unavailable, using sample data");
                MarketSnapshot::fallback(fallback_pairs(), &e)
            }
        }
    }

    pub fn update(&self) -> MarketUpdate {
        MarketUpdate {
            cards: self.cards_snapshot(),
            pairs: self.pairs_snapshot(),
        }
    }

    pub fn trading_pairs(&self) -> Result<Vec<TradingPair>> {
        self.api.trading_pairs()
    }

    pub fn exchange_data(&self) -> Result<ExchangeData> {
        self.api.exchange_data()
    }

    pub fn trading_pair(&self, symbol: &str) -> Result<TradingPair> {
        self.api.trading_pair(&normalize_symbol(symbol))
    }

    pub fn current_price(&self, symbol: &str) -> Result<PriceQuote> {
        self.api.current_price(&normalize_symbol(symbol))
    }

    pub fn klines(&self, symbol: &str, interval: &str, limit: u32) -> Result<Vec<Kline>> {
        if limit == 0 {
            return Err(Error::validation("Limit must be greater than zero"));
        }
        self.api.klines(&normalize_symbol(symbol), interval, limit)
    }
}

fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Periodic refresh of the market overview
pub struct MarketPoller;

impl MarketPoller {
    /// Fetch now and then every `interval`, sending each update to `sink`
    ///
    /// Must be called from within a tokio runtime. Polling ends when the
    /// handle is stopped or dropped, or when the receiver goes away.
    pub fn spawn(
        service: Arc<MarketService>,
        interval: Duration,
        sink: mpsc::Sender<MarketUpdate>,
    ) -> PollerHandle {
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let svc = Arc::clone(&service);
                let update = match tokio::task::spawn_blocking(move || svc.update()).await {
                    Ok(update) => update,
                    Err(e) => {
                        warn!(error = %e, "market fetch task failed");
                        continue;
                    }
                };

                debug!(
                    cards = update.cards.items.len(),
                    pairs = update.pairs.items.len(),
                    "market update"
                );
                if sink.send(update).await.is_err() {
                    debug!("market update receiver closed, stopping poller");
                    break;
                }
            }
        });

        PollerHandle { task }
    }
}

/// Cancels the polling task when stopped or dropped
pub struct PollerHandle {
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn stop(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
