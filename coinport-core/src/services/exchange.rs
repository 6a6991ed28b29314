//! Exchange service - quotes from the popular-pairs rates

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::result::{Error, Result};
use crate::domain::{ExchangeForm, TradingPair};
use crate::ports::MarketDataApi;

/// A calculated exchange, ready for display
#[derive(Debug, Clone, Serialize)]
pub struct ExchangeQuote {
    pub form: ExchangeForm,
    pub from_total_usd: Decimal,
    pub to_total_usd: Decimal,
}

impl ExchangeQuote {
    fn from_form(form: ExchangeForm, rates: &[TradingPair]) -> Self {
        Self {
            from_total_usd: form.from_total(rates),
            to_total_usd: form.to_total(rates),
            form,
        }
    }

    /// Flip both sides, keeping the amounts already shown
    pub fn swapped(mut self, rates: &[TradingPair]) -> Self {
        self.form.swap();
        Self::from_form(self.form, rates)
    }
}

pub struct ExchangeService {
    api: Arc<dyn MarketDataApi>,
}

impl ExchangeService {
    pub fn new(api: Arc<dyn MarketDataApi>) -> Self {
        Self { api }
    }

    /// Popular pairs used as the rate table
    pub fn load_rates(&self) -> Result<Vec<TradingPair>> {
        self.api.popular_pairs().map_err(|e| {
            warn!(error = %e, "failed to load exchange rates");
            Error::Other("Failed to load exchange rates".to_string())
        })
    }

    /// Fill in the receiving side of `form` against `rates`
    pub fn quote_with(&self, mut form: ExchangeForm, rates: &[TradingPair]) -> Result<ExchangeQuote> {
        let amount = form.calculate(rates)?;
        debug!(
            from = %form.from_currency,
            to = %form.to_currency,
            %amount,
            "exchange calculated"
        );
        Ok(ExchangeQuote::from_form(form, rates))
    }

    /// Load rates and quote in one go
    pub fn quote(&self, form: ExchangeForm) -> Result<ExchangeQuote> {
        let rates = self.load_rates()?;
        self.quote_with(form, &rates)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::domain::market::fallback_pairs;
    use crate::domain::{CryptoCardsResponse, ExchangeData, Kline, PriceQuote};

    struct Rates(Option<Vec<TradingPair>>);

    impl MarketDataApi for Rates {
        fn crypto_cards(&self) -> Result<CryptoCardsResponse> {
            unreachable!()
        }

        fn trading_pairs(&self) -> Result<Vec<TradingPair>> {
            unreachable!()
        }

        fn popular_pairs(&self) -> Result<Vec<TradingPair>> {
            self.0
                .clone()
                .ok_or_else(|| Error::Network("connection refused".into()))
        }

        fn exchange_data(&self) -> Result<ExchangeData> {
            unreachable!()
        }

        fn trading_pair(&self, _: &str) -> Result<TradingPair> {
            unreachable!()
        }

        fn current_price(&self, _: &str) -> Result<PriceQuote> {
            unreachable!()
        }

        fn klines(&self, _: &str, _: &str, _: u32) -> Result<Vec<Kline>> {
            unreachable!()
        }
    }

    #[test]
    fn test_quote_eth_to_btc() {
        let service = ExchangeService::new(Arc::new(Rates(Some(fallback_pairs()))));
        let quote = service.quote(ExchangeForm::new("1", "eth", "btc")).unwrap();

        let amount = Decimal::from_str(&quote.form.to_amount).unwrap();
        let expected = Decimal::from_str("0.03657").unwrap();
        assert!((amount - expected).abs() < Decimal::from_str("0.0001").unwrap());
        assert_eq!(quote.from_total_usd, Decimal::from_str("4441.28").unwrap());
    }

    #[test]
    fn test_swapped_quote_keeps_amounts() {
        let rates = fallback_pairs();
        let service = ExchangeService::new(Arc::new(Rates(Some(rates.clone()))));
        let quote = service
            .quote_with(ExchangeForm::new("2", "ETH", "BTC"), &rates)
            .unwrap();
        let received = quote.form.to_amount.clone();

        let swapped = quote.swapped(&rates);
        assert_eq!(swapped.form.from_currency, "BTC");
        assert_eq!(swapped.form.to_currency, "ETH");
        assert_eq!(swapped.form.from_amount, received);
        assert_eq!(swapped.form.to_amount, "2");
        assert_eq!(swapped.to_total_usd, Decimal::from_str("8882.56").unwrap());
    }

    #[test]
    fn test_rates_failure_message() {
        let service = ExchangeService::new(Arc::new(Rates(None)));
        let err = service.quote(ExchangeForm::default()).unwrap_err();
        assert_eq!(err.to_string(), "Failed to load exchange rates");
    }

    #[test]
    fn test_unknown_currency() {
        let service = ExchangeService::new(Arc::new(Rates(Some(fallback_pairs()))));
        let err = service.quote(ExchangeForm::new("1", "XRP", "BTC")).unwrap_err();
        assert_eq!(err.to_string(), "Currency pair not found");
    }

    #[test]
    fn test_invalid_amount() {
        let service = ExchangeService::new(Arc::new(Rates(Some(fallback_pairs()))));
        let err = service.quote(ExchangeForm::new("-3", "ETH", "BTC")).unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid amount");
    }
}
