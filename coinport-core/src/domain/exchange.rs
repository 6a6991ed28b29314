//! Exchange calculator
//!
//! Converts an amount between two currencies through their USDT spot
//! prices. Nothing is traded: the result is only displayed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::market::{parse_decimal, TradingPair};
use super::result::{Error, Result};

/// Decimals kept in a converted amount
pub const AMOUNT_SCALE: u32 = 6;
/// Decimals kept in a USD total
pub const TOTAL_SCALE: u32 = 2;

/// First pair whose symbol contains the currency code
pub fn find_pair<'a>(pairs: &'a [TradingPair], currency: &str) -> Option<&'a TradingPair> {
    pairs.iter().find(|pair| pair.involves(currency))
}

fn parse_amount(amount: &str) -> Option<Decimal> {
    parse_decimal(amount).filter(|value| *value > Decimal::ZERO)
}

/// Convert `amount` of `from` into `to`
pub fn convert(amount: &str, from: &str, to: &str, pairs: &[TradingPair]) -> Result<Decimal> {
    let amount =
        parse_amount(amount).ok_or_else(|| Error::validation("Please enter a valid amount"))?;

    let (from_pair, to_pair) = match (find_pair(pairs, from), find_pair(pairs, to)) {
        (Some(f), Some(t)) => (f, t),
        _ => return Err(Error::validation("Currency pair not found")),
    };

    let from_price = from_pair
        .last_price()
        .ok_or_else(|| Error::validation(format!("Invalid price for {}", from_pair.symbol)))?;
    let to_price = to_pair
        .last_price()
        .filter(|p| !p.is_zero())
        .ok_or_else(|| Error::validation(format!("Invalid price for {}", to_pair.symbol)))?;

    let rate = from_price
        .checked_div(to_price)
        .ok_or_else(|| Error::validation("Failed to calculate exchange rate"))?;
    let converted = amount
        .checked_mul(rate)
        .ok_or_else(|| Error::validation("Failed to calculate exchange rate"))?;

    Ok(converted.round_dp(AMOUNT_SCALE))
}

/// USD value of `amount` of `currency`; zero when unknown
pub fn total_value(amount: &str, currency: &str, pairs: &[TradingPair]) -> Decimal {
    let total = find_pair(pairs, currency)
        .and_then(TradingPair::last_price)
        .zip(parse_decimal(amount))
        .and_then(|(price, amount)| amount.checked_mul(price))
        .unwrap_or(Decimal::ZERO);

    let mut rounded = total.round_dp(TOTAL_SCALE);
    rounded.rescale(TOTAL_SCALE);
    rounded
}

/// Both sides of the exchange widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeForm {
    pub from_amount: String,
    pub from_currency: String,
    pub to_amount: String,
    pub to_currency: String,
}

impl Default for ExchangeForm {
    fn default() -> Self {
        Self {
            from_amount: "5273.35".to_string(),
            from_currency: "ETH".to_string(),
            to_amount: "0.2271".to_string(),
            to_currency: "BTC".to_string(),
        }
    }
}

impl ExchangeForm {
    pub fn new(amount: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from_amount: amount.into(),
            from_currency: from.into().to_uppercase(),
            to_amount: String::new(),
            to_currency: to.into().to_uppercase(),
        }
    }

    /// Recompute the receiving side; on error the form is left untouched
    pub fn calculate(&mut self, pairs: &[TradingPair]) -> Result<Decimal> {
        let converted = convert(&self.from_amount, &self.from_currency, &self.to_currency, pairs)?;
        self.to_amount = converted.to_string();
        Ok(converted)
    }

    /// Swap currencies and amounts
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from_currency, &mut self.to_currency);
        std::mem::swap(&mut self.from_amount, &mut self.to_amount);
    }

    pub fn from_total(&self, pairs: &[TradingPair]) -> Decimal {
        total_value(&self.from_amount, &self.from_currency, pairs)
    }

    pub fn to_total(&self, pairs: &[TradingPair]) -> Decimal {
        total_value(&self.to_amount, &self.to_currency, pairs)
    }
}
