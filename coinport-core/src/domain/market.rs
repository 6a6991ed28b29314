//! Market data models
//!
//! Shapes returned by the `/api/binance/*` proxy. Prices travel as strings
//! and are parsed on demand.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    /// Strictly positive change is up, everything else down
    pub fn from_change_percent(change_percent: &str) -> Self {
        match Decimal::from_str(change_percent.trim()) {
            Ok(d) if d > Decimal::ZERO => Trend::Up,
            _ => Trend::Down,
        }
    }
}

/// 24h ticker for a trading pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingPair {
    pub symbol: String,
    #[serde(default)]
    pub price: String,
    pub price_change: String,
    pub price_change_percent: String,
    pub weighted_avg_price: String,
    pub prev_close_price: String,
    pub last_price: String,
    pub last_qty: String,
    pub bid_price: String,
    pub ask_price: String,
    pub open_price: String,
    pub high_price: String,
    pub low_price: String,
    pub volume: String,
    pub quote_volume: String,
    pub open_time: i64,
    pub close_time: i64,
    pub first_id: i64,
    pub last_id: i64,
    pub count: i64,
}

impl TradingPair {
    pub fn last_price(&self) -> Option<Decimal> {
        parse_decimal(&self.last_price)
    }

    pub fn trend(&self) -> Trend {
        Trend::from_change_percent(&self.price_change_percent)
    }

    /// Whether this pair quotes the given currency code (e.g. `ETH` in `ETHUSDT`)
    pub fn involves(&self, currency: &str) -> bool {
        !currency.is_empty() && self.symbol.contains(currency)
    }
}

/// Display card on the landing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoCard {
    pub symbol: String,
    pub name: String,
    pub price: String,
    pub change: String,
    pub change_percent: String,
    pub trend: Trend,
}

impl CryptoCard {
    pub fn price(&self) -> Option<Decimal> {
        parse_decimal(&self.price)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoCardsResponse {
    pub cards: Vec<CryptoCard>,
    #[serde(default)]
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeSummaryPair {
    pub symbol: String,
    pub price: String,
    #[serde(rename = "change24h")]
    pub change_24h: String,
    #[serde(rename = "changePercent24h")]
    pub change_percent_24h: String,
    pub trend: Trend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeData {
    pub trading_pairs: Vec<ExchangeSummaryPair>,
    #[serde(default)]
    pub timestamp: i64,
}

/// Spot price from `/price/:symbol`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub symbol: String,
    pub price: String,
    #[serde(default)]
    pub time: i64,
}

/// Raw kline rows; the proxy forwards Binance's positional arrays untouched
pub type Kline = serde_json::Value;

/// Parse a decimal price string, tolerating surrounding whitespace
pub fn parse_decimal(value: &str) -> Option<Decimal> {
    Decimal::from_str(value.trim())
        .or_else(|_| Decimal::from_scientific(value.trim()))
        .ok()
}

fn card(symbol: &str, name: &str, price: &str, change: &str, pct: &str, trend: Trend) -> CryptoCard {
    CryptoCard {
        symbol: symbol.to_string(),
        name: name.to_string(),
        price: price.to_string(),
        change: change.to_string(),
        change_percent: pct.to_string(),
        trend,
    }
}

/// Sample cards shown when the market-data API is unavailable
pub fn fallback_cards() -> Vec<CryptoCard> {
    vec![
        card("BTC", "Bitcoin", "121432.43", "-2839.59", "-2.29", Trend::Down),
        card("ETH", "Ethereum", "4441.28", "-245.08", "-5.23", Trend::Down),
        card("LTC", "Litecoin", "78.45", "2.15", "2.82", Trend::Up),
        card("DOGE", "Dogecoin", "0.1234", "0.0023", "1.90", Trend::Up),
    ]
}

struct PairSeed {
    symbol: &'static str,
    last: &'static str,
    change: &'static str,
    pct: &'static str,
    weighted: &'static str,
    open: &'static str,
    last_qty: &'static str,
    bid: &'static str,
    high: &'static str,
    low: &'static str,
    volume: &'static str,
    quote_volume: &'static str,
    first_id: i64,
}

impl PairSeed {
    fn into_pair(self) -> TradingPair {
        TradingPair {
            symbol: self.symbol.to_string(),
            price: self.last.to_string(),
            price_change: self.change.to_string(),
            price_change_percent: self.pct.to_string(),
            weighted_avg_price: self.weighted.to_string(),
            prev_close_price: self.open.to_string(),
            last_price: self.last.to_string(),
            last_qty: self.last_qty.to_string(),
            bid_price: self.bid.to_string(),
            ask_price: self.last.to_string(),
            open_price: self.open.to_string(),
            high_price: self.high.to_string(),
            low_price: self.low.to_string(),
            volume: self.volume.to_string(),
            quote_volume: self.quote_volume.to_string(),
            open_time: 1_640_995_200_000,
            close_time: 1_641_081_600_000,
            first_id: self.first_id,
            last_id: self.first_id + 1_000_000,
            count: 1_000_000,
        }
    }
}

/// Sample pairs shown when the market-data API is unavailable
pub fn fallback_pairs() -> Vec<TradingPair> {
    [
        PairSeed {
            symbol: "BTCUSDT",
            last: "121432.43",
            change: "-2839.59",
            pct: "-2.29",
            weighted: "122000.00",
            open: "124271.02",
            last_qty: "0.001",
            bid: "121432.42",
            high: "125000.00",
            low: "120000.00",
            volume: "12345.67",
            quote_volume: "1500000000.00",
            first_id: 1_000_000,
        },
        PairSeed {
            symbol: "ETHUSDT",
            last: "4441.28",
            change: "-245.08",
            pct: "-5.23",
            weighted: "4500.00",
            open: "4686.36",
            last_qty: "0.1",
            bid: "4441.27",
            high: "4700.00",
            low: "4400.00",
            volume: "98765.43",
            quote_volume: "450000000.00",
            first_id: 2_000_000,
        },
        PairSeed {
            symbol: "LTCUSDT",
            last: "78.45",
            change: "2.15",
            pct: "2.82",
            weighted: "77.00",
            open: "76.30",
            last_qty: "1.0",
            bid: "78.44",
            high: "79.00",
            low: "75.00",
            volume: "54321.09",
            quote_volume: "4200000.00",
            first_id: 3_000_000,
        },
        PairSeed {
            symbol: "DOGEUSDT",
            last: "0.1234",
            change: "0.0023",
            pct: "1.90",
            weighted: "0.1210",
            open: "0.1211",
            last_qty: "1000.0",
            bid: "0.1233",
            high: "0.1250",
            low: "0.1200",
            volume: "123456789.0",
            quote_volume: "15000000.00",
            first_id: 4_000_000,
        },
    ]
    .into_iter()
    .map(PairSeed::into_pair)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_cards_are_the_four_majors() {
        let symbols: Vec<_> = fallback_cards().into_iter().map(|c| c.symbol).collect();
        assert_eq!(symbols, vec!["BTC", "ETH", "LTC", "DOGE"]);
    }

    #[test]
    fn test_fallback_pairs_match_cards() {
        let pairs = fallback_pairs();
        let cards = fallback_cards();
        assert_eq!(pairs.len(), 4);
        for (pair, card) in pairs.iter().zip(cards.iter()) {
            assert!(pair.symbol.starts_with(&card.symbol));
            assert_eq!(pair.last_price, card.price);
            assert_eq!(pair.trend(), card.trend);
        }
    }

    #[test]
    fn test_trading_pair_wire_format() {
        let json = r#"{
            "symbol": "BTCUSDT", "price": "100.5", "priceChange": "-1.0",
            "priceChangePercent": "-0.99", "weightedAvgPrice": "100.0",
            "prevClosePrice": "101.5", "lastPrice": "100.5", "lastQty": "0.01",
            "bidPrice": "100.4", "askPrice": "100.5", "openPrice": "101.5",
            "highPrice": "102.0", "lowPrice": "99.0", "volume": "10",
            "quoteVolume": "1005", "openTime": 1, "closeTime": 2,
            "firstId": 3, "lastId": 4, "count": 5
        }"#;
        let pair: TradingPair = serde_json::from_str(json).unwrap();
        assert_eq!(pair.last_price(), Some(Decimal::new(1005, 1)));
        assert_eq!(pair.trend(), Trend::Down);
        assert!(pair.involves("BTC"));
        assert!(!pair.involves(""));
    }

    #[test]
    fn test_trend_from_change_percent() {
        assert_eq!(Trend::from_change_percent("2.82"), Trend::Up);
        assert_eq!(Trend::from_change_percent("0"), Trend::Down);
        assert_eq!(Trend::from_change_percent("garbage"), Trend::Down);
    }

    #[test]
    fn test_exchange_data_wire_format() {
        let json = r#"{"tradingPairs":[{"symbol":"ETHUSDT","price":"4441.28","change24h":"-245.08","changePercent24h":"-5.23","trend":"down"}],"timestamp":1700000000000}"#;
        let data: ExchangeData = serde_json::from_str(json).unwrap();
        assert_eq!(data.trading_pairs[0].change_percent_24h, "-5.23");
        assert_eq!(data.trading_pairs[0].trend, Trend::Down);
    }
}
