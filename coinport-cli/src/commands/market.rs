//! Market command - prices, pairs and live overview

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{TimeZone, Utc};
use clap::Subcommand;
use colored::Colorize;
use serde_json::Value as JsonValue;
use tokio::sync::mpsc;

use coinport_core::ports::{DEFAULT_KLINE_INTERVAL, DEFAULT_KLINE_LIMIT};
use coinport_core::services::{MarketPoller, MarketSnapshot, MarketUpdate};
use coinport_core::{CryptoCard, TradingPair};

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum MarketCommands {
    /// Show the crypto price cards
    Cards {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show popular trading pairs
    Pairs {
        /// List every trading pair instead of the top four popular ones
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the 24h exchange summary
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the 24h ticker of one pair
    Pair {
        /// Pair symbol, e.g. BTCUSDT
        symbol: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the current price of one pair
    Price {
        /// Pair symbol, e.g. BTCUSDT
        symbol: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show candlesticks for one pair
    Klines {
        /// Pair symbol, e.g. BTCUSDT
        symbol: String,
        /// Candle interval
        #[arg(long, default_value = DEFAULT_KLINE_INTERVAL)]
        interval: String,
        /// Number of candles
        #[arg(long, default_value_t = DEFAULT_KLINE_LIMIT)]
        limit: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Refresh cards and pairs periodically until interrupted
    Watch {
        /// Seconds between refreshes (defaults to pollIntervalSecs)
        #[arg(long)]
        interval: Option<u64>,
        /// Stop after this many refreshes
        #[arg(long)]
        count: Option<usize>,
        /// Output one JSON object per refresh
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: MarketCommands) -> Result<()> {
    let ctx = get_context()?;
    let market = &ctx.market_service;

    match command {
        MarketCommands::Cards { json } => {
            let snapshot = output::with_spinner("Loading prices...", || market.cards_snapshot());
            if json {
                return output::json(&snapshot);
            }
            print_warning(&snapshot);
            print_cards(&snapshot.items);
        }
        MarketCommands::Pairs { all, json } => {
            if all {
                let pairs = output::with_spinner("Loading pairs...", || market.trading_pairs())?;
                if json {
                    return output::json(&pairs);
                }
                print_pairs(&pairs);
            } else {
                let snapshot = output::with_spinner("Loading pairs...", || market.pairs_snapshot());
                if json {
                    return output::json(&snapshot);
                }
                print_warning(&snapshot);
                print_pairs(&snapshot.items);
            }
        }
        MarketCommands::Summary { json } => {
            let data = output::with_spinner("Loading summary...", || market.exchange_data())?;
            if json {
                return output::json(&data);
            }
            let mut table = output::create_table();
            table.set_header(vec!["Pair", "Price", "24h", "24h %"]);
            for pair in &data.trading_pairs {
                table.add_row(vec![
                    pair.symbol.clone(),
                    pair.price.clone(),
                    output::trend(&pair.change_24h, pair.trend).to_string(),
                    output::trend(&format!("{}%", pair.change_percent_24h), pair.trend).to_string(),
                ]);
            }
            println!("{}", table);
            println!("As of {}", format_millis(data.timestamp));
        }
        MarketCommands::Pair { symbol, json } => {
            let pair = output::with_spinner("Loading pair...", || market.trading_pair(&symbol))?;
            if json {
                return output::json(&pair);
            }
            print_pair_detail(&pair);
        }
        MarketCommands::Price { symbol, json } => {
            let quote = output::with_spinner("Loading price...", || market.current_price(&symbol))?;
            if json {
                return output::json(&quote);
            }
            println!("{} {}", quote.symbol.bold(), quote.price);
        }
        MarketCommands::Klines {
            symbol,
            interval,
            limit,
            json,
        } => {
            let klines = output::with_spinner("Loading candles...", || {
                market.klines(&symbol, &interval, limit)
            })?;
            if json {
                return output::json(&klines);
            }
            print_klines(&klines);
        }
        MarketCommands::Watch {
            interval,
            count,
            json,
        } => {
            let every = interval
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(ctx.config.poll_interval);
            watch(Arc::clone(&ctx.market_service), every, count, json)?;
        }
    }

    Ok(())
}

fn watch(
    service: Arc<coinport_core::services::MarketService>,
    every: Duration,
    count: Option<usize>,
    json: bool,
) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let (tx, mut rx) = mpsc::channel::<MarketUpdate>(4);
        let poller = MarketPoller::spawn(service, every, tx);

        if !json {
            output::info(&format!(
                "Refreshing every {}s. Press Ctrl+C to stop.",
                every.as_secs()
            ));
        }

        let mut received = 0usize;
        loop {
            tokio::select! {
                update = rx.recv() => {
                    let Some(update) = update else { break };
                    render_update(&update, json)?;
                    received += 1;
                    if count.is_some_and(|max| received >= max) {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => break,
            }
        }

        poller.stop();
        Ok::<(), anyhow::Error>(())
    })
}

fn render_update(update: &MarketUpdate, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(update)?);
        return Ok(());
    }
    println!();
    println!(
        "{}",
        format!("Market overview at {}", output::format_time(update.cards.fetched_at)).bold()
    );
    print_warning(&update.cards);
    print_cards(&update.cards.items);
    print_pairs(&update.pairs.items);
    Ok(())
}

fn print_warning<T>(snapshot: &MarketSnapshot<T>) {
    if let Some(warning) = &snapshot.warning {
        output::warning(warning);
    }
}

fn print_cards(cards: &[CryptoCard]) {
    let mut table = output::create_table();
    table.set_header(vec!["Coin", "Name", "Price", "Change", "Change %"]);
    for card in cards {
        table.add_row(vec![
            card.symbol.clone(),
            card.name.clone(),
            format!("${}", card.price),
            output::trend(&card.change, card.trend).to_string(),
            output::trend(&format!("{}%", card.change_percent), card.trend).to_string(),
        ]);
    }
    println!("{}", table);
}

fn print_pairs(pairs: &[TradingPair]) {
    let mut table = output::create_table();
    table.set_header(vec!["Pair", "Last", "24h %", "High", "Low", "Volume"]);
    for pair in pairs {
        let trend = pair.trend();
        table.add_row(vec![
            pair.symbol.clone(),
            pair.last_price.clone(),
            output::trend(&format!("{}%", pair.price_change_percent), trend).to_string(),
            pair.high_price.clone(),
            pair.low_price.clone(),
            pair.volume.clone(),
        ]);
    }
    println!("{}", table);
}

fn print_pair_detail(pair: &TradingPair) {
    let trend = pair.trend();
    let mut table = output::create_table();
    table.set_header(vec![pair.symbol.as_str(), ""]);
    let rows = [
        ("Last price", pair.last_price.clone()),
        ("Bid / Ask", format!("{} / {}", pair.bid_price, pair.ask_price)),
        (
            "24h change",
            output::trend(
                &format!("{} ({}%)", pair.price_change, pair.price_change_percent),
                trend,
            )
            .to_string(),
        ),
        ("Open", pair.open_price.clone()),
        ("High", pair.high_price.clone()),
        ("Low", pair.low_price.clone()),
        ("Weighted avg", pair.weighted_avg_price.clone()),
        ("Volume", pair.volume.clone()),
        ("Quote volume", pair.quote_volume.clone()),
        ("Trades", pair.count.to_string()),
        ("Window", format!("{} → {}", format_millis(pair.open_time), format_millis(pair.close_time))),
    ];
    for (label, value) in rows {
        table.add_row(vec![label.to_string(), value]);
    }
    println!("{}", table);
}

fn print_klines(klines: &[JsonValue]) {
    let mut table = output::create_table();
    table.set_header(vec!["Open time", "Open", "High", "Low", "Close", "Volume"]);
    for row in klines {
        let Some(cols) = row.as_array() else {
            continue;
        };
        let open_time = cols
            .first()
            .and_then(JsonValue::as_i64)
            .map(format_millis)
            .unwrap_or_default();
        let mut cells = vec![open_time];
        cells.extend((1..=5).map(|i| cols.get(i).map(cell).unwrap_or_default()));
        table.add_row(cells);
    }
    println!("{}", table);
}

fn cell(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_millis(ms: i64) -> String {
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}
