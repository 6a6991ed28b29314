//! Probe command - check connectivity to the market-data API

use anyhow::{bail, Result};
use colored::Colorize;

use coinport_core::OperationResult;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let report = output::with_spinner("Probing API...", || ctx.client.connectivity_report());

    if json {
        output::json(&report)?;
    } else {
        let base_url = ctx.client.base_url();
        if report.all_passed() {
            println!("{} {}", "API reachable:".green(), base_url);
        } else {
            println!("{} {}", "API unreachable:".red(), base_url);
        }

        let card_count = report
            .direct
            .data
            .as_ref()
            .and_then(|d| d.get("cards"))
            .and_then(|c| c.as_array())
            .map(|cards| format!("{} cards", cards.len()));
        print_check(
            "Direct fetch",
            report.direct.success,
            card_count,
            report.direct.error.as_deref(),
        );
        print_counted("Crypto cards", &report.crypto_cards, "cards");
        print_counted("Popular pairs", &report.popular_pairs, "pairs");
    }

    if !report.all_passed() {
        bail!("API probe failed");
    }
    Ok(())
}

fn print_counted(label: &str, result: &OperationResult<usize>, noun: &str) {
    let detail = result.data.map(|n| format!("{} {}", n, noun));
    print_check(label, result.success, detail, result.error.as_deref());
}

fn print_check(label: &str, passed: bool, detail: Option<String>, error: Option<&str>) {
    let mark = if passed { "✓".green() } else { "✗".red() };
    let text = if passed {
        detail.unwrap_or_default()
    } else {
        error.unwrap_or_default().to_string()
    };
    println!("  {} {:<14} {}", mark, label, text);
}
