//! Exchange command - convert an amount using current spot prices

use anyhow::Result;
use colored::Colorize;

use coinport_core::ExchangeForm;

use super::get_context;
use crate::output;

pub fn run(amount: Option<String>, from: String, to: String, swap: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let amount = amount.unwrap_or_else(|| ExchangeForm::default().from_amount);
    let form = ExchangeForm::new(amount, from, to);

    let rates = output::with_spinner("Loading exchange rates...", || {
        ctx.exchange_service.load_rates()
    })?;
    let mut quote = ctx.exchange_service.quote_with(form, &rates)?;
    if swap {
        quote = quote.swapped(&rates);
    }

    if json {
        return output::json(&quote);
    }

    let form = &quote.form;
    let mut table = output::create_table();
    table.set_header(vec!["", "Amount", "Currency", "Value (USD)"]);
    table.add_row(vec![
        "You send".to_string(),
        form.from_amount.clone(),
        form.from_currency.clone(),
        format!("${}", quote.from_total_usd),
    ]);
    table.add_row(vec![
        "You get".to_string(),
        form.to_amount.bold().to_string(),
        form.to_currency.clone(),
        format!("${}", quote.to_total_usd),
    ]);
    println!("{}", table);
    println!(
        "{}",
        "Estimate based on the latest spot prices. No order is placed.".dimmed()
    );
    Ok(())
}
