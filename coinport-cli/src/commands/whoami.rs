//! Whoami command - show the signed-in user

use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let mut ctx = get_context()?;
    let restored = output::with_spinner("Restoring session...", || ctx.restore_session())?;

    let user = match ctx.session.user() {
        Some(user) if restored => user,
        _ => {
            if json {
                return output::json(&json!({ "authenticated": false }));
            }
            println!("{}", "Not signed in. Run 'coinport login' first.".yellow());
            return Ok(());
        }
    };

    if json {
        return output::json(&json!({ "authenticated": true, "user": user }));
    }

    let mut table = output::create_table();
    table.add_row(vec!["Name".to_string(), user.full_name()]);
    table.add_row(vec!["Email".to_string(), user.email.clone()]);
    table.add_row(vec!["Profile".to_string(), user.profile_type.label().to_string()]);
    table.add_row(vec![
        "Verified".to_string(),
        if user.is_fully_verified() { "yes" } else { "no" }.to_string(),
    ]);
    table.add_row(vec!["Member since".to_string(), output::format_date(user.created_at.as_ref())]);
    println!("{}", table);
    Ok(())
}
