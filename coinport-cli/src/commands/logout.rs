//! Logout command - forget the stored session

use anyhow::Result;
use serde_json::json;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let mut ctx = get_context()?;
    ctx.session.logout()?;

    if json {
        return output::json(&json!({ "logged_out": true }));
    }
    output::success("Logged out.");
    Ok(())
}
