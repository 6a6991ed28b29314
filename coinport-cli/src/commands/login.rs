//! Login command - sign in and store the session token

use anyhow::{bail, Result};
use colored::Colorize;
use dialoguer::{Input, Password};
use serde_json::json;

use coinport_core::domain::forms::LoginForm;
use coinport_core::VerificationStep;

use super::{get_context, is_interactive};
use crate::output;

pub fn run(email: Option<String>, password: Option<String>, json: bool) -> Result<()> {
    let interactive = is_interactive() && !json;

    let email = match email {
        Some(e) => e,
        None if interactive => Input::new().with_prompt("Email").interact_text()?,
        None => bail!("Please fill in all fields"),
    };
    let password = match password {
        Some(p) => p,
        None if interactive => Password::new().with_prompt("Password").interact()?,
        None => bail!("Please fill in all fields"),
    };

    let credentials = LoginForm { email, password }.validate()?;

    let mut ctx = get_context()?;
    let user = output::with_spinner("Signing in...", || ctx.session.login(&credentials).cloned())?;
    let step = ctx.verification_service.sync(Some(&user));

    if json {
        return output::json(&json!({
            "user": user,
            "verification_step": step.ordinal(),
        }));
    }

    output::success(&format!("Welcome back, {}!", user.full_name()));
    if step != VerificationStep::Completed {
        println!(
            "Profile verification: step {} of 4 ({}). Run '{}' to continue.",
            step.ordinal(),
            step.title(),
            "coinport profile".bold()
        );
    }
    Ok(())
}
