//! Verify command - confirm the email with the emailed code

use anyhow::{bail, Result};
use dialoguer::Input;
use serde_json::json;

use super::{get_signed_in_context, is_interactive};
use crate::output;

pub fn run(code: Option<String>, resend: bool, json: bool) -> Result<()> {
    let (mut ctx, session) = get_signed_in_context("verify your email")?;
    let user = session.user;

    if resend {
        let response = output::with_spinner("Sending code...", || {
            ctx.verification_service.resend_code(&user)
        })?;
        if json {
            return output::json(&response);
        }
        output::success(&format!("A new code was sent to {}.", user.email));
        return Ok(());
    }

    let code = match code {
        Some(c) => c,
        None if is_interactive() && !json => Input::new()
            .with_prompt("Verification code")
            .interact_text()?,
        None => bail!("The code must contain 6 digits"),
    };

    let response = output::with_spinner("Verifying...", || {
        ctx.verification_service.verify_email(&user, &code)
    })?;
    let step = ctx.verification_service.current_step();

    if json {
        return output::json(&json!({
            "message": response.message,
            "step": step.ordinal(),
        }));
    }

    output::success("Email verified.");
    println!(
        "Next: {}. Run 'coinport documents --front <file> --back <file> --selfie <file>'.",
        step.title()
    );
    Ok(())
}
