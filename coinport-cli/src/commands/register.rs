//! Register command - create an account

use anyhow::{bail, Result};
use dialoguer::{Input, Password, Select};
use serde_json::json;

use coinport_core::domain::forms::SignupForm;
use coinport_core::ProfileType;

use super::{get_context, is_interactive};
use crate::output;

pub struct RegisterArgs {
    pub name: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub profile_type: Option<ProfileType>,
    pub json: bool,
}

fn prompt_text(value: Option<String>, label: &str, interactive: bool) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None if interactive => Ok(Input::new().with_prompt(label).interact_text()?),
        None => bail!("Please fill in all fields"),
    }
}

fn prompt_profile_type(value: Option<ProfileType>, interactive: bool) -> Result<ProfileType> {
    if let Some(profile_type) = value {
        return Ok(profile_type);
    }
    if !interactive {
        return Ok(ProfileType::default());
    }
    let options = [ProfileType::Personal, ProfileType::Company];
    let labels: Vec<&str> = options.iter().map(|p| p.label()).collect();
    let idx = Select::new()
        .with_prompt("Profile type")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(options[idx])
}

pub fn run(args: RegisterArgs) -> Result<()> {
    let interactive = is_interactive() && !args.json;

    let name = prompt_text(args.name, "First name", interactive)?;
    let lastname = prompt_text(args.lastname, "Last name", interactive)?;
    let email = prompt_text(args.email, "Email", interactive)?;
    let profile_type = prompt_profile_type(args.profile_type, interactive)?;

    let (password, confirm_password) = match (args.password, args.confirm_password) {
        (Some(p), Some(c)) => (p, c),
        // A password passed non-interactively confirms itself
        (Some(p), None) if !interactive => (p.clone(), p),
        (Some(p), None) => {
            let c = Password::new().with_prompt("Confirm password").interact()?;
            (p, c)
        }
        (None, _) if interactive => {
            let p = Password::new().with_prompt("Password").interact()?;
            let c = Password::new().with_prompt("Confirm password").interact()?;
            (p, c)
        }
        (None, _) => bail!("Please fill in all fields"),
    };

    let data = SignupForm {
        name,
        lastname,
        email,
        password,
        confirm_password,
        profile_type,
    }
    .validate()?;

    let mut ctx = get_context()?;
    let user = output::with_spinner("Creating account...", || ctx.session.signup(&data).cloned())?;
    let step = ctx.verification_service.sync(Some(&user));

    if args.json {
        return output::json(&json!({
            "user": user,
            "verification_step": step.ordinal(),
        }));
    }

    output::success(&format!(
        "Account created for {} ({} profile).",
        user.full_name(),
        user.profile_type.label()
    ));
    output::info(next_steps_hint());
    Ok(())
}

fn next_steps_hint() -> &'static str {
    "Run 'coinport profile' to see your verification status, \
     or 'coinport verify --resend' to get an email code."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_points_at_commands_without_claiming_delivery() {
        let hint = next_steps_hint();
        assert!(hint.contains("coinport profile"));
        assert!(hint.contains("coinport verify --resend"));
        assert!(!hint.contains("was sent"));
    }
}
