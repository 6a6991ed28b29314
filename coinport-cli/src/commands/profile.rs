//! Profile command - verification wizard overview

use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use coinport_core::domain::{StepState, User};
use coinport_core::{VerificationStep, VerificationWizard};

use super::get_signed_in_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let (ctx, session) = get_signed_in_context("view your profile")?;
    let wizard = *ctx.verification_service.wizard();
    let user = session.user;

    if json {
        return output::json(&json!({
            "user": user,
            "step": wizard.current().ordinal(),
            "progress": wizard.progress(),
        }));
    }

    println!(
        "{} {}",
        user.full_name().bold(),
        format!("[{}]", user.profile_type.label()).dimmed()
    );
    println!("{}", user.email);
    println!();
    print_progress(&wizard);
    println!();
    print_step(&user, wizard.current());
    Ok(())
}

/// One marker per step: filled when done, highlighted when current
fn print_progress(wizard: &VerificationWizard) {
    let markers: Vec<String> = wizard
        .progress()
        .iter()
        .map(|p| {
            let label = format!("{} {}", p.step.ordinal(), p.step.title());
            match p.state {
                StepState::Completed => format!("✓ {}", label).green().to_string(),
                StepState::Current => format!("● {}", label).cyan().bold().to_string(),
                StepState::Upcoming => format!("○ {}", label).dimmed().to_string(),
            }
        })
        .collect();
    println!("{}", markers.join("  ─  "));
}

fn print_step(user: &User, step: VerificationStep) {
    match step {
        VerificationStep::EmailVerification => {
            println!("{}", "Confirm your email".bold());
            println!("Enter the 6-digit code sent to {}.", user.email);
            println!("  coinport verify <code>");
            println!("  coinport verify --resend");
        }
        VerificationStep::DocumentUpload => {
            println!("{}", "Upload your documents".bold());
            println!("Front and back of your ID document, plus a selfie holding it.");
            println!("  coinport documents --front <file> --back <file> --selfie <file>");
        }
        VerificationStep::Pending => {
            println!("{}", "Documents under review".bold());
            println!("Your documents were submitted and are being checked. This usually takes up to 24 hours.");
            println!("Submitted: {}", output::format_date(user.documents_submitted_at.as_ref()));
        }
        VerificationStep::Completed => {
            output::success("Your profile is verified.");
            let mut table = output::create_table();
            table.add_row(vec![
                "Email verified".to_string(),
                output::format_date(user.email_verified_at.as_ref()),
            ]);
            table.add_row(vec![
                "Documents verified".to_string(),
                output::format_date(user.documents_verified_at.as_ref()),
            ]);
            println!("{}", table);
        }
    }
}
