//! Documents command - upload ID front, back and selfie

use std::path::PathBuf;

use anyhow::Result;
use serde_json::json;

use coinport_core::domain::forms::DocumentSelection;

use super::get_signed_in_context;
use crate::output;

pub fn run(
    front: Option<PathBuf>,
    back: Option<PathBuf>,
    selfie: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let selection = DocumentSelection {
        front,
        back,
        selfie,
    };
    // Fail before the session round-trip when files are missing
    selection.clone().validate()?;

    let (mut ctx, session) = get_signed_in_context("upload documents")?;
    let user = session.user;

    let response = output::with_spinner("Uploading documents...", || {
        ctx.verification_service.upload_documents(&user, selection)
    })?;
    let step = ctx.verification_service.current_step();

    if json {
        return output::json(&json!({
            "message": response.message,
            "step": step.ordinal(),
        }));
    }

    output::success("Documents submitted.");
    println!("Your documents are now under review. Check progress with 'coinport profile'.");
    Ok(())
}
