//! CLI command implementations

pub mod config;
pub mod documents;
pub mod exchange;
pub mod login;
pub mod logout;
pub mod market;
pub mod probe;
pub mod profile;
pub mod register;
pub mod verify;
pub mod whoami;

use std::path::PathBuf;

use anyhow::{Context, Result};
use coinport_core::domain::Session;
use coinport_core::services::logging::{self, WorkerGuard};
use coinport_core::CoinportContext;

use crate::output;

/// Environment variable pointing at the coinport directory
pub const COINPORT_DIR_ENV: &str = "COINPORT_DIR";

/// Get the coinport directory from environment or default
pub fn get_coinport_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(COINPORT_DIR_ENV) {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".coinport")
    }
}

/// Install file logging for this process
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn init_logging() -> Option<WorkerGuard> {
    let coinport_dir = get_coinport_dir();
    std::fs::create_dir_all(&coinport_dir).ok()?;
    logging::init(&coinport_dir).ok()
}

/// Get or create coinport context
pub fn get_context() -> Result<CoinportContext> {
    let coinport_dir = get_coinport_dir();

    std::fs::create_dir_all(&coinport_dir)
        .with_context(|| format!("Failed to create coinport directory: {:?}", coinport_dir))?;

    CoinportContext::new(&coinport_dir).context("Failed to initialize coinport context")
}

/// Context with the stored session restored, or an error naming `action`
pub fn get_signed_in_context(action: &str) -> Result<(CoinportContext, Session)> {
    let mut ctx = get_context()?;
    output::with_spinner("Restoring session...", || ctx.restore_session())?;
    let session = ctx.session.require(action)?;
    Ok((ctx, session))
}

/// Prompts are only shown on an interactive terminal
pub fn is_interactive() -> bool {
    atty::is(atty::Stream::Stdin) && atty::is(atty::Stream::Stdout)
}
