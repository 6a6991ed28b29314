//! Coinport CLI - exchange portal in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use coinport_core::ProfileType;
use commands::{
    config, documents, exchange, login, logout, market, probe, profile, register, verify, whoami,
};

/// Coinport - exchange portal in your terminal
#[derive(Parser)]
#[command(name = "coinport", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        /// Account email
        #[arg(long)]
        email: Option<String>,
        /// Account password (prompted when omitted)
        #[arg(long, env = "COINPORT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an account
    Register {
        /// First name
        #[arg(long)]
        name: Option<String>,
        /// Last name
        #[arg(long)]
        lastname: Option<String>,
        /// Account email
        #[arg(long)]
        email: Option<String>,
        /// Password (prompted when omitted)
        #[arg(long, env = "COINPORT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Password confirmation
        #[arg(long)]
        confirm_password: Option<String>,
        /// Profile type (personal, company)
        #[arg(long)]
        profile_type: Option<ProfileType>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign out and remove the stored session
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the signed-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show profile verification progress
    Profile {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Confirm your email with the 6-digit code
    Verify {
        /// Code from the verification email
        code: Option<String>,
        /// Send a new code instead
        #[arg(long, conflicts_with = "code")]
        resend: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Upload identity documents for review
    Documents {
        /// Front side of the ID document
        #[arg(long)]
        front: Option<PathBuf>,
        /// Back side of the ID document
        #[arg(long)]
        back: Option<PathBuf>,
        /// Selfie holding the document
        #[arg(long)]
        selfie: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Market data
    Market {
        #[command(subcommand)]
        command: market::MarketCommands,
    },

    /// Estimate a currency exchange
    Exchange {
        /// Amount to send (defaults to 5273.35)
        amount: Option<String>,
        /// Currency to send
        #[arg(long, default_value = "ETH")]
        from: String,
        /// Currency to receive
        #[arg(long, default_value = "BTC")]
        to: String,
        /// Swap the two sides after calculating
        #[arg(long)]
        swap: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check connectivity to the market-data API
    Probe {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _log_guard = commands::init_logging();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Login { email, password, json } => login::run(email, password, json),
        Commands::Register {
            name,
            lastname,
            email,
            password,
            confirm_password,
            profile_type,
            json,
        } => register::run(register::RegisterArgs {
            name,
            lastname,
            email,
            password,
            confirm_password,
            profile_type,
            json,
        }),
        Commands::Logout { json } => logout::run(json),
        Commands::Whoami { json } => whoami::run(json),
        Commands::Profile { json } => profile::run(json),
        Commands::Verify { code, resend, json } => verify::run(code, resend, json),
        Commands::Documents { front, back, selfie, json } => {
            documents::run(front, back, selfie, json)
        }
        Commands::Market { command } => market::run(command),
        Commands::Exchange { amount, from, to, swap, json } => {
            exchange::run(amount, from, to, swap, json)
        }
        Commands::Probe { json } => probe::run(json),
        Commands::Config { command } => config::run(command),
    }
}
