//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O beyond checking that picked files exist.

mod auth;
pub mod exchange;
pub mod forms;
pub mod market;
pub mod result;
mod user;
pub mod verification;

pub use auth::{
    AuthResponse, DocumentSet, LoginData, MessageResponse, Session, SignupData, UserEnvelope,
};
pub use exchange::ExchangeForm;
pub use market::{
    CryptoCard, CryptoCardsResponse, ExchangeData, ExchangeSummaryPair, Kline, PriceQuote,
    TradingPair, Trend,
};
pub use user::{ProfileType, Timestamp, User};
pub use verification::{StepProgress, StepState, VerificationStep, VerificationWizard};
