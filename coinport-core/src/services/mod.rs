//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod exchange;
pub mod logging;
pub mod market;
mod session;
mod verification;

pub use exchange::{ExchangeQuote, ExchangeService};
pub use market::{MarketPoller, MarketService, MarketSnapshot, MarketUpdate, PollerHandle};
pub use session::SessionStore;
pub use verification::VerificationService;
