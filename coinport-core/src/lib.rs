//! Coinport Core - client logic for the Coinport exchange portal
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (User, TradingPair, VerificationWizard, etc.)
//! - **ports**: Trait definitions for external dependencies (AuthApi, MarketDataApi, TokenStore)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (reqwest client, token file)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use adapters::http::ApiClient;
use adapters::token_file::FileTokenStore;
use config::Config;
use domain::result::Result;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{
    CryptoCard, ExchangeForm, ProfileType, TradingPair, User, VerificationStep,
    VerificationWizard,
};

/// Main context for Coinport operations
///
/// This is the primary entry point for all client logic. It holds the
/// configuration, the HTTP client and all services.
pub struct CoinportContext {
    pub coinport_dir: PathBuf,
    pub config: Config,
    pub client: Arc<ApiClient>,
    pub session: SessionStore,
    pub market_service: Arc<MarketService>,
    pub exchange_service: ExchangeService,
    pub verification_service: VerificationService,
}

impl CoinportContext {
    /// Create a new Coinport context
    ///
    /// No request is made here; call [`CoinportContext::restore_session`]
    /// for commands that need the signed-in user.
    pub fn new(coinport_dir: &Path) -> Result<Self> {
        let config = Config::load(coinport_dir)?;
        let client = Arc::new(ApiClient::new(&config)?);
        let tokens = Arc::new(FileTokenStore::in_dir(coinport_dir));

        let session = SessionStore::new(client.clone(), tokens);
        let market_service = Arc::new(MarketService::new(client.clone()));
        let exchange_service = ExchangeService::new(client.clone());
        let verification_service = VerificationService::new(client.clone());

        Ok(Self {
            coinport_dir: coinport_dir.to_path_buf(),
            config,
            client,
            session,
            market_service,
            exchange_service,
            verification_service,
        })
    }

    /// Rehydrate the session from the token file and sync the wizard
    pub fn restore_session(&mut self) -> Result<bool> {
        let restored = self.session.restore()?;
        self.verification_service.sync(self.session.user());
        Ok(restored)
    }
}
