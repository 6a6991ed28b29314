//! Exchange backend HTTP client
//!
//! One blocking client serves both the account backend (`/api/v1/*`) and
//! the market-data proxy (`/api/binance/*`).
//!
//! Failures are sorted into three buckets for message quality only:
//! - no response at all → [`Error::Network`]
//! - non-2xx with a JSON body → the body's `message`
//! - non-2xx with any other body → `HTTP error! status: <code>`

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use reqwest::header::{CONTENT_TYPE, ORIGIN, REFERER, USER_AGENT};
use reqwest::{IntoUrl, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::{Config, DEFAULT_FRONTEND_ORIGIN};
use crate::domain::result::{Error, OperationResult, Result};
use crate::domain::{
    AuthResponse, CryptoCardsResponse, DocumentSet, ExchangeData, Kline, LoginData,
    MessageResponse, PriceQuote, SignupData, TradingPair, User, UserEnvelope,
};
use crate::ports::{AuthApi, MarketDataApi};

/// Path prefix of the market-data proxy
const MARKET_PREFIX: &str = "/api/binance";

/// The proxy only answers requests that look like they come from the web front-end
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Error body returned by the backend on failure
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct VerifyEmailBody<'a> {
    email: &'a str,
    code: &'a str,
}

#[derive(Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

/// Outcome of the three connectivity checks
#[derive(Debug, Serialize)]
pub struct ConnectivityReport {
    /// Raw GET of the crypto-cards endpoint
    pub direct: OperationResult<JsonValue>,
    /// Typed crypto-cards call, card count on success
    pub crypto_cards: OperationResult<usize>,
    /// Typed popular-pairs call, pair count on success
    pub popular_pairs: OperationResult<usize>,
}

impl ConnectivityReport {
    pub fn all_passed(&self) -> bool {
        self.direct.success && self.crypto_cards.success && self.popular_pairs.success
    }
}

/// Backend API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    frontend_origin: String,
}

impl ApiClient {
    /// Create a client from configuration
    pub fn new(config: &Config) -> Result<Self> {
        Self::build(&config.api_url, &config.frontend_origin, config.request_timeout)
    }

    /// Create a client for a specific base URL with default settings
    pub fn new_with_base_url(base_url: &str) -> Result<Self> {
        Self::build(
            base_url,
            DEFAULT_FRONTEND_ORIGIN,
            Duration::from_secs(crate::config::DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    fn build(base_url: &str, frontend_origin: &str, timeout: Duration) -> Result<Self> {
        if base_url.trim().is_empty() {
            return Err(Error::config("API base URL cannot be empty"));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            frontend_origin: frontend_origin.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Market-data URL ending in `symbol` as a single encoded path segment
    fn symbol_url(&self, route: &str, symbol: &str) -> Result<Url> {
        let mut url = Url::parse(&self.url(&format!("{}/{}", MARKET_PREFIX, route)))
            .map_err(|e| Error::config(format!("Invalid API URL '{}': {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::config(format!("Invalid API URL '{}'", self.base_url)))?
            .push(symbol);
        Ok(url)
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        self.request_url(method, self.url(endpoint), endpoint.starts_with(MARKET_PREFIX))
    }

    /// Request with the default JSON headers, plus the browser headers the
    /// market-data proxy expects
    fn request_url(&self, method: Method, url: impl IntoUrl, market: bool) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");

        if market {
            builder = builder
                .header(ORIGIN, &self.frontend_origin)
                .header(REFERER, &self.frontend_origin)
                .header(USER_AGENT, BROWSER_USER_AGENT);
        }
        builder
    }

    fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.execute(endpoint, self.request(Method::GET, endpoint))
    }

    fn get_symbol<T: DeserializeOwned>(
        &self,
        route: &str,
        symbol: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.symbol_url(route, symbol)?;
        let endpoint = url.path().to_string();
        let builder = self.request_url(Method::GET, url, true).query(query);
        self.execute(&endpoint, builder)
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> Result<T> {
        let payload = serde_json::to_vec(body)?;
        self.execute(endpoint, self.request(Method::POST, endpoint).body(payload))
    }

    fn execute<T: DeserializeOwned>(&self, endpoint: &str, builder: RequestBuilder) -> Result<T> {
        debug!(endpoint, "sending request");
        let response = builder
            .send()
            .map_err(|e| map_request_error(endpoint, e))?;
        let response = check_response_status(endpoint, response)?;

        response.json::<T>().map_err(|e| {
            error!(endpoint, error = %e, "failed to decode response body");
            Error::Decode(e.to_string())
        })
    }

    /// Connectivity check against the crypto-cards endpoint
    ///
    /// Reports the payload on success, or `HTTP <code>: <reason>` / the
    /// transport error otherwise. Never returns `Err`.
    pub fn probe(&self) -> OperationResult<JsonValue> {
        let endpoint = "/api/binance/crypto-cards";
        let response = match self.request(Method::GET, endpoint).send() {
            Ok(response) => response,
            Err(e) => {
                warn!(endpoint, error = %e, "API probe failed");
                return OperationResult::fail(e.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Unknown");
            return OperationResult::fail(format!("HTTP {}: {}", status.as_u16(), reason))
                .with_context("status", status.as_u16().into());
        }

        match response.json::<JsonValue>() {
            Ok(data) => OperationResult::ok(data),
            Err(e) => OperationResult::fail(format!("Invalid JSON response: {}", e)),
        }
    }

    /// Raw check plus the typed crypto-cards and popular-pairs calls
    pub fn connectivity_report(&self) -> ConnectivityReport {
        ConnectivityReport {
            direct: self.probe(),
            crypto_cards: self.crypto_cards().map(|r| r.cards.len()).into(),
            popular_pairs: self.popular_pairs().map(|pairs| pairs.len()).into(),
        }
    }
}

/// Map transport errors; the detail goes to the log, not to the user
fn map_request_error(endpoint: &str, error: reqwest::Error) -> Error {
    if error.is_timeout() {
        error!(endpoint, "request timed out");
    } else if error.is_connect() {
        error!(endpoint, error = %error, "unable to connect to backend");
    } else {
        error!(endpoint, error = %error, "request failed");
    }
    Error::Network(error.to_string())
}

/// Turn a non-2xx response into an API error, preferring the server's message
fn check_response_status(endpoint: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let fallback = format!("HTTP error! status: {}", status.as_u16());
    let body = response.text().unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => parsed.message.filter(|m| !m.trim().is_empty()).unwrap_or(fallback),
        Err(_) => {
            debug!(endpoint, status = status.as_u16(), "error response was not JSON");
            fallback
        }
    };

    warn!(endpoint, status = status.as_u16(), %message, "API request rejected");
    Err(Error::api(status.as_u16(), message))
}

fn file_part(path: &Path) -> Result<multipart::Part> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    };

    multipart::Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime)
        .map_err(|e| Error::Other(format!("Invalid document type: {}", e)))
}

impl AuthApi for ApiClient {
    fn login(&self, credentials: &LoginData) -> Result<AuthResponse> {
        self.post_json("/api/v1/auth", credentials)
    }

    fn signup(&self, data: &SignupData) -> Result<AuthResponse> {
        self.post_json("/api/v1/auth/signup", data)
    }

    fn current_user(&self, token: &str) -> Result<User> {
        let endpoint = "/api/v1/user/me";
        let envelope: UserEnvelope = self.execute(
            endpoint,
            self.request(Method::GET, endpoint).bearer_auth(token),
        )?;
        Ok(envelope.user)
    }

    fn verify_email(&self, email: &str, code: &str) -> Result<MessageResponse> {
        self.post_json("/api/v1/auth/email/verify", &VerifyEmailBody { email, code })
    }

    fn resend_verification_code(&self, email: &str) -> Result<MessageResponse> {
        self.post_json("/api/v1/auth/email/send", &EmailBody { email })
    }

    fn upload_documents(&self, email: &str, documents: &DocumentSet) -> Result<MessageResponse> {
        let endpoint = "/api/v1/auth/documents";

        let mut form = multipart::Form::new().text("email", email.to_string());
        for path in documents.files() {
            form = form.part("files", file_part(path)?);
        }

        debug!(
            endpoint,
            front = %documents.front.display(),
            back = %documents.back.display(),
            selfie = %documents.selfie.display(),
            "uploading documents"
        );

        // No JSON content type here: reqwest sets the multipart boundary
        let builder = self.client.post(self.url(endpoint)).multipart(form);
        self.execute(endpoint, builder)
    }
}

impl MarketDataApi for ApiClient {
    fn crypto_cards(&self) -> Result<CryptoCardsResponse> {
        self.get("/api/binance/crypto-cards")
    }

    fn trading_pairs(&self) -> Result<Vec<TradingPair>> {
        self.get("/api/binance/trading-pairs")
    }

    fn popular_pairs(&self) -> Result<Vec<TradingPair>> {
        self.get("/api/binance/popular-pairs")
    }

    fn exchange_data(&self) -> Result<ExchangeData> {
        self.get("/api/binance/exchange-data")
    }

    fn trading_pair(&self, symbol: &str) -> Result<TradingPair> {
        self.get_symbol("trading-pair", symbol, &[])
    }

    fn current_price(&self, symbol: &str) -> Result<PriceQuote> {
        self.get_symbol("price", symbol, &[])
    }

    fn klines(&self, symbol: &str, interval: &str, limit: u32) -> Result<Vec<Kline>> {
        let query = [("interval", interval.to_string()), ("limit", limit.to_string())];
        self.get_symbol("kline", symbol, &query)
    }
}

// =============================================================================
// Tests
// =============================================================================
