//! Market views against an unreachable backend

use std::net::TcpListener;
use std::sync::Arc;

use tempfile::TempDir;

use coinport_core::adapters::http::ApiClient;
use coinport_core::domain::result::NETWORK_ERROR_MESSAGE;
use coinport_core::services::MarketService;
use coinport_core::{CoinportContext, ExchangeForm};

/// Base URL of a local port with nothing listening on it
fn dead_backend_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

#[test]
fn test_cards_fall_back_when_backend_is_down() {
    let client = ApiClient::new_with_base_url(&dead_backend_url()).unwrap();
    let service = MarketService::new(Arc::new(client));

    let snapshot = service.cards_snapshot();
    let symbols: Vec<_> = snapshot.items.iter().map(|c| c.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["BTC", "ETH", "LTC", "DOGE"]);
    assert_eq!(
        snapshot.warning.as_deref(),
        Some(format!("API Error: {}. Showing sample data.", NETWORK_ERROR_MESSAGE).as_str())
    );
}

#[test]
fn test_pairs_fall_back_when_backend_is_down() {
    let client = ApiClient::new_with_base_url(&dead_backend_url()).unwrap();
    let service = MarketService::new(Arc::new(client));

    let snapshot = service.pairs_snapshot();
    assert!(snapshot.is_fallback());
    assert_eq!(snapshot.items.len(), 4);
    assert_eq!(snapshot.items[0].symbol, "BTCUSDT");
}

#[test]
fn test_direct_lookups_report_network_error() {
    let client = ApiClient::new_with_base_url(&dead_backend_url()).unwrap();
    let service = MarketService::new(Arc::new(client));

    let err = service.current_price("BTCUSDT").unwrap_err();
    assert!(err.is_network());
    assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
}

#[test]
fn test_probe_reports_failure() {
    let client = ApiClient::new_with_base_url(&dead_backend_url()).unwrap();
    let result = client.probe();
    assert!(!result.success);
    assert!(result.error.is_some());
}

#[test]
fn test_context_uses_settings_file() {
    let dir = TempDir::new().unwrap();
    let url = dead_backend_url();
    std::fs::write(
        dir.path().join("settings.json"),
        format!(r#"{{ "apiUrl": "{}", "requestTimeoutSecs": 5 }}"#, url),
    )
    .unwrap();

    let mut ctx = CoinportContext::new(dir.path()).unwrap();
    assert_eq!(ctx.client.base_url(), url);

    // No token file: nothing to restore, no request made
    assert!(!ctx.restore_session().unwrap());
    assert!(!ctx.session.is_authenticated());

    let err = ctx.exchange_service.quote(ExchangeForm::default()).unwrap_err();
    assert_eq!(err.to_string(), "Failed to load exchange rates");
    assert!(ctx.market_service.cards_snapshot().is_fallback());
}
