//! Mock exchange backend for testing
//!
//! A small threaded HTTP server that speaks the same REST contract as the
//! real backend and market-data proxy:
//! - POST /api/v1/auth, /api/v1/auth/signup → { message, user, token }
//! - GET /api/v1/user/me → { user }
//! - POST /api/v1/auth/email/verify, /email/send, /documents → { message }
//! - GET /api/binance/* → fallback market data

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use serde_json::{json, Value as JsonValue};

use crate::domain::market::{fallback_cards, fallback_pairs};

/// Password accepted by the mock login endpoint
pub const VALID_PASSWORD: &str = "secret123";
/// Token issued by the mock backend and accepted by `/user/me`
pub const VALID_TOKEN: &str = "test-token";
/// Code accepted by the mock email verification endpoint
pub const VALID_CODE: &str = "123456";

/// Mock backend server
pub struct MockBackend {
    port: u16,
    running: Arc<AtomicBool>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

/// Failure scenarios
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Answer every market-data request with this status
    pub market_failure: Option<u16>,
    /// Send error bodies as plain text instead of JSON
    pub plain_text_errors: bool,
    /// Reject market-data requests without Origin/Referer headers
    pub require_browser_headers: bool,
}

struct Request {
    method: String,
    path: String,
    headers: String,
    body: Vec<u8>,
}

impl Request {
    fn header(&self, name: &str) -> Option<String> {
        let prefix = format!("{}:", name.to_lowercase());
        self.headers
            .lines()
            .find(|line| line.to_lowercase().starts_with(&prefix))
            .map(|line| line[prefix.len()..].trim().to_string())
    }

    fn json(&self) -> JsonValue {
        serde_json::from_slice(&self.body).unwrap_or(JsonValue::Null)
    }
}

impl MockBackend {
    /// Start a new mock server on a random available port
    pub fn start(config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        listener.set_nonblocking(true)?;

        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let cfg = config.clone();
                        thread::spawn(move || handle_connection(stream, &cfg));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            thread_handle: Some(thread_handle),
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.stop();
    }
}

fn read_request(stream: &mut TcpStream) -> Option<Request> {
    stream.set_nonblocking(false).ok()?;
    let mut data = Vec::new();
    let mut buffer = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buffer[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let lower = line.to_lowercase();
            lower
                .strip_prefix("content-length:")
                .and_then(|v| v.trim().parse::<usize>().ok())
        })
        .unwrap_or(0);

    while data.len() < header_end + content_length {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buffer[..n]);
    }

    let mut lines = head.lines();
    let first_line = lines.next().unwrap_or("");
    let mut parts = first_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    Some(Request {
        method,
        path,
        headers: lines.collect::<Vec<_>>().join("\n"),
        body: data[header_end..].to_vec(),
    })
}

fn handle_connection(mut stream: TcpStream, config: &MockConfig) {
    let Some(request) = read_request(&mut stream) else {
        return;
    };

    let path = request.path.split('?').next().unwrap_or("").to_string();
    let query = request.path.split_once('?').map(|(_, q)| q.to_string());

    let (status, body) = if path.starts_with("/api/binance/") {
        market_route(&request, &path, query.as_deref(), config)
    } else {
        account_route(&request, &path)
    };

    if status >= 400 && config.plain_text_errors {
        send_response(&mut stream, status, "text/plain", "upstream failure");
    } else {
        send_response(&mut stream, status, "application/json", &body.to_string());
    }
}

fn user_json(id: i64, name: &str, lastname: &str, email: &str, profile: &str) -> JsonValue {
    json!({
        "id": id,
        "name": name,
        "lastname": lastname,
        "email": email,
        "profile_type": profile,
        "email_verified_at": null,
        "documents_submitted_at": null,
        "documents_verified_at": null,
        "created_at": "2025-01-15T12:00:00Z",
        "updated_at": "2025-01-15T12:00:00Z"
    })
}

fn account_route(request: &Request, path: &str) -> (u16, JsonValue) {
    let body = request.json();
    match (request.method.as_str(), path) {
        ("POST", "/api/v1/auth") => {
            if body["password"] == VALID_PASSWORD {
                let email = body["email"].as_str().unwrap_or_default();
                (
                    200,
                    json!({
                        "message": "Login successful",
                        "user": user_json(1, "Anna", "Smirnova", email, "personal"),
                        "token": VALID_TOKEN
                    }),
                )
            } else {
                (401, json!({ "message": "Invalid credentials" }))
            }
        }
        ("POST", "/api/v1/auth/signup") => (
            201,
            json!({
                "message": "User created",
                "user": user_json(
                    2,
                    body["name"].as_str().unwrap_or_default(),
                    body["lastname"].as_str().unwrap_or_default(),
                    body["email"].as_str().unwrap_or_default(),
                    body["profile_type"].as_str().unwrap_or("personal"),
                ),
                "token": VALID_TOKEN
            }),
        ),
        ("GET", "/api/v1/user/me") => {
            let expected = format!("Bearer {}", VALID_TOKEN);
            if request.header("authorization").as_deref() == Some(expected.as_str()) {
                (
                    200,
                    json!({ "user": user_json(1, "Anna", "Smirnova", "anna@example.com", "personal") }),
                )
            } else {
                (401, json!({ "message": "Unauthenticated." }))
            }
        }
        ("POST", "/api/v1/auth/email/verify") => {
            if body["code"] == VALID_CODE {
                (200, json!({ "message": "Email verified" }))
            } else {
                (422, json!({ "message": "Invalid verification code" }))
            }
        }
        ("POST", "/api/v1/auth/email/send") => {
            (200, json!({ "message": "Verification code sent" }))
        }
        ("POST", "/api/v1/auth/documents") => {
            let is_multipart = request
                .header("content-type")
                .map(|ct| ct.starts_with("multipart/form-data"))
                .unwrap_or(false);
            if !is_multipart {
                return (400, json!({ "message": "Expected multipart form data" }));
            }
            let raw = String::from_utf8_lossy(&request.body);
            let files = raw.matches("name=\"files\"").count();
            (200, json!({ "message": format!("Received {} files", files) }))
        }
        _ => (404, json!({ "message": "Endpoint not found" })),
    }
}

fn market_route(
    request: &Request,
    path: &str,
    query: Option<&str>,
    config: &MockConfig,
) -> (u16, JsonValue) {
    if let Some(status) = config.market_failure {
        return (status, json!({ "message": "Market data unavailable" }));
    }
    if config.require_browser_headers
        && (request.header("origin").is_none() || request.header("referer").is_none())
    {
        return (403, json!({ "message": "Forbidden" }));
    }
    if request.method != "GET" {
        return (405, json!({ "message": "Method not allowed" }));
    }

    let pairs = fallback_pairs();
    let rest = &path["/api/binance/".len()..];

    match rest.split_once('/') {
        None => match rest {
            "crypto-cards" => (
                200,
                json!({ "cards": fallback_cards(), "timestamp": 1_700_000_000_000i64 }),
            ),
            "trading-pairs" | "popular-pairs" => (200, json!(pairs)),
            "exchange-data" => {
                let summary: Vec<JsonValue> = pairs
                    .iter()
                    .map(|p| {
                        json!({
                            "symbol": p.symbol,
                            "price": p.last_price,
                            "change24h": p.price_change,
                            "changePercent24h": p.price_change_percent,
                            "trend": p.trend()
                        })
                    })
                    .collect();
                (200, json!({ "tradingPairs": summary, "timestamp": 1_700_000_000_000i64 }))
            }
            _ => (404, json!({ "message": "Endpoint not found" })),
        },
        Some((kind, symbol)) => {
            let pair = pairs.iter().find(|p| p.symbol == symbol);
            match (kind, pair) {
                ("trading-pair", Some(p)) => (200, json!(p)),
                ("price", Some(p)) => (
                    200,
                    json!({ "symbol": p.symbol, "price": p.last_price, "time": 1_700_000_000_000i64 }),
                ),
                ("kline", Some(p)) => {
                    let limit = query
                        .and_then(|q| {
                            q.split('&')
                                .find_map(|kv| kv.strip_prefix("limit="))
                                .and_then(|v| v.parse::<usize>().ok())
                        })
                        .unwrap_or(24);
                    let rows: Vec<JsonValue> = (0..limit)
                        .map(|i| {
                            let open_time = 1_700_000_000_000i64 + i as i64 * 3_600_000;
                            json!([open_time, p.open_price, p.high_price, p.low_price, p.last_price, p.volume])
                        })
                        .collect();
                    (200, json!(rows))
                }
                (_, None) => (404, json!({ "message": format!("Unknown symbol {}", symbol) })),
                _ => (404, json!({ "message": "Endpoint not found" })),
            }
        }
    }
}

fn send_response(stream: &mut TcpStream, status: u16, content_type: &str, body: &str) {
    let reason = match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        content_type,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
