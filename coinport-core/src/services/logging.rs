//! Logging setup - JSON lines to a daily-rolling file
//!
//! Events go to `<coinport_dir>/logs/coinport.log.<date>`. The filter comes
//! from `COINPORT_LOG` (an `EnvFilter` directive) and defaults to `info`.
//! Tokens and passwords are never passed to `tracing` macros.

use std::path::{Path, PathBuf};

pub use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::domain::result::{Error, Result};

pub const LOG_FILTER_ENV: &str = "COINPORT_LOG";
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const LOG_DIR: &str = "logs";
pub const LOG_FILE_PREFIX: &str = "coinport.log";

/// Directory holding the rolling log files
pub fn log_dir(coinport_dir: &Path) -> PathBuf {
    coinport_dir.join(LOG_DIR)
}

/// Parse a filter directive, falling back to the default on bad input
pub fn build_filter(directive: Option<&str>) -> EnvFilter {
    directive
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global subscriber
///
/// The returned guard flushes buffered lines on drop; keep it alive for
/// the whole process.
pub fn init(coinport_dir: &Path) -> Result<WorkerGuard> {
    let dir = log_dir(coinport_dir);
    std::fs::create_dir_all(&dir)?;

    let directive = std::env::var(LOG_FILTER_ENV).ok();
    let filter = build_filter(directive.as_deref());

    let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer),
        )
        .try_init()
        .map_err(|e| Error::Other(format!("Failed to initialize logging: {}", e)))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    struct BufferWriter(Arc<Mutex<Vec<u8>>>);

    impl<'a> MakeWriter<'a> for SharedBuffer {
        type Writer = BufferWriter;

        fn make_writer(&'a self) -> Self::Writer {
            BufferWriter(Arc::clone(&self.0))
        }
    }

    impl io::Write for BufferWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(filter: EnvFilter, emit: impl FnOnce()) -> String {
        let sink = SharedBuffer::default();
        let subscriber = tracing_subscriber::registry().with(filter).with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(sink.clone()),
        );
        tracing::subscriber::with_default(subscriber, emit);
        let bytes = sink.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_events_are_json_lines() {
        let text = capture(build_filter(None), || {
            tracing::info!(user_id = 42_i64, "session established");
        });
        let line = text.lines().find(|l| !l.trim().is_empty()).unwrap();
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["level"], "INFO");
        assert_eq!(value["fields"]["message"], "session established");
        assert_eq!(value["fields"]["user_id"], 42);
    }

    #[test]
    fn test_default_filter_drops_debug() {
        let text = capture(build_filter(None), || {
            tracing::debug!("request plumbing");
        });
        assert!(text.trim().is_empty());
    }

    #[test]
    fn test_custom_filter_enables_debug() {
        let text = capture(build_filter(Some("debug")), || {
            tracing::debug!("request plumbing");
        });
        assert!(text.contains("request plumbing"));
    }

    #[test]
    fn test_invalid_directive_falls_back() {
        let text = capture(build_filter(Some("coinport=loud")), || {
            tracing::info!("still logged");
            tracing::debug!("not logged");
        });
        assert!(text.contains("still logged"));
        assert!(!text.contains("not logged"));
    }

    #[test]
    fn test_log_dir_under_app_dir() {
        let dir = Path::new("/tmp/coinport");
        assert_eq!(log_dir(dir), PathBuf::from("/tmp/coinport/logs"));
    }
}
