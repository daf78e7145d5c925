//! # Logging
//!
//! Structured logging for validation runs. Key material never reaches a log
//! line in clear: wrap it in [`sanitize_key`], which prints only its length.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use blockcheck_validation::logging::{init_tracing, sanitize_key};
//!
//! // Sets the global subscriber; call once per process.
//! init_tracing().expect("Failed to init tracing");
//!
//! let key = [0u8; 16];
//! tracing::info!("loaded key {}", sanitize_key(&key));
//! ```
//!
//! The filter honors `RUST_LOG`; without it, `blockcheck=info` is used.
//! Per-edge polling is logged at `trace`, handshakes at `debug`.

use std::fmt;
use std::sync::Once;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "blockcheck=info";

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .try_init()?;

    info!("blockcheck logging initialized");
    Ok(())
}

/// Route tracing output through the test harness's captured writer.
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    static ONCE: Once = Once::new();

    ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("blockcheck=debug"));
        // another test framework may already own the global subscriber
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_ansi(false).with_test_writer())
            .try_init();
    });
}

/// Display wrapper that hides key bytes.
#[must_use]
pub fn sanitize_key(key: &[u8]) -> SanitizedKey<'_> {
    SanitizedKey(key)
}

pub struct SanitizedKey<'a>(&'a [u8]);

impl fmt::Display for SanitizedKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-bit key]", self.0.len() * 8)
    }
}

impl fmt::Debug for SanitizedKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
