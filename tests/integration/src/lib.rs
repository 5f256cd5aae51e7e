//! End-to-end tests for the LCP MAC crates.
//!
//! Each test signs requests with `lcp-auth`/`lcp-http` and verifies them the
//! way a receiving server would. No network access is needed.
//!
//! ```text
//! cargo test -p lcp-integration
//! ```

use std::io;
use std::sync::{Arc, Mutex, Once};

use lcp_auth::nonce::FixedNonce;
use lcp_auth::timestamp::FixedClock;
use lcp_auth::{Credentials, KeyEncoding, MacConfig, Signer, StaticCredentialProvider, Verifier};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

mod test_http;
mod test_logging;
mod test_sign_verify;

static INIT: Once = Once::new();

/// Key id shared by the fixtures.
pub const KEY_ID: &str = "integration-key";

/// Base64url shared secret (`"secret-key"`).
pub const SHARED_SECRET: &str = "c2VjcmV0LWtleQ";

/// Unix time the fixture clocks are frozen at.
pub const NOW: i64 = 1_700_000_000;

/// Initialize tracing (once).
///
/// Uses `RUST_LOG` if set, otherwise the `LOG_LEVEL` configuration value.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            env_filter(&MacConfig::from_env().unwrap_or_default())
        };
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}

/// Log filter for the configured `log_level`, falling back to `warn` when it
/// does not parse.
#[must_use]
pub fn env_filter(config: &MacConfig) -> EnvFilter {
    EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Credentials decoded from the fixture secret.
#[must_use]
pub fn credentials() -> Credentials {
    Credentials::from_encoded(KEY_ID, SHARED_SECRET, KeyEncoding::Base64Url)
        .expect("fixture secret is valid base64url")
}

/// A signer whose clock is frozen at `ts`.
#[must_use]
pub fn signer_at(ts: i64) -> Signer {
    init_tracing();
    Signer::new(credentials()).with_clock(Arc::new(FixedClock(ts)))
}

/// A signer with a frozen clock and nonce.
#[must_use]
pub fn deterministic_signer(ts: i64, nonce: &str) -> Signer {
    signer_at(ts).with_nonce_source(Arc::new(FixedNonce::new(nonce)))
}

/// A verifier that knows the fixture credentials, with its clock frozen at [`NOW`].
#[must_use]
pub fn verifier() -> Verifier {
    init_tracing();
    Verifier::from_config(
        &MacConfig::default(),
        Arc::new(StaticCredentialProvider::from(credentials())),
    )
    .with_clock(Arc::new(FixedClock(NOW)))
}

/// In-memory log sink for asserting on formatted `tracing` output.
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Everything written so far.
    #[must_use]
    pub fn contents(&self) -> String {
        let buf = self.0.lock().expect("log buffer lock poisoned");
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("log buffer lock poisoned"))?
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a debug-level subscriber writing into the returned buffer.
pub fn capture_logs(f: impl FnOnce()) -> CapturedLogs {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .with_writer(logs.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    logs
}
