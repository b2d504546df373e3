//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables, plus the
//! monitor's runtime configuration and its fixed cryptographic constants.

use std::path::PathBuf;
use std::time::Duration;

/// Key derivation function identifier
pub const KEY_DERIVATION_ALGORITHM: &str = "PBKDF2WithHmacSHA256";
/// Cipher / mode / padding identifier
pub const CIPHER_ALGORITHM: &str = "AES/CBC/PKCS7Padding";
/// Derived key length in bytes (256 bits)
pub const KEY_LENGTH_BYTES: usize = 32;
/// IV length in bytes (AES block size)
pub const IV_LENGTH_BYTES: usize = 16;
/// Salt length in bytes
pub const SALT_LENGTH_BYTES: usize = 16;
/// PBKDF2 iteration count
pub const ITERATION_COUNT: u32 = 65_536;

/// Salt file name inside the data directory
pub const SALT_FILE_NAME: &str = "salt.bin";
/// Encrypted log file name inside the data directory
pub const LOG_FILE_NAME: &str = "aqi_log.enc";

/// Default sampling period (seconds)
pub const DEFAULT_SAMPLE_INTERVAL_SECS: u64 = 5;
/// Default high-pollution threshold (strict `>`)
pub const DEFAULT_HIGH_THRESHOLD: f64 = 150.0;
/// Password used when `AQIMON_PASSWORD` is not set
pub const DEFAULT_PASSWORD: &str = "sid1234";

/// Get a non-empty environment variable
///
/// # Example
/// ```
/// use aqimon::config::get_env;
///
/// let port = get_env("AQIMON_PORT");
/// ```
pub fn get_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|val| !val.is_empty())
}

/// Get an environment variable with a default value
pub fn get_env_or(name: &str, default: &str) -> String {
    get_env(name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable parsed to a specific type
///
/// Falls back to `default` when the variable is unset. An unparsable value
/// also falls back, with a warning.
pub fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    match get_env(name) {
        Some(raw) => match raw.parse() {
            Ok(val) => val,
            Err(_) => {
                tracing::warn!(
                    "Environment variable '{}' has an invalid value '{}', using the default",
                    name,
                    raw
                );
                default
            }
        },
        None => default,
    }
}

/// Monitor runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Directory holding the salt and encrypted log files
    pub data_dir: PathBuf,
    /// Key-derivation password
    pub password: String,
    /// Sampling period
    pub sample_interval: Duration,
    /// High-pollution threshold
    pub high_threshold: f64,
    /// Optional directory of static dashboard assets
    pub static_dir: Option<PathBuf>,
}

impl MonitorConfig {
    /// Load monitor configuration from environment variables.
    pub fn from_env() -> Self {
        let data_dir = PathBuf::from(get_env_or("AQIMON_DATA_DIR", "."));
        let password = match get_env("AQIMON_PASSWORD") {
            Some(password) => password,
            None => {
                tracing::warn!(
                    "AQIMON_PASSWORD is not set; using the built-in development password"
                );
                DEFAULT_PASSWORD.to_string()
            }
        };
        let interval_secs = get_env_parse("AQIMON_SAMPLE_INTERVAL_SECS", DEFAULT_SAMPLE_INTERVAL_SECS);
        let high_threshold = get_env_parse("AQIMON_HIGH_THRESHOLD", DEFAULT_HIGH_THRESHOLD);
        let static_dir = get_env("AQIMON_STATIC_DIR").map(PathBuf::from);

        Self {
            data_dir,
            password,
            sample_interval: Duration::from_secs(interval_secs.max(1)),
            high_threshold,
            static_dir,
        }
    }

    /// Path of the persisted salt
    pub fn salt_path(&self) -> PathBuf {
        self.data_dir.join(SALT_FILE_NAME)
    }

    /// Path of the encrypted append-only log
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }
}
