//! CLI module for aqimon
//!
//! Provides the command-line interface for the monitor service and its
//! offline log decryption tool.

pub mod decrypt;
pub mod serve;

use clap::{Parser, Subcommand};

/// Secure AQI Monitor - encrypted air-quality sampling service
#[derive(Parser, Debug)]
#[command(name = "aqimon")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    AQIMON_HOST                  Bind address (default: 0.0.0.0)
    AQIMON_PORT                  Listen port (default: 8080)
    AQIMON_DATA_DIR              Directory for salt.bin and aqi_log.enc (default: .)
    AQIMON_PASSWORD              Key-derivation password (default: sid1234, warns)
    AQIMON_SAMPLE_INTERVAL_SECS  Sampling period in seconds (default: 5)
    AQIMON_HIGH_THRESHOLD        High-pollution threshold (default: 150)
    AQIMON_STATIC_DIR            Static dashboard assets (optional)
    AQIMON_LOG_LEVEL             Log level (default: info)
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the sampling loop and HTTP server
    Serve(serve::ServeArgs),
    /// Decrypt the encrypted log and print its records
    Decrypt(decrypt::DecryptArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["aqimon"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_serve_args_parse() {
        let cli = Cli::try_parse_from(["aqimon", "serve", "--port", "9000", "-H", "127.0.0.1"])
            .unwrap();
        match cli.command {
            Some(Commands::Serve(args)) => {
                assert_eq!(args.port, 9000);
                assert_eq!(args.host, "127.0.0.1");
                assert_eq!(args.bind_addr(), "127.0.0.1:9000");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_decrypt_args_parse() {
        let cli = Cli::try_parse_from([
            "aqimon",
            "decrypt",
            "--data-dir",
            "/tmp/aqi",
            "--password",
            "hunter2",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Decrypt(args)) => {
                assert_eq!(args.data_dir, std::path::PathBuf::from("/tmp/aqi"));
                assert_eq!(args.password, "hunter2");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
