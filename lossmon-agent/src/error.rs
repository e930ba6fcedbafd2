//! Error types for the monitoring pipeline
//!
//! None of these are fatal to the monitor loop:
//! - `ProbeError` skips one host for one cycle
//! - `SinkError` skips one sink for one alert
//! - `ConfigError` only surfaces at startup

use std::path::PathBuf;
use thiserror::Error;

/// Failure to run or read a single probe
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to launch `{program}` for host {host}: {source}")]
    Launch {
        program: String,
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read probe output for host {host}: {source}")]
    Read {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("probe for host {host} did not finish within {secs}s")]
    TimedOut { host: String, secs: u64 },
}

/// Failure to deliver an alert to one sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Erro ao escrever no arquivo de log {path}: {source}")]
    LogWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write alert to console: {0}")]
    Console(#[source] std::io::Error),
}

/// Invalid configuration detected at startup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("host registry is empty")]
    NoHosts,

    #[error("host entry #{0} is empty")]
    EmptyHost(usize),

    #[error("probe program must not be empty")]
    EmptyProgram,

    #[error("probe count flag must not be empty")]
    EmptyCountFlag,

    #[error("unknown indicator set `{0}` (expected one of: {1})")]
    UnknownIndicatorSet(String, String),
}
