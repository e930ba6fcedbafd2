//! LossMon agent - continuous packet-loss monitor
//!
//! Pipeline, one host at a time:
//! - `registry`: ordered probe targets
//! - `execution`: one `ping` per host, raw output lines
//! - `detection`: ASCII normalization + loss indicators
//! - `alert`: timestamped alert block
//! - `sink`: console + append-only log file
//! - `monitor`: the driving loop

pub mod alert;
pub mod config;
pub mod detection;
pub mod error;
pub mod execution;
pub mod monitor;
pub mod registry;
pub mod sink;

pub use alert::Alert;
pub use config::MonitorConfig;
pub use detection::{IndicatorSet, LossDetector, ProbeResult};
pub use error::{ConfigError, ProbeError, SinkError};
pub use execution::{PingProber, Prober};
pub use monitor::{CycleReport, HostOutcome, Monitor, MonitorStats, STARTUP_BANNER};
pub use registry::{Host, HostRegistry};
pub use sink::{AlertDispatcher, AlertSink, ConsoleSink, DeliveryReport, FileSink};
