//! Probe execution for LossMon
//!
//! Handles spawning the platform ping utility:
//! - One echo request per call (`-n 1` on Windows, `-c 1` elsewhere)
//! - Stdout captured line by line until the child exits
//! - Optional timeout, after which the child is killed
//! - Exit codes are ignored; only the output text matters

use crate::error::ProbeError;
use crate::registry::Host;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command as AsyncCommand};
use tracing::debug;

/// Count flag understood by the platform ping utility
pub fn default_count_flag() -> &'static str {
    if cfg!(target_os = "windows") {
        "-n"
    } else {
        "-c"
    }
}

/// Runs one connectivity probe against a host and returns its raw output lines
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, host: &Host) -> Result<Vec<String>, ProbeError>;
}

/// Prober backed by a child `ping` process
#[derive(Debug, Clone)]
pub struct PingProber {
    program: String,
    count_flag: String,
    timeout: Option<Duration>,
}

impl Default for PingProber {
    fn default() -> Self {
        Self::new("ping", default_count_flag())
    }
}

impl PingProber {
    pub fn new(program: impl Into<String>, count_flag: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            count_flag: count_flag.into(),
            timeout: None,
        }
    }

    /// Zero disables the timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }

    /// Full argument list passed to the program
    pub fn args(&self, host: &Host) -> [String; 3] {
        [self.count_flag.clone(), "1".to_string(), host.to_string()]
    }

    fn spawn(&self, host: &Host) -> Result<Child, ProbeError> {
        AsyncCommand::new(&self.program)
            .args(self.args(host))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProbeError::Launch {
                program: self.program.clone(),
                host: host.to_string(),
                source,
            })
    }

    async fn collect_output(child: &mut Child, host: &Host) -> Result<Vec<String>, ProbeError> {
        let read_error = |source: std::io::Error| ProbeError::Read { host: host.to_string(), source };

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| read_error(std::io::Error::other("stdout was not captured")))?;

        let mut reader = BufReader::new(stdout);
        let mut lines = Vec::new();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let read = reader.read_until(b'\n', &mut buf).await.map_err(read_error)?;
            if read == 0 {
                break;
            }
            lines.push(decode_line(&buf));
        }

        // Reap the child so nothing outlives the probe
        child.wait().await.map_err(read_error)?;
        Ok(lines)
    }
}

/// Strip the line terminator (`\n` or `\r\n`) and decode lossily
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

#[async_trait]
impl Prober for PingProber {
    async fn probe(&self, host: &Host) -> Result<Vec<String>, ProbeError> {
        let start_time = Instant::now();
        let mut child = self.spawn(host)?;

        let lines = match self.timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, Self::collect_output(&mut child, host)).await {
                    Ok(result) => result?,
                    Err(_) => {
                        let _ = child.kill().await;
                        return Err(ProbeError::TimedOut {
                            host: host.to_string(),
                            secs: limit.as_secs(),
                        });
                    }
                }
            }
            None => Self::collect_output(&mut child, host).await?,
        };

        debug!(
            "Probe {} {:?} returned {} lines in {}ms",
            self.program,
            self.args(host),
            lines.len(),
            start_time.elapsed().as_millis()
        );
        Ok(lines)
    }
}
