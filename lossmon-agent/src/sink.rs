//! Alert delivery to the console and the append-only log file
//!
//! Each sink is independent: a failing log file never prevents the
//! console copy, and no sink failure ever reaches the monitor loop.

use crate::alert::Alert;
use crate::error::SinkError;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// A destination that records alerts
pub trait AlertSink: Send + Sync {
    fn name(&self) -> &str;

    fn deliver(&self, alert: &Alert) -> Result<(), SinkError>;
}

/// Writes rendered alerts to stdout
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl AlertSink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    fn deliver(&self, alert: &Alert) -> Result<(), SinkError> {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(alert.render().as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(SinkError::Console)
    }
}

/// Appends rendered alerts to a log file, one open/write/close per alert
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, text: &str) -> io::Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(text.as_bytes())?;
        writer.flush()
    }
}

impl AlertSink for FileSink {
    fn name(&self) -> &str {
        "log-file"
    }

    fn deliver(&self, alert: &Alert) -> Result<(), SinkError> {
        self.append(&alert.render()).map_err(|source| SinkError::LogWrite {
            path: self.path.clone(),
            source,
        })
    }
}

/// Outcome of delivering one alert to every sink
#[derive(Debug, Default)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failures: Vec<(String, SinkError)>,
}

impl DeliveryReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_sinks(&self) -> Vec<String> {
        self.failures.iter().map(|(name, _)| name.clone()).collect()
    }
}

/// Ordered list of sinks; delivers to all of them regardless of failures
#[derive(Default)]
pub struct AlertDispatcher {
    sinks: Vec<Box<dyn AlertSink>>,
}

impl AlertDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: impl AlertSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn push(&mut self, sink: Box<dyn AlertSink>) {
        self.sinks.push(sink);
    }

    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|sink| sink.name()).collect()
    }

    pub fn dispatch(&self, alert: &Alert) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for sink in &self.sinks {
            match sink.deliver(alert) {
                Ok(()) => {
                    debug!("Alert for {} delivered to {}", alert.host(), sink.name());
                    report.delivered += 1;
                }
                Err(e) => {
                    error!("{}", e);
                    report.failures.push((sink.name().to_string(), e));
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Host;
    use chrono::Local;
    use std::fs;

    fn sample_alert(host: &str) -> Alert {
        Alert::build(
            Host::new(host).unwrap(),
            vec!["Esgotado o tempo limite do pedido.".to_string()],
            Local::now(),
        )
    }

    struct BrokenSink;

    impl AlertSink for BrokenSink {
        fn name(&self) -> &str {
            "broken"
        }

        fn deliver(&self, _alert: &Alert) -> Result<(), SinkError> {
            Err(SinkError::Console(io::Error::new(io::ErrorKind::BrokenPipe, "closed")))
        }
    }

    #[test]
    fn test_file_sink_appends_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log_alertas.txt");
        fs::write(&path, "previous content\n").unwrap();

        let sink = FileSink::new(&path);
        let first = sample_alert("8.8.8.8");
        let second = sample_alert("1.1.1.1");
        sink.deliver(&first).unwrap();
        sink.deliver(&second).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let expected = format!("previous content\n{}{}", first.render(), second.render());
        assert_eq!(content, expected);
    }

    #[test]
    fn test_file_sink_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("missing").join("log.txt"));

        let err = sink.deliver(&sample_alert("9.9.9.9")).unwrap_err();
        assert!(matches!(err, SinkError::LogWrite { .. }));
        assert!(err.to_string().starts_with("Erro ao escrever no arquivo de log"));
    }

    #[test]
    fn test_dispatcher_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        let dispatcher = AlertDispatcher::new()
            .with_sink(BrokenSink)
            .with_sink(FileSink::new(&path));

        let alert = sample_alert("4.2.2.2");
        let report = dispatcher.dispatch(&alert);

        assert_eq!(report.delivered, 1);
        assert!(!report.is_complete());
        assert_eq!(report.failed_sinks(), vec!["broken"]);
        assert_eq!(fs::read_to_string(&path).unwrap(), alert.render());
    }

    #[test]
    fn test_sink_names_in_order() {
        let dispatcher = AlertDispatcher::new()
            .with_sink(ConsoleSink)
            .with_sink(FileSink::new("log_alertas.txt"));
        assert_eq!(dispatcher.sink_names(), vec!["console", "log-file"]);
    }
}
