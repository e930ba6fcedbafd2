//! Monitor loop: probe every host in order, forever, until told to stop
//!
//! Each host is handled start to finish (probe, detect, alert, deliver)
//! before the next one is probed. Nothing inside a cycle is fatal.

use chrono::Local;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::alert::Alert;
use crate::config::MonitorConfig;
use crate::detection::LossDetector;
use crate::error::ConfigError;
use crate::execution::Prober;
use crate::registry::{Host, HostRegistry};
use crate::sink::{AlertDispatcher, ConsoleSink, FileSink};

pub const STARTUP_BANNER: &str =
    " > Programa iniciado com sucesso!\n > Testando... Qualquer novidade iremos te avisar! \n\n\n";

/// What happened to one host during one cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOutcome {
    Clear,
    Alerted { failed_sinks: Vec<String> },
    ProbeFailed(String),
}

#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    pub outcomes: Vec<(Host, HostOutcome)>,
}

impl CycleReport {
    pub fn alerts(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, HostOutcome::Alerted { .. }))
            .count()
    }

    pub fn probe_errors(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, HostOutcome::ProbeFailed(_)))
            .count()
    }
}

/// Totals accumulated over a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorStats {
    pub cycles: u64,
    pub probes: u64,
    pub alerts: u64,
    pub probe_errors: u64,
    pub sink_failures: u64,
}

impl MonitorStats {
    fn record(&mut self, outcome: &HostOutcome) {
        self.probes += 1;
        match outcome {
            HostOutcome::Clear => {}
            HostOutcome::Alerted { failed_sinks } => {
                self.alerts += 1;
                self.sink_failures += failed_sinks.len() as u64;
            }
            HostOutcome::ProbeFailed(_) => self.probe_errors += 1,
        }
    }
}

pub struct Monitor<P> {
    registry: HostRegistry,
    prober: P,
    detector: LossDetector,
    dispatcher: AlertDispatcher,
    probe_interval: Duration,
    cycle_interval: Duration,
}

impl<P: Prober> Monitor<P> {
    pub fn new(
        registry: HostRegistry,
        prober: P,
        detector: LossDetector,
        dispatcher: AlertDispatcher,
    ) -> Self {
        Self {
            registry,
            prober,
            detector,
            dispatcher,
            probe_interval: Duration::ZERO,
            cycle_interval: Duration::ZERO,
        }
    }

    /// Wire registry, detector, sinks and intervals from a validated config
    pub fn from_config(config: &MonitorConfig, prober: P) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut dispatcher = AlertDispatcher::new();
        if config.alerts.console {
            dispatcher.push(Box::new(ConsoleSink));
        }
        dispatcher.push(Box::new(FileSink::new(&config.alerts.log_path)));

        let monitor = Self::new(
            config.host_registry()?,
            prober,
            LossDetector::new(config.indicator_set()?),
            dispatcher,
        );
        Ok(monitor.with_intervals(config.monitor.probe_interval(), config.monitor.cycle_interval()))
    }

    pub fn with_intervals(mut self, probe_interval: Duration, cycle_interval: Duration) -> Self {
        self.probe_interval = probe_interval;
        self.cycle_interval = cycle_interval;
        self
    }

    pub fn registry(&self) -> &HostRegistry {
        &self.registry
    }

    pub fn sink_names(&self) -> Vec<&str> {
        self.dispatcher.sink_names()
    }

    /// Probe one host and deliver an alert if its output shows loss
    pub async fn check_host(&self, host: &Host) -> HostOutcome {
        let lines = match self.prober.probe(host).await {
            Ok(lines) => lines,
            Err(e) => {
                error!("Probe failed: {}", e);
                return HostOutcome::ProbeFailed(e.to_string());
            }
        };

        let result = self.detector.process(&lines);
        if !result.loss_detected {
            debug!("{}: no loss ({} lines)", host, result.transcript.len());
            return HostOutcome::Clear;
        }

        warn!("Packet loss detected on {}", host);
        let alert = Alert::build(host.clone(), result.transcript, Local::now());
        let report = self.dispatcher.dispatch(&alert);

        HostOutcome::Alerted { failed_sinks: report.failed_sinks() }
    }

    /// One pass over the registry, without shutdown checks or delays
    pub async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();
        for host in self.registry.iter() {
            let outcome = self.check_host(host).await;
            report.outcomes.push((host.clone(), outcome));
        }
        report
    }

    /// Run until `shutdown` flips to `true` (or its sender is dropped)
    ///
    /// A probe in flight when shutdown arrives is abandoned; since alerts are
    /// only built after a probe completes, no partial alert is ever written.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> MonitorStats {
        let mut stats = MonitorStats::default();
        info!("Monitoring {} hosts", self.registry.len());

        loop {
            let mut probed = 0usize;
            let mut cycle_alerts = 0u64;
            let mut stopping = false;

            for host in self.registry.iter() {
                if *shutdown.borrow() {
                    stopping = true;
                    break;
                }

                let outcome = tokio::select! {
                    biased;
                    _ = stop_requested(&mut shutdown) => {
                        stopping = true;
                        break;
                    }
                    outcome = self.check_host(host) => outcome,
                };

                probed += 1;
                if matches!(outcome, HostOutcome::Alerted { .. }) {
                    cycle_alerts += 1;
                }
                stats.record(&outcome);

                if !pause(self.probe_interval, &mut shutdown).await {
                    stopping = true;
                    break;
                }
            }

            // Only fully probed passes count as cycles
            if probed == self.registry.len() {
                stats.cycles += 1;
                debug!("Cycle {} complete: {} alerts", stats.cycles, cycle_alerts);
            }

            if stopping || !pause(self.cycle_interval, &mut shutdown).await {
                break;
            }
        }

        info!(
            "Monitor stopped after {} cycles ({} probes, {} alerts, {} probe errors, {} sink failures)",
            stats.cycles, stats.probes, stats.alerts, stats.probe_errors, stats.sink_failures
        );
        stats
    }
}

/// Sleep unless shutdown arrives first; returns false when shutting down
async fn pause(delay: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    if delay.is_zero() {
        return !*shutdown.borrow();
    }

    tokio::select! {
        _ = stop_requested(shutdown) => false,
        _ = tokio::time::sleep(delay) => true,
    }
}

/// Resolves once shutdown holds `true` or its sender is gone
async fn stop_requested(shutdown: &mut watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
