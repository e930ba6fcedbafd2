/*!
Test Harness pour le moniteur LossMon

Facilite l'écriture de tests de bout en bout avec:
- Un `MockProber` partagé (scripts + journal des appels)
- Un fichier de log isolé dans un répertoire temporaire
- Un `RecordingSink` à la place de la console
*/

use crate::prober_stub::{MockProber, ScriptedResponse};
use crate::sink_stub::RecordingSink;
use anyhow::Result;
use lossmon_agent::{
    AlertDispatcher, AlertSink, FileSink, HostRegistry, LossDetector, Monitor, MonitorStats,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::watch;

/// Harness de test complet pour le moniteur
pub struct TestHarness {
    pub prober: MockProber,
    pub console: RecordingSink,
    detector: LossDetector,
    extra_sinks: Vec<Box<dyn AlertSink>>,
    log_path: PathBuf,
    _dir: TempDir,
}

impl TestHarness {
    /// Crée un nouveau harness avec un log temporaire vide (non créé)
    pub fn new() -> Result<Self> {
        env_logger::builder().is_test(true).try_init().ok(); // Init logging pour tests

        let dir = tempfile::tempdir()?;
        let log_path = dir.path().join("log_alertas.txt");

        Ok(Self {
            prober: MockProber::new(),
            console: RecordingSink::new(),
            detector: LossDetector::default(),
            extra_sinks: Vec::new(),
            log_path,
            _dir: dir,
        })
    }

    pub fn with_detector(mut self, detector: LossDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Sink ajouté entre la "console" et le fichier de log
    pub fn with_sink(mut self, sink: impl AlertSink + 'static) -> Self {
        self.extra_sinks.push(Box::new(sink));
        self
    }

    /// Programme la sortie de la prochaine sonde d'un hôte
    pub fn respond(&self, host: &str, lines: Vec<String>) -> &Self {
        self.prober.script(host, ScriptedResponse::Output(lines));
        self
    }

    /// Programme un échec de lancement pour la prochaine sonde d'un hôte
    pub fn fail_launch(&self, host: &str) -> &Self {
        self.prober.script(host, ScriptedResponse::LaunchFailure);
        self
    }

    /// Construit un moniteur: console enregistrée, sinks additionnels, puis fichier
    pub fn monitor(&mut self, hosts: &[&str]) -> Result<Monitor<MockProber>> {
        let registry = HostRegistry::from_addresses(hosts)?;

        let mut dispatcher = AlertDispatcher::new().with_sink(self.console.clone());
        for sink in self.extra_sinks.drain(..) {
            dispatcher.push(sink);
        }
        dispatcher.push(Box::new(FileSink::new(&self.log_path)));

        Ok(Monitor::new(registry, self.prober.clone(), self.detector.clone(), dispatcher))
    }

    /// Fait tourner `monitor.run` jusqu'à `probes` sondes, avec garde-fou de 5s
    pub async fn run_for_probes(
        &self,
        monitor: &Monitor<MockProber>,
        probes: usize,
    ) -> Result<MonitorStats> {
        let (tx, rx) = watch::channel(false);
        self.prober.stop_after(probes, tx);

        let stats = tokio::time::timeout(Duration::from_secs(5), monitor.run(rx))
            .await
            .map_err(|_| anyhow::anyhow!("monitor still running after 5s"))?;

        log::info!("✅ Monitor stopped: {:?}", stats);
        Ok(stats)
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn log_exists(&self) -> bool {
        self.log_path.exists()
    }

    /// Contenu du log ("" s'il n'existe pas encore)
    pub fn log_contents(&self) -> Result<String> {
        if !self.log_exists() {
            return Ok(String::new());
        }
        Ok(std::fs::read_to_string(&self.log_path)?)
    }

    pub fn log_len(&self) -> Result<u64> {
        if !self.log_exists() {
            return Ok(0);
        }
        Ok(std::fs::metadata(&self.log_path)?.len())
    }

    /// Assert qu'exactement ces hôtes ont déclenché une alerte, dans l'ordre
    pub fn assert_alerted_hosts(&self, expected: &[&str]) -> Result<()> {
        let actual = self.console.hosts();
        if actual != expected {
            anyhow::bail!("Alerted hosts mismatch: expected {:?}, got {:?}", expected, actual);
        }
        Ok(())
    }
}
