/*!
Sinks de test: enregistrement en mémoire et échec forcé
*/

use lossmon_agent::{Alert, AlertSink, SinkError};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Garde chaque alerte reçue; les clones partagent le même journal
#[derive(Clone, Default)]
pub struct RecordingSink {
    alerts: Arc<Mutex<Vec<Alert>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn hosts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().iter().map(|a| a.host().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.alerts.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AlertSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    fn deliver(&self, alert: &Alert) -> Result<(), SinkError> {
        self.alerts.lock().unwrap().push(alert.clone());
        Ok(())
    }
}

/// Échoue toujours, comme un fichier de log verrouillé
#[derive(Clone, Debug)]
pub struct FailingSink {
    path: PathBuf,
}

impl FailingSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AlertSink for FailingSink {
    fn name(&self) -> &str {
        "failing"
    }

    fn deliver(&self, _alert: &Alert) -> Result<(), SinkError> {
        Err(SinkError::LogWrite {
            path: self.path.clone(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "mock: file locked"),
        })
    }
}
