/*!
Mock Prober pour tests sans processus `ping`

Rejoue des sorties scriptées par hôte, enregistre l'ordre des appels et
peut déclencher l'arrêt du moniteur après N sondes.
*/

use async_trait::async_trait;
use lossmon_agent::{Host, ProbeError, Prober};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Réponse rejouée pour une sonde
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedResponse {
    Output(Vec<String>),
    LaunchFailure,
    ReadFailure,
}

impl ScriptedResponse {
    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Output(lines.into_iter().map(|l| l.as_ref().to_string()).collect())
    }

    fn into_result(self, host: &Host) -> Result<Vec<String>, ProbeError> {
        match self {
            Self::Output(lines) => Ok(lines),
            Self::LaunchFailure => Err(ProbeError::Launch {
                program: "ping".to_string(),
                host: host.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "mock: ping not found"),
            }),
            Self::ReadFailure => Err(ProbeError::Read {
                host: host.to_string(),
                source: io::Error::new(io::ErrorKind::BrokenPipe, "mock: stdout closed"),
            }),
        }
    }
}

#[derive(Default)]
struct MockState {
    scripts: HashMap<String, VecDeque<ScriptedResponse>>,
    calls: Vec<String>,
    stop_after: Option<(usize, watch::Sender<bool>)>,
}

/// Mock Prober qui simule `PingProber`
#[derive(Clone)]
pub struct MockProber {
    state: Arc<Mutex<MockState>>,
    fallback: ScriptedResponse,
}

impl MockProber {
    /// Sans script, chaque hôte répond par une sortie vide (aucune perte)
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            fallback: ScriptedResponse::Output(Vec::new()),
        }
    }

    /// Réponse utilisée quand la file d'un hôte est vide
    pub fn with_fallback(mut self, response: ScriptedResponse) -> Self {
        self.fallback = response;
        self
    }

    /// Ajoute une réponse à la file de l'hôte (consommée dans l'ordre)
    pub fn script(&self, host: &str, response: ScriptedResponse) -> &Self {
        self.state
            .lock()
            .unwrap()
            .scripts
            .entry(host.to_string())
            .or_default()
            .push_back(response);
        self
    }

    /// Envoie `true` sur `shutdown` une fois `probes` sondes effectuées
    pub fn stop_after(&self, probes: usize, shutdown: watch::Sender<bool>) {
        self.state.lock().unwrap().stop_after = Some((probes, shutdown));
    }

    /// Hôtes sondés, dans l'ordre des appels
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        state.scripts.clear();
        state.calls.clear();
    }
}

impl Default for MockProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prober for MockProber {
    async fn probe(&self, host: &Host) -> Result<Vec<String>, ProbeError> {
        let response = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(host.to_string());

            let response = state
                .scripts
                .get_mut(host.as_str())
                .and_then(VecDeque::pop_front)
                .unwrap_or_else(|| self.fallback.clone());

            let probes = state.calls.len();
            if let Some((limit, shutdown)) = &state.stop_after {
                if probes >= *limit {
                    let _ = shutdown.send(true);
                }
            }
            response
        };

        log::debug!("🔎 [MOCK] Probe {} -> {:?}", host, response);
        response.into_result(host)
    }
}
