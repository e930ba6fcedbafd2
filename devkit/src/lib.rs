/*!
# LossMon DevKit - Stubs et Utilitaires pour les tests

Bibliothèque facilitant les tests du moniteur avec:
- Prober scripté (aucun processus `ping` lancé)
- Sinks d'enregistrement et sinks en échec
- Sorties `ping` localisées prêtes à l'emploi
- Harness avec fichier de log temporaire
*/

pub mod prober_stub;
pub mod sink_stub;
pub mod fixtures;
pub mod test_utils;

pub use prober_stub::{MockProber, ScriptedResponse};
pub use sink_stub::{FailingSink, RecordingSink};
pub use fixtures::PingOutputBuilder;
pub use test_utils::TestHarness;
