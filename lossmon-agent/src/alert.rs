//! Alert construction and rendering
//!
//! The rendered block is what lands on the console and in the log file,
//! so its layout must stay byte-identical across releases.

use crate::registry::Host;
use chrono::{DateTime, Local};

/// `dd/MM/yyyy HH:mm:ss`
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

const SEPARATOR: &str =
    "--------------------------------------------------------------------------------";

/// A detected packet loss on one host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    timestamp: DateTime<Local>,
    host: Host,
    transcript: Vec<String>,
}

impl Alert {
    pub fn build(host: Host, transcript: Vec<String>, now: DateTime<Local>) -> Self {
        Self { timestamp: now, host, transcript }
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    pub fn timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Header, transcript, separator, then one blank line closing the block
    pub fn render(&self) -> String {
        let mut block = format!(
            " *** ALERTA [{}] - HOST: {} - Perda de pacote detectada! ***\n",
            self.timestamp(),
            self.host
        );
        for line in &self.transcript {
            block.push_str(line);
            block.push('\n');
        }
        block.push_str(SEPARATOR);
        block.push_str("\n\n");
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).earliest().unwrap()
    }

    #[test]
    fn test_render_layout() {
        let alert = Alert::build(
            Host::new("1.1.1.1").unwrap(),
            vec![
                "Disparando 1.1.1.1 com 32 bytes de dados:".to_string(),
                "Esgotado o tempo limite do pedido.".to_string(),
            ],
            fixed_now(),
        );

        let expected = format!(
            " *** ALERTA [05/03/2024 14:07:09] - HOST: 1.1.1.1 - Perda de pacote detectada! ***\n\
             Disparando 1.1.1.1 com 32 bytes de dados:\n\
             Esgotado o tempo limite do pedido.\n\
             {}\n\n",
            "-".repeat(80)
        );
        assert_eq!(alert.render(), expected);
        assert_eq!(alert.timestamp(), "05/03/2024 14:07:09");
    }

    #[test]
    fn test_render_is_deterministic() {
        let build = || {
            Alert::build(
                Host::new("8.8.4.4").unwrap(),
                vec!["Esgotado".to_string()],
                fixed_now(),
            )
        };
        assert_eq!(build().render(), build().render());

        let alert = build();
        assert_eq!(alert.render(), alert.render());
    }

    #[test]
    fn test_render_keeps_blank_lines() {
        let alert = Alert::build(
            Host::new("9.9.9.9").unwrap(),
            vec![String::new(), "Esgotado".to_string(), String::new()],
            fixed_now(),
        );
        let rendered = alert.render();
        let lines: Vec<&str> = rendered.split('\n').collect();

        assert_eq!(lines.len(), 7);
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "Esgotado");
        assert_eq!(lines[4], "-".repeat(80));
    }
}
