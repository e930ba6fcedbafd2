/*!
Sorties `ping` prêtes à l'emploi

Reproduit le texte des utilitaires `ping` localisés:
- Windows pt-BR (accents inclus, comme dans la console)
- Windows en-US
- iputils (Linux)
*/

use chrono::{DateTime, Local, TimeZone};

/// Horodatage fixe pour des rendus reproductibles: 05/03/2024 14:07:09
pub fn fixed_time() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2024, 3, 5, 14, 7, 9)
        .earliest()
        .expect("05/03/2024 14:07:09 exists in every time zone")
}

/// Construit la sortie d'un `ping -n 1` Windows pt-BR
pub struct PingOutputBuilder {
    host: String,
    lines: Vec<String>,
}

impl PingOutputBuilder {
    pub fn new<S: Into<String>>(host: S) -> Self {
        let host = host.into();
        Self {
            lines: vec![String::new(), format!("Disparando {} com 32 bytes de dados:", host)],
            host,
        }
    }

    pub fn reply(mut self, ms: u32) -> Self {
        self.lines.push(format!("Resposta de {}: bytes=32 tempo={}ms TTL=57", self.host, ms));
        self
    }

    pub fn timeout(mut self) -> Self {
        self.lines.push("Esgotado o tempo limite do pedido.".to_string());
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.lines.push(format!("Resposta de {}: Host de destino inacessível.", self.host));
        self
    }

    /// Résumé Windows (majuscules, donc sans effet sur "perdidos = 1")
    pub fn summary(mut self, sent: u32, received: u32) -> Self {
        let lost = sent.saturating_sub(received);
        let percent = if sent == 0 { 0 } else { lost * 100 / sent };
        self.lines.push(String::new());
        self.lines.push(format!("Estatísticas do Ping para {}:", self.host));
        self.lines.push(format!(
            "    Pacotes: Enviados = {}, Recebidos = {}, Perdidos = {} ({}% de perda),",
            sent, received, lost, percent
        ));
        self
    }

    pub fn line<S: Into<String>>(mut self, line: S) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn build(self) -> Vec<String> {
        self.lines
    }
}

/// Délai dépassé, Windows pt-BR
pub fn pt_br_timeout(host: &str) -> Vec<String> {
    PingOutputBuilder::new(host).timeout().summary(1, 0).build()
}

/// Réponse normale, Windows pt-BR
pub fn pt_br_success(host: &str) -> Vec<String> {
    PingOutputBuilder::new(host).reply(12).summary(1, 1).build()
}

/// Résumé en minuscules qui déclenche "perdidos = 1"
pub fn pt_br_lost_summary() -> Vec<String> {
    vec!["Pacotes: enviados = 1, recebidos = 0, perdidos = 1".to_string()]
}

/// Délai dépassé, Windows en-US
pub fn en_windows_timeout(host: &str) -> Vec<String> {
    vec![
        String::new(),
        format!("Pinging {} with 32 bytes of data:", host),
        "Request timed out.".to_string(),
        String::new(),
        format!("Ping statistics for {}:", host),
        "    Packets: Sent = 1, Received = 0, Lost = 1 (100% loss),".to_string(),
    ]
}

/// Perte totale, iputils
pub fn iputils_loss(host: &str) -> Vec<String> {
    vec![
        format!("PING {} ({}) 56(84) bytes of data.", host, host),
        String::new(),
        format!("--- {} ping statistics ---", host),
        "1 packets transmitted, 0 received, 100% packet loss, time 0ms".to_string(),
    ]
}

/// Réponse normale, iputils
pub fn iputils_success(host: &str) -> Vec<String> {
    vec![
        format!("PING {} ({}) 56(84) bytes of data.", host, host),
        format!("64 bytes from {}: icmp_seq=1 ttl=57 time=11.8 ms", host),
        String::new(),
        format!("--- {} ping statistics ---", host),
        "1 packets transmitted, 1 received, 0% packet loss, time 0ms".to_string(),
        "rtt min/avg/max/mdev = 11.812/11.812/11.812/0.000 ms".to_string(),
    ]
}
