//! Probe output normalization and packet-loss detection
//!
//! Ping utilities localize their messages, so every line is decomposed (NFD)
//! and stripped to 7-bit ASCII before keyword matching:
//! - "Esgotado o tempo" and "Esgotádo" both become plain ASCII
//! - The full normalized transcript is kept as alert evidence
//! - Matching is a case-sensitive substring test against an `IndicatorSet`

use crate::error::ConfigError;
use unicode_normalization::UnicodeNormalization;

/// Named table of loss indicators for one ping locale/platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorSet {
    name: String,
    indicators: Vec<String>,
}

/// Built-in sets: (name, indicators)
const BUILTIN_SETS: &[(&str, &[&str])] = &[
    ("pt-BR", &["Esgotado", "perdidos = 1"]),
    ("en-windows", &["Request timed out", "Lost = 1"]),
    ("en-iputils", &["100% packet loss", "0 received"]),
];

pub const DEFAULT_INDICATOR_SET: &str = "pt-BR";

impl IndicatorSet {
    pub fn new(name: impl Into<String>, indicators: Vec<String>) -> Self {
        Self { name: name.into(), indicators }
    }

    /// Look up a built-in set by exact name
    pub fn builtin(name: &str) -> Result<Self, ConfigError> {
        BUILTIN_SETS
            .iter()
            .find(|(set_name, _)| *set_name == name)
            .map(|(set_name, indicators)| {
                Self::new(*set_name, indicators.iter().map(|s| s.to_string()).collect())
            })
            .ok_or_else(|| {
                ConfigError::UnknownIndicatorSet(name.to_string(), Self::builtin_names().join(", "))
            })
    }

    pub fn builtin_names() -> Vec<&'static str> {
        BUILTIN_SETS.iter().map(|(name, _)| *name).collect()
    }

    /// Append extra indicators, skipping empty strings (they would match every line)
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indicators.extend(
            extra.into_iter().map(Into::into).filter(|indicator: &String| !indicator.trim().is_empty()),
        );
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn indicators(&self) -> &[String] {
        &self.indicators
    }

    /// Case-sensitive substring match against any indicator
    pub fn matches(&self, normalized_line: &str) -> bool {
        self.indicators.iter().any(|indicator| normalized_line.contains(indicator.as_str()))
    }
}

impl Default for IndicatorSet {
    fn default() -> Self {
        Self::new(
            DEFAULT_INDICATOR_SET,
            vec!["Esgotado".to_string(), "perdidos = 1".to_string()],
        )
    }
}

/// Outcome of processing one probe's output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeResult {
    pub transcript: Vec<String>,
    pub loss_detected: bool,
}

/// Decompose to NFD and drop every non-ASCII code point
pub fn normalize_line(line: &str) -> String {
    line.nfd().filter(char::is_ascii).collect()
}

/// Applies normalization and an indicator set to raw probe output
#[derive(Debug, Clone, Default)]
pub struct LossDetector {
    indicators: IndicatorSet,
}

impl LossDetector {
    pub fn new(indicators: IndicatorSet) -> Self {
        Self { indicators }
    }

    pub fn indicators(&self) -> &IndicatorSet {
        &self.indicators
    }

    /// Normalize every line in order; a single match anywhere flags loss
    pub fn process<I, S>(&self, lines: I) -> ProbeResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut result = ProbeResult::default();

        for line in lines {
            let normalized = normalize_line(line.as_ref());
            if !result.loss_detected && self.indicators.matches(&normalized) {
                result.loss_detected = true;
            }
            result.transcript.push(normalized);
        }

        result
    }
}
