//! Replays captured message logs through the decoder.
//!
//! A capture is a text file with one message per line, in wire form,
//! debug form, or a mix of both. Blank lines and lines starting with `#`
//! are skipped. Every other line is decoded, optionally re-encoded and
//! compared, and tallied into a [`ReplayReport`].

use std::collections::BTreeMap;

use hexwire_protocol::{Message, from_debug, from_wire, to_debug, to_wire};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use crate::HexwireError;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Which form the lines of a capture are in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineForm {
    Wire,
    Debug,
    /// Decide per line: wire lines start with a digit, debug lines with a
    /// type name followed by `:`.
    #[default]
    Auto,
}

/// Settings for one replay run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    pub form: LineForm,

    /// Stop at the first line that fails instead of recording it.
    pub halt_on_error: bool,

    /// Re-encode each decoded message and compare against the input.
    pub verify_round_trip: bool,

    /// Lines longer than this (in bytes) are recorded as failures.
    pub max_line_len: usize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            form: LineForm::Auto,
            halt_on_error: false,
            verify_round_trip: true,
            max_line_len: 65536,
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// A line that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineFailure {
    /// 1-based line number in the capture.
    pub line: usize,
    pub reason: String,
}

/// Outcome of a replay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    /// Lines that held a message, decoded or not.
    pub lines: usize,
    /// Decoded messages per current debug name.
    pub counts: BTreeMap<&'static str, usize>,
    pub failures: Vec<LineFailure>,
    /// Messages that decoded but did not re-encode to the same thing.
    pub round_trip_mismatches: usize,
}

impl ReplayReport {
    pub fn decoded(&self) -> usize {
        self.counts.values().sum()
    }

    /// No failures and no mismatches.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.round_trip_mismatches == 0
    }
}

// ---------------------------------------------------------------------------
// Replayer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Replayer {
    config: ReplayConfig,
}

impl Replayer {
    pub fn new(config: ReplayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// Reads `reader` to the end and decodes every message line.
    ///
    /// # Errors
    ///
    /// [`HexwireError::Io`] if reading fails or the input is not UTF-8,
    /// and [`HexwireError::ReplayHalted`] on the first bad line when
    /// `halt_on_error` is set.
    pub async fn replay<R>(&self, reader: R) -> Result<ReplayReport, HexwireError>
    where
        R: AsyncBufRead + Unpin,
    {
        info!(form = ?self.config.form, "replay started");
        let mut report = ReplayReport::default();
        let mut lines = reader.lines();
        let mut line_no = 0;

        while let Some(raw) = lines.next_line().await? {
            line_no += 1;
            let line = raw.strip_suffix('\r').unwrap_or(&raw);
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            report.lines += 1;

            match self.decode_line(line) {
                Ok(msg) => {
                    *report.counts.entry(msg.message_type().name()).or_default() += 1;
                    if self.config.verify_round_trip && !self.round_trips(line, &msg) {
                        warn!(line = line_no, message_type = %msg.message_type(), "round trip mismatch");
                        report.round_trip_mismatches += 1;
                    }
                }
                Err(reason) => {
                    debug!(line = line_no, %reason, "line failed");
                    if self.config.halt_on_error {
                        return Err(HexwireError::ReplayHalted {
                            line: line_no,
                            reason,
                        });
                    }
                    report.failures.push(LineFailure {
                        line: line_no,
                        reason,
                    });
                }
            }
        }

        info!(
            lines = report.lines,
            decoded = report.decoded(),
            failures = report.failures.len(),
            mismatches = report.round_trip_mismatches,
            "replay finished"
        );
        Ok(report)
    }

    fn decode_line(&self, line: &str) -> Result<Message, String> {
        if line.len() > self.config.max_line_len {
            return Err(format!(
                "line is {} bytes, limit is {}",
                line.len(),
                self.config.max_line_len
            ));
        }
        match self.form_of(line) {
            Some(LineForm::Wire) => from_wire(line).map_err(|e| e.to_string()),
            Some(_) => from_debug(line).map_err(|e| e.to_string()),
            None => Err("neither wire nor debug form".to_string()),
        }
    }

    fn form_of(&self, line: &str) -> Option<LineForm> {
        match self.config.form {
            LineForm::Auto => detect_form(line),
            form => Some(form),
        }
    }

    /// Wire lines must reproduce byte for byte. Legacy names and masked
    /// passwords change debug text, so a debug line only has to reach a
    /// fixed point: its re-encoding parses and re-encodes to itself.
    fn round_trips(&self, line: &str, msg: &Message) -> bool {
        match self.form_of(line) {
            Some(LineForm::Wire) => to_wire(msg) == line,
            _ => {
                let text = to_debug(msg);
                from_debug(&text).is_ok_and(|again| to_debug(&again) == text)
            }
        }
    }
}

fn detect_form(line: &str) -> Option<LineForm> {
    if line.starts_with(|c: char| c.is_ascii_digit()) {
        return Some(LineForm::Wire);
    }
    let colon = line.find(':')?;
    let name = &line[..colon];
    let is_name = name.starts_with(|c: char| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    is_name.then_some(LineForm::Debug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_form() {
        assert_eq!(detect_form("1039|ga,2,3"), Some(LineForm::Wire));
        assert_eq!(detect_form("SOCGameState:game=ga|state=20"), Some(LineForm::Debug));
        assert_eq!(detect_form("game=ga|state=20"), None);
        assert_eq!(detect_form("SOC Game:x"), None);
        assert_eq!(detect_form(":x"), None);
    }

    #[test]
    fn test_default_config() {
        let config = ReplayConfig::default();
        assert_eq!(config.form, LineForm::Auto);
        assert!(!config.halt_on_error);
        assert!(config.verify_round_trip);
        assert_eq!(config.max_line_len, 65536);
    }

    #[test]
    fn test_forced_form_skips_detection() {
        let replayer = Replayer::new(ReplayConfig {
            form: LineForm::Debug,
            ..ReplayConfig::default()
        });
        assert!(replayer.decode_line("1039|ga,2,3").is_err());
        assert!(replayer.decode_line("SOCAcceptOffer:game=ga|accepting=2|offering=3").is_ok());
    }

    #[test]
    fn test_long_lines_are_rejected() {
        let replayer = Replayer::new(ReplayConfig {
            max_line_len: 8,
            ..ReplayConfig::default()
        });
        let err = replayer.decode_line("1039|ga,2,3").unwrap_err();
        assert!(err.contains("limit is 8"));
    }
}
