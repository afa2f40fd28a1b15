//! Identity discovery over the console line.
//!
//! Runs the inventory-listing exchange and extracts the hardware model
//! (PID) and serial number (SN) from the captured transcript. Extraction
//! is pattern-based and soft: an absent field is `None`, never an error.

use std::time::Duration;

use log::debug;
use regex::Regex;
use tokio::time::sleep;

use crate::console::ConsoleReader;
use crate::error::Result;
use crate::timing::ConsoleTiming;
use crate::transport::Transport;

/// Case-insensitive Product ID label followed by the model token.
const PID_PATTERN: &str = r"(?i)PID:\s*([\w\-/.]+)";

/// Case-insensitive serial number label followed by the serial token.
const SN_PATTERN: &str = r"(?i)SN:\s*([\w\-]+)";

/// Command disabling output pagination for the session.
const DISABLE_PAGINATION: &[u8] = b"terminal length 0\n";

/// Command listing the hardware inventory.
const SHOW_INVENTORY: &[u8] = b"show inventory\n";

/// Identity extracted from one device.
#[derive(Debug, Clone)]
pub struct InventoryResult {
    /// Hardware model (PID), if the transcript contained one.
    pub model: Option<String>,

    /// Serial number (SN), if the transcript contained one.
    pub serial: Option<String>,

    /// The full captured transcript, kept for diagnosis even when neither
    /// field could be extracted.
    pub transcript: String,
}

impl InventoryResult {
    /// Exact, case-sensitive comparison against an expected identity.
    ///
    /// An absent field never matches.
    pub fn matches(&self, model: &str, serial: &str) -> bool {
        self.model.as_deref() == Some(model) && self.serial.as_deref() == Some(serial)
    }
}

/// Prober that runs the identity-discovery exchange.
pub struct InventoryProber {
    reader: ConsoleReader,
    step_settle: Duration,
    response_settle: Duration,
    pid_pattern: Regex,
    sn_pattern: Regex,
}

impl InventoryProber {
    /// Create a prober using the workflow's delay table.
    pub fn new(timing: &ConsoleTiming) -> Self {
        Self {
            reader: ConsoleReader::new(timing),
            step_settle: timing.probe_step_settle,
            response_settle: timing.response_settle,
            pid_pattern: Regex::new(PID_PATTERN).expect("invalid PID pattern"),
            sn_pattern: Regex::new(SN_PATTERN).expect("invalid SN pattern"),
        }
    }

    /// Run the identity exchange and parse the response.
    ///
    /// Wakes an idle console with a bare newline, disables pagination for
    /// the session, issues the inventory listing, then captures the full
    /// response until the line goes quiet. The transcript is always
    /// returned, even on total parse failure.
    pub async fn probe_identity<T: Transport>(&self, transport: &mut T) -> Result<InventoryResult> {
        transport.write_all(b"\n").await?;
        sleep(self.step_settle).await;

        transport.write_all(DISABLE_PAGINATION).await?;
        sleep(self.step_settle).await;

        transport.write_all(SHOW_INVENTORY).await?;
        let transcript = self
            .reader
            .read_until_quiet(transport, self.response_settle)
            .await?;

        let model = Self::capture(&self.pid_pattern, &transcript);
        let serial = Self::capture(&self.sn_pattern, &transcript);
        debug!("Probe extracted model {:?}, serial {:?}", model, serial);

        Ok(InventoryResult {
            model,
            serial,
            transcript,
        })
    }

    /// First capture of `pattern` anywhere in the transcript. Pagination
    /// can repeat banners; the first occurrence wins.
    fn capture(pattern: &Regex, transcript: &str) -> Option<String> {
        pattern
            .captures(transcript)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ScriptedTransport;

    const INVENTORY_RESPONSE: &[u8] = b"show inventory\n\
        NAME: \"1\", DESCR: \"WS-C2960-24TT-L\"\n\
        PID: WS-C2960-24TT-L  , VID: V02  , SN: FOC1234A5BC\n";

    fn prober() -> InventoryProber {
        InventoryProber::new(&ConsoleTiming::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_extracts_model_and_serial() {
        let mut transport = ScriptedTransport::new().reply(INVENTORY_RESPONSE);

        let result = prober().probe_identity(&mut transport).await.unwrap();

        assert_eq!(result.model.as_deref(), Some("WS-C2960-24TT-L"));
        assert_eq!(result.serial.as_deref(), Some("FOC1234A5BC"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_labels_match_any_case() {
        let mut transport =
            ScriptedTransport::new().reply(b"pid: WS-C2960-24TT-L , sn: FOC1234A5BC\n");

        let result = prober().probe_identity(&mut transport).await.unwrap();

        assert_eq!(result.model.as_deref(), Some("WS-C2960-24TT-L"));
        assert_eq!(result.serial.as_deref(), Some("FOC1234A5BC"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_match_wins_on_repeated_banners() {
        let mut transport = ScriptedTransport::new()
            .reply(b"PID: WS-C2960-24TT-L , SN: FOC1234A5BC\n --More-- ")
            .reply(b"PID: WS-C3560-48PS-S , SN: CAT9876Z1XY\n");

        let result = prober().probe_identity(&mut transport).await.unwrap();

        assert_eq!(result.model.as_deref(), Some("WS-C2960-24TT-L"));
        assert_eq!(result.serial.as_deref(), Some("FOC1234A5BC"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_fields_are_none() {
        let mut transport = ScriptedTransport::new().reply(b"% Incomplete command.\n");

        let result = prober().probe_identity(&mut transport).await.unwrap();

        assert!(result.model.is_none());
        assert!(result.serial.is_none());
        // Transcript survives parse failure for diagnosis.
        assert!(result.transcript.contains("% Incomplete command."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_discovery_write_sequence() {
        let mut transport = ScriptedTransport::new().reply(INVENTORY_RESPONSE);
        let log = transport.write_log();

        prober().probe_identity(&mut transport).await.unwrap();

        assert_eq!(
            log.written_commands(),
            vec!["\n", "terminal length 0\n", "show inventory\n"]
        );
    }
}
