//! One sequential pass over the device records.
//!
//! Each record is processed independently: open the port, let the line
//! settle, probe the identity, compare, and configure only on an exact
//! match. A failure on one device becomes that record's report and the
//! pass continues; it never aborts the batch.

use log::{error, info, warn};
use tokio::time::sleep;

use crate::error::Result;
use crate::inventory::{InventoryProber, InventoryResult};
use crate::provision::CommandScript;
use crate::records::DeviceRecord;
use crate::timing::ConsoleTiming;
use crate::transport::{SerialConfig, SerialTransport, Transport};

/// What happened on one device that was reached over its console.
#[derive(Debug)]
pub enum DeviceOutcome {
    /// Identity matched and the configuration script was sent.
    Configured,

    /// Identity did not match the record; no configuration was applied.
    IdentityMismatch {
        /// Model extracted from the device, if any.
        found_model: Option<String>,
        /// Serial extracted from the device, if any.
        found_serial: Option<String>,
        /// Full inventory transcript, for operator diagnosis.
        transcript: String,
    },
}

/// Per-record result of a batch pass.
#[derive(Debug)]
pub struct DeviceReport {
    /// Port the record pointed at.
    pub port: String,

    /// Outcome, or the error that ended this device's session.
    pub result: Result<DeviceOutcome>,
}

impl DeviceReport {
    /// Whether this device ended up configured.
    pub fn is_configured(&self) -> bool {
        matches!(self.result, Ok(DeviceOutcome::Configured))
    }
}

/// Drives one sequential pass over a set of device records.
pub struct BatchRunner {
    timing: ConsoleTiming,
    prober: InventoryProber,
}

impl BatchRunner {
    /// Create a runner with the default delay table.
    pub fn new() -> Self {
        Self::with_timing(ConsoleTiming::default())
    }

    /// Create a runner with a custom delay table.
    pub fn with_timing(timing: ConsoleTiming) -> Self {
        Self {
            prober: InventoryProber::new(&timing),
            timing,
        }
    }

    /// Process every record over its serial port.
    pub async fn run(&self, records: &[DeviceRecord]) -> Vec<DeviceReport> {
        self.run_with(records, |record| {
            SerialTransport::open(SerialConfig::new(&record.port, record.baud_rate))
        })
        .await
    }

    /// Process every record, opening transports through `open`.
    ///
    /// Failures of any kind — open, probe, or configuration — are contained
    /// at the record boundary: they become that record's `Err` report,
    /// logged with the port identifier, and the pass continues. The
    /// transport is dropped before the next record on every path.
    pub async fn run_with<T, F>(&self, records: &[DeviceRecord], mut open: F) -> Vec<DeviceReport>
    where
        T: Transport,
        F: FnMut(&DeviceRecord) -> Result<T>,
    {
        let mut reports = Vec::with_capacity(records.len());
        for record in records {
            info!("Connecting to {}...", record.port);
            let result = self.provision_one(record, &mut open).await;

            match &result {
                Ok(DeviceOutcome::Configured) => {
                    info!(
                        "Configuration applied to '{}' on {}",
                        record.hostname, record.port
                    );
                }
                Ok(DeviceOutcome::IdentityMismatch {
                    found_model,
                    found_serial,
                    transcript,
                }) => {
                    warn!(
                        "{}: expected {} / {}, found {:?} / {:?}; skipping configuration",
                        record.port, record.model, record.serial, found_model, found_serial
                    );
                    warn!("Full inventory transcript:\n{}", transcript);
                }
                Err(e) => error!("Error on {}: {}", record.port, e),
            }

            reports.push(DeviceReport {
                port: record.port.clone(),
                result,
            });
        }
        reports
    }

    /// One device session: open, settle, probe, compare, configure.
    ///
    /// The transport lives only inside this call, so the port is released
    /// on success and on every error path alike.
    async fn provision_one<T, F>(
        &self,
        record: &DeviceRecord,
        open: &mut F,
    ) -> Result<DeviceOutcome>
    where
        T: Transport,
        F: FnMut(&DeviceRecord) -> Result<T>,
    {
        let mut transport = open(record)?;
        sleep(self.timing.line_settle).await;

        let identity = self.prober.probe_identity(&mut transport).await?;
        info!(
            "Detected model: {:?}, serial: {:?}",
            identity.model, identity.serial
        );

        if identity.matches(&record.model, &record.serial) {
            CommandScript::for_device(record, &self.timing)
                .apply(&mut transport)
                .await?;
            Ok(DeviceOutcome::Configured)
        } else {
            let InventoryResult {
                model: found_model,
                serial: found_serial,
                transcript,
            } = identity;
            Ok(DeviceOutcome::IdentityMismatch {
                found_model,
                found_serial,
                transcript,
            })
        }
    }
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;

    use super::*;
    use crate::error::TransportError;
    use crate::transport::ScriptedTransport;

    const MATCHING_INVENTORY: &[u8] = b"PID: WS-C2960-24TT-L  , VID: V02  , SN: FOC1234A5BC\n";

    fn record(port: &str) -> DeviceRecord {
        DeviceRecord {
            model: "WS-C2960-24TT-L".into(),
            serial: "FOC1234A5BC".into(),
            port: port.into(),
            baud_rate: 9600,
            hostname: "sw-access-01".into(),
            username: "admin".into(),
            password: "s3cret".into(),
            domain: "example.net".into(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_matching_identity_is_configured() {
        let records = vec![record("COM3")];
        let transport = ScriptedTransport::new().reply(MATCHING_INVENTORY);
        let log = transport.write_log();
        let mut transports = VecDeque::from([transport]);

        let reports = BatchRunner::new()
            .run_with(&records, |_| Ok(transports.pop_front().expect("one record")))
            .await;

        assert_eq!(reports.len(), 1);
        assert!(reports[0].is_configured());

        // Three probe writes, then the full fifteen-step script.
        let written = log.written_commands();
        assert_eq!(written.len(), 18);
        assert_eq!(written[3], "configure terminal\n");
        assert_eq!(written[17], "write memory\n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_mismatch_applies_nothing() {
        // Serial differs from the record by case only.
        let records = vec![record("COM3")];
        let transport =
            ScriptedTransport::new().reply(b"PID: WS-C2960-24TT-L , SN: foc1234a5bc\n");
        let log = transport.write_log();
        let mut transports = VecDeque::from([transport]);

        let reports = BatchRunner::new()
            .run_with(&records, |_| Ok(transports.pop_front().expect("one record")))
            .await;

        match &reports[0].result {
            Ok(DeviceOutcome::IdentityMismatch {
                found_serial,
                transcript,
                ..
            }) => {
                assert_eq!(found_serial.as_deref(), Some("foc1234a5bc"));
                assert!(transcript.contains("PID:"));
            }
            other => panic!("expected mismatch, got {:?}", other),
        }

        // Probe writes only; no configuration command went out.
        assert_eq!(log.writes().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_parse_failure_is_a_mismatch() {
        let records = vec![record("COM3")];
        let transport = ScriptedTransport::new().reply(b"% Incomplete command.\n");
        let log = transport.write_log();
        let mut transports = VecDeque::from([transport]);

        let reports = BatchRunner::new()
            .run_with(&records, |_| Ok(transports.pop_front().expect("one record")))
            .await;

        match &reports[0].result {
            Ok(DeviceOutcome::IdentityMismatch {
                found_model,
                found_serial,
                ..
            }) => {
                assert!(found_model.is_none());
                assert!(found_serial.is_none());
            }
            other => panic!("expected mismatch, got {:?}", other),
        }
        assert_eq!(log.writes().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_failure_does_not_abort_the_batch() {
        let records = vec![record("COM1"), record("COM2"), record("COM3")];
        let mut transports = VecDeque::from([
            ScriptedTransport::new().reply(MATCHING_INVENTORY),
            ScriptedTransport::new().fail(),
            ScriptedTransport::new().reply(MATCHING_INVENTORY),
        ]);

        let reports = BatchRunner::new()
            .run_with(&records, |_| {
                Ok(transports.pop_front().expect("three records"))
            })
            .await;

        assert_eq!(reports.len(), 3);
        assert!(reports[0].is_configured());
        assert!(reports[1].result.is_err());
        assert!(reports[2].is_configured());
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_failure_is_isolated() {
        let records = vec![record("COM1"), record("COM2")];
        let mut working = VecDeque::from([ScriptedTransport::new().reply(MATCHING_INVENTORY)]);

        let reports = BatchRunner::new()
            .run_with(&records, |rec| {
                if rec.port == "COM1" {
                    Err(TransportError::Io(io::Error::new(
                        io::ErrorKind::NotFound,
                        "no such port",
                    ))
                    .into())
                } else {
                    Ok(working.pop_front().expect("one working transport"))
                }
            })
            .await;

        assert!(reports[0].result.is_err());
        assert!(reports[1].is_configured());
    }
}
