//! Scripted configuration push.
//!
//! The runner is open-loop: commands go out in a fixed order with fixed
//! settle delays, and nothing is read back between steps. Elapsed time is
//! the only synchronization the console protocol offers here; the batch
//! runner's per-device failure isolation is the safety net around it.

use std::time::Duration;

use log::debug;
use tokio::time::sleep;

use crate::error::Result;
use crate::records::DeviceRecord;
use crate::timing::ConsoleTiming;
use crate::transport::Transport;

/// Modulus sent blind after RSA key generation. The device may or may not
/// prompt for it; waiting to detect the prompt risks a pagination deadlock,
/// so the answer goes out either way.
const RSA_KEY_MODULUS: &str = "1024";

/// One command in the script, with the delay that follows it.
#[derive(Debug, Clone)]
pub struct ScriptStep {
    /// Command text, sent newline-terminated.
    pub command: String,

    /// How long to wait after sending, before the next step.
    pub settle: Duration,

    /// Whether the command carries credentials and must be masked in logs.
    pub hidden: bool,
}

impl ScriptStep {
    fn new(command: impl Into<String>, settle: Duration) -> Self {
        Self {
            command: command.into(),
            settle,
            hidden: false,
        }
    }

    /// A step whose command text is masked in logs.
    fn hidden(command: impl Into<String>, settle: Duration) -> Self {
        Self {
            command: command.into(),
            settle,
            hidden: true,
        }
    }
}

/// The fixed configuration sequence, parameterized for one device.
///
/// Split into a base identity/crypto phase, the blind key-modulus
/// follow-up, and the SSH/line hardening phase.
#[derive(Debug, Clone)]
pub struct CommandScript {
    base: Vec<ScriptStep>,
    key_modulus: ScriptStep,
    hardening: Vec<ScriptStep>,
}

impl CommandScript {
    /// Build the script for one device record.
    pub fn for_device(record: &DeviceRecord, timing: &ConsoleTiming) -> Self {
        let base = vec![
            ScriptStep::new("configure terminal", timing.base_step_settle),
            ScriptStep::new(
                format!("hostname {}", record.hostname),
                timing.base_step_settle,
            ),
            ScriptStep::hidden(
                format!(
                    "username {} password {}",
                    record.username, record.password
                ),
                timing.base_step_settle,
            ),
            ScriptStep::new(
                format!("ip domain-name {}", record.domain),
                timing.base_step_settle,
            ),
            ScriptStep::new("crypto key generate rsa", timing.base_step_settle),
        ];

        let key_modulus = ScriptStep::new(RSA_KEY_MODULUS, timing.key_modulus_settle);

        let hardening = vec![
            ScriptStep::new("ip ssh version 2", timing.hardening_step_settle),
            ScriptStep::new("line console 0", timing.hardening_step_settle),
            ScriptStep::new("login local", timing.hardening_step_settle),
            ScriptStep::new("line vty 0 4", timing.hardening_step_settle),
            ScriptStep::new("login local", timing.hardening_step_settle),
            ScriptStep::new("transport input ssh", timing.hardening_step_settle),
            ScriptStep::new("transport output ssh", timing.hardening_step_settle),
            ScriptStep::new("end", timing.hardening_step_settle),
            ScriptStep::new("write memory", timing.hardening_step_settle),
        ];

        Self {
            base,
            key_modulus,
            hardening,
        }
    }

    /// Every step in send order.
    pub fn steps(&self) -> impl Iterator<Item = &ScriptStep> {
        self.base
            .iter()
            .chain(std::iter::once(&self.key_modulus))
            .chain(self.hardening.iter())
    }

    /// Send the full script, trusting fixed delays for timing.
    ///
    /// Assumes the device sits at a responsive top-level prompt. Failures
    /// surface only through the transport, never through command output.
    pub async fn apply<T: Transport>(&self, transport: &mut T) -> Result<()> {
        for step in self.steps() {
            Self::send(transport, step).await?;
        }
        Ok(())
    }

    async fn send<T: Transport>(transport: &mut T, step: &ScriptStep) -> Result<()> {
        if step.hidden {
            debug!("Sending <hidden>");
        } else {
            debug!("Sending '{}'", step.command);
        }
        transport
            .write_all(format!("{}\n", step.command).as_bytes())
            .await?;
        sleep(step.settle).await;
        Ok(())
    }
}
