//! Fixed delay table for the provisioning workflow.
//!
//! The console protocol offers no completion signal: the only indication
//! that a command has been processed is elapsed time plus the absence of
//! further output. Every step of the workflow therefore carries a settle
//! delay, collected here in one place so the timing discipline is visible
//! and overridable as a whole.

use std::time::Duration;

/// Per-step settle delays used across a device session.
#[derive(Debug, Clone)]
pub struct ConsoleTiming {
    /// Wait after opening the port, before the first write.
    pub line_settle: Duration,

    /// Wait after each identity-probe write (wake newline, pagination off).
    pub probe_step_settle: Duration,

    /// Wait before the first read of a command response.
    pub response_settle: Duration,

    /// Wait after answering a pagination prompt.
    pub pagination_pause: Duration,

    /// Wait after each base configuration command.
    pub base_step_settle: Duration,

    /// Wait after the blind RSA key modulus write.
    pub key_modulus_settle: Duration,

    /// Wait after each SSH/line hardening command.
    pub hardening_step_settle: Duration,
}

impl Default for ConsoleTiming {
    fn default() -> Self {
        Self {
            line_settle: Duration::from_secs(2),
            probe_step_settle: Duration::from_millis(500),
            response_settle: Duration::from_secs(2),
            pagination_pause: Duration::from_millis(300),
            base_step_settle: Duration::from_secs(1),
            key_modulus_settle: Duration::from_secs(2),
            hardening_step_settle: Duration::from_millis(700),
        }
    }
}
