//! # Zerotouch
//!
//! Serial console zero-touch provisioner for network devices.
//!
//! Zerotouch reads a list of expected devices (hardware model and serial
//! number) from a CSV source, connects to each device's serial console,
//! confirms its identity via the inventory listing, and — only on an exact
//! match — pushes a fixed configuration sequence: hostname, local user,
//! RSA key, and SSH/VTY/console transport hardening.
//!
//! The console protocol offers no completion signal, so the whole workflow
//! is paced by fixed settle delays and quiescence-based reads: a command's
//! output is considered complete once a read attempt yields no bytes.
//! Pagination prompts (`--More--`) are answered mid-read with a space.
//!
//! Devices are processed one at a time. A failure on one device — an
//! unopenable port, a dead console — is logged and reported for that
//! device alone; the batch always runs to the end.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zerotouch::{BatchRunner, load_records_from_path};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let records = load_records_from_path("devices.csv")?;
//!
//!     let reports = BatchRunner::new().run(&records).await;
//!
//!     for report in &reports {
//!         println!("{}: configured = {}", report.port, report.is_configured());
//!     }
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod console;
pub mod error;
pub mod inventory;
pub mod provision;
pub mod records;
pub mod timing;
pub mod transport;

// Re-export main types for convenience
pub use batch::{BatchRunner, DeviceOutcome, DeviceReport};
pub use console::ConsoleReader;
pub use error::Error;
pub use inventory::{InventoryProber, InventoryResult};
pub use provision::CommandScript;
pub use records::{DeviceRecord, load_records, load_records_from_path};
pub use timing::ConsoleTiming;
pub use transport::{SerialConfig, SerialTransport, Transport};
