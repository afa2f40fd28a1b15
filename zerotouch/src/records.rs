//! Device record source.
//!
//! Records arrive as CSV rows, one per expected device. The header schema
//! is validated before any row is read: a missing column is the one fatal,
//! pre-flight error of a run, raised before any device is touched.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::RecordError;

/// Columns every record source must provide.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "model",
    "serial",
    "port",
    "baud_rate",
    "hostname",
    "username",
    "password",
    "domain",
];

/// One expected device, as loaded from the record source.
#[derive(Clone, Deserialize)]
pub struct DeviceRecord {
    /// Expected hardware model (PID), compared case-sensitively.
    pub model: String,

    /// Expected serial number (SN), compared case-sensitively.
    pub serial: String,

    /// Serial port name or path the device is reachable on.
    pub port: String,

    /// Baud rate for the console line.
    pub baud_rate: u32,

    /// Hostname to configure on a positive identity match.
    pub hostname: String,

    /// Local user to create.
    pub username: String,

    /// Password for the local user.
    pub password: String,

    /// Domain name, required for RSA key generation.
    pub domain: String,
}

impl fmt::Debug for DeviceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceRecord")
            .field("model", &self.model)
            .field("serial", &self.serial)
            .field("port", &self.port)
            .field("baud_rate", &self.baud_rate)
            .field("hostname", &self.hostname)
            .field("username", &self.username)
            .field("password", &"<hidden>")
            .field("domain", &self.domain)
            .finish()
    }
}

/// Load and validate records from a CSV reader.
///
/// The header row is checked against [`REQUIRED_COLUMNS`] before any row is
/// deserialized; every missing column is reported at once.
pub fn load_records<R: Read>(source: R) -> Result<Vec<DeviceRecord>, RecordError> {
    let mut reader = csv::Reader::from_reader(source);

    let headers = reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| (*column).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(RecordError::MissingColumns { missing });
    }

    reader
        .deserialize()
        .collect::<Result<Vec<DeviceRecord>, csv::Error>>()
        .map_err(Into::into)
}

/// Load records from a CSV file on disk.
pub fn load_records_from_path(path: impl AsRef<Path>) -> Result<Vec<DeviceRecord>, RecordError> {
    let file = File::open(path)?;
    load_records(file)
}
