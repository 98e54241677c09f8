//! Lockfile management for server discovery
//!
//! Writes `<lockfile dir>/<port>.json` with:
//! - port: Server port number
//! - authToken: Authentication token
//! - pid: Process ID
//! - version: Crate version
//! - startedAt: RFC 3339 timestamp

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Lockfile JSON structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lockfile {
    pub port:       u16,
    pub auth_token: String,
    pub pid:        u32,
    pub version:    String,
    pub started_at: String,
}

/// Generate a random authentication token
pub fn generate_token(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Write lockfile with server information
pub fn write_lockfile(dir: &Path, port: u16, token: &str) -> Result<PathBuf> {
    // Create directory if it doesn't exist
    fs::create_dir_all(dir)?;

    let lockfile_path = dir.join(format!("{}.json", port));

    let lockfile = Lockfile {
        port,
        auth_token: token.to_string(),
        pid: std::process::id(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at: Utc::now().to_rfc3339(),
    };

    let json = serde_json::to_string_pretty(&lockfile)?;
    fs::write(&lockfile_path, json)?;

    Ok(lockfile_path)
}

/// Read a lockfile back
pub fn read_lockfile(path: &Path) -> Result<Lockfile> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Remove lockfile
pub fn remove_lockfile(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}
