//! # File I/O Module
//!
//! Quote and configuration files on disk:
//! - **Atomic saves**: write to `.tmp`, fsync, rename over the target
//! - **Version validation**: quotes from a newer schema are refused
//!
//! ## File Formats
//!
//! - `.pq` - a full [`Quote`] as pretty JSON
//! - `.json` - an exported [`OverheadConfig`], a flat object plus an
//!   `exportedAt` timestamp that imports ignore
//!
//! ## Example
//!
//! ```rust,no_run
//! use quote_core::file_io::{load_quote, save_quote};
//! use quote_core::quote::Quote;
//! use std::path::Path;
//!
//! let quote = Quote::new("Client");
//! save_quote(&quote, Path::new("order.pq"))?;
//! let loaded = load_quote(Path::new("order.pq"))?;
//! # Ok::<(), quote_core::errors::QuoteError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::errors::{QuoteError, QuoteResult};
use crate::overhead::OverheadConfig;
use crate::quote::{Quote, SCHEMA_VERSION};

/// Temp path next to the target: `order.pq` -> `order.pq.tmp`
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write bytes so that `path` holds either the old or the new content,
/// never a partial file.
fn atomic_write(path: &Path, bytes: &[u8]) -> QuoteResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        QuoteError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(bytes).map_err(|e| {
        QuoteError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        QuoteError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        QuoteError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

fn read_to_string(path: &Path) -> QuoteResult<String> {
    let mut file = File::open(path)
        .map_err(|e| QuoteError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| QuoteError::file_error("read", path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

// ============================================================================
// Quotes
// ============================================================================

/// Save a quote with atomic write semantics.
pub fn save_quote(quote: &Quote, path: &Path) -> QuoteResult<()> {
    let json = serde_json::to_string_pretty(quote).map_err(|e| QuoteError::SerializationError {
        reason: e.to_string(),
    })?;
    atomic_write(path, json.as_bytes())?;
    debug!("Saved quote with {} items to {}", quote.ledger.len(), path.display());
    Ok(())
}

/// Load a quote.
///
/// # Returns
///
/// * `Err(QuoteError::VersionMismatch)` - File schema is incompatible
/// * `Err(QuoteError::SerializationError)` - Invalid JSON
/// * `Err(QuoteError::FileError)` - I/O error
pub fn load_quote(path: &Path) -> QuoteResult<Quote> {
    let contents = read_to_string(path)?;

    let quote: Quote = serde_json::from_str(&contents).map_err(|e| QuoteError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&quote.meta.version)?;
    quote.overhead.validate()?;

    debug!("Loaded quote with {} items from {}", quote.ledger.len(), path.display());
    Ok(quote)
}

/// Check that a file version is compatible with the current schema.
///
/// The major version must match; on 0.x a newer minor is refused.
fn validate_version(file_version: &str) -> QuoteResult<()> {
    let mismatch = || QuoteError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    match (file_parts.as_slice(), current_parts.as_slice()) {
        ([file_major, rest @ ..], [current_major, current_rest @ ..]) => {
            if file_major != current_major {
                return Err(mismatch());
            }
            if *current_major == 0 {
                if let (Some(file_minor), Some(current_minor)) = (rest.first(), current_rest.first()) {
                    if file_minor > current_minor {
                        return Err(mismatch());
                    }
                }
            }
            Ok(())
        }
        _ => Err(mismatch()),
    }
}

// ============================================================================
// Overhead Configuration
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigExport<'a> {
    #[serde(flatten)]
    config: &'a OverheadConfig,
    exported_at: DateTime<Utc>,
}

/// Write the overhead configuration to a JSON file.
pub fn export_config(config: &OverheadConfig, path: &Path) -> QuoteResult<()> {
    let export = ConfigExport {
        config,
        exported_at: Utc::now(),
    };
    let json = serde_json::to_string_pretty(&export).map_err(|e| QuoteError::SerializationError {
        reason: e.to_string(),
    })?;
    atomic_write(path, json.as_bytes())
}

/// Read an exported overhead configuration.
///
/// Fails with `ConfigImport` on malformed or incomplete content; the caller's
/// current configuration is not touched either way.
pub fn import_config(path: &Path) -> QuoteResult<OverheadConfig> {
    let contents = read_to_string(path)?;
    OverheadConfig::from_json(&contents)
}
