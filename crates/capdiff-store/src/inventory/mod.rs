//! Inventory loader with validation
//!
//! Parses the YAML inventory and validates hostnames before any capture runs.
//! Every problem is fatal: a capture never starts from a half-valid inventory.

pub mod format;

use crate::errors::{duplicate_hostname, invalid_inventory, Result};
use capdiff_core::model::InventoryRecord;
use format::RawRecord;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Load and validate an inventory file
pub fn load_inventory(path: &Path) -> Result<Vec<InventoryRecord>> {
    let content = fs::read_to_string(path).map_err(|e| {
        invalid_inventory(&format!("Failed to read inventory file: {}", e)).with_path(path)
    })?;

    parse_inventory_str(&content).map_err(|e| e.with_path(path))
}

/// Parse and validate an inventory from a string
pub fn parse_inventory_str(content: &str) -> Result<Vec<InventoryRecord>> {
    let raw: Vec<RawRecord> = serde_yaml::from_str(content)
        .map_err(|e| invalid_inventory(&format!("YAML parse error: {}", e)))?;

    let records: Vec<InventoryRecord> = raw.into_iter().map(InventoryRecord::from).collect();
    validate_inventory(&records)?;

    tracing::debug!(devices = records.len(), "inventory loaded");
    Ok(records)
}

fn validate_inventory(records: &[InventoryRecord]) -> Result<()> {
    let mut hostnames = HashSet::new();

    for (index, record) in records.iter().enumerate() {
        validate_hostname(index, &record.hostname)?;

        if record.connection.address.trim().is_empty() {
            return Err(invalid_inventory(&format!(
                "Record '{}' has an empty address",
                record.hostname
            )));
        }

        if !hostnames.insert(record.hostname.as_str()) {
            return Err(duplicate_hostname(&record.hostname));
        }
    }

    Ok(())
}

// Hostnames prefix artifact file names, so they must stay a single path component
fn validate_hostname(index: usize, hostname: &str) -> Result<()> {
    if hostname.trim().is_empty() {
        return Err(invalid_inventory(&format!(
            "Record #{} has an empty hostname",
            index + 1
        )));
    }
    if hostname == "." || hostname == ".." || hostname.contains(['/', '\\']) {
        return Err(invalid_inventory(&format!(
            "Hostname '{}' cannot be used in a file name",
            hostname
        )));
    }
    Ok(())
}
