//! Inventory and artifact naming model
//!
//! An inventory is an ordered list of [`InventoryRecord`]s, built once by the
//! inventory loader and never mutated during a capture pass.

use capdiff_core_types::Sensitive;
use std::collections::BTreeMap;

/// Extension appended to every capture artifact file name
pub const ARTIFACT_EXTENSION: &str = "txt";

/// How to reach one device
#[derive(Debug, Clone)]
pub struct ConnectionDescriptor {
    /// IP address or DNS name
    pub address: String,
    /// Platform/OS identifier understood by the executor (e.g. `cisco_ios`)
    pub device_type: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<Sensitive<String>>,
}

/// One device and the commands to capture from it
#[derive(Debug, Clone)]
pub struct InventoryRecord {
    pub hostname: String,
    pub connection: ConnectionDescriptor,
    pub command_list: Vec<String>,
}

impl InventoryRecord {
    /// Fill credentials the inventory left out
    ///
    /// Values already present in the record win; the defaults only cover
    /// records that have no username or password of their own.
    pub fn fill_default_credentials(
        &mut self,
        username: Option<&str>,
        password: Option<&Sensitive<String>>,
    ) {
        if self.connection.username.is_none() {
            self.connection.username = username.map(str::to_string);
        }
        if self.connection.password.is_none() {
            self.connection.password = password.cloned();
        }
    }

    /// Commands in this record whose artifact names collide
    ///
    /// Returns `(earlier, later)` pairs in declaration order. The later
    /// command's output overwrites the earlier one in the capture window.
    pub fn artifact_name_collisions(&self) -> Vec<(String, String)> {
        let mut seen: BTreeMap<String, &str> = BTreeMap::new();
        let mut collisions = Vec::new();
        for command in &self.command_list {
            let name = artifact_file_name(&self.hostname, command);
            match seen.get(&name) {
                Some(earlier) if *earlier != command.as_str() => {
                    collisions.push((earlier.to_string(), command.clone()));
                }
                Some(_) => {}
                None => {
                    seen.insert(name, command);
                }
            }
        }
        collisions
    }
}

/// Map a command to the underscore-safe fragment used in file names
///
/// Every whitespace character, every `:` and every path separator becomes a
/// single `_`. The mapping is lossy: `show  ip` and `show__ip` collide.
pub fn normalize_command(command: &str) -> String {
    command
        .chars()
        .map(|c| {
            if c.is_whitespace() || matches!(c, ':' | '/' | '\\') {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// File name of the capture artifact for `(hostname, command)`
pub fn artifact_file_name(hostname: &str, command: &str) -> String {
    format!(
        "{}_{}.{}",
        hostname,
        normalize_command(command),
        ARTIFACT_EXTENSION
    )
}
