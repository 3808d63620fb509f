//! Inventory file schema
//!
//! Defines the YAML structure of an inventory: a top-level sequence of
//! device records.

use capdiff_core::model::{ConnectionDescriptor, InventoryRecord};
use capdiff_core_types::Sensitive;
use serde::Deserialize;

/// Device record as written in the inventory file
#[derive(Debug, Deserialize)]
pub struct RawRecord {
    pub hostname: String,

    /// Management address
    #[serde(alias = "ip", alias = "host")]
    pub address: String,

    /// Platform identifier, e.g. `cisco_ios`
    #[serde(alias = "os")]
    pub device_type: String,

    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<Sensitive<String>>,

    /// Required; an explicit empty list is allowed
    pub command_list: Vec<String>,
}

impl From<RawRecord> for InventoryRecord {
    fn from(raw: RawRecord) -> Self {
        InventoryRecord {
            hostname: raw.hostname,
            connection: ConnectionDescriptor {
                address: raw.address,
                device_type: raw.device_type,
                port: raw.port,
                username: raw.username,
                password: raw.password,
            },
            command_list: raw.command_list,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        let yaml = "hostname: R1\nip: 192.0.2.1\nos: cisco_ios\ncommand_list: []\n";
        let raw: RawRecord = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(raw.address, "192.0.2.1");
        assert_eq!(raw.device_type, "cisco_ios");
        assert!(raw.command_list.is_empty());
    }

    #[test]
    fn test_missing_device_type_rejected() {
        let yaml = "hostname: R1\naddress: 192.0.2.1\ncommand_list: []\n";
        assert!(serde_yaml::from_str::<RawRecord>(yaml).is_err());
    }
}
