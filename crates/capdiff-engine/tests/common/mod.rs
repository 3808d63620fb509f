use capdiff_core::model::{ConnectionDescriptor, InventoryRecord};
use std::fs;
use std::path::Path;

/// Build an inventory record with a documentation-range address
#[allow(dead_code)]
pub fn device(hostname: &str, commands: &[&str]) -> InventoryRecord {
    InventoryRecord {
        hostname: hostname.to_string(),
        connection: ConnectionDescriptor {
            address: format!("192.0.2.{}", hostname.len()),
            device_type: "cisco_ios".to_string(),
            port: None,
            username: Some("admin".to_string()),
            password: None,
        },
        command_list: commands.iter().map(|c| c.to_string()).collect(),
    }
}

/// Create a window directory holding the given `(name, content)` files
#[allow(dead_code)]
pub fn seed_window(path: &Path, files: &[(&str, &str)]) {
    fs::create_dir_all(path).unwrap();
    for (name, content) in files {
        fs::write(path.join(name), content).unwrap();
    }
}

/// Sorted file names directly inside `path`
#[allow(dead_code)]
pub fn file_names(path: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(path)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
