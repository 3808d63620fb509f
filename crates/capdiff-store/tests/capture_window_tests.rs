#![allow(clippy::unwrap_used, clippy::expect_used)]

use capdiff_store::atomic::TEMP_PREFIX;
use capdiff_store::CaptureWindow;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_artifacts_written_verbatim() {
    let dir = TempDir::new().unwrap();
    let window = CaptureWindow::create(dir.path().join("pre-change")).unwrap();
    let raw = "Interface  Status\r\nGi0/0      up\r\n\u{0}trailing";

    let path = window.write("R1_show_ip_interface_brief.txt", raw.as_bytes()).unwrap();

    assert_eq!(fs::read(path).unwrap(), raw.as_bytes());
}

#[test]
fn test_listing_ignores_in_flight_temp_files() {
    let dir = TempDir::new().unwrap();
    let window = CaptureWindow::create(dir.path().join("w")).unwrap();
    window.write("R1_show_clock.txt", b"12:00").unwrap();
    fs::write(
        window.entry_path(&format!("{}R2_show_clock.txt", TEMP_PREFIX)),
        b"partial",
    )
    .unwrap();

    let names = window.list_file_names().unwrap();
    assert_eq!(names.len(), 1);
    assert!(names.contains("R1_show_clock.txt"));
}

#[test]
fn test_second_create_fails_and_keeps_content() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("post-change");
    let window = CaptureWindow::create(&path).unwrap();
    window.write("R1_show_version.txt", b"15.2").unwrap();

    assert!(CaptureWindow::create(&path).is_err());
    assert_eq!(
        fs::read(path.join("R1_show_version.txt")).unwrap(),
        b"15.2"
    );
}
