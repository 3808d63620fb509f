#![allow(clippy::unwrap_used, clippy::expect_used)]

use capdiff_core::model::{artifact_file_name, normalize_command, ARTIFACT_EXTENSION};
use proptest::prelude::*;

#[test]
fn test_naming_is_deterministic() {
    let first = artifact_file_name("core-sw1", "show ip bgp summary");
    let second = artifact_file_name("core-sw1", "show ip bgp summary");
    assert_eq!(first, second);
    assert_eq!(first, "core-sw1_show_ip_bgp_summary.txt");
}

#[test]
fn test_whitespace_variants_collide() {
    assert_eq!(
        artifact_file_name("R1", "show  ip"),
        artifact_file_name("R1", "show__ip")
    );
}

proptest! {
    #[test]
    fn prop_normalized_command_has_no_separators(command in "\\PC{0,40}") {
        let normalized = normalize_command(&command);
        prop_assert!(!normalized.chars().any(|c| c.is_whitespace()
            || c == ':'
            || c == '/'
            || c == '\\'));
    }

    #[test]
    fn prop_normalization_preserves_char_count(command in "[a-z :/\\t]{0,40}") {
        prop_assert_eq!(
            normalize_command(&command).chars().count(),
            command.chars().count()
        );
    }

    #[test]
    fn prop_artifact_name_shape(
        hostname in "[A-Za-z][A-Za-z0-9-]{0,15}",
        command in "[a-z][a-z 0-9:/|-]{0,30}",
    ) {
        let name = artifact_file_name(&hostname, &command);
        let prefix = format!("{}_", hostname);
        let suffix = format!(".{}", ARTIFACT_EXTENSION);
        prop_assert!(name.starts_with(&prefix));
        prop_assert!(name.ends_with(&suffix));
        prop_assert!(!name.contains('/'));
        prop_assert!(!name.contains(' '));
    }
}
