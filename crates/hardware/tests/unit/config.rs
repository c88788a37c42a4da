//! Configuration Tests.
//!
//! Parsing of JSON documents, default filling, enum aliases and geometry validation.

use std::io::Write as _;

use mipsim_core::common::SimError;
use mipsim_core::common::constants::PC_INIT;
use mipsim_core::config::{CacheConfig, Config, HazardUnit, ReplacementPolicy, WritePolicy};
use pretty_assertions::assert_eq;
use rstest::rstest;

// ══════════════════════════════════════════════════════════
// 1. Defaults
// ══════════════════════════════════════════════════════════

#[test]
fn default_config_is_single_cycle_with_delay_slot_and_cop0() {
    let config = Config::default();
    assert!(!config.core.pipelined);
    assert!(config.core.delay_slot);
    assert!(config.core.cop0);
    assert_eq!(config.core.pc, PC_INIT);
    assert_eq!(config.core.hazard_unit, HazardUnit::StallForward);
    assert_eq!(config.memory.read_penalty, 10);
    assert_eq!(config.memory.write_penalty, 10);
    assert!(!config.cache_program.enabled);
    assert!(!config.cache_data.enabled);
}

#[test]
fn empty_document_equals_defaults() {
    let config = Config::from_json("{}").unwrap();
    let default = Config::default();
    assert_eq!(config.core.pc, default.core.pc);
    assert_eq!(config.memory, default.memory);
    assert_eq!(config.cache_data, default.cache_data);
    assert_eq!(config.cache_program, default.cache_program);
}

#[test]
fn partial_cache_section_fills_the_rest() {
    let config = Config::from_json(r#"{ "cache_data": { "enabled": true, "set_count": 16 } }"#)
        .unwrap();
    let cache = &config.cache_data;
    assert!(cache.enabled);
    assert_eq!(cache.set_count, 16);
    assert_eq!(cache.block_size, 1);
    assert_eq!(cache.associativity, 1);
    assert_eq!(cache.replacement, ReplacementPolicy::Lru);
    assert_eq!(cache.write_policy, WritePolicy::WriteBack);
}

// ══════════════════════════════════════════════════════════
// 2. Enum spellings
// ══════════════════════════════════════════════════════════

#[rstest]
#[case("none", HazardUnit::None)]
#[case("stall", HazardUnit::Stall)]
#[case("stall_forward", HazardUnit::StallForward)]
#[case("forward", HazardUnit::StallForward)]
#[case("StallForward", HazardUnit::StallForward)]
fn hazard_unit_spellings(#[case] name: &str, #[case] expected: HazardUnit) {
    let json = format!(r#"{{ "core": {{ "pipelined": true, "hazard_unit": "{name}" }} }}"#);
    assert_eq!(Config::from_json(&json).unwrap().core.hazard_unit, expected);
}

#[rstest]
#[case("RANDOM", ReplacementPolicy::Random)]
#[case("LRU", ReplacementPolicy::Lru)]
#[case("Lfu", ReplacementPolicy::Lfu)]
#[case("PLRU", ReplacementPolicy::Plru)]
fn replacement_policy_spellings(#[case] name: &str, #[case] expected: ReplacementPolicy) {
    let json = format!(r#"{{ "cache_program": {{ "replacement": "{name}" }} }}"#);
    assert_eq!(Config::from_json(&json).unwrap().cache_program.replacement, expected);
}

#[rstest]
#[case("write_through_no_alloc", WritePolicy::WriteThroughNoAlloc)]
#[case("write_through_alloc", WritePolicy::WriteThroughAlloc)]
#[case("WriteBack", WritePolicy::WriteBack)]
fn write_policy_spellings(#[case] name: &str, #[case] expected: WritePolicy) {
    let json = format!(r#"{{ "cache_data": {{ "write_policy": "{name}" }} }}"#);
    let policy = Config::from_json(&json).unwrap().cache_data.write_policy;
    assert_eq!(policy, expected);
    assert_eq!(policy.is_write_through(), expected != WritePolicy::WriteBack);
}

// ══════════════════════════════════════════════════════════
// 3. Errors
// ══════════════════════════════════════════════════════════

#[rstest]
#[case::sets(r#"{ "cache_data": { "enabled": true, "set_count": 0 } }"#, "set_count")]
#[case::block(r#"{ "cache_program": { "enabled": true, "block_size": 0 } }"#, "block_size")]
#[case::ways(r#"{ "cache_data": { "enabled": true, "associativity": 0 } }"#, "associativity")]
fn zero_geometry_on_enabled_cache_is_rejected(#[case] json: &str, #[case] field: &str) {
    match Config::from_json(json) {
        Err(SimError::InvalidCacheConfig(msg)) => assert!(msg.contains(field), "{msg}"),
        other => panic!("expected InvalidCacheConfig, got {other:?}"),
    }
}

#[test]
fn zero_geometry_on_disabled_cache_is_accepted() {
    let cache = CacheConfig {
        set_count: 0,
        ..CacheConfig::default()
    };
    assert!(cache.validate().is_ok());
}

#[test]
fn malformed_json_is_a_config_error() {
    assert!(matches!(Config::from_json("{ core: "), Err(SimError::Config(_))));
    assert!(matches!(
        Config::from_json(r#"{ "core": { "hazard_unit": "sometimes" } }"#),
        Err(SimError::Config(_))
    ));
}

// ══════════════════════════════════════════════════════════
// 4. Files
// ══════════════════════════════════════════════════════════

#[test]
fn from_file_reads_a_document() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "core": {{ "pipelined": true, "cop0": false, "pc": 4096 }} }}"#).unwrap();
    let config = Config::from_file(file.path()).unwrap();
    assert!(config.core.pipelined);
    assert!(!config.core.cop0);
    assert_eq!(config.core.pc, 0x1000);
}

#[test]
fn from_file_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    assert!(matches!(Config::from_file(missing), Err(SimError::Io(_))));
}
