//! # Configuration Tests
//!
//! Defaults, JSON deserialization, file loading, and sizing validation.

use std::io::Write;

use o3rename_core::common::{ConfigError, RegClass};
use o3rename_core::config::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert!(!config.general.trace);
    assert_eq!(config.regs, RegFileConfig::default());
    assert!(config.validate().is_ok());
}

#[test]
fn test_reg_file_defaults() {
    let regs = RegFileConfig::default();
    assert_eq!(regs.int_arch_regs, 32);
    assert_eq!(regs.float_arch_regs, 32);
    assert_eq!(regs.vec_elem_arch_regs, 64);
    assert_eq!(regs.cc_arch_regs, 5);
    assert_eq!(regs.int_phys_regs, 256);
    assert_eq!(regs.float_phys_regs, 256);
    assert_eq!(regs.vec_elem_phys_regs, 256);
    assert_eq!(regs.cc_phys_regs, 40);
    assert_eq!(regs.total_phys_regs(), 256 * 3 + 40 + 1);
}

#[rstest]
#[case(RegClass::Integer, 32, 256)]
#[case(RegClass::FloatingPoint, 32, 256)]
#[case(RegClass::VectorElement, 64, 256)]
#[case(RegClass::ConditionCode, 5, 40)]
#[case(RegClass::Invalid, 1, 1)]
fn test_counts_per_class(#[case] class: RegClass, #[case] arch: usize, #[case] phys: usize) {
    let regs = RegFileConfig::default();
    assert_eq!(regs.num_arch_regs(class), arch);
    assert_eq!(regs.num_phys_regs(class), phys);
}

#[test]
fn test_empty_json_uses_defaults() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_json() {
    let json = r#"{
        "general": { "trace": true },
        "regs": { "int_phys_regs": 48, "cc_arch_regs": 1 }
    }"#;
    let config = Config::from_json(json).unwrap();
    assert!(config.general.trace);
    assert_eq!(config.regs.int_phys_regs, 48);
    assert_eq!(config.regs.cc_arch_regs, 1);
    assert_eq!(config.regs.float_phys_regs, 256);
}

#[test]
fn test_malformed_json() {
    let err = Config::from_json("{ regs: ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_too_few_phys_regs() {
    let err = Config::from_json(r#"{ "regs": { "float_phys_regs": 16 } }"#).unwrap_err();
    match err {
        ConfigError::TooFewPhysRegs { class, arch, phys } => {
            assert_eq!(class, RegClass::FloatingPoint);
            assert_eq!(arch, 32);
            assert_eq!(phys, 16);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_zero_arch_regs() {
    let err = Config::from_json(r#"{ "regs": { "cc_arch_regs": 0 } }"#).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::NoArchRegs {
            class: RegClass::ConditionCode
        }
    ));
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "regs": {{ "int_arch_regs": 16, "int_phys_regs": 64 }} }}"#).unwrap();
    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.regs.int_arch_regs, 16);
    assert_eq!(config.regs.int_phys_regs, 64);
}

#[test]
fn test_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");
    let err = Config::from_file(&path).unwrap_err();
    match err {
        ConfigError::Io { path: p, .. } => assert_eq!(p, path),
        other => panic!("unexpected error: {other}"),
    }
}
