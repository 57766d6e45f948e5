//! Tests for the hexrecon error handling system.

use std::collections::HashSet;

use hexrecon_core::errors::error_code::ReconErrorCode;
use hexrecon_core::errors::*;

#[test]
fn every_error_has_an_error_code() {
    let label = LabelError::WrongLength {
        label: "ABC".into(),
        len: 3,
    };
    assert_eq!(label.error_code(), "INVALID_LABEL");

    let store = StoreError::ReadOnly { path: "a.csv".into() };
    assert_eq!(store.error_code(), "READ_ONLY");

    let assembly = AssemblyError::MissingSection { section: "Labels" };
    assert_eq!(assembly.error_code(), "ASSEMBLY_FORMAT");

    let config = ConfigError::FileNotFound { path: "/tmp".into() };
    assert_eq!(config.error_code(), "CONFIG_ERROR");
}

#[test]
fn store_codes_are_distinct() {
    let errors = [
        StoreError::Format {
            path: "a".into(),
            line: 1,
            message: "bad".into(),
        },
        StoreError::UnknownIdentity {
            id: "x".into(),
            path: "a".into(),
        },
        StoreError::ReadOnly { path: "a".into() },
        StoreError::Io {
            path: "a".into(),
            message: "boom".into(),
        },
        StoreError::LockPoisoned { which: "records" },
        StoreError::AlreadyExists { path: "a".into() },
    ];
    let codes: HashSet<&str> = errors.iter().map(|e| e.error_code()).collect();
    assert_eq!(codes.len(), errors.len());
}

#[test]
fn from_conversions_keep_inner_codes() {
    let store = StoreError::UnknownIdentity {
        id: "x".into(),
        path: "a".into(),
    };
    let assembly: AssemblyError = store.into();
    assert!(matches!(assembly, AssemblyError::Store(_)));
    assert_eq!(assembly.error_code(), "UNKNOWN_IDENTITY");

    let recon: ReconError = assembly.into();
    assert_eq!(recon.error_code(), "UNKNOWN_IDENTITY");

    let label = LabelError::InvalidCharacter {
        label: "12 B".into(),
        ch: ' ',
    };
    let store: StoreError = label.into();
    assert_eq!(store.error_code(), "INVALID_LABEL");
}

#[test]
fn coded_string_prefixes_the_code() {
    let err = AssemblyError::NonHexLabel {
        address: 0x1000,
        label: "XXXX".into(),
    };
    let s = err.coded_string();
    assert!(s.starts_with("[NON_HEX_LABEL] "));
    assert!(s.contains("1000"));
}
