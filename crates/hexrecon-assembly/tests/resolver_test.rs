//! ConsensusResolver: plurality, tie-breaks, placeholders, spans.

use hexrecon_assembly::{AssembledLabelFile, ConsensusResolver};
use hexrecon_core::errors::ReconErrorCode;
use hexrecon_core::{Address, AssemblyError};
use tempfile::TempDir;

fn file(labels: &str) -> AssembledLabelFile {
    let text = format!(
        "======== Label databases:\n0: truth.csv\n1: run1.csv\n\
         ======== Images:\n0: a_0_1.png\n1: a_0_2.png\n2: a_0_3.png\n\
         ======== Labels:\n{labels}"
    );
    AssembledLabelFile::parse(&text).unwrap()
}

#[test]
fn plurality_wins() {
    let f = file("1000: 12A8@1,0 12AB@0,0/0,1\n");
    let resolution = ConsensusResolver::default().resolve(&f).unwrap();
    assert_eq!(resolution.bytes, vec![0x12, 0xAB]);
}

#[test]
fn first_listed_label_wins_a_tie() {
    let f = file("2000: 34CD@0,0/0,1 34C0@1,0/1,1\n");
    let resolution = ConsensusResolver::default().resolve(&f).unwrap();
    assert_eq!(resolution.bytes, vec![0x34, 0xCD]);

    let f = file("2000: 34C0@1,0/1,1 34CD@0,0/0,1\n");
    let resolution = ConsensusResolver::default().resolve(&f).unwrap();
    assert_eq!(resolution.bytes, vec![0x34, 0xC0]);
}

#[test]
fn presentation_order_is_kept() {
    let f = file("2000: BEEF@0,0\n1000: CAFE@0,1\n");
    let resolution = ConsensusResolver::default().resolve(&f).unwrap();
    assert_eq!(resolution.bytes, vec![0xBE, 0xEF, 0xCA, 0xFE]);
}

#[test]
fn empty_entry_is_a_zero_placeholder() {
    let f = file("1000: 0000@0,0/1,0\n1002:\n1004: 00FF@0,2\n");
    let resolution = ConsensusResolver::default().resolve(&f).unwrap();
    assert_eq!(resolution.bytes, vec![0, 0, 0, 0, 0x00, 0xFF]);
    assert_eq!(resolution.report.placeholders, vec![Address(0x1002)]);
    assert_eq!(resolution.report.words, 3);
    assert!(resolution.report.contested.is_empty());
}

#[test]
fn non_hex_winner_is_an_error() {
    let f = file("1000: XXXX@0,0/1,0 1234@0,1\n");
    let err = ConsensusResolver::default().resolve(&f).unwrap_err();
    match &err {
        AssemblyError::NonHexLabel { address, label } => {
            assert_eq!(*address, 0x1000);
            assert_eq!(label, "XXXX");
        }
        other => panic!("expected NonHexLabel, got {other:?}"),
    }
    assert_eq!(err.error_code(), "NON_HEX_LABEL");

    // A losing non-hex label is harmless.
    let f = file("1000: XXXX@0,0 1234@0,1/1,1\n");
    assert_eq!(ConsensusResolver::default().resolve(&f).unwrap().bytes, vec![0x12, 0x34]);
}

#[test]
fn span_fills_missing_addresses_with_zero() {
    let f = file("1000: 1111@0,0\n1004: 3333@0,1\n1007: 7777@0,2\n");
    let resolution = ConsensusResolver::default()
        .resolve_span(&f, Address(0x1000), Address(0x1006))
        .unwrap();
    assert_eq!(resolution.bytes, vec![0x11, 0x11, 0, 0, 0x33, 0x33, 0, 0]);
    assert_eq!(
        resolution.report.placeholders,
        vec![Address(0x1002), Address(0x1006)]
    );
}

#[test]
fn span_stops_at_the_top_of_memory() {
    let f = file("FFFE: ABCD@0,0\n");
    let resolution = ConsensusResolver::default()
        .resolve_span(&f, Address(0xFFFC), Address(0xFFFF))
        .unwrap();
    assert_eq!(resolution.bytes, vec![0, 0, 0xAB, 0xCD]);
}

#[test]
fn files_are_resolved_in_argument_order() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    file("1000: AAAA@0,0\n").write_to(std::fs::File::create(&a).unwrap()).unwrap();
    file("1000: BBBB@0,0\n1002:\n").write_to(std::fs::File::create(&b).unwrap()).unwrap();

    let resolution = ConsensusResolver::default().resolve_files(&[&b, &a]).unwrap();
    assert_eq!(resolution.bytes, vec![0xBB, 0xBB, 0, 0, 0xAA, 0xAA]);
    assert_eq!(resolution.report.words, 3);
    assert_eq!(resolution.report.placeholders.len(), 1);
}

#[test]
fn winner_of_empty_entry_is_none() {
    let f = file("1000:\n");
    assert_eq!(ConsensusResolver::winner(&f.entries[0]), None);
}

#[test]
fn span_over_several_files_is_one_dense_span() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    file("1000: AAAA@0,0\n1002: 1111@0,1\n")
        .write_to(std::fs::File::create(&a).unwrap())
        .unwrap();
    file("1002: 2222@1,1/1,2\n1004: CCCC@1,0\n")
        .write_to(std::fs::File::create(&b).unwrap())
        .unwrap();

    let resolution = ConsensusResolver::default()
        .resolve_span_files(&[&a, &b], Address(0x1000), Address(0x1006))
        .unwrap();
    // 1002 is voted on the union of both files: 2222 has two locators.
    assert_eq!(
        resolution.bytes,
        vec![0xAA, 0xAA, 0x22, 0x22, 0xCC, 0xCC, 0, 0]
    );
    assert_eq!(resolution.report.words, 4);
    assert_eq!(resolution.report.placeholders, vec![Address(0x1006)]);
    assert_eq!(resolution.report.contested, vec![Address(0x1002)]);
}
