//! Assembled label file parsing and writing.

use hexrecon_assembly::AssembledLabelFile;
use hexrecon_core::{Address, AssemblyError, Label, Locator};

const SAMPLE: &str = "\
======== Label databases:
0: path/to/truth.csv
1: path/with spaces/run1.csv
======== Images:
0: ./images/set1/0000_0_1.png
1: ./images/set1/0000_0_2.png
2: ./images/set1/0000_1_1.png

======== Labels:
1000: 12AB@0,0/0,2 12A8@1,0/1,2
1002: 34CD@0,1
1010:
";

#[test]
fn parses_all_three_sections() {
    let file = AssembledLabelFile::parse(SAMPLE).unwrap();
    assert_eq!(file.sources, vec!["path/to/truth.csv", "path/with spaces/run1.csv"]);
    assert_eq!(file.images.len(), 3);
    assert_eq!(file.images[2].as_str(), "./images/set1/0000_1_1.png");
    assert_eq!(file.entries.len(), 3);

    let first = &file.entries[0];
    assert_eq!(first.address, Address(0x1000));
    assert_eq!(first.labels[0].label, Label::parse("12AB").unwrap());
    assert_eq!(
        first.labels[0].locators.as_slice(),
        &[Locator::new(0, 0), Locator::new(0, 2)]
    );
    assert!(first.is_contested());
    assert_eq!(first.assertions(), 4);
    assert!(file.entries[2].labels.is_empty());
}

#[test]
fn writing_reproduces_canonical_text() {
    let file = AssembledLabelFile::parse(SAMPLE).unwrap();
    let canonical = SAMPLE.replace("\n\n", "\n");
    assert_eq!(file.to_text(), canonical);
    assert_eq!(AssembledLabelFile::parse(&file.to_text()).unwrap(), file);
}

#[test]
fn malformed_lines_report_line_numbers() {
    let cases = [
        (SAMPLE.replace("1002: 34CD@0,1", "1002: 34CD"), 11),
        (SAMPLE.replace("1002: 34CD@0,1", "10Z2: 34CD@0,1"), 11),
        (SAMPLE.replace("1002: 34CD@0,1", "1002: 34CD@0;1"), 11),
        (SAMPLE.replace("1002: 34CD@0,1", "1002: 34CD@2,1"), 11),
        (SAMPLE.replace("1: path/with", "7: path/with"), 3),
        (format!("stray\n{SAMPLE}"), 1),
    ];
    for (text, expected_line) in cases {
        match AssembledLabelFile::parse(&text) {
            Err(AssemblyError::MalformedLine { line, .. }) => assert_eq!(line, expected_line, "{text}"),
            other => panic!("expected MalformedLine, got {other:?}"),
        }
    }
}

#[test]
fn missing_sections_are_reported() {
    let truncated = "======== Label databases:\n0: a.csv\n======== Images:\n0: x_0_1.png\n";
    assert!(matches!(
        AssembledLabelFile::parse(truncated),
        Err(AssemblyError::MissingSection { section: "Labels" })
    ));
    assert!(matches!(
        AssembledLabelFile::parse(""),
        Err(AssemblyError::MissingSection { section: "Label databases" })
    ));
}

#[test]
fn sections_out_of_order_are_rejected() {
    let text = "======== Images:\n======== Label databases:\n======== Labels:\n";
    assert!(matches!(
        AssembledLabelFile::parse(text),
        Err(AssemblyError::MalformedLine { line: 1, .. })
    ));
}

#[test]
fn merge_appends_locators_and_new_labels() {
    let file = AssembledLabelFile::parse(SAMPLE).unwrap();
    let mut entry = file.entries[0].clone();
    let mut other = file.entries[1].clone();
    other.address = entry.address;
    let mut repeat = file.entries[0].clone();
    repeat.labels.truncate(1);

    entry.merge(other);
    entry.merge(repeat);

    let labels: Vec<String> = entry.labels.iter().map(|l| l.label.to_string()).collect();
    assert_eq!(labels, vec!["12AB", "12A8", "34CD"]);
    assert_eq!(entry.labels[0].locators.len(), 4);
    assert_eq!(entry.assertions(), 7);
}
