//! Store comparison: pairwise diffs and disagreement detection.

use hexrecon_assembly::{diff_stores, find_disagreements, DiffOptions};
use hexrecon_core::{Label, LabelRecord, LabelSource};
use hexrecon_storage::{LabelStore, StoreOptions};

fn store(name: &str, rows: &[(&str, &str, u32)]) -> LabelStore {
    LabelStore::from_records(
        name,
        rows.iter()
            .map(|(id, l, c)| ((*id).into(), LabelRecord::new(Label::parse(l).unwrap(), *c))),
        StoreOptions::ephemeral(),
    )
}

#[test]
fn diff_reports_confirmed_differences_in_left_order() {
    let left = store(
        "left.csv",
        &[
            ("z", "1111", 2),
            ("a", "2222", 3),
            ("b", "3333", 2),
            ("c", "4444", 1),
            ("d", "XXXX", 2),
            ("e", "5555", 2),
        ],
    );
    let right = store(
        "right.csv",
        &[
            ("a", "2220", 2),
            ("z", "1110", 5),
            ("b", "3333", 2),
            ("c", "4440", 2),
            ("d", "6666", 2),
            ("e", "5550", 1),
        ],
    );

    let diffs = diff_stores(&left, &right, &DiffOptions::default()).unwrap();
    let lines: Vec<String> = diffs.iter().map(|d| d.to_string()).collect();
    assert_eq!(lines, vec!["z   1111 <> 1110", "a   2222 <> 2220"]);

    let keep_ambiguous = DiffOptions {
        skip_ambiguous: false,
        ..DiffOptions::default()
    };
    let diffs = diff_stores(&left, &right, &keep_ambiguous).unwrap();
    assert_eq!(diffs.len(), 3);
    assert_eq!(diffs[2].left, Label::AMBIGUOUS);

    let lenient = DiffOptions {
        min_count: 1,
        ..DiffOptions::default()
    };
    assert_eq!(diff_stores(&left, &right, &lenient).unwrap().len(), 4);
}

#[test]
fn diff_ignores_identities_marked_ambiguous_elsewhere() {
    let left = store("left.csv", &[("a", "1111", 2), ("b", "2222", 2)]);
    let right = store("right.csv", &[("a", "1110", 2), ("b", "2220", 2)]);
    let third = store("third.csv", &[("a", "XXXX", 0), ("b", "2222", 2)]);

    let options = DiffOptions::default().ignore_ambiguous_in(&third).unwrap();
    let diffs = diff_stores(&left, &right, &options).unwrap();
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].id.as_str(), "b");
}

#[test]
fn disagreements_need_two_distinct_confirmed_labels() {
    let primary = store(
        "primary.csv",
        &[
            ("agree", "1111", 2),
            ("split", "2222", 2),
            ("settled", "XXXX", 2),
            ("fresh", "0000", 0),
            ("others_split", "0000", 0),
            ("weak", "3333", 1),
        ],
    );
    let run1 = store(
        "run1.csv",
        &[
            ("agree", "1111", 2),
            ("split", "2220", 4),
            ("settled", "9999", 2),
            ("fresh", "4444", 2),
            ("others_split", "5555", 2),
            ("weak", "3330", 1),
        ],
    );
    let run2 = store("run2.csv", &[("others_split", "5550", 3), ("fresh", "4444", 2)]);

    let others: Vec<&dyn LabelSource> = vec![&run1, &run2];
    let found = find_disagreements(&primary, &others, 2).unwrap();
    let names: Vec<&str> = found.iter().map(|id| id.as_str()).collect();
    assert_eq!(names, vec!["split", "others_split"]);
}
