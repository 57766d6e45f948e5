//! Argument parsing and end-to-end command runs.

use std::fs;
use std::path::Path;

use clap::Parser;
use hexrecon_cli::{run_with_output, verbosity_filter, Cli, Commands};
use hexrecon_core::Address;
use tempfile::TempDir;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

fn run(args: &[String]) -> Vec<u8> {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    run_with_output(cli, &mut out).unwrap();
    out
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

// ---- Parsing ----

#[test]
fn assemble_takes_truth_substrings_and_stores() {
    let cli = parse(&["hexrecon", "assemble", "truth.csv", "set1,set2", "a.csv", "b.csv", "-v"]);
    assert_eq!(cli.verbose, 1);
    match cli.command {
        Commands::Assemble(a) => {
            assert_eq!(a.ground_truth.to_str(), Some("truth.csv"));
            assert_eq!(a.filters(), vec!["set1", "set2"]);
            assert_eq!(a.stores.len(), 2);
            assert!(!a.parallel);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn assemble_requires_at_least_one_store() {
    assert!(Cli::try_parse_from(["hexrecon", "assemble", "truth.csv", "set1"]).is_err());
}

#[test]
fn resolve_span_needs_both_ends() {
    let cli = parse(&["hexrecon", "resolve", "a.txt", "--first", "0x1000", "--last", "10FE"]);
    match cli.command {
        Commands::Resolve(r) => {
            assert_eq!(r.first, Some(Address(0x1000)));
            assert_eq!(r.last, Some(Address(0x10FE)));
        }
        other => panic!("unexpected command {other:?}"),
    }
    assert!(Cli::try_parse_from(["hexrecon", "resolve", "a.txt", "--first", "1000"]).is_err());
    assert!(Cli::try_parse_from(["hexrecon", "resolve", "a.txt", "--first", "XYZ", "--last", "1"]).is_err());
}

#[test]
fn diff_defaults() {
    let cli = parse(&["hexrecon", "diff", "l.csv", "r.csv"]);
    match cli.command {
        Commands::Diff(d) => {
            assert_eq!(d.min_count, None);
            assert!(!d.keep_ambiguous);
            assert!(d.skip_ambiguous_from.is_none());
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn verbosity_maps_to_filters() {
    assert_eq!(verbosity_filter(0), None);
    assert_eq!(verbosity_filter(1).as_deref(), Some("hexrecon=debug"));
    assert_eq!(verbosity_filter(3).as_deref(), Some("hexrecon=trace"));
}

// ---- End to end ----

const TRUTH: &str = "Filename,Label,Count\n\
./w/A_0_0.png,1000,2\n\
./w/A_1_0.png,1010,2\n\
./w/A_0_1.png,12AB,2\n\
./w/A_1_1.png,XXXX,2\n";

const RUN1: &str = "Filename,Label,Count\n\
./w/A_0_0.png,1000,3\n\
./w/A_1_0.png,1010,2\n\
./w/A_0_1.png,12A8,2\n\
./w/A_0_2.png,34CD,2\n\
./w/A_1_1.png,5678,1\n";

#[test]
fn assemble_then_resolve() {
    let dir = TempDir::new().unwrap();
    let truth = dir.path().join("truth.csv");
    let run1 = dir.path().join("run1.csv");
    fs::write(&truth, TRUTH).unwrap();
    fs::write(&run1, RUN1).unwrap();

    let assembled = run(&args(&[
        "hexrecon",
        "assemble",
        &path_arg(&truth),
        "./w/",
        &path_arg(&run1),
    ]));
    let text = String::from_utf8(assembled).unwrap();
    assert!(text.ends_with(
        "======== Labels:\n1000: 12A8@1,0 12AB@0,0\n1002: 34CD@1,1\n1010: XXXX@0,2\n"
    ));

    let parallel = run(&args(&[
        "hexrecon",
        "assemble",
        &path_arg(&truth),
        "./w/",
        &path_arg(&run1),
        "--parallel",
    ]));
    assert_eq!(String::from_utf8(parallel).unwrap(), text);

    // 1000 is a one-one tie (12A8 listed first) and 1010 resolves to XXXX.
    let assembly = dir.path().join("assembly.txt");
    fs::write(&assembly, text.replace("1010: XXXX@0,2\n", "1010:\n")).unwrap();
    let bytes = run(&args(&["hexrecon", "resolve", &path_arg(&assembly)]));
    assert_eq!(bytes, vec![0x12, 0xA8, 0x34, 0xCD, 0x00, 0x00]);

    let out_file = dir.path().join("out.bin");
    let stdout = run(&args(&[
        "hexrecon",
        "resolve",
        &path_arg(&assembly),
        "--first",
        "0FFE",
        "--last",
        "1004",
        "-o",
        &path_arg(&out_file),
    ]));
    assert!(stdout.is_empty());
    assert_eq!(
        fs::read(&out_file).unwrap(),
        vec![0, 0, 0x12, 0xA8, 0x34, 0xCD, 0, 0]
    );
}

#[test]
fn resolve_fails_on_non_hex_winner() {
    let dir = TempDir::new().unwrap();
    let assembly = dir.path().join("assembly.txt");
    fs::write(
        &assembly,
        "======== Label databases:\n0: t.csv\n======== Images:\n0: a_0_1.png\n======== Labels:\n1000: XXXX@0,0\n",
    )
    .unwrap();
    let cli = Cli::try_parse_from(args(&["hexrecon", "resolve", &path_arg(&assembly)])).unwrap();
    let mut out = Vec::new();
    assert!(run_with_output(cli, &mut out).is_err());
}

#[test]
fn diff_disagreements_and_stats() {
    let dir = TempDir::new().unwrap();
    let truth = dir.path().join("truth.csv");
    let run1 = dir.path().join("run1.csv");
    fs::write(&truth, TRUTH).unwrap();
    fs::write(&run1, RUN1).unwrap();

    let diff = run(&args(&["hexrecon", "diff", &path_arg(&truth), &path_arg(&run1)]));
    assert_eq!(String::from_utf8(diff).unwrap(), "./w/A_0_1.png   12AB <> 12A8\n");

    let found = run(&args(&[
        "hexrecon",
        "disagreements",
        &path_arg(&truth),
        &path_arg(&run1),
    ]));
    assert_eq!(String::from_utf8(found).unwrap(), "./w/A_0_1.png\n");

    let stats = run(&args(&["hexrecon", "stats", &path_arg(&run1), "--json"]));
    let json: serde_json::Value = serde_json::from_slice(&stats).unwrap();
    assert_eq!(json["identities"], 5);
    assert_eq!(json["confirmed"], 4);
    assert_eq!(json["buckets"][0]["count"], 1);

    let text = String::from_utf8(run(&args(&["hexrecon", "stats", &path_arg(&truth)]))).unwrap();
    assert!(text.contains("4 identities"));
    assert!(text.contains("confirmed (count >= 2): 4"));
}

#[test]
fn diff_threshold_follows_config_unless_overridden() {
    let dir = TempDir::new().unwrap();
    let truth = dir.path().join("truth.csv");
    let run1 = dir.path().join("run1.csv");
    let config = dir.path().join("strict.toml");
    fs::write(&truth, TRUTH).unwrap();
    fs::write(&run1, RUN1).unwrap();
    fs::write(&config, "[assembly]\nmin_confirmations = 3\n").unwrap();

    // Nothing in the ground truth reaches three confirmations.
    let strict = run(&args(&[
        "hexrecon",
        "--config",
        &path_arg(&config),
        "diff",
        &path_arg(&truth),
        &path_arg(&run1),
    ]));
    assert!(strict.is_empty());

    let overridden = run(&args(&[
        "hexrecon",
        "--config",
        &path_arg(&config),
        "diff",
        &path_arg(&truth),
        &path_arg(&run1),
        "--min-count",
        "2",
    ]));
    assert_eq!(
        String::from_utf8(overridden).unwrap(),
        "./w/A_0_1.png   12AB <> 12A8\n"
    );
}

#[test]
fn min_count_is_read_from_the_subcommand() {
    let cli = parse(&["hexrecon", "disagreements", "p.csv", "o.csv", "--min-count", "5"]);
    assert_eq!(cli.command.min_count(), Some(5));
    let cli = parse(&["hexrecon", "stats", "p.csv"]);
    assert_eq!(cli.command.min_count(), None);
}

#[test]
fn span_over_two_files_is_not_repeated() {
    let dir = TempDir::new().unwrap();
    let header = "======== Label databases:\n0: t.csv\n======== Images:\n0: a_0_1.png\n======== Labels:\n";
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    fs::write(&a, format!("{header}1000: AAAA@0,0\n")).unwrap();
    fs::write(&b, format!("{header}1002: BBBB@0,0\n")).unwrap();

    let bytes = run(&args(&[
        "hexrecon",
        "resolve",
        &path_arg(&a),
        &path_arg(&b),
        "--first",
        "1000",
        "--last",
        "1002",
    ]));
    assert_eq!(bytes, vec![0xAA, 0xAA, 0xBB, 0xBB]);
}
