use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn cli_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("bff"))
}

const DOCS: &str = "# id\tterms
42\thello green
43\tworld green
44\thello blue
45\tgreen
46\thello green
";

#[test]
fn search_returns_exact_matches() {
    let tmp = tempdir().expect("tempdir");
    let docs = tmp.path().join("docs.tsv");
    fs::write(&docs, DOCS).unwrap();
    let docs = docs.to_str().unwrap();

    cli_cmd()
        .args(["search", "--docs", docs, "--shards", "2", "--mappers", "2", "hello", "green"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""ids":[42,46]"#))
        .stdout(predicate::str::contains(r#""documents":5"#));

    cli_cmd()
        .args(["search", "--docs", docs, "--bits", "512", "--pretty", "blue"])
        .assert()
        .success()
        .stdout(predicate::str::contains("44"))
        .stdout(predicate::str::contains("\"candidates\""));
}

#[test]
fn search_reads_config_file() {
    let tmp = tempdir().expect("tempdir");
    let docs = tmp.path().join("docs.tsv");
    let cfg = tmp.path().join("bff.json");
    fs::write(&docs, DOCS).unwrap();
    fs::write(&cfg, r#"{"shards": 3, "mappers": 3, "filter_bits": 256}"#).unwrap();
    let (docs, cfg) = (docs.to_str().unwrap(), cfg.to_str().unwrap());

    cli_cmd()
        .args(["search", "--docs", docs, "--config", cfg, "world"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""ids":[43]"#));

    fs::write(cfg, r#"{"shards": 0}"#).unwrap();
    cli_cmd()
        .args(["search", "--docs", docs, "--config", cfg, "world"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("shards must be > 0"));
}

#[test]
fn search_rejects_bad_documents() {
    let tmp = tempdir().expect("tempdir");
    let docs = tmp.path().join("docs.tsv");
    fs::write(&docs, "1\ta\nx\tb\n").unwrap();

    cli_cmd()
        .args(["search", "--docs", docs.to_str().unwrap(), "a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn debug_renders_bits() {
    cli_cmd()
        .args(["debug", "--bits", "16", "--mappers", "2", "--add", "hello", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("^"))
        .stdout(predicate::str::contains("may_contain(hello) = true"));

    cli_cmd()
        .args(["debug", "--mappers", "0", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("mappers must be > 0"));
}
