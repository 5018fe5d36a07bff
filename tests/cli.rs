#![cfg(feature = "cli")]

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn corpus0() -> TempDir {
    let dir = TempDir::new().unwrap();
    let pages = [
        ("1.html", r#"<a href="2.html">2</a>"#),
        ("2.html", r#"<a href="1.html">1</a> <a href="3.html">3</a>"#),
        ("3.html", r#"<a href="2.html">2</a> <a href="4.html">4</a>"#),
        ("4.html", r#"<a href="2.html">2</a>"#),
    ];
    for (name, body) in pages {
        fs::write(dir.path().join(name), format!("<html><body>{body}</body></html>")).unwrap();
    }
    dir
}

#[test]
fn prints_both_estimates_alphabetically() {
    let dir = corpus0();
    Command::cargo_bin("linkrank")
        .unwrap()
        .arg(dir.path())
        .args(["--seed", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "PageRank Results from Sampling (n = 10000)",
        ))
        .stdout(predicate::str::contains("PageRank Results from Iteration"))
        .stdout(predicate::str::contains("  1.html: 0.2198"))
        .stdout(predicate::str::contains("  2.html: 0.4294"))
        .stdout(predicate::str::contains("  4.html: 0.1311"));
}

#[test]
fn rejects_empty_corpus() {
    let dir = TempDir::new().unwrap();
    Command::cargo_bin("linkrank")
        .unwrap()
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no .html pages"));
}

#[test]
fn rejects_out_of_range_damping() {
    let dir = corpus0();
    Command::cargo_bin("linkrank")
        .unwrap()
        .arg(dir.path())
        .args(["--damping", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("damping"));
}

#[test]
fn warns_when_iteration_does_not_converge() {
    let dir = corpus0();
    Command::cargo_bin("linkrank")
        .unwrap()
        .arg(dir.path())
        .args(["--max-iterations", "1", "--tolerance", "1e-12", "--samples", "10"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("PageRank Results from Iteration"))
        .stderr(predicate::str::contains("without converging"));
}
