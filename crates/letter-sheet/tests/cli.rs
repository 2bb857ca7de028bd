#![cfg(feature = "cli")]

mod common;

use assert_cmd::Command;
use common::{count_files, write_sheet};
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("letter-sheet").expect("binary built")
}

#[test]
fn config_prints_default_json() {
    cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"output_dir\": \"letters\""))
        .stdout(predicate::str::contains("\"hebrew\""))
        .stdout(predicate::str::contains("\"gap_tolerance_px\": 10"));
}

#[test]
fn split_writes_one_file_per_letter() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("sheet.png");
    let out = dir.path().join("out");
    write_sheet(&input, 27);

    cmd()
        .arg("split")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("complete"));

    assert_eq!(count_files(&out, "png"), 27);
    assert!(out.join("26_final_tsadi.png").is_file());
    assert!(out.join("manifest.json").is_file());
}

#[test]
fn split_reports_padding_as_warning() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("sheet.png");
    write_sheet(&input, 10);

    cmd()
        .arg("split")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("out"))
        .assert()
        .success()
        .stdout(predicate::str::contains("padded"));
}

#[test]
fn split_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .arg("split")
        .arg(dir.path().join("nope.png"))
        .arg("-o")
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn batch_with_a_broken_image_exits_with_code_two() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.png");
    let bad = dir.path().join("bad.png");
    write_sheet(&good, 27);
    std::fs::write(&bad, b"garbage").unwrap();
    let out = dir.path().join("out");

    cmd()
        .arg("batch")
        .arg(&good)
        .arg(&bad)
        .arg("-o")
        .arg(&out)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("1 ok").and(predicate::str::contains("1 failed")));

    assert!(out.join("report.json").is_file());
    assert_eq!(count_files(&out.join("good"), "png"), 27);
}

#[test]
fn binarize_converts_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    std::fs::create_dir(&src).unwrap();
    write_sheet(&src.join("a.png"), 3);
    write_sheet(&src.join("b.png"), 5);
    std::fs::write(src.join("notes.txt"), "skip me").unwrap();
    let dst = dir.path().join("dst");

    cmd()
        .arg("binarize")
        .arg(&src)
        .arg(&dst)
        .assert()
        .success()
        .stdout(predicate::str::contains("binarized 2 image(s)"));

    assert_eq!(count_files(&dst, "png"), 2);
}
