//! Integration tests for the CLI commands

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_version_command() {
    let mut cmd = cargo_bin_cmd!("idscan");
    cmd.arg("version");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("idscan "));
}

#[test]
fn test_version_flag() {
    let mut cmd = cargo_bin_cmd!("idscan");
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("idscan "));
}

#[test]
fn test_types_hides_internal_entries() {
    let mut cmd = cargo_bin_cmd!("idscan");
    cmd.arg("types");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"Philippine National ID\""))
        .stdout(predicate::str::contains("Blank").not());

    let mut cmd = cargo_bin_cmd!("idscan");
    cmd.args(["types", "--all"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"Blank / Raw OCR\""));
}

#[test]
fn test_parse_from_stdin() {
    let mut cmd = cargo_bin_cmd!("idscan");
    cmd.args(["parse", "--id-type", "PhilHealth ID"])
        .write_stdin("PhilHealth\n12-345678901-2\nDELA CRUZ, Juan Pedro\nJan. 03, 1990\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"idNumber\": \"12-345678901-2\""))
        .stdout(predicate::str::contains("\"fullName\": \"Juan Pedro DELA CRUZ\""))
        .stdout(predicate::str::contains("\"dob\": \"1990-01-03\""));
}

#[test]
fn test_parse_from_file_detects_type() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("card.txt");
    fs::write(&path, "Unified Multi-Purpose ID\nCRN-0111-2345678-9\n").unwrap();

    let mut cmd = cargo_bin_cmd!("idscan");
    cmd.arg("parse").arg(&path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"idType\": \"UMID\""))
        .stdout(predicate::str::contains("CRN-0111-2345678-9"));
}

#[test]
fn test_parse_missing_file_fails() {
    let mut cmd = cargo_bin_cmd!("idscan");
    cmd.args(["parse", "/nonexistent/card.txt"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_detect_command() {
    let mut cmd = cargo_bin_cmd!("idscan");
    cmd.arg("detect").write_stdin("LAND TRANSPORTATION OFFICE\nN01-23-456789");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"idType\": \"Driver's License\""))
        .stdout(predicate::str::contains("\"matchedPatterns\""));
}

#[test]
fn test_validate_accepts_good_fields() {
    let mut cmd = cargo_bin_cmd!("idscan");
    cmd.args([
        "validate",
        "--id-type",
        "National ID",
        "--full-name",
        "JUAN SANTOS DELA CRUZ",
        "--dob",
        "1990-01-03",
        "--id-number",
        "1234-5678-9012-3456",
        "--today",
        "2025-06-01",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"ok\": true"));
}

#[test]
fn test_validate_rejection_exits_nonzero() {
    let mut cmd = cargo_bin_cmd!("idscan");
    cmd.args([
        "validate",
        "--id-type",
        "UMID",
        "--full-name",
        "A",
        "--dob",
        "2099-01-01",
        "--id-number",
        "123",
    ]);

    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("\"ok\": false"))
        .stdout(predicate::str::contains("UMID CRN"));
}

#[test]
fn test_rois_prints_override_document() {
    let mut cmd = cargo_bin_cmd!("idscan");
    cmd.args(["rois", "--id-type", "National ID"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"idType\": \"National ID\""))
        .stdout(predicate::str::contains("\"key\": \"givenNames\""))
        .stdout(predicate::str::contains("\"version\": 1"));
}

#[test]
fn test_scan_rejects_mismatched_override() {
    let dir = tempfile::tempdir().unwrap();
    let rois = dir.path().join("rois.json");
    let output = cargo_bin_cmd!("idscan")
        .args(["rois", "--id-type", "UMID"])
        .output()
        .unwrap();
    fs::write(&rois, output.stdout).unwrap();

    let mut cmd = cargo_bin_cmd!("idscan");
    cmd.args(["scan", "--id-type", "PWD ID", "--image", "card.png", "--rois"])
        .arg(&rois);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("expected PWD ID"));
}

#[test]
fn test_scan_missing_image_fails() {
    let mut cmd = cargo_bin_cmd!("idscan");
    cmd.args(["scan", "--id-type", "UMID", "--image", "/nonexistent/card.png"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open card image"));
}

#[test]
fn test_scan_rejects_out_of_range_padding() {
    let mut cmd = cargo_bin_cmd!("idscan");
    cmd.args(["scan", "--id-type", "UMID", "--image", "card.png", "--padding=-0.1"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("padding must be between 0 and 0.5"));
}

#[test]
fn test_parse_judges_age_on_given_day() {
    let text = "PWD ID\nROSA MAY FLORES\nID No. 13-7404-000-1234567\n1900-01-02";

    let mut cmd = cargo_bin_cmd!("idscan");
    cmd.args(["parse", "--id-type", "PWD ID", "--today", "1990-06-01"])
        .write_stdin(text);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"dob\": \"1900-01-02\""));

    let mut cmd = cargo_bin_cmd!("idscan");
    cmd.args(["parse", "--id-type", "PWD ID", "--today", "2025-06-01"])
        .write_stdin(text);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"dob\": \"\""));
}
