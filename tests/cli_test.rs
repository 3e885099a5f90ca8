mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use common::{api_url, document_file, mock_api, state_file};
use predicates::prelude::*;
use serde_json::json;
use std::process::Command;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

// Nothing listens here; commands that stay offline never notice.
const UNREACHABLE_API: &str = "http://127.0.0.1:9/api";

fn kycflow(api: &str, state_dir: &std::path::Path) -> Command {
    let mut cmd = Command::new(cargo_bin!("kycflow"));
    cmd.env_remove("RUST_LOG")
        .arg("--api-url")
        .arg(api)
        .arg("--state-dir")
        .arg(state_dir);
    cmd
}

#[test]
fn test_apply_reports_every_missing_field() {
    let dir = tempdir().unwrap();

    kycflow(UNREACHABLE_API, dir.path())
        .args(["apply", "--account-number", "12ab"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bankId: Bank name is required"))
        .stderr(predicate::str::contains("branchId: Branch name is required"))
        .stderr(predicate::str::contains("accountName: Account name is required"))
        .stderr(predicate::str::contains(
            "accountNumber: Account number must contain only numbers",
        ))
        .stderr(predicate::str::contains(
            "proofDocument: Proof of bank account is required",
        ));

    assert!(!state_file(dir.path()).exists());
}

#[test]
fn test_review_without_application_redirects() {
    let dir = tempdir().unwrap();

    kycflow(UNREACHABLE_API, dir.path())
        .arg("review")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Redirecting to the entry form"))
        .stdout(predicate::str::contains("Account number").not());
}

#[test]
fn test_transaction_requires_all_fields() {
    let dir = tempdir().unwrap();

    kycflow(UNREACHABLE_API, dir.path())
        .args(["transaction", "create", "--account-number", "12345678"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please fill all fields"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_apply_review_submit_end_to_end() {
    let server = mock_api().await;
    let api = api_url(&server);
    let dir = tempdir().unwrap();
    let proof = document_file(".pdf", 1000);

    kycflow(&api, dir.path())
        .args([
            "apply",
            "--bank-id",
            "1",
            "--branch-id",
            "2",
            "--account-name",
            "Jane Doe",
            "--account-number",
            "12345678",
        ])
        .arg("--document")
        .arg(proof.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Bank:           Chase Bank"))
        .stdout(predicate::str::contains("Branch:         Downtown Branch"))
        .stdout(predicate::str::contains("application/pdf, 1000 Bytes"));
    assert!(state_file(dir.path()).exists());

    // Showing the review does not consume it.
    kycflow(&api, dir.path())
        .arg("review")
        .assert()
        .success()
        .stdout(predicate::str::contains("Account number: 12345678"));

    kycflow(&api, dir.path())
        .args(["review", "--submit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Application submitted successfully!"));
    assert!(!state_file(dir.path()).exists());

    kycflow(&api, dir.path())
        .arg("review")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No application in progress"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_apply_rejects_branch_and_document() {
    let server = mock_api().await;
    let api = api_url(&server);
    let dir = tempdir().unwrap();
    let archive = document_file(".zip", 10);

    kycflow(&api, dir.path())
        .args([
            "apply",
            "--bank-id",
            "1",
            "--branch-id",
            "99",
            "--account-name",
            "Jane Doe",
            "--account-number",
            "1234567",
        ])
        .arg("--document")
        .arg(archive.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "branchId: Branch does not belong to the selected bank",
        ))
        .stderr(predicate::str::contains(
            "accountNumber: Account number must be at least 8 digits",
        ))
        .stderr(predicate::str::contains(
            "proofDocument: File must be PDF, PNG, or JPG format",
        ));
    assert!(!state_file(dir.path()).exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_submit_keeps_application() {
    let server = mock_api().await;
    let api = api_url(&server);
    let dir = tempdir().unwrap();
    let proof = document_file(".png", 10);

    kycflow(&api, dir.path())
        .args([
            "apply",
            "--bank-id",
            "1",
            "--branch-id",
            "2",
            "--account-name",
            "Jane Doe",
            "--account-number",
            "12345678",
        ])
        .arg("--document")
        .arg(proof.path())
        .assert()
        .success();

    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/api/applications/submit"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service unavailable"))
        .mount(&server)
        .await;

    kycflow(&api, dir.path())
        .args(["review", "--draft"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Service unavailable"));
    assert!(state_file(dir.path()).exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_applications_as_csv() {
    let server = mock_api().await;
    Mock::given(method("GET"))
        .and(path("/api/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "accountName": "Jane Doe", "accountNumber": "12345678", "status": "SUBMITTED",
             "bank": {"value": "Chase Bank"}, "branch": {"value": "Downtown Branch"}}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let dir = tempdir().unwrap();

    kycflow(&api_url(&server), dir.path())
        .arg("applications")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "id,account_name,account_number,status,bank,branch",
        ))
        .stdout(predicate::str::contains(
            "1,Jane Doe,12345678,SUBMITTED,Chase Bank,Downtown Branch",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_banks() {
    let server = mock_api().await;
    let dir = tempdir().unwrap();

    kycflow(&api_url(&server), dir.path())
        .arg("banks")
        .assert()
        .success()
        .stdout(predicate::str::contains("1\tChase Bank"));

    kycflow(&api_url(&server), dir.path())
        .args(["branches", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2\tDowntown Branch"));
}
