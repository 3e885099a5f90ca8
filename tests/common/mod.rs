#![allow(dead_code)]

use kycflow::domain::directory::{Bank, Branch};
use serde_json::json;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn bank(id: i64, name: &str) -> Bank {
    Bank {
        id,
        value: name.to_string(),
    }
}

pub fn branch(id: i64, name: &str, bank: &Bank) -> Branch {
    Branch {
        id,
        value: name.to_string(),
        bank: bank.clone(),
    }
}

/// Writes `size` bytes into a temporary file with the given suffix.
pub fn document_file(suffix: &str, size: usize) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(&vec![b'x'; size]).unwrap();
    file.flush().unwrap();
    file
}

/// Starts a mock API serving one bank with one branch plus the upload and
/// submit endpoints.
pub async fn mock_api() -> MockServer {
    let server = MockServer::start().await;
    let chase = bank(1, "Chase Bank");

    Mock::given(method("GET"))
        .and(path("/api/banks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([chase])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/branches"))
        .and(query_param("bank_id", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([branch(2, "Downtown Branch", &chase)])),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/files/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "filename": "stored-proof.pdf",
            "originalName": "proof.pdf",
            "size": 1000
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/applications/submit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 10,
            "accountName": "Jane Doe",
            "accountNumber": "12345678",
            "status": "SUBMITTED",
            "bank": {"value": "Chase Bank"},
            "branch": {"value": "Downtown Branch"}
        })))
        .mount(&server)
        .await;

    server
}

pub fn api_url(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

pub fn state_file(dir: &Path) -> std::path::PathBuf {
    dir.join("kycFormData.json")
}
