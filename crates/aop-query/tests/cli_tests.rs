//! End-to-end tests for the aop-query binary
//!
//! These tests validate:
//! - Offline summary and conversion of exchange JSON
//! - Table output formats (csv, tsv)
//! - The build workflow against a mock AOP-Wiki endpoint
//! - Error handling and exit codes

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::{
    matchers::{body_string_contains, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn aop_query() -> Command {
    let mut cmd = Command::cargo_bin("aop-query").unwrap();
    cmd.env_remove("AOP_LOG_LEVEL").env_remove("AOP_LOG_OUTPUT");
    cmd
}

fn identifier_response() -> serde_json::Value {
    json!({
        "head": {"vars": []},
        "results": {"bindings": [
            {
                "aop": {"type": "uri", "value": "https://identifiers.org/aop/3"},
                "aop_title": {"type": "literal", "value": "Complex I inhibition"},
                "MIE": {"type": "uri", "value": "https://identifiers.org/aop.events/201"},
                "MIEtitle": {"type": "literal", "value": "Binding to complex I"},
                "ao": {"type": "uri", "value": "https://identifiers.org/aop.events/890"},
                "ao_title": {"type": "literal", "value": "Parkinsonian motor deficits"},
                "KER": {"type": "uri", "value": "https://identifiers.org/aop.relationships/889"},
                "KE_upstream": {"type": "uri", "value": "https://identifiers.org/aop.events/201"},
                "KE_upstream_title": {"type": "literal", "value": "Binding to complex I"},
                "KE_downstream": {"type": "uri", "value": "https://identifiers.org/aop.events/890"},
                "KE_downstream_title": {"type": "literal", "value": "Parkinsonian motor deficits"}
            }
        ]}
    })
}

// ============================================================================
// Summary Tests
// ============================================================================

#[test]
fn test_summary_of_fixture() {
    aop_query()
        .arg("summary")
        .arg(fixture_path("network.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_key_events\": 2"))
        .stdout(predicate::str::contains("\"ker_count\": 1"))
        .stdout(predicate::str::contains("\"compound_associations\": 1"))
        .stdout(predicate::str::contains("\"total_aops\": 1"));
}

#[test]
fn test_summary_missing_file() {
    aop_query()
        .arg("summary")
        .arg(fixture_path("does-not-exist.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_summary_rejects_document_without_elements() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bad.json");
    std::fs::write(&input, r#"{"nodes": []}"#).unwrap();

    aop_query()
        .arg("summary")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("elements"));
}

// ============================================================================
// Convert Tests
// ============================================================================

#[test]
fn test_convert_writes_csv_tables() {
    let dir = TempDir::new().unwrap();
    let tables = dir.path().join("tables");

    aop_query()
        .arg("convert")
        .arg(fixture_path("network.json"))
        .arg("--tables-dir")
        .arg(&tables)
        .assert()
        .success()
        .stdout(predicate::str::contains("key_events.csv"));

    for name in ["key_events", "relationships", "genes", "compounds"] {
        assert!(tables.join(format!("{}.csv", name)).exists(), "missing {}.csv", name);
    }

    let key_events = std::fs::read_to_string(tables.join("key_events.csv")).unwrap();
    assert!(key_events.contains("Oxidative stress"));
}

#[test]
fn test_convert_tsv_with_normalized_output() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("normalized.json");

    aop_query()
        .arg("convert")
        .arg(fixture_path("network.json"))
        .arg("--tables-dir")
        .arg(dir.path())
        .arg("-f")
        .arg("tsv")
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    assert!(dir.path().join("key_events.tsv").exists());

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert!(written["elements"].as_array().is_some_and(|elements| !elements.is_empty()));
    assert!(written.get("style").is_some());
}

#[test]
fn test_convert_unknown_table_format() {
    let dir = TempDir::new().unwrap();

    aop_query()
        .arg("convert")
        .arg(fixture_path("network.json"))
        .arg("--tables-dir")
        .arg(dir.path())
        .arg("--table-format")
        .arg("xml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown table format 'xml'"));
}

// ============================================================================
// Build Tests
// ============================================================================

#[test]
fn test_build_unknown_query_type() {
    aop_query()
        .arg("build")
        .arg("-t")
        .arg("gene")
        .arg("3")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown query type 'gene'"));
}

#[test]
fn test_build_requires_identifiers() {
    aop_query().arg("build").assert().failure();
}

#[tokio::test]
async fn test_build_against_mock_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sparql"))
        .and(body_string_contains("KE_upstream_title"))
        .respond_with(ResponseTemplate::new(200).set_body_json(identifier_response()))
        .mount(&mock_server)
        .await;

    // Organ enrichment fails; the build still succeeds
    Mock::given(method("POST"))
        .and(path("/sparql"))
        .and(body_string_contains("organ_name"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("network.json");

    aop_query()
        .arg("build")
        .arg("3")
        .arg("--organs")
        .arg("--output")
        .arg(&output)
        .arg("--aop-wiki-url")
        .arg(format!("{}/sparql", mock_server.uri()))
        .arg("--timeout")
        .arg("5")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"step\": \"identifier\""))
        .stdout(predicate::str::contains("\"step\": \"organs\""))
        .stdout(predicate::str::contains("returned HTTP 500"))
        .stdout(predicate::str::contains("\"total_key_events\": 2"));

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written["layout"]["name"], "breadthfirst");
}

#[tokio::test]
async fn test_build_fails_when_identifier_query_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("network.json");

    aop_query()
        .arg("build")
        .arg("3")
        .arg("--output")
        .arg(&output)
        .arg("--aop-wiki-url")
        .arg(mock_server.uri())
        .assert()
        .failure()
        .stderr(predicate::str::contains("HTTP 503"));

    assert!(!output.exists());
}
