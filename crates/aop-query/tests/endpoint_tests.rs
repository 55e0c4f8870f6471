//! HTTP SPARQL endpoint and builder tests against a mock server
//!
//! These tests validate:
//! - Request shape (form-encoded POST, SPARQL JSON accept header)
//! - Mapping of HTTP, timeout, connection and decode failures
//! - A full builder run routed by query content

use aop_query::{AopNetworkBuilder, HttpSparqlEndpoint, QueryError, QueryType, SparqlEndpoint};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::{
    matchers::{body_string_contains, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

const MIE: &str = "https://identifiers.org/aop.events/201";
const KE: &str = "https://identifiers.org/aop.events/888";
const AO: &str = "https://identifiers.org/aop.events/890";

fn endpoint(server: &MockServer, timeout_secs: u64) -> HttpSparqlEndpoint {
    HttpSparqlEndpoint::new(format!("{}/sparql", server.uri()), Duration::from_secs(timeout_secs))
        .expect("endpoint")
}

fn sparql_json(bindings: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "application/sparql-results+json")
        .set_body_json(json!({"head": {"vars": []}, "results": {"bindings": bindings}}))
}

fn identifier_bindings() -> serde_json::Value {
    json!([
        {
            "aop": {"type": "uri", "value": "https://identifiers.org/aop/3"},
            "aop_title": {"type": "literal", "value": "Complex I inhibition"},
            "MIE": {"type": "uri", "value": MIE},
            "MIEtitle": {"type": "literal", "value": "Binding to complex I"},
            "ao": {"type": "uri", "value": AO},
            "ao_title": {"type": "literal", "value": "Parkinsonian motor deficits"},
            "KER": {"type": "uri", "value": "https://identifiers.org/aop.relationships/887"},
            "KE_upstream": {"type": "uri", "value": MIE},
            "KE_upstream_title": {"type": "literal", "value": "Binding to complex I"},
            "KE_downstream": {"type": "uri", "value": KE},
            "KE_downstream_title": {"type": "literal", "value": "Oxidative stress"}
        }
    ])
}

// ============================================================================
// Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_select_posts_form_encoded_query() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sparql"))
        .and(header("accept", "application/sparql-results+json"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("query=SELECT"))
        .respond_with(sparql_json(json!([
            {"ke": {"type": "uri", "value": KE}, "gene": {"type": "literal", "value": "SOD1"}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let results = endpoint(&server, 5)
        .select("SELECT ?ke ?gene WHERE { ?ke ?p ?gene }")
        .await
        .expect("select");

    assert_eq!(results.bindings().len(), 1);
    assert_eq!(results.bindings()[0]["gene"].value, "SOD1");
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let err = endpoint(&server, 5).select("SELECT * WHERE { ?s ?p ?o }").await.unwrap_err();
    match err {
        QueryError::HttpStatus { status, body, .. } => {
            assert_eq!(status, 503);
            assert_eq!(body, "Service Unavailable");
        },
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_invalid_json_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = endpoint(&server, 5).select("SELECT * WHERE { ?s ?p ?o }").await.unwrap_err();
    assert!(matches!(err, QueryError::Parse(_)));
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(sparql_json(json!([])).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let err = endpoint(&server, 1).select("SELECT * WHERE { ?s ?p ?o }").await.unwrap_err();
    assert!(matches!(err, QueryError::Timeout { seconds: 1, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_unreachable_endpoint_is_connection_error() {
    // Reserve a free port, then release it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/sparql", listener.local_addr().unwrap());
    drop(listener);

    let endpoint = HttpSparqlEndpoint::new(url, Duration::from_secs(5)).expect("endpoint");
    let err = endpoint.select("SELECT * WHERE { ?s ?p ?o }").await.unwrap_err();
    assert!(matches!(err, QueryError::Connection { .. }));
}

// ============================================================================
// Builder Tests
// ============================================================================

#[tokio::test]
async fn test_builder_against_mock_endpoints() {
    let aop_wiki = MockServer::start().await;
    let bgee = MockServer::start().await;

    // Identifier query
    Mock::given(method("POST"))
        .and(body_string_contains("KE_upstream_title"))
        .respond_with(sparql_json(identifier_bindings()))
        .mount(&aop_wiki)
        .await;

    // Gene query
    Mock::given(method("POST"))
        .and(body_string_contains("data_1033"))
        .respond_with(sparql_json(json!([
            {
                "ke": {"type": "uri", "value": KE},
                "gene": {"type": "literal", "value": "ENSG00000142168"},
                "protein": {"type": "literal", "value": "P00441"}
            }
        ])))
        .mount(&aop_wiki)
        .await;

    // Organ query
    Mock::given(method("POST"))
        .and(body_string_contains("organ_name"))
        .respond_with(sparql_json(json!([
            {
                "ke": {"type": "uri", "value": AO},
                "organ": {"type": "uri", "value": "http://purl.obolibrary.org/obo/UBERON_0000955"},
                "organ_name": {"type": "literal", "value": "brain"}
            }
        ])))
        .mount(&aop_wiki)
        .await;

    // Compound query fails upstream
    Mock::given(method("POST"))
        .and(body_string_contains("pubchem_compound"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&aop_wiki)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("brain"))
        .respond_with(sparql_json(json!([
            {
                "gene_id": {"type": "literal", "value": "ENSG00000142168"},
                "anatomical_entity_id": {"type": "uri", "value": "http://purl.obolibrary.org/obo/UBERON_0000955"},
                "anatomical_entity_name": {"type": "literal", "value": "brain"},
                "expression_level": {"type": "literal", "value": "91.5"},
                "confidence_level_name": {"type": "literal", "value": "high confidence level"}
            },
            {
                "gene_id": {"type": "literal", "value": "ENSG00000142168"},
                "anatomical_entity_name": {"type": "literal", "value": "brain"}
            }
        ])))
        .expect(1)
        .mount(&bgee)
        .await;

    let mut builder = AopNetworkBuilder::new(
        Arc::new(endpoint(&aop_wiki, 5)),
        Arc::new(endpoint(&bgee, 5)),
    );

    let report = builder
        .query_by_identifier(QueryType::Aop, "3", &[])
        .await
        .expect("identifier query");
    assert_eq!(report.added, 4);

    let genes = builder.query_genes_for_kes(true).await.expect("gene query");
    assert_eq!(genes.added, 1);

    let before = builder.network().summary();
    let err = builder.query_compounds_for_aops().await.unwrap_err();
    assert!(matches!(err, QueryError::HttpStatus { status: 500, .. }));
    assert_eq!(builder.network().summary(), before);

    builder.query_organs_for_kes().await.expect("organ query");

    let expression = builder.query_gene_expression(Some(80)).await.expect("expression query");
    assert_eq!(expression.added, 1);
    // the row without an anatomical entity id is reported, not dropped silently
    assert_eq!(expression.failures.len(), 1);
    assert_eq!(expression.failures[0].row, 1);

    let network = builder.into_network();
    let summary = network.summary();
    assert_eq!(summary.total_key_events, 3);
    assert_eq!(summary.ker_count, 1);
    assert_eq!(summary.gene_associations, 1);
    assert_eq!(summary.organ_associations, 1);
    assert_eq!(summary.gene_expression_associations, 1);
    assert_eq!(summary.compound_associations, 0);
}
