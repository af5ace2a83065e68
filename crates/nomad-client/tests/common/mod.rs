// Shared helpers for the mock-server tests

#![allow(dead_code)]

use nomad_client::{NomadApiClient, NomadApiConfiguration};
use serde_json::Value;
use wiremock::{MockServer, ResponseTemplate};

pub async fn setup() -> (MockServer, NomadApiClient) {
    let server = MockServer::start().await;
    let client = NomadApiClient::new(NomadApiConfiguration::new(&server.uri()))
        .expect("client for mock server");
    (server, client)
}

pub async fn setup_with(config: NomadApiConfiguration) -> (MockServer, NomadApiClient) {
    let server = MockServer::start().await;
    let config = NomadApiConfiguration {
        address: server.uri(),
        ..config
    };
    let client = NomadApiClient::new(config).expect("client for mock server");
    (server, client)
}

/// Server read or write answer carrying the index headers
pub fn indexed(index: u64, body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("X-Nomad-Index", index.to_string().as_str())
        .insert_header("X-Nomad-LastContact", "0")
        .insert_header("X-Nomad-KnownLeader", "true")
        .set_body_json(body)
}

/// Write answer that created an evaluation
pub fn evaluation(index: u64, eval_id: &str) -> ResponseTemplate {
    indexed(
        index,
        serde_json::json!({
            "EvalID": eval_id,
            "EvalCreateIndex": index,
            "JobModifyIndex": index,
            "Index": index,
        }),
    )
}
