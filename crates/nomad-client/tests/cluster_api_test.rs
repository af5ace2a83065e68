// Allocations, evaluations, nodes, deployments and namespaces against a mock server

mod common;

use common::{indexed, setup};
use nomad_client::{
    NomadError, QueryOptions,
    model::{DrainSpec, Namespace},
};
use serde_json::json;
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{body_json, method, path, query_param},
};

#[tokio::test]
async fn test_allocations() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v1/allocations"))
        .and(query_param("prefix", "ab"))
        .respond_with(indexed(10, json!([{"ID": "abcd", "ClientStatus": "running"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/allocation/abcd"))
        .respond_with(indexed(
            11,
            json!({
                "ID": "abcd",
                "NodeID": "node-1",
                "ClientStatus": "complete",
                "CreateTime": 1_600_000_000_000_000_000i64,
                "TaskStates": {"task1": {"State": "dead", "Failed": false}},
                "NetworkStatus": {"Address": "10.0.0.2"}
            }),
        ))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/allocation/abcd/stop"))
        .respond_with(indexed(12, json!({"EvalID": "eval-stop", "Index": 12})))
        .expect(1)
        .mount(&server)
        .await;

    let allocations = client.allocations();
    let list = allocations
        .list(Some(&QueryOptions::with_prefix("ab")))
        .await
        .unwrap();
    assert_eq!(list.value[0].client_status, "running");

    let alloc = allocations.info("abcd", None).await.unwrap().value;
    assert!(alloc.is_client_terminal());
    assert!(alloc.task_state("task1").unwrap().is_dead());
    assert_eq!(alloc.created_at().unwrap().timestamp(), 1_600_000_000);
    assert!(alloc.unmapped_properties.contains_key("NetworkStatus"));

    let stopped = allocations.stop("abcd", None).await.unwrap();
    assert_eq!(stopped.value.eval_id, "eval-stop");
    assert_eq!(stopped.index, 12);
}

#[tokio::test]
async fn test_evaluations() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v1/evaluations"))
        .respond_with(indexed(20, json!([{"ID": "e1", "Status": "pending"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/evaluation/e1"))
        .respond_with(indexed(
            21,
            json!({"ID": "e1", "Status": "blocked", "Type": "service",
                   "FailedTGAllocs": {"web": {"NodesEvaluated": 3}}}),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/evaluation/e1/allocations"))
        .respond_with(indexed(22, json!([{"ID": "a1", "EvalID": "e1"}])))
        .mount(&server)
        .await;

    let evaluations = client.evaluations();
    assert!(!evaluations.list(None).await.unwrap().value[0].is_terminal());

    let eval = evaluations.info("e1", None).await.unwrap().value;
    assert_eq!(eval.eval_type, "service");
    assert_eq!(eval.failed_tg_allocs.unwrap()["web"].nodes_evaluated, 3);

    let allocs = evaluations.allocations("e1", None).await.unwrap().value;
    assert_eq!(allocs[0].eval_id, "e1");
}

#[tokio::test]
async fn test_nodes() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v1/nodes"))
        .respond_with(indexed(
            30,
            json!([{"ID": "n1", "Name": "worker-1", "Status": "ready", "SchedulingEligibility": "eligible"}]),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/node/n1"))
        .respond_with(indexed(
            31,
            json!({"ID": "n1", "HTTPAddr": "10.0.0.5:4646", "TLSEnabled": true, "Status": "ready"}),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/node/n1/allocations"))
        .respond_with(indexed(32, json!([{"ID": "a1", "NodeID": "n1"}])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/node/n1/evaluate"))
        .respond_with(indexed(
            33,
            json!({"EvalIDs": ["e1", "e2"], "EvalCreateIndex": 33, "NodeModifyIndex": 30}),
        ))
        .mount(&server)
        .await;

    let nodes = client.nodes();
    let list = nodes.list(None).await.unwrap().value;
    assert_eq!(list[0].name, "worker-1");

    let node = nodes.info("n1", None).await.unwrap().value;
    assert_eq!(node.http_url(), "https://10.0.0.5:4646");

    let allocs = nodes.allocations("n1", None).await.unwrap().value;
    assert_eq!(allocs[0].node_id, "n1");

    let evaluated = nodes.force_evaluate("n1", None).await.unwrap().value;
    assert_eq!(evaluated.eval_ids.unwrap().len(), 2);
}

#[tokio::test]
async fn test_node_drain_and_eligibility() {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .and(path("/v1/node/n1/drain"))
        .and(body_json(json!({
            "NodeID": "n1",
            "DrainSpec": {"Deadline": 3_600_000_000_000i64, "IgnoreSystemJobs": true},
            "MarkEligible": false
        })))
        .respond_with(indexed(40, json!({"NodeModifyIndex": 40})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/node/n1/drain"))
        .and(body_json(json!({"NodeID": "n1", "MarkEligible": true})))
        .respond_with(indexed(41, json!({"NodeModifyIndex": 41})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/node/n1/eligibility"))
        .and(body_json(json!({"NodeID": "n1", "Eligibility": "ineligible"})))
        .respond_with(indexed(42, json!({"NodeModifyIndex": 42})))
        .expect(1)
        .mount(&server)
        .await;

    let nodes = client.nodes();
    let spec = DrainSpec {
        deadline: 3_600_000_000_000,
        ignore_system_jobs: true,
    };
    let drained = nodes.toggle_drain("n1", Some(&spec), false, None).await.unwrap();
    assert_eq!(drained.value.node_modify_index, 40);

    let cancelled = nodes.toggle_drain("n1", None, true, None).await.unwrap();
    assert_eq!(cancelled.index, 41);

    let ineligible = nodes.toggle_eligibility("n1", false, None).await.unwrap();
    assert_eq!(ineligible.value.node_modify_index, 42);
}

#[tokio::test]
async fn test_deployments() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v1/deployments"))
        .respond_with(indexed(50, json!([{"ID": "d1", "Status": "paused"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/deployment/d1"))
        .respond_with(indexed(
            51,
            json!({"ID": "d1", "JobID": "web", "Status": "running",
                   "TaskGroups": {"web": {"DesiredCanaries": 1, "PlacedCanaries": ["a9"]}}}),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/deployment/allocations/d1"))
        .respond_with(indexed(52, json!([{"ID": "a9"}])))
        .mount(&server)
        .await;

    let deployments = client.deployments();
    assert!(deployments.list(None).await.unwrap().value[0].is_active());

    let deployment = deployments.info("d1", None).await.unwrap().value;
    assert_eq!(deployment.task_groups["web"].desired_canaries, 1);

    let allocs = deployments.allocations("d1", None).await.unwrap().value;
    assert_eq!(allocs[0].id, "a9");
}

#[tokio::test]
async fn test_deployment_updates() {
    let (server, client) = setup().await;
    let update = json!({"EvalID": "e", "EvalCreateIndex": 60, "DeploymentModifyIndex": 60, "Index": 60});

    Mock::given(method("PUT"))
        .and(path("/v1/deployment/fail/d1"))
        .and(body_json(json!({"DeploymentID": "d1"})))
        .respond_with(indexed(60, update.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/deployment/pause/d1"))
        .and(body_json(json!({"DeploymentID": "d1", "Pause": true})))
        .respond_with(indexed(60, update.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/deployment/promote/d1"))
        .and(body_json(json!({"DeploymentID": "d1", "All": true})))
        .respond_with(indexed(60, update.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/deployment/promote/d1"))
        .and(body_json(json!({"DeploymentID": "d1", "All": false, "Groups": ["web"]})))
        .respond_with(indexed(60, update.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/deployment/allocation-health/d1"))
        .and(body_json(json!({
            "DeploymentID": "d1",
            "HealthyAllocationIDs": ["a1"],
            "UnhealthyAllocationIDs": []
        })))
        .respond_with(indexed(60, update))
        .expect(1)
        .mount(&server)
        .await;

    let deployments = client.deployments();
    assert_eq!(deployments.fail("d1", None).await.unwrap().value.eval_id, "e");
    deployments.pause("d1", true, None).await.unwrap();
    deployments.promote_all("d1", None).await.unwrap();
    deployments
        .promote_groups("d1", &["web".to_string()], None)
        .await
        .unwrap();
    let health = deployments
        .set_alloc_health("d1", &["a1".to_string()], &[], None)
        .await
        .unwrap();
    assert_eq!(health.value.deployment_modify_index, 60);
}

#[tokio::test]
async fn test_namespaces() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v1/namespaces"))
        .respond_with(indexed(
            70,
            json!([{"Name": "default", "Description": "Default shared namespace"}]),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/namespace/apps"))
        .respond_with(indexed(71, json!({"Name": "apps", "Quota": "small"})))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/namespace/apps"))
        .and(body_json(json!({"Name": "apps", "Description": "applications"})))
        .respond_with(ResponseTemplate::new(200).insert_header("X-Nomad-Index", "72"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/namespace/apps"))
        .respond_with(ResponseTemplate::new(200).insert_header("X-Nomad-Index", "73"))
        .expect(1)
        .mount(&server)
        .await;

    let namespaces = client.namespaces();
    let list = namespaces.list(None).await.unwrap().value;
    assert_eq!(list[0].name, "default");

    let apps = namespaces.info("apps", None).await.unwrap().value;
    assert_eq!(apps.quota.as_deref(), Some("small"));

    let mut namespace = Namespace::new("apps");
    namespace.description = Some("applications".to_string());
    assert_eq!(namespaces.register(&namespace, None).await.unwrap().index, 72);
    assert_eq!(namespaces.delete("apps", None).await.unwrap().index, 73);

    let err = namespaces
        .register(&Namespace::new(""), None)
        .await
        .unwrap_err();
    assert!(matches!(err, NomadError::InvalidRequest(_)));
}
