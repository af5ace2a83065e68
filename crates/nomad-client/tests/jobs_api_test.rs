// Jobs API against a mock Nomad server

mod common;

use std::collections::HashMap;

use common::{evaluation, indexed, setup, setup_with};
use nomad_client::{
    NomadApiConfiguration, NomadError, QueryOptions, WriteOptions,
    api::ScalingRequest,
    model::{Job, Task, TaskGroup},
};
use serde_json::json;
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{body_json, body_partial_json, header, method, path, query_param, query_param_is_missing},
};

fn sleep_job(id: &str) -> Job {
    let mut task = Task::new("task1", "raw_exec");
    task.add_config("command", "/bin/sleep").add_config("args", json!(["60"]));

    let mut group = TaskGroup::new("group1");
    group.add_task(task);

    let mut job = Job::new(id, id);
    job.datacenters = Some(vec!["dc1".to_string()]);
    job.add_task_group(group);
    job
}

#[tokio::test]
async fn test_list_with_prefix() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v1/jobs"))
        .and(query_param("prefix", "web"))
        .respond_with(indexed(
            42,
            json!([
                {"ID": "web-1", "Name": "web-1", "Type": "service", "Status": "running",
                 "JobSummary": {"JobID": "web-1", "Summary": {"web": {"Running": 2}}}},
                {"ID": "web-2", "Name": "web-2", "Type": "batch", "Status": "dead"}
            ]),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let response = client
        .jobs()
        .list(Some(&QueryOptions::with_prefix("web")))
        .await
        .unwrap();

    assert_eq!(response.index, 42);
    assert!(response.known_leader);
    assert_eq!(response.value.len(), 2);
    assert_eq!(response.value[0].id, "web-1");
    let summary = response.value[0].job_summary.as_ref().unwrap();
    assert_eq!(summary.summary["web"].running, 2);
    assert_eq!(response.value[1].job_type, "batch");
}

#[tokio::test]
async fn test_register_sends_job_and_returns_eval() {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .and(path("/v1/jobs"))
        .and(body_partial_json(json!({
            "Job": {"ID": "sleeper", "Datacenters": ["dc1"],
                    "TaskGroups": [{"Name": "group1", "Tasks": [{"Name": "task1", "Driver": "raw_exec"}]}]},
            "EnforceIndex": false,
            "PolicyOverride": false
        })))
        .respond_with(evaluation(11, "eval-1"))
        .expect(1)
        .mount(&server)
        .await;

    let response = client
        .jobs()
        .register(&sleep_job("sleeper"), None, false, None)
        .await
        .unwrap();
    assert_eq!(response.value, "eval-1");
    assert_eq!(response.index, 11);
}

#[tokio::test]
async fn test_register_with_enforced_index() {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .and(path("/v1/jobs"))
        .and(body_partial_json(json!({"EnforceIndex": true, "JobModifyIndex": 0})))
        .respond_with(evaluation(3, "eval-2"))
        .expect(1)
        .mount(&server)
        .await;

    client
        .jobs()
        .register(&sleep_job("fresh"), Some(0), false, None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_register_without_id_is_rejected_locally() {
    let (server, client) = setup().await;
    let err = client
        .jobs()
        .register(&Job::default(), None, false, None)
        .await
        .unwrap_err();
    assert!(matches!(err, NomadError::InvalidRequest(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_info_keeps_unknown_fields() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v1/job/sleeper"))
        .respond_with(indexed(
            9,
            json!({"ID": "sleeper", "Name": "sleeper", "Version": 3, "NodePool": "default"}),
        ))
        .mount(&server)
        .await;

    let job = client.jobs().info("sleeper", None).await.unwrap().value;
    assert_eq!(job.version, Some(3));
    assert_eq!(job.unmapped_properties["NodePool"], "default");
}

#[tokio::test]
async fn test_info_not_found() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v1/job/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("job not found"))
        .mount(&server)
        .await;

    let err = client.jobs().info("missing", None).await.unwrap_err();
    assert!(err.is_not_found());
    match err {
        NomadError::ErrorResponse { body, .. } => assert_eq!(body, "job not found"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_job_id_is_path_encoded() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v1/job/batch%2Fdispatch-1/summary"))
        .respond_with(indexed(
            4,
            json!({"JobID": "batch/dispatch-1", "Summary": {"g": {"Complete": 1}}}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let summary = client
        .jobs()
        .summary("batch/dispatch-1", None)
        .await
        .unwrap()
        .value;
    assert_eq!(summary.summary["g"].complete, 1);
}

#[tokio::test]
async fn test_versions_with_diffs() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v1/job/sleeper/versions"))
        .and(query_param("diffs", "true"))
        .respond_with(indexed(
            20,
            json!({
                "Versions": [{"ID": "sleeper", "Version": 1}, {"ID": "sleeper", "Version": 0}],
                "Diffs": [{"Type": "Edited"}]
            }),
        ))
        .mount(&server)
        .await;

    let versions = client
        .jobs()
        .versions("sleeper", true, None)
        .await
        .unwrap()
        .value;
    assert_eq!(versions.versions.len(), 2);
    assert_eq!(versions.versions[0].version, Some(1));
    assert_eq!(versions.diffs.unwrap()[0]["Type"], "Edited");
}

#[tokio::test]
async fn test_latest_deployment_may_be_null() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v1/job/batchy/deployment"))
        .respond_with(indexed(1, json!(null)))
        .mount(&server)
        .await;

    let deployment = client
        .jobs()
        .latest_deployment("batchy", None)
        .await
        .unwrap();
    assert!(deployment.value.is_none());
}

#[tokio::test]
async fn test_deregister_with_purge() {
    let (server, client) = setup().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/job/sleeper"))
        .and(query_param("purge", "true"))
        .respond_with(evaluation(30, "eval-stop"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/job/other"))
        .and(query_param_is_missing("purge"))
        .respond_with(evaluation(31, "eval-other"))
        .expect(1)
        .mount(&server)
        .await;

    let jobs = client.jobs();
    assert_eq!(
        jobs.deregister("sleeper", true, None).await.unwrap().value,
        "eval-stop"
    );
    assert_eq!(
        jobs.deregister("other", false, None).await.unwrap().value,
        "eval-other"
    );
}

#[tokio::test]
async fn test_force_evaluate_and_periodic_force() {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .and(path("/v1/job/sleeper/evaluate"))
        .respond_with(evaluation(5, "eval-5"))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/job/cron/periodic/force"))
        .respond_with(evaluation(6, "eval-6"))
        .mount(&server)
        .await;

    let jobs = client.jobs();
    assert_eq!(jobs.force_evaluate("sleeper", None).await.unwrap().value, "eval-5");
    assert_eq!(jobs.periodic_force("cron", None).await.unwrap().value, "eval-6");
}

#[tokio::test]
async fn test_plan_and_validate() {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .and(path("/v1/job/sleeper/plan"))
        .and(body_partial_json(json!({"Diff": true, "PolicyOverride": false})))
        .respond_with(indexed(
            8,
            json!({
                "JobModifyIndex": 7,
                "Diff": {"Type": "Added"},
                "FailedTGAllocs": {"group1": {"NodesEvaluated": 1, "NodesFiltered": 1}},
                "Warnings": ""
            }),
        ))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/validate/job"))
        .and(body_partial_json(json!({"Job": {"ID": "sleeper"}})))
        .respond_with(indexed(
            0,
            json!({"DriverConfigValidated": true, "ValidationErrors": [], "Error": ""}),
        ))
        .mount(&server)
        .await;

    let job = sleep_job("sleeper");
    let plan = client.jobs().plan(&job, true, false, None).await.unwrap().value;
    assert_eq!(plan.job_modify_index, 7);
    assert_eq!(plan.diff.unwrap()["Type"], "Added");
    assert!(plan.failed_tg_allocs.unwrap().contains_key("group1"));

    let validation = client.jobs().validate(&job, None).await.unwrap().value;
    assert!(validation.driver_config_validated);
    assert!(validation.error.is_empty());
}

#[tokio::test]
async fn test_revert_and_stable() {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .and(path("/v1/job/sleeper/revert"))
        .and(body_json(json!({"JobID": "sleeper", "JobVersion": 1, "EnforcePriorVersion": 2})))
        .respond_with(evaluation(40, "eval-revert"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/job/sleeper/stable"))
        .and(body_json(json!({"JobID": "sleeper", "JobVersion": 1, "Stable": true})))
        .respond_with(evaluation(41, ""))
        .expect(1)
        .mount(&server)
        .await;

    let jobs = client.jobs();
    let reverted = jobs.revert("sleeper", 1, Some(2), None).await.unwrap();
    assert_eq!(reverted.value, "eval-revert");
    let stable = jobs.stable("sleeper", 1, true, None).await.unwrap();
    assert_eq!(stable.index, 41);
}

#[tokio::test]
async fn test_dispatch_encodes_payload() {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .and(path("/v1/job/report/dispatch"))
        .and(body_json(json!({
            "JobID": "report",
            "Meta": {"customer": "acme"},
            "Payload": "aGVsbG8="
        })))
        .respond_with(indexed(
            50,
            json!({"DispatchedJobID": "report/dispatch-123", "EvalID": "eval-d", "Index": 50}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let meta = HashMap::from([("customer".to_string(), "acme".to_string())]);
    let response = client
        .jobs()
        .dispatch("report", Some(&meta), Some(b"hello"), None)
        .await
        .unwrap();
    assert_eq!(response.value.dispatched_job_id, "report/dispatch-123");
    assert_eq!(response.value.eval_id, "eval-d");
}

#[tokio::test]
async fn test_scaling() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v1/job/web/scale"))
        .respond_with(indexed(
            60,
            json!({"JobID": "web", "TaskGroups": {"web": {"Desired": 3, "Running": 2,
                   "Events": [{"Count": 3, "PreviousCount": 2, "Message": "up"}]}}}),
        ))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/job/web/scale"))
        .and(body_json(json!({
            "Count": 5,
            "Target": {"Group": "web"},
            "Message": "busy",
            "Error": false,
            "Meta": {"source": "autoscaler"}
        })))
        .respond_with(evaluation(61, "eval-scale"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/job/web/scale"))
        .and(body_json(json!({"Target": {"Group": "web"}, "Message": "metrics down", "Error": true})))
        .respond_with(evaluation(62, ""))
        .expect(1)
        .mount(&server)
        .await;

    let jobs = client.jobs();
    let status = jobs.scale_status("web", None).await.unwrap().value;
    assert_eq!(status.task_groups["web"].desired, 3);
    assert_eq!(
        status.task_groups["web"].events.as_ref().unwrap()[0].count,
        Some(3)
    );

    let meta = HashMap::from([("source".to_string(), json!("autoscaler"))]);
    let scaled = jobs
        .scale_group("web", "web", 5, Some("busy"), Some(&meta), None)
        .await
        .unwrap();
    assert_eq!(scaled.value, "eval-scale");

    let event = ScalingRequest {
        message: Some("metrics down".to_string()),
        error: true,
        ..Default::default()
    };
    let recorded = jobs
        .register_scaling_event("web", "web", &event, None)
        .await
        .unwrap();
    assert_eq!(recorded.index, 62);

    let invalid = ScalingRequest {
        count: Some(1),
        error: true,
        ..Default::default()
    };
    assert!(matches!(
        jobs.register_scaling_event("web", "web", &invalid, None).await,
        Err(NomadError::InvalidRequest(_))
    ));
}

#[tokio::test]
async fn test_job_sub_resources() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v1/job/sleeper/allocations"))
        .respond_with(indexed(70, json!([{"ID": "a1", "ClientStatus": "running"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/job/sleeper/evaluations"))
        .respond_with(indexed(71, json!([{"ID": "e1", "Status": "complete"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/job/sleeper/deployments"))
        .respond_with(indexed(72, json!([{"ID": "d1", "Status": "running"}])))
        .mount(&server)
        .await;

    let jobs = client.jobs();
    assert_eq!(jobs.allocations("sleeper", None).await.unwrap().value[0].id, "a1");
    assert!(jobs.evaluations("sleeper", None).await.unwrap().value[0].is_terminal());
    assert!(jobs.deployments("sleeper", None).await.unwrap().value[0].is_active());
}

#[tokio::test]
async fn test_scope_and_token_from_config_and_options() {
    let config = NomadApiConfiguration::default()
        .with_region("global")
        .with_namespace("default")
        .with_auth_token("config-token");
    let (server, client) = setup_with(config).await;

    Mock::given(method("GET"))
        .and(path("/v1/jobs"))
        .and(query_param("region", "global"))
        .and(query_param("namespace", "default"))
        .and(header("X-Nomad-Token", "config-token"))
        .respond_with(indexed(1, json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/job/x/evaluate"))
        .and(query_param("region", "eu"))
        .and(query_param("namespace", "apps"))
        .and(header("X-Nomad-Token", "call-token"))
        .respond_with(evaluation(2, "e"))
        .expect(1)
        .mount(&server)
        .await;

    client.jobs().list(None).await.unwrap();
    let options = WriteOptions::default()
        .region("eu")
        .namespace("apps")
        .auth_token("call-token");
    client
        .jobs()
        .force_evaluate("x", Some(&options))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_missing_index_header_is_parse_error() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v1/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = client.jobs().list(None).await.unwrap_err();
    assert!(matches!(err, NomadError::ResponseParsing { .. }));
}

#[tokio::test]
async fn test_malformed_body_keeps_raw_text() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v1/job/broken"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Nomad-Index", "1")
                .set_body_string("<html>proxy error</html>"),
        )
        .mount(&server)
        .await;

    match client.jobs().info("broken", None).await.unwrap_err() {
        NomadError::ResponseParsing { body, .. } => assert_eq!(body, "<html>proxy error</html>"),
        other => panic!("unexpected error: {other}"),
    }
}
