//! Test jobs and helpers that wait for the cluster to act on them

use std::time::Duration;

use anyhow::{Context, ensure};
use bytes::Bytes;
use futures::TryStreamExt;
use nomad_api_model::{
    Allocation, Evaluation, Job, Task, TaskGroup, TaskState,
    evaluation::EVAL_STATUS_COMPLETE,
    job::JOB_TYPE_BATCH,
};
use nomad_client::{
    FramedStream, WaitStrategy,
    api::{AllocationsApi, EvaluationsApi},
    poll_until,
};

use crate::TestAgent;

/// How long helpers wait for the scheduler or a task
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(60);

/// A batch job with one group and one `raw_exec` task named `task1`.
/// The ID is unique so jobs never collide across tests.
pub fn test_job() -> Job {
    bash_job("sleep 1")
}

/// Like [`test_job`], with the task running `command` through bash
pub fn bash_job(command: &str) -> Job {
    let id = format!("test-job-{}", uuid::Uuid::new_v4());

    let mut task = Task::new("task1", "raw_exec");
    task.add_config("command", "/bin/bash")
        .add_config("args", serde_json::json!(["-c", command]));

    let mut group = TaskGroup::new("group1");
    group.count = Some(1);
    group.add_task(task);

    let mut job = Job::new(id.clone(), id);
    job.job_type = Some(JOB_TYPE_BATCH.to_string());
    job.datacenters = Some(vec!["dc1".to_string()]);
    job.add_task_group(group);
    job
}

/// Register `job` and wait for its evaluation to complete successfully
pub async fn register_job_and_wait_for_evaluation(
    agent: &TestAgent,
    job: &Job,
) -> anyhow::Result<Evaluation> {
    let registered = agent
        .client()
        .jobs()
        .register(job, None, false, None)
        .await
        .context("registering job")?;
    wait_for_evaluation(&agent.client().evaluations(), &registered.value).await
}

/// Block until the evaluation is terminal; fails unless it completed
pub async fn wait_for_evaluation(
    evaluations: &EvaluationsApi,
    eval_id: &str,
) -> anyhow::Result<Evaluation> {
    let response = poll_until(
        None,
        WaitStrategy::for_duration(WAIT_TIMEOUT),
        |options| async move { evaluations.info(eval_id, Some(&options)).await },
        |r| r.value.is_terminal(),
    )
    .await
    .with_context(|| format!("waiting for evaluation {}", eval_id))?;

    let eval = response.value;
    ensure!(
        eval.status == EVAL_STATUS_COMPLETE,
        "evaluation {} ended as {}: {}",
        eval.id,
        eval.status,
        eval.status_description
    );
    Ok(eval)
}

/// Block until the named task's state satisfies `predicate`
pub async fn wait_for_task_state(
    allocations: &AllocationsApi,
    alloc_id: &str,
    task: &str,
    mut predicate: impl FnMut(&TaskState) -> bool,
) -> anyhow::Result<Allocation> {
    let response = poll_until(
        None,
        WaitStrategy::for_duration(WAIT_TIMEOUT),
        |options| async move { allocations.info(alloc_id, Some(&options)).await },
        |r| r.value.task_state(task).is_some_and(&mut predicate),
    )
    .await
    .with_context(|| format!("waiting for task {} of allocation {}", task, alloc_id))?;
    Ok(response.value)
}

/// Run `command` as a job and return its allocation once the task state
/// satisfies `predicate`
pub async fn run_and_wait_for_task_state(
    agent: &TestAgent,
    command: &str,
    predicate: impl FnMut(&TaskState) -> bool,
) -> anyhow::Result<Allocation> {
    let eval = register_job_and_wait_for_evaluation(agent, &bash_job(command)).await?;
    let allocs = agent
        .client()
        .evaluations()
        .allocations(&eval.id, None)
        .await?
        .value;
    let alloc = allocs
        .first()
        .with_context(|| format!("evaluation {} placed no allocation", eval.id))?;

    wait_for_task_state(&agent.client().allocations(), &alloc.id, "task1", predicate).await
}

/// Read frames until `expected_len` data bytes arrived or the stream ends
pub async fn collect_frames(
    mut frames: FramedStream,
    expected_len: usize,
) -> anyhow::Result<Vec<u8>> {
    let mut out = Vec::new();
    while out.len() < expected_len {
        match frames.next_frame().await? {
            Some(frame) => out.extend_from_slice(&frame.data),
            None => break,
        }
    }
    Ok(out)
}

/// Read a plain byte stream until `expected_len` bytes arrived or it ends
pub async fn collect_bytes(
    mut stream: futures::stream::BoxStream<'static, nomad_client::Result<Bytes>>,
    expected_len: usize,
) -> anyhow::Result<Vec<u8>> {
    let mut out = Vec::new();
    while out.len() < expected_len {
        match stream.try_next().await? {
            Some(chunk) => out.extend_from_slice(&chunk),
            None => break,
        }
    }
    Ok(out)
}
