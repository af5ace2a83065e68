//! Jobs API: `/v1/jobs`, `/v1/job/<id>/...` and `/v1/validate/job`

use std::collections::HashMap;

use base64::Engine;
use nomad_api_model::{
    AllocationListStub, Deployment, Evaluation, Job, JobDispatchResponse, JobListStub,
    JobPlanResponse, JobScaleStatusResponse, JobSummary, JobValidateResponse,
    JobVersionsResponseData,
};
use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::error::{NomadError, Result};
use crate::http::{ApiRequest, NomadHttpClient};
use crate::options::{QueryOptions, WriteOptions};
use crate::response::{EvaluationResponse, ServerQueryResponse, ServerResponse};

/// Scaling event to record against a task group
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScalingRequest {
    /// New count; None records an informational event only
    pub count: Option<i64>,
    pub message: Option<String>,
    /// Marks the event as an error; only valid without a count
    pub error: bool,
    pub meta: Option<HashMap<String, serde_json::Value>>,
}

#[skip_serializing_none]
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ScalingBody<'a> {
    count: Option<i64>,
    target: HashMap<&'a str, &'a str>,
    message: Option<&'a str>,
    error: bool,
    meta: Option<&'a HashMap<String, serde_json::Value>>,
}

/// API for managing jobs
#[derive(Clone, Debug)]
pub struct JobsApi {
    http: NomadHttpClient,
}

impl JobsApi {
    pub(crate) fn new(http: NomadHttpClient) -> Self {
        Self { http }
    }

    /// List jobs; `options.prefix` filters by ID prefix
    pub async fn list(
        &self,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<Vec<JobListStub>>> {
        self.http.query(ApiRequest::get("/v1/jobs"), options).await
    }

    /// Register a job, creating or updating it.
    ///
    /// With `modify_index` set the server only accepts the job if its current
    /// modify index matches (0 means the job must not exist yet).
    pub async fn register(
        &self,
        job: &Job,
        modify_index: Option<u64>,
        policy_override: bool,
        options: Option<&WriteOptions>,
    ) -> Result<EvaluationResponse> {
        #[derive(Serialize)]
        #[serde(rename_all = "PascalCase")]
        struct Body<'a> {
            job: &'a Job,
            enforce_index: bool,
            job_modify_index: u64,
            policy_override: bool,
        }

        require_job_id(job)?;
        let body = Body {
            job,
            enforce_index: modify_index.is_some(),
            job_modify_index: modify_index.unwrap_or_default(),
            policy_override,
        };
        let request = ApiRequest::put("/v1/jobs").json(&body)?;
        self.http.write_evaluation(request, options).await
    }

    pub async fn info(
        &self,
        job_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<Job>> {
        self.http.query(job_path(job_id), options).await
    }

    /// All versions of a job, newest first, optionally with diffs between them
    pub async fn versions(
        &self,
        job_id: &str,
        diffs: bool,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<JobVersionsResponseData>> {
        let request = job_path(job_id).segment("versions").param("diffs", diffs);
        self.http.query(request, options).await
    }

    pub async fn allocations(
        &self,
        job_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<Vec<AllocationListStub>>> {
        self.http
            .query(job_path(job_id).segment("allocations"), options)
            .await
    }

    pub async fn evaluations(
        &self,
        job_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<Vec<Evaluation>>> {
        self.http
            .query(job_path(job_id).segment("evaluations"), options)
            .await
    }

    pub async fn deployments(
        &self,
        job_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<Vec<Deployment>>> {
        self.http
            .query(job_path(job_id).segment("deployments"), options)
            .await
    }

    /// Most recent deployment of a job; None if it never had one
    pub async fn latest_deployment(
        &self,
        job_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<Option<Deployment>>> {
        self.http
            .query(job_path(job_id).segment("deployment"), options)
            .await
    }

    pub async fn summary(
        &self,
        job_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<JobSummary>> {
        self.http
            .query(job_path(job_id).segment("summary"), options)
            .await
    }

    /// Stop a job; `purge` also removes it from the servers' state
    pub async fn deregister(
        &self,
        job_id: &str,
        purge: bool,
        options: Option<&WriteOptions>,
    ) -> Result<EvaluationResponse> {
        let mut request = ApiRequest::delete("/v1/job").segment(job_id);
        if purge {
            request = request.param("purge", true);
        }
        self.http.write_evaluation(request, options).await
    }

    pub async fn force_evaluate(
        &self,
        job_id: &str,
        options: Option<&WriteOptions>,
    ) -> Result<EvaluationResponse> {
        let request = ApiRequest::put("/v1/job").segment(job_id).segment("evaluate");
        self.http.write_evaluation(request, options).await
    }

    /// Launch a periodic job now, regardless of its schedule
    pub async fn periodic_force(
        &self,
        job_id: &str,
        options: Option<&WriteOptions>,
    ) -> Result<EvaluationResponse> {
        let request = ApiRequest::put("/v1/job")
            .segment(job_id)
            .segment("periodic")
            .segment("force");
        self.http.write_evaluation(request, options).await
    }

    /// Dry-run the scheduler against a job without registering it
    pub async fn plan(
        &self,
        job: &Job,
        diff: bool,
        policy_override: bool,
        options: Option<&WriteOptions>,
    ) -> Result<ServerResponse<JobPlanResponse>> {
        #[derive(Serialize)]
        #[serde(rename_all = "PascalCase")]
        struct Body<'a> {
            job: &'a Job,
            diff: bool,
            policy_override: bool,
        }

        let job_id = require_job_id(job)?;
        let request = ApiRequest::put("/v1/job")
            .segment(job_id)
            .segment("plan")
            .json(&Body {
                job,
                diff,
                policy_override,
            })?;
        self.http.write(request, options).await
    }

    /// Check a job for errors without registering it
    pub async fn validate(
        &self,
        job: &Job,
        options: Option<&WriteOptions>,
    ) -> Result<ServerResponse<JobValidateResponse>> {
        #[derive(Serialize)]
        #[serde(rename_all = "PascalCase")]
        struct Body<'a> {
            job: &'a Job,
        }

        let request = ApiRequest::put("/v1/validate/job").json(&Body { job })?;
        self.http.write(request, options).await
    }

    /// Revert a job to `version`; with `prior_version` set, only if the
    /// current version still matches it
    pub async fn revert(
        &self,
        job_id: &str,
        version: u64,
        prior_version: Option<u64>,
        options: Option<&WriteOptions>,
    ) -> Result<EvaluationResponse> {
        #[skip_serializing_none]
        #[derive(Serialize)]
        #[serde(rename_all = "PascalCase")]
        struct Body<'a> {
            #[serde(rename = "JobID")]
            job_id: &'a str,
            job_version: u64,
            enforce_prior_version: Option<u64>,
        }

        let request = ApiRequest::put("/v1/job")
            .segment(job_id)
            .segment("revert")
            .json(&Body {
                job_id,
                job_version: version,
                enforce_prior_version: prior_version,
            })?;
        self.http.write_evaluation(request, options).await
    }

    /// Mark a job version as stable or unstable
    pub async fn stable(
        &self,
        job_id: &str,
        version: u64,
        stable: bool,
        options: Option<&WriteOptions>,
    ) -> Result<EvaluationResponse> {
        #[derive(Serialize)]
        #[serde(rename_all = "PascalCase")]
        struct Body<'a> {
            #[serde(rename = "JobID")]
            job_id: &'a str,
            job_version: u64,
            stable: bool,
        }

        let request = ApiRequest::put("/v1/job")
            .segment(job_id)
            .segment("stable")
            .json(&Body {
                job_id,
                job_version: version,
                stable,
            })?;
        self.http.write_evaluation(request, options).await
    }

    /// Dispatch an instance of a parameterized job
    pub async fn dispatch(
        &self,
        job_id: &str,
        meta: Option<&HashMap<String, String>>,
        payload: Option<&[u8]>,
        options: Option<&WriteOptions>,
    ) -> Result<ServerResponse<JobDispatchResponse>> {
        #[skip_serializing_none]
        #[derive(Serialize)]
        #[serde(rename_all = "PascalCase")]
        struct Body<'a> {
            #[serde(rename = "JobID")]
            job_id: &'a str,
            meta: Option<&'a HashMap<String, String>>,
            payload: Option<String>,
        }

        let body = Body {
            job_id,
            meta,
            payload: payload.map(|p| base64::engine::general_purpose::STANDARD.encode(p)),
        };
        let request = ApiRequest::put("/v1/job")
            .segment(job_id)
            .segment("dispatch")
            .json(&body)?;
        self.http.write(request, options).await
    }

    /// Desired and actual counts of each task group
    pub async fn scale_status(
        &self,
        job_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<JobScaleStatusResponse>> {
        self.http
            .query(job_path(job_id).segment("scale"), options)
            .await
    }

    /// Change the count of a task group
    pub async fn scale_group(
        &self,
        job_id: &str,
        group: &str,
        count: i64,
        message: Option<&str>,
        meta: Option<&HashMap<String, serde_json::Value>>,
        options: Option<&WriteOptions>,
    ) -> Result<EvaluationResponse> {
        let request = ScalingRequest {
            count: Some(count),
            message: message.map(str::to_string),
            error: false,
            meta: meta.cloned(),
        };
        self.register_scaling_event(job_id, group, &request, options)
            .await
    }

    /// Record a scaling event against a task group, with or without a count
    pub async fn register_scaling_event(
        &self,
        job_id: &str,
        group: &str,
        scaling: &ScalingRequest,
        options: Option<&WriteOptions>,
    ) -> Result<EvaluationResponse> {
        if scaling.error && scaling.count.is_some() {
            return Err(NomadError::InvalidRequest(
                "a scaling event with a count cannot be an error".to_string(),
            ));
        }

        let body = ScalingBody {
            count: scaling.count,
            target: HashMap::from([("Group", group)]),
            message: scaling.message.as_deref(),
            error: scaling.error,
            meta: scaling.meta.as_ref(),
        };
        let request = ApiRequest::put("/v1/job")
            .segment(job_id)
            .segment("scale")
            .json(&body)?;
        self.http.write_evaluation(request, options).await
    }
}

fn job_path(job_id: &str) -> ApiRequest {
    ApiRequest::get("/v1/job").segment(job_id)
}

fn require_job_id(job: &Job) -> Result<&str> {
    match job.id.as_deref() {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(NomadError::InvalidRequest("job has no ID".to_string())),
    }
}
