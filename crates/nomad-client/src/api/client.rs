//! Node-local client agent API: `/v1/client/...`
//!
//! These endpoints are answered by the client agent running the allocation,
//! so the [`ClientApi`] must target that node's HTTP address.

use std::fmt;

use bytes::Bytes;
use futures::{StreamExt, TryStreamExt, stream::BoxStream};
use nomad_api_model::{AllocFileInfo, AllocResourceUsage, HostStats};

use crate::error::{NomadError, Result};
use crate::http::{ApiRequest, NomadHttpClient};
use crate::options::QueryOptions;
use crate::response::NomadResponse;
use crate::stream::FramedStream;

/// Where a stream offset is counted from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StreamOrigin {
    #[default]
    Start,
    End,
}

impl fmt::Display for StreamOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamOrigin::Start => f.write_str("start"),
            StreamOrigin::End => f.write_str("end"),
        }
    }
}

/// Which task log to read
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogType {
    #[default]
    Stdout,
    Stderr,
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogType::Stdout => f.write_str("stdout"),
            LogType::Stderr => f.write_str("stderr"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClientApi {
    http: NomadHttpClient,
}

impl ClientApi {
    pub(crate) fn new(http: NomadHttpClient) -> Self {
        Self { http }
    }

    /// Base URL of the client agent this API talks to
    pub fn address(&self) -> &url::Url {
        self.http.base_url()
    }

    /// Resource usage of the host the agent runs on
    pub async fn stats(&self, options: Option<&QueryOptions>) -> Result<NomadResponse<HostStats>> {
        self.http
            .execute(ApiRequest::get("/v1/client/stats"), options)
            .await
    }

    /// Resource usage of one allocation and its tasks
    pub async fn allocation_stats(
        &self,
        alloc_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<NomadResponse<AllocResourceUsage>> {
        let request = ApiRequest::get("/v1/client/allocation")
            .segment(alloc_id)
            .segment("stats");
        self.http.execute(request, options).await
    }

    /// Garbage collect one terminal allocation on this node
    pub async fn garbage_collect(
        &self,
        alloc_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<NomadResponse<()>> {
        let request = ApiRequest::get("/v1/client/allocation")
            .segment(alloc_id)
            .segment("gc");
        self.http.execute_unit(request, options).await
    }

    /// Garbage collect every terminal allocation on this node
    pub async fn garbage_collect_all(
        &self,
        options: Option<&QueryOptions>,
    ) -> Result<NomadResponse<()>> {
        self.http
            .execute_unit(ApiRequest::get("/v1/client/gc"), options)
            .await
    }

    /// List a directory of an allocation
    pub async fn ls(
        &self,
        alloc_id: &str,
        path: &str,
        options: Option<&QueryOptions>,
    ) -> Result<NomadResponse<Vec<AllocFileInfo>>> {
        self.http
            .execute(fs_path("ls", alloc_id).param("path", path), options)
            .await
    }

    pub async fn stat(
        &self,
        alloc_id: &str,
        path: &str,
        options: Option<&QueryOptions>,
    ) -> Result<NomadResponse<AllocFileInfo>> {
        self.http
            .execute(fs_path("stat", alloc_id).param("path", path), options)
            .await
    }

    /// Whole contents of a file in an allocation
    pub async fn cat(
        &self,
        alloc_id: &str,
        path: &str,
        options: Option<&QueryOptions>,
    ) -> Result<NomadResponse<String>> {
        self.http
            .execute_text(fs_path("cat", alloc_id).param("path", path), options)
            .await
    }

    /// `limit` bytes of a file starting at `offset`
    pub async fn read_at(
        &self,
        alloc_id: &str,
        path: &str,
        offset: u64,
        limit: u64,
        options: Option<&QueryOptions>,
    ) -> Result<NomadResponse<String>> {
        let request = fs_path("readat", alloc_id)
            .param("path", path)
            .param("offset", offset)
            .param("limit", limit);
        self.http.execute_text(request, options).await
    }

    /// Follow a file as frames, starting `offset` bytes from `origin`
    pub async fn stream(
        &self,
        alloc_id: &str,
        path: &str,
        offset: Option<u64>,
        origin: StreamOrigin,
        options: Option<&QueryOptions>,
    ) -> Result<FramedStream> {
        let request = fs_path("stream", alloc_id)
            .param("path", path)
            .param_opt("offset", offset)
            .param("origin", origin);
        let response = self.http.stream(request, options).await?;
        Ok(FramedStream::from_response(response))
    }

    /// Raw bytes of a task log
    pub async fn logs(
        &self,
        alloc_id: &str,
        task: &str,
        follow: bool,
        log_type: LogType,
        options: Option<&QueryOptions>,
    ) -> Result<BoxStream<'static, Result<Bytes>>> {
        let request = logs_request(alloc_id, task, follow, log_type).param("plain", true);
        let response = self.http.stream(request, options).await?;
        Ok(response.bytes_stream().map_err(NomadError::from).boxed())
    }

    /// A task log as frames, exposing offsets and file events
    pub async fn logs_as_frames(
        &self,
        alloc_id: &str,
        task: &str,
        follow: bool,
        log_type: LogType,
        options: Option<&QueryOptions>,
    ) -> Result<FramedStream> {
        let request = logs_request(alloc_id, task, follow, log_type);
        let response = self.http.stream(request, options).await?;
        Ok(FramedStream::from_response(response))
    }
}

fn fs_path(operation: &str, alloc_id: &str) -> ApiRequest {
    ApiRequest::get("/v1/client/fs")
        .segment(operation)
        .segment(alloc_id)
}

fn logs_request(alloc_id: &str, task: &str, follow: bool, log_type: LogType) -> ApiRequest {
    fs_path("logs", alloc_id)
        .param("task", task)
        .param("follow", follow)
        .param("type", log_type)
}
