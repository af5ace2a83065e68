//! Typed responses and the Nomad response headers

use std::time::Duration;

use reqwest::header::HeaderMap;

use crate::error::{NomadError, Result};

pub const HEADER_INDEX: &str = "X-Nomad-Index";
pub const HEADER_LAST_CONTACT: &str = "X-Nomad-LastContact";
pub const HEADER_KNOWN_LEADER: &str = "X-Nomad-KnownLeader";

/// Response of an endpoint that carries no server metadata
/// (client agent endpoints, agent and status endpoints)
#[derive(Clone, Debug)]
pub struct NomadResponse<T> {
    pub value: T,
    pub status: u16,
    pub raw_body: String,
}

/// Response of a server write: carries the Raft index of the change
#[derive(Clone, Debug)]
pub struct ServerResponse<T> {
    pub value: T,
    pub index: u64,
    pub raw_body: String,
}

/// Write that created an evaluation; the value is the evaluation ID
pub type EvaluationResponse = ServerResponse<String>;

/// Response of a server read, usable as the base of a blocking query
#[derive(Clone, Debug)]
pub struct ServerQueryResponse<T> {
    pub value: T,
    /// Index to pass back to block for a newer answer
    pub index: u64,
    /// Time since the answering server last heard from the leader
    pub last_contact: Duration,
    pub known_leader: bool,
    pub raw_body: String,
}

impl<T> ServerQueryResponse<T> {
    pub(crate) fn from_parts(value: T, headers: &HeaderMap, raw_body: String) -> Result<Self> {
        Ok(Self {
            index: parse_index(headers)?,
            last_contact: parse_last_contact(headers)?,
            known_leader: parse_known_leader(headers),
            value,
            raw_body,
        })
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ServerQueryResponse<U> {
        ServerQueryResponse {
            value: f(self.value),
            index: self.index,
            last_contact: self.last_contact,
            known_leader: self.known_leader,
            raw_body: self.raw_body,
        }
    }
}

impl<T> ServerResponse<T> {
    pub(crate) fn from_parts(value: T, headers: &HeaderMap, raw_body: String) -> Result<Self> {
        Ok(Self {
            index: parse_index(headers)?,
            value,
            raw_body,
        })
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>> {
    headers
        .get(name)
        .map(|v| {
            v.to_str()
                .map_err(|_| NomadError::parsing(format!("non-ASCII {} header", name), ""))
        })
        .transpose()
}

pub(crate) fn parse_index(headers: &HeaderMap) -> Result<u64> {
    let raw = header_str(headers, HEADER_INDEX)?
        .ok_or_else(|| NomadError::parsing(format!("missing {} header", HEADER_INDEX), ""))?;
    raw.trim().parse().map_err(|_| {
        NomadError::parsing(format!("invalid {} header: {:?}", HEADER_INDEX, raw), "")
    })
}

/// Milliseconds; absent means the server answered from leader state
pub(crate) fn parse_last_contact(headers: &HeaderMap) -> Result<Duration> {
    match header_str(headers, HEADER_LAST_CONTACT)? {
        None => Ok(Duration::ZERO),
        Some(raw) => raw.trim().parse::<u64>().map(Duration::from_millis).map_err(|_| {
            NomadError::parsing(
                format!("invalid {} header: {:?}", HEADER_LAST_CONTACT, raw),
                "",
            )
        }),
    }
}

pub(crate) fn parse_known_leader(headers: &HeaderMap) -> bool {
    matches!(header_str(headers, HEADER_KNOWN_LEADER), Ok(Some("true")))
}
