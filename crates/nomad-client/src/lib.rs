// nomad-client: async HTTP client SDK for the Nomad API

pub mod api;
pub mod blocking;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod options;
pub mod response;
pub mod stream;

pub use blocking::{WaitStrategy, poll_until};
pub use client::NomadApiClient;
pub use config::{NomadApiConfiguration, TlsConfig};
pub use error::{NomadError, Result};
pub use http::NomadHttpClient;
pub use options::{QueryOptions, WriteOptions};
pub use response::{EvaluationResponse, NomadResponse, ServerQueryResponse, ServerResponse};
pub use stream::{FrameDecoder, FramedStream};

pub use nomad_api_model as model;
