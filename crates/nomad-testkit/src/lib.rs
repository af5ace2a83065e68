// nomad-testkit: live test support for the Nomad SDK

pub mod agent;
pub mod fixtures;

pub use agent::TestAgent;
pub use fixtures::{
    bash_job, collect_bytes, collect_frames, register_job_and_wait_for_evaluation,
    run_and_wait_for_task_state, test_job, wait_for_evaluation, wait_for_task_state,
};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a test subscriber honoring `RUST_LOG`; later calls are no-ops
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("nomad_client=debug,nomad_testkit=debug"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
