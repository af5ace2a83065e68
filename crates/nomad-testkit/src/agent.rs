//! A throwaway `nomad agent` running as both server and client
//!
//! The binary is taken from `NOMAD_BINARY`, falling back to `nomad` on the
//! `PATH`. Every agent gets its own data dir and free ports, so tests can run
//! in parallel. The process is killed when the [`TestAgent`] is dropped.

use std::{net::TcpListener, path::Path, process::Stdio, time::Duration};

use anyhow::{Context, bail};
use nomad_client::{NomadApiClient, NomadApiConfiguration};
use tempfile::TempDir;
use tokio::{process::Child, process::Command, time::Instant};
use tracing::{debug, info};

const STARTUP_TIMEOUT: Duration = Duration::from_secs(60);
const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub struct TestAgent {
    process: Child,
    http_address: String,
    client: NomadApiClient,
    _data_dir: TempDir,
}

impl TestAgent {
    /// Start an agent that is both a server and a client with `raw_exec`
    /// enabled, and wait until it has a leader and a ready node
    pub async fn client_server() -> anyhow::Result<Self> {
        let data_dir = tempfile::tempdir().context("creating agent data dir")?;
        let [http, rpc, serf] = free_ports()?;

        let config_path = data_dir.path().join("agent.json");
        std::fs::write(
            &config_path,
            serde_json::to_vec_pretty(&agent_config(data_dir.path(), http, rpc, serf))?,
        )
        .context("writing agent config")?;

        let binary = std::env::var("NOMAD_BINARY").unwrap_or_else(|_| "nomad".to_string());
        info!("Starting {} with HTTP on port {}", binary, http);
        let process = Command::new(&binary)
            .arg("agent")
            .arg(format!("-config={}", config_path.display()))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("spawning {}", binary))?;

        let http_address = format!("http://127.0.0.1:{}", http);
        let client = NomadApiClient::new(NomadApiConfiguration::new(&http_address))?;

        let agent = Self {
            process,
            http_address,
            client,
            _data_dir: data_dir,
        };
        agent.wait_until_ready().await?;
        Ok(agent)
    }

    pub fn client(&self) -> &NomadApiClient {
        &self.client
    }

    pub fn http_address(&self) -> &str {
        &self.http_address
    }

    /// Stop the agent and wait for the process to exit
    pub async fn shutdown(mut self) -> anyhow::Result<()> {
        self.process.kill().await?;
        Ok(())
    }

    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        let deadline = Instant::now() + STARTUP_TIMEOUT;
        loop {
            if Instant::now() > deadline {
                bail!("agent at {} did not become ready", self.http_address);
            }
            match self.is_ready().await {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(e) => debug!("Agent not up yet: {}", e),
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn is_ready(&self) -> nomad_client::Result<bool> {
        let leader = self.client.status().leader(None).await?.value;
        if leader.is_empty() {
            return Ok(false);
        }
        let nodes = self.client.nodes().list(None).await?.value;
        Ok(nodes
            .iter()
            .any(|n| n.status == nomad_api_model::node::NODE_STATUS_READY))
    }
}

fn agent_config(data_dir: &Path, http: u16, rpc: u16, serf: u16) -> serde_json::Value {
    serde_json::json!({
        "bind_addr": "127.0.0.1",
        "data_dir": data_dir.join("data"),
        "log_level": "WARN",
        "disable_update_check": true,
        "ports": {"http": http, "rpc": rpc, "serf": serf},
        "server": {"enabled": true, "bootstrap_expect": 1},
        "client": {"enabled": true},
        "plugin": {"raw_exec": {"config": {"enabled": true}}}
    })
}

fn free_ports() -> anyhow::Result<[u16; 3]> {
    // bound together so the three ports differ
    let listeners = [
        TcpListener::bind("127.0.0.1:0")?,
        TcpListener::bind("127.0.0.1:0")?,
        TcpListener::bind("127.0.0.1:0")?,
    ];
    Ok([
        listeners[0].local_addr()?.port(),
        listeners[1].local_addr()?.port(),
        listeners[2].local_addr()?.port(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_ports_are_distinct() {
        let [a, b, c] = free_ports().unwrap();
        assert!(a != b && b != c && a != c);
    }

    #[test]
    fn test_agent_config() {
        let config = agent_config(Path::new("/tmp/agent"), 1, 2, 3);
        assert_eq!(config["ports"]["http"], 1);
        assert_eq!(config["data_dir"], "/tmp/agent/data");
        assert_eq!(config["server"]["bootstrap_expect"], 1);
    }
}
