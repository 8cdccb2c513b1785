//! Test server management.
//!
//! [`TestServer`] runs the gateway in-process over an in-memory store.
//! [`SpawnedServer`] runs the real `emcomd` binary over a file store in a
//! temporary directory, for tests that need a restart.

use emcomd::config::{LimitsConfig, SecurityConfig};
use emcomd::handlers::Registry;
use emcomd::network::Gateway;
use emcomd::state::{Matrix, MatrixConfig};
use emcomd::store::{LogKind, MemoryStore};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::{Child, Command};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::sleep;

/// An in-process test server.
#[allow(dead_code)]
pub struct TestServer {
    addr: SocketAddr,
    pub matrix: Arc<Matrix>,
    shutdown: Option<oneshot::Sender<()>>,
}

#[allow(dead_code)]
impl TestServer {
    /// Start a server whose users log holds `users`.
    pub async fn start(users: &[&str]) -> anyhow::Result<Self> {
        Self::start_with(users, LimitsConfig::default()).await
    }

    /// Start a server with custom per-connection limits.
    pub async fn start_with(users: &[&str], limits: LimitsConfig) -> anyhow::Result<Self> {
        let store = MemoryStore::new().with_lines(LogKind::Users, users.iter().copied());
        let config = MatrixConfig {
            server_name: "test.emcomd".to_string(),
            limits,
            security: SecurityConfig::default(),
        };
        let matrix = Arc::new(Matrix::load(config, Arc::new(store)).await?);
        let registry = Arc::new(Registry::new());

        let gateway =
            Gateway::bind("127.0.0.1:0".parse()?, 32, Arc::clone(&matrix), registry).await?;
        let addr = gateway.local_addr()?;

        let (shutdown, stop) = oneshot::channel::<()>();
        tokio::spawn(gateway.run(async move {
            let _ = stop.await;
        }));

        Ok(Self {
            addr,
            matrix,
            shutdown: Some(shutdown),
        })
    }

    /// Get the server address.
    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    /// Wait until `client_id` no longer has a live session.
    pub async fn wait_disconnected(&self, client_id: &str) -> anyhow::Result<()> {
        for _ in 0..50 {
            if !self.matrix.session_manager.is_connected(client_id) {
                return Ok(());
            }
            sleep(Duration::from_millis(20)).await;
        }
        anyhow::bail!("{client_id} still connected")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// The `emcomd` binary running as a child process.
#[allow(dead_code)]
pub struct SpawnedServer {
    child: Child,
    port: u16,
    data_dir: PathBuf,
}

#[allow(dead_code)]
impl SpawnedServer {
    /// Spawn the binary on `port` with its logs under `dir`. The users log is
    /// seeded with `users` only if it does not exist yet.
    pub async fn spawn(port: u16, dir: &Path, users: &[&str]) -> anyhow::Result<Self> {
        let data_dir = dir.join("data");
        std::fs::create_dir_all(&data_dir)?;
        let users_file = data_dir.join("users.txt");
        if !users_file.exists() {
            let mut seed = users.join("\n");
            seed.push('\n');
            std::fs::write(&users_file, seed)?;
        }

        let config_path = dir.join("emcomd.toml");
        let config_content = format!(
            r#"
[server]
name = "test.emcomd"

[listen]
address = "127.0.0.1:{}"
max_sessions = 8

[storage]
backend = "file"
path = "{}"

[report]
interval_secs = 1
"#,
            port,
            data_dir.display()
        );
        std::fs::write(&config_path, config_content)?;

        let child = Command::new(env!("CARGO_BIN_EXE_emcomd"))
            .arg(&config_path)
            .spawn()?;

        let server = Self {
            child,
            port,
            data_dir,
        };
        server.wait_until_ready().await?;
        Ok(server)
    }

    /// Wait until the server is accepting connections.
    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..50 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("Server failed to start within 5 seconds")
    }

    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// Contents of one log file.
    pub fn read_log(&self, kind: LogKind) -> String {
        std::fs::read_to_string(self.data_dir.join(kind.file_name())).unwrap_or_default()
    }

    /// Kill the process and wait for it to exit.
    pub fn stop(mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl Drop for SpawnedServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
