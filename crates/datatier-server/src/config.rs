//! Server command-line and environment configuration.

use clap::Parser;

/// Remote classification is configured separately through
/// `RemoteConfig::from_env`.
#[derive(Debug, Parser)]
#[command(name = "datatier-server", about = "Column sensitivity classification API")]
#[command(version)]
pub struct ServerArgs {
    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0", env = "BIND_HOST")]
    pub bind_host: String,

    /// HTTP port for the classification API
    #[arg(long, default_value = "8000", env = "HTTP_PORT")]
    pub http_port: u16,
}

impl ServerArgs {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.http_port)
    }
}
