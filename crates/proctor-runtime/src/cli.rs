//! CLI definition using clap derive.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "proctor", about = "automated video proctoring session runner")]
pub struct Cli {
    /// Gateway socket path (default: $XDG_RUNTIME_DIR/proctor.sock)
    #[arg(long, short = 's', global = true, env = "PROCTOR_SOCKET")]
    pub socket: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a proctored session until Ctrl-C or the duration limit
    Run(RunOpts),
    /// Print the gateway's advisory status
    Health,
}

#[derive(clap::Args)]
pub struct RunOpts {
    /// Candidate name shown on the report
    #[arg(long)]
    pub candidate: String,

    /// Stop automatically after this many seconds
    #[arg(long)]
    pub duration_limit: Option<u64>,

    /// Camera device node
    #[arg(long, default_value = "/dev/video0")]
    pub camera_device: String,

    /// Per-tick probability that the simulated detector emits an event
    #[arg(long, default_value = "0.1")]
    pub event_chance: f64,

    /// Seed for the simulated detector, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Default socket path using $USER for per-user isolation.
pub fn default_socket_path() -> String {
    if let Ok(dir) = std::env::var("XDG_RUNTIME_DIR") {
        return format!("{dir}/proctor.sock");
    }
    let user = std::env::var("USER").unwrap_or_else(|_| "unknown".to_string());
    format!("/tmp/proctor-{user}.sock")
}
