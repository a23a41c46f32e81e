//! proctor: automated video proctoring session runner.

use clap::Parser;

mod cli;
mod render;
mod run;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    let filter = std::env::var("PROCTOR_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let socket_path = args.socket.unwrap_or_else(cli::default_socket_path);

    match args.command {
        cli::Command::Run(opts) => run::cmd_run(&socket_path, opts).await?,
        cli::Command::Health => run::cmd_health(&socket_path).await?,
    }
    Ok(())
}
