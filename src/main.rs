use clap::Parser;
use scratch_web::{AppRouter, Limits, ServeConfig, Server};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Minimal HTTP/1.1 server: root probe, /echo, /user-agent and /files.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:4221")]
    addr: String,

    /// Directory served by the /files routes; omit to disable them
    #[arg(long)]
    directory: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "scratch_web=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let listener = TcpListener::bind(&args.addr).await?;
    info!(addr = %args.addr, files_dir = ?args.directory, "starting scratch_web");

    let router = AppRouter::new(ServeConfig {
        files_dir: args.directory,
    });

    Server::builder()
        .listener(listener)
        .handler(router)
        .limits(Limits::default())
        .build()
        .launch()
        .await;

    Ok(())
}
