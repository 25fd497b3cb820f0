use clap::Parser;
use dotenvy::dotenv;
use std::process::ExitCode;
use stockroom::cli::{self, Cli};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env before the filter so RUST_LOG and DATABASE_URL can come from it
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    debug!(command = ?cli.command, "Parsed command line");

    match cli::run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            if !e.is_user_error() {
                error!("Command failed: {e}");
            }
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}
