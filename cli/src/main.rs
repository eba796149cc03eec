//! Deployer action - SSH bootstrap and Deployer runner for CI jobs

use clap::Parser;
use tracing_subscriber::EnvFilter;

use deployer_action::cli::Cli;
use deployer_action::output::OutputContext;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let (no_color, quiet) = (cli.no_color, cli.quiet);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .init();

    if let Err(e) = cli.run().await {
        OutputContext::new(no_color, quiet).fail(&format!("{e:#}"));
        std::process::exit(1);
    }
}
