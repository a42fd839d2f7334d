//! WSE CLI - Command line tool for the Washington snow / ENSO toolkit.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "wse-cli",
    version,
    about = "Washington snowfall / ENSO phase toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: wse_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    wse_cmd::run(cli.command).await
}
