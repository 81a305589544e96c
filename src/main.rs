use anyhow::Result;

mod api;
mod cli;
mod config;
mod engine;
mod lander;
mod monitoring;

use cli::args::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_or_exit();
    cli::run(cli).await
}
