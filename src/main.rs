use anyhow::Result;
use clap::Parser;

use campaign_desk::cli::{self, Cli};
use campaign_desk::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let output = cli::run(Cli::parse()).await?;
    print!("{}", output);
    Ok(())
}
