mod main_lib;

use clap::Parser;
use main_lib::{init_tracing, run, Cli};
use pcbquote_core::PricingConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();
    let config = PricingConfig::from_env()?;
    let output = run(cli.command, &config).await?;
    println!("{}", output);
    Ok(())
}
