use anyhow::Result;
use spark::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
