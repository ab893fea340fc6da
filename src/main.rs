//! Entry point for the jarversion CLI.

use anyhow::Result;

use jarversion::logger::init_cli_logger;

#[tokio::main]
async fn main() -> Result<()> {
    init_cli_logger();

    let mut stdout = tokio::io::stdout();
    jarversion::run(std::env::args_os().skip(1), &mut stdout).await?;

    Ok(())
}
