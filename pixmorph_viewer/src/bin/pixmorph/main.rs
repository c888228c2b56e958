mod cli;
mod run;

use anyhow::Result;
use cli::Command;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Transform(args)) => run::transform(args),
        Some(Command::Print(args)) => run::print(args),
        None => run::morph(cli.morph).await,
    }
}
