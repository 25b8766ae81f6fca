mod cli;
mod commands;
mod logger;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::{Cli, Command};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    logger::init(&args.log_level, args.log_format)?;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("interrupt received; canceling");
                cancel.cancel();
            }
        }
    });

    let ok = match args.command {
        Command::Mongodb(args) => commands::mongodb(args, &cancel).await?,
        Command::Prometheus(args) => commands::prometheus(args, &cancel).await?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
