use rfmseg_client::commands;
use rfmseg_client::{ClientResult, SuccessEnvelope};

use crate::cli::{Cli, Commands};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    let data_dir = cli.command.source().data_dir.as_deref();
    match &cli.command {
        Commands::Rfm { .. } => commands::rfm::run(data_dir),
        Commands::Segments { .. } => commands::segments::run(data_dir),
        Commands::Filters { .. } => commands::filters::run(data_dir),
    }
}
