use std::path::Path;

use crate::ClientResult;
use crate::commands::common::{CommandOptions, load_run};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::rfm::filters::filter_options;

pub fn run(data_dir: Option<&Path>) -> ClientResult<SuccessEnvelope> {
    run_with_options(CommandOptions {
        data_dir_override: data_dir,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: CommandOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let run = load_run(options)?;
    success("filters", filter_options(&run.records))
}
