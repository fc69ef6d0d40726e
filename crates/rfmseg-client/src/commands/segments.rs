use std::path::Path;

use crate::ClientResult;
use crate::commands::common::{CommandOptions, load_run};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::SegmentAnalysisData;
use crate::rfm::segment_stats::{segment_insights, segment_statistics};

pub fn run(data_dir: Option<&Path>) -> ClientResult<SuccessEnvelope> {
    run_with_options(CommandOptions {
        data_dir_override: data_dir,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: CommandOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let run = load_run(options)?;
    let segment_statistics = segment_statistics(&run.records);
    let key_insights = segment_insights(&run.records, &segment_statistics);

    let data = SegmentAnalysisData {
        run_id: run.report.run_id,
        reference_date: run.report.reference_date,
        segment_statistics,
        key_insights,
    };
    success("segments", data)
}
