use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Extended help shown after `rfmseg rfm --help`.
pub const DATA_AFTER_HELP: &str = "\
Where the data comes from:
  rfmseg reads two CSV files from one data directory:
    customer_data.csv  one row per customer
    sales_data.csv     one row per sale

  The directory is resolved in this order:
    1. --data-dir <DIR>
    2. the RFMSEG_DATA_DIR environment variable
    3. ./data when it exists
    4. ~/.rfmseg/data

Required columns:
  customer_data.csv: customer_code, postcode
    optional: customer_name, customer_type, customer_ranking, salesperson
  sales_data.csv: transaction_number, customer_code, date, amount
    optional: cost, profit, branch, delivery_suburb, postcode
  Extra columns are ignored.

Cleaning rules:
  Sales with a negative or missing amount are excluded.
  Sales whose customer_code is not in customer_data.csv are excluded.
  Postcode 0 is reported as INVALID; the customer is kept.
  Unparsable dates are kept for frequency and spend, with no recency.

Logs go to stderr. Set RUST_LOG (for example RUST_LOG=warn) to change verbosity.
";

#[derive(Debug, Parser)]
#[command(
    name = "rfmseg",
    version,
    about = "RFM customer segmentation over sales and customer CSV tables",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Directory holding customer_data.csv and sales_data.csv
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
    /// Emit structured JSON output for machine parsing
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Score every customer and assign a segment
    #[command(after_long_help = DATA_AFTER_HELP)]
    Rfm {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Summarize customers and revenue per segment
    Segments {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// List the distinct customer type, salesperson, and segment values
    Filters {
        #[command(flatten)]
        source: SourceArgs,
    },
}

impl Commands {
    pub fn source(&self) -> &SourceArgs {
        match self {
            Self::Rfm { source } | Self::Segments { source } | Self::Filters { source } => source,
        }
    }
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
