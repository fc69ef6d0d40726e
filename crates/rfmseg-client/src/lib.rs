pub mod commands;
pub mod contracts;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod rfm;
pub mod state;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult};
pub use pipeline::{RfmRun, get_rfm_data, run_from_dir};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
