pub mod clean;
pub mod input;
pub mod parse;

pub use clean::{CleanedTables, clean_tables};
pub use input::{SourceTables, load_sources};
pub use parse::{RawCustomerRow, RawSaleRow};
