use std::path::Path;

use crate::ClientResult;
use crate::pipeline::{RfmRun, run_from_dir};

const CUSTOMER_FIELDS: [(&str, bool); 6] = [
    ("customer_code", true),
    ("postcode", true),
    ("customer_name", false),
    ("customer_type", false),
    ("customer_ranking", false),
    ("salesperson", false),
];

const SALES_FIELDS: [(&str, bool); 9] = [
    ("transaction_number", true),
    ("customer_code", true),
    ("date", true),
    ("amount", true),
    ("cost", false),
    ("profit", false),
    ("branch", false),
    ("delivery_suburb", false),
    ("postcode", false),
];

#[derive(Debug, Default, Clone, Copy)]
pub struct CommandOptions<'a> {
    pub data_dir_override: Option<&'a Path>,
}

pub(crate) fn required_customer_field_names() -> Vec<&'static str> {
    required_names(&CUSTOMER_FIELDS)
}

pub(crate) fn customer_field_names() -> Vec<&'static str> {
    CUSTOMER_FIELDS.iter().map(|(name, _)| *name).collect()
}

pub(crate) fn required_sales_field_names() -> Vec<&'static str> {
    required_names(&SALES_FIELDS)
}

pub(crate) fn sales_field_names() -> Vec<&'static str> {
    SALES_FIELDS.iter().map(|(name, _)| *name).collect()
}

pub(crate) fn load_run(options: CommandOptions<'_>) -> ClientResult<RfmRun> {
    run_from_dir(options.data_dir_override)
}

fn required_names(fields: &[(&'static str, bool)]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|(_, required)| *required)
        .map(|(name, _)| *name)
        .collect()
}
