use std::collections::BTreeSet;

use crate::contracts::types::{FilterOptionsData, RfmRecord};

pub const ALL_OPTION: &str = "All";

pub fn filter_options(records: &[RfmRecord]) -> FilterOptionsData {
    FilterOptionsData {
        customer_type: with_all(
            records
                .iter()
                .filter_map(|record| record.customer_type.as_deref()),
        ),
        salesperson: with_all(
            records
                .iter()
                .filter_map(|record| record.salesperson.as_deref()),
        ),
        segment: with_all(records.iter().map(|record| record.segment.as_str())),
    }
}

fn with_all<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let distinct = values
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<&str>>();

    std::iter::once(ALL_OPTION)
        .chain(distinct)
        .map(str::to_string)
        .collect()
}
