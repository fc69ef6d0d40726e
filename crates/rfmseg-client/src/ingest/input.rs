use std::path::{Path, PathBuf};

use tracing::info;

use crate::ClientResult;
use crate::ingest::parse::{
    CUSTOMER_TABLE, RawCustomerRow, RawSaleRow, SALES_TABLE, parse_customer_table,
    parse_sales_table,
};
use crate::state::{customer_table_path, read_table, resolve_data_dir, sales_table_path};

/// Both source tables, read wholesale and split into raw rows.
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub data_dir: Option<PathBuf>,
    pub customers: Vec<RawCustomerRow>,
    pub sales: Vec<RawSaleRow>,
}

impl SourceTables {
    pub fn from_csv(customer_csv: &str, sales_csv: &str) -> ClientResult<Self> {
        Ok(Self {
            data_dir: None,
            customers: parse_customer_table(customer_csv)?,
            sales: parse_sales_table(sales_csv)?,
        })
    }
}

pub fn load_sources(dir_override: Option<&Path>) -> ClientResult<SourceTables> {
    let data_dir = resolve_data_dir(dir_override)?;
    let customer_path = customer_table_path(&data_dir);
    let sales_path = sales_table_path(&data_dir);

    let customer_csv = read_table(CUSTOMER_TABLE, &customer_path)?;
    let sales_csv = read_table(SALES_TABLE, &sales_path)?;
    let mut tables = SourceTables::from_csv(&customer_csv, &sales_csv)?;

    info!(
        path = %customer_path.display(),
        rows = tables.customers.len(),
        "loaded customer table"
    );
    info!(
        path = %sales_path.display(),
        rows = tables.sales.len(),
        "loaded sales table"
    );

    tables.data_dir = Some(data_dir);
    Ok(tables)
}
