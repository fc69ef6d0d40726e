#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use rfmseg_client::commands::common::CommandOptions;
use rfmseg_client::commands::{filters, rfm, segments};
use serde_json::Value;
use tempfile::{Builder, TempDir};

pub const CUSTOMER_HEADER: &str =
    "customer_code,customer_name,customer_type,customer_ranking,salesperson,postcode";
pub const SALES_HEADER: &str =
    "transaction_number,customer_code,date,amount,cost,profit,branch,delivery_suburb,postcode";

pub fn temp_data_dir(prefix: &str) -> std::io::Result<(TempDir, PathBuf)> {
    let dir = Builder::new().prefix(prefix).tempdir_in("/tmp")?;
    let data = dir.path().join("data");
    fs::create_dir_all(&data)?;
    Ok((dir, data))
}

pub fn write_tables(data_dir: &Path, customers: &[String], sales: &[String]) {
    let customer_csv = table(CUSTOMER_HEADER, customers);
    let sales_csv = table(SALES_HEADER, sales);
    let written = fs::write(data_dir.join("customer_data.csv"), customer_csv)
        .and_then(|_| fs::write(data_dir.join("sales_data.csv"), sales_csv));
    assert!(written.is_ok());
}

pub fn customer(code: &str, customer_type: &str, salesperson: &str, postcode: &str) -> String {
    format!("{code},Customer {code},{customer_type},Standard,{salesperson},{postcode}")
}

pub fn sale(number: usize, code: &str, date: &str, amount: &str) -> String {
    format!("T{number},{code},{date},{amount},,,Main,Carlton,3053")
}

/// Five customers whose recency, frequency, and spend all rise together,
/// from `L1` (oldest, fewest, smallest) to `L5`.
pub fn ladder_fixture(data_dir: &Path) {
    let customers = (1..=5)
        .map(|rank| customer(&format!("L{rank}"), "Retail", "Alice", "2000"))
        .collect::<Vec<String>>();

    let mut sales = Vec::new();
    for rank in 1..=5_usize {
        let date = format!("2024-{:02}-10", rank + 1);
        let amount = (rank * 10).to_string();
        for _ in 0..rank {
            sales.push(sale(sales.len() + 1, &format!("L{rank}"), &date, &amount));
        }
    }

    write_tables(data_dir, &customers, &sales);
}

pub fn payload(result: rfmseg_client::ClientResult<rfmseg_client::SuccessEnvelope>) -> Value {
    assert!(result.is_ok());
    if let Ok(success) = result {
        let value = serde_json::to_value(success);
        assert!(value.is_ok());
        if let Ok(json) = value {
            return json;
        }
    }
    Value::Null
}

pub fn rfm_payload(data_dir: &Path) -> Value {
    payload(rfm::run_with_options(options(data_dir)))
}

pub fn segments_payload(data_dir: &Path) -> Value {
    payload(segments::run_with_options(options(data_dir)))
}

pub fn filters_payload(data_dir: &Path) -> Value {
    payload(filters::run_with_options(options(data_dir)))
}

pub fn records(data_dir: &Path) -> Vec<Value> {
    rfm_payload(data_dir)["data"]["records"]
        .as_array()
        .cloned()
        .unwrap_or_default()
}

pub fn record_for<'a>(records: &'a [Value], code: &str) -> Option<&'a Value> {
    records
        .iter()
        .find(|record| record["customer_code"].as_str() == Some(code))
}

pub fn options(data_dir: &Path) -> CommandOptions<'_> {
    CommandOptions {
        data_dir_override: Some(data_dir),
    }
}

fn table(header: &str, rows: &[String]) -> String {
    let mut body = String::from(header);
    body.push('\n');
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    body
}
