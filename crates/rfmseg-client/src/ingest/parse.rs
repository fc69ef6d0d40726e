use std::collections::HashMap;

use crate::commands::common::{
    customer_field_names, required_customer_field_names, required_sales_field_names,
    sales_field_names,
};
use crate::{ClientError, ClientResult};

pub(crate) const CUSTOMER_TABLE: &str = "customer";
pub(crate) const SALES_TABLE: &str = "sales";

/// One customer row as read, before any coercion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCustomerRow {
    pub row: i64,
    pub customer_code: Option<String>,
    pub customer_name: Option<String>,
    pub customer_type: Option<String>,
    pub customer_ranking: Option<String>,
    pub salesperson: Option<String>,
    pub postcode: Option<String>,
}

/// One sales row as read, before any coercion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSaleRow {
    pub row: i64,
    pub transaction_number: Option<String>,
    pub customer_code: Option<String>,
    pub date: Option<String>,
    pub amount: Option<String>,
    pub cost: Option<String>,
    pub profit: Option<String>,
    pub branch: Option<String>,
    pub delivery_suburb: Option<String>,
    pub postcode: Option<String>,
}

pub(crate) fn parse_customer_table(content: &str) -> ClientResult<Vec<RawCustomerRow>> {
    let table = read_csv_table(
        CUSTOMER_TABLE,
        content,
        &required_customer_field_names(),
        &customer_field_names(),
    )?;

    Ok(table
        .rows
        .iter()
        .map(|(row, record)| RawCustomerRow {
            row: *row,
            customer_code: table.value_for(record, "customer_code"),
            customer_name: table.value_for(record, "customer_name"),
            customer_type: table.value_for(record, "customer_type"),
            customer_ranking: table.value_for(record, "customer_ranking"),
            salesperson: table.value_for(record, "salesperson"),
            postcode: table.value_for(record, "postcode"),
        })
        .collect())
}

pub(crate) fn parse_sales_table(content: &str) -> ClientResult<Vec<RawSaleRow>> {
    let table = read_csv_table(
        SALES_TABLE,
        content,
        &required_sales_field_names(),
        &sales_field_names(),
    )?;

    Ok(table
        .rows
        .iter()
        .map(|(row, record)| RawSaleRow {
            row: *row,
            transaction_number: table.value_for(record, "transaction_number"),
            customer_code: table.value_for(record, "customer_code"),
            date: table.value_for(record, "date"),
            amount: table.value_for(record, "amount"),
            cost: table.value_for(record, "cost"),
            profit: table.value_for(record, "profit"),
            branch: table.value_for(record, "branch"),
            delivery_suburb: table.value_for(record, "delivery_suburb"),
            postcode: table.value_for(record, "postcode"),
        })
        .collect())
}

struct CsvTable {
    index_by_name: HashMap<String, usize>,
    rows: Vec<(i64, csv::StringRecord)>,
}

impl CsvTable {
    /// Empty cells read as `None`; columns absent from the header read as `None`.
    fn value_for(&self, record: &csv::StringRecord, field_name: &str) -> Option<String> {
        let index = self.index_by_name.get(field_name)?;
        let value = record.get(*index)?.trim();
        if value.is_empty() {
            return None;
        }
        Some(value.to_string())
    }
}

fn read_csv_table(
    table: &str,
    content: &str,
    required_fields: &[&str],
    known_fields: &[&str],
) -> ClientResult<CsvTable> {
    let body = content.strip_prefix('\u{feff}').unwrap_or(content);
    // Short rows leave their trailing cells as `None`; extra cells are ignored.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|error| ClientError::source_malformed(table, &error.to_string()))?
        .iter()
        .map(|value| value.trim().to_string())
        .collect::<Vec<String>>();

    if !headers_are_valid(&headers, required_fields) {
        return Err(ClientError::source_schema_mismatch(
            table,
            required_fields
                .iter()
                .map(|value| value.to_string())
                .collect(),
            headers,
        ));
    }

    // First occurrence wins when a header repeats; unknown columns are skipped.
    let mut index_by_name = HashMap::new();
    for (index, name) in headers.iter().enumerate() {
        if known_fields.contains(&name.as_str()) {
            index_by_name.entry(name.clone()).or_insert(index);
        }
    }

    let mut rows = Vec::new();
    for (row_index, result_row) in reader.records().enumerate() {
        let record = result_row
            .map_err(|error| ClientError::source_malformed(table, &error.to_string()))?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        rows.push(((row_index as i64) + 1, record));
    }

    Ok(CsvTable {
        index_by_name,
        rows,
    })
}

fn headers_are_valid(actual_headers: &[String], required_fields: &[&str]) -> bool {
    required_fields
        .iter()
        .all(|required| actual_headers.iter().any(|value| value == required))
}

#[cfg(test)]
mod tests {
    use super::{parse_customer_table, parse_sales_table};

    #[test]
    fn customer_rows_map_by_header_name_in_any_order() {
        let content = "postcode,customer_name,customer_code,region\n2000,Acme,C1,north\n";
        let parsed = parse_customer_table(content);
        assert!(parsed.is_ok());
        if let Ok(rows) = parsed {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].row, 1);
            assert_eq!(rows[0].customer_code.as_deref(), Some("C1"));
            assert_eq!(rows[0].customer_name.as_deref(), Some("Acme"));
            assert_eq!(rows[0].postcode.as_deref(), Some("2000"));
            assert_eq!(rows[0].salesperson, None);
        }
    }

    #[test]
    fn empty_cells_are_none_and_blank_lines_are_skipped() {
        let content = "transaction_number,customer_code,date,amount,branch\n\
                       T1,C1,2024-01-01,10.5,\n\
                       ,,,,\n\
                       T2,C2,,abc,North\n";
        let parsed = parse_sales_table(content);
        assert!(parsed.is_ok());
        if let Ok(rows) = parsed {
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].branch, None);
            assert_eq!(rows[0].amount.as_deref(), Some("10.5"));
            assert_eq!(rows[1].row, 3);
            assert_eq!(rows[1].date, None);
            assert_eq!(rows[1].amount.as_deref(), Some("abc"));
        }
    }

    #[test]
    fn missing_required_header_is_a_schema_mismatch() {
        let parsed = parse_sales_table("transaction_number,customer_code,date\nT1,C1,2024-01-01\n");
        assert!(parsed.is_err());
        if let Err(error) = parsed {
            assert_eq!(error.code, "source_schema_mismatch");
            assert!(error.message.contains("amount"));
        }
    }

    #[test]
    fn empty_source_is_a_schema_mismatch() {
        let parsed = parse_customer_table("");
        assert!(parsed.is_err());
        if let Err(error) = parsed {
            assert_eq!(error.code, "source_schema_mismatch");
        }
    }

    #[test]
    fn short_and_long_rows_keep_parsing() {
        let content = "customer_code,customer_name,postcode,salesperson\n\
                       C1,Acme,2000,Alice\n\
                       C2,Beta\n\
                       C3,Gamma,3000,Bob,extra\n";
        let parsed = parse_customer_table(content);
        assert!(parsed.is_ok());
        if let Ok(rows) = parsed {
            assert_eq!(rows.len(), 3);
            assert_eq!(rows[1].customer_code.as_deref(), Some("C2"));
            assert_eq!(rows[1].customer_name.as_deref(), Some("Beta"));
            assert_eq!(rows[1].postcode, None);
            assert_eq!(rows[1].salesperson, None);
            assert_eq!(rows[2].salesperson.as_deref(), Some("Bob"));
        }
    }

    #[test]
    fn sales_rows_missing_optional_trailing_cells_parse() {
        let content = "transaction_number,customer_code,date,amount,branch,delivery_suburb\n\
                       T1,C1,2024-01-01,10,North,Carlton\n\
                       T2,C1,2024-01-02,20\n";
        let parsed = parse_sales_table(content);
        assert!(parsed.is_ok());
        if let Ok(rows) = parsed {
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[1].amount.as_deref(), Some("20"));
            assert_eq!(rows[1].branch, None);
            assert_eq!(rows[1].delivery_suburb, None);
        }
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let parsed = parse_customer_table("\u{feff}customer_code,postcode\nC1,0\n");
        assert!(parsed.is_ok());
        if let Ok(rows) = parsed {
            assert_eq!(rows[0].customer_code.as_deref(), Some("C1"));
        }
    }
}
