use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

pub(crate) const DATA_DIR_ENV: &str = "RFMSEG_DATA_DIR";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `rfmseg {cmd} --help` for usage."),
            None => "Run `rfmseg --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn source_not_found(table: &str, path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "source_not_found",
            &format!("The {table} table was not found at `{location}`."),
            vec![
                format!("Place the {table} CSV at `{location}`."),
                format!("Or point `{DATA_DIR_ENV}` / `--data-dir` at the directory holding it."),
            ],
        )
        .with_data(json!({
            "table": table,
            "path": location,
        }))
    }

    pub fn source_unreadable(table: &str, path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "source_unreadable",
            &format!("Could not read the {table} table at `{location}`: {detail}"),
            vec!["Verify the file exists and is readable by the current user.".to_string()],
        )
        .with_data(json!({
            "table": table,
            "path": location,
        }))
    }

    pub fn source_malformed(table: &str, detail: &str) -> Self {
        Self::new(
            "source_malformed",
            &format!("The {table} table is not valid CSV: {detail}"),
            vec![
                "Export the table again as UTF-8 CSV with one header row.".to_string(),
                "Check for unbalanced quotes inside cells.".to_string(),
            ],
        )
        .with_data(json!({
            "table": table,
        }))
    }

    pub fn source_schema_mismatch(
        table: &str,
        required_headers: Vec<String>,
        actual_headers: Vec<String>,
    ) -> Self {
        let missing_headers = required_headers
            .iter()
            .filter(|header| !actual_headers.contains(header))
            .cloned()
            .collect::<Vec<String>>();

        Self::new(
            "source_schema_mismatch",
            &format!(
                "The {table} table is missing required columns: {}.",
                missing_headers.join(", ")
            ),
            vec![
                "Include every required column in the header row.".to_string(),
                "Extra columns are allowed and ignored.".to_string(),
            ],
        )
        .with_data(json!({
            "table": table,
            "required_headers": required_headers,
            "missing_headers": missing_headers,
            "actual_headers": actual_headers,
        }))
    }

    pub fn no_transactions() -> Self {
        Self::new(
            "no_transactions",
            "No sales rows survived cleaning, so no reference date can be established.",
            vec![
                "Check that sales rows carry non-negative amounts.".to_string(),
                "Check that sales customer codes match the customer table.".to_string(),
            ],
        )
    }

    pub fn data_dir_unresolved(detail: &str) -> Self {
        Self::new(
            "data_dir_unresolved",
            &format!("Could not resolve a data directory: {detail}"),
            vec![format!(
                "Pass `--data-dir <path>` or set `{DATA_DIR_ENV}` to the directory holding the CSV tables."
            )],
        )
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::ClientError;

    #[test]
    fn schema_mismatch_lists_only_missing_headers() {
        let error = ClientError::source_schema_mismatch(
            "sales",
            vec!["customer_code".to_string(), "amount".to_string()],
            vec!["customer_code".to_string(), "branch".to_string()],
        );

        assert_eq!(error.code, "source_schema_mismatch");
        assert!(error.message.contains("amount"));
        assert!(!error.message.contains("customer_code,"));
        let missing = error
            .data
            .as_ref()
            .and_then(|data| data.get("missing_headers"))
            .and_then(|value| value.as_array())
            .map(Vec::len);
        assert_eq!(missing, Some(1));
    }

    #[test]
    fn source_not_found_points_at_the_env_override() {
        let error = ClientError::source_not_found("customer", Path::new("/data/customer_data.csv"));
        assert_eq!(error.code, "source_not_found");
        assert!(
            error
                .recovery_steps
                .iter()
                .any(|step| step.contains("RFMSEG_DATA_DIR"))
        );
    }
}
