use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DATA_DIR_ENV;
use crate::{ClientError, ClientResult};

pub const CUSTOMER_TABLE_FILE: &str = "customer_data.csv";
pub const SALES_TABLE_FILE: &str = "sales_data.csv";

/// Resolves the directory holding both source tables.
///
/// Order: explicit override, `RFMSEG_DATA_DIR`, `./data` when it exists, then
/// `~/.rfmseg/data`.
pub fn resolve_data_dir(dir_override: Option<&Path>) -> ClientResult<PathBuf> {
    let candidate = match dir_override {
        Some(path) => path.to_path_buf(),
        None => {
            if let Some(env_path) = std::env::var_os(DATA_DIR_ENV) {
                PathBuf::from(env_path)
            } else if Path::new("data").is_dir() {
                PathBuf::from("data")
            } else if let Some(home_path) = home::home_dir() {
                home_path.join(".rfmseg").join("data")
            } else {
                return Err(ClientError::data_dir_unresolved(
                    "no override, no `./data` directory, and no home directory.",
                ));
            }
        }
    };

    absolutize(&candidate)
}

pub fn customer_table_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CUSTOMER_TABLE_FILE)
}

pub fn sales_table_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SALES_TABLE_FILE)
}

pub(crate) fn read_table(table: &str, path: &Path) -> ClientResult<String> {
    fs::read_to_string(path).map_err(|error| map_io_error(table, path, &error))
}

pub(crate) fn map_io_error(table: &str, path: &Path, error: &std::io::Error) -> ClientError {
    if error.kind() == std::io::ErrorKind::NotFound {
        return ClientError::source_not_found(table, path);
    }

    ClientError::source_unreadable(table, path, &error.to_string())
}

fn absolutize(path: &Path) -> ClientResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|error| ClientError::data_dir_unresolved(&error.to_string()))
}
