//! Account sources
//!
//! Provides the two `AccountSource` implementations used by the CLI and the
//! tests: a CSV file of movements and an in-memory collection.
//!
//! # CSV layout
//!
//! ```text
//! account,holder,amount
//! 1,Ana Souza,100.00
//! 2,Bruno Lima,250.00
//! 1,Ana Souza,-30.25
//! ```
//!
//! Rows sharing an account ID are grouped into one `AccountRecord`, keeping
//! the movements in file order. Accounts are ordered by first appearance.
//!
//! # Error Handling
//!
//! - A missing or unreadable file is a fatal error
//! - Malformed rows are logged and skipped

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use tracing::warn;

use crate::core::AccountSource;
use crate::io::csv_format::{convert_csv_movement, CsvMovement};
use crate::types::{AccountId, AccountRecord, ConsolidationError};

/// Account source backed by a CSV file of movements
#[derive(Debug, Clone)]
pub struct CsvAccountSource {
    path: PathBuf,
}

impl CsvAccountSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl AccountSource for CsvAccountSource {
    fn get_accounts(&self) -> Result<Vec<AccountRecord>, ConsolidationError> {
        let file = File::open(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConsolidationError::FileNotFound {
                path: self.path.display().to_string(),
            },
            _ => ConsolidationError::from(e),
        })?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(file);

        let mut accounts: Vec<AccountRecord> = Vec::new();
        let mut positions: HashMap<AccountId, usize> = HashMap::new();

        for row in reader.deserialize::<CsvMovement>() {
            let movement = match row.map_err(ConsolidationError::from) {
                Ok(row) => match convert_csv_movement(row) {
                    Ok(movement) => movement,
                    Err(e) => {
                        warn!(error = %e, "skipping movement");
                        continue;
                    }
                },
                Err(e) => {
                    warn!(error = %e, "skipping malformed row");
                    continue;
                }
            };

            match positions.get(&movement.account) {
                Some(&position) => {
                    let account = &mut accounts[position];
                    if account.holder != movement.holder {
                        warn!(
                            account = movement.account,
                            expected = %account.holder,
                            found = %movement.holder,
                            "holder differs from first row; keeping the first"
                        );
                    }
                    account.movements.push(movement.amount);
                }
                None => {
                    positions.insert(movement.account, accounts.len());
                    accounts.push(
                        AccountRecord::new(movement.account, movement.holder)
                            .with_movements([movement.amount]),
                    );
                }
            }
        }

        Ok(accounts)
    }
}

/// Account source over an already-built collection
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountSource {
    accounts: Vec<AccountRecord>,
}

impl InMemoryAccountSource {
    pub fn new(accounts: Vec<AccountRecord>) -> Self {
        Self { accounts }
    }
}

impl AccountSource for InMemoryAccountSource {
    fn get_accounts(&self) -> Result<Vec<AccountRecord>, ConsolidationError> {
        Ok(self.accounts.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_groups_movements_by_account_in_first_seen_order() {
        let file = create_temp_csv(
            "account,holder,amount\n\
             2,Bruno,10\n\
             1,Ana,100.0\n\
             2,Bruno,-5\n\
             1,Ana,-30.25\n",
        );

        let accounts = CsvAccountSource::new(file.path()).get_accounts().unwrap();

        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].id, 2);
        assert_eq!(
            accounts[0].movements,
            vec![Decimal::new(10, 0), Decimal::new(-5, 0)]
        );
        assert_eq!(accounts[1].id, 1);
        assert_eq!(accounts[1].holder, "Ana");
        assert_eq!(
            accounts[1].movements,
            vec![Decimal::new(1000, 1), Decimal::new(-3025, 2)]
        );
    }

    #[test]
    fn test_skips_malformed_rows() {
        let file = create_temp_csv(
            "account,holder,amount\n\
             1,Ana,100\n\
             x,Bad,1\n\
             2,Bruno,oops\n\
             3,Carla,7\n",
        );

        let accounts = CsvAccountSource::new(file.path()).get_accounts().unwrap();

        let ids: Vec<AccountId> = accounts.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_header_only_yields_no_accounts() {
        let file = create_temp_csv("account,holder,amount\n");

        let accounts = CsvAccountSource::new(file.path()).get_accounts().unwrap();

        assert!(accounts.is_empty());
    }

    #[test]
    fn test_missing_file_is_file_not_found() {
        let result = CsvAccountSource::new("does-not-exist.csv").get_accounts();

        assert_eq!(
            result.unwrap_err(),
            ConsolidationError::FileNotFound {
                path: "does-not-exist.csv".to_string()
            }
        );
    }

    #[test]
    fn test_in_memory_source_returns_its_accounts() {
        let accounts = vec![AccountRecord::new(1, "Ana"), AccountRecord::new(2, "Bruno")];
        let source = InMemoryAccountSource::new(accounts.clone());

        assert_eq!(source.get_accounts().unwrap(), accounts);
    }
}
