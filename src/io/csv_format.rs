//! CSV format handling for account movements and consolidation output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvMovement structure for deserialization
//! - Conversion from CSV rows to domain values
//! - Result output serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::types::{AccountId, AccountRecord, ConsolidationResult};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV row structure for deserialization
///
/// Matches the input CSV format with columns: account, holder, amount.
/// Every row is one movement; an account may span several rows.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvMovement {
    pub account: AccountId,
    pub holder: String,
    pub amount: String,
}

/// A validated movement row
#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    pub account: AccountId,
    pub holder: String,
    pub amount: Decimal,
}

/// Convert a CsvMovement to a Movement
///
/// # Returns
///
/// Result containing either:
/// - Ok(Movement) - Successfully converted row
/// - Err(String) - Error message describing the conversion failure
pub fn convert_csv_movement(row: CsvMovement) -> Result<Movement, String> {
    let holder = row.holder.trim();
    if holder.is_empty() {
        return Err(format!("Missing holder for account {}", row.account));
    }

    let amount = Decimal::from_str(row.amount.trim()).map_err(|_| {
        format!(
            "Invalid amount '{}' for account {}",
            row.amount, row.account
        )
    })?;

    Ok(Movement {
        account: row.account,
        holder: holder.to_string(),
        amount,
    })
}

/// Write consolidation results to CSV format
///
/// Writes one row per account with columns: account, holder, summary.
/// Rows follow the run's input order.
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if the inputs disagree in length or a write error occurred
pub fn write_results_csv(
    accounts: &[AccountRecord],
    results: &[ConsolidationResult],
    output: &mut dyn Write,
) -> Result<(), String> {
    use csv::Writer;

    if accounts.len() != results.len() {
        return Err(format!(
            "Result count {} does not match account count {}",
            results.len(),
            accounts.len()
        ));
    }

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["account", "holder", "summary"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for (account, result) in accounts.iter().zip(results) {
        writer
            .write_record([
                account.id.to_string().as_str(),
                account.holder.as_str(),
                result.as_str(),
            ])
            .map_err(|e| format!("Failed to write result record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
