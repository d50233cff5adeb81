//! Account-related types for the account consolidator
//!
//! This module defines the AccountRecord structure, the unit of work handed
//! to the consolidation engine.

use rust_decimal::Decimal;

/// Account identifier (u32: 0-4,294,967,295)
pub type AccountId = u32;

/// One account to consolidate
///
/// Immutable once built by an account source. The engine only reads it;
/// every concurrent work unit sees the same record by shared reference.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountRecord {
    /// The account ID
    pub id: AccountId,

    /// Name of the account holder
    pub holder: String,

    /// Financial movements in the order they were recorded
    ///
    /// Positive values are credits, negative values are debits.
    pub movements: Vec<Decimal>,
}

impl AccountRecord {
    /// Create an account with no movements
    ///
    /// # Arguments
    ///
    /// * `id` - The account ID
    /// * `holder` - Name of the account holder
    pub fn new(id: AccountId, holder: impl Into<String>) -> Self {
        AccountRecord {
            id,
            holder: holder.into(),
            movements: Vec::new(),
        }
    }

    /// Builder-style helper that appends movements
    pub fn with_movements(mut self, movements: impl IntoIterator<Item = Decimal>) -> Self {
        self.movements.extend(movements);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_has_no_movements() {
        let account = AccountRecord::new(7, "Ana");
        assert_eq!(account.id, 7);
        assert_eq!(account.holder, "Ana");
        assert!(account.movements.is_empty());
    }

    #[test]
    fn test_with_movements_keeps_order() {
        let account = AccountRecord::new(1, "Bruno")
            .with_movements([Decimal::new(100, 0), Decimal::new(-25, 0)])
            .with_movements([Decimal::new(5, 1)]);

        assert_eq!(
            account.movements,
            vec![Decimal::new(100, 0), Decimal::new(-25, 0), Decimal::new(5, 1)]
        );
    }
}
