//! Movement consolidation
//!
//! Default consolidation function: optionally simulates a slow backend,
//! then sums an account's movements with checked arithmetic.

use std::time::Duration;

use rust_decimal::Decimal;

use super::traits::Consolidate;
use crate::types::{AccountRecord, ConsolidationError, ConsolidationResult};

/// Sums the movements of an account into a balance summary
///
/// Stateless apart from its configuration, so it can be shared by every
/// work unit of a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementConsolidator {
    /// Blocking delay applied before each consolidation
    delay: Duration,
}

impl MovementConsolidator {
    /// Create a consolidator that blocks for `delay` per account
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Consolidate for MovementConsolidator {
    /// Consolidate one account
    ///
    /// # Returns
    ///
    /// * `Ok(ConsolidationResult)` - `"<holder>: <n> movements, balance <total>"`
    /// * `Err(ConsolidationError::ArithmeticOverflow)` - If the balance overflows
    fn consolidate(
        &self,
        account: &AccountRecord,
    ) -> Result<ConsolidationResult, ConsolidationError> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        let balance = account
            .movements
            .iter()
            .try_fold(Decimal::ZERO, |total, movement| total.checked_add(*movement))
            .ok_or_else(|| ConsolidationError::arithmetic_overflow(account.id))?;

        Ok(ConsolidationResult::new(format!(
            "{}: {} movements, balance {:.2}",
            account.holder,
            account.movements.len(),
            balance
        )))
    }
}
