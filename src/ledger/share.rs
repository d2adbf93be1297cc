use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// A beneficiary's cut of the gross revenue.
///
/// Percentages across shares are not required to add up to 100.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfitShare {
    pub beneficiary: String,
    /// Plain percentage, `50` means half.
    pub percentage: Decimal,
    pub amount: Decimal,
}

impl ProfitShare {
    pub fn new(beneficiary: impl Into<String>, percentage: Decimal, amount: Decimal) -> Self {
        Self {
            beneficiary: beneficiary.into(),
            percentage,
            amount,
        }
    }

    /// Amount owed for `percentage` of `total_gross`.
    pub fn amount_for(percentage: Decimal, total_gross: Decimal) -> Result<Decimal, LedgerError> {
        (percentage / Decimal::ONE_HUNDRED)
            .checked_mul(total_gross)
            .ok_or_else(|| LedgerError::Overflow(format!("{percentage}% of {total_gross}")))
    }
}
