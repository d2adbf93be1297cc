use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// Sum that reports overflow instead of panicking.
pub(crate) fn checked_total(
    values: impl IntoIterator<Item = Decimal>,
    what: &str,
) -> Result<Decimal, LedgerError> {
    values.into_iter().try_fold(Decimal::ZERO, |acc, value| {
        acc.checked_add(value)
            .ok_or_else(|| LedgerError::Overflow(format!("{what} total")))
    })
}

/// A single revenue source (ticketing platform, Pix, door sales).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RevenueLine {
    pub source: String,
    pub gross: Decimal,
    pub discount: Decimal,
    /// Always `gross - discount` once the engine has touched the line.
    pub net: Decimal,
}

impl RevenueLine {
    /// Builds a line whose net is derived from gross and discount.
    pub fn new(
        source: impl Into<String>,
        gross: Decimal,
        discount: Decimal,
    ) -> Result<Self, LedgerError> {
        let mut line = Self::with_net(source, gross, discount, Decimal::ZERO);
        line.net = line.expected_net()?;
        Ok(line)
    }

    /// Builds a line with the net figure exactly as it was written in a file.
    pub fn with_net(
        source: impl Into<String>,
        gross: Decimal,
        discount: Decimal,
        net: Decimal,
    ) -> Self {
        Self {
            source: source.into(),
            gross,
            discount,
            net,
        }
    }

    pub fn expected_net(&self) -> Result<Decimal, LedgerError> {
        self.gross
            .checked_sub(self.discount)
            .ok_or_else(|| LedgerError::Overflow(format!("net of `{}`", self.source)))
    }
}

/// A single expense (logistics, hotel). Read-only once loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpenseLine {
    pub label: String,
    pub gross: Decimal,
    pub discount: Decimal,
    pub net: Decimal,
}

impl ExpenseLine {
    pub fn new(label: impl Into<String>, gross: Decimal, discount: Decimal, net: Decimal) -> Self {
        Self {
            label: label.into(),
            gross,
            discount,
            net,
        }
    }
}

/// Column totals over the expense lines.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpenseSummary {
    pub gross: Decimal,
    pub discount: Decimal,
    pub net: Decimal,
}

impl ExpenseSummary {
    pub fn from_lines(lines: &[ExpenseLine]) -> Result<Self, LedgerError> {
        Ok(Self {
            gross: checked_total(lines.iter().map(|line| line.gross), "expense gross")?,
            discount: checked_total(lines.iter().map(|line| line.discount), "expense discount")?,
            net: checked_total(lines.iter().map(|line| line.net), "expense net")?,
        })
    }
}
