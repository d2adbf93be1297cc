use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lines::checked_total;
use super::{EventInfo, ExpenseLine, ExpenseSummary, ProfitShare, RevenueLine};
use crate::errors::LedgerError;

pub const TEMPLATE_EVENT_NAME: &str = "Novo Evento";
pub const TEMPLATE_LOCATION: &str = "Local a definir";
pub const TEMPLATE_REVENUE_SOURCES: [&str; 2] = ["Ingressos", "Pix"];
pub const DEFAULT_PARTNER_NAME: &str = "SãoCarlino";
pub const EVENT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Aggregate root for one event's box-office statement.
///
/// Equality is structural: two ledgers are equal when every field matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventLedger {
    pub event: EventInfo,
    #[serde(default)]
    pub revenues: Vec<RevenueLine>,
    #[serde(default)]
    pub expenses: Vec<ExpenseLine>,
    pub promotion_cost: Decimal,
    #[serde(default)]
    pub shares: Vec<ProfitShare>,
    pub total_gross: Decimal,
    pub total_net: Decimal,
}

impl EventLedger {
    /// Builds a ledger and derives its totals from the revenue lines.
    pub fn new(
        event: EventInfo,
        revenues: Vec<RevenueLine>,
        promotion_cost: Decimal,
        shares: Vec<ProfitShare>,
    ) -> Result<Self, LedgerError> {
        let mut ledger = Self {
            event,
            revenues,
            expenses: Vec::new(),
            promotion_cost,
            shares,
            total_gross: Decimal::ZERO,
            total_net: Decimal::ZERO,
        };
        ledger.refresh_totals()?;
        Ok(ledger)
    }

    /// Blank statement: two zeroed revenue rows and a 50/50 split between
    /// the event itself and `partner`.
    pub fn template(today: NaiveDate, partner: &str) -> Self {
        let event = EventInfo::new(
            TEMPLATE_EVENT_NAME,
            today.format(EVENT_DATE_FORMAT).to_string(),
            TEMPLATE_LOCATION,
        );
        let revenues = TEMPLATE_REVENUE_SOURCES
            .iter()
            .map(|source| {
                RevenueLine::with_net(*source, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
            })
            .collect();
        let half = Decimal::from(50);
        let shares = vec![
            ProfitShare::new(TEMPLATE_EVENT_NAME, half, Decimal::ZERO),
            ProfitShare::new(partner, half, Decimal::ZERO),
        ];
        Self {
            event,
            revenues,
            expenses: Vec::new(),
            promotion_cost: Decimal::ZERO,
            shares,
            total_gross: Decimal::ZERO,
            total_net: Decimal::ZERO,
        }
    }

    pub fn with_expenses(mut self, expenses: Vec<ExpenseLine>) -> Self {
        self.expenses = expenses;
        self
    }

    /// Recomputes `total_gross` and `total_net` from the revenue lines.
    ///
    /// Both sums are checked before either total is written.
    pub fn refresh_totals(&mut self) -> Result<(), LedgerError> {
        let gross = checked_total(self.revenues.iter().map(|line| line.gross), "gross")?;
        let net = checked_total(self.revenues.iter().map(|line| line.net), "net")?;
        self.total_gross = gross;
        self.total_net = net;
        Ok(())
    }

    pub fn expense_summary(&self) -> Result<ExpenseSummary, LedgerError> {
        ExpenseSummary::from_lines(&self.expenses)
    }

    pub fn share_percentage_total(&self) -> Result<Decimal, LedgerError> {
        checked_total(self.shares.iter().map(|share| share.percentage), "share percentage")
    }
}
