//! Recomputation rules for derived statement values.
//!
//! Dependencies form a DAG (gross/discount -> net -> totals -> share
//! amounts), so a single pass per edit is enough.
//!
//! Revenue edits do not cascade into profit shares: a share amount only
//! changes when its own percentage (or amount) is edited.

use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    currency::{parse_amount_in, parse_percentage_in, LocaleConfig},
    errors::LedgerError,
    ledger::{EventLedger, ProfitShare, RevenueLine},
};

/// An editable field of the statement, addressed by row index where needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    EventName,
    EventDate,
    EventLocation,
    RevenueGross(usize),
    RevenueDiscount(usize),
    SharePercentage(usize),
    ShareAmount(usize),
}

impl Field {
    /// Turns raw typed text into an edit for this field.
    ///
    /// Numeric fields go through the permissive parser, so garbage becomes 0.
    pub fn edit(self, raw: &str) -> LedgerEdit {
        self.edit_in(raw, &LocaleConfig::pt_br())
    }

    /// Like [`Field::edit`], reading numbers with `locale`'s decimal separator.
    pub fn edit_in(self, raw: &str, locale: &LocaleConfig) -> LedgerEdit {
        let parse_amount = |raw: &str| parse_amount_in(raw, locale);
        match self {
            Field::EventName => LedgerEdit::EventName(raw.to_string()),
            Field::EventDate => LedgerEdit::EventDate(raw.to_string()),
            Field::EventLocation => LedgerEdit::EventLocation(raw.to_string()),
            Field::RevenueGross(index) => LedgerEdit::RevenueGross {
                index,
                amount: parse_amount(raw),
            },
            Field::RevenueDiscount(index) => LedgerEdit::RevenueDiscount {
                index,
                amount: parse_amount(raw),
            },
            Field::SharePercentage(index) => LedgerEdit::SharePercentage {
                index,
                percentage: parse_percentage_in(raw, locale),
            },
            Field::ShareAmount(index) => LedgerEdit::ShareAmount {
                index,
                amount: parse_amount(raw),
            },
        }
    }
}

/// A single already-parsed change to a leaf field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEdit {
    EventName(String),
    EventDate(String),
    EventLocation(String),
    RevenueGross { index: usize, amount: Decimal },
    RevenueDiscount { index: usize, amount: Decimal },
    SharePercentage { index: usize, percentage: Decimal },
    ShareAmount { index: usize, amount: Decimal },
}

impl LedgerEdit {
    pub fn field(&self) -> Field {
        match self {
            LedgerEdit::EventName(_) => Field::EventName,
            LedgerEdit::EventDate(_) => Field::EventDate,
            LedgerEdit::EventLocation(_) => Field::EventLocation,
            LedgerEdit::RevenueGross { index, .. } => Field::RevenueGross(*index),
            LedgerEdit::RevenueDiscount { index, .. } => Field::RevenueDiscount(*index),
            LedgerEdit::SharePercentage { index, .. } => Field::SharePercentage(*index),
            LedgerEdit::ShareAmount { index, .. } => Field::ShareAmount(*index),
        }
    }
}

pub struct TotalsEngine;

impl TotalsEngine {
    /// Returns a new ledger with `edit` applied and dependents recomputed.
    pub fn recompute(ledger: &EventLedger, edit: &LedgerEdit) -> Result<EventLedger, LedgerError> {
        let mut next = ledger.clone();
        Self::apply_to(&mut next, edit)?;
        Ok(next)
    }

    /// Applies `edit` in place. On error the ledger is left untouched.
    pub fn apply(ledger: &mut EventLedger, edit: &LedgerEdit) -> Result<(), LedgerError> {
        *ledger = Self::recompute(ledger, edit)?;
        Ok(())
    }

    /// May leave `ledger` half-updated when it fails.
    fn apply_to(ledger: &mut EventLedger, edit: &LedgerEdit) -> Result<(), LedgerError> {
        debug!(field = ?edit.field(), "recomputing statement");
        match edit {
            LedgerEdit::EventName(name) => {
                if let Some(first) = ledger.shares.first_mut() {
                    if first.beneficiary == ledger.event.name {
                        first.beneficiary = name.clone();
                    }
                }
                ledger.event.name = name.clone();
            }
            LedgerEdit::EventDate(date) => ledger.event.date = date.clone(),
            LedgerEdit::EventLocation(location) => ledger.event.location = location.clone(),
            LedgerEdit::RevenueGross { index, amount } => {
                let line = revenue_mut(ledger, *index)?;
                line.gross = *amount;
                line.net = line.expected_net()?;
                ledger.refresh_totals()?;
            }
            LedgerEdit::RevenueDiscount { index, amount } => {
                let line = revenue_mut(ledger, *index)?;
                line.discount = *amount;
                line.net = line.expected_net()?;
                ledger.refresh_totals()?;
            }
            LedgerEdit::SharePercentage { index, percentage } => {
                let total_gross = ledger.total_gross;
                let share = share_mut(ledger, *index)?;
                share.percentage = *percentage;
                share.amount = ProfitShare::amount_for(*percentage, total_gross)?;
            }
            LedgerEdit::ShareAmount { index, amount } => {
                share_mut(ledger, *index)?.amount = *amount;
            }
        }
        Ok(())
    }
}

/// Free-function form of [`TotalsEngine::recompute`].
pub fn recompute(ledger: &EventLedger, edit: &LedgerEdit) -> Result<EventLedger, LedgerError> {
    TotalsEngine::recompute(ledger, edit)
}

/// Free-function form of [`TotalsEngine::apply`].
pub fn apply_edit(ledger: &mut EventLedger, edit: &LedgerEdit) -> Result<(), LedgerError> {
    TotalsEngine::apply(ledger, edit)
}

fn revenue_mut(ledger: &mut EventLedger, index: usize) -> Result<&mut RevenueLine, LedgerError> {
    let count = ledger.revenues.len();
    ledger.revenues.get_mut(index).ok_or_else(|| {
        LedgerError::InvalidRef(format!(
            "revenue row {} does not exist ({} row(s))",
            index + 1,
            count
        ))
    })
}

fn share_mut(ledger: &mut EventLedger, index: usize) -> Result<&mut ProfitShare, LedgerError> {
    let count = ledger.shares.len();
    ledger.shares.get_mut(index).ok_or_else(|| {
        LedgerError::InvalidRef(format!(
            "profit share {} does not exist ({} share(s))",
            index + 1,
            count
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{EventInfo, DEFAULT_PARTNER_NAME};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn tickets_ledger() -> EventLedger {
        EventLedger::new(
            EventInfo::new("Show", "10/05/2024", "Teatro Municipal"),
            vec![RevenueLine::new("Tickets", dec!(1000), dec!(100)).unwrap()],
            Decimal::ZERO,
            vec![
                ProfitShare::new("Show", dec!(60), dec!(600)),
                ProfitShare::new("Casa", dec!(40), dec!(400)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn discount_edit_updates_net_and_totals() {
        let ledger = tickets_ledger();
        let edit = LedgerEdit::RevenueDiscount {
            index: 0,
            amount: dec!(150),
        };
        let next = recompute(&ledger, &edit).unwrap();
        assert_eq!(next.revenues[0].net, dec!(850));
        assert_eq!(next.total_gross, dec!(1000));
        assert_eq!(next.total_net, dec!(850));
        // input value is untouched
        assert_eq!(ledger.revenues[0].net, dec!(900));
    }

    #[test]
    fn net_may_go_negative() {
        let ledger = tickets_ledger();
        let next = recompute(
            &ledger,
            &LedgerEdit::RevenueDiscount {
                index: 0,
                amount: dec!(1200.50),
            },
        )
        .unwrap();
        assert_eq!(next.revenues[0].net, dec!(-200.50));
        assert_eq!(next.total_net, dec!(-200.50));
    }

    #[test]
    fn revenue_edit_does_not_touch_share_amounts() {
        let ledger = tickets_ledger();
        let next = recompute(
            &ledger,
            &LedgerEdit::RevenueGross {
                index: 0,
                amount: dec!(5000),
            },
        )
        .unwrap();
        assert_eq!(next.total_gross, dec!(5000));
        assert_eq!(next.shares, ledger.shares);
    }

    #[test]
    fn percentage_edit_uses_current_total_gross() {
        let ledger = tickets_ledger();
        let next = recompute(
            &ledger,
            &LedgerEdit::SharePercentage {
                index: 1,
                percentage: dec!(25),
            },
        )
        .unwrap();
        assert_eq!(next.shares[1].percentage, dec!(25));
        assert_eq!(next.shares[1].amount, dec!(250));
        assert_eq!(next.shares[0], ledger.shares[0]);
    }

    #[test]
    fn percentage_edge_values_are_exact() {
        let ledger = tickets_ledger();
        for (pct, expected) in [(dec!(0), dec!(0)), (dec!(100), dec!(1000))] {
            let next = recompute(
                &ledger,
                &LedgerEdit::SharePercentage {
                    index: 0,
                    percentage: pct,
                },
            )
            .unwrap();
            assert_eq!(next.shares[0].amount, expected);
        }
        let empty = EventLedger::template(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            DEFAULT_PARTNER_NAME,
        );
        let next = recompute(
            &empty,
            &LedgerEdit::SharePercentage {
                index: 0,
                percentage: dec!(75),
            },
        )
        .unwrap();
        assert!(next.shares[0].amount.is_zero());
    }

    #[test]
    fn amount_edit_stores_literal_value() {
        let ledger = tickets_ledger();
        let next = recompute(
            &ledger,
            &LedgerEdit::ShareAmount {
                index: 0,
                amount: dec!(123.45),
            },
        )
        .unwrap();
        assert_eq!(next.shares[0].amount, dec!(123.45));
        assert_eq!(next.shares[0].percentage, dec!(60));
    }

    #[test]
    fn renaming_event_renames_mirroring_first_share_only() {
        let ledger = tickets_ledger();
        let next = recompute(&ledger, &LedgerEdit::EventName("Show X".into())).unwrap();
        assert_eq!(next.event.name, "Show X");
        assert_eq!(next.shares[0].beneficiary, "Show X");
        assert_eq!(next.shares[1].beneficiary, "Casa");
    }

    #[test]
    fn renaming_event_leaves_unrelated_first_share_alone() {
        let mut ledger = tickets_ledger();
        ledger.shares[0].beneficiary = "Comediante".into();
        let next = recompute(&ledger, &LedgerEdit::EventName("Outro".into())).unwrap();
        assert_eq!(next.shares[0].beneficiary, "Comediante");
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut ledger = tickets_ledger();
        let before = ledger.clone();
        let err = apply_edit(
            &mut ledger,
            &LedgerEdit::RevenueGross {
                index: 3,
                amount: dec!(1),
            },
        )
        .expect_err("row 4 does not exist");
        assert!(matches!(err, LedgerError::InvalidRef(_)));
        assert_eq!(ledger, before);
    }

    #[test]
    fn gross_total_out_of_range_is_rejected_without_changes() {
        let mut ledger = EventLedger::template(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            DEFAULT_PARTNER_NAME,
        );
        let max = Field::RevenueGross(0).edit("79228162514264337593543950335");
        apply_edit(&mut ledger, &max).unwrap();
        let before = ledger.clone();

        let second = Field::RevenueGross(1).edit("79228162514264337593543950335");
        let err = apply_edit(&mut ledger, &second).expect_err("gross total overflows");
        assert!(matches!(err, LedgerError::Overflow(_)));
        assert_eq!(ledger, before);
    }

    #[test]
    fn share_amount_out_of_range_is_rejected_without_changes() {
        let mut ledger = tickets_ledger();
        let before = ledger.clone();
        let err = apply_edit(
            &mut ledger,
            &LedgerEdit::SharePercentage {
                index: 0,
                percentage: Decimal::MAX,
            },
        )
        .expect_err("share amount overflows");
        assert!(matches!(err, LedgerError::Overflow(_)));
        assert_eq!(ledger, before);
    }

    #[test]
    fn net_out_of_range_is_rejected_without_changes() {
        let mut ledger = tickets_ledger();
        let before = ledger.clone();
        let err = apply_edit(
            &mut ledger,
            &LedgerEdit::RevenueDiscount {
                index: 0,
                amount: Decimal::MIN,
            },
        )
        .expect_err("net overflows");
        assert!(matches!(err, LedgerError::Overflow(_)));
        assert_eq!(ledger, before);
    }

    #[test]
    fn field_edit_in_reads_the_locale_separator() {
        let en_us = LocaleConfig::from_tag("en-US");
        assert_eq!(
            Field::RevenueGross(0).edit_in("$ 1,234.56", &en_us),
            LedgerEdit::RevenueGross {
                index: 0,
                amount: dec!(1234.56)
            }
        );
        assert_eq!(
            Field::SharePercentage(1).edit_in("12.5%", &en_us),
            LedgerEdit::SharePercentage {
                index: 1,
                percentage: dec!(12.5)
            }
        );
    }

    #[test]
    fn field_edit_parses_raw_text() {
        assert_eq!(
            Field::RevenueGross(1).edit("R$ 1.500,25"),
            LedgerEdit::RevenueGross {
                index: 1,
                amount: dec!(1500.25)
            }
        );
        assert_eq!(
            Field::SharePercentage(0).edit("abc"),
            LedgerEdit::SharePercentage {
                index: 0,
                percentage: Decimal::ZERO
            }
        );
    }
}
