//! Readers for the fixed-layout statement and expense sheets.
//!
//! Both files are `;`-separated and addressed by line number, not by header.
//! A line that is missing or too short is skipped, never an error.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::{
    currency::{parse_amount, parse_percentage},
    errors::LedgerError,
    ledger::{EventInfo, EventLedger, ExpenseLine, ProfitShare, RevenueLine},
};

const FIELD_SEPARATOR: char = ';';
const MIN_ROW_FIELDS: usize = 4;

const EVENT_NAME_LINE: usize = 3;
const EVENT_DATE_LINE: usize = 4;
const EVENT_LOCATION_LINE: usize = 5;
const REVENUE_LINES: [usize; 2] = [8, 9];
const PROMOTION_LINE: usize = 12;
const DECLARED_NET_LINE: usize = 13;
const SUMMARY_VALUE_COLUMN: usize = 2;
const SHARE_LINES: [usize; 2] = [16, 17];
const EXPENSE_LINES: [usize; 2] = [8, 9];

/// Outcome of reading a statement sheet.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub ledger: EventLedger,
    /// Net total as printed on the sheet, kept only for reconciliation.
    pub declared_net: Option<Decimal>,
    pub warnings: Vec<String>,
    pub path: Option<PathBuf>,
}

/// Outcome of reading an expense sheet.
#[derive(Debug, Clone, Default)]
pub struct ExpenseReport {
    pub expenses: Vec<ExpenseLine>,
    pub warnings: Vec<String>,
}

struct Sheet<'a> {
    lines: Vec<&'a str>,
}

impl<'a> Sheet<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
        }
    }

    fn fields(&self, line: usize) -> Option<Vec<&'a str>> {
        self.lines
            .get(line)
            .map(|raw| raw.split(FIELD_SEPARATOR).collect())
    }

    fn cell(&self, line: usize, column: usize) -> Option<&'a str> {
        self.lines
            .get(line)
            .and_then(|raw| raw.split(FIELD_SEPARATOR).nth(column))
    }

    /// Fields of a data row with at least [`MIN_ROW_FIELDS`] columns.
    fn row(&self, line: usize, kind: &str, warnings: &mut Vec<String>) -> Option<Vec<&'a str>> {
        match self.fields(line) {
            Some(fields) if fields.len() >= MIN_ROW_FIELDS => Some(fields),
            Some(fields) => {
                warnings.push(format!(
                    "{kind} row on line {} skipped: {} field(s), expected {}",
                    line + 1,
                    fields.len(),
                    MIN_ROW_FIELDS
                ));
                None
            }
            None => {
                warnings.push(format!("{kind} row on line {} missing", line + 1));
                None
            }
        }
    }
}

/// Parses statement text into a ledger.
///
/// Fails only when the revenue totals do not fit in a decimal.
pub fn parse_statement(text: &str) -> Result<LoadReport, LedgerError> {
    let sheet = Sheet::new(text);
    let mut warnings = Vec::new();

    let event = EventInfo::new(
        sheet
            .cell(EVENT_NAME_LINE, 1)
            .unwrap_or_default()
            .replace('"', ""),
        sheet.cell(EVENT_DATE_LINE, 1).unwrap_or_default(),
        sheet.cell(EVENT_LOCATION_LINE, 1).unwrap_or_default(),
    );

    let mut revenues = Vec::new();
    for line in REVENUE_LINES {
        if let Some(fields) = sheet.row(line, "revenue", &mut warnings) {
            let revenue = RevenueLine::with_net(
                fields[0],
                parse_amount(fields[1]),
                parse_amount(fields[2]),
                parse_amount(fields[3]),
            );
            match revenue.expected_net() {
                Ok(expected) if expected != revenue.net => warnings.push(format!(
                    "revenue `{}` lists net {} but gross - discount is {}",
                    revenue.source, revenue.net, expected
                )),
                Ok(_) => {}
                Err(err) => warnings.push(format!("revenue `{}`: {err}", revenue.source)),
            }
            revenues.push(revenue);
        }
    }

    let promotion_cost = parse_amount(sheet.cell(PROMOTION_LINE, SUMMARY_VALUE_COLUMN));

    let mut shares = Vec::new();
    for line in SHARE_LINES {
        if let Some(fields) = sheet.row(line, "profit share", &mut warnings) {
            shares.push(ProfitShare::new(
                fields[1],
                parse_percentage(fields[2]),
                parse_amount(fields[3]),
            ));
        }
    }

    let ledger = EventLedger::new(event, revenues, promotion_cost, shares)?;

    let declared_net = sheet
        .cell(DECLARED_NET_LINE, SUMMARY_VALUE_COLUMN)
        .map(parse_amount);
    if let Some(declared) = declared_net {
        if declared != ledger.total_net {
            warnings.push(format!(
                "sheet declares net total {} but revenue lines add up to {}",
                declared, ledger.total_net
            ));
        }
    }

    Ok(LoadReport {
        ledger,
        declared_net,
        warnings,
        path: None,
    })
}

/// Parses expense sheet text.
pub fn parse_expenses(text: &str) -> ExpenseReport {
    let sheet = Sheet::new(text);
    let mut report = ExpenseReport::default();
    for line in EXPENSE_LINES {
        if let Some(fields) = sheet.row(line, "expense", &mut report.warnings) {
            report.expenses.push(ExpenseLine::new(
                fields[0],
                parse_amount(fields[1]),
                parse_amount(fields[2]),
                parse_amount(fields[3]),
            ));
        }
    }
    report
}

/// Reads and parses a statement sheet from disk.
pub fn load_statement(path: &Path) -> Result<LoadReport, LedgerError> {
    let text = read_sheet(path)?;
    let mut report = parse_statement(&text).map_err(|err| LedgerError::Load {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    report.path = Some(path.to_path_buf());
    log_outcome(path, &report.warnings);
    info!(
        path = %path.display(),
        revenues = report.ledger.revenues.len(),
        shares = report.ledger.shares.len(),
        "statement loaded"
    );
    Ok(report)
}

/// Reads and parses an expense sheet from disk.
pub fn load_expenses(path: &Path) -> Result<ExpenseReport, LedgerError> {
    let text = read_sheet(path)?;
    let report = parse_expenses(&text);
    log_outcome(path, &report.warnings);
    info!(path = %path.display(), expenses = report.expenses.len(), "expenses loaded");
    Ok(report)
}

fn read_sheet(path: &Path) -> Result<String, LedgerError> {
    fs::read_to_string(path).map_err(|err| LedgerError::Load {
        path: path.display().to_string(),
        reason: err.to_string(),
    })
}

fn log_outcome(path: &Path, warnings: &[String]) {
    for warning in warnings {
        warn!(path = %path.display(), "{warning}");
    }
}
