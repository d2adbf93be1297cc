//! Printable statement export.
//!
//! The text layout mirrors the printed borderô: event header, financial
//! summary, revenue table, profit split, and expenses when present.

pub mod table;

use std::{
    fmt,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::{
    currency::{format_currency, format_percentage, LocaleConfig},
    errors::LedgerError,
    ledger::{EventLedger, ExpenseSummary},
};

use table::{Table, TableColumn};

pub const DEFAULT_REPORT_TITLE: &str = "BORDERÔ - SÃO CARLINO COMEDY";
const FILE_PREFIX: &str = "bordero";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(LedgerError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Presentation settings for an export.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    pub locale: LocaleConfig,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_REPORT_TITLE.to_string(),
            locale: LocaleConfig::default(),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    title: &'a str,
    generated_on: NaiveDate,
    #[serde(flatten)]
    ledger: &'a EventLedger,
    expense_totals: ExpenseSummary,
}

/// `bordero_<event name>_<YYYY-MM-DD>.<ext>`, whitespace runs become `_`.
pub fn report_file_name(event_name: &str, today: NaiveDate, format: ReportFormat) -> String {
    let name = event_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .replace(|ch: char| ch == '/' || ch == '\\', "-");
    format!(
        "{FILE_PREFIX}_{name}_{}.{}",
        today.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Event header, summary, revenue and profit-split sections.
pub fn statement_body(ledger: &EventLedger, locale: &LocaleConfig) -> String {
    let money = |value| format_currency(value, locale);
    let mut out = String::new();

    out.push_str("INFORMAÇÕES DO EVENTO\n");
    out.push_str(&format!("Evento: {}\n", ledger.event.name));
    out.push_str(&format!("Data: {}\n", ledger.event.date));
    out.push_str(&format!("Local: {}\n", ledger.event.location));

    out.push_str("\nRESUMO FINANCEIRO\n");
    out.push_str(&format!("Valor Bruto Total: {}\n", money(ledger.total_gross)));
    out.push_str(&format!("Divulgação: {}\n", money(ledger.promotion_cost)));
    out.push_str(&format!("Total Líquido: {}\n", money(ledger.total_net)));

    out.push_str("\nRECEITAS\n");
    out.push_str(&revenue_table(ledger, locale).render());
    out.push('\n');

    out.push_str("\nDIVISÃO DE LUCROS\n");
    out.push_str(&share_table(ledger, locale).render());
    out
}

pub fn revenue_table(ledger: &EventLedger, locale: &LocaleConfig) -> Table {
    let mut table = Table::new(vec![
        TableColumn::left("Origem"),
        TableColumn::right("Valor Bruto"),
        TableColumn::right("Desconto"),
        TableColumn::right("Valor Líquido"),
    ]);
    for line in &ledger.revenues {
        table.push_row(vec![
            line.source.clone(),
            format_currency(line.gross, locale),
            format_currency(line.discount, locale),
            format_currency(line.net, locale),
        ]);
    }
    table.push_row(vec![
        "TOTAL".into(),
        format_currency(ledger.total_gross, locale),
        String::new(),
        format_currency(ledger.total_net, locale),
    ]);
    table
}

pub fn share_table(ledger: &EventLedger, locale: &LocaleConfig) -> Table {
    let mut table = Table::new(vec![
        TableColumn::left("Beneficiário"),
        TableColumn::right("Percentual"),
        TableColumn::right("Valor"),
    ]);
    for share in &ledger.shares {
        table.push_row(vec![
            share.beneficiary.clone(),
            format_percentage(share.percentage, locale),
            format_currency(share.amount, locale),
        ]);
    }
    table
}

pub fn expense_table(ledger: &EventLedger, locale: &LocaleConfig) -> Result<Table, LedgerError> {
    let mut table = Table::new(vec![
        TableColumn::left("Despesa"),
        TableColumn::right("Valor Bruto"),
        TableColumn::right("Desconto"),
        TableColumn::right("Valor Líquido"),
    ]);
    for line in &ledger.expenses {
        table.push_row(vec![
            line.label.clone(),
            format_currency(line.gross, locale),
            format_currency(line.discount, locale),
            format_currency(line.net, locale),
        ]);
    }
    let totals = ledger.expense_summary()?;
    table.push_row(vec![
        "TOTAL".into(),
        format_currency(totals.gross, locale),
        format_currency(totals.discount, locale),
        format_currency(totals.net, locale),
    ]);
    Ok(table)
}

/// Full printable document.
pub fn render_text(
    ledger: &EventLedger,
    options: &ReportOptions,
    today: NaiveDate,
) -> Result<String, LedgerError> {
    let mut out = String::new();
    out.push_str(&options.title);
    out.push('\n');
    out.push_str(&"=".repeat(table::visible_width(&options.title)));
    out.push_str("\n\n");
    out.push_str(&statement_body(ledger, &options.locale));
    out.push('\n');
    if !ledger.expenses.is_empty() {
        out.push_str("\nDESPESAS\n");
        out.push_str(&expense_table(ledger, &options.locale)?.render());
        out.push('\n');
    }
    out.push_str(&format!("\nGerado em {}", today.format("%d/%m/%Y")));
    Ok(out)
}

pub fn render_json(
    ledger: &EventLedger,
    options: &ReportOptions,
    today: NaiveDate,
) -> Result<String, LedgerError> {
    let report = JsonReport {
        title: &options.title,
        generated_on: today,
        ledger,
        expense_totals: ledger.expense_summary()?,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Writes the report into `dir` and returns the file path.
pub fn export_report(
    ledger: &EventLedger,
    options: &ReportOptions,
    dir: &Path,
    format: ReportFormat,
    today: NaiveDate,
) -> Result<PathBuf, LedgerError> {
    let contents = match format {
        ReportFormat::Text => render_text(ledger, options, today)?,
        ReportFormat::Json => render_json(ledger, options, today)?,
    };
    fs::create_dir_all(dir)?;
    let path = dir.join(report_file_name(&ledger.event.name, today, format));
    write_atomic(&path, &contents)?;
    info!(path = %path.display(), %format, "statement exported");
    Ok(path)
}

fn write_atomic(path: &Path, data: &str) -> Result<(), LedgerError> {
    let tmp = path.with_extension(TMP_SUFFIX);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}
