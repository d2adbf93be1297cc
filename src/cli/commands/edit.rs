use chrono::NaiveDate;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::core::Field;
use crate::currency::{format_currency, format_percentage, LocaleConfig};
use crate::ledger::{EventLedger, EVENT_DATE_FORMAT};

const SET_USAGE: &str =
    "set <name|date|location> <value> | set <gross|discount|percent|amount> <row> <value>";

/// Field words accepted by `set`, in completion order.
pub(crate) const SET_FIELDS: &[&str] = &[
    "name", "date", "location", "gross", "discount", "percent", "amount",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("edit", "Start editing the statement", "edit", cmd_edit),
        CommandEntry::new("set", "Change a field of the working copy", SET_USAGE, cmd_set),
        CommandEntry::new("save", "Keep the edited values", "save", cmd_save),
        CommandEntry::new("cancel", "Discard the edited values", "cancel", cmd_cancel),
    ]
}

fn cmd_edit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.session_mut()?.begin_edit()?;
    io::print_info("Editing. Use `set` to change values, then `save` or `cancel`.");
    Ok(())
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (field, value) = parse_assignment(args)?;
    let locale = context.config.locale_config();
    context
        .session_mut()?
        .apply_input_in(field, &value, &locale)?;
    let ledger = context.session()?.current();
    io::print_success(describe_change(ledger, field, &locale));
    Ok(())
}

fn cmd_save(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let notification = context.session_mut()?.commit()?;
    io::notify(&notification);
    Ok(())
}

fn cmd_cancel(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let notification = context.session_mut()?.discard()?;
    io::notify(&notification);
    Ok(())
}

/// Maps `set` arguments to a field and its raw text. Rows are 1-based.
pub(crate) fn parse_assignment(args: &[&str]) -> Result<(Field, String), CommandError> {
    let Some((name, rest)) = args.split_first() else {
        return Err(usage());
    };
    match name.to_lowercase().as_str() {
        "name" => Ok((Field::EventName, join_value(rest)?)),
        "location" | "local" => Ok((Field::EventLocation, join_value(rest)?)),
        "date" => Ok((Field::EventDate, normalize_date(&join_value(rest)?)?)),
        "gross" => row_field(rest, Field::RevenueGross),
        "discount" => row_field(rest, Field::RevenueDiscount),
        "percent" | "percentage" => row_field(rest, Field::SharePercentage),
        "amount" => row_field(rest, Field::ShareAmount),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown field `{}`; expected name, date, location, gross, discount, percent or amount",
            other
        ))),
    }
}

fn row_field(args: &[&str], make: fn(usize) -> Field) -> Result<(Field, String), CommandError> {
    let Some((row, rest)) = args.split_first() else {
        return Err(usage());
    };
    let row: usize = row
        .parse()
        .ok()
        .filter(|row| *row > 0)
        .ok_or_else(|| CommandError::InvalidArguments(format!("invalid row `{}`", row)))?;
    Ok((make(row - 1), join_value(rest)?))
}

fn join_value(args: &[&str]) -> Result<String, CommandError> {
    if args.is_empty() {
        return Err(usage());
    }
    Ok(args.join(" "))
}

/// Accepts `DD/MM/YYYY` or `YYYY-MM-DD` and stores the former.
fn normalize_date(input: &str) -> Result<String, CommandError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, EVENT_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .map(|date| date.format(EVENT_DATE_FORMAT).to_string())
        .map_err(|_| {
            CommandError::InvalidArguments(format!("invalid date `{}` (use DD/MM/YYYY)", trimmed))
        })
}

fn usage() -> CommandError {
    CommandError::InvalidArguments(format!("usage: {}", SET_USAGE))
}

fn describe_change(ledger: &EventLedger, field: Field, locale: &LocaleConfig) -> String {
    let money = |value| format_currency(value, locale);
    match field {
        Field::EventName => format!("Event name: {}", ledger.event.name),
        Field::EventDate => format!("Event date: {}", ledger.event.date),
        Field::EventLocation => format!("Location: {}", ledger.event.location),
        Field::RevenueGross(index) | Field::RevenueDiscount(index) => {
            let line = &ledger.revenues[index];
            format!(
                "{}: net {} | gross total {} | net total {}",
                line.source,
                money(line.net),
                money(ledger.total_gross),
                money(ledger.total_net)
            )
        }
        Field::SharePercentage(index) | Field::ShareAmount(index) => {
            let share = &ledger.shares[index];
            format!(
                "{}: {} = {}",
                share.beneficiary,
                format_percentage(share.percentage, locale),
                money(share.amount)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_one_based() {
        let (field, value) = parse_assignment(&["gross", "2", "R$", "1.000,00"]).unwrap();
        assert_eq!(field, Field::RevenueGross(1));
        assert_eq!(value, "R$ 1.000,00");
    }

    #[test]
    fn row_zero_is_rejected() {
        let err = parse_assignment(&["percent", "0", "50"]).unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));
    }

    #[test]
    fn iso_dates_are_normalized() {
        let (field, value) = parse_assignment(&["date", "2024-04-13"]).unwrap();
        assert_eq!(field, Field::EventDate);
        assert_eq!(value, "13/04/2024");
    }

    #[test]
    fn invalid_dates_are_rejected() {
        assert!(parse_assignment(&["date", "31/02/2024"]).is_err());
    }

    #[test]
    fn names_keep_spaces() {
        let (field, value) = parse_assignment(&["name", "Noite", "de", "Stand", "Up"]).unwrap();
        assert_eq!(field, Field::EventName);
        assert_eq!(value, "Noite de Stand Up");
    }
}
