use std::path::PathBuf;

use rust_decimal::Decimal;

use crate::cli::core::{CommandError, CommandResult, Screen, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::EditSession;
use crate::currency::{format_currency, format_percentage};
use crate::report;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "load",
            "Open a statement sheet (and optional expense sheet)",
            "load [statement.csv] [despesas.csv]",
            cmd_load,
        ),
        CommandEntry::new("new", "Start a blank statement", "new", cmd_new),
        CommandEntry::new("show", "Display the statement on screen", "show", cmd_show)
            .with_aliases(&["view"]),
        CommandEntry::new(
            "expenses",
            "Display the closing expenses",
            "expenses",
            cmd_expenses,
        ),
        CommandEntry::new("close", "Close the current statement", "close", cmd_close),
    ]
}

fn cmd_load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() > 2 {
        return Err(CommandError::InvalidArguments(
            "usage: load [statement.csv] [despesas.csv]".into(),
        ));
    }
    let path = args
        .first()
        .map(PathBuf::from)
        .or_else(|| context.config.statement_path.clone())
        .ok_or_else(|| {
            CommandError::InvalidArguments(
                "no statement path given and `statement_path` is not configured".into(),
            )
        })?;
    let expenses = args
        .get(1)
        .map(PathBuf::from)
        .or_else(|| context.config.expenses_path.clone());

    if !context.confirm_discard()? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    context.open_statement(&path, expenses.as_deref())
}

fn cmd_new(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let template = context.template();
    let notification = match context.screen {
        Screen::Empty => {
            let (session, notification) = EditSession::from_template(template);
            context.screen = Screen::Loaded(session);
            notification
        }
        Screen::Loaded(_) => {
            if !context.confirm_discard()? {
                io::print_info("Operation cancelled.");
                return Ok(());
            }
            context.statement_path = None;
            context.session_mut()?.new_ledger(template)
        }
        Screen::LoadFailed { .. } => return Err(CommandError::StatementUnavailable),
    };
    io::notify(&notification);
    Ok(())
}

fn cmd_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let session = context.session()?;
    let locale = context.config.locale_config();
    output::section(format!("Statement ({})", session.mode()));
    println!("{}", report::statement_body(session.current(), &locale));
    let split = session.current().share_percentage_total()?;
    if !session.current().shares.is_empty() && split != Decimal::ONE_HUNDRED {
        io::print_warning(format!(
            "Profit shares add up to {} (not 100%).",
            format_percentage(split, &locale)
        ));
    }
    if session.is_editing() {
        io::print_hint("Use `set`, then `save` or `cancel`.");
    }
    Ok(())
}

fn cmd_expenses(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.session()?.current();
    let locale = context.config.locale_config();
    output::section("Closing expenses");
    if ledger.expenses.is_empty() {
        io::print_info("No expenses found.");
        return Ok(());
    }
    println!("{}", report::expense_table(ledger, &locale)?.render());
    let summary = ledger.expense_summary()?;
    io::print_info(format!(
        "Total net expenses: {}",
        format_currency(summary.net, &locale)
    ));
    Ok(())
}

fn cmd_close(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.session()?;
    if !context.confirm_discard()? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    context.screen = Screen::Empty;
    context.statement_path = None;
    io::print_info("Statement closed.");
    Ok(())
}
