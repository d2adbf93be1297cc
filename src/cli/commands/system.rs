use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::report::table::{Table, TableColumn};
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("help", "List commands or describe one", "help [command]", cmd_help)
            .with_aliases(&["?"]),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new("exit", "Leave the shell", "exit", cmd_exit).with_aliases(&["quit"]),
    ]
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Bordero {}", meta.version));
    let mut table = Table::new(vec![TableColumn::left("Build"), TableColumn::left("")]);
    for (label, value) in [
        ("commit", meta.commit),
        ("built at", meta.built_at),
        ("profile", meta.profile),
        ("rustc", meta.rustc),
    ] {
        table.push_row(vec![label.to_string(), value.to_string()]);
    }
    println!("{}", table.render());
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first() {
        Some(word) => match context.command(&word.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(word),
        },
        None => help::print_overview(&context.registry),
    }
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
