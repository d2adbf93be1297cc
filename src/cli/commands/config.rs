use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::config::CONFIG_KEYS;
use crate::report::table::{Table, TableColumn};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View or change preferences",
        "config [show] | config [set] <key> <value>",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args: &[&str] = match args.split_first() {
        Some((first, rest)) if first.eq_ignore_ascii_case("set") => rest,
        Some((first, [])) if first.eq_ignore_ascii_case("show") => &[],
        _ => args,
    };

    match args {
        [] => {
            show_config(context);
            Ok(())
        }
        [key] => Err(CommandError::InvalidArguments(format!(
            "missing value for `{}`; keys: {}",
            key,
            CONFIG_KEYS.join(", ")
        ))),
        [key, value @ ..] => set_config_value(context, key, &value.join(" ")),
    }
}

fn show_config(context: &ShellContext) {
    output::section("Configuration");
    let mut table = Table::new(vec![TableColumn::left("Key"), TableColumn::left("Value")]);
    for (key, value) in context.config.entries() {
        table.push_row(vec![key.to_string(), value]);
    }
    println!("{}", table.render());
    io::print_info(format!("Stored at {}", context.config_manager.path().display()));
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let key = key.to_lowercase();
    context.config.set(&key, value)?;
    context.persist_config()?;
    if key == "plain_output" {
        context.apply_output_preferences();
    }
    io::print_success(format!("Configuration `{}` updated.", key));
    Ok(())
}
