use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::report::table::{Table, TableColumn};

pub fn print_overview(registry: &CommandRegistry) {
    output::section("Commands");
    let mut table = Table::new(vec![
        TableColumn::left("Command"),
        TableColumn::left("Arguments"),
        TableColumn::left("Description"),
    ]);
    for entry in registry.list() {
        table.push_row(vec![
            entry.name.to_string(),
            entry.arguments().to_string(),
            entry.description.to_string(),
        ]);
    }
    println!("{}", table.render());
    println!("Type `help <command>` for details.");
}

pub fn print_command(entry: &CommandEntry) {
    output::section(entry.name);
    println!("  {}", entry.description);
    println!("  usage: {}", entry.usage);
    if !entry.aliases.is_empty() {
        println!("  aliases: {}", entry.aliases.join(", "));
    }
}
