use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub fn print_overview(registry: &CommandRegistry) {
    output::section("Available commands");
    let rows: Vec<(&str, &str)> = registry
        .list()
        .iter()
        .map(|entry| (entry.name, entry.description))
        .collect();
    output::two_column(&rows);
    output::info("Use `help <command>` for details.");
}

pub fn print_command(entry: &CommandEntry) {
    output::section(format!("Help: {}", entry.name));
    output::two_column(&[
        ("description", entry.description),
        ("usage", entry.usage),
    ]);
}
