use tally_config::model::DateFormatStyle;
use tally_core::RecurrenceService;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Inspect and adjust preferences",
        "config <show|set|backup|backups> ...",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return handle_show(context);
    }
    match args[0].to_lowercase().as_str() {
        "show" => handle_show(context),
        "set" => handle_set(context, &args[1..]),
        "backup" => handle_backup(context, &args[1..]),
        "backups" => handle_backups(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config subcommand `{}`",
            other
        ))),
    }
}

fn handle_show(context: &mut ShellContext) -> CommandResult {
    let config = context.config_read().clone();
    output::section("Preferences");
    let precision = config
        .currency_precision
        .map(|value| value.to_string())
        .unwrap_or_else(|| "2 (default)".to_string());
    let date_format = config.date_format.to_string();
    let data_root = config.resolve_data_root().display().to_string();
    output::two_column(&[
        ("locale", config.locale.as_str()),
        ("currency", config.currency.as_str()),
        ("precision", precision.as_str()),
        ("date-format", date_format.as_str()),
        ("default-cadence", config.default_cadence.as_str()),
        ("data-root", data_root.as_str()),
    ]);
    Ok(())
}

fn handle_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(CommandError::InvalidArguments(
            "usage: config set <locale|currency|precision|date-format|default-cadence> <value>"
                .into(),
        ));
    }
    let value = args[1];
    match args[0].to_lowercase().as_str() {
        "locale" => context.config_write().locale = value.to_string(),
        "currency" => context.config_write().currency = value.to_uppercase(),
        "precision" => {
            let precision = value.parse::<u8>().map_err(|_| {
                CommandError::InvalidArguments(format!("precision `{}` is not a number", value))
            })?;
            context.config_write().currency_precision = Some(precision);
        }
        "date-format" => {
            let style = match value.to_lowercase().as_str() {
                "iso" => DateFormatStyle::Iso,
                "slash" => DateFormatStyle::Slash,
                other => {
                    return Err(CommandError::InvalidArguments(format!(
                        "unknown date format `{}`, expected iso or slash",
                        other
                    )))
                }
            };
            context.config_write().date_format = style;
        }
        "default-cadence" => {
            // Round-trips through the parser so only real cadences stick.
            RecurrenceService::parse(value, None, None)?;
            context.config_write().default_cadence = value.to_lowercase();
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown preference `{}`",
                other
            )))
        }
    }
    context.save_config()?;
    output::success(format!("Set {} to {}.", args[0], value));
    Ok(())
}

fn handle_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = args.first().copied();
    let snapshot = context.config_read().clone();
    let name = context.config_manager.backup(&snapshot, note)?;
    output::success(format!("Preferences backed up as {name}."));
    Ok(())
}

fn handle_backups(context: &mut ShellContext) -> CommandResult {
    let backups = context.config_manager.list_backups()?;
    if backups.is_empty() {
        output::info("No preference backups.");
        return Ok(());
    }
    for name in backups {
        output::info(format!("  {name}"));
    }
    Ok(())
}
