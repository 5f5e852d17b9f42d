use tally_core::{storage::SequenceStore, SequenceService};
use tally_domain::SequenceConfig;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "sequence",
        "Manage voucher and invoice number sequences",
        "sequence <define|next|peek|list> ...",
        cmd_sequence,
    )]
}

fn cmd_sequence(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::InvalidArguments(
            "usage: sequence <define|next|peek|list>".into(),
        ));
    }
    match args[0].to_lowercase().as_str() {
        "define" => handle_define(context, &args[1..]),
        "next" => handle_next(context, &args[1..]),
        "peek" => handle_peek(context, &args[1..]),
        "list" => handle_list(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown sequence subcommand `{}`",
            other
        ))),
    }
}

fn handle_define(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(CommandError::InvalidArguments(
            "usage: sequence define <key> <prefix> [--suffix <s>] [--width <n>] [--start <n>] [--no-pad]"
                .into(),
        ));
    }
    let key = args[0];
    let prefix = args[1];
    let mut suffix = String::new();
    let mut width: u32 = 6;
    let mut start: u64 = 1;
    let mut zero_pad = true;

    let mut rest = args[2..].iter();
    while let Some(flag) = rest.next() {
        match *flag {
            "--suffix" => {
                suffix = rest
                    .next()
                    .ok_or_else(|| missing_value("--suffix"))?
                    .to_string();
            }
            "--width" => {
                width = parse_flag_number(rest.next(), "--width")?;
            }
            "--start" => {
                start = parse_flag_number(rest.next(), "--start")?;
            }
            "--no-pad" => zero_pad = false,
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown flag `{}`",
                    other
                )))
            }
        }
    }

    let replacing = context.storage.get(key).is_ok();
    let config = SequenceConfig::new(key, prefix, suffix, width, zero_pad, start)
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
    context.storage.define(&config)?;

    if replacing {
        output::warning(format!("Replaced sequence `{key}`; its counter was reset."));
    }
    output::success(format!("Sequence `{}` ready, next id {}.", key, config.format(start)));
    Ok(())
}

fn handle_next(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(key) = args.first() else {
        return Err(CommandError::InvalidArguments("usage: sequence next <key>".into()));
    };
    let id = SequenceService::issue(&context.storage, key)?;
    output::info(id);
    Ok(())
}

fn handle_peek(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(key) = args.first() else {
        return Err(CommandError::InvalidArguments("usage: sequence peek <key>".into()));
    };
    let config = context.storage.get(key)?;
    output::info(format!("{}", config));
    Ok(())
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    let sequences = context.storage.list()?;
    if sequences.is_empty() {
        output::info("No sequences defined.");
        return Ok(());
    }
    for config in sequences {
        output::info(format!("  {}", config));
    }
    Ok(())
}

fn missing_value(flag: &str) -> CommandError {
    CommandError::InvalidArguments(format!("{flag} expects a value"))
}

fn parse_flag_number<T: std::str::FromStr>(
    value: Option<&&str>,
    flag: &str,
) -> Result<T, CommandError> {
    let raw = value.ok_or_else(|| missing_value(flag))?;
    raw.parse::<T>()
        .map_err(|_| CommandError::InvalidArguments(format!("{flag} `{raw}` is not a number")))
}
