use tally_core::{
    storage::BillingStorage, DateFormatter, RecurrenceService, WorkService,
};
use tally_domain::{Displayable, PeriodSelector, WorkDefinition};

use crate::cli::commands::invoice::{parse_date, split_anchor_selector};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "work",
        "Track recurring work and its billing windows",
        "work <add|customer|show|period|pause|resume|list|delete> ...",
        cmd_work,
    )]
}

fn cmd_work(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::InvalidArguments(
            "usage: work <add|customer|show|period|pause|resume|list|delete>".into(),
        ));
    }
    match args[0].to_lowercase().as_str() {
        "add" => handle_add(context, &args[1..]),
        "customer" => handle_customer(context, &args[1..]),
        "show" => handle_show(context, &args[1..]),
        "period" => handle_period(context, &args[1..]),
        "pause" => handle_active(context, &args[1..], false),
        "resume" => handle_active(context, &args[1..], true),
        "list" => handle_list(context),
        "delete" => handle_delete(context, &args[1..]),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown work subcommand `{}`",
            other
        ))),
    }
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(CommandError::InvalidArguments(
            "usage: work add <name> <cadence> [anchor] [selector]".into(),
        ));
    }
    let (anchor, selector) = split_anchor_selector(&args[2..]);
    let descriptor = RecurrenceService::parse(args[1], anchor, selector)?;

    let work = WorkDefinition::new(args[0], descriptor);
    context.storage.save_work(&work)?;

    output::success(format!("Added recurring work `{}`: {}", work.name, descriptor));
    Ok(())
}

fn handle_customer(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(CommandError::InvalidArguments(
            "usage: work customer <name> <customer>".into(),
        ));
    }
    let mut work = context.storage.load_work(args[0])?;
    work.customer = Some(args[1].to_string());
    context.storage.save_work(&work)?;
    output::success(format!("Assigned `{}` to {}.", work.name, args[1]));
    Ok(())
}

fn handle_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        return Err(CommandError::InvalidArguments("usage: work show <name>".into()));
    };
    let work = context.storage.load_work(name)?;
    let today = context.today();

    output::section(work.display_label());
    if let Some(customer) = &work.customer {
        output::two_column(&[("Customer", customer.as_str())]);
    }

    // The selector stored on the descriptor picks the billed window; the
    // neighbors give quick context when reviewing a schedule.
    for selector in [
        PeriodSelector::Previous,
        PeriodSelector::Current,
        PeriodSelector::Next,
    ] {
        let window = WorkService::window_for_selector(&work, selector, today)?;
        let marker = if selector == work.descriptor.selector {
            "*"
        } else {
            " "
        };
        output::info(format!(
            " {marker} {selector}: {}",
            context.formatters.format_period(&window)
        ));
    }
    Ok(())
}

fn handle_period(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: work period <name> [reference-date]".into(),
        ));
    };
    let reference = match args.get(1) {
        Some(raw) => parse_date(raw)?,
        None => context.today(),
    };

    let work = context.storage.load_work(name)?;
    let window = WorkService::billing_window(&work, reference)?;
    output::info(format!(
        "Billing window for `{}`: {}",
        work.name,
        context.formatters.format_period(&window)
    ));
    Ok(())
}

fn handle_active(context: &mut ShellContext, args: &[&str], active: bool) -> CommandResult {
    let Some(name) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: work <pause|resume> <name>".into(),
        ));
    };
    let mut work = context.storage.load_work(name)?;
    work.active = active;
    context.storage.save_work(&work)?;
    let state = if active { "resumed" } else { "paused" };
    output::success(format!("Work `{}` {}.", work.name, state));
    Ok(())
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    let names = context.storage.list_work()?;
    if names.is_empty() {
        output::info("No recurring work defined.");
        return Ok(());
    }
    for name in names {
        output::info(format!("  {name}"));
    }
    Ok(())
}

fn handle_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        return Err(CommandError::InvalidArguments("usage: work delete <name>".into()));
    };
    context.storage.delete_work(name)?;
    output::success(format!("Deleted work `{name}`."));
    Ok(())
}
