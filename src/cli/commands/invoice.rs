use chrono::NaiveDate;
use rust_decimal::Decimal;

use tally_core::{
    storage::{invoice_warnings, BillingStorage},
    BillingService, CurrencyFormatter, DateFormatter, PeriodService, RecurrenceService,
};
use tally_domain::Invoice;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "invoice",
        "Create and inspect customer invoices",
        "invoice <new|line|discount|period|show|export|list|delete> ...",
        cmd_invoice,
    )]
}

fn cmd_invoice(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::InvalidArguments(
            "usage: invoice <new|line|discount|period|show|export|list|delete>".into(),
        ));
    }
    match args[0].to_lowercase().as_str() {
        "new" => handle_new(context, &args[1..]),
        "line" => handle_line(context, &args[1..]),
        "discount" => handle_discount(context, &args[1..]),
        "period" => handle_period(context, &args[1..]),
        "show" => handle_show(context, &args[1..]),
        "export" => handle_export(context, &args[1..]),
        "list" => handle_list(context),
        "delete" => handle_delete(context, &args[1..]),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown invoice subcommand `{}`",
            other
        ))),
    }
}

fn handle_new(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(customer) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: invoice new <customer> [issue-date]".into(),
        ));
    };
    let issue_date = match args.get(1) {
        Some(raw) => parse_date(raw)?,
        None => context.today(),
    };

    let number = context.next_invoice_number()?;
    let invoice = Invoice::new(number.clone(), *customer, issue_date);
    context.storage.save_invoice(&invoice)?;

    tracing::info!(invoice = %number, "invoice created");
    output::success(format!("Created invoice {} for {}.", number, customer));
    Ok(())
}

fn handle_line(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(CommandError::InvalidArguments(
            "usage: invoice line <number> <description> [quantity] [rate] [tax%]".into(),
        ));
    }
    let mut invoice = context.storage.load_invoice(args[0])?;

    // Missing or unparseable amount fields fall back to zero, matching the
    // forms this flow was lifted from. Negative values are still rejected.
    let line = BillingService::line_from_input(
        args[1],
        args.get(2).copied(),
        args.get(3).copied(),
        args.get(4).copied(),
    );
    let amounts = BillingService::compute_line(&line)?;

    invoice.push_line(line);
    context.storage.save_invoice(&invoice)?;

    output::success(format!(
        "Added line to {}: {}",
        invoice.number,
        context.formatters.format_amount(amounts.total, "")
    ));
    Ok(())
}

fn handle_discount(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(CommandError::InvalidArguments(
            "usage: invoice discount <number> <amount>".into(),
        ));
    }
    let discount = args[1].parse::<Decimal>().map_err(|_| {
        CommandError::InvalidArguments(format!("discount `{}` is not a number", args[1]))
    })?;

    let mut invoice = context.storage.load_invoice(args[0])?;
    // Validates sign and surfaces the credit case before anything persists.
    let totals = BillingService::compute_totals(&invoice.line_items, discount)?;
    invoice.set_discount(discount);
    context.storage.save_invoice(&invoice)?;

    if totals.is_credit() {
        output::warning(format!(
            "Discount exceeds subtotal plus tax; {} is now a credit note.",
            invoice.number
        ));
    }
    output::success(format!("Discount set on {}.", invoice.number));
    Ok(())
}

fn handle_period(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(number) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: invoice period <number> <cadence> [anchor] [selector]".into(),
        ));
    };
    let Some(cadence) = args.get(1) else {
        return Err(CommandError::InvalidArguments(
            "usage: invoice period <number> <cadence> [anchor] [selector]".into(),
        ));
    };
    let (anchor, selector) = split_anchor_selector(&args[2..]);

    let descriptor = RecurrenceService::parse(cadence, anchor, selector)?;
    let period = PeriodService::resolve(&descriptor, context.today())?;

    let mut invoice = context.storage.load_invoice(number)?;
    invoice.service_period = Some(period);
    context.storage.save_invoice(&invoice)?;

    output::success(format!(
        "Service period on {}: {}",
        invoice.number,
        context.formatters.format_period(&period)
    ));
    Ok(())
}

fn handle_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(number) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: invoice show <number>".into(),
        ));
    };
    let invoice = context.storage.load_invoice(number)?;
    let formatters = &context.formatters;

    output::section(format!("Invoice {}", invoice.number));
    let issued = formatters.format_date(invoice.issue_date);
    let mut rows = vec![
        ("Customer", invoice.customer.clone()),
        ("Issued", issued),
    ];
    if let Some(period) = &invoice.service_period {
        rows.push(("Service period", formatters.format_period(period)));
    }
    let borrowed: Vec<_> = rows
        .iter()
        .map(|(label, value)| (*label, value.as_str()))
        .collect();
    output::two_column(&borrowed);

    if invoice.is_empty() {
        output::info("No line items yet.");
    }
    for item in &invoice.line_items {
        let amounts = BillingService::compute_line(item)?;
        output::info(format!(
            "  {} | {} x {} (+{}% tax) = {}",
            item.description,
            item.quantity,
            formatters.format_amount(item.unit_rate, ""),
            item.tax_rate_percent,
            formatters.format_amount(amounts.total, ""),
        ));
    }

    let totals = BillingService::invoice_totals(&invoice)?;
    let subtotal = formatters.format_amount(totals.subtotal, "");
    let tax_total = formatters.format_amount(totals.tax_total, "");
    let discount = formatters.format_amount(totals.discount, "");
    let grand_total = formatters.format_amount(totals.grand_total, "");
    output::two_column(&[
        ("Subtotal", subtotal.as_str()),
        ("Tax", tax_total.as_str()),
        ("Discount", discount.as_str()),
        ("Grand total", grand_total.as_str()),
    ]);

    for warning in invoice_warnings(&invoice) {
        output::warning(warning);
    }
    Ok(())
}

fn handle_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(number) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: invoice export <number>".into(),
        ));
    };
    let invoice = context.storage.load_invoice(number)?;
    let json = serde_json::to_string_pretty(&invoice)
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
    output::info(json);
    Ok(())
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    let numbers = context.storage.list_invoices()?;
    if numbers.is_empty() {
        output::info("No invoices stored.");
        return Ok(());
    }
    for number in numbers {
        output::info(format!("  {number}"));
    }
    Ok(())
}

fn handle_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(number) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: invoice delete <number>".into(),
        ));
    };
    context.storage.delete_invoice(number)?;
    output::success(format!("Deleted invoice {number}."));
    Ok(())
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    raw.parse::<NaiveDate>().map_err(|_| {
        CommandError::InvalidArguments(format!("date `{}` is not YYYY-MM-DD", raw))
    })
}

/// Splits trailing recurrence args into anchor and selector tokens.
pub(crate) fn split_anchor_selector<'a>(args: &[&'a str]) -> (Option<&'a str>, Option<&'a str>) {
    let mut anchor = None;
    let mut selector = None;
    for arg in args {
        match arg.to_lowercase().as_str() {
            "previous" | "current" | "next" => selector = Some(*arg),
            _ => anchor = Some(*arg),
        }
    }
    (anchor, selector)
}
