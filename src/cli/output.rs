//! Colored terminal output helpers with global presentation preferences.

use std::fmt;
use std::sync::RwLock;

use colored::Colorize;
use once_cell::sync::Lazy;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OutputPreferences {
    /// Suppresses color and decoration, used in script mode.
    pub plain_output: bool,
}

static PREFERENCES: Lazy<RwLock<OutputPreferences>> =
    Lazy::new(|| RwLock::new(OutputPreferences::default()));

pub fn set_preferences(prefs: OutputPreferences) {
    if let Ok(mut guard) = PREFERENCES.write() {
        *guard = prefs;
    }
}

fn preferences() -> OutputPreferences {
    PREFERENCES.read().map(|guard| *guard).unwrap_or_default()
}

fn emit(kind: MessageKind, message: impl fmt::Display) {
    let prefs = preferences();
    let text = message.to_string();
    if prefs.plain_output {
        match kind {
            MessageKind::Error => eprintln!("[x] {text}"),
            MessageKind::Warning => println!("[!] {text}"),
            _ => println!("{text}"),
        }
        return;
    }
    match kind {
        MessageKind::Info => println!("{text}"),
        MessageKind::Success => println!("{}", text.green()),
        MessageKind::Warning => println!("{}", text.yellow()),
        MessageKind::Error => eprintln!("{}", text.red().bold()),
    }
}

pub fn info(message: impl fmt::Display) {
    emit(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    emit(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    emit(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    emit(MessageKind::Error, message);
}

/// Prints a section header followed by its underline.
pub fn section(title: impl fmt::Display) {
    let text = title.to_string();
    if preferences().plain_output {
        println!("{text}");
    } else {
        println!("{}", text.bold());
    }
    println!("{}", "-".repeat(text.chars().count()));
}

/// Prints aligned label/value rows.
pub fn two_column(rows: &[(&str, &str)]) {
    let width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    for (label, value) in rows {
        println!("  {label:<width$}  {value}");
    }
}
