//! Shared runtime state for CLI interactions and command execution.

use std::{
    env,
    path::PathBuf,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Confirm};

use tally_config::{Config, ConfigManager};
use tally_core::{storage::SequenceStore, Clock, SequenceService};
use tally_domain::SequenceConfig;
use tally_storage_json::{JsonBillingStorage, StoragePaths};

use crate::cli::core::{CommandError, LoopControl};
use crate::cli::formatters::CliFormatters;
use crate::cli::registry::CommandRegistry;
use crate::cli::{commands, output};
use crate::errors::CliError;

/// Environment variable that switches the shell into script mode.
pub const SCRIPT_MODE_ENV: &str = "BILLING_CORE_CLI_SCRIPT";
/// Environment variable overriding where config and data live. Used by tests.
pub const DATA_DIR_ENV: &str = "BILLING_CORE_DATA_DIR";

/// Sequence key used for invoice numbering.
pub const INVOICE_SEQUENCE_KEY: &str = "invoice";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub storage: JsonBillingStorage,
    pub clock: Arc<dyn Clock>,
    pub formatters: CliFormatters,
    pub config_manager: ConfigManager,
    pub config: Arc<RwLock<Config>>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let override_root = env::var_os(DATA_DIR_ENV).map(PathBuf::from);
        let base = override_root.clone().unwrap_or_else(default_base_dir);

        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;
        let data_root = match &override_root {
            Some(root) => root.join("data"),
            None => config.resolve_data_root(),
        };
        let storage = JsonBillingStorage::new(StoragePaths::under(&data_root))?;

        let config = Arc::new(RwLock::new(config));
        let formatters = CliFormatters::new(Arc::clone(&config));

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        tracing::debug!(data_root = %data_root.display(), "shell context ready");

        Ok(Self {
            mode,
            registry,
            storage,
            clock: Arc::new(crate::cli::system_clock::SystemClock),
            formatters,
            config_manager,
            config,
            last_command: None,
            running: true,
        })
    }

    pub fn command(&self, name: &str) -> Option<&crate::cli::registry::CommandEntry> {
        self.registry.get(name)
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.handler(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub fn suggest_command(&self, input: &str) {
        match self.registry.suggest(input) {
            Some(suggestion) => {
                output::warning(format!("Unknown command `{input}`. Did you mean `{suggestion}`?"))
            }
            None => output::warning(format!(
                "Unknown command `{input}`. Use `help` to list commands."
            )),
        }
    }

    pub fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        output::error(err);
        Ok(())
    }

    pub fn prompt(&self) -> String {
        "billing> ".to_string()
    }

    pub fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Exit the shell?")
            .default(true)
            .interact()
            .map_err(|err| CliError::Command(err.to_string()))
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn config_read(&self) -> RwLockReadGuard<'_, Config> {
        self.config.read().expect("Config lock poisoned")
    }

    pub fn config_write(&self) -> RwLockWriteGuard<'_, Config> {
        self.config.write().expect("Config lock poisoned")
    }

    pub fn save_config(&self) -> Result<(), CommandError> {
        let snapshot = self.config_read().clone();
        self.config_manager.save(&snapshot)?;
        Ok(())
    }

    /// Registers the default invoice sequence on first use.
    pub fn ensure_invoice_sequence(&self) -> Result<(), CommandError> {
        if self.storage.get(INVOICE_SEQUENCE_KEY).is_ok() {
            return Ok(());
        }
        let config = SequenceConfig::new(INVOICE_SEQUENCE_KEY, "INV", "", 6, true, 1)
            .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
        self.storage.define(&config)?;
        tracing::info!("registered default invoice sequence");
        Ok(())
    }

    /// Mints the next invoice number.
    pub fn next_invoice_number(&self) -> Result<String, CommandError> {
        self.ensure_invoice_sequence()?;
        Ok(SequenceService::issue(&self.storage, INVOICE_SEQUENCE_KEY)?)
    }
}

fn default_base_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("billing-core")
}
