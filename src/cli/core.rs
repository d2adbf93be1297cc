//! Shell context construction, dispatch, and shared command helpers.

use std::{
    io,
    path::{Path, PathBuf},
};

use chrono::Local;
use strsim::levenshtein;
use tracing::{info, warn};

use crate::{
    config::ConfigManager,
    core::EditSession,
    errors::{CliError, ConfigError, LedgerError, SessionError},
    ingest,
    ledger::EventLedger,
};

use super::commands;
use super::io as cli_io;
use super::output::{self, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, Screen, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("No statement loaded. Use `load` or `new` first.")]
    NoStatement,
    #[error("Failed to load the statement. Use `load <path>` to open another file.")]
    StatementUnavailable,
    #[error("Failed to load the statement: {0}")]
    LoadFailed(String),
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_config_manager(mode, ConfigManager::from_env()?)
    }

    pub fn with_config_manager(
        mode: CliMode,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let config = config_manager.load()?;
        let mut registry = CommandRegistry::new();
        for entry in commands::all_definitions() {
            registry.register(entry);
        }

        let context = Self {
            mode,
            registry,
            config_manager,
            config,
            screen: Screen::Empty,
            statement_path: None,
            last_command: None,
            running: true,
        };
        context.apply_output_preferences();
        Ok(context)
    }

    /// Opens the configured statement, if any. A failure leaves the shell on
    /// the load-failed screen instead of aborting.
    pub fn startup(&mut self) -> Result<(), CliError> {
        let Some(path) = self.config.statement_path.clone() else {
            if self.mode == CliMode::Interactive {
                cli_io::print_info("No statement configured. Use `load <path>` or `new`.");
            }
            return Ok(());
        };
        let expenses = self.config.expenses_path.clone();
        if let Err(err) = self.open_statement(&path, expenses.as_deref()) {
            self.report_error(err)?;
        }
        Ok(())
    }

    pub(crate) fn apply_output_preferences(&self) {
        output::set_preferences(OutputPreferences {
            plain_mode: self.config.plain_output || self.mode == CliMode::Script,
        });
    }

    /// `(word, arguments)` for every accepted command word.
    pub(crate) fn command_words(&self) -> Vec<(&'static str, &'static str)> {
        self.registry
            .words()
            .filter_map(|word| self.registry.get(word).map(|entry| (word, entry.arguments())))
            .collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn prompt(&self) -> String {
        match &self.screen {
            Screen::Loaded(session) if session.is_editing() => {
                format!("bordero [{} *]> ", session.current().event.name)
            }
            Screen::Loaded(session) => format!("bordero [{}]> ", session.current().event.name),
            Screen::LoadFailed { .. } => "bordero [!]> ".to_string(),
            Screen::Empty => "bordero> ".to_string(),
        }
    }

    pub(crate) fn session(&self) -> Result<&EditSession, CommandError> {
        match &self.screen {
            Screen::Loaded(session) => Ok(session),
            Screen::Empty => Err(CommandError::NoStatement),
            Screen::LoadFailed { .. } => Err(CommandError::StatementUnavailable),
        }
    }

    pub(crate) fn session_mut(&mut self) -> Result<&mut EditSession, CommandError> {
        match &mut self.screen {
            Screen::Loaded(session) => Ok(session),
            Screen::Empty => Err(CommandError::NoStatement),
            Screen::LoadFailed { .. } => Err(CommandError::StatementUnavailable),
        }
    }

    /// Reads a statement (and optional expense sheet) and shows it.
    ///
    /// Expense failures only warn; the statement is still shown with no
    /// expenses.
    pub(crate) fn open_statement(&mut self, path: &Path, expenses: Option<&Path>) -> CommandResult {
        let report = match ingest::load_statement(path) {
            Ok(report) => report,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "statement load failed");
                self.screen = Screen::LoadFailed {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                };
                self.statement_path = None;
                return Err(CommandError::LoadFailed(err.to_string()));
            }
        };
        for warning in &report.warnings {
            cli_io::print_warning(warning);
        }

        let mut ledger = report.ledger;
        if let Some(expenses_path) = expenses {
            match ingest::load_expenses(expenses_path) {
                Ok(expense_report) => {
                    for warning in &expense_report.warnings {
                        cli_io::print_warning(warning);
                    }
                    ledger = ledger.with_expenses(expense_report.expenses);
                }
                Err(err) => {
                    cli_io::print_warning(format!("Expenses unavailable: {}", err));
                }
            }
        }

        cli_io::print_success(format!("Statement `{}` loaded.", ledger.event.name));
        info!(path = %path.display(), "statement opened");
        self.screen = Screen::Loaded(EditSession::new(ledger));
        self.statement_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Blank statement dated today, using the configured partner name.
    pub(crate) fn template(&self) -> EventLedger {
        EventLedger::template(Local::now().date_naive(), &self.config.partner_name)
    }

    /// Asks before throwing away an unsaved working copy. Script mode never
    /// prompts.
    pub(crate) fn confirm_discard(&self) -> Result<bool, CommandError> {
        let editing = self.session_opt().map_or(false, EditSession::is_editing);
        if !editing {
            return Ok(true);
        }
        if self.mode == CliMode::Script {
            cli_io::print_warning("Unsaved edits discarded.");
            return Ok(true);
        }
        Ok(cli_io::confirm_action("Discard unsaved edits?")?)
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn export_dir(&self, override_dir: Option<&str>) -> PathBuf {
        override_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| self.config.resolve_export_dir())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = crate::cli::shell::parse_command_line(line)
            .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
        let Some((first, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        self.dispatch(&first.to_lowercase(), first, &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .words()
            .map(|key| (levenshtein(key, &needle), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        let prompt = if self.session_opt().map_or(false, EditSession::is_editing) {
            "Exit shell and discard unsaved edits?"
        } else {
            "Exit shell?"
        };
        Ok(cli_io::confirm_action(prompt)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::NoStatement => {
                cli_io::print_error(CommandError::NoStatement);
                cli_io::print_hint("Try `new` to start a blank statement.");
                Ok(())
            }
            CommandError::Session(SessionError::InvalidTransition { action, state }) => {
                cli_io::print_error(format!("Cannot {} while {}.", action, state));
                if state == "viewing" {
                    cli_io::print_hint("Use `edit` to start editing.");
                } else {
                    cli_io::print_hint("Use `save` or `cancel` to finish editing first.");
                }
                Ok(())
            }
            other => {
                cli_io::print_error(other);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn context() -> (TempDir, ShellContext) {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path()).unwrap();
        let context = ShellContext::with_config_manager(CliMode::Script, manager).unwrap();
        (dir, context)
    }

    #[test]
    fn ledger_commands_require_a_statement() {
        let (_dir, mut context) = context();
        let err = context.process_line("edit").unwrap_err();
        assert!(matches!(err, CommandError::NoStatement));
    }

    #[test]
    fn unknown_command_keeps_running() {
        let (_dir, mut context) = context();
        let control = context.process_line("shwo").unwrap();
        assert_eq!(control, LoopControl::Continue);
    }

    #[test]
    fn failed_load_blocks_ledger_commands() {
        let (dir, mut context) = context();
        let missing = dir.path().join("missing.csv");
        let err = context
            .process_line(&format!("load {}", missing.display()))
            .unwrap_err();
        assert!(matches!(err, CommandError::LoadFailed(_)));
        assert!(matches!(context.screen, Screen::LoadFailed { .. }));

        let err = context.process_line("new").unwrap_err();
        assert!(matches!(err, CommandError::StatementUnavailable));
        assert_eq!(context.prompt(), "bordero [!]> ");
    }

    #[test]
    fn new_statement_starts_in_editing_mode() {
        let (_dir, mut context) = context();
        context.process_line("new").unwrap();
        let session = context.session().unwrap();
        assert!(session.is_editing());
        assert_eq!(context.prompt(), "bordero [Novo Evento *]> ");
    }

    #[test]
    fn en_us_locale_reads_what_it_prints() {
        let (_dir, mut context) = context();
        context.process_line("config locale en-US").unwrap();
        context.process_line("new").unwrap();
        context
            .process_line("set gross 1 \"R$ 1,234.56\"")
            .unwrap();
        let ledger = context.session().unwrap().current();
        assert_eq!(ledger.revenues[0].gross, Decimal::new(123456, 2));
        assert_eq!(ledger.total_gross, Decimal::new(123456, 2));
    }

    #[test]
    fn export_rejects_an_unknown_format_word() {
        let (_dir, mut context) = context();
        let err = context.process_line("export pdf").unwrap_err();
        assert!(matches!(
            err,
            CommandError::Ledger(LedgerError::UnknownFormat(ref name)) if name == "pdf"
        ));
    }

    #[test]
    fn oversized_gross_is_reported_and_the_shell_keeps_running() {
        let (_dir, mut context) = context();
        context.process_line("new").unwrap();
        let max = "79228162514264337593543950335";
        context.process_line(&format!("set gross 1 {max}")).unwrap();
        let err = context
            .process_line(&format!("set gross 2 {max}"))
            .unwrap_err();
        assert!(matches!(
            err,
            CommandError::Session(SessionError::Ledger(LedgerError::Overflow(_)))
        ));
        assert_eq!(context.process_line("show").unwrap(), LoopControl::Continue);
    }

    #[test]
    fn exit_command_stops_the_loop() {
        let (_dir, mut context) = context();
        assert_eq!(context.process_line("exit").unwrap(), LoopControl::Exit);
    }
}
