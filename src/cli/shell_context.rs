use std::path::PathBuf;

use crate::{
    config::{Config, ConfigManager},
    core::EditSession,
};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// What the shell is currently showing.
#[derive(Debug)]
pub enum Screen {
    /// Nothing loaded yet.
    Empty,
    Loaded(EditSession),
    /// The last load attempt failed. Ledger commands are refused until an
    /// explicit `load` succeeds.
    LoadFailed { path: PathBuf, reason: String },
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub screen: Screen,
    /// File the loaded statement came from, if any.
    pub statement_path: Option<PathBuf>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn session_opt(&self) -> Option<&EditSession> {
        match &self.screen {
            Screen::Loaded(session) => Some(session),
            _ => None,
        }
    }

    pub fn status(&self) -> String {
        let screen = match &self.screen {
            Screen::Empty => "empty".to_string(),
            Screen::Loaded(session) => format!(
                "{} ({})",
                session.current().event.name,
                session.mode()
            ),
            Screen::LoadFailed { path, .. } => format!("load failed: {}", path.display()),
        };
        format!(
            "ShellContext {{ running: {}, last_command: {:?}, screen: {} }}",
            self.running, self.last_command, screen
        )
    }
}
