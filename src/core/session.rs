//! Viewing/Editing state machine around a committed statement and its
//! working copy.

use std::fmt;

use tracing::info;

use crate::{currency::LocaleConfig, errors::SessionError, ledger::EventLedger};

use super::engine::{Field, LedgerEdit, TotalsEngine};

/// Toast-style feedback emitted by session transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
}

impl Notification {
    fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    Viewing,
    Editing { working: EventLedger },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Viewing,
    Editing,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionMode::Viewing => f.write_str("viewing"),
            SessionMode::Editing => f.write_str("editing"),
        }
    }
}

/// Owns the committed statement and, while editing, an independent working
/// copy. Edits never reach the committed value until [`EditSession::commit`].
#[derive(Debug, Clone)]
pub struct EditSession {
    committed: EventLedger,
    state: SessionState,
}

impl EditSession {
    /// Starts viewing a freshly loaded statement.
    pub fn new(committed: EventLedger) -> Self {
        Self {
            committed,
            state: SessionState::Viewing,
        }
    }

    /// Starts a session on a blank template, already in editing mode.
    pub fn from_template(template: EventLedger) -> (Self, Notification) {
        let mut session = Self::new(template.clone());
        let notification = session.install_template(template);
        (session, notification)
    }

    pub fn mode(&self) -> SessionMode {
        match self.state {
            SessionState::Viewing => SessionMode::Viewing,
            SessionState::Editing { .. } => SessionMode::Editing,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.mode() == SessionMode::Editing
    }

    pub fn committed(&self) -> &EventLedger {
        &self.committed
    }

    pub fn working(&self) -> Option<&EventLedger> {
        match &self.state {
            SessionState::Editing { working } => Some(working),
            SessionState::Viewing => None,
        }
    }

    /// The statement on screen: the working copy while editing.
    pub fn current(&self) -> &EventLedger {
        self.working().unwrap_or(&self.committed)
    }

    pub fn begin_edit(&mut self) -> Result<(), SessionError> {
        self.require(SessionMode::Viewing, "start editing")?;
        self.state = SessionState::Editing {
            working: self.committed.clone(),
        };
        info!(event = %self.committed.event.name, "edit session started");
        Ok(())
    }

    /// Applies an edit to the working copy.
    pub fn apply(&mut self, edit: &LedgerEdit) -> Result<(), SessionError> {
        match &mut self.state {
            SessionState::Editing { working } => {
                *working = TotalsEngine::recompute(working, edit)?;
                Ok(())
            }
            SessionState::Viewing => Err(invalid("change a field", SessionMode::Viewing)),
        }
    }

    /// Parses raw typed text for `field` and applies it.
    pub fn apply_input(&mut self, field: Field, raw: &str) -> Result<(), SessionError> {
        self.apply(&field.edit(raw))
    }

    /// Like [`EditSession::apply_input`], reading numbers the `locale` way.
    pub fn apply_input_in(
        &mut self,
        field: Field,
        raw: &str,
        locale: &LocaleConfig,
    ) -> Result<(), SessionError> {
        self.apply(&field.edit_in(raw, locale))
    }

    pub fn commit(&mut self) -> Result<Notification, SessionError> {
        self.require(SessionMode::Editing, "save")?;
        if let SessionState::Editing { working } =
            std::mem::replace(&mut self.state, SessionState::Viewing)
        {
            self.committed = working;
        }
        info!(event = %self.committed.event.name, "edit session committed");
        Ok(Notification::success("Values saved successfully!"))
    }

    pub fn discard(&mut self) -> Result<Notification, SessionError> {
        self.require(SessionMode::Editing, "cancel")?;
        self.state = SessionState::Viewing;
        info!(event = %self.committed.event.name, "edit session discarded");
        Ok(Notification::info("Editing cancelled."))
    }

    /// Replaces both copies with `template` and leaves the session editing.
    pub fn new_ledger(&mut self, template: EventLedger) -> Notification {
        self.install_template(template)
    }

    fn install_template(&mut self, template: EventLedger) -> Notification {
        self.committed = template.clone();
        self.state = SessionState::Editing { working: template };
        info!("blank statement created");
        Notification::success("New statement created! Fill in the values.")
    }

    fn require(&self, expected: SessionMode, action: &'static str) -> Result<(), SessionError> {
        let mode = self.mode();
        if mode == expected {
            Ok(())
        } else {
            Err(invalid(action, mode))
        }
    }
}

fn invalid(action: &'static str, mode: SessionMode) -> SessionError {
    SessionError::InvalidTransition {
        action,
        state: match mode {
            SessionMode::Viewing => "viewing",
            SessionMode::Editing => "editing",
        },
    }
}
