use std::collections::BTreeMap;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// A shell command and the words that invoke it.
pub struct CommandEntry {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            aliases: &[],
            description,
            usage,
            handler,
        }
    }

    pub fn with_aliases(self, aliases: &'static [&'static str]) -> Self {
        Self { aliases, ..self }
    }

    /// Usage text after the command word, e.g. `[txt|json] [dir]`.
    pub fn arguments(&self) -> &'static str {
        self.usage
            .strip_prefix(self.name)
            .map(str::trim_start)
            .unwrap_or(self.usage)
    }
}

/// Commands in registration order, addressable by name or alias.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    lookup: BTreeMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entry`. Words already taken by an earlier command keep pointing
    /// at it.
    pub fn register(&mut self, entry: CommandEntry) {
        let index = self.entries.len();
        for word in std::iter::once(entry.name).chain(entry.aliases.iter().copied()) {
            self.lookup.entry(word).or_insert(index);
        }
        self.entries.push(entry);
    }

    pub fn get(&self, word: &str) -> Option<&CommandEntry> {
        self.lookup.get(word).map(|&index| &self.entries[index])
    }

    pub fn handler(&self, word: &str) -> Option<CommandHandler> {
        self.get(word).map(|entry| entry.handler)
    }

    pub fn list(&self) -> impl Iterator<Item = &CommandEntry> {
        self.entries.iter()
    }

    /// Every accepted word, aliases included, sorted.
    pub fn words(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.lookup.keys().copied()
    }
}
