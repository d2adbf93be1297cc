use std::{
    borrow::Cow,
    io::{self, BufRead},
};

use colored::Colorize;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Context as ReadlineContext, Editor, Helper,
};

use crate::cli::commands::edit::SET_FIELDS;
use crate::cli::core::{CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output::{info as output_info, warning as output_warning};
use crate::config::CONFIG_KEYS;
use crate::errors::CliError;

/// Environment variable that switches the shell to line-by-line stdin input.
pub const SCRIPT_ENV: &str = "BORDERO_CLI_SCRIPT";

const EXPORT_FORMATS: &[&str] = &["txt", "json"];

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    context.startup()?;

    let mut input: Box<dyn LineSource> = match mode {
        CliMode::Interactive => Box::new(PromptInput::new(&context)?),
        CliMode::Script => Box::new(ScriptInput::new()),
    };
    run_loop(&mut context, input.as_mut())
}

enum ReadOutcome {
    Line(String),
    Interrupted,
    Closed,
}

/// Where command lines come from.
trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, CliError>;

    fn remember(&mut self, _line: &str) {}
}

struct PromptInput {
    editor: Editor<ShellHelper, DefaultHistory>,
}

impl PromptInput {
    fn new(context: &ShellContext) -> Result<Self, CliError> {
        let mut editor = Editor::<ShellHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(ShellHelper::new(context.command_words())));
        Ok(Self { editor })
    }
}

impl LineSource for PromptInput {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, CliError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Closed),
            Err(err) => Err(err.into()),
        }
    }

    fn remember(&mut self, line: &str) {
        let line = line.trim();
        if !line.is_empty() {
            let _ = self.editor.add_history_entry(line);
        }
    }
}

struct ScriptInput {
    lines: io::Lines<io::StdinLock<'static>>,
}

impl ScriptInput {
    fn new() -> Self {
        Self {
            lines: io::stdin().lock().lines(),
        }
    }
}

impl LineSource for ScriptInput {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadOutcome, CliError> {
        match self.lines.next() {
            Some(line) => Ok(ReadOutcome::Line(line?)),
            None => Ok(ReadOutcome::Closed),
        }
    }
}

fn run_loop(context: &mut ShellContext, input: &mut dyn LineSource) -> Result<(), CliError> {
    while context.running {
        let prompt = context.prompt();
        match input.read_line(&prompt)? {
            ReadOutcome::Line(line) => {
                input.remember(&line);
                match handle_line(context, &line) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err)?,
                }
            }
            ReadOutcome::Interrupted => {
                if context.confirm_exit()? {
                    break;
                }
            }
            ReadOutcome::Closed => {
                if context.mode == CliMode::Interactive {
                    output_info("Leaving bordero.");
                }
                break;
            }
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output_warning(err);
            return Ok(LoopControl::Continue);
        }
    };

    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.last_command = Some(line.to_string());

    let control = context.dispatch(&raw.to_lowercase(), raw, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, shell_words::ParseError> {
    shell_words::split(input)
}

/// Completes command words and the first argument of `set`, `export`,
/// `config` and `help`; hints the remaining usage after a bare command.
struct ShellHelper {
    commands: Vec<(&'static str, &'static str)>,
}

impl ShellHelper {
    fn new(commands: Vec<(&'static str, &'static str)>) -> Self {
        Self { commands }
    }

    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let needle = prefix[start..].to_lowercase();
        let words: Vec<&str> = prefix[..start].split_whitespace().collect();

        let pool: Vec<&str> = match words.as_slice() {
            [] => self.commands.iter().map(|(word, _)| *word).collect(),
            ["set"] => SET_FIELDS.to_vec(),
            ["export"] => EXPORT_FORMATS.to_vec(),
            ["config"] => CONFIG_KEYS.to_vec(),
            ["help"] => self.commands.iter().map(|(word, _)| *word).collect(),
            _ => Vec::new(),
        };
        let matches = pool
            .into_iter()
            .filter(|word| word.starts_with(&needle))
            .map(str::to_string)
            .collect();
        (start, matches)
    }

    fn usage_hint(&self, line: &str, pos: usize) -> Option<String> {
        if pos != line.len() || !line.ends_with(' ') {
            return None;
        }
        let mut words = line.split_whitespace();
        let command = words.next()?.to_lowercase();
        if words.next().is_some() {
            return None;
        }
        self.commands
            .iter()
            .find(|(word, _)| *word == command)
            .map(|(_, arguments)| arguments.to_string())
            .filter(|arguments| !arguments.is_empty())
    }
}

impl Helper for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = self.candidates(line, pos);
        let pairs = words
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        self.usage_hint(line, pos)
    }
}

impl Highlighter for ShellHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }
}

impl Validator for ShellHelper {}
