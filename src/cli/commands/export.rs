use chrono::Local;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::core::SessionMode;
use crate::errors::SessionError;
use crate::report::{self, ReportFormat};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "export",
        "Write the statement report to a file",
        "export [txt|json] [dir]",
        cmd_export,
    )]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (format, dir) = match args {
        [] => (ReportFormat::Text, None),
        [first] => match first.parse::<ReportFormat>() {
            Ok(format) => (format, None),
            Err(_) if looks_like_dir(first) => (ReportFormat::Text, Some(*first)),
            Err(err) => return Err(err.into()),
        },
        [format, dir] => (format.parse::<ReportFormat>()?, Some(*dir)),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: export [txt|json] [dir]".into(),
            ))
        }
    };

    let session = context.session()?;
    if session.mode() == SessionMode::Editing {
        return Err(SessionError::InvalidTransition {
            action: "export",
            state: "editing",
        }
        .into());
    }

    let dir = context.export_dir(dir);
    let options = context.config.report_options();
    let today = Local::now().date_naive();
    let path = report::export_report(session.committed(), &options, &dir, format, today)?;
    io::print_success(format!("Statement exported to {}", path.display()));
    Ok(())
}

/// A lone argument is only a directory when it reads as a path.
fn looks_like_dir(arg: &str) -> bool {
    arg.contains(['/', '\\']) || matches!(arg, "." | "..")
}
