use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::core::{Notification, NotificationKind};

pub use crate::cli::output::{error as print_error, info as print_info};
pub use crate::cli::output::{success as print_success, warning as print_warning};

/// Shows a session notification the way a toast would appear.
pub fn notify(notification: &Notification) {
    match notification.kind {
        NotificationKind::Success => print_success(&notification.message),
        NotificationKind::Info => print_info(&notification.message),
    }
}

pub fn print_hint(message: impl std::fmt::Display) {
    println!("  hint: {}", message);
}

/// Prompt the user for confirmation with a yes/no question.
pub fn confirm_action(prompt: &str) -> Result<bool, dialoguer::Error> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
}
