use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use tracing::warn;

/// Blocking dialogs a view may raise: a yes/no confirmation and an alert.
pub trait Prompt: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
    fn alert(&self, message: &str);
}

/// Interactive prompt on the controlling terminal.
#[derive(Default)]
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl Prompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> bool {
        match Confirm::with_theme(&self.theme)
            .with_prompt(message)
            .default(false)
            .interact()
        {
            Ok(answer) => answer,
            Err(err) => {
                warn!("Confirmation prompt failed: {}", err);
                false
            }
        }
    }

    fn alert(&self, message: &str) {
        println!("{} {}", "✖".red().bold(), message.red());
    }
}
