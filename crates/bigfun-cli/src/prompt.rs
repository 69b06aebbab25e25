//! Terminal prompts for missing settings

use bigfun_core::{Error, Prompter, Result};
use dialoguer::Input;

/// Prompts on the controlling terminal
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn prompt(&mut self, text: &str, default: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(text)
            .default(default.to_string())
            .interact_text()
            .map_err(|e| Error::Prompt {
                prompt: text.to_string(),
                message: e.to_string(),
            })
    }
}
