use std::io::{BufRead, Write};

/// Suspension point between walkthrough steps.
pub trait Confirmation {
    fn wait(&self, prompt: &str);
}

/// Blocks until the operator sends a line on the controlling terminal.
/// Any input resumes; there is no timeout.
pub struct StdinConfirmation;

impl Confirmation for StdinConfirmation {
    fn wait(&self, prompt: &str) {
        print!("\n{prompt}");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        let _ = std::io::stdin().lock().read_line(&mut line);
    }
}

/// Resumes immediately, for unattended runs.
pub struct AutoResume;

impl Confirmation for AutoResume {
    fn wait(&self, _prompt: &str) {}
}
