use std::io::{self, BufRead};

/// Source of operator yes/no answers
pub trait Confirm {
    /// Block until the operator answers. Anything but an explicit yes is no.
    fn confirm(&mut self) -> bool;
}

/// Reads the answer from a line of standard input
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self) -> bool {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(_) => is_yes(&line),
            Err(e) => {
                log::warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
