use std::io::{self, BufRead, Write};

use super::gate::Prompter;

/// Interactive prompter: hidden secret entry, Y/N retry question on stdin.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn read_secret(&mut self) -> io::Result<String> {
        rpassword::prompt_password("Enter Password: ")
    }

    fn confirm_retry(&mut self) -> io::Result<bool> {
        println!("Incorrect Password");
        print!("Would you like to try again? (Y/N): ");
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}

fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}
