//! Line-oriented terminal front end.
//!
//! Each input line is parsed into a [`Command`] which expands to the
//! [`UiEvent`]s a user would produce in the form, rows and filter bar.

use crate::view::UiEvent;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use todolist_core::environment::Confirm;

/// Usage text printed by `help`
pub const HELP: &str = "\
Commands:
  add <YYYY-MM-DD> <description>   add a task
  toggle <id>                      mark a task done / not done
  delete <id>                      delete a task (asks first)
  filter <all|active|completed>    choose which tasks are listed
  show                             print the list
  html                             print the rendered markup
  help                             show this help
  quit                             exit";

/// Errors from parsing a shell line
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// First word is not a known command
    #[error("unknown command `{0}` (try `help`)")]
    UnknownCommand(String),
    /// A required argument is missing
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        /// Command name
        command: &'static str,
        /// Human description of the argument
        argument: &'static str,
    },
}

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fill the form and submit it
    Add {
        /// Date field value
        due_date: String,
        /// Description field value
        description: String,
    },
    /// Change a row's checkbox
    Toggle(String),
    /// Click a row's delete control
    Delete(String),
    /// Click a filter control
    Filter(String),
    /// Print the list
    Show,
    /// Print the markup
    Html,
    /// Print usage
    Help,
    /// Leave the shell
    Quit,
    /// Blank line
    Nothing,
}

impl Command {
    /// Parses one input line
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] for unknown commands or missing row ids / filter values.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(name, rest)| (name, rest.trim()));

        match name.to_ascii_lowercase().as_str() {
            "" => Ok(Self::Nothing),
            "add" => {
                let (due_date, description) = rest
                    .split_once(char::is_whitespace)
                    .map_or((rest, ""), |(date, description)| (date, description.trim()));
                Ok(Self::Add {
                    due_date: due_date.to_string(),
                    description: description.to_string(),
                })
            },
            "toggle" => Self::required(rest, "toggle", "a task id").map(Self::Toggle),
            "delete" | "rm" => Self::required(rest, "delete", "a task id").map(Self::Delete),
            "filter" => {
                Self::required(rest, "filter", "one of all, active, completed").map(Self::Filter)
            },
            "show" | "ls" => Ok(Self::Show),
            "html" => Ok(Self::Html),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(ParseError::UnknownCommand(other.to_string())),
        }
    }

    fn required(
        rest: &str,
        command: &'static str,
        argument: &'static str,
    ) -> Result<String, ParseError> {
        if rest.is_empty() {
            Err(ParseError::MissingArgument { command, argument })
        } else {
            Ok(rest.to_string())
        }
    }

    /// Gestures this command stands for
    #[must_use]
    pub fn into_events(self) -> Vec<UiEvent> {
        match self {
            Self::Add {
                due_date,
                description,
            } => vec![
                UiEvent::TaskInput(description),
                UiEvent::DateInput(due_date),
                UiEvent::Submit,
            ],
            Self::Toggle(data_id) => vec![UiEvent::CheckboxChanged { data_id }],
            Self::Delete(data_id) => vec![UiEvent::DeleteClicked { data_id }],
            Self::Filter(data_filter) => vec![UiEvent::FilterClicked { data_filter }],
            Self::Show | Self::Html | Self::Help | Self::Quit | Self::Nothing => Vec::new(),
        }
    }
}

/// Asks for confirmation on the terminal, defaulting to no
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, message: &str) -> bool {
        print!("{message} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_multi_word_description() {
        assert_eq!(
            Command::parse("add 2024-01-10   Buy oat milk ").unwrap(),
            Command::Add {
                due_date: "2024-01-10".to_string(),
                description: "Buy oat milk".to_string(),
            }
        );
    }

    #[test]
    fn add_without_description_still_submits() {
        let command = Command::parse("add 2024-01-10").unwrap();
        assert_eq!(
            command.into_events(),
            vec![
                UiEvent::TaskInput(String::new()),
                UiEvent::DateInput("2024-01-10".to_string()),
                UiEvent::Submit,
            ]
        );
    }

    #[test]
    fn parses_row_and_filter_commands() {
        assert_eq!(Command::parse("toggle 42").unwrap(), Command::Toggle("42".to_string()));
        assert_eq!(Command::parse("RM 42").unwrap(), Command::Delete("42".to_string()));
        assert_eq!(
            Command::parse("filter active").unwrap().into_events(),
            vec![UiEvent::FilterClicked {
                data_filter: "active".to_string()
            }]
        );
        assert_eq!(Command::parse("   ").unwrap(), Command::Nothing);
    }

    #[test]
    fn rejects_unknown_and_incomplete_commands() {
        assert_eq!(
            Command::parse("frobnicate"),
            Err(ParseError::UnknownCommand("frobnicate".to_string()))
        );
        assert!(matches!(
            Command::parse("toggle"),
            Err(ParseError::MissingArgument { command: "toggle", .. })
        ));
    }
}
