//! Line commands typed at the prompt.
//!
//! Positions are 1-based on the way in and 0-based in `Command`.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        title: String,
        date: Option<NaiveDate>,
    },
    Toggle(usize),
    Delete(usize),
    Clear,
    CompletedFirst,
    CompletedLast,
    /// `to: None` is a drag released outside the list.
    Move {
        from: usize,
        to: Option<usize>,
    },
    List,
    Json,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{0}' needs a position")]
    MissingPosition(&'static str),

    #[error("'{0}' is not a position (use 1, 2, ...)")]
    InvalidPosition(String),

    #[error("'{0}' is not a date (use @YYYY-MM-DD)")]
    InvalidDate(String),
}

pub const HELP: &str = "\
commands:
  add <title> [@YYYY-MM-DD]   add a task
  toggle <n>                  mark task n done / not done
  delete <n>                  delete task n
  clear                       delete every completed task
  first | last                sort completed tasks first / last
  move <from> [to]            drag task; without 'to' it is dropped outside
  list | json                 show the list
  quit                        finish pending removals and exit";

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map(|(w, r)| (w, r.trim()))
        .unwrap_or((line, ""));

    match word {
        "" => Err(CommandError::Empty),
        "add" | "a" => parse_add(rest),
        "toggle" | "t" => Ok(Command::Toggle(required_position("toggle", rest)?)),
        "delete" | "rm" => Ok(Command::Delete(required_position("delete", rest)?)),
        "clear" => Ok(Command::Clear),
        "first" => Ok(Command::CompletedFirst),
        "last" => Ok(Command::CompletedLast),
        "move" | "mv" => {
            let mut parts = rest.split_whitespace();
            let from = match parts.next() {
                Some(p) => position(p)?,
                None => return Err(CommandError::MissingPosition("move")),
            };
            let to = parts.next().map(position).transpose()?;
            Ok(Command::Move { from, to })
        }
        "list" | "ls" => Ok(Command::List),
        "json" => Ok(Command::Json),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

/// The title may end up empty; the controller decides whether to reject it.
fn parse_add(rest: &str) -> Result<Command, CommandError> {
    let (title, date) = match rest.rsplit_once('@') {
        Some((title, raw)) if !raw.contains(char::is_whitespace) => {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| CommandError::InvalidDate(raw.to_string()))?;
            (title, Some(date))
        }
        _ => (rest, None),
    };
    Ok(Command::Add {
        title: title.trim().to_string(),
        date,
    })
}

fn required_position(command: &'static str, rest: &str) -> Result<usize, CommandError> {
    match rest.split_whitespace().next() {
        Some(p) => position(p),
        None => Err(CommandError::MissingPosition(command)),
    }
}

fn position(raw: &str) -> Result<usize, CommandError> {
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CommandError::InvalidPosition(raw.to_string())),
    }
}
