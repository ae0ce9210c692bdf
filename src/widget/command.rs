//! Text commands accepted by the widget.
//!
//! Grammar (one command per line, pairs numbered from 1):
//!
//! ```text
//! add [work_secs] [break_secs]
//! remove <n>
//! update <n> <work_secs> <break_secs>
//! begin <n>
//! stop <n>
//! away | back | quit
//! ```

use thiserror::Error;

use crate::types::parse_positive_int;

/// Errors raised while parsing a command line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("{command}: missing {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("invalid pair number: {0}")]
    InvalidPairNumber(String),
}

/// A user action on the widget.
///
/// Pair indices are 0-based positions in creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetCommand {
    /// Create and start a pair; missing durations use the configured defaults
    AddPair {
        work_secs: Option<u64>,
        break_secs: Option<u64>,
    },
    RemovePair { index: usize },
    /// Raw duration fields, validated by the pair
    Update {
        index: usize,
        work: String,
        break_: String,
    },
    Begin { index: usize },
    StopAll { index: usize },
    Away,
    Back,
    Quit,
}

impl WidgetCommand {
    /// Parses one command line.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CommandError::Empty);
        };

        match name.to_ascii_lowercase().as_str() {
            "add" => Ok(Self::AddPair {
                work_secs: words.next().map(parse_positive_int),
                break_secs: words.next().map(parse_positive_int),
            }),
            "remove" => Ok(Self::RemovePair {
                index: pair_index("remove", words.next())?,
            }),
            "update" => {
                let index = pair_index("update", words.next())?;
                let work = words.next().ok_or(CommandError::MissingArgument {
                    command: "update",
                    argument: "work seconds",
                })?;
                let break_ = words.next().ok_or(CommandError::MissingArgument {
                    command: "update",
                    argument: "break seconds",
                })?;
                Ok(Self::Update {
                    index,
                    work: work.to_string(),
                    break_: break_.to_string(),
                })
            }
            "begin" | "start" => Ok(Self::Begin {
                index: pair_index("begin", words.next())?,
            }),
            "stop" => Ok(Self::StopAll {
                index: pair_index("stop", words.next())?,
            }),
            "away" => Ok(Self::Away),
            "back" => Ok(Self::Back),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Converts a 1-based pair number to an index.
fn pair_index(command: &'static str, word: Option<&str>) -> Result<usize, CommandError> {
    let word = word.ok_or(CommandError::MissingArgument {
        command,
        argument: "pair number",
    })?;
    match word.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CommandError::InvalidPairNumber(word.to_string())),
    }
}
