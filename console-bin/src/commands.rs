use std::str::FromStr;

use multik8s_common::ClusterId;
use thiserror::Error;

pub const HELP: &str = "Commands: create, show <id>, delete <id>, refresh, logout, quit";

/// A line typed at the cluster list prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListCommand {
    Redraw,
    Refresh,
    Create,
    Show(ClusterId),
    Delete(ClusterId),
    Logout,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("{0} needs a cluster id")]
    MissingId(&'static str),

    #[error("Invalid cluster id: {0}")]
    InvalidId(String),
}

fn cluster_id(command: &'static str, arg: Option<&str>) -> Result<ClusterId, CommandError> {
    let arg = arg.ok_or(CommandError::MissingId(command))?;
    arg.trim_start_matches('#')
        .parse()
        .map_err(|_| CommandError::InvalidId(arg.to_string()))
}

impl FromStr for ListCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(ListCommand::Redraw);
        };

        match command.to_lowercase().as_str() {
            "refresh" | "r" => Ok(ListCommand::Refresh),
            "create" | "new" | "c" => Ok(ListCommand::Create),
            "show" | "view" => cluster_id("show", words.next()).map(ListCommand::Show),
            "delete" | "rm" => cluster_id("delete", words.next()).map(ListCommand::Delete),
            "logout" => Ok(ListCommand::Logout),
            "quit" | "exit" | "q" => Ok(ListCommand::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("".parse(), Ok(ListCommand::Redraw));
        assert_eq!("   ".parse(), Ok(ListCommand::Redraw));
        assert_eq!("create".parse(), Ok(ListCommand::Create));
        assert_eq!("delete 7".parse(), Ok(ListCommand::Delete(7)));
        assert_eq!("show #12".parse(), Ok(ListCommand::Show(12)));
        assert_eq!("QUIT".parse(), Ok(ListCommand::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "delete".parse::<ListCommand>(),
            Err(CommandError::MissingId("delete"))
        );
        assert_eq!(
            "show abc".parse::<ListCommand>(),
            Err(CommandError::InvalidId("abc".to_string()))
        );
        assert_eq!(
            "scale 3".parse::<ListCommand>(),
            Err(CommandError::Unknown("scale".to_string()))
        );
    }
}
