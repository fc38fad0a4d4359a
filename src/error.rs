//! Error types shared by every stage of command dispatch.
//!
//! Build-time misconfiguration (`DuplicateArgument`, `EmptyArgumentName`)
//! surfaces from the builder; everything else surfaces from
//! `Command::execute` / `CommandManager::dispatch` and is reported by the
//! caller.

use thiserror::Error;

use crate::cmd::value::ValueKind;

/// A raw token could not be converted to the argument's declared kind.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("argument '{argument}': {raw} is not a valid {}.", .expected.parse_name())]
pub struct ParseError {
    pub argument: String,
    pub raw: String,
    pub expected: ValueKind,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Syntax(#[from] ParseError),

    #[error("there is already an argument called {argument} on {command}")]
    DuplicateArgument { argument: String, command: String },

    #[error("argument names on {command} cannot be empty")]
    EmptyArgumentName { command: String },

    #[error("argument {argument} of {command} requires a value")]
    MissingRequiredArgument { argument: String, command: String },

    #[error("argument {argument} is missing")]
    MissingArgument { argument: String },

    #[error("argument {argument} is of type {declared}, not {requested}")]
    TypeMismatch {
        argument: String,
        declared: ValueKind,
        requested: ValueKind,
    },

    #[error("{argument} is not an argument of {command}")]
    UnknownArgument { argument: String, command: String },

    #[error("unknown command: {input}")]
    UnknownCommand { input: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CommandError {
    /// True for errors caused by the invocation text rather than by how the
    /// command was built or queried.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CommandError::Syntax(_)
                | CommandError::MissingRequiredArgument { .. }
                | CommandError::UnknownCommand { .. }
        )
    }
}

pub type Result<T, E = CommandError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_message_names_kind() {
        let err = ParseError {
            argument: "count".into(),
            raw: "abc".into(),
            expected: ValueKind::Int,
        };
        assert_eq!(
            err.to_string(),
            "argument 'count': abc is not a valid Integer."
        );
    }

    #[test]
    fn user_error_classification() {
        let missing = CommandError::MissingRequiredArgument {
            argument: "x".into(),
            command: "cmd".into(),
        };
        assert!(missing.is_user_error());
        let dup = CommandError::DuplicateArgument {
            argument: "x".into(),
            command: "cmd".into(),
        };
        assert!(!dup.is_user_error());
    }
}
