//! Error types for tree assembly, verb resolution and argument binding.
//!
//! [`ConfigError`] marks a mistake by the CLI author and is raised while the
//! tree is assembled. [`ResolveError`] and [`BindingError`] describe bad user
//! input and are reported by the dispatcher as plain messages.

use thiserror::Error;

use crate::validate::NameValidity;

/// Tree or parameter declaration is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A parameter name failed [`validate_name`](crate::validate_name).
    #[error("invalid parameter name `{name}`: {validity}")]
    InvalidParameterName { name: String, validity: NameValidity },
    /// Two parameters reachable from one command claim the same name or alias.
    #[error("parameter name `{0}` is declared more than once")]
    DuplicateParameterName(String),
    /// Two positional parameters share an index.
    #[error("positional index {index} is used by both `{first}` and `{second}`")]
    DuplicatePosition {
        index: usize,
        first: String,
        second: String,
    },
    /// A positional parameter was given aliases.
    #[error("positional parameter `{0}` cannot have aliases")]
    PositionalAlias(String),
    /// A verb or command name is empty, contains whitespace or looks like an option.
    #[error("invalid command name `{0}`")]
    InvalidVerbName(String),
    /// Two siblings share a name.
    #[error("duplicate command `{name}` under `{parent}`")]
    DuplicateVerb { parent: String, name: String },
    /// An alias (or a name used as an alias) appears twice in the tree.
    #[error("command alias `{0}` is declared more than once in the tree")]
    DuplicateAlias(String),
    /// A command was declared without a handler.
    #[error("command `{0}` has no handler")]
    MissingHandler(String),
    /// A verb group without children can never be invoked.
    #[error("verb group `{0}` has no commands")]
    EmptyVerbGroup(String),
}

/// The argument vector does not select an invocable command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Descent stopped at a verb group. `token` is the unmatched word, if any.
    #[error("{}", no_such_verb_message(.path, .token))]
    NoSuchVerb {
        path: Vec<String>,
        token: Option<String>,
    },
}

fn no_such_verb_message(path: &[String], token: &Option<String>) -> String {
    let at = path.join(" ");
    match token {
        Some(token) => format!("unknown command `{token}` for `{at}`"),
        None => format!("`{at}` requires a command"),
    }
}

/// The remaining tokens do not fit the command's parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("missing required parameter `{0}`")]
    MissingRequiredParameter(String),
    /// Carries the first token that had no positional slot.
    #[error("too many positional arguments starting at `{0}`")]
    TooManyPositionalArguments(String),
    #[error("invalid value `{raw}` for `{name}`: {reason}")]
    InvalidValueFormat {
        name: String,
        raw: String,
        reason: String,
    },
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("option `{0}` requires a value")]
    MissingValue(String),
    #[error("option `{0}` was given more than once")]
    RepeatedOption(String),
}

impl BindingError {
    /// Name of the parameter or token the error refers to.
    pub fn subject(&self) -> &str {
        match self {
            BindingError::MissingRequiredParameter(s)
            | BindingError::TooManyPositionalArguments(s)
            | BindingError::UnknownOption(s)
            | BindingError::MissingValue(s)
            | BindingError::RepeatedOption(s) => s,
            BindingError::InvalidValueFormat { name, .. } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_such_verb_messages() {
        let with_token = ResolveError::NoSuchVerb {
            path: vec!["git".into(), "remote".into()],
            token: Some("ad".into()),
        };
        assert_eq!(
            with_token.to_string(),
            "unknown command `ad` for `git remote`"
        );

        let without = ResolveError::NoSuchVerb {
            path: vec!["git".into()],
            token: None,
        };
        assert_eq!(without.to_string(), "`git` requires a command");
    }

    #[test]
    fn test_binding_error_subject() {
        let err = BindingError::InvalidValueFormat {
            name: "--port".into(),
            raw: "x".into(),
            reason: "expected a number".into(),
        };
        assert_eq!(err.subject(), "--port");
        assert_eq!(
            err.to_string(),
            "invalid value `x` for `--port`: expected a number"
        );
    }
}
