//! Name and tree validation.
//!
//! [`validate_name`] checks one candidate parameter name against the named
//! and positional grammars. [`validate_tree`] walks an assembled command tree
//! and fails fast on the first structural problem, so configuration mistakes
//! surface before any user input is read.
//!
//! # Examples
//!
//! ```
//! use verbtree_core::{NameKind, NameValidity, validate_name};
//!
//! assert_eq!(validate_name("-a", NameKind::Named, false), NameValidity::Valid);
//! assert_eq!(validate_name("-abc", NameKind::Named, false), NameValidity::Invalid);
//! assert_eq!(validate_name("--a", NameKind::Named, false), NameValidity::Invalid);
//! assert_eq!(validate_name("--abc", NameKind::Named, false), NameValidity::Valid);
//! assert_eq!(validate_name("-h", NameKind::Named, false), NameValidity::ReservedName);
//! assert_eq!(validate_name("-h", NameKind::Named, true), NameValidity::Valid);
//! ```

use std::collections::HashSet;
use std::fmt;

use crate::error::ConfigError;
use crate::tree::CommandNode;

/// Token the dispatcher rewrites every help request into.
pub const CANONICAL_HELP_TOKEN: &str = "--help";

/// Help aliases reserved by the framework (matched case-insensitively).
pub const RESERVED_HELP_TOKENS: [&str; 5] = ["-h", "/h", "--help", "-?", "/?"];

/// Which grammar a name is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Named,
    Positional,
}

/// Outcome of [`validate_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameValidity {
    Valid,
    Invalid,
    ContainsSpaces,
    ReservedName,
}

impl fmt::Display for NameValidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            NameValidity::Valid => "valid",
            NameValidity::Invalid => "does not match the option grammar",
            NameValidity::ContainsSpaces => "contains spaces",
            NameValidity::ReservedName => "is reserved for help",
        };
        f.write_str(text)
    }
}

/// Returns `true` if `token` is one of [`RESERVED_HELP_TOKENS`], ignoring case.
pub fn is_reserved_help_token(token: &str) -> bool {
    RESERVED_HELP_TOKENS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(token))
}

/// Validates a candidate parameter name.
///
/// Named names must be `-X` (one dash, one non-dash character) or `--XX..`
/// (two dashes, at least two characters, the first not a dash). Positional
/// names must not start with `-` or `/`. Checks run in order: blank, grammar,
/// spaces, reserved.
pub fn validate_name(name: &str, kind: NameKind, allow_reserved: bool) -> NameValidity {
    if name.trim().is_empty() {
        return NameValidity::Invalid;
    }

    let grammar_ok = match kind {
        NameKind::Named => named_grammar_ok(name),
        NameKind::Positional => !name.starts_with('-') && !name.starts_with('/'),
    };
    if !grammar_ok {
        return NameValidity::Invalid;
    }

    if name.contains(' ') {
        return NameValidity::ContainsSpaces;
    }

    if !allow_reserved && is_reserved_help_token(name) {
        return NameValidity::ReservedName;
    }

    NameValidity::Valid
}

fn named_grammar_ok(name: &str) -> bool {
    if let Some(rest) = name.strip_prefix("--") {
        let mut chars = rest.chars();
        return matches!(chars.next(), Some(c) if c != '-') && chars.next().is_some();
    }
    if let Some(rest) = name.strip_prefix('-') {
        let mut chars = rest.chars();
        return matches!(chars.next(), Some(c) if c != '-') && chars.next().is_none();
    }
    false
}

/// Returns `true` if `name` can be used for a verb group or command.
pub fn is_valid_verb_name(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().any(char::is_whitespace)
        && !name.starts_with('-')
        && !name.starts_with('/')
}

/// Validates the structure of a command tree.
///
/// Checks verb names, handlers, sibling uniqueness, tree-wide alias
/// uniqueness and empty verb groups. Parameters are left to discovery,
/// which [`CommandTree::new`](crate::CommandTree::new) runs once per command.
pub fn validate_tree(root: &CommandNode) -> Result<(), ConfigError> {
    let mut aliases: HashSet<String> = HashSet::new();
    validate_node(root, &mut aliases)
}

fn validate_node(node: &CommandNode, aliases: &mut HashSet<String>) -> Result<(), ConfigError> {
    let name = node.name();
    if !is_valid_verb_name(name) {
        return Err(ConfigError::InvalidVerbName(name.to_string()));
    }

    for alias in node.aliases() {
        if !is_valid_verb_name(alias) {
            return Err(ConfigError::InvalidVerbName(alias.clone()));
        }
        if alias == name || !aliases.insert(alias.clone()) {
            return Err(ConfigError::DuplicateAlias(alias.clone()));
        }
    }

    match node {
        CommandNode::Command(command) => {
            if command.handler_ref().is_none() {
                return Err(ConfigError::MissingHandler(name.to_string()));
            }
        }
        CommandNode::VerbGroup(group) => {
            if group.children().is_empty() {
                return Err(ConfigError::EmptyVerbGroup(name.to_string()));
            }

            let mut seen: HashSet<&str> = HashSet::new();
            for child in group.children() {
                if !seen.insert(child.name()) {
                    return Err(ConfigError::DuplicateVerb {
                        parent: name.to_string(),
                        name: child.name().to_string(),
                    });
                }
            }

            // A sibling's alias must not shadow another sibling's name.
            for child in group.children() {
                for alias in child.aliases() {
                    if seen.contains(alias.as_str()) {
                        return Err(ConfigError::DuplicateAlias(alias.clone()));
                    }
                }
            }

            for child in group.children() {
                validate_node(child, aliases)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Command, Param, VerbGroup};

    #[test]
    fn test_named_grammar() {
        assert_eq!(validate_name("-a", NameKind::Named, false), NameValidity::Valid);
        assert_eq!(validate_name("-abc", NameKind::Named, false), NameValidity::Invalid);
        assert_eq!(validate_name("--a", NameKind::Named, false), NameValidity::Invalid);
        assert_eq!(validate_name("--abc", NameKind::Named, false), NameValidity::Valid);
        assert_eq!(validate_name("---ab", NameKind::Named, false), NameValidity::Invalid);
        assert_eq!(validate_name("--", NameKind::Named, false), NameValidity::Invalid);
        assert_eq!(validate_name("-", NameKind::Named, false), NameValidity::Invalid);
        assert_eq!(validate_name("name", NameKind::Named, false), NameValidity::Invalid);
    }

    #[test]
    fn test_blank_is_invalid_before_anything_else() {
        assert_eq!(validate_name("", NameKind::Named, true), NameValidity::Invalid);
        assert_eq!(validate_name("   ", NameKind::Positional, true), NameValidity::Invalid);
    }

    #[test]
    fn test_spaces_checked_after_grammar() {
        assert_eq!(
            validate_name("--dry run", NameKind::Named, false),
            NameValidity::ContainsSpaces
        );
        assert_eq!(
            validate_name("file name", NameKind::Positional, false),
            NameValidity::ContainsSpaces
        );
        // grammar failure wins over spaces
        assert_eq!(
            validate_name("-a b", NameKind::Named, false),
            NameValidity::Invalid
        );
    }

    #[test]
    fn test_reserved_names_are_case_insensitive() {
        for name in ["-h", "-H", "--help", "--HELP", "-?"] {
            assert_eq!(
                validate_name(name, NameKind::Named, false),
                NameValidity::ReservedName,
                "{name}"
            );
            assert_eq!(validate_name(name, NameKind::Named, true), NameValidity::Valid);
        }
    }

    #[test]
    fn test_positional_grammar() {
        assert_eq!(
            validate_name("file", NameKind::Positional, false),
            NameValidity::Valid
        );
        assert_eq!(
            validate_name("-file", NameKind::Positional, false),
            NameValidity::Invalid
        );
        assert_eq!(
            validate_name("/h", NameKind::Positional, false),
            NameValidity::Invalid
        );
    }

    #[test]
    fn test_validate_tree_rejects_empty_group() {
        let root = VerbGroup::new("app").build();
        assert_eq!(
            validate_tree(&root),
            Err(ConfigError::EmptyVerbGroup("app".to_string()))
        );
    }

    #[test]
    fn test_validate_tree_rejects_duplicate_siblings() {
        let root = VerbGroup::new("app")
            .child(Command::new("run").handler_sync(|| ()).build())
            .child(Command::new("run").handler_sync(|| ()).build())
            .build();
        assert_eq!(
            validate_tree(&root),
            Err(ConfigError::DuplicateVerb {
                parent: "app".to_string(),
                name: "run".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_tree_rejects_alias_reused_anywhere() {
        let root = VerbGroup::new("app")
            .child(Command::new("list").alias("ls").handler_sync(|| ()).build())
            .child(
                VerbGroup::new("remote")
                    .child(Command::new("show").alias("ls").handler_sync(|| ()).build())
                    .build(),
            )
            .build();
        assert_eq!(
            validate_tree(&root),
            Err(ConfigError::DuplicateAlias("ls".to_string()))
        );
    }

    #[test]
    fn test_validate_tree_rejects_alias_shadowing_sibling() {
        let root = VerbGroup::new("app")
            .child(Command::new("list").handler_sync(|| ()).build())
            .child(Command::new("show").alias("list").handler_sync(|| ()).build())
            .build();
        assert_eq!(
            validate_tree(&root),
            Err(ConfigError::DuplicateAlias("list".to_string()))
        );
    }

    #[test]
    fn test_validate_tree_leaves_parameters_to_discovery() {
        let bad = Param::<bool>::named("-abc").build();
        let root = VerbGroup::new("app")
            .child(Command::new("run").param(&bad).handler_sync(|| ()).build())
            .build();
        assert_eq!(validate_tree(&root), Ok(()));
    }

    #[test]
    fn test_validate_tree_requires_handler() {
        let root = Command::new("run").build();
        assert_eq!(
            validate_tree(&root),
            Err(ConfigError::MissingHandler("run".to_string()))
        );
    }

    #[test]
    fn test_validate_tree_rejects_option_like_verb() {
        let root = VerbGroup::new("app")
            .child(Command::new("--run").handler_sync(|| ()).build())
            .build();
        assert_eq!(
            validate_tree(&root),
            Err(ConfigError::InvalidVerbName("--run".to_string()))
        );
    }
}
