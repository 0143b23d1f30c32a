//! Help requests: token relocation and plain-text rendering.
//!
//! Verb resolution only recognizes a help request as the very first token, so
//! [`relocate_help_tokens`] moves any help alias found anywhere in the
//! argument vector to the front before resolution. [`render_help`] then
//! describes the node the remaining tokens lead to.

use std::sync::Arc;

use crate::param::ParameterDescriptor;
use crate::tree::{Command, CommandNode};
use crate::types::ValueType;
use crate::validate::{CANONICAL_HELP_TOKEN, is_reserved_help_token};

/// Bare word accepted as a help request in verb mode (first position only).
pub const HELP_VERB: &str = "help";

/// Rewrites the argument vector so a help request, if any, comes first.
///
/// - `help` as the first token (verb mode only) becomes `--help`;
/// - a vector already starting with `--help` is returned unchanged;
/// - otherwise every reserved help alias is removed and a single `--help`
///   is inserted at position 0.
///
/// # Examples
///
/// ```
/// use verbtree_core::relocate_help_tokens;
///
/// let args: Vec<String> = ["mycommand", "--help"].map(String::from).to_vec();
/// assert_eq!(relocate_help_tokens(&args, true), ["--help", "mycommand"]);
///
/// let args: Vec<String> = ["help", "remote"].map(String::from).to_vec();
/// assert_eq!(relocate_help_tokens(&args, true), ["--help", "remote"]);
///
/// let args: Vec<String> = ["remote", "add", "-H", "/?"].map(String::from).to_vec();
/// assert_eq!(relocate_help_tokens(&args, true), ["--help", "remote", "add"]);
/// ```
pub fn relocate_help_tokens(tokens: &[String], verb_mode: bool) -> Vec<String> {
    let Some(first) = tokens.first() else {
        return Vec::new();
    };

    if verb_mode && first == HELP_VERB {
        let mut out = tokens.to_vec();
        out[0] = CANONICAL_HELP_TOKEN.to_string();
        return out;
    }

    if first == CANONICAL_HELP_TOKEN {
        return tokens.to_vec();
    }

    if tokens.iter().any(|t| is_reserved_help_token(t)) {
        let mut out = Vec::with_capacity(tokens.len());
        out.push(CANONICAL_HELP_TOKEN.to_string());
        out.extend(tokens.iter().filter(|t| !is_reserved_help_token(t)).cloned());
        return out;
    }

    tokens.to_vec()
}

/// `true` if a relocated vector asks for help.
pub fn is_help_request(tokens: &[String]) -> bool {
    tokens.first().is_some_and(|t| t == CANONICAL_HELP_TOKEN)
}

/// Renders usage text for `node`; `path` is the verb path from the root.
pub fn render_help(node: &CommandNode, path: &[String]) -> String {
    match node {
        CommandNode::VerbGroup(group) => {
            let mut out = String::new();
            let at = path.join(" ");
            out.push_str(&format!("Usage: {at} <command> [options]\n"));
            if let Some(desc) = node.description() {
                out.push_str(&format!("\n{desc}\n"));
            }

            let rows: Vec<(String, String)> = group
                .children()
                .iter()
                .map(|child| {
                    let mut names = vec![child.name().to_string()];
                    names.extend(child.aliases().iter().cloned());
                    (
                        names.join(", "),
                        child.description().unwrap_or("").to_string(),
                    )
                })
                .collect();
            push_table(&mut out, "Commands", &rows);

            out.push_str(&format!(
                "\nRun `{at} <command> --help` for more information on a command.\n"
            ));
            out
        }
        CommandNode::Command(command) => render_command_help(command, node.description(), path),
    }
}

fn render_command_help(command: &Command, description: Option<&str>, path: &[String]) -> String {
    let params = command.resolved_parameters();
    let positionals: Vec<&Arc<ParameterDescriptor>> =
        params.iter().filter(|d| !d.is_named()).collect();
    let named: Vec<&Arc<ParameterDescriptor>> = params.iter().filter(|d| d.is_named()).collect();

    let mut usage = format!("Usage: {}", path.join(" "));
    for p in &positionals {
        if p.is_required() {
            usage.push_str(&format!(" <{}>", p.primary_name()));
        } else {
            usage.push_str(&format!(" [{}]", p.primary_name()));
        }
    }
    usage.push_str(" [options]\n");

    let mut out = usage;
    if let Some(desc) = description {
        out.push_str(&format!("\n{desc}\n"));
    }

    let arg_rows: Vec<(String, String)> = positionals
        .iter()
        .map(|p| (p.primary_name().to_string(), describe(p)))
        .collect();
    push_table(&mut out, "Arguments", &arg_rows);

    let mut option_rows: Vec<(String, String)> = named
        .iter()
        .map(|p| (option_label(p), describe(p)))
        .collect();
    option_rows.push((
        format!("-h, {CANONICAL_HELP_TOKEN}"),
        "Show this help".to_string(),
    ));
    push_table(&mut out, "Options", &option_rows);

    out
}

fn option_label(descriptor: &ParameterDescriptor) -> String {
    let mut names: Vec<&str> = descriptor.names().collect();
    names.sort_by_key(|n| n.starts_with("--"));
    let mut label = names.join(", ");
    if !descriptor.is_flag() {
        label.push_str(&format!(" <{}>", placeholder(descriptor.value_type())));
    }
    label
}

fn placeholder(value_type: &ValueType) -> String {
    match value_type {
        ValueType::Choice(choices) => choices.join("|"),
        other => other.placeholder().to_string(),
    }
}

fn describe(descriptor: &ParameterDescriptor) -> String {
    let mut text = descriptor.help().unwrap_or("").to_string();
    if let Some(default) = descriptor.default_value() {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&format!("(default: {default})"));
    }
    text
}

fn push_table(out: &mut String, title: &str, rows: &[(String, String)]) {
    if rows.is_empty() {
        return;
    }

    out.push_str(&format!("\n{title}:\n"));
    let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, desc) in rows {
        if desc.is_empty() {
            out.push_str(&format!("  {name}\n"));
        } else {
            out.push_str(&format!("  {name:<width$}  {desc}\n"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CommandTree, Param, VerbGroup, resolve_node};

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_help_after_verb_moves_to_front() {
        assert_eq!(
            relocate_help_tokens(&args(&["mycommand", "--help"]), true),
            args(&["--help", "mycommand"])
        );
    }

    #[test]
    fn test_canonical_first_is_unchanged() {
        let tokens = args(&["--help", "remote", "-h"]);
        assert_eq!(relocate_help_tokens(&tokens, true), tokens);
    }

    #[test]
    fn test_help_word_only_first_and_only_in_verb_mode() {
        assert_eq!(
            relocate_help_tokens(&args(&["help"]), true),
            args(&["--help"])
        );
        assert_eq!(
            relocate_help_tokens(&args(&["remote", "help"]), true),
            args(&["remote", "help"])
        );
        assert_eq!(
            relocate_help_tokens(&args(&["help"]), false),
            args(&["help"])
        );
    }

    #[test]
    fn test_all_aliases_removed_case_insensitively() {
        assert_eq!(
            relocate_help_tokens(&args(&["-h", "run", "/H", "--HELP", "x"]), false),
            args(&["--help", "run", "x"])
        );
    }

    #[test]
    fn test_no_help_is_passthrough() {
        let tokens = args(&["run", "--helpful"]);
        assert_eq!(relocate_help_tokens(&tokens, true), tokens);
        assert!(relocate_help_tokens(&[], true).is_empty());
    }

    #[test]
    fn test_render_group_and_command() {
        let name = Param::<String>::positional("name", 0)
            .help("Remote name")
            .build();
        let fetch = Param::<bool>::named("--fetch")
            .alias("-f")
            .help("Fetch after adding")
            .build();
        let tree = CommandTree::new(
            VerbGroup::new("git").child(
                VerbGroup::new("remote")
                    .description("Manage remotes")
                    .child(
                        crate::Command::new("add")
                            .description("Add a remote")
                            .param(&name)
                            .param(&fetch)
                            .handler_sync(|| ()),
                    )
                    .child(crate::Command::new("remove").alias("rm").handler_sync(|| ())),
            ),
        )
        .unwrap();

        let group = resolve_node(&tree, &args(&["remote"]));
        let text = render_help(group.node, &group.path);
        assert!(text.starts_with("Usage: git remote <command> [options]\n"));
        assert!(text.contains("Manage remotes"));
        assert!(text.contains("  add         Add a remote\n"));
        assert!(text.contains("  remove, rm\n"));

        let leaf = resolve_node(&tree, &args(&["remote", "add"]));
        let text = render_help(leaf.node, &leaf.path);
        assert!(text.starts_with("Usage: git remote add <name> [options]\n"));
        assert!(text.contains("Remote name"));
        assert!(text.contains("-f, --fetch"));
        assert!(text.contains("Fetch after adding (default: false)"));
    }

    #[test]
    fn test_value_placeholder_in_options() {
        let format = Param::<String>::named("--format")
            .choices(&["json", "yaml"])
            .default_value("json".to_string())
            .build();
        let tree = CommandTree::new(
            crate::Command::new("dump")
                .param(&format)
                .handler_sync(|| ()),
        )
        .unwrap();
        let text = render_help(tree.root(), &args(&["dump"]));
        assert!(text.contains("--format <json|yaml>"));
        assert!(text.contains("(default: json)"));
    }
}
