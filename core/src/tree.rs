//! Command tree and verb resolution.
//!
//! A tree is built from [`VerbGroup`] nodes (routing only) and [`Command`]
//! leaves (parameters plus a handler). [`CommandTree::new`] validates the
//! whole tree once; afterwards it is immutable and [`resolve`] only reads it.
//!
//! # Example
//!
//! ```
//! use verbtree_core::*;
//!
//! let tree = CommandTree::new(
//!     VerbGroup::new("git")
//!         .child(
//!             VerbGroup::new("remote")
//!                 .child(Command::new("add").handler_sync(|| ()))
//!                 .child(Command::new("remove").alias("rm").handler_sync(|| ())),
//!         )
//!         .child(Command::new("status").handler_sync(|| ())),
//! )
//! .unwrap();
//!
//! let args: Vec<String> = ["remote", "rm", "origin"].map(String::from).to_vec();
//! let resolution = resolve(&tree, &args).unwrap();
//! assert_eq!(resolution.command.name(), "remove");
//! assert_eq!(resolution.path, ["git", "remote", "remove"]);
//! assert_eq!(resolution.remaining, ["origin"]);
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::bind::BoundArgs;
use crate::discover::discover;
use crate::error::{ConfigError, ResolveError};
use crate::handler::{Handler, HandlerOutput};
use crate::param::{Param, ParameterDescriptor, ParameterSet};
use crate::types::ParamValue;
use crate::validate::validate_tree;

/// Routing-only node: a named group of child commands.
#[derive(Debug)]
pub struct VerbGroup {
    name: String,
    aliases: Vec<String>,
    description: Option<String>,
    children: Vec<CommandNode>,
}

impl VerbGroup {
    /// Starts a group; `name` is matched case-sensitively against tokens.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            description: None,
            children: Vec::new(),
        }
    }

    /// Adds an alternative name. Aliases must be unique in the whole tree.
    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Sets the text shown in help listings.
    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    /// Appends a child node. Children keep their declaration order.
    pub fn child(mut self, node: impl Into<CommandNode>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Wraps the group as a [`CommandNode`].
    pub fn build(self) -> CommandNode {
        CommandNode::VerbGroup(self)
    }

    /// Child nodes in declaration order.
    pub fn children(&self) -> &[CommandNode] {
        &self.children
    }

    /// Finds the child whose name or alias equals `token` (case-sensitive).
    pub fn find_child(&self, token: &str) -> Option<&CommandNode> {
        self.children.iter().find(|c| c.matches(token))
    }
}

/// Invocable leaf: parameters plus a handler.
#[derive(Debug)]
pub struct Command {
    name: String,
    aliases: Vec<String>,
    description: Option<String>,
    parameters: ParameterSet,
    handler: Option<Handler>,
    discovered: Vec<Arc<ParameterDescriptor>>,
}

impl Command {
    /// Starts a command with no parameters and no handler.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            description: None,
            parameters: ParameterSet::new(),
            handler: None,
            discovered: Vec::new(),
        }
    }

    /// Adds an alternative name. Aliases must be unique in the whole tree.
    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Sets the text shown in help output.
    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    /// Registers a parameter declared on this command.
    pub fn param<T: ParamValue>(mut self, param: &Param<T>) -> Self {
        self.parameters.push(Arc::clone(param.descriptor()));
        self
    }

    /// Inherits every parameter of a shared set (and its ancestors).
    pub fn inherit(mut self, parent: Arc<ParameterSet>) -> Self {
        self.parameters = self.parameters.inherit(parent);
        self
    }

    /// Sets the handler in any of its shapes.
    pub fn handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Shorthand for [`Handler::sync`].
    pub fn handler_sync<F, R>(self, f: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        self.handler(Handler::sync(f))
    }

    /// Shorthand for [`Handler::with_args`].
    pub fn handler_args<F, R>(self, f: F) -> Self
    where
        F: Fn(&BoundArgs) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        self.handler(Handler::with_args(f))
    }

    /// Wraps the command as a [`CommandNode`].
    pub fn build(self) -> CommandNode {
        CommandNode::Command(self)
    }

    /// Canonical name, as shown in paths and help.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameters as registered, before discovery.
    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    /// Ordered parameters found by discovery. Empty until the command is
    /// part of a [`CommandTree`].
    pub fn resolved_parameters(&self) -> &[Arc<ParameterDescriptor>] {
        &self.discovered
    }

    /// The handler, if one was set.
    pub fn handler_ref(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }
}

/// A node of the command tree.
#[derive(Debug)]
pub enum CommandNode {
    VerbGroup(VerbGroup),
    Command(Command),
}

impl From<VerbGroup> for CommandNode {
    fn from(group: VerbGroup) -> Self {
        CommandNode::VerbGroup(group)
    }
}

impl From<Command> for CommandNode {
    fn from(command: Command) -> Self {
        CommandNode::Command(command)
    }
}

impl CommandNode {
    /// Canonical name of the group or command.
    pub fn name(&self) -> &str {
        match self {
            CommandNode::VerbGroup(g) => &g.name,
            CommandNode::Command(c) => &c.name,
        }
    }

    /// Alternative names in declaration order.
    pub fn aliases(&self) -> &[String] {
        match self {
            CommandNode::VerbGroup(g) => &g.aliases,
            CommandNode::Command(c) => &c.aliases,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            CommandNode::VerbGroup(g) => g.description.as_deref(),
            CommandNode::Command(c) => c.description.as_deref(),
        }
    }

    /// Name or alias equals `token`, case-sensitively.
    pub fn matches(&self, token: &str) -> bool {
        self.name() == token || self.aliases().iter().any(|a| a == token)
    }

    /// The leaf command, or `None` for a verb group.
    pub fn as_command(&self) -> Option<&Command> {
        match self {
            CommandNode::Command(c) => Some(c),
            CommandNode::VerbGroup(_) => None,
        }
    }

    pub fn handler(&self) -> Option<&Handler> {
        self.as_command().and_then(Command::handler_ref)
    }

    fn prepare(&mut self) -> Result<(), ConfigError> {
        match self {
            CommandNode::Command(c) => {
                c.discovered = discover(&c.parameters)?;
            }
            CommandNode::VerbGroup(g) => {
                for child in &mut g.children {
                    child.prepare()?;
                }
            }
        }
        Ok(())
    }
}

/// A validated, immutable command tree.
#[derive(Debug)]
pub struct CommandTree {
    root: CommandNode,
}

impl CommandTree {
    /// Validates the structure of `root`, then discovers every command's
    /// parameters once and caches them for binding.
    ///
    /// Any [`ConfigError`] here is a programming mistake in the tree
    /// declaration, reported before any argument is read.
    pub fn new(root: impl Into<CommandNode>) -> Result<Self, ConfigError> {
        let mut root = root.into();
        validate_tree(&root)?;
        root.prepare()?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &CommandNode {
        &self.root
    }

    /// Verb mode: the root routes to sub-commands instead of being one.
    pub fn is_verb_mode(&self) -> bool {
        matches!(self.root, CommandNode::VerbGroup(_))
    }
}

/// Leaf command selected by [`resolve`].
#[derive(Debug)]
pub struct Resolution<'a> {
    pub command: &'a Command,
    /// Canonical names from the root down to the command.
    pub path: Vec<String>,
    /// Tokens left for the argument binder.
    pub remaining: Vec<String>,
}

/// Deepest node reachable by consuming verb tokens.
#[derive(Debug)]
pub struct NodeMatch<'a> {
    pub node: &'a CommandNode,
    pub path: Vec<String>,
    pub consumed: usize,
}

/// Descends from the root while the next token names a child.
///
/// Never fails; used directly for help lookups.
pub fn resolve_node<'a>(tree: &'a CommandTree, tokens: &[String]) -> NodeMatch<'a> {
    let mut node = &tree.root;
    let mut path = vec![node.name().to_string()];
    let mut consumed = 0;

    while let CommandNode::VerbGroup(group) = node {
        let Some(child) = tokens.get(consumed).and_then(|t| group.find_child(t)) else {
            break;
        };
        node = child;
        path.push(child.name().to_string());
        consumed += 1;
    }

    NodeMatch {
        node,
        path,
        consumed,
    }
}

/// Resolves the leading verb tokens to a leaf command.
///
/// Fails with [`ResolveError::NoSuchVerb`] when descent stops at a verb
/// group, which is never invocable itself.
pub fn resolve<'a>(tree: &'a CommandTree, tokens: &[String]) -> Result<Resolution<'a>, ResolveError> {
    let NodeMatch {
        node,
        path,
        consumed,
    } = resolve_node(tree, tokens);

    match node {
        CommandNode::Command(command) => {
            debug!(command = ?path, consumed, "Resolved command");
            Ok(Resolution {
                command,
                path,
                remaining: tokens[consumed..].to_vec(),
            })
        }
        CommandNode::VerbGroup(_) => Err(ResolveError::NoSuchVerb {
            path,
            token: tokens.get(consumed).cloned(),
        }),
    }
}
