//! Declarative command-line parameters and verb trees.
//!
//! This crate defines the binding engine of `verbtree`:
//!
//! - [`Param`] / [`ParameterDescriptor`]: a named (`-x`, `--name`) or
//!   positional parameter with a typed value, default and help text.
//! - [`validate_name`]: the option-name grammar and reserved help names.
//! - [`discover`]: ordered, deduplicated parameters of a command.
//! - [`CommandTree`]: [`VerbGroup`] routing nodes and [`Command`] leaves,
//!   validated once at assembly; [`resolve`] maps leading verb tokens to a
//!   leaf.
//! - [`bind`]: tokenizes the remaining arguments into [`BoundArgs`].
//! - [`Handler`]: the four supported handler shapes.
//! - [`relocate_help_tokens`] / [`render_help`]: help requests.
//! - [`TreeSchema`]: serializable export of a declared tree.
//!
//! Dispatching (invoking handlers and mapping errors to exit codes) lives in
//! the `verbtree-runtime` crate.
//!
//! # Example
//!
//! ```
//! use verbtree_core::*;
//!
//! let name = Param::<String>::positional("name", 0).build();
//! let loud = Param::<bool>::named("--loud").alias("-l").build();
//!
//! let tree = CommandTree::new(
//!     VerbGroup::new("app").child(
//!         Command::new("greet")
//!             .param(&name)
//!             .param(&loud)
//!             .handler_sync(|| ()),
//!     ),
//! )
//! .unwrap();
//!
//! let argv: Vec<String> = ["greet", "Ada", "--loud"].map(String::from).to_vec();
//! let resolution = resolve(&tree, &argv).unwrap();
//! bind(resolution.command.resolved_parameters(), &resolution.remaining).unwrap();
//!
//! assert_eq!(name.value().as_deref(), Some("Ada"));
//! assert_eq!(loud.value(), Some(true));
//! ```

mod bind;
mod discover;
mod error;
mod handler;
mod help;
mod param;
mod schema;
mod tree;
mod types;
mod validate;

pub use bind::{BoundArgs, END_OF_OPTIONS, bind};
pub use discover::discover;
pub use error::{BindingError, ConfigError, ResolveError};
pub use handler::{Handler, HandlerError, HandlerOutput, HandlerResult, HandlerShape, Outcome};
pub use help::{HELP_VERB, is_help_request, relocate_help_tokens, render_help};
pub use param::{Param, ParamBuilder, ParameterDescriptor, ParameterKind, ParameterSet};
pub use schema::{NodeKind, NodeSchema, ParameterSchema, SCHEMA_CONTRACT_VERSION, TreeSchema};
pub use tree::{Command, CommandNode, CommandTree, NodeMatch, Resolution, VerbGroup, resolve, resolve_node};
pub use types::{ParamValue, Value, ValueParseError, ValueType};
pub use validate::{
    CANONICAL_HELP_TOKEN, NameKind, NameValidity, RESERVED_HELP_TOKENS, is_reserved_help_token,
    is_valid_verb_name, validate_name, validate_tree,
};

pub use tokio_util::sync::CancellationToken;
