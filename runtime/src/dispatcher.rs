//! Top-level dispatch: argument vector in, exit code out.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use verbtree_core::{
    CommandNode, CommandTree, ConfigError, HandlerError, bind, is_help_request,
    relocate_help_tokens, render_help, resolve, resolve_node,
};

use crate::adapter::invoke;
use crate::config::DispatcherConfig;
use crate::console::{Console, StdConsole};
use crate::report::render_error;

/// Runs commands of one validated tree.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use verbtree_core::{CancellationToken, Command, Param};
/// use verbtree_runtime::{Dispatcher, DispatcherConfig, MemoryConsole};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let name = Param::<String>::positional("name", 0).build();
/// let greeted = name.clone();
///
/// let console = Arc::new(MemoryConsole::default());
/// let dispatcher = Dispatcher::new(
///     Command::new("greet").param(&name).handler_sync(move || {
///         greeted.value().is_some_and(|n| n == "Ada")
///     }),
///     DispatcherConfig::default(),
/// )
/// .unwrap()
/// .with_console(console.clone());
///
/// assert_eq!(dispatcher.run(["Ada"], CancellationToken::new()).await, 0);
/// assert_eq!(dispatcher.run(["--help"], CancellationToken::new()).await, 0);
/// assert!(console.out().starts_with("Usage: greet <name>"));
/// # }
/// ```
pub struct Dispatcher {
    tree: CommandTree,
    config: DispatcherConfig,
    console: Arc<dyn Console>,
}

impl Dispatcher {
    /// Validates `root` and builds a dispatcher writing to stdout/stderr.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found in the declared tree.
    pub fn new(root: impl Into<CommandNode>, config: DispatcherConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_tree(CommandTree::new(root)?, config))
    }

    pub fn from_tree(tree: CommandTree, config: DispatcherConfig) -> Self {
        Self {
            tree,
            config,
            console: Arc::new(StdConsole),
        }
    }

    /// Replaces the output destination.
    pub fn with_console(mut self, console: Arc<dyn Console>) -> Self {
        self.console = console;
        self
    }

    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Dispatches one argument vector (without the program name).
    ///
    /// Returns 0 for help requests, the handler's exit code on success and
    /// [`DispatcherConfig::error_exit_code`] for every error.
    pub async fn run<I, S>(&self, args: I, cancel: CancellationToken) -> i32
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let tokens = relocate_help_tokens(&args, self.tree.is_verb_mode());
        debug!(args = ?tokens, "Dispatching");

        if is_help_request(&tokens) {
            let found = resolve_node(&self.tree, &tokens[1..]);
            info!(command = ?found.path, "Help requested");
            self.console.write_out(&render_help(found.node, &found.path));
            return 0;
        }

        let resolution = match resolve(&self.tree, &tokens) {
            Ok(resolution) => resolution,
            Err(err) => {
                debug!(error = %err, "Command resolution failed");
                let found = resolve_node(&self.tree, &tokens);
                self.console.write_err(&format!(
                    "error: {err}\n\n{}",
                    render_help(found.node, &found.path)
                ));
                return self.config.error_exit_code;
            }
        };

        let command = resolution.command;
        let bound = match bind(command.resolved_parameters(), &resolution.remaining) {
            Ok(bound) => bound,
            Err(err) => {
                debug!(command = ?resolution.path, error = %err, "Argument binding failed");
                self.console.write_err(&format!(
                    "error: {err}\n\nRun `{} --help` for usage.\n",
                    resolution.path.join(" ")
                ));
                return self.config.error_exit_code;
            }
        };

        let Some(handler) = command.handler_ref() else {
            // Rejected by tree validation; kept total for direct callers.
            return self.fail(&HandlerError::message(format!(
                "command `{}` has no handler",
                command.name()
            )));
        };

        match invoke(handler, bound, cancel).await {
            Ok(code) => {
                debug!(command = ?resolution.path, code, "Handler finished");
                code
            }
            Err(err) => {
                if err.is_message_only() {
                    debug!(command = ?resolution.path, error = %err, "Handler failed");
                } else {
                    warn!(command = ?resolution.path, error = %err, "Handler failed");
                }
                self.fail(&err)
            }
        }
    }

    fn fail(&self, error: &HandlerError) -> i32 {
        let report = render_error(error, self.config.show_error_details);
        self.console.write_err(&report.into_text());
        self.config.error_exit_code
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("tree", &self.tree)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
