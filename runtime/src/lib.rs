//! Dispatch runtime for `verbtree` command trees.
//!
//! [`Dispatcher::run`] takes an argument vector through help relocation,
//! verb resolution, argument binding and handler invocation, and returns a
//! process exit code. Errors are rendered to a [`Console`] and mapped to
//! [`DispatcherConfig::error_exit_code`].
//!
//! # Example
//!
//! ```no_run
//! use verbtree_core::{Command, Param, VerbGroup};
//! use verbtree_runtime::{Dispatcher, DispatcherConfig, Host};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = DispatcherConfig::default();
//!     let host = Host::initialize(&config);
//!
//!     let name = Param::<String>::positional("name", 0).build();
//!     let handle = name.clone();
//!     let root = VerbGroup::new("app").child(
//!         Command::new("greet")
//!             .param(&name)
//!             .handler_sync(move || println!("Hello, {}!", handle.value().unwrap_or_default())),
//!     );
//!
//!     let dispatcher = Dispatcher::new(root, config).expect("valid command tree");
//!     let code = dispatcher.run(std::env::args().skip(1), host.cancellation()).await;
//!     std::process::exit(code);
//! }
//! ```

mod adapter;
mod config;
mod console;
mod dispatcher;
mod error;
mod host;
mod report;

pub use adapter::invoke;
pub use config::{DEFAULT_ERROR_EXIT_CODE, DispatcherConfig};
pub use console::{Console, MemoryConsole, StdConsole};
pub use dispatcher::Dispatcher;
pub use error::{ConfigLoadError, Result};
pub use host::Host;
pub use report::{DETAILS_HINT, ErrorReport, render_error};
