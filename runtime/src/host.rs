//! Process bootstrap: logging and Ctrl-C cancellation.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::DispatcherConfig;

/// Process-level state shared by every run of a CLI.
#[derive(Debug, Clone)]
pub struct Host {
    cancellation: CancellationToken,
}

impl Host {
    /// Installs the `tracing` subscriber and, inside a Tokio runtime, a
    /// Ctrl-C listener that cancels [`Host::cancellation`].
    ///
    /// `RUST_LOG` wins over [`DispatcherConfig::log_filter`]. Logs go to
    /// stderr so command output stays clean. Calling this twice keeps the
    /// first subscriber.
    pub fn initialize(config: &DispatcherConfig) -> Self {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
        if tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_err()
        {
            debug!("Tracing subscriber already installed");
        }

        let cancellation = CancellationToken::new();
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let token = cancellation.clone();
            handle.spawn(async move {
                tokio::select! {
                    result = tokio::signal::ctrl_c() => {
                        if result.is_ok() {
                            info!("Interrupt received, cancelling");
                            token.cancel();
                        }
                    }
                    () = token.cancelled() => {}
                }
            });
        }

        Self { cancellation }
    }

    /// Token handed to asynchronous handlers.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Stops the Ctrl-C listener and signals any running handler.
    pub fn shutdown(&self) {
        self.cancellation.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize_twice_is_harmless() {
        let first = Host::initialize(&DispatcherConfig::default());
        let second = Host::initialize(&DispatcherConfig::default());
        assert!(!first.cancellation().is_cancelled());

        second.shutdown();
        assert!(second.cancellation().is_cancelled());
        assert!(!first.cancellation().is_cancelled());
        first.shutdown();
    }

    #[test]
    fn test_initialize_outside_runtime() {
        let host = Host::initialize(&DispatcherConfig::default());
        assert!(!host.cancellation().is_cancelled());
    }
}
