//! Console boundary.
//!
//! The dispatcher only ever writes finished text; terminal handling stays
//! outside the framework behind [`Console`].

use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// Destination for user-facing output.
pub trait Console: Send + Sync {
    /// Regular output (help text).
    fn write_out(&self, text: &str);
    /// Diagnostics (errors).
    fn write_err(&self, text: &str);
}

/// Writes to the process's stdout and stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdConsole;

impl Console for StdConsole {
    fn write_out(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        // A closed pipe is not worth failing the run over.
        let _ = out.write_all(text.as_bytes()).and_then(|()| out.flush());
    }

    fn write_err(&self, text: &str) {
        let _ = std::io::stderr().lock().write_all(text.as_bytes());
    }
}

/// Captures output in memory.
///
/// # Examples
///
/// ```
/// use verbtree_runtime::{Console, MemoryConsole};
///
/// let console = MemoryConsole::default();
/// console.write_out("hello\n");
/// console.write_err("oops\n");
/// assert_eq!(console.out(), "hello\n");
/// assert_eq!(console.err(), "oops\n");
/// ```
#[derive(Debug, Default)]
pub struct MemoryConsole {
    out: Mutex<String>,
    err: Mutex<String>,
}

impl MemoryConsole {
    pub fn out(&self) -> String {
        self.out.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn err(&self) -> String {
        self.err.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Console for MemoryConsole {
    fn write_out(&self, text: &str) {
        self.out
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(text);
    }

    fn write_err(&self, text: &str) {
        self.err
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(text);
    }
}
