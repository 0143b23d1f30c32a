//! Rendering of errors that end a run.

use std::backtrace::BacktraceStatus;
use std::fmt::Write;

use verbtree_core::HandlerError;

/// Line appended when a detailed report could not include a call history.
pub const DETAILS_HINT: &str = "Set RUST_BACKTRACE=1 to capture a backtrace.";

/// Text shown for an error, plus whether a details hint should follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub text: String,
    pub show_details: bool,
}

impl ErrorReport {
    /// Final text including the trailing hint, if any.
    pub fn into_text(self) -> String {
        if self.show_details {
            format!("{}{DETAILS_HINT}\n", self.text)
        } else {
            self.text
        }
    }
}

/// Renders a handler error.
///
/// Message-only errors print just their message. Failures print the error
/// type and message; with `details` they also print the cause chain and,
/// when one was captured, the backtrace. Aggregates render each inner error.
/// The hint is asked for only with `details`, when some inner error is not
/// message-only and has no captured backtrace.
///
/// A panicking handler is reported here too; the adapter keeps the default
/// panic hook quiet while the handler runs.
///
/// # Examples
///
/// ```
/// use verbtree_core::HandlerError;
/// use verbtree_runtime::render_error;
///
/// let report = render_error(&HandlerError::message("remote `origin` exists"), true);
/// assert_eq!(report.text, "error: remote `origin` exists\n");
/// assert!(!report.show_details);
/// ```
pub fn render_error(error: &HandlerError, details: bool) -> ErrorReport {
    let mut text = String::new();
    write_error(&mut text, error, details, 0);
    ErrorReport {
        text,
        show_details: details && lacks_backtrace(error),
    }
}

/// `true` if some non-message error carries no captured backtrace.
fn lacks_backtrace(error: &HandlerError) -> bool {
    match error {
        HandlerError::Message(_) => false,
        HandlerError::Failure { error, .. } => {
            error.backtrace().status() != BacktraceStatus::Captured
        }
        HandlerError::Aggregate(inner) => inner.iter().any(lacks_backtrace),
    }
}

fn write_error(out: &mut String, error: &HandlerError, details: bool, depth: usize) {
    let indent = "  ".repeat(depth);
    let label = if depth == 0 { "error: " } else { "- " };

    match error {
        HandlerError::Message(message) => {
            let _ = writeln!(out, "{indent}{label}{message}");
        }
        HandlerError::Failure { type_name, error } => {
            let _ = writeln!(out, "{indent}{label}{type_name}: {error}");
            if details {
                for cause in error.chain().skip(1) {
                    let _ = writeln!(out, "{indent}  caused by: {cause}");
                }
                let backtrace = error.backtrace();
                if backtrace.status() == BacktraceStatus::Captured {
                    let _ = writeln!(out, "{indent}  call history:");
                    for line in backtrace.to_string().lines() {
                        let _ = writeln!(out, "{indent}    {line}");
                    }
                }
            }
        }
        HandlerError::Aggregate(inner) => {
            let _ = writeln!(out, "{indent}{label}{} errors occurred", inner.len());
            for e in inner {
                write_error(out, e, details, depth + 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured(error: &anyhow::Error) -> bool {
        error.backtrace().status() == BacktraceStatus::Captured
    }

    #[test]
    fn test_failure_shows_type_and_causes() {
        let error = anyhow::anyhow!("connection refused").context("fetching origin");
        let has_backtrace = captured(&error);
        let report = render_error(&HandlerError::other(error), true);

        assert!(report.text.starts_with(
            "error: anyhow::Error: fetching origin\n  caused by: connection refused\n"
        ));
        assert_eq!(report.text.contains("  call history:\n"), has_backtrace);
        assert_eq!(report.show_details, !has_backtrace);
    }

    #[test]
    fn test_failure_without_details_is_terse() {
        let error = anyhow::anyhow!("inner").context("outer");
        let report = render_error(&HandlerError::other(error), false);

        assert_eq!(report.text, "error: anyhow::Error: outer\n");
        assert!(!report.show_details);
        assert!(!report.into_text().contains(DETAILS_HINT));
    }

    #[test]
    fn test_message_aggregate_has_no_hint() {
        let error = HandlerError::aggregate([
            HandlerError::message("first"),
            HandlerError::message("second"),
        ]);
        let report = render_error(&error, true);

        assert_eq!(report.text, "error: 2 errors occurred\n  - first\n  - second\n");
        assert!(!report.show_details);
        assert_eq!(report.clone().into_text(), report.text);
    }

    #[test]
    fn test_mixed_aggregate_asks_for_details() {
        let failure = anyhow::Error::new(std::io::Error::other("disk full"));
        let has_backtrace = captured(&failure);
        let error = HandlerError::aggregate([
            HandlerError::message("first"),
            HandlerError::Failure {
                type_name: "std::io::Error",
                error: failure,
            },
        ]);
        let report = render_error(&error, true);

        assert!(report.text.contains("  - first\n"));
        assert!(report.text.contains("  - std::io::Error: disk full\n"));
        assert_eq!(report.show_details, !has_backtrace);
    }

    #[test]
    fn test_hint_appended_only_when_asked() {
        let report = ErrorReport {
            text: "error: x\n".to_string(),
            show_details: true,
        };
        assert_eq!(report.into_text(), format!("error: x\n{DETAILS_HINT}\n"));
    }
}
