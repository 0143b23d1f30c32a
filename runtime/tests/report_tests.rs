//! Error reports with backtrace capture switched on.
//!
//! Kept in its own test binary: the environment is set before the first
//! backtrace is captured in this process.

use verbtree_core::HandlerError;
use verbtree_runtime::{DETAILS_HINT, render_error};

#[test]
fn test_details_include_call_history_when_captured() {
    // SAFETY: the only test in this binary, run before any other thread
    // reads the environment.
    unsafe {
        std::env::remove_var("RUST_LIB_BACKTRACE");
        std::env::set_var("RUST_BACKTRACE", "1");
    }

    let error = HandlerError::other(anyhow::anyhow!("boom").context("syncing remotes"));
    let report = render_error(&error, true);

    assert!(
        report
            .text
            .starts_with("error: anyhow::Error: syncing remotes\n  caused by: boom\n  call history:\n"),
        "{}",
        report.text
    );
    assert!(report.text.lines().count() > 4);
    assert!(!report.show_details);
    assert!(!report.clone().into_text().contains(DETAILS_HINT));

    let terse = render_error(&error, false);
    assert_eq!(terse.text, "error: anyhow::Error: syncing remotes\n");
    assert!(!terse.show_details);

    let aggregate = HandlerError::aggregate([
        HandlerError::message("first"),
        HandlerError::from(std::io::Error::other("disk full")),
    ]);
    let report = render_error(&aggregate, true);
    assert!(report.text.contains("    call history:\n"), "{}", report.text);
    assert!(!report.show_details);
}
