//! Execution adapter: runs any handler shape and yields one exit code.

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe, catch_unwind};
use std::sync::Once;

use futures::future::{BoxFuture, FutureExt, poll_fn};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use verbtree_core::{BoundArgs, Handler, HandlerError, HandlerResult};

/// Invokes `handler` and maps its outcome to an exit code.
///
/// Synchronous shapes run inline on the calling task. Asynchronous shapes
/// receive `cancel` and are awaited. A panic in either is caught and
/// reported as a [`HandlerError::Failure`]. The process panic hook stays
/// silent for those panics; panics elsewhere still reach the previous hook.
///
/// # Examples
///
/// ```
/// use verbtree_core::{BoundArgs, CancellationToken, Handler};
/// use verbtree_runtime::invoke;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let handler = Handler::sync(|| false);
/// let code = invoke(&handler, BoundArgs::default(), CancellationToken::new()).await;
/// assert_eq!(code.unwrap(), 1);
/// # }
/// ```
pub async fn invoke(
    handler: &Handler,
    args: BoundArgs,
    cancel: CancellationToken,
) -> Result<i32, HandlerError> {
    install_panic_hook();
    debug!(shape = ?handler.shape(), "Invoking handler");

    let result = match handler {
        Handler::NoArgsSync(f) => run_sync(|| f()),
        Handler::ArgsSync(f) => run_sync(|| f(&args)),
        Handler::NoArgsAsync(f) => run_async(|| f(cancel)).await,
        Handler::ArgsAsync(f) => run_async(|| f(args, cancel)).await,
    };

    result.map(|outcome| outcome.exit_code())
}

thread_local! {
    static IN_HANDLER: Cell<bool> = const { Cell::new(false) };
}

/// Chains a hook in front of the current one that skips handler panics.
///
/// Those panics are reported through the dispatcher instead, so the default
/// `thread '...' panicked at` line would only duplicate them.
fn install_panic_hook() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if IN_HANDLER.get() {
                debug!(panic = %info, "Handler panicked");
            } else {
                previous(info);
            }
        }));
    });
}

/// Runs `f` with handler panics hidden from the panic hook on this thread.
fn quiet<R>(f: impl FnOnce() -> R) -> R {
    let was = IN_HANDLER.replace(true);
    let out = f();
    IN_HANDLER.set(was);
    out
}

fn run_sync(call: impl FnOnce() -> HandlerResult) -> HandlerResult {
    quiet(|| catch_unwind(AssertUnwindSafe(call)))
        .unwrap_or_else(|payload| Err(HandlerError::from_panic(payload)))
}

async fn run_async(start: impl FnOnce() -> BoxFuture<'static, HandlerResult>) -> HandlerResult {
    // Building the future may itself panic before the first poll.
    let future = match quiet(|| catch_unwind(AssertUnwindSafe(start))) {
        Ok(future) => future,
        Err(payload) => return Err(HandlerError::from_panic(payload)),
    };

    // Only the handler's own polls are quiet, not the awaiting task's.
    let mut future = AssertUnwindSafe(future).catch_unwind();
    poll_fn(|cx| quiet(|| future.poll_unpin(cx)))
        .await
        .unwrap_or_else(|payload| Err(HandlerError::from_panic(payload)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use verbtree_core::Outcome;

    async fn run(handler: Handler) -> Result<i32, HandlerError> {
        invoke(&handler, BoundArgs::default(), CancellationToken::new()).await
    }

    #[tokio::test]
    async fn test_sync_shapes() {
        assert_eq!(run(Handler::sync(|| ())).await.unwrap(), 0);
        assert_eq!(run(Handler::sync(|| true)).await.unwrap(), 0);
        assert_eq!(run(Handler::sync(|| false)).await.unwrap(), 1);
        assert_eq!(run(Handler::with_args(|_: &BoundArgs| 42)).await.unwrap(), 42);
        assert_eq!(run(Handler::sync(|| Outcome::Code(-3))).await.unwrap(), -3);
    }

    #[tokio::test]
    async fn test_async_shapes() {
        let h = Handler::from_async(|_cancel| async { 7 });
        assert_eq!(run(h).await.unwrap(), 7);

        let h = Handler::with_args_async(|args: BoundArgs, _cancel| async move { args.is_empty() });
        assert_eq!(run(h).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_async_handler_sees_cancellation() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let h = Handler::from_async(|cancel: CancellationToken| async move {
            if cancel.is_cancelled() {
                130
            } else {
                0
            }
        });
        assert_eq!(invoke(&h, BoundArgs::default(), cancel).await.unwrap(), 130);
    }

    #[tokio::test]
    async fn test_errors_pass_through() {
        let h = Handler::sync(|| Err::<(), _>(HandlerError::message("nope")));
        match run(h).await {
            Err(HandlerError::Message(m)) => assert_eq!(m, "nope"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_panics_become_failures() {
        let h = Handler::sync(|| -> i32 { panic!("sync boom") });
        match run(h).await {
            Err(HandlerError::Failure { type_name, error }) => {
                assert_eq!(type_name, "panic");
                assert_eq!(error.to_string(), "sync boom");
            }
            other => panic!("unexpected: {other:?}"),
        }

        let h = Handler::from_async(|_cancel| async {
            if true {
                panic!("async boom");
            }
            0
        });
        let err = run(h).await.unwrap_err();
        assert_eq!(err.to_string(), "async boom");
        assert!(!err.is_message_only());
    }
}
