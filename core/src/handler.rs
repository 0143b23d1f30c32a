//! Handler shapes and handler errors.
//!
//! Command handlers can be written in whichever shape fits: with or without
//! the bound arguments, synchronous or asynchronous, returning `()`, `bool`
//! or an `i32` exit code (optionally wrapped in a `Result`). [`Handler`] is
//! the sum type of those shapes; the runtime's execution adapter turns every
//! shape into one exit code.

use std::any::Any;
use std::fmt;
use std::future::Future;

use futures::future::{BoxFuture, FutureExt};
use tokio_util::sync::CancellationToken;

use crate::bind::BoundArgs;

/// Normalized return value of a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The handler returned nothing.
    Unit,
    Bool(bool),
    Code(i32),
}

impl Outcome {
    /// `Unit` and `true` map to 0, `false` to 1, codes pass through.
    ///
    /// # Examples
    ///
    /// ```
    /// use verbtree_core::Outcome;
    ///
    /// assert_eq!(Outcome::Unit.exit_code(), 0);
    /// assert_eq!(Outcome::Bool(true).exit_code(), 0);
    /// assert_eq!(Outcome::Bool(false).exit_code(), 1);
    /// assert_eq!(Outcome::Code(42).exit_code(), 42);
    /// ```
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Unit | Outcome::Bool(true) => 0,
            Outcome::Bool(false) => 1,
            Outcome::Code(code) => code,
        }
    }
}

/// Error escaping a handler.
#[derive(Debug)]
pub enum HandlerError {
    /// Shown to the user as just the message.
    Message(String),
    /// Shown with full diagnostics: type, message and cause chain.
    Failure {
        type_name: &'static str,
        error: anyhow::Error,
    },
    /// Several errors from concurrent work, rendered one by one.
    Aggregate(Vec<HandlerError>),
}

impl HandlerError {
    pub fn message(message: impl Into<String>) -> Self {
        HandlerError::Message(message.into())
    }

    pub fn other(error: anyhow::Error) -> Self {
        HandlerError::Failure {
            type_name: "anyhow::Error",
            error,
        }
    }

    pub fn aggregate(errors: impl IntoIterator<Item = HandlerError>) -> Self {
        HandlerError::Aggregate(errors.into_iter().collect())
    }

    /// Wraps a panic payload caught while running a handler.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "handler panicked".to_string()
        };
        HandlerError::Failure {
            type_name: "panic",
            error: anyhow::anyhow!(message),
        }
    }

    /// `true` if rendering needs no diagnostic detail. An aggregate is
    /// message-only when every inner error is.
    pub fn is_message_only(&self) -> bool {
        match self {
            HandlerError::Message(_) => true,
            HandlerError::Failure { .. } => false,
            HandlerError::Aggregate(inner) => inner.iter().all(HandlerError::is_message_only),
        }
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::Message(message) => f.write_str(message),
            HandlerError::Failure { error, .. } => write!(f, "{error}"),
            HandlerError::Aggregate(inner) => write!(f, "{} errors occurred", inner.len()),
        }
    }
}

impl<E> From<E> for HandlerError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        HandlerError::Failure {
            type_name: std::any::type_name::<E>(),
            error: anyhow::Error::new(error),
        }
    }
}

/// Result of one handler call before exit-code mapping.
pub type HandlerResult = Result<Outcome, HandlerError>;

/// Return types a handler may produce.
pub trait HandlerOutput {
    fn into_outcome(self) -> HandlerResult;
}

impl HandlerOutput for () {
    fn into_outcome(self) -> HandlerResult {
        Ok(Outcome::Unit)
    }
}

impl HandlerOutput for bool {
    fn into_outcome(self) -> HandlerResult {
        Ok(Outcome::Bool(self))
    }
}

impl HandlerOutput for i32 {
    fn into_outcome(self) -> HandlerResult {
        Ok(Outcome::Code(self))
    }
}

impl HandlerOutput for Outcome {
    fn into_outcome(self) -> HandlerResult {
        Ok(self)
    }
}

impl<T, E> HandlerOutput for Result<T, E>
where
    T: HandlerOutput,
    E: Into<HandlerError>,
{
    fn into_outcome(self) -> HandlerResult {
        self.map_err(Into::into).and_then(HandlerOutput::into_outcome)
    }
}

type NoArgsSyncFn = dyn Fn() -> HandlerResult + Send + Sync;
type ArgsSyncFn = dyn Fn(&BoundArgs) -> HandlerResult + Send + Sync;
type NoArgsAsyncFn = dyn Fn(CancellationToken) -> BoxFuture<'static, HandlerResult> + Send + Sync;
type ArgsAsyncFn =
    dyn Fn(BoundArgs, CancellationToken) -> BoxFuture<'static, HandlerResult> + Send + Sync;

/// A command handler in one of four shapes.
///
/// # Examples
///
/// ```
/// use verbtree_core::{BoundArgs, Handler, HandlerShape};
///
/// let h = Handler::sync(|| true);
/// assert_eq!(h.shape(), HandlerShape::NoArgsSync);
///
/// let h = Handler::with_args(|args: &BoundArgs| args.len() as i32);
/// assert_eq!(h.shape(), HandlerShape::ArgsSync);
///
/// let h = Handler::from_async(|_cancel| async { Ok::<_, std::io::Error>(()) });
/// assert_eq!(h.shape(), HandlerShape::NoArgsAsync);
/// ```
pub enum Handler {
    NoArgsSync(Box<NoArgsSyncFn>),
    ArgsSync(Box<ArgsSyncFn>),
    NoArgsAsync(Box<NoArgsAsyncFn>),
    ArgsAsync(Box<ArgsAsyncFn>),
}

/// Tag of a [`Handler`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerShape {
    NoArgsSync,
    ArgsSync,
    NoArgsAsync,
    ArgsAsync,
}

impl Handler {
    pub fn sync<F, R>(f: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        Handler::NoArgsSync(Box::new(move || f().into_outcome()))
    }

    pub fn with_args<F, R>(f: F) -> Self
    where
        F: Fn(&BoundArgs) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        Handler::ArgsSync(Box::new(move |args| f(args).into_outcome()))
    }

    pub fn from_async<F, Fut, R>(f: F) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: HandlerOutput + Send + 'static,
    {
        Handler::NoArgsAsync(Box::new(move |cancel| {
            let fut = f(cancel);
            async move { fut.await.into_outcome() }.boxed()
        }))
    }

    pub fn with_args_async<F, Fut, R>(f: F) -> Self
    where
        F: Fn(BoundArgs, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: HandlerOutput + Send + 'static,
    {
        Handler::ArgsAsync(Box::new(move |args, cancel| {
            let fut = f(args, cancel);
            async move { fut.await.into_outcome() }.boxed()
        }))
    }

    pub fn shape(&self) -> HandlerShape {
        match self {
            Handler::NoArgsSync(_) => HandlerShape::NoArgsSync,
            Handler::ArgsSync(_) => HandlerShape::ArgsSync,
            Handler::NoArgsAsync(_) => HandlerShape::NoArgsAsync,
            Handler::ArgsAsync(_) => HandlerShape::ArgsAsync,
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler").field(&self.shape()).finish()
    }
}
