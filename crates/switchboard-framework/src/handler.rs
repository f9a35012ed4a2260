//! Handler system for interaction callbacks.
//!
//! A handler is any async function taking the event it was routed for, wrapped
//! in an `Arc` so the dispatcher can hand it off without copying:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use switchboard_core::CommandInvocation;
//!
//! async fn ping(invocation: Arc<CommandInvocation>) {
//!     tracing::info!(command = %invocation.name, "pong");
//! }
//! ```
//!
//! Closures work the same way: `|event| async move { ... }`.

use std::future::Future;
use std::sync::Arc;

pub use futures::future::BoxFuture;

/// The trait implemented by every command, autocomplete and component handler.
///
/// It is implemented automatically for `Fn(Arc<E>) -> impl Future<Output = ()>`.
/// Handlers return nothing: responding to the user goes through the platform
/// client and is the handler's own business.
pub trait Handler<E>: Send + Sync + 'static {
    /// Invokes the handler for the given event.
    fn call(&self, event: Arc<E>) -> BoxFuture<'static, ()>;
}

impl<E, F, Fut> Handler<E> for F
where
    E: Send + Sync + 'static,
    F: Fn(Arc<E>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn call(&self, event: Arc<E>) -> BoxFuture<'static, ()> {
        Box::pin(self(event))
    }
}

/// A shared, type-erased handler.
pub type BoxedHandler<E> = Arc<dyn Handler<E>>;

/// Boxes a handler.
pub fn into_handler<E, H>(handler: H) -> BoxedHandler<E>
where
    H: Handler<E>,
{
    Arc::new(handler)
}

/// Returns a printable identity for a handler type.
///
/// For named functions this is the function path; closures show up as the
/// enclosing function followed by `{{closure}}`.
pub fn handler_name<H>() -> &'static str {
    std::any::type_name::<H>()
}
