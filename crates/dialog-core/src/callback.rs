//! Callback wrappers for interaction handlers.
//!
//! Handlers are asynchronous. Calling a [`Callback`] only builds its future; the
//! body runs when the future is polled, which [`render`](crate::render) does after
//! the whole tree has been constructed.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::event::SearchOptionsEvent;
use crate::node::Node;

/// A queued handler invocation awaiting execution.
pub type PendingEffect = BoxFuture<'static, anyhow::Result<()>>;

/// Handler answering an external select's option query.
pub type SearchOptionsCallback = Callback<SearchOptionsEvent, Vec<Node>>;

/// A cloneable, thread-safe asynchronous handler.
///
/// ## Type Parameters
///
/// - `Args`: The event the handler receives
/// - `Ret`: The value its future resolves to (defaults to `()`)
///
/// ## Example
///
/// ```ignore
/// use dialog_core::{Callback, InteractionEvent};
///
/// let on_click = Callback::new(|event: InteractionEvent| async move {
///     tracing::info!(user = %event.user.id, "clicked");
///     Ok(())
/// });
/// ```
pub struct Callback<Args, Ret = ()> {
	inner: Arc<dyn Fn(Args) -> BoxFuture<'static, anyhow::Result<Ret>> + Send + Sync + 'static>,
}

impl<Args, Ret> Callback<Args, Ret>
where
	Args: 'static,
	Ret: 'static,
{
	/// Wraps an async closure.
	pub fn new<F, Fut>(f: F) -> Self
	where
		F: Fn(Args) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = anyhow::Result<Ret>> + Send + 'static,
	{
		Self {
			inner: Arc::new(move |args| -> BoxFuture<'static, anyhow::Result<Ret>> {
				Box::pin(f(args))
			}),
		}
	}

	/// Wraps a synchronous closure. Its body still runs only once the returned
	/// future is polled.
	pub fn from_fn<F>(f: F) -> Self
	where
		F: Fn(Args) -> anyhow::Result<Ret> + Send + Sync + 'static,
		Args: Send,
		Ret: Send,
	{
		let f = Arc::new(f);
		Self {
			inner: Arc::new(move |args| -> BoxFuture<'static, anyhow::Result<Ret>> {
				let f = Arc::clone(&f);
				Box::pin(async move { f(args) })
			}),
		}
	}

	/// Builds the future for one invocation.
	pub fn call(&self, args: Args) -> BoxFuture<'static, anyhow::Result<Ret>> {
		(self.inner)(args)
	}
}

impl<Args, Ret> Clone for Callback<Args, Ret> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<Args, Ret> fmt::Debug for Callback<Args, Ret> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Callback").finish_non_exhaustive()
	}
}
