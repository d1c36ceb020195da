//! Surfaces: named functions from a [`ViewContext`] to a component tree.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dialog_core::{Node, User};
use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::PlatformClient;
use crate::hooks::{ModalHandlers, ModalHook, ModalLauncher, StateHook, StateSetter};

/// A renderable home tab, modal or message.
pub trait Surface: Send + Sync {
	/// Registry name, also stored on cached items.
	fn name(&self) -> &str;

	/// Builds the component tree for one pass.
	fn render(&self, cx: &ViewContext) -> Node;
}

pub type SharedSurface = Arc<dyn Surface>;

/// A [`Surface`] backed by a closure.
pub struct FnSurface<F> {
	name: String,
	render: F,
}

impl<F> Surface for FnSurface<F>
where
	F: Fn(&ViewContext) -> Node + Send + Sync,
{
	fn name(&self) -> &str {
		&self.name
	}

	fn render(&self, cx: &ViewContext) -> Node {
		(self.render)(cx)
	}
}

/// Creates a shared surface from a closure.
///
/// ```ignore
/// let counter = surface("Counter", |cx| {
///     let (count, set_count) = cx.use_state("count", 0_u32);
///     Home::new()
///         .child(Section::new().text(format!("Clicked {count} times")))
///         .into()
/// });
/// ```
pub fn surface<F>(name: impl Into<String>, render: F) -> SharedSurface
where
	F: Fn(&ViewContext) -> Node + Send + Sync + 'static,
{
	Arc::new(FnSurface {
		name: name.into(),
		render,
	})
}

/// What a surface sees while rendering.
pub struct ViewContext {
	props: Value,
	user: Option<User>,
	state: StateHook,
	modal: ModalHook,
	client: Arc<dyn PlatformClient>,
}

impl ViewContext {
	pub fn new(
		props: Value,
		user: Option<User>,
		state: StateHook,
		modal: ModalHook,
		client: Arc<dyn PlatformClient>,
	) -> Self {
		Self {
			props,
			user,
			state,
			modal,
			client,
		}
	}

	pub fn props(&self) -> &Value {
		&self.props
	}

	pub fn prop_str(&self, key: &str) -> Option<&str> {
		self.props.get(key).and_then(Value::as_str)
	}

	/// The interacting user, when the pass replays one.
	pub fn user(&self) -> Option<&User> {
		self.user.as_ref()
	}

	/// Platform client for use inside handlers.
	pub fn client(&self) -> Arc<dyn PlatformClient> {
		Arc::clone(&self.client)
	}

	/// See [`StateHook::use_state`].
	pub fn use_state<T>(&self, key: &str, initial: T) -> (T, StateSetter<T>)
	where
		T: Serialize + DeserializeOwned,
	{
		self.state.use_state(key, initial)
	}

	/// See [`ModalHook::use_modal`].
	pub fn use_modal(
		&self,
		key: &str,
		surface: SharedSurface,
		handlers: ModalHandlers,
	) -> ModalLauncher {
		self.modal.use_modal(key, surface, handlers)
	}
}

impl fmt::Debug for ViewContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ViewContext")
			.field("props", &self.props)
			.field("user", &self.user)
			.finish_non_exhaustive()
	}
}

/// Surfaces known to the dispatcher, by name.
#[derive(Default)]
pub struct SurfaceRegistry {
	surfaces: RwLock<HashMap<String, SharedSurface>>,
}

impl SurfaceRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a surface under its name, replacing any previous one.
	pub fn register(&self, surface: SharedSurface) {
		let name = surface.name().to_string();
		if self.surfaces.write().insert(name.clone(), surface).is_none() {
			tracing::debug!(surface = %name, "registered surface");
		}
	}

	pub fn get(&self, name: &str) -> Option<SharedSurface> {
		self.surfaces.read().get(name).cloned()
	}

	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.surfaces.read().keys().cloned().collect();
		names.sort();
		names
	}
}
