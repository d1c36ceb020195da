//! Modal hook.
//!
//! During a live interaction `use_modal` hands out a launcher that renders a
//! modal surface and opens it on the platform. During submission replay the
//! launcher is inert; instead the hook records which modal's handlers must
//! fire, at most once per dispatch.

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use dialog_core::{Callback, DialogError, InteractionEvent, SubmitEvent, render};
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde_json::Value;

use crate::cache::{Item, SharedState, SurfaceKind};
use crate::error::{DispatchError, DispatchResult};
use crate::hooks::StateHook;
use crate::runtime::Runtime;
use crate::surface::{SharedSurface, ViewContext};

/// Handler receiving a modal's submitted form.
pub type SubmitCallback = Callback<SubmitEvent>;

/// Handlers for one modal key.
#[derive(Clone, Default)]
pub struct ModalHandlers {
	pub on_submit: Option<SubmitCallback>,
	pub on_cancel: Option<Callback<InteractionEvent>>,
}

impl ModalHandlers {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn on_submit<F, Fut>(mut self, f: F) -> Self
	where
		F: Fn(SubmitEvent) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
	{
		self.on_submit = Some(Callback::new(f));
		self
	}

	/// Runs when the user closes the modal without submitting.
	pub fn on_cancel<F, Fut>(mut self, f: F) -> Self
	where
		F: Fn(InteractionEvent) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
	{
		self.on_cancel = Some(Callback::new(f));
		self
	}
}

impl fmt::Debug for ModalHandlers {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ModalHandlers")
			.field("on_submit", &self.on_submit.is_some())
			.field("on_cancel", &self.on_cancel.is_some())
			.finish()
	}
}

/// Where a launched modal comes from.
#[derive(Clone)]
pub struct ModalContext {
	trigger_id: Option<String>,
	invoker_key: String,
	runtime: Arc<Runtime>,
}

impl ModalContext {
	pub fn new(
		trigger_id: Option<String>,
		invoker_key: impl Into<String>,
		runtime: Arc<Runtime>,
	) -> Self {
		Self {
			trigger_id,
			invoker_key: invoker_key.into(),
			runtime,
		}
	}
}

#[derive(Clone)]
enum Mode {
	Launching(ModalContext),
	Replaying { target: Option<String> },
}

/// Factory for `use_modal`, shared by every pass of one dispatch.
#[derive(Clone)]
pub struct ModalHook {
	mode: Mode,
	registry: Arc<Mutex<IndexMap<String, ModalHandlers>>>,
	executed: Arc<Mutex<HashSet<String>>>,
	matched: Arc<Mutex<Vec<String>>>,
}

impl ModalHook {
	fn with_mode(mode: Mode) -> Self {
		Self {
			mode,
			registry: Arc::default(),
			executed: Arc::default(),
			matched: Arc::default(),
		}
	}

	/// Launchers open modals from `cx`.
	pub fn launching(cx: ModalContext) -> Self {
		Self::with_mode(Mode::Launching(cx))
	}

	/// Launchers are inert; handlers registered under `target` are matched once.
	pub fn replaying(target: Option<String>) -> Self {
		Self::with_mode(Mode::Replaying { target })
	}

	/// Launchers are inert and nothing is matched.
	pub fn inert() -> Self {
		Self::replaying(None)
	}

	/// Registers the handlers for `key` and returns its launcher.
	pub fn use_modal(
		&self,
		key: &str,
		surface: SharedSurface,
		handlers: ModalHandlers,
	) -> ModalLauncher {
		self.registry.lock().insert(key.to_string(), handlers);
		match &self.mode {
			Mode::Launching(cx) => ModalLauncher {
				key: key.to_string(),
				target: Some((surface, cx.clone())),
			},
			Mode::Replaying { target } => {
				if target.as_deref() == Some(key) && self.executed.lock().insert(key.to_string()) {
					self.matched.lock().push(key.to_string());
				}
				ModalLauncher {
					key: key.to_string(),
					target: None,
				}
			}
		}
	}

	/// Handlers last registered for `key`.
	pub fn handlers(&self, key: &str) -> Option<ModalHandlers> {
		self.registry.lock().get(key).cloned()
	}

	/// Handlers matched since the last call, each at most once per dispatch.
	pub fn take_matched(&self) -> Vec<ModalHandlers> {
		let keys = std::mem::take(&mut *self.matched.lock());
		keys.iter().filter_map(|key| self.handlers(key)).collect()
	}
}

/// Opens one modal surface.
#[derive(Clone)]
pub struct ModalLauncher {
	key: String,
	target: Option<(SharedSurface, ModalContext)>,
}

impl ModalLauncher {
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Renders the modal with a fresh state bag and opens it.
	///
	/// The opened modal is cached under its view id, linked back to the surface
	/// that opened it. Does nothing during replay.
	pub async fn open(&self, props: Value) -> DispatchResult<()> {
		let Some((surface, cx)) = &self.target else {
			tracing::debug!(modal = %self.key, "modal launch ignored during replay");
			return Ok(());
		};
		let trigger_id = cx
			.trigger_id
			.as_deref()
			.ok_or_else(|| DispatchError::MissingTrigger(self.key.clone()))?;

		let state = SharedState::new();
		let view_cx = ViewContext::new(
			props.clone(),
			None,
			StateHook::bound(state.clone()),
			ModalHook::inert(),
			cx.runtime.client(),
		);
		let tree = surface.render(&view_cx);
		let view = render(&tree, None)
			.await?
			.ok_or_else(|| DialogError::missing_markup(surface.name()))?;
		let view = notify_on_close(view);

		let opened = cx.runtime.client().open_modal(trigger_id, &view).await?;
		cx.runtime.surfaces().register(Arc::clone(surface));
		cx.runtime.cache().set(
			&opened.id,
			Item::new(SurfaceKind::Modal, opened.id.as_str(), surface.name())
				.with_state(state)
				.with_props(props)
				.with_view(view)
				.with_modal(self.key.as_str(), cx.invoker_key.as_str()),
		);
		tracing::debug!(
			modal = %self.key,
			view_id = %opened.id,
			invoker = %cx.invoker_key,
			"opened modal"
		);
		Ok(())
	}
}

impl fmt::Debug for ModalLauncher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ModalLauncher")
			.field("key", &self.key)
			.field("live", &self.target.is_some())
			.finish()
	}
}

/// Asks the platform to report when the modal is closed.
pub(crate) fn notify_on_close(mut view: Value) -> Value {
	if let Some(map) = view.as_object_mut() {
		map.insert("notify_on_close".to_string(), Value::Bool(true));
	}
	view
}
