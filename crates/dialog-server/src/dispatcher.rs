//! Interaction dispatcher.
//!
//! Resolves the cached item behind an interaction, replays its surface with
//! hooks bound to the item, awaits the handlers the replay queued, renders
//! once more, sends the new document to the platform and writes the item
//! back.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dialog_core::{
	Action, DialogError, InteractionEvent, SearchOptionsEvent, SubmitEvent, User, generate_event,
	reconcile, render,
};
use parking_lot::{Mutex, RwLock};
use serde_json::{Value, json};
use tokio::sync::OwnedMutexGuard;

use crate::cache::{Item, SharedState, SurfaceKind, ViewStore};
use crate::client::PlatformClient;
use crate::error::{DispatchError, DispatchResult};
use crate::form::normalize_form;
use crate::hooks::modal::notify_on_close;
use crate::hooks::{ModalContext, ModalHook, StateHook};
use crate::payload::{
	BlockActionsPayload, BlockSuggestionPayload, HomeOpenedEvent, InteractionPayload,
	ShortcutPayload, ViewSubmissionPayload,
};
use crate::runtime::Runtime;
use crate::surface::{SharedSurface, ViewContext};

/// Steps of one dispatch, as traced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPhase {
	Resolving,
	Replaying,
	Executing,
	Rerendering,
	Updating,
	Done,
	Failed,
}

impl fmt::Display for DispatchPhase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Resolving => "resolving",
			Self::Replaying => "replaying",
			Self::Executing => "executing",
			Self::Rerendering => "re-rendering",
			Self::Updating => "updating",
			Self::Done => "done",
			Self::Failed => "failed",
		})
	}
}

fn phase(phase: DispatchPhase, key: &str) {
	tracing::debug!(target: "dialog::dispatcher", phase = %phase, key, "dispatch");
}

/// Options of the home surface.
#[derive(Debug, Clone)]
pub struct HomeOptions {
	/// Ignore `app_home_opened` events for tabs other than `home`.
	pub only_open: bool,
	/// Extra props merged into the home's props.
	pub props: Value,
}

impl Default for HomeOptions {
	fn default() -> Self {
		Self {
			only_open: true,
			props: Value::Null,
		}
	}
}

/// Where and with which props a message surface is posted.
#[derive(Debug, Clone)]
pub struct MessageOptions {
	pub channel: String,
	pub props: Value,
}

impl MessageOptions {
	pub fn new(channel: impl Into<String>) -> Self {
		Self {
			channel: channel.into(),
			props: Value::Null,
		}
	}

	pub fn with_props(mut self, props: Value) -> Self {
		self.props = props;
		self
	}
}

/// One async lock per surface key, so dispatches against the same item run
/// one after another.
#[derive(Default)]
struct SurfaceLocks {
	locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl SurfaceLocks {
	async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
		let lock = Arc::clone(self.locks.lock().entry(key.to_string()).or_default());
		lock.lock_owned().await
	}
}

/// Routes platform events and interactions to registered surfaces.
pub struct Dispatcher {
	runtime: Arc<Runtime>,
	home: RwLock<Option<(SharedSurface, HomeOptions)>>,
	shortcuts: RwLock<HashMap<String, SharedSurface>>,
	locks: SurfaceLocks,
}

impl Dispatcher {
	pub fn new(cache: Arc<dyn ViewStore>, client: Arc<dyn PlatformClient>) -> Self {
		Self {
			runtime: Arc::new(Runtime::new(cache, client)),
			home: RwLock::new(None),
			shortcuts: RwLock::new(HashMap::new()),
			locks: SurfaceLocks::default(),
		}
	}

	pub fn cache(&self) -> &Arc<dyn ViewStore> {
		self.runtime.cache()
	}

	pub fn runtime(&self) -> &Arc<Runtime> {
		&self.runtime
	}

	/// Sets the surface rendered for the app home tab.
	pub fn register_home(&self, surface: SharedSurface, options: HomeOptions) {
		self.runtime.surfaces().register(Arc::clone(&surface));
		*self.home.write() = Some((surface, options));
	}

	/// Sets the surface opened as a modal by a global shortcut.
	pub fn register_shortcut(&self, callback_id: impl Into<String>, surface: SharedSurface) {
		self.runtime.surfaces().register(Arc::clone(&surface));
		self.shortcuts.write().insert(callback_id.into(), surface);
	}

	/// Registers a surface that only modals or messages refer to.
	pub fn register(&self, surface: SharedSurface) {
		self.runtime.surfaces().register(surface);
	}

	fn view_context(
		&self,
		item_props: Value,
		user: Option<User>,
		state: StateHook,
		modal: ModalHook,
	) -> ViewContext {
		ViewContext::new(item_props, user, state, modal, self.runtime.client())
	}

	fn resolve(&self, key: &str) -> DispatchResult<(Item, SharedSurface)> {
		phase(DispatchPhase::Resolving, key);
		let item = self
			.runtime
			.cache()
			.get(key)
			.ok_or_else(|| DialogError::missing_state(key))?;
		let surface = self
			.runtime
			.surfaces()
			.get(&item.name)
			.ok_or_else(|| DispatchError::UnknownSurface(item.name.clone()))?;
		Ok((item, surface))
	}

	/// Renders the home tab for `app_home_opened` and publishes it.
	///
	/// `on_load` handlers run during this render. Returns `None` when no home
	/// is registered or the event is filtered out.
	pub async fn home_opened(&self, event: &HomeOpenedEvent) -> DispatchResult<Option<Item>> {
		let Some((surface, options)) = self.home.read().clone() else {
			tracing::debug!(user = %event.user, "no home surface registered");
			return Ok(None);
		};
		if options.only_open && event.tab != "home" {
			return Ok(None);
		}

		let previous_key = event.view.as_ref().map(|view| view.id.clone());
		let lock_key = previous_key.clone().unwrap_or_else(|| format!("home:{}", event.user));
		let _guard = self.locks.acquire(&lock_key).await;

		let state = previous_key
			.as_deref()
			.and_then(|key| self.runtime.cache().get(key))
			.map(|item| item.state)
			.unwrap_or_default();
		let user = User::from_id(&event.user);
		let props = merge_props(&options.props, json!({"user": event.user}));

		phase(DispatchPhase::Replaying, &lock_key);
		let modal = ModalHook::launching(ModalContext::new(
			None,
			lock_key.clone(),
			Arc::clone(&self.runtime),
		));
		let cx = self.view_context(
			props.clone(),
			Some(user.clone()),
			StateHook::bound(state.clone()),
			modal,
		);
		let action = Action::onload(InteractionEvent::new(user));
		let view = render(&surface.render(&cx), Some(&action))
			.await?
			.ok_or_else(|| {
				DialogError::new("Missing home markup")
					.with_content(format!(
						"`{}` rendered nothing for the home tab",
						surface.name()
					))
			})?;

		phase(DispatchPhase::Updating, &lock_key);
		let published = self.runtime.client().publish_home(&event.user, &view).await?;
		let item = self.runtime.cache().set(
			&published.id,
			Item::new(SurfaceKind::Home, published.id.as_str(), surface.name())
				.with_state(state)
				.with_props(props)
				.with_view(view),
		);
		phase(DispatchPhase::Done, &published.id);
		Ok(Some(item))
	}

	/// Renders a message surface, posts it and caches it under `channel:ts`.
	pub async fn post_message(
		&self,
		surface: SharedSurface,
		options: MessageOptions,
	) -> DispatchResult<Item> {
		self.runtime.surfaces().register(Arc::clone(&surface));
		let state = SharedState::new();
		let modal = ModalHook::launching(ModalContext::new(
			None,
			surface.name(),
			Arc::clone(&self.runtime),
		));
		let cx = self.view_context(
			options.props.clone(),
			None,
			StateHook::bound(state.clone()),
			modal,
		);
		let view = render(&surface.render(&cx), None)
			.await?
			.ok_or_else(|| DialogError::missing_markup(surface.name()))?;

		let posted = self.runtime.client().post_message(&options.channel, &view).await?;
		let key = format!("{}:{}", posted.channel, posted.ts);
		let item = self.runtime.cache().set(
			&key,
			Item::new(SurfaceKind::Message, posted.channel.as_str(), surface.name())
				.with_ts(posted.ts.as_str())
				.with_state(state)
				.with_props(options.props)
				.with_view(view),
		);
		phase(DispatchPhase::Done, &key);
		Ok(item)
	}

	/// Replays every action of a block-actions payload, then re-renders and
	/// updates the surface.
	pub async fn block_actions(&self, payload: &BlockActionsPayload) -> DispatchResult<()> {
		let key = payload.surface_key().ok_or(DispatchError::MissingSurfaceKey)?;
		let _guard = self.locks.acquire(&key).await;
		let (item, surface) = self.resolve(&key)?;

		let state = StateHook::bound(item.state.clone());
		let modal = ModalHook::launching(ModalContext::new(
			payload.trigger_id.clone(),
			key.clone(),
			Arc::clone(&self.runtime),
		));

		for raw in &payload.actions {
			let action_id = raw
				.get("action_id")
				.and_then(Value::as_str)
				.unwrap_or_default();
			phase(DispatchPhase::Replaying, &key);
			let cx = self.view_context(
				item.props.clone(),
				Some(payload.user.clone()),
				state.clone(),
				modal.clone(),
			);
			let action = Action::interaction(action_id, generate_event(raw, &payload.user));
			render(&surface.render(&cx), Some(&action)).await?;
		}

		phase(DispatchPhase::Rerendering, &key);
		let cx = self.view_context(item.props.clone(), Some(payload.user.clone()), state, modal);
		let view = render(&surface.render(&cx), None)
			.await?
			.ok_or_else(|| DialogError::missing_markup(surface.name()))?;

		self.update_surface(&key, &item, &view).await;
		self.runtime.cache().set(&key, item.with_view(view));
		phase(DispatchPhase::Done, &key);
		Ok(())
	}

	/// Fires the submit or cancel handler of a modal on its parent surface,
	/// then re-renders and updates the parent.
	pub async fn view_submission(
		&self,
		payload: &ViewSubmissionPayload,
		closed: bool,
	) -> DispatchResult<()> {
		let modal_key = payload.view.id.as_str();
		let modal_item = self
			.runtime
			.cache()
			.get(modal_key)
			.ok_or_else(|| DialogError::missing_state(modal_key))?;
		let parent_key = modal_item
			.invoker_key
			.clone()
			.ok_or_else(|| DispatchError::MissingParent(modal_key.to_string()))?;
		let _guard = self.locks.acquire(&parent_key).await;
		if self.runtime.cache().get(&parent_key).is_none() {
			return Err(DispatchError::MissingParent(modal_key.to_string()));
		}
		let (parent, surface) = self.resolve(&parent_key)?;

		let state = StateHook::bound(parent.state.clone());
		let modal = ModalHook::replaying(modal_item.modal_key.clone());
		let render_parent = || {
			self.view_context(
				parent.props.clone(),
				Some(payload.user.clone()),
				state.clone(),
				modal.clone(),
			)
		};

		phase(DispatchPhase::Replaying, &parent_key);
		render(&surface.render(&render_parent()), None).await?;

		phase(DispatchPhase::Executing, &parent_key);
		for handlers in modal.take_matched() {
			let effect = if closed {
				handlers
					.on_cancel
					.map(|on_cancel| on_cancel.call(InteractionEvent::new(payload.user.clone())))
			} else {
				handlers.on_submit.map(|on_submit| {
					on_submit.call(SubmitEvent {
						user: payload.user.clone(),
						form: normalize_form(&payload.view.state.values),
					})
				})
			};
			if let Some(effect) = effect {
				effect.await.map_err(DispatchError::Handler)?;
			}
		}

		phase(DispatchPhase::Rerendering, &parent_key);
		let view = render(&surface.render(&render_parent()), None)
			.await?
			.ok_or_else(|| DialogError::missing_markup(surface.name()))?;

		self.update_surface(&parent_key, &parent, &view).await;
		self.runtime.cache().set(&parent_key, parent.with_view(view));
		phase(DispatchPhase::Done, &parent_key);
		Ok(())
	}

	/// Answers an external select's option query.
	pub async fn block_suggestion(
		&self,
		payload: &BlockSuggestionPayload,
	) -> DispatchResult<Value> {
		let key = payload.surface_key().ok_or(DispatchError::MissingSurfaceKey)?;
		let (item, surface) = self.resolve(&key)?;

		phase(DispatchPhase::Replaying, &key);
		let cx = self.view_context(
			item.props.clone(),
			Some(payload.user.clone()),
			StateHook::bound(item.state.clone()),
			ModalHook::inert(),
		);
		let action = Action::suggestion(
			payload.action_id.as_str(),
			InteractionEvent::new(payload.user.clone()),
		);
		let Some(search) = reconcile(&surface.render(&cx), Some(&action))?.search_options else {
			tracing::debug!(key, action = %payload.action_id, "no option search handler");
			return Ok(json!({"options": []}));
		};

		phase(DispatchPhase::Executing, &key);
		let nodes = search
			.call(SearchOptionsEvent {
				user: payload.user.clone(),
				query: payload.value.clone(),
			})
			.await
			.map_err(DispatchError::Handler)?;
		let mut options = Vec::with_capacity(nodes.len());
		for node in &nodes {
			if let Some(mut option) = reconcile(node, None)?.document {
				option.remove("url");
				options.push(option.to_value());
			}
		}
		Ok(json!({"options": options}))
	}

	/// Opens the surface registered for a global shortcut.
	///
	/// The modal is cached under its view id without a parent, so actions
	/// inside it re-render and update it in place. Submitting or closing it
	/// fails with [`DispatchError::MissingParent`].
	pub async fn shortcut(&self, payload: &ShortcutPayload) -> DispatchResult<Option<Item>> {
		let Some(surface) = self.shortcuts.read().get(&payload.callback_id).cloned() else {
			tracing::debug!(
				callback_id = %payload.callback_id,
				"no surface registered for shortcut"
			);
			return Ok(None);
		};
		let state = SharedState::new();
		let props = json!({});
		let cx = self.view_context(
			props.clone(),
			Some(payload.user.clone()),
			StateHook::bound(state.clone()),
			ModalHook::inert(),
		);
		let view = render(&surface.render(&cx), None)
			.await?
			.ok_or_else(|| DialogError::missing_markup(surface.name()))?;

		let opened = self
			.runtime
			.client()
			.open_modal(&payload.trigger_id, &view)
			.await?;
		let item = self.runtime.cache().set(
			&opened.id,
			Item::new(SurfaceKind::Modal, opened.id.as_str(), surface.name())
				.with_state(state)
				.with_props(props)
				.with_view(view),
		);
		phase(DispatchPhase::Done, &opened.id);
		Ok(Some(item))
	}

	/// Routes an interactivity payload. Suggestions return their response body.
	pub async fn dispatch(&self, payload: &InteractionPayload) -> DispatchResult<Option<Value>> {
		let result = self.route(payload).await;
		if let Err(err) = &result {
			tracing::debug!(
				target: "dialog::dispatcher",
				phase = %DispatchPhase::Failed,
				kind = payload.kind(),
				error = %err,
				"dispatch"
			);
		}
		result
	}

	async fn route(&self, payload: &InteractionPayload) -> DispatchResult<Option<Value>> {
		match payload {
			InteractionPayload::BlockActions(actions) => {
				self.block_actions(actions).await.map(|_| None)
			}
			InteractionPayload::ViewSubmission(submission) => {
				self.view_submission(submission, false).await.map(|_| None)
			}
			InteractionPayload::ViewClosed(closed) => {
				self.view_submission(closed, true).await.map(|_| None)
			}
			InteractionPayload::BlockSuggestion(suggestion) => {
				self.block_suggestion(suggestion).await.map(Some)
			}
			InteractionPayload::Shortcut(shortcut) => self.shortcut(shortcut).await.map(|_| None),
			InteractionPayload::Unsupported => {
				tracing::debug!("ignoring unsupported interaction payload");
				Ok(None)
			}
		}
	}

	/// Sends `view` to the platform according to the item's kind.
	///
	/// Failures are logged; the caller still writes the item back. Only
	/// modals opened by another surface ask to be notified on close.
	async fn update_surface(&self, key: &str, item: &Item, view: &Value) {
		phase(DispatchPhase::Updating, key);
		let client = self.runtime.client();
		let result = match item.kind {
			SurfaceKind::Home => client.update_home(key, view).await.map(drop),
			SurfaceKind::Modal if item.invoker_key.is_some() => client
				.update_modal(key, &notify_on_close(view.clone()))
				.await
				.map(drop),
			SurfaceKind::Modal => client.update_modal(key, view).await.map(drop),
			SurfaceKind::Message => client
				.update_message(&item.id, item.ts.as_deref().unwrap_or_default(), view)
				.await
				.map(drop),
		};
		if let Err(err) = result {
			tracing::error!(
				target: "dialog::dispatcher",
				key,
				kind = %item.kind,
				error = %err,
				"failed to update surface"
			);
		}
	}
}

/// Overlays `overrides` onto `base` when both are objects.
fn merge_props(base: &Value, overrides: Value) -> Value {
	match (base, overrides) {
		(Value::Object(base), Value::Object(overrides)) => {
			let mut merged = base.clone();
			merged.extend(overrides);
			Value::Object(merged)
		}
		(_, overrides) => overrides,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_merge_props_overlays_objects() {
		let base = json!({"team": "T1", "user": "old"});
		let merged = merge_props(&base, json!({"user": "U1"}));

		assert_eq!(merged, json!({"team": "T1", "user": "U1"}));
	}

	#[rstest]
	fn test_merge_props_without_base() {
		assert_eq!(merge_props(&Value::Null, json!({"user": "U1"})), json!({"user": "U1"}));
	}

	#[rstest]
	fn test_home_options_default_to_home_tab_only() {
		let options = HomeOptions::default();

		assert!(options.only_open);
		assert_eq!(options.props, Value::Null);
	}

	#[tokio::test]
	async fn test_surface_locks_serialize_same_key() {
		// Arrange
		let locks = SurfaceLocks::default();
		let first = locks.acquire("V1").await;

		// Act
		let wait = std::time::Duration::from_millis(20);
		let blocked = tokio::time::timeout(wait, locks.acquire("V1")).await;
		let other = tokio::time::timeout(wait, locks.acquire("V2")).await;
		drop(first);
		let released = locks.acquire("V1").await;

		// Assert
		assert!(blocked.is_err());
		assert!(other.is_ok());
		drop(released);
	}
}
