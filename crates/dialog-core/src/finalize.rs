//! Finalization hook.
//!
//! Runs once per constructed element, after its children are attached, and
//! decides whether the element reacts to the action being replayed.

use crate::context::RootContext;
use crate::event::ActionKind;
use crate::node::Props;

/// Queues the element's handlers for the replayed action.
///
/// - On an onload pass an `on_load` handler is invoked and its effect queued.
/// - On an interaction whose action id equals the element's `action`, each of
///   `on_click`, `on_submit` and `on_select` that is present is invoked and
///   queued.
/// - On a suggestion for the element's `action`, its `on_search_options`
///   handler is stored on the root context without being invoked. Nothing
///   else runs.
///
/// Returns `true` when the element handled the action.
pub fn finalize(props: &Props, root: &mut RootContext<'_>) -> bool {
	let Some(action) = root.action() else {
		return false;
	};
	let handlers = props.handlers();

	match action.kind {
		ActionKind::Onload => match &handlers.on_load {
			Some(on_load) => {
				root.push_pending(on_load.call(action.event.clone()));
				true
			}
			None => false,
		},
		ActionKind::Interaction => {
			if props.action() != Some(action.value.as_str()) {
				return false;
			}
			for handler in [&handlers.on_click, &handlers.on_submit, &handlers.on_select]
				.into_iter()
				.flatten()
			{
				root.push_pending(handler.call(action.event.clone()));
			}
			tracing::debug!(action = %action.value, "queued interaction handlers");
			true
		}
		ActionKind::Suggestion => {
			if props.action() != Some(action.value.as_str()) {
				return false;
			}
			match &handlers.on_search_options {
				Some(search) => {
					root.set_search_options(search.clone());
					true
				}
				None => false,
			}
		}
	}
}
