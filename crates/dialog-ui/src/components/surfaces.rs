//! Top-level surfaces: the app home tab, modals and channel messages.

use std::future::Future;

use dialog_core::{Element, Instance, InteractionEvent, Node, Props};

use super::plain_slot;

/// The app home tab.
pub struct Home {
	element: Element,
}

component!(Home, children);

impl Home {
	pub fn new() -> Self {
		Self {
			element: Element::component("home", |_, _| {
				Ok(Instance::new("home").with("blocks", Vec::<Instance>::new()))
			}),
		}
	}

	/// Runs when the home tab is opened.
	pub fn on_load<F, Fut>(self, f: F) -> Self
	where
		F: Fn(InteractionEvent) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
	{
		self.map_props(|props| props.on_load(f))
	}
}

impl Default for Home {
	fn default() -> Self {
		Self::new()
	}
}

/// A modal view. `title`, `submit` and `close` are always plain text.
pub struct Modal {
	element: Element,
}

component!(Modal, children);

impl Modal {
	pub fn new(title: impl Into<Node>) -> Self {
		let element = Element::component("modal", |props, cx| {
			Ok(Instance::new("modal")
				.with_opt("title", plain_slot(props, cx, "title")?)
				.with_opt("submit", plain_slot(props, cx, "submit")?)
				.with_opt("close", plain_slot(props, cx, "close")?)
				.with("blocks", Vec::<Instance>::new()))
		})
		.with_props(Props::new().with_slot("title", title));
		Self { element }
	}

	/// Label of the submit button.
	pub fn submit(self, label: impl Into<Node>) -> Self {
		self.map_props(|props| props.with_slot("submit", label))
	}

	/// Label of the close button.
	pub fn close(self, label: impl Into<Node>) -> Self {
		self.map_props(|props| props.with_slot("close", label))
	}
}

/// A channel message.
pub struct Message {
	element: Element,
}

component!(Message, children);

impl Message {
	pub fn new() -> Self {
		let element = Element::component("message", |props, _| {
			Ok(Instance::untyped("message")
				.with("blocks", Vec::<Instance>::new())
				.with_opt("text", props.str("text")))
		});
		Self { element }
	}

	/// Fallback text for notifications.
	pub fn text(self, text: impl Into<String>) -> Self {
		let text = text.into();
		self.map_props(|props| props.with_value("text", text))
	}
}

impl Default for Message {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{Divider, Text};
	use dialog_core::reconcile;
	use rstest::rstest;
	use serde_json::json;

	fn document(node: impl Into<Node>) -> serde_json::Value {
		reconcile(&node.into(), None)
			.unwrap()
			.document
			.unwrap()
			.to_value()
	}

	#[rstest]
	fn test_home_collects_blocks() {
		let value = document(Home::new().child(Divider::new()).child(Divider::new()));

		assert_eq!(
			value,
			json!({"type": "home", "blocks": [{"type": "divider"}, {"type": "divider"}]})
		);
	}

	#[rstest]
	fn test_modal_forces_plain_text_slots() {
		// Arrange
		let modal = Modal::new("Settings")
			.submit(Text::markdown("*Save*"))
			.close("Cancel");

		// Act
		let value = document(modal);

		// Assert
		assert_eq!(
			value,
			json!({
				"type": "modal",
				"title": {"type": "plain_text", "text": "Settings"},
				"submit": {"type": "plain_text", "text": "*Save*"},
				"close": {"type": "plain_text", "text": "Cancel"},
				"blocks": []
			})
		);
	}

	#[rstest]
	fn test_message_is_untyped() {
		let value = document(Message::new().text("fallback"));

		assert_eq!(value, json!({"blocks": [], "text": "fallback"}));
	}
}
