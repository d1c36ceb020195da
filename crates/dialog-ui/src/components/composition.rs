//! Composition objects: text, options, option groups and confirm dialogs.

use dialog_core::instance::{MRKDWN, PLAIN_TEXT};
use dialog_core::{Element, Instance, Node, Props};

use super::plain_slot;

/// A text object. Children are concatenated into its `text`.
pub struct Text {
	element: Element,
}

component!(Text, children);

impl Text {
	/// Plain text; emoji shortcodes are rendered unless disabled.
	pub fn plain(text: impl Into<Node>) -> Self {
		let element = Element::component(PLAIN_TEXT, |props, _| {
			Ok(Instance::plain_text("").with(
				"emoji",
				props
					.value("emoji")
					.and_then(serde_json::Value::as_bool)
					.unwrap_or(true),
			))
		})
		.with_child(text);
		Self { element }
	}

	/// Markdown text.
	pub fn markdown(text: impl Into<Node>) -> Self {
		let element = Element::component(MRKDWN, |props, _| {
			Ok(Instance::mrkdwn("").with_opt("verbatim", props.value("verbatim").cloned()))
		})
		.with_child(text);
		Self { element }
	}

	pub fn emoji(self, emoji: bool) -> Self {
		self.map_props(|props| props.with_value("emoji", emoji))
	}

	/// Disables link and mention parsing in markdown text.
	pub fn verbatim(self, verbatim: bool) -> Self {
		self.map_props(|props| props.with_value("verbatim", verbatim))
	}
}

/// An option of a select, overflow menu, checkbox group or radio group.
pub struct SelectOption {
	element: Element,
}

component!(SelectOption, children);

impl SelectOption {
	pub fn new(value: impl Into<String>) -> Self {
		let element = Element::component("option", |props, cx| {
			Ok(Instance::option(props.flag("selected"))
				.with_opt("value", props.str("value"))
				.with_opt("description", plain_slot(props, cx, "description")?)
				.with_opt("url", props.str("url")))
		})
		.with_props(Props::new().with_value("value", value.into()));
		Self { element }
	}

	/// Label of the option.
	pub fn text(self, text: impl Into<Node>) -> Self {
		self.child(text)
	}

	pub fn description(self, description: impl Into<Node>) -> Self {
		self.map_props(|props| props.with_slot("description", description))
	}

	/// Link opened by an overflow menu option. Dropped everywhere else.
	pub fn url(self, url: impl Into<String>) -> Self {
		let url = url.into();
		self.map_props(|props| props.with_value("url", url))
	}

	/// Marks the option as initially selected.
	pub fn selected(self, selected: bool) -> Self {
		self.map_props(|props| props.with_value("selected", selected))
	}
}

/// A labelled group of options in a static select.
pub struct OptionGroup {
	element: Element,
}

component!(OptionGroup, children);

impl OptionGroup {
	pub fn new(label: impl Into<Node>) -> Self {
		let element = Element::component("option_group", |props, cx| {
			Ok(Instance::option_group()
				.with_opt("label", plain_slot(props, cx, "label")?)
				.with("options", Vec::<Instance>::new()))
		})
		.with_props(Props::new().with_slot("label", label));
		Self { element }
	}
}

/// A confirmation dialog shown before an element's action runs.
pub struct Confirm {
	element: Element,
}

component!(Confirm, children);

impl Confirm {
	pub fn new(title: impl Into<Node>) -> Self {
		let element = Element::component("confirm", |props, cx| {
			let confirm = plain_slot(props, cx, "confirm_label")?
				.unwrap_or_else(|| Instance::plain_text("Confirm"));
			let deny = plain_slot(props, cx, "deny_label")?
				.unwrap_or_else(|| Instance::plain_text("Cancel"));
			Ok(Instance::confirm()
				.with_opt("title", plain_slot(props, cx, "title")?)
				.with("confirm", confirm)
				.with("deny", deny)
				.with_opt("style", props.str("style")))
		})
		.with_props(Props::new().with_slot("title", title));
		Self { element }
	}

	/// Body of the dialog.
	pub fn text(self, text: impl Into<Node>) -> Self {
		self.child(text)
	}

	pub fn confirm_label(self, label: impl Into<Node>) -> Self {
		self.map_props(|props| props.with_slot("confirm_label", label))
	}

	pub fn deny_label(self, label: impl Into<Node>) -> Self {
		self.map_props(|props| props.with_slot("deny_label", label))
	}

	/// Styles the confirm button as destructive.
	pub fn danger(self) -> Self {
		self.map_props(|props| props.with_value("style", "danger"))
	}
}
