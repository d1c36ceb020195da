//! Layout blocks.

use dialog_core::instance::{PLAIN_TEXT, RAW_TEXT};
use dialog_core::{Element, Instance, Node, Props};

use super::plain_slot;

/// A section: text, optional fields and an accessory.
///
/// Children become `fields`; an interactive or image child becomes the
/// accessory instead.
pub struct Section {
	element: Element,
}

component!(Section, children);

impl Section {
	pub fn new() -> Self {
		let element = Element::component("section", |props, cx| {
			let accessory = cx.reconcile(props.slot("accessory"))?;
			let text = cx.reconcile(props.slot("text"))?.map(|mut text| {
				if text.tag() == RAW_TEXT {
					text.set_tag(props.str("type").unwrap_or(PLAIN_TEXT).to_string());
					if text.tag() == PLAIN_TEXT {
						text.set("emoji", props.flag("emoji"));
					}
				}
				text
			});
			Ok(Instance::new("section")
				.with_opt("block_id", props.str("block_id"))
				.with_opt("text", text)
				.with_opt("accessory", accessory))
		});
		Self { element }
	}

	/// The section's main text. Strings become plain text unless
	/// [`markdown`](Self::markdown) is set.
	pub fn text(self, text: impl Into<Node>) -> Self {
		self.map_props(|props| props.with_slot("text", text))
	}

	/// Renders string text as `mrkdwn`.
	pub fn markdown(self) -> Self {
		self.map_props(|props| props.with_value("type", "mrkdwn"))
	}

	/// Enables emoji shortcodes in plain string text.
	pub fn emoji(self, emoji: bool) -> Self {
		self.map_props(|props| props.with_value("emoji", emoji))
	}

	pub fn accessory(self, accessory: impl Into<Node>) -> Self {
		self.map_props(|props| props.with_slot("accessory", accessory))
	}

	pub fn block_id(self, id: impl Into<String>) -> Self {
		let id = id.into();
		self.map_props(|props| props.with_value("block_id", id))
	}
}

impl Default for Section {
	fn default() -> Self {
		Self::new()
	}
}

/// A row of interactive elements.
pub struct Actions {
	element: Element,
}

component!(Actions, children);

impl Actions {
	pub fn new() -> Self {
		let element = Element::component("actions", |props, _| {
			Ok(Instance::new("actions")
				.with_opt("block_id", props.str("block_id"))
				.with("elements", Vec::<Instance>::new()))
		});
		Self { element }
	}

	pub fn block_id(self, id: impl Into<String>) -> Self {
		let id = id.into();
		self.map_props(|props| props.with_value("block_id", id))
	}
}

impl Default for Actions {
	fn default() -> Self {
		Self::new()
	}
}

/// Small contextual text and images.
pub struct Context {
	element: Element,
}

component!(Context, children);

impl Context {
	pub fn new() -> Self {
		let element = Element::component("context", |_, _| {
			Ok(Instance::new("context").with("elements", Vec::<Instance>::new()))
		});
		Self { element }
	}
}

impl Default for Context {
	fn default() -> Self {
		Self::new()
	}
}

pub struct Divider {
	element: Element,
}

component!(Divider);

impl Divider {
	pub fn new() -> Self {
		Self {
			element: Element::component("divider", |_, _| Ok(Instance::new("divider"))),
		}
	}
}

impl Default for Divider {
	fn default() -> Self {
		Self::new()
	}
}

/// An image, usable as a block, a context element or a section accessory.
pub struct Image {
	element: Element,
}

component!(Image);

impl Image {
	pub fn new(url: impl Into<String>, alt_text: impl Into<String>) -> Self {
		let element = Element::component("image", |props, cx| {
			Ok(Instance::new("image")
				.with_opt("image_url", props.str("image_url"))
				.with_opt("alt_text", props.str("alt_text"))
				.with_opt("title", plain_slot(props, cx, "title")?))
		})
		.with_props(
			Props::new()
				.with_value("image_url", url.into())
				.with_value("alt_text", alt_text.into()),
		);
		Self { element }
	}

	/// Title shown above a standalone image block.
	pub fn title(self, title: impl Into<Node>) -> Self {
		self.map_props(|props| props.with_slot("title", title))
	}
}

/// A labelled form field. Its single child is the input element.
pub struct Input {
	element: Element,
}

component!(Input, children);

impl Input {
	pub fn new(label: impl Into<Node>) -> Self {
		let element = Element::component("input", |props, cx| {
			Ok(Instance::new("input")
				.with_opt("block_id", props.str("block_id"))
				.with_opt("label", plain_slot(props, cx, "label")?)
				.with_opt("hint", plain_slot(props, cx, "hint")?)
				.with("optional", props.flag("optional")))
		})
		.with_props(Props::new().with_slot("label", label));
		Self { element }
	}

	pub fn hint(self, hint: impl Into<Node>) -> Self {
		self.map_props(|props| props.with_slot("hint", hint))
	}

	pub fn optional(self, optional: bool) -> Self {
		self.map_props(|props| props.with_value("optional", optional))
	}

	pub fn block_id(self, id: impl Into<String>) -> Self {
		let id = id.into();
		self.map_props(|props| props.with_value("block_id", id))
	}
}
