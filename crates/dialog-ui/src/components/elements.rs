//! Interactive elements.

use std::future::Future;

use dialog_core::{Element, Instance, InteractionEvent, Node, Props, SearchOptionsEvent};
use serde::Serialize;

use super::{OPTIONS_SLOT, plain_slot, selected_options};

/// Builders whose children are options. The options are also kept in a slot so
/// the construction function can derive the initial selection.
macro_rules! option_children {
	($ty:ident) => {
		impl From<$ty> for Node {
			fn from(component: $ty) -> Self {
				let mut element = component.element;
				element
					.props_mut()
					.set_slot(OPTIONS_SLOT, Node::Fragment(component.options.clone()));
				element.with_children(component.options).into()
			}
		}

		impl $ty {
			/// Appends an option or option group.
			pub fn child(mut self, option: impl Into<Node>) -> Self {
				self.options.push(option.into());
				self
			}

			pub fn children<I, N>(mut self, options: I) -> Self
			where
				I: IntoIterator<Item = N>,
				N: Into<Node>,
			{
				self.options.extend(options.into_iter().map(Into::into));
				self
			}

			fn map_props(mut self, f: impl FnOnce(Props) -> Props) -> Self {
				let props = std::mem::take(self.element.props_mut());
				*self.element.props_mut() = f(props);
				self
			}

			pub fn confirm(self, confirm: impl Into<Node>) -> Self {
				self.map_props(|props| props.with_slot("confirm", confirm))
			}

			/// Runs when the user changes the selection.
			pub fn on_select<F, Fut>(self, f: F) -> Self
			where
				F: Fn(InteractionEvent) -> Fut + Send + Sync + 'static,
				Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
			{
				self.map_props(|props| props.on_select(f))
			}
		}
	};
}

/// A button. Children form its label.
pub struct Button {
	element: Element,
}

component!(Button, children);

impl Button {
	pub fn new(action: impl Into<String>) -> Self {
		let element = Element::component("button", |props, cx| {
			Ok(Instance::new("button")
				.with_opt("action_id", props.action())
				.with_opt("style", props.str("style"))
				.with_opt("url", props.str("url"))
				.with_opt("value", props.str("value"))
				.with("text", Instance::plain_text(""))
				.with_opt("confirm", cx.reconcile(props.slot("confirm"))?))
		})
		.with_props(Props::new().with_action(action));
		Self { element }
	}

	pub fn text(self, text: impl Into<Node>) -> Self {
		self.child(text)
	}

	pub fn primary(self) -> Self {
		self.map_props(|props| props.with_value("style", "primary"))
	}

	pub fn danger(self) -> Self {
		self.map_props(|props| props.with_value("style", "danger"))
	}

	pub fn url(self, url: impl Into<String>) -> Self {
		let url = url.into();
		self.map_props(|props| props.with_value("url", url))
	}

	pub fn value(self, value: impl Into<String>) -> Self {
		let value = value.into();
		self.map_props(|props| props.with_value("value", value))
	}

	pub fn confirm(self, confirm: impl Into<Node>) -> Self {
		self.map_props(|props| props.with_slot("confirm", confirm))
	}

	pub fn on_click<F, Fut>(self, f: F) -> Self
	where
		F: Fn(InteractionEvent) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
	{
		self.map_props(|props| props.on_click(f))
	}
}

/// An overflow menu. Option urls are kept.
pub struct Overflow {
	element: Element,
}

component!(Overflow, children);

impl Overflow {
	pub fn new(action: impl Into<String>) -> Self {
		let element = Element::component("overflow", |props, cx| {
			Ok(Instance::new("overflow")
				.with_opt("action_id", props.action())
				.with("options", Vec::<Instance>::new())
				.with_opt("confirm", cx.reconcile(props.slot("confirm"))?))
		})
		.with_props(Props::new().with_action(action));
		Self { element }
	}

	pub fn confirm(self, confirm: impl Into<Node>) -> Self {
		self.map_props(|props| props.with_slot("confirm", confirm))
	}

	pub fn on_select<F, Fut>(self, f: F) -> Self
	where
		F: Fn(InteractionEvent) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
	{
		self.map_props(|props| props.on_select(f))
	}
}

/// A checkbox group. Selected options become `initial_options`.
pub struct Checkboxes {
	element: Element,
	options: Vec<Node>,
}

option_children!(Checkboxes);

impl Checkboxes {
	pub fn new(action: impl Into<String>) -> Self {
		let element = Element::component("checkboxes", |props, cx| {
			let selected = selected_options(props, cx)?;
			Ok(Instance::new("checkboxes")
				.with_opt("action_id", props.action())
				.with("options", Vec::<Instance>::new())
				.with_opt("initial_options", (!selected.is_empty()).then_some(selected))
				.with_opt("confirm", cx.reconcile(props.slot("confirm"))?))
		})
		.with_props(Props::new().with_action(action));
		Self {
			element,
			options: Vec::new(),
		}
	}
}

/// A radio group. The first selected option becomes `initial_option`.
pub struct RadioButtons {
	element: Element,
	options: Vec<Node>,
}

option_children!(RadioButtons);

impl RadioButtons {
	pub fn new(action: impl Into<String>) -> Self {
		let element = Element::component("radio_buttons", |props, cx| {
			let initial = selected_options(props, cx)?.into_iter().next();
			Ok(Instance::new("radio_buttons")
				.with_opt("action_id", props.action())
				.with("options", Vec::<Instance>::new())
				.with_opt("initial_option", initial)
				.with_opt("confirm", cx.reconcile(props.slot("confirm"))?))
		})
		.with_props(Props::new().with_action(action));
		Self {
			element,
			options: Vec::new(),
		}
	}
}

/// Source of a select menu's options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectKind {
	/// Options given as children.
	Static,
	/// Options loaded through an option search handler.
	External,
	Users,
	Conversations,
	Channels,
}

impl SelectKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Static => "static",
			Self::External => "external",
			Self::Users => "users",
			Self::Conversations => "conversations",
			Self::Channels => "channels",
		}
	}
}

/// Narrows the conversations offered by a conversations select.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversationFilter {
	/// Any of `im`, `mpim`, `private`, `public`.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub include: Vec<String>,
	pub exclude_external_shared_channels: bool,
	pub exclude_bot_users: bool,
}

/// Keys copied verbatim from props into the select.
const PASSTHROUGH: &[&str] = &[
	"min_query_length",
	"initial_user",
	"initial_users",
	"initial_channel",
	"initial_channels",
	"initial_conversation",
	"initial_conversations",
	"filter",
];

/// A select menu of any [`SelectKind`], single or multi.
pub struct Select {
	element: Element,
	options: Vec<Node>,
}

option_children!(Select);

impl Select {
	pub fn new(kind: SelectKind, action: impl Into<String>) -> Self {
		let element = Element::component("select", |props, cx| {
			let kind = props.str("kind").unwrap_or("static");
			let multi = props.flag("multi");
			let tag = if multi {
				format!("multi_{kind}_select")
			} else {
				format!("{kind}_select")
			};
			let mut select = Instance::new(tag)
				.with_opt("action_id", props.action())
				.with_opt("placeholder", plain_slot(props, cx, "placeholder")?)
				.with_opt("confirm", cx.reconcile(props.slot("confirm"))?);

			let initial = match kind {
				"static" => selected_options(props, cx)?,
				"external" => cx
					.reconcile(props.slot("initial_option"))?
					.map(|mut option| {
						option.remove("url");
						option
					})
					.into_iter()
					.collect(),
				_ => Vec::new(),
			};
			if multi && !initial.is_empty() {
				select.set("initial_options", initial);
			} else if let Some(first) = initial.into_iter().next() {
				select.set("initial_option", first);
			}

			for key in PASSTHROUGH {
				select = select.with_opt(*key, props.value(key).cloned());
			}
			Ok(select)
		})
		.with_props(
			Props::new()
				.with_action(action)
				.with_value("kind", kind.as_str()),
		);
		Self {
			element,
			options: Vec::new(),
		}
	}

	pub fn static_select(action: impl Into<String>) -> Self {
		Self::new(SelectKind::Static, action)
	}

	pub fn external(action: impl Into<String>) -> Self {
		Self::new(SelectKind::External, action)
	}

	pub fn users(action: impl Into<String>) -> Self {
		Self::new(SelectKind::Users, action)
	}

	pub fn conversations(action: impl Into<String>) -> Self {
		Self::new(SelectKind::Conversations, action)
	}

	pub fn channels(action: impl Into<String>) -> Self {
		Self::new(SelectKind::Channels, action)
	}

	/// Allows several selections.
	pub fn multi(self) -> Self {
		self.map_props(|props| props.with_value("multi", true))
	}

	pub fn placeholder(self, placeholder: impl Into<Node>) -> Self {
		self.map_props(|props| props.with_slot("placeholder", placeholder))
	}

	/// Initial option of an external select.
	pub fn initial_option(self, option: impl Into<Node>) -> Self {
		self.map_props(|props| props.with_slot("initial_option", option))
	}

	/// Characters typed before an external select queries for options.
	pub fn min_query_length(self, length: u32) -> Self {
		self.map_props(|props| props.with_value("min_query_length", length))
	}

	pub fn initial_user(self, user: impl Into<String>) -> Self {
		let user = user.into();
		self.map_props(|props| props.with_value("initial_user", user))
	}

	pub fn initial_channel(self, channel: impl Into<String>) -> Self {
		let channel = channel.into();
		self.map_props(|props| props.with_value("initial_channel", channel))
	}

	pub fn initial_conversation(self, conversation: impl Into<String>) -> Self {
		let conversation = conversation.into();
		self.map_props(|props| props.with_value("initial_conversation", conversation))
	}

	/// Initial ids of a multi users, channels or conversations select.
	pub fn initial_ids<I, S>(self, ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
		let key = match self.element.props().str("kind") {
			Some("users") => "initial_users",
			Some("channels") => "initial_channels",
			_ => "initial_conversations",
		};
		self.map_props(|props| props.with_value(key, ids))
	}

	pub fn filter(self, filter: ConversationFilter) -> Self {
		let filter = serde_json::to_value(filter).unwrap_or_default();
		self.map_props(|props| props.with_value("filter", filter))
	}

	/// Answers option queries of an external select.
	pub fn on_search_options<F, Fut>(self, f: F) -> Self
	where
		F: Fn(SearchOptionsEvent) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = anyhow::Result<Vec<Node>>> + Send + 'static,
	{
		self.map_props(|props| props.on_search_options(f))
	}
}

/// A date picker.
pub struct DatePicker {
	element: Element,
}

component!(DatePicker);

impl DatePicker {
	pub fn new(action: impl Into<String>) -> Self {
		let element = Element::component("datepicker", |props, cx| {
			Ok(Instance::new("datepicker")
				.with_opt("action_id", props.action())
				.with_opt("initial_date", props.str("initial_date"))
				.with_opt("placeholder", plain_slot(props, cx, "placeholder")?)
				.with_opt("confirm", cx.reconcile(props.slot("confirm"))?))
		})
		.with_props(Props::new().with_action(action));
		Self { element }
	}

	/// Initial date as `YYYY-MM-DD`.
	pub fn initial_date(self, date: impl Into<String>) -> Self {
		let date = date.into();
		self.map_props(|props| props.with_value("initial_date", date))
	}

	pub fn placeholder(self, placeholder: impl Into<Node>) -> Self {
		self.map_props(|props| props.with_slot("placeholder", placeholder))
	}

	pub fn on_select<F, Fut>(self, f: F) -> Self
	where
		F: Fn(InteractionEvent) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
	{
		self.map_props(|props| props.on_select(f))
	}
}

/// A plain-text input.
pub struct TextField {
	element: Element,
}

component!(TextField);

impl TextField {
	pub fn new(action: impl Into<String>) -> Self {
		let element = Element::component("plain_text_input", |props, cx| {
			Ok(Instance::new("plain_text_input")
				.with_opt("action_id", props.action())
				.with_opt("initial_value", props.str("initial_value"))
				.with_opt("max_length", props.value("max_length").cloned())
				.with_opt("min_length", props.value("min_length").cloned())
				.with_opt("multiline", props.value("multiline").cloned())
				.with_opt("placeholder", plain_slot(props, cx, "placeholder")?))
		})
		.with_props(Props::new().with_action(action));
		Self { element }
	}

	pub fn initial_value(self, value: impl Into<String>) -> Self {
		let value = value.into();
		self.map_props(|props| props.with_value("initial_value", value))
	}

	pub fn max_length(self, length: u32) -> Self {
		self.map_props(|props| props.with_value("max_length", length))
	}

	pub fn min_length(self, length: u32) -> Self {
		self.map_props(|props| props.with_value("min_length", length))
	}

	pub fn multiline(self, multiline: bool) -> Self {
		self.map_props(|props| props.with_value("multiline", multiline))
	}

	pub fn placeholder(self, placeholder: impl Into<Node>) -> Self {
		self.map_props(|props| props.with_slot("placeholder", placeholder))
	}
}
