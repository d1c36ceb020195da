//! Interaction events delivered to handlers.
//!
//! [`generate_event`] turns a raw block-action element state into an
//! [`InteractionEvent`] by reading the sub-field its element type defines.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Normalized form values keyed by action id.
pub type Form = Map<String, Value>;

/// The person who triggered an interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	/// Platform user id.
	pub id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub username: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub team_id: Option<String>,
}

impl User {
	/// Creates a user known only by id.
	pub fn from_id(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			..Self::default()
		}
	}
}

/// What an element reported as selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Selection {
	/// Nothing beyond the user.
	#[default]
	None,
	/// A date picker value (`YYYY-MM-DD`).
	Date(String),
	/// A single option value, user, channel or conversation id.
	One(String),
	/// Multiple option values or ids.
	Many(Vec<String>),
}

impl Selection {
	/// Reads the selection out of an element's reported state.
	///
	/// Unknown element types yield [`Selection::None`].
	pub fn from_element_state(state: &Value) -> Self {
		let kind = state.get("type").and_then(Value::as_str).unwrap_or_default();
		match kind {
			"datepicker" => string_at(state, "selected_date").map_or(Self::None, Self::Date),
			"checkboxes" | "multi_static_select" | "multi_external_select" => {
				Self::Many(option_values(state.get("selected_options")))
			}
			"multi_users_select" => Self::Many(strings(state.get("selected_users"))),
			"multi_channels_select" => Self::Many(strings(state.get("selected_channels"))),
			"multi_conversations_select" => {
				Self::Many(strings(state.get("selected_conversations")))
			}
			"users_select" => string_at(state, "selected_user").map_or(Self::None, Self::One),
			"conversations_select" => {
				string_at(state, "selected_conversation").map_or(Self::None, Self::One)
			}
			"channels_select" => string_at(state, "selected_channel").map_or(Self::None, Self::One),
			"overflow" | "radio_buttons" | "static_select" | "external_select" => state
				.get("selected_option")
				.and_then(|option| string_at(option, "value"))
				.map_or(Self::None, Self::One),
			_ => Self::None,
		}
	}

	/// Converts the selection into a JSON form value.
	pub fn to_value(&self) -> Value {
		match self {
			Self::None => Value::Null,
			Self::Date(value) | Self::One(value) => Value::String(value.clone()),
			Self::Many(values) => Value::from(values.clone()),
		}
	}
}

fn string_at(value: &Value, key: &str) -> Option<String> {
	value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn strings(value: Option<&Value>) -> Vec<String> {
	value
		.and_then(Value::as_array)
		.map(|items| {
			items
				.iter()
				.filter_map(Value::as_str)
				.map(str::to_string)
				.collect()
		})
		.unwrap_or_default()
}

fn option_values(value: Option<&Value>) -> Vec<String> {
	value
		.and_then(Value::as_array)
		.map(|options| {
			options
				.iter()
				.filter_map(|option| string_at(option, "value"))
				.collect()
		})
		.unwrap_or_default()
}

/// Event passed to `on_load`, `on_click`, `on_select` and `on_submit` handlers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InteractionEvent {
	pub user: User,
	pub selection: Selection,
}

impl InteractionEvent {
	/// Creates an event carrying only the user.
	pub fn new(user: User) -> Self {
		Self {
			user,
			selection: Selection::None,
		}
	}

	pub fn with_selection(mut self, selection: Selection) -> Self {
		self.selection = selection;
		self
	}

	/// The picked date, for date pickers.
	pub fn date(&self) -> Option<&str> {
		match &self.selection {
			Selection::Date(date) => Some(date),
			_ => None,
		}
	}

	/// The single selected value.
	pub fn selected(&self) -> Option<&str> {
		match &self.selection {
			Selection::One(value) => Some(value),
			_ => None,
		}
	}

	/// The selected values of a multi-value element.
	pub fn selected_many(&self) -> Option<&[String]> {
		match &self.selection {
			Selection::Many(values) => Some(values),
			_ => None,
		}
	}
}

/// Event passed to a modal's submit handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubmitEvent {
	pub user: User,
	pub form: Form,
}

/// Event passed to an external select's option search handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchOptionsEvent {
	pub user: User,
	/// Text typed so far.
	pub query: String,
}

/// Whether a pass replays an initial display or a user interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
	/// Initial display of a surface; fires `on_load` handlers.
	Onload,
	/// A user interaction against a rendered element.
	Interaction,
	/// An option query from an external select; only captures the search
	/// handler of the matching element.
	Suggestion,
}

/// The interaction being replayed during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
	pub kind: ActionKind,
	/// Action id of the element the user interacted with.
	pub value: String,
	pub event: InteractionEvent,
}

impl Action {
	pub fn interaction(value: impl Into<String>, event: InteractionEvent) -> Self {
		Self {
			kind: ActionKind::Interaction,
			value: value.into(),
			event,
		}
	}

	/// Replays an option query against the element with action id `value`.
	pub fn suggestion(value: impl Into<String>, event: InteractionEvent) -> Self {
		Self {
			kind: ActionKind::Suggestion,
			value: value.into(),
			event,
		}
	}

	pub fn onload(event: InteractionEvent) -> Self {
		Self {
			kind: ActionKind::Onload,
			value: String::new(),
			event,
		}
	}
}

/// Builds the event for one entry of a block-actions payload.
pub fn generate_event(action: &Value, user: &User) -> InteractionEvent {
	InteractionEvent::new(user.clone()).with_selection(Selection::from_element_state(action))
}
