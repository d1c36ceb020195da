//! Produced values.
//!
//! An [`Instance`] is a partial Block Kit value under construction. Its tag is
//! emitted as `"type"` when serialized, except for marked instances (options,
//! option groups, confirm dialogs) and untyped ones such as messages.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Tag given to raw text produced from string children.
pub const RAW_TEXT: &str = "text";
/// Tag of platform plain-text objects.
pub const PLAIN_TEXT: &str = "plain_text";
/// Tag of platform markdown text objects.
pub const MRKDWN: &str = "mrkdwn";

/// Transient role of an instance, consulted by the merge engine and never serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Marker {
	#[default]
	None,
	/// A selectable option.
	Option {
		/// Whether the option is initially selected.
		selected: bool,
	},
	/// A labelled group of options.
	OptionGroup,
	/// A confirmation dialog object.
	Confirm,
}

/// A field value of an [`Instance`].
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
	Value(Value),
	Instance(Box<Instance>),
	List(Vec<Instance>),
}

impl Field {
	fn to_value(&self) -> Value {
		match self {
			Self::Value(value) => value.clone(),
			Self::Instance(instance) => instance.to_value(),
			Self::List(items) => Value::Array(items.iter().map(Instance::to_value).collect()),
		}
	}
}

impl From<Value> for Field {
	fn from(value: Value) -> Self {
		Self::Value(value)
	}
}

impl From<&str> for Field {
	fn from(value: &str) -> Self {
		Self::Value(Value::String(value.to_string()))
	}
}

impl From<String> for Field {
	fn from(value: String) -> Self {
		Self::Value(Value::String(value))
	}
}

impl From<bool> for Field {
	fn from(value: bool) -> Self {
		Self::Value(Value::Bool(value))
	}
}

impl From<Instance> for Field {
	fn from(instance: Instance) -> Self {
		Self::Instance(Box::new(instance))
	}
}

impl From<Vec<Instance>> for Field {
	fn from(items: Vec<Instance>) -> Self {
		Self::List(items)
	}
}

/// A type-tagged value with ordered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
	tag: Cow<'static, str>,
	marker: Marker,
	typed: bool,
	fields: IndexMap<String, Field>,
}

impl Instance {
	/// Creates an instance serialized with `"type": tag`.
	pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
		Self {
			tag: tag.into(),
			marker: Marker::None,
			typed: true,
			fields: IndexMap::new(),
		}
	}

	/// Creates an instance whose tag is not serialized.
	pub fn untyped(tag: impl Into<Cow<'static, str>>) -> Self {
		Self {
			typed: false,
			..Self::new(tag)
		}
	}

	/// Raw text produced from a string child.
	pub fn raw_text(text: impl Into<String>) -> Self {
		Self::new(RAW_TEXT).with("text", text.into())
	}

	pub fn plain_text(text: impl Into<String>) -> Self {
		Self::new(PLAIN_TEXT).with("text", text.into())
	}

	pub fn mrkdwn(text: impl Into<String>) -> Self {
		Self::new(MRKDWN).with("text", text.into())
	}

	pub fn option(selected: bool) -> Self {
		Self::new("option").with_marker(Marker::Option { selected })
	}

	pub fn option_group() -> Self {
		Self::new("option_group").with_marker(Marker::OptionGroup)
	}

	pub fn confirm() -> Self {
		Self::new("confirm").with_marker(Marker::Confirm)
	}

	pub fn with_marker(mut self, marker: Marker) -> Self {
		self.marker = marker;
		self
	}

	pub fn tag(&self) -> &str {
		&self.tag
	}

	pub fn set_tag(&mut self, tag: impl Into<Cow<'static, str>>) {
		self.tag = tag.into();
	}

	pub fn marker(&self) -> Marker {
		self.marker
	}

	pub fn is_option(&self) -> bool {
		matches!(self.marker, Marker::Option { .. })
	}

	pub fn is_selected(&self) -> bool {
		matches!(self.marker, Marker::Option { selected: true })
	}

	pub fn is_option_group(&self) -> bool {
		self.marker == Marker::OptionGroup
	}

	/// Sets a field, builder style.
	pub fn with(mut self, key: impl Into<String>, field: impl Into<Field>) -> Self {
		self.set(key, field);
		self
	}

	/// Sets a field when a value is present.
	pub fn with_opt<F: Into<Field>>(mut self, key: impl Into<String>, field: Option<F>) -> Self {
		if let Some(field) = field {
			self.set(key, field);
		}
		self
	}

	pub fn set(&mut self, key: impl Into<String>, field: impl Into<Field>) {
		self.fields.insert(key.into(), field.into());
	}

	pub fn get(&self, key: &str) -> Option<&Field> {
		self.fields.get(key)
	}

	pub fn remove(&mut self, key: &str) -> Option<Field> {
		self.fields.shift_remove(key)
	}

	pub fn contains(&self, key: &str) -> bool {
		self.fields.contains_key(key)
	}

	/// A nested instance field.
	pub fn instance(&self, key: &str) -> Option<&Instance> {
		match self.fields.get(key) {
			Some(Field::Instance(instance)) => Some(instance),
			_ => None,
		}
	}

	pub fn instance_mut(&mut self, key: &str) -> Option<&mut Instance> {
		match self.fields.get_mut(key) {
			Some(Field::Instance(instance)) => Some(instance),
			_ => None,
		}
	}

	/// A list field.
	pub fn list(&self, key: &str) -> Option<&[Instance]> {
		match self.fields.get(key) {
			Some(Field::List(items)) => Some(items),
			_ => None,
		}
	}

	/// A list field, created empty when absent. `None` when the field holds
	/// something other than a list.
	pub fn list_mut(&mut self, key: &str) -> Option<&mut Vec<Instance>> {
		match self
			.fields
			.entry(key.to_string())
			.or_insert_with(|| Field::List(Vec::new()))
		{
			Field::List(items) => Some(items),
			_ => None,
		}
	}

	pub fn has_list(&self, key: &str) -> bool {
		matches!(self.fields.get(key), Some(Field::List(_)))
	}

	/// The `text` field when it holds a string.
	pub fn text(&self) -> Option<&str> {
		match self.fields.get("text") {
			Some(Field::Value(Value::String(text))) => Some(text),
			_ => None,
		}
	}

	/// Appends to the `text` field, creating it when absent.
	pub fn append_text(&mut self, suffix: &str) {
		match self.fields.get_mut("text") {
			Some(Field::Value(Value::String(text))) => text.push_str(suffix),
			_ => self.set("text", suffix),
		}
	}

	/// Serializes the instance as a Block Kit value.
	pub fn to_value(&self) -> Value {
		let mut map = Map::new();
		if self.typed && self.marker == Marker::None {
			map.insert("type".to_string(), Value::String(self.tag.to_string()));
		}
		for (key, field) in &self.fields {
			map.insert(key.clone(), field.to_value());
		}
		Value::Object(map)
	}
}
