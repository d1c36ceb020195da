//! Merge engine.
//!
//! Attaching a child to its parent is driven by the parent: its tag or marker
//! selects a [`MergeStrategy`] from a fixed table. Combinations the table does
//! not cover fail with [`ConstructionError::UnsupportedMerge`].

use crate::error::{ConstructionError, ConstructionResult};
use crate::instance::{Instance, Marker, PLAIN_TEXT, RAW_TEXT};

/// How a child is attached to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
	/// Push the child onto a list field.
	AppendTo(&'static str),
	/// Push an option onto a list field with its `url` removed.
	AppendOption(&'static str),
	/// Option groups go to `option_groups`, options to `options` without `url`.
	GroupOptions,
	/// Replace a single field with the child.
	SetField(&'static str),
	/// Interactive children become the `accessory`, others are appended to `fields`.
	SetAccessory,
	/// The child becomes the `text` field; raw text is promoted to plain text.
	ReplaceText,
	/// The child's text is appended to the parent's text.
	ConcatenateText,
}

const BLOCKS: &str = "blocks";

const MERGE_TABLE: &[(&str, MergeStrategy)] = &[
	("overflow", MergeStrategy::AppendTo("options")),
	("static_select", MergeStrategy::GroupOptions),
	("multi_static_select", MergeStrategy::GroupOptions),
	("checkboxes", MergeStrategy::AppendOption("options")),
	("radio_buttons", MergeStrategy::AppendOption("options")),
	("input", MergeStrategy::SetField("element")),
	("actions", MergeStrategy::AppendTo("elements")),
	("context", MergeStrategy::AppendTo("elements")),
	("button", MergeStrategy::ConcatenateText),
	("section", MergeStrategy::SetAccessory),
	(PLAIN_TEXT, MergeStrategy::ConcatenateText),
	("mrkdwn", MergeStrategy::ConcatenateText),
];

/// Element types a section accepts as its accessory.
const ACCESSORY_TAGS: &[&str] = &[
	"button",
	"image",
	"overflow",
	"datepicker",
	"checkboxes",
	"radio_buttons",
	"static_select",
	"external_select",
	"users_select",
	"conversations_select",
	"channels_select",
	"multi_static_select",
	"multi_external_select",
	"multi_users_select",
	"multi_conversations_select",
	"multi_channels_select",
];

/// Looks up the strategy for attaching `child` to `parent`.
pub fn strategy_for(parent: &Instance, child: &Instance) -> Option<MergeStrategy> {
	if parent.has_list(BLOCKS) {
		return Some(MergeStrategy::AppendTo(BLOCKS));
	}
	match parent.marker() {
		Marker::OptionGroup => return Some(MergeStrategy::AppendOption("options")),
		Marker::Option { .. } | Marker::Confirm => return Some(MergeStrategy::ReplaceText),
		Marker::None => {}
	}
	MERGE_TABLE
		.iter()
		.find(|(tag, _)| *tag == parent.tag())
		.map(|(_, strategy)| *strategy)
		.or_else(|| (parent.tag() == child.tag()).then_some(MergeStrategy::ConcatenateText))
}

/// Attaches `child` to `parent`.
pub fn merge(parent: &mut Instance, child: Instance) -> ConstructionResult<()> {
	let Some(strategy) = strategy_for(parent, &child) else {
		return Err(unsupported(parent, &child));
	};
	match strategy {
		MergeStrategy::AppendTo(key) => append(parent, key, child),
		MergeStrategy::AppendOption(key) => append(parent, key, without_url(child)),
		MergeStrategy::GroupOptions => {
			if child.is_option_group() {
				append(parent, "option_groups", child)
			} else {
				append(parent, "options", without_url(child))
			}
		}
		MergeStrategy::SetField(key) => {
			parent.set(key, child);
			Ok(())
		}
		MergeStrategy::SetAccessory => {
			if !ACCESSORY_TAGS.contains(&child.tag()) {
				return append(parent, "fields", child);
			}
			if parent.contains("accessory") {
				return Err(unsupported(parent, &child));
			}
			parent.set("accessory", child);
			Ok(())
		}
		MergeStrategy::ReplaceText => {
			let mut text = child;
			if text.tag() == RAW_TEXT {
				text.set_tag(PLAIN_TEXT);
			}
			parent.set("text", text);
			Ok(())
		}
		MergeStrategy::ConcatenateText => concatenate(parent, &child),
	}
}

fn append(parent: &mut Instance, key: &str, child: Instance) -> ConstructionResult<()> {
	match parent.list_mut(key) {
		Some(items) => {
			items.push(child);
			Ok(())
		}
		None => Err(unsupported(parent, &child)),
	}
}

fn concatenate(parent: &mut Instance, child: &Instance) -> ConstructionResult<()> {
	let Some(suffix) = child.text() else {
		return Err(ConstructionError::NotText {
			parent: parent.tag().to_string(),
			child: child.to_value(),
		});
	};
	match parent.instance_mut("text") {
		Some(inner) => inner.append_text(suffix),
		None => parent.append_text(suffix),
	}
	Ok(())
}

fn without_url(mut option: Instance) -> Instance {
	option.remove("url");
	option
}

fn unsupported(parent: &Instance, child: &Instance) -> ConstructionError {
	ConstructionError::UnsupportedMerge {
		parent: parent.to_value(),
		child: child.to_value(),
	}
}
