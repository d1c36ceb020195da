//! Submitted form normalization.

use dialog_core::{Form, Selection};
use serde_json::Value;

use crate::payload::StateValues;

/// Flattens modal element states into a form keyed by action id.
///
/// Each element contributes the sub-field its type defines; unknown types
/// contribute their `value`.
pub fn normalize_form(values: &StateValues) -> Form {
	values
		.values()
		.flat_map(|actions| actions.iter())
		.map(|(action_id, state)| (action_id.clone(), normalize_field(state)))
		.collect()
}

/// The normalized value of one element state.
pub fn normalize_field(state: &Value) -> Value {
	match Selection::from_element_state(state) {
		Selection::None => {
			let known = state
				.get("type")
				.and_then(Value::as_str)
				.is_some_and(is_selection_type);
			if known {
				Value::Null
			} else {
				state.get("value").cloned().unwrap_or(Value::Null)
			}
		}
		selection => selection.to_value(),
	}
}

fn is_selection_type(kind: &str) -> bool {
	matches!(
		kind,
		"datepicker"
			| "users_select"
			| "conversations_select"
			| "channels_select"
			| "overflow"
			| "radio_buttons"
			| "static_select"
			| "external_select"
	)
}
