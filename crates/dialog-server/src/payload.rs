//! Inbound payloads from the Events API and interactivity requests.

use dialog_core::User;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// Events API envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEnvelope {
	/// Endpoint ownership check; answered with the challenge.
	UrlVerification { challenge: String },
	EventCallback { event: Value },
	#[serde(other)]
	Unsupported,
}

/// Reference to an existing view.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ViewId {
	pub id: String,
}

/// `app_home_opened` event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HomeOpenedEvent {
	#[serde(rename = "type")]
	pub kind: String,
	/// Id of the user opening the tab.
	pub user: String,
	/// `home` or `messages`.
	#[serde(default)]
	pub tab: String,
	/// Present once a home view has been published for the user.
	#[serde(default)]
	pub view: Option<ViewId>,
}

/// Element states of a modal, by block id and action id.
pub type StateValues = IndexMap<String, IndexMap<String, Value>>;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ViewState {
	#[serde(default)]
	pub values: StateValues,
}

/// The view an interaction happened in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewInfo {
	pub id: String,
	#[serde(default)]
	pub state: ViewState,
}

/// Where a block action happened.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Container {
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default)]
	pub view_id: Option<String>,
	#[serde(default)]
	pub channel_id: Option<String>,
	#[serde(default)]
	pub message_ts: Option<String>,
}

/// Derives the cache key of the surface an interaction targets.
///
/// The view id wins; otherwise the container's view id, then
/// `channel_id:message_ts` for messages.
pub fn surface_key(view: Option<&ViewInfo>, container: Option<&Container>) -> Option<String> {
	if let Some(view) = view {
		return Some(view.id.clone());
	}
	let container = container?;
	if let Some(view_id) = &container.view_id {
		return Some(view_id.clone());
	}
	match (&container.channel_id, &container.message_ts) {
		(Some(channel), Some(ts)) => Some(format!("{channel}:{ts}")),
		_ => None,
	}
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BlockActionsPayload {
	pub user: User,
	#[serde(default)]
	pub trigger_id: Option<String>,
	/// Raw element states, one per action, in order.
	#[serde(default)]
	pub actions: Vec<Value>,
	#[serde(default)]
	pub view: Option<ViewInfo>,
	#[serde(default)]
	pub container: Option<Container>,
}

impl BlockActionsPayload {
	pub fn surface_key(&self) -> Option<String> {
		surface_key(self.view.as_ref(), self.container.as_ref())
	}
}

/// `view_submission` and `view_closed` payloads.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewSubmissionPayload {
	pub user: User,
	pub view: ViewInfo,
}

/// Option query of an external select.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BlockSuggestionPayload {
	pub user: User,
	pub action_id: String,
	/// Text typed so far.
	#[serde(default)]
	pub value: String,
	#[serde(default)]
	pub view: Option<ViewInfo>,
	#[serde(default)]
	pub container: Option<Container>,
}

impl BlockSuggestionPayload {
	pub fn surface_key(&self) -> Option<String> {
		surface_key(self.view.as_ref(), self.container.as_ref())
	}
}

/// Global shortcut invocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShortcutPayload {
	pub user: User,
	pub callback_id: String,
	pub trigger_id: String,
}

/// An interactivity request, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionPayload {
	BlockActions(BlockActionsPayload),
	ViewSubmission(ViewSubmissionPayload),
	ViewClosed(ViewSubmissionPayload),
	BlockSuggestion(BlockSuggestionPayload),
	Shortcut(ShortcutPayload),
	#[serde(other)]
	Unsupported,
}

impl InteractionPayload {
	/// Payload type as sent by the platform.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::BlockActions(_) => "block_actions",
			Self::ViewSubmission(_) => "view_submission",
			Self::ViewClosed(_) => "view_closed",
			Self::BlockSuggestion(_) => "block_suggestion",
			Self::Shortcut(_) => "shortcut",
			Self::Unsupported => "unsupported",
		}
	}
}
