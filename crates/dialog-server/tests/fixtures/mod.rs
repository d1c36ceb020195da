//! Shared fakes for dispatcher and server tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use dialog_server::payload::HomeOpenedEvent;
use dialog_server::{
	Dispatcher, InMemoryViewCache, MessageRef, PlatformClient, PlatformError, ViewRef,
};
use parking_lot::Mutex;
use serde_json::{Value, json};

pub const MESSAGE_TS: &str = "1700000000.000100";

/// One outbound platform call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
	PublishHome { user_id: String, view: Value },
	UpdateHome { view_id: String, view: Value },
	PostMessage { channel: String, message: Value },
	UpdateMessage { channel: String, ts: String, message: Value },
	OpenModal { trigger_id: String, view: Value },
	UpdateModal { view_id: String, view: Value },
}

impl Call {
	pub fn document(&self) -> &Value {
		match self {
			Self::PublishHome { view, .. }
			| Self::UpdateHome { view, .. }
			| Self::OpenModal { view, .. }
			| Self::UpdateModal { view, .. } => view,
			Self::PostMessage { message, .. } | Self::UpdateMessage { message, .. } => message,
		}
	}
}

/// Records every call and answers with predictable ids.
///
/// Home views are `V-<user>`, modals `VM<n>`, messages are posted at
/// [`MESSAGE_TS`].
#[derive(Default)]
pub struct RecordingClient {
	calls: Mutex<Vec<Call>>,
	modals: AtomicUsize,
	fail_updates: AtomicBool,
}

impl RecordingClient {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn calls(&self) -> Vec<Call> {
		self.calls.lock().clone()
	}

	pub fn last(&self) -> Option<Call> {
		self.calls.lock().last().cloned()
	}

	/// Makes every update call answer `ok: false`.
	pub fn fail_updates(&self) {
		self.fail_updates.store(true, Ordering::SeqCst);
	}

	fn record(&self, call: Call) {
		self.calls.lock().push(call);
	}

	fn update_result(&self, method: &str) -> Result<(), PlatformError> {
		if self.fail_updates.load(Ordering::SeqCst) {
			return Err(PlatformError::Api {
				method: method.to_string(),
				error: "not_allowed".to_string(),
			});
		}
		Ok(())
	}
}

#[async_trait]
impl PlatformClient for RecordingClient {
	async fn publish_home(&self, user_id: &str, view: &Value) -> Result<ViewRef, PlatformError> {
		self.record(Call::PublishHome {
			user_id: user_id.to_string(),
			view: view.clone(),
		});
		Ok(ViewRef {
			id: format!("V-{user_id}"),
		})
	}

	async fn update_home(&self, view_id: &str, view: &Value) -> Result<ViewRef, PlatformError> {
		self.record(Call::UpdateHome {
			view_id: view_id.to_string(),
			view: view.clone(),
		});
		self.update_result("views.update")?;
		Ok(ViewRef { id: view_id.to_string() })
	}

	async fn post_message(
		&self,
		channel: &str,
		message: &Value,
	) -> Result<MessageRef, PlatformError> {
		self.record(Call::PostMessage {
			channel: channel.to_string(),
			message: message.clone(),
		});
		Ok(MessageRef {
			channel: channel.to_string(),
			ts: MESSAGE_TS.to_string(),
		})
	}

	async fn update_message(
		&self,
		channel: &str,
		ts: &str,
		message: &Value,
	) -> Result<MessageRef, PlatformError> {
		self.record(Call::UpdateMessage {
			channel: channel.to_string(),
			ts: ts.to_string(),
			message: message.clone(),
		});
		self.update_result("chat.update")?;
		Ok(MessageRef {
			channel: channel.to_string(),
			ts: ts.to_string(),
		})
	}

	async fn open_modal(&self, trigger_id: &str, view: &Value) -> Result<ViewRef, PlatformError> {
		self.record(Call::OpenModal {
			trigger_id: trigger_id.to_string(),
			view: view.clone(),
		});
		let n = self.modals.fetch_add(1, Ordering::SeqCst) + 1;
		Ok(ViewRef { id: format!("VM{n}") })
	}

	async fn update_modal(&self, view_id: &str, view: &Value) -> Result<ViewRef, PlatformError> {
		self.record(Call::UpdateModal {
			view_id: view_id.to_string(),
			view: view.clone(),
		});
		self.update_result("views.update")?;
		Ok(ViewRef { id: view_id.to_string() })
	}
}

pub fn dispatcher(client: &Arc<RecordingClient>) -> Dispatcher {
	let client = Arc::clone(client) as Arc<dyn PlatformClient>;
	Dispatcher::new(Arc::new(InMemoryViewCache::new()), client)
}

pub fn home_opened(user: &str, view_id: Option<&str>) -> HomeOpenedEvent {
	let mut event = json!({"type": "app_home_opened", "user": user, "tab": "home"});
	if let Some(id) = view_id {
		event["view"] = json!({"id": id});
	}
	serde_json::from_value(event).unwrap()
}

/// A `block_actions` payload from a view.
pub fn view_action(user: &str, view_id: &str, action: Value) -> Value {
	json!({
		"type": "block_actions",
		"user": {"id": user},
		"trigger_id": "T-1",
		"actions": [action],
		"view": {"id": view_id, "state": {"values": {}}},
		"container": {"type": "view", "view_id": view_id},
	})
}

pub fn button(action_id: &str) -> Value {
	json!({"type": "button", "action_id": action_id, "block_id": "b", "value": ""})
}

/// Text of the `index`th block of a document.
pub fn block_text(document: &Value, index: usize) -> Option<&str> {
	document["blocks"][index]["text"]["text"].as_str()
}
