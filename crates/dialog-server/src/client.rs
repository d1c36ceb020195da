//! Outbound platform client.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::PlatformError;

/// Default Web API base URL.
pub const DEFAULT_API_URL: &str = "https://slack.com/api";

/// Identifier of a published, updated or opened view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRef {
	pub id: String,
}

/// Identifier of a posted or updated message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRef {
	pub channel: String,
	pub ts: String,
}

/// Calls the platform makes on behalf of the dispatcher.
#[async_trait]
pub trait PlatformClient: Send + Sync {
	/// Publishes a home tab for a user.
	async fn publish_home(&self, user_id: &str, view: &Value) -> Result<ViewRef, PlatformError>;

	async fn update_home(&self, view_id: &str, view: &Value) -> Result<ViewRef, PlatformError>;

	/// Posts a message; `message` holds `blocks` and optional fallback `text`.
	async fn post_message(
		&self,
		channel: &str,
		message: &Value,
	) -> Result<MessageRef, PlatformError>;

	async fn update_message(
		&self,
		channel: &str,
		ts: &str,
		message: &Value,
	) -> Result<MessageRef, PlatformError>;

	/// Opens a modal in response to the interaction identified by `trigger_id`.
	async fn open_modal(&self, trigger_id: &str, view: &Value) -> Result<ViewRef, PlatformError>;

	async fn update_modal(&self, view_id: &str, view: &Value) -> Result<ViewRef, PlatformError>;
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
	ok: bool,
	#[serde(default)]
	error: Option<String>,
	#[serde(default)]
	view: Option<ApiView>,
	#[serde(default)]
	channel: Option<String>,
	#[serde(default)]
	ts: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiView {
	id: String,
}

impl ApiResponse {
	fn view_ref(self, method: &str) -> Result<ViewRef, PlatformError> {
		self.view
			.map(|view| ViewRef { id: view.id })
			.ok_or_else(|| PlatformError::MissingField {
				method: method.to_string(),
				field: "view.id",
			})
	}

	fn message_ref(self, method: &str) -> Result<MessageRef, PlatformError> {
		match (self.channel, self.ts) {
			(Some(channel), Some(ts)) => Ok(MessageRef { channel, ts }),
			(None, _) => Err(PlatformError::MissingField {
				method: method.to_string(),
				field: "channel",
			}),
			(_, None) => Err(PlatformError::MissingField {
				method: method.to_string(),
				field: "ts",
			}),
		}
	}
}

/// [`PlatformClient`] over the Slack Web API.
#[derive(Debug, Clone)]
pub struct WebApiClient {
	http: reqwest::Client,
	base_url: String,
	token: String,
}

impl WebApiClient {
	pub fn new(token: impl Into<String>) -> Self {
		Self {
			http: reqwest::Client::new(),
			base_url: DEFAULT_API_URL.to_string(),
			token: token.into(),
		}
	}

	/// Overrides the API base URL.
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into().trim_end_matches('/').to_string();
		self
	}

	async fn call(&self, method: &str, body: Value) -> Result<ApiResponse, PlatformError> {
		let transport = |source: reqwest::Error| PlatformError::Transport {
			method: method.to_string(),
			source,
		};
		let response: ApiResponse = self
			.http
			.post(format!("{}/{method}", self.base_url))
			.bearer_auth(&self.token)
			.json(&body)
			.send()
			.await
			.map_err(transport)?
			.json()
			.await
			.map_err(transport)?;

		if !response.ok {
			let error = response.error.unwrap_or_else(|| "unknown_error".to_string());
			tracing::error!(method, error = %error, "platform call failed");
			return Err(PlatformError::Api {
				method: method.to_string(),
				error,
			});
		}
		Ok(response)
	}
}

/// Copies `message` and adds `extra` fields next to its own.
fn message_body(message: &Value, extra: Value) -> Value {
	let mut body = match message {
		Value::Object(map) => map.clone(),
		_ => serde_json::Map::new(),
	};
	if let Value::Object(extra) = extra {
		body.extend(extra);
	}
	Value::Object(body)
}

#[async_trait]
impl PlatformClient for WebApiClient {
	async fn publish_home(&self, user_id: &str, view: &Value) -> Result<ViewRef, PlatformError> {
		let method = "views.publish";
		self.call(method, json!({"user_id": user_id, "view": view}))
			.await?
			.view_ref(method)
	}

	async fn update_home(&self, view_id: &str, view: &Value) -> Result<ViewRef, PlatformError> {
		let method = "views.update";
		self.call(method, json!({"view_id": view_id, "view": view}))
			.await?
			.view_ref(method)
	}

	async fn post_message(
		&self,
		channel: &str,
		message: &Value,
	) -> Result<MessageRef, PlatformError> {
		let method = "chat.postMessage";
		self.call(method, message_body(message, json!({"channel": channel})))
			.await?
			.message_ref(method)
	}

	async fn update_message(
		&self,
		channel: &str,
		ts: &str,
		message: &Value,
	) -> Result<MessageRef, PlatformError> {
		let method = "chat.update";
		self.call(method, message_body(message, json!({"channel": channel, "ts": ts})))
			.await?
			.message_ref(method)
	}

	async fn open_modal(&self, trigger_id: &str, view: &Value) -> Result<ViewRef, PlatformError> {
		let method = "views.open";
		self.call(method, json!({"trigger_id": trigger_id, "view": view}))
			.await?
			.view_ref(method)
	}

	async fn update_modal(&self, view_id: &str, view: &Value) -> Result<ViewRef, PlatformError> {
		let method = "views.update";
		self.call(method, json!({"view_id": view_id, "view": view}))
			.await?
			.view_ref(method)
	}
}
