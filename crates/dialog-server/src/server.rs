//! HTTP surface: Events API and interactivity endpoints on hyper.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, StatusCode, header};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper_util::rt::TokioIo;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};

use crate::cache::{InMemoryViewCache, Item};
use crate::client::{PlatformClient, WebApiClient};
use crate::dispatcher::{Dispatcher, HomeOptions, MessageOptions};
use crate::error::{DispatchError, DispatchResult};
use crate::middleware::{Handler, LoggingMiddleware, Middleware, MiddlewareChain, Request, Response};
use crate::payload::{EventEnvelope, HomeOpenedEvent, InteractionPayload};
use crate::settings::Settings;
use crate::surface::SharedSurface;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Serves registered surfaces over HTTP.
pub struct DialogServer {
	dispatcher: Arc<Dispatcher>,
	middlewares: Vec<Arc<dyn Middleware>>,
}

impl DialogServer {
	/// A server with request logging around the given dispatcher.
	pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
		Self {
			dispatcher,
			middlewares: vec![Arc::new(LoggingMiddleware)],
		}
	}

	/// An in-memory cache and a Web API client configured from `settings`.
	pub fn from_settings(settings: &Settings) -> Self {
		if settings.slack_token.is_empty() {
			tracing::warn!(
				target: "dialog::server",
				"SLACK_TOKEN is empty; platform calls will fail"
			);
		}
		let client: Arc<dyn PlatformClient> = Arc::new(
			WebApiClient::new(settings.slack_token.as_str())
				.with_base_url(settings.api_url.as_str()),
		);
		let cache = Arc::new(InMemoryViewCache::new());
		Self::new(Arc::new(Dispatcher::new(cache, client)))
	}

	pub fn dispatcher(&self) -> &Arc<Dispatcher> {
		&self.dispatcher
	}

	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	/// Sets the home tab surface.
	pub fn home(self, surface: SharedSurface, options: HomeOptions) -> Self {
		self.dispatcher.register_home(surface, options);
		self
	}

	/// Opens `surface` when the global shortcut `callback_id` is used.
	pub fn shortcut(self, callback_id: impl Into<String>, surface: SharedSurface) -> Self {
		self.dispatcher.register_shortcut(callback_id, surface);
		self
	}

	/// Posts a message surface now.
	pub async fn message(
		&self,
		surface: SharedSurface,
		options: MessageOptions,
	) -> DispatchResult<Item> {
		self.dispatcher.post_message(surface, options).await
	}

	/// The routing handler wrapped in the configured middleware.
	pub fn handler(&self) -> Arc<dyn Handler> {
		let router = Arc::new(Router {
			dispatcher: Arc::clone(&self.dispatcher),
		});
		self.middlewares
			.iter()
			.fold(MiddlewareChain::new(router), |chain, middleware| {
				chain.add_middleware(Arc::clone(middleware))
			})
			.build()
	}

	/// Accepts connections until the listener fails.
	pub async fn listen(self, addr: SocketAddr) -> Result<(), BoxError> {
		let listener = TcpListener::bind(addr).await?;
		tracing::info!(target: "dialog::server", %addr, "listening");
		let handler = self.handler();

		loop {
			let (stream, remote_addr) = listener.accept().await?;
			let handler = Arc::clone(&handler);
			tokio::task::spawn(async move {
				if let Err(err) = Self::handle_connection(stream, handler).await {
					tracing::warn!(
						target: "dialog::server",
						%remote_addr,
						error = %err,
						"connection error"
					);
				}
			});
		}
	}

	/// Serves HTTP/1 requests on one connection.
	pub async fn handle_connection(
		stream: TcpStream,
		handler: Arc<dyn Handler>,
	) -> Result<(), BoxError> {
		let io = TokioIo::new(stream);
		http1::Builder::new()
			.serve_connection(io, RequestService { handler })
			.await?;
		Ok(())
	}
}

struct RequestService {
	handler: Arc<dyn Handler>,
}

impl Service<hyper::Request<Incoming>> for RequestService {
	type Response = hyper::Response<Full<Bytes>>;
	type Error = BoxError;
	type Future =
		Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

	fn call(&self, req: hyper::Request<Incoming>) -> Self::Future {
		let handler = Arc::clone(&self.handler);

		Box::pin(async move {
			let (parts, body) = req.into_parts();
			let body = body.collect().await?.to_bytes();
			let response = match handler.handle(Request::from_parts(parts, body)).await {
				Ok(response) => response,
				Err(_) => status(StatusCode::INTERNAL_SERVER_ERROR)?,
			};
			Ok(response.map(Full::new))
		})
	}
}

/// Routes requests to the dispatcher.
struct Router {
	dispatcher: Arc<Dispatcher>,
}

#[async_trait]
impl Handler for Router {
	async fn handle(&self, request: Request) -> anyhow::Result<Response> {
		match (request.method(), request.uri().path()) {
			(_, "/ping") => Ok(Response::new(Bytes::from_static(b"PONG"))),
			(&Method::POST, "/events") => self.events(request.body()),
			(&Method::POST, "/interactions") => self.interactions(request.body()).await,
			_ => status(StatusCode::NOT_FOUND),
		}
	}
}

#[derive(Deserialize)]
struct InteractionForm {
	payload: String,
}

impl Router {
	fn events(&self, body: &[u8]) -> anyhow::Result<Response> {
		let envelope: EventEnvelope = match serde_json::from_slice(body) {
			Ok(envelope) => envelope,
			Err(err) => {
				tracing::warn!(target: "dialog::server", error = %err, "malformed event body");
				return status(StatusCode::BAD_REQUEST);
			}
		};

		match envelope {
			EventEnvelope::UrlVerification { challenge } => {
				json_response(&json!({"challenge": challenge}))
			}
			EventEnvelope::EventCallback { event } => {
				if event.get("type").and_then(Value::as_str) == Some("app_home_opened") {
					let event: HomeOpenedEvent = serde_json::from_value(event)?;
					let dispatcher = Arc::clone(&self.dispatcher);
					tokio::spawn(async move {
						if let Err(err) = dispatcher.home_opened(&event).await {
							report(&err);
						}
					});
				}
				status(StatusCode::OK)
			}
			EventEnvelope::Unsupported => status(StatusCode::OK),
		}
	}

	async fn interactions(&self, body: &[u8]) -> anyhow::Result<Response> {
		let payload = match decode_interaction(body) {
			Ok(payload) => payload,
			Err(err) => {
				tracing::warn!(
					target: "dialog::server",
					error = %err,
					"malformed interaction payload"
				);
				return status(StatusCode::BAD_REQUEST);
			}
		};
		tracing::debug!(target: "dialog::server", kind = payload.kind(), "interaction");

		if matches!(payload, InteractionPayload::BlockSuggestion(_)) {
			let options = match self.dispatcher.dispatch(&payload).await {
				Ok(options) => options.unwrap_or_else(|| json!({"options": []})),
				Err(err) => {
					report(&err);
					json!({"options": []})
				}
			};
			return json_response(&options);
		}

		let dispatcher = Arc::clone(&self.dispatcher);
		tokio::spawn(async move {
			if let Err(err) = dispatcher.dispatch(&payload).await {
				report(&err);
			}
		});
		status(StatusCode::OK)
	}
}

fn decode_interaction(body: &[u8]) -> anyhow::Result<InteractionPayload> {
	let form: InteractionForm = serde_urlencoded::from_bytes(body)?;
	Ok(serde_json::from_str(&form.payload)?)
}

fn status(code: StatusCode) -> anyhow::Result<Response> {
	Ok(http::Response::builder().status(code).body(Bytes::new())?)
}

fn json_response(body: &Value) -> anyhow::Result<Response> {
	Ok(http::Response::builder()
		.header(header::CONTENT_TYPE, "application/json")
		.body(Bytes::from(serde_json::to_vec(body)?))?)
}

/// Logs a failed dispatch, with its description when it has one.
fn report(err: &DispatchError) {
	match err.describe() {
		Some(dialog) => tracing::error!(
			target: "dialog::server",
			title = dialog.title.as_deref().unwrap_or_default(),
			content = dialog.content.as_deref().unwrap_or_default(),
			suggestion = dialog.suggestion.as_deref().unwrap_or_default(),
			"dispatch failed"
		),
		None => tracing::error!(target: "dialog::server", error = %err, "dispatch failed"),
	}
}
