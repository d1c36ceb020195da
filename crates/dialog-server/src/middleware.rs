//! Request pipeline: a handler wrapped by middleware.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use bytes::Bytes;

/// A request with its body fully read.
pub type Request = http::Request<Bytes>;

/// A response with an in-memory body.
pub type Response = http::Response<Bytes>;

/// Produces a response for a request.
#[async_trait]
pub trait Handler: Send + Sync {
	async fn handle(&self, request: Request) -> anyhow::Result<Response>;
}

/// Wraps the next handler of the pipeline.
#[async_trait]
pub trait Middleware: Send + Sync {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> anyhow::Result<Response>;
}

/// Composes middleware around a handler.
///
/// Middleware run in the order they are added.
pub struct MiddlewareChain {
	handler: Arc<dyn Handler>,
	middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			handler,
			middlewares: Vec::new(),
		}
	}

	pub fn add_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	/// Builds the outermost handler.
	pub fn build(self) -> Arc<dyn Handler> {
		let mut handler = self.handler;
		for middleware in self.middlewares.into_iter().rev() {
			handler = Arc::new(MiddlewareHandler {
				middleware,
				next: handler,
			});
		}
		handler
	}
}

struct MiddlewareHandler {
	middleware: Arc<dyn Middleware>,
	next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for MiddlewareHandler {
	async fn handle(&self, request: Request) -> anyhow::Result<Response> {
		self.middleware.process(request, Arc::clone(&self.next)).await
	}
}

/// Logs method, path, status and latency of every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMiddleware;

#[async_trait]
impl Middleware for LoggingMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> anyhow::Result<Response> {
		let method = request.method().clone();
		let path = request.uri().path().to_string();
		let started = Instant::now();

		let result = next.handle(request).await;
		let elapsed_ms = started.elapsed().as_millis() as u64;
		match &result {
			Ok(response) => tracing::info!(
				target: "dialog::server",
				%method,
				path,
				status = response.status().as_u16(),
				elapsed_ms,
				"request"
			),
			Err(err) => tracing::error!(
				target: "dialog::server",
				%method,
				path,
				elapsed_ms,
				error = %err,
				"request failed"
			),
		}
		result
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use parking_lot::Mutex;
	use rstest::rstest;

	struct Echo;

	#[async_trait]
	impl Handler for Echo {
		async fn handle(&self, request: Request) -> anyhow::Result<Response> {
			Ok(Response::new(request.into_body()))
		}
	}

	struct Record {
		name: &'static str,
		log: Arc<Mutex<Vec<&'static str>>>,
	}

	#[async_trait]
	impl Middleware for Record {
		async fn process(
			&self,
			request: Request,
			next: Arc<dyn Handler>,
		) -> anyhow::Result<Response> {
			self.log.lock().push(self.name);
			next.handle(request).await
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_chain_runs_middleware_in_order() {
		// Arrange
		let log = Arc::new(Mutex::new(Vec::new()));
		let handler = MiddlewareChain::new(Arc::new(Echo))
			.add_middleware(Arc::new(Record { name: "outer", log: Arc::clone(&log) }))
			.add_middleware(Arc::new(Record { name: "inner", log: Arc::clone(&log) }))
			.build();

		// Act
		let response = handler.handle(Request::new(Bytes::from_static(b"hi"))).await.unwrap();

		// Assert
		assert_eq!(response.body(), &Bytes::from_static(b"hi"));
		assert_eq!(*log.lock(), vec!["outer", "inner"]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_logging_middleware_passes_response_through() {
		let handler = MiddlewareChain::new(Arc::new(Echo))
			.add_middleware(Arc::new(LoggingMiddleware))
			.build();

		let response = handler.handle(Request::new(Bytes::from_static(b"ok"))).await.unwrap();

		assert_eq!(response.status(), http::StatusCode::OK);
		assert_eq!(response.body(), &Bytes::from_static(b"ok"));
	}
}
