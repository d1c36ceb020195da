//! Error types for dispatch and platform calls.

use dialog_core::{ConstructionError, DialogError, RenderError};
use thiserror::Error;

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors raised by outbound platform calls.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlatformError {
	/// The request could not be sent or its response could not be read.
	#[error("transport error calling {method}: {source}")]
	Transport {
		/// API method being called.
		method: String,
		#[source]
		source: reqwest::Error,
	},

	/// The platform answered `ok: false`.
	#[error("{method} failed: {error}")]
	Api {
		/// API method being called.
		method: String,
		/// Error code returned by the platform.
		error: String,
	},

	/// A successful response lacked an identifier needed for caching.
	#[error("{method} response is missing `{field}`")]
	MissingField {
		/// API method being called.
		method: String,
		/// Missing response field.
		field: &'static str,
	},
}

/// Errors raised while dispatching an interaction.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DispatchError {
	/// A failure that can be described to a person.
	#[error(transparent)]
	Dialog(#[from] DialogError),

	/// Rendering a surface failed.
	#[error(transparent)]
	Render(#[from] RenderError),

	/// Reconciling a surface failed.
	#[error(transparent)]
	Construction(#[from] ConstructionError),

	/// An outbound platform call failed.
	#[error(transparent)]
	Platform(#[from] PlatformError),

	/// A cached item names a surface that is not registered.
	#[error("no surface registered under `{0}`")]
	UnknownSurface(String),

	/// A modal item does not name the surface that opened it, or that
	/// surface is no longer cached.
	#[error("modal `{0}` has no cached parent surface")]
	MissingParent(String),

	/// A modal was opened outside an interaction that carries a trigger id.
	#[error("modal `{0}` cannot be opened without a trigger id")]
	MissingTrigger(String),

	/// The payload identifies no cached surface.
	#[error("payload does not identify a surface")]
	MissingSurfaceKey,

	/// A user handler failed outside of a render.
	#[error("handler failed: {0}")]
	Handler(anyhow::Error),
}

impl DispatchError {
	/// The describable error, if this is one or a handler raised one.
	pub fn describe(&self) -> Option<&DialogError> {
		match self {
			Self::Dialog(error) => Some(error),
			Self::Render(RenderError::Effect(error)) | Self::Handler(error) => error.downcast_ref(),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_describe_only_dialog_errors() {
		let missing = DispatchError::from(DialogError::missing_state("V1"));
		let unknown = DispatchError::UnknownSurface("Dashboard".into());

		assert_eq!(
			missing.describe().and_then(|e| e.title.as_deref()),
			Some("Missing state")
		);
		assert!(unknown.describe().is_none());
	}

	#[rstest]
	fn test_describe_handler_error() {
		let error = DispatchError::Handler(anyhow::Error::new(DialogError::new("Quota reached")));

		assert_eq!(
			error.describe().and_then(|e| e.title.as_deref()),
			Some("Quota reached")
		);
	}

	#[rstest]
	fn test_platform_error_display() {
		let error = PlatformError::Api {
			method: "views.publish".into(),
			error: "invalid_auth".into(),
		};

		assert_eq!(error.to_string(), "views.publish failed: invalid_auth");
	}
}
