//! Error types for tree construction and rendering.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Result type for construction operations.
pub type ConstructionResult<T> = Result<T, ConstructionError>;

/// Errors raised while turning a component tree into a document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConstructionError {
	/// An element was declared without a construction function.
	#[error("element `{0}` has no construction function")]
	MissingTransform(String),

	/// The merge table has no rule for attaching this child to this parent.
	#[error("cannot attach child to parent: {{\"parent\":{parent},\"child\":{child}}}")]
	UnsupportedMerge {
		/// Parent value at the time of the merge.
		parent: Value,
		/// Child value that could not be attached.
		child: Value,
	},

	/// A text concatenation received a child without text.
	#[error("cannot concatenate non-text child into `{parent}`: {child}")]
	NotText {
		/// Tag of the receiving parent.
		parent: String,
		/// Offending child value.
		child: Value,
	},

	/// A second value reached the root container.
	#[error("a tree must produce a single root value, found another: {0}")]
	MultipleRoots(Value),
}

/// Errors raised by [`render`](crate::render).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RenderError {
	/// Construction of the tree failed.
	#[error(transparent)]
	Construction(#[from] ConstructionError),

	/// A queued interaction handler failed.
	#[error(transparent)]
	Effect(#[from] anyhow::Error),
}

/// A failure meant to be shown to a person rather than a log.
///
/// Carries an optional title, body and remediation hint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub struct DialogError {
	/// Short headline.
	pub title: Option<String>,
	/// Explanation of what went wrong.
	pub content: Option<String>,
	/// What to do about it.
	pub suggestion: Option<String>,
}

impl DialogError {
	/// Creates an error with a title.
	pub fn new(title: impl Into<String>) -> Self {
		Self {
			title: Some(title.into()),
			..Self::default()
		}
	}

	/// Sets the explanation.
	pub fn with_content(mut self, content: impl Into<String>) -> Self {
		self.content = Some(content.into());
		self
	}

	/// Sets the remediation hint.
	pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
		self.suggestion = Some(suggestion.into());
		self
	}

	/// No cached item exists for an interaction's surface key.
	pub fn missing_state(key: &str) -> Self {
		Self::new("Missing state").with_content(format!("No previous state for {key}"))
	}

	/// A surface produced no document.
	pub fn missing_markup(surface: &str) -> Self {
		Self::new("Missing markup")
			.with_content(format!("`{surface}` rendered nothing"))
			.with_suggestion("Return a Home, Modal or Message element from the surface")
	}
}

impl fmt::Display for DialogError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match (&self.title, &self.content) {
			(Some(title), Some(content)) => write!(f, "{title}: {content}"),
			(Some(title), None) => f.write_str(title),
			(None, Some(content)) => f.write_str(content),
			(None, None) => f.write_str("dialog error"),
		}
	}
}
