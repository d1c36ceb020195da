//! Render: reconcile, then wait for every queued effect.

use futures::future::try_join_all;
use serde_json::Value;

use crate::error::RenderError;
use crate::event::Action;
use crate::node::Node;
use crate::reconciler::{Reconciled, reconcile};

/// Renders `tree` to a document, replaying `action`.
///
/// All effects queued during the pass run concurrently and must succeed
/// before the document is returned. The first failure is returned instead.
pub async fn render(tree: &Node, action: Option<&Action>) -> Result<Option<Value>, RenderError> {
	let Reconciled {
		document, pending, ..
	} = reconcile(tree, action)?;
	if !pending.is_empty() {
		tracing::debug!(effects = pending.len(), "awaiting pending effects");
		try_join_all(pending).await?;
	}
	Ok(document.map(|document| document.to_value()))
}
