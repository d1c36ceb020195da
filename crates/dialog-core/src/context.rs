//! Per-pass root context.

use crate::callback::{PendingEffect, SearchOptionsCallback};
use crate::error::{ConstructionError, ConstructionResult};
use crate::event::Action;
use crate::instance::Instance;

/// State threaded through one reconcile pass.
///
/// Holds the replayed action, the effects queued by finalization, a captured
/// option-search handler and the single root value.
pub struct RootContext<'a> {
	action: Option<&'a Action>,
	pending: Vec<PendingEffect>,
	search_options: Option<SearchOptionsCallback>,
	document: Option<Instance>,
}

impl<'a> RootContext<'a> {
	pub fn new(action: Option<&'a Action>) -> Self {
		Self {
			action,
			pending: Vec::new(),
			search_options: None,
			document: None,
		}
	}

	/// The action replayed by this pass.
	pub fn action(&self) -> Option<&'a Action> {
		self.action
	}

	pub fn push_pending(&mut self, effect: PendingEffect) {
		self.pending.push(effect);
	}

	pub fn pending_len(&self) -> usize {
		self.pending.len()
	}

	pub fn set_search_options(&mut self, callback: SearchOptionsCallback) {
		self.search_options = Some(callback);
	}

	pub fn search_options(&self) -> Option<&SearchOptionsCallback> {
		self.search_options.as_ref()
	}

	/// Places a top-level value. Only one is accepted per pass.
	pub(crate) fn append_to_container(&mut self, value: Instance) -> ConstructionResult<()> {
		if self.document.is_some() {
			return Err(ConstructionError::MultipleRoots(value.to_value()));
		}
		self.document = Some(value);
		Ok(())
	}

	/// Takes over the effects and search handler of a nested pass.
	pub(crate) fn absorb(
		&mut self,
		pending: Vec<PendingEffect>,
		search_options: Option<SearchOptionsCallback>,
	) {
		self.pending.extend(pending);
		if self.search_options.is_none() {
			self.search_options = search_options;
		}
	}

	pub(crate) fn into_parts(
		self,
	) -> (
		Option<Instance>,
		Vec<PendingEffect>,
		Option<SearchOptionsCallback>,
	) {
		(self.document, self.pending, self.search_options)
	}
}
