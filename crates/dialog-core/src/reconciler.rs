//! Tree reconciler.
//!
//! A single synchronous depth-first pass: each element is constructed by its
//! transform, its children are constructed and merged into it in order, and
//! the finalization hook runs last. The first top-level value becomes the
//! document.

use crate::callback::{PendingEffect, SearchOptionsCallback};
use crate::context::RootContext;
use crate::error::{ConstructionError, ConstructionResult};
use crate::event::Action;
use crate::finalize::finalize;
use crate::instance::Instance;
use crate::merge::merge;
use crate::node::{Element, Node};

/// Outcome of one reconcile pass.
pub struct Reconciled {
	/// The root value, if the tree produced one.
	pub document: Option<Instance>,
	/// Effects queued by finalization, in construction order.
	pub pending: Vec<PendingEffect>,
	/// Option-search handler captured for the replayed action.
	pub search_options: Option<SearchOptionsCallback>,
}

/// Capability handed to construction functions.
///
/// Lets a component run a nested pass over a sub-tree (for example a `confirm`
/// or `accessory` slot) that shares the enclosing pass's action and queue.
pub struct Construct<'r, 'a> {
	root: &'r mut RootContext<'a>,
}

impl<'r, 'a> Construct<'r, 'a> {
	fn new(root: &'r mut RootContext<'a>) -> Self {
		Self { root }
	}

	/// The action replayed by the enclosing pass.
	pub fn action(&self) -> Option<&'a Action> {
		self.root.action()
	}

	/// Reconciles a sub-tree. Its queued effects join the enclosing pass.
	pub fn reconcile(&mut self, node: Option<&Node>) -> ConstructionResult<Option<Instance>> {
		let Some(node) = node else {
			return Ok(None);
		};
		let Reconciled {
			document,
			pending,
			search_options,
		} = reconcile(node, self.root.action())?;
		self.root.absorb(pending, search_options);
		Ok(document)
	}

	/// Queues an effect on the enclosing pass.
	pub fn push_pending(&mut self, effect: PendingEffect) {
		self.root.push_pending(effect);
	}
}

/// Reconciles `tree`, replaying `action` against its handlers.
pub fn reconcile(tree: &Node, action: Option<&Action>) -> ConstructionResult<Reconciled> {
	let mut root = RootContext::new(action);
	for value in construct(tree, &mut root)? {
		root.append_to_container(value)?;
	}
	let (document, pending, search_options) = root.into_parts();
	Ok(Reconciled {
		document,
		pending,
		search_options,
	})
}

fn construct(node: &Node, root: &mut RootContext<'_>) -> ConstructionResult<Vec<Instance>> {
	match node {
		Node::Empty => Ok(Vec::new()),
		Node::Text(text) => Ok(vec![Instance::raw_text(text.clone())]),
		Node::Element(element) => Ok(vec![construct_element(element, root)?]),
		Node::Fragment(nodes) => {
			let mut values = Vec::with_capacity(nodes.len());
			for node in nodes {
				values.extend(construct(node, root)?);
			}
			Ok(values)
		}
	}
}

fn construct_element(
	element: &Element,
	root: &mut RootContext<'_>,
) -> ConstructionResult<Instance> {
	let transform = element
		.transform()
		.ok_or_else(|| ConstructionError::MissingTransform(element.tag().to_string()))?;
	let mut instance = transform(element.props(), &mut Construct::new(root))?;
	for child in element.children() {
		for value in construct(child, root)? {
			merge(&mut instance, value)?;
		}
	}
	finalize(element.props(), root);
	Ok(instance)
}
