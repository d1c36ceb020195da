//! Component tree nodes.

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::callback::{Callback, SearchOptionsCallback};
use crate::error::ConstructionResult;
use crate::event::{InteractionEvent, SearchOptionsEvent};
use crate::instance::Instance;
use crate::reconciler::Construct;

/// Construction function of an element.
///
/// Receives the element's props and a [`Construct`] capability for nested
/// passes, and produces the element's [`Instance`].
pub type Transform =
	Arc<dyn Fn(&Props, &mut Construct<'_, '_>) -> ConstructionResult<Instance> + Send + Sync>;

/// A node of a component tree.
#[derive(Clone, Default)]
pub enum Node {
	/// Produces nothing.
	#[default]
	Empty,
	/// A string child, produced as raw text.
	Text(String),
	Element(Box<Element>),
	/// Several sibling nodes with no wrapper.
	Fragment(Vec<Node>),
}

impl Node {
	pub fn text(text: impl Into<String>) -> Self {
		Self::Text(text.into())
	}

	pub fn fragment<I, N>(nodes: I) -> Self
	where
		I: IntoIterator<Item = N>,
		N: Into<Node>,
	{
		Self::Fragment(nodes.into_iter().map(Into::into).collect())
	}

	pub fn is_empty(&self) -> bool {
		matches!(self, Self::Empty)
	}
}

impl fmt::Debug for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Empty => f.write_str("Empty"),
			Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
			Self::Element(element) => element.fmt(f),
			Self::Fragment(nodes) => f.debug_tuple("Fragment").field(nodes).finish(),
		}
	}
}

impl From<&str> for Node {
	fn from(text: &str) -> Self {
		Self::Text(text.to_string())
	}
}

impl From<String> for Node {
	fn from(text: String) -> Self {
		Self::Text(text)
	}
}

impl From<Element> for Node {
	fn from(element: Element) -> Self {
		Self::Element(Box::new(element))
	}
}

impl From<Vec<Node>> for Node {
	fn from(nodes: Vec<Node>) -> Self {
		Self::Fragment(nodes)
	}
}

impl<N: Into<Node>> From<Option<N>> for Node {
	fn from(node: Option<N>) -> Self {
		node.map_or(Self::Empty, Into::into)
	}
}

/// Interaction handlers attached to an element.
#[derive(Clone, Default)]
pub struct Handlers {
	pub on_load: Option<Callback<InteractionEvent>>,
	pub on_click: Option<Callback<InteractionEvent>>,
	pub on_submit: Option<Callback<InteractionEvent>>,
	pub on_select: Option<Callback<InteractionEvent>>,
	pub on_search_options: Option<SearchOptionsCallback>,
}

impl fmt::Debug for Handlers {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Handlers")
			.field("on_load", &self.on_load.is_some())
			.field("on_click", &self.on_click.is_some())
			.field("on_submit", &self.on_submit.is_some())
			.field("on_select", &self.on_select.is_some())
			.field("on_search_options", &self.on_search_options.is_some())
			.finish()
	}
}

/// Properties of an element.
///
/// Scalars are JSON values, component-valued properties are slots holding
/// [`Node`]s. Absent properties read as `None`.
#[derive(Debug, Clone, Default)]
pub struct Props {
	values: IndexMap<String, Value>,
	slots: IndexMap<String, Node>,
	action: Option<String>,
	handlers: Handlers,
}

impl Props {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.set_value(key, value);
		self
	}

	pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<Value>) {
		self.values.insert(key.into(), value.into());
	}

	pub fn value(&self, key: &str) -> Option<&Value> {
		self.values.get(key).filter(|value| !value.is_null())
	}

	pub fn str(&self, key: &str) -> Option<&str> {
		self.value(key).and_then(Value::as_str)
	}

	/// A boolean property, `false` when absent.
	pub fn flag(&self, key: &str) -> bool {
		self.value(key).and_then(Value::as_bool).unwrap_or(false)
	}

	pub fn with_slot(mut self, key: impl Into<String>, node: impl Into<Node>) -> Self {
		self.set_slot(key, node);
		self
	}

	pub fn set_slot(&mut self, key: impl Into<String>, node: impl Into<Node>) {
		self.slots.insert(key.into(), node.into());
	}

	pub fn slot(&self, key: &str) -> Option<&Node> {
		self.slots.get(key).filter(|node| !node.is_empty())
	}

	pub fn with_action(mut self, action: impl Into<String>) -> Self {
		self.action = Some(action.into());
		self
	}

	pub fn set_action(&mut self, action: impl Into<String>) {
		self.action = Some(action.into());
	}

	/// The interactive action identifier.
	pub fn action(&self) -> Option<&str> {
		self.action.as_deref()
	}

	pub fn handlers(&self) -> &Handlers {
		&self.handlers
	}

	pub fn handlers_mut(&mut self) -> &mut Handlers {
		&mut self.handlers
	}

	pub fn on_load<F, Fut>(mut self, f: F) -> Self
	where
		F: Fn(InteractionEvent) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
	{
		self.handlers.on_load = Some(Callback::new(f));
		self
	}

	pub fn on_click<F, Fut>(mut self, f: F) -> Self
	where
		F: Fn(InteractionEvent) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
	{
		self.handlers.on_click = Some(Callback::new(f));
		self
	}

	pub fn on_submit<F, Fut>(mut self, f: F) -> Self
	where
		F: Fn(InteractionEvent) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
	{
		self.handlers.on_submit = Some(Callback::new(f));
		self
	}

	pub fn on_select<F, Fut>(mut self, f: F) -> Self
	where
		F: Fn(InteractionEvent) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
	{
		self.handlers.on_select = Some(Callback::new(f));
		self
	}

	pub fn on_search_options<F, Fut>(mut self, f: F) -> Self
	where
		F: Fn(SearchOptionsEvent) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = anyhow::Result<Vec<Node>>> + Send + 'static,
	{
		self.handlers.on_search_options = Some(Callback::new(f));
		self
	}
}

/// A component occurrence: tag, props, children and construction function.
#[derive(Clone)]
pub struct Element {
	tag: Cow<'static, str>,
	props: Props,
	children: Vec<Node>,
	transform: Option<Transform>,
}

impl Element {
	/// Creates an element without a construction function.
	pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
		Self {
			tag: tag.into(),
			props: Props::default(),
			children: Vec::new(),
			transform: None,
		}
	}

	/// Creates an element constructed by `transform`.
	pub fn component<F>(tag: impl Into<Cow<'static, str>>, transform: F) -> Self
	where
		F: Fn(&Props, &mut Construct<'_, '_>) -> ConstructionResult<Instance>
			+ Send
			+ Sync
			+ 'static,
	{
		Self::new(tag).with_transform(Arc::new(transform))
	}

	pub fn with_transform(mut self, transform: Transform) -> Self {
		self.transform = Some(transform);
		self
	}

	pub fn with_props(mut self, props: Props) -> Self {
		self.props = props;
		self
	}

	pub fn with_child(mut self, child: impl Into<Node>) -> Self {
		self.children.push(child.into());
		self
	}

	pub fn with_children<I, N>(mut self, children: I) -> Self
	where
		I: IntoIterator<Item = N>,
		N: Into<Node>,
	{
		self.children.extend(children.into_iter().map(Into::into));
		self
	}

	pub fn tag(&self) -> &str {
		&self.tag
	}

	pub fn props(&self) -> &Props {
		&self.props
	}

	pub fn props_mut(&mut self) -> &mut Props {
		&mut self.props
	}

	pub fn children(&self) -> &[Node] {
		&self.children
	}

	pub fn transform(&self) -> Option<&Transform> {
		self.transform.as_ref()
	}
}

impl fmt::Debug for Element {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Element")
			.field("tag", &self.tag)
			.field("props", &self.props)
			.field("children", &self.children)
			.field("transform", &self.transform.is_some())
			.finish()
	}
}
