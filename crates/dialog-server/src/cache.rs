//! View cache.
//!
//! Maps surface keys (view ids, or `channel:ts` for messages) to the [`Item`]
//! needed to re-render that surface on a later interaction.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of platform surface an item renders to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
	Home,
	Modal,
	Message,
}

impl fmt::Display for SurfaceKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Home => "home",
			Self::Modal => "modal",
			Self::Message => "message",
		})
	}
}

/// State slots of one surface, keyed by `use_state` key.
pub type StateBag = HashMap<String, Value>;

/// A state bag shared between a cached item and the hooks rendering it.
///
/// Clones share the same bag, so hook writes land in the cached item.
#[derive(Clone, Default)]
pub struct SharedState(Arc<Mutex<StateBag>>);

impl SharedState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, key: &str) -> Option<Value> {
		self.0.lock().get(key).cloned()
	}

	pub fn insert(&self, key: impl Into<String>, value: Value) {
		self.0.lock().insert(key.into(), value);
	}

	pub fn contains(&self, key: &str) -> bool {
		self.0.lock().contains_key(key)
	}

	/// Runs `f` with exclusive access to the bag.
	pub fn with_bag<R>(&self, f: impl FnOnce(&mut StateBag) -> R) -> R {
		f(&mut self.0.lock())
	}

	/// A copy of the current slots.
	pub fn snapshot(&self) -> StateBag {
		self.0.lock().clone()
	}

	/// Whether both handles share one bag.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl PartialEq for SharedState {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other) || self.snapshot() == other.snapshot()
	}
}

impl fmt::Debug for SharedState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("SharedState").field(&self.snapshot()).finish()
	}
}

/// Everything needed to replay a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
	/// Platform identifier: the view id, or the channel for messages.
	pub id: String,
	/// Name of the registered surface that renders this item.
	pub name: String,
	pub state: SharedState,
	/// Props the surface was first rendered with.
	pub props: Value,
	/// Last document sent to the platform.
	pub view: Value,
	pub kind: SurfaceKind,
	/// Message timestamp.
	pub ts: Option<String>,
	/// Key the modal was opened under by `use_modal`.
	pub modal_key: Option<String>,
	/// Surface key of the item that opened this modal.
	pub invoker_key: Option<String>,
}

impl Item {
	pub fn new(kind: SurfaceKind, id: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			state: SharedState::default(),
			props: Value::Null,
			view: Value::Null,
			kind,
			ts: None,
			modal_key: None,
			invoker_key: None,
		}
	}

	pub fn with_state(mut self, state: SharedState) -> Self {
		self.state = state;
		self
	}

	pub fn with_props(mut self, props: Value) -> Self {
		self.props = props;
		self
	}

	pub fn with_view(mut self, view: Value) -> Self {
		self.view = view;
		self
	}

	pub fn with_ts(mut self, ts: impl Into<String>) -> Self {
		self.ts = Some(ts.into());
		self
	}

	/// Links a modal item to the `use_modal` key and the surface that opened it.
	pub fn with_modal(
		mut self,
		modal_key: impl Into<String>,
		invoker_key: impl Into<String>,
	) -> Self {
		self.modal_key = Some(modal_key.into());
		self.invoker_key = Some(invoker_key.into());
		self
	}
}

/// Storage for cached items.
pub trait ViewStore: Send + Sync {
	/// Looks up an item. Empty and unknown keys return `None`.
	fn get(&self, key: &str) -> Option<Item>;

	/// Stores an item, replacing any previous one, and returns it.
	fn set(&self, key: &str, item: Item) -> Item;

	/// Removes every item.
	fn clear(&self);

	/// Describes every entry as `"key: name (kind)"`.
	fn list(&self) -> Vec<String>;
}

/// Hit and miss counters of an [`InMemoryViewCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStatistics {
	pub hits: u64,
	pub misses: u64,
	pub entries: usize,
}

/// Process-local [`ViewStore`] with no expiry and no size bound.
#[derive(Default)]
pub struct InMemoryViewCache {
	store: RwLock<HashMap<String, Item>>,
	hits: AtomicU64,
	misses: AtomicU64,
}

impl InMemoryViewCache {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn statistics(&self) -> CacheStatistics {
		CacheStatistics {
			hits: self.hits.load(Ordering::Relaxed),
			misses: self.misses.load(Ordering::Relaxed),
			entries: self.store.read().len(),
		}
	}
}

impl ViewStore for InMemoryViewCache {
	fn get(&self, key: &str) -> Option<Item> {
		if key.is_empty() {
			return None;
		}
		let item = self.store.read().get(key).cloned();
		match &item {
			Some(found) => {
				self.hits.fetch_add(1, Ordering::Relaxed);
				tracing::debug!(
					target: "dialog::cache",
					key,
					name = %found.name,
					kind = %found.kind,
					"cache hit"
				);
			}
			None => {
				self.misses.fetch_add(1, Ordering::Relaxed);
				tracing::debug!(target: "dialog::cache", key, "cache miss");
			}
		}
		item
	}

	fn set(&self, key: &str, item: Item) -> Item {
		tracing::debug!(
			target: "dialog::cache",
			key,
			name = %item.name,
			kind = %item.kind,
			"cache set"
		);
		self.store.write().insert(key.to_string(), item.clone());
		item
	}

	fn clear(&self) {
		self.store.write().clear();
	}

	fn list(&self) -> Vec<String> {
		let mut entries: Vec<String> = self
			.store
			.read()
			.iter()
			.map(|(key, item)| format!("{key}: {} ({})", item.name, item.kind))
			.collect();
		entries.sort();
		entries
	}
}
