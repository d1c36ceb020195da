//! State hook.
//!
//! `use_state` reads a slot from the surface's [`SharedState`], falling back to
//! the initial value, and writes the resolved value back so later passes of
//! the same interaction observe it.

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cache::SharedState;

/// Factory for `use_state` bound to one surface's state bag.
#[derive(Debug, Clone, Default)]
pub struct StateHook {
	bag: Option<SharedState>,
}

impl StateHook {
	/// Reads and writes go to `state`.
	pub fn bound(state: SharedState) -> Self {
		Self { bag: Some(state) }
	}

	/// Reads return the initial value and writes are dropped.
	pub fn detached() -> Self {
		Self { bag: None }
	}

	/// Returns the current value of `key` and a setter for it.
	///
	/// A present slot wins over `initial`, whatever its value. The resolved value
	/// is stored back before returning.
	pub fn use_state<T>(&self, key: &str, initial: T) -> (T, StateSetter<T>)
	where
		T: Serialize + DeserializeOwned,
	{
		let setter = StateSetter {
			key: key.to_string(),
			bag: self.bag.clone(),
			_marker: PhantomData,
		};
		let Some(bag) = &self.bag else {
			return (initial, setter);
		};

		let current = bag.with_bag(|slots| {
			let resolved = match slots.get(key) {
				Some(stored) => match serde_json::from_value(stored.clone()) {
					Ok(value) => value,
					Err(err) => {
						tracing::warn!(
							key,
							error = %err,
							"stored state no longer matches its type, using initial value"
						);
						initial
					}
				},
				None => initial,
			};
			store(slots, key, &resolved);
			resolved
		});
		(current, setter)
	}
}

fn store<T: Serialize>(slots: &mut crate::cache::StateBag, key: &str, value: &T) {
	match serde_json::to_value(value) {
		Ok(json) => {
			slots.insert(key.to_string(), json);
		}
		Err(err) => tracing::warn!(key, error = %err, "state value is not serializable"),
	}
}

/// Writes one state slot.
pub struct StateSetter<T> {
	key: String,
	bag: Option<SharedState>,
	_marker: PhantomData<fn(T)>,
}

impl<T: Serialize> StateSetter<T> {
	/// Replaces the slot's value. Visible to every later `use_state` read.
	pub fn set(&self, value: T) {
		let Some(bag) = &self.bag else {
			return;
		};
		match serde_json::to_value(&value) {
			Ok(json) => bag.insert(self.key.clone(), json),
			Err(err) => {
				tracing::warn!(key = %self.key, error = %err, "state value is not serializable")
			}
		}
	}

	pub fn key(&self) -> &str {
		&self.key
	}
}

impl<T> Clone for StateSetter<T> {
	fn clone(&self) -> Self {
		Self {
			key: self.key.clone(),
			bag: self.bag.clone(),
			_marker: PhantomData,
		}
	}
}

impl<T> std::fmt::Debug for StateSetter<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StateSetter")
			.field("key", &self.key)
			.field("bound", &self.bag.is_some())
			.finish()
	}
}
