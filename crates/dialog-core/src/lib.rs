//! # dialog-core
//!
//! Turns a declarative component tree into a Block Kit document.
//!
//! A tree is built from [`Node`]s. Every [`Element`] carries a construction
//! function (its [`Transform`]) that produces an [`Instance`], a partial Block Kit
//! value. The [reconciler](reconcile) constructs each element, attaches its
//! children through the [merge engine](merge), and runs the
//! [finalization hook](finalize) which queues interaction handlers as
//! [`PendingEffect`]s. [`render`] awaits those effects and returns the
//! document as JSON.
//!
//! ## Example
//!
//! ```ignore
//! use dialog_core::{render, Action, InteractionEvent, User};
//!
//! let action = Action::interaction("approve", InteractionEvent::new(User::from_id("U1")));
//! let document = render(&tree, Some(&action)).await?;
//! ```

pub mod callback;
pub mod context;
pub mod error;
pub mod event;
pub mod finalize;
pub mod instance;
pub mod merge;
pub mod node;
pub mod reconciler;
pub mod render;

pub use callback::{Callback, PendingEffect, SearchOptionsCallback};
pub use context::RootContext;
pub use error::{ConstructionError, DialogError, RenderError};
pub use event::{
	Action, ActionKind, Form, InteractionEvent, SearchOptionsEvent, Selection, SubmitEvent, User,
	generate_event,
};
pub use finalize::finalize;
pub use instance::{Field, Instance, Marker};
pub use merge::{MergeStrategy, merge, strategy_for};
pub use node::{Element, Handlers, Node, Props, Transform};
pub use reconciler::{Construct, Reconciled, reconcile};
pub use render::render;
