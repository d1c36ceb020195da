//! # dialog
//!
//! Declarative Block Kit surfaces for Slack apps.
//!
//! Surfaces are written as component trees. The reconciler turns a tree into a
//! Block Kit document, running only the handlers an interaction targets, and
//! the dispatcher replays surfaces against their cached state whenever the
//! platform reports an interaction.
//!
//! ## Feature Flags
//!
//! - `minimal` - Core reconciler and the component library
//! - `ui` - Component library (`dialog-ui`)
//! - `server` (default) - View cache, dispatcher, Web API client and HTTP server
//!
//! ## Quick Example
//!
//! ```ignore
//! use dialog::prelude::*;
//!
//! let hello = surface("Hello", |cx| {
//!     let (count, set_count) = cx.use_state("count", 0_u32);
//!     Home::new()
//!         .child(Section::new().text(format!("Waved {count} times")))
//!         .child(Actions::new().child(Button::new("wave").text("Wave").on_click(move |_| {
//!             let set_count = set_count.clone();
//!             async move {
//!                 set_count.set(count + 1);
//!                 Ok(())
//!             }
//!         })))
//!         .into()
//! });
//! ```

/// Merge engine, reconciler and render.
pub mod core {
	pub use dialog_core::*;
}

/// Built-in Block Kit components.
#[cfg(feature = "ui")]
pub mod ui {
	pub use dialog_ui::*;
}

/// View cache, hooks, dispatcher and HTTP server.
#[cfg(feature = "server")]
pub mod server {
	pub use dialog_server::*;
}

pub use dialog_core::{
	Action, ActionKind, ConstructionError, DialogError, InteractionEvent, Node, RenderError,
	Selection, SubmitEvent, User, reconcile, render,
};

#[cfg(feature = "server")]
pub use dialog_server::{
	DialogServer, DispatchError, Dispatcher, HomeOptions, MessageOptions, ModalHandlers, Settings,
	SharedSurface, ViewContext, surface,
};

/// Everything needed to write and serve surfaces.
pub mod prelude {
	pub use dialog_core::{InteractionEvent, Node, SearchOptionsEvent, Selection, SubmitEvent, User};

	#[cfg(feature = "ui")]
	pub use dialog_ui::components::*;

	#[cfg(feature = "server")]
	pub use dialog_server::{HomeOptions, ModalHandlers, ViewContext, surface};
}
