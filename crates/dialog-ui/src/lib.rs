//! # dialog-ui
//!
//! Block Kit components for dialog trees.
//!
//! Every component is a builder that converts into a [`Node`]. Its construction
//! function produces the matching Block Kit value; children are attached by the
//! merge engine in `dialog-core`.
//!
//! ```ignore
//! use dialog_ui::prelude::*;
//!
//! let view: Node = Home::new()
//!     .child(Section::new().text("Pick a task"))
//!     .child(Actions::new().child(
//!         Button::new("refresh").text("Refresh").on_click(|_| async { Ok(()) }),
//!     ))
//!     .into();
//! ```

pub mod components;

pub use components::*;
pub use dialog_core::Node;

/// Everything needed to write a surface.
pub mod prelude {
	pub use crate::components::*;
	pub use dialog_core::{InteractionEvent, Node, SearchOptionsEvent, Selection, User};
}
