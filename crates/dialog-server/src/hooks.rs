//! Hooks bound to a surface render: per-surface state and modal launching.

pub mod modal;
pub mod state;

pub use modal::{ModalContext, ModalHandlers, ModalHook, ModalLauncher, SubmitCallback};
pub use state::{StateHook, StateSetter};
