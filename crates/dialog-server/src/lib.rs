//! # dialog-server
//!
//! Runs dialog surfaces against the Slack platform.
//!
//! A [`Dispatcher`] renders registered surfaces, caches what it sent in a
//! [`ViewStore`], and replays a surface whenever the platform reports an
//! interaction with it: state and modal hooks are bound to the cached item,
//! the handlers the replay selects are awaited, and the re-rendered document
//! replaces the old one. [`DialogServer`] exposes the dispatcher over HTTP.
//!
//! ```ignore
//! use dialog_server::{DialogServer, HomeOptions, Settings, surface};
//! use dialog_ui::prelude::*;
//!
//! let home = surface("Hello", |_| Home::new().child(Section::new().text("Hello")).into());
//! let settings = Settings::from_env()?;
//! DialogServer::from_settings(&settings)
//!     .home(home, HomeOptions::default())
//!     .listen(settings.addr()?)
//!     .await?;
//! ```

pub mod cache;
pub mod client;
pub mod dispatcher;
pub mod error;
pub mod form;
pub mod hooks;
pub mod logging;
pub mod middleware;
pub mod payload;
pub mod runtime;
pub mod server;
pub mod settings;
pub mod surface;

pub use cache::{CacheStatistics, InMemoryViewCache, Item, SharedState, SurfaceKind, ViewStore};
pub use client::{MessageRef, PlatformClient, ViewRef, WebApiClient};
pub use dispatcher::{DispatchPhase, Dispatcher, HomeOptions, MessageOptions};
pub use error::{DispatchError, DispatchResult, PlatformError};
pub use form::normalize_form;
pub use hooks::{ModalHandlers, ModalHook, ModalLauncher, StateHook, StateSetter};
pub use middleware::{Handler, LoggingMiddleware, Middleware, MiddlewareChain};
pub use payload::InteractionPayload;
pub use runtime::Runtime;
pub use server::DialogServer;
pub use settings::{Settings, SettingsError};
pub use surface::{SharedSurface, Surface, ViewContext, surface};
