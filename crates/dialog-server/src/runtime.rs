//! Services shared by the dispatcher and modal launchers.

use std::sync::Arc;

use crate::cache::ViewStore;
use crate::client::PlatformClient;
use crate::surface::SurfaceRegistry;

/// View cache, platform client and surface registry of one app.
pub struct Runtime {
	cache: Arc<dyn ViewStore>,
	client: Arc<dyn PlatformClient>,
	surfaces: SurfaceRegistry,
}

impl Runtime {
	pub fn new(cache: Arc<dyn ViewStore>, client: Arc<dyn PlatformClient>) -> Self {
		Self {
			cache,
			client,
			surfaces: SurfaceRegistry::new(),
		}
	}

	pub fn cache(&self) -> &Arc<dyn ViewStore> {
		&self.cache
	}

	pub fn client(&self) -> Arc<dyn PlatformClient> {
		Arc::clone(&self.client)
	}

	pub fn surfaces(&self) -> &SurfaceRegistry {
		&self.surfaces
	}
}
