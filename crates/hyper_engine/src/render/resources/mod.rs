//! Renderer resource registries
//!
//! Each manager owns one [`SparsePool`](crate::foundation::memory::SparsePool)
//! of CPU-side resource records and maps domain create/destroy/lookup
//! operations onto pool operations. GPU uploads and API objects are the
//! backends' business; what lives here is the single source of truth for
//! which resources exist and which handles are still good.

pub mod library_manager;
pub mod shader_manager;
pub mod texture_manager;

pub use library_manager::{LibraryDescriptor, LibraryHandle, LibraryManager, LibraryRecord};
pub use shader_manager::{
    ShaderDescriptor, ShaderHandle, ShaderManager, ShaderRecord, ShaderStage,
};
pub use texture_manager::{
    FilterMode, TextureDescriptor, TextureHandle, TextureManager, TextureParams, TextureRecord,
    TextureType, WrapMode,
};

use crate::core::config::ResourceRegistryConfig;
use crate::foundation::memory::PoolError;
use thiserror::Error;

/// Resource manager errors
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Every slot of the manager's pool is in use
    #[error("{domain} pool exhausted: all {capacity} slots are in use")]
    PoolExhausted {
        /// Which manager's pool filled up
        domain: &'static str,
        /// Slot count of that pool
        capacity: usize,
    },

    /// Handle rejected by the underlying pool (stale, freed, or out of range)
    #[error("invalid {domain} handle")]
    InvalidHandle {
        /// Which manager rejected the handle
        domain: &'static str,
        /// The pool's verdict
        #[source]
        source: PoolError,
    },

    /// A shader library with this name is already loaded
    #[error("shader library {name:?} is already loaded")]
    DuplicateLibrary {
        /// The conflicting library name
        name: String,
    },
}

/// Translate a pool failure into the manager-level error a caller sees
pub(crate) fn map_pool_error(
    domain: &'static str,
    capacity: usize,
    err: PoolError,
) -> ResourceError {
    match err {
        PoolError::Exhausted { .. } => ResourceError::PoolExhausted { domain, capacity },
        other => ResourceError::InvalidHandle {
            domain,
            source: other,
        },
    }
}

/// Facade owning the three resource managers of one renderer instance
///
/// Constructed once at renderer startup from
/// [`ResourceRegistryConfig`]; the managers are then borrowed out by the
/// subsystems that need them. There is deliberately no global instance.
pub struct ResourceRegistry {
    shaders: ShaderManager,
    textures: TextureManager,
    libraries: LibraryManager,
}

impl ResourceRegistry {
    /// Build the registry with the pool capacities from `config`
    ///
    /// # Errors
    ///
    /// Propagates [`PoolError`] when any configured capacity is zero or
    /// exceeds the handle index space.
    pub fn new(config: &ResourceRegistryConfig) -> Result<Self, PoolError> {
        let registry = Self {
            shaders: ShaderManager::new(config.shader_pool_capacity)?,
            textures: TextureManager::new(config.texture_pool_capacity)?,
            libraries: LibraryManager::new(config.library_pool_capacity)?,
        };
        log::info!(
            "resource registry ready: {} shader / {} texture / {} library slots",
            config.shader_pool_capacity,
            config.texture_pool_capacity,
            config.library_pool_capacity,
        );
        Ok(registry)
    }

    /// Shared access to the shader manager
    #[must_use]
    pub fn shaders(&self) -> &ShaderManager {
        &self.shaders
    }

    /// Exclusive access to the shader manager
    pub fn shaders_mut(&mut self) -> &mut ShaderManager {
        &mut self.shaders
    }

    /// Shared access to the texture manager
    #[must_use]
    pub fn textures(&self) -> &TextureManager {
        &self.textures
    }

    /// Exclusive access to the texture manager
    pub fn textures_mut(&mut self) -> &mut TextureManager {
        &mut self.textures
    }

    /// Shared access to the shader-library manager
    #[must_use]
    pub fn libraries(&self) -> &LibraryManager {
        &self.libraries
    }

    /// Exclusive access to the shader-library manager
    pub fn libraries_mut(&mut self) -> &mut LibraryManager {
        &mut self.libraries
    }

    /// Drop every record in every manager (shutdown sweep)
    ///
    /// All outstanding handles become stale.
    pub fn clear(&mut self) {
        self.shaders.clear();
        self.textures.clear();
        self.libraries.clear();
        log::debug!("resource registry cleared");
    }
}
