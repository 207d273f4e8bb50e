//! Texture Resource Management
//!
//! Tracks decoded-texture metadata on the CPU side: dimensions, usage, and
//! sampling parameters. Pixel upload and image decoding belong to the
//! backend and asset layers respectively.

use super::{map_pool_error, ResourceError};
use crate::foundation::memory::{PoolError, PoolHandle, SparsePool};

const DOMAIN: &str = "texture";

/// Handle for a registered texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureHandle(PoolHandle);

impl TextureHandle {
    /// The null texture handle
    pub const INVALID: Self = Self(PoolHandle::INVALID);

    /// Whether this handle could have been issued by a manager
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0.is_valid()
    }

    /// The underlying pool handle
    #[must_use]
    pub const fn pool_handle(self) -> PoolHandle {
        self.0
    }
}

/// Types of textures supported by the material system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureType {
    /// Base color/albedo texture
    BaseColor,
    /// Normal map texture
    Normal,
    /// Metallic-roughness texture (metallic in B channel, roughness in G channel)
    MetallicRoughness,
    /// Ambient occlusion texture
    AmbientOcclusion,
    /// Emission texture
    Emission,
}

/// Texture filtering modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Nearest neighbor filtering
    Nearest,
    /// Linear filtering
    Linear,
}

/// Texture wrapping modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    /// Repeat the texture
    Repeat,
    /// Mirror the texture
    MirroredRepeat,
    /// Clamp to edge
    ClampToEdge,
}

/// Texture sampling parameters
#[derive(Debug, Clone)]
pub struct TextureParams {
    /// Texture filtering mode
    pub filter_mode: FilterMode,
    /// Texture wrapping mode
    pub wrap_mode: WrapMode,
    /// Generate mipmaps
    pub generate_mipmaps: bool,
}

impl Default for TextureParams {
    fn default() -> Self {
        Self {
            filter_mode: FilterMode::Linear,
            wrap_mode: WrapMode::Repeat,
            generate_mipmaps: true,
        }
    }
}

/// Parameters for registering a texture
#[derive(Debug, Clone)]
pub struct TextureDescriptor {
    /// Name for lookup and logging
    pub name: String,
    /// Texture type/usage
    pub texture_type: TextureType,
    /// Width in texels
    pub width: u32,
    /// Height in texels
    pub height: u32,
    /// Sampling parameters
    pub params: TextureParams,
}

/// Stored metadata for a registered texture
#[derive(Debug, Clone)]
pub struct TextureRecord {
    /// Name for lookup and logging
    pub name: String,
    /// Texture type/usage
    pub texture_type: TextureType,
    /// Width in texels
    pub width: u32,
    /// Height in texels
    pub height: u32,
    /// Sampling parameters
    pub params: TextureParams,
}

/// Registry of texture records backed by one sparse pool
pub struct TextureManager {
    textures: SparsePool<TextureRecord>,
}

impl TextureManager {
    /// Create a manager with a fixed number of texture slots
    ///
    /// # Errors
    ///
    /// Propagates [`PoolError`] for an unusable capacity.
    pub fn new(capacity: usize) -> Result<Self, PoolError> {
        let textures = SparsePool::with_capacity(capacity)?;
        log::info!("created TextureManager with {capacity} texture slots");
        Ok(Self { textures })
    }

    /// Register a texture and return its handle
    ///
    /// # Errors
    ///
    /// [`ResourceError::PoolExhausted`] when no slot is free.
    pub fn create_texture(
        &mut self,
        desc: TextureDescriptor,
    ) -> Result<TextureHandle, ResourceError> {
        let record = TextureRecord {
            name: desc.name,
            texture_type: desc.texture_type,
            width: desc.width,
            height: desc.height,
            params: desc.params,
        };
        let capacity = self.textures.capacity();
        let handle = self
            .textures
            .insert(record)
            .map_err(|err| map_pool_error(DOMAIN, capacity, err))?;

        let record = &self.textures[handle.index()];
        log::debug!(
            "registered texture {:?} ({}x{}, {:?}) -> {handle:?}",
            record.name,
            record.width,
            record.height,
            record.texture_type,
        );
        Ok(TextureHandle(handle))
    }

    /// Remove a texture and return its record
    ///
    /// # Errors
    ///
    /// [`ResourceError::InvalidHandle`] for a stale, freed, or out-of-range
    /// handle.
    pub fn destroy_texture(
        &mut self,
        handle: TextureHandle,
    ) -> Result<TextureRecord, ResourceError> {
        let capacity = self.textures.capacity();
        match self.textures.deallocate(handle.0) {
            Ok(record) => {
                log::debug!("destroyed texture {:?}", record.name);
                Ok(record)
            }
            Err(err) => {
                log::warn!("texture destroy rejected: {err}");
                Err(map_pool_error(DOMAIN, capacity, err))
            }
        }
    }

    /// Look up a texture record
    ///
    /// # Errors
    ///
    /// [`ResourceError::InvalidHandle`] when the handle no longer resolves.
    pub fn get_texture(&self, handle: TextureHandle) -> Result<&TextureRecord, ResourceError> {
        self.textures
            .get(handle.0)
            .map_err(|err| map_pool_error(DOMAIN, self.textures.capacity(), err))
    }

    /// Look up a texture record for mutation
    ///
    /// # Errors
    ///
    /// [`ResourceError::InvalidHandle`] when the handle no longer resolves.
    pub fn get_texture_mut(
        &mut self,
        handle: TextureHandle,
    ) -> Result<&mut TextureRecord, ResourceError> {
        let capacity = self.textures.capacity();
        self.textures
            .get_mut(handle.0)
            .map_err(|err| map_pool_error(DOMAIN, capacity, err))
    }

    /// Number of registered textures
    #[must_use]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Total texture slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.textures.capacity()
    }

    /// Iterate over live textures
    pub fn iter(&self) -> impl Iterator<Item = (TextureHandle, &TextureRecord)> {
        self.textures
            .iter()
            .map(|(handle, record)| (TextureHandle(handle), record))
    }

    /// Drop every texture record; all outstanding handles go stale
    pub fn clear(&mut self) {
        let dropped = self.textures.len();
        self.textures.clear();
        log::debug!("cleared {dropped} texture records");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn albedo_desc(name: &str) -> TextureDescriptor {
        TextureDescriptor {
            name: name.to_string(),
            texture_type: TextureType::BaseColor,
            width: 512,
            height: 512,
            params: TextureParams::default(),
        }
    }

    #[test]
    fn test_create_and_lookup() {
        let mut manager = TextureManager::new(4).unwrap();
        let handle = manager.create_texture(albedo_desc("hull_albedo")).unwrap();

        let record = manager.get_texture(handle).unwrap();
        assert_eq!(record.name, "hull_albedo");
        assert_eq!((record.width, record.height), (512, 512));
        assert_eq!(record.params.filter_mode, FilterMode::Linear);
        assert!(record.params.generate_mipmaps);
    }

    #[test]
    fn test_params_survive_round_trip() {
        let mut manager = TextureManager::new(2).unwrap();
        let handle = manager
            .create_texture(TextureDescriptor {
                name: "ui_atlas".to_string(),
                texture_type: TextureType::BaseColor,
                width: 1024,
                height: 256,
                params: TextureParams {
                    filter_mode: FilterMode::Nearest,
                    wrap_mode: WrapMode::ClampToEdge,
                    generate_mipmaps: false,
                },
            })
            .unwrap();

        let record = manager.get_texture(handle).unwrap();
        assert_eq!(record.params.filter_mode, FilterMode::Nearest);
        assert_eq!(record.params.wrap_mode, WrapMode::ClampToEdge);
        assert!(!record.params.generate_mipmaps);
    }

    #[test]
    fn test_mutation_through_handle() {
        let mut manager = TextureManager::new(2).unwrap();
        let handle = manager.create_texture(albedo_desc("resizable")).unwrap();

        let record = manager.get_texture_mut(handle).unwrap();
        record.width = 2048;
        record.height = 2048;

        assert_eq!(manager.get_texture(handle).unwrap().width, 2048);
    }

    #[test]
    fn test_destroy_then_stale() {
        let mut manager = TextureManager::new(2).unwrap();
        let handle = manager.create_texture(albedo_desc("ghost")).unwrap();
        manager.destroy_texture(handle).unwrap();

        let reused = manager.create_texture(albedo_desc("new_tenant")).unwrap();
        assert_eq!(reused.pool_handle().index(), handle.pool_handle().index());
        assert!(manager.get_texture(handle).is_err());
    }

    #[test]
    fn test_exhaustion_reported() {
        let mut manager = TextureManager::new(1).unwrap();
        manager.create_texture(albedo_desc("only")).unwrap();
        assert!(matches!(
            manager.create_texture(albedo_desc("overflow")),
            Err(ResourceError::PoolExhausted {
                domain: "texture",
                capacity: 1
            })
        ));
    }
}
