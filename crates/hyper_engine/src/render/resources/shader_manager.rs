//! Shader Resource Management
//!
//! Tracks compiled-shader metadata on the CPU side. The graphics backend
//! compiles SPIR-V and owns the API objects; this manager owns the records
//! and the handles everything else uses to refer to them.

use std::path::PathBuf;

use super::{map_pool_error, ResourceError};
use crate::foundation::memory::{PoolError, PoolHandle, SparsePool};

const DOMAIN: &str = "shader";

/// Handle for a registered shader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShaderHandle(PoolHandle);

impl ShaderHandle {
    /// The null shader handle
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

/// Pipeline stage a shader runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment shader
    Fragment,
    /// Compute shader
    Compute,
}

/// Parameters for registering a shader
#[derive(Debug, Clone)]
pub struct ShaderDescriptor {
    /// Name for lookup and logging
    pub name: String,
    /// Stage the shader runs in
    pub stage: ShaderStage,
    /// Path to the SPIR-V binary
    pub source_path: PathBuf,
    /// Entry point symbol; defaults to `main`
    pub entry_point: Option<String>,
}

/// Stored metadata for a registered shader
#[derive(Debug, Clone)]
pub struct ShaderRecord {
    /// Name for lookup and logging
    pub name: String,
    /// Stage the shader runs in
    pub stage: ShaderStage,
    /// Path to the SPIR-V binary
    pub source_path: PathBuf,
    /// Entry point symbol
    pub entry_point: String,
}

/// Registry of shader records backed by one sparse pool
pub struct ShaderManager {
    shaders: SparsePool<ShaderRecord>,
}

impl ShaderManager {
    /// Create a manager with a fixed number of shader slots
    ///
    /// # Errors
    ///
    /// Propagates [`PoolError`] for an unusable capacity.
    pub fn new(capacity: usize) -> Result<Self, PoolError> {
        let shaders = SparsePool::with_capacity(capacity)?;
        log::info!("created ShaderManager with {capacity} shader slots");
        Ok(Self { shaders })
    }

    /// Register a shader and return its handle
    ///
    /// # Errors
    ///
    /// [`ResourceError::PoolExhausted`] when no slot is free.
    pub fn create_shader(&mut self, desc: ShaderDescriptor) -> Result<ShaderHandle, ResourceError> {
        let record = ShaderRecord {
            entry_point: desc.entry_point.unwrap_or_else(|| "main".to_string()),
            name: desc.name,
            stage: desc.stage,
            source_path: desc.source_path,
        };
        let capacity = self.shaders.capacity();
        let handle = self
            .shaders
            .insert(record)
            .map_err(|err| map_pool_error(DOMAIN, capacity, err))?;

        log::debug!("registered shader {:?} -> {handle:?}", self.shaders[handle.index()].name);
        Ok(ShaderHandle(handle))
    }

    /// Remove a shader and return its record
    ///
    /// # Errors
    ///
    /// [`ResourceError::InvalidHandle`] for a stale, freed, or out-of-range
    /// handle.
    pub fn destroy_shader(&mut self, handle: ShaderHandle) -> Result<ShaderRecord, ResourceError> {
        let capacity = self.shaders.capacity();
        match self.shaders.deallocate(handle.0) {
            Ok(record) => {
                log::debug!("destroyed shader {:?}", record.name);
                Ok(record)
            }
            Err(err) => {
                log::warn!("shader destroy rejected: {err}");
                Err(map_pool_error(DOMAIN, capacity, err))
            }
        }
    }

    /// Look up a shader record
    ///
    /// # Errors
    ///
    /// [`ResourceError::InvalidHandle`] when the handle no longer resolves.
    pub fn get_shader(&self, handle: ShaderHandle) -> Result<&ShaderRecord, ResourceError> {
        self.shaders
            .get(handle.0)
            .map_err(|err| map_pool_error(DOMAIN, self.shaders.capacity(), err))
    }

    /// Look up a shader record for mutation
    ///
    /// # Errors
    ///
    /// [`ResourceError::InvalidHandle`] when the handle no longer resolves.
    pub fn get_shader_mut(
        &mut self,
        handle: ShaderHandle,
    ) -> Result<&mut ShaderRecord, ResourceError> {
        let capacity = self.shaders.capacity();
        self.shaders
            .get_mut(handle.0)
            .map_err(|err| map_pool_error(DOMAIN, capacity, err))
    }

    /// Number of registered shaders
    #[must_use]
    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    /// Total shader slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.shaders.capacity()
    }

    /// Iterate over live shaders
    pub fn iter(&self) -> impl Iterator<Item = (ShaderHandle, &ShaderRecord)> {
        self.shaders
            .iter()
            .map(|(handle, record)| (ShaderHandle(handle), record))
    }

    /// Drop every shader record; all outstanding handles go stale
    pub fn clear(&mut self) {
        let dropped = self.shaders.len();
        self.shaders.clear();
        log::debug!("cleared {dropped} shader records");
    }
}
