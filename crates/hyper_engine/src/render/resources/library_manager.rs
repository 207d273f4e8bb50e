//! Shader Library Management
//!
//! A shader library is a named bundle of shaders shipped as one file (the
//! engine's precompiled `.hsl` packs). This manager tracks which libraries
//! are loaded and which shader names each one provides; library names are
//! unique across the pool.

use std::path::PathBuf;

use super::{map_pool_error, ResourceError};
use crate::foundation::memory::{PoolError, PoolHandle, SparsePool};

const DOMAIN: &str = "library";

/// Handle for a loaded shader library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LibraryHandle(PoolHandle);

impl LibraryHandle {
    /// The null library handle
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

/// Parameters for loading a shader library
#[derive(Debug, Clone)]
pub struct LibraryDescriptor {
    /// Unique library name
    pub name: String,
    /// Path to the library file
    pub path: PathBuf,
    /// Names of the shaders the library provides
    pub shader_names: Vec<String>,
}

/// Stored metadata for a loaded shader library
#[derive(Debug, Clone)]
pub struct LibraryRecord {
    /// Unique library name
    pub name: String,
    /// Path to the library file
    pub path: PathBuf,
    /// Names of the shaders the library provides
    pub shader_names: Vec<String>,
}

/// Registry of shader-library records backed by one sparse pool
pub struct LibraryManager {
    libraries: SparsePool<LibraryRecord>,
}

impl LibraryManager {
    /// Create a manager with a fixed number of library slots
    ///
    /// # Errors
    ///
    /// Propagates [`PoolError`] for an unusable capacity.
    pub fn new(capacity: usize) -> Result<Self, PoolError> {
        let libraries = SparsePool::with_capacity(capacity)?;
        log::info!("created LibraryManager with {capacity} library slots");
        Ok(Self { libraries })
    }

    /// Register a library and return its handle
    ///
    /// # Errors
    ///
    /// [`ResourceError::DuplicateLibrary`] when a library of the same name is
    /// already loaded, [`ResourceError::PoolExhausted`] when no slot is free.
    pub fn load_library(&mut self, desc: LibraryDescriptor) -> Result<LibraryHandle, ResourceError> {
        if self.find_by_name(&desc.name).is_some() {
            return Err(ResourceError::DuplicateLibrary { name: desc.name });
        }

        let record = LibraryRecord {
            name: desc.name,
            path: desc.path,
            shader_names: desc.shader_names,
        };
        let capacity = self.libraries.capacity();
        let handle = self
            .libraries
            .insert(record)
            .map_err(|err| map_pool_error(DOMAIN, capacity, err))?;

        let record = &self.libraries[handle.index()];
        log::debug!(
            "loaded shader library {:?} ({} shaders) -> {handle:?}",
            record.name,
            record.shader_names.len(),
        );
        Ok(LibraryHandle(handle))
    }

    /// Remove a library and return its record
    ///
    /// # Errors
    ///
    /// [`ResourceError::InvalidHandle`] for a stale, freed, or out-of-range
    /// handle.
    pub fn unload_library(&mut self, handle: LibraryHandle) -> Result<LibraryRecord, ResourceError> {
        let capacity = self.libraries.capacity();
        match self.libraries.deallocate(handle.0) {
            Ok(record) => {
                log::debug!("unloaded shader library {:?}", record.name);
                Ok(record)
            }
            Err(err) => {
                log::warn!("library unload rejected: {err}");
                Err(map_pool_error(DOMAIN, capacity, err))
            }
        }
    }

    /// Look up a library record
    ///
    /// # Errors
    ///
    /// [`ResourceError::InvalidHandle`] when the handle no longer resolves.
    pub fn get_library(&self, handle: LibraryHandle) -> Result<&LibraryRecord, ResourceError> {
        self.libraries
            .get(handle.0)
            .map_err(|err| map_pool_error(DOMAIN, self.libraries.capacity(), err))
    }

    /// Find a loaded library by name
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<LibraryHandle> {
        self.libraries
            .iter()
            .find(|(_, record)| record.name == name)
            .map(|(handle, _)| LibraryHandle(handle))
    }

    /// Number of loaded libraries
    #[must_use]
    pub fn library_count(&self) -> usize {
        self.libraries.len()
    }

    /// Total library slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.libraries.capacity()
    }

    /// Iterate over loaded libraries
    pub fn iter(&self) -> impl Iterator<Item = (LibraryHandle, &LibraryRecord)> {
        self.libraries
            .iter()
            .map(|(handle, record)| (LibraryHandle(handle), record))
    }

    /// Drop every library record; all outstanding handles go stale
    pub fn clear(&mut self) {
        let dropped = self.libraries.len();
        self.libraries.clear();
        log::debug!("cleared {dropped} library records");
    }
}
