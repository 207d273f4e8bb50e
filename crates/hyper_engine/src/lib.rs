//! # HyperEngine
//!
//! Resource-registry core for the HyperEngine renderer.
//!
//! ## Features
//!
//! - **Generational Sparse Pool**: Fixed-capacity object pool with O(1)
//!   allocation, free-list recycling, and stale-handle detection
//! - **Resource Managers**: Shader, texture, and shader-library registries
//!   built on top of the pool
//! - **Explicit Errors**: Every failure path surfaces as a `Result`, never
//!   an assertion or a panic on caller input
//! - **Config Driven**: Pool capacities load from TOML or RON files
//!
//! ## Quick Start
//!
//! ```rust
//! use hyper_engine::foundation::memory::SparsePool;
//!
//! let mut pool: SparsePool<u64> = SparsePool::with_capacity(16)?;
//!
//! let handle = pool.insert(42)?;
//! assert_eq!(*pool.get(handle)?, 42);
//!
//! // Freeing the slot bumps its generation, so the old handle goes stale.
//! pool.deallocate(handle)?;
//! assert!(pool.get(handle).is_err());
//! # Ok::<(), hyper_engine::foundation::memory::PoolError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod foundation;
pub mod render;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{Config, ConfigError, ResourceRegistryConfig},
        foundation::memory::{PoolError, PoolHandle, SparsePool},
        render::resources::{
            LibraryHandle, LibraryManager, ResourceError, ResourceRegistry, ShaderHandle,
            ShaderManager, TextureHandle, TextureManager,
        },
    };
}
