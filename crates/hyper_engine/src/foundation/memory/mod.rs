//! Memory management utilities
//!
//! The renderer never hands raw pointers to GPU resource records across
//! subsystem boundaries; it hands out pool handles. This module holds the
//! pool those handles come from.

pub mod sparse_pool;

pub use sparse_pool::{PoolError, PoolHandle, SparsePool, MAX_POOL_CAPACITY};
