//! Generational Sparse Pool
//!
//! Provides a fixed-capacity, handle-based object pool used by every resource
//! manager in the renderer (shaders, textures, shader libraries). Slots are
//! recycled through an index-linked free list, and each slot carries a
//! generation counter so a handle issued before the slot was recycled is
//! detected instead of silently aliasing the new occupant.
//!
//! # Architecture
//!
//! ```text
//! ShaderManager / TextureManager / LibraryManager
//!                      ↓
//!              SparsePool<Record>
//!                      ↓
//!        Handle-based Access (index + generation)
//!                      ↓
//!          O(1) Allocation/Deallocation
//! ```
//!
//! # Usage
//!
//! ```rust
//! use hyper_engine::foundation::memory::SparsePool;
//!
//! let mut pool: SparsePool<u32> = SparsePool::with_capacity(8)?;
//!
//! let handle = pool.insert(7)?;
//! assert_eq!(*pool.get(handle)?, 7);
//!
//! let value = pool.deallocate(handle)?;
//! assert_eq!(value, 7);
//! assert!(pool.get(handle).is_err()); // stale: the slot's generation moved on
//! # Ok::<(), hyper_engine::foundation::memory::PoolError>(())
//! ```
//!
//! The pool is single-threaded by design: no locks, no atomics. Callers that
//! need cross-thread access must wrap the whole pool in their own mutex.

use std::fmt;
use std::mem;
use std::ops::{Index, IndexMut};
use thiserror::Error;

/// Number of low bits of a raw handle used for the slot index
const INDEX_BITS: u32 = 16;

/// Mask selecting the index bits of a raw handle
const INDEX_MASK: u32 = (1 << INDEX_BITS) - 1;

/// Maximum number of slots a pool can hold (the handle index space)
pub const MAX_POOL_CAPACITY: usize = 1 << INDEX_BITS;

/// Errors reported by [`SparsePool`] operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    /// Pool constructed with zero slots
    #[error("pool capacity must be at least 1")]
    ZeroCapacity,

    /// Pool constructed with more slots than the handle index space can address
    #[error("pool capacity {capacity} exceeds the 16-bit handle index space")]
    CapacityTooLarge {
        /// The requested capacity
        capacity: usize,
    },

    /// Allocation attempted while every slot is live
    #[error("pool exhausted: all {capacity} slots are in use")]
    Exhausted {
        /// Total slot count of the pool
        capacity: usize,
    },

    /// Slot index past the end of the pool
    #[error("slot index {index} out of range for pool of capacity {capacity}")]
    IndexOutOfRange {
        /// The offending index
        index: usize,
        /// Total slot count of the pool
        capacity: usize,
    },

    /// Handle generation does not match the slot's current generation
    #[error(
        "stale handle for slot {index}: handle generation {handle_generation}, \
         slot generation {slot_generation}"
    )]
    StaleHandle {
        /// Index of the addressed slot
        index: usize,
        /// Generation encoded in the handle
        handle_generation: u16,
        /// Generation the slot currently carries
        slot_generation: u16,
    },

    /// Slot addressed while on the free list (double free, or raw access to a
    /// slot that holds no value)
    #[error("slot {index} is not occupied")]
    SlotNotOccupied {
        /// Index of the addressed slot
        index: usize,
    },
}

/// Handle to one slot of a [`SparsePool`]
///
/// A plain 32-bit value: the low 16 bits are the slot index, the high 16 bits
/// the generation the slot carried when the handle was issued. Handles are
/// copied freely and compared on the raw bit pattern; only the issuing pool
/// can say whether a handle still refers to a live value.
///
/// Generation 0 never occurs on a live slot, so the all-zero bit pattern
/// doubles as the null handle ([`PoolHandle::INVALID`]).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolHandle(u32);

impl PoolHandle {
    /// The null handle; never returned by a pool
    pub const INVALID: Self = Self(0);

    fn new(index: u16, generation: u16) -> Self {
        Self((u32::from(generation) << INDEX_BITS) | u32::from(index))
    }

    /// Slot index this handle addresses
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 & INDEX_MASK) as usize
    }

    /// Generation stamp the handle was issued with
    #[must_use]
    pub const fn generation(self) -> u16 {
        (self.0 >> INDEX_BITS) as u16
    }

    /// Whether this handle could ever have been issued by a pool
    ///
    /// This is a structural check only (non-null generation); it does not
    /// consult any pool. Use [`SparsePool::contains`] for liveness.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.generation() != 0
    }

    /// Raw bit pattern, for storage in external tables
    #[must_use]
    pub const fn to_raw(self) -> u32 {
        self.0
    }

    /// Reconstruct a handle from a raw bit pattern
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

impl Default for PoolHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Debug for PoolHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolHandle")
            .field("index", &self.index())
            .field("generation", &self.generation())
            .finish()
    }
}

/// Occupancy state of a slot
///
/// The free-list link lives in the `Free` variant rather than overlaying the
/// payload bytes, so any `T` is storable and a freed slot cannot be read as a
/// value by mistake.
enum SlotState<T> {
    /// Slot is on the free list; `next_free` is the next free slot, if any
    Free { next_free: Option<u16> },
    /// Slot holds a live value
    Occupied(T),
}

struct Slot<T> {
    /// Bumped every time the slot is freed; never 0 on a constructed slot
    generation: u16,
    state: SlotState<T>,
}

/// Fixed-capacity object pool with generational handles
///
/// Allocation and deallocation are O(1) via the embedded free list; `clear`
/// is O(capacity). The pool never grows: a full pool reports
/// [`PoolError::Exhausted`] and the caller decides what to do about it.
pub struct SparsePool<T> {
    slots: Vec<Slot<T>>,
    /// Head of the free list; `None` exactly when the pool is full
    next_free: Option<u16>,
    count: usize,
}

impl<T> SparsePool<T> {
    /// Create a pool with `capacity` slots, all initially free
    ///
    /// Slot `i` starts linked to slot `i + 1`, so the first `capacity`
    /// allocations hand out indices in ascending order.
    ///
    /// # Errors
    ///
    /// [`PoolError::ZeroCapacity`] for an empty pool,
    /// [`PoolError::CapacityTooLarge`] when `capacity` exceeds
    /// [`MAX_POOL_CAPACITY`].
    pub fn with_capacity(capacity: usize) -> Result<Self, PoolError> {
        if capacity == 0 {
            return Err(PoolError::ZeroCapacity);
        }
        if capacity > MAX_POOL_CAPACITY {
            return Err(PoolError::CapacityTooLarge { capacity });
        }

        let mut slots = Vec::with_capacity(capacity);
        for index in 0..capacity {
            let next_free = if index + 1 < capacity {
                Some((index + 1) as u16)
            } else {
                None
            };
            slots.push(Slot {
                generation: 1,
                state: SlotState::Free { next_free },
            });
        }

        log::debug!("created sparse pool with {capacity} slots");

        Ok(Self {
            slots,
            next_free: Some(0),
            count: 0,
        })
    }

    /// Move `value` into a free slot and return its handle
    ///
    /// # Errors
    ///
    /// [`PoolError::Exhausted`] when every slot is live.
    pub fn insert(&mut self, value: T) -> Result<PoolHandle, PoolError> {
        let Some(index) = self.next_free else {
            return Err(PoolError::Exhausted {
                capacity: self.slots.len(),
            });
        };

        let slot = &mut self.slots[usize::from(index)];
        let next_free = match slot.state {
            SlotState::Free { next_free } => next_free,
            // The free list only ever links free slots.
            SlotState::Occupied(_) => unreachable!("free list head points at an occupied slot"),
        };

        slot.state = SlotState::Occupied(value);
        self.next_free = next_free;
        self.count += 1;

        Ok(PoolHandle::new(index, slot.generation))
    }

    /// Allocate a slot holding `T::default()` and return its handle together
    /// with a mutable reference for in-place initialization
    ///
    /// The reference stays valid until the slot is deallocated or the pool is
    /// cleared.
    ///
    /// # Errors
    ///
    /// [`PoolError::Exhausted`] when every slot is live.
    pub fn allocate(&mut self) -> Result<(PoolHandle, &mut T), PoolError>
    where
        T: Default,
    {
        let handle = self.insert(T::default())?;
        match &mut self.slots[handle.index()].state {
            SlotState::Occupied(value) => Ok((handle, value)),
            SlotState::Free { .. } => unreachable!("freshly inserted slot is occupied"),
        }
    }

    /// Free the slot `handle` refers to and return the evicted value
    ///
    /// The slot's generation is bumped first, so `handle` (and every copy of
    /// it) is stale from this point on. The slot becomes the new free-list
    /// head.
    ///
    /// # Errors
    ///
    /// [`PoolError::IndexOutOfRange`] for an index past the pool,
    /// [`PoolError::SlotNotOccupied`] when the slot is already free (this is
    /// what turns a double free into an error instead of free-list
    /// corruption), [`PoolError::StaleHandle`] on generation mismatch.
    pub fn deallocate(&mut self, handle: PoolHandle) -> Result<T, PoolError> {
        let index = handle.index();
        let capacity = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(PoolError::IndexOutOfRange { index, capacity })?;

        if matches!(slot.state, SlotState::Free { .. }) {
            return Err(PoolError::SlotNotOccupied { index });
        }
        if slot.generation != handle.generation() {
            return Err(PoolError::StaleHandle {
                index,
                handle_generation: handle.generation(),
                slot_generation: slot.generation,
            });
        }

        slot.generation = next_generation(slot.generation);
        let evicted = mem::replace(
            &mut slot.state,
            SlotState::Free {
                next_free: self.next_free,
            },
        );
        self.next_free = Some(index as u16);
        self.count -= 1;

        match evicted {
            SlotState::Occupied(value) => Ok(value),
            SlotState::Free { .. } => unreachable!("occupancy checked above"),
        }
    }

    /// Generation-checked access to the value behind `handle`
    ///
    /// # Errors
    ///
    /// [`PoolError::IndexOutOfRange`], [`PoolError::SlotNotOccupied`], or
    /// [`PoolError::StaleHandle`], as for [`SparsePool::deallocate`].
    pub fn get(&self, handle: PoolHandle) -> Result<&T, PoolError> {
        let index = handle.index();
        let capacity = self.slots.len();
        let slot = self
            .slots
            .get(index)
            .ok_or(PoolError::IndexOutOfRange { index, capacity })?;

        match &slot.state {
            SlotState::Occupied(value) if slot.generation == handle.generation() => Ok(value),
            SlotState::Occupied(_) => Err(PoolError::StaleHandle {
                index,
                handle_generation: handle.generation(),
                slot_generation: slot.generation,
            }),
            SlotState::Free { .. } => Err(PoolError::SlotNotOccupied { index }),
        }
    }

    /// Generation-checked mutable access to the value behind `handle`
    ///
    /// # Errors
    ///
    /// Same as [`SparsePool::get`].
    pub fn get_mut(&mut self, handle: PoolHandle) -> Result<&mut T, PoolError> {
        let index = handle.index();
        let capacity = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(PoolError::IndexOutOfRange { index, capacity })?;

        if slot.generation != handle.generation() {
            if matches!(slot.state, SlotState::Occupied(_)) {
                return Err(PoolError::StaleHandle {
                    index,
                    handle_generation: handle.generation(),
                    slot_generation: slot.generation,
                });
            }
            return Err(PoolError::SlotNotOccupied { index });
        }
        match &mut slot.state {
            SlotState::Occupied(value) => Ok(value),
            SlotState::Free { .. } => Err(PoolError::SlotNotOccupied { index }),
        }
    }

    /// Bounds-checked access by raw slot index, bypassing the generation check
    ///
    /// For callers that track handle validity themselves and only need the
    /// slot lookup.
    ///
    /// # Errors
    ///
    /// [`PoolError::IndexOutOfRange`] past the pool,
    /// [`PoolError::SlotNotOccupied`] for a free slot.
    pub fn at(&self, index: usize) -> Result<&T, PoolError> {
        let capacity = self.slots.len();
        let slot = self
            .slots
            .get(index)
            .ok_or(PoolError::IndexOutOfRange { index, capacity })?;
        match &slot.state {
            SlotState::Occupied(value) => Ok(value),
            SlotState::Free { .. } => Err(PoolError::SlotNotOccupied { index }),
        }
    }

    /// Bounds-checked mutable access by raw slot index, bypassing the
    /// generation check
    ///
    /// # Errors
    ///
    /// Same as [`SparsePool::at`].
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, PoolError> {
        let capacity = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(PoolError::IndexOutOfRange { index, capacity })?;
        match &mut slot.state {
            SlotState::Occupied(value) => Ok(value),
            SlotState::Free { .. } => Err(PoolError::SlotNotOccupied { index }),
        }
    }

    /// Drop every live value and relink all slots into the initial free chain
    ///
    /// Every slot that was occupied gets its generation bumped, so handles
    /// issued before the clear stay detectably stale. Generations are never
    /// reset.
    pub fn clear(&mut self) {
        let capacity = self.slots.len();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if matches!(slot.state, SlotState::Occupied(_)) {
                slot.generation = next_generation(slot.generation);
            }
            let next_free = if index + 1 < capacity {
                Some((index + 1) as u16)
            } else {
                None
            };
            slot.state = SlotState::Free { next_free };
        }
        self.next_free = Some(0);
        self.count = 0;
    }

    /// Whether `handle` currently refers to a live value in this pool
    #[must_use]
    pub fn contains(&self, handle: PoolHandle) -> bool {
        self.get(handle).is_ok()
    }

    /// Number of live slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether no slot is live
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether every slot is live
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.count == self.slots.len()
    }

    /// Total slot count, fixed at construction
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Iterate over live slots in index order, yielding each value with a
    /// currently-valid handle for it
    pub fn iter(&self) -> impl Iterator<Item = (PoolHandle, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match &slot.state {
                SlotState::Occupied(value) => {
                    Some((PoolHandle::new(index as u16, slot.generation), value))
                }
                SlotState::Free { .. } => None,
            })
    }
}

impl<T> Index<usize> for SparsePool<T> {
    type Output = T;

    /// Panicking form of [`SparsePool::at`]
    fn index(&self, index: usize) -> &T {
        match self.at(index) {
            Ok(value) => value,
            Err(err) => panic!("sparse pool index: {err}"),
        }
    }
}

impl<T> IndexMut<usize> for SparsePool<T> {
    /// Panicking form of [`SparsePool::at_mut`]
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.at_mut(index) {
            Ok(value) => value,
            Err(err) => panic!("sparse pool index: {err}"),
        }
    }
}

impl<T> fmt::Debug for SparsePool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparsePool")
            .field("len", &self.count)
            .field("capacity", &self.slots.len())
            .finish()
    }
}

/// Advance a slot generation, wrapping but never landing on the reserved 0
const fn next_generation(generation: u16) -> u16 {
    match generation.wrapping_add(1) {
        0 => 1,
        next => next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Stand-in for a 4-byte resource descriptor
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    struct Probe {
        value: u32,
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = SparsePool::<Probe>::with_capacity(0);
        assert_eq!(result.err(), Some(PoolError::ZeroCapacity));
    }

    #[test]
    fn test_capacity_too_large_rejected() {
        let result = SparsePool::<Probe>::with_capacity(MAX_POOL_CAPACITY + 1);
        assert_eq!(
            result.err(),
            Some(PoolError::CapacityTooLarge {
                capacity: MAX_POOL_CAPACITY + 1
            })
        );
    }

    #[test]
    fn test_fill_exhaust_recycle() {
        // The capacity-4 walkthrough: fill, overflow, free one, reuse it.
        let mut pool: SparsePool<Probe> = SparsePool::with_capacity(4).unwrap();
        assert_eq!(pool.len(), 0);
        assert_eq!(pool.capacity(), 4);

        let handles: Vec<PoolHandle> = (0..4)
            .map(|i| {
                let (handle, probe) = pool.allocate().expect("pool has room");
                probe.value = i;
                handle
            })
            .collect();
        assert_eq!(pool.len(), 4);
        assert!(pool.is_full());

        let indices: HashSet<usize> = handles.iter().map(|h| h.index()).collect();
        assert_eq!(indices, HashSet::from([0, 1, 2, 3]));

        assert_eq!(
            pool.allocate().err(),
            Some(PoolError::Exhausted { capacity: 4 })
        );

        let h1 = handles[1];
        pool.deallocate(h1).unwrap();
        assert_eq!(pool.len(), 3);

        let (h1_new, _) = pool.allocate().unwrap();
        assert_eq!(h1_new.index(), h1.index());
        assert_ne!(h1_new.generation(), h1.generation());

        // The stale handle must not alias the new occupant.
        assert!(matches!(pool.get(h1), Err(PoolError::StaleHandle { .. })));
        assert!(pool.get(h1_new).is_ok());
    }

    #[test]
    fn test_no_duplicate_live_indices() {
        let mut pool: SparsePool<Probe> = SparsePool::with_capacity(16).unwrap();
        let mut live: Vec<PoolHandle> = Vec::new();

        // Interleave allocations and deallocations, checking the live set
        // never holds two handles with the same slot index.
        for round in 0..50u32 {
            if round % 3 == 2 {
                let handle = live.swap_remove((round as usize * 7) % live.len());
                pool.deallocate(handle).unwrap();
            } else if !pool.is_full() {
                live.push(pool.insert(Probe { value: round }).unwrap());
            }

            let indices: HashSet<usize> = live.iter().map(|h| h.index()).collect();
            assert_eq!(indices.len(), live.len());
            assert!(pool.len() <= pool.capacity());
        }
    }

    #[test]
    fn test_allocate_deallocate_round_trip() {
        let mut pool: SparsePool<Probe> = SparsePool::with_capacity(4).unwrap();

        // Churning one slot at a time must never exhaust the pool.
        for _ in 0..100 {
            let (handle, _) = pool.allocate().unwrap();
            pool.deallocate(handle).unwrap();
        }
        assert_eq!(pool.len(), 0);

        // The full capacity is still reachable afterwards.
        let handles: Vec<PoolHandle> = (0..4).map(|_| pool.insert(Probe::default()).unwrap()).collect();
        assert!(pool.is_full());
        for handle in handles {
            pool.deallocate(handle).unwrap();
        }
        assert!(pool.is_empty());
    }

    #[test]
    fn test_generation_strictly_increases_per_free() {
        let mut pool: SparsePool<Probe> = SparsePool::with_capacity(1).unwrap();
        let mut last = 0u16;
        for _ in 0..10 {
            let (handle, _) = pool.allocate().unwrap();
            assert!(handle.generation() > last);
            last = handle.generation();
            pool.deallocate(handle).unwrap();
        }
    }

    #[test]
    fn test_generation_wrap_skips_zero() {
        let mut pool: SparsePool<Probe> = SparsePool::with_capacity(1).unwrap();
        // Enough churn to wrap the 16-bit generation counter.
        for _ in 0..70_000 {
            let (handle, _) = pool.allocate().unwrap();
            assert!(handle.is_valid(), "live handle must never carry generation 0");
            pool.deallocate(handle).unwrap();
        }
        assert!(pool.is_empty());
    }

    #[test]
    fn test_double_free_detected() {
        let mut pool: SparsePool<Probe> = SparsePool::with_capacity(2).unwrap();
        let handle = pool.insert(Probe { value: 9 }).unwrap();
        pool.deallocate(handle).unwrap();

        assert_eq!(
            pool.deallocate(handle).err(),
            Some(PoolError::SlotNotOccupied {
                index: handle.index()
            })
        );

        // The failed double free must not have corrupted the free list.
        let a = pool.insert(Probe { value: 1 }).unwrap();
        let b = pool.insert(Probe { value: 2 }).unwrap();
        assert_ne!(a.index(), b.index());
        assert!(pool.is_full());
    }

    #[test]
    fn test_deallocate_out_of_range() {
        let mut pool: SparsePool<Probe> = SparsePool::with_capacity(2).unwrap();
        let bogus = PoolHandle::from_raw((1 << 16) | 100);
        assert_eq!(
            pool.deallocate(bogus).err(),
            Some(PoolError::IndexOutOfRange {
                index: 100,
                capacity: 2
            })
        );
    }

    #[test]
    fn test_deallocate_returns_value() {
        let mut pool: SparsePool<Probe> = SparsePool::with_capacity(2).unwrap();
        let handle = pool.insert(Probe { value: 77 }).unwrap();
        assert_eq!(pool.deallocate(handle).unwrap(), Probe { value: 77 });
    }

    #[test]
    fn test_clear_resets_and_refills() {
        let mut pool: SparsePool<Probe> = SparsePool::with_capacity(4).unwrap();
        let handles: Vec<PoolHandle> = (0..3).map(|_| pool.insert(Probe::default()).unwrap()).collect();

        pool.clear();
        assert_eq!(pool.len(), 0);
        for handle in &handles {
            assert!(!pool.contains(*handle));
        }

        // A cleared pool fills back up to capacity without error.
        for _ in 0..4 {
            pool.allocate().unwrap();
        }
        assert!(pool.is_full());
    }

    #[test]
    fn test_handles_stay_stale_across_clear_and_reuse() {
        let mut pool: SparsePool<Probe> = SparsePool::with_capacity(2).unwrap();
        let old = pool.insert(Probe { value: 1 }).unwrap();

        pool.clear();
        let new = pool.insert(Probe { value: 2 }).unwrap();
        assert_eq!(new.index(), old.index());

        // Same slot, different generation: the pre-clear handle must not
        // resolve to the post-clear occupant.
        assert_ne!(new.generation(), old.generation());
        assert!(pool.get(old).is_err());
        assert_eq!(pool.get(new).unwrap().value, 2);
    }

    #[test]
    fn test_raw_index_access() {
        let mut pool: SparsePool<Probe> = SparsePool::with_capacity(2).unwrap();
        let handle = pool.insert(Probe { value: 5 }).unwrap();

        assert_eq!(pool.at(handle.index()).unwrap().value, 5);
        pool.at_mut(handle.index()).unwrap().value = 6;
        assert_eq!(pool[handle.index()].value, 6);

        assert_eq!(
            pool.at(99).err(),
            Some(PoolError::IndexOutOfRange {
                index: 99,
                capacity: 2
            })
        );
        assert_eq!(pool.at(1).err(), Some(PoolError::SlotNotOccupied { index: 1 }));
    }

    #[test]
    #[should_panic(expected = "sparse pool index")]
    fn test_index_op_panics_on_free_slot() {
        let pool: SparsePool<Probe> = SparsePool::with_capacity(2).unwrap();
        let _ = pool[0];
    }

    #[test]
    fn test_get_mut_respects_generation() {
        let mut pool: SparsePool<Probe> = SparsePool::with_capacity(2).unwrap();
        let handle = pool.insert(Probe { value: 1 }).unwrap();
        pool.get_mut(handle).unwrap().value = 10;
        assert_eq!(pool.get(handle).unwrap().value, 10);

        pool.deallocate(handle).unwrap();
        let reused = pool.insert(Probe { value: 2 }).unwrap();
        assert_eq!(reused.index(), handle.index());
        assert!(matches!(
            pool.get_mut(handle),
            Err(PoolError::StaleHandle { .. })
        ));
    }

    #[test]
    fn test_iter_yields_live_slots_in_index_order() {
        let mut pool: SparsePool<Probe> = SparsePool::with_capacity(4).unwrap();
        let handles: Vec<PoolHandle> = (0..4)
            .map(|i| pool.insert(Probe { value: i }).unwrap())
            .collect();
        pool.deallocate(handles[2]).unwrap();

        let seen: Vec<(usize, u32)> = pool.iter().map(|(h, p)| (h.index(), p.value)).collect();
        assert_eq!(seen, vec![(0, 0), (1, 1), (3, 3)]);

        // Handles from iter() are the currently-valid ones.
        for (handle, _) in pool.iter() {
            assert!(pool.contains(handle));
        }
    }

    #[test]
    fn test_handle_raw_round_trip() {
        let mut pool: SparsePool<Probe> = SparsePool::with_capacity(2).unwrap();
        let handle = pool.insert(Probe { value: 3 }).unwrap();

        let restored = PoolHandle::from_raw(handle.to_raw());
        assert_eq!(restored, handle);
        assert_eq!(pool.get(restored).unwrap().value, 3);

        assert!(!PoolHandle::INVALID.is_valid());
        assert!(!pool.contains(PoolHandle::INVALID));
        assert_eq!(PoolHandle::default(), PoolHandle::INVALID);
    }

    #[test]
    fn test_zero_sized_payloads_are_storable() {
        // The tagged slot removes the old minimum-payload-size constraint.
        let mut pool: SparsePool<()> = SparsePool::with_capacity(3).unwrap();
        let a = pool.insert(()).unwrap();
        let b = pool.insert(()).unwrap();
        assert_ne!(a, b);
        pool.deallocate(a).unwrap();
        assert_eq!(pool.len(), 1);
    }
}
