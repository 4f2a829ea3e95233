use std::cmp;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::value::Value;

/// A single versioned storage slot holding one [`Value`].
///
/// Created when the owning [`crate::Stm`] allocates it via `new_tvar`, and
/// lives as long as the STM. Mutated only by transactional commits; never
/// destroyed or moved. `id` is assigned once, at allocation, and is stable
/// for the cell's whole lifetime.
pub struct Cell {
    pub(crate) id: u64,
    payload: RwLock<Box<dyn Value>>,
}

impl Cell {
    pub(crate) fn new(id: u64, initial: Box<dyn Value>) -> Arc<Cell> {
        Arc::new(Cell {
            id,
            payload: RwLock::new(initial),
        })
    }

    /// Read a deep copy of the current payload under the read lock.
    ///
    /// Returning a copy (rather than a reference) is what lets a caller
    /// mutate the result freely without corrupting cell-owned memory.
    pub(crate) fn read(&self) -> Box<dyn Value> {
        self.payload.read().copy_value()
    }

    /// Replace the payload under the write lock, taking ownership of
    /// `new_value`.
    pub(crate) fn write(&self, new_value: Box<dyn Value>) {
        *self.payload.write() = new_value;
    }

    fn address(&self) -> usize {
        std::ptr::from_ref::<Cell>(self) as usize
    }
}

/// Wraps an `Arc<Cell>` so it can be used as a map key by pointer identity,
/// independent of whatever `PartialEq`/`Ord` the cell's payload type has.
#[derive(Clone)]
pub(crate) struct CellKey(pub(crate) Arc<Cell>);

impl std::fmt::Debug for CellKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CellKey").field(&self.0.id).finish()
    }
}

impl PartialEq for CellKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.address() == other.0.address()
    }
}

impl Eq for CellKey {}

impl std::hash::Hash for CellKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.address().hash(state);
    }
}

impl Ord for CellKey {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.0.address().cmp(&other.0.address())
    }
}

impl PartialOrd for CellKey {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}
