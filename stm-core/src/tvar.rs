use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::cell::Cell;
use crate::value::Value;

/// An opaque handle to a memory cell managed by an [`crate::Stm`].
///
/// A `TVar` carries no payload of its own; reads and writes only ever
/// happen through a [`crate::Transaction`]. It is cheap to clone (an `Arc`
/// bump) and usable as a stable key for the transaction's quarantines.
///
/// Using a `TVar` with a [`crate::Transaction`] that belongs to a different
/// [`crate::Stm`] than the one that created it is a programming error:
/// `read`/`write` panic immediately rather than silently producing results
/// that fall outside that other STM's serializability guarantee.
pub struct TVar<T> {
    pub(crate) cell: Arc<Cell>,
    pub(crate) stm_id: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> TVar<T>
where
    T: Value + Clone,
{
    pub(crate) fn new(cell: Arc<Cell>, stm_id: u64) -> TVar<T> {
        TVar {
            cell,
            stm_id,
            _marker: PhantomData,
        }
    }

    /// True iff `a` and `b` refer to the same memory cell.
    pub fn same_cell(a: &TVar<T>, b: &TVar<T>) -> bool {
        Arc::ptr_eq(&a.cell, &b.cell)
    }

    pub(crate) fn assert_belongs_to(&self, stm_id: u64) {
        assert_eq!(
            self.stm_id, stm_id,
            "TVar used with a Transaction from a different Stm than the one that created it"
        );
    }

    /// Read the current value directly, outside of any transaction.
    ///
    /// Bypasses the commit mutex and quarantine machinery entirely: it is a
    /// single atomic read of whatever is in the cell at the moment it runs,
    /// useful for tests and diagnostics, not for code that needs
    /// serializability with concurrent commits.
    pub fn read_atomic(&self) -> T {
        crate::value::downcast::<T>(self.cell.read().as_ref())
    }
}

impl<T> Clone for TVar<T> {
    fn clone(&self) -> Self {
        TVar {
            cell: Arc::clone(&self.cell),
            stm_id: self.stm_id,
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for TVar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TVar").field("cell_id", &self.cell.id).finish()
    }
}
