use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::cell::Cell;
use crate::config::StmConfig;
use crate::error::StmError;
use crate::transaction::{Action, Transaction};
use crate::tvar::TVar;
use crate::value::Value;

static NEXT_STM_ID: AtomicU64 = AtomicU64::new(1);

/// Shared, `Arc`-owned state behind every handle a given [`Stm`] hands out.
///
/// Split out from `Stm` itself so that [`TVar`] and [`Transaction`] can each
/// hold an `Arc<StmInner>` without holding an `Stm`, the same way the
/// literal source material's transactions hold a pointer back to their
/// owning STM.
pub(crate) struct StmInner {
    pub(crate) id: u64,
    pub(crate) commit_mutex: Mutex<()>,
    pub(crate) config: StmConfig,
    next_cell_id: AtomicU64,
    cells: Mutex<Vec<Arc<Cell>>>,
}

/// A single software-transactional-memory instance: an isolated universe of
/// memory cells, each reachable only through a [`TVar`] this `Stm` issued,
/// all serialized through one commit mutex.
///
/// Cloning an `Stm` is cheap and yields a handle to the same underlying
/// cells and commit mutex — there is exactly one serialization point per
/// `Stm::create()` call, not per clone.
#[derive(Clone)]
pub struct Stm {
    inner: Arc<StmInner>,
}

impl Stm {
    /// Create a new, empty `Stm` with default retry behavior: unbounded
    /// retries, no backoff.
    pub fn create() -> Stm {
        Stm::with_config(StmConfig::default())
    }

    /// Create a new, empty `Stm` with an explicit retry configuration.
    pub fn with_config(config: StmConfig) -> Stm {
        let id = NEXT_STM_ID.fetch_add(1, Ordering::Relaxed);
        debug!(stm_id = id, "created Stm");
        Stm {
            inner: Arc::new(StmInner {
                id,
                commit_mutex: Mutex::new(()),
                config,
                next_cell_id: AtomicU64::new(0),
                cells: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Allocate a new memory cell holding `initial`, and return a handle to
    /// it. The returned [`TVar`] is only valid for use with transactions
    /// driven by this same `Stm`.
    pub fn new_tvar<T>(&self, initial: T) -> TVar<T>
    where
        T: Value + Clone,
    {
        let id = self.inner.next_cell_id.fetch_add(1, Ordering::Relaxed);
        let cell = Cell::new(id, Box::new(initial));
        self.inner.cells.lock().push(Arc::clone(&cell));
        TVar::new(cell, self.inner.id)
    }

    /// Construct a transaction around `action`, without running it.
    ///
    /// Prefer [`Stm::perform`] unless the caller specifically needs to
    /// inspect the transaction (its state, its version counter) before or
    /// instead of running it synchronously.
    pub fn new_transaction<F>(&self, action: F) -> Transaction
    where
        F: Fn(&mut Transaction) -> bool + Send + Sync + 'static,
    {
        Transaction::new(Arc::clone(&self.inner), action)
    }

    /// Run each action to completion, one after another, each in its own
    /// transaction with its own independent retry loop. Returns as soon as
    /// one action's retry budget is exhausted, leaving any later actions in
    /// `actions` unrun.
    ///
    /// Actions are type-erased ([`Action`]) rather than a single generic
    /// closure type, because distinct actions almost always capture
    /// distinct `TVar`s and so have distinct closure types — a single type
    /// parameter would only ever admit a one-element `Vec`.
    pub fn perform<I>(&self, actions: I) -> Result<(), StmError>
    where
        I: IntoIterator<Item = Action>,
    {
        for action in actions {
            self.new_transaction(action).run_sync()?;
        }
        Ok(())
    }

    /// Take a debugging snapshot of every cell this `Stm` has allocated, as
    /// `(cell id, deep-copied payload)` pairs in allocation order. Takes no
    /// locks beyond each cell's own read lock in turn, so it does not
    /// observe a single consistent point in time across cells under
    /// concurrent writers — it is a diagnostic aid, not a transactional read.
    pub fn snapshot(&self) -> Vec<(u64, Box<dyn Value>)> {
        self.inner
            .cells
            .lock()
            .iter()
            .map(|cell| (cell.id, cell.read()))
            .collect()
    }
}
