use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::cell::CellKey;
use crate::error::StmError;
use crate::stm::StmInner;
use crate::tvar::TVar;
use crate::value::{self, Value};

cfg_if::cfg_if! {
    if #[cfg(feature = "hash-registers")] {
        pub(crate) type RegisterType = rustc_hash::FxHashMap<CellKey, Box<dyn Value>>;
        fn new_register() -> RegisterType { RegisterType::default() }
    } else {
        pub(crate) type RegisterType = std::collections::BTreeMap<CellKey, Box<dyn Value>>;
        fn new_register() -> RegisterType { RegisterType::new() }
    }
}

/// The state-machine position of a [`Transaction`].
///
/// `Idle -> Running -> Validating -> (Committed | Aborted) -> (terminal | Running ...)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    /// Constructed but not yet run.
    Idle,
    /// The action is executing; quarantines are being filled in.
    Running,
    /// The action returned `true`; the commit mutex is held and the read
    /// quarantine is being checked against current cell contents.
    Validating,
    /// Validation passed and the write quarantine has been installed. Terminal.
    Committed,
    /// The action returned `false`, or validation failed. Not terminal: the
    /// driver loop will clear the quarantines and transition back to `Running`.
    Aborted,
}

/// A transaction action, type-erased so a caller can collect heterogeneous
/// actions (each with its own distinct closure-capture type) into a single
/// `Vec` for [`crate::Stm::perform`].
pub type Action = Box<dyn Fn(&mut Transaction) -> bool + Send + Sync>;

/// Orchestrates one transactional action's read/write quarantine, commit
/// validation, retry, and installation of writes.
///
/// A `Transaction` plays two roles, matching the literal source material
/// this crate's protocol is distilled from: it is the object an action
/// reads and writes through (`read`, `write`), and it is the driver that
/// runs that action to completion (`execute`, or the `run_sync` used
/// internally by [`crate::Stm::perform`]).
pub struct Transaction {
    pub(crate) stm: Arc<StmInner>,
    action: Arc<dyn Fn(&mut Transaction) -> bool + Send + Sync>,
    read_quarantine: RegisterType,
    write_quarantine: RegisterType,
    done: bool,
    version: u64,
    state: TxState,
}

impl Transaction {
    pub(crate) fn new<F>(stm: Arc<StmInner>, action: F) -> Transaction
    where
        F: Fn(&mut Transaction) -> bool + Send + Sync + 'static,
    {
        Transaction {
            stm,
            action: Arc::new(action),
            read_quarantine: new_register(),
            write_quarantine: new_register(),
            done: false,
            version: 0,
            state: TxState::Idle,
        }
    }

    /// Read the current value of `tvar` as seen by this transaction.
    ///
    /// If `tvar` has already been written within this transaction, the
    /// quarantined write is returned (read-your-own-writes). Otherwise, if
    /// it has already been read, the first-observed snapshot is returned
    /// (repeatable read). Otherwise a fresh deep copy is taken from the
    /// cell, recorded in the read quarantine, and returned.
    ///
    /// Panics if `tvar` was created by a different [`crate::Stm`] than the
    /// one driving this transaction.
    pub fn read<T>(&mut self, tvar: &TVar<T>) -> T
    where
        T: Value + Clone,
    {
        tvar.assert_belongs_to(self.stm.id);
        let key = CellKey(Arc::clone(&tvar.cell));

        if let Some(written) = self.write_quarantine.get(&key) {
            return value::downcast::<T>(written.as_ref());
        }
        if let Some(seen) = self.read_quarantine.get(&key) {
            return value::downcast::<T>(seen.as_ref());
        }

        let snapshot = tvar.cell.read();
        let result = value::downcast::<T>(snapshot.as_ref());
        self.read_quarantine.insert(key, snapshot);
        result
    }

    /// Place `new_value` in the write quarantine for `tvar`, overwriting
    /// any previously quarantined write for the same cell. Always succeeds
    /// locally — the boolean return exists so actions can compose writes as
    /// `tx.write(a, va) && tx.write(b, vb)` and return that. Actual
    /// conflict detection happens at commit, not here.
    ///
    /// Panics if `tvar` was created by a different [`crate::Stm`] than the
    /// one driving this transaction.
    pub fn write<T>(&mut self, tvar: &TVar<T>, new_value: T) -> bool
    where
        T: Value + Clone,
    {
        tvar.assert_belongs_to(self.stm.id);
        let key = CellKey(Arc::clone(&tvar.cell));
        self.write_quarantine.insert(key, Box::new(new_value));
        true
    }

    /// Current state-machine position, for diagnostics and tests.
    pub fn state(&self) -> TxState {
        self.state
    }

    /// True exactly once this transaction has committed successfully.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Number of successful commits this transaction has completed.
    /// Always 0 or 1: a `Transaction` is single-use, but the counter
    /// mirrors the spec's "version counter, incremented on successful
    /// completion" for debugging.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Run this transaction's retry loop on a new thread. The caller gets
    /// no join handle, per the spec's asynchronous execution mode — use a
    /// [`TVar`] written by the action itself if the caller needs to observe
    /// completion.
    pub fn execute(self) {
        std::thread::spawn(move || {
            if let Err(err) = self.run_sync() {
                warn!(%err, "asynchronous transaction did not commit");
            }
        });
    }

    /// Run this transaction's retry loop on the current thread, blocking
    /// until it commits or its retry budget (if any) is exhausted.
    pub(crate) fn run_sync(mut self) -> Result<(), StmError> {
        let max_retries = self.stm.config.max_retries;
        let backoff = self.stm.config.backoff.clone();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            self.state = TxState::Running;
            trace!(attempt, "running transaction action");

            let action = Arc::clone(&self.action);
            let proceed = action(&mut self);

            if proceed {
                if self.commit() {
                    self.done = true;
                    self.version += 1;
                    debug!(attempt, "transaction committed");
                    return Ok(());
                }
            } else {
                self.state = TxState::Aborted;
                trace!(attempt, "action returned false, rolling back");
            }

            self.rollback();

            if let Some(max) = max_retries {
                if attempt >= max {
                    warn!(attempts = attempt, "retry budget exhausted");
                    return Err(StmError::RetriesExhausted { attempts: attempt });
                }
            }
            backoff.wait(attempt);
        }
    }

    /// Clear both quarantines, discarding everything the just-finished
    /// attempt observed or staged. Never applied to cells.
    fn rollback(&mut self) {
        self.read_quarantine.clear();
        self.write_quarantine.clear();
    }

    /// Validate the read quarantine and, if consistent, install the write
    /// quarantine. Runs under the STM's commit mutex. Returns `true` on a
    /// successful commit.
    fn commit(&mut self) -> bool {
        self.state = TxState::Validating;
        let _commit_guard = self.stm.commit_mutex.lock();

        // Do not short-circuit on the first mismatch: every read-quarantine
        // entry is checked so the failure count reflects the full conflict,
        // even though only "> 0" is ever acted on below.
        let mut fail_count = 0usize;
        for (key, snapshot) in &self.read_quarantine {
            let current = key.0.read();
            if !current.equals_value(snapshot.as_ref()) {
                fail_count += 1;
            }
        }

        if fail_count > 0 {
            trace!(fail_count, "commit validation failed");
            self.state = TxState::Aborted;
            return false;
        }

        for (key, new_value) in std::mem::take(&mut self.write_quarantine) {
            key.0.write(new_value);
        }

        self.state = TxState::Committed;
        true
    }
}
