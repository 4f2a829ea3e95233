//! Software transactional memory with a global commit lock.
//!
//! An [`Stm`] owns a set of memory cells, each reachable only through a
//! [`TVar`] handle it issued. A [`Transaction`] groups a set of reads and
//! writes into one action, runs that action, and either commits it or
//! retries it: the action reads through [`Transaction::read`], stages
//! writes through [`Transaction::write`], and signals whether it wants to
//! proceed by returning `true` or `false`. Commit validates every value the
//! action read against the current cell contents under a single global
//! commit mutex, so only one transaction is ever mid-commit at a time; a
//! conflict rolls the whole attempt back and the action runs again.
//!
//! This buys serializability without per-cell locking protocols, at the
//! cost of letting only one transaction finish at a time — the tradeoff
//! made explicit by keeping a single [`parking_lot::Mutex`] as the only
//! synchronization point shared across transactions.
//!
//! ```
//! use stm_core::{Action, Stm};
//!
//! let stm = Stm::create();
//! let balance = stm.new_tvar(100_i64);
//!
//! let withdrawal = balance.clone();
//! stm.perform(vec![Box::new(move |tx: &mut stm_core::Transaction| {
//!     let current = tx.read(&withdrawal);
//!     if current < 10 {
//!         return false;
//!     }
//!     tx.write(&withdrawal, current - 10)
//! }) as Action])
//! .unwrap();
//!
//! assert_eq!(balance.read_atomic(), 90);
//! ```

mod cell;
mod config;
mod error;
mod stm;
#[cfg(test)]
mod test_support;
mod transaction;
mod tvar;
mod value;

pub use config::{BackoffPolicy, StmConfig};
pub use error::StmError;
pub use stm::Stm;
pub use transaction::{Action, Transaction, TxState};
pub use tvar::TVar;
pub use value::Value;
