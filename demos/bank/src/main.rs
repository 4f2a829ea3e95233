//! A small banking client exercising `stm-core`'s transfer-between-cells
//! case: two accounts, each backed by a `TVar<Balance>`, transferred between
//! under one `Stm`.

use stm_core::{Action, Stm, TVar, Transaction};
use tracing::info;

#[derive(Clone, Debug, PartialEq)]
struct Balance {
    amount: i64,
}

struct Account {
    name: String,
    state: TVar<Balance>,
    stm: Stm,
}

impl Account {
    fn new(stm: &Stm, name: impl Into<String>, initial: i64) -> Account {
        Account {
            name: name.into(),
            state: stm.new_tvar(Balance { amount: initial }),
            stm: stm.clone(),
        }
    }

    fn balance(&self) -> i64 {
        self.state.read_atomic().amount
    }

    fn deposit(&self, amount: i64) {
        let state = self.state.clone();
        self.stm
            .perform(vec![Box::new(move |tx: &mut Transaction| {
                let mut balance = tx.read(&state);
                balance.amount += amount;
                tx.write(&state, balance)
            }) as Action])
            .expect("unbounded retry budget never exhausts");
    }

    /// Moves `amount` out of this account, retrying until the balance covers
    /// it. If the balance never reaches `amount`, the action keeps returning
    /// `false` forever — matching the literal source protocol's
    /// unconditional retry, not a blocking wait for a balance to rise.
    fn withdraw(&self, amount: i64) {
        let state = self.state.clone();
        self.stm
            .perform(vec![Box::new(move |tx: &mut Transaction| {
                let mut balance = tx.read(&state);

                if balance.amount < amount {
                    return false;
                }

                balance.amount -= amount;
                tx.write(&state, balance)
            }) as Action])
            .expect("unbounded retry budget never exhausts");
    }

    /// Moves `amount` out of this account into `dest`, retrying until both
    /// sides can be updated as one atomic step. If this account's balance
    /// never reaches `amount`, the action keeps returning `false` forever —
    /// matching the literal source protocol's unconditional retry, not a
    /// blocking wait for a balance to rise.
    fn transfer(&self, dest: &Account, amount: i64) {
        let from = self.state.clone();
        let to = dest.state.clone();
        self.stm
            .perform(vec![Box::new(move |tx: &mut Transaction| {
                let mut src = tx.read(&from);
                let mut dst = tx.read(&to);

                if src.amount < amount {
                    return false;
                }

                src.amount -= amount;
                dst.amount += amount;

                tx.write(&from, src) && tx.write(&to, dst)
            }) as Action])
            .expect("unbounded retry budget never exhausts");
    }
}

fn print_state(accounts: &[&Account]) {
    for account in accounts {
        info!(account = %account.name, balance = account.balance(), "account state");
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let stm = Stm::create();
    let account1 = Account::new(&stm, "account1", 100);
    let account2 = Account::new(&stm, "account2", 500);

    info!("initial state");
    print_state(&[&account1, &account2]);

    account2.transfer(&account1, 100);
    account1.transfer(&account2, 10);

    // A deposit and a withdrawal run with nothing else, just to exercise the
    // single-cell path alongside the two-cell transfer path above.
    account1.deposit(0);
    account2.withdraw(0);

    info!("final state");
    print_state(&[&account1, &account2]);

    assert_eq!(account1.balance(), 190);
    assert_eq!(account2.balance(), 410);
}
