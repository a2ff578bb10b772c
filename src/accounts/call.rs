use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use crate::accounts::Address;
use crate::engine::MultiSigWallet;

/// The outward call made when a transaction executes.
///
/// The wallet is handed back to the callee, so an implementation may re-enter
/// any wallet entry point before returning, passing itself along as the call
/// primitive. Returning `false` fails the execution and rolls the wallet back.
///
/// Each execution is wrapped in a savepoint. Effects of the call, including
/// those of nested executions made through the same primitive, must be undone
/// by `rollback` so the wallet and its targets stay in step.
pub trait CallPrimitive {
    fn perform_call(
        &mut self,
        wallet: &mut MultiSigWallet,
        to: Address,
        value: u128,
        data: &[u8],
    ) -> bool;

    /// Open a unit of work. Units nest.
    fn savepoint(&mut self);

    /// Undo everything since the innermost open savepoint and close it.
    fn rollback(&mut self);

    /// Keep everything since the innermost open savepoint and close it.
    fn release(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallReceipt {
    pub to: Address,
    pub value: u128,
    pub data: Vec<u8>,
}

#[derive(Debug)]
struct Savepoint {
    balances: HashMap<Address, u128>,
    calls: usize,
}

/// In-memory value transfer: credits the target's balance and records the call.
#[derive(Debug, Default)]
pub struct ValueTransfer {
    balances: HashMap<Address, u128>,
    rejecting: HashSet<Address>,
    calls: Vec<CallReceipt>,
    savepoints: Vec<Savepoint>,
}

impl ValueTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future call to `target` fail.
    pub fn reject_calls_to(&mut self, target: Address) {
        self.rejecting.insert(target);
    }

    pub fn balance_of(&self, address: &Address) -> u128 {
        self.balances.get(address).copied().unwrap_or(0)
    }

    pub fn calls(&self) -> &[CallReceipt] {
        &self.calls
    }
}

impl CallPrimitive for ValueTransfer {
    fn perform_call(
        &mut self,
        _wallet: &mut MultiSigWallet,
        to: Address,
        value: u128,
        data: &[u8],
    ) -> bool {
        if self.rejecting.contains(&to) {
            debug!("call to {} rejected by target", to);
            return false;
        }
        let balance = self.balances.entry(to).or_insert(0);
        let Some(credited) = balance.checked_add(value) else {
            debug!("call to {} would overflow its balance", to);
            return false;
        };
        *balance = credited;
        self.calls.push(CallReceipt {
            to,
            value,
            data: data.to_vec(),
        });
        true
    }

    fn savepoint(&mut self) {
        self.savepoints.push(Savepoint {
            balances: self.balances.clone(),
            calls: self.calls.len(),
        });
    }

    fn rollback(&mut self) {
        match self.savepoints.pop() {
            Some(savepoint) => {
                self.balances = savepoint.balances;
                self.calls.truncate(savepoint.calls);
            }
            None => warn!("rollback without an open savepoint"),
        }
    }

    fn release(&mut self) {
        if self.savepoints.pop().is_none() {
            warn!("release without an open savepoint");
        }
    }
}
