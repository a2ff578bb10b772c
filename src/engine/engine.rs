use log::{debug, info, warn};

use crate::accounts::{Address, CallPrimitive, OwnerSet};
use crate::error::{Result, WalletError};
use crate::events::{EventLog, WalletEvent};
use crate::transactions::{Transaction, TransactionView};

/// Everything an `execute` may have to undo. The owner set is immutable and
/// lives outside it.
#[derive(Debug, Clone, Default)]
struct WalletState {
    transactions: Vec<Transaction>,
    balance: u128,
    events: EventLog,
}

/// A vault whose outgoing calls need confirmations from a quorum of owners.
#[derive(Debug)]
pub struct MultiSigWallet {
    owners: OwnerSet,
    state: WalletState,
    // Events numbered below this were handed to an observer and survive rollback.
    delivered: usize,
}

impl MultiSigWallet {
    pub fn new(owners: Vec<Address>, required_confirmations: usize) -> Result<Self> {
        let owners = OwnerSet::new(owners, required_confirmations)?;
        info!(
            "wallet created with {} owners, {} confirmations required",
            owners.len(),
            owners.required_confirmations()
        );
        Ok(Self {
            owners,
            state: WalletState::default(),
            delivered: 0,
        })
    }

    /// Accept value with no instruction attached. Anyone may deposit.
    pub fn receive(&mut self, sender: Address, amount: u128) -> Result<u128> {
        let balance = self
            .state
            .balance
            .checked_add(amount)
            .ok_or(WalletError::BalanceOverflow)?;
        self.state.balance = balance;
        self.state.events.emit(WalletEvent::Deposit {
            sender,
            amount,
            balance,
        });
        Ok(balance)
    }

    /// Propose a call. Returns the new transaction's index.
    pub fn submit(&mut self, caller: Address, to: Address, value: u128, data: Vec<u8>) -> Result<usize> {
        self.owners.require_owner(&caller)?;

        let tx_index = self.state.transactions.len();
        self.state
            .transactions
            .push(Transaction::new(to, value, data.clone(), self.owners.len()));
        self.state.events.emit(WalletEvent::Submit {
            owner: caller,
            tx_index,
            to,
            value,
            data,
        });
        Ok(tx_index)
    }

    pub fn confirm(&mut self, caller: Address, tx_index: usize) -> Result<()> {
        let slot = self.owners.require_owner(&caller)?;
        let tx = self.pending_mut(tx_index)?;
        if !tx.confirm(slot) {
            return Err(WalletError::AlreadyConfirmed);
        }
        debug!("tx {} now has {} confirmations", tx_index, tx.num_confirmations());

        self.state.events.emit(WalletEvent::Confirm {
            owner: caller,
            tx_index,
        });
        Ok(())
    }

    pub fn revoke(&mut self, caller: Address, tx_index: usize) -> Result<()> {
        let slot = self.owners.require_owner(&caller)?;
        let tx = self.pending_mut(tx_index)?;
        if !tx.revoke(slot) {
            return Err(WalletError::NotConfirmed);
        }
        debug!("tx {} now has {} confirmations", tx_index, tx.num_confirmations());

        self.state.events.emit(WalletEvent::Revoke {
            owner: caller,
            tx_index,
        });
        Ok(())
    }

    /// Run a confirmed transaction through `call`, at most once.
    ///
    /// The executed flag and the debit are applied before the call is made,
    /// so a re-entrant `execute` of the same index is rejected. If the call
    /// fails, every change made since the checkpoint is discarded, including
    /// changes made by re-entrant calls, and `call` is rolled back with it.
    pub fn execute<C>(&mut self, caller: Address, tx_index: usize, call: &mut C) -> Result<()>
    where
        C: CallPrimitive + ?Sized,
    {
        self.owners.require_owner(&caller)?;
        let tx = self.pending(tx_index)?;
        let need = self.owners.required_confirmations();
        let have = tx.num_confirmations();
        if have < need {
            return Err(WalletError::InsufficientConfirmations { have, need });
        }
        let (to, value, data) = (tx.to, tx.value, tx.data.clone());

        let Some(remaining) = self.state.balance.checked_sub(value) else {
            warn!(
                "tx {} needs {} but the wallet holds {}",
                tx_index, value, self.state.balance
            );
            return Err(WalletError::CallFailed);
        };

        let checkpoint = self.state.clone();
        self.state.transactions[tx_index].executed = true;
        self.state.balance = remaining;

        call.savepoint();
        if !call.perform_call(self, to, value, &data) {
            warn!("tx {} call to {} failed, rolling back", tx_index, to);
            call.rollback();
            self.restore(checkpoint);
            return Err(WalletError::CallFailed);
        }
        call.release();

        info!("tx {} executed by {}: {} sent to {}", tx_index, caller, value, to);
        self.state.events.emit(WalletEvent::Execute {
            owner: caller,
            tx_index,
        });
        Ok(())
    }

    pub fn transaction_count(&self) -> usize {
        self.state.transactions.len()
    }

    pub fn transaction(&self, tx_index: usize) -> Result<TransactionView> {
        self.existing(tx_index).map(|tx| tx.view(tx_index))
    }

    /// All ledger entries in index order.
    pub fn transactions(&self) -> impl Iterator<Item = TransactionView> + '_ {
        self.state
            .transactions
            .iter()
            .enumerate()
            .map(|(index, tx)| tx.view(index))
    }

    /// Whether `owner` currently confirms `tx_index`. Non-owners never do.
    pub fn is_confirmed(&self, tx_index: usize, owner: &Address) -> Result<bool> {
        let tx = self.existing(tx_index)?;
        Ok(self
            .owners
            .owner_index(owner)
            .is_some_and(|slot| tx.is_confirmed_by(slot)))
    }

    pub fn owners(&self) -> &[Address] {
        self.owners.owners()
    }

    pub fn is_owner(&self, address: &Address) -> bool {
        self.owners.is_owner(address)
    }

    pub fn required_confirmations(&self) -> usize {
        self.owners.required_confirmations()
    }

    pub fn balance(&self) -> u128 {
        self.state.balance
    }

    pub fn events(&self) -> &[WalletEvent] {
        self.state.events.as_slice()
    }

    /// Hand the pending notifications to an observer and clear them.
    pub fn drain_events(&mut self) -> Vec<WalletEvent> {
        let events = self.state.events.drain();
        self.delivered = self.state.events.next_seq();
        events
    }

    fn restore(&mut self, checkpoint: WalletState) {
        self.state = checkpoint;
        self.state.events.forget_before(self.delivered);
    }

    fn existing(&self, tx_index: usize) -> Result<&Transaction> {
        self.state
            .transactions
            .get(tx_index)
            .ok_or(WalletError::NotFound(tx_index))
    }

    fn pending(&self, tx_index: usize) -> Result<&Transaction> {
        let tx = self.existing(tx_index)?;
        if tx.executed {
            return Err(WalletError::AlreadyExecuted);
        }
        Ok(tx)
    }

    fn pending_mut(&mut self, tx_index: usize) -> Result<&mut Transaction> {
        let tx = self
            .state
            .transactions
            .get_mut(tx_index)
            .ok_or(WalletError::NotFound(tx_index))?;
        if tx.executed {
            return Err(WalletError::AlreadyExecuted);
        }
        Ok(tx)
    }
}
