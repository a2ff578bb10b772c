use std::fmt;

use log::debug;

use crate::accounts::Address;

/// Notifications raised by the wallet at each successful state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    Deposit {
        sender: Address,
        amount: u128,
        balance: u128,
    },
    Submit {
        owner: Address,
        tx_index: usize,
        to: Address,
        value: u128,
        data: Vec<u8>,
    },
    Confirm {
        owner: Address,
        tx_index: usize,
    },
    Revoke {
        owner: Address,
        tx_index: usize,
    },
    Execute {
        owner: Address,
        tx_index: usize,
    },
}

impl fmt::Display for WalletEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletEvent::Deposit { sender, amount, balance } => {
                write!(f, "Deposit(sender={sender}, amount={amount}, balance={balance})")
            }
            WalletEvent::Submit { owner, tx_index, to, value, data } => write!(
                f,
                "Submit(owner={owner}, txIndex={tx_index}, to={to}, value={value}, data=0x{})",
                hex::encode(data)
            ),
            WalletEvent::Confirm { owner, tx_index } => {
                write!(f, "Confirm(owner={owner}, txIndex={tx_index})")
            }
            WalletEvent::Revoke { owner, tx_index } => {
                write!(f, "Revoke(owner={owner}, txIndex={tx_index})")
            }
            WalletEvent::Execute { owner, tx_index } => {
                write!(f, "Execute(owner={owner}, txIndex={tx_index})")
            }
        }
    }
}

/// Append-only journal of emitted events, drained by observers.
///
/// Events are numbered from zero in emission order; `first_seq` is the number
/// of the oldest event still held.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    first_seq: usize,
    events: Vec<WalletEvent>,
}

impl EventLog {
    pub fn emit(&mut self, event: WalletEvent) {
        debug!("event: {}", event);
        self.events.push(event);
    }

    pub fn as_slice(&self) -> &[WalletEvent] {
        &self.events
    }

    /// Number the next emitted event will get.
    pub fn next_seq(&self) -> usize {
        self.first_seq + self.events.len()
    }

    pub fn drain(&mut self) -> Vec<WalletEvent> {
        self.first_seq = self.next_seq();
        std::mem::take(&mut self.events)
    }

    /// Drop held events numbered below `seq`; they were already handed out.
    pub fn forget_before(&mut self, seq: usize) {
        if seq <= self.first_seq {
            return;
        }
        let delivered = (seq - self.first_seq).min(self.events.len());
        self.events.drain(..delivered);
        self.first_seq = seq;
    }
}
