pub mod errors;
pub mod primitives;
pub mod storage;

use std::collections::HashMap;
use ethnum::{u256, AsU256, U256};
use crate::blockchain::errors::Error;
use crate::blockchain::primitives::{Account, Address, Block, ExecutionStatus, Receipt, Transaction};
use crate::blockchain::storage::Storage;
use crate::machine::Machine;
use crate::machine::context::TransactionContext;

pub const BLOCK_GAS_LIMIT: usize = 30_000_000;
pub const GAS_PRICE: usize = 1;

#[derive(Debug, Default)]
pub struct WorldState {
    pub accounts: Storage<Address, Account>,
    pub chain_id: u256,
    pub storage: HashMap<Address, Storage<u256, u256>>,
}

struct WorldStateSnapshot {
    accounts: Storage<Address, Account>,
    storage: HashMap<Address, Storage<u256, u256>>,
}

impl WorldState {
    pub fn decrease_balance(&mut self, address: Address, amount: u256) -> Result<(), Error> {
        let account = self.accounts.load(address).value;
        let balance = account.check_enough_funds(amount)?;
        self.accounts.store(address, Account { balance, code: account.code, nonce: account.nonce });
        Ok(())
    }

    fn increase_balance(&mut self, address: Address, amount: u256) {
        let account = self.accounts.load(address).value;
        self.accounts.store(address, Account { balance: account.balance + amount, code: account.code, nonce: account.nonce });
    }

    fn bump_nonce(&mut self, address: Address) {
        let account = self.accounts.load(address).value;
        self.accounts.store(address, Account { balance: account.balance, code: account.code, nonce: account.nonce + 1 });
    }

    // every slot touched by a previous transaction is cold again
    fn begin_transaction(&mut self) {
        self.accounts.reset_access();
        for storage in self.storage.values_mut() {
            storage.reset_access();
        }
    }

    fn snapshot(&self) -> WorldStateSnapshot {
        WorldStateSnapshot {
            accounts: self.accounts.clone(),
            storage: self.storage.clone(),
        }
    }

    fn restore(&mut self, snapshot: WorldStateSnapshot) {
        self.accounts = snapshot.accounts;
        self.storage = snapshot.storage;
    }
}

/// A single-node chain: a current block and the world state, fed one
/// transaction at a time.
#[derive(Debug)]
pub struct Blockchain {
    pub block: Block,
    pub state: WorldState,
}

impl Blockchain {
    pub fn new(chain_id: u256) -> Self {
        Blockchain {
            block: Block { gas_limit: BLOCK_GAS_LIMIT, number: U256::ONE, time: U256::ZERO },
            state: WorldState { chain_id, ..Default::default() },
        }
    }

    pub fn credit(&mut self, address: Address, amount: u256) {
        self.state.increase_balance(address, amount);
    }

    pub fn deploy(&mut self, from: Address, data: Vec<u8>, gas: usize) -> Result<Receipt, Error> {
        let nonce = self.state.accounts.load(from).value.nonce;
        self.send(Transaction { data, from, gas, gas_price: GAS_PRICE, nonce, to: None, value: U256::ZERO })
    }

    pub fn call(&mut self, from: Address, to: Address, data: Vec<u8>, gas: usize) -> Result<Receipt, Error> {
        let nonce = self.state.accounts.load(from).value.nonce;
        self.send(Transaction { data, from, gas, gas_price: GAS_PRICE, nonce, to: Some(to), value: U256::ZERO })
    }

    /// Validates and executes one transaction, minting a receipt. Every
    /// included transaction gets its own block. A revert rolls the state
    /// back but still consumes the gas and the nonce; a validation or
    /// execution error leaves the state untouched.
    pub fn send(&mut self, tx: Transaction) -> Result<Receipt, Error> {
        tracing::debug!(from = ?tx.from, to = ?tx.to, gas = tx.gas, "sending transaction");
        if tx.gas > self.block.gas_limit {
            return Err(Error::GasLimitExceeded(tx.gas));
        }
        let account = self.state.accounts.load(tx.from).value;
        if tx.nonce != account.nonce {
            return Err(Error::InvalidNonce { tx: tx.nonce, account: account.nonce });
        }

        self.state.begin_transaction();
        let snapshot = self.state.snapshot();
        let creation = tx.is_contract_creation();
        let contract_address = tx.contract_address();
        let tctx = TransactionContext { block: self.block.clone(), tx };

        match Machine::execute_transaction(&mut self.state, &tctx) {
            Ok(output) => {
                let gas_used = tctx.tx.gas - output.remaining_gas;
                if output.revert {
                    self.state.restore(snapshot);
                    self.state.decrease_balance(tctx.tx.from, (gas_used * tctx.tx.gas_price).as_u256())?;
                }
                self.state.bump_nonce(tctx.tx.from);
                let receipt = Receipt {
                    block_number: self.block.number,
                    contract_address: if creation && !output.revert { Some(contract_address) } else { None },
                    gas_used,
                    return_data: output.data,
                    status: if output.revert { ExecutionStatus::Reverted } else { ExecutionStatus::Success },
                };
                self.advance_block();
                Ok(receipt)
            },
            Err(e) => {
                self.state.restore(snapshot);
                Err(e)
            },
        }
    }

    pub fn advance_block(&mut self) {
        self.block.number += U256::ONE;
        self.block.time += 12u8.as_u256();
    }
}
