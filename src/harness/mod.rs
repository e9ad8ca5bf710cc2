//! Deploys the contract on a fresh chain and runs the gas comparisons.

pub mod report;

use ethnum::{u256, uint, AsU256};
use thiserror::Error;
use crate::abi;
use crate::asm;
use crate::blockchain::Blockchain;
use crate::blockchain::errors::Error as ChainError;
use crate::blockchain::primitives::{Address, Receipt};
use crate::contract;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not assemble the contract: {0}")]
    Assembly(#[from] asm::Error),
    #[error("chain rejected the transaction: {0}")]
    Chain(#[from] ChainError),
    #[error("contract deployment reverted")]
    DeployReverted,
    #[error("the sanity test reverted")]
    SanityCheckFailed,
    #[error("measured call {0} reverted")]
    MeasuredCallReverted(String),
}

/// Handle to a deployed benchmark contract.
#[derive(Debug)]
pub struct MemoryMapping {
    pub address: Address,
}

impl MemoryMapping {
    pub fn deploy(chain: &mut Blockchain, from: Address, gas: usize) -> Result<(Self, Receipt), Error> {
        let receipt = chain.deploy(from, contract::initcode()?, gas)?;
        let address = match receipt.contract_address {
            Some(address) if receipt.is_success() => address,
            _ => return Err(Error::DeployReverted),
        };
        tracing::debug!(?address, gas_used = receipt.gas_used, "contract deployed");
        Ok((MemoryMapping { address }, receipt))
    }

    fn invoke(&self, chain: &mut Blockchain, from: Address, signature: &str, args: &[u256], gas: usize) -> Result<Receipt, Error> {
        Ok(chain.call(from, self.address, abi::encode_call(signature, args), gas)?)
    }

    pub fn test(&self, chain: &mut Blockchain, from: Address, gas: usize) -> Result<Receipt, Error> {
        self.invoke(chain, from, contract::SIG_TEST, &[], gas)
    }

    pub fn test_mem(&self, chain: &mut Blockchain, from: Address, gas: usize) -> Result<Receipt, Error> {
        self.invoke(chain, from, contract::SIG_TEST_MEM, &[], gas)
    }

    pub fn test_storage(&self, chain: &mut Blockchain, from: Address, gas: usize) -> Result<Receipt, Error> {
        self.invoke(chain, from, contract::SIG_TEST_STORAGE, &[], gas)
    }

    pub fn test_mem_extended(&self, chain: &mut Blockchain, from: Address, gas: usize, bound: u256, offset: Option<u256>) -> Result<Receipt, Error> {
        match offset {
            Some(offset) => self.invoke(chain, from, contract::SIG_TEST_MEM_EXTENDED_OFFSET, &[bound, offset], gas),
            None => self.invoke(chain, from, contract::SIG_TEST_MEM_EXTENDED, &[bound], gas),
        }
    }

    pub fn test_storage_extended(&self, chain: &mut Blockchain, from: Address, gas: usize, bound: u256, offset: Option<u256>) -> Result<Receipt, Error> {
        match offset {
            Some(offset) => self.invoke(chain, from, contract::SIG_TEST_STORAGE_EXTENDED_OFFSET, &[bound, offset], gas),
            None => self.invoke(chain, from, contract::SIG_TEST_STORAGE_EXTENDED, &[bound], gas),
        }
    }

    pub fn test_mem_extended2(&self, chain: &mut Blockchain, from: Address, gas: usize, bound: u256, offset: Option<u256>) -> Result<Receipt, Error> {
        match offset {
            Some(offset) => self.invoke(chain, from, contract::SIG_TEST_MEM_EXTENDED2_OFFSET, &[bound, offset], gas),
            None => self.invoke(chain, from, contract::SIG_TEST_MEM_EXTENDED2, &[bound], gas),
        }
    }

    pub fn test_storage_extended2(&self, chain: &mut Blockchain, from: Address, gas: usize, bound: u256, offset: Option<u256>) -> Result<Receipt, Error> {
        match offset {
            Some(offset) => self.invoke(chain, from, contract::SIG_TEST_STORAGE_EXTENDED2_OFFSET, &[bound, offset], gas),
            None => self.invoke(chain, from, contract::SIG_TEST_STORAGE_EXTENDED2, &[bound], gas),
        }
    }
}

/// Gas burned by the two backings for the same scenario.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Comparison {
    pub memory_gas: usize,
    pub storage_gas: usize,
}

impl Comparison {
    pub fn memory_wins(&self) -> bool {
        self.memory_gas < self.storage_gas
    }

    pub fn saved(&self) -> i64 {
        self.storage_gas as i64 - self.memory_gas as i64
    }
}

#[derive(Debug)]
pub struct Harness {
    chain: Blockchain,
    contract: MemoryMapping,
    gas_limit: usize,
    operator: Address,
}

impl Harness {
    /// Spins up a chain with a funded operator and deploys the contract.
    pub fn deploy(gas_limit: usize) -> Result<(Self, Receipt), Error> {
        let operator = Address(uint!("0xF0490D46185BEC962CAC93120B52389748E99C0C"));
        let mut chain = Blockchain::new(uint!("31337"));
        chain.credit(operator, uint!("0xFFFFFFFFFFFFFFFF"));
        let (contract, receipt) = MemoryMapping::deploy(&mut chain, operator, gas_limit)?;
        Ok((Harness { chain, contract, gas_limit, operator }, receipt))
    }

    /// Runs `test()`, which cross-checks the two backings on the chain.
    pub fn sanity_check(&mut self) -> Result<Receipt, Error> {
        let receipt = self.contract.test(&mut self.chain, self.operator, self.gas_limit)?;
        if !receipt.is_success() {
            return Err(Error::SanityCheckFailed);
        }
        tracing::info!(gas_used = receipt.gas_used, "sanity test passed");
        Ok(receipt)
    }

    fn measured(what: &str, receipt: &Receipt) -> Result<usize, Error> {
        if !receipt.is_success() {
            return Err(Error::MeasuredCallReverted(what.to_string()));
        }
        Ok(receipt.gas_used)
    }

    pub fn compare_single(&mut self) -> Result<Comparison, Error> {
        let receipt = self.contract.test_mem(&mut self.chain, self.operator, self.gas_limit)?;
        let memory_gas = Harness::measured(contract::SIG_TEST_MEM, &receipt)?;
        tracing::info!("gas used (mem test): {memory_gas}");
        let receipt = self.contract.test_storage(&mut self.chain, self.operator, self.gas_limit)?;
        let storage_gas = Harness::measured(contract::SIG_TEST_STORAGE, &receipt)?;
        tracing::info!("gas used (storage test): {storage_gas}");
        Ok(Comparison { memory_gas, storage_gas })
    }

    pub fn compare_extended(&mut self, bound: u64, offset: Option<u64>) -> Result<Comparison, Error> {
        let receipt = self.contract.test_mem_extended(&mut self.chain, self.operator, self.gas_limit, bound.as_u256(), offset.map(AsU256::as_u256))?;
        let memory_gas = Harness::measured(contract::SIG_TEST_MEM_EXTENDED, &receipt)?;
        tracing::info!("gas used (mem test extended {bound}): {memory_gas}");
        let receipt = self.contract.test_storage_extended(&mut self.chain, self.operator, self.gas_limit, bound.as_u256(), offset.map(AsU256::as_u256))?;
        let storage_gas = Harness::measured(contract::SIG_TEST_STORAGE_EXTENDED, &receipt)?;
        tracing::info!("gas used (storage test extended {bound}): {storage_gas}");
        Ok(Comparison { memory_gas, storage_gas })
    }

    pub fn compare_many_reads(&mut self, reads: u64, offset: Option<u64>) -> Result<Comparison, Error> {
        let receipt = self.contract.test_mem_extended2(&mut self.chain, self.operator, self.gas_limit, reads.as_u256(), offset.map(AsU256::as_u256))?;
        let memory_gas = Harness::measured(contract::SIG_TEST_MEM_EXTENDED2, &receipt)?;
        tracing::info!("gas used (mem test extended2 {reads}): {memory_gas}");
        let receipt = self.contract.test_storage_extended2(&mut self.chain, self.operator, self.gas_limit, reads.as_u256(), offset.map(AsU256::as_u256))?;
        let storage_gas = Harness::measured(contract::SIG_TEST_STORAGE_EXTENDED2, &receipt)?;
        tracing::info!("gas used (storage test extended2 {reads}): {storage_gas}");
        Ok(Comparison { memory_gas, storage_gas })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deploys_and_passes_the_sanity_check() {
        let (mut harness, receipt) = Harness::deploy(30_000_000).unwrap();
        assert!(receipt.gas_used > 0);
        assert!(harness.sanity_check().unwrap().is_success());
    }

    #[test]
    fn memory_wins_every_scenario() {
        let (mut harness, _) = Harness::deploy(30_000_000).unwrap();
        harness.sanity_check().unwrap();

        let single = harness.compare_single().unwrap();
        assert!(single.memory_wins());
        assert!(single.saved() > 0);
        assert!(harness.compare_extended(5, None).unwrap().memory_wins());
        assert!(harness.compare_extended(5, Some(3)).unwrap().memory_wins());
        assert!(harness.compare_many_reads(8, None).unwrap().memory_wins());
    }

    #[test]
    fn surfaces_out_of_gas_from_the_chain() {
        let err = Harness::deploy(100_000).unwrap_err();
        assert!(matches!(err, Error::Chain(ChainError::OutOfGas)));
    }
}
