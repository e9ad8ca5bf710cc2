use std::fmt;
use ethnum::{u256, U256};
use crate::blockchain::errors::Error;
use crate::utils::Hash;

#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct Address(pub u256);

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({:#X})", self.0)
    }
}

impl TryInto<Address> for u256 {
    type Error = Error;

    fn try_into(self) -> Result<Address, Error> {
        if self >> 160 != U256::ZERO {
            return Err(Error::InvalidAddress);
        }
        Ok(Address(self))
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Account {
    pub balance: u256,
    pub code: Vec<u8>,
    pub nonce: usize,
}

impl Account {
    pub fn check_enough_funds(&self, cost: u256) -> Result<u256, Error> {
        if self.balance < cost {
            return Err(Error::InsufficientFunds(cost));
        }
        Ok(self.balance - cost)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Block {
    pub gas_limit: usize,
    pub number: u256,
    pub time: u256,
}

#[derive(Clone, Debug, Default)]
pub struct Transaction {
    pub data: Vec<u8>,
    pub from: Address,
    pub gas: usize,
    pub gas_price: usize,
    pub nonce: usize,
    pub to: Option<Address>,
    pub value: u256,
}

impl Transaction {
    pub fn is_contract_creation(&self) -> bool {
        self.to.is_none()
    }

    /// The address the transaction runs at. For a creation this is derived
    /// from the sender and its nonce, like CREATE does.
    pub fn contract_address(&self) -> Address {
        match self.to {
            Some(to) => to,
            None => {
                let mut stream = rlp::RlpStream::new_list(2);
                stream.append(&self.from.0.to_be_bytes()[12..].to_vec());
                stream.append(&self.nonce);
                Address(stream.out().to_vec().keccak256() & ((U256::ONE << 160) - 1u128))
            },
        }
    }

    /// Gas charged before the first opcode runs: the base fee, the creation
    /// surcharge and the calldata bytes.
    pub fn intrinsic_gas_cost(&self) -> usize {
        let mut cost = 21000;
        if self.is_contract_creation() {
            cost += 32000;
        }
        for byte in &self.data {
            cost += if *byte == 0 { 4 } else { 16 };
        }
        cost
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExecutionStatus {
    Success,
    Reverted,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Receipt {
    pub block_number: u256,
    pub contract_address: Option<Address>,
    pub gas_used: usize,
    pub return_data: Vec<u8>,
    pub status: ExecutionStatus,
}

impl Receipt {
    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }
}
