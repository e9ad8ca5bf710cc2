pub mod context;
pub mod instructions;
pub mod memory;
pub mod opcode;
pub mod stack;

use ethnum::AsU256;
use crate::blockchain::WorldState;
use crate::blockchain::errors::Error;
use crate::blockchain::primitives::Account;
use crate::machine::context::{CallContext, TransactionContext};
use crate::machine::opcode::OpCode;

#[derive(Debug, Default, Eq, PartialEq)]
pub struct ExecutionOutput {
    pub data: Vec<u8>,
    pub remaining_gas: usize,
    pub revert: bool,
}

pub type ExecutionResult = Result<ExecutionOutput, Error>;

pub struct Machine {}

impl Machine {
    fn pay_gas_cost(cctx: &mut CallContext, cost: usize) -> Result<(), Error> {
        if cost > cctx.contract.gas {
            cctx.contract.gas = 0;
            return Err(Error::OutOfGas);
        }
        cctx.contract.gas -= cost;
        Ok(())
    }

    fn execute_next_opcode(s: &mut WorldState, tctx: &TransactionContext, cctx: &mut CallContext) -> Result<(), Error> {
        let opcode = OpCode(*cctx.contract.code.get(cctx.pc).unwrap_or(&0u8));
        tracing::trace!(pc = cctx.pc, op = ?opcode, gas = cctx.contract.gas, "executing opcode");
        let output = opcode.execute(s, tctx, cctx)?;
        Machine::pay_gas_cost(cctx, output.cost)?;
        cctx.pc += output.jump;
        Ok(())
    }

    /// Runs a transaction to completion against the world state. Gas for the
    /// executed work is debited from the sender; rolling back reverted state
    /// is the caller's business.
    pub fn execute_transaction(s: &mut WorldState, tctx: &TransactionContext) -> ExecutionResult {
        let sender = s.accounts.load(tctx.tx.from).value;
        let max_cost = (tctx.tx.gas * tctx.tx.gas_price).as_u256() + tctx.tx.value;
        sender.check_enough_funds(max_cost)?;

        let intrinsic_gas = tctx.tx.intrinsic_gas_cost();
        if intrinsic_gas > tctx.tx.gas {
            return Err(Error::IntrinsicGasTooLow(intrinsic_gas));
        }

        let cctx = &mut CallContext::from_transaction(s, &tctx.tx);
        Machine::pay_gas_cost(cctx, intrinsic_gas)?;

        while !cctx.stop {
            Machine::execute_next_opcode(s, tctx, cctx)?;
        }

        if tctx.tx.is_contract_creation() && !cctx.revert {
            Machine::pay_gas_cost(cctx, 200 * cctx.r#return.len())?; // code deposit cost
            s.accounts.store(tctx.tx.contract_address(), Account {
                balance: tctx.tx.value,
                code: cctx.r#return.clone(),
                nonce: 0,
            });
            s.decrease_balance(tctx.tx.from, tctx.tx.value)?;
        }

        let gas_used = tctx.tx.gas - cctx.contract.gas;
        s.decrease_balance(tctx.tx.from, (gas_used * tctx.tx.gas_price).as_u256())?;

        Ok(ExecutionOutput {
            data: cctx.r#return.clone(),
            remaining_gas: cctx.contract.gas,
            revert: cctx.revert,
        })
    }
}
