use ethnum::{u256, AsU256, U256};
use crate::blockchain::WorldState;
use crate::blockchain::errors::Error;
use crate::machine::context::{CallContext, TransactionContext};
use crate::machine::memory::ReadWriteOperation;
use crate::utils::Hash;

#[derive(Debug, Eq, PartialEq)]
pub struct InstructionOutput {
    pub cost: usize,
    pub jump: usize,
}

pub type InstructionResult = Result<InstructionOutput, Error>;

pub struct Instructions {}

impl Instructions {
    fn pop_or_fail<const N: usize>(cctx: &mut CallContext) -> Result<[u256; N], Error> {
        let mut res = [U256::ZERO; N];
        for i in 0..N {
            res[i] = if let Some(x) = cctx.stack.pop() { x } else { return Err(Error::EmptyStack) }
        }
        Ok(res)
    }

    fn push_rev_or_fail<const N: usize>(cctx: &mut CallContext, values: [u256; N]) -> Result<(), Error> {
        for i in (0..N).rev() {
            cctx.stack.push(values[i])?;
        }
        Ok(())
    }

    fn jump_or_fail(cctx: &mut CallContext, counter: u256) -> Result<(), Error> {
        let counter: usize = match counter.try_into() {
            Ok(x) => x,
            _ => return Err(Error::InvalidJumpDest),
        };
        match cctx.contract.code.get(counter) {
            Some(x) => if *x == 0x5B { cctx.pc = counter; Ok(()) } else { Err(Error::InvalidJumpDest) },
            _ => Err(Error::InvalidJumpDest),
        }
    }

    pub fn stop(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        cctx.stop = true;
        Ok(InstructionOutput { cost: 0, jump: 0 })
    }

    pub fn add(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        let [a, b] = Instructions::pop_or_fail(cctx)?;
        Instructions::push_rev_or_fail(cctx, [a.wrapping_add(b)])?;
        Ok(InstructionOutput { cost: 3, jump: 1 })
    }

    pub fn sub(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        let [a, b] = Instructions::pop_or_fail(cctx)?;
        Instructions::push_rev_or_fail(cctx, [a.wrapping_sub(b)])?;
        Ok(InstructionOutput { cost: 3, jump: 1 })
    }

    pub fn lt(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        let [a, b] = Instructions::pop_or_fail(cctx)?;
        Instructions::push_rev_or_fail(cctx, [if a < b { U256::ONE } else { U256::ZERO }])?;
        Ok(InstructionOutput { cost: 3, jump: 1 })
    }

    pub fn gt(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        let [a, b] = Instructions::pop_or_fail(cctx)?;
        Instructions::push_rev_or_fail(cctx, [if a > b { U256::ONE } else { U256::ZERO }])?;
        Ok(InstructionOutput { cost: 3, jump: 1 })
    }

    pub fn eq(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        let [a, b] = Instructions::pop_or_fail(cctx)?;
        Instructions::push_rev_or_fail(cctx, [if a == b { U256::ONE } else { U256::ZERO }])?;
        Ok(InstructionOutput { cost: 3, jump: 1 })
    }

    pub fn iszero(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        let [a] = Instructions::pop_or_fail(cctx)?;
        Instructions::push_rev_or_fail(cctx, [if a == U256::ZERO { U256::ONE } else { U256::ZERO }])?;
        Ok(InstructionOutput { cost: 3, jump: 1 })
    }

    pub fn shl(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        let [shift, value] = Instructions::pop_or_fail(cctx)?;
        Instructions::push_rev_or_fail(cctx, [match TryInto::<u8>::try_into(shift) {
            Ok(shift) => value.wrapping_shl(shift.into()),
            _ => U256::ZERO,
        }])?;
        Ok(InstructionOutput { cost: 3, jump: 1 })
    }

    pub fn shr(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        let [shift, value] = Instructions::pop_or_fail(cctx)?;
        Instructions::push_rev_or_fail(cctx, [match TryInto::<u8>::try_into(shift) {
            Ok(shift) => value.wrapping_shr(shift.into()),
            _ => U256::ZERO,
        }])?;
        Ok(InstructionOutput { cost: 3, jump: 1 })
    }

    pub fn keccak256(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        let [offset, size] = Instructions::pop_or_fail(cctx)?;
        let ReadWriteOperation { size, extension_cost, result, .. } = cctx.memory.load(offset, size)?;
        Instructions::push_rev_or_fail(cctx, [result.keccak256()])?;
        Ok(InstructionOutput { cost: 30 + 6 * ((size + 31) >> 5) + extension_cost, jump: 1 })
    }

    pub fn callvalue(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        Instructions::push_rev_or_fail(cctx, [cctx.contract.value])?;
        Ok(InstructionOutput { cost: 2, jump: 1 })
    }

    pub fn calldataload(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        let [offset] = Instructions::pop_or_fail(cctx)?;
        Instructions::push_rev_or_fail(cctx, [match TryInto::<usize>::try_into(offset) {
            Ok(offset) => {
                let mut res = U256::ZERO;
                for i in 0..32usize {
                    res <<= 8;
                    res |= u256::from(*cctx.contract.input.get(offset + i).unwrap_or(&0u8));
                }
                res
            },
            Err(_) => U256::ZERO,
        }])?;
        Ok(InstructionOutput { cost: 3, jump: 1 })
    }

    pub fn calldatasize(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        Instructions::push_rev_or_fail(cctx, [cctx.contract.input.len().as_u256()])?;
        Ok(InstructionOutput { cost: 2, jump: 1 })
    }

    pub fn codecopy(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        let [dest_offset, offset, size] = Instructions::pop_or_fail(cctx)?;
        let code_offset = std::cmp::min(cctx.contract.code.len(), offset.try_into().unwrap_or(usize::MAX));
        let code_end = std::cmp::min(cctx.contract.code.len(), code_offset.saturating_add(size.try_into().unwrap_or(usize::MAX)));
        let value = cctx.contract.code[code_offset..code_end].to_vec();
        let ReadWriteOperation { size, extension_cost, .. } = cctx.memory.store(dest_offset, size, value)?;
        Ok(InstructionOutput { cost: 3 + 3 * ((size + 31) >> 5) + extension_cost, jump: 1 })
    }

    pub fn pop(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        Instructions::pop_or_fail::<1>(cctx)?;
        Ok(InstructionOutput { cost: 2, jump: 1 })
    }

    pub fn mload(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        let [offset] = Instructions::pop_or_fail(cctx)?;
        let ReadWriteOperation { extension_cost, result, .. } = cctx.memory.load_word(offset)?;
        Instructions::push_rev_or_fail(cctx, [result])?;
        Ok(InstructionOutput { cost: 3 + extension_cost, jump: 1 })
    }

    pub fn mstore(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        let [offset, value] = Instructions::pop_or_fail(cctx)?;
        let ReadWriteOperation { extension_cost, .. } = cctx.memory.store_word(offset, value)?;
        Ok(InstructionOutput { cost: 3 + extension_cost, jump: 1 })
    }

    pub fn sload(s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        let [key] = Instructions::pop_or_fail(cctx)?;
        let storage = s.storage.entry(cctx.contract.address).or_default();
        let result = storage.load(key);
        Instructions::push_rev_or_fail(cctx, [result.value])?;
        Ok(InstructionOutput { cost: if result.warm { 100 } else { 2100 }, jump: 1 })
    }

    pub fn sstore(s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        let [key, value] = Instructions::pop_or_fail(cctx)?;
        let storage = s.storage.entry(cctx.contract.address).or_default();
        let (current_value, original_value, warm) = match storage.store(key, value) {
            Some(v) => (v.value, v.original_value, v.warm),
            None => (U256::ZERO, U256::ZERO, false),
        };
        let base_cost: usize =
            if value == current_value { 100 }     // the value does not change
        else if current_value == original_value { // the storage slot is clean ...
            if original_value == 0 { 20000 }      // ... and has not explicit value
            else { 2900 }                         // ... and has an explicit value
        }
        else { 100 };                             // the value changes and the storage slot is dirty
        Ok(InstructionOutput { cost: base_cost + if warm { 0 } else { 2100 }, jump: 1 })
    }

    pub fn jump(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        let [counter] = Instructions::pop_or_fail(cctx)?;
        Instructions::jump_or_fail(cctx, counter)?;
        Ok(InstructionOutput { cost: 8, jump: 0 })
    }

    pub fn jumpi(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        let [counter, b] = Instructions::pop_or_fail(cctx)?;
        let jump = match b {
            U256::ZERO => 1,
            _ => { Instructions::jump_or_fail(cctx, counter)?; 0 },
        };
        Ok(InstructionOutput { cost: 10, jump })
    }

    pub fn jumpdest(_s: &mut WorldState, _tctx: &TransactionContext, _cctx: &mut CallContext) -> InstructionResult {
        Ok(InstructionOutput { cost: 1, jump: 1 })
    }

    pub fn push<const N: usize>(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        let mut res = U256::ZERO;
        for i in 0..N {
            res <<= 8;
            res |= u256::from(*cctx.contract.code.get(cctx.pc + i + 1).unwrap_or(&0u8));
        };
        Instructions::push_rev_or_fail(cctx, [res])?;
        Ok(InstructionOutput { cost: if N == 0 { 2 } else { 3 }, jump: N + 1 })
    }

    pub fn dup<const N: usize>(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        let values = Instructions::pop_or_fail::<N>(cctx)?;
        Instructions::push_rev_or_fail(cctx, values)?;
        Instructions::push_rev_or_fail(cctx, [values[N - 1]])?;
        Ok(InstructionOutput { cost: 3, jump: 1 })
    }

    pub fn swap<const N: usize>(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        let mut values = Instructions::pop_or_fail::<N>(cctx)?;
        values.swap(0, N - 1);
        Instructions::push_rev_or_fail(cctx, values)?;
        Ok(InstructionOutput { cost: 3, jump: 1 })
    }

    pub fn r#return(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        cctx.stop = true;
        let [offset, size] = Instructions::pop_or_fail(cctx)?;
        let ReadWriteOperation { result: data, extension_cost, .. } = cctx.memory.load(offset, size)?;
        cctx.r#return = data;
        Ok(InstructionOutput { cost: extension_cost, jump: 0 })
    }

    pub fn revert(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        cctx.stop = true;
        cctx.revert = true;
        let [offset, size] = Instructions::pop_or_fail(cctx)?;
        let ReadWriteOperation { result: data, extension_cost, .. } = cctx.memory.load(offset, size)?;
        cctx.r#return = data;
        Ok(InstructionOutput { cost: extension_cost, jump: 0 })
    }

    pub fn invalid(_s: &mut WorldState, _tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        cctx.stop = true;
        cctx.revert = true;
        Ok(InstructionOutput { cost: cctx.contract.gas, jump: 0 })
    }
}
