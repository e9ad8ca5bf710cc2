//! The benchmark contract, assembled at deploy time.
//!
//! It exposes the same mapping twice, once per backing: a memory table
//! addressed directly, and a storage mapping whose keys are hashed the way
//! Solidity lays out `mapping(uint256 => uint256)`. Every method leaves its
//! result in storage slot 0 so callers can read it back.
//!
//! Runtime memory layout:
//!   0x00  scratch, the key to hash
//!   0x20  scratch, the mapping slot number
//!   0x40  accumulator for the read loops
//!   0x80  memory table, one 32-byte word per key

use ethnum::{u256, AsU256, U256};
use crate::abi;
use crate::asm::{self, Assembler};
use crate::machine::opcode::OpCode;

pub const SIG_TEST: &str = "test()";
pub const SIG_TEST_MEM: &str = "testMem()";
pub const SIG_TEST_STORAGE: &str = "testStorage()";
pub const SIG_TEST_MEM_EXTENDED: &str = "testMemExtended(uint256)";
pub const SIG_TEST_MEM_EXTENDED_OFFSET: &str = "testMemExtended(uint256,uint256)";
pub const SIG_TEST_STORAGE_EXTENDED: &str = "testStorageExtended(uint256)";
pub const SIG_TEST_STORAGE_EXTENDED_OFFSET: &str = "testStorageExtended(uint256,uint256)";
pub const SIG_TEST_MEM_EXTENDED2: &str = "testMemExtended2(uint256)";
pub const SIG_TEST_MEM_EXTENDED2_OFFSET: &str = "testMemExtended2(uint256,uint256)";
pub const SIG_TEST_STORAGE_EXTENDED2: &str = "testStorageExtended2(uint256)";
pub const SIG_TEST_STORAGE_EXTENDED2_OFFSET: &str = "testStorageExtended2(uint256,uint256)";

/// Storage slot every method writes its result to.
pub const RESULT_SLOT: u256 = U256::ZERO;
/// Base slot of the storage mapping, like a first-declared Solidity mapping.
pub const MAP_SLOT: u256 = U256::ONE;

const SCRATCH_KEY: u8 = 0x00;
const SCRATCH_SLOT: u8 = 0x20;
const ACC: u8 = 0x40;
const TABLE_BASE: u8 = 0x80;
const SANITY_KEY: u8 = 3;
const SANITY_VALUE: u8 = 21;
const SINGLE_KEY: u8 = 7;
const SINGLE_VALUE: u8 = 42;

#[derive(Clone, Copy)]
enum Backing {
    Table,
    Map,
}

impl Backing {
    /// Turns the key on top of the stack into the cell the backing keeps it
    /// in: a memory address for the table, a storage slot for the mapping.
    fn emit_entry(self, asm: &mut Assembler) {
        match self {
            Backing::Table => {
                asm.push(5u8).op(OpCode::SHL).push(TABLE_BASE).op(OpCode::ADD);
            },
            Backing::Map => {
                asm.push(SCRATCH_KEY).op(OpCode::MSTORE)
                    .push(MAP_SLOT).push(SCRATCH_SLOT).op(OpCode::MSTORE)
                    .push(0x40u8).push(SCRATCH_KEY).op(OpCode::KECCAK256);
            },
        }
    }

    fn store(self) -> OpCode {
        match self {
            Backing::Table => OpCode::MSTORE,
            Backing::Map => OpCode::SSTORE,
        }
    }

    fn load(self) -> OpCode {
        match self {
            Backing::Table => OpCode::MLOAD,
            Backing::Map => OpCode::SLOAD,
        }
    }
}

fn dispatcher(asm: &mut Assembler) {
    // calldata without a full selector goes to the fallback
    asm.push(4u8).op(OpCode::CALLDATASIZE).op(OpCode::LT)
        .push_label("fallback").op(OpCode::JUMPI);
    asm.push(0u8).op(OpCode::CALLDATALOAD).push(0xE0u8).op(OpCode::SHR);
    for (signature, target) in [
        (SIG_TEST, "test"),
        (SIG_TEST_MEM, "mem"),
        (SIG_TEST_STORAGE, "storage"),
        (SIG_TEST_MEM_EXTENDED, "mem_extended"),
        (SIG_TEST_MEM_EXTENDED_OFFSET, "mem_extended_offset"),
        (SIG_TEST_STORAGE_EXTENDED, "storage_extended"),
        (SIG_TEST_STORAGE_EXTENDED_OFFSET, "storage_extended_offset"),
        (SIG_TEST_MEM_EXTENDED2, "mem_extended2"),
        (SIG_TEST_MEM_EXTENDED2_OFFSET, "mem_extended2_offset"),
        (SIG_TEST_STORAGE_EXTENDED2, "storage_extended2"),
        (SIG_TEST_STORAGE_EXTENDED2_OFFSET, "storage_extended2_offset"),
    ] {
        asm.op(OpCode::DUP1)
            .push(u32::from_be_bytes(abi::selector(signature)))
            .op(OpCode::EQ)
            .push_label(target)
            .op(OpCode::JUMPI);
    }
    asm.push_label("fallback").op(OpCode::JUMP);
}

// none of the methods is payable
fn method_entry(asm: &mut Assembler, label: &str) {
    asm.label(label).op(OpCode::CALLVALUE).push_label("fallback").op(OpCode::JUMPI);
}

/// `test()`: writes and reads the same pair through both backings and bails
/// out with INVALID unless they agree.
fn emit_sanity(asm: &mut Assembler) {
    method_entry(asm, "test");
    asm.push(SANITY_VALUE).push(SANITY_KEY);
    Backing::Table.emit_entry(asm);
    asm.op(OpCode::MSTORE);
    asm.push(SANITY_KEY);
    Backing::Table.emit_entry(asm);
    asm.op(OpCode::MLOAD);
    asm.push(SANITY_VALUE).push(SANITY_KEY);
    Backing::Map.emit_entry(asm);
    asm.op(OpCode::SSTORE);
    asm.push(SANITY_KEY);
    Backing::Map.emit_entry(asm);
    asm.op(OpCode::SLOAD);
    asm.op(OpCode::EQ).op(OpCode::ISZERO).push_label("panic").op(OpCode::JUMPI);
    asm.push(1u8).push(RESULT_SLOT).op(OpCode::SSTORE).op(OpCode::STOP);
}

/// `testMem()` / `testStorage()`: one write, one read back into the result.
fn emit_single(asm: &mut Assembler, label: &str, backing: Backing) {
    method_entry(asm, label);
    asm.push(SINGLE_VALUE).push(SINGLE_KEY);
    backing.emit_entry(asm);
    asm.op(backing.store());
    asm.push(SINGLE_KEY);
    backing.emit_entry(asm);
    asm.op(backing.load());
    asm.push(RESULT_SLOT).op(OpCode::SSTORE).op(OpCode::STOP);
}

/// Emits the two entry points of an extended method and leaves the stack as
/// `[bound, offset]` at the shared body label. The one-argument overload
/// defaults the offset to zero.
fn emit_arguments(asm: &mut Assembler, label: &str) {
    let body = format!("{label}_body");
    method_entry(asm, &format!("{label}_offset"));
    asm.push(0x24u8).op(OpCode::CALLDATALOAD);
    asm.push(0x04u8).op(OpCode::CALLDATALOAD);
    asm.push_label(&body).op(OpCode::JUMP);
    method_entry(asm, label);
    asm.push(0u8);
    asm.push(0x04u8).op(OpCode::CALLDATALOAD);
    asm.label(&body);
}

/// `testMemExtended` / `testStorageExtended`: for every `i` below the bound,
/// writes `mapping[offset + i] = offset + i` and reads it back, summing the
/// reads into the result.
fn emit_extended(asm: &mut Assembler, label: &str, backing: Backing) {
    let done = format!("{label}_done");
    let loop_label = format!("{label}_loop");
    emit_arguments(asm, label);
    asm.push(0u8).push(ACC).op(OpCode::MSTORE);
    asm.push(0u8);
    asm.label(&loop_label);
    asm.op(OpCode::DUP1).op(OpCode::DUP3).op(OpCode::GT).op(OpCode::ISZERO)
        .push_label(&done).op(OpCode::JUMPI);
    asm.op(OpCode::DUP1).op(OpCode::DUP4).op(OpCode::ADD).op(OpCode::DUP1);
    backing.emit_entry(asm);
    asm.op(backing.store());
    asm.op(OpCode::DUP1).op(OpCode::DUP4).op(OpCode::ADD);
    backing.emit_entry(asm);
    asm.op(backing.load());
    asm.push(ACC).op(OpCode::MLOAD).op(OpCode::ADD).push(ACC).op(OpCode::MSTORE);
    asm.push(1u8).op(OpCode::ADD).push_label(&loop_label).op(OpCode::JUMP);
    asm.label(&done);
    asm.op(OpCode::POP).op(OpCode::POP).op(OpCode::POP);
    asm.push(ACC).op(OpCode::MLOAD).push(RESULT_SLOT).op(OpCode::SSTORE).op(OpCode::STOP);
}

/// `testMemExtended2` / `testStorageExtended2`: writes a single entry at the
/// offset, then reads it back `bound` times, summing into the result.
fn emit_many_reads(asm: &mut Assembler, label: &str, backing: Backing) {
    let done = format!("{label}_done");
    let loop_label = format!("{label}_loop");
    emit_arguments(asm, label);
    asm.op(OpCode::DUP2).op(OpCode::DUP2).op(OpCode::ADD).op(OpCode::DUP3);
    backing.emit_entry(asm);
    asm.op(backing.store());
    asm.push(0u8).push(ACC).op(OpCode::MSTORE);
    asm.push(0u8);
    asm.label(&loop_label);
    asm.op(OpCode::DUP1).op(OpCode::DUP3).op(OpCode::GT).op(OpCode::ISZERO)
        .push_label(&done).op(OpCode::JUMPI);
    asm.op(OpCode::DUP3);
    backing.emit_entry(asm);
    asm.op(backing.load());
    asm.push(ACC).op(OpCode::MLOAD).op(OpCode::ADD).push(ACC).op(OpCode::MSTORE);
    asm.push(1u8).op(OpCode::ADD).push_label(&loop_label).op(OpCode::JUMP);
    asm.label(&done);
    asm.op(OpCode::POP).op(OpCode::POP).op(OpCode::POP);
    asm.push(ACC).op(OpCode::MLOAD).push(RESULT_SLOT).op(OpCode::SSTORE).op(OpCode::STOP);
}

fn emit_fallback(asm: &mut Assembler) {
    asm.label("fallback").push(0u8).push(0u8).op(OpCode::REVERT);
    asm.label("panic").op(OpCode::INVALID);
}

pub fn runtime_code() -> Result<Vec<u8>, asm::Error> {
    let mut asm = Assembler::new();
    dispatcher(&mut asm);
    emit_sanity(&mut asm);
    emit_single(&mut asm, "mem", Backing::Table);
    emit_single(&mut asm, "storage", Backing::Map);
    emit_extended(&mut asm, "mem_extended", Backing::Table);
    emit_extended(&mut asm, "storage_extended", Backing::Map);
    emit_many_reads(&mut asm, "mem_extended2", Backing::Table);
    emit_many_reads(&mut asm, "storage_extended2", Backing::Map);
    emit_fallback(&mut asm);
    asm.build()
}

/// The creation code: copies the runtime behind it into memory and returns it.
pub fn initcode() -> Result<Vec<u8>, asm::Error> {
    let runtime = runtime_code()?;
    let mut asm = Assembler::new();
    asm.push(runtime.len().as_u256())
        .push_label("runtime")
        .push(0u8)
        .op(OpCode::CODECOPY)
        .push(runtime.len().as_u256())
        .push(0u8)
        .op(OpCode::RETURN)
        .mark("runtime")
        .raw(&runtime);
    asm.build()
}

#[cfg(test)]
mod tests {
    use ethnum::uint;
    use super::*;
    use crate::blockchain::Blockchain;
    use crate::blockchain::primitives::{Address, ExecutionStatus, Receipt, Transaction};
    use crate::utils::keccak256_bytes;

    const OPERATOR: Address = Address(uint!("0xF0490D46185BEC962CAC93120B52389748E99C0C"));

    fn deploy() -> (Blockchain, Address) {
        let mut chain = Blockchain::new(uint!("1337"));
        chain.credit(OPERATOR, uint!("0xFFFFFFFFFFFFFFFF"));
        let receipt = chain.deploy(OPERATOR, initcode().unwrap(), 10_000_000).unwrap();
        (chain, receipt.contract_address.unwrap())
    }

    fn call(chain: &mut Blockchain, address: Address, signature: &str, args: &[u256]) -> Receipt {
        chain.call(OPERATOR, address, abi::encode_call(signature, args), 30_000_000).unwrap()
    }

    fn result_slot(chain: &Blockchain, address: Address) -> u256 {
        chain.state.storage.get(&address)
            .and_then(|s| s.0.get(&RESULT_SLOT))
            .map(|v| v.value)
            .unwrap_or_default()
    }

    #[test]
    fn deploys_with_its_runtime_code() {
        let (mut chain, address) = deploy();
        assert_eq!(chain.state.accounts.load(address).value.code, runtime_code().unwrap());
    }

    #[test]
    fn runs_the_sanity_check() {
        let (mut chain, address) = deploy();
        let receipt = call(&mut chain, address, SIG_TEST, &[]);
        assert!(receipt.is_success());
        assert_eq!(result_slot(&chain, address), uint!("1"));
    }

    #[test]
    fn unknown_selectors_revert() {
        let (mut chain, address) = deploy();
        assert_eq!(chain.call(OPERATOR, address, vec![0xDE, 0xAD, 0xBE, 0xEF], 100_000).unwrap().status, ExecutionStatus::Reverted);
        assert_eq!(chain.call(OPERATOR, address, vec![0x01], 100_000).unwrap().status, ExecutionStatus::Reverted);
        assert_eq!(chain.call(OPERATOR, address, vec![], 100_000).unwrap().status, ExecutionStatus::Reverted);
    }

    #[test]
    fn sending_value_reverts() {
        let (mut chain, address) = deploy();
        let nonce = chain.state.accounts.load(OPERATOR).value.nonce;
        let receipt = chain.send(Transaction {
            data: abi::encode_call(SIG_TEST_MEM, &[]),
            from: OPERATOR,
            gas: 1_000_000,
            gas_price: 1,
            nonce,
            to: Some(address),
            value: uint!("1"),
        }).unwrap();
        assert_eq!(receipt.status, ExecutionStatus::Reverted);
    }

    #[test]
    fn both_backings_agree_on_a_single_pair() {
        let (mut chain, address) = deploy();
        call(&mut chain, address, SIG_TEST, &[]);

        let mem = call(&mut chain, address, SIG_TEST_MEM, &[]);
        assert!(mem.is_success());
        assert_eq!(result_slot(&chain, address), uint!("42"));

        let storage = call(&mut chain, address, SIG_TEST_STORAGE, &[]);
        assert!(storage.is_success());
        assert_eq!(result_slot(&chain, address), uint!("42"));

        assert!(mem.gas_used < storage.gas_used);
    }

    #[test]
    fn extended_walks_agree_across_backings() {
        let (mut chain, address) = deploy();
        call(&mut chain, address, SIG_TEST, &[]);

        let mem = call(&mut chain, address, SIG_TEST_MEM_EXTENDED, &[uint!("5")]);
        assert_eq!(result_slot(&chain, address), uint!("10"));
        let storage = call(&mut chain, address, SIG_TEST_STORAGE_EXTENDED, &[uint!("5")]);
        assert_eq!(result_slot(&chain, address), uint!("10"));
        assert!(mem.gas_used < storage.gas_used);

        let mem = call(&mut chain, address, SIG_TEST_MEM_EXTENDED_OFFSET, &[uint!("5"), uint!("100")]);
        assert_eq!(result_slot(&chain, address), uint!("510"));
        let storage = call(&mut chain, address, SIG_TEST_STORAGE_EXTENDED_OFFSET, &[uint!("5"), uint!("100")]);
        assert_eq!(result_slot(&chain, address), uint!("510"));
        assert!(mem.gas_used < storage.gas_used);
    }

    #[test]
    fn repeated_reads_agree_across_backings() {
        let (mut chain, address) = deploy();
        call(&mut chain, address, SIG_TEST, &[]);

        let mem = call(&mut chain, address, SIG_TEST_MEM_EXTENDED2, &[uint!("4")]);
        assert_eq!(result_slot(&chain, address), uint!("16"));
        let storage = call(&mut chain, address, SIG_TEST_STORAGE_EXTENDED2, &[uint!("4")]);
        assert_eq!(result_slot(&chain, address), uint!("16"));
        assert!(mem.gas_used < storage.gas_used);

        let mem = call(&mut chain, address, SIG_TEST_MEM_EXTENDED2_OFFSET, &[uint!("4"), uint!("9")]);
        assert_eq!(result_slot(&chain, address), uint!("52"));
        let storage = call(&mut chain, address, SIG_TEST_STORAGE_EXTENDED2_OFFSET, &[uint!("4"), uint!("9")]);
        assert_eq!(result_slot(&chain, address), uint!("52"));
        assert!(mem.gas_used < storage.gas_used);
    }

    #[test]
    fn mapping_entries_live_at_the_solidity_slots() {
        let (mut chain, address) = deploy();
        call(&mut chain, address, SIG_TEST_STORAGE, &[]);

        let mut preimage = [0u8; 64];
        preimage[31] = SINGLE_KEY;
        preimage[63] = 1;
        let slot = u256::from_be_bytes(keccak256_bytes(&preimage));
        let entry = chain.state.storage.get(&address).unwrap().0.get(&slot).unwrap();
        assert_eq!(entry.value, uint!("42"));
    }
}
