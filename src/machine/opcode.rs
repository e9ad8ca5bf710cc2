use crate::blockchain::WorldState;
use crate::blockchain::errors::Error;
use crate::machine::context::{CallContext, TransactionContext};
use crate::machine::instructions::{InstructionResult, Instructions};

#[derive(Clone, Copy, Eq, PartialEq)]
pub struct OpCode(pub u8);

impl OpCode {
    pub const STOP: OpCode = OpCode(0x00);
    pub const ADD: OpCode = OpCode(0x01);
    pub const SUB: OpCode = OpCode(0x03);
    pub const LT: OpCode = OpCode(0x10);
    pub const GT: OpCode = OpCode(0x11);
    pub const EQ: OpCode = OpCode(0x14);
    pub const ISZERO: OpCode = OpCode(0x15);
    pub const SHL: OpCode = OpCode(0x1B);
    pub const SHR: OpCode = OpCode(0x1C);
    pub const KECCAK256: OpCode = OpCode(0x20);
    pub const CALLVALUE: OpCode = OpCode(0x34);
    pub const CALLDATALOAD: OpCode = OpCode(0x35);
    pub const CALLDATASIZE: OpCode = OpCode(0x36);
    pub const CODECOPY: OpCode = OpCode(0x39);
    pub const POP: OpCode = OpCode(0x50);
    pub const MLOAD: OpCode = OpCode(0x51);
    pub const MSTORE: OpCode = OpCode(0x52);
    pub const SLOAD: OpCode = OpCode(0x54);
    pub const SSTORE: OpCode = OpCode(0x55);
    pub const JUMP: OpCode = OpCode(0x56);
    pub const JUMPI: OpCode = OpCode(0x57);
    pub const JUMPDEST: OpCode = OpCode(0x5B);
    pub const DUP1: OpCode = OpCode(0x80);
    pub const DUP2: OpCode = OpCode(0x81);
    pub const DUP3: OpCode = OpCode(0x82);
    pub const DUP4: OpCode = OpCode(0x83);
    pub const RETURN: OpCode = OpCode(0xF3);
    pub const REVERT: OpCode = OpCode(0xFD);
    pub const INVALID: OpCode = OpCode(0xFE);

    pub fn execute(&self, s: &mut WorldState, tctx: &TransactionContext, cctx: &mut CallContext) -> InstructionResult {
        match self.0 {
            0x00 => Instructions::stop(s, tctx, cctx),
            0x01 => Instructions::add(s, tctx, cctx),
            0x03 => Instructions::sub(s, tctx, cctx),
            0x10 => Instructions::lt(s, tctx, cctx),
            0x11 => Instructions::gt(s, tctx, cctx),
            0x14 => Instructions::eq(s, tctx, cctx),
            0x15 => Instructions::iszero(s, tctx, cctx),
            0x1B => Instructions::shl(s, tctx, cctx),
            0x1C => Instructions::shr(s, tctx, cctx),
            0x20 => Instructions::keccak256(s, tctx, cctx),
            0x34 => Instructions::callvalue(s, tctx, cctx),
            0x35 => Instructions::calldataload(s, tctx, cctx),
            0x36 => Instructions::calldatasize(s, tctx, cctx),
            0x39 => Instructions::codecopy(s, tctx, cctx),
            0x50 => Instructions::pop(s, tctx, cctx),
            0x51 => Instructions::mload(s, tctx, cctx),
            0x52 => Instructions::mstore(s, tctx, cctx),
            0x54 => Instructions::sload(s, tctx, cctx),
            0x55 => Instructions::sstore(s, tctx, cctx),
            0x56 => Instructions::jump(s, tctx, cctx),
            0x57 => Instructions::jumpi(s, tctx, cctx),
            0x5B => Instructions::jumpdest(s, tctx, cctx),
            0x5F => Instructions::push::<0>(s, tctx, cctx),
            0x60 => Instructions::push::<1>(s, tctx, cctx),
            0x61 => Instructions::push::<2>(s, tctx, cctx),
            0x62 => Instructions::push::<3>(s, tctx, cctx),
            0x63 => Instructions::push::<4>(s, tctx, cctx),
            0x64 => Instructions::push::<5>(s, tctx, cctx),
            0x65 => Instructions::push::<6>(s, tctx, cctx),
            0x66 => Instructions::push::<7>(s, tctx, cctx),
            0x67 => Instructions::push::<8>(s, tctx, cctx),
            0x68 => Instructions::push::<9>(s, tctx, cctx),
            0x69 => Instructions::push::<10>(s, tctx, cctx),
            0x6A => Instructions::push::<11>(s, tctx, cctx),
            0x6B => Instructions::push::<12>(s, tctx, cctx),
            0x6C => Instructions::push::<13>(s, tctx, cctx),
            0x6D => Instructions::push::<14>(s, tctx, cctx),
            0x6E => Instructions::push::<15>(s, tctx, cctx),
            0x6F => Instructions::push::<16>(s, tctx, cctx),
            0x70 => Instructions::push::<17>(s, tctx, cctx),
            0x71 => Instructions::push::<18>(s, tctx, cctx),
            0x72 => Instructions::push::<19>(s, tctx, cctx),
            0x73 => Instructions::push::<20>(s, tctx, cctx),
            0x74 => Instructions::push::<21>(s, tctx, cctx),
            0x75 => Instructions::push::<22>(s, tctx, cctx),
            0x76 => Instructions::push::<23>(s, tctx, cctx),
            0x77 => Instructions::push::<24>(s, tctx, cctx),
            0x78 => Instructions::push::<25>(s, tctx, cctx),
            0x79 => Instructions::push::<26>(s, tctx, cctx),
            0x7A => Instructions::push::<27>(s, tctx, cctx),
            0x7B => Instructions::push::<28>(s, tctx, cctx),
            0x7C => Instructions::push::<29>(s, tctx, cctx),
            0x7D => Instructions::push::<30>(s, tctx, cctx),
            0x7E => Instructions::push::<31>(s, tctx, cctx),
            0x7F => Instructions::push::<32>(s, tctx, cctx),
            0x80 => Instructions::dup::<1>(s, tctx, cctx),
            0x81 => Instructions::dup::<2>(s, tctx, cctx),
            0x82 => Instructions::dup::<3>(s, tctx, cctx),
            0x83 => Instructions::dup::<4>(s, tctx, cctx),
            0x84 => Instructions::dup::<5>(s, tctx, cctx),
            0x85 => Instructions::dup::<6>(s, tctx, cctx),
            0x86 => Instructions::dup::<7>(s, tctx, cctx),
            0x87 => Instructions::dup::<8>(s, tctx, cctx),
            0x88 => Instructions::dup::<9>(s, tctx, cctx),
            0x89 => Instructions::dup::<10>(s, tctx, cctx),
            0x8A => Instructions::dup::<11>(s, tctx, cctx),
            0x8B => Instructions::dup::<12>(s, tctx, cctx),
            0x8C => Instructions::dup::<13>(s, tctx, cctx),
            0x8D => Instructions::dup::<14>(s, tctx, cctx),
            0x8E => Instructions::dup::<15>(s, tctx, cctx),
            0x8F => Instructions::dup::<16>(s, tctx, cctx),
            0x90 => Instructions::swap::<2>(s, tctx, cctx),
            0x91 => Instructions::swap::<3>(s, tctx, cctx),
            0x92 => Instructions::swap::<4>(s, tctx, cctx),
            0x93 => Instructions::swap::<5>(s, tctx, cctx),
            0x94 => Instructions::swap::<6>(s, tctx, cctx),
            0x95 => Instructions::swap::<7>(s, tctx, cctx),
            0x96 => Instructions::swap::<8>(s, tctx, cctx),
            0x97 => Instructions::swap::<9>(s, tctx, cctx),
            0x98 => Instructions::swap::<10>(s, tctx, cctx),
            0x99 => Instructions::swap::<11>(s, tctx, cctx),
            0x9A => Instructions::swap::<12>(s, tctx, cctx),
            0x9B => Instructions::swap::<13>(s, tctx, cctx),
            0x9C => Instructions::swap::<14>(s, tctx, cctx),
            0x9D => Instructions::swap::<15>(s, tctx, cctx),
            0x9E => Instructions::swap::<16>(s, tctx, cctx),
            0x9F => Instructions::swap::<17>(s, tctx, cctx),
            0xF3 => Instructions::r#return(s, tctx, cctx),
            0xFD => Instructions::revert(s, tctx, cctx),
            0xFE => Instructions::invalid(s, tctx, cctx),
            _ => Err(Error::InvalidOpCode(self.0)),
        }
    }
}

impl std::fmt::Debug for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            0x00 => write!(f, "STOP"),
            0x01 => write!(f, "ADD"),
            0x03 => write!(f, "SUB"),
            0x10 => write!(f, "LT"),
            0x11 => write!(f, "GT"),
            0x14 => write!(f, "EQ"),
            0x15 => write!(f, "ISZERO"),
            0x1B => write!(f, "SHL"),
            0x1C => write!(f, "SHR"),
            0x20 => write!(f, "KECCAK256"),
            0x34 => write!(f, "CALLVALUE"),
            0x35 => write!(f, "CALLDATALOAD"),
            0x36 => write!(f, "CALLDATASIZE"),
            0x39 => write!(f, "CODECOPY"),
            0x50 => write!(f, "POP"),
            0x51 => write!(f, "MLOAD"),
            0x52 => write!(f, "MSTORE"),
            0x54 => write!(f, "SLOAD"),
            0x55 => write!(f, "SSTORE"),
            0x56 => write!(f, "JUMP"),
            0x57 => write!(f, "JUMPI"),
            0x5B => write!(f, "JUMPDEST"),
            0x5F..=0x7F => write!(f, "PUSH{}", self.0 - 0x5F),
            0x80..=0x8F => write!(f, "DUP{}", self.0 - 0x7F),
            0x90..=0x9F => write!(f, "SWAP{}", self.0 - 0x8F),
            0xF3 => write!(f, "RETURN"),
            0xFD => write!(f, "REVERT"),
            0xFE => write!(f, "INVALID"),
            _ => write!(f, "UNKNOWN({:#04X})", self.0),
        }
    }
}
