//! An embedded EVM with a benchmark contract on top, comparing the gas cost
//! of a memory-backed mapping against a storage-backed one.

pub mod abi;
pub mod asm;
pub mod blockchain;
pub mod contract;
pub mod harness;
pub mod machine;
pub mod utils;
