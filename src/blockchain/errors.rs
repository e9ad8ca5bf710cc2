use ethnum::u256;
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum Error {
    #[error("tried to pop an empty stack")]
    EmptyStack,
    #[error("transaction gas {0} exceeds the block gas limit")]
    GasLimitExceeded(usize),
    #[error("insufficient funds to cover the up-front cost {0}")]
    InsufficientFunds(u256),
    #[error("intrinsic gas too low, needs at least {0}")]
    IntrinsicGasTooLow(usize),
    #[error("value does not fit in a 160-bit address")]
    InvalidAddress,
    #[error("jump to an invalid destination")]
    InvalidJumpDest,
    #[error("transaction nonce {tx} does not match the account nonce {account}")]
    InvalidNonce { tx: usize, account: usize },
    #[error("invalid opcode {0:#04X}")]
    InvalidOpCode(u8),
    #[error("memory access out of bounds")]
    MemoryOutOfBounds,
    #[error("out of gas")]
    OutOfGas,
    #[error("stack limit reached")]
    StackOverflow,
}
