use ethnum::u256;
use sha3::{Digest, Keccak256};

pub trait Hash {
    fn keccak256(&self) -> u256;
}

impl Hash for [u8] {
    fn keccak256(&self) -> u256 {
        u256::from_be_bytes(keccak256_bytes(self))
    }
}

pub fn keccak256_bytes(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}
