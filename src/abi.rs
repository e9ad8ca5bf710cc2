use ethnum::u256;
use crate::utils::keccak256_bytes;

/// First four bytes of the keccak-256 hash of the canonical signature,
/// e.g. `"transfer(address,uint256)"`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256_bytes(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Encodes a call to `signature`: the selector followed by every argument
/// as a 32-byte big-endian word.
pub fn encode_call(signature: &str, args: &[u256]) -> Vec<u8> {
    let mut data = selector(signature).to_vec();
    for arg in args {
        data.extend_from_slice(&arg.to_be_bytes());
    }
    data
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use ethnum::uint;
    use super::*;

    #[test]
    fn selectors_are_pairwise_distinct() {
        let signatures = [
            "test()",
            "testMem()",
            "testStorage()",
            "testMemExtended(uint256)",
            "testMemExtended(uint256,uint256)",
            "testStorageExtended(uint256)",
            "testStorageExtended(uint256,uint256)",
            "testMemExtended2(uint256)",
            "testMemExtended2(uint256,uint256)",
            "testStorageExtended2(uint256)",
            "testStorageExtended2(uint256,uint256)",
        ];
        let selectors: HashSet<[u8; 4]> = signatures.iter().map(|s| selector(s)).collect();
        assert_eq!(selectors.len(), signatures.len());
    }

    #[test]
    fn overloads_get_their_own_selector() {
        assert_ne!(selector("testMemExtended(uint256)"), selector("testMemExtended(uint256,uint256)"));
    }

    #[test]
    fn encodes_arguments_as_words() {
        let data = encode_call("testMemExtended(uint256)", &[uint!("60")]);
        assert_eq!(data.len(), 36);
        assert_eq!(data[0..4], selector("testMemExtended(uint256)"));
        assert_eq!(data[4..35], [0u8; 31]);
        assert_eq!(data[35], 60);

        let data = encode_call("testMemExtended(uint256,uint256)", &[uint!("60"), uint!("1000")]);
        assert_eq!(data.len(), 68);
        assert_eq!(data[66..68], [0x03, 0xE8]);
    }
}
