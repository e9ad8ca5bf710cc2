use ethnum::u256;
use crate::blockchain::errors::Error;

// Hard cap on how far a single access may reach, checked before the buffer
// grows.
const MEMORY_LIMIT: usize = 1 << 24;

#[derive(Default)]
pub struct Memory(pub Vec<u8>);

#[derive(Debug, Eq, PartialEq)]
pub struct ReadWriteOperation<T> {
    pub offset: usize,
    pub size: usize,
    pub extension_cost: usize,
    pub result: T,
}

impl Memory {
    pub fn new() -> Self {
        Self(Vec::<u8>::new())
    }

    fn expansion_cost(words: usize) -> usize {
        words * words / 512 + 3 * words
    }

    // Grows the backing buffer to cover [offset, offset + size), a word at a
    // time, and returns the gas cost of the newly touched words.
    fn extend(&mut self, offset: u256, size: u256) -> Result<(usize, usize, usize), Error> {
        let offset: usize = offset.try_into().map_err(|_| Error::MemoryOutOfBounds)?;
        let size: usize = size.try_into().map_err(|_| Error::MemoryOutOfBounds)?;
        let end = offset.checked_add(size).ok_or(Error::MemoryOutOfBounds)?;
        if end > MEMORY_LIMIT { return Err(Error::MemoryOutOfBounds); }
        if size == 0 { return Ok((offset, size, 0)); }

        let current_words = self.0.len() >> 5;
        let needed_words = (end + 31) >> 5;
        if needed_words > current_words {
            self.0.resize(needed_words << 5, 0);
            return Ok((offset, size, Memory::expansion_cost(needed_words) - Memory::expansion_cost(current_words)));
        }
        Ok((offset, size, 0))
    }

    pub fn load(&mut self, offset: u256, size: u256) -> Result<ReadWriteOperation<Vec<u8>>, Error> {
        let (offset, size, extension_cost) = self.extend(offset, size)?;
        let result = if size == 0 { Vec::new() } else { self.0[offset..offset + size].to_vec() };
        Ok(ReadWriteOperation { offset, size, extension_cost, result })
    }

    pub fn load_word(&mut self, offset: u256) -> Result<ReadWriteOperation<u256>, Error> {
        let ReadWriteOperation { offset, size, extension_cost, result } = self.load(offset, u256::from(32u8))?;
        let mut word = [0u8; 32];
        word.copy_from_slice(&result);
        Ok(ReadWriteOperation { offset, size, extension_cost, result: u256::from_be_bytes(word) })
    }

    pub fn store(&mut self, offset: u256, size: u256, value: Vec<u8>) -> Result<ReadWriteOperation<()>, Error> {
        let (offset, size, extension_cost) = self.extend(offset, size)?;
        for (i, v) in value.iter().take(size).enumerate() {
            self.0[offset + i] = *v;
        }
        Ok(ReadWriteOperation { offset, size, extension_cost, result: () })
    }

    pub fn store_word(&mut self, offset: u256, value: u256) -> Result<ReadWriteOperation<()>, Error> {
        self.store(offset, u256::from(32u8), value.to_be_bytes().to_vec())
    }
}
