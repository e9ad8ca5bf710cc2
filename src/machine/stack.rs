use ethnum::u256;
use crate::blockchain::errors::Error;

const STACK_LIMIT: usize = 1024;

#[derive(Default)]
pub struct Stack(pub Vec<u256>);

impl Stack {
    pub fn new() -> Self {
        Self(Vec::<u256>::new())
    }

    pub fn push(&mut self, value: u256) -> Result<(), Error> {
        if self.0.len() == STACK_LIMIT { return Err(Error::StackOverflow); }
        self.0.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<u256> {
        self.0.pop()
    }
}

#[cfg(test)]
mod tests {
    use ethnum::uint;
    use super::*;

    #[test]
    fn pops_in_lifo_order() {
        let mut stack = Stack::new();

        stack.push(uint!("42")).unwrap();
        stack.push(uint!("43")).unwrap();

        assert_eq!(stack.pop(), Some(uint!("43")));
        assert_eq!(stack.pop(), Some(uint!("42")));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn overflows_beyond_the_limit() {
        let mut stack = Stack::new();

        for i in 0..1024u32 {
            assert!(stack.push(u256::from(i)).is_ok());
        }
        assert_eq!(stack.push(uint!("42")), Err(Error::StackOverflow));
        assert_eq!(stack.0.len(), 1024);
    }
}
