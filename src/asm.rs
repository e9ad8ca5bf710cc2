use std::collections::HashMap;
use ethnum::u256;
use thiserror::Error;
use crate::machine::opcode::OpCode;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum Error {
    #[error("label {0} is bound more than once")]
    DuplicateLabel(String),
    #[error("label {0} is referenced but never bound")]
    UnknownLabel(String),
    #[error("label {0} does not fit in a 16-bit immediate")]
    LabelOutOfRange(String),
}

struct Fixup {
    at: usize,
    label: String,
}

/// A small bytecode builder. Jump targets are symbolic labels, emitted as
/// 16-bit PUSH2 immediates and resolved in [`Assembler::build`].
#[derive(Default)]
pub struct Assembler {
    code: Vec<u8>,
    duplicates: Vec<String>,
    fixups: Vec<Fixup>,
    labels: HashMap<String, usize>,
}

impl Assembler {
    pub fn new() -> Self {
        Assembler::default()
    }

    pub fn op(&mut self, opcode: OpCode) -> &mut Self {
        self.code.push(opcode.0);
        self
    }

    /// Pushes a constant with the narrowest PUSH variant that holds it.
    pub fn push<V: Into<u256>>(&mut self, value: V) -> &mut Self {
        let value: u256 = value.into();
        let bytes = value.to_be_bytes();
        let skip = bytes.iter().take_while(|b| **b == 0).count();
        let width = 32 - skip;
        self.code.push(0x5F + width as u8);
        self.code.extend_from_slice(&bytes[skip..]);
        self
    }

    /// Pushes the address of a label, resolved at build time.
    pub fn push_label(&mut self, label: &str) -> &mut Self {
        self.code.push(0x61);
        self.fixups.push(Fixup { at: self.code.len(), label: label.to_string() });
        self.code.extend_from_slice(&[0x00, 0x00]);
        self
    }

    /// Binds a label to the current position without emitting anything.
    pub fn mark(&mut self, label: &str) -> &mut Self {
        if self.labels.insert(label.to_string(), self.code.len()).is_some() {
            self.duplicates.push(label.to_string());
        }
        self
    }

    /// Binds a label and emits the JUMPDEST it points at.
    pub fn label(&mut self, label: &str) -> &mut Self {
        self.mark(label);
        self.op(OpCode::JUMPDEST)
    }

    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.code.extend_from_slice(bytes);
        self
    }

    pub fn build(mut self) -> Result<Vec<u8>, Error> {
        if let Some(label) = self.duplicates.first() {
            return Err(Error::DuplicateLabel(label.clone()));
        }
        for fixup in &self.fixups {
            let target = match self.labels.get(&fixup.label) {
                Some(target) => *target,
                None => return Err(Error::UnknownLabel(fixup.label.clone())),
            };
            let target: u16 = match target.try_into() {
                Ok(target) => target,
                Err(_) => return Err(Error::LabelOutOfRange(fixup.label.clone())),
            };
            self.code[fixup.at..fixup.at + 2].copy_from_slice(&target.to_be_bytes());
        }
        Ok(self.code)
    }
}
