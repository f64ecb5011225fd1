/*!
isa.rs - The per-cell instruction table.

Each slot holds one subleq primitive as an explicit byte pair:

```text
target  - local memory address (< 250) or bus line (250..=253)
jump    - program counter value loaded when the result is <= 0
```

A slot whose `jump` is the program counter's own address (0) terminates a
macro-instruction chain and is never executed. A zeroed table is therefore
256 terminators, i.e. every index is a no-op.
*/

use crate::cell::state::{ISA_SIZE, LOC_PC};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub target: u8,
    pub jump: u8,
}

impl Instruction {
    /// Chain terminator (jump target 0).
    pub const END: Instruction = Instruction { target: 0, jump: 0 };

    #[inline]
    pub const fn new(target: u8, jump: u8) -> Self {
        Self { target, jump }
    }

    #[inline]
    pub fn is_terminator(self) -> bool {
        self.jump as usize == LOC_PC
    }
}

/// 256 instruction slots, indexed by the byte fetched from local memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstructionTable {
    slots: [Instruction; ISA_SIZE],
}

impl Default for InstructionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl InstructionTable {
    pub fn new() -> Self {
        Self {
            slots: [Instruction::END; ISA_SIZE],
        }
    }

    #[inline]
    pub fn get(&self, index: u8) -> Instruction {
        self.slots[index as usize]
    }

    #[inline]
    pub fn set(&mut self, index: u8, ins: Instruction) {
        self.slots[index as usize] = ins;
    }

    /// Write one byte of a slot: the target half when `high` is false, the
    /// jump half otherwise. Used by byte-serial table loading.
    #[inline]
    pub fn write_half(&mut self, index: u8, high: bool, value: u8) {
        let slot = &mut self.slots[index as usize];
        if high {
            slot.jump = value;
        } else {
            slot.target = value;
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[Instruction] {
        &self.slots
    }
}
