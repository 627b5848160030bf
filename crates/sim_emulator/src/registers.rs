use sim_instruction::{OperandSize, Register, RegisterAccess};

/// The eight general purpose registers.
///
/// Each slot holds a word; the byte registers are computed from it. Byte encodings 0-3 are the
/// low halves of `ax`..`bx` and 4-7 their high halves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    slots: [u16; 8],
    /// The target of the most recent [RegisterFile::write].
    last_write: Option<RegisterAccess>,
}

impl RegisterFile {
    pub fn read(&self, access: RegisterAccess) -> u16 {
        let encoding = access.register().encoding() as usize;
        match access.size() {
            OperandSize::Word => self.slots[encoding],
            OperandSize::Byte => {
                let slot = self.slots[encoding & 0b11];
                if encoding & 0b100 == 0b100 {
                    slot >> 8
                } else {
                    slot & 0x00FF
                }
            }
        }
    }

    /// Byte writes store the low byte of `value` and leave the other half of the slot untouched.
    pub fn write(&mut self, access: RegisterAccess, value: u16) {
        self.last_write = Some(access);

        let encoding = access.register().encoding() as usize;
        match access.size() {
            OperandSize::Word => self.slots[encoding] = value,
            OperandSize::Byte => {
                let slot = &mut self.slots[encoding & 0b11];
                *slot = if encoding & 0b100 == 0b100 {
                    (*slot & 0x00FF) | ((value & 0x00FF) << 8)
                } else {
                    (*slot & 0xFF00) | (value & 0x00FF)
                };
            }
        }
    }

    /// The register written since the last call, even if the value it holds did not change.
    pub fn take_last_write(&mut self) -> Option<RegisterAccess> {
        self.last_write.take()
    }

    pub fn word(&self, register: Register) -> u16 {
        self.read(RegisterAccess::word(register))
    }

    pub fn set_word(&mut self, register: Register, value: u16) {
        self.write(RegisterAccess::word(register), value);
    }

    /// Every register with its word value, in encoding order.
    pub fn iter(&self) -> impl Iterator<Item = (Register, u16)> + '_ {
        Register::ALL.into_iter().map(|register| (register, self.word(register)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Register::*;

    #[test]
    fn low_and_high_halves_are_independent() {
        let mut registers = RegisterFile::default();

        registers.write(RegisterAccess::byte(AhSp), 0x12);
        registers.write(RegisterAccess::byte(AlAx), 0x34);
        assert_eq!(registers.word(AlAx), 0x1234);

        registers.write(RegisterAccess::byte(AlAx), 0xFF);
        assert_eq!(registers.read(RegisterAccess::byte(AhSp)), 0x12);

        registers.write(RegisterAccess::byte(AhSp), 0x00);
        assert_eq!(registers.read(RegisterAccess::byte(AlAx)), 0xFF);
        assert_eq!(registers.word(AlAx), 0x00FF);
    }

    #[test]
    fn byte_encodings_alias_the_first_four_slots() {
        let mut registers = RegisterFile::default();
        registers.set_word(BlBx, 0xABCD);
        registers.set_word(BhDi, 0x1111);

        // Encoding 7 as a byte is bh, the high half of bx.
        assert_eq!(registers.read(RegisterAccess::byte(BhDi)), 0xAB);
        assert_eq!(registers.read(RegisterAccess::byte(BlBx)), 0xCD);
        assert_eq!(registers.read(RegisterAccess::word(BhDi)), 0x1111);

        registers.write(RegisterAccess::byte(DhSi), 0x1FF);
        assert_eq!(registers.word(DlDx), 0xFF00);
        assert_eq!(registers.word(DhSi), 0x0000);
    }

    #[test]
    fn remembers_the_last_write() {
        let mut registers = RegisterFile::default();
        assert_eq!(registers.take_last_write(), None);

        registers.write(RegisterAccess::byte(AlAx), 0);
        registers.set_word(ClCx, 0);
        assert_eq!(registers.take_last_write(), Some(RegisterAccess::word(ClCx)));
        assert_eq!(registers.take_last_write(), None);

        registers.read(RegisterAccess::word(DlDx));
        assert_eq!(registers.take_last_write(), None);
    }

    #[test]
    fn iterates_in_encoding_order() {
        let mut registers = RegisterFile::default();
        registers.set_word(ClCx, 3);
        let values: Vec<_> = registers.iter().map(|(_, value)| value).collect();
        assert_eq!(values, vec![0, 3, 0, 0, 0, 0, 0, 0]);
    }
}
