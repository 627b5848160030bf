use crate::{Displacement, Form, Immediate, Instruction, MemoryAccess, Operand, OperandSize};
use std::fmt::{Display, Formatter};

impl Display for Immediate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Immediate::Byte(value) => write!(f, "{}", value),
            Immediate::Word(value) => write!(f, "{}", value),
            Immediate::SignExtended(value) => write!(f, "{}", value),
        }
    }
}

impl Display for MemoryAccess {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Some(base) = self.base else {
            return write!(f, "[{}]", self.displacement.value());
        };

        "[".fmt(f)?;
        for (i, term) in base.terms().iter().flatten().enumerate() {
            if i > 0 {
                " + ".fmt(f)?;
            }
            crate::RegisterAccess::word(*term).fmt(f)?;
        }

        let offset = match self.displacement {
            Displacement::None => 0,
            Displacement::Byte(offset) => offset as i32,
            Displacement::Word(offset) => offset as i32,
        };
        if offset < 0 {
            write!(f, " - {}", -offset)?;
        } else if offset > 0 {
            write!(f, " + {}", offset)?;
        }

        "]".fmt(f)
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Register(access) => access.fmt(f),
            Operand::Memory(access) => access.fmt(f),
            Operand::Immediate(immediate) => immediate.fmt(f),
            Operand::None => Ok(()),
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ", self.mnemonic)?;

        if let (Form::Branch, Some(displacement)) = (self.form, self.branch_displacement()) {
            // Relative to the start of the instruction, the way nasm expects `$` targets.
            let offset = displacement as isize + self.len() as isize;
            return write!(f, "${:+}", offset);
        }

        if let (Operand::Memory(access), Operand::Immediate(_)) = (self.destination, self.source) {
            match access.size {
                OperandSize::Byte => "byte ".fmt(f)?,
                OperandSize::Word => "word ".fmt(f)?,
            }
        }
        self.destination.fmt(f)?;

        if !self.source.is_none() {
            write!(f, ", {}", self.source)?;
        }

        Ok(())
    }
}
