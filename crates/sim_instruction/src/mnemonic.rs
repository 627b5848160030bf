#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    // Data transfer
    MOV, // Move

    // Arithmetic
    ADD, // Add
    SUB, // Subtract
    CMP, // Compare

    // Control transfer
    JE,     // Jump on equal/zero (alias JZ)
    JL,     // Jump on less/not greater or equal (alias JNGE)
    JLE,    // Jump on less or equal/not greater (alias JNG)
    JB,     // Jump on below/not above or equal (alias JNAE)
    JBE,    // Jump on below or equal/not above (alias JNA)
    JP,     // Jump on parity/parity even (alias JPE)
    JO,     // Jump on overflow
    JS,     // Jump on sign
    JNE,    // Jump on not equal/not zero (alias JNZ)
    JNL,    // Jump on not less/greater or equal (alias JGE)
    JG,     // Jump on not less or equal/greater (alias JNLE)
    JNB,    // Jump on not below/above or equal (alias JAE)
    JA,     // Jump on not below or equal/above (alias JNBE)
    JNP,    // Jump on not parity/parity odd (alias JPO)
    JNO,    // Jump on not overflow
    JNS,    // Jump on not sign
    LOOP,   // Loop CX times
    LOOPZ,  // Loop while zero/equal (alias LOOPE)
    LOOPNZ, // Loop while not zero/not equal (alias LOOPNE)
    JCXZ,   // Jump on CX zero
}

impl Mnemonic {
    pub fn is_arithmetic(self) -> bool {
        matches!(self, Mnemonic::ADD | Mnemonic::SUB | Mnemonic::CMP)
    }

    pub fn name(self) -> &'static str {
        use Mnemonic::*;

        match self {
            MOV => "mov",
            ADD => "add",
            SUB => "sub",
            CMP => "cmp",
            JE => "je",
            JL => "jl",
            JLE => "jle",
            JB => "jb",
            JBE => "jbe",
            JP => "jp",
            JO => "jo",
            JS => "js",
            JNE => "jne",
            JNL => "jnl",
            JG => "jg",
            JNB => "jnb",
            JA => "ja",
            JNP => "jnp",
            JNO => "jno",
            JNS => "jns",
            LOOP => "loop",
            LOOPZ => "loopz",
            LOOPNZ => "loopnz",
            JCXZ => "jcxz",
        }
    }
}

impl std::fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}
