/// A contiguous run of bits inside a byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitField {
    mask: u8,
    shift: u8,
}

impl BitField {
    /// A field that is not present in the encoding. Always reads as 0.
    pub const NONE: BitField = BitField { mask: 0, shift: 0 };

    pub const fn new(mask: u8) -> Self {
        if mask == 0 {
            return Self::NONE;
        }

        let shift = mask.trailing_zeros() as u8;
        let run = mask >> shift;
        assert!(
            run & run.wrapping_add(1) == 0,
            "bit field mask must be a contiguous run of bits"
        );

        Self { mask, shift }
    }

    pub const fn mask(self) -> u8 {
        self.mask
    }

    pub const fn shift(self) -> u8 {
        self.shift
    }

    pub const fn is_present(self) -> bool {
        self.mask != 0
    }

    /// The right-justified value of the field in `byte`.
    pub const fn read(self, byte: u8) -> u8 {
        (byte & self.mask) >> self.shift
    }

    /// `value` moved into the position of the field. Bits that do not fit are dropped.
    pub const fn write(self, value: u8) -> u8 {
        (value << self.shift) & self.mask
    }
}

/// Matches a byte when the given field holds the expected value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchCondition {
    pub field: BitField,
    pub value: u8,
}

impl MatchCondition {
    pub const ALWAYS: MatchCondition = MatchCondition {
        field: BitField::NONE,
        value: 0,
    };

    /// Condition on a right-justified field value, e.g. the reg field of a mod/reg/rm byte.
    pub const fn field(mask: u8, value: u8) -> Self {
        Self {
            field: BitField::new(mask),
            value,
        }
    }

    /// Condition written as a bit pattern in place, e.g. `0xFC` must equal `0b1000_1000`.
    pub const fn pattern(mask: u8, equals: u8) -> Self {
        let field = BitField::new(mask);
        Self {
            field,
            value: field.read(equals),
        }
    }

    pub const fn is_always(self) -> bool {
        !self.field.is_present()
    }

    pub const fn matches(self, byte: u8) -> bool {
        self.field.read(byte) == self.value
    }

    /// The bits of a byte that satisfies this condition, with every other bit clear.
    pub const fn bits(self) -> u8 {
        self.field.write(self.value)
    }
}
