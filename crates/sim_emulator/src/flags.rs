use bitflags::bitflags;

bitflags! {
    /// Only the status flags that are modeled. Bit positions match the 8086 flags register.
    pub struct Flags : u16 {
        const ZERO = 1 << 6;
        const SIGN = 1 << 7;
    }
}

impl Flags {
    pub const NAMED: [(Flags, &'static str); 2] = [(Flags::ZERO, "ZF"), (Flags::SIGN, "SF")];
}

/// The zero and sign flags. Written by arithmetic instructions, read by conditional branches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlagState {
    flags: Flags,
}

impl Default for FlagState {
    fn default() -> Self {
        Self {
            flags: Flags::empty(),
        }
    }
}

impl FlagState {
    pub fn test(&self, flag: Flags) -> bool {
        self.flags.contains(flag)
    }

    pub fn set(&mut self, flag: Flags, value: bool) {
        self.flags.set(flag, value);
    }

    /// Every modeled flag whose value differs from `other`, as `(name, before, after)`.
    pub fn changes_from(
        &self,
        other: &FlagState,
    ) -> impl Iterator<Item = (&'static str, bool, bool)> + '_ {
        let other = *other;
        Flags::NAMED.into_iter().filter_map(move |(flag, name)| {
            let (before, after) = (other.test(flag), self.test(flag));
            (before != after).then_some((name, before, after))
        })
    }
}

impl std::fmt::Display for FlagState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (flag, name) in Flags::NAMED {
            if self.test(flag) {
                if !first {
                    " ".fmt(f)?;
                }
                name.fmt(f)?;
                first = false;
            }
        }

        if first {
            "-".fmt(f)?;
        }

        Ok(())
    }
}
