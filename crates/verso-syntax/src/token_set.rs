use crate::SyntaxKind;

const SLOTS: usize = 1;

/// Bitset over token kinds, usable in `const` position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenSet {
    bits: [u64; SLOTS],
}

impl TokenSet {
    pub const EMPTY: Self = Self { bits: [0; SLOTS] };
    const BITS_PER_SLOT: u16 = u64::BITS as u16;

    const fn from_kind(kind: SyntaxKind) -> Self {
        let kind = kind as u16;
        let slot = (kind / Self::BITS_PER_SLOT) as usize;

        debug_assert!(slot < SLOTS, "Index out of bounds. Increase the number of slots.");

        let mut bits = Self::EMPTY.bits;
        bits[slot] = 1 << (kind % Self::BITS_PER_SLOT);
        Self { bits }
    }

    pub const fn new<const N: usize>(kinds: [SyntaxKind; N]) -> Self {
        let mut set = Self::EMPTY;

        let mut i = 0;
        while i < kinds.len() {
            set = set.union(Self::from_kind(kinds[i]));
            i += 1;
        }

        set
    }

    pub const fn union(mut self, other: Self) -> Self {
        let mut i = 0;
        while i < SLOTS {
            self.bits[i] |= other.bits[i];
            i += 1;
        }
        self
    }

    pub const fn with(self, kind: SyntaxKind) -> Self {
        self.union(Self::from_kind(kind))
    }

    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        let slot = (kind / Self::BITS_PER_SLOT) as usize;
        self.bits[slot] & (1 << (kind % Self::BITS_PER_SLOT)) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership() {
        const SET: TokenSet = TokenSet::new([SyntaxKind::TEXT, SyntaxKind::EOF]);
        assert!(SET.contains(SyntaxKind::TEXT));
        assert!(SET.contains(SyntaxKind::EOF));
        assert!(!SET.contains(SyntaxKind::ELEMENT_OPEN));
        assert!(SET.with(SyntaxKind::ELEMENT_OPEN).contains(SyntaxKind::ELEMENT_OPEN));
        assert!(!TokenSet::EMPTY.contains(SyntaxKind::WHITESPACE));
    }

    #[test]
    fn trivia() {
        assert!(SyntaxKind::LINE_BREAK.is_trivia());
        assert!(SyntaxKind::STYLE_COMMENT.is_trivia());
        assert!(!SyntaxKind::COMMENT_TEXT.is_trivia());
    }
}
