//! Type-level tag indices and constant tag sets.
//!
//! A variant's tag is its position in the type list. Positions are spelled as
//! Peano-style types ([`UTerm`], [`UInt`]) so that the compiler can infer them
//! from a variant type, and read back as a `u8` through [`Index::TAG`].

use core::{fmt, marker::PhantomData};

/// The zero index.
pub struct UTerm;

/// The successor of index `U`.
pub struct UInt<U>(PhantomData<U>);

/// A type-level index.
///
/// Evaluating `TAG` past 255 overflows during constant evaluation, which is how
/// lists longer than 256 variants are rejected.
pub trait Index {
    const TAG: u8;
}

impl Index for UTerm {
    const TAG: u8 = 0;
}

impl<U: Index> Index for UInt<U> {
    const TAG: u8 = 1 + U::TAG;
}

#[allow(missing_docs)]
mod aliases {
    use super::*;

    pub type U0 = UTerm;
    pub type U1 = UInt<U0>;
    pub type U2 = UInt<U1>;
    pub type U3 = UInt<U2>;
    pub type U4 = UInt<U3>;
    pub type U5 = UInt<U4>;
    pub type U6 = UInt<U5>;
    pub type U7 = UInt<U6>;
    pub type U8 = UInt<U7>;
    pub type U9 = UInt<U8>;
    pub type U10 = UInt<U9>;
    pub type U11 = UInt<U10>;
    pub type U12 = UInt<U11>;
    pub type U13 = UInt<U12>;
    pub type U14 = UInt<U13>;
    pub type U15 = UInt<U14>;
}

pub use aliases::*;

/// Maximum number of variants a list may declare.
pub const MAX_VARIANTS: usize = 256;

/// A set of tags, usable in constant evaluation.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagSet([u64; 4]);

impl TagSet {
    pub const EMPTY: TagSet = TagSet([0; 4]);

    /// The set holding only `tag`.
    pub const fn single(tag: u8) -> Self {
        Self::EMPTY.with(tag, true)
    }

    /// The set of tags `0..len`.
    pub const fn prefix(len: usize) -> Self {
        let mut set = Self::EMPTY;
        let mut tag = 0;
        while tag < len && tag < MAX_VARIANTS {
            set = set.with(tag as u8, true);
            tag += 1;
        }
        set
    }

    pub const fn contains(self, tag: u8) -> bool {
        self.0[(tag / 64) as usize] & (1 << (tag % 64)) != 0
    }

    /// Returns `self` with `tag` inserted when `present` is true.
    pub const fn with(mut self, tag: u8, present: bool) -> Self {
        if present {
            self.0[(tag / 64) as usize] |= 1 << (tag % 64);
        }
        self
    }

    pub const fn union(self, other: Self) -> Self {
        let mut words = self.0;
        let mut i = 0;
        while i < 4 {
            words[i] |= other.0[i];
            i += 1;
        }
        TagSet(words)
    }

    pub const fn difference(self, other: Self) -> Self {
        let mut words = self.0;
        let mut i = 0;
        while i < 4 {
            words[i] &= !other.0[i];
            i += 1;
        }
        TagSet(words)
    }

    /// Moves every tag one position up. Tag 255 falls off the end.
    pub const fn shift_up(self) -> Self {
        let w = self.0;
        TagSet([
            w[0] << 1,
            (w[1] << 1) | (w[0] >> 63),
            (w[2] << 1) | (w[1] >> 63),
            (w[3] << 1) | (w[2] >> 63),
        ])
    }

    /// Whether every tag in `0..len` belongs to the set.
    pub const fn covers(self, len: usize) -> bool {
        Self::prefix(len).difference(self).is_empty()
    }

    pub const fn len(self) -> u32 {
        self.0[0].count_ones() + self.0[1].count_ones() + self.0[2].count_ones() + self.0[3].count_ones()
    }

    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..=u8::MAX).filter(move |&tag| self.contains(tag))
    }
}

impl fmt::Debug for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
