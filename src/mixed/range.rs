//! Tag translation between a type list and its sublists.
//!
//! `Super: SplitList<Sub, Map>` holds when every type of `Sub` occurs in
//! `Super`; `Map` lists, for each type of `Sub`, the index at which it is
//! found after the preceding ones have been removed. It is inferred, so the
//! bound doubles as the subset test.

use super::{
    repr::{Split, SumList},
    NarrowRem, Rem,
};
use crate::tag::{Index, UTerm, MAX_VARIANTS};

/// A tag-to-tag lookup table, computed during constant evaluation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TagMap([u8; MAX_VARIANTS]);

impl TagMap {
    pub const EMPTY: TagMap = TagMap([0; MAX_VARIANTS]);

    pub const fn get(&self, tag: u8) -> u8 {
        self.0[tag as usize]
    }

    /// Builds the table of a list whose head maps to `head` and whose `len`
    /// remaining tags map through `rest`, where `rest` was computed against
    /// the super list with `head` removed.
    const fn splice(head: u8, rest: TagMap, len: usize) -> Self {
        let mut table = [0; MAX_VARIANTS];
        table[0] = head;
        let mut tag = 0;
        while tag < len && tag + 1 < MAX_VARIANTS {
            let mapped = rest.0[tag];
            table[tag + 1] = if mapped < head { mapped } else { mapped + 1 };
            tag += 1;
        }
        TagMap(table)
    }
}

/// The trait that type lists implement to be able to be split by another
/// type list.
pub trait SplitList<TList: SumList, UList>: SumList {
    /// The type list left after removing every type of `TList`.
    type Remainder: SumList;

    /// `TAGS.get(t)` is the tag in `Self` of the type tagged `t` in `TList`.
    const TAGS: TagMap;

    #[doc(hidden)]
    fn broaden_tag(tag: u8) -> u8 {
        Self::TAGS.get(tag)
    }

    #[doc(hidden)]
    fn narrow_tag(tag: u8) -> Result<u8, u8>;
}

impl<T: SumList> SplitList<(), ()> for T {
    type Remainder = Self;

    const TAGS: TagMap = TagMap::EMPTY;

    fn broaden_tag(tag: u8) -> u8 {
        unreachable!("mapping tag {tag} from an empty set")
    }

    fn narrow_tag(tag: u8) -> Result<u8, u8> {
        Err(tag)
    }
}

impl<SubHead, SubTail, SuperHead, SuperTail, HeadIndex: Index, TailIndex>
    SplitList<(SubHead, SubTail), (HeadIndex, TailIndex)> for (SuperHead, SuperTail)
where
    SubTail: SumList,
    SuperTail: SumList,
    Self: Split<SubHead, HeadIndex>,
    Rem<Self, SubHead, HeadIndex>: SplitList<SubTail, TailIndex>,
{
    type Remainder = NarrowRem<Rem<Self, SubHead, HeadIndex>, SubTail, TailIndex>;

    const TAGS: TagMap = TagMap::splice(
        HeadIndex::TAG,
        <Rem<Self, SubHead, HeadIndex> as SplitList<SubTail, TailIndex>>::TAGS,
        SubTail::LEN,
    );

    fn narrow_tag(tag: u8) -> Result<u8, u8> {
        Ok(match <Self as Split<SubHead, HeadIndex>>::try_unwrap(tag) {
            Ok(()) => 0,
            Err(remainder) => {
                let ret = <Rem<Self, SubHead, HeadIndex> as SplitList<SubTail, TailIndex>>::narrow_tag(
                    remainder,
                )?;
                <(SubHead, SubTail) as Split<SubHead, UTerm>>::from_remainder(ret)
            }
        })
    }
}
