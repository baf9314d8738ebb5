//! Optional values built on [`Mixed`].
//!
//! [`Optional<T>`] holds either a `T` or [`Nothing`]. [`MixedOption<S>`] holds
//! either one of the variants of `S` or [`Nothing`]; [`Nothing`] always takes
//! tag 0.

use core::{
    any, fmt,
    hash::{Hash, Hasher},
    mem,
    ops::{Deref, DerefMut},
};

use crate::{
    fatal,
    mixed::{
        ops::{SumClone, SumDebug, SumHash, SumMeta, SumPartialEq},
        range::SplitList,
        repr::{Split, SumList},
        Mixed,
    },
    none::Nothing,
    tag::{Index, UInt, UTerm},
};

type Some0 = UTerm;
type None1 = UInt<UTerm>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Optional<T>(Mixed<(T, (Nothing, ()))>);

impl<T> Optional<T> {
    pub fn make_some(value: T) -> Self {
        Optional(Mixed::new::<T, Some0>(value))
    }

    pub fn make_none() -> Self {
        Optional(Mixed::new::<Nothing, None1>(Nothing))
    }

    pub fn is_some(&self) -> bool {
        self.0.holds::<T, Some0>()
    }

    pub fn is_none(&self) -> bool {
        self.0.holds::<Nothing, None1>()
    }

    /// Terminates the process if empty.
    #[track_caller]
    pub fn unwrap_some(&self) -> &T {
        self.0.unwrap_exact::<T, Some0>()
    }

    #[track_caller]
    pub fn unwrap_some_mut(&mut self) -> &mut T {
        self.0.unwrap_exact_mut::<T, Some0>()
    }

    /// Moves the value out, leaving the option empty.
    pub fn take(&mut self) -> Option<T> {
        mem::replace(self, Self::make_none()).into_option()
    }

    pub fn into_option(self) -> Option<T> {
        self.0.try_unwrap::<T, Some0>().ok()
    }

    pub fn as_option(&self) -> Option<&T> {
        self.0.get::<T, Some0>()
    }

    pub fn into_mixed(self) -> Mixed<(T, (Nothing, ()))> {
        self.0
    }
}

impl<T> Default for Optional<T> {
    fn default() -> Self {
        Self::make_none()
    }
}

impl<T> From<Option<T>> for Optional<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::make_some(value),
            None => Self::make_none(),
        }
    }
}

impl<T> From<Optional<T>> for Option<T> {
    fn from(value: Optional<T>) -> Self {
        value.into_option()
    }
}

impl<T> Deref for Optional<T> {
    type Target = Mixed<(T, (Nothing, ()))>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Optional<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Either [`Nothing`] or one of the variants of `S`.
pub struct MixedOption<S: SumList>(Mixed<(Nothing, S)>);

impl<S: SumList> MixedOption<S> {
    pub fn make<T, U>(value: T) -> Self
    where
        S: Split<T, U>,
        U: Index,
    {
        MixedOption(Mixed::new::<T, UInt<U>>(value))
    }

    pub fn make_none() -> Self {
        MixedOption(Mixed::new::<Nothing, UTerm>(Nothing))
    }

    /// Wraps a union over a sublist of `S`.
    pub fn from_subset<S2, UMap>(mixed: Mixed<S2>) -> Self
    where
        S2: SumList,
        S: SplitList<S2, UMap>,
    {
        MixedOption(mixed.broaden::<S, UMap>().shift())
    }

    pub fn is_none(&self) -> bool {
        self.0.holds::<Nothing, UTerm>()
    }

    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Moves out the value, which must be exactly `T`, leaving the option
    /// empty.
    ///
    /// Terminates the process if the option holds anything else.
    #[track_caller]
    pub fn take<T, U>(&mut self) -> T
    where
        S: Split<T, U> + SumMeta,
        U: Index,
    {
        let found = self.0.type_name();
        match mem::replace(self, Self::make_none())
            .0
            .try_unwrap::<T, UInt<U>>()
        {
            Ok(value) => value,
            Err(_) => fatal::violation(format_args!(
                "took `{}` from a mixed option holding `{found}`",
                any::type_name::<T>()
            )),
        }
    }

    /// The held union, or `None` when empty.
    pub fn into_mixed(self) -> Option<Mixed<S>> {
        self.0.try_unwrap::<Nothing, UTerm>().err()
    }
}

impl<S: SumList> Default for MixedOption<S> {
    fn default() -> Self {
        Self::make_none()
    }
}

impl<S: SumList> From<Mixed<S>> for MixedOption<S> {
    fn from(mixed: Mixed<S>) -> Self {
        MixedOption(mixed.shift())
    }
}

impl<S: SumList> Deref for MixedOption<S> {
    type Target = Mixed<(Nothing, S)>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: SumList> DerefMut for MixedOption<S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<S: SumClone> Clone for MixedOption<S> {
    fn clone(&self) -> Self {
        MixedOption(self.0.clone())
    }

    fn clone_from(&mut self, source: &Self) {
        self.0.clone_from(&source.0)
    }
}

impl<S: SumDebug> fmt::Debug for MixedOption<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MixedOption").field(&self.0).finish()
    }
}

impl<S: SumPartialEq> PartialEq for MixedOption<S> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<S: SumHash> Hash for MixedOption<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}
