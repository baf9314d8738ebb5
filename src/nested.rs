//! Heap-held unions for recursive and oversized variants.

use core::{
    fmt,
    ops::{Deref, DerefMut},
};

use crate::{
    boxed::Boxed,
    fatal,
    mixed::{
        ops::{SumClone, SumDebug, SumPartialEq},
        repr::{Split, SumList},
        Mixed,
    },
    tag::Index,
};

/// A [`Mixed<S>`] kept behind a pointer, so that it can be a variant of a
/// union, including one of its own variants.
///
/// ```
/// use exl::{Mixed, Nested};
///
/// type Inner = Nested<exl::T![u64, String]>;
/// let m: Mixed![u64, Inner] = Mixed::new(Inner::make::<String, _>(|| "hi".into()));
/// let inner = m.unwrap_exact::<Inner, _>();
/// assert_eq!(inner.get::<String, _>().map(String::as_str), Some("hi"));
/// ```
pub struct Nested<S: SumList>(Boxed<Mixed<S>>);

impl<S: SumList> Nested<S> {
    /// Builds the variant `T` directly inside the heap storage.
    ///
    /// Terminates the process if the allocation fails.
    #[track_caller]
    pub fn make<T, U>(make: impl FnOnce() -> T) -> Self
    where
        S: Split<T, U>,
        U: Index,
    {
        Self::wrap(Boxed::make_with(|| Mixed::make(make)))
    }

    #[track_caller]
    pub fn new(mixed: Mixed<S>) -> Self {
        Self::wrap(Boxed::make(mixed))
    }

    #[track_caller]
    fn wrap(boxed: Boxed<Mixed<S>>) -> Self {
        if !boxed.is_valid() {
            fatal::violation(format_args!("out of memory for a nested mixed value"))
        }
        Nested(boxed)
    }

    pub fn into_inner(self) -> Mixed<S> {
        match self.0.into_inner() {
            Some(mixed) => mixed,
            None => fatal::violation(format_args!("nested mixed value without storage")),
        }
    }
}

impl<S: SumList> From<Mixed<S>> for Nested<S> {
    fn from(mixed: Mixed<S>) -> Self {
        Nested::new(mixed)
    }
}

impl<S: SumList> Deref for Nested<S> {
    type Target = Mixed<S>;

    fn deref(&self) -> &Mixed<S> {
        &self.0
    }
}

impl<S: SumList> DerefMut for Nested<S> {
    fn deref_mut(&mut self) -> &mut Mixed<S> {
        &mut self.0
    }
}

impl<S: SumClone> Clone for Nested<S> {
    fn clone(&self) -> Self {
        Nested::new((**self).clone())
    }

    fn clone_from(&mut self, source: &Self) {
        (**self).clone_from(&**source)
    }
}

impl<S: SumDebug> fmt::Debug for Nested<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl<S: SumPartialEq> PartialEq for Nested<S> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}
