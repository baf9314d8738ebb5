//! Structural "is-a" relations between variant types.
//!
//! Rust has no inheritance, so a derived type holds its base as a field and
//! declares the relation with [`class!`]. Every declared type carries a
//! constant [`Lineage`]: its own [`ClassId`] followed by those of its bases.
//! Only single inheritance is expressible, one base per class.
//!
//! From the lineages of a list's variants, [`Hierarchy`] computes for a query
//! type `U` the constant set of tags whose type is `U` or derives from it, and
//! upcasts the live variant to `&U` by walking base fields.
//!
//! ```rust
//! use exl::{class, Mixed};
//!
//! struct Exception {
//!     what: &'static str,
//! }
//! struct RuntimeError {
//!     base: Exception,
//! }
//!
//! class!(Exception);
//! class!(RuntimeError: Exception => base);
//!
//! let m: Mixed![RuntimeError, i32] = Mixed::new(RuntimeError {
//!     base: Exception { what: "boom" },
//! });
//! assert!(m.is::<Exception>());
//! assert!(!m.is_exact::<Exception>());
//! assert_eq!(m.unwrap::<Exception>().what, "boom");
//! ```
//!
//! [`class!`]: crate::class

use core::fmt;

use super::repr::{Nil, SumList};
use crate::tag::TagSet;

/// The identity of a class, unique per declared type.
///
/// The id is the type's path followed by the source location of its
/// [`class!`](crate::class) declaration, so same-named types from different
/// scopes or crate versions never share one.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(&'static str);

impl ClassId {
    pub const fn new(path: &'static str) -> Self {
        ClassId(path)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }

    /// The declared type's path, without the declaration site.
    pub fn name(self) -> &'static str {
        match self.0.split_once('@') {
            Some((name, _)) => name,
            None => self.0,
        }
    }

    /// Equality usable in constant evaluation.
    pub const fn same(self, other: ClassId) -> bool {
        let (a, b) = (self.0.as_bytes(), other.0.as_bytes());
        if a.len() != b.len() {
            return false;
        }
        let mut i = 0;
        while i < a.len() {
            if a[i] != b[i] {
                return false;
            }
            i += 1;
        }
        true
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A class and its chain of bases, most derived first.
#[derive(Debug)]
pub struct Lineage {
    id: ClassId,
    base: Option<&'static Lineage>,
}

impl Lineage {
    pub const fn root(id: ClassId) -> Self {
        Lineage { id, base: None }
    }

    pub const fn derived(id: ClassId, base: &'static Lineage) -> Self {
        Lineage {
            id,
            base: Some(base),
        }
    }

    pub const fn id(&self) -> ClassId {
        self.id
    }

    pub const fn base(&self) -> Option<&'static Lineage> {
        self.base
    }

    /// Whether this class is `id` or derives from it.
    pub const fn descends_from(&self, id: ClassId) -> bool {
        let mut cur = Some(self);
        while let Some(lineage) = cur {
            if lineage.id.same(id) {
                return true;
            }
            cur = lineage.base;
        }
        false
    }

    /// Number of bases above this class.
    pub const fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cur = self.base;
        while let Some(lineage) = cur {
            depth += 1;
            cur = lineage.base;
        }
        depth
    }
}

/// A type taking part in structural matching.
///
/// Implement it with [`class!`] rather than by hand.
///
/// # Safety
///
/// `LINEAGE.id()` must be unique to the implementing type: values are
/// reinterpreted between two types whose ids compare equal.
///
/// [`class!`]: crate::class
pub unsafe trait Class {
    const LINEAGE: &'static Lineage;

    /// Views `self` as `U` if it is `U` or derives from it.
    fn upcast<U: Class>(&self) -> Option<&U>;

    fn upcast_mut<U: Class>(&mut self) -> Option<&mut U>;
}

/// Reinterprets `value` as `U` when both are the same class.
pub fn cast_ref<T: Class, U: Class>(value: &T) -> Option<&U> {
    T::LINEAGE
        .id()
        .same(U::LINEAGE.id())
        .then(|| unsafe { &*(value as *const T).cast::<U>() })
}

pub fn cast_mut<T: Class, U: Class>(value: &mut T) -> Option<&mut U> {
    T::LINEAGE
        .id()
        .same(U::LINEAGE.id())
        .then(|| unsafe { &mut *(value as *mut T).cast::<U>() })
}

#[doc(hidden)]
#[macro_export]
macro_rules! class_id {
    ($ty:ty) => {
        ::core::concat!(
            ::core::module_path!(),
            "::",
            ::core::stringify!($ty),
            "@",
            ::core::file!(),
            ":",
            ::core::line!(),
            ":",
            ::core::column!()
        )
    };
}

/// Declares types as classes for structural matching.
///
/// `class!(A, B, C)` declares root classes. `class!(Derived: Base => field)`
/// declares `Derived` as deriving from `Base`, whose value is held in
/// `field` (a named field or a tuple index).
#[macro_export]
macro_rules! class {
    ($ty:ty : $base:ty => $field:tt) => {
        unsafe impl $crate::mixed::class::Class for $ty {
            const LINEAGE: &'static $crate::mixed::class::Lineage =
                &$crate::mixed::class::Lineage::derived(
                    $crate::mixed::class::ClassId::new($crate::class_id!($ty)),
                    <$base as $crate::mixed::class::Class>::LINEAGE,
                );

            fn upcast<U: $crate::mixed::class::Class>(&self) -> ::core::option::Option<&U> {
                match $crate::mixed::class::cast_ref::<Self, U>(self) {
                    ::core::option::Option::Some(this) => ::core::option::Option::Some(this),
                    ::core::option::Option::None => {
                        <$base as $crate::mixed::class::Class>::upcast::<U>(&self.$field)
                    }
                }
            }

            fn upcast_mut<U: $crate::mixed::class::Class>(
                &mut self,
            ) -> ::core::option::Option<&mut U> {
                if <U as $crate::mixed::class::Class>::LINEAGE
                    .id()
                    .same(<Self as $crate::mixed::class::Class>::LINEAGE.id())
                {
                    $crate::mixed::class::cast_mut::<Self, U>(self)
                } else {
                    <$base as $crate::mixed::class::Class>::upcast_mut::<U>(&mut self.$field)
                }
            }
        }
    };
    ($($ty:ty),+ $(,)?) => {
        $(
            unsafe impl $crate::mixed::class::Class for $ty {
                const LINEAGE: &'static $crate::mixed::class::Lineage =
                    &$crate::mixed::class::Lineage::root($crate::mixed::class::ClassId::new(
                        $crate::class_id!($ty),
                    ));

                fn upcast<U: $crate::mixed::class::Class>(&self) -> ::core::option::Option<&U> {
                    $crate::mixed::class::cast_ref::<Self, U>(self)
                }

                fn upcast_mut<U: $crate::mixed::class::Class>(
                    &mut self,
                ) -> ::core::option::Option<&mut U> {
                    $crate::mixed::class::cast_mut::<Self, U>(self)
                }
            }
        )+
    };
}

class!(bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, ());
class!(&'static str);

#[cfg(feature = "alloc")]
class!(alloc::string::String);

/// Per-query view of a type list's hierarchy.
///
/// Every variant of the list must be a [`Class`].
pub trait Hierarchy<U: Class>: SumList {
    /// Tags whose type is `U` or derives from `U`.
    const MATCHING: TagSet;

    /// Tags whose type is exactly `U`.
    const EXACT: TagSet;

    #[doc(hidden)]
    unsafe fn upcast(this: &Self::Repr, tag: u8) -> Option<&U>;

    #[doc(hidden)]
    unsafe fn upcast_mut(this: &mut Self::Repr, tag: u8) -> Option<&mut U>;
}

impl<U: Class> Hierarchy<U> for () {
    const MATCHING: TagSet = TagSet::EMPTY;
    const EXACT: TagSet = TagSet::EMPTY;

    unsafe fn upcast(this: &Nil, _: u8) -> Option<&U> {
        match this.0 {}
    }

    unsafe fn upcast_mut(this: &mut Nil, _: u8) -> Option<&mut U> {
        match this.0 {}
    }
}

impl<U: Class, Head: Class, Tail: Hierarchy<U>> Hierarchy<U> for (Head, Tail) {
    const MATCHING: TagSet = Tail::MATCHING
        .shift_up()
        .with(0, Head::LINEAGE.descends_from(U::LINEAGE.id()));
    const EXACT: TagSet = Tail::EXACT
        .shift_up()
        .with(0, Head::LINEAGE.id().same(U::LINEAGE.id()));

    unsafe fn upcast(this: &Self::Repr, tag: u8) -> Option<&U> {
        if tag == 0 {
            unsafe { Head::upcast::<U>(&this.data) }
        } else {
            unsafe { Tail::upcast(&this.next, tag - 1) }
        }
    }

    unsafe fn upcast_mut(this: &mut Self::Repr, tag: u8) -> Option<&mut U> {
        if tag == 0 {
            unsafe { Head::upcast_mut::<U>(&mut this.data) }
        } else {
            unsafe { Tail::upcast_mut(&mut this.next, tag - 1) }
        }
    }
}
