//! Per-tag storage operations.
//!
//! Each trait dispatches a runtime tag to the variant at that position and
//! runs the variant's own `Clone`, assignment, comparison or formatting code on
//! the storage reinterpreted as that variant. The comparison chains fold into
//! a single jump on the tag once inlined.
//!
//! Destinations are untyped pointers to the start of another union's storage:
//! every variant of every list lives at offset zero, so a value can be written
//! into any union whose list also holds its type.

use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    mem::ManuallyDrop,
    ptr,
};

use super::repr::{Nil, SumList};

fn unreachable(nil: &Nil) -> ! {
    match nil.0 {}
}

/// Names of the variant types.
pub trait SumMeta: SumList {
    fn type_name(tag: u8) -> &'static str;
}

impl SumMeta for () {
    fn type_name(tag: u8) -> &'static str {
        unreachable!("tag {tag} out of range")
    }
}

impl<Head, Tail: SumMeta> SumMeta for (Head, Tail) {
    fn type_name(tag: u8) -> &'static str {
        if tag == 0 {
            core::any::type_name::<Head>()
        } else {
            Tail::type_name(tag - 1)
        }
    }
}

/// Moves a variant over a live value of the same type.
pub trait SumMove: SumList {
    /// # Safety
    ///
    /// `tag` must be the live variant of `this`, which must not be used
    /// afterwards, and `dst` must point to a live value of the same type.
    #[doc(hidden)]
    unsafe fn move_assign(this: &ManuallyDrop<Self::Repr>, tag: u8, dst: *mut u8);
}

impl SumMove for () {
    unsafe fn move_assign(this: &ManuallyDrop<Nil>, _: u8, _: *mut u8) {
        unreachable(this)
    }
}

impl<Head, Tail: SumMove> SumMove for (Head, Tail) {
    unsafe fn move_assign(this: &ManuallyDrop<Self::Repr>, tag: u8, dst: *mut u8) {
        if tag == 0 {
            unsafe { *dst.cast::<Head>() = ptr::read(&*this.data) }
        } else {
            unsafe { Tail::move_assign(&this.next, tag - 1, dst) }
        }
    }
}

pub trait SumClone: SumList {
    /// # Safety
    ///
    /// `tag` must be the live variant of `this` and `dst` must be valid for a
    /// write of that variant.
    #[doc(hidden)]
    unsafe fn clone_into(this: &Self::Repr, tag: u8, dst: *mut u8);

    /// # Safety
    ///
    /// `tag` must be the live variant of `this` and `dst` must point to a
    /// live value of the same type.
    #[doc(hidden)]
    unsafe fn clone_assign(this: &Self::Repr, tag: u8, dst: *mut u8);
}

impl SumClone for () {
    unsafe fn clone_into(this: &Nil, _: u8, _: *mut u8) {
        unreachable(this)
    }

    unsafe fn clone_assign(this: &Nil, _: u8, _: *mut u8) {
        unreachable(this)
    }
}

impl<Head: Clone, Tail: SumClone> SumClone for (Head, Tail) {
    unsafe fn clone_into(this: &Self::Repr, tag: u8, dst: *mut u8) {
        if tag == 0 {
            unsafe { dst.cast::<Head>().write(Head::clone(&this.data)) }
        } else {
            unsafe { Tail::clone_into(&this.next, tag - 1, dst) }
        }
    }

    unsafe fn clone_assign(this: &Self::Repr, tag: u8, dst: *mut u8) {
        if tag == 0 {
            unsafe { (*dst.cast::<Head>()).clone_from(&this.data) }
        } else {
            unsafe { Tail::clone_assign(&this.next, tag - 1, dst) }
        }
    }
}

pub trait SumDebug: SumList {
    #[doc(hidden)]
    unsafe fn debug(this: &Self::Repr, tag: u8) -> &dyn fmt::Debug;
}

impl SumDebug for () {
    unsafe fn debug(this: &Nil, _: u8) -> &dyn fmt::Debug {
        unreachable(this)
    }
}

impl<Head: fmt::Debug, Tail: SumDebug> SumDebug for (Head, Tail) {
    unsafe fn debug(this: &Self::Repr, tag: u8) -> &dyn fmt::Debug {
        if tag == 0 {
            unsafe { &*this.data }
        } else {
            unsafe { Tail::debug(&this.next, tag - 1) }
        }
    }
}

pub trait SumDisplay: SumList {
    #[doc(hidden)]
    unsafe fn display(this: &Self::Repr, tag: u8) -> &dyn fmt::Display;
}

impl SumDisplay for () {
    unsafe fn display(this: &Nil, _: u8) -> &dyn fmt::Display {
        unreachable(this)
    }
}

impl<Head: fmt::Display, Tail: SumDisplay> SumDisplay for (Head, Tail) {
    unsafe fn display(this: &Self::Repr, tag: u8) -> &dyn fmt::Display {
        if tag == 0 {
            unsafe { &*this.data }
        } else {
            unsafe { Tail::display(&this.next, tag - 1) }
        }
    }
}

pub trait SumPartialEq: SumList {
    #[doc(hidden)]
    unsafe fn eq(this: &Self::Repr, other: &Self::Repr, tag: u8) -> bool;
}

impl SumPartialEq for () {
    unsafe fn eq(this: &Nil, _: &Nil, _: u8) -> bool {
        unreachable(this)
    }
}

impl<Head: PartialEq, Tail: SumPartialEq> SumPartialEq for (Head, Tail) {
    unsafe fn eq(this: &Self::Repr, other: &Self::Repr, tag: u8) -> bool {
        if tag == 0 {
            unsafe { *this.data == *other.data }
        } else {
            unsafe { Tail::eq(&this.next, &other.next, tag - 1) }
        }
    }
}

pub trait SumPartialOrd: SumPartialEq {
    #[doc(hidden)]
    unsafe fn partial_cmp(this: &Self::Repr, other: &Self::Repr, tag: u8) -> Option<Ordering>;
}

impl SumPartialOrd for () {
    unsafe fn partial_cmp(this: &Nil, _: &Nil, _: u8) -> Option<Ordering> {
        unreachable(this)
    }
}

impl<Head: PartialOrd, Tail: SumPartialOrd> SumPartialOrd for (Head, Tail) {
    unsafe fn partial_cmp(this: &Self::Repr, other: &Self::Repr, tag: u8) -> Option<Ordering> {
        if tag == 0 {
            unsafe { (*this.data).partial_cmp(&*other.data) }
        } else {
            unsafe { Tail::partial_cmp(&this.next, &other.next, tag - 1) }
        }
    }
}

pub trait SumOrd: SumPartialOrd {
    #[doc(hidden)]
    unsafe fn cmp(this: &Self::Repr, other: &Self::Repr, tag: u8) -> Ordering;
}

impl SumOrd for () {
    unsafe fn cmp(this: &Nil, _: &Nil, _: u8) -> Ordering {
        unreachable(this)
    }
}

impl<Head: Ord, Tail: SumOrd> SumOrd for (Head, Tail) {
    unsafe fn cmp(this: &Self::Repr, other: &Self::Repr, tag: u8) -> Ordering {
        if tag == 0 {
            unsafe { (*this.data).cmp(&*other.data) }
        } else {
            unsafe { Tail::cmp(&this.next, &other.next, tag - 1) }
        }
    }
}

pub trait SumHash: SumList {
    #[doc(hidden)]
    unsafe fn hash<H: Hasher>(this: &Self::Repr, tag: u8, state: &mut H);
}

impl SumHash for () {
    unsafe fn hash<H: Hasher>(this: &Nil, _: u8, _: &mut H) {
        unreachable(this)
    }
}

impl<Head: Hash, Tail: SumHash> SumHash for (Head, Tail) {
    unsafe fn hash<H: Hasher>(this: &Self::Repr, tag: u8, state: &mut H) {
        if tag == 0 {
            unsafe { (*this.data).hash(state) }
        } else {
            unsafe { Tail::hash(&this.next, tag - 1, state) }
        }
    }
}
