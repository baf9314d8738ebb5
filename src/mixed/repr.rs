//! The underlying representation of [`Mixed`] and the registry of its variant
//! types.
//!
//! # Implementation details
//!
//! A mixed type is a hand-written tagged union. Its memory layout resembles
//! the following:
//!
//! ```rust,no_run
//! # use core::convert::Infallible;
//! # use core::mem::ManuallyDrop;
//!
//! struct Nil(Infallible);
//! union Cons<T, Next> {
//!     data: ManuallyDrop<T>,
//!     next: ManuallyDrop<Next>,
//! }
//!
//! // For example only. Not actually defined.
//! struct RawMixed2<T1, T2> {
//!     tag: u8,
//!     data: Cons<T1, Cons<T2, Nil>>,
//! }
//! ```
//!
//! Every field of a union starts at offset zero, so whichever variant is
//! alive sits at the start of the storage. Its size is at least the largest
//! variant's size and its alignment is exactly the largest alignment.
//!
//! [`Mixed`]: crate::Mixed

use core::{convert::Infallible, mem::ManuallyDrop, ptr};

use super::Rem;
use crate::tag::{Index, UInt, UTerm};

/// The terminator type of the underlying union of [`Mixed`].
///
/// [`Mixed`]: crate::Mixed
pub struct Nil(pub(crate) Infallible);

/// The accumulator type of the underlying union of [`Mixed`].
///
/// [`Mixed`]: crate::Mixed
#[repr(C)]
pub union Cons<T, U> {
    pub(crate) data: ManuallyDrop<T>,
    pub(crate) next: ManuallyDrop<U>,
}

const fn max(a: usize, b: usize) -> usize {
    if a > b {
        a
    } else {
        b
    }
}

/// The trait that type lists implement to support their corresponding tagged
/// union representation.
pub trait SumList {
    /// The underlying union.
    type Repr;

    /// The number of variants.
    const LEN: usize;

    /// The largest `size_of` among the variants.
    const MAX_SIZE: usize;

    /// The largest `align_of` among the variants.
    const MAX_ALIGN: usize;

    #[doc(hidden)]
    unsafe fn drop(this: &mut ManuallyDrop<Self::Repr>, tag: u8);
}

impl SumList for () {
    type Repr = Nil;

    const LEN: usize = 0;
    const MAX_SIZE: usize = 0;
    const MAX_ALIGN: usize = 1;

    unsafe fn drop(_: &mut ManuallyDrop<Nil>, _: u8) {}
}

impl<Head, Tail> SumList for (Head, Tail)
where
    Tail: SumList,
{
    type Repr = Cons<Head, Tail::Repr>;

    const LEN: usize = 1 + Tail::LEN;
    const MAX_SIZE: usize = max(core::mem::size_of::<Head>(), Tail::MAX_SIZE);
    const MAX_ALIGN: usize = max(core::mem::align_of::<Head>(), Tail::MAX_ALIGN);

    unsafe fn drop(this: &mut ManuallyDrop<Self::Repr>, tag: u8) {
        if tag == 0 {
            unsafe { ManuallyDrop::drop(&mut this.data) };
        } else {
            unsafe { Tail::drop(&mut this.next, tag - 1) }
        }
    }
}

/// The trait that type lists implement to locate variant `T` at the position
/// marked by index `U`.
///
/// The index is left to inference: a type absent from the list leaves the
/// bound unsatisfied and a type listed twice makes it ambiguous.
pub trait Split<T, U: Index>: SumList {
    #[doc(hidden)]
    fn from_data(data: T) -> Self::Repr;

    #[doc(hidden)]
    unsafe fn into_data_unchecked(this: Self::Repr) -> T;

    #[doc(hidden)]
    fn as_ptr(this: &Self::Repr) -> *const T;

    #[doc(hidden)]
    fn as_mut_ptr(this: &mut Self::Repr) -> *mut T;

    /// The type list left after removing `T` at index `U`.
    type Remainder: SumList;

    #[doc(hidden)]
    fn from_remainder(tag: u8) -> u8 {
        if tag < U::TAG {
            tag
        } else {
            tag + 1
        }
    }

    #[doc(hidden)]
    fn try_unwrap(tag: u8) -> Result<(), u8> {
        match tag.cmp(&U::TAG) {
            core::cmp::Ordering::Equal => Ok(()),
            core::cmp::Ordering::Less => Err(tag),
            core::cmp::Ordering::Greater => Err(tag - 1),
        }
    }
}

impl<Head, Tail> Split<Head, UTerm> for (Head, Tail)
where
    Tail: SumList,
{
    fn from_data(data: Head) -> Self::Repr {
        Cons {
            data: ManuallyDrop::new(data),
        }
    }

    unsafe fn into_data_unchecked(this: Self::Repr) -> Head {
        unsafe { ManuallyDrop::into_inner(this.data) }
    }

    fn as_ptr(this: &Self::Repr) -> *const Head {
        let ptr = ptr::addr_of!(this.data).cast::<Head>();
        debug_assert_eq!(ptr.cast::<u8>(), (this as *const Self::Repr).cast::<u8>());
        ptr
    }

    fn as_mut_ptr(this: &mut Self::Repr) -> *mut Head {
        let ptr = ptr::addr_of_mut!(this.data).cast::<Head>();
        debug_assert_eq!(ptr.cast::<u8>(), (this as *mut Self::Repr).cast::<u8>());
        ptr
    }

    type Remainder = Tail;
}

impl<Head, Tail, T, U: Index> Split<T, UInt<U>> for (Head, Tail)
where
    Tail: Split<T, U>,
{
    fn from_data(data: T) -> Self::Repr {
        Cons {
            next: ManuallyDrop::new(Tail::from_data(data)),
        }
    }

    unsafe fn into_data_unchecked(this: Self::Repr) -> T {
        unsafe { Tail::into_data_unchecked(ManuallyDrop::into_inner(this.next)) }
    }

    fn as_ptr(this: &Self::Repr) -> *const T {
        let ptr = unsafe { Tail::as_ptr(&this.next) };
        debug_assert_eq!(ptr.cast::<u8>(), (this as *const Self::Repr).cast::<u8>());
        ptr
    }

    fn as_mut_ptr(this: &mut Self::Repr) -> *mut T {
        let ptr = unsafe { Tail::as_mut_ptr(&mut this.next) };
        debug_assert_eq!(ptr.cast::<u8>(), (this as *mut Self::Repr).cast::<u8>());
        ptr
    }

    type Remainder = (Head, Rem<Tail, T, U>);
}

/// Inverse of [`Split`]: the variant type sitting at index `U`.
pub trait TypeAt<U: Index>: SumList {
    type Output;
}

impl<Head, Tail: SumList> TypeAt<UTerm> for (Head, Tail) {
    type Output = Head;
}

impl<Head, Tail: TypeAt<U>, U: Index> TypeAt<UInt<U>> for (Head, Tail) {
    type Output = Tail::Output;
}

/// Construction through conversion: the variant at index `U` is built from a
/// `V` through its `From<V>` implementation.
///
/// When more than one variant converts from `V` the index cannot be inferred,
/// which rejects ambiguous conversions at compile time. A variant of type `V`
/// itself always converts, so preferring it over the others is left to
/// [`convert!`](crate::convert).
pub trait Convert<V, U: Index>: SumList {
    #[doc(hidden)]
    fn convert(value: V) -> Self::Repr;

    /// Converts `value` and assigns it over the live variant at `dst`.
    ///
    /// # Safety
    ///
    /// `dst` must point to the storage of a union whose live variant is the
    /// one at index `U`.
    #[doc(hidden)]
    unsafe fn convert_assign(value: V, dst: *mut u8);
}

impl<Head, Tail, V> Convert<V, UTerm> for (Head, Tail)
where
    Head: From<V>,
    Tail: SumList,
{
    fn convert(value: V) -> Self::Repr {
        Cons {
            data: ManuallyDrop::new(Head::from(value)),
        }
    }

    unsafe fn convert_assign(value: V, dst: *mut u8) {
        let value = Head::from(value);
        unsafe { *dst.cast::<Head>() = value }
    }
}

impl<Head, Tail, V, U: Index> Convert<V, UInt<U>> for (Head, Tail)
where
    Tail: Convert<V, U>,
{
    fn convert(value: V) -> Self::Repr {
        Cons {
            next: ManuallyDrop::new(Tail::convert(value)),
        }
    }

    unsafe fn convert_assign(value: V, dst: *mut u8) {
        unsafe { Tail::convert_assign(value, dst) }
    }
}
