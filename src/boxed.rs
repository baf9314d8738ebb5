//! An owning pointer whose allocation may fail without panicking.
//!
//! [`Boxed::make`] reports allocation failure by producing an invalid box
//! instead of aborting. Dereferencing an invalid box is a contract violation
//! and terminates the process; [`Boxed::is_valid`] and [`Boxed::as_ref`] are
//! the checked ways in.

use core::{
    fmt,
    marker::PhantomData,
    mem,
    ops::{Deref, DerefMut},
    ptr::{self, NonNull},
};

#[cfg(not(feature = "std"))]
use alloc::alloc::{self, Layout};
#[cfg(feature = "std")]
use std::alloc::{self, Layout};

use crate::{fatal, sptr};

/// Boxes a value into a possibly unsized [`Boxed`].
///
/// The expression's type must coerce to the box's target, as in
/// `let b: Boxed<dyn Display> = boxed!(42);`. An invalid coercion is a
/// compile error.
///
/// ```
/// use exl::{boxed, Boxed};
///
/// let numbers: Boxed<[u32]> = boxed!([1u32, 2, 3]);
/// assert_eq!(numbers.len(), 3);
/// ```
#[macro_export]
macro_rules! boxed {
    ($e:expr) => {{
        let val = $e;
        let ptr = &val as *const _;
        #[allow(unsafe_code)]
        unsafe {
            $crate::Boxed::new_unchecked(val, ptr)
        }
    }};
}

/// Releases what a [`Boxed`] points to.
pub trait Deleter<T: ?Sized> {
    fn delete(&mut self, ptr: NonNull<T>);
}

/// Drops the value and returns its memory to the global allocator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Dealloc;

impl<T: ?Sized> Deleter<T> for Dealloc {
    fn delete(&mut self, ptr: NonNull<T>) {
        unsafe {
            let layout = Layout::for_value::<T>(ptr.as_ref());
            ptr::drop_in_place(ptr.as_ptr());
            if layout.size() != 0 {
                alloc::dealloc(ptr.as_ptr().cast(), layout);
            }
        }
    }
}

impl<T: ?Sized, F: FnMut(NonNull<T>)> Deleter<T> for F {
    fn delete(&mut self, ptr: NonNull<T>) {
        self(ptr)
    }
}

pub struct Boxed<T: ?Sized, D: Deleter<T> = Dealloc> {
    ptr: Option<NonNull<T>>,
    deleter: D,
    _phantom: PhantomData<T>,
}

unsafe impl<T: ?Sized + Send, D: Deleter<T> + Send> Send for Boxed<T, D> {}
unsafe impl<T: ?Sized + Sync, D: Deleter<T> + Sync> Sync for Boxed<T, D> {}

impl<T> Boxed<T> {
    /// Moves `value` to the heap. The box is invalid if allocation fails.
    pub fn make(value: T) -> Self {
        let ptr = &value as *const T;
        unsafe { Self::new_unchecked(value, ptr) }
    }

    /// Allocates, then constructs the value in place from `make`.
    ///
    /// `make` is not called if allocation fails. If it panics, the
    /// allocation is freed.
    pub fn make_with(make: impl FnOnce() -> T) -> Self {
        let Some(ptr) = allocate::<T>() else {
            return Self::invalid();
        };
        let unfilled = Unfilled(ptr);
        let value = make();
        mem::forget(unfilled);
        unsafe {
            ptr.as_ptr().write(value);
            Self::from_non_null(ptr)
        }
    }

    /// Moves the value out and frees the allocation. `None` if invalid.
    pub fn into_inner(mut self) -> Option<T> {
        let ptr = self.ptr.take()?;
        unsafe {
            let value = ptr.as_ptr().read();
            free(ptr);
            Some(value)
        }
    }
}

impl<T: ?Sized> Boxed<T> {
    #[doc(hidden)]
    pub unsafe fn new_unchecked<U>(val: U, ptr: *const T) -> Self {
        match allocate::<U>() {
            Some(dst) => unsafe {
                dst.as_ptr().write(val);
                let ptr = sptr::with_metadata_of_mut(dst.as_ptr(), ptr);
                Self::from_non_null(NonNull::new_unchecked(ptr))
            },
            None => Self::invalid(),
        }
    }

    /// Takes ownership of a pointer obtained from the global allocator, such
    /// as one returned by [`Boxed::release`]. A null pointer gives an invalid
    /// box.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or point to a live value allocated with the layout
    /// of that value, and nothing else may own it.
    pub unsafe fn from_raw(ptr: *mut T) -> Self {
        unsafe { Self::from_raw_with(ptr, Dealloc) }
    }

    unsafe fn from_non_null(ptr: NonNull<T>) -> Self {
        Boxed {
            ptr: Some(ptr),
            deleter: Dealloc,
            _phantom: PhantomData,
        }
    }
}

impl<T: ?Sized, D: Deleter<T> + Default> Boxed<T, D> {
    pub fn invalid() -> Self {
        Boxed {
            ptr: None,
            deleter: D::default(),
            _phantom: PhantomData,
        }
    }
}

impl<T: ?Sized, D: Deleter<T>> Boxed<T, D> {
    /// Takes ownership of `ptr`, to be released by `deleter`.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or point to a live value that `deleter` can release,
    /// and nothing else may own it.
    pub unsafe fn from_raw_with(ptr: *mut T, deleter: D) -> Self {
        Boxed {
            ptr: NonNull::new(ptr),
            deleter,
            _phantom: PhantomData,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.ptr.is_some()
    }

    pub fn as_ref(&self) -> Option<&T> {
        self.ptr.map(|ptr| unsafe { &*ptr.as_ptr() })
    }

    pub fn as_mut(&mut self) -> Option<&mut T> {
        self.ptr.map(|ptr| unsafe { &mut *ptr.as_ptr() })
    }

    /// Terminates the process if the box is invalid.
    #[track_caller]
    pub fn get(&self) -> &T {
        match self.as_ref() {
            Some(value) => value,
            None => invalid_access(),
        }
    }

    #[track_caller]
    pub fn get_mut(&mut self) -> &mut T {
        match self.as_mut() {
            Some(value) => value,
            None => invalid_access(),
        }
    }

    /// Releases the held value and adopts `ptr`, which may be null.
    ///
    /// # Safety
    ///
    /// Same as [`Boxed::from_raw_with`] for the current deleter.
    pub unsafe fn reset(&mut self, ptr: *mut T) {
        if let Some(old) = mem::replace(&mut self.ptr, NonNull::new(ptr)) {
            self.deleter.delete(old);
        }
    }

    /// Gives up ownership without releasing anything. The box becomes invalid.
    pub fn release(&mut self) -> Option<NonNull<T>> {
        self.ptr.take()
    }

    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.deleter, &mut other.deleter);
    }

    pub fn deleter(&self) -> &D {
        &self.deleter
    }

    pub fn deleter_mut(&mut self) -> &mut D {
        &mut self.deleter
    }
}

/// Frees an allocation from [`allocate`] that holds no value.
unsafe fn free<T>(ptr: NonNull<T>) {
    let layout = Layout::new::<T>();
    if layout.size() != 0 {
        unsafe { alloc::dealloc(ptr.as_ptr().cast(), layout) }
    }
}

/// Frees an allocation whose value never got constructed.
struct Unfilled<T>(NonNull<T>);

impl<T> Drop for Unfilled<T> {
    fn drop(&mut self) {
        unsafe { free(self.0) }
    }
}

fn allocate<T>() -> Option<NonNull<T>> {
    let layout = Layout::new::<T>();
    if layout.size() == 0 {
        return Some(NonNull::dangling());
    }
    let ptr = NonNull::new(unsafe { alloc::alloc(layout) }.cast::<T>());
    if ptr.is_none() {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            size = layout.size(),
            align = layout.align(),
            "allocation for {} failed",
            core::any::type_name::<T>()
        );
    }
    ptr
}

#[cold]
#[track_caller]
fn invalid_access() -> ! {
    fatal::violation(format_args!("dereferenced an invalid box"))
}

impl<T: ?Sized, D: Deleter<T>> Deref for Boxed<T, D> {
    type Target = T;

    #[track_caller]
    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T: ?Sized, D: Deleter<T>> DerefMut for Boxed<T, D> {
    #[track_caller]
    fn deref_mut(&mut self) -> &mut T {
        self.get_mut()
    }
}

impl<T: ?Sized, D: Deleter<T>> Drop for Boxed<T, D> {
    fn drop(&mut self) {
        if let Some(ptr) = self.ptr.take() {
            self.deleter.delete(ptr);
        }
    }
}

impl<T: ?Sized + fmt::Debug, D: Deleter<T>> fmt::Debug for Boxed<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_ref() {
            Some(value) => f.debug_tuple("Boxed").field(&value).finish(),
            None => f.write_str("Boxed(<invalid>)"),
        }
    }
}

impl<T: ?Sized + fmt::Display, D: Deleter<T>> fmt::Display for Boxed<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_ref() {
            Some(value) => fmt::Display::fmt(value, f),
            None => f.write_str("<invalid>"),
        }
    }
}
