//! The tagged union and its operations.

use core::{
    any, fmt,
    hash::{Hash, Hasher},
    mem::{self, ManuallyDrop, MaybeUninit},
    ops::{Deref, DerefMut},
    panic::Location,
    ptr,
};

pub mod best;
pub mod class;
pub mod ops;
pub mod range;
pub mod repr;

use self::{
    class::{Class, Hierarchy},
    ops::{
        SumClone, SumDebug, SumDisplay, SumMeta, SumMove, SumOrd, SumPartialEq, SumPartialOrd,
        SumHash,
    },
    range::SplitList,
    repr::{Convert, Split, SumList},
};
use crate::{
    fatal,
    in_place::InPlaceType,
    matcher::{Matchers, SameOutput},
    tag::{Index, UTerm, MAX_VARIANTS},
};

pub type Repr<S> = <S as SumList>::Repr;
pub type Rem<S, T, U> = <S as Split<T, U>>::Remainder;
pub type NarrowRem<S, S2, UMap> = <S as SplitList<S2, UMap>>::Remainder;

/// A value of exactly one of the types in the list `S`, stored inline.
///
/// `S` is a type list written with [`T!`], or the whole type with
/// [`Mixed!`]:
///
/// ```rust
/// use exl::Mixed;
///
/// let mut m: Mixed![i32, String, char] = Mixed::new(42);
/// assert!(m.holds::<i32, _>());
///
/// m.assign(String::from("hello"));
/// assert_eq!(m.get::<String, _>().map(String::as_str), Some("hello"));
/// ```
///
/// Operations naming a variant type take the type's index as a second
/// generic parameter. It is always inferred and written `_`.
///
/// [`T!`]: crate::T
/// [`Mixed!`]: crate::Mixed
pub struct Mixed<S: SumList> {
    tag: u8,
    data: ManuallyDrop<Repr<S>>,
}

/// Aborts if a variant's drop or construction unwinds while the storage holds
/// no live value, blaming the operation that vacated it.
struct Vacant(&'static Location<'static>);

impl Drop for Vacant {
    fn drop(&mut self) {
        fatal::violation_at(
            self.0,
            format_args!("a variant panicked while the storage of a mixed value was vacant"),
        )
    }
}

impl<T> From<T> for crate::Mixed![T] {
    /// Construct a `Mixed` of one type from a value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use exl::Mixed;
    ///
    /// let m: Mixed![i32] = 42.into();
    /// assert_eq!(*m, 42);
    /// ```
    fn from(value: T) -> Self {
        Mixed::new(value)
    }
}

impl<T> Deref for crate::Mixed![T] {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        unsafe { &*<(T, ()) as Split<T, UTerm>>::as_ptr(&self.data) }
    }
}

impl<T> DerefMut for crate::Mixed![T] {
    fn deref_mut(&mut self) -> &mut Self::Target {
        unsafe { &mut *<(T, ()) as Split<T, UTerm>>::as_mut_ptr(&mut self.data) }
    }
}

impl<T> crate::Mixed![T] {
    pub fn into_inner(self) -> T {
        let mut this = ManuallyDrop::new(self);
        unsafe { <(T, ()) as Split<T, UTerm>>::into_data_unchecked(ManuallyDrop::take(&mut this.data)) }
    }
}

impl crate::Mixed![] {
    /// An empty mixed type has no values, so code holding one is unreachable.
    pub fn unreachable(self) -> ! {
        match self.data.0 {}
    }
}

impl<S: SumList> Mixed<S> {
    fn from_repr(tag: u8, data: Repr<S>) -> Self {
        const {
            assert!(
                S::LEN <= MAX_VARIANTS,
                "a mixed type holds at most 256 variants"
            )
        };
        Mixed {
            tag,
            data: ManuallyDrop::new(data),
        }
    }

    fn as_bytes_mut(&mut self) -> *mut u8 {
        (&mut *self.data as *mut Repr<S>).cast()
    }

    /// Drops the live value, then fills the vacated storage and records `tag`.
    ///
    /// `fill` must write a value of the variant tagged `tag` at the start of
    /// the storage.
    #[track_caller]
    unsafe fn refill(&mut self, tag: u8, fill: impl FnOnce(*mut u8)) {
        let vacant = Vacant(Location::caller());
        unsafe { S::drop(&mut self.data, self.tag) };
        fill(self.as_bytes_mut());
        self.tag = tag;
        mem::forget(vacant);
    }

    /// Constructs a mixed value holding `value` as its exact variant.
    ///
    /// A type missing from the list does not compile:
    ///
    /// ```compile_fail
    /// use exl::Mixed;
    ///
    /// let m: Mixed![i32, String] = Mixed::new('c');
    /// ```
    ///
    /// Neither does a type listed twice, until its index is named:
    ///
    /// ```compile_fail
    /// use exl::Mixed;
    ///
    /// let m: Mixed![u8, char, u8] = Mixed::new(1u8);
    /// ```
    ///
    /// ```rust
    /// use exl::{tag::U2, Mixed};
    ///
    /// let m: Mixed![u8, char, u8] = Mixed::new::<u8, U2>(1);
    /// assert_eq!(m.tag(), 2);
    /// ```
    pub fn new<T, U>(value: T) -> Self
    where
        S: Split<T, U>,
        U: Index,
    {
        Self::from_repr(U::TAG, S::from_data(value))
    }

    /// Constructs a mixed value from `value` through the one variant that
    /// implements `From<V>`.
    ///
    /// ```rust
    /// use exl::Mixed;
    ///
    /// let m: Mixed![i32, String] = Mixed::convert("hi");
    /// assert_eq!(m.unwrap::<String>(), "hi");
    /// ```
    ///
    /// A variant of type `V` converts too, so a list holding `V` next to
    /// another type convertible from it is ambiguous here. [`convert!`]
    /// resolves that case in favour of the exact type.
    ///
    /// [`convert!`]: crate::convert
    pub fn convert<V, U>(value: V) -> Self
    where
        S: Convert<V, U>,
        U: Index,
    {
        Self::from_repr(U::TAG, S::convert(value))
    }

    /// Constructs variant `T` from `make`.
    pub fn make<T, U>(make: impl FnOnce() -> T) -> Self
    where
        S: Split<T, U>,
        U: Index,
    {
        Self::new(make())
    }

    /// Same as [`Mixed::make`], with the variant named by a marker value.
    pub fn in_place<T, U>(_: InPlaceType<T>, make: impl FnOnce() -> T) -> Self
    where
        S: Split<T, U>,
        U: Index,
    {
        Self::make(make)
    }

    /// The tag of the live variant.
    pub fn tag(&self) -> u8 {
        self.tag
    }

    /// The tag assigned to variant `T`.
    pub fn tag_of<T, U>() -> u8
    where
        S: Split<T, U>,
        U: Index,
    {
        U::TAG
    }

    /// The name of the live variant's type.
    pub fn type_name(&self) -> &'static str
    where
        S: SumMeta,
    {
        S::type_name(self.tag)
    }

    /// Whether the live variant is exactly `T`.
    pub fn holds<T, U>(&self) -> bool
    where
        S: Split<T, U>,
        U: Index,
    {
        self.tag == U::TAG
    }

    /// Whether the live variant is `U` or derives from it.
    pub fn is<U: Class>(&self) -> bool
    where
        S: Hierarchy<U>,
    {
        S::MATCHING.contains(self.tag)
    }

    /// Whether the live variant is exactly `U`. `U` need not be declared in
    /// the list, in which case this is always false.
    pub fn is_exact<U: Class>(&self) -> bool
    where
        S: Hierarchy<U>,
    {
        S::EXACT.contains(self.tag)
    }

    pub fn get<T, U>(&self) -> Option<&T>
    where
        S: Split<T, U>,
        U: Index,
    {
        (self.tag == U::TAG).then(|| unsafe { &*S::as_ptr(&self.data) })
    }

    pub fn get_mut<T, U>(&mut self) -> Option<&mut T>
    where
        S: Split<T, U>,
        U: Index,
    {
        (self.tag == U::TAG).then(|| unsafe { &mut *S::as_mut_ptr(&mut self.data) })
    }

    /// Views the live variant as `U` if it is `U` or derives from it.
    pub fn get_as<U: Class>(&self) -> Option<&U>
    where
        S: Hierarchy<U>,
    {
        if !self.is::<U>() {
            return None;
        }
        unsafe { S::upcast(&self.data, self.tag) }
    }

    pub fn get_as_mut<U: Class>(&mut self) -> Option<&mut U>
    where
        S: Hierarchy<U>,
    {
        if !self.is::<U>() {
            return None;
        }
        unsafe { S::upcast_mut(&mut self.data, self.tag) }
    }

    /// Returns the live variant viewed as `U`.
    ///
    /// Terminates the process if [`Mixed::is`] is false for `U`.
    #[track_caller]
    pub fn unwrap<U: Class>(&self) -> &U
    where
        S: Hierarchy<U>,
        S: SumMeta,
    {
        match self.get_as() {
            Some(value) => value,
            None => self.mismatch(any::type_name::<U>()),
        }
    }

    #[track_caller]
    pub fn unwrap_mut<U: Class>(&mut self) -> &mut U
    where
        S: Hierarchy<U>,
        S: SumMeta,
    {
        if !self.is::<U>() {
            self.mismatch(any::type_name::<U>())
        }
        match unsafe { S::upcast_mut(&mut self.data, self.tag) } {
            Some(value) => value,
            None => fatal::violation(format_args!("upcast failed for a matching variant")),
        }
    }

    /// Returns the live variant, which must be exactly `T`.
    ///
    /// Terminates the process otherwise.
    #[track_caller]
    pub fn unwrap_exact<T, U>(&self) -> &T
    where
        S: Split<T, U>,
        S: SumMeta,
        U: Index,
    {
        match self.get() {
            Some(value) => value,
            None => self.mismatch(any::type_name::<T>()),
        }
    }

    #[track_caller]
    pub fn unwrap_exact_mut<T, U>(&mut self) -> &mut T
    where
        S: Split<T, U>,
        S: SumMeta,
        U: Index,
    {
        if self.tag != U::TAG {
            self.mismatch(any::type_name::<T>())
        }
        unsafe { &mut *S::as_mut_ptr(&mut self.data) }
    }

    #[cold]
    #[track_caller]
    fn mismatch(&self, expected: &str) -> !
    where
        S: SumMeta,
    {
        fatal::violation(format_args!(
            "unwrapped `{expected}` from a mixed value holding `{}`",
            S::type_name(self.tag)
        ))
    }

    /// Calls `f` with the live variant if it is `U` or derives from it.
    pub fn on<U: Class>(&self, f: impl FnOnce(&U)) -> &Self
    where
        S: Hierarchy<U>,
    {
        if let Some(value) = self.get_as() {
            f(value);
        }
        self
    }

    pub fn on_mut<U: Class>(&mut self, f: impl FnOnce(&mut U)) -> &mut Self
    where
        S: Hierarchy<U>,
    {
        if let Some(value) = self.get_as_mut() {
            f(value);
        }
        self
    }

    /// Calls `f` with the live variant if it is exactly `T`.
    pub fn on_exact<T, U>(&self, f: impl FnOnce(&T)) -> &Self
    where
        S: Split<T, U>,
        U: Index,
    {
        if let Some(value) = self.get() {
            f(value);
        }
        self
    }

    pub fn on_exact_mut<T, U>(&mut self, f: impl FnOnce(&mut T)) -> &mut Self
    where
        S: Split<T, U>,
        U: Index,
    {
        if let Some(value) = self.get_mut() {
            f(value);
        }
        self
    }

    /// Runs the first matcher accepting the live variant and returns its
    /// result.
    ///
    /// The matchers must cover every variant of `S`, or end with
    /// [`otherwise`]; anything else fails to compile.
    ///
    /// ```rust
    /// use exl::{otherwise, t, when, when_exact, Mixed};
    ///
    /// let m: Mixed![i32, String, char] = Mixed::new('x');
    /// let n = m.map(t![
    ///     when::<i32, _>(|i| *i),
    ///     when_exact::<String, _>(|s| s.len() as i32),
    ///     otherwise(|| -1),
    /// ]);
    /// assert_eq!(n, -1);
    /// ```
    ///
    /// [`otherwise`] is only accepted as the last matcher:
    ///
    /// ```compile_fail
    /// use exl::{otherwise, t, when_exact, Mixed};
    ///
    /// let m: Mixed![i32, char] = Mixed::new('x');
    /// let n = m.map(t![otherwise(|| 0), when_exact::<i32, _>(|i| *i)]);
    /// ```
    ///
    /// A list that misses a variant, here `char`, is rejected when the call is
    /// monomorphized:
    ///
    /// ```rust,ignore
    /// let n = m.map(t![when_exact::<i32, _>(|i| *i)]);
    /// ```
    ///
    /// [`otherwise`]: crate::otherwise
    pub fn map<R, I, M>(&self, matchers: M) -> R
    where
        M: Matchers<S, R, I> + SameOutput<R>,
    {
        self.map_into(matchers)
    }

    /// [`Mixed::map`] with the result type chosen by the caller. Each
    /// callback may return any type that converts into `R`.
    ///
    /// ```rust
    /// use exl::{otherwise, t, when_exact, Mixed};
    ///
    /// let m: Mixed![u8, String] = Mixed::new(7u8);
    /// let n: i64 = m.map_into(t![
    ///     when_exact::<u8, _>(|n| *n),
    ///     otherwise(|| -1i32),
    /// ]);
    /// assert_eq!(n, 7);
    /// ```
    pub fn map_into<R, I, M>(&self, matchers: M) -> R
    where
        M: Matchers<S, R, I>,
    {
        const {
            assert!(
                M::COVERED.covers(S::LEN),
                "the matchers do not cover every variant; add the missing ones or end with `otherwise`"
            )
        };
        matchers.run(self)
    }

    /// [`Mixed::map`] for matchers returning nothing.
    pub fn dispatch<I, M>(&self, matchers: M)
    where
        M: Matchers<S, (), I>,
    {
        self.map_into(matchers)
    }
}

impl<S: SumList> Mixed<S> {
    /// Replaces the live value with `value`.
    ///
    /// When `T` is already the live variant the value is assigned in place.
    /// Otherwise the live value is dropped before `value` is written.
    #[track_caller]
    pub fn assign<T, U>(&mut self, value: T)
    where
        S: Split<T, U>,
        U: Index,
    {
        if self.tag == U::TAG {
            unsafe { *S::as_mut_ptr(&mut self.data) = value }
        } else {
            unsafe { self.refill(U::TAG, |dst| dst.cast::<T>().write(value)) }
        }
    }

    /// Drops the live value, then constructs variant `T` from `make` in its
    /// place.
    ///
    /// The storage is vacant while `make` runs: a panic from it terminates the
    /// process.
    #[track_caller]
    pub fn emplace<T, U>(&mut self, make: impl FnOnce() -> T) -> &mut T
    where
        S: Split<T, U>,
        U: Index,
    {
        unsafe {
            self.refill(U::TAG, |dst| dst.cast::<T>().write(make()));
            &mut *S::as_mut_ptr(&mut self.data)
        }
    }

    /// Replaces the live value with `value` converted into the one variant
    /// that implements `From<V>`. The conversion runs before the old value is
    /// dropped.
    ///
    /// Use [`assign_convert!`](crate::assign_convert) to prefer a variant of
    /// type `V` over conversions.
    #[track_caller]
    pub fn assign_convert<V, U>(&mut self, value: V)
    where
        S: Convert<V, U>,
        U: Index,
    {
        if self.tag == U::TAG {
            unsafe { S::convert_assign(value, self.as_bytes_mut()) }
        } else {
            let data = S::convert(value);
            unsafe { self.refill(U::TAG, |dst| dst.cast::<Repr<S>>().write(data)) }
        }
    }

    /// Moves the value of a union over a sublist of `S` into `self`, assigning
    /// in place when the variant stays the same.
    #[track_caller]
    pub fn assign_from<S2, UMap>(&mut self, other: Mixed<S2>)
    where
        S: SplitList<S2, UMap>,
        S2: SumMove,
    {
        let tag = S::broaden_tag(other.tag);
        let other = ManuallyDrop::new(other);
        if tag == self.tag {
            unsafe { S2::move_assign(&other.data, other.tag, self.as_bytes_mut()) }
        } else {
            let src = (&*other.data as *const Repr<S2>).cast::<u8>();
            unsafe {
                self.refill(tag, |dst| {
                    ptr::copy_nonoverlapping(src, dst, mem::size_of::<Repr<S2>>())
                })
            }
        }
    }

    /// Copies the value of a union over a sublist of `S` into `self`, using
    /// `Clone::clone_from` when the variant stays the same.
    #[track_caller]
    pub fn clone_assign_from<S2, UMap>(&mut self, other: &Mixed<S2>)
    where
        S: SplitList<S2, UMap>,
        S2: SumClone,
    {
        let tag = S::broaden_tag(other.tag);
        if tag == self.tag {
            unsafe { S2::clone_assign(&other.data, other.tag, self.as_bytes_mut()) }
        } else {
            unsafe { self.refill(tag, |dst| S2::clone_into(&other.data, other.tag, dst)) }
        }
    }
}

impl<S: SumList> Mixed<S> {
    /// Moves out variant `T`, or returns the union over the remaining types.
    pub fn try_unwrap<T, U>(self) -> Result<T, Mixed<Rem<S, T, U>>>
    where
        S: Split<T, U>,
        U: Index,
    {
        let mut this = ManuallyDrop::new(self);
        match S::try_unwrap(this.tag) {
            Ok(()) => Ok(unsafe { S::into_data_unchecked(ManuallyDrop::take(&mut this.data)) }),
            Err(tag) => unsafe {
                let data = mem::transmute_copy(&this.data);
                Err(Mixed { tag, data })
            },
        }
    }

    /// Converts into a union over the sublist `S2`, or returns the union over
    /// the types of `S` missing from `S2`.
    pub fn narrow<S2, UMap>(self) -> Result<Mixed<S2>, Mixed<NarrowRem<S, S2, UMap>>>
    where
        S: SplitList<S2, UMap>,
        S2: SumList,
    {
        let this = ManuallyDrop::new(self);
        match <S as SplitList<S2, UMap>>::narrow_tag(this.tag) {
            Ok(tag) => unsafe {
                let data = mem::transmute_copy(&this.data);
                Ok(Mixed { tag, data })
            },
            Err(tag) => unsafe {
                let data = mem::transmute_copy(&this.data);
                Err(Mixed { tag, data })
            },
        }
    }

    /// Moves into a union over a superlist of `S`.
    ///
    /// ```rust
    /// use exl::Mixed;
    ///
    /// let small: Mixed![char, String] = Mixed::new('c');
    /// let wide: Mixed![i32, String, char] = small.broaden();
    /// assert_eq!(wide.tag(), 2);
    /// ```
    ///
    /// Every type of `S` must appear in the target list:
    ///
    /// ```compile_fail
    /// use exl::Mixed;
    ///
    /// let small: Mixed![char, String] = Mixed::new('c');
    /// let wide: Mixed![i32, char] = small.broaden();
    /// ```
    pub fn broaden<S2, UMap>(self) -> Mixed<S2>
    where
        S2: SplitList<S, UMap>,
    {
        unsafe {
            let tag = <S2 as SplitList<S, UMap>>::broaden_tag(self.tag);
            let mut data = MaybeUninit::<S2::Repr>::uninit();
            data.as_mut_ptr()
                .cast::<ManuallyDrop<S::Repr>>()
                .write(ptr::read(&self.data));

            mem::forget(self);
            Mixed::from_repr(tag, data.assume_init())
        }
    }

    /// Moves into the union with `H` prepended to the list.
    pub(crate) fn shift<H>(self) -> Mixed<(H, S)> {
        unsafe {
            let mut data = MaybeUninit::<Repr<(H, S)>>::uninit();
            data.as_mut_ptr()
                .cast::<ManuallyDrop<S::Repr>>()
                .write(ptr::read(&self.data));

            let tag = self.tag + 1;
            mem::forget(self);
            Mixed::from_repr(tag, data.assume_init())
        }
    }

    /// Clones into a union over a superlist of `S`.
    pub fn broaden_cloned<S2, UMap>(&self) -> Mixed<S2>
    where
        S2: SplitList<S, UMap>,
        S: SumClone,
    {
        let tag = <S2 as SplitList<S, UMap>>::broaden_tag(self.tag);
        let mut data = MaybeUninit::<S2::Repr>::uninit();
        unsafe {
            S::clone_into(&self.data, self.tag, data.as_mut_ptr().cast());
            Mixed::from_repr(tag, data.assume_init())
        }
    }
}

impl<S: SumDebug> fmt::Debug for Mixed<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", unsafe { S::debug(&self.data, self.tag) })
    }
}

impl<S: SumDisplay> fmt::Display for Mixed<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", unsafe { S::display(&self.data, self.tag) })
    }
}

impl<S: SumList> Drop for Mixed<S> {
    fn drop(&mut self) {
        unsafe { S::drop(&mut self.data, self.tag) }
    }
}

impl<S: SumClone> Clone for Mixed<S> {
    fn clone(&self) -> Self {
        let mut data = MaybeUninit::<S::Repr>::uninit();
        unsafe {
            S::clone_into(&self.data, self.tag, data.as_mut_ptr().cast());
            Mixed::from_repr(self.tag, data.assume_init())
        }
    }

    #[track_caller]
    fn clone_from(&mut self, source: &Self) {
        if self.tag == source.tag {
            unsafe { S::clone_assign(&source.data, source.tag, self.as_bytes_mut()) }
        } else {
            unsafe { self.refill(source.tag, |dst| S::clone_into(&source.data, source.tag, dst)) }
        }
    }
}

impl<S: SumPartialEq> PartialEq for Mixed<S> {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && unsafe { S::eq(&self.data, &other.data, self.tag) }
    }
}

impl<S: SumPartialEq + Eq> Eq for Mixed<S> {}

impl<S: SumPartialOrd> PartialOrd for Mixed<S> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        match self.tag.cmp(&other.tag) {
            core::cmp::Ordering::Equal => unsafe {
                S::partial_cmp(&self.data, &other.data, self.tag)
            },
            other => Some(other),
        }
    }
}

impl<S: SumOrd + Eq> Ord for Mixed<S> {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.tag
            .cmp(&other.tag)
            .then_with(|| unsafe { S::cmp(&self.data, &other.data, self.tag) })
    }
}

impl<S: SumHash> Hash for Mixed<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag.hash(state);
        unsafe { S::hash(&self.data, self.tag, state) }
    }
}
