/// Constructs a [`struct@Mixed`] type from a list of types.
///
/// # Examples
///
/// ```rust
/// use exl::Mixed;
///
/// type Value = Mixed![i32, u32, f64];
/// let v: Value = Mixed::new(42u32);
/// ```
///
/// [`struct@Mixed`]: crate::Mixed
#[macro_export]
macro_rules! Mixed {
    [$($t:ty),* $(,)?] => [$crate::Mixed::<$crate::T![$($t,)*]>];
}

/// Constructs a type list from a list of types.
///
/// The value version of the macro is [`t`].
///
/// # Examples
///
/// ```rust
/// use exl::T;
///
/// type List = T![i32, u32, f64];
/// let list: List = (42i32, (42u32, (42.0f64, ())));
/// ```
#[macro_export]
macro_rules! T {
    [] => [()];
    [$head:ty $(, $t:ty)* $(,)?] => [($head, $crate::T!($($t,)*))];
}

/// Constructs a list value, such as a list of matchers.
///
/// The type version of the macro is [`T`].
///
/// # Examples
///
/// ```rust
/// use exl::{otherwise, t, when_exact, Mixed};
///
/// let m: Mixed![i32, char] = Mixed::new('z');
/// let is_int = m.map(t![when_exact::<i32, _>(|_| true), otherwise(|| false)]);
/// assert!(!is_int);
/// ```
#[macro_export]
macro_rules! t {
    [] => [()];
    [$head:expr $(, $t:expr)* $(,)?] => [($head, $crate::t!($($t,)*))];
}

/// Constructs a [`struct@Mixed`] of the given type from the best-matching
/// variant: the one of exactly the value's type, or failing that the one
/// variant convertible from it.
///
/// # Examples
///
/// ```rust
/// use exl::{convert, Mixed};
///
/// // `u32: From<char>` exists, but the `char` variant wins.
/// let m = convert!(Mixed![u32, char], 'c');
/// assert_eq!(m.tag(), 1);
///
/// let m = convert!(Mixed![i64, String], "text");
/// assert_eq!(m.tag(), 1);
/// ```
///
/// The mixed type must be known where the macro is invoked. Generic code
/// uses [`Mixed::new`] or [`Mixed::convert`] instead.
///
/// [`struct@Mixed`]: crate::Mixed
/// [`Mixed::new`]: crate::Mixed::new
/// [`Mixed::convert`]: crate::Mixed::convert
#[macro_export]
macro_rules! convert {
    ($ty:ty, $value:expr $(,)?) => {{
        #[allow(unused_imports)]
        use $crate::mixed::best::{ByConversion as _, ByExact as _};

        let value = $value;
        let pick = $crate::mixed::best::Pick::of(::core::marker::PhantomData::<$ty>, &value);
        (&pick).make(value)
    }};
}

/// Assigns to a mixed place through the best-matching variant, as
/// [`convert!`] selects it.
///
/// ```rust
/// use exl::{assign_convert, Mixed};
///
/// let mut m: Mixed![u64, char] = Mixed::new(0u64);
/// assign_convert!(m, 'x');
/// assert_eq!(m.tag(), 1);
/// assign_convert!(m, 7u32);
/// assert_eq!(m.get::<u64, _>(), Some(&7));
/// ```
#[macro_export]
macro_rules! assign_convert {
    ($place:expr, $value:expr $(,)?) => {{
        #[allow(unused_imports)]
        use $crate::mixed::best::{ByConversion as _, ByExact as _};

        let value = $value;
        let pick = $crate::mixed::best::Pick::of_place(&$place, &value);
        (&pick).assign(&mut $place, value)
    }};
}
