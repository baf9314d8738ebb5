//! Markers naming the variant to construct.

use core::{fmt, marker::PhantomData};

/// Names the type `T` as a value, for constructors that build a variant in
/// place.
pub struct InPlaceType<T>(PhantomData<fn() -> T>);

impl<T> InPlaceType<T> {
    pub const NEW: Self = InPlaceType(PhantomData);
}

impl<T> Clone for InPlaceType<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for InPlaceType<T> {}

impl<T> fmt::Debug for InPlaceType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InPlaceType<{}>", core::any::type_name::<T>())
    }
}

pub const fn in_place_type<T>() -> InPlaceType<T> {
    InPlaceType::NEW
}
