//! Ordered best-match selection behind [`convert!`] and [`assign_convert!`].
//!
//! A variant whose type is exactly the value's type wins. Only when the list
//! has none does the value go through the one variant implementing `From`
//! for it. Trait bounds cannot state that a list lacks a type, so the order
//! comes from method resolution on a concrete [`Pick`] at the call site: the
//! exact candidate is implemented for `Pick` itself and is tried first, the
//! conversion candidate for `&Pick` and is reached only by auto-referencing.
//!
//! [`convert!`]: crate::convert
//! [`assign_convert!`]: crate::assign_convert

use core::marker::PhantomData;

use super::{
    repr::{Convert, Split, SumList},
    Mixed,
};
use crate::tag::Index;

#[doc(hidden)]
pub struct Pick<S, V>(PhantomData<fn(V) -> S>);

impl<S: SumList, V> Pick<S, V> {
    pub fn of(_: PhantomData<Mixed<S>>, _: &V) -> Self {
        Pick(PhantomData)
    }

    pub fn of_place(_: &Mixed<S>, _: &V) -> Self {
        Pick(PhantomData)
    }
}

#[doc(hidden)]
pub trait ByExact<V, U> {
    type Output;

    fn make(&self, value: V) -> Self::Output;

    fn assign(&self, target: &mut Self::Output, value: V);
}

impl<S, V, U> ByExact<V, U> for Pick<S, V>
where
    S: Split<V, U>,
    U: Index,
{
    type Output = Mixed<S>;

    fn make(&self, value: V) -> Mixed<S> {
        Mixed::new(value)
    }

    #[track_caller]
    fn assign(&self, target: &mut Mixed<S>, value: V) {
        target.assign(value)
    }
}

#[doc(hidden)]
pub trait ByConversion<V, U> {
    type Output;

    fn make(&self, value: V) -> Self::Output;

    fn assign(&self, target: &mut Self::Output, value: V);
}

impl<S, V, U> ByConversion<V, U> for &Pick<S, V>
where
    S: Convert<V, U>,
    U: Index,
{
    type Output = Mixed<S>;

    fn make(&self, value: V) -> Mixed<S> {
        Mixed::convert(value)
    }

    #[track_caller]
    fn assign(&self, target: &mut Mixed<S>, value: V) {
        target.assign_convert(value)
    }
}
