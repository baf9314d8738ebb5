//! Matchers for [`Mixed::map`] and [`Mixed::dispatch`].
//!
//! A matcher pairs a callback with the variants it accepts. Lists of matchers
//! are written with [`t!`] and tried in order:
//!
//! - [`when`] accepts the variants that are its target or derive from it,
//! - [`when_exact`] accepts the variant that is exactly its target,
//! - [`otherwise`] accepts anything and may only come last.
//!
//! A list that leaves some variant uncovered is rejected when the `map` call is
//! compiled.
//!
//! [`Mixed::map`] requires every callback to return the same type.
//! [`Mixed::map_into`] takes the result type from the caller and accepts any
//! callback whose output converts into it.
//!
//! [`Mixed::map`]: crate::Mixed::map
//! [`Mixed::map_into`]: crate::Mixed::map_into
//! [`Mixed::dispatch`]: crate::Mixed::dispatch
//! [`t!`]: crate::t

use core::{fmt, marker::PhantomData};

use crate::{
    mixed::{
        class::{Class, Hierarchy},
        repr::{Split, SumList},
        Mixed,
    },
    tag::{Index, TagSet},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    When,
    WhenExact,
    Otherwise,
}

pub trait Matcher {
    const KIND: Kind;

    /// The type handed to the callback. `()` for [`Otherwise`].
    type Target;
}

/// `O` is the callback's output.
pub struct When<T, F, O> {
    f: F,
    _marker: PhantomData<fn(&T) -> O>,
}

pub struct WhenExact<T, F, O> {
    f: F,
    _marker: PhantomData<fn(&T) -> O>,
}

pub struct Otherwise<F, O> {
    f: F,
    _marker: PhantomData<fn() -> O>,
}

/// Matches the variants that are `T` or derive from it.
pub fn when<T: Class, O>(f: impl FnOnce(&T) -> O) -> When<T, impl FnOnce(&T) -> O, O> {
    When {
        f,
        _marker: PhantomData,
    }
}

/// Matches the variant that is exactly `T`.
pub fn when_exact<T, O>(f: impl FnOnce(&T) -> O) -> WhenExact<T, impl FnOnce(&T) -> O, O> {
    WhenExact {
        f,
        _marker: PhantomData,
    }
}

/// Matches whatever the preceding matchers left.
pub fn otherwise<O>(f: impl FnOnce() -> O) -> Otherwise<impl FnOnce() -> O, O> {
    Otherwise {
        f,
        _marker: PhantomData,
    }
}

impl<T, F, O> When<T, F, O> {
    pub fn into_inner(self) -> F {
        self.f
    }
}

impl<T, F, O> WhenExact<T, F, O> {
    pub fn into_inner(self) -> F {
        self.f
    }
}

impl<F, O> Otherwise<F, O> {
    pub fn into_inner(self) -> F {
        self.f
    }
}

impl<T, F, O> Matcher for When<T, F, O> {
    const KIND: Kind = Kind::When;
    type Target = T;
}

impl<T, F, O> Matcher for WhenExact<T, F, O> {
    const KIND: Kind = Kind::WhenExact;
    type Target = T;
}

impl<F, O> Matcher for Otherwise<F, O> {
    const KIND: Kind = Kind::Otherwise;
    type Target = ();
}

impl<T, F, O> fmt::Debug for When<T, F, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "When<{}>", core::any::type_name::<T>())
    }
}

impl<T, F, O> fmt::Debug for WhenExact<T, F, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WhenExact<{}>", core::any::type_name::<T>())
    }
}

impl<F, O> fmt::Debug for Otherwise<F, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Otherwise")
    }
}

/// The index slot of a structural matcher.
pub enum Structural {}

/// A list of matchers over the variants of `S`, producing `R`.
///
/// Each callback's output is converted into `R` with [`Into`]. `I` lists the
/// indices located by the exact matchers and is always inferred.
pub trait Matchers<S: SumList, R, I> {
    /// The tags accepted by at least one matcher of the list.
    const COVERED: TagSet;

    #[doc(hidden)]
    fn run(self, mixed: &Mixed<S>) -> R;
}

impl<S: SumList, R> Matchers<S, R, ()> for () {
    const COVERED: TagSet = TagSet::EMPTY;

    fn run(self, mixed: &Mixed<S>) -> R {
        unreachable!("no matcher accepted tag {}", mixed.tag())
    }
}

impl<S: SumList, R, F, O> Matchers<S, R, ()> for (Otherwise<F, O>, ())
where
    F: FnOnce() -> O,
    O: Into<R>,
{
    const COVERED: TagSet = TagSet::prefix(S::LEN);

    fn run(self, _: &Mixed<S>) -> R {
        (self.0.f)().into()
    }
}

impl<S, R, T, F, O, I, Next> Matchers<S, R, (Structural, I)> for (When<T, F, O>, Next)
where
    S: Hierarchy<T>,
    T: Class,
    F: FnOnce(&T) -> O,
    O: Into<R>,
    Next: Matchers<S, R, I>,
{
    const COVERED: TagSet = <S as Hierarchy<T>>::MATCHING.union(Next::COVERED);

    fn run(self, mixed: &Mixed<S>) -> R {
        match mixed.get_as::<T>() {
            Some(value) => (self.0.f)(value).into(),
            None => self.1.run(mixed),
        }
    }
}

impl<S, R, T, F, O, U, I, Next> Matchers<S, R, (U, I)> for (WhenExact<T, F, O>, Next)
where
    S: Split<T, U>,
    U: Index,
    F: FnOnce(&T) -> O,
    O: Into<R>,
    Next: Matchers<S, R, I>,
{
    const COVERED: TagSet = TagSet::single(U::TAG).union(Next::COVERED);

    fn run(self, mixed: &Mixed<S>) -> R {
        match mixed.get::<T, U>() {
            Some(value) => (self.0.f)(value).into(),
            None => self.1.run(mixed),
        }
    }
}

/// Holds when every callback of a matcher list returns `R`, which lets
/// [`Mixed::map`] infer its result from the callbacks.
pub trait SameOutput<R> {}

impl<R> SameOutput<R> for () {}

impl<R, F> SameOutput<R> for (Otherwise<F, R>, ()) {}

impl<R, T, F, Next: SameOutput<R>> SameOutput<R> for (When<T, F, R>, Next) {}

impl<R, T, F, Next: SameOutput<R>> SameOutput<R> for (WhenExact<T, F, R>, Next) {}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, string::String, vec::Vec};

    use super::*;
    use crate::{class, t};

    struct Shape {
        sides: u32,
    }
    struct Square {
        shape: Shape,
        side: f64,
    }
    struct Label;

    class!(Shape, Label);
    class!(Square: Shape => shape);

    type Drawing = crate::Mixed![Square, Label, Shape];

    fn kind_of<M: Matcher>(_: &M) -> Kind {
        M::KIND
    }

    #[test]
    fn kinds() {
        assert_eq!(kind_of(&when::<Shape, _>(|_| ())), Kind::When);
        assert_eq!(kind_of(&when_exact::<u8, _>(|_| ())), Kind::WhenExact);
        assert_eq!(kind_of(&otherwise(|| ())), Kind::Otherwise);
    }

    #[test]
    fn callbacks() {
        let hits = Cell::new(0);
        let m = when_exact::<u8, _>(|n| hits.set(hits.get() + *n as i32));
        (m.into_inner())(&5);
        let o = otherwise(|| hits.set(hits.get() * 2));
        (o.into_inner())();
        assert_eq!(hits.get(), 10);
    }

    #[test]
    fn coverage() {
        type L = crate::T![Square, Label, Shape];
        type ShapesOnly = (When<Shape, fn(&Shape), ()>, ());
        assert_eq!(
            <ShapesOnly as Matchers<L, (), _>>::COVERED,
            TagSet::single(0).with(2, true)
        );
        assert!(!<ShapesOnly as Matchers<L, (), _>>::COVERED.covers(3));
        type All = (When<Shape, fn(&Shape), ()>, (WhenExact<Label, fn(&Label), ()>, ()));
        assert!(<All as Matchers<L, (), _>>::COVERED.covers(3));
        type Tail = (WhenExact<Label, fn(&Label), ()>, (Otherwise<fn(), ()>, ()));
        assert!(<Tail as Matchers<L, (), _>>::COVERED.covers(3));
    }

    #[test]
    fn first_match_wins() {
        let drawing: Drawing = crate::Mixed::new(Square {
            shape: Shape { sides: 4 },
            side: 2.0,
        });
        let described = drawing.map(t![
            when_exact::<Square, _>(|s| std::format!("square {}", s.side)),
            when::<Shape, _>(|s| std::format!("{} sides", s.sides)),
            otherwise(|| String::from("label")),
        ]);
        assert_eq!(described, "square 2");

        let described = drawing.map(t![
            when::<Shape, _>(|s| std::format!("{} sides", s.sides)),
            when_exact::<Square, _>(|s| std::format!("square {}", s.side)),
            otherwise(|| String::from("label")),
        ]);
        assert_eq!(described, "4 sides");
    }

    #[test]
    fn outputs_convert_into_result() {
        let drawing: Drawing = crate::Mixed::new(Shape { sides: 5 });
        let sides: u64 = drawing.map_into(t![
            when_exact::<Square, _>(|_| 4u8),
            when::<Shape, _>(|s| s.sides),
            otherwise(|| 0u16),
        ]);
        assert_eq!(sides, 5);

        let name: String = Drawing::new(Label).map_into(t![
            when::<Shape, _>(|_| "shape"),
            otherwise(|| String::from("label")),
        ]);
        assert_eq!(name, "label");
    }

    #[test]
    fn dispatch_visits_once() {
        let seen = core::cell::RefCell::new(Vec::new());
        for drawing in [
            Drawing::new(Label),
            Drawing::new(Shape { sides: 3 }),
        ] {
            drawing.dispatch(t![
                when::<Shape, _>(|s| seen.borrow_mut().push(s.sides)),
                when_exact::<Label, _>(|_| seen.borrow_mut().push(0)),
            ]);
        }
        assert_eq!(*seen.borrow(), [0, 3]);
    }
}
