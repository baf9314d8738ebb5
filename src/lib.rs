#![doc = include_str!("../README.md")]
#![no_std]
#![deny(future_incompatible)]
#![deny(rust_2018_idioms)]
#![warn(rust_2024_compatibility)]
#![allow(edition_2024_expr_fragment_specifier)]

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(any(test, feature = "std"))]
extern crate std;

mod macros;

pub mod fatal;
pub mod in_place;
pub mod matcher;
pub mod mixed;
pub mod none;
pub mod option;
pub mod tag;

#[cfg(feature = "alloc")]
pub mod boxed;
#[cfg(feature = "alloc")]
pub mod nested;
#[cfg(feature = "alloc")]
mod sptr;

#[cfg(feature = "alloc")]
pub use self::{
    boxed::{Boxed, Dealloc, Deleter},
    nested::Nested,
};
pub use self::{
    in_place::{in_place_type, InPlaceType},
    matcher::{otherwise, when, when_exact},
    mixed::{class::Class, Mixed},
    none::Nothing,
    option::{MixedOption, Optional},
};
#[cfg(feature = "macros")]
pub use exl_macros::match_mixed;
