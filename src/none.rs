//! The empty value.

use core::fmt;

/// Stands for "no value" in [`Optional`] and [`MixedOption`].
///
/// [`Optional`]: crate::Optional
/// [`MixedOption`]: crate::MixedOption
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nothing;

crate::class!(Nothing);

impl fmt::Display for Nothing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("none")
    }
}
