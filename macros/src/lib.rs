//! Pattern syntax for exhaustive matching over `exl::Mixed`.

use proc_macro::TokenStream;

mod pat;

/// Matches a `Mixed` value by value, one arm per variant type.
///
/// Arms name their variant type through the pattern: a struct or tuple-struct
/// pattern (`Point { x, .. }`), a capitalized or primitive type name with an
/// optional binding (`s @ String`, `n @ i32`), or a suffixed literal (`0u8`).
/// Alternatives (`u8 | u16`) take several variants with one body, and a
/// wildcard arm takes whatever is left. The expansion unwraps the variants in
/// order and ends in `Mixed<()>::unreachable()`, so a missing variant is a
/// type error. Arms that no value can reach are rejected.
///
/// Arm bodies are not wrapped in closures or labeled blocks: `return`,
/// `break`, `continue` and `?` act on the surrounding code.
///
/// ```ignore
/// use exl::{match_mixed, Mixed};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let m: Mixed![Point, i32, String] = Mixed::new(Point { x: 1, y: 2 });
/// let n = match_mixed!(m {
///     Point { x, y } => x + y,
///     n @ i32 => n,
///     s @ String => s.len() as i32,
/// });
/// assert_eq!(n, 3);
/// ```
#[proc_macro]
pub fn match_mixed(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as pat::MixedMatch);
    pat::expand(input).into()
}
