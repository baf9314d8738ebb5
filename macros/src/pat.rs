//! Parsing and expansion of `match_mixed!`.
//!
//! Every arm is reduced to the variant types it takes. The expansion peels
//! those variants off the scrutinee one `try_unwrap` at a time, in arm order,
//! and hands whatever no arm took to `Mixed<()>::unreachable()`.

use convert_case::{Case as TextCase, Casing};
use proc_macro2::{Span, TokenStream};
use quote::{quote, quote_spanned, ToTokens};
use syn::{
    parse::{Parse, ParseStream},
    parse_quote,
    spanned::Spanned,
    visit::{self, Visit},
    Arm, Expr, ExprLit, Ident, Lit, Pat, Path, QSelf, Type, TypePath,
};

const PRIMITIVES: &[&str] = &[
    "bool", "char", "f32", "f64", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32",
    "u64", "u128", "usize",
];

/// Whether a lone identifier in pattern position names a type, not a binding.
fn names_type(ident: &Ident) -> bool {
    let name = ident.to_string();
    name.is_case(TextCase::Pascal) || PRIMITIVES.contains(&name.as_str())
}

/// One variant taken by an arm, and the pattern applied to its value.
struct Case {
    ty: Type,
    pat: Pat,
    /// The pattern may reject a value of `ty`.
    refutable: bool,
}

enum Shape {
    Cases(Vec<Case>),
    /// `_`
    Rest,
}

struct MatchArm {
    shape: Shape,
    guard: Option<Expr>,
    body: Expr,
}

pub struct MixedMatch {
    scrutinee: Expr,
    arms: Vec<MatchArm>,
}

impl Parse for MixedMatch {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let scrutinee = Expr::parse_without_eager_brace(input)?;
        let content;
        syn::braced!(content in input);

        let mut arms = Vec::new();
        while !content.is_empty() {
            let arm: Arm = content.parse()?;
            if let Some(attr) = arm.attrs.first() {
                return Err(syn::Error::new_spanned(attr, "attributes on arms are not supported"));
            }
            arms.push(MatchArm {
                shape: shape_of(&arm.pat)?,
                guard: arm.guard.map(|(_, guard)| *guard),
                body: *arm.body,
            });
        }
        check_reachable(&arms)?;
        Ok(MixedMatch { scrutinee, arms })
    }
}

fn shape_of(pat: &Pat) -> syn::Result<Shape> {
    match pat {
        Pat::Wild(_) => Ok(Shape::Rest),
        Pat::Paren(inner) => shape_of(&inner.pat),
        Pat::Or(alternatives) => {
            let mut cases = Vec::new();
            for alt in &alternatives.cases {
                match shape_of(alt)? {
                    Shape::Cases(more) => cases.extend(more),
                    Shape::Rest => {
                        return Err(syn::Error::new_spanned(
                            alt,
                            "`_` cannot be an alternative; give it an arm of its own",
                        ))
                    }
                }
            }
            Ok(Shape::Cases(cases))
        }
        _ => case_of(pat).map(|case| Shape::Cases(vec![case])),
    }
}

fn case_of(pat: &Pat) -> syn::Result<Case> {
    match pat {
        Pat::Ident(binding) => match &binding.subpat {
            None if names_type(&binding.ident) => Ok(Case {
                ty: type_of(None, binding.ident.clone().into()),
                pat: parse_quote!(_),
                refutable: false,
            }),
            None => Err(syn::Error::new_spanned(
                binding,
                format_args!(
                    "`{}` binds without naming a variant type; write `{0} @ Type`",
                    binding.ident
                ),
            )),
            Some((at, sub)) => {
                let inner = case_of(sub)?;
                let mut binding = binding.clone();
                binding.subpat = Some((*at, Box::new(inner.pat)));
                Ok(Case {
                    pat: Pat::Ident(binding),
                    ..inner
                })
            }
        },
        Pat::Struct(s) => Ok(Case {
            ty: type_of(s.qself.clone(), s.path.clone()),
            pat: pat.clone(),
            refutable: s.fields.iter().any(|field| refutable(&field.pat)),
        }),
        Pat::TupleStruct(s) => Ok(Case {
            ty: type_of(s.qself.clone(), s.path.clone()),
            pat: pat.clone(),
            refutable: s.elems.iter().any(refutable),
        }),
        Pat::Path(p) => Ok(Case {
            ty: type_of(p.qself.clone(), p.path.clone()),
            pat: pat.clone(),
            refutable: false,
        }),
        Pat::Lit(lit) => Ok(Case {
            ty: literal_type(lit)?,
            pat: pat.clone(),
            refutable: true,
        }),
        Pat::Paren(inner) => case_of(&inner.pat),
        _ => Err(syn::Error::new_spanned(
            pat,
            format_args!("pattern `{}` does not name a variant type", pat.to_token_stream()),
        )),
    }
}

fn type_of(qself: Option<QSelf>, path: Path) -> Type {
    Type::Path(TypePath { qself, path })
}

fn literal_type(pat: &ExprLit) -> syn::Result<Type> {
    let suffixed = |suffix: &str| {
        if suffix.is_empty() {
            Err(syn::Error::new_spanned(
                pat,
                "numeric literals need a type suffix to name a variant, as in `0u8`",
            ))
        } else {
            syn::parse_str(suffix)
        }
    };
    match &pat.lit {
        Lit::Str(_) => Ok(parse_quote!(&'static str)),
        Lit::Char(_) => Ok(parse_quote!(char)),
        Lit::Bool(_) => Ok(parse_quote!(bool)),
        Lit::Byte(_) => Ok(parse_quote!(u8)),
        Lit::Int(int) => suffixed(int.suffix()),
        Lit::Float(float) => suffixed(float.suffix()),
        _ => Err(syn::Error::new_spanned(pat, "this literal does not name a variant type")),
    }
}

/// Whether a nested pattern can fail on a value of its type. Anything that
/// could name an enum variant counts as refutable.
fn refutable(pat: &Pat) -> bool {
    #[derive(Default)]
    struct Finder(bool);

    impl Visit<'_> for Finder {
        fn visit_pat(&mut self, pat: &Pat) {
            match pat {
                Pat::Lit(_)
                | Pat::Range(_)
                | Pat::Const(_)
                | Pat::Or(_)
                | Pat::Path(_)
                | Pat::Slice(_)
                | Pat::Struct(_)
                | Pat::TupleStruct(_) => self.0 = true,
                _ => visit::visit_pat(self, pat),
            }
        }
    }

    let mut finder = Finder::default();
    finder.visit_pat(pat);
    finder.0
}

/// Rejects arms no value can reach: any arm after an unguarded `_`, and any
/// variant already taken whole by an earlier unguarded arm.
fn check_reachable(arms: &[MatchArm]) -> syn::Result<()> {
    let mut taken: Vec<&Type> = Vec::new();
    let mut rest_taken = false;
    for arm in arms {
        if rest_taken {
            return Err(syn::Error::new_spanned(&arm.body, "unreachable arm after `_`"));
        }
        match &arm.shape {
            Shape::Rest => rest_taken = arm.guard.is_none(),
            Shape::Cases(cases) => {
                for case in cases {
                    if taken.contains(&&case.ty) {
                        return Err(syn::Error::new_spanned(
                            &case.ty,
                            "every value of this variant is taken by an earlier arm",
                        ));
                    }
                    if !case.refutable && arm.guard.is_none() {
                        taken.push(&case.ty);
                    }
                }
            }
        }
    }
    Ok(())
}

pub fn expand(input: MixedMatch) -> TokenStream {
    let MixedMatch { scrutinee, arms } = input;
    let base = Ident::new("__mixed", Span::mixed_site());

    let exhausted = quote! {{
        let #base: ::exl::Mixed<()> = #base;
        #base.unreachable()
    }};
    let chain = arms
        .iter()
        .rev()
        .fold(exhausted, |rest, arm| arm.expand(&base, rest));

    quote! {{
        let #base = #scrutinee;
        #chain
    }}
}

impl MatchArm {
    /// Expands this arm in front of `rest`, the expansion of the arms after it.
    fn expand(&self, base: &Ident, rest: TokenStream) -> TokenStream {
        let body = &self.body;
        match (&self.shape, &self.guard) {
            (Shape::Rest, None) => quote! {{
                let _ = &#base;
                #body
            }},
            (Shape::Rest, Some(guard)) => quote! {
                if #guard { #body } else { #rest }
            },
            (Shape::Cases(cases), guard) => cases
                .iter()
                .rev()
                .fold(rest, |rest, case| case.expand(base, guard.as_ref(), body, rest)),
        }
    }
}

impl Case {
    fn expand(&self, base: &Ident, guard: Option<&Expr>, body: &Expr, rest: TokenStream) -> TokenStream {
        let Case { ty, pat, refutable } = self;
        let unwrap = quote_spanned!(ty.span()=> #base.try_unwrap::<#ty, _>());

        if !refutable && guard.is_none() {
            return quote! {
                match #unwrap {
                    ::core::result::Result::Ok(#pat) => #body,
                    ::core::result::Result::Err(#base) => #rest,
                }
            };
        }

        // A rejected value is put back so the later arms see the whole union.
        let unmatched = Ident::new("__unmatched", Span::mixed_site());
        let guard = guard.map(|guard| quote!(if #guard));
        quote! {{
            let mut #base = #base;
            match #unwrap {
                ::core::result::Result::Ok(#pat) #guard => #body,
                #unmatched => {
                    #base = match #unmatched {
                        ::core::result::Result::Ok(value) => ::exl::Mixed::new(value),
                        ::core::result::Result::Err(rem) => rem.broaden(),
                    };
                    #rest
                }
            }
        }}
    }
}
