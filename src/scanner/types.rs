//! Helpers for looking at `syn` types: rendering, dependency shapes and the
//! route parser signature.

use crate::metadata::{Dependency, DependencyShape};
use quote::ToTokens;
use syn::{GenericArgument, PathArguments, ReturnType, Type, TypeParamBound};

/// Smart pointers an injected dependency may be wrapped in.
const WRAPPERS: &[&str] = &["Arc", "Rc", "Box"];

/// Types that are values, never services.
const NOT_INJECTABLE: &[&str] = &[
    "String", "str", "bool", "char", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16",
    "u32", "u64", "u128", "usize", "f32", "f64", "Option", "Vec", "HashMap", "BTreeMap",
    "HashSet", "BTreeSet", "Result",
];

/// Render a type as compact source text (`Arc<dyn Repo + Send>`).
pub fn render_type(ty: &Type) -> String {
    render_tokens(&ty.to_token_stream().to_string())
}

pub fn render_return(output: &ReturnType) -> Option<String> {
    match output {
        ReturnType::Default => None,
        ReturnType::Type(_, ty) => Some(render_type(ty)),
    }
}

/// Collapse the spacing `TokenStream::to_string` puts around punctuation.
pub fn render_tokens(text: &str) -> String {
    let mut out = text.to_string();
    for (from, to) in [
        (" :: ", "::"),
        (":: ", "::"),
        (" ::", "::"),
        (" < ", "<"),
        ("< ", "<"),
        (" <", "<"),
        (" >", ">"),
        ("& ", "&"),
        (" ,", ","),
    ] {
        out = out.replace(from, to);
    }
    out
}

/// Last path segment identifier of a path type.
pub fn last_ident(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(p) if p.qself.is_none() => p.path.segments.last().map(|s| s.ident.to_string()),
        Type::Paren(p) => last_ident(&p.elem),
        Type::Group(g) => last_ident(&g.elem),
        _ => None,
    }
}

/// The single type argument of `Name<T>`, if `ty` is a path ending in `Name`.
pub fn single_generic<'a>(ty: &'a Type, names: &[&str]) -> Option<(&'a Type, String)> {
    let Type::Path(p) = ty else {
        return None;
    };
    let segment = p.path.segments.last()?;
    let name = segment.ident.to_string();
    if !names.contains(&name.as_str()) {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    let mut types = args.args.iter().filter_map(|a| match a {
        GenericArgument::Type(t) => Some(t),
        _ => None,
    });
    let first = types.next()?;
    if types.next().is_some() {
        return None;
    }
    Some((first, name))
}

/// Every type argument of `Name<A, B, ..>`.
fn generic_types(ty: &Type, name: &str) -> Option<Vec<Type>> {
    let Type::Path(p) = ty else {
        return None;
    };
    let segment = p.path.segments.last()?;
    if segment.ident != name {
        return None;
    }
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => Some(
            args.args
                .iter()
                .filter_map(|a| match a {
                    GenericArgument::Type(t) => Some(t.clone()),
                    _ => None,
                })
                .collect(),
        ),
        _ => Some(vec![]),
    }
}

/// `Option<T>` unwrapped to `(T, true)`; anything else is `(ty, false)`.
pub fn unwrap_option(ty: &Type) -> (&Type, bool) {
    match single_generic(ty, &["Option"]) {
        Some((inner, _)) => (inner, true),
        None => (ty, false),
    }
}

/// Strip references so `&str` and `&'a Code` name their target.
pub fn strip_reference(ty: &Type) -> &Type {
    match ty {
        Type::Reference(r) => strip_reference(&r.elem),
        Type::Paren(p) => strip_reference(&p.elem),
        _ => ty,
    }
}

/// Name of what a type ultimately provides: `Arc<Users>` and
/// `Box<dyn Repo>` yield `Users` and `Repo`.
fn provided_name(ty: &Type) -> Option<String> {
    if let Some((inner, _)) = single_generic(ty, WRAPPERS) {
        return provided_name(inner);
    }
    match ty {
        Type::TraitObject(obj) => trait_bound_name(obj.bounds.iter()),
        _ => last_ident(ty).filter(|n| !NOT_INJECTABLE.contains(&n.as_str())),
    }
}

fn trait_bound_name<'a>(mut bounds: impl Iterator<Item = &'a TypeParamBound>) -> Option<String> {
    bounds.find_map(|b| match b {
        TypeParamBound::Trait(t) => t.path.segments.last().map(|s| s.ident.to_string()),
        _ => None,
    })
}

/// A zero-argument `Fn() -> T` bound inside a trait object.
fn factory_output(bounds: &syn::punctuated::Punctuated<TypeParamBound, syn::Token![+]>) -> Option<Option<&Type>> {
    for bound in bounds {
        let TypeParamBound::Trait(t) = bound else {
            continue;
        };
        let Some(segment) = t.path.segments.last() else {
            continue;
        };
        if !matches!(segment.ident.to_string().as_str(), "Fn" | "FnMut") {
            continue;
        }
        return match &segment.arguments {
            PathArguments::Parenthesized(args) if args.inputs.is_empty() => match &args.output {
                ReturnType::Type(_, out) => Some(Some(out)),
                ReturnType::Default => Some(None),
            },
            _ => Some(None),
        };
    }
    None
}

/// Classify an injected field's type.
///
/// Accepts concrete dependencies (`T`, `Arc<T>`, `Rc<T>`, `Box<T>`,
/// `Arc<dyn Trait>`) and zero-argument factories (`fn() -> T`,
/// `Box<dyn Fn() -> T>`, `Arc<dyn Fn() -> T + Send + Sync>`). Returns `None`
/// for anything else.
pub fn classify_dependency(ty: &Type) -> Option<Dependency> {
    match ty {
        Type::BareFn(f) if f.inputs.is_empty() => {
            let ReturnType::Type(_, out) = &f.output else {
                return None;
            };
            Some(Dependency {
                type_name: provided_name(out)?,
                shape: DependencyShape::Factory { wrapper: None },
            })
        }
        Type::Paren(p) => classify_dependency(&p.elem),
        Type::Path(_) => {
            if let Some((inner, wrapper)) = single_generic(ty, WRAPPERS) {
                return match inner {
                    Type::TraitObject(obj) => match factory_output(&obj.bounds) {
                        Some(Some(out)) => Some(Dependency {
                            type_name: provided_name(out)?,
                            shape: DependencyShape::Factory {
                                wrapper: Some(wrapper),
                            },
                        }),
                        // Fn with arguments or no return value
                        Some(None) => None,
                        None => Some(Dependency {
                            type_name: trait_bound_name(obj.bounds.iter())?,
                            shape: DependencyShape::Interface { wrapper },
                        }),
                    },
                    _ => Some(Dependency {
                        type_name: provided_name(inner)?,
                        shape: DependencyShape::Shared { wrapper },
                    }),
                };
            }
            Some(Dependency {
                type_name: provided_name(ty)?,
                shape: DependencyShape::Direct,
            })
        }
        _ => None,
    }
}

/// `&Context`-like first parser argument: a reference to a type whose name is
/// `Ctx` or ends in `Context`.
pub fn is_context_like(ty: &Type) -> bool {
    let Type::Reference(r) = ty else {
        return false;
    };
    last_ident(&r.elem).is_some_and(|n| n == "Ctx" || n.ends_with("Context"))
}

/// `&str`, `String` or `&String`.
pub fn is_string_like(ty: &Type) -> bool {
    last_ident(strip_reference(ty)).is_some_and(|n| n == "str" || n == "String")
}

/// Error-like type: named `Error`, ending in `Error`, or a boxed error trait
/// object.
pub fn is_error_like(ty: &Type) -> bool {
    if let Some((inner, _)) = single_generic(ty, &["Box", "Arc"]) {
        return match inner {
            Type::TraitObject(obj) => trait_bound_name(obj.bounds.iter())
                .is_some_and(|n| n.ends_with("Error")),
            other => is_error_like(other),
        };
    }
    last_ident(ty).is_some_and(|n| n.ends_with("Error"))
}

/// `Result<T, E>` split into `(T, E)`.
pub fn result_parts(output: &ReturnType) -> Option<(Type, Type)> {
    let ReturnType::Type(_, ty) = output else {
        return None;
    };
    let mut args = generic_types(ty, "Result")?;
    if args.len() != 2 {
        return None;
    }
    let err = args.pop()?;
    let ok = args.pop()?;
    Some((ok, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(src: &str) -> Type {
        syn::parse_str(src).unwrap()
    }

    #[test]
    fn test_render_type() {
        assert_eq!(render_type(&ty("Option<Vec<User>>")), "Option<Vec<User>>");
        assert_eq!(render_type(&ty("std::sync::Arc<dyn Repo + Send>")), "std::sync::Arc<dyn Repo + Send>");
        assert_eq!(render_type(&ty("&'a str")), "&'a str");
        assert_eq!(render_type(&ty("HashMap<String, u32>")), "HashMap<String, u32>");
    }

    #[test]
    fn test_classify_concrete() {
        let d = classify_dependency(&ty("UserRepository")).unwrap();
        assert_eq!(d.type_name, "UserRepository");
        assert_eq!(d.shape, DependencyShape::Direct);

        let d = classify_dependency(&ty("std::sync::Arc<UserService>")).unwrap();
        assert_eq!(d.type_name, "UserService");
        assert_eq!(d.shape, DependencyShape::Shared { wrapper: "Arc".into() });

        let d = classify_dependency(&ty("Arc<dyn Repository + Send + Sync>")).unwrap();
        assert_eq!(d.type_name, "Repository");
        assert_eq!(d.shape, DependencyShape::Interface { wrapper: "Arc".into() });
    }

    #[test]
    fn test_classify_factories() {
        let d = classify_dependency(&ty("fn() -> Mailer")).unwrap();
        assert_eq!(d.type_name, "Mailer");
        assert!(d.is_factory());

        let d = classify_dependency(&ty("Box<dyn Fn() -> Arc<Mailer>>")).unwrap();
        assert_eq!(d.type_name, "Mailer");
        assert_eq!(d.shape, DependencyShape::Factory { wrapper: Some("Box".into()) });

        let d = classify_dependency(&ty("Arc<dyn Fn() -> Mailer + Send + Sync>")).unwrap();
        assert!(d.is_factory());
    }

    #[test]
    fn test_classify_rejects() {
        assert!(classify_dependency(&ty("String")).is_none());
        assert!(classify_dependency(&ty("u32")).is_none());
        assert!(classify_dependency(&ty("Vec<User>")).is_none());
        assert!(classify_dependency(&ty("&Users")).is_none());
        assert!(classify_dependency(&ty("fn(u32) -> Mailer")).is_none());
        assert!(classify_dependency(&ty("Box<dyn Fn(u32) -> Mailer>")).is_none());
        assert!(classify_dependency(&ty("(A, B)")).is_none());
    }

    #[test]
    fn test_parser_shape_helpers() {
        assert!(is_context_like(&ty("&RequestContext")));
        assert!(is_context_like(&ty("&Ctx")));
        assert!(!is_context_like(&ty("RequestContext")));
        assert!(is_string_like(&ty("&str")));
        assert!(is_string_like(&ty("String")));
        assert!(!is_string_like(&ty("&[u8]")));
        assert!(is_error_like(&ty("ParseError")));
        assert!(is_error_like(&ty("anyhow::Error")));
        assert!(is_error_like(&ty("Box<dyn std::error::Error + Send>")));
        assert!(!is_error_like(&ty("String")));
    }
}
