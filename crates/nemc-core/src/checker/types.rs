use std::{borrow::Borrow, cell::RefCell, collections::HashMap, error::Error, fmt::Display};

use crate::{lexer::Span, parser::ast::TypeName};

use super::{
    context::Context,
    error::{TypeCheckError, UndefinedType},
};

thread_local! {
    /// Canonical-string interning table. Two `Type` values with the same
    /// canonical string are the same type; this table lets callers compare
    /// types in O(1) by interned index instead of re-deriving the string
    /// representation every time, the same trick the teacher already uses
    /// for variable/type lookups (a shared table behind a `RefCell`).
    static INTERN: RefCell<HashMap<String, usize>> = RefCell::new(HashMap::new());
}

/// Intern `canonical` and return a stable identity token. Tokens are only
/// meaningful within a single process run (they are not persisted), which
/// matches how the checker already treats everything else in `Context`.
fn intern(canonical: &str) -> usize {
    INTERN.with(|table| {
        let mut table = table.borrow_mut();
        if let Some(id) = table.get(canonical) {
            return *id;
        }
        let id = table.len();
        table.insert(canonical.to_string(), id);
        id
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FloatWidth {
    W32,
    W64,
}

#[derive(Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Canonical semantic type representation used throughout inference,
/// validation, constant evaluation and code generation.
///
/// Every variant has a canonical string form (see [`Type::canonical`]); two
/// types are compatible iff their canonical strings match, which is also
/// what backs the interning table used for O(1) identity comparisons
/// elsewhere in the checker.
pub enum Type {
    /// Unit / no-value type used for statements or functions that do not return a value
    Void,
    /// Boolean truth value primitive
    Boolean,
    /// Unicode scalar value (character) primitive
    Character,
    /// Homogeneous sequence of characters with a statically known length
    Chars(usize),
    /// Immutable heap string value (dynamically sized sequence of characters)
    String,
    /// Sized signed or unsigned integer primitive
    Integer { width: IntWidth, signed: bool },
    /// Arbitrary precision rational number (numerator/denominator pair)
    Rational,
    /// Sized IEEE 754 floating point primitive
    FloatingPoint(FloatWidth),
    /// Complex number with a floating point real and imaginary component
    Complex,
    /// Placeholder used during inference when a concrete type has not yet been determined
    Unknown,
    /// Borrow-style pointer to an underlying type (treated transparently for equality)
    Reference(Box<Type>),
    /// Fixed-length heterogeneous ordered collection, always structural
    Tuple(Vec<Type>),
    /// Dynamically sized homogeneous sequence of elements with a single element type
    Slice(Box<Type>),
    /// Statically sized homogeneous sequence of `len` elements of a single element type
    Array(Box<Type>, usize),
    /// User defined struct with name and ordered list of (field_name, field_type) pairs
    Struct(String, Vec<(String, Type)>),
    /// Closed union of member types, deduplicated by canonical string
    Variant(Vec<Type>),
    /// Function signature with parameter types and return type
    Function {
        /// Ordered parameter types
        params: Vec<Type>,
        /// Return value type
        return_value: Box<Type>,
    },
    /// Bounded range over an orderable base type (`a..b` / `a..=b`)
    Range(Box<Type>),
    /// Named behaviour (interface/concept); values of this type are a
    /// `{ data*, vtable* }` pair at codegen time
    Behaviour(String),
    /// Unbound generic parameter, resolved to a concrete type (or constant
    /// value) during generic instantiation by the type matcher
    Generic(String),
}

impl Type {
    /// 64-bit signed integer, the default integer width used for untyped
    /// integer literals and the `main` entry point's exit code.
    pub fn default_integer() -> Type {
        Type::Integer {
            width: IntWidth::W64,
            signed: true,
        }
    }

    /// 64-bit IEEE 754 floating point, the default float width.
    pub fn default_float() -> Type {
        Type::FloatingPoint(FloatWidth::W64)
    }

    /// Canonical string form used for compatibility comparison and variant
    /// member deduplication (Testable Property: "duplicate-free under
    /// canonicalisation").
    pub fn canonical(&self) -> String {
        match self {
            Type::Void => "void".into(),
            Type::Boolean => "bool".into(),
            Type::Character => "char".into(),
            Type::Chars(n) => format!("chars[{n}]"),
            Type::String => "string".into(),
            Type::Integer { width, signed } => {
                let prefix = if *signed { "i" } else { "u" };
                let bits = match width {
                    IntWidth::W8 => 8,
                    IntWidth::W16 => 16,
                    IntWidth::W32 => 32,
                    IntWidth::W64 => 64,
                };
                format!("{prefix}{bits}")
            }
            Type::Rational => "rational".into(),
            Type::FloatingPoint(FloatWidth::W32) => "f32".into(),
            Type::FloatingPoint(FloatWidth::W64) => "f64".into(),
            Type::Complex => "complex".into(),
            Type::Unknown => "unknown".into(),
            Type::Reference(inner) => format!("&{}", inner.canonical()),
            Type::Tuple(items) => format!(
                "({})",
                items.iter().map(Type::canonical).collect::<Vec<_>>().join(",")
            ),
            Type::Slice(inner) => format!("[{}]", inner.canonical()),
            Type::Array(inner, len) => format!("[{};{len}]", inner.canonical()),
            Type::Struct(name, _) => format!("struct {name}"),
            Type::Variant(members) => {
                let mut names: Vec<_> = members.iter().map(Type::canonical).collect();
                names.sort();
                names.dedup();
                format!("variant({})", names.join("|"))
            }
            Type::Function {
                params,
                return_value,
            } => format!(
                "fn({})->{}",
                params.iter().map(Type::canonical).collect::<Vec<_>>().join(","),
                return_value.canonical()
            ),
            Type::Range(inner) => format!("range({})", inner.canonical()),
            Type::Behaviour(name) => format!("behaviour {name}"),
            Type::Generic(name) => format!("generic {name}"),
        }
    }

    /// Interned identity token for this type's canonical string.
    pub fn intern_id(&self) -> usize {
        intern(&self.canonical())
    }

    /// Build a deduplicated variant type out of `members`, collapsing
    /// nested variants and dropping duplicate canonical members. A variant
    /// of exactly one distinct member degenerates to that member.
    pub fn variant_of(members: Vec<Type>) -> Type {
        let mut flat = vec![];
        for m in members {
            match m {
                Type::Variant(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        let mut seen = std::collections::HashSet::new();
        let mut deduped = vec![];
        for m in flat {
            if seen.insert(m.canonical()) {
                deduped.push(m);
            }
        }
        if deduped.len() == 1 {
            return deduped.into_iter().next().unwrap();
        }
        Type::Variant(deduped)
    }

    /// Structural compatibility check, generalising the teacher's
    /// `does_eq`. Two types are compatible iff:
    /// - their canonical strings match (identity), or
    /// - one is a `Reference` to the other (one layer of transparent
    ///   indirection, as the teacher's original rule already allowed), or
    /// - an `Array(T, _)` is compatible with a `Slice(T)` (arrays decay to
    ///   slices), or
    /// - `String`/`Chars(_)` are compatible with `Slice(Character)` (both
    ///   are character sequences under the hood), or
    /// - a concrete type is compatible with a `Variant` that contains it
    ///   (widening into the join type computed for `if`/`when`/`for`), or
    /// - a type is compatible with `Behaviour(name)` if the environment has
    ///   recorded that it extends that behaviour (checked by the caller,
    ///   which has access to the environment; this method alone treats
    ///   `Behaviour` nominally).
    pub fn does_eq(&self, other: &Self) -> bool {
        if self.canonical() == other.canonical() {
            return true;
        }
        match (self, other) {
            (Self::Reference(l0), r0) => l0.as_ref().does_eq(r0),
            (l0, Self::Reference(r0)) => l0.does_eq(r0.as_ref()),
            (Self::Array(l0, _), Self::Slice(r0)) | (Self::Slice(r0), Self::Array(l0, _)) => {
                l0.does_eq(r0)
            }
            (Self::String, Self::Slice(inner)) | (Self::Slice(inner), Self::String) => {
                matches!(inner.as_ref(), Self::Character)
            }
            (Self::Chars(_), Self::Slice(inner)) | (Self::Slice(inner), Self::Chars(_)) => {
                matches!(inner.as_ref(), Self::Character)
            }
            (Self::Tuple(l0), Self::Tuple(r0)) => {
                l0.len() == r0.len() && l0.iter().zip(r0.iter()).all(|(a, b)| a.does_eq(b))
            }
            (Self::Struct(l0, l1), Self::Struct(r0, r1)) => l0 == r0 && l1 == r1,
            (Self::Variant(members), other) | (other, Self::Variant(members)) => {
                members.iter().any(|m| m.does_eq(other))
            }
            (
                Self::Function {
                    params: l_params,
                    return_value: l_return_value,
                },
                Self::Function {
                    params: r_params,
                    return_value: r_return_value,
                },
            ) => {
                l_params.len() == r_params.len()
                    && l_params.iter().zip(r_params.iter()).all(|(a, b)| a.does_eq(b))
                    && l_return_value.does_eq(r_return_value)
            }
            (Self::Range(l0), Self::Range(r0)) => l0.does_eq(r0),
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

impl std::fmt::Debug for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Error converting a parsed `TypeName` AST node into a concrete `Type`.
/// Usually indicates an undefined user type or unsupported literal.
pub struct TypeFromTypeNameError {
    source: TypeName,
}

impl Display for TypeFromTypeNameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Failed to convert '{:?}' to a qualified type",
            self.source
        ))
    }
}

impl Error for TypeFromTypeNameError {}

impl From<TypeFromTypeNameError> for TypeCheckError {
    fn from(value: TypeFromTypeNameError) -> Self {
        TypeCheckError::UndefinedType(
            UndefinedType {
                type_name: value.source,
            },
            Span::default(),
        )
    }
}

/// Convert a parsed `TypeName` (or convertible) plus current `Context` into
/// a fully resolved `Type`, performing recursive resolution of nested types
/// and validating user defined type references.
impl<T> TryFrom<(T, &Context)> for Type
where
    T: Into<TypeName>,
{
    type Error = TypeCheckError;

    fn try_from((value, ctx): (T, &Context)) -> Result<Self, Self::Error> {
        let value = value.into();
        match &value {
            TypeName::Literal(lit, span) => match lit.as_str() {
                "i8" => Ok(Type::Integer { width: IntWidth::W8, signed: true }),
                "i16" => Ok(Type::Integer { width: IntWidth::W16, signed: true }),
                "i32" => Ok(Type::Integer { width: IntWidth::W32, signed: true }),
                "i64" => Ok(Type::default_integer()),
                "u8" => Ok(Type::Integer { width: IntWidth::W8, signed: false }),
                "u16" => Ok(Type::Integer { width: IntWidth::W16, signed: false }),
                "u32" => Ok(Type::Integer { width: IntWidth::W32, signed: false }),
                "u64" => Ok(Type::Integer { width: IntWidth::W64, signed: false }),
                "f32" => Ok(Type::FloatingPoint(FloatWidth::W32)),
                "f64" => Ok(Type::default_float()),
                "rational" => Ok(Type::Rational),
                "complex" => Ok(Type::Complex),
                "void" => Ok(Type::Void),
                "bool" => Ok(Type::Boolean),
                "char" => Ok(Type::Character),
                "str" => Ok(Type::String),
                literal => match ctx.environment.get_type(literal) {
                    Some(type_id) => Ok(type_id),
                    None => Err(TypeCheckError::UndefinedType(
                        UndefinedType {
                            type_name: value.clone(),
                        },
                        span.clone(),
                    )),
                },
            },
            TypeName::Fn {
                params,
                return_type,
                ..
            } => {
                let mut new_params = vec![];

                for p in params.iter() {
                    new_params.push((p, ctx).try_into()?)
                }

                Ok(Type::Function {
                    params: new_params,
                    return_value: Box::new((return_type.borrow(), ctx).try_into()?),
                })
            }
            TypeName::Tuple(inner, _) => {
                let mut elements = vec![];

                for el in inner.iter() {
                    elements.push((el, ctx).try_into()?);
                }

                Ok(Type::Tuple(elements))
            }
            TypeName::Array(inner, _) => {
                Ok(Type::Slice(Box::new((inner.borrow(), ctx).try_into()?)))
            }
            TypeName::Reference(inner, _) => {
                Ok(Type::Reference(Box::new((inner.borrow(), ctx).try_into()?)))
            }
            TypeName::Variant(members, _) => {
                let mut resolved = vec![];
                for m in members.iter() {
                    resolved.push((m, ctx).try_into()?);
                }
                Ok(Type::variant_of(resolved))
            }
            TypeName::Generic(name, _) => Ok(Type::Generic(name.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use crate::{
        checker::{context::Context, types::Type},
        lexer::Span,
        parser::ast::TypeName,
    };

    #[test]
    fn test_primitive_literals() {
        let ctx = Context::default();

        assert_eq!(
            Type::try_from((TypeName::Literal("i64".into(), Span::default()), &ctx)),
            Ok(Type::default_integer())
        );

        assert_eq!(
            Type::try_from((TypeName::Literal("f64".into(), Span::default()), &ctx)),
            Ok(Type::default_float())
        );
    }

    #[test]
    fn test_invalid_literal() {
        let ctx = Context::default();
        assert!(Type::try_from((TypeName::Literal("foo".into(), Span::default()), &ctx)).is_err());
    }

    #[test]
    fn test_custom_type() -> Result<(), Box<dyn Error>> {
        let mut ctx = Context::default();
        ctx.environment
            .add_type("Foo", Type::Slice(Box::new(Type::default_integer())))?;

        assert_eq!(
            Type::try_from((TypeName::Literal("Foo".into(), Span::default()), &ctx)),
            Ok(Type::Slice(Box::new(Type::default_integer())))
        );

        Ok(())
    }

    #[test]
    fn test_reference() {
        let ctx = Context::default();

        assert_eq!(
            Type::try_from((
                TypeName::Reference(
                    Box::new(TypeName::Literal("i64".into(), Span::default())),
                    Span::default()
                ),
                &ctx
            )),
            Ok(Type::Reference(Box::new(Type::default_integer())))
        );
    }

    #[test]
    fn test_tuple() {
        let ctx = Context::default();

        assert_eq!(
            Type::try_from((
                TypeName::Tuple(
                    vec![
                        TypeName::Literal("i64".into(), Span::default()),
                        TypeName::Literal("f64".into(), Span::default())
                    ],
                    Span::default()
                ),
                &ctx
            )),
            Ok(Type::Tuple(vec![Type::default_integer(), Type::default_float()]))
        )
    }

    #[test]
    fn test_array_is_slice() {
        let ctx = Context::default();

        assert_eq!(
            Type::try_from((
                TypeName::Array(
                    Box::new(TypeName::Literal("i64".into(), Span::default())),
                    Span::default()
                ),
                &ctx
            )),
            Ok(Type::Slice(Box::new(Type::default_integer())))
        )
    }

    #[test]
    fn test_function() {
        let ctx = Context::default();

        let func = TypeName::Fn {
            params: vec![
                TypeName::Literal("i64".into(), Span::default()),
                TypeName::Literal("f64".into(), Span::default()),
            ],
            return_type: Box::new(TypeName::Literal("f64".into(), Span::default())),
            position: Span::default(),
        };

        assert_eq!(
            Type::try_from((func, &ctx)),
            Ok(Type::Function {
                params: vec![Type::default_integer(), Type::default_float()],
                return_value: Box::new(Type::default_float())
            })
        )
    }

    #[test]
    fn test_variant_dedup() {
        let a = Type::default_integer();
        let b = Type::default_integer();
        let v = Type::variant_of(vec![a, b]);
        assert_eq!(v, Type::default_integer());
    }

    #[test]
    fn test_array_slice_compatible() {
        let array = Type::Array(Box::new(Type::default_integer()), 3);
        let slice = Type::Slice(Box::new(Type::default_integer()));
        assert!(array.does_eq(&slice));
    }
}
