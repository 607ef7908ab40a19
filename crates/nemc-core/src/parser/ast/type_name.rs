use std::fmt::Display;

use crate::grammar::{self, FromGrammar};
use crate::lexer::Span;

use super::AstNode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeName {
    Literal(String, Span),
    Fn {
        params: Vec<TypeName>,
        return_type: Box<TypeName>,
        position: Span,
    },
    Tuple(Vec<TypeName>, Span),
    Array(Box<TypeName>, Span),
    Reference(Box<TypeName>, Span),
    /// `A | B | C` union type expression
    Variant(Vec<TypeName>, Span),
    /// Unbound generic parameter reference, e.g. the `T` in `fn id<T>(x: T) -> T`
    Generic(String, Span),
}

impl TypeName {
    pub fn position(&self) -> Span {
        match self {
            TypeName::Literal(_, position) => position.clone(),
            TypeName::Fn { position, .. } => position.clone(),
            TypeName::Tuple(_, position) => position.clone(),
            TypeName::Array(_, position) => position.clone(),
            TypeName::Reference(_, position) => position.clone(),
            TypeName::Variant(_, position) => position.clone(),
            TypeName::Generic(_, position) => position.clone(),
        }
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeName::Literal(lit, _) => f.write_str(lit.as_str()),
            TypeName::Fn {
                params,
                return_type,
                ..
            } => f.write_fmt(format_args!(
                "({}) -> {return_type}",
                params
                    .iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            TypeName::Tuple(lits, _) => f.write_fmt(format_args!(
                "({})",
                lits.iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            TypeName::Array(el, _) => f.write_fmt(format_args!("[{el}]")),
            TypeName::Reference(el, _) => f.write_fmt(format_args!("&{el}")),
            TypeName::Variant(members, _) => f.write_fmt(format_args!(
                "{}",
                members.iter().map(|m| m.to_string()).collect::<Vec<_>>().join(" | ")
            )),
            TypeName::Generic(name, _) => f.write_str(name),
        }
    }
}

impl From<&TypeName> for TypeName {
    fn from(value: &TypeName) -> Self {
        value.clone()
    }
}

impl FromGrammar<grammar::TypeName> for TypeName {
    fn transform(item: rust_sitter::Spanned<grammar::TypeName>, source: &str) -> Self {
        let rust_sitter::Spanned { value, span } = item;
        let position = Span::new(span, source);

        match value {
            grammar::TypeName::LiteralType(literal) => {
                TypeName::Literal(literal.typename.value.0.value, position)
            }
            grammar::TypeName::ArrayType(array) => TypeName::Array(
                Box::new(TypeName::transform(*array.inner, source)),
                position,
            ),
            grammar::TypeName::ReferenceType(reference) => TypeName::Reference(
                Box::new(TypeName::transform(*reference.inner, source)),
                position,
            ),
            grammar::TypeName::FunctionType(function) => TypeName::Fn {
                params: function
                    .params
                    .types
                    .into_iter()
                    .map(|t| TypeName::transform(t, source))
                    .collect(),
                return_type: Box::new(TypeName::transform(*function.return_type, source)),
                position,
            },
            grammar::TypeName::TupleType(tuple) => TypeName::Tuple(
                tuple
                    .types
                    .into_iter()
                    .map(|t| TypeName::transform(t, source))
                    .collect(),
                position,
            ),
            grammar::TypeName::VariantType(left, _, right) => {
                let mut members = Vec::new();
                flatten_variant_member(*left, source, &mut members);
                flatten_variant_member(*right, source, &mut members);
                TypeName::Variant(members, position)
            }
        }
    }
}

/// `A | B | C` parses as a left-associative chain of binary `VariantType`
/// nodes; this collapses that chain back into a single flat member list.
fn flatten_variant_member(
    item: rust_sitter::Spanned<grammar::TypeName>,
    source: &str,
    members: &mut Vec<TypeName>,
) {
    if let grammar::TypeName::VariantType(left, _, right) = &item.value {
        let left = (**left).clone();
        let right = (**right).clone();
        flatten_variant_member(left, source, members);
        flatten_variant_member(right, source, members);
    } else {
        members.push(TypeName::transform(item, source));
    }
}

impl From<TypeName> for AstNode {
    fn from(value: TypeName) -> Self {
        Self::TypeName(value)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::test_helpers::parse_type_name;

    use super::TypeName;

    #[test]
    fn test_parse_simple_literal() {
        let result = parse_type_name("i32").unwrap();
        assert!(matches!(result, TypeName::Literal(ref name, _) if name == "i32"));
    }

    #[test]
    fn test_parse_simple_tuple() {
        let result = parse_type_name("(i32, i32)").unwrap();
        let TypeName::Tuple(elements, _) = result else {
            panic!("expected a tuple type")
        };
        assert_eq!(elements.len(), 2);
        assert!(elements
            .iter()
            .all(|e| matches!(e, TypeName::Literal(name, _) if name == "i32")));
    }

    #[test]
    fn test_parse_simple_function() {
        let result = parse_type_name("() -> i32").unwrap();
        let TypeName::Fn { params, return_type, .. } = result else {
            panic!("expected a function type")
        };
        assert!(params.is_empty());
        assert!(matches!(*return_type, TypeName::Literal(ref name, _) if name == "i32"));
    }

    #[test]
    fn test_parse_simple_reference() {
        let result = parse_type_name("&i32").unwrap();
        let TypeName::Reference(inner, _) = result else {
            panic!("expected a reference type")
        };
        assert!(matches!(*inner, TypeName::Literal(ref name, _) if name == "i32"));
    }

    #[test]
    fn test_parse_array_of_references() {
        let result = parse_type_name("&[i32]").unwrap();
        let TypeName::Array(inner, _) = result else {
            panic!("expected an array type")
        };
        assert!(matches!(*inner, TypeName::Literal(ref name, _) if name == "i32"));
    }

    #[test]
    fn test_parse_variant() {
        let result = parse_type_name("i32 | string | bool").unwrap();
        let TypeName::Variant(members, _) = result else {
            panic!("expected a variant type")
        };
        let names: Vec<_> = members
            .iter()
            .map(|m| match m {
                TypeName::Literal(name, _) => name.as_str(),
                _ => panic!("expected literal member"),
            })
            .collect();
        assert_eq!(names, vec!["i32", "string", "bool"]);
    }

    #[test]
    fn test_parse_tuple_of_references() {
        let result = parse_type_name("(&i32, &i32)").unwrap();
        let TypeName::Tuple(elements, _) = result else {
            panic!("expected a tuple type")
        };
        assert_eq!(elements.len(), 2);
        assert!(elements.iter().all(|e| matches!(e, TypeName::Reference(..))));
    }
}
