//! Pattern matcher.
//!
//! Compiles a `when`-expression's pattern arms into a boolean decision
//! tree plus a binding map, the same shape the original pattern matcher
//! produces: every case contributes a `condition` expression (evaluated in
//! sequence, first match wins) and a set of `bindings` introduced into the
//! arm's body scope.

use std::collections::BTreeSet;

use crate::lexer::Span;

use super::{
    error::{DuplicateBinding, PatternMismatch, TypeCheckError},
    types::Type,
};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Binding {
    pub name: String,
    pub type_id_canonical: String,
}

/// One pattern case to try against the scrutinee, described declaratively
/// so the checker can both validate it against the scrutinee's type and
/// later lower it to target-language conditions during codegen.
#[derive(Clone, Debug, PartialEq)]
pub enum Case {
    /// Matches anything, binds nothing.
    Wildcard,
    /// Matches anything, binds the whole scrutinee to `name`.
    Identifier(String),
    /// Matches a previously declared constant by its canonical path.
    ConstantPath(Vec<String>),
    /// Matches an exact literal constant value (compared by canonical
    /// string since literals fold to `ConstValue` before this point).
    Literal(String),
    /// Matches an inclusive or exclusive range of a literal base type.
    Range { low: String, high: String, inclusive: bool },
    /// Destructures a tuple positionally.
    Tuple(Vec<Case>),
    /// Destructures an array; `rest` indicates `..` absorbing remaining
    /// elements was used and how many fixed elements surround it.
    Array { elements: Vec<Case>, rest: Option<usize> },
    /// Destructures named struct fields.
    Record { type_name: String, fields: Vec<(String, Case)> },
    /// Matches if the scrutinee's dynamic variant tag equals `member`, then
    /// recurses into `inner` against that member's type.
    VariantTagged { member: String, inner: Box<Case> },
    /// Matches if any of the alternatives match; all alternatives must
    /// introduce the same binding set (checked by the caller).
    Or(Vec<Case>),
}

#[derive(Clone, Debug, Default)]
pub struct MatchResult {
    /// Ordered condition fragments a code generator conjuncts/disjuncts to
    /// test whether this case applies; kept abstract here (textual,
    /// codegen-facing) since pattern compilation does not itself produce
    /// target-language text.
    pub condition: String,
    pub bindings: BTreeSet<Binding>,
}

pub struct PatternMatcher;

impl PatternMatcher {
    /// Check `case` against `scrutinee`'s type, returning the bindings it
    /// introduces or a `TypeCheckError` describing why it cannot match.
    pub fn check(case: &Case, scrutinee: &Type, span: &Span) -> Result<MatchResult, TypeCheckError> {
        let mut bindings = BTreeSet::new();
        let condition = Self::check_into(case, scrutinee, span, &mut bindings)?;
        Ok(MatchResult { condition, bindings })
    }

    fn check_into(
        case: &Case,
        scrutinee: &Type,
        span: &Span,
        bindings: &mut BTreeSet<Binding>,
    ) -> Result<String, TypeCheckError> {
        match case {
            Case::Wildcard => Ok("true".into()),
            Case::Identifier(name) => {
                Self::bind(bindings, name, scrutinee, span)?;
                Ok("true".into())
            }
            Case::ConstantPath(segments) => Ok(format!("== {}", segments.join("::"))),
            Case::Literal(lit) => Ok(format!("== {lit}")),
            Case::Range { low, high, inclusive } => {
                let op = if *inclusive { "<=" } else { "<" };
                Ok(format!(">= {low} && {op} {high}"))
            }
            Case::Tuple(parts) => {
                let Type::Tuple(types) = scrutinee else {
                    return Err(mismatch(scrutinee, "expected a tuple pattern target"));
                };
                if parts.len() != types.len() {
                    return Err(mismatch(
                        scrutinee,
                        &format!("tuple pattern has {} elements, type has {}", parts.len(), types.len()),
                    ));
                }
                for (part, ty) in parts.iter().zip(types.iter()) {
                    Self::check_into(part, ty, span, bindings)?;
                }
                Ok("true".into())
            }
            Case::Array { elements, rest } => {
                let element_type = match scrutinee {
                    Type::Array(inner, _) | Type::Slice(inner) => inner.as_ref().clone(),
                    _ => return Err(mismatch(scrutinee, "expected an array/slice pattern target")),
                };
                if rest.is_none() {
                    if let Type::Array(_, len) = scrutinee {
                        if *len != elements.len() {
                            return Err(mismatch(
                                scrutinee,
                                &format!("array pattern has {} elements, type has {len}", elements.len()),
                            ));
                        }
                    }
                }
                for el in elements {
                    Self::check_into(el, &element_type, span, bindings)?;
                }
                Ok("true".into())
            }
            Case::Record { type_name, fields } => {
                let Type::Struct(name, declared) = scrutinee else {
                    return Err(mismatch(scrutinee, "expected a struct pattern target"));
                };
                if name != type_name {
                    return Err(mismatch(
                        scrutinee,
                        &format!("pattern names struct '{type_name}' but scrutinee is '{name}'"),
                    ));
                }
                for (field_name, field_case) in fields {
                    let Some((_, field_type)) = declared.iter().find(|(n, _)| n == field_name) else {
                        return Err(mismatch(scrutinee, &format!("no field '{field_name}' on '{name}'")));
                    };
                    Self::check_into(field_case, field_type, span, bindings)?;
                }
                Ok("true".into())
            }
            Case::VariantTagged { member, inner } => {
                let Type::Variant(members) = scrutinee else {
                    return Err(mismatch(scrutinee, "expected a variant pattern target"));
                };
                let Some(member_type) = members.iter().find(|m| m.canonical() == *member) else {
                    return Err(mismatch(scrutinee, &format!("no variant member '{member}'")));
                };
                Self::check_into(inner, member_type, span, bindings)?;
                Ok(format!("tag == {member}"))
            }
            Case::Or(alternatives) => {
                let mut conditions = vec![];
                let mut first_bindings: Option<BTreeSet<Binding>> = None;
                for alt in alternatives {
                    let mut local = BTreeSet::new();
                    let condition = Self::check_into(alt, scrutinee, span, &mut local)?;
                    conditions.push(condition);
                    if let Some(first) = &first_bindings {
                        if first != &local {
                            return Err(TypeCheckError::PatternMismatch(
                                PatternMismatch {
                                    scrutinee: scrutinee.clone(),
                                    reason: "all 'or' alternatives must bind the same names".into(),
                                },
                                span.clone(),
                            ));
                        }
                    } else {
                        first_bindings = Some(local);
                    }
                }
                if let Some(local) = first_bindings {
                    bindings.extend(local);
                }
                Ok(format!("({})", conditions.join(" || ")))
            }
        }
    }

    fn bind(
        bindings: &mut BTreeSet<Binding>,
        name: &str,
        scrutinee: &Type,
        span: &Span,
    ) -> Result<(), TypeCheckError> {
        let binding = Binding {
            name: name.to_string(),
            type_id_canonical: scrutinee.canonical(),
        };
        if bindings.iter().any(|b| b.name == name) {
            return Err(TypeCheckError::DuplicateBinding(
                DuplicateBinding {
                    binding_name: name.to_string(),
                },
                span.clone(),
            ));
        }
        bindings.insert(binding);
        Ok(())
    }
}

fn mismatch(scrutinee: &Type, reason: &str) -> TypeCheckError {
    TypeCheckError::PatternMismatch(
        PatternMismatch {
            scrutinee: scrutinee.clone(),
            reason: reason.to_string(),
        },
        Span::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_matches_anything() {
        let result = PatternMatcher::check(&Case::Wildcard, &Type::Boolean, &Span::default()).unwrap();
        assert!(result.bindings.is_empty());
    }

    #[test]
    fn test_identifier_binds() {
        let result =
            PatternMatcher::check(&Case::Identifier("x".into()), &Type::default_integer(), &Span::default())
                .unwrap();
        assert_eq!(result.bindings.len(), 1);
    }

    #[test]
    fn test_tuple_arity_mismatch() {
        let scrutinee = Type::Tuple(vec![Type::Boolean]);
        let case = Case::Tuple(vec![Case::Wildcard, Case::Wildcard]);
        assert!(PatternMatcher::check(&case, &scrutinee, &Span::default()).is_err());
    }

    #[test]
    fn test_or_pattern_requires_same_bindings() {
        let scrutinee = Type::default_integer();
        let case = Case::Or(vec![Case::Identifier("x".into()), Case::Wildcard]);
        assert!(PatternMatcher::check(&case, &scrutinee, &Span::default()).is_err());
    }

    #[test]
    fn test_duplicate_binding_in_tuple() {
        let scrutinee = Type::Tuple(vec![Type::default_integer(), Type::default_integer()]);
        let case = Case::Tuple(vec![Case::Identifier("x".into()), Case::Identifier("x".into())]);
        assert!(PatternMatcher::check(&case, &scrutinee, &Span::default()).is_err());
    }

    #[test]
    fn test_variant_tagged() {
        let scrutinee = Type::Variant(vec![Type::Boolean, Type::Character]);
        let case = Case::VariantTagged {
            member: Type::Boolean.canonical(),
            inner: Box::new(Case::Identifier("b".into())),
        };
        let result = PatternMatcher::check(&case, &scrutinee, &Span::default()).unwrap();
        assert_eq!(result.bindings.len(), 1);
    }
}
