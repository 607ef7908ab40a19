//! Type matcher.
//!
//! Unifies a generic declaration's type-expression shape against a
//! concrete argument type, producing a `name -> Parameter` binding map --
//! the same role the original type matcher plays when resolving generic
//! function/struct instantiations.

use std::collections::HashMap;

use super::{evaluator::ConstValue, types::Type};

#[derive(Clone, Debug, PartialEq)]
pub enum Parameter {
    Type(Type),
    Value(ConstValue),
}

#[derive(Clone, Debug, Default)]
pub struct TypeMatchResult {
    pub bindings: HashMap<String, Parameter>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeMatchError {
    pub reason: String,
}

impl std::fmt::Display for TypeMatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for TypeMatchError {}

pub struct TypeMatcher;

impl TypeMatcher {
    /// Unify `pattern` (a type expression that may reference generic
    /// parameter names) against `concrete` (a fully resolved argument
    /// type), accumulating bindings into `result`.
    pub fn unify(pattern: &Type, concrete: &Type, result: &mut TypeMatchResult) -> Result<(), TypeMatchError> {
        match (pattern, concrete) {
            (Type::Generic(name), concrete) => {
                Self::bind_type(result, name, concrete.clone())
            }
            (Type::Reference(p), Type::Reference(c)) => Self::unify(p, c, result),
            (Type::Slice(p), Type::Slice(c)) => Self::unify(p, c, result),
            (Type::Slice(p), Type::Array(c, _)) => Self::unify(p, c, result),
            (Type::Array(p, plen), Type::Array(c, clen)) => {
                if plen != clen {
                    return Err(TypeMatchError {
                        reason: format!("array length mismatch: {plen} vs {clen}"),
                    });
                }
                Self::unify(p, c, result)
            }
            (Type::Tuple(ps), Type::Tuple(cs)) => {
                if ps.len() != cs.len() {
                    return Err(TypeMatchError {
                        reason: "tuple arity mismatch".into(),
                    });
                }
                for (p, c) in ps.iter().zip(cs.iter()) {
                    Self::unify(p, c, result)?;
                }
                Ok(())
            }
            (
                Type::Function { params: pp, return_value: pr },
                Type::Function { params: cp, return_value: cr },
            ) => {
                if pp.len() != cp.len() {
                    return Err(TypeMatchError {
                        reason: "function arity mismatch".into(),
                    });
                }
                for (p, c) in pp.iter().zip(cp.iter()) {
                    Self::unify(p, c, result)?;
                }
                Self::unify(pr, cr, result)
            }
            (Type::Variant(pm), concrete) => {
                // A generic that appears as one member of a declared union
                // unifies against whichever member the concrete type
                // structurally matches; absorb the rest without binding.
                for member in pm {
                    if Self::unify(member, concrete, result).is_ok() {
                        return Ok(());
                    }
                }
                Err(TypeMatchError {
                    reason: format!("no variant member matches '{}'", concrete.canonical()),
                })
            }
            (pattern, concrete) if pattern.does_eq(concrete) => Ok(()),
            (pattern, concrete) => Err(TypeMatchError {
                reason: format!(
                    "cannot unify '{}' with '{}'",
                    pattern.canonical(),
                    concrete.canonical()
                ),
            }),
        }
    }

    /// Unify a const-generic parameter (e.g. an array length written as a
    /// named constant) against a folded constant value.
    pub fn unify_const(
        name: &str,
        value: ConstValue,
        result: &mut TypeMatchResult,
    ) -> Result<(), TypeMatchError> {
        if let Some(Parameter::Value(existing)) = result.bindings.get(name) {
            if *existing != value {
                return Err(TypeMatchError {
                    reason: format!("conflicting bindings for const parameter '{name}'"),
                });
            }
            return Ok(());
        }
        result.bindings.insert(name.to_string(), Parameter::Value(value));
        Ok(())
    }

    fn bind_type(result: &mut TypeMatchResult, name: &str, concrete: Type) -> Result<(), TypeMatchError> {
        if let Some(Parameter::Type(existing)) = result.bindings.get(name) {
            if !existing.does_eq(&concrete) {
                return Err(TypeMatchError {
                    reason: format!(
                        "conflicting bindings for generic parameter '{name}': '{}' vs '{}'",
                        existing.canonical(),
                        concrete.canonical()
                    ),
                });
            }
            return Ok(());
        }
        result.bindings.insert(name.to_string(), Parameter::Type(concrete));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_generic_binding() {
        let mut result = TypeMatchResult::default();
        TypeMatcher::unify(&Type::Generic("T".into()), &Type::Boolean, &mut result).unwrap();
        assert_eq!(result.bindings.get("T"), Some(&Parameter::Type(Type::Boolean)));
    }

    #[test]
    fn test_consistent_repeated_binding() {
        let mut result = TypeMatchResult::default();
        let tuple_pattern = Type::Tuple(vec![Type::Generic("T".into()), Type::Generic("T".into())]);
        let tuple_concrete = Type::Tuple(vec![Type::Boolean, Type::Boolean]);
        TypeMatcher::unify(&tuple_pattern, &tuple_concrete, &mut result).unwrap();
        assert_eq!(result.bindings.len(), 1);
    }

    #[test]
    fn test_conflicting_binding_fails() {
        let mut result = TypeMatchResult::default();
        let tuple_pattern = Type::Tuple(vec![Type::Generic("T".into()), Type::Generic("T".into())]);
        let tuple_concrete = Type::Tuple(vec![Type::Boolean, Type::Character]);
        assert!(TypeMatcher::unify(&tuple_pattern, &tuple_concrete, &mut result).is_err());
    }

    #[test]
    fn test_array_length_mismatch() {
        let mut result = TypeMatchResult::default();
        let pattern = Type::Array(Box::new(Type::Generic("T".into())), 3);
        let concrete = Type::Array(Box::new(Type::Boolean), 4);
        assert!(TypeMatcher::unify(&pattern, &concrete, &mut result).is_err());
    }

    #[test]
    fn test_slice_array_decay() {
        let mut result = TypeMatchResult::default();
        let pattern = Type::Slice(Box::new(Type::Generic("T".into())));
        let concrete = Type::Array(Box::new(Type::Boolean), 4);
        TypeMatcher::unify(&pattern, &concrete, &mut result).unwrap();
        assert_eq!(result.bindings.get("T"), Some(&Parameter::Type(Type::Boolean)));
    }
}
