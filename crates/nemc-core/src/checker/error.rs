use std::{error::Error, fmt::Display};

use crate::{lexer::Span, parser::ast::TypeName};

use super::types::Type;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeCheckError {
    TypeMismatch(TypeMismatch, Span),
    UndefinedVariable(UndefinedVariable, Span),
    UndefinedType(UndefinedType, Span),
    InvalidConstantType(InvalidConstantType, Span),
    RedefinedConstant(RedefinedConstant, Span),
    ImmutableReassign(ImmutableReassign, Span),
    MissingMainFunction(MissingMainFunction),
    InvalidMainSignature(InvalidMainSignature, Span),
    PatternMismatch(PatternMismatch, Span),
    DuplicateBinding(DuplicateBinding, Span),
    GenericArityMismatch(GenericArityMismatch, Span),
    GenericUnificationFailure(GenericUnificationFailure, Span),
    NotInLoop(NotInLoop, Span),
    ContractViolation(ContractViolation, Span),
    UnimplementedBehaviour(UnimplementedBehaviour, Span),
    NonConstantExpression(NonConstantExpression, Span),
}

impl Display for TypeCheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.span().to_string(self.err()).as_str())
    }
}

impl TypeCheckError {
    fn span(&self) -> Span {
        match self {
            TypeCheckError::TypeMismatch(_, span) => span.clone(),
            TypeCheckError::UndefinedVariable(_, span) => span.clone(),
            TypeCheckError::UndefinedType(_, span) => span.clone(),
            TypeCheckError::InvalidConstantType(_, span) => span.clone(),
            TypeCheckError::RedefinedConstant(_, span) => span.clone(),
            TypeCheckError::ImmutableReassign(_, span) => span.clone(),
            TypeCheckError::MissingMainFunction(_) => Span::default(),
            TypeCheckError::InvalidMainSignature(_, span) => span.clone(),
            TypeCheckError::PatternMismatch(_, span) => span.clone(),
            TypeCheckError::DuplicateBinding(_, span) => span.clone(),
            TypeCheckError::GenericArityMismatch(_, span) => span.clone(),
            TypeCheckError::GenericUnificationFailure(_, span) => span.clone(),
            TypeCheckError::NotInLoop(_, span) => span.clone(),
            TypeCheckError::ContractViolation(_, span) => span.clone(),
            TypeCheckError::UnimplementedBehaviour(_, span) => span.clone(),
            TypeCheckError::NonConstantExpression(_, span) => span.clone(),
        }
    }

    fn err(&self) -> Box<dyn Error> {
        match self {
            TypeCheckError::TypeMismatch(e, _) => Box::new(e.clone()),
            TypeCheckError::UndefinedVariable(e, _) => Box::new(e.clone()),
            TypeCheckError::UndefinedType(e, _) => Box::new(e.clone()),
            TypeCheckError::InvalidConstantType(e, _) => Box::new(e.clone()),
            TypeCheckError::RedefinedConstant(e, _) => Box::new(e.clone()),
            TypeCheckError::ImmutableReassign(e, _) => Box::new(e.clone()),
            TypeCheckError::MissingMainFunction(e) => Box::new(e.clone()),
            TypeCheckError::InvalidMainSignature(e, _) => Box::new(e.clone()),
            TypeCheckError::PatternMismatch(e, _) => Box::new(e.clone()),
            TypeCheckError::DuplicateBinding(e, _) => Box::new(e.clone()),
            TypeCheckError::GenericArityMismatch(e, _) => Box::new(e.clone()),
            TypeCheckError::GenericUnificationFailure(e, _) => Box::new(e.clone()),
            TypeCheckError::NotInLoop(e, _) => Box::new(e.clone()),
            TypeCheckError::ContractViolation(e, _) => Box::new(e.clone()),
            TypeCheckError::UnimplementedBehaviour(e, _) => Box::new(e.clone()),
            TypeCheckError::NonConstantExpression(e, _) => Box::new(e.clone()),
        }
    }
}

impl Error for TypeCheckError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeMismatch {
    pub expected: Type,
    pub actual: Type,
}

impl Display for TypeMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Expected type '{:?}' but got '{:?}'",
            self.expected, self.actual
        ))
    }
}

impl Error for TypeMismatch {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndefinedVariable {
    pub variable_name: String,
}

impl Display for UndefinedVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Tried to access undefined variable {}",
            self.variable_name
        ))
    }
}

impl Error for UndefinedVariable {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndefinedType {
    pub type_name: TypeName,
}

impl Display for UndefinedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("Undefined type {}", self.type_name))
    }
}

impl Error for UndefinedType {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidConstantType {
    pub constant_name: String,
}

impl Display for InvalidConstantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Constant '{}' needs to have a valid annotated type",
            self.constant_name
        ))
    }
}

impl Error for InvalidConstantType {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedefinedConstant {
    pub constant_name: String,
}

impl Display for RedefinedConstant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Constant '{}' is already defined",
            self.constant_name
        ))
    }
}

impl Error for RedefinedConstant {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImmutableReassign {
    pub variable_name: String,
}

impl Display for ImmutableReassign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Can not reassign immutable variable '{}'",
            self.variable_name
        ))
    }
}

impl Error for ImmutableReassign {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingMainFunction;

impl Display for MissingMainFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Workspace is missing a 'main' function")
    }
}

impl Error for MissingMainFunction {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidMainSignature;

impl Display for InvalidMainSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("'main' must take no parameters and return 'void' or an integer")
    }
}

impl Error for InvalidMainSignature {}

/// A `when` pattern failed to match the scrutinee's type, or the pattern
/// arm list is not exhaustive over the scrutinee's type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternMismatch {
    pub scrutinee: Type,
    pub reason: String,
}

impl Display for PatternMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Pattern does not match type '{:?}': {}",
            self.scrutinee, self.reason
        ))
    }
}

impl Error for PatternMismatch {}

/// The same binding name was introduced twice within one pattern (e.g. both
/// sides of an `or`-pattern, or two tuple slots).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateBinding {
    pub binding_name: String,
}

impl Display for DuplicateBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Binding '{}' is introduced more than once in this pattern",
            self.binding_name
        ))
    }
}

impl Error for DuplicateBinding {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenericArityMismatch {
    pub declaration_name: String,
    pub expected: usize,
    pub actual: usize,
}

impl Display for GenericArityMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "'{}' expects {} generic parameter(s), got {}",
            self.declaration_name, self.expected, self.actual
        ))
    }
}

impl Error for GenericArityMismatch {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenericUnificationFailure {
    pub reason: String,
}

impl Display for GenericUnificationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("Could not unify generic parameters: {}", self.reason))
    }
}

impl Error for GenericUnificationFailure {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotInLoop;

impl Display for NotInLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("'break'/'continue' used outside of a loop")
    }
}

impl Error for NotInLoop {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractViolation {
    pub kind: String,
}

impl Display for ContractViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "'{}' contract expression must evaluate to 'bool'",
            self.kind
        ))
    }
}

impl Error for ContractViolation {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnimplementedBehaviour {
    pub type_name: String,
    pub behaviour_name: String,
    pub missing_methods: Vec<String>,
}

impl Display for UnimplementedBehaviour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "'{}' does not fully implement behaviour '{}' (missing: {})",
            self.type_name,
            self.behaviour_name,
            self.missing_methods.join(", ")
        ))
    }
}

impl Error for UnimplementedBehaviour {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NonConstantExpression {
    pub reason: String,
}

impl Display for NonConstantExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Expression is not valid in a constant context: {}",
            self.reason
        ))
    }
}

impl Error for NonConstantExpression {}
