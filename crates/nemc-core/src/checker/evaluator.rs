//! Constant evaluator.
//!
//! Walks a constant expression and folds it down to a [`ConstValue`],
//! mirroring the stack-based visitor the original implementation uses:
//! every sub-expression pushes exactly one value onto an operand stack and
//! every operator pops its operands back off, so recursive structure
//! (tuples, arrays, nested arithmetic) falls out without extra plumbing.
//!
//! Used by `const` declarations, array length expressions, and the "all
//! case conditions arise from literal/constant values" requirement of
//! pattern matching.

use std::fmt::Display;

use num_bigint::BigInt;
use num_complex::Complex64;
use num_rational::BigRational;

use crate::lexer::Span;

use super::types::Type;

#[derive(Clone, Debug, PartialEq)]
pub enum ConstValue {
    Boolean(bool),
    Character(char),
    Chars(Vec<char>),
    Integer(BigInt),
    Rational(BigRational),
    Float(f64),
    Complex(Complex64),
    Sequence(Vec<ConstValue>),
}

impl ConstValue {
    pub fn type_of(&self) -> Type {
        match self {
            ConstValue::Boolean(_) => Type::Boolean,
            ConstValue::Character(_) => Type::Character,
            ConstValue::Chars(items) => Type::Chars(items.len()),
            ConstValue::Integer(_) => Type::default_integer(),
            ConstValue::Rational(_) => Type::Rational,
            ConstValue::Float(_) => Type::default_float(),
            ConstValue::Complex(_) => Type::Complex,
            ConstValue::Sequence(items) => {
                let element = items.first().map(ConstValue::type_of).unwrap_or(Type::Unknown);
                Type::Array(Box::new(element), items.len())
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvaluationError {
    /// Overflow during a constant integer operation.
    Overflow { operation: String },
    /// Division (or remainder) by zero.
    DivisionByZero,
    /// A numeric cast would lose information or fall outside the target
    /// type's representable range.
    OutOfRange { target: String },
    /// The operand referenced a runtime value; not every expression can be
    /// folded at compile time.
    NonConstantOperand,
    /// The evaluator encountered a generic parameter it can't fold yet --
    /// the caller should retry after generic instantiation has substituted
    /// concrete arguments.
    GenericEvaluation,
    ParseError { literal: String },
}

impl Display for EvaluationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationError::Overflow { operation } => {
                write!(f, "constant overflow while evaluating '{operation}'")
            }
            EvaluationError::DivisionByZero => write!(f, "division by zero in constant expression"),
            EvaluationError::OutOfRange { target } => {
                write!(f, "constant value out of range for target type '{target}'")
            }
            EvaluationError::NonConstantOperand => {
                write!(f, "expression is not a compile-time constant")
            }
            EvaluationError::GenericEvaluation => {
                write!(f, "constant depends on an unresolved generic parameter")
            }
            EvaluationError::ParseError { literal } => {
                write!(f, "could not parse constant literal '{literal}'")
            }
        }
    }
}

impl std::error::Error for EvaluationError {}

pub type EvalResult<T> = Result<T, EvaluationError>;

/// Parse an integer literal (allowing `_` separators, matching the
/// lexer's numeric token grammar) into a `BigInt`.
pub fn integer_parse(literal: &str) -> EvalResult<BigInt> {
    let cleaned: String = literal.chars().filter(|c| *c != '_').collect();
    cleaned
        .parse::<BigInt>()
        .map_err(|_| EvaluationError::ParseError { literal: literal.to_string() })
}

/// Parse a floating point literal into an `f64`. Folding happens at `f64`
/// precision regardless of the declared width; narrowing to `f32` is
/// applied as a checked cast at the point of use, not during folding.
pub fn float_parse(literal: &str) -> EvalResult<f64> {
    let cleaned: String = literal.chars().filter(|c| *c != '_').collect();
    cleaned
        .parse::<f64>()
        .map_err(|_| EvaluationError::ParseError { literal: literal.to_string() })
}

/// Parse an imaginary literal (`<float>i`) into the imaginary component of
/// a complex constant.
pub fn imag_parse(literal: &str) -> EvalResult<f64> {
    let trimmed = literal.strip_suffix('i').unwrap_or(literal);
    float_parse(trimmed)
}

/// Stack-based evaluator driving the constant-folding operator set. Each
/// `push_*`/`apply_*` call corresponds to one visited AST node.
#[derive(Default)]
pub struct Evaluator {
    stack: Vec<ConstValue>,
    #[allow(dead_code)]
    position: Option<Span>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: ConstValue) {
        self.stack.push(value);
    }

    fn pop(&mut self) -> EvalResult<ConstValue> {
        self.stack.pop().ok_or(EvaluationError::NonConstantOperand)
    }

    pub fn finish(mut self) -> EvalResult<ConstValue> {
        self.pop()
    }

    pub fn apply_add(&mut self) -> EvalResult<()> {
        let rhs = self.pop()?;
        let lhs = self.pop()?;
        self.push(Self::binary_numeric(lhs, rhs, "+", |a, b| a + b, |a, b| a + b)?);
        Ok(())
    }

    pub fn apply_sub(&mut self) -> EvalResult<()> {
        let rhs = self.pop()?;
        let lhs = self.pop()?;
        self.push(Self::binary_numeric(lhs, rhs, "-", |a, b| a - b, |a, b| a - b)?);
        Ok(())
    }

    pub fn apply_mul(&mut self) -> EvalResult<()> {
        let rhs = self.pop()?;
        let lhs = self.pop()?;
        self.push(Self::binary_numeric(lhs, rhs, "*", |a, b| a * b, |a, b| a * b)?);
        Ok(())
    }

    pub fn apply_div(&mut self) -> EvalResult<()> {
        let rhs = self.pop()?;
        let lhs = self.pop()?;
        match (&lhs, &rhs) {
            (ConstValue::Integer(_), ConstValue::Integer(b)) if b == &BigInt::from(0) => {
                return Err(EvaluationError::DivisionByZero)
            }
            (ConstValue::Float(_), ConstValue::Float(b)) if *b == 0.0 => {
                return Err(EvaluationError::DivisionByZero)
            }
            _ => {}
        }
        self.push(Self::binary_numeric(lhs, rhs, "/", |a, b| a / b, |a, b| a / b)?);
        Ok(())
    }

    pub fn apply_eq(&mut self) -> EvalResult<()> {
        let rhs = self.pop()?;
        let lhs = self.pop()?;
        self.push(ConstValue::Boolean(lhs == rhs));
        Ok(())
    }

    fn binary_numeric(
        lhs: ConstValue,
        rhs: ConstValue,
        op: &str,
        int_op: impl Fn(BigInt, BigInt) -> BigInt,
        float_op: impl Fn(f64, f64) -> f64,
    ) -> EvalResult<ConstValue> {
        match (lhs, rhs) {
            (ConstValue::Integer(a), ConstValue::Integer(b)) => Ok(ConstValue::Integer(int_op(a, b))),
            (ConstValue::Float(a), ConstValue::Float(b)) => Ok(ConstValue::Float(float_op(a, b))),
            (ConstValue::Rational(a), ConstValue::Rational(b)) => {
                Ok(ConstValue::Rational(match op {
                    "+" => a + b,
                    "-" => a - b,
                    "*" => a * b,
                    "/" => a / b,
                    _ => return Err(EvaluationError::Overflow { operation: op.to_string() }),
                }))
            }
            (ConstValue::Complex(a), ConstValue::Complex(b)) => Ok(ConstValue::Complex(match op {
                "+" => a + b,
                "-" => a - b,
                "*" => a * b,
                "/" => a / b,
                _ => return Err(EvaluationError::Overflow { operation: op.to_string() }),
            })),
            _ => Err(EvaluationError::NonConstantOperand),
        }
    }

    /// Checked cast into a target integer width, per the "out of range
    /// cast" failure mode.
    pub fn cast_to_integer(value: &ConstValue, bits: u32, signed: bool) -> EvalResult<BigInt> {
        let ConstValue::Integer(n) = value else {
            return Err(EvaluationError::NonConstantOperand);
        };
        let (min, max) = if signed {
            let half = BigInt::from(2).pow(bits - 1);
            (-half.clone(), half - 1)
        } else {
            (BigInt::from(0), BigInt::from(2).pow(bits) - 1)
        };
        if n < &min || n > &max {
            return Err(EvaluationError::OutOfRange {
                target: format!("{}{bits}", if signed { "i" } else { "u" }),
            });
        }
        Ok(n.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_parse() {
        assert_eq!(integer_parse("1_000").unwrap(), BigInt::from(1000));
    }

    #[test]
    fn test_add() {
        let mut eval = Evaluator::new();
        eval.push(ConstValue::Integer(BigInt::from(1)));
        eval.push(ConstValue::Integer(BigInt::from(2)));
        eval.apply_add().unwrap();
        assert_eq!(eval.finish().unwrap(), ConstValue::Integer(BigInt::from(3)));
    }

    #[test]
    fn test_division_by_zero() {
        let mut eval = Evaluator::new();
        eval.push(ConstValue::Integer(BigInt::from(1)));
        eval.push(ConstValue::Integer(BigInt::from(0)));
        assert_eq!(eval.apply_div(), Err(EvaluationError::DivisionByZero));
    }

    #[test]
    fn test_out_of_range_cast() {
        let value = ConstValue::Integer(BigInt::from(300));
        assert!(Evaluator::cast_to_integer(&value, 8, false).is_err());
    }

    #[test]
    fn test_in_range_cast() {
        let value = ConstValue::Integer(BigInt::from(10));
        assert_eq!(
            Evaluator::cast_to_integer(&value, 8, false).unwrap(),
            BigInt::from(10)
        );
    }
}
