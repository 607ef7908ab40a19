use crate::{
    grammar::{self, FromGrammar},
    lexer::Span,
};

use super::{AstNode, Expression, Num};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Array<T> {
    Literal {
        values: Vec<Expression<T>>,
        info: T,
        position: Span,
    },
    Default {
        initial_value: Box<Expression<T>>,
        length: Num<T>,
        info: T,
        position: Span,
    },
}

impl<T> Array<T>
where
    T: Clone,
{
    pub fn get_info(&self) -> T {
        match self {
            Array::Literal { info, .. } => info.clone(),
            Array::Default { info, .. } => info.clone(),
        }
    }

    pub fn position(&self) -> Span {
        match self {
            Array::Literal { position, .. } => position.clone(),
            Array::Default { position, .. } => position.clone(),
        }
    }
}

impl FromGrammar<grammar::Array> for Array<()> {
    fn transform(item: rust_sitter::Spanned<grammar::Array>, source: &str) -> Self {
        let rust_sitter::Spanned { value, span } = item;

        // Convert each element from grammar::Expression to Expression<()>
        // Note: elements are not wrapped in Spanned, so we create our own with the overall span
        let values = value
            .elements
            .into_iter()
            .map(|expr| Expression::transform(expr, source))
            .collect();

        Array::Literal {
            values,
            info: (),
            position: Span::new(span, source),
        }
    }
}

impl From<Array<()>> for AstNode {
    fn from(value: Array<()>) -> Self {
        Self::Array(value)
    }
}
