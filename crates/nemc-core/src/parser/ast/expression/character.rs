use crate::grammar::{self, FromGrammar};
use crate::lexer::Span;
use crate::parser::ast::AstNode;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Character<T> {
    pub character: char,
    pub position: Span,
    pub info: T,
}

impl FromGrammar<grammar::CharacterLiteral> for Character<()> {
    fn transform(item: rust_sitter::Spanned<grammar::CharacterLiteral>, source: &str) -> Self {
        let rust_sitter::Spanned { value, span } = item;
        Character {
            character: value.0.value, // CharacterLiteral(Spanned<char>) - extract the char value
            info: (),
            position: Span::new(span, source),
        }
    }
}

impl From<Character<()>> for AstNode {
    fn from(character: Character<()>) -> AstNode {
        AstNode::Character(character)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{ast::Expression, test_helpers::parse_expression};

    #[test]
    fn test_parse_simple() {
        let result = parse_expression("'a'").unwrap();
        assert!(matches!(result, Expression::Character(c) if c.character == 'a'));
    }

    #[test]
    fn test_parse_escaped() {
        let result = parse_expression("'\\t'").unwrap();
        assert!(matches!(result, Expression::Character(c) if c.character == '\t'));
    }
}
